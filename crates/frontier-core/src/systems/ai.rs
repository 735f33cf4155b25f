//! Animal AI system - gives idle wild animals wander destinations.

use crate::components::*;
use super::tasks::obstacle_cells;
use frontier_logic::grid::GridCell;
use frontier_logic::pathfinding::{build_graph, find_path};
use frontier_logic::terrain::TerrainField;
use hecs::{Entity, World};
use log::debug;
use rand::Rng;

/// Chance scale applied to each animal's activity rate per tick.
const WANDER_CHANCE: f32 = 0.01;

/// Roll each idle wild animal against its activity rate; winners pick a
/// random map cell and path toward it.
pub fn animal_ai_system(world: &mut World, terrain: &TerrainField, rng: &mut impl Rng) {
    let mut wanderers: Vec<(Entity, GridCell, GridCell)> = Vec::new();

    for (entity, (wild, pos)) in world.query::<(&Wild, &Position)>().iter() {
        // Busy animals keep walking.
        if world.get::<&PathFollow>(entity).is_ok() {
            continue;
        }
        if rng.gen::<f32>() >= WANDER_CHANCE * wild.activity_rate {
            continue;
        }

        let goal = GridCell::new(
            rng.gen_range(0..terrain.width() as i32),
            rng.gen_range(0..terrain.height() as i32),
        );
        wanderers.push((entity, pos.cell(), goal));
    }

    for (entity, start, goal) in wanderers {
        let obstacles = obstacle_cells(world, &[entity]);
        let graph = build_graph(terrain, &obstacles);
        match find_path(&graph, start, goal) {
            Ok(path) if !path.is_empty() => {
                let _ = world.insert_one(entity, PathFollow::new(path));
            }
            Ok(_) => {}
            Err(err) => {
                debug!("animal wander toward {:?} failed: {}", goal, err);
            }
        }
    }
}
