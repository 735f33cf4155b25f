//! Movement system - walks creatures along their planned paths.

use crate::components::*;
use frontier_logic::grid::GridCell;
use frontier_logic::movement::{advance, StepOutcome};
use frontier_logic::pathfinding::path_is_clear;
use frontier_logic::task::{Goal, Task};
use frontier_logic::terrain::TerrainField;
use hecs::{Entity, World};
use log::debug;

/// Advance every path-following creature by one tick.
///
/// Before stepping, the remaining path is validated against the current
/// obstacle snapshot; a path that became blocked is dropped so the task
/// system replans on the next tick.
pub fn movement_system(world: &mut World, terrain: &TerrainField) {
    // Entity -> cell for every solid entity, so each mover can exclude
    // itself (and its task target) from the blockage check.
    let solid: Vec<(Entity, GridCell)> = world
        .query::<(&Solid, &Position)>()
        .iter()
        .map(|(entity, (_, pos))| (entity, pos.cell()))
        .collect();

    struct Update {
        entity: Entity,
        position: Position,
        heading: Heading,
        waypoints: Vec<GridCell>,
        outcome: StepOutcome,
    }

    let mut updates: Vec<Update> = Vec::with_capacity(64);
    let mut blocked: Vec<Entity> = Vec::new();

    for (entity, (pos, heading, path, creature)) in world
        .query::<(&Position, &Heading, &PathFollow, &Creature)>()
        .iter()
    {
        let target = world
            .get::<&Task>(entity)
            .ok()
            .and_then(|task| match task.goal {
                Goal::Object(bits) => Entity::from_bits(bits),
                Goal::Tile(_) => None,
            });

        let obstacles: Vec<GridCell> = solid
            .iter()
            .filter(|(other, _)| *other != entity && Some(*other) != target)
            .map(|(_, cell)| *cell)
            .collect();

        if !path_is_clear(&path.waypoints, &obstacles) {
            debug!("path blocked, dropping it for a replan");
            blocked.push(entity);
            continue;
        }

        let modifier = terrain.speed_modifier(pos.cell()).unwrap_or(1.0);
        let max_shift = creature.species.stats().speed * modifier;

        let mut position = *pos;
        let mut heading = *heading;
        let mut waypoints = path.waypoints.clone();
        let mut direction = heading.direction;
        let outcome = advance(&mut position.at, &mut direction, &mut waypoints, max_shift);
        heading.set(direction);

        updates.push(Update {
            entity,
            position,
            heading,
            waypoints,
            outcome,
        });
    }

    for entity in blocked {
        let _ = world.remove_one::<PathFollow>(entity);
    }

    for update in updates {
        if let Ok(mut pos) = world.get::<&mut Position>(update.entity) {
            *pos = update.position;
        }
        if let Ok(mut heading) = world.get::<&mut Heading>(update.entity) {
            *heading = update.heading;
        }

        match update.outcome {
            StepOutcome::Arrived | StepOutcome::Idle => {
                let _ = world.remove_one::<PathFollow>(update.entity);
                if update.outcome == StepOutcome::Arrived {
                    if let Ok(mut task) = world.get::<&mut Task>(update.entity) {
                        task.finished = true;
                    }
                }
            }
            StepOutcome::Advanced => {
                if let Ok(mut path) = world.get::<&mut PathFollow>(update.entity) {
                    path.waypoints = update.waypoints;
                }
            }
        }
    }
}
