//! Simulation engine - main entry point for running the simulation

use crate::components::*;
use crate::generation::{generate_terrain, spawn_creatures, spawn_nature, GenerationError, WorldConfig};
use crate::systems::*;
use frontier_logic::grid::GridCell;
use frontier_logic::pathfinding::{build_graph, terrain_costs, travel_time};
use frontier_logic::task::{Goal, Task, TaskKind};
use frontier_logic::terrain::TerrainField;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Generated terrain the world lives on
    pub terrain: TerrainField,
    /// Ticks elapsed since generation
    pub tick_count: u64,
    /// All randomness flows from this seeded generator
    rng: StdRng,
}

impl SimulationEngine {
    /// Generate a complete world: terrain, nature objects, and creatures.
    pub fn generate(config: WorldConfig) -> Result<Self, GenerationError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut world = World::new();

        let terrain = generate_terrain(&config, &mut rng)?;
        let _ = spawn_nature(&mut world, &terrain);
        let _ = spawn_creatures(&mut world, &terrain, &config, &mut rng)?;

        Ok(Self {
            world,
            terrain,
            tick_count: 0,
            rng,
        })
    }

    /// Advance the simulation by one tick.
    ///
    /// Order matters: tasks plan before movement consumes paths, animals
    /// decide after players act, cleanup runs last so nothing walks as a
    /// corpse for a tick.
    pub fn tick(&mut self) {
        task_system(&mut self.world, &self.terrain);
        movement_system(&mut self.world, &self.terrain);
        task_resolution_system(&mut self.world);
        animal_ai_system(&mut self.world, &self.terrain, &mut self.rng);
        cleanup_system(&mut self.world);
        self.tick_count += 1;
    }

    /// Order a settler to do work. Non-settlers refuse orders; a new order
    /// replaces any current task and abandons its walk.
    pub fn order(&mut self, settler: Entity, kind: TaskKind, goal: Goal) -> bool {
        if self.world.get::<&PlayerControlled>(settler).is_err() {
            return false;
        }
        let _ = self.world.remove_one::<PathFollow>(settler);
        self.world.insert_one(settler, Task::new(kind, goal)).is_ok()
    }

    /// Remaining waypoints of an entity's current walk, if any.
    pub fn current_path(&self, entity: Entity) -> Option<Vec<GridCell>> {
        self.world
            .get::<&PathFollow>(entity)
            .ok()
            .map(|path| path.waypoints.clone())
    }

    /// Estimated ticks for `entity` to finish its current walk.
    pub fn estimated_travel_time(&self, entity: Entity) -> Option<f32> {
        let pos = self.world.get::<&Position>(entity).ok()?;
        let path = self.world.get::<&PathFollow>(entity).ok()?;
        let creature = self.world.get::<&Creature>(entity).ok()?;
        let seconds = travel_time(pos.cell(), &path.waypoints, &self.terrain);
        Some(seconds / creature.species.stats().speed)
    }

    /// Preview a path from an arbitrary cell without dispatching anyone.
    pub fn preview_path(
        &self,
        start: GridCell,
        goal: GridCell,
    ) -> Result<Vec<GridCell>, frontier_logic::pathfinding::PathError> {
        let obstacles = obstacle_cells(&self.world, &[]);
        let graph = build_graph(&self.terrain, &obstacles);
        frontier_logic::pathfinding::find_path(&graph, start, goal)
    }

    /// Static terrain-cost layer for external consumers that cache it.
    pub fn terrain_cost_layer(&self) -> Vec<f32> {
        terrain_costs(&self.terrain)
    }

    /// Cells currently occupied by solid entities.
    pub fn obstacles(&self) -> Vec<GridCell> {
        obstacle_cells(&self.world, &[])
    }

    pub fn settlers(&self) -> Vec<Entity> {
        self.world
            .query::<(&Creature, &PlayerControlled)>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn settler_count(&self) -> usize {
        self.world
            .query::<(&Creature, &PlayerControlled)>()
            .iter()
            .count()
    }

    pub fn animal_count(&self) -> usize {
        self.world.query::<(&Creature, &Wild)>().iter().count()
    }

    pub fn nature_count(&self) -> usize {
        self.world.query::<&Nature>().iter().count()
    }

    /// Entities of any kind standing on a cell.
    pub fn entities_at(&self, cell: GridCell) -> Vec<Entity> {
        self.world
            .query::<&Position>()
            .iter()
            .filter(|(_, pos)| pos.cell() == cell)
            .map(|(entity, _)| entity)
            .collect()
    }
}
