//! Frontier Core - Colony Simulation Engine
//!
//! An ECS-based simulation of a frontier settlement: a tile grid of
//! generated terrain, nature objects, wild animals, and player-directed
//! settlers that walk the map to carry out tasks.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Settlers, animals, trees, bushes, cliffs, loot
//! - **Components**: Pure data attached to entities (Position, Health, Task, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Path search, movement math, and task lifecycle rules live in
//! `frontier-logic`; this crate wires them to the world.
//!
//! # Example
//!
//! ```rust,no_run
//! use frontier_core::prelude::*;
//! use frontier_core::generation::WorldConfig;
//!
//! let mut engine = SimulationEngine::generate(WorldConfig::default()).unwrap();
//!
//! // Run simulation
//! loop {
//!     engine.tick();
//! }
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::SimulationEngine;
    pub use frontier_logic::grid::{GridCell, Vec2};
    pub use frontier_logic::task::{Goal, Task, TaskKind, TaskState};
    pub use frontier_logic::terrain::{SurfaceKind, TerrainField};
}
