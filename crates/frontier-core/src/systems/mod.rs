//! Systems - logic that operates on components

mod ai;
mod cleanup;
mod movement;
mod tasks;

pub use ai::*;
pub use cleanup::*;
pub use movement::*;
pub use tasks::*;
