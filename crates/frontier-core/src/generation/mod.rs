//! Generation - procedural creation of terrain, nature, and creatures.

mod names;
mod worldgen;

pub use names::*;
pub use worldgen::*;
