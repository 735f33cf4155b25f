//! Common components shared by creatures and map objects.

use frontier_logic::grid::{Facing, GridCell, Vec2};
use serde::{Deserialize, Serialize};

/// Continuous position on the tile grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub at: Vec2,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { at: Vec2::new(x, y) }
    }

    pub fn from_cell(cell: GridCell) -> Self {
        Self {
            at: cell.position(),
        }
    }

    /// Grid cell this position rounds to.
    pub fn cell(&self) -> GridCell {
        self.at.nearest_cell()
    }
}

/// Current movement direction and the sprite facing derived from it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Heading {
    pub direction: Vec2,
    pub facing: Facing,
}

impl Heading {
    /// Record a new direction and refresh the facing; idle agents fall
    /// back to the default sprite orientation.
    pub fn set(&mut self, direction: Vec2) {
        self.direction = direction;
        self.facing = Facing::from_direction(direction);
    }
}

/// Display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name {
    pub value: String,
}

impl Name {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Marker: this entity occupies its cell and blocks paths through it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Solid;

/// Remaining waypoints of an active walk. Removed on arrival.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathFollow {
    pub waypoints: Vec<GridCell>,
}

impl PathFollow {
    pub fn new(waypoints: Vec<GridCell>) -> Self {
        Self { waypoints }
    }
}
