//! Tile surfaces and the validated terrain field.
//!
//! Every in-bounds cell carries exactly one tile. Speed modifiers are
//! checked at construction time so the pathfinder and movement step can
//! divide by them without guarding.

use crate::grid::GridCell;
use serde::{Deserialize, Serialize};

/// Landscape category of a tile surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Soil,
    RockySoil,
    Rock,
    Sand,
}

impl SurfaceKind {
    /// Speed multiplier applied to an agent standing on this surface.
    pub fn speed_modifier(self) -> f32 {
        match self {
            SurfaceKind::Soil => 0.9,
            SurfaceKind::RockySoil => 0.8,
            SurfaceKind::Rock => 0.7,
            SurfaceKind::Sand => 0.5,
        }
    }
}

/// Marker for a map object that worldgen prescribed for this tile.
/// Irrelevant to pathfinding; the spawner turns it into a solid entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingSpawn {
    Tree,
    Bush,
    Cliff,
}

/// One terrain tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub surface: SurfaceKind,
    /// Strictly positive, at most 1.0. Lower is slower.
    pub speed_modifier: f32,
    pub pending_spawn: Option<PendingSpawn>,
}

impl Tile {
    /// Tile with the surface's standard speed modifier and nothing to spawn.
    pub fn new(surface: SurfaceKind) -> Self {
        Self {
            surface,
            speed_modifier: surface.speed_modifier(),
            pending_spawn: None,
        }
    }

    pub fn with_spawn(mut self, spawn: PendingSpawn) -> Self {
        self.pending_spawn = Some(spawn);
        self
    }
}

/// Data-integrity faults rejected when building a terrain field.
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// A tile's speed modifier is zero, negative, or above 1.0.
    DegenerateSpeed { cell: GridCell, value: f32 },
    /// The tile buffer does not match width × height.
    SizeMismatch { expected: usize, found: usize },
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainError::DegenerateSpeed { cell, value } => write!(
                f,
                "tile ({}, {}) has degenerate speed modifier {}",
                cell.column, cell.row, value
            ),
            TerrainError::SizeMismatch { expected, found } => {
                write!(f, "expected {} tiles, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for TerrainError {}

/// Dense row-major grid of tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainField {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TerrainField {
    /// Build a field from row-major tiles, rejecting degenerate modifiers.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Result<Self, TerrainError> {
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(TerrainError::SizeMismatch {
                expected,
                found: tiles.len(),
            });
        }

        for (index, tile) in tiles.iter().enumerate() {
            if tile.speed_modifier <= 0.0 || tile.speed_modifier > 1.0 {
                let cell = GridCell::new(
                    (index % width as usize) as i32,
                    (index / width as usize) as i32,
                );
                return Err(TerrainError::DegenerateSpeed {
                    cell,
                    value: tile.speed_modifier,
                });
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Uniform field of a single surface, useful for tests and scenarios.
    pub fn filled(width: u32, height: u32, surface: SurfaceKind) -> Self {
        let tiles = vec![Tile::new(surface); width as usize * height as usize];
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, cell: GridCell) -> bool {
        cell.column >= 0
            && cell.row >= 0
            && (cell.column as u32) < self.width
            && (cell.row as u32) < self.height
    }

    pub fn tile(&self, cell: GridCell) -> Option<&Tile> {
        self.index(cell).map(|i| &self.tiles[i])
    }

    /// Speed multiplier of the tile under `cell`, if in bounds.
    pub fn speed_modifier(&self, cell: GridCell) -> Option<f32> {
        self.tile(cell).map(|t| t.speed_modifier)
    }

    /// Iterate all cells with their tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCell, &Tile)> {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            (
                GridCell::new((index % width) as i32, (index / width) as i32),
                tile,
            )
        })
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if self.in_bounds(cell) {
            Some(cell.row as usize * self.width as usize + cell.column as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_speed_table() {
        assert_eq!(SurfaceKind::Soil.speed_modifier(), 0.9);
        assert_eq!(SurfaceKind::RockySoil.speed_modifier(), 0.8);
        assert_eq!(SurfaceKind::Rock.speed_modifier(), 0.7);
        assert_eq!(SurfaceKind::Sand.speed_modifier(), 0.5);
    }

    #[test]
    fn test_bounds_checks() {
        let field = TerrainField::filled(4, 3, SurfaceKind::Soil);
        assert!(field.in_bounds(GridCell::new(0, 0)));
        assert!(field.in_bounds(GridCell::new(3, 2)));
        assert!(!field.in_bounds(GridCell::new(4, 2)));
        assert!(!field.in_bounds(GridCell::new(-1, 0)));
        assert_eq!(field.speed_modifier(GridCell::new(-1, 0)), None);
    }

    #[test]
    fn test_degenerate_speed_rejected() {
        let mut tiles = vec![Tile::new(SurfaceKind::Soil); 6];
        tiles[4].speed_modifier = 0.0;

        let err = TerrainField::from_tiles(3, 2, tiles).unwrap_err();
        assert_eq!(
            err,
            TerrainError::DegenerateSpeed {
                cell: GridCell::new(1, 1),
                value: 0.0,
            }
        );
    }

    #[test]
    fn test_speed_above_one_rejected() {
        let mut tiles = vec![Tile::new(SurfaceKind::Sand); 4];
        tiles[0].speed_modifier = 1.5;
        assert!(TerrainField::from_tiles(2, 2, tiles).is_err());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let tiles = vec![Tile::new(SurfaceKind::Rock); 5];
        let err = TerrainField::from_tiles(3, 2, tiles).unwrap_err();
        assert_eq!(
            err,
            TerrainError::SizeMismatch {
                expected: 6,
                found: 5,
            }
        );
    }

    #[test]
    fn test_iter_visits_every_cell_once() {
        let field = TerrainField::filled(3, 2, SurfaceKind::Sand);
        let cells: Vec<GridCell> = field.iter().map(|(c, _)| c).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], GridCell::new(0, 0));
        assert_eq!(cells[5], GridCell::new(2, 1));
    }

    #[test]
    fn test_pending_spawn_is_carried() {
        let tile = Tile::new(SurfaceKind::Soil).with_spawn(PendingSpawn::Tree);
        assert_eq!(tile.pending_spawn, Some(PendingSpawn::Tree));
        assert_eq!(tile.speed_modifier, 0.9);
    }
}
