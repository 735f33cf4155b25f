//! Grid cells, sub-tile vectors, movement directions, and sprite facings.

use serde::{Deserialize, Serialize};

/// Component magnitude of a diagonal unit vector (1/√2).
pub const DIAGONAL_COMPONENT: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Discrete (column, row) address of one terrain tile.
///
/// Signed so that out-of-bounds goals like (-1, 3) are representable and can
/// be rejected explicitly instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub column: i32,
    pub row: i32,
}

impl GridCell {
    pub fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Continuous position of this cell in tile units.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.column as f32, self.row as f32)
    }
}

/// 2D position/direction vector in tile units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Grid cell nearest to this position (sub-tile coordinates round to the
    /// closest tile center).
    pub fn nearest_cell(&self) -> GridCell {
        GridCell::new((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// 8-way unit direction from `from` toward `to`, derived from the *sign* of
/// the coordinate delta only. Both axes differing yields a diagonal with
/// ±1/√2 components; equal positions yield the zero vector.
pub fn direction_toward(from: Vec2, to: Vec2) -> Vec2 {
    let dx = if to.x < from.x {
        -1.0
    } else if to.x > from.x {
        1.0
    } else {
        0.0
    };
    let dy = if to.y < from.y {
        -1.0
    } else if to.y > from.y {
        1.0
    } else {
        0.0
    };

    if dx != 0.0 && dy != 0.0 {
        Vec2::new(dx * DIAGONAL_COMPONENT, dy * DIAGONAL_COMPONENT)
    } else {
        Vec2::new(dx, dy)
    }
}

/// Sprite orientation derived from a movement direction.
///
/// The 8 movement directions collapse to 4 cardinal facings plus a default;
/// horizontal movement wins over vertical on diagonals. Movement keeps full
/// 8-way precision — only the visual orientation is coarser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    North,
    South,
    East,
    West,
    #[default]
    Default,
}

impl Facing {
    pub fn from_direction(direction: Vec2) -> Self {
        if direction.x < 0.0 {
            Facing::West
        } else if direction.x > 0.0 {
            Facing::East
        } else if direction.y < 0.0 {
            Facing::North
        } else if direction.y > 0.0 {
            Facing::South
        } else {
            Facing::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 8.0);

        let diff = b - a;
        assert_eq!(diff.x, 3.0);
        assert_eq!(diff.y, 4.0);

        let scaled = a * 2.0;
        assert_eq!(scaled.x, 2.0);

        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_cell_rounds_to_closest_center() {
        assert_eq!(Vec2::new(3.4, 2.6).nearest_cell(), GridCell::new(3, 3));
        assert_eq!(Vec2::new(3.6, 2.4).nearest_cell(), GridCell::new(4, 2));
        assert_eq!(Vec2::new(0.0, 0.0).nearest_cell(), GridCell::new(0, 0));
    }

    #[test]
    fn test_direction_cardinals() {
        let origin = Vec2::new(3.0, 3.0);
        assert_eq!(
            direction_toward(origin, Vec2::new(5.0, 3.0)),
            Vec2::new(1.0, 0.0)
        );
        assert_eq!(
            direction_toward(origin, Vec2::new(1.0, 3.0)),
            Vec2::new(-1.0, 0.0)
        );
        assert_eq!(
            direction_toward(origin, Vec2::new(3.0, 9.0)),
            Vec2::new(0.0, 1.0)
        );
        assert_eq!(
            direction_toward(origin, Vec2::new(3.0, 0.0)),
            Vec2::new(0.0, -1.0)
        );
        assert_eq!(direction_toward(origin, origin), Vec2::ZERO);
    }

    #[test]
    fn test_direction_diagonals_are_unit_length() {
        let origin = Vec2::new(0.0, 0.0);
        let dir = direction_toward(origin, Vec2::new(7.0, -2.0));
        assert_eq!(dir, Vec2::new(DIAGONAL_COMPONENT, -DIAGONAL_COMPONENT));
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_uses_sign_not_magnitude() {
        let near = direction_toward(Vec2::ZERO, Vec2::new(0.1, 0.1));
        let far = direction_toward(Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(near, far);
    }

    #[test]
    fn test_facing_horizontal_wins_on_diagonal() {
        let dir = direction_toward(Vec2::ZERO, Vec2::new(1.0, 1.0));
        assert_eq!(Facing::from_direction(dir), Facing::East);

        let dir = direction_toward(Vec2::ZERO, Vec2::new(-1.0, 1.0));
        assert_eq!(Facing::from_direction(dir), Facing::West);
    }

    #[test]
    fn test_facing_idle_is_default() {
        assert_eq!(Facing::from_direction(Vec2::ZERO), Facing::Default);
    }

    #[test]
    fn test_cell_round_trips_through_bincode() {
        let cell = GridCell::new(-1, 3);
        let bytes = bincode::serialize(&cell).unwrap();
        let restored: GridCell = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, cell);
    }
}
