//! Per-tick movement along a path of waypoints.
//!
//! The step function is pure: it mutates the caller's position, direction,
//! and path in place and reports what happened, leaving scheduling and
//! entity bookkeeping to the engine layer.

use crate::grid::{direction_toward, GridCell, Vec2};

/// What a single movement step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No path to walk; position and direction untouched except that an
    /// empty path forces the direction to zero.
    Idle,
    /// Moved toward the next waypoint without reaching it.
    Advanced,
    /// Consumed the final waypoint this tick; the path is now empty.
    Arrived,
}

/// Advance `position` along `path` by at most `max_shift` tile units.
///
/// If the next waypoint is within reach the position snaps exactly onto it
/// and the waypoint is consumed; otherwise the position moves `max_shift`
/// along the 8-way direction toward it. At most one waypoint is consumed
/// per call, so a very large `max_shift` cannot skip corners.
pub fn advance(
    position: &mut Vec2,
    direction: &mut Vec2,
    path: &mut Vec<GridCell>,
    max_shift: f32,
) -> StepOutcome {
    let Some(&next) = path.first() else {
        *direction = Vec2::ZERO;
        return StepOutcome::Idle;
    };

    let target = next.position();
    let remaining = position.distance(&target);

    if remaining <= max_shift {
        *position = target;
        let _ = path.remove(0);
        if path.is_empty() {
            *direction = Vec2::ZERO;
            return StepOutcome::Arrived;
        }
        *direction = direction_toward(*position, path[0].position());
        return StepOutcome::Advanced;
    }

    *direction = direction_toward(*position, target);
    *position = *position + *direction * max_shift;
    StepOutcome::Advanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DIAGONAL_COMPONENT;

    #[test]
    fn test_empty_path_is_idle_and_idempotent() {
        let mut position = Vec2::new(2.0, 3.0);
        let mut direction = Vec2::new(1.0, 0.0);
        let mut path = Vec::new();

        assert_eq!(
            advance(&mut position, &mut direction, &mut path, 0.1),
            StepOutcome::Idle
        );
        assert_eq!(position, Vec2::new(2.0, 3.0));
        assert_eq!(direction, Vec2::ZERO);

        // Second call changes nothing further.
        assert_eq!(
            advance(&mut position, &mut direction, &mut path, 0.1),
            StepOutcome::Idle
        );
        assert_eq!(position, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_partial_step_moves_along_direction() {
        let mut position = Vec2::new(0.0, 0.0);
        let mut direction = Vec2::ZERO;
        let mut path = vec![GridCell::new(3, 0)];

        let outcome = advance(&mut position, &mut direction, &mut path, 0.25);
        assert_eq!(outcome, StepOutcome::Advanced);
        assert!((position.x - 0.25).abs() < 1e-6);
        assert_eq!(position.y, 0.0);
        assert_eq!(direction, Vec2::new(1.0, 0.0));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_diagonal_step_covers_max_shift_total() {
        let mut position = Vec2::new(0.0, 0.0);
        let mut direction = Vec2::ZERO;
        let mut path = vec![GridCell::new(2, 2)];

        let start = position;
        advance(&mut position, &mut direction, &mut path, 0.5);
        assert!((position.distance(&start) - 0.5).abs() < 1e-6);
        assert!((direction.x - DIAGONAL_COMPONENT).abs() < 1e-6);
        assert!((direction.y - DIAGONAL_COMPONENT).abs() < 1e-6);
    }

    #[test]
    fn test_snaps_onto_waypoint_within_reach() {
        let mut position = Vec2::new(0.9, 0.0);
        let mut direction = Vec2::new(1.0, 0.0);
        let mut path = vec![GridCell::new(1, 0), GridCell::new(2, 0)];

        let outcome = advance(&mut position, &mut direction, &mut path, 0.5);
        assert_eq!(outcome, StepOutcome::Advanced);
        // Exact snap, no drift past the waypoint.
        assert_eq!(position, Vec2::new(1.0, 0.0));
        assert_eq!(path, vec![GridCell::new(2, 0)]);
        assert_eq!(direction, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_direction_recomputed_after_corner() {
        // Waypoints turn 90 degrees at (1,0); after the snap the direction
        // must point at the new waypoint, not the old heading.
        let mut position = Vec2::new(0.95, 0.0);
        let mut direction = Vec2::new(1.0, 0.0);
        let mut path = vec![GridCell::new(1, 0), GridCell::new(1, 1)];

        advance(&mut position, &mut direction, &mut path, 0.2);
        assert_eq!(position, Vec2::new(1.0, 0.0));
        assert_eq!(direction, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_final_waypoint_arrival_clears_state() {
        let mut position = Vec2::new(4.7, 2.0);
        let mut direction = Vec2::new(1.0, 0.0);
        let mut path = vec![GridCell::new(5, 2)];

        let outcome = advance(&mut position, &mut direction, &mut path, 0.5);
        assert_eq!(outcome, StepOutcome::Arrived);
        assert_eq!(position, Vec2::new(5.0, 2.0));
        assert!(path.is_empty());
        assert_eq!(direction, Vec2::ZERO);
    }

    #[test]
    fn test_large_shift_consumes_at_most_one_waypoint() {
        let mut position = Vec2::new(0.0, 0.0);
        let mut direction = Vec2::ZERO;
        let mut path = vec![GridCell::new(1, 0), GridCell::new(2, 0), GridCell::new(3, 0)];

        advance(&mut position, &mut direction, &mut path, 10.0);
        assert_eq!(position, Vec2::new(1.0, 0.0));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_walk_full_path_to_completion() {
        let mut position = Vec2::new(0.0, 0.0);
        let mut direction = Vec2::ZERO;
        let mut path = vec![GridCell::new(1, 1), GridCell::new(2, 1)];

        let mut ticks = 0;
        loop {
            match advance(&mut position, &mut direction, &mut path, 0.3) {
                StepOutcome::Arrived => break,
                StepOutcome::Advanced => {}
                StepOutcome::Idle => panic!("went idle before arriving"),
            }
            ticks += 1;
            assert!(ticks < 100, "walk did not terminate");
        }

        assert_eq!(position, Vec2::new(2.0, 1.0));
        assert!(path.is_empty());
    }
}
