//! Pure simulation logic for Frontier.
//!
//! This crate contains all colony-simulation logic that is independent of
//! any engine, ECS, or renderer. Functions take plain data and return
//! results, making them unit-testable and portable between the headless
//! harness and any future frontend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`grid`] | Grid cells, sub-tile vectors, 8-way directions, sprite facings |
//! | [`terrain`] | Tile surfaces, speed modifiers, validated terrain field |
//! | [`pathfinding`] | Traversal graph, Dijkstra search, path validation |
//! | [`movement`] | Per-tick movement step along a path of waypoints |
//! | [`task`] | Agent task kinds, goals, and lifecycle |

pub mod grid;
pub mod movement;
pub mod pathfinding;
pub mod task;
pub mod terrain;
