//! Agent task kinds, goals, and lifecycle state.
//!
//! A task is plain data. The engine's task system reads it, plans a path,
//! and flips the lifecycle flags; nothing here touches the world.

use crate::grid::GridCell;
use serde::{Deserialize, Serialize};

/// What a task is aimed at.
///
/// Object targets are opaque entity ids so this crate stays independent of
/// any particular ECS; the engine resolves them to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Tile(GridCell),
    Object(u64),
}

/// The kinds of work an agent can be ordered to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Chop,
    HarvestBerries,
    Attack,
    Construct,
    MoveTo,
    PickUpLoot,
    Dig,
}

impl TaskKind {
    /// Object-directed kinds target an entity; the rest target a tile.
    pub fn is_object_directed(self) -> bool {
        match self {
            TaskKind::Chop
            | TaskKind::HarvestBerries
            | TaskKind::Attack
            | TaskKind::PickUpLoot
            | TaskKind::Dig => true,
            TaskKind::Construct | TaskKind::MoveTo => false,
        }
    }
}

/// Lifecycle of a task, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not yet dispatched; no path has been planned.
    Pending,
    /// Dispatched; the agent is walking (or retrying an obstructed path).
    Active,
    /// The agent reached the goal; the task can be resolved and removed.
    Done,
}

/// One unit of ordered work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub goal: Goal,
    pub started: bool,
    pub finished: bool,
}

impl Task {
    pub fn new(kind: TaskKind, goal: Goal) -> Self {
        Self {
            kind,
            goal,
            started: false,
            finished: false,
        }
    }

    pub fn state(&self) -> TaskState {
        match (self.started, self.finished) {
            (false, _) => TaskState::Pending,
            (true, false) => TaskState::Active,
            (true, true) => TaskState::Done,
        }
    }
}
