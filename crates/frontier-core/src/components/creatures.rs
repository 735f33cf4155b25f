//! Creature components: species stats, health, combat data, control markers.

use serde::{Deserialize, Serialize};

/// Per-species base statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesStats {
    /// Base walking speed in tiles per tick, before terrain modifiers.
    pub speed: f32,
    pub max_health: f32,
    pub damage: f32,
    /// Ticks between melee swings.
    pub melee_cooldown: f32,
    /// Relative eagerness of a wild animal to wander; zero for settlers,
    /// whose movement is entirely player-directed.
    pub activity_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Settler,
    Deer,
    Wolf,
    Turtle,
}

impl Species {
    pub fn stats(self) -> SpeciesStats {
        match self {
            Species::Settler => SpeciesStats {
                speed: 0.1,
                max_health: 20.0,
                damage: 2.0,
                melee_cooldown: 60.0,
                activity_rate: 0.0,
            },
            Species::Deer => SpeciesStats {
                speed: 0.05,
                max_health: 30.0,
                damage: 0.5,
                melee_cooldown: 120.0,
                activity_rate: 0.2,
            },
            Species::Wolf => SpeciesStats {
                speed: 0.12,
                max_health: 16.0,
                damage: 3.0,
                melee_cooldown: 60.0,
                activity_rate: 0.5,
            },
            Species::Turtle => SpeciesStats {
                speed: 0.03,
                max_health: 10.0,
                damage: 0.5,
                melee_cooldown: 80.0,
                activity_rate: 0.1,
            },
        }
    }
}

/// Marker-with-species for anything that walks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Creature {
    pub species: Species,
}

/// Hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Melee parameters. Pure data; the Attack task applies it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage: f32,
    pub melee_cooldown: f32,
}

/// Marker: accepts player orders.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerControlled;

/// Wild-animal AI state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wild {
    pub activity_rate: f32,
}
