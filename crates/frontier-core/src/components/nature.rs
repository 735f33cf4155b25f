//! Nature objects, constructions, and loot.

use serde::{Deserialize, Serialize};

/// Harvestable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Wood,
    Berries,
    Stone,
}

/// What a nature object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NatureKind {
    Tree,
    Bush,
    Cliff,
}

impl NatureKind {
    /// Resource held by a freshly spawned object of this kind.
    pub fn deposit(self) -> ResourceDeposit {
        match self {
            NatureKind::Tree => ResourceDeposit {
                kind: ResourceKind::Wood,
                quantity: 10,
            },
            NatureKind::Bush => ResourceDeposit {
                kind: ResourceKind::Berries,
                quantity: 5,
            },
            NatureKind::Cliff => ResourceDeposit {
                kind: ResourceKind::Stone,
                quantity: 30,
            },
        }
    }

    /// Bushes can be walked through; trees and cliffs cannot.
    pub fn is_solid(self) -> bool {
        !matches!(self, NatureKind::Bush)
    }
}

/// A tree, bush, or cliff on the map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Nature {
    pub kind: NatureKind,
}

/// Remaining resource in a nature object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeposit {
    pub kind: ResourceKind,
    pub quantity: u32,
}

/// A dropped stack of resources that a settler can pick up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Loot {
    pub kind: ResourceKind,
    pub quantity: u32,
}

/// A player-built structure occupying one tile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Construction;

/// Resources a settler is carrying.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub wood: u32,
    pub berries: u32,
    pub stone: u32,
}

impl Inventory {
    pub fn add(&mut self, kind: ResourceKind, quantity: u32) {
        match kind {
            ResourceKind::Wood => self.wood += quantity,
            ResourceKind::Berries => self.berries += quantity,
            ResourceKind::Stone => self.stone += quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_table() {
        assert_eq!(
            NatureKind::Cliff.deposit(),
            ResourceDeposit {
                kind: ResourceKind::Stone,
                quantity: 30,
            }
        );
        assert_eq!(NatureKind::Tree.deposit().kind, ResourceKind::Wood);
        assert_eq!(NatureKind::Bush.deposit().kind, ResourceKind::Berries);
    }

    #[test]
    fn test_only_bushes_are_passable() {
        assert!(NatureKind::Tree.is_solid());
        assert!(NatureKind::Cliff.is_solid());
        assert!(!NatureKind::Bush.is_solid());
    }

    #[test]
    fn test_inventory_accumulates() {
        let mut inventory = Inventory::default();
        inventory.add(ResourceKind::Wood, 10);
        inventory.add(ResourceKind::Wood, 3);
        inventory.add(ResourceKind::Stone, 30);
        assert_eq!(inventory.wood, 13);
        assert_eq!(inventory.stone, 30);
        assert_eq!(inventory.berries, 0);
    }
}
