//! Cleanup system - removes dead entities and drops their loot.

use crate::components::*;
use hecs::{Entity, World};
use log::info;

/// Despawn everything whose health reached zero. Nature objects with
/// remaining resources leave a loot stack on their cell.
pub fn cleanup_system(world: &mut World) {
    let mut dead: Vec<(Entity, Option<(Position, ResourceDeposit)>)> = Vec::new();

    for (entity, health) in world.query::<&Health>().iter() {
        if !health.is_dead() {
            continue;
        }
        let drop = match (
            world.get::<&Position>(entity),
            world.get::<&ResourceDeposit>(entity),
        ) {
            (Ok(pos), Ok(deposit)) if deposit.quantity > 0 => Some((*pos, *deposit)),
            _ => None,
        };
        dead.push((entity, drop));
    }

    for (entity, drop) in dead {
        let _ = world.despawn(entity);
        if let Some((pos, deposit)) = drop {
            let _ = world.spawn((
                Position::from_cell(pos.cell()),
                Loot {
                    kind: deposit.kind,
                    quantity: deposit.quantity,
                },
            ));
            info!(
                "dropped {} {:?} at {:?}",
                deposit.quantity,
                deposit.kind,
                pos.cell()
            );
        }
    }
}
