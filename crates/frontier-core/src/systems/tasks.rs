//! Task system - plans paths for ordered work and resolves finished tasks.

use crate::components::*;
use frontier_logic::grid::GridCell;
use frontier_logic::pathfinding::{build_graph, find_path, PathError};
use frontier_logic::task::{Goal, Task, TaskState};
use frontier_logic::terrain::TerrainField;
use hecs::{Entity, World};
use log::{debug, warn};

/// Cells occupied by solid entities, excluding the listed entities.
///
/// The agent always excludes itself; object-directed tasks also exclude the
/// target so the path may end on its cell.
pub fn obstacle_cells(world: &World, exclude: &[Entity]) -> Vec<GridCell> {
    world
        .query::<(&Solid, &Position)>()
        .iter()
        .filter(|(entity, _)| !exclude.contains(entity))
        .map(|(_, (_, pos))| pos.cell())
        .collect()
}

enum Plan {
    /// A path was found; start walking it.
    Walk(Vec<GridCell>),
    /// Already standing on the goal cell.
    ArriveNow,
    /// No usable path this tick; stay dispatched and try again next tick.
    Retry,
    /// The task cannot ever complete; drop it.
    Cancel,
}

/// Plan paths for every task that is not already walking or done.
pub fn task_system(world: &mut World, terrain: &TerrainField) {
    let mut plans: Vec<(Entity, Plan)> = Vec::new();

    for (entity, (task, pos)) in world.query::<(&Task, &Position)>().iter() {
        if task.state() == TaskState::Done {
            continue;
        }
        // Walking already; the movement system drives progress.
        if world.get::<&PathFollow>(entity).is_ok() {
            continue;
        }

        let plan = plan_task(world, terrain, entity, task, pos);
        plans.push((entity, plan));
    }

    for (entity, plan) in plans {
        match plan {
            Plan::Walk(waypoints) => {
                if let Ok(mut task) = world.get::<&mut Task>(entity) {
                    task.started = true;
                }
                let _ = world.insert_one(entity, PathFollow::new(waypoints));
            }
            Plan::ArriveNow => {
                if let Ok(mut task) = world.get::<&mut Task>(entity) {
                    task.started = true;
                    task.finished = true;
                }
            }
            Plan::Retry => {
                if let Ok(mut task) = world.get::<&mut Task>(entity) {
                    task.started = true;
                }
            }
            Plan::Cancel => {
                let _ = world.remove_one::<Task>(entity);
            }
        }
    }
}

fn plan_task(
    world: &World,
    terrain: &TerrainField,
    entity: Entity,
    task: &Task,
    pos: &Position,
) -> Plan {
    let (goal_cell, target) = match task.goal {
        Goal::Tile(cell) => (cell, None),
        Goal::Object(bits) => {
            let Some(target) = Entity::from_bits(bits) else {
                warn!("task {:?} targets a malformed entity id", task.kind);
                return Plan::Cancel;
            };
            match world.get::<&Position>(target) {
                Ok(target_pos) => (target_pos.cell(), Some(target)),
                Err(_) => {
                    debug!("task {:?} target is gone, cancelling", task.kind);
                    return Plan::Cancel;
                }
            }
        }
    };

    if goal_cell == pos.cell() {
        return Plan::ArriveNow;
    }

    let mut exclude = vec![entity];
    if let Some(target) = target {
        exclude.push(target);
    }
    let obstacles = obstacle_cells(world, &exclude);
    let graph = build_graph(terrain, &obstacles);

    match find_path(&graph, pos.cell(), goal_cell) {
        Ok(path) => Plan::Walk(path),
        Err(PathError::NoPathFound) => {
            debug!("no path for {:?} toward {:?}, will retry", task.kind, goal_cell);
            Plan::Retry
        }
        Err(err @ PathError::GoalOutOfBounds { .. }) => {
            warn!("dropping {:?}: {}", task.kind, err);
            Plan::Cancel
        }
    }
}

enum Resolution {
    Strike { target: Entity, damage: f32 },
    Harvest { agent: Entity, target: Entity },
    PickUp { agent: Entity, target: Entity },
    Build { cell: GridCell },
    Nothing,
}

/// Resolve every finished task: apply its effect and remove it.
pub fn task_resolution_system(world: &mut World) {
    let mut resolutions: Vec<(Entity, Resolution)> = Vec::new();

    for (entity, task) in world.query::<&Task>().iter() {
        if task.state() != TaskState::Done {
            continue;
        }
        resolutions.push((entity, resolve(world, entity, task)));
    }

    for (entity, resolution) in resolutions {
        match resolution {
            Resolution::Strike { target, damage } => {
                if let Ok(mut health) = world.get::<&mut Health>(target) {
                    health.current -= damage;
                }
            }
            Resolution::Harvest { agent, target } => {
                let taken = match world.get::<&mut ResourceDeposit>(target) {
                    Ok(mut deposit) => {
                        let taken = (deposit.kind, deposit.quantity);
                        deposit.quantity = 0;
                        Some(taken)
                    }
                    Err(_) => None,
                };
                if let Some((kind, quantity)) = taken {
                    if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
                        inventory.add(kind, quantity);
                    }
                }
            }
            Resolution::PickUp { agent, target } => {
                let loot = world.get::<&Loot>(target).map(|l| *l).ok();
                if let Some(loot) = loot {
                    if let Ok(mut inventory) = world.get::<&mut Inventory>(agent) {
                        inventory.add(loot.kind, loot.quantity);
                    }
                    let _ = world.despawn(target);
                }
            }
            Resolution::Build { cell } => {
                let _ = world.spawn((
                    Position::from_cell(cell),
                    Construction,
                    Solid,
                    Health::new(10.0),
                ));
            }
            Resolution::Nothing => {}
        }
        let _ = world.remove_one::<Task>(entity);
    }
}

fn resolve(world: &World, agent: Entity, task: &Task) -> Resolution {
    use frontier_logic::task::TaskKind::*;

    let target = match task.goal {
        Goal::Object(bits) => Entity::from_bits(bits),
        Goal::Tile(_) => None,
    };

    match (task.kind, target) {
        (Chop | Dig | Attack, Some(target)) if world.contains(target) => {
            let damage = world
                .get::<&CombatStats>(agent)
                .map(|c| c.damage)
                .unwrap_or(1.0);
            Resolution::Strike { target, damage }
        }
        (HarvestBerries, Some(target)) if world.contains(target) => {
            Resolution::Harvest { agent, target }
        }
        (PickUpLoot, Some(target)) if world.contains(target) => {
            Resolution::PickUp { agent, target }
        }
        (Construct, _) => match task.goal {
            Goal::Tile(cell) => Resolution::Build { cell },
            Goal::Object(_) => Resolution::Nothing,
        },
        _ => Resolution::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_logic::task::TaskKind;
    use frontier_logic::terrain::SurfaceKind;

    fn soil(width: u32, height: u32) -> TerrainField {
        TerrainField::filled(width, height, SurfaceKind::Soil)
    }

    fn spawn_settler(world: &mut World, cell: GridCell) -> Entity {
        let stats = Species::Settler.stats();
        world.spawn((
            Creature {
                species: Species::Settler,
            },
            Position::from_cell(cell),
            Heading::default(),
            Health::new(stats.max_health),
            CombatStats {
                damage: stats.damage,
                melee_cooldown: stats.melee_cooldown,
            },
            Inventory::default(),
            Solid,
        ))
    }

    #[test]
    fn test_tile_task_gets_a_path() {
        let terrain = soil(8, 8);
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let _ = world.insert_one(
            settler,
            Task::new(TaskKind::MoveTo, Goal::Tile(GridCell::new(5, 5))),
        );

        task_system(&mut world, &terrain);

        let task = *world.get::<&Task>(settler).unwrap();
        assert_eq!(task.state(), TaskState::Active);
        let path = world.get::<&PathFollow>(settler).unwrap();
        assert_eq!(*path.waypoints.last().unwrap(), GridCell::new(5, 5));
    }

    #[test]
    fn test_goal_on_own_cell_finishes_immediately() {
        let terrain = soil(4, 4);
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(2, 2));
        let _ = world.insert_one(
            settler,
            Task::new(TaskKind::MoveTo, Goal::Tile(GridCell::new(2, 2))),
        );

        task_system(&mut world, &terrain);

        let task = *world.get::<&Task>(settler).unwrap();
        assert_eq!(task.state(), TaskState::Done);
        assert!(world.get::<&PathFollow>(settler).is_err());
    }

    #[test]
    fn test_out_of_bounds_goal_is_dropped() {
        let terrain = soil(4, 4);
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let _ = world.insert_one(
            settler,
            Task::new(TaskKind::MoveTo, Goal::Tile(GridCell::new(-1, 3))),
        );

        task_system(&mut world, &terrain);
        assert!(world.get::<&Task>(settler).is_err());
    }

    #[test]
    fn test_object_task_paths_to_target_cell() {
        let terrain = soil(8, 8);
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let tree = world.spawn((
            Position::from_cell(GridCell::new(4, 0)),
            Nature {
                kind: NatureKind::Tree,
            },
            NatureKind::Tree.deposit(),
            Health::new(10.0),
            Solid,
        ));
        let _ = world.insert_one(
            settler,
            Task::new(TaskKind::Chop, Goal::Object(tree.to_bits().get())),
        );

        task_system(&mut world, &terrain);

        // The target itself must not block the path to its own cell.
        let path = world.get::<&PathFollow>(settler).unwrap();
        assert_eq!(*path.waypoints.last().unwrap(), GridCell::new(4, 0));
    }

    #[test]
    fn test_vanished_target_cancels_task() {
        let terrain = soil(4, 4);
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let prey = world.spawn((Position::from_cell(GridCell::new(3, 3)),));
        let _ = world.insert_one(
            settler,
            Task::new(TaskKind::Attack, Goal::Object(prey.to_bits().get())),
        );
        let _ = world.despawn(prey);

        task_system(&mut world, &terrain);
        assert!(world.get::<&Task>(settler).is_err());
    }

    #[test]
    fn test_finished_chop_strikes_the_tree() {
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let tree = world.spawn((
            Position::from_cell(GridCell::new(0, 1)),
            Nature {
                kind: NatureKind::Tree,
            },
            NatureKind::Tree.deposit(),
            Health::new(10.0),
            Solid,
        ));
        let mut task = Task::new(TaskKind::Chop, Goal::Object(tree.to_bits().get()));
        task.started = true;
        task.finished = true;
        let _ = world.insert_one(settler, task);

        task_resolution_system(&mut world);

        // Settler damage is 2.0.
        let health = world.get::<&Health>(tree).unwrap();
        assert_eq!(health.current, 8.0);
        assert!(world.get::<&Task>(settler).is_err(), "task removed");
    }

    #[test]
    fn test_finished_harvest_fills_inventory() {
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let bush = world.spawn((
            Position::from_cell(GridCell::new(1, 0)),
            Nature {
                kind: NatureKind::Bush,
            },
            NatureKind::Bush.deposit(),
            Health::new(10.0),
        ));
        let mut task = Task::new(TaskKind::HarvestBerries, Goal::Object(bush.to_bits().get()));
        task.started = true;
        task.finished = true;
        let _ = world.insert_one(settler, task);

        task_resolution_system(&mut world);

        assert_eq!(world.get::<&Inventory>(settler).unwrap().berries, 5);
        assert_eq!(world.get::<&ResourceDeposit>(bush).unwrap().quantity, 0);
    }

    #[test]
    fn test_finished_pickup_consumes_loot() {
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let loot = world.spawn((
            Position::from_cell(GridCell::new(1, 1)),
            Loot {
                kind: ResourceKind::Wood,
                quantity: 10,
            },
        ));
        let mut task = Task::new(TaskKind::PickUpLoot, Goal::Object(loot.to_bits().get()));
        task.started = true;
        task.finished = true;
        let _ = world.insert_one(settler, task);

        task_resolution_system(&mut world);

        assert_eq!(world.get::<&Inventory>(settler).unwrap().wood, 10);
        assert!(!world.contains(loot));
    }

    #[test]
    fn test_finished_construct_places_solid_structure() {
        let mut world = World::new();
        let settler = spawn_settler(&mut world, GridCell::new(0, 0));
        let mut task = Task::new(TaskKind::Construct, Goal::Tile(GridCell::new(2, 3)));
        task.started = true;
        task.finished = true;
        let _ = world.insert_one(settler, task);

        task_resolution_system(&mut world);

        let built = world
            .query::<(&Construction, &Position, &Solid)>()
            .iter()
            .map(|(_, (_, pos, _))| pos.cell())
            .collect::<Vec<_>>();
        assert_eq!(built, vec![GridCell::new(2, 3)]);
    }

    #[test]
    fn test_obstacle_cells_respects_exclusions() {
        let mut world = World::new();
        let a = world.spawn((Position::from_cell(GridCell::new(1, 1)), Solid));
        let _b = world.spawn((Position::from_cell(GridCell::new(2, 2)), Solid));
        let _passable = world.spawn((Position::from_cell(GridCell::new(3, 3)),));

        let all = obstacle_cells(&world, &[]);
        assert_eq!(all.len(), 2);

        let without_a = obstacle_cells(&world, &[a]);
        assert_eq!(without_a, vec![GridCell::new(2, 2)]);
    }
}
