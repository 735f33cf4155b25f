//! Frontier Headless Simulation Harness
//!
//! Validates pure simulation logic and a full engine run without rendering.
//! Runs entirely in-process — no window, no assets, no networking.
//!
//! Usage:
//!   cargo run -p frontier-simtest
//!   cargo run -p frontier-simtest -- --verbose
//!   cargo run -p frontier-simtest -- --json

use frontier_core::generation::WorldConfig;
use frontier_core::prelude::*;
use frontier_logic::grid::{direction_toward, Facing, Vec2};
use frontier_logic::movement::{advance, StepOutcome};
use frontier_logic::pathfinding::{build_graph, find_path, path_is_clear, travel_time, PathError};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    if !json {
        println!("=== Frontier Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Path search on synthetic terrain
    results.extend(validate_pathfinding(verbose, json));

    // 2. Movement step math
    results.extend(validate_movement(verbose, json));

    // 3. Direction and facing discretization
    results.extend(validate_directions(verbose, json));

    // 4. World generation
    results.extend(validate_worldgen(verbose, json));

    // 5. Full engine run
    results.extend(validate_engine_run(verbose, json));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if json {
        let report: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "passed": r.passed,
                    "detail": r.detail,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "passed": passed,
                "failed": failed,
                "total": total,
                "results": report,
            })
        );
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Pathfinding ---");
    }
    let mut results = Vec::new();

    // Uniform grid: straight diagonal from corner to corner
    let uniform = TerrainField::filled(10, 10, SurfaceKind::Soil);
    let graph = build_graph(&uniform, &[]);
    let diagonal = find_path(&graph, GridCell::new(0, 0), GridCell::new(9, 9));
    results.push(TestResult {
        name: "path_diagonal_line".into(),
        passed: matches!(&diagonal, Ok(p) if p.len() == 9),
        detail: format!(
            "corner to corner on 10x10 = {:?} waypoints",
            diagonal.as_ref().map(|p| p.len())
        ),
    });

    // Path excludes start, includes goal
    let straight = find_path(&graph, GridCell::new(0, 5), GridCell::new(4, 5));
    let shape_ok = matches!(
        &straight,
        Ok(p) if !p.contains(&GridCell::new(0, 5)) && p.last() == Some(&GridCell::new(4, 5))
    );
    results.push(TestResult {
        name: "path_shape_contract".into(),
        passed: shape_ok,
        detail: "start excluded, goal included".into(),
    });

    // Obstacle forces a detour around (5,5)
    let blocked = GridCell::new(5, 5);
    let obstacle_graph = build_graph(&uniform, &[blocked]);
    let detour = find_path(&obstacle_graph, GridCell::new(0, 0), GridCell::new(9, 9));
    results.push(TestResult {
        name: "path_detours_obstacle".into(),
        passed: matches!(&detour, Ok(p) if !p.contains(&blocked) && path_is_clear(p, &[blocked])),
        detail: "path avoids the blocked cell".into(),
    });

    // Out-of-bounds goal is rejected, not panicked
    let oob = find_path(&graph, GridCell::new(0, 0), GridCell::new(-1, 3));
    results.push(TestResult {
        name: "path_rejects_oob_goal".into(),
        passed: matches!(
            oob,
            Err(PathError::GoalOutOfBounds {
                cell: GridCell { column: -1, row: 3 }
            })
        ),
        detail: format!("goal (-1,3) → {:?}", oob.err()),
    });

    // Same cell yields empty path
    let same = find_path(&graph, GridCell::new(3, 3), GridCell::new(3, 3));
    results.push(TestResult {
        name: "path_same_cell_empty".into(),
        passed: matches!(&same, Ok(p) if p.is_empty()),
        detail: "start == goal → empty path".into(),
    });

    // Slow terrain is worth walking around
    let mut tiles = Vec::new();
    for row in 0..3u32 {
        for _ in 0..9u32 {
            let surface = if row == 0 {
                SurfaceKind::Sand
            } else {
                SurfaceKind::Soil
            };
            tiles.push(frontier_logic::terrain::Tile::new(surface));
        }
    }
    let banded = TerrainField::from_tiles(9, 3, tiles).expect("valid tiles");
    let banded_graph = build_graph(&banded, &[]);
    let across = find_path(&banded_graph, GridCell::new(0, 0), GridCell::new(8, 0));
    results.push(TestResult {
        name: "path_prefers_fast_terrain".into(),
        passed: matches!(&across, Ok(p) if p.iter().any(|c| c.row > 0)),
        detail: "route dips from sand into soil".into(),
    });

    // Travel time scales with tile cost
    let soil_time = travel_time(
        GridCell::new(0, 0),
        &[GridCell::new(1, 0), GridCell::new(2, 0)],
        &uniform,
    );
    let sand = TerrainField::filled(10, 10, SurfaceKind::Sand);
    let sand_time = travel_time(
        GridCell::new(0, 0),
        &[GridCell::new(1, 0), GridCell::new(2, 0)],
        &sand,
    );
    results.push(TestResult {
        name: "path_travel_time_ordering".into(),
        passed: sand_time > soil_time,
        detail: format!("sand {:.2} > soil {:.2}", sand_time, soil_time),
    });

    results
}

// ── 2. Movement ─────────────────────────────────────────────────────────

fn validate_movement(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Movement ---");
    }
    let mut results = Vec::new();

    // Snap onto a waypoint within reach
    let mut position = Vec2::new(0.9, 0.0);
    let mut direction = Vec2::new(1.0, 0.0);
    let mut path = vec![GridCell::new(1, 0)];
    let outcome = advance(&mut position, &mut direction, &mut path, 0.5);
    results.push(TestResult {
        name: "move_snaps_to_waypoint".into(),
        passed: outcome == StepOutcome::Arrived
            && position == Vec2::new(1.0, 0.0)
            && path.is_empty(),
        detail: format!("snapped to {:?}", position),
    });

    // Partial step covers exactly max_shift
    let mut position = Vec2::new(0.0, 0.0);
    let mut direction = Vec2::ZERO;
    let mut path = vec![GridCell::new(5, 5)];
    let start = position;
    let _ = advance(&mut position, &mut direction, &mut path, 0.5);
    let step_len = position.distance(&start);
    results.push(TestResult {
        name: "move_step_length".into(),
        passed: (step_len - 0.5).abs() < 1e-5,
        detail: format!("diagonal step length {:.4}", step_len),
    });

    // Idle on empty path, direction zeroed
    let mut position = Vec2::new(3.0, 3.0);
    let mut direction = Vec2::new(1.0, 0.0);
    let mut path: Vec<GridCell> = Vec::new();
    let outcome = advance(&mut position, &mut direction, &mut path, 0.5);
    results.push(TestResult {
        name: "move_idle_on_empty_path".into(),
        passed: outcome == StepOutcome::Idle && direction == Vec2::ZERO,
        detail: "no waypoints → Idle, direction zero".into(),
    });

    // A long walk terminates in bounded ticks
    let mut position = Vec2::new(0.0, 0.0);
    let mut direction = Vec2::ZERO;
    let mut path: Vec<GridCell> = (1..=8).map(|i| GridCell::new(i, i)).collect();
    let mut ticks = 0u32;
    while !path.is_empty() && ticks < 10_000 {
        let _ = advance(&mut position, &mut direction, &mut path, 0.09);
        ticks += 1;
    }
    results.push(TestResult {
        name: "move_long_walk_terminates".into(),
        passed: path.is_empty() && position == Vec2::new(8.0, 8.0),
        detail: format!("8 diagonal tiles in {} ticks", ticks),
    });

    results
}

// ── 3. Directions & Facing ──────────────────────────────────────────────

fn validate_directions(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Directions & Facing ---");
    }
    let mut results = Vec::new();

    // All 8 directions are unit length (or zero)
    let offsets = [
        (1.0, 0.0),
        (-1.0, 0.0),
        (0.0, 1.0),
        (0.0, -1.0),
        (1.0, 1.0),
        (1.0, -1.0),
        (-1.0, 1.0),
        (-1.0, -1.0),
    ];
    let all_unit = offsets.iter().all(|&(dx, dy)| {
        let dir = direction_toward(Vec2::ZERO, Vec2::new(dx, dy));
        (dir.length() - 1.0).abs() < 1e-5
    });
    results.push(TestResult {
        name: "dir_eight_unit_vectors".into(),
        passed: all_unit,
        detail: "all 8 directions have unit length".into(),
    });

    // Magnitude of the delta never matters
    let near = direction_toward(Vec2::ZERO, Vec2::new(0.01, -0.02));
    let far = direction_toward(Vec2::ZERO, Vec2::new(900.0, -1.0));
    results.push(TestResult {
        name: "dir_sign_only".into(),
        passed: near == far,
        detail: "direction depends on delta sign only".into(),
    });

    // Horizontal wins over vertical on diagonals
    let east = Facing::from_direction(direction_toward(Vec2::ZERO, Vec2::new(1.0, 1.0)));
    let west = Facing::from_direction(direction_toward(Vec2::ZERO, Vec2::new(-1.0, -1.0)));
    let idle = Facing::from_direction(Vec2::ZERO);
    results.push(TestResult {
        name: "facing_collapse_rules".into(),
        passed: east == Facing::East && west == Facing::West && idle == Facing::Default,
        detail: format!("SE→{:?} NW→{:?} idle→{:?}", east, west, idle),
    });

    results
}

// ── 4. World Generation ─────────────────────────────────────────────────

fn validate_worldgen(verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- World Generation ---");
    }
    let mut results = Vec::new();

    let config = WorldConfig {
        width: 48,
        height: 48,
        seed: 2024,
        ..Default::default()
    };

    let engine = match SimulationEngine::generate(config.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "worldgen_generates".into(),
                passed: false,
                detail: format!("generation failed: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "worldgen_generates".into(),
        passed: true,
        detail: format!(
            "{} settlers, {} animals, {} nature objects",
            engine.settler_count(),
            engine.animal_count(),
            engine.nature_count()
        ),
    });

    // Population matches config
    results.push(TestResult {
        name: "worldgen_population".into(),
        passed: engine.settler_count() == config.settlers as usize
            && engine.animal_count() == (config.deer + config.wolves + config.turtles) as usize,
        detail: format!(
            "{} settlers, {} animals as configured",
            engine.settler_count(),
            engine.animal_count()
        ),
    });

    // All speed modifiers are usable divisors
    let costs = engine.terrain_cost_layer();
    let costs_valid = costs.iter().all(|&c| c.is_finite() && c >= 1.0);
    results.push(TestResult {
        name: "worldgen_cost_layer_valid".into(),
        passed: costs_valid && costs.len() == 48 * 48,
        detail: format!("{} finite per-cell costs", costs.len()),
    });

    // Determinism: same seed, same world
    let replay = SimulationEngine::generate(config.clone());
    let deterministic = matches!(
        &replay,
        Ok(other) if other.terrain_cost_layer() == costs
            && other.nature_count() == engine.nature_count()
    );
    results.push(TestResult {
        name: "worldgen_deterministic".into(),
        passed: deterministic,
        detail: "same seed reproduces terrain and spawns".into(),
    });

    if verbose && !json {
        let mut soil = 0;
        let mut rock = 0;
        let mut sand = 0;
        for (_, tile) in engine.terrain.iter() {
            match tile.surface {
                SurfaceKind::Soil => soil += 1,
                SurfaceKind::Rock => rock += 1,
                SurfaceKind::Sand => sand += 1,
                SurfaceKind::RockySoil => {}
            }
        }
        println!("  Surface distribution: soil={} rock={} sand={}", soil, rock, sand);
    }

    results
}

// ── 5. Engine Run ───────────────────────────────────────────────────────

fn validate_engine_run(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Engine Run ---");
    }
    let mut results = Vec::new();

    let config = WorldConfig {
        width: 32,
        height: 32,
        seed: 77,
        settlers: 2,
        deer: 3,
        wolves: 2,
        turtles: 2,
        ..Default::default()
    };

    let mut engine = match SimulationEngine::generate(config) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "engine_generates".into(),
                passed: false,
                detail: format!("generation failed: {}", e),
            });
            return results;
        }
    };

    // Order a settler somewhere reachable and run to completion
    let settler = engine.settlers()[0];
    let start = engine
        .world
        .get::<&Position>(settler)
        .map(|p| p.cell())
        .expect("settler has a position");

    // Find a free, genuinely reachable goal a few tiles out. The obstacle
    // sentinel keeps blocked goals findable, so a previewed path only
    // counts if it is clear of solid entities.
    let obstacles = engine.obstacles();
    let mut goal = None;
    'search: for radius in (3..10).rev() {
        for (dx, dy) in [(radius, 0), (0, radius), (radius, radius), (-radius, 0)] {
            let candidate = GridCell::new(start.column + dx, start.row + dy);
            if candidate.column < 0
                || candidate.row < 0
                || candidate.column >= 32
                || candidate.row >= 32
            {
                continue;
            }
            if let Ok(path) = engine.preview_path(start, candidate) {
                if path_is_clear(&path, &obstacles) {
                    goal = Some(candidate);
                    break 'search;
                }
            }
        }
    }

    match goal {
        Some(goal) => {
            let ordered = engine.order(settler, TaskKind::MoveTo, Goal::Tile(goal));
            let mut arrived_tick = None;
            for _ in 0..5000 {
                engine.tick();
                let pos = engine
                    .world
                    .get::<&Position>(settler)
                    .ok()
                    .map(|p| p.cell());
                if pos == Some(goal) && engine.world.get::<&Task>(settler).is_err() {
                    arrived_tick = Some(engine.tick_count);
                    break;
                }
            }
            results.push(TestResult {
                name: "engine_move_order_completes".into(),
                passed: ordered && arrived_tick.is_some(),
                detail: match arrived_tick {
                    Some(tick) => format!("settler reached {:?} at tick {}", goal, tick),
                    None => format!("settler never reached {:?}", goal),
                },
            });
        }
        None => {
            results.push(TestResult {
                name: "engine_move_order_completes".into(),
                passed: false,
                detail: "no reachable goal near the settler".into(),
            });
        }
    }

    // Long free-running burn: ticks stay stable, populations never go negative
    let before_animals = engine.animal_count();
    for _ in 0..2000 {
        engine.tick();
    }
    results.push(TestResult {
        name: "engine_long_run_stable".into(),
        passed: engine.animal_count() <= before_animals && engine.settler_count() <= 2,
        detail: format!(
            "{} ticks elapsed, {} animals alive",
            engine.tick_count,
            engine.animal_count()
        ),
    });

    // Creatures must never end up standing inside a solid nature object;
    // paths are validated against obstacles every tick.
    let nature_cells: std::collections::HashSet<GridCell> = engine
        .world
        .query::<(
            &Nature,
            &Position,
            &Solid,
        )>()
        .iter()
        .map(|(_, (_, pos, _))| pos.cell())
        .collect();
    let intruders = engine
        .world
        .query::<(
            &Creature,
            &Position,
        )>()
        .iter()
        .filter(|(_, (_, pos))| nature_cells.contains(&pos.cell()))
        .count();
    results.push(TestResult {
        name: "engine_no_creature_in_solids".into(),
        passed: intruders == 0,
        detail: format!("{} creatures inside solid nature cells", intruders),
    });

    results
}
