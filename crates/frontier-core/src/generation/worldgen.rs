//! World generation - noise-based terrain plus nature and creature spawns.
//!
//! Terrain comes from layered value noise banded into surfaces: a mid band
//! of soil, low values become rock, everything else sand. Soil tiles roll
//! for trees and bushes; cliffs form where rock fills an entire radius-2
//! neighborhood. All randomness flows from one seeded generator so a seed
//! reproduces the same world exactly.

use crate::components::*;
use crate::generation::generate_name;
use frontier_logic::grid::GridCell;
use frontier_logic::terrain::{PendingSpawn, SurfaceKind, TerrainError, TerrainField, Tile};
use hecs::{Entity, World};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Noise band edges on the normalized [0, 1] noise value. Below the soil
/// floor is rock, between floor and ceiling is soil, above is sand.
const SOIL_FLOOR: f32 = 0.455;
const SOIL_CEILING: f32 = 0.565;

const TREE_CHANCE: f64 = 0.09;
const BUSH_CHANCE: f64 = 0.05;
/// Neighborhood radius that must be solid rock for a cliff to form.
const CLIFF_RADIUS: i32 = 2;

/// Hit points of a freshly spawned nature object.
const NATURE_HEALTH: f32 = 10.0;

/// Configuration for world generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    /// Noise feature size in tiles; larger values make broader terrain bands.
    pub noise_scale: f32,
    pub settlers: u32,
    pub deer: u32,
    pub wolves: u32,
    pub turtles: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            seed: 0,
            noise_scale: 12.0,
            settlers: 3,
            deer: 4,
            wolves: 2,
            turtles: 2,
        }
    }
}

/// World generation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    Terrain(TerrainError),
    /// Not enough unoccupied passable tiles to place every creature.
    NotEnoughRoom { needed: usize, available: usize },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Terrain(err) => write!(f, "terrain generation failed: {}", err),
            GenerationError::NotEnoughRoom { needed, available } => write!(
                f,
                "cannot place {} creatures on {} free tiles",
                needed, available
            ),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Terrain(err) => Some(err),
            GenerationError::NotEnoughRoom { .. } => None,
        }
    }
}

impl From<TerrainError> for GenerationError {
    fn from(err: TerrainError) -> Self {
        GenerationError::Terrain(err)
    }
}

/// Layered value noise over a random lattice, output in [0, 1].
struct ValueNoise {
    lattice: Vec<f32>,
    size: usize,
}

impl ValueNoise {
    fn new(rng: &mut impl Rng, size: usize) -> Self {
        let lattice = (0..size * size).map(|_| rng.gen::<f32>()).collect();
        Self { lattice, size }
    }

    fn at(&self, x: usize, y: usize) -> f32 {
        self.lattice[(y % self.size) * self.size + (x % self.size)]
    }

    /// Bilinear sample with smoothstep fade between lattice points.
    fn sample(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = smoothstep(x - x0);
        let fy = smoothstep(y - y0);
        let (ix, iy) = (x0 as usize, y0 as usize);

        let top = lerp(self.at(ix, iy), self.at(ix + 1, iy), fx);
        let bottom = lerp(self.at(ix, iy + 1), self.at(ix + 1, iy + 1), fx);
        lerp(top, bottom, fy)
    }

    /// Four-octave fractal sample, renormalized to [0, 1].
    fn fractal(&self, x: f32, y: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut range = 0.0;
        for _ in 0..4 {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            range += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        total / range
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Generate the terrain field: surfaces, tree/bush rolls, cliff pass.
pub fn generate_terrain(
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Result<TerrainField, GenerationError> {
    let noise = ValueNoise::new(rng, 64);
    let scale = config.noise_scale.max(1.0);

    let mut surfaces = Vec::with_capacity((config.width * config.height) as usize);
    for row in 0..config.height {
        for column in 0..config.width {
            let n = noise.fractal(column as f32 / scale, row as f32 / scale);
            let surface = if n < SOIL_FLOOR {
                SurfaceKind::Rock
            } else if n < SOIL_CEILING {
                SurfaceKind::Soil
            } else {
                SurfaceKind::Sand
            };
            surfaces.push(surface);
        }
    }

    let at = |column: i32, row: i32| surfaces[row as usize * config.width as usize + column as usize];

    let mut tiles = Vec::with_capacity(surfaces.len());
    for row in 0..config.height as i32 {
        for column in 0..config.width as i32 {
            let surface = at(column, row);
            let mut tile = Tile::new(surface);

            match surface {
                SurfaceKind::Soil => {
                    if rng.gen_bool(TREE_CHANCE) {
                        tile = tile.with_spawn(PendingSpawn::Tree);
                    } else if rng.gen_bool(BUSH_CHANCE) {
                        tile = tile.with_spawn(PendingSpawn::Bush);
                    }
                }
                SurfaceKind::Rock => {
                    // Cliffs only deep inside rock formations; the
                    // neighborhood is clamped at map borders.
                    let all_rock = (row - CLIFF_RADIUS..=row + CLIFF_RADIUS).all(|r| {
                        (column - CLIFF_RADIUS..=column + CLIFF_RADIUS).all(|c| {
                            c < 0
                                || r < 0
                                || c >= config.width as i32
                                || r >= config.height as i32
                                || at(c, r) == SurfaceKind::Rock
                        })
                    });
                    if all_rock {
                        tile = tile.with_spawn(PendingSpawn::Cliff);
                    }
                }
                _ => {}
            }

            tiles.push(tile);
        }
    }

    Ok(TerrainField::from_tiles(config.width, config.height, tiles)?)
}

/// Spawn nature entities for every tile with a pending spawn marker.
pub fn spawn_nature(world: &mut World, terrain: &TerrainField) -> Vec<Entity> {
    let mut spawned = Vec::new();

    for (cell, tile) in terrain.iter() {
        let Some(pending) = tile.pending_spawn else {
            continue;
        };
        let kind = match pending {
            PendingSpawn::Tree => NatureKind::Tree,
            PendingSpawn::Bush => NatureKind::Bush,
            PendingSpawn::Cliff => NatureKind::Cliff,
        };

        let entity = world.spawn((
            Position::from_cell(cell),
            Nature { kind },
            kind.deposit(),
            Health::new(NATURE_HEALTH),
        ));
        if kind.is_solid() {
            let _ = world.insert_one(entity, Solid);
        }
        spawned.push(entity);
    }

    info!("spawned {} nature objects", spawned.len());
    spawned
}

/// Spawn settlers and wild animals on free passable tiles.
pub fn spawn_creatures(
    world: &mut World,
    terrain: &TerrainField,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Entity>, GenerationError> {
    // Tiles not already claimed by a solid entity.
    let occupied: std::collections::HashSet<GridCell> = world
        .query::<(&Solid, &Position)>()
        .iter()
        .map(|(_, (_, pos))| pos.cell())
        .collect();

    let mut free: Vec<GridCell> = terrain
        .iter()
        .map(|(cell, _)| cell)
        .filter(|cell| !occupied.contains(cell))
        .collect();

    let needed = (config.settlers + config.deer + config.wolves + config.turtles) as usize;
    if free.len() < needed {
        return Err(GenerationError::NotEnoughRoom {
            needed,
            available: free.len(),
        });
    }

    let mut roster = Vec::with_capacity(needed);
    for _ in 0..config.settlers {
        roster.push(Species::Settler);
    }
    for _ in 0..config.deer {
        roster.push(Species::Deer);
    }
    for _ in 0..config.wolves {
        roster.push(Species::Wolf);
    }
    for _ in 0..config.turtles {
        roster.push(Species::Turtle);
    }

    let mut spawned = Vec::with_capacity(needed);
    for species in roster {
        let cell = free.swap_remove(rng.gen_range(0..free.len()));
        spawned.push(spawn_creature(world, species, cell, rng));
    }

    info!("spawned {} creatures", spawned.len());
    Ok(spawned)
}

/// Spawn one creature of the given species at a cell.
pub fn spawn_creature(
    world: &mut World,
    species: Species,
    cell: GridCell,
    rng: &mut impl Rng,
) -> Entity {
    let stats = species.stats();
    let entity = world.spawn((
        Creature { species },
        Position::from_cell(cell),
        Heading::default(),
        Health::new(stats.max_health),
        CombatStats {
            damage: stats.damage,
            melee_cooldown: stats.melee_cooldown,
        },
        Solid,
    ));

    if species == Species::Settler {
        let _ = world.insert(
            entity,
            (
                PlayerControlled,
                Name::new(generate_name(rng)),
                Inventory::default(),
            ),
        );
    } else {
        let _ = world.insert_one(
            entity,
            Wild {
                activity_rate: stats.activity_rate,
            },
        );
    }

    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config(seed: u64) -> WorldConfig {
        WorldConfig {
            width: 32,
            height: 32,
            seed,
            settlers: 2,
            deer: 2,
            wolves: 1,
            turtles: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_terrain_is_deterministic_per_seed() {
        let config = small_config(99);
        let mut rng_a = StdRng::seed_from_u64(config.seed);
        let mut rng_b = StdRng::seed_from_u64(config.seed);

        let a = generate_terrain(&config, &mut rng_a).unwrap();
        let b = generate_terrain(&config, &mut rng_b).unwrap();

        for ((cell, tile_a), (_, tile_b)) in a.iter().zip(b.iter()) {
            assert_eq!(tile_a, tile_b, "mismatch at {:?}", cell);
        }
    }

    #[test]
    fn test_terrain_has_valid_modifiers() {
        let config = small_config(5);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let terrain = generate_terrain(&config, &mut rng).unwrap();

        for (_, tile) in terrain.iter() {
            assert!(tile.speed_modifier > 0.0 && tile.speed_modifier <= 1.0);
            assert_eq!(tile.speed_modifier, tile.surface.speed_modifier());
        }
    }

    #[test]
    fn test_spawns_match_surface_rules() {
        let config = small_config(11);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let terrain = generate_terrain(&config, &mut rng).unwrap();

        for (_, tile) in terrain.iter() {
            match tile.pending_spawn {
                Some(PendingSpawn::Tree) | Some(PendingSpawn::Bush) => {
                    assert_eq!(tile.surface, SurfaceKind::Soil)
                }
                Some(PendingSpawn::Cliff) => assert_eq!(tile.surface, SurfaceKind::Rock),
                None => {}
            }
        }
    }

    #[test]
    fn test_nature_spawns_are_placed_and_solid() {
        let config = small_config(3);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let terrain = generate_terrain(&config, &mut rng).unwrap();

        let mut world = World::new();
        let spawned = spawn_nature(&mut world, &terrain);

        let expected = terrain
            .iter()
            .filter(|(_, tile)| tile.pending_spawn.is_some())
            .count();
        assert_eq!(spawned.len(), expected);

        for entity in spawned {
            let nature = *world.get::<&Nature>(entity).unwrap();
            let solid = world.get::<&Solid>(entity).is_ok();
            assert_eq!(solid, nature.kind.is_solid());
        }
    }

    #[test]
    fn test_creatures_get_distinct_free_cells() {
        let config = small_config(17);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let terrain = generate_terrain(&config, &mut rng).unwrap();

        let mut world = World::new();
        let _ = spawn_nature(&mut world, &terrain);
        let creatures = spawn_creatures(&mut world, &terrain, &config, &mut rng).unwrap();
        assert_eq!(creatures.len(), 6);

        let cells: std::collections::HashSet<GridCell> = world
            .query::<(&Creature, &Position)>()
            .iter()
            .map(|(_, (_, pos))| pos.cell())
            .collect();
        assert_eq!(cells.len(), 6, "creatures must not share cells");
    }

    #[test]
    fn test_settlers_are_named_and_player_controlled() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let settler = spawn_creature(&mut world, Species::Settler, GridCell::new(0, 0), &mut rng);
        let wolf = spawn_creature(&mut world, Species::Wolf, GridCell::new(1, 0), &mut rng);

        assert!(world.get::<&PlayerControlled>(settler).is_ok());
        assert!(world.get::<&Name>(settler).is_ok());
        assert!(world.get::<&Wild>(settler).is_err());

        assert!(world.get::<&Wild>(wolf).is_ok());
        assert!(world.get::<&PlayerControlled>(wolf).is_err());
    }

    #[test]
    fn test_not_enough_room_is_reported() {
        let config = WorldConfig {
            width: 2,
            height: 2,
            settlers: 10,
            deer: 0,
            wolves: 0,
            turtles: 0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let terrain = TerrainField::filled(2, 2, SurfaceKind::Soil);

        let mut world = World::new();
        let err = spawn_creatures(&mut world, &terrain, &config, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenerationError::NotEnoughRoom {
                needed: 10,
                available: 4,
            }
        );
    }
}
