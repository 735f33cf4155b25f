//! Settler name generation.

use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bram", "Clara", "Dmitri", "Edda", "Finn", "Greta", "Hale", "Ines", "Jonas", "Kaja",
    "Lars", "Mira", "Nils", "Orla", "Piotr", "Runa", "Sven", "Tove", "Ulf", "Vera", "Wren",
];

const LAST_NAMES: &[&str] = &[
    "Ashford", "Birch", "Calder", "Dray", "Elmwood", "Frost", "Garrow", "Holt", "Iver", "Kessler",
    "Larkin", "Moor", "North", "Oakes", "Penn", "Quill", "Rowan", "Stone", "Thorn", "Vance",
];

/// Random "First Last" settler name.
pub fn generate_name(rng: &mut impl Rng) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}
