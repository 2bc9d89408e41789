//! Tools to generate random burrow layouts.

use rand::prelude::SliceRandom;
use rand::SeedableRng;

use crate::{Burrow, FAMILIES};

/// Builds a standard burrow with rooms of the given `depth` and the family
/// letters shuffled uniformly over all room slots.
///
/// The same seed always yields the same layout, which makes generated
/// burrows usable as reproducible test and benchmark cases. The corridor
/// starts out empty; with four full rooms the layout is always sortable, so
/// the solvers are guaranteed to find a solution.
///
/// # Panics
/// Panics if `depth` is `0` or does not fit the position encoding.
pub fn random_burrow(depth: usize, seed: u64) -> Burrow {
    assert!(depth > 0, "rooms need at least one slot");
    let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(seed);

    let mut letters: Vec<char> = FAMILIES
        .iter()
        .flat_map(|family| std::iter::repeat(family.letter()).take(depth))
        .collect();
    letters.shuffle(&mut rng);

    let columns: Vec<String> = letters
        .chunks(depth)
        .map(|chunk| chunk.iter().collect())
        .collect();
    Burrow::standard([
        columns[0].as_str(),
        columns[1].as_str(),
        columns[2].as_str(),
        columns[3].as_str(),
    ])
    .expect("a full shuffled burrow is always well formed")
}
