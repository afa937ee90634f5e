// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Default file identifier generator.

use prefab_port::IdGenerator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ident::COMPACT_ALPHABET;

/// Length of generated file identifiers.
pub const FILE_ID_LEN: usize = 22;

/// Random 22-symbol file identifiers over the compact alphabet.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    rng: StdRng,
}

impl RandomIdGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generator with a fixed seed; the same seed yields the same ids.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn file_id(&mut self) -> String {
        (0..FILE_ID_LEN)
            .map(|_| char::from(COMPACT_ALPHABET[self.rng.gen_range(0..COMPACT_ALPHABET.len())]))
            .collect()
    }
}
