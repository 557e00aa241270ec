//! Uniform random parameter draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::StudyError;

/// Uniform random sampling, optionally seeded.
///
/// With a seed, the generator of trial `n` is seeded with `seed + n`, so a
/// trial's parameters depend only on its number and not on which worker
/// happened to claim it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomSampler {
    seed: Option<u64>,
}

impl RandomSampler {
    /// Creates a sampler; `None` draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Returns the base seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the generator for one trial.
    pub fn rng_for(&self, number: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(number)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Picks one of `choices` uniformly.
pub fn draw_categorical(
    rng: &mut StdRng,
    name: &str,
    choices: &[String],
) -> Result<String, StudyError> {
    if choices.is_empty() {
        return Err(StudyError::EmptyChoices {
            name: name.to_string(),
        });
    }
    Ok(choices[rng.gen_range(0..choices.len())].clone())
}

/// Picks an integer in `[low, high]` uniformly.
pub fn draw_int(rng: &mut StdRng, name: &str, low: i64, high: i64) -> Result<i64, StudyError> {
    if low > high {
        return Err(StudyError::InvalidRange {
            name: name.to_string(),
            low,
            high,
        });
    }
    Ok(rng.gen_range(low..=high))
}
