//! Placeholder scoring.
//!
//! [`RandomScorer`] does not read the answer script. It draws a uniform mark
//! so that the rest of the pipeline can be exercised until a real scorer is
//! plugged in through the [`Scorer`] trait.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::traits::{Score, ScoreRequest, Scorer};

/// Fixed maximum used by the placeholder scorer.
pub const RANDOM_MAX_MARKS: u32 = 100;

/// Assigns a uniformly random mark in `0..=100` out of 100.
pub struct RandomScorer {
    rng: Mutex<StdRng>,
}

impl RandomScorer {
    /// A scorer seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// A scorer that yields a reproducible sequence of marks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for RandomScorer {
    fn name(&self) -> &str {
        "random"
    }

    async fn score(&self, request: &ScoreRequest<'_>) -> anyhow::Result<Score> {
        let marks = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen_range(0..=RANDOM_MAX_MARKS);
        tracing::debug!(file = request.file_name, marks, "assigned placeholder mark");
        Ok(Score {
            marks,
            max_marks: RANDOM_MAX_MARKS,
        })
    }
}
