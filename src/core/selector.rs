/// Uniform random reply selection.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::pool::ResponsePool;
use crate::schema::intent::Intent;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no response pool configured for intent '{0}'")]
    MissingPool(Intent),
}

/// Draws one reply per call, uniformly from the intent's pool.
///
/// Calls are independent: the same reply may come up twice in a row.
#[derive(Debug, Clone)]
pub struct ResponseSelector<R = StdRng> {
    pool: ResponsePool,
    rng: R,
}

impl ResponseSelector<StdRng> {
    /// A selector with a deterministic seed.
    pub fn seeded(pool: ResponsePool, seed: u64) -> Self {
        Self::new(pool, StdRng::seed_from_u64(seed))
    }

    /// A selector seeded from OS entropy.
    pub fn from_entropy(pool: ResponsePool) -> Self {
        Self::new(pool, StdRng::from_entropy())
    }
}

impl<R: Rng> ResponseSelector<R> {
    pub fn new(pool: ResponsePool, rng: R) -> Self {
        ResponseSelector { pool, rng }
    }

    pub fn pool(&self) -> &ResponsePool {
        &self.pool
    }

    /// Pick a reply for `intent`.
    pub fn select(&mut self, intent: Intent) -> Result<&str, SelectError> {
        let replies = self
            .pool
            .get(intent)
            .ok_or(SelectError::MissingPool(intent))?;
        replies
            .choose(&mut self.rng)
            .map(String::as_str)
            .ok_or(SelectError::MissingPool(intent))
    }
}
