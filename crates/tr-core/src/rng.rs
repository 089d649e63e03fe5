//! Seedable simulation RNG.
//!
//! # Determinism strategy
//!
//! Traffic is sampled from a single `SmallRng` walked in `EdgeId` order, so
//! the seed alone determines every sampled value.  When the caller does not
//! supply a seed one is drawn from OS entropy and kept on the `SimRng`, which
//! lets a surprising run be logged and replayed exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG used by the traffic model.
///
/// Used only in single-threaded contexts; the traffic pass is sequential.
pub struct SimRng {
    rng:  SmallRng,
    seed: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng { rng: SmallRng::seed_from_u64(seed), seed }
    }

    /// Seed from OS entropy.  The drawn seed is available via [`seed`](Self::seed).
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// `Some(seed)` → reproducible, `None` → fresh entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None    => Self::from_entropy(),
        }
    }

    /// The seed this RNG was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}
