//! Deterministic random number generation for award simulation.
//!
//! RULE: Nothing in the simulator may call any platform RNG.
//! All randomness flows through a DrawSource seeded from the
//! group identifier, so every caller that simulates the same
//! group sees the same award calendar.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

const SEED_MODULUS: u64 = 1_000_000;

/// Derive the integer seed for a group: the sum of its UTF-16 code
/// units modulo 1,000,000.
pub fn seed_from_group_id(group_id: &str) -> u64 {
    group_id
        .encode_utf16()
        .fold(0u64, |acc, unit| (acc + u64::from(unit)) % SEED_MODULUS)
}

/// A seeded stream of draws.
pub trait DrawSource {
    /// Unique stable name for this generator.
    fn name(&self) -> &'static str;

    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Roll an index in [0, n). `n` must be > 0.
    fn next_below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        ((self.next_f64() * n as f64).floor() as usize).min(n - 1)
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Fractional part of `sin(seed) * 10000`, advancing the seed by one
/// per draw.
pub struct SineRng {
    seed: f64,
}

impl SineRng {
    pub fn new(seed: u64) -> Self {
        Self { seed: seed as f64 }
    }
}

impl DrawSource for SineRng {
    fn name(&self) -> &'static str {
        "sine"
    }

    fn next_f64(&mut self) -> f64 {
        let x = self.seed.sin() * 10_000.0;
        self.seed += 1.0;
        // sin() is negative half the time; x - floor(x) keeps it in [0, 1).
        let frac = x - x.floor();
        if frac >= 1.0 { 0.0 } else { frac }
    }
}

/// PCG-backed stream for callers that want better statistical quality.
pub struct PcgRng {
    inner: Pcg64Mcg,
}

impl PcgRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }
}

impl DrawSource for PcgRng {
    fn name(&self) -> &'static str {
        "pcg"
    }

    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Which generator the simulator draws from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    Sine,
    Pcg,
}

impl GeneratorKind {
    /// Build the generator for a group. Same kind + same id → same stream.
    pub fn for_group(self, group_id: &str) -> Box<dyn DrawSource> {
        let seed = seed_from_group_id(group_id);
        match self {
            Self::Sine => Box::new(SineRng::new(seed)),
            Self::Pcg => Box::new(PcgRng::new(seed)),
        }
    }
}

/// In-place Fisher–Yates shuffle driven by `rng`.
pub fn shuffle<T>(rng: &mut dyn DrawSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i + 1);
        items.swap(i, j);
    }
}
