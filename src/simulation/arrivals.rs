//! Vehicle arrival sources
//!
//! The engine asks an `ArrivalSource` how many vehicles join each approach
//! on every tick. Poisson arrivals drive the learning environment; any
//! `FnMut(Direction) -> u32` closure can stand in for scripted traffic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::validate_rate;
use super::error::ConfigError;
use super::types::Direction;

/// Largest mean handed to a single Knuth draw
const MAX_CHUNK_RATE: f64 = 500.0;

/// Supplies per-direction arrival counts, one draw per direction per tick
pub trait ArrivalSource {
    fn draw(&mut self, direction: Direction) -> u32;

    /// Restart the random stream. Deterministic sources ignore this.
    fn reseed(&mut self, _seed: u64) {}
}

impl<F> ArrivalSource for F
where
    F: FnMut(Direction) -> u32,
{
    fn draw(&mut self, direction: Direction) -> u32 {
        self(direction)
    }
}

/// Independent Poisson arrivals with the same mean on every approach
#[derive(Debug, Clone)]
pub struct PoissonArrivals {
    rate: f64,
    rng: StdRng,
}

impl PoissonArrivals {
    /// Create a source with mean `rate` arrivals per direction per tick.
    /// A seed makes the stream reproducible; without one the stream is
    /// seeded from the thread RNG.
    pub fn new(rate: f64, seed: Option<u64>) -> Result<Self, ConfigError> {
        validate_rate("arrival_rate", rate)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Ok(Self { rate, rng })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Sum of Poisson draws over chunks of at most `MAX_CHUNK_RATE`; the sum of
    /// independent Poisson variables is Poisson with the summed mean
    fn sample(&mut self) -> u32 {
        let mut remaining = self.rate;
        let mut total = 0u32;
        while remaining > 0.0 && total < u32::MAX {
            let chunk = remaining.min(MAX_CHUNK_RATE);
            total = total.saturating_add(self.sample_knuth(chunk));
            remaining -= chunk;
        }
        total
    }

    /// Knuth's product-of-uniforms sampler. `exp(-rate)` underflows near
    /// 745, so callers keep `rate` small.
    fn sample_knuth(&mut self, rate: f64) -> u32 {
        let limit = (-rate).exp();
        let mut product = 1.0;
        let mut k = 0u32;
        loop {
            product *= self.rng.random::<f64>();
            if product <= limit {
                return k;
            }
            k += 1;
        }
    }
}

impl ArrivalSource for PoissonArrivals {
    fn draw(&mut self, _direction: Direction) -> u32 {
        self.sample()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Arrival source that never produces traffic
pub fn no_arrivals(_direction: Direction) -> u32 {
    0
}
