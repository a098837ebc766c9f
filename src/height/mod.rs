//! Building height assignment for lots
//!
//! A [`HeightProvider`] is asked once per surviving lot, in generation order,
//! and is handed the block's seeded generator so random providers stay
//! reproducible.

mod perlin;

pub use perlin::{sample_perlin_2d, PerlinConfig};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationConfig;
use crate::geometry::Polygon;
use crate::lot::DEFAULT_BUILD_HEIGHT;

/// Trait for assigning a building height to a lot footprint
pub trait HeightProvider {
    /// Height for the lot with the given footprint
    fn build_height(&self, footprint: &Polygon, rng: &mut ChaCha8Rng) -> f64;
}

/// Base height plus a uniform random offset drawn from the block generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomHeight {
    /// Height every lot starts from
    pub base: f64,
    /// Offsets are drawn from `0..spread`
    pub spread: f64,
}

impl RandomHeight {
    /// Provider using the heights from a generation config
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            base: config.base_height,
            spread: config.height_spread,
        }
    }
}

impl Default for RandomHeight {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

impl HeightProvider for RandomHeight {
    fn build_height(&self, _footprint: &Polygon, rng: &mut ChaCha8Rng) -> f64 {
        if self.spread > 0.0 {
            self.base + rng.gen_range(0.0..self.spread)
        } else {
            self.base
        }
    }
}

/// The same height for every lot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedHeight(pub f64);

impl Default for FixedHeight {
    fn default() -> Self {
        Self(DEFAULT_BUILD_HEIGHT)
    }
}

impl HeightProvider for FixedHeight {
    fn build_height(&self, _footprint: &Polygon, _rng: &mut ChaCha8Rng) -> f64 {
        self.0
    }
}

/// Skyline driven by fractal noise sampled at each lot's centroid
///
/// Neighbouring lots get similar heights, so tall clusters form downtowns.
/// Does not draw from the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerlinHeight {
    /// Noise seed
    pub seed: u32,
    /// Height at noise value 0
    pub base: f64,
    /// Height added at noise value 1
    pub amplitude: f64,
    /// Noise parameters
    pub config: PerlinConfig,
}

impl PerlinHeight {
    /// Create a provider with default noise parameters
    pub fn new(seed: u32, base: f64, amplitude: f64) -> Self {
        Self {
            seed,
            base,
            amplitude,
            config: PerlinConfig::default(),
        }
    }
}

impl HeightProvider for PerlinHeight {
    fn build_height(&self, footprint: &Polygon, _rng: &mut ChaCha8Rng) -> f64 {
        let position = footprint.centroid(glam::DVec2::ZERO);
        self.base + self.amplitude * sample_perlin_2d(position, self.seed, &self.config)
    }
}
