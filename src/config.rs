//! Generation configuration and builder
//!
//! Every distance below is in world-plane units. By default blocks and lots
//! are inset by 3 units, districts keep a 6-unit curb, and lot grid cells are
//! between 30 and 45 units.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldGenError};
use crate::generation::LloydOptions;
use crate::lot::MIN_LOT_AREA;

/// Per-block grid subdivision options
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockOptions {
    /// Smallest grid cell edge drawn per axis
    pub cell_size_min: f64,
    /// Largest grid cell edge drawn per axis (exclusive upper bound)
    pub cell_size_max: f64,
    /// Align the lot grid with the block's longest edge instead of the world axes
    pub allow_rotation: bool,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            cell_size_min: 30.0,
            cell_size_max: 45.0,
            allow_rotation: false,
        }
    }
}

/// Configuration for deterministic district generation
///
/// The same configuration, sites and seed always reproduce the same blocks,
/// lots and curbs.
///
/// # Example
///
/// ```rust
/// use district_gen::*;
///
/// let config = GenerationConfigBuilder::new()
///     .lot_inset(2.0)
///     .unwrap()
///     .cell_size(20.0, 30.0)
///     .unwrap()
///     .build();
///
/// assert_eq!(config.lot_inset, 2.0);
/// assert_eq!(config.block_options.cell_size_max, 30.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// Padding added around the district extent before tessellating
    pub voronoi_margin: f64,
    /// Inset applied to each raw Voronoi cell
    pub block_inset: f64,
    /// Inset applied to (a copy of) the district boundary before clipping blocks
    pub district_inset: f64,
    /// Inset applied to each lot
    pub lot_inset: f64,
    /// Smallest absolute area a lot may have
    pub min_lot_area: f64,
    /// Base building height before the random offset
    pub base_height: f64,
    /// Range of the random height offset added by the default provider
    pub height_spread: f64,
    /// Default grid options for every block of the district
    pub block_options: BlockOptions,
    /// Lloyd relaxation applied to randomly scattered sites (0 iterations = off)
    pub lloyd: LloydOptions,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfigBuilder::new().build()
    }
}

/// Builder for [`GenerationConfig`] with validation
#[derive(Debug, Clone)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    /// Create a builder with the default settings
    pub fn new() -> Self {
        Self {
            config: GenerationConfig {
                voronoi_margin: 25.0,
                block_inset: 3.0,
                district_inset: 6.0,
                lot_inset: 3.0,
                min_lot_area: 10.0,
                base_height: 10.0,
                height_spread: 30.0,
                block_options: BlockOptions::default(),
                lloyd: LloydOptions {
                    max_iterations: 0,
                    ..LloydOptions::default()
                },
            },
        }
    }

    /// Set the tessellation padding
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the margin is negative or not finite
    pub fn voronoi_margin(mut self, margin: f64) -> Result<Self> {
        self.config.voronoi_margin = non_negative("voronoi margin", margin)?;
        Ok(self)
    }

    /// Set the Voronoi cell inset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the inset is negative or not finite
    pub fn block_inset(mut self, inset: f64) -> Result<Self> {
        self.config.block_inset = non_negative("block inset", inset)?;
        Ok(self)
    }

    /// Set the district boundary inset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the inset is negative or not finite
    pub fn district_inset(mut self, inset: f64) -> Result<Self> {
        self.config.district_inset = non_negative("district inset", inset)?;
        Ok(self)
    }

    /// Set the lot inset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the inset is negative or not finite
    pub fn lot_inset(mut self, inset: f64) -> Result<Self> {
        self.config.lot_inset = non_negative("lot inset", inset)?;
        Ok(self)
    }

    /// Set the minimum buildable lot area
    ///
    /// The threshold can only be raised: every generated lot must still pass
    /// [`Lot::is_valid`](crate::lot::Lot::is_valid).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the area is below [`MIN_LOT_AREA`] or not finite
    pub fn min_lot_area(mut self, area: f64) -> Result<Self> {
        if !(area >= MIN_LOT_AREA && area.is_finite()) {
            return Err(WorldGenError::InvalidConfig(format!(
                "minimum lot area must be >= {} (got {})",
                MIN_LOT_AREA, area
            )));
        }
        self.config.min_lot_area = area;
        Ok(self)
    }

    /// Set the base height and the spread of the random offset on top of it
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either value is negative or not finite
    pub fn heights(mut self, base: f64, spread: f64) -> Result<Self> {
        self.config.base_height = non_negative("base height", base)?;
        self.config.height_spread = non_negative("height spread", spread)?;
        Ok(self)
    }

    /// Set the grid cell size range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 < min <= max`
    pub fn cell_size(mut self, min: f64, max: f64) -> Result<Self> {
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(WorldGenError::InvalidConfig(format!(
                "cell size range must satisfy 0 < min <= max (got {}..{})",
                min, max
            )));
        }
        self.config.block_options.cell_size_min = min;
        self.config.block_options.cell_size_max = max;
        Ok(self)
    }

    /// Allow lot grids to follow each block's longest edge
    pub fn allow_rotation(mut self, allow: bool) -> Self {
        self.config.block_options.allow_rotation = allow;
        self
    }

    /// Set the Lloyd relaxation applied to random sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20 or the threshold is negative
    pub fn lloyd(mut self, options: LloydOptions) -> Result<Self> {
        if options.max_iterations > 20 {
            return Err(WorldGenError::InvalidConfig(format!(
                "Lloyd iterations must be <= 20 (got {})",
                options.max_iterations
            )));
        }
        if options.convergence_threshold < 0.0 {
            return Err(WorldGenError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                options.convergence_threshold
            )));
        }
        self.config.lloyd = options;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> GenerationConfig {
        self.config
    }
}

impl Default for GenerationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(name: &str, value: f64) -> Result<f64> {
    if value < 0.0 || !value.is_finite() {
        return Err(WorldGenError::InvalidConfig(format!(
            "{} must be >= 0 (got {})",
            name, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.voronoi_margin, 25.0);
        assert_eq!(config.block_inset, 3.0);
        assert_eq!(config.district_inset, 6.0);
        assert_eq!(config.lot_inset, 3.0);
        assert_eq!(config.min_lot_area, 10.0);
        assert_eq!(config.base_height, 10.0);
        assert_eq!(config.block_options.cell_size_min, 30.0);
        assert_eq!(config.block_options.cell_size_max, 45.0);
        assert!(!config.block_options.allow_rotation);
        assert_eq!(config.lloyd.max_iterations, 0);
    }

    #[test]
    fn test_builder_custom() {
        let config = GenerationConfigBuilder::new()
            .district_inset(8.0)
            .unwrap()
            .heights(5.0, 0.0)
            .unwrap()
            .allow_rotation(true)
            .build();

        assert_eq!(config.district_inset, 8.0);
        assert_eq!(config.base_height, 5.0);
        assert_eq!(config.height_spread, 0.0);
        assert!(config.block_options.allow_rotation);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(GenerationConfigBuilder::new().lot_inset(-1.0).is_err());
        assert!(GenerationConfigBuilder::new().block_inset(f64::NAN).is_err());
        assert!(GenerationConfigBuilder::new().min_lot_area(0.0).is_err());
        assert!(GenerationConfigBuilder::new().min_lot_area(9.0).is_err());
        assert!(GenerationConfigBuilder::new().min_lot_area(f64::INFINITY).is_err());
        assert!(GenerationConfigBuilder::new().cell_size(40.0, 30.0).is_err());
        assert!(GenerationConfigBuilder::new().cell_size(0.0, 30.0).is_err());

        let too_many = LloydOptions {
            max_iterations: 21,
            convergence_threshold: 0.01,
        };
        assert!(GenerationConfigBuilder::new().lloyd(too_many).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = GenerationConfigBuilder::new().allow_rotation(true).build();

        let json = serde_json::to_string(&config).unwrap();
        let restored: GenerationConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
