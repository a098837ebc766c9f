//! Error types for district and world generation

use std::fmt;

/// Errors raised by misuse of the generation API
///
/// Geometry that degenerates during generation is not an error: it is logged
/// and simply produces fewer blocks or lots.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldGenError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// A polygon handed to a geometry primitive is unusable
    DegenerateGeometry(String),
    /// Requested district index does not exist
    DistrictNotFound(usize),
    /// Requested edge index does not exist on the district
    EdgeNotFound {
        /// District index
        district: usize,
        /// Edge index within that district
        edge: usize,
    },
}

impl fmt::Display for WorldGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldGenError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            WorldGenError::DegenerateGeometry(msg) => write!(f, "degenerate geometry: {}", msg),
            WorldGenError::DistrictNotFound(id) => write!(f, "district not found: {}", id),
            WorldGenError::EdgeNotFound { district, edge } => {
                write!(f, "edge {} not found on district {}", edge, district)
            }
        }
    }
}

impl std::error::Error for WorldGenError {}

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, WorldGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = WorldGenError::EdgeNotFound { district: 2, edge: 7 };
        assert_eq!(err.to_string(), "edge 7 not found on district 2");

        let err = WorldGenError::InvalidConfig("lot inset must be >= 0".into());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
