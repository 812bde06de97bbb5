//! Index configuration and the distance space identifier

use crate::error::{ProximaError, ProximaResult};
use serde::{Deserialize, Serialize};

/// Default vector dimension for the hashing-trick vectorizer
pub const DEFAULT_DIMS: usize = 128;
/// Default number of bidirectional links per node above layer 0
pub const DEFAULT_M: usize = 16;
/// Default candidate list size during construction
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;
/// Default candidate list size during search
pub const DEFAULT_EF_SEARCH: usize = 50;
/// Default upper bound on graph layers
pub const DEFAULT_MAX_LAYERS: usize = 16;

/// Distance space used for similarity computation.
///
/// Fixed to cosine for the hashed-text use case, but modeled as an enum
/// so inner-product and L2 spaces can be added without a format change.
/// All spaces return a distance where **lower is better**.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceSpace {
    /// Cosine distance: `1 - dot(a, b)` for unit vectors. Range: \[0, 2\].
    #[default]
    Cosine,
    /// Negative dot product: `-dot(a, b)`. Lower = higher similarity.
    InnerProduct,
    /// Squared Euclidean distance. Range: \[0, ∞).
    Euclidean,
}

impl DistanceSpace {
    /// Serialize to a single byte for the snapshot header
    pub fn to_byte(self) -> u8 {
        match self {
            DistanceSpace::Cosine => 0,
            DistanceSpace::InnerProduct => 1,
            DistanceSpace::Euclidean => 2,
        }
    }

    /// Deserialize from a snapshot header byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(DistanceSpace::Cosine),
            1 => Some(DistanceSpace::InnerProduct),
            2 => Some(DistanceSpace::Euclidean),
            _ => None,
        }
    }

    /// Parse from a space identifier string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Some(DistanceSpace::Cosine),
            "ip" | "dot" | "inner_product" => Some(DistanceSpace::InnerProduct),
            "l2" | "euclidean" => Some(DistanceSpace::Euclidean),
            _ => None,
        }
    }

    /// Canonical name of this space
    pub fn name(self) -> &'static str {
        match self {
            DistanceSpace::Cosine => "cosine",
            DistanceSpace::InnerProduct => "inner_product",
            DistanceSpace::Euclidean => "euclidean",
        }
    }

    /// Compute the distance between two equal-length vectors in this space
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "dimension mismatch in distance");
        match self {
            DistanceSpace::Cosine => crate::distance::cosine_distance(a, b),
            DistanceSpace::InnerProduct => -crate::distance::dot(a, b),
            DistanceSpace::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum(),
        }
    }
}

/// Configuration parameters for an index.
///
/// Controls the trade-off between build speed, search speed, recall, and
/// memory usage. Accepted as a parameter everywhere; never read from
/// globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Vector dimension; every stored and queried vector must match
    pub dims: usize,
    /// Number of bidirectional links per node (except layer 0)
    pub m: usize,
    /// Maximum links per node at layer 0 (typically `2 * m`)
    pub m_max0: usize,
    /// Candidate list size during construction
    pub ef_construction: usize,
    /// Candidate list size during search (higher = better recall, slower)
    pub ef_search: usize,
    /// Upper bound on the number of graph layers
    pub max_layers: usize,
    /// Distance space identifier
    pub space: DistanceSpace,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dims: DEFAULT_DIMS,
            m: DEFAULT_M,
            m_max0: DEFAULT_M * 2,
            ef_construction: DEFAULT_EF_CONSTRUCTION,
            ef_search: DEFAULT_EF_SEARCH,
            max_layers: DEFAULT_MAX_LAYERS,
            space: DistanceSpace::Cosine,
        }
    }
}

impl IndexConfig {
    /// Create a validated configuration with the given dimension and
    /// defaults for everything else
    pub fn new(dims: usize) -> ProximaResult<Self> {
        let config = IndexConfig {
            dims,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the per-node link budget (`m_max0` follows as `2 * m`)
    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self.m_max0 = m * 2;
        self
    }

    /// Override the construction beam width
    pub fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    /// Override the search beam width
    pub fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    /// Check parameter sanity; every constructor path goes through this
    pub fn validate(&self) -> ProximaResult<()> {
        if self.dims == 0 {
            return Err(ProximaError::invalid_input("dims must be > 0"));
        }
        // m >= 2 keeps the level multiplier 1/ln(m) finite
        if self.m < 2 {
            return Err(ProximaError::invalid_input("m must be >= 2"));
        }
        if self.m_max0 < self.m {
            return Err(ProximaError::invalid_input("m_max0 must be >= m"));
        }
        if self.ef_construction == 0 || self.ef_search == 0 {
            return Err(ProximaError::invalid_input(
                "ef_construction and ef_search must be > 0",
            ));
        }
        if self.max_layers == 0 {
            return Err(ProximaError::invalid_input("max_layers must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_byte_roundtrip() {
        for space in [
            DistanceSpace::Cosine,
            DistanceSpace::InnerProduct,
            DistanceSpace::Euclidean,
        ] {
            assert_eq!(DistanceSpace::from_byte(space.to_byte()), Some(space));
        }
        assert_eq!(DistanceSpace::from_byte(3), None);
        assert_eq!(DistanceSpace::from_byte(255), None);
    }

    #[test]
    fn test_space_parse() {
        assert_eq!(DistanceSpace::parse("cosine"), Some(DistanceSpace::Cosine));
        assert_eq!(DistanceSpace::parse("COSINE"), Some(DistanceSpace::Cosine));
        assert_eq!(
            DistanceSpace::parse("l2"),
            Some(DistanceSpace::Euclidean)
        );
        assert_eq!(
            DistanceSpace::parse("ip"),
            Some(DistanceSpace::InnerProduct)
        );
        assert_eq!(DistanceSpace::parse("hamming"), None);
    }

    #[test]
    fn test_space_name() {
        assert_eq!(DistanceSpace::Cosine.name(), "cosine");
        assert_eq!(DistanceSpace::default(), DistanceSpace::Cosine);
    }

    #[test]
    fn test_config_defaults() {
        let config = IndexConfig::new(128).unwrap();
        assert_eq!(config.dims, 128);
        assert_eq!(config.m, DEFAULT_M);
        assert_eq!(config.m_max0, DEFAULT_M * 2);
        assert_eq!(config.ef_construction, DEFAULT_EF_CONSTRUCTION);
        assert_eq!(config.ef_search, DEFAULT_EF_SEARCH);
        assert_eq!(config.space, DistanceSpace::Cosine);
    }

    #[test]
    fn test_config_zero_dims_rejected() {
        let result = IndexConfig::new(0);
        assert!(matches!(
            result,
            Err(crate::ProximaError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_config_small_m_rejected() {
        let config = IndexConfig::new(16).unwrap().with_m(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builders() {
        let config = IndexConfig::new(64)
            .unwrap()
            .with_m(8)
            .with_ef_construction(100)
            .with_ef_search(25);
        assert_eq!(config.m, 8);
        assert_eq!(config.m_max0, 16);
        assert_eq!(config.ef_construction, 100);
        assert_eq!(config.ef_search, 25);
        config.validate().unwrap();
    }

    #[test]
    fn test_euclidean_space_distance() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        let d = DistanceSpace::Euclidean.distance(&a, &b);
        assert!((d - 25.0).abs() < 1e-6);
    }
}
