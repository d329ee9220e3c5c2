//! Engine-wide configuration.

use facecrate_reconstruction::ReconstructionConfig;
use facecrate_repair::RepairParams;
use facecrate_simplification::DecimateParams;
use serde::{Deserialize, Serialize};

/// Every tunable of the engine in one place, held by a
/// [`GeometryRecord`](crate::GeometryRecord).
///
/// Missing sections fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub repair: RepairParams,
    pub reconstruction: ReconstructionConfig,
    pub decimation: DecimateParams,
}

impl EngineConfig {
    pub fn with_repair(mut self, repair: RepairParams) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_reconstruction(mut self, reconstruction: ReconstructionConfig) -> Self {
        self.reconstruction = reconstruction;
        self
    }

    pub fn with_decimation(mut self, decimation: DecimateParams) -> Self {
        self.decimation = decimation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let json = r#"{ "decimation": { "boundary_weight": 0.5, "preserve_boundary": true,
            "max_error": null, "max_normal_flip": 1.0, "min_triangles": 8, "max_reduction": 0.9 } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert!(config.decimation.preserve_boundary);
        assert_eq!(config.decimation.min_triangles, 8);
        assert_eq!(config.repair, RepairParams::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default().with_decimation(DecimateParams::conservative());
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
