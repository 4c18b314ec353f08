//! Engine settings the host persists alongside its kingdoms.

use std::fs;
use std::path::Path;

use km_mechanics::{CheckSettings, StdRoller, UnrestScale};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Configuration for running kingdom commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Add the kingdom level to untrained skills.
    pub always_add_level: bool,
    /// Use the Vance and Kerenshara experience rules for hexes and RP.
    pub vance_and_kerenshara_xp: bool,
    /// Unrest tiers for the unrest penalty.
    pub unrest_scale: UnrestScale,
    /// RNG seed for reproducible rolls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the always-add-level option.
    pub fn with_always_add_level(mut self, always: bool) -> Self {
        self.always_add_level = always;
        self
    }

    /// Set the homebrew XP option.
    pub fn with_vance_and_kerenshara_xp(mut self, enabled: bool) -> Self {
        self.vance_and_kerenshara_xp = enabled;
        self
    }

    /// Use custom unrest tiers.
    pub fn with_unrest_scale(mut self, scale: UnrestScale) -> Self {
        self.unrest_scale = scale;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// The settings check preparation needs.
    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings {
            always_add_level: self.always_add_level,
            unrest_scale: self.unrest_scale.clone(),
        }
    }

    /// A roller seeded from the config, or from the OS when no seed is set.
    pub fn roller(&self) -> StdRoller {
        StdRoller::new(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert!(!cfg.always_add_level);
        assert!(!cfg.vance_and_kerenshara_xp);
        assert_eq!(cfg.unrest_scale.thresholds(), &[1, 5, 10, 15]);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_always_add_level(true)
            .with_seed(Some(7))
            .with_unrest_scale(UnrestScale::new(vec![10, 20]));
        assert!(cfg.check_settings().always_add_level);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.check_settings().unrest_scale.penalty(15), 1);
    }

    #[test]
    fn loads_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"vanceAndKerensharaXp": true, "unrestScale": [2, 4]}"#).unwrap();
        let cfg = EngineConfig::from_json_file(&path).unwrap();
        assert!(cfg.vance_and_kerenshara_xp);
        assert!(!cfg.always_add_level);
        assert_eq!(cfg.unrest_scale.thresholds(), &[2, 4]);
    }
}
