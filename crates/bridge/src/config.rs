use glam::Vec3;
use roadster_common::EntityKind;
use roadster_input::KeyBindings;
use roadster_terrain::TerrainParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a snapshot reports a kind the catalog does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKindPolicy {
    /// Abort the frame's reconciliation with `UnknownEntityKind`.
    #[default]
    Fail,
    /// Log a warning and leave that entity without a visual.
    Skip,
}

/// What to do with nodes whose entity is missing from the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleNodePolicy {
    /// Entities are append-only for the session; nodes are never removed.
    #[default]
    Retain,
    /// Remove entity nodes absent from the snapshot. Terrain is kept.
    Prune,
}

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Bridge configuration. Every field has a default, so a partial YAML file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub unknown_kind_policy: UnknownKindPolicy,
    pub stale_nodes: StaleNodePolicy,
    /// Entity kind the camera follows.
    pub player_kind: EntityKind,
    /// Camera eye offset from the followed entity.
    pub camera_offset: Vec3,
    pub terrain: TerrainParams,
    pub key_bindings: KeyBindings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            unknown_kind_policy: UnknownKindPolicy::default(),
            stale_nodes: StaleNodePolicy::default(),
            player_kind: EntityKind::Car,
            camera_offset: Vec3::new(-100.0, 100.0, -100.0),
            terrain: TerrainParams::default(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.camera_offset.is_finite() {
            return Err(ConfigError::Invalid("camera_offset must be finite".into()));
        }
        let t = &self.terrain;
        if !(t.world_width > 0.0 && t.world_depth > 0.0 && t.height_scale.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "terrain extent must be positive, got {} x {}",
                t.world_width, t.world_depth
            )));
        }
        Ok(())
    }
}
