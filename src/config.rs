//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SCN_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use std::path::Path;

use scenescript_core::ManifestAssets;

use crate::scripts::ScriptKind;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which script to run and how
    #[serde(default)]
    pub scene: SceneConfig,
    /// Asset manifest
    #[serde(default)]
    pub assets: AssetConfig,
    /// Engine environment bootstrap
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SCN_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SCN_SCENE__SCRIPT=rotating_wall -> scene.script = "rotating_wall"
        figment = figment.merge(Env::prefixed("SCN_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Script selection and run options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Script to run
    pub script: ScriptKind,
    /// Scene length in frames
    pub length: u32,
    /// RNG seed; unset seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
    /// Where to write the RON recording; unset skips export
    #[serde(default)]
    pub output: Option<String>,
    /// Step a playhead through every frame after the script runs
    pub replay: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            script: ScriptKind::Buildings,
            length: 300,
            seed: None,
            output: None,
            replay: false,
        }
    }
}

/// Asset manifest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Face count of models not listed in `face_counts`
    pub default_face_count: u32,
    /// Face counts per `.obj` path
    #[serde(default)]
    pub face_counts: HashMap<String, u32>,
    /// Material names every material folder provides
    pub materials: Vec<String>,
    /// Reject models not listed in `face_counts`
    pub strict: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            default_face_count: 12,
            face_counts: HashMap::new(),
            materials: ["graybrick", "wood", "doors", "concrete", "leaf"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strict: false,
        }
    }
}

impl AssetConfig {
    /// Build the asset source described by this config
    pub fn to_manifest(&self) -> ManifestAssets {
        let base = if self.strict {
            ManifestAssets::strict()
        } else {
            ManifestAssets::new(self.default_face_count)
        };
        self.face_counts
            .iter()
            .fold(base, |manifest, (path, count)| manifest.with_model(path, *count))
            .with_materials(self.materials.iter().cloned())
    }
}

/// Engine environment bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Set the engine variables before running
    pub enabled: bool,
    /// Variable naming the engine's home directory
    pub home_var: String,
    /// Engine home directory
    pub home: String,
    /// Variable naming the engine's module search path
    pub path_var: String,
    /// Module search path; unset leaves the variable alone
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            home_var: "SCENESCRIPT_ENGINE_HOME".to_string(),
            home: String::new(),
            path_var: "SCENESCRIPT_ENGINE_PATH".to_string(),
            path: None,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescript_core::AssetSource;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scene.length, 300);
        assert_eq!(config.scene.script, ScriptKind::Buildings);
        assert!(config.scene.seed.is_none());
        assert!(!config.bootstrap.enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("script = \"buildings\""));
        assert!(toml.contains("default_face_count"));
    }

    #[test]
    fn test_manifest_from_config() {
        let mut assets = AssetConfig::default();
        assets.face_counts.insert("models/BUILDINGS/base.obj".to_string(), 40);
        let manifest = assets.to_manifest();

        let base = manifest
            .load_model(Path::new("models/BUILDINGS/base.obj"), Path::new(""), Path::new(""))
            .unwrap();
        assert_eq!(base.face_count, 40);
        assert_eq!(base.materials.len(), 5);

        let cube = manifest
            .load_model(Path::new("models/BUILDINGS/cube.obj"), Path::new(""), Path::new(""))
            .unwrap();
        assert_eq!(cube.face_count, 12);
    }

    #[test]
    fn test_strict_manifest_from_config() {
        let assets = AssetConfig {
            strict: true,
            ..AssetConfig::default()
        };
        let manifest = assets.to_manifest();
        assert!(manifest
            .load_model(Path::new("models/x.obj"), Path::new(""), Path::new(""))
            .is_err());
    }
}
