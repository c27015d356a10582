//! Configuration for the record store
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (cyberdem.toml)
//! - Environment variables (CYBERDEM__*)
//!
//! ## Example config file (cyberdem.toml):
//! ```toml
//! [store]
//! path = "./test-fs"
//! output_format = "pretty"
//! atomic_writes = true
//!
//! [validation]
//! strict_enum_case = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::StoreOptions;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CyberDemConfig {
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the store
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// How record files are formatted
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Write through a temporary file and rename into place
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
}

/// Output format for record files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject enum values whose casing differs from the canonical option on save
    #[serde(default)]
    pub strict_enum_case: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./cyberdem-fs")
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            output_format: OutputFormat::Pretty,
            atomic_writes: true,
        }
    }
}

impl CyberDemConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["cyberdem.toml", ".cyberdem.toml", "config/cyberdem.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("org", "cyberdem", "cyberdem") {
            let xdg_config = config_dir.config_dir().join("cyberdem.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // CYBERDEM__STORE__PATH=/data/fs
        builder = builder.add_source(
            Environment::with_prefix("CYBERDEM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Store root (resolves relative paths against the working directory)
    pub fn store_path(&self) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.store.path)
        }
    }

    /// Options for [`crate::Store::open_with`]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            output_format: self.store.output_format,
            atomic_writes: self.store.atomic_writes,
            strict_enum_case: self.validation.strict_enum_case,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CyberDemConfig::default();
        assert!(config.store.atomic_writes);
        assert!(!config.validation.strict_enum_case);
        assert_eq!(config.store.output_format, OutputFormat::Pretty);
    }

    #[test]
    fn test_serialize_config() {
        let config = CyberDemConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[validation]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[store]\npath = \"/srv/fs\"\noutput_format = \"compact\"\n\n[validation]\nstrict_enum_case = true\n",
        )
        .unwrap();

        let config = CyberDemConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/srv/fs"));
        assert_eq!(config.store_path(), PathBuf::from("/srv/fs"));

        let options = config.store_options();
        assert_eq!(options.output_format, OutputFormat::Compact);
        assert!(options.strict_enum_case);
        assert!(options.atomic_writes);
    }
}
