//! Configuration for the toolkit CLI
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (toolkit.toml)
//! - Environment variables (TOOLKIT_*)
//!
//! ## Example config file (toolkit.toml):
//! ```toml
//! [data]
//! dir = "./data"
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the dataset lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Data directory; when unset the embedded dataset is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Default result cap for search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

/// JSON output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

fn default_search_limit() -> usize {
    10
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { dir: None }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            search_limit: default_search_limit(),
        }
    }
}

impl ToolkitConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["toolkit.toml", ".toolkit.toml", "config/toolkit.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("uk", "cbp", "toolkit") {
            let xdg_config = config_dir.config_dir().join("toolkit.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TOOLKIT")
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

    /// The data directory, resolved relative to the working directory
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data.dir.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(p)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolkitConfig::default();
        assert!(config.data.dir.is_none());
        assert_eq!(config.output.search_limit, 10);
    }

    #[test]
    fn test_serialize_config() {
        let config = ToolkitConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[output]"));
    }
}
