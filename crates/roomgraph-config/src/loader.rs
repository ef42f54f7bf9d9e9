//! Configuration loading utilities.

use crate::Config;
use roomgraph_common::{Result as RoomGraphResult, RoomGraphError};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File names searched in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["roomgraph.yaml", "roomgraph.yml", "roomgraph.toml"];

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file.
    #[error("Failed to read configuration file '{path}': {source}")]
    IoError {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error.
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The file extension names no supported format.
    #[error("Unsupported configuration format '{0}', expected .yaml, .yml or .toml")]
    UnsupportedFormat(String),

    /// Environment variable parsing error.
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// What was wrong with the value.
        message: String,
    },
}

impl From<ConfigError> for RoomGraphError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", err)
    }
}

/// Configuration loader for the application.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable
    /// overrides, then validate it.
    pub fn load_config<P: AsRef<Path>>(path: P) -> RoomGraphResult<Config> {
        let path = path.as_ref();
        let mut config = Self::parse_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        info!(path = %path.display(), rooms = config.rooms.len(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from `ROOMGRAPH_CONFIG`, one of the default file
    /// names, or fall back to defaults. Environment overrides apply in every
    /// case.
    pub fn load() -> RoomGraphResult<Config> {
        if let Ok(config_path) = env::var("ROOMGRAPH_CONFIG") {
            return Self::load_config(config_path);
        }
        if let Some(path) = DEFAULT_CONFIG_FILES.iter().map(Path::new).find(|p| p.exists()) {
            return Self::load_config(path);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a string in the given format.
    pub fn from_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        match format {
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
        }
    }

    fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content, format)
    }

    /// Apply environment variable overrides to configuration.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(source) = env::var("ROOMGRAPH_SOURCE") {
            config.source.path = PathBuf::from(source);
        }

        if let Ok(rooms) = env::var("ROOMGRAPH_ROOMS") {
            config.rooms = rooms
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(timezone) = env::var("ROOMGRAPH_TIMEZONE") {
            config.business_hours.timezone = timezone;
        }

        if let Ok(root) = env::var("ROOMGRAPH_OUTPUT_ROOT") {
            config.output.root = PathBuf::from(root);
        }

        if let Ok(filter) = env::var("ROOMGRAPH_FILTER") {
            config.business_hours.enabled = parse_bool(&filter).ok_or_else(|| {
                ConfigError::EnvParseError {
                    var: "ROOMGRAPH_FILTER".to_string(),
                    message: format!("'{filter}' is not a boolean"),
                }
            })?;
        }

        if let Ok(level) = env::var("ROOMGRAPH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
