//! Command line interface.

use clap::Parser;
use roomgraph_common::Result;
use roomgraph_config::{Config, ConfigLoader};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Default, Parser)]
#[command(name = "roomgraph")]
#[command(version)]
#[command(about = "Clean exported room device counts and render time-series charts", long_about = None)]
pub struct Cli {
    /// Exported CSV file; overrides `source.path` from the configuration
    pub source: Option<PathBuf>,

    /// Configuration file (.yaml, .yml or .toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Room to analyse; repeat to list several. Replaces the configured rooms
    #[arg(short, long = "room", value_name = "ID")]
    pub rooms: Vec<String>,

    /// Skip the business-hours chart variant
    #[arg(long)]
    pub no_filter: bool,

    /// Root directory of the chart tree
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Log level filter, e.g. `info` or `roomgraph_data=debug`
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Loads the configuration named on the command line, or searches the
    /// default locations, then applies the command line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_config(path)?,
            None => ConfigLoader::load()?,
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Applies the command line overrides to a configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source.path.clone_from(source);
        }
        if !self.rooms.is_empty() {
            config.rooms.clone_from(&self.rooms);
        }
        if self.no_filter {
            config.business_hours.enabled = false;
        }
        if let Some(output) = &self.output {
            config.output.root.clone_from(output);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "roomgraph",
            "raum.csv",
            "--room",
            "625",
            "-r",
            "640",
            "--no-filter",
            "--output",
            "charts",
            "--log-level",
            "debug",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.source.path, PathBuf::from("raum.csv"));
        assert_eq!(config.rooms, vec!["625", "640"]);
        assert!(!config.business_hours.enabled);
        assert_eq!(config.output.root, PathBuf::from("charts"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_no_arguments_keep_configuration() {
        let cli = Cli::parse_from(["roomgraph"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.rooms.len(), 3);
        assert!(config.business_hours.enabled);
    }
}
