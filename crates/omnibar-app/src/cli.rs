//! CLI argument definitions for the omnibar binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Omnibar: drive an interactive address-bar search session from the terminal.
#[derive(Parser, Debug)]
#[command(name = "omnibar", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Start a private browsing session.
    #[arg(long = "private")]
    pub private: bool,

    /// Engine id to preselect as a shortcut for this session.
    #[arg(short = 'e', long = "engine")]
    pub engine: Option<String>,

    /// URL of the page the session starts from.
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// JSON file with suggestion data (history, bookmarks, tabs, terms).
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > OMNIBAR_CONFIG env var > ~/.omnibar/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("OMNIBAR_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        match &self.log_level {
            Some(level) => level.clone(),
            None if !config_level.is_empty() => config_level.to_string(),
            None => "info".to_string(),
        }
    }
}

fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".omnibar").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".omnibar").join("config.toml");
    }
    PathBuf::from("config.toml")
}
