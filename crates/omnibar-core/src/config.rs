use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{OmnibarError, Result};
use crate::types::{Engine, EngineType, Region, SearchEngines};

/// Top-level configuration for the omnibar.
///
/// Loaded from `~/.omnibar/config.toml` by default. Missing sections fall back
/// to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OmnibarConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub engines: EnginesConfig,
}

impl OmnibarConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OmnibarConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| OmnibarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Build the engine registry snapshot described by this configuration.
    pub fn search_engines(&self) -> SearchEngines {
        SearchEngines {
            region: self.search.region(),
            region_engines: self.engines.region.clone(),
            custom_engines: self.engines.custom.clone(),
            additional_engines: self.engines.additional.clone(),
            additional_available_engines: Vec::new(),
            hidden_engines: self.engines.hidden.clone(),
            region_default_engine_id: self.engines.region_default.clone(),
            user_selected_engine_id: self.search.default_engine_id.clone(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Search session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Home region code.
    pub region_home: String,
    /// Region the device is currently in.
    pub region_current: String,
    /// Engine id the user picked as default. Overrides the region default.
    pub default_engine_id: Option<String>,
    /// Window for coalescing toolbar query echoes, in milliseconds.
    pub query_debounce_ms: u64,
    /// Home regions where sponsored and non-sponsored suggestions are offered.
    pub sponsored_regions: Vec<String>,
}

impl SearchConfig {
    pub fn region(&self) -> Region {
        Region::new(self.region_home.clone(), self.region_current.clone())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            region_home: "US".to_string(),
            region_current: "US".to_string(),
            default_engine_id: None,
            query_debounce_ms: 0,
            sponsored_regions: vec!["US".to_string()],
        }
    }
}

/// Per-surface suggestion toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    pub show_search_suggestions: bool,
    pub show_search_suggestions_in_private: bool,
    pub show_history_for_current_engine: bool,
    pub show_all_history: bool,
    pub show_bookmarks: bool,
    pub show_open_tabs: bool,
    pub show_synced_tabs: bool,
    pub show_sponsored: bool,
    pub show_non_sponsored: bool,
    pub show_shortcut_suggestions: bool,
    pub show_recent_searches: bool,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            show_search_suggestions: true,
            show_search_suggestions_in_private: false,
            show_history_for_current_engine: true,
            show_all_history: false,
            show_bookmarks: true,
            show_open_tabs: true,
            show_synced_tabs: true,
            show_sponsored: true,
            show_non_sponsored: true,
            show_shortcut_suggestions: false,
            show_recent_searches: true,
        }
    }
}

/// Engine registry seed used when no platform registry is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginesConfig {
    pub region_default: Option<String>,
    pub region: Vec<Engine>,
    pub custom: Vec<Engine>,
    pub additional: Vec<Engine>,
    pub hidden: Vec<Engine>,
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            region_default: Some("duckduckgo".to_string()),
            region: vec![
                Engine::new("duckduckgo", "DuckDuckGo", EngineType::Bundled),
                Engine::new("wikipedia", "Wikipedia", EngineType::Bundled),
                Engine::new("ecosia", "Ecosia", EngineType::Bundled),
            ],
            custom: Vec::new(),
            additional: Vec::new(),
            hidden: Vec::new(),
        }
    }
}
