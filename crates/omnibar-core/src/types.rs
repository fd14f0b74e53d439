use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Engines
// =============================================================================

/// Id of the built-in engine that searches bookmarks.
pub const BOOKMARKS_ENGINE_ID: &str = "bookmarks";
/// Id of the built-in engine that searches browsing history.
pub const HISTORY_ENGINE_ID: &str = "history";
/// Id of the built-in engine that searches open tabs.
pub const TABS_ENGINE_ID: &str = "tabs";

/// Where a search engine definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    /// Shipped with the browser for the current region.
    Bundled,
    /// Shipped with the browser but installed on demand.
    BundledAdditional,
    /// Added by the user.
    Custom,
    /// A capability of the application itself (bookmarks, history, tabs).
    Application,
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineType::Bundled => write!(f, "bundled"),
            EngineType::BundledAdditional => write!(f, "bundled_additional"),
            EngineType::Custom => write!(f, "custom"),
            EngineType::Application => write!(f, "application"),
        }
    }
}

/// A search engine as supplied by the engine registry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Engine {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub engine_type: EngineType,
}

impl Engine {
    pub fn new(id: impl Into<String>, name: impl Into<String>, engine_type: EngineType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            engine_type,
        }
    }

    /// The built-in bookmarks engine.
    pub fn bookmarks() -> Self {
        Self::new(BOOKMARKS_ENGINE_ID, "Bookmarks", EngineType::Application)
    }

    /// The built-in history engine.
    pub fn history() -> Self {
        Self::new(HISTORY_ENGINE_ID, "History", EngineType::Application)
    }

    /// The built-in open tabs engine.
    pub fn tabs() -> Self {
        Self::new(TABS_ENGINE_ID, "Tabs", EngineType::Application)
    }

    pub fn is_application(&self) -> bool {
        self.engine_type == EngineType::Application
    }

    /// Canonical name used when recording telemetry about this engine.
    ///
    /// User-defined engines are collapsed to `"custom"` so their names never
    /// leave the device.
    pub fn telemetry_name(&self) -> String {
        match self.engine_type {
            EngineType::Custom => "custom".to_string(),
            EngineType::Application => match self.id.as_str() {
                BOOKMARKS_ENGINE_ID | HISTORY_ENGINE_ID | TABS_ENGINE_ID => self.id.clone(),
                _ => "application".to_string(),
            },
            EngineType::Bundled | EngineType::BundledAdditional => self.name.to_lowercase(),
        }
    }
}

/// Which capability or engine currently answers queries.
///
/// Exactly one variant is active for a session; switching engines always
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "engine", rename_all = "snake_case")]
pub enum EngineSource {
    /// No engine could be resolved. Builds an empty provider set.
    None,
    /// The region or user default engine.
    Default(Engine),
    /// An engine picked for this session only.
    Shortcut(Engine),
    Bookmarks(Engine),
    History(Engine),
    Tabs(Engine),
}

impl EngineSource {
    /// Source for an engine the user picked explicitly.
    ///
    /// The built-in application engines map onto their dedicated variants;
    /// every other engine becomes a shortcut.
    pub fn for_chosen(engine: Engine) -> Self {
        if engine.is_application() {
            match engine.id.as_str() {
                BOOKMARKS_ENGINE_ID => return EngineSource::Bookmarks(engine),
                HISTORY_ENGINE_ID => return EngineSource::History(engine),
                TABS_ENGINE_ID => return EngineSource::Tabs(engine),
                _ => {}
            }
        }
        EngineSource::Shortcut(engine)
    }

    /// Source for the default engine, or `None` when there is none.
    pub fn for_default(engine: Option<Engine>) -> Self {
        match engine {
            Some(engine) => EngineSource::Default(engine),
            None => EngineSource::None,
        }
    }

    pub fn engine(&self) -> Option<&Engine> {
        match self {
            EngineSource::None => None,
            EngineSource::Default(e)
            | EngineSource::Shortcut(e)
            | EngineSource::Bookmarks(e)
            | EngineSource::History(e)
            | EngineSource::Tabs(e) => Some(e),
        }
    }

    /// Short label used in telemetry sources and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EngineSource::None => "none",
            EngineSource::Default(_) => "default",
            EngineSource::Shortcut(_) => "shortcut",
            EngineSource::Bookmarks(_) => "bookmarks",
            EngineSource::History(_) => "history",
            EngineSource::Tabs(_) => "tabs",
        }
    }
}

impl fmt::Display for EngineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.engine() {
            Some(engine) => write!(f, "{}({})", self.label(), engine.id),
            None => write!(f, "{}", self.label()),
        }
    }
}

// =============================================================================
// Engine registry
// =============================================================================

/// Home and current region as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub home: String,
    pub current: String,
}

impl Region {
    pub fn new(home: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            current: current.into(),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new("XX", "XX")
    }
}

/// Snapshot of the engine registry held by the global browser store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchEngines {
    pub region: Region,
    pub region_engines: Vec<Engine>,
    pub custom_engines: Vec<Engine>,
    pub additional_engines: Vec<Engine>,
    /// Additional engines the user could install but has not.
    pub additional_available_engines: Vec<Engine>,
    pub hidden_engines: Vec<Engine>,
    pub region_default_engine_id: Option<String>,
    pub user_selected_engine_id: Option<String>,
}

impl SearchEngines {
    /// Engines eligible for shortcut selection, in display order.
    pub fn available(&self) -> Vec<Engine> {
        self.region_engines
            .iter()
            .chain(&self.custom_engines)
            .chain(&self.additional_engines)
            .cloned()
            .collect()
    }

    /// Find an installed engine by id.
    pub fn find(&self, id: &str) -> Option<&Engine> {
        self.region_engines
            .iter()
            .chain(&self.custom_engines)
            .chain(&self.additional_engines)
            .find(|e| e.id == id)
    }

    /// The user's selected engine, falling back to the region default and
    /// then to the first region engine.
    pub fn selected_or_default(&self) -> Option<Engine> {
        if let Some(engine) = self
            .user_selected_engine_id
            .as_deref()
            .and_then(|id| self.find(id))
        {
            return Some(engine.clone());
        }
        if let Some(engine) = self
            .region_default_engine_id
            .as_deref()
            .and_then(|id| self.region_engines.iter().find(|e| e.id == id))
        {
            return Some(engine.clone());
        }
        self.region_engines.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SearchEngines {
        SearchEngines {
            region: Region::new("US", "US"),
            region_engines: vec![
                Engine::new("engine-a", "Engine A", EngineType::Bundled),
                Engine::new("engine-b", "Engine B", EngineType::Bundled),
            ],
            custom_engines: vec![Engine::new("engine-d", "Engine D", EngineType::Custom)],
            additional_engines: vec![Engine::new(
                "engine-f",
                "Engine F",
                EngineType::BundledAdditional,
            )],
            additional_available_engines: vec![Engine::new(
                "engine-g",
                "Engine G",
                EngineType::BundledAdditional,
            )],
            hidden_engines: vec![Engine::new("engine-i", "Engine I", EngineType::Bundled)],
            region_default_engine_id: Some("engine-b".to_string()),
            user_selected_engine_id: None,
        }
    }

    #[test]
    fn test_selected_or_default_uses_region_default() {
        let engines = registry();
        assert_eq!(engines.selected_or_default().unwrap().name, "Engine B");
    }

    #[test]
    fn test_selected_or_default_prefers_user_selection() {
        let mut engines = registry();
        engines.user_selected_engine_id = Some("engine-d".to_string());
        assert_eq!(engines.selected_or_default().unwrap().id, "engine-d");
    }

    #[test]
    fn test_selected_or_default_ignores_unknown_user_selection() {
        let mut engines = registry();
        engines.user_selected_engine_id = Some("engine-i".to_string());
        assert_eq!(engines.selected_or_default().unwrap().id, "engine-b");
    }

    #[test]
    fn test_selected_or_default_falls_back_to_first_region_engine() {
        let mut engines = registry();
        engines.region_default_engine_id = Some("missing".to_string());
        assert_eq!(engines.selected_or_default().unwrap().id, "engine-a");
    }

    #[test]
    fn test_selected_or_default_empty_registry() {
        assert!(SearchEngines::default().selected_or_default().is_none());
    }

    #[test]
    fn test_available_excludes_hidden_and_uninstalled() {
        let ids: Vec<String> = registry().available().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["engine-a", "engine-b", "engine-d", "engine-f"]);
    }

    #[test]
    fn test_telemetry_names() {
        assert_eq!(
            Engine::new("engine-a", "Engine A", EngineType::Bundled).telemetry_name(),
            "engine a"
        );
        assert_eq!(
            Engine::new("x", "My Wiki", EngineType::Custom).telemetry_name(),
            "custom"
        );
        assert_eq!(Engine::bookmarks().telemetry_name(), "bookmarks");
        assert_eq!(
            Engine::new("reader", "Reader", EngineType::Application).telemetry_name(),
            "application"
        );
    }

    #[test]
    fn test_source_for_chosen_engine() {
        assert!(matches!(
            EngineSource::for_chosen(Engine::bookmarks()),
            EngineSource::Bookmarks(_)
        ));
        assert!(matches!(
            EngineSource::for_chosen(Engine::history()),
            EngineSource::History(_)
        ));
        assert!(matches!(
            EngineSource::for_chosen(Engine::tabs()),
            EngineSource::Tabs(_)
        ));
        assert!(matches!(
            EngineSource::for_chosen(Engine::new("e", "E", EngineType::BundledAdditional)),
            EngineSource::Shortcut(_)
        ));
        // A custom engine that happens to reuse a built-in id is still a shortcut.
        assert!(matches!(
            EngineSource::for_chosen(Engine::new("bookmarks", "B", EngineType::Custom)),
            EngineSource::Shortcut(_)
        ));
    }

    #[test]
    fn test_source_display() {
        let source = EngineSource::Default(Engine::new("engine-b", "B", EngineType::Bundled));
        assert_eq!(source.to_string(), "default(engine-b)");
        assert_eq!(EngineSource::None.to_string(), "none");
    }
}
