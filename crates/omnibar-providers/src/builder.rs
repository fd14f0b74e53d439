//! Provider set builder.
//!
//! Maps an `(EngineSource, SuggestionFlags)` pair to the ordered set of
//! providers a session should query. Planning is a pure function over those
//! inputs; the builder only adds a factory lookup per planned kind. The result
//! always replaces the previous set wholesale, because sources change which
//! providers exist at all (a bookmarks source runs nothing but bookmarks).

use std::sync::Arc;

use omnibar_core::{Engine, EngineSource};

use crate::flags::SuggestionFlags;
use crate::provider::{HistoryScope, ProviderHandle, ProviderKind, ProviderSet};

/// Creates provider handles for planned kinds.
pub trait ProviderFactory: Send + Sync {
    /// Returns `None` when this factory cannot serve `kind`.
    fn create(&self, kind: &ProviderKind) -> Option<ProviderHandle>;
}

/// Ordered provider kinds for a source and flag bundle.
///
/// Unsupported sources (no engine, or an application engine outside its
/// dedicated variant) plan nothing.
pub fn plan(
    source: &EngineSource,
    flags: &SuggestionFlags,
    sponsored_regions: &[String],
) -> Vec<ProviderKind> {
    let settings = &flags.settings;
    let mut kinds = Vec::new();

    match source {
        EngineSource::None => {}
        EngineSource::Default(engine) => {
            if engine.is_application() {
                return kinds;
            }
            if settings.show_shortcut_suggestions {
                kinds.push(ProviderKind::ShortcutEngines);
            }
            push_engine_providers(&mut kinds, engine, flags);
            if settings.show_all_history {
                // Replaces the engine-scoped history provider.
                kinds.retain(|k| !matches!(k, ProviderKind::History(_)));
                kinds.push(ProviderKind::History(HistoryScope::All));
            }
            if settings.show_bookmarks {
                kinds.push(ProviderKind::Bookmarks);
            }
            if settings.show_open_tabs {
                kinds.push(ProviderKind::OpenTabs);
            }
            if settings.show_synced_tabs && !flags.private {
                kinds.push(ProviderKind::SyncedTabs);
            }
            let sponsored_region = sponsored_regions
                .iter()
                .any(|r| r.eq_ignore_ascii_case(&flags.region.home));
            if sponsored_region && !flags.private {
                if settings.show_sponsored {
                    kinds.push(ProviderKind::Sponsored);
                }
                if settings.show_non_sponsored {
                    kinds.push(ProviderKind::NonSponsored);
                }
            }
        }
        EngineSource::Shortcut(engine) => {
            if engine.is_application() {
                return kinds;
            }
            push_engine_providers(&mut kinds, engine, flags);
        }
        EngineSource::Bookmarks(_) => kinds.push(ProviderKind::Bookmarks),
        EngineSource::History(_) => kinds.push(ProviderKind::History(HistoryScope::All)),
        EngineSource::Tabs(_) => {
            kinds.push(ProviderKind::OpenTabs);
            if !flags.private {
                kinds.push(ProviderKind::SyncedTabs);
            }
        }
    }

    kinds
}

fn push_engine_providers(kinds: &mut Vec<ProviderKind>, engine: &Engine, flags: &SuggestionFlags) {
    if flags.settings.show_recent_searches {
        kinds.push(ProviderKind::SearchTermHistory);
    }
    if flags.search_suggestions_allowed() {
        kinds.push(ProviderKind::SearchSuggestions(engine.clone()));
    }
    if flags.settings.show_history_for_current_engine {
        kinds.push(ProviderKind::History(HistoryScope::Engine(engine.clone())));
    }
}

/// Builds provider sets through a [`ProviderFactory`].
#[derive(Clone)]
pub struct ProviderSetBuilder {
    factory: Arc<dyn ProviderFactory>,
    sponsored_regions: Vec<String>,
}

impl ProviderSetBuilder {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            factory,
            sponsored_regions: vec!["US".to_string()],
        }
    }

    /// Home regions where sponsored and non-sponsored providers may run.
    pub fn with_sponsored_regions(mut self, regions: Vec<String>) -> Self {
        self.sponsored_regions = regions;
        self
    }

    pub fn plan(&self, source: &EngineSource, flags: &SuggestionFlags) -> Vec<ProviderKind> {
        plan(source, flags, &self.sponsored_regions)
    }

    pub fn build(&self, source: &EngineSource, flags: &SuggestionFlags) -> ProviderSet {
        let kinds = self.plan(source, flags);
        let handles = kinds.iter().filter_map(|kind| {
            let handle = self.factory.create(kind);
            if handle.is_none() {
                tracing::debug!(provider = %kind, "No provider available for planned kind");
            }
            handle
        });
        ProviderSet::new(handles.collect::<Vec<_>>())
    }
}
