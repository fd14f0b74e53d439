//! Provider identity, the provider capability trait, and provider sets.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use omnibar_core::{Engine, Suggestion};

/// Which history a history provider searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryScope {
    All,
    /// Only visits to pages served by this engine.
    Engine(Engine),
}

/// Identity of a suggestion provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Offers the available engines as shortcut rows.
    ShortcutEngines,
    /// Past search terms.
    SearchTermHistory,
    /// Live suggestions from a search engine.
    SearchSuggestions(Engine),
    History(HistoryScope),
    Bookmarks,
    OpenTabs,
    SyncedTabs,
    Sponsored,
    NonSponsored,
}

impl ProviderKind {
    /// Stable string key, also stamped on every suggestion the provider emits.
    pub fn key(&self) -> String {
        match self {
            ProviderKind::ShortcutEngines => "shortcut_engines".to_string(),
            ProviderKind::SearchTermHistory => "search_term_history".to_string(),
            ProviderKind::SearchSuggestions(engine) => format!("search_suggestions:{}", engine.id),
            ProviderKind::History(HistoryScope::All) => "history".to_string(),
            ProviderKind::History(HistoryScope::Engine(engine)) => format!("history:{}", engine.id),
            ProviderKind::Bookmarks => "bookmarks".to_string(),
            ProviderKind::OpenTabs => "open_tabs".to_string(),
            ProviderKind::SyncedTabs => "synced_tabs".to_string(),
            ProviderKind::Sponsored => "sponsored".to_string(),
            ProviderKind::NonSponsored => "non_sponsored".to_string(),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A source of suggestions.
///
/// Implementations are supplied by the provider subsystem; the session only
/// ever holds them behind a [`ProviderHandle`].
pub trait SuggestionProvider: Send + Sync {
    fn kind(&self) -> &ProviderKind;

    /// Lazily produce suggestions for `query`.
    fn fetch(&self, query: &str) -> BoxStream<'static, Suggestion>;
}

/// Shared reference to a provider.
pub type ProviderHandle = Arc<dyn SuggestionProvider>;

/// Ordered set of providers, unique by [`ProviderKind`].
#[derive(Clone, Default)]
pub struct ProviderSet {
    handles: Vec<ProviderHandle>,
}

impl ProviderSet {
    /// Build a set, keeping the first handle for each kind.
    pub fn new(handles: impl IntoIterator<Item = ProviderHandle>) -> Self {
        let mut unique: Vec<ProviderHandle> = Vec::new();
        for handle in handles {
            if !unique.iter().any(|h| h.kind() == handle.kind()) {
                unique.push(handle);
            }
        }
        Self { handles: unique }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderHandle> {
        self.handles.iter()
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.handles.iter().map(|h| h.kind().clone()).collect()
    }

    pub fn contains(&self, kind: &ProviderKind) -> bool {
        self.handles.iter().any(|h| h.kind() == kind)
    }

    /// Query every provider in order and concatenate their output.
    pub async fn fetch_all(&self, query: &str) -> Vec<Suggestion> {
        let streams: Vec<_> = self.handles.iter().map(|h| h.fetch(query)).collect();
        stream::iter(streams).flatten().collect().await
    }
}

impl PartialEq for ProviderSet {
    fn eq(&self, other: &Self) -> bool {
        self.handles.len() == other.handles.len()
            && self
                .handles
                .iter()
                .zip(&other.handles)
                .all(|(a, b)| a.kind() == b.kind())
    }
}

impl fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handles.iter().map(|h| h.kind().key()))
            .finish()
    }
}
