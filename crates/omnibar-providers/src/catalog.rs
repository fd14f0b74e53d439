//! In-memory provider factory backed by fixed data.
//!
//! Used by the binary and by tests. Matching is a plain case-insensitive
//! substring check; real providers bring their own matching.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use omnibar_core::{ClickOutcome, Engine, LoadUrlFlags, Suggestion, SuggestionFlag};
use serde::{Deserialize, Serialize};

use crate::builder::ProviderFactory;
use crate::provider::{HistoryScope, ProviderHandle, ProviderKind, SuggestionProvider};

/// A page reachable by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub url: String,
    pub title: String,
}

impl PageEntry {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.url, query) || contains_ignore_case(&self.title, query)
    }
}

/// An open tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    pub id: String,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub history: Vec<PageEntry>,
    pub bookmarks: Vec<PageEntry>,
    pub open_tabs: Vec<TabEntry>,
    pub synced_tabs: Vec<PageEntry>,
    pub recent_searches: Vec<String>,
    /// Terms offered as live engine suggestions.
    pub search_terms: Vec<String>,
    pub sponsored: Vec<PageEntry>,
    pub non_sponsored: Vec<PageEntry>,
    pub engines: Vec<Engine>,
}

/// Factory serving every provider kind from a shared [`CatalogData`].
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    data: Arc<CatalogData>,
}

impl StaticCatalog {
    pub fn new(data: CatalogData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

impl ProviderFactory for StaticCatalog {
    fn create(&self, kind: &ProviderKind) -> Option<ProviderHandle> {
        Some(Arc::new(StaticProvider {
            kind: kind.clone(),
            data: Arc::clone(&self.data),
        }))
    }
}

struct StaticProvider {
    kind: ProviderKind,
    data: Arc<CatalogData>,
}

impl StaticProvider {
    fn page_rows(&self, pages: &[PageEntry], query: &str, flag: SuggestionFlag) -> Vec<Suggestion> {
        let key = self.kind.key();
        pages
            .iter()
            .filter(|p| p.matches(query))
            .map(|p| page_suggestion(&key, p, flag))
            .collect()
    }

    fn term_rows(&self, terms: &[String], query: &str, engine: Option<&Engine>) -> Vec<Suggestion> {
        let key = self.kind.key();
        terms
            .iter()
            .filter(|t| contains_ignore_case(t, query))
            .map(|t| term_suggestion(&key, t, engine))
            .collect()
    }

    fn rows(&self, query: &str) -> Vec<Suggestion> {
        let data = &self.data;
        let key = self.kind.key();
        match &self.kind {
            ProviderKind::ShortcutEngines => data
                .engines
                .iter()
                .filter(|e| contains_ignore_case(&e.name, query))
                .map(|e| Suggestion::new(format!("{}:{}", key, e.id), key.clone(), e.name.clone()))
                .collect(),
            ProviderKind::SearchTermHistory => {
                let mut rows = self.term_rows(&data.recent_searches, query, None);
                for row in &mut rows {
                    row.flags.insert(SuggestionFlag::SearchTerm);
                }
                rows
            }
            ProviderKind::SearchSuggestions(engine) => {
                let mut terms = vec![query.to_string()];
                terms.extend(
                    data.search_terms
                        .iter()
                        .filter(|t| t.as_str() != query)
                        .cloned(),
                );
                self.term_rows(&terms, query, Some(engine))
            }
            ProviderKind::History(HistoryScope::All) => {
                self.page_rows(&data.history, query, SuggestionFlag::History)
            }
            ProviderKind::History(HistoryScope::Engine(engine)) => {
                let scoped: Vec<PageEntry> = data
                    .history
                    .iter()
                    .filter(|p| contains_ignore_case(&p.url, &engine.id))
                    .cloned()
                    .collect();
                self.page_rows(&scoped, query, SuggestionFlag::History)
            }
            ProviderKind::Bookmarks => {
                self.page_rows(&data.bookmarks, query, SuggestionFlag::Bookmark)
            }
            ProviderKind::OpenTabs => data
                .open_tabs
                .iter()
                .filter(|t| {
                    contains_ignore_case(&t.url, query) || contains_ignore_case(&t.title, query)
                })
                .map(|t| tab_suggestion(&key, t))
                .collect(),
            ProviderKind::SyncedTabs => {
                self.page_rows(&data.synced_tabs, query, SuggestionFlag::SyncedTab)
            }
            ProviderKind::Sponsored => {
                self.page_rows(&data.sponsored, query, SuggestionFlag::Sponsored)
            }
            ProviderKind::NonSponsored => {
                self.page_rows(&data.non_sponsored, query, SuggestionFlag::NonSponsored)
            }
        }
    }
}

impl SuggestionProvider for StaticProvider {
    fn kind(&self) -> &ProviderKind {
        &self.kind
    }

    fn fetch(&self, query: &str) -> BoxStream<'static, Suggestion> {
        if query.trim().is_empty() {
            return stream::empty().boxed();
        }
        stream::iter(self.rows(query)).boxed()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page_suggestion(key: &str, page: &PageEntry, flag: SuggestionFlag) -> Suggestion {
    let url = page.url.clone();
    Suggestion::new(format!("{}:{}", key, page.url), key, page.title.clone())
        .with_description(page.url.clone())
        .with_edit_text(page.url.clone())
        .with_flag(flag)
        .with_click_handler(move || {
            Some(ClickOutcome::LoadUrl {
                url: url.clone(),
                flags: LoadUrlFlags::none(),
            })
        })
}

fn term_suggestion(key: &str, term: &str, engine: Option<&Engine>) -> Suggestion {
    let terms = term.to_string();
    let engine = engine.cloned();
    Suggestion::new(format!("{}:{}", key, term), key, term)
        .with_edit_text(term)
        .with_click_handler(move || {
            Some(ClickOutcome::Search {
                terms: terms.clone(),
                engine: engine.clone(),
            })
        })
}

fn tab_suggestion(key: &str, tab: &TabEntry) -> Suggestion {
    let tab_id = tab.id.clone();
    Suggestion::new(format!("{}:{}", key, tab.id), key, tab.title.clone())
        .with_description(tab.url.clone())
        .with_edit_text(tab.url.clone())
        .with_flag(SuggestionFlag::OpenTab)
        .with_click_handler(move || {
            Some(ClickOutcome::SelectTab {
                tab_id: tab_id.clone(),
            })
        })
}
