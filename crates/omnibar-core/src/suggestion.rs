//! Suggestions produced by providers and the values their click handlers return.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::Engine;

/// Closed set of tags a provider can attach to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionFlag {
    History,
    Bookmark,
    OpenTab,
    SyncedTab,
    Clipboard,
    Sponsored,
    NonSponsored,
    SearchTerm,
}

/// Engine session flags forwarded with a URL load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadUrlFlags(u32);

impl LoadUrlFlags {
    pub const EXTERNAL: LoadUrlFlags = LoadUrlFlags(1);
    pub const ALLOW_POPUPS: LoadUrlFlags = LoadUrlFlags(1 << 1);
    pub const BYPASS_CACHE: LoadUrlFlags = LoadUrlFlags(1 << 2);
    pub const BYPASS_PROXY: LoadUrlFlags = LoadUrlFlags(1 << 3);
    pub const ALLOW_JAVASCRIPT_URL: LoadUrlFlags = LoadUrlFlags(1 << 4);

    const ALL_BITS: u32 = (1 << 5) - 1;

    pub const fn none() -> Self {
        LoadUrlFlags(0)
    }

    pub const fn all() -> Self {
        LoadUrlFlags(Self::ALL_BITS)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: LoadUrlFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: LoadUrlFlags) -> Self {
        LoadUrlFlags(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LoadUrlFlags {
    type Output = LoadUrlFlags;

    fn bitor(self, rhs: LoadUrlFlags) -> LoadUrlFlags {
        self.union(rhs)
    }
}

/// Terminal request a suggestion's click handler may hand back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    LoadUrl { url: String, flags: LoadUrlFlags },
    Search { terms: String, engine: Option<Engine> },
    SelectTab { tab_id: String },
}

/// Opaque click capability attached by a provider.
pub type ClickHandler = Arc<dyn Fn() -> Option<ClickOutcome> + Send + Sync>;

/// A single suggestion row.
#[derive(Clone)]
pub struct Suggestion {
    pub id: String,
    /// Key of the provider that produced this suggestion.
    pub provider_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Literal text placed in the edit box when the row is selected for editing.
    pub edit_text: Option<String>,
    pub flags: BTreeSet<SuggestionFlag>,
    pub on_click: Option<ClickHandler>,
}

impl Suggestion {
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            title: title.into(),
            description: None,
            edit_text: None,
            flags: BTreeSet::new(),
            on_click: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_edit_text(mut self, text: impl Into<String>) -> Self {
        self.edit_text = Some(text.into());
        self
    }

    pub fn with_flag(mut self, flag: SuggestionFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn with_click_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn() -> Option<ClickOutcome> + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }

    pub fn has_flag(&self, flag: SuggestionFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Run the attached click handler, if any.
    pub fn click(&self) -> Option<ClickOutcome> {
        self.on_click.as_ref().and_then(|handler| handler())
    }
}

impl fmt::Debug for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suggestion")
            .field("id", &self.id)
            .field("provider_id", &self.provider_id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("edit_text", &self.edit_text)
            .field("flags", &self.flags)
            .field("has_click_handler", &self.on_click.is_some())
            .finish()
    }
}

// Click handlers have no identity; two rows are equal when their data is.
impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.provider_id == other.provider_id
            && self.title == other.title
            && self.description == other.description
            && self.edit_text == other.edit_text
            && self.flags == other.flags
    }
}
