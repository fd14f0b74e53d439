//! Suggestion providers and the builder that picks which ones a session runs.

pub mod builder;
pub mod catalog;
pub mod flags;
pub mod provider;

pub use builder::{plan, ProviderFactory, ProviderSetBuilder};
pub use catalog::{CatalogData, PageEntry, StaticCatalog, TabEntry};
pub use flags::SuggestionFlags;
pub use provider::{HistoryScope, ProviderHandle, ProviderKind, ProviderSet, SuggestionProvider};
