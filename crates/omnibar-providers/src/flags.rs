use omnibar_core::{Region, SuggestionSettings};

/// Everything besides the engine source that decides which providers run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SuggestionFlags {
    pub settings: SuggestionSettings,
    pub region: Region,
    /// Private browsing sessions never surface synced or sponsored content.
    pub private: bool,
}

impl SuggestionFlags {
    pub fn new(settings: SuggestionSettings, region: Region, private: bool) -> Self {
        Self {
            settings,
            region,
            private,
        }
    }

    /// Whether the active engine may be asked for live suggestions.
    pub fn search_suggestions_allowed(&self) -> bool {
        self.settings.show_search_suggestions
            && (!self.private || self.settings.show_search_suggestions_in_private)
    }

    /// Same flags with different settings.
    pub fn with_settings(&self, settings: SuggestionSettings) -> Self {
        Self {
            settings,
            ..self.clone()
        }
    }
}
