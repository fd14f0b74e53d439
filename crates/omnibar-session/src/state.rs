//! Session state and its lifecycle phases.

use omnibar_core::{Engine, EngineSource, SuggestionSettings};
use omnibar_providers::{ProviderSet, SuggestionFlags};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle phase of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Active,
    Terminated,
}

impl SessionPhase {
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        matches!(
            (self, target),
            (SessionPhase::Uninitialized, SessionPhase::Active)
                | (SessionPhase::Active, SessionPhase::Terminated)
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Uninitialized => write!(f, "uninitialized"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Terminated => write!(f, "terminated"),
        }
    }
}

/// Everything the UI renders for a search session.
///
/// Owned by the orchestrator. Everyone else sees clones published after each
/// event.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub query: String,
    pub engine_source: EngineSource,
    pub default_engine: Option<Engine>,
    /// Engines eligible for shortcut selection.
    pub available_engines: Vec<Engine>,
    pub providers: ProviderSet,
    pub suggestions_visible: bool,
    /// URL of the page the session started from.
    pub context_url: String,
    pub is_private: bool,
    /// Flags the current provider set was requested for.
    pub flags: SuggestionFlags,
    /// Generation of the most recent rebuild request.
    pub generation: u64,
    pub rebuild_in_flight: Option<u64>,
}

impl SessionState {
    pub fn new(settings: SuggestionSettings) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            phase: SessionPhase::Uninitialized,
            query: String::new(),
            engine_source: EngineSource::None,
            default_engine: None,
            available_engines: Vec::new(),
            providers: ProviderSet::empty(),
            suggestions_visible: false,
            context_url: String::new(),
            is_private: false,
            flags: SuggestionFlags {
                settings,
                ..SuggestionFlags::default()
            },
            generation: 0,
            rebuild_in_flight: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }

    pub fn shortcuts_available(&self) -> bool {
        !self.available_engines.is_empty()
    }

    /// A query is worth suggesting for when it is non-empty and is not just
    /// the URL of the page the session started from.
    pub fn query_wants_suggestions(&self) -> bool {
        !self.query.is_empty() && self.query != self.context_url
    }

    pub(crate) fn transition(&mut self, target: SessionPhase) -> bool {
        if !self.phase.can_transition_to(&target) {
            return false;
        }
        tracing::debug!(
            session_id = %self.session_id,
            from = %self.phase,
            to = %target,
            "Session phase transition"
        );
        self.phase = target;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert!(SessionPhase::Uninitialized.can_transition_to(&SessionPhase::Active));
        assert!(SessionPhase::Active.can_transition_to(&SessionPhase::Terminated));
        assert!(!SessionPhase::Uninitialized.can_transition_to(&SessionPhase::Terminated));
        assert!(!SessionPhase::Terminated.can_transition_to(&SessionPhase::Active));
        assert!(!SessionPhase::Active.can_transition_to(&SessionPhase::Active));
    }

    #[test]
    fn test_new_state_is_uninitialized() {
        let state = SessionState::new(SuggestionSettings::default());
        assert_eq!(state.phase, SessionPhase::Uninitialized);
        assert_eq!(state.engine_source, EngineSource::None);
        assert!(state.providers.is_empty());
        assert!(!state.suggestions_visible);
        assert!(!state.shortcuts_available());
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_query_wants_suggestions() {
        let mut state = SessionState::new(SuggestionSettings::default());
        state.context_url = "https://example.com".to_string();
        assert!(!state.query_wants_suggestions());

        state.query = "https://example.com".to_string();
        assert!(!state.query_wants_suggestions());

        state.query = "https://example.com/about".to_string();
        assert!(state.query_wants_suggestions());
    }

    #[test]
    fn test_transition_rejects_invalid_moves() {
        let mut state = SessionState::new(SuggestionSettings::default());
        assert!(!state.transition(SessionPhase::Terminated));
        assert!(state.transition(SessionPhase::Active));
        assert!(state.transition(SessionPhase::Terminated));
        assert!(!state.transition(SessionPhase::Active));
        assert!(state.is_terminated());
    }

    #[test]
    fn test_phase_serde() {
        let json = serde_json::to_string(&SessionPhase::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }
}
