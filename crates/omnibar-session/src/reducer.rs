//! The session reducer.
//!
//! `reduce` applies one event to the session state and returns the effects
//! the orchestrator must carry out, in order. It never performs I/O, never
//! fails, and treats every event it cannot apply as a no-op.

use omnibar_core::{
    ClickOutcome, Engine, EngineSource, LoadUrlFlags, SearchEngines, Suggestion, SuggestionFlag,
    SuggestionSettings, TelemetryFact,
};
use omnibar_providers::{ProviderSet, SuggestionFlags};

use crate::gateway::LoadUrlOrSearch;
use crate::state::{SessionPhase, SessionState};
use crate::stores::{BrowserAction, ToolbarAction};

/// A completed provider rebuild, tagged with the generation it was
/// requested under.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRebuild {
    pub generation: u64,
    pub providers: ProviderSet,
}

/// A URL or text entry the user committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadUrlRequest {
    pub text: String,
    pub flags: LoadUrlFlags,
    /// When set, the text is searched with this engine instead of loaded.
    pub engine: Option<Engine>,
    /// Whether the text came from inline autocompletion.
    pub autocompleted: bool,
}

impl LoadUrlRequest {
    pub fn url(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: LoadUrlFlags::none(),
            engine: None,
            autocompleted: false,
        }
    }
}

/// Events a search session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Start { engine: Option<Engine>, private: bool },
    QueryUpdated(String),
    ProvidersUpdated(ProviderRebuild),
    EngineChosenByUser(Engine),
    SuggestionClicked(Suggestion),
    SuggestionSelectedForEdit(Suggestion),
    LoadUrlRequested(LoadUrlRequest),
    SearchRequested { terms: String, engine: Option<Engine> },
    TabSelected(String),
    EngineSettingsRequested,
    Abandon,
    EnginesRefreshed(SearchEngines),
    FlagsChanged(SuggestionSettings),
}

impl SessionEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            SessionEvent::Start { .. } => "start",
            SessionEvent::QueryUpdated(_) => "query_updated",
            SessionEvent::ProvidersUpdated(_) => "providers_updated",
            SessionEvent::EngineChosenByUser(_) => "engine_chosen_by_user",
            SessionEvent::SuggestionClicked(_) => "suggestion_clicked",
            SessionEvent::SuggestionSelectedForEdit(_) => "suggestion_selected_for_edit",
            SessionEvent::LoadUrlRequested(_) => "load_url_requested",
            SessionEvent::SearchRequested { .. } => "search_requested",
            SessionEvent::TabSelected(_) => "tab_selected",
            SessionEvent::EngineSettingsRequested => "engine_settings_requested",
            SessionEvent::Abandon => "abandon",
            SessionEvent::EnginesRefreshed(_) => "engines_refreshed",
            SessionEvent::FlagsChanged(_) => "flags_changed",
        }
    }

    /// The terminal event a suggestion's click outcome stands for.
    pub fn from_click(outcome: ClickOutcome) -> Self {
        match outcome {
            ClickOutcome::LoadUrl { url, flags } => {
                SessionEvent::LoadUrlRequested(LoadUrlRequest {
                    text: url,
                    flags,
                    engine: None,
                    autocompleted: false,
                })
            }
            ClickOutcome::Search { terms, engine } => {
                SessionEvent::SearchRequested { terms, engine }
            }
            ClickOutcome::SelectTab { tab_id } => SessionEvent::TabSelected(tab_id),
        }
    }
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    WarmUpEngine { private: bool },
    RebuildProviders {
        generation: u64,
        source: EngineSource,
        flags: SuggestionFlags,
    },
    Toolbar(ToolbarAction),
    Browser(BrowserAction),
    Telemetry(TelemetryFact),
    /// Invoke the suggestion's click handler and re-enter its outcome.
    RunClickHandler(Suggestion),
    LoadUrlOrSearch(LoadUrlOrSearch),
    SelectTab(String),
    OpenEngineSettings,
    ShowBrowser,
}

/// Store-derived values the reducer reads on Start.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub engines: SearchEngines,
    pub selected_tab_url: Option<String>,
}

pub fn reduce(
    state: &mut SessionState,
    event: SessionEvent,
    stores: &StoreSnapshot,
) -> Vec<Effect> {
    match state.phase {
        SessionPhase::Terminated => {
            tracing::debug!(
                session_id = %state.session_id,
                event = event.event_name(),
                "Ignoring event for terminated session"
            );
            Vec::new()
        }
        SessionPhase::Uninitialized => match event {
            SessionEvent::Start { engine, private } => start(state, engine, private, stores),
            SessionEvent::QueryUpdated(text) => {
                state.query = text;
                Vec::new()
            }
            other => {
                tracing::debug!(
                    session_id = %state.session_id,
                    event = other.event_name(),
                    "Ignoring event before start"
                );
                Vec::new()
            }
        },
        SessionPhase::Active => reduce_active(state, event),
    }
}

fn reduce_active(state: &mut SessionState, event: SessionEvent) -> Vec<Effect> {
    match event {
        SessionEvent::Start { .. } => {
            tracing::debug!(session_id = %state.session_id, "Session already started");
            Vec::new()
        }
        SessionEvent::QueryUpdated(text) => {
            if text != state.query {
                state.query = text;
                state.suggestions_visible = state.query_wants_suggestions();
            }
            Vec::new()
        }
        SessionEvent::ProvidersUpdated(rebuild) => {
            if rebuild.generation != state.generation {
                tracing::debug!(
                    session_id = %state.session_id,
                    generation = rebuild.generation,
                    latest = state.generation,
                    "Discarding stale provider rebuild"
                );
                return Vec::new();
            }
            state.providers = rebuild.providers;
            state.rebuild_in_flight = None;
            state.suggestions_visible = state.query_wants_suggestions();
            Vec::new()
        }
        SessionEvent::EngineChosenByUser(engine) => {
            let fact = TelemetryFact::EngineSelected {
                engine: engine.telemetry_name(),
            };
            state.engine_source = EngineSource::for_chosen(engine);
            vec![request_rebuild(state), Effect::Telemetry(fact)]
        }
        SessionEvent::SuggestionClicked(suggestion) => {
            let mut effects = vec![
                Effect::RunClickHandler(suggestion.clone()),
                Effect::Toolbar(ToolbarAction::SearchQueryUpdated(String::new())),
                Effect::Browser(BrowserAction::SuggestionClicked(suggestion.clone())),
            ];
            if suggestion.has_flag(SuggestionFlag::History) {
                effects.push(Effect::Telemetry(TelemetryFact::HistoryResultTapped));
            }
            if suggestion.has_flag(SuggestionFlag::Bookmark) {
                effects.push(Effect::Telemetry(TelemetryFact::BookmarkResultTapped));
            }
            effects
        }
        SessionEvent::SuggestionSelectedForEdit(suggestion) => match suggestion.edit_text {
            Some(text) => vec![Effect::Toolbar(ToolbarAction::SearchQueryUpdated(text))],
            None => Vec::new(),
        },
        SessionEvent::LoadUrlRequested(request) => {
            let fact = match &request.engine {
                Some(engine) => TelemetryFact::PerformedSearch {
                    source: search_source(state, Some(engine)),
                },
                None => TelemetryFact::EnteredUrl {
                    autocomplete: request.autocompleted,
                },
            };
            let load = LoadUrlOrSearch {
                term: request.text,
                new_tab: false,
                private: state.is_private,
                force_search: request.engine.is_some(),
                engine: request.engine,
                flags: request.flags,
            };
            finish(state, false);
            vec![
                Effect::LoadUrlOrSearch(load),
                Effect::ShowBrowser,
                engagement(false),
                Effect::Telemetry(fact),
            ]
        }
        SessionEvent::SearchRequested { terms, engine } => {
            let engine = engine.or_else(|| state.engine_source.engine().cloned());
            let fact = TelemetryFact::PerformedSearch {
                source: search_source(state, engine.as_ref()),
            };
            let load = LoadUrlOrSearch {
                term: terms,
                new_tab: false,
                private: state.is_private,
                force_search: true,
                engine,
                flags: LoadUrlFlags::none(),
            };
            finish(state, false);
            vec![
                Effect::LoadUrlOrSearch(load),
                Effect::ShowBrowser,
                engagement(false),
                Effect::Telemetry(fact),
            ]
        }
        SessionEvent::TabSelected(tab_id) => {
            finish(state, false);
            vec![Effect::SelectTab(tab_id), Effect::ShowBrowser, engagement(false)]
        }
        SessionEvent::EngineSettingsRequested => {
            finish(state, true);
            vec![Effect::OpenEngineSettings, engagement(true)]
        }
        SessionEvent::Abandon => {
            finish(state, true);
            vec![engagement(true)]
        }
        SessionEvent::EnginesRefreshed(engines) => engines_refreshed(state, &engines),
        SessionEvent::FlagsChanged(settings) => {
            if settings == state.flags.settings {
                return Vec::new();
            }
            state.flags = state.flags.with_settings(settings);
            vec![request_rebuild(state)]
        }
    }
}

fn start(
    state: &mut SessionState,
    engine: Option<Engine>,
    private: bool,
    stores: &StoreSnapshot,
) -> Vec<Effect> {
    state.transition(SessionPhase::Active);
    state.is_private = private;
    state.context_url = stores.selected_tab_url.clone().unwrap_or_default();
    state.default_engine = stores.engines.selected_or_default();
    state.available_engines = stores.engines.available();
    state.flags =
        SuggestionFlags::new(state.flags.settings, stores.engines.region.clone(), private);
    state.suggestions_visible = state.query_wants_suggestions();

    if state.default_engine.is_none() {
        tracing::warn!(session_id = %state.session_id, "No default search engine available");
    }

    let preselected = engine.as_ref().map(|e| TelemetryFact::EngineSelected {
        engine: e.telemetry_name(),
    });
    state.engine_source = match engine {
        Some(engine) => EngineSource::Shortcut(engine),
        None => EngineSource::for_default(state.default_engine.clone()),
    };

    tracing::info!(
        session_id = %state.session_id,
        source = %state.engine_source,
        private,
        "Search session started"
    );

    let mut effects = vec![Effect::WarmUpEngine { private }, request_rebuild(state)];
    if let Some(fact) = preselected {
        effects.push(Effect::Telemetry(fact));
    }
    effects
}

fn engines_refreshed(state: &mut SessionState, engines: &SearchEngines) -> Vec<Effect> {
    let new_default = engines.selected_or_default();
    state.available_engines = engines.available();

    let mut rebuild = false;
    let follows_default = matches!(
        state.engine_source,
        EngineSource::Default(_) | EngineSource::None
    );
    if follows_default && new_default != state.default_engine {
        state.engine_source = EngineSource::for_default(new_default.clone());
        rebuild = true;
    }
    state.default_engine = new_default;

    if engines.region != state.flags.region {
        state.flags.region = engines.region.clone();
        rebuild = true;
    }

    if rebuild {
        vec![request_rebuild(state)]
    } else {
        Vec::new()
    }
}

/// Bump the generation and ask for a provider set matching the current
/// source and flags. Any reply to an earlier request becomes stale.
pub(crate) fn request_rebuild(state: &mut SessionState) -> Effect {
    state.generation += 1;
    state.rebuild_in_flight = Some(state.generation);
    Effect::RebuildProviders {
        generation: state.generation,
        source: state.engine_source.clone(),
        flags: state.flags.clone(),
    }
}

fn finish(state: &mut SessionState, abandoned: bool) {
    state.transition(SessionPhase::Terminated);
    state.rebuild_in_flight = None;
    tracing::info!(session_id = %state.session_id, abandoned, "Search session finished");
}

fn engagement(abandoned: bool) -> Effect {
    Effect::Browser(BrowserAction::EngagementFinished { abandoned })
}

fn search_source(state: &SessionState, engine: Option<&Engine>) -> String {
    let label = match engine {
        None => "default",
        Some(e) if state.default_engine.as_ref() == Some(e) => "default",
        Some(e) if state.engine_source.engine() == Some(e) => state.engine_source.label(),
        Some(_) => "shortcut",
    };
    format!("{}.suggestion", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibar_core::{EngineType, Region};
    use omnibar_providers::ProviderKind;

    fn engine_a() -> Engine {
        Engine::new("engine-a", "Engine A", EngineType::Bundled)
    }

    fn engine_b() -> Engine {
        Engine::new("engine-b", "Engine B", EngineType::Bundled)
    }

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            engines: SearchEngines {
                region: Region::new("US", "US"),
                region_engines: vec![engine_a(), engine_b()],
                region_default_engine_id: Some("engine-b".to_string()),
                ..SearchEngines::default()
            },
            selected_tab_url: Some("https://example.com".to_string()),
        }
    }

    fn started(engine: Option<Engine>, private: bool) -> SessionState {
        let mut state = SessionState::new(SuggestionSettings::default());
        reduce(&mut state, SessionEvent::Start { engine, private }, &snapshot());
        state
    }

    fn engagements(effects: &[Effect]) -> Vec<bool> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Browser(BrowserAction::EngagementFinished { abandoned }) => {
                    Some(*abandoned)
                }
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Start
    // =========================================================================

    #[test]
    fn test_start_with_region_default() {
        let mut state = SessionState::new(SuggestionSettings::default());
        let effects = reduce(
            &mut state,
            SessionEvent::Start {
                engine: None,
                private: false,
            },
            &snapshot(),
        );

        assert_eq!(state.phase, SessionPhase::Active);
        assert_eq!(state.default_engine, Some(engine_b()));
        assert_eq!(state.engine_source, EngineSource::Default(engine_b()));
        assert_eq!(state.context_url, "https://example.com");
        assert!(state.shortcuts_available());
        assert_eq!(state.rebuild_in_flight, Some(1));
        assert_eq!(effects[0], Effect::WarmUpEngine { private: false });
        assert!(matches!(effects[1], Effect::RebuildProviders { generation: 1, .. }));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_start_with_preselected_engine_records_selection() {
        let mut state = SessionState::new(SuggestionSettings::default());
        let effects = reduce(
            &mut state,
            SessionEvent::Start {
                engine: Some(engine_a()),
                private: true,
            },
            &snapshot(),
        );

        assert_eq!(state.engine_source, EngineSource::Shortcut(engine_a()));
        assert!(state.is_private);
        assert!(state.flags.private);
        assert_eq!(effects[0], Effect::WarmUpEngine { private: true });
        assert_eq!(
            effects.last(),
            Some(&Effect::Telemetry(TelemetryFact::EngineSelected {
                engine: "engine a".to_string()
            }))
        );
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut state = started(None, false);
        let before = state.clone();
        let effects = reduce(
            &mut state,
            SessionEvent::Start {
                engine: Some(engine_a()),
                private: true,
            },
            &snapshot(),
        );

        assert!(effects.is_empty());
        assert_eq!(state.engine_source, before.engine_source);
        assert_eq!(state.is_private, before.is_private);
        assert_eq!(state.generation, before.generation);
    }

    #[test]
    fn test_start_without_any_engine() {
        let mut state = SessionState::new(SuggestionSettings::default());
        reduce(
            &mut state,
            SessionEvent::Start {
                engine: None,
                private: false,
            },
            &StoreSnapshot::default(),
        );
        assert_eq!(state.engine_source, EngineSource::None);
        assert_eq!(state.default_engine, None);
        assert_eq!(state.context_url, "");
    }

    #[test]
    fn test_query_before_start_is_buffered() {
        let mut state = SessionState::new(SuggestionSettings::default());
        reduce(&mut state, SessionEvent::QueryUpdated("rust".into()), &snapshot());
        assert_eq!(state.query, "rust");
        assert!(!state.suggestions_visible);

        reduce(
            &mut state,
            SessionEvent::Start {
                engine: None,
                private: false,
            },
            &snapshot(),
        );
        assert!(state.suggestions_visible);
    }

    #[test]
    fn test_events_before_start_are_ignored() {
        let mut state = SessionState::new(SuggestionSettings::default());
        let effects = reduce(&mut state, SessionEvent::Abandon, &snapshot());
        assert!(effects.is_empty());
        assert_eq!(state.phase, SessionPhase::Uninitialized);
    }

    // =========================================================================
    // Query and provider updates
    // =========================================================================

    #[test]
    fn test_query_equal_to_context_url_stays_hidden() {
        let mut state = started(None, false);
        reduce(
            &mut state,
            SessionEvent::QueryUpdated("https://example.com".into()),
            &snapshot(),
        );
        assert!(!state.suggestions_visible);

        reduce(&mut state, SessionEvent::QueryUpdated("rust".into()), &snapshot());
        assert!(state.suggestions_visible);

        reduce(&mut state, SessionEvent::QueryUpdated(String::new()), &snapshot());
        assert!(!state.suggestions_visible);
    }

    #[test]
    fn test_query_update_never_rebuilds() {
        let mut state = started(None, false);
        let effects = reduce(&mut state, SessionEvent::QueryUpdated("rust".into()), &snapshot());
        assert!(effects.is_empty());
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn test_stale_rebuild_is_discarded() {
        let mut state = started(None, false);
        reduce(&mut state, SessionEvent::EngineChosenByUser(engine_a()), &snapshot());
        assert_eq!(state.generation, 2);

        reduce(
            &mut state,
            SessionEvent::ProvidersUpdated(ProviderRebuild {
                generation: 1,
                providers: ProviderSet::empty(),
            }),
            &snapshot(),
        );
        assert_eq!(state.rebuild_in_flight, Some(2));

        reduce(
            &mut state,
            SessionEvent::ProvidersUpdated(ProviderRebuild {
                generation: 2,
                providers: ProviderSet::empty(),
            }),
            &snapshot(),
        );
        assert_eq!(state.rebuild_in_flight, None);
    }

    #[test]
    fn test_providers_updated_shows_suggestions_for_pending_query() {
        let mut state = started(None, false);
        state.query = "rust".to_string();
        state.suggestions_visible = false;
        reduce(
            &mut state,
            SessionEvent::ProvidersUpdated(ProviderRebuild {
                generation: 1,
                providers: ProviderSet::empty(),
            }),
            &snapshot(),
        );
        assert!(state.suggestions_visible);
    }

    // =========================================================================
    // Engine selection
    // =========================================================================

    #[test]
    fn test_choosing_bookmarks_engine() {
        let mut state = started(None, false);
        let effects = reduce(
            &mut state,
            SessionEvent::EngineChosenByUser(Engine::bookmarks()),
            &snapshot(),
        );

        assert_eq!(state.engine_source, EngineSource::Bookmarks(Engine::bookmarks()));
        assert!(engagements(&effects).is_empty());
        match &effects[0] {
            Effect::RebuildProviders { source, .. } => {
                assert_eq!(source, &EngineSource::Bookmarks(Engine::bookmarks()))
            }
            other => panic!("expected rebuild, got {:?}", other),
        }
        assert_eq!(
            effects[1],
            Effect::Telemetry(TelemetryFact::EngineSelected {
                engine: "bookmarks".to_string()
            })
        );
    }

    #[test]
    fn test_choosing_tabs_and_history_engines() {
        let mut state = started(None, false);
        reduce(&mut state, SessionEvent::EngineChosenByUser(Engine::tabs()), &snapshot());
        assert_eq!(state.engine_source, EngineSource::Tabs(Engine::tabs()));
        reduce(&mut state, SessionEvent::EngineChosenByUser(Engine::history()), &snapshot());
        assert_eq!(state.engine_source, EngineSource::History(Engine::history()));
    }

    #[test]
    fn test_engines_refreshed_follows_new_default() {
        let mut state = started(None, false);
        let mut engines = snapshot().engines;
        engines.user_selected_engine_id = Some("engine-a".to_string());

        let effects = reduce(&mut state, SessionEvent::EnginesRefreshed(engines), &snapshot());

        assert_eq!(state.default_engine, Some(engine_a()));
        assert_eq!(state.engine_source, EngineSource::Default(engine_a()));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_engines_refreshed_keeps_shortcut() {
        let mut state = started(Some(engine_a()), false);
        let mut engines = snapshot().engines;
        engines.user_selected_engine_id = Some("engine-a".to_string());

        let effects = reduce(&mut state, SessionEvent::EnginesRefreshed(engines), &snapshot());

        assert_eq!(state.engine_source, EngineSource::Shortcut(engine_a()));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_flags_changed_rebuilds_once() {
        let mut state = started(None, false);
        let settings = SuggestionSettings {
            show_bookmarks: false,
            ..SuggestionSettings::default()
        };
        let effects = reduce(&mut state, SessionEvent::FlagsChanged(settings), &snapshot());
        assert_eq!(effects.len(), 1);
        assert!(!state.flags.settings.show_bookmarks);

        let effects = reduce(&mut state, SessionEvent::FlagsChanged(settings), &snapshot());
        assert!(effects.is_empty());
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    #[test]
    fn test_suggestion_click_order() {
        let mut state = started(None, false);
        let suggestion = Suggestion::new("h1", "history", "Rust")
            .with_flag(SuggestionFlag::History)
            .with_flag(SuggestionFlag::Bookmark);

        let effects = reduce(
            &mut state,
            SessionEvent::SuggestionClicked(suggestion.clone()),
            &snapshot(),
        );

        assert_eq!(
            effects,
            vec![
                Effect::RunClickHandler(suggestion.clone()),
                Effect::Toolbar(ToolbarAction::SearchQueryUpdated(String::new())),
                Effect::Browser(BrowserAction::SuggestionClicked(suggestion)),
                Effect::Telemetry(TelemetryFact::HistoryResultTapped),
                Effect::Telemetry(TelemetryFact::BookmarkResultTapped),
            ]
        );
        assert!(state.is_active());
    }

    #[test]
    fn test_suggestion_selected_for_edit_leaves_query() {
        let mut state = started(None, false);
        let suggestion = Suggestion::new("s1", "search_suggestions", "test").with_edit_text("test");
        let effects = reduce(
            &mut state,
            SessionEvent::SuggestionSelectedForEdit(suggestion),
            &snapshot(),
        );
        assert_eq!(
            effects,
            vec![Effect::Toolbar(ToolbarAction::SearchQueryUpdated("test".into()))]
        );
        assert_eq!(state.query, "");

        let bare = Suggestion::new("s2", "bookmarks", "Docs");
        let effects = reduce(
            &mut state,
            SessionEvent::SuggestionSelectedForEdit(bare),
            &snapshot(),
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_click_outcomes_map_to_terminal_events() {
        assert_eq!(
            SessionEvent::from_click(ClickOutcome::SelectTab {
                tab_id: "tab2".into()
            }),
            SessionEvent::TabSelected("tab2".into())
        );
        assert_eq!(
            SessionEvent::from_click(ClickOutcome::LoadUrl {
                url: "https://docs.rs".into(),
                flags: LoadUrlFlags::none()
            }),
            SessionEvent::LoadUrlRequested(LoadUrlRequest::url("https://docs.rs"))
        );
    }

    // =========================================================================
    // Terminal events
    // =========================================================================

    #[test]
    fn test_load_url_terminates_with_one_engagement() {
        let mut state = started(Some(engine_a()), true);
        let effects = reduce(
            &mut state,
            SessionEvent::LoadUrlRequested(LoadUrlRequest::url("https://example.com")),
            &snapshot(),
        );

        assert!(state.is_terminated());
        assert_eq!(engagements(&effects), vec![false]);
        match &effects[0] {
            Effect::LoadUrlOrSearch(load) => {
                assert!(load.private);
                assert!(!load.force_search);
                assert!(!load.new_tab);
            }
            other => panic!("expected load, got {:?}", other),
        }
        assert_eq!(
            effects.last(),
            Some(&Effect::Telemetry(TelemetryFact::EnteredUrl {
                autocomplete: false
            }))
        );

        let later = reduce(&mut state, SessionEvent::Abandon, &snapshot());
        assert!(later.is_empty());
    }

    #[test]
    fn test_autocompleted_load_keeps_flags() {
        let mut state = started(None, false);
        let effects = reduce(
            &mut state,
            SessionEvent::LoadUrlRequested(LoadUrlRequest {
                text: "https://mozilla.org".into(),
                flags: LoadUrlFlags::all(),
                engine: None,
                autocompleted: true,
            }),
            &snapshot(),
        );

        match &effects[0] {
            Effect::LoadUrlOrSearch(load) => {
                assert_eq!(load.term, "https://mozilla.org");
                assert_eq!(load.flags, LoadUrlFlags::all());
                assert!(load.flags.contains(LoadUrlFlags::ALLOW_JAVASCRIPT_URL));
                assert!(!load.force_search);
                assert_eq!(load.engine, None);
            }
            other => panic!("expected load, got {:?}", other),
        }
        assert_eq!(
            effects.last(),
            Some(&Effect::Telemetry(TelemetryFact::EnteredUrl {
                autocomplete: true
            }))
        );
    }

    #[test]
    fn test_load_url_with_engine_forces_search() {
        let mut state = started(None, false);
        let effects = reduce(
            &mut state,
            SessionEvent::LoadUrlRequested(LoadUrlRequest {
                engine: Some(engine_b()),
                ..LoadUrlRequest::url("rust")
            }),
            &snapshot(),
        );
        match &effects[0] {
            Effect::LoadUrlOrSearch(load) => assert!(load.force_search),
            other => panic!("expected load, got {:?}", other),
        }
        assert_eq!(
            effects.last(),
            Some(&Effect::Telemetry(TelemetryFact::PerformedSearch {
                source: "default.suggestion".into()
            }))
        );
    }

    #[test]
    fn test_search_uses_current_engine() {
        let mut state = started(None, false);
        let effects = reduce(
            &mut state,
            SessionEvent::SearchRequested {
                terms: "rust".into(),
                engine: None,
            },
            &snapshot(),
        );
        assert_eq!(
            effects[0],
            Effect::LoadUrlOrSearch(LoadUrlOrSearch {
                term: "rust".into(),
                new_tab: false,
                private: false,
                force_search: true,
                engine: Some(engine_b()),
                flags: LoadUrlFlags::none(),
            })
        );
        assert_eq!(
            effects[3],
            Effect::Telemetry(TelemetryFact::PerformedSearch {
                source: "default.suggestion".into()
            })
        );
    }

    #[test]
    fn test_search_with_shortcut_engine_source() {
        let mut state = started(Some(engine_a()), false);
        let effects = reduce(
            &mut state,
            SessionEvent::SearchRequested {
                terms: "rust".into(),
                engine: None,
            },
            &snapshot(),
        );
        assert_eq!(
            effects.last(),
            Some(&Effect::Telemetry(TelemetryFact::PerformedSearch {
                source: "shortcut.suggestion".into()
            }))
        );
    }

    #[test]
    fn test_tab_selected() {
        let mut state = started(None, false);
        let effects = reduce(&mut state, SessionEvent::TabSelected("tab2".into()), &snapshot());
        assert_eq!(
            effects,
            vec![
                Effect::SelectTab("tab2".into()),
                Effect::ShowBrowser,
                engagement(false)
            ]
        );
    }

    #[test]
    fn test_engine_settings_and_abandon_are_abandoned_engagements() {
        let mut state = started(None, false);
        let effects = reduce(&mut state, SessionEvent::EngineSettingsRequested, &snapshot());
        assert_eq!(effects, vec![Effect::OpenEngineSettings, engagement(true)]);

        let mut state = started(None, false);
        let effects = reduce(&mut state, SessionEvent::Abandon, &snapshot());
        assert_eq!(effects, vec![engagement(true)]);
    }

    #[test]
    fn test_terminated_session_ignores_rebuild_replies() {
        let mut state = started(None, false);
        reduce(&mut state, SessionEvent::Abandon, &snapshot());
        reduce(
            &mut state,
            SessionEvent::ProvidersUpdated(ProviderRebuild {
                generation: 1,
                providers: ProviderSet::empty(),
            }),
            &snapshot(),
        );
        assert!(state.providers.is_empty());
        assert_eq!(state.rebuild_in_flight, None);
        assert!(!state.providers.contains(&ProviderKind::Bookmarks));
    }
}
