//! Search orchestrator: owns one session's state and carries out the effects
//! the reducer asks for.
//!
//! Events are handled one at a time. Provider rebuilds run on the blocking
//! pool and come back through an internal channel as
//! [`SessionEvent::ProvidersUpdated`]; engine warm-up is fire-and-forget.
//! Use-case calls are awaited inline; they only run once the session is
//! already terminated.

use std::collections::VecDeque;
use std::sync::Arc;

use omnibar_core::{SuggestionSettings, TelemetrySink};
use omnibar_providers::ProviderSetBuilder;
use tokio::sync::{broadcast, mpsc, watch};
use uuid::Uuid;

use crate::gateway::{EngineWarmer, LifecycleDependencies};
use crate::reducer::{self, Effect, ProviderRebuild, SessionEvent, StoreSnapshot};
use crate::state::SessionState;
use crate::stores::{BrowserChange, BrowserStore, ToolbarChange, ToolbarStore};

/// Dependencies that live as long as the session.
#[derive(Clone)]
pub struct SessionDependencies {
    pub browser_store: Arc<dyn BrowserStore>,
    pub toolbar_store: Arc<dyn ToolbarStore>,
    pub engine_warmer: Arc<dyn EngineWarmer>,
    pub telemetry: Arc<dyn TelemetrySink>,
    pub providers: ProviderSetBuilder,
}

pub struct SearchOrchestrator {
    deps: SessionDependencies,
    lifecycle: Option<LifecycleDependencies>,
    state: SessionState,
    rebuild_tx: mpsc::UnboundedSender<ProviderRebuild>,
    rebuild_rx: mpsc::UnboundedReceiver<ProviderRebuild>,
    state_tx: watch::Sender<SessionState>,
}

impl SearchOrchestrator {
    pub fn new(deps: SessionDependencies, settings: SuggestionSettings) -> Self {
        let state = SessionState::new(settings);
        let (rebuild_tx, rebuild_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            deps,
            lifecycle: None,
            state,
            rebuild_tx,
            rebuild_rx,
            state_tx,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.state.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Receiver that sees a fresh state snapshot after every handled event.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn browser_changes(&self) -> broadcast::Receiver<BrowserChange> {
        self.deps.browser_store.subscribe()
    }

    pub fn toolbar_changes(&self) -> broadcast::Receiver<ToolbarChange> {
        self.deps.toolbar_store.subscribe()
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle.is_some()
    }

    /// Bind the session to a live host surface.
    ///
    /// Re-attaching an active session picks up the toolbar text edited while
    /// detached and requests a fresh provider set.
    pub fn attach(&mut self, lifecycle: LifecycleDependencies) {
        let reattach = self.state.is_active();
        self.lifecycle = Some(lifecycle);
        tracing::debug!(session_id = %self.state.session_id, reattach, "Session attached");
        if reattach {
            let snapshot = self.snapshot();
            let query = self.deps.toolbar_store.query();
            // Query edits never produce effects.
            let _ = reducer::reduce(&mut self.state, SessionEvent::QueryUpdated(query), &snapshot);
            let effect = reducer::request_rebuild(&mut self.state);
            self.spawn_rebuild(effect);
            self.publish();
        }
    }

    /// Unbind from the host surface. Events are ignored until the next attach.
    pub fn detach(&mut self) {
        self.lifecycle = None;
        tracing::debug!(session_id = %self.state.session_id, "Session detached");
    }

    /// Handle one event plus any terminal events its click handlers produce.
    pub async fn handle(&mut self, event: SessionEvent) {
        if !self.is_attached() {
            tracing::debug!(
                session_id = %self.state.session_id,
                event = event.event_name(),
                "Ignoring event while detached"
            );
            return;
        }

        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let snapshot = self.snapshot();
            let effects = reducer::reduce(&mut self.state, event, &snapshot);
            for effect in effects {
                if let Some(follow_up) = self.execute(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
        self.publish();
    }

    /// Abandon the session because its host surface was dismissed.
    ///
    /// Applies whether or not the session is attached.
    pub async fn dismiss(&mut self) {
        let snapshot = self.snapshot();
        let effects = reducer::reduce(&mut self.state, SessionEvent::Abandon, &snapshot);
        for effect in effects {
            let _ = self.execute(effect).await;
        }
        self.publish();
    }

    /// Next rebuild reply, in completion order.
    pub async fn next_rebuild(&mut self) -> Option<ProviderRebuild> {
        self.rebuild_rx.recv().await
    }

    /// Apply rebuild replies until no rebuild is outstanding.
    pub async fn settle(&mut self) {
        while self.state.rebuild_in_flight.is_some() && self.is_attached() {
            match self.rebuild_rx.recv().await {
                Some(rebuild) => self.handle(SessionEvent::ProvidersUpdated(rebuild)).await,
                None => break,
            }
        }
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            engines: self.deps.browser_store.search_engines(),
            selected_tab_url: self.deps.browser_store.selected_tab_url(),
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    async fn execute(&self, effect: Effect) -> Option<SessionEvent> {
        let session_id = self.state.session_id;
        match effect {
            Effect::WarmUpEngine { private } => {
                let warmer = Arc::clone(&self.deps.engine_warmer);
                tokio::spawn(async move {
                    if let Err(e) = warmer.warm_up(private).await {
                        tracing::warn!(
                            session_id = %session_id,
                            error = %e,
                            "Engine warm-up failed"
                        );
                    }
                });
            }
            effect @ Effect::RebuildProviders { .. } => self.spawn_rebuild(effect),
            Effect::Toolbar(action) => self.deps.toolbar_store.dispatch(action),
            Effect::Browser(action) => self.deps.browser_store.dispatch(action),
            Effect::Telemetry(fact) => self.deps.telemetry.record(session_id, fact),
            Effect::RunClickHandler(suggestion) => {
                return suggestion.click().map(SessionEvent::from_click);
            }
            Effect::LoadUrlOrSearch(request) => {
                if let Some(lifecycle) = &self.lifecycle {
                    tracing::info!(
                        session_id = %session_id,
                        force_search = request.force_search,
                        private = request.private,
                        "Loading URL or search"
                    );
                    if let Err(e) = lifecycle.gateway.load_url_or_search(request).await {
                        tracing::warn!(
                            session_id = %session_id,
                            error = %e,
                            "Load URL or search failed"
                        );
                    }
                }
            }
            Effect::SelectTab(tab_id) => {
                if let Some(lifecycle) = &self.lifecycle {
                    if let Err(e) = lifecycle.gateway.select_tab(&tab_id).await {
                        tracing::warn!(
                            session_id = %session_id,
                            tab_id = %tab_id,
                            error = %e,
                            "Tab selection failed"
                        );
                    }
                }
            }
            Effect::OpenEngineSettings => {
                if let Some(lifecycle) = &self.lifecycle {
                    if let Err(e) = lifecycle.gateway.navigate_to_engine_settings().await {
                        tracing::warn!(
                            session_id = %session_id,
                            error = %e,
                            "Opening engine settings failed"
                        );
                    }
                }
            }
            Effect::ShowBrowser => {
                if let Some(lifecycle) = &self.lifecycle {
                    if let Err(e) = lifecycle.navigator.show_browser() {
                        tracing::warn!(
                            session_id = %session_id,
                            error = %e,
                            "Showing browser failed"
                        );
                    }
                }
            }
        }
        None
    }

    fn spawn_rebuild(&self, effect: Effect) {
        let Effect::RebuildProviders {
            generation,
            source,
            flags,
        } = effect
        else {
            return;
        };
        let session_id = self.state.session_id;
        let builder = self.deps.providers.clone();
        let tx = self.rebuild_tx.clone();
        tracing::debug!(
            session_id = %session_id,
            generation,
            source = %source,
            "Rebuilding providers"
        );
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || builder.build(&source, &flags)).await {
                Ok(providers) => {
                    let _ = tx.send(ProviderRebuild {
                        generation,
                        providers,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        session_id = %session_id,
                        generation,
                        error = %e,
                        "Provider rebuild failed"
                    );
                }
            }
        });
    }
}
