//! Session event loop.
//!
//! [`SearchSession::spawn`] moves an orchestrator onto its own task and feeds
//! it from four sources: host commands, rebuild replies, browser store
//! changes, and toolbar store changes. Toolbar query edits are coalesced over
//! the configured debounce window before they reach the reducer.

use std::time::Duration;

use omnibar_core::{OmnibarError, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::gateway::LifecycleDependencies;
use crate::orchestrator::SearchOrchestrator;
use crate::reducer::SessionEvent;
use crate::state::SessionState;
use crate::stores::{BrowserChange, ToolbarChange};

enum Command {
    Event(SessionEvent),
    Attach(LifecycleDependencies),
    Detach,
}

/// Handle to a running search session.
///
/// Dropping every handle counts as the host surface being dismissed: the
/// session abandons itself, attached or not, and the loop exits.
pub struct SearchSession {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SearchSession {
    pub fn spawn(orchestrator: SearchOrchestrator, debounce: Duration) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let state = orchestrator.watch_state();
        let task = tokio::spawn(run(orchestrator, rx, debounce));
        Self {
            commands,
            state,
            task,
        }
    }

    pub fn send(&self, event: SessionEvent) -> Result<()> {
        self.command(Command::Event(event))
    }

    pub fn attach(&self, lifecycle: LifecycleDependencies) -> Result<()> {
        self.command(Command::Attach(lifecycle))
    }

    pub fn detach(&self) -> Result<()> {
        self.command(Command::Detach)
    }

    /// Latest published state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Wait until the published state satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl Fn(&SessionState) -> bool,
    ) -> Result<SessionState> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| OmnibarError::SessionClosed)?;
        Ok(state.clone())
    }

    /// Abandon the session and wait for its loop to exit.
    pub async fn close(self) -> SessionState {
        let _ = self.commands.send(Command::Event(SessionEvent::Abandon));
        self.join().await
    }

    /// Wait for the loop to exit on its own, after a terminal event.
    pub async fn join(self) -> SessionState {
        let Self {
            commands,
            state,
            task,
        } = self;
        drop(commands);
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Search session task failed");
        }
        let final_state = state.borrow().clone();
        final_state
    }

    fn command(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| OmnibarError::SessionClosed)
    }
}

async fn run(
    mut orchestrator: SearchOrchestrator,
    mut commands: mpsc::UnboundedReceiver<Command>,
    debounce: Duration,
) {
    let session_id = orchestrator.session_id();
    let mut browser = orchestrator.browser_changes();
    let mut toolbar = orchestrator.toolbar_changes();
    let mut browser_open = true;
    let mut toolbar_open = true;
    let mut pending_query: Option<String> = None;
    let mut deadline = Instant::now();

    tracing::debug!(session_id = %session_id, "Session loop started");

    while !orchestrator.state().is_terminated() {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Event(event)) => orchestrator.handle(event).await,
                Some(Command::Attach(lifecycle)) => orchestrator.attach(lifecycle),
                Some(Command::Detach) => orchestrator.detach(),
                None => {
                    tracing::debug!(session_id = %session_id, "Session handle dropped");
                    orchestrator.dismiss().await;
                    break;
                }
            },
            Some(rebuild) = orchestrator.next_rebuild() => {
                orchestrator.handle(SessionEvent::ProvidersUpdated(rebuild)).await;
            }
            change = browser.recv(), if browser_open => match change {
                Ok(BrowserChange::SearchEnginesChanged(engines)) => {
                    orchestrator.handle(SessionEvent::EnginesRefreshed(engines)).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        session_id = %session_id,
                        skipped,
                        "Browser store changes lagged"
                    );
                }
                Err(RecvError::Closed) => browser_open = false,
            },
            change = toolbar.recv(), if toolbar_open => match change {
                Ok(ToolbarChange::QueryEdited(text)) => {
                    pending_query = Some(text);
                    deadline = Instant::now() + debounce;
                }
                Ok(ToolbarChange::EngineSelected(engine)) => {
                    orchestrator.handle(SessionEvent::EngineChosenByUser(engine)).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        session_id = %session_id,
                        skipped,
                        "Toolbar store changes lagged"
                    );
                }
                Err(RecvError::Closed) => toolbar_open = false,
            },
            _ = sleep_until(deadline), if pending_query.is_some() => {
                if let Some(query) = pending_query.take() {
                    orchestrator.handle(SessionEvent::QueryUpdated(query)).await;
                }
            }
        }
    }

    tracing::debug!(session_id = %session_id, "Session loop finished");
}
