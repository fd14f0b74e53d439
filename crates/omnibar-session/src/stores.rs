//! The two externally owned stores a session observes and writes to.
//!
//! Each store exposes a change stream and a `dispatch` call; sessions never
//! touch store fields directly. The in-memory implementations keep a log of
//! every dispatched action.

use std::sync::Mutex;

use omnibar_core::{Engine, SearchEngines, Suggestion};
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Actions a session dispatches to the global browser store.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    /// The search session ended. `abandoned` is true when no search or
    /// navigation concluded it.
    EngagementFinished { abandoned: bool },
    SuggestionClicked(Suggestion),
}

/// Changes the global browser store publishes.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserChange {
    SearchEnginesChanged(SearchEngines),
}

/// Global tab/browsing store.
pub trait BrowserStore: Send + Sync {
    fn search_engines(&self) -> SearchEngines;

    fn selected_tab_url(&self) -> Option<String>;

    fn subscribe(&self) -> broadcast::Receiver<BrowserChange>;

    fn dispatch(&self, action: BrowserAction);
}

/// Actions a session dispatches to the toolbar store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    SearchQueryUpdated(String),
}

/// Changes the toolbar store publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarChange {
    /// The edit box text changed, by typing or by a dispatched update.
    QueryEdited(String),
    /// The user picked an engine from the toolbar's engine selector.
    EngineSelected(Engine),
}

/// Toolbar input store.
pub trait ToolbarStore: Send + Sync {
    fn query(&self) -> String;

    fn subscribe(&self) -> broadcast::Receiver<ToolbarChange>;

    fn dispatch(&self, action: ToolbarAction);
}

#[derive(Debug, Default)]
struct BrowserState {
    search: SearchEngines,
    selected_tab_url: Option<String>,
}

/// In-memory browser store.
#[derive(Debug)]
pub struct InMemoryBrowserStore {
    state: Mutex<BrowserState>,
    actions: Mutex<Vec<BrowserAction>>,
    changes: broadcast::Sender<BrowserChange>,
}

impl InMemoryBrowserStore {
    pub fn new(search: SearchEngines, selected_tab_url: Option<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(BrowserState {
                search,
                selected_tab_url,
            }),
            actions: Mutex::new(Vec::new()),
            changes,
        }
    }

    /// Replace the engine registry and notify subscribers.
    pub fn set_search_engines(&self, search: SearchEngines) {
        match self.state.lock() {
            Ok(mut state) => state.search = search.clone(),
            Err(poisoned) => poisoned.into_inner().search = search.clone(),
        }
        let _ = self.changes.send(BrowserChange::SearchEnginesChanged(search));
    }

    /// Every action dispatched so far, in order.
    pub fn actions(&self) -> Vec<BrowserAction> {
        match self.actions.lock() {
            Ok(actions) => actions.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of `EngagementFinished` actions with the given flag.
    pub fn engagements(&self, abandoned: bool) -> usize {
        self.actions()
            .iter()
            .filter(|a| {
                matches!(a, BrowserAction::EngagementFinished { abandoned: x } if *x == abandoned)
            })
            .count()
    }
}

impl BrowserStore for InMemoryBrowserStore {
    fn search_engines(&self) -> SearchEngines {
        match self.state.lock() {
            Ok(state) => state.search.clone(),
            Err(poisoned) => poisoned.into_inner().search.clone(),
        }
    }

    fn selected_tab_url(&self) -> Option<String> {
        match self.state.lock() {
            Ok(state) => state.selected_tab_url.clone(),
            Err(poisoned) => poisoned.into_inner().selected_tab_url.clone(),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<BrowserChange> {
        self.changes.subscribe()
    }

    fn dispatch(&self, action: BrowserAction) {
        tracing::debug!(?action, "Browser store action");
        match self.actions.lock() {
            Ok(mut actions) => actions.push(action),
            Err(poisoned) => poisoned.into_inner().push(action),
        }
    }
}

/// In-memory toolbar store. Dispatched query updates are echoed to
/// subscribers as [`ToolbarChange::QueryEdited`].
#[derive(Debug)]
pub struct InMemoryToolbarStore {
    query: Mutex<String>,
    actions: Mutex<Vec<ToolbarAction>>,
    changes: broadcast::Sender<ToolbarChange>,
}

impl Default for InMemoryToolbarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryToolbarStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            query: Mutex::new(String::new()),
            actions: Mutex::new(Vec::new()),
            changes,
        }
    }

    /// Simulate the user editing the text box.
    pub fn type_text(&self, text: &str) {
        self.set_query(text);
    }

    /// Simulate the user picking an engine in the toolbar's selector.
    pub fn select_engine(&self, engine: Engine) {
        let _ = self.changes.send(ToolbarChange::EngineSelected(engine));
    }

    pub fn actions(&self) -> Vec<ToolbarAction> {
        match self.actions.lock() {
            Ok(actions) => actions.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_query(&self, text: &str) {
        match self.query.lock() {
            Ok(mut query) => *query = text.to_string(),
            Err(poisoned) => *poisoned.into_inner() = text.to_string(),
        }
        let _ = self.changes.send(ToolbarChange::QueryEdited(text.to_string()));
    }
}

impl ToolbarStore for InMemoryToolbarStore {
    fn query(&self) -> String {
        match self.query.lock() {
            Ok(query) => query.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ToolbarChange> {
        self.changes.subscribe()
    }

    fn dispatch(&self, action: ToolbarAction) {
        tracing::debug!(?action, "Toolbar store action");
        match self.actions.lock() {
            Ok(mut actions) => actions.push(action.clone()),
            Err(poisoned) => poisoned.into_inner().push(action.clone()),
        }
        match action {
            ToolbarAction::SearchQueryUpdated(text) => self.set_query(&text),
        }
    }
}
