//! Host capabilities a session invokes: terminal use cases, navigation back
//! to the browsing surface, and engine warm-up.
//!
//! The `Recording*` implementations keep every call for inspection and can be
//! told to fail, so hosts and tests can observe what a session did.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use omnibar_core::{Engine, LoadUrlFlags};

use crate::error::GatewayError;

/// Arguments of the load-URL-or-search use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadUrlOrSearch {
    pub term: String,
    pub new_tab: bool,
    pub private: bool,
    /// Treat `term` as search terms even if it parses as a URL.
    pub force_search: bool,
    pub engine: Option<Engine>,
    pub flags: LoadUrlFlags,
}

/// Terminal use cases owned by the host.
#[async_trait]
pub trait UseCaseGateway: Send + Sync {
    async fn load_url_or_search(&self, request: LoadUrlOrSearch) -> Result<(), GatewayError>;

    async fn select_tab(&self, tab_id: &str) -> Result<(), GatewayError>;

    async fn navigate_to_engine_settings(&self) -> Result<(), GatewayError>;
}

/// Moves the host UI back to the browsing surface.
pub trait Navigator: Send + Sync {
    fn show_browser(&self) -> Result<(), GatewayError>;
}

/// Prepares the browsing engine so the first load after a search is fast.
#[async_trait]
pub trait EngineWarmer: Send + Sync {
    async fn warm_up(&self, private: bool) -> Result<(), GatewayError>;
}

/// Dependencies only valid while the hosting surface is alive.
#[derive(Clone)]
pub struct LifecycleDependencies {
    pub gateway: Arc<dyn UseCaseGateway>,
    pub navigator: Arc<dyn Navigator>,
}

impl LifecycleDependencies {
    pub fn new(gateway: Arc<dyn UseCaseGateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self { gateway, navigator }
    }
}

/// A call observed by a recording double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    LoadUrlOrSearch(LoadUrlOrSearch),
    SelectTab(String),
    NavigateToEngineSettings,
    ShowBrowser,
    WarmUp { private: bool },
}

/// Shared call log used by the recording doubles.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: GatewayCall) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of load-URL-or-search invocations.
    pub fn loads(&self) -> Vec<LoadUrlOrSearch> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::LoadUrlOrSearch(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }
}

/// Gateway that records calls and optionally rejects them.
#[derive(Debug, Clone, Default)]
pub struct RecordingGateway {
    log: CallLog,
    fail: bool,
}

impl RecordingGateway {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    /// A gateway that records every call and then reports the surface as gone.
    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }

    fn outcome(&self) -> Result<(), GatewayError> {
        if self.fail {
            Err(GatewayError::SurfaceGone)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UseCaseGateway for RecordingGateway {
    async fn load_url_or_search(&self, request: LoadUrlOrSearch) -> Result<(), GatewayError> {
        self.log.push(GatewayCall::LoadUrlOrSearch(request));
        self.outcome()
    }

    async fn select_tab(&self, tab_id: &str) -> Result<(), GatewayError> {
        self.log.push(GatewayCall::SelectTab(tab_id.to_string()));
        self.outcome()
    }

    async fn navigate_to_engine_settings(&self) -> Result<(), GatewayError> {
        self.log.push(GatewayCall::NavigateToEngineSettings);
        self.outcome()
    }
}

impl Navigator for RecordingGateway {
    fn show_browser(&self) -> Result<(), GatewayError> {
        self.log.push(GatewayCall::ShowBrowser);
        self.outcome()
    }
}

#[async_trait]
impl EngineWarmer for RecordingGateway {
    async fn warm_up(&self, private: bool) -> Result<(), GatewayError> {
        self.log.push(GatewayCall::WarmUp { private });
        self.outcome()
    }
}
