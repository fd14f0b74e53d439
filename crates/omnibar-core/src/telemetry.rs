//! Telemetry facts emitted by search sessions and the sinks that receive them.
//!
//! Recording is fire-and-forget: sinks must not block and must not fail the
//! caller.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single telemetry fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
#[non_exhaustive]
pub enum TelemetryFact {
    /// A non-default engine was selected for the session.
    EngineSelected { engine: String },
    /// A URL was loaded from the edit box.
    EnteredUrl { autocomplete: bool },
    /// A search was performed; `source` is `"<engine source>.suggestion"`.
    PerformedSearch { source: String },
    HistoryResultTapped,
    BookmarkResultTapped,
}

impl TelemetryFact {
    /// Metric name as reported to the backend.
    pub fn event_name(&self) -> &'static str {
        match self {
            TelemetryFact::EngineSelected { .. } => "engine_selected",
            TelemetryFact::EnteredUrl { .. } => "entered_url",
            TelemetryFact::PerformedSearch { .. } => "performed_search",
            TelemetryFact::HistoryResultTapped => "history_result_tapped",
            TelemetryFact::BookmarkResultTapped => "bookmark_result_tapped",
        }
    }
}

/// A fact together with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedFact {
    pub session_id: Uuid,
    pub fact: TelemetryFact,
    pub recorded_at: DateTime<Utc>,
}

/// Receiver for telemetry facts.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, session_id: Uuid, fact: TelemetryFact);
}

/// Sink that writes each fact as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record(&self, session_id: Uuid, fact: TelemetryFact) {
        let payload = serde_json::to_string(&fact).unwrap_or_default();
        tracing::info!(
            target: "omnibar::telemetry",
            session_id = %session_id,
            event = fact.event_name(),
            payload = %payload,
            "Telemetry fact recorded"
        );
    }
}

/// In-memory sink that keeps every fact, for inspection by hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    facts: Mutex<Vec<RecordedFact>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded facts in arrival order.
    pub fn facts(&self) -> Vec<RecordedFact> {
        match self.facts.lock() {
            Ok(facts) => facts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Recorded facts with the given metric name.
    pub fn named(&self, event_name: &str) -> Vec<TelemetryFact> {
        self.facts()
            .into_iter()
            .filter(|r| r.fact.event_name() == event_name)
            .map(|r| r.fact)
            .collect()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn record(&self, session_id: Uuid, fact: TelemetryFact) {
        let recorded = RecordedFact {
            session_id,
            fact,
            recorded_at: Utc::now(),
        };
        match self.facts.lock() {
            Ok(mut facts) => facts.push(recorded),
            Err(poisoned) => poisoned.into_inner().push(recorded),
        }
    }
}
