//! Shared value types, configuration, telemetry and errors for the omnibar.

pub mod config;
pub mod error;
pub mod suggestion;
pub mod telemetry;
pub mod types;

pub use config::{OmnibarConfig, SuggestionSettings};
pub use error::{OmnibarError, Result};
pub use suggestion::{ClickHandler, ClickOutcome, LoadUrlFlags, Suggestion, SuggestionFlag};
pub use telemetry::{
    RecordedFact, RecordingTelemetry, TelemetryFact, TelemetrySink, TracingTelemetry,
};
pub use types::*;
