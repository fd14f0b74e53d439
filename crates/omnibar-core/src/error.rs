use thiserror::Error;

/// Top-level error type for the omnibar workspace.
///
/// The session reducer itself never fails; these errors surface from
/// configuration loading, engine lookups made by hosts, and session handles
/// that outlive their event loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OmnibarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown search engine: {0}")]
    UnknownEngine(String),

    #[error("Search session is closed")]
    SessionClosed,
}

impl From<toml::de::Error> for OmnibarError {
    fn from(err: toml::de::Error) -> Self {
        OmnibarError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for OmnibarError {
    fn from(err: toml::ser::Error) -> Self {
        OmnibarError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OmnibarError {
    fn from(err: serde_json::Error) -> Self {
        OmnibarError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for omnibar operations.
pub type Result<T> = std::result::Result<T, OmnibarError>;
