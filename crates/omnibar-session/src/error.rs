//! Error types for the session crate.

use omnibar_core::error::OmnibarError;

/// Failure reported by a host capability (use case, navigation, warm-up).
///
/// The orchestrator never retries these and never lets them reach session
/// state; they end up as a log line.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Request rejected by host: {0}")]
    Rejected(String),
    #[error("Host surface is gone")]
    SurfaceGone,
    #[error(transparent)]
    Core(#[from] OmnibarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Rejected("navigation in progress".to_string());
        assert_eq!(err.to_string(), "Request rejected by host: navigation in progress");
        assert_eq!(GatewayError::SurfaceGone.to_string(), "Host surface is gone");
    }

    #[test]
    fn test_gateway_error_from_core() {
        let err: GatewayError = OmnibarError::SessionClosed.into();
        assert!(matches!(err, GatewayError::Core(_)));
        assert_eq!(err.to_string(), "Search session is closed");
    }
}
