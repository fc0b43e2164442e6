//! Error types shared across the quoting engine.

use thiserror::Error;

/// Core error taxonomy.
///
/// The first three variants are recovered locally at the per-instrument
/// boundary of the quoting cycle; `ConfigurationInvalid` is fatal at
/// startup validation and never defaulted away at runtime.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Reference quote or position read failed or returned nothing.
    #[error("Feed unavailable for {0}")]
    FeedUnavailable(String),

    /// Best bid or ask missing where a collaborator can only report it as
    /// an error. The ladder calculator itself degrades per side instead.
    #[error("Degenerate ladder input for {0}")]
    LadderDegenerate(String),

    /// The gateway refused a batch (rate limit, stale nonce, margin).
    #[error("Gateway rejected batch: {0}")]
    GatewayRejected(String),

    /// Missing or inconsistent configuration entry.
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Unparseable fixed-point value.
    #[error("Invalid fixed-point value: {0}")]
    InvalidFixed(String),
}

impl CoreError {
    /// Whether the quoting loop absorbs this error at the instrument
    /// boundary and continues.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::ConfigurationInvalid(_))
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability_split() {
        assert!(CoreError::FeedUnavailable("SOL".into()).is_recoverable());
        assert!(CoreError::GatewayRejected("rate limit".into()).is_recoverable());
        assert!(CoreError::LadderDegenerate("SOL".into()).is_recoverable());
        assert!(!CoreError::ConfigurationInvalid("no spreads for SOL".into()).is_recoverable());
    }

    #[test]
    fn test_display_carries_context() {
        let err = CoreError::FeedUnavailable("ETH".into());
        assert_eq!(err.to_string(), "Feed unavailable for ETH");
    }
}
