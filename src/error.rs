//! Error types for the SlothFrame gated execution system.

use thiserror::Error;

/// Errors raised by frame authorization, execution and export.
///
/// Every authorization failure leaves the frame `Locked`; none of them are fatal.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Production mode without a verification endpoint.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The verification authority could not be reached (network failure or timeout).
    #[error("Verification transport error: {0}")]
    TransportError(String),

    /// The verification authority answered with a non-affirmative status.
    #[error("Credential rejected by verification authority (status {status})")]
    RejectedCredential { status: u16 },

    #[error("Invalid development override credential")]
    InvalidDevCredential,

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Unsupported filter operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// True for failures produced by an unlock attempt.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            FrameError::ConfigurationError(_)
                | FrameError::TransportError(_)
                | FrameError::RejectedCredential { .. }
                | FrameError::InvalidDevCredential
                | FrameError::UnknownEnvironment(_)
        )
    }
}

impl From<config::ConfigError> for FrameError {
    fn from(err: config::ConfigError) -> Self {
        FrameError::Config(err.to_string())
    }
}
