use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerifierError>;

/// Why the verifier did not accept a proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The call ran and `verify` returned false.
    Rejected,
    /// The call could not complete.
    Reverted { reason: Option<String> },
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Rejected => write!(f, "proof rejected by verifier"),
            Failure::Reverted { reason: Some(reason) } => write!(f, "call reverted: {}", reason),
            Failure::Reverted { reason: None } => write!(f, "call reverted without a reason"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("Malformed input: buffer length {len} is not a multiple of 32")]
    MalformedInput { len: usize },

    #[error("Failed to read artifact at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Verification failed: {0}")]
    VerificationFailed(Failure),

    #[error("Endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VerifierError {
    /// Short machine-readable tag, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifierError::MalformedInput { .. } => "malformed_input",
            VerifierError::Io { .. } => "io",
            VerifierError::VerificationFailed(_) => "verification_failed",
            VerifierError::EndpointUnavailable(_) => "endpoint_unavailable",
            VerifierError::InvalidConfig(_) => "invalid_config",
        }
    }

    pub fn reverted(reason: Option<String>) -> Self {
        VerifierError::VerificationFailed(Failure::Reverted { reason })
    }
}
