use crate::config::ConfigError;

use super::session::{SessionState, SessionStep};

/// Errors raised by provers and sessions
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Opening requested before commit")]
    NotCommitted,

    #[error("Session has already reached a terminal state")]
    AlreadyExecuted,

    #[error("Verification failed: opening does not match commitment")]
    VerificationFailed,

    #[error("Cannot {step} from state {from}")]
    InvalidTransition { from: SessionState, step: SessionStep },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
