//! Challenge/response protocol for ZKCA
//!
//! - Prover: commits to a secret under a fresh nonce, later opens it
//! - Verifier: recomputes the commitment from the opening
//! - Session: sequences commit → reveal → verify once
//! - AdversarialSimulator: bounded forgery attempts against a commitment
//!
//! The verifier learns the secret during verification. This is a
//! commit/reveal scheme; the "zero-knowledge" in the crate name describes
//! the protocol it models, not a property it has.

mod error;
mod prover;
mod session;
mod simulator;
mod verifier;

pub use error::ProtocolError;
pub use prover::Prover;
pub use session::{Session, SessionOutcome, SessionState, SessionStep};
pub use simulator::{AdversarialSimulator, SimulationReport};
pub use verifier::{StressTestedVerifier, VerificationStrategy, Verifier};
