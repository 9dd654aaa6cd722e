//! ZKCA — commitment-based challenge/response authentication
//!
//! A prover commits to a secret under a random nonce, later reveals the
//! opening, and a verifier recomputes the commitment. A certificate
//! authority records commitments per client.
//!
//! The protocol reveals the secret to the verifier. It models a
//! "zero-knowledge" demo protocol but is a commit/reveal scheme.

pub mod commitment;
pub mod config;
pub mod protocol;
pub mod registry;

pub use commitment::{commit, Commitment, Nonce, Opening, Secret};
pub use config::{ProtocolConfig, VerificationMode};
pub use protocol::{
    AdversarialSimulator, Prover, ProtocolError, Session, SessionOutcome, SessionState,
    VerificationStrategy, Verifier,
};
pub use registry::{Certificate, CertificateAuthority, RegistryError};
