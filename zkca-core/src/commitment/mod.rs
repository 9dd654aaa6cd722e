//! Commitment scheme for ZKCA
//!
//! - `commit`: deterministic SHA256 binding over `(secret, nonce)`
//! - `Secret` / `Opening`: the values a prover later discloses

mod opening;
mod scheme;

pub use opening::{Nonce, Opening, Secret};
pub use scheme::{commit, Commitment, CommitmentParseError, COMMITMENT_LEN};
