//! Commitment — SHA256 binding of a secret to a nonce
//!
//! A commitment is `SHA256(secret ‖ decimal(nonce))`: the secret bytes
//! followed by the nonce rendered in ASCII base 10. The function is pure and
//! total over byte sequences, so the empty secret is a valid input.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

use super::Nonce;

/// Length of a commitment digest in bytes
pub const COMMITMENT_LEN: usize = 32;

/// A fixed-length digest binding a prover to `(secret, nonce)`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Commitment([u8; COMMITMENT_LEN]);

/// Error returned when parsing a hex-encoded commitment
#[derive(Debug, thiserror::Error)]
pub enum CommitmentParseError {
    #[error("Invalid hex in commitment: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Commitment must be 32 bytes, got {0}")]
    Length(usize),
}

/// Compute the commitment for `(secret, nonce)`
pub fn commit(secret: &[u8], nonce: Nonce) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(nonce.to_string().as_bytes());
    Commitment(hasher.finalize().into())
}

impl Commitment {
    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0
    }

    /// Lowercase hex rendering (64 chars)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, CommitmentParseError> {
        let bytes = hex::decode(s)?;
        let len = bytes.len();
        let digest: [u8; COMMITMENT_LEN] = bytes
            .try_into()
            .map_err(|_| CommitmentParseError::Length(len))?;
        Ok(Self(digest))
    }

    /// Equality that inspects every byte regardless of where the first
    /// mismatch sits
    pub fn ct_eq(&self, other: &Commitment) -> bool {
        bool::from(self.0[..].ct_eq(&other.0[..]))
    }

    /// Short prefix used in log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl From<Commitment> for String {
    fn from(c: Commitment) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Commitment {
    type Error = CommitmentParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}
