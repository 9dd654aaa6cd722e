//! Secrets, nonces and openings

use std::fmt;

/// Nonce mixed into a commitment, drawn from `[1, N]`
pub type Nonce = u64;

/// Opaque secret bytes owned by a prover or a registering client.
///
/// `Debug` never prints the content.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy text form, for the explicit reveal step only
    pub fn reveal_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<{} bytes redacted>)", self.0.len())
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<&[u8]> for Secret {
    fn from(b: &[u8]) -> Self {
        Self::new(b)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(b: Vec<u8>) -> Self {
        Self(b)
    }
}

/// The `(secret, nonce)` pair disclosed at reveal time.
///
/// Handing an opening to a verifier discloses the secret. This is a
/// commit/reveal scheme, not a zero-knowledge proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    pub secret: Secret,
    pub nonce: Nonce,
}

impl Opening {
    pub fn new(secret: Secret, nonce: Nonce) -> Self {
        Self { secret, nonce }
    }

    /// Recompute the commitment this opening unlocks
    pub fn commitment(&self) -> super::Commitment {
        super::commit(self.secret.as_bytes(), self.nonce)
    }
}
