//! Prover — holds a secret and commits to it under a fresh nonce
//!
//! Nonces come from `StdRng` seeded by the operating system. In rand 0.8
//! that is ChaCha12, so the generator itself is strong; the nonce carries
//! only `log2(N)` bits (about 16.6 for the default `N = 100000`).

use crate::commitment::{commit, Commitment, Nonce, Opening, Secret};
use crate::config::{validate_nonce_bound, ProtocolConfig};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::ProtocolError;

/// One outstanding commitment at a time
pub struct Prover<R = StdRng> {
    secret: Secret,
    nonce_upper_bound: u64,
    nonce: Option<Nonce>,
    commitment: Option<Commitment>,
    rng: R,
}

impl Prover<StdRng> {
    pub fn new(secret: impl Into<Secret>, nonce_upper_bound: u64) -> Result<Self, ProtocolError> {
        Self::with_rng(secret, nonce_upper_bound, StdRng::from_entropy())
    }

    pub fn from_config(secret: impl Into<Secret>, config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        Self::new(secret, config.nonce_upper_bound)
    }
}

impl<R: RngCore> Prover<R> {
    /// Use a caller-supplied randomness source (seeded RNGs in tests)
    pub fn with_rng(
        secret: impl Into<Secret>,
        nonce_upper_bound: u64,
        rng: R,
    ) -> Result<Self, ProtocolError> {
        validate_nonce_bound(nonce_upper_bound)?;
        Ok(Self {
            secret: secret.into(),
            nonce_upper_bound,
            nonce: None,
            commitment: None,
            rng,
        })
    }

    /// Draw a fresh nonce from `[1, N]` and commit to the secret.
    /// Replaces any previous commitment.
    pub fn commit(&mut self) -> Commitment {
        let nonce = self.rng.gen_range(1..=self.nonce_upper_bound);
        let commitment = commit(self.secret.as_bytes(), nonce);
        self.nonce = Some(nonce);
        self.commitment = Some(commitment);
        commitment
    }

    /// The opening for the current commitment
    pub fn open(&self) -> Result<Opening, ProtocolError> {
        let nonce = self.nonce.ok_or(ProtocolError::NotCommitted)?;
        Ok(Opening::new(self.secret.clone(), nonce))
    }

    pub fn commitment(&self) -> Option<Commitment> {
        self.commitment
    }

    pub fn nonce_upper_bound(&self) -> u64 {
        self.nonce_upper_bound
    }
}
