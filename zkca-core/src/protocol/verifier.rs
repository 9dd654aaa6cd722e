//! Verifier — recomputes a commitment from a disclosed opening
//!
//! The verifier sees the secret in clear. Nothing here is zero-knowledge.

use crate::commitment::{commit, Commitment, Nonce, Opening};
use crate::config::ProtocolConfig;
use rand::rngs::StdRng;
use rand::RngCore;

use super::simulator::AdversarialSimulator;
use super::ProtocolError;

/// A capability that turns a revealed opening into a verdict.
///
/// Sessions hold one of these; tests inject fakes through
/// [`Session::new`](super::Session::new).
pub trait VerificationStrategy {
    fn name(&self) -> &'static str;

    /// `true` accepts the opening
    fn evaluate(&mut self, commitment: &Commitment, opening: &Opening) -> bool;
}

/// Baseline verifier: constant-time equality against the recomputed digest
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    /// Reserved challenge context, not consulted by the baseline check
    challenge: Option<String>,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_challenge(challenge: impl Into<String>) -> Self {
        Self {
            challenge: Some(challenge.into()),
        }
    }

    pub fn challenge(&self) -> Option<&str> {
        self.challenge.as_deref()
    }

    pub fn verify(&self, commitment: &Commitment, secret: impl AsRef<[u8]>, nonce: Nonce) -> bool {
        commit(secret.as_ref(), nonce).ct_eq(commitment)
    }
}

impl VerificationStrategy for Verifier {
    fn name(&self) -> &'static str {
        "equality"
    }

    fn evaluate(&mut self, commitment: &Commitment, opening: &Opening) -> bool {
        self.verify(commitment, &opening.secret, opening.nonce)
    }
}

/// Equality check followed by a bounded forgery attempt on the same
/// commitment and nonce. Accepts only when the opening matches and the
/// simulator found no forgery.
pub struct StressTestedVerifier<R = StdRng> {
    verifier: Verifier,
    simulator: AdversarialSimulator<R>,
    trials: u32,
}

impl StressTestedVerifier<StdRng> {
    pub fn from_config(config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        let simulator = AdversarialSimulator::from_config(config)?;
        Ok(Self::new(Verifier::new(), simulator, config.simulator_trials))
    }
}

impl<R: RngCore> StressTestedVerifier<R> {
    pub fn new(verifier: Verifier, simulator: AdversarialSimulator<R>, trials: u32) -> Self {
        Self {
            verifier,
            simulator,
            trials,
        }
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }
}

impl<R: RngCore> VerificationStrategy for StressTestedVerifier<R> {
    fn name(&self) -> &'static str {
        "stress_tested"
    }

    fn evaluate(&mut self, commitment: &Commitment, opening: &Opening) -> bool {
        if !self.verifier.verify(commitment, &opening.secret, opening.nonce) {
            return false;
        }
        let report = self.simulator.run(commitment, opening.nonce, self.trials);
        if !report.is_resistant() {
            log::warn!(
                "Forgery found for commitment {} after {} hash evaluations",
                commitment.short(),
                report.hash_evaluations
            );
        }
        report.is_resistant()
    }
}
