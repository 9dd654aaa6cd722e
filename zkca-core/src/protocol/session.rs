//! Session — one commit → reveal → verify run between a prover and a verifier
//!
//! ```text
//! Init ──commit──▶ Committed ──reveal──▶ Revealed ──verify──▶ Verified | Rejected
//! ```
//!
//! Sessions are single use. Once a terminal state is reached every further
//! step returns [`ProtocolError::AlreadyExecuted`]; a new attempt needs a
//! new session.

use crate::commitment::{Commitment, Opening};
use crate::config::{ProtocolConfig, VerificationMode};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Prover, ProtocolError, StressTestedVerifier, VerificationStrategy, Verifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Init,
    Committed,
    Revealed,
    Verified,
    Rejected,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Verified | SessionState::Rejected)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Init => "INIT",
            SessionState::Committed => "COMMITTED",
            SessionState::Revealed => "REVEALED",
            SessionState::Verified => "VERIFIED",
            SessionState::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}

/// A transition a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Commit,
    Reveal,
    Verify,
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStep::Commit => "commit",
            SessionStep::Reveal => "reveal",
            SessionStep::Verify => "verify",
        };
        f.write_str(name)
    }
}

/// Terminal result of a session, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub state: SessionState,
    pub commitment: Commitment,
    /// Name of the verification strategy that produced the verdict
    pub strategy: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionOutcome {
    pub fn is_verified(&self) -> bool {
        self.state == SessionState::Verified
    }

    /// Turn a rejection into [`ProtocolError::VerificationFailed`]
    pub fn into_result(self) -> Result<Self, ProtocolError> {
        if self.is_verified() {
            Ok(self)
        } else {
            Err(ProtocolError::VerificationFailed)
        }
    }
}

pub struct Session<R = StdRng> {
    id: Uuid,
    state: SessionState,
    prover: Prover<R>,
    strategy: Box<dyn VerificationStrategy + Send>,
    commitment: Option<Commitment>,
    opening: Option<Opening>,
    started_at: DateTime<Utc>,
}

impl Session<StdRng> {
    /// Pick the verification strategy named by `config.verification`
    pub fn from_config(prover: Prover<StdRng>, config: &ProtocolConfig) -> Result<Self, ProtocolError> {
        let session = match config.verification {
            VerificationMode::Equality => Self::new(prover, Verifier::new()),
            VerificationMode::StressTested => {
                Self::new(prover, StressTestedVerifier::from_config(config)?)
            }
        };
        Ok(session)
    }
}

impl<R: RngCore> Session<R> {
    pub fn new(prover: Prover<R>, strategy: impl VerificationStrategy + Send + 'static) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Init,
            prover,
            strategy: Box::new(strategy),
            commitment: None,
            opening: None,
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn commitment(&self) -> Option<Commitment> {
        self.commitment
    }

    /// INIT → COMMITTED
    pub fn commit(&mut self) -> Result<Commitment, ProtocolError> {
        self.require(SessionState::Init, SessionStep::Commit)?;
        let commitment = self.prover.commit();
        self.commitment = Some(commitment);
        self.state = SessionState::Committed;
        log::debug!("[{}] committed {}", self.short_id(), commitment.short());
        Ok(commitment)
    }

    /// COMMITTED → REVEALED. The opening stays inside the session until
    /// `verify` hands it to the strategy.
    pub fn reveal(&mut self) -> Result<(), ProtocolError> {
        self.require(SessionState::Committed, SessionStep::Reveal)?;
        self.opening = Some(self.prover.open()?);
        self.state = SessionState::Revealed;
        log::debug!("[{}] opening revealed to verifier", self.short_id());
        Ok(())
    }

    /// REVEALED → VERIFIED | REJECTED. Consumes the opening.
    pub fn verify(&mut self) -> Result<SessionOutcome, ProtocolError> {
        self.require(SessionState::Revealed, SessionStep::Verify)?;
        let (commitment, opening) = match (self.commitment, self.opening.take()) {
            (Some(c), Some(o)) => (c, o),
            _ => {
                return Err(ProtocolError::InvalidTransition {
                    from: self.state,
                    step: SessionStep::Verify,
                })
            }
        };

        let accepted = self.strategy.evaluate(&commitment, &opening);
        self.state = if accepted {
            SessionState::Verified
        } else {
            SessionState::Rejected
        };

        if accepted {
            log::info!(
                "[{}] verification succeeded via {} ({})",
                self.short_id(),
                self.strategy.name(),
                commitment.short()
            );
        } else {
            log::warn!(
                "[{}] verification failed via {} ({})",
                self.short_id(),
                self.strategy.name(),
                commitment.short()
            );
        }

        Ok(SessionOutcome {
            session_id: self.id,
            state: self.state,
            commitment,
            strategy: self.strategy.name().to_string(),
            started_at: self.started_at,
            finished_at: Utc::now(),
        })
    }

    /// Drive the remaining transitions to a terminal state
    pub fn execute(&mut self) -> Result<SessionOutcome, ProtocolError> {
        if self.state.is_terminal() {
            return Err(ProtocolError::AlreadyExecuted);
        }
        if self.state == SessionState::Init {
            self.commit()?;
        }
        if self.state == SessionState::Committed {
            self.reveal()?;
        }
        self.verify()
    }

    fn require(&self, expected: SessionState, step: SessionStep) -> Result<(), ProtocolError> {
        if self.state.is_terminal() {
            return Err(ProtocolError::AlreadyExecuted);
        }
        if self.state != expected {
            return Err(ProtocolError::InvalidTransition {
                from: self.state,
                step,
            });
        }
        Ok(())
    }

    fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::commit;
    use rand::SeedableRng;

    struct RejectAll;

    impl VerificationStrategy for RejectAll {
        fn name(&self) -> &'static str {
            "reject_all"
        }

        fn evaluate(&mut self, _commitment: &Commitment, _opening: &Opening) -> bool {
            false
        }
    }

    fn prover(secret: &str) -> Prover<StdRng> {
        Prover::with_rng(secret, 100_000, StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn test_execute_honest_session() {
        let mut session = Session::new(prover("my_secret_value"), Verifier::new());
        assert_eq!(session.state(), SessionState::Init);

        let outcome = session.execute().unwrap();
        assert!(outcome.is_verified());
        assert_eq!(outcome.state, SessionState::Verified);
        assert_eq!(outcome.strategy, "equality");
        assert_eq!(outcome.session_id, session.id());
        assert_eq!(Some(outcome.commitment), session.commitment());
        assert!(outcome.finished_at >= outcome.started_at);
    }

    #[test]
    fn test_execute_twice_fails() {
        let mut session = Session::new(prover("s"), Verifier::new());
        session.execute().unwrap();
        assert!(matches!(session.execute(), Err(ProtocolError::AlreadyExecuted)));
        assert!(matches!(session.commit(), Err(ProtocolError::AlreadyExecuted)));
        assert_eq!(session.state(), SessionState::Verified);
    }

    #[test]
    fn test_injected_rejection() {
        let mut session = Session::new(prover("another_secret"), RejectAll);
        let outcome = session.execute().unwrap();
        assert_eq!(outcome.state, SessionState::Rejected);
        assert!(matches!(
            outcome.into_result(),
            Err(ProtocolError::VerificationFailed)
        ));
        assert!(matches!(session.execute(), Err(ProtocolError::AlreadyExecuted)));
    }

    #[test]
    fn test_stepwise_transitions() {
        let mut session = Session::new(prover("s"), Verifier::new());

        assert!(matches!(
            session.reveal(),
            Err(ProtocolError::InvalidTransition {
                from: SessionState::Init,
                step: SessionStep::Reveal
            })
        ));
        assert!(matches!(
            session.verify(),
            Err(ProtocolError::InvalidTransition { .. })
        ));

        let commitment = session.commit().unwrap();
        assert_eq!(session.state(), SessionState::Committed);
        assert!(matches!(
            session.commit(),
            Err(ProtocolError::InvalidTransition {
                from: SessionState::Committed,
                step: SessionStep::Commit
            })
        ));

        session.reveal().unwrap();
        assert_eq!(session.state(), SessionState::Revealed);

        let outcome = session.verify().unwrap();
        assert_eq!(outcome.commitment, commitment);
        assert_eq!(session.state(), SessionState::Verified);
        assert!(matches!(session.verify(), Err(ProtocolError::AlreadyExecuted)));
    }

    #[test]
    fn test_execute_resumes_partial_session() {
        let mut session = Session::new(prover("s"), Verifier::new());
        session.commit().unwrap();
        let outcome = session.execute().unwrap();
        assert!(outcome.is_verified());
    }

    #[test]
    fn test_from_config_selects_strategy() {
        let config = ProtocolConfig {
            verification: VerificationMode::StressTested,
            ..ProtocolConfig::default()
        };
        let p = Prover::from_config("my_enhanced_secret_value", &config).unwrap();
        let mut session = Session::from_config(p, &config).unwrap();
        let outcome = session.execute().unwrap();
        assert_eq!(outcome.strategy, "stress_tested");
        assert!(outcome.is_verified());
    }

    #[test]
    fn test_outcome_commitment_opens_with_secret() {
        let mut session = Session::new(prover("audit-me"), Verifier::new());
        let outcome = session.execute().unwrap();
        let hits = (1..=100_000u64)
            .filter(|n| commit(b"audit-me", *n) == outcome.commitment)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Verified.to_string(), "VERIFIED");
        assert_eq!(SessionStep::Reveal.to_string(), "reveal");
        let err = ProtocolError::InvalidTransition {
            from: SessionState::Init,
            step: SessionStep::Verify,
        };
        assert_eq!(err.to_string(), "Cannot verify from state INIT");
    }
}
