//! End-to-end flows across the commitment scheme, sessions and the authority.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use zkca_core::protocol::{AdversarialSimulator, StressTestedVerifier};
use zkca_core::{
    commit, CertificateAuthority, Commitment, Opening, Prover, ProtocolConfig, ProtocolError,
    RegistryError, Session, SessionState, VerificationMode, VerificationStrategy, Verifier,
};

/// Verifies against a commitment it was configured with, ignoring the
/// one the session presents
struct PinnedVerifier {
    expected: Commitment,
}

impl VerificationStrategy for PinnedVerifier {
    fn name(&self) -> &'static str {
        "pinned"
    }

    fn evaluate(&mut self, _commitment: &Commitment, opening: &Opening) -> bool {
        Verifier::new().verify(&self.expected, &opening.secret, opening.nonce)
    }
}

#[test]
fn honest_session_reaches_verified_for_many_secrets() {
    let config = ProtocolConfig::default();
    for secret in ["my_secret_value", "secure_secret", "", "ünïcødé", "a much longer secret value"] {
        let prover = Prover::from_config(secret, &config).unwrap();
        let mut session = Session::from_config(prover, &config).unwrap();
        let outcome = session.execute().unwrap();
        assert_eq!(outcome.state, SessionState::Verified, "secret {:?}", secret);
    }
}

#[test]
fn concrete_scenario() {
    let mut prover = Prover::new("my_secret_value", 100_000).unwrap();
    let d = prover.commit();
    let n = prover.open().unwrap().nonce;

    let verifier = Verifier::new();
    assert!(verifier.verify(&d, "my_secret_value", n));
    assert!(!verifier.verify(&d, "wrong_secret", n));
}

#[test]
fn session_is_single_use_and_retry_needs_new_session() {
    let config = ProtocolConfig::default();
    let prover = Prover::from_config("s", &config).unwrap();
    let mut session = Session::new(
        prover,
        PinnedVerifier {
            expected: commit(b"non_matching_commitment", 1),
        },
    );
    let first = session.execute().unwrap();
    assert_eq!(first.state, SessionState::Rejected);
    assert!(matches!(session.execute(), Err(ProtocolError::AlreadyExecuted)));

    let retry = Prover::from_config("s", &config).unwrap();
    let mut fresh = Session::new(retry, Verifier::new());
    assert_ne!(fresh.id(), session.id());
    assert!(fresh.execute().unwrap().is_verified());
}

#[test]
fn stress_tested_mode_from_config() {
    let config = ProtocolConfig {
        verification: VerificationMode::StressTested,
        simulator_trials: 25,
        ..ProtocolConfig::default()
    };
    let prover = Prover::from_config("my_enhanced_secret_value", &config).unwrap();
    let outcome = Session::from_config(prover, &config).unwrap().execute().unwrap();
    assert!(outcome.is_verified());
    assert_eq!(outcome.strategy, "stress_tested");
}

#[test]
fn stress_tested_rejects_secret_inside_tiny_candidate_space() {
    let simulator = AdversarialSimulator::with_rng("01", 1, StdRng::seed_from_u64(3)).unwrap();
    let strategy = StressTestedVerifier::new(Verifier::new(), simulator, 64);
    let prover = Prover::with_rng("1", 1_000, StdRng::seed_from_u64(4)).unwrap();
    let outcome = Session::new(prover, strategy).execute().unwrap();
    assert_eq!(outcome.state, SessionState::Rejected);
}

#[test]
fn registry_order_and_duplicate_policy() {
    let ca = CertificateAuthority::new(&ProtocolConfig::default()).unwrap();
    let mut results = Vec::new();
    for id in ["001", "002", "001"] {
        results.push(ca.issue(id, &format!("Client{}", id), "client_secret"));
    }
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(RegistryError::DuplicateClient(_))));

    let ids: Vec<String> = ca.list().into_iter().map(|c| c.client_id).collect();
    assert_eq!(ids, vec!["001", "002"]);
}

#[test]
fn readers_see_prefixes_while_writers_issue() {
    let ca = Arc::new(CertificateAuthority::new(&ProtocolConfig::default()).unwrap());
    std::thread::scope(|scope| {
        let writer = Arc::clone(&ca);
        scope.spawn(move || {
            for i in 0..100 {
                writer.issue(&format!("c{:03}", i), "client", "secret").unwrap();
            }
        });
        for _ in 0..4 {
            let reader = Arc::clone(&ca);
            scope.spawn(move || {
                for _ in 0..50 {
                    let snapshot = reader.list();
                    for (index, cert) in snapshot.iter().enumerate() {
                        assert_eq!(cert.serial, index as u64);
                        assert_eq!(cert.client_id, format!("c{:03}", index));
                    }
                }
            });
        }
    });
    assert_eq!(ca.len(), 100);
}

#[test]
fn issued_opening_authenticates_client() {
    let ca = CertificateAuthority::new(&ProtocolConfig::default()).unwrap();
    let (cert, opening) = ca
        .issue_with_opening("001", "Client1", "client_secret_1")
        .unwrap();
    assert!(Verifier::new().verify(&cert.commitment, "client_secret_1", opening.nonce));
    assert!(ca.authenticate("001", &opening).unwrap());
}
