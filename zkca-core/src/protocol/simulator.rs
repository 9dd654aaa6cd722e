//! Adversarial simulator — bounded brute-force forgery attempts
//!
//! Given a commitment and its nonce, draw random candidate secrets and check
//! whether any of them opens the commitment. A "resistant" verdict only says
//! that `trials` guesses missed. It is a heuristic confidence signal and
//! never a soundness guarantee.
//!
//! With an alphabet of `A` distinct symbols and candidates of length `L`,
//! the candidate space is `S = A^L`. If exactly one candidate opened the
//! commitment, `trials = t` random guesses would find it with probability
//! `1 - (1 - 1/S)^t ≈ t/S`. The complement is the false-negative rate of a
//! resistant verdict. For the defaults (`A = 36`, `L = 8`, `t = 10`) the
//! detection probability is about `3.6e-12`, so a resistant verdict says
//! almost nothing about secrets outside that space.

use crate::commitment::{commit, Commitment, Nonce};
use crate::config::{ConfigError, ProtocolConfig};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub trials_requested: u32,
    /// Exactly one per trial actually run
    pub hash_evaluations: u32,
    /// The candidate that opened the commitment, if any
    pub forged_secret: Option<String>,
}

impl SimulationReport {
    /// No forgery found within the trial budget
    pub fn is_resistant(&self) -> bool {
        self.forged_secret.is_none()
    }
}

pub struct AdversarialSimulator<R = StdRng> {
    alphabet: Vec<char>,
    candidate_length: usize,
    rng: R,
}

impl AdversarialSimulator<StdRng> {
    pub fn new(alphabet: &str, candidate_length: usize) -> Result<Self, ConfigError> {
        Self::with_rng(alphabet, candidate_length, StdRng::from_entropy())
    }

    pub fn from_config(config: &ProtocolConfig) -> Result<Self, ConfigError> {
        Self::new(&config.candidate_alphabet, config.candidate_length)
    }
}

impl<R: RngCore> AdversarialSimulator<R> {
    pub fn with_rng(alphabet: &str, candidate_length: usize, rng: R) -> Result<Self, ConfigError> {
        let mut symbols: Vec<char> = Vec::new();
        for c in alphabet.chars() {
            if !symbols.contains(&c) {
                symbols.push(c);
            }
        }
        if symbols.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if candidate_length == 0 {
            return Err(ConfigError::ZeroCandidateLength);
        }
        Ok(Self {
            alphabet: symbols,
            candidate_length,
            rng,
        })
    }

    /// `true` when none of `trials` random candidates opens `commitment`
    pub fn simulate(&mut self, commitment: &Commitment, nonce: Nonce, trials: u32) -> bool {
        self.run(commitment, nonce, trials).is_resistant()
    }

    /// Run up to `trials` guesses, stopping at the first forgery
    pub fn run(&mut self, commitment: &Commitment, nonce: Nonce, trials: u32) -> SimulationReport {
        let mut hash_evaluations = 0;
        for _ in 0..trials {
            let candidate = self.draw_candidate();
            hash_evaluations += 1;
            if commit(candidate.as_bytes(), nonce).ct_eq(commitment) {
                return SimulationReport {
                    trials_requested: trials,
                    hash_evaluations,
                    forged_secret: Some(candidate),
                };
            }
        }
        log::debug!(
            "No forgery for commitment {} in {} trials (p_detect={:.3e})",
            commitment.short(),
            trials,
            self.detection_probability(trials)
        );
        SimulationReport {
            trials_requested: trials,
            hash_evaluations,
            forged_secret: None,
        }
    }

    /// Number of distinct candidates, `A^L`
    pub fn candidate_space_size(&self) -> f64 {
        (self.alphabet.len() as f64).powi(self.candidate_length as i32)
    }

    /// `L * log2(A)`
    pub fn candidate_space_bits(&self) -> f64 {
        self.candidate_length as f64 * (self.alphabet.len() as f64).log2()
    }

    /// Chance that `trials` guesses hit a single matching candidate
    pub fn detection_probability(&self, trials: u32) -> f64 {
        if trials == 0 {
            return 0.0;
        }
        let space = self.candidate_space_size();
        if space <= 1.0 {
            // every guess is the only candidate
            return 1.0;
        }
        let miss_one = (-1.0 / space).ln_1p();
        -(trials as f64 * miss_one).exp_m1()
    }

    /// False-negative rate of a resistant verdict after `trials` guesses
    pub fn false_negative_rate(&self, trials: u32) -> f64 {
        1.0 - self.detection_probability(trials)
    }

    fn draw_candidate(&mut self) -> String {
        let alphabet = &self.alphabet;
        let rng = &mut self.rng;
        (0..self.candidate_length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect()
    }
}
