//! Protocol configuration
//!
//! Every field is optional in the JSON form; missing fields take the
//! defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound of the nonce range `[1, N]`
pub const DEFAULT_NONCE_UPPER_BOUND: u64 = 100_000;
/// Default number of forgery attempts per stress test
pub const DEFAULT_SIMULATOR_TRIALS: u32 = 10;
/// Uppercase alphanumeric
pub const DEFAULT_CANDIDATE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const DEFAULT_CANDIDATE_LENGTH: usize = 8;

/// Which verification capability a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// Recompute the commitment and compare
    #[default]
    Equality,
    /// Equality, then an adversarial simulation against the commitment
    StressTested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Nonces are drawn uniformly from `[1, nonce_upper_bound]`
    pub nonce_upper_bound: u64,
    /// Forgery attempts per stress test
    pub simulator_trials: u32,
    /// Symbols the simulator draws candidate secrets from
    pub candidate_alphabet: String,
    /// Length of each candidate secret
    pub candidate_length: usize,
    pub verification: VerificationMode,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            nonce_upper_bound: DEFAULT_NONCE_UPPER_BOUND,
            simulator_trials: DEFAULT_SIMULATOR_TRIALS,
            candidate_alphabet: DEFAULT_CANDIDATE_ALPHABET.to_string(),
            candidate_length: DEFAULT_CANDIDATE_LENGTH,
            verification: VerificationMode::Equality,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Nonce range [1, {0}] is empty or has zero width")]
    InvalidNonceRange(u64),

    #[error("Candidate alphabet is empty")]
    EmptyAlphabet,

    #[error("Candidate length must be at least 1")]
    ZeroCandidateLength,

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolConfig {
    /// Reject configurations the protocol cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_nonce_bound(self.nonce_upper_bound)?;
        if self.candidate_alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if self.candidate_length == 0 {
            return Err(ConfigError::ZeroCandidateLength);
        }
        Ok(())
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Bits of entropy a nonce contributes: `log2(N)`
    pub fn nonce_bits(&self) -> f64 {
        (self.nonce_upper_bound as f64).log2()
    }
}

/// `[1, N]` must contain at least two values
pub(crate) fn validate_nonce_bound(upper: u64) -> Result<(), ConfigError> {
    if upper < 2 {
        return Err(ConfigError::InvalidNonceRange(upper));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProtocolConfig::default();
        assert_eq!(config.nonce_upper_bound, 100_000);
        assert_eq!(config.simulator_trials, 10);
        assert_eq!(config.candidate_alphabet.len(), 36);
        assert_eq!(config.candidate_length, 8);
        assert_eq!(config.verification, VerificationMode::Equality);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_ranges() {
        for bound in [0, 1] {
            let config = ProtocolConfig {
                nonce_upper_bound: bound,
                ..ProtocolConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidNonceRange(b)) if b == bound
            ));
        }
    }

    #[test]
    fn test_invalid_candidates() {
        let config = ProtocolConfig {
            candidate_alphabet: String::new(),
            ..ProtocolConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyAlphabet)));

        let config = ProtocolConfig {
            candidate_length: 0,
            ..ProtocolConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCandidateLength)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ProtocolConfig =
            serde_json::from_str(r#"{"simulator_trials": 50, "verification": "stress_tested"}"#)
                .unwrap();
        assert_eq!(config.simulator_trials, 50);
        assert_eq!(config.verification, VerificationMode::StressTested);
        assert_eq!(config.nonce_upper_bound, DEFAULT_NONCE_UPPER_BOUND);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("zkca-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"nonce_upper_bound": 0}"#).unwrap();
        assert!(matches!(
            ProtocolConfig::load(&path),
            Err(ConfigError::InvalidNonceRange(0))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_nonce_bits() {
        let config = ProtocolConfig::default();
        assert!((config.nonce_bits() - 16.61).abs() < 0.01);
    }
}
