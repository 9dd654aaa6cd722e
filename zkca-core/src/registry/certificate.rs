use crate::commitment::Commitment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record that a client committed to a secret, immutable once issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Position in issuance order, starting at 0
    pub serial: u64,
    pub client_id: String,
    pub client_name: String,
    pub commitment: Commitment,
    pub issued_at: DateTime<Utc>,
}

impl Certificate {
    pub fn summary(&self) -> String {
        format!(
            "#{} {} ({}) commitment={}… issued {}",
            self.serial,
            self.client_name,
            self.client_id,
            self.commitment.short(),
            self.issued_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
