//! Certificate authority — append-only, order-preserving certificate store
//!
//! Issuance serializes on a write lock that covers the uniqueness check and
//! the append. Readers take a read lock and copy out a snapshot, so they see
//! a prefix of the issuance sequence and never a partial certificate.

use crate::commitment::{Opening, Secret};
use crate::config::ProtocolConfig;
use crate::protocol::{Prover, ProtocolError, Verifier};
use chrono::Utc;
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::Certificate;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Client already holds a certificate: {0}")]
    DuplicateClient(String),

    #[error("No certificate for client: {0}")]
    UnknownClient(String),

    #[error("Refusing to issue a certificate for an empty secret")]
    EmptySecret,

    #[error("Registry file is inconsistent: {0}")]
    CorruptStore(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct Ledger {
    certificates: Vec<Certificate>,
    /// client id -> position in `certificates`
    client_ids: HashMap<String, usize>,
}

/// On-disk form
#[derive(Serialize, Deserialize)]
struct RegistryFile {
    certificates: Vec<Certificate>,
}

pub struct CertificateAuthority {
    nonce_upper_bound: u64,
    ledger: RwLock<Ledger>,
}

impl CertificateAuthority {
    pub fn new(config: &ProtocolConfig) -> Result<Self, RegistryError> {
        config.validate().map_err(ProtocolError::from)?;
        Ok(Self {
            nonce_upper_bound: config.nonce_upper_bound,
            ledger: RwLock::new(Ledger::default()),
        })
    }

    /// Commit to `secret` and record a certificate for `client_id`
    pub fn issue(
        &self,
        client_id: &str,
        client_name: &str,
        secret: impl Into<Secret>,
    ) -> Result<Certificate, RegistryError> {
        self.issue_with_opening(client_id, client_name, secret)
            .map(|(certificate, _)| certificate)
    }

    /// Like [`issue`](Self::issue), also returning the opening the client
    /// needs to authenticate against the certificate later
    pub fn issue_with_opening(
        &self,
        client_id: &str,
        client_name: &str,
        secret: impl Into<Secret>,
    ) -> Result<(Certificate, Opening), RegistryError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(RegistryError::EmptySecret);
        }
        if self.ledger.read().client_ids.contains_key(client_id) {
            return Err(RegistryError::DuplicateClient(client_id.to_string()));
        }

        let mut prover = Prover::new(secret, self.nonce_upper_bound)?;
        let commitment = prover.commit();
        let opening = prover.open()?;

        let mut ledger = self.ledger.write();
        if ledger.client_ids.contains_key(client_id) {
            return Err(RegistryError::DuplicateClient(client_id.to_string()));
        }
        let certificate = Certificate {
            serial: ledger.certificates.len() as u64,
            client_id: client_id.to_string(),
            client_name: client_name.to_string(),
            commitment,
            issued_at: Utc::now(),
        };
        let index = ledger.certificates.len();
        ledger.client_ids.insert(client_id.to_string(), index);
        ledger.certificates.push(certificate.clone());
        drop(ledger);

        info!(
            "Issued certificate #{} for {} ({}): {}",
            certificate.serial,
            client_name,
            client_id,
            commitment.short()
        );
        Ok((certificate, opening))
    }

    /// Check a client's opening against its certificate
    pub fn authenticate(&self, client_id: &str, opening: &Opening) -> Result<bool, RegistryError> {
        let certificate = self
            .get(client_id)
            .ok_or_else(|| RegistryError::UnknownClient(client_id.to_string()))?;
        Ok(Verifier::new().verify(&certificate.commitment, &opening.secret, opening.nonce))
    }

    /// Snapshot of all certificates in issuance order
    pub fn list(&self) -> Vec<Certificate> {
        self.ledger.read().certificates.clone()
    }

    pub fn get(&self, client_id: &str) -> Option<Certificate> {
        let ledger = self.ledger.read();
        let index = *ledger.client_ids.get(client_id)?;
        ledger.certificates.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.ledger.read().certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> String {
        let ledger = self.ledger.read();
        let latest = ledger
            .certificates
            .last()
            .map(|c| c.issued_at.to_rfc3339())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "Authority: {} certificates, last issued {}",
            ledger.certificates.len(),
            latest
        )
    }

    /// Save all certificates as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let file = RegistryFile {
            certificates: self.list(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a registry file. Serials must run 0..n and client ids must be
    /// unique.
    pub fn load(path: impl AsRef<Path>, config: &ProtocolConfig) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        let file: RegistryFile = serde_json::from_str(&json)?;

        let authority = Self::new(config)?;
        {
            let mut ledger = authority.ledger.write();
            for (index, certificate) in file.certificates.into_iter().enumerate() {
                if certificate.serial != index as u64 {
                    return Err(RegistryError::CorruptStore(format!(
                        "certificate at position {} has serial {}",
                        index, certificate.serial
                    )));
                }
                if ledger
                    .client_ids
                    .insert(certificate.client_id.clone(), index)
                    .is_some()
                {
                    return Err(RegistryError::DuplicateClient(certificate.client_id));
                }
                ledger.certificates.push(certificate);
            }
        }
        Ok(authority)
    }
}
