//! Certificate registry for ZKCA
//!
//! Each certificate records a client's commitment to a secret. The
//! authority keeps certificates in issuance order and refuses a second
//! certificate for the same client id.

mod authority;
mod certificate;

pub use authority::{CertificateAuthority, RegistryError};
pub use certificate::Certificate;
