//! # devca - Throwaway Certificate Authorities for Tests
//!
//! devca mints short-lived X.509 certificates for testing and development,
//! built entirely on rustcrypto libraries. It creates a self-signed RSA root
//! authority, signs server certificates under it, and persists and loads both
//! as DER or PEM.
//!
//! ## Formats
//!
//! - **DER**: X.509 certificates, PKCS#1 RSA private keys, SPKI public keys
//! - **PEM**: the DER forms wrapped with a `CERTIFICATE`, `RSA PRIVATE KEY` or
//!   `PUBLIC KEY` label. Loading checks the label.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devca::{authority::Authority, cert::params::CertOptions};
//!
//! # fn main() -> devca::error::Result<()> {
//! let root = Authority::new(
//!     None,
//!     &CertOptions::builder()
//!         .common_name("root")
//!         .valid_for(time::Duration::hours(24))
//!         .build(),
//! )?;
//!
//! let leaf = root.new_cert(
//!     None,
//!     &CertOptions::builder()
//!         .common_name("leaf")
//!         .valid_for(time::Duration::hours(1))
//!         .build(),
//! )?;
//! assert_eq!(leaf.issuer().common_name, "root");
//!
//! // Persist, then load the authority again with its key.
//! let root_pem = root.to_pem();
//! let key_pem = root.key().expect("fresh authorities hold their key").to_pem()?;
//! let key = devca::key::PrivateKey::from_pem(&key_pem)?;
//! let reloaded = Authority::from_pem(&root_pem, Some(key))?;
//! assert_eq!(reloaded.to_der(), root.to_der());
//! # Ok(())
//! # }
//! ```
//!
//! ## Deterministic output
//!
//! Keys and serial numbers come from the operating system's random source.
//! Tests that need repeatable certificates pass their own [`key::PrivateKey`]
//! and a fixed [`serial::SerialNumber`] through
//! [`cert::params::CertOptions`].
//!
//! ## Module Organization
//!
//! - [`key`]: RSA key generation and (de)serialization
//! - [`pem_utils`]: PEM wrapping and label checks
//! - [`cert`]: Certificate parsing, encoding and inspection
//! - [`authority`]: Root authority creation, loading and signing
//! - [`issuer`]: The signing step shared by self-signed and issued certificates
//! - [`serial`]: Serial number policy
//! - [`error`]: Error types
//! - [`tbs_certificate`]: Certificate templates

pub mod authority;
pub mod cert;
pub mod error;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod serial;
pub mod tbs_certificate;

pub use authority::Authority;
pub use cert::Certificate;
pub use cert::params::CertOptions;
pub use error::{DevCaError, Result};
pub use key::{PrivateKey, PublicKey};
