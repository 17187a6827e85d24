//! Error type shared by every module.

use thiserror::Error;

/// Shorthand for results returned throughout the crate.
pub type Result<T> = std::result::Result<T, DevCaError>;

/// Represents errors that can occur while minting, encoding or loading
/// keys and certificates.
///
/// Every operation either returns a fully formed value or one of these; no
/// partially built key or certificate is ever handed back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DevCaError {
    /// The random source or the key generation primitive failed.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Bytes that were supposed to hold an RSA private key did not.
    #[error("Malformed private key: {0}")]
    MalformedKey(String),

    /// A zero-length buffer was handed to a decoder.
    #[error("Empty input")]
    EmptyInput,

    /// The text contained no PEM block that could be decoded.
    #[error("No PEM block found: {0}")]
    NoBlockFound(String),

    /// A PEM block was decoded but carries a different label than the caller
    /// asked for.
    #[error("PEM block is not of type {expected}: {found:?}")]
    TypeMismatch { expected: String, found: String },

    /// DER bytes are not a structurally valid X.509 certificate.
    #[error("Failed to parse certificate: {0}")]
    CertificateParse(String),

    /// The certificate template could not be encoded or signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    Encoding(String),

    /// A signature did not verify against the given public key.
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// An authority was asked to sign without a private key attached.
    #[error("Authority has no private key to sign with")]
    MissingSigningKey,

    /// The requested validity window cannot be represented in a certificate.
    #[error("Invalid validity window: {0}")]
    InvalidValidity(String),
}

impl From<der::Error> for DevCaError {
    fn from(err: der::Error) -> Self {
        DevCaError::Encoding(err.to_string())
    }
}

impl From<rsa::Error> for DevCaError {
    fn from(err: rsa::Error) -> Self {
        DevCaError::KeyGeneration(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for DevCaError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        DevCaError::MalformedKey(err.to_string())
    }
}

impl From<pem::PemError> for DevCaError {
    fn from(err: pem::PemError) -> Self {
        DevCaError::NoBlockFound(err.to_string())
    }
}
