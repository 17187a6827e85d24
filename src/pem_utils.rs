use std::fmt;

use tracing::trace;

use crate::error::{DevCaError, Result};

/// Label carried in the header and footer of a PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PemTag {
    /// `CERTIFICATE`: a DER encoded X.509 certificate.
    Certificate,
    /// `PUBLIC KEY`: a DER encoded SubjectPublicKeyInfo.
    PublicKey,
    /// `RSA PRIVATE KEY`: a PKCS#1 DER encoded RSA private key.
    RsaPrivateKey,
    /// Any label this crate does not produce itself.
    Other(String),
}

impl PemTag {
    pub fn as_str(&self) -> &str {
        match self {
            PemTag::Certificate => "CERTIFICATE",
            PemTag::PublicKey => "PUBLIC KEY",
            PemTag::RsaPrivateKey => "RSA PRIVATE KEY",
            PemTag::Other(label) => label,
        }
    }
}

impl From<&str> for PemTag {
    fn from(label: &str) -> Self {
        match label {
            "CERTIFICATE" => PemTag::Certificate,
            "PUBLIC KEY" => PemTag::PublicKey,
            "RSA PRIVATE KEY" => PemTag::RsaPrivateKey,
            other => PemTag::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn wrap(der: &[u8], tag: &PemTag) -> String {
    let pem = pem::Pem::new(tag.as_str(), der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Decode the first PEM block found in `data`, returning its DER payload and
/// label.
///
/// The label is returned as-is; checking it is the caller's job, see
/// [`unwrap_expecting`].
pub fn unwrap(data: impl AsRef<[u8]>) -> Result<(Vec<u8>, PemTag)> {
    let data = data.as_ref();
    if data.is_empty() {
        return Err(DevCaError::EmptyInput);
    }
    let pem = pem::parse(data)?;
    trace!(tag = pem.tag(), len = pem.contents().len(), "decoded PEM block");
    Ok((pem.contents().to_vec(), PemTag::from(pem.tag())))
}

/// Decode a PEM block and require its label to be `expected`.
pub fn unwrap_expecting(data: impl AsRef<[u8]>, expected: &PemTag) -> Result<Vec<u8>> {
    let (der, tag) = unwrap(data)?;
    if &tag != expected {
        return Err(DevCaError::TypeMismatch {
            expected: expected.to_string(),
            found: tag.to_string(),
        });
    }
    Ok(der)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_uses_tag_and_lf() {
        let text = wrap(&[1, 2, 3, 4], &PemTag::Certificate);
        assert!(text.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(text.trim_end().ends_with("-----END CERTIFICATE-----"));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_unwrap_returns_payload_and_tag() {
        let text = wrap(&[9, 8, 7], &PemTag::RsaPrivateKey);
        let (der, tag) = unwrap(&text).unwrap();
        assert_eq!(der, vec![9, 8, 7]);
        assert_eq!(tag, PemTag::RsaPrivateKey);
    }

    #[test]
    fn test_unwrap_empty_input() {
        assert_eq!(unwrap(b"").unwrap_err(), DevCaError::EmptyInput);
    }

    #[test]
    fn test_unwrap_no_block() {
        let err = unwrap("just some text, nothing wrapped").unwrap_err();
        assert!(matches!(err, DevCaError::NoBlockFound(_)), "{err:?}");
    }

    #[test]
    fn test_unwrap_expecting_mismatch() {
        let text = wrap(&[1], &PemTag::RsaPrivateKey);
        let err = unwrap_expecting(&text, &PemTag::Certificate).unwrap_err();
        assert_eq!(
            err,
            DevCaError::TypeMismatch {
                expected: "CERTIFICATE".to_string(),
                found: "RSA PRIVATE KEY".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_label_is_preserved() {
        let text = wrap(&[1], &PemTag::Other("EC PRIVATE KEY".to_string()));
        let (_, tag) = unwrap(&text).unwrap();
        assert_eq!(tag, PemTag::Other("EC PRIVATE KEY".to_string()));
    }
}
