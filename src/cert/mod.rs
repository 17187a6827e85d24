pub mod extensions;
pub mod params;

use der::{Decode, Header, Reader, SliceReader, Tag};
use extensions::{BasicConstraints, ExtendedKeyUsage, KeyUsage, ToAndFromX509Extension};
use params::{DistinguishedName, Validity};
use tracing::trace;
use x509_cert::name::Name;

use crate::error::{DevCaError, Result};
use crate::key::{PrivateKey, PublicKey};
use crate::pem_utils::{self, PemTag};
use crate::serial::SerialNumber;

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRsa,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            // RFC 4055 requires explicit NULL parameters for RSA signatures.
            SignatureAlgorithm::Sha256WithRsa => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::Any::null()),
            },
        }
    }
}

/// A signed X.509 certificate, its DER encoding and, optionally, a private
/// key paired with it.
///
/// The parsed structure is always the decode of the stored DER: every
/// constructor goes through [`Certificate::from_der`]. The paired key is not
/// checked against the certificate's public key, so a certificate can be
/// loaded next to an unrelated key for inspection.
#[derive(Debug, Clone)]
pub struct Certificate {
    inner: x509_cert::Certificate,
    der: Vec<u8>,
    key: Option<PrivateKey>,
}

impl Certificate {
    /// Parses a `CERTIFICATE` PEM block.
    pub fn from_pem(data: impl AsRef<[u8]>, key: Option<PrivateKey>) -> Result<Self> {
        let der = pem_utils::unwrap_expecting(data, &PemTag::Certificate)?;
        Self::from_der(&der, key)
    }

    /// Parses a DER encoded certificate.
    pub fn from_der(der: &[u8], key: Option<PrivateKey>) -> Result<Self> {
        let inner = x509_cert::Certificate::from_der(der)
            .map_err(|e| DevCaError::CertificateParse(e.to_string()))?;
        trace!(len = der.len(), has_key = key.is_some(), "parsed certificate");
        Ok(Self {
            inner,
            der: der.to_vec(),
            key,
        })
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> String {
        pem_utils::wrap(&self.der, &PemTag::Certificate)
    }

    /// The DER encoding the certificate was signed or loaded as.
    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    /// The private key paired with this certificate, if any.
    pub fn key(&self) -> Option<&PrivateKey> {
        self.key.as_ref()
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// Serial number, or `None` if it is negative or wider than 128 bits.
    pub fn serial_number(&self) -> Option<SerialNumber> {
        SerialNumber::from_x509(&self.inner.tbs_certificate.serial_number)
    }

    pub fn validity(&self) -> Validity {
        Validity::from_x509(&self.inner.tbs_certificate.validity)
    }

    /// The RSA public key embedded in the certificate.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Issuer and subject names are identical.
    pub fn is_self_issued(&self) -> bool {
        self.inner.tbs_certificate.issuer == self.inner.tbs_certificate.subject
    }

    /// Decodes the extension of type `E`, if the certificate carries one.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Whether the extension with `E`'s OID is marked critical.
    pub fn is_extension_critical<E: ToAndFromX509Extension>(&self) -> Option<bool> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| ext.critical)
    }

    pub fn basic_constraints(&self) -> Result<Option<BasicConstraints>> {
        self.extension()
    }

    pub fn key_usage(&self) -> Result<Option<KeyUsage>> {
        self.extension()
    }

    pub fn extended_key_usage(&self) -> Result<Option<ExtendedKeyUsage>> {
        self.extension()
    }

    /// Basic constraints are present and assert CA.
    pub fn is_ca(&self) -> bool {
        matches!(self.basic_constraints(), Ok(Some(bc)) if bc.is_ca)
    }

    /// Checks that this certificate was signed by the private half of
    /// `issuer_key`.
    pub fn verify_signed_by(&self, issuer_key: &PublicKey) -> Result<()> {
        if self.inner.signature_algorithm.oid != const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION
        {
            return Err(DevCaError::SignatureInvalid);
        }
        let tbs = self.tbs_der()?;
        let signature = self
            .inner
            .signature
            .as_bytes()
            .ok_or(DevCaError::SignatureInvalid)?;
        issuer_key.verify(tbs, signature)
    }

    // The tbsCertificate TLV exactly as it appears in the stored DER.
    fn tbs_der(&self) -> Result<&[u8]> {
        let mut reader = SliceReader::new(&self.der)?;
        let header = Header::decode(&mut reader)?;
        header.tag.assert_eq(Tag::Sequence)?;
        Ok(reader.tlv_bytes()?)
    }

    pub(crate) fn x509_subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }
}

impl PartialEq for Certificate {
    /// Certificates compare by their DER encoding and paired key.
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der && self.key == other.key
    }
}

impl Eq for Certificate {}
