//! The root certificate authority.
//!
//! An [`Authority`] is a [`Certificate`] that is self-signed, carries the CA
//! basic constraint and can sign further certificates with its own key.

use der::flagset::FlagSet;
use tracing::{debug, trace};
use x509_cert::name::Name;

use crate::cert::Certificate;
use crate::cert::extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage, KeyUsages,
    SubjectKeyIdentifier,
};
use crate::cert::params::{CertOptions, DistinguishedName, ExtensionParam, Validity};
use crate::error::{DevCaError, Result};
use crate::issuer::Issuer;
use crate::key::{PrivateKey, PublicKey};
use crate::tbs_certificate::TbsCertificate;

/// Key usage of the root certificate authority.
pub fn root_ca_key_usage() -> FlagSet<KeyUsages> {
    KeyUsages::KeyEncipherment | KeyUsages::DigitalSignature | KeyUsages::KeyCertSign
}

/// Key usage of server certificates signed by an [`Authority`].
pub fn leaf_key_usage() -> FlagSet<KeyUsages> {
    KeyUsages::KeyEncipherment | KeyUsages::DigitalSignature
}

/// A self-signed root certificate authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    cert: Certificate,
}

impl Authority {
    /// Creates a new root authority signed by `key`, generating a key when
    /// none is given.
    ///
    /// The returned authority is always parsed back from the signed DER, so
    /// what it signs children with is exactly what was persisted.
    pub fn new(key: Option<PrivateKey>, options: &CertOptions) -> Result<Self> {
        let key = match key {
            Some(key) => key,
            None => PrivateKey::generate()?,
        };
        let template = authority_template(&key.public_key(), options)?;
        let der = SelfIssuer {
            name: template.subject.as_x509_name()?,
            key: &key,
        }
        .issue(&template)?;
        debug!(
            serial = %template.serial_number,
            common_name = %options.common_name,
            "created certificate authority"
        );
        Self::from_der(&der, Some(key))
    }

    /// Loads an authority from a `CERTIFICATE` PEM block.
    ///
    /// The certificate is not checked for being self-signed or a CA; it is
    /// expected to come from [`Authority::new`] or an equivalent issuance.
    pub fn from_pem(data: impl AsRef<[u8]>, key: Option<PrivateKey>) -> Result<Self> {
        Ok(Self {
            cert: Certificate::from_pem(data, key)?,
        })
    }

    /// Loads an authority from DER. See [`Authority::from_pem`].
    pub fn from_der(der: &[u8], key: Option<PrivateKey>) -> Result<Self> {
        Ok(Self {
            cert: Certificate::from_der(der, key)?,
        })
    }

    /// Re-derives the authority from its own DER and key.
    pub fn reload(&self) -> Result<Self> {
        trace!("reloading certificate authority");
        Self::from_der(self.cert.to_der(), self.cert.key().cloned())
    }

    /// Signs a new server certificate for `options.common_name`, generating
    /// a key for it when none is given.
    pub fn new_cert(&self, key: Option<PrivateKey>, options: &CertOptions) -> Result<Certificate> {
        // Fail before spending time on key generation.
        self.signing_key()?;
        let key = match key {
            Some(key) => key,
            None => PrivateKey::generate()?,
        };
        let template = server_template(&key.public_key(), options)?;
        let der = self.issue(&template)?;
        Certificate::from_der(&der, Some(key))
    }

    pub fn to_pem(&self) -> String {
        self.cert.to_pem()
    }

    pub fn to_der(&self) -> &[u8] {
        self.cert.to_der()
    }

    pub fn key(&self) -> Option<&PrivateKey> {
        self.cert.key()
    }

    /// The authority's own certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.cert
    }
}

impl Issuer for Authority {
    fn issuer_name(&self) -> Result<Name> {
        Ok(self.cert.x509_subject().clone())
    }

    fn signing_key(&self) -> Result<&PrivateKey> {
        self.cert.key().ok_or(DevCaError::MissingSigningKey)
    }

    fn authority_key_identifier(&self) -> Option<Vec<u8>> {
        match self.cert.extension::<SubjectKeyIdentifier>() {
            Ok(Some(ski)) => Some(ski.0),
            _ => None,
        }
    }
}

// Signs a certificate with the key it certifies.
struct SelfIssuer<'a> {
    name: Name,
    key: &'a PrivateKey,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Result<Name> {
        Ok(self.name.clone())
    }

    fn signing_key(&self) -> Result<&PrivateKey> {
        Ok(self.key)
    }

    fn authority_key_identifier(&self) -> Option<Vec<u8>> {
        None
    }
}

fn authority_template(public_key: &PublicKey, options: &CertOptions) -> Result<TbsCertificate> {
    let extensions = vec![
        ExtensionParam::from_extension(KeyUsage(root_ca_key_usage()), true)?,
        ExtensionParam::from_extension(
            ExtendedKeyUsage {
                usage: vec![ExtendedKeyUsageOption::ServerAuth],
            },
            false,
        )?,
        ExtensionParam::from_extension(
            BasicConstraints {
                is_ca: true,
                max_path_length: None,
            },
            true,
        )?,
        ExtensionParam::from_extension(SubjectKeyIdentifier(public_key.key_identifier()?), false)?,
    ];
    Ok(TbsCertificate {
        serial_number: options.serial()?,
        validity: Validity::from_now(options.valid_for)?,
        subject: DistinguishedName::new(options.common_name.clone()),
        subject_public_key: public_key.clone(),
        extensions,
    })
}

fn server_template(public_key: &PublicKey, options: &CertOptions) -> Result<TbsCertificate> {
    let extensions = vec![
        ExtensionParam::from_extension(KeyUsage(leaf_key_usage()), true)?,
        ExtensionParam::from_extension(
            ExtendedKeyUsage {
                usage: vec![ExtendedKeyUsageOption::ServerAuth],
            },
            false,
        )?,
        ExtensionParam::from_extension(BasicConstraints::default(), true)?,
    ];
    Ok(TbsCertificate {
        serial_number: options.serial()?,
        validity: Validity::from_now(options.valid_for)?,
        subject: DistinguishedName::new(options.common_name.clone()),
        subject_public_key: public_key.clone(),
        extensions,
    })
}
