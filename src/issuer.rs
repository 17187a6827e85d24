use der::Encode;
use tracing::debug;
use x509_cert::name::Name;

use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::AuthorityKeyIdentifier;
use crate::cert::params::{DistinguishedName, ExtensionParam};
use crate::error::{DevCaError, Result};
use crate::key::PrivateKey;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the name placed in the issuer field of issued certificates.
    fn issuer_name(&self) -> Result<Name>;

    /// Returns the key issued certificates are signed with.
    fn signing_key(&self) -> Result<&PrivateKey>;

    /// Key identifier written into issued certificates' Authority Key
    /// Identifier extension. `None` leaves the extension out.
    fn authority_key_identifier(&self) -> Option<Vec<u8>>;

    /// Signs `template`, returning the DER encoded certificate.
    fn issue(&self, template: &TbsCertificate) -> Result<Vec<u8>> {
        let signing_key = self.signing_key()?;
        let issuer = self.issuer_name()?;

        let mut template = template.clone();
        if let Some(key_identifier) = self.authority_key_identifier() {
            template = template.with_extension(ExtensionParam::from_extension(
                AuthorityKeyIdentifier { key_identifier },
                false,
            )?);
        }

        let signature_algorithm = SignatureAlgorithm::Sha256WithRsa;
        let tbs_certificate = template
            .to_tbs_certificate_inner(&issuer, signature_algorithm)
            .map_err(into_signing)?;
        let tbs_der = tbs_certificate.to_der().map_err(|e| DevCaError::Signing(e.to_string()))?;
        let signature = signing_key.sign(&tbs_der)?;

        let certificate = x509_cert::Certificate {
            tbs_certificate,
            signature_algorithm: signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| DevCaError::Signing(e.to_string()))?,
        };
        let der = certificate
            .to_der()
            .map_err(|e| DevCaError::Signing(e.to_string()))?;

        let issuer = DistinguishedName::from_x509_name(&issuer);
        debug!(
            serial = %template.serial_number,
            subject = %template.subject.common_name,
            issuer = %issuer.common_name,
            "signed certificate"
        );
        Ok(der)
    }
}

/// Encoder failures while assembling a template are reported as signing
/// failures; other kinds pass through.
fn into_signing(err: DevCaError) -> DevCaError {
    match err {
        DevCaError::Encoding(msg) => DevCaError::Signing(msg),
        other => other,
    }
}
