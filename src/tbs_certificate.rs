use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::error::Result;
use crate::key::PublicKey;
use crate::serial::SerialNumber;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate,
/// minus the issuer name, which the [`Issuer`](crate::issuer::Issuer)
/// supplies at signing time.
///
/// # Fields
/// * `serial_number` - The identifier of the certificate.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - X.509 extensions, in the order they will be encoded.
#[derive(Clone, Debug)]
pub struct TbsCertificate {
    pub serial_number: SerialNumber,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Appends an extension.
    pub fn with_extension(mut self, extension: ExtensionParam) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Converts the template into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(
        &self,
        issuer: &Name,
        signature_algorithm: SignatureAlgorithm,
    ) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(ExtensionParam::to_x509)
            .collect::<Result<Vec<_>>>()?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: self.serial_number.to_x509()?,
            signature: signature_algorithm.into(),
            issuer: issuer.clone(),
            validity: self.validity.to_x509()?,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key.to_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }
}
