use std::time::SystemTime;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::{Any, Tag, Tagged};
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::{DevCaError, Result};
use crate::serial::SerialNumber;

/// Options for a certificate minted by an [`Authority`](crate::authority::Authority).
///
/// ```
/// use devca::cert::params::CertOptions;
///
/// let options = CertOptions::builder()
///     .common_name("leaf.test")
///     .valid_for(time::Duration::hours(1))
///     .build();
/// assert_eq!(options.common_name, "leaf.test");
/// ```
#[derive(Clone, Debug, Builder)]
pub struct CertOptions {
    /// How long the certificate stays valid, counted from signing time.
    #[builder(default = Duration::hours(24))]
    pub valid_for: Duration,
    /// Common name of the certificate subject.
    #[builder(default = "localhost".to_string(), into)]
    pub common_name: String,
    /// Serial to use instead of a random one.
    pub serial_number: Option<SerialNumber>,
}

impl Default for CertOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CertOptions {
    pub(crate) fn serial(&self) -> Result<SerialNumber> {
        match self.serial_number {
            Some(serial) => Ok(serial),
            None => SerialNumber::random(),
        }
    }
}

/// Subject or issuer name. Only the common name is modelled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
}

impl DistinguishedName {
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
        }
    }

    /// Converts the name to its X.509 form, a single UTF8String CN.
    ///
    /// An empty common name yields an empty name.
    pub fn as_x509_name(&self) -> Result<Name> {
        if self.common_name.is_empty() {
            return Ok(RdnSequence(Vec::new()));
        }
        let attr = AttributeTypeAndValue {
            oid: const_oid::db::rfc4519::CN,
            value: Any::new(Tag::Utf8String, self.common_name.as_bytes().to_vec())?,
        };
        let rdn = RelativeDistinguishedName(der::asn1::SetOfVec::try_from(vec![attr])?);
        Ok(RdnSequence(vec![rdn]))
    }

    /// Reads the first common name out of an X.509 name.
    pub fn from_x509_name(x509dn: &Name) -> Self {
        let common_name = x509dn
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .filter(|attr| attr.oid == const_oid::db::rfc4519::CN)
            .find_map(|attr| match attr.value.tag() {
                Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::TeletexString => {
                    std::str::from_utf8(attr.value.value()).ok().map(str::to_string)
                }
                _ => None,
            })
            .unwrap_or_default();
        Self { common_name }
    }
}

/// Certificate validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A window starting now and lasting `valid_for`.
    ///
    /// Both ends are truncated to whole seconds since that is all the
    /// certificate encoding keeps, so a fractional `valid_for` loses its
    /// sub-second part.
    pub fn from_now(valid_for: Duration) -> Result<Self> {
        let now = OffsetDateTime::now_utc();
        let not_before = now
            .replace_nanosecond(0)
            .map_err(|e| DevCaError::InvalidValidity(e.to_string()))?;
        let not_after = not_before
            .checked_add(valid_for)
            .ok_or_else(|| {
                DevCaError::InvalidValidity(format!("{valid_for} overflows the calendar"))
            })?
            .replace_nanosecond(0)
            .map_err(|e| DevCaError::InvalidValidity(e.to_string()))?;
        Ok(Self {
            not_before,
            not_after,
        })
    }

    pub fn duration(&self) -> Duration {
        self.not_after - self.not_before
    }

    pub(crate) fn to_x509(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: to_x509_time(self.not_before)?,
            not_after: to_x509_time(self.not_after)?,
        })
    }

    pub(crate) fn from_x509(validity: &x509_cert::time::Validity) -> Self {
        Self {
            not_before: from_x509_time(&validity.not_before),
            not_after: from_x509_time(&validity.not_after),
        }
    }
}

/// RFC 5280 4.1.2.5: UTCTime through 2049, GeneralizedTime from 2050 on.
fn to_x509_time(at: OffsetDateTime) -> Result<x509_cert::time::Time> {
    let system_time = SystemTime::from(at);
    let time = if at.year() < 2050 {
        x509_cert::time::Time::UtcTime(der::asn1::UtcTime::from_system_time(system_time)?)
    } else {
        x509_cert::time::Time::GeneralTime(der::asn1::GeneralizedTime::from_system_time(
            system_time,
        )?)
    };
    Ok(time)
}

fn from_x509_time(time: &x509_cert::time::Time) -> OffsetDateTime {
    match time {
        x509_cert::time::Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        x509_cert::time::Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}

/// Represents an X.509 extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    pub(crate) fn to_x509(&self) -> Result<x509_cert::ext::Extension> {
        Ok(x509_cert::ext::Extension {
            extn_id: self.oid,
            critical: self.critical,
            extn_value: der::asn1::OctetString::new(self.value.clone())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = CertOptions::default();
        assert_eq!(options.valid_for, Duration::hours(24));
        assert_eq!(options.common_name, "localhost");
        assert!(options.serial_number.is_none());
    }

    #[test]
    fn test_fixed_serial_is_used() {
        let options = CertOptions::builder()
            .serial_number(SerialNumber::fixed(42))
            .build();
        assert_eq!(options.serial().unwrap(), SerialNumber::fixed(42));
    }

    #[test]
    fn test_name_conversion() {
        let name = DistinguishedName::new("root, with comma");
        let x509 = name.as_x509_name().unwrap();
        assert_eq!(DistinguishedName::from_x509_name(&x509), name);

        let empty = DistinguishedName::default().as_x509_name().unwrap();
        assert!(empty.0.is_empty());
    }

    #[test]
    fn test_validity_is_whole_seconds_and_exact() {
        let validity = Validity::from_now(Duration::hours(1)).unwrap();
        assert_eq!(validity.not_before.nanosecond(), 0);
        assert_eq!(validity.duration(), Duration::hours(1));

        let x509 = validity.to_x509().unwrap();
        assert_eq!(Validity::from_x509(&x509), validity);
    }

    #[test]
    fn test_validity_drops_fractional_seconds() {
        let validity = Validity::from_now(Duration::milliseconds(1500)).unwrap();
        assert_eq!(validity.not_after.nanosecond(), 0);
        assert_eq!(validity.duration(), Duration::seconds(1));

        let encoded = Validity::from_x509(&validity.to_x509().unwrap());
        assert_eq!(encoded.duration(), Duration::seconds(1));
        assert_eq!(encoded, validity);
    }

    #[test]
    fn test_validity_past_2049_uses_generalized_time() {
        let validity = Validity::from_now(Duration::days(365 * 60)).unwrap();
        let x509 = validity.to_x509().unwrap();
        assert!(matches!(x509.not_before, x509_cert::time::Time::UtcTime(_)));
        assert!(matches!(
            x509.not_after,
            x509_cert::time::Time::GeneralTime(_)
        ));
        assert_eq!(Validity::from_x509(&x509), validity);
    }
}
