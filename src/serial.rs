use std::fmt;

use der::{Decode, Encode};

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{DevCaError, Result};

/// A certificate serial number below 2^128.
///
/// [`SerialNumber::random`] is what certificate creation uses unless a fixed
/// value is supplied through the options; uniqueness across authorities is
/// not tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerialNumber(u128);

impl SerialNumber {
    /// Draw a serial uniformly from `[0, 2^128)` straight from the
    /// operating system's random source.
    ///
    /// Fails with [`DevCaError::KeyGeneration`] when the source is
    /// unavailable.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| DevCaError::KeyGeneration(format!("entropy source failed: {e}")))?;
        Ok(Self(u128::from_be_bytes(bytes)))
    }

    /// A caller-chosen serial, for repeatable output in tests.
    pub const fn fixed(value: u128) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u128 {
        self.0
    }

    pub(crate) fn to_x509(self) -> Result<x509_cert::serial_number::SerialNumber> {
        let bytes = self.0.to_be_bytes();
        let first = bytes
            .iter()
            .position(|b| *b != 0)
            .unwrap_or(bytes.len() - 1);
        Ok(x509_cert::serial_number::SerialNumber::new(&bytes[first..])?)
    }

    /// Interpret an encoded serial. Returns `None` for negative serials or
    /// ones that do not fit in 128 bits.
    pub(crate) fn from_x509(serial: &x509_cert::serial_number::SerialNumber) -> Option<Self> {
        // The INTEGER content octets are two's complement.
        let encoded = serial.to_der().ok()?;
        let any = der::Any::from_der(&encoded).ok()?;
        let bytes = any.value();
        if bytes.first().is_some_and(|b| b & 0x80 != 0) {
            return None;
        }
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let magnitude = &bytes[first..];
        if magnitude.len() > 16 {
            return None;
        }
        Some(Self(
            magnitude
                .iter()
                .fold(0u128, |acc, b| (acc << 8) | u128::from(*b)),
        ))
    }
}

impl From<u128> for SerialNumber {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}
