//! Error type.

use core::fmt;

/// Result type with the `coin-cipher` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by the typed API.
///
/// Shape errors ([`Error::InvalidLength`], [`Error::InvalidHex`]) are raised
/// before any curve arithmetic runs. The remaining variants describe values
/// which have the right shape but are not acceptable cryptographically.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Input has the wrong number of bytes.
    InvalidLength {
        /// Number of bytes the value requires.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },

    /// Input is not valid hexadecimal.
    InvalidHex,

    /// Secret key is zero or not below the group order.
    InvalidSecretKey,

    /// Public key encoding is malformed or the point is not on the curve.
    InvalidPublicKey,

    /// Signature does not verify, or `r`/`s` is zero or out of range.
    InvalidSignature,

    /// Recovery id is not in `0..=3`.
    InvalidRecoveryId,

    /// Signature uses the high `s` value.
    MalleableSignature,

    /// No public key can be recovered from the signature.
    RecoveryFailed,

    /// Deterministic generation was given an empty seed.
    EmptySeed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
            Error::InvalidHex => f.write_str("invalid hex encoding"),
            Error::InvalidSecretKey => f.write_str("invalid secret key"),
            Error::InvalidPublicKey => f.write_str("invalid public key"),
            Error::InvalidSignature => f.write_str("invalid signature"),
            Error::InvalidRecoveryId => f.write_str("invalid recovery id"),
            Error::MalleableSignature => f.write_str("signature s value is not canonical"),
            Error::RecoveryFailed => f.write_str("public key recovery failed"),
            Error::EmptySeed => f.write_str("seed is empty"),
        }
    }
}

impl core::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Error {
        Error::InvalidHex
    }
}

impl From<Error> for signature::Error {
    #[cfg(feature = "std")]
    fn from(err: Error) -> signature::Error {
        signature::Error::from_source(err)
    }

    #[cfg(not(feature = "std"))]
    fn from(_: Error) -> signature::Error {
        signature::Error::new()
    }
}

/// Checks that `bytes` holds exactly `expected` bytes.
pub(crate) fn check_length(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            expected,
            actual: bytes.len(),
        })
    }
}
