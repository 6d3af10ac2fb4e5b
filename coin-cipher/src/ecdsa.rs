//! Elliptic Curve Digital Signature Algorithm (ECDSA) with public key
//! recovery.
//!
//! Signatures are always produced in canonical "low S" form as described in
//! [BIP 0062: Dealing with Malleability][1] and carry a one byte
//! [`RecoveryId`], so the signer's public key can be reconstructed from the
//! signature and the message hash alone.
//!
//! The wire format is 65 bytes:
//!
//! - `r`: 32-byte integer, big endian
//! - `s`: 32-byte integer, big endian
//! - `v`: 1-byte recovery id
//!
//! ## Signing/Recovery Example
//!
//! ```
//! # #[cfg(feature = "std")]
//! # {
//! use coin_cipher::{SecretKey, hash::sum_sha256};
//!
//! let secret_key = SecretKey::from_bytes(&[0x11; 32]).unwrap();
//! let hash = sum_sha256(b"");
//!
//! let signature = secret_key.sign_hash(&hash);
//! assert!(signature.verify_validity().is_ok());
//!
//! let public_key = signature.recover_public_key(&hash).unwrap();
//! assert_eq!(
//!     public_key.to_string(),
//!     "034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa"
//! );
//! # }
//! ```
//!
//! [1]: https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki

mod recover;
pub mod rfc6979;
mod sign;
mod verify;

pub use self::{
    recover::{recover_prehashed, recover_public_key},
    sign::sign_prehashed,
    verify::{verify_prehashed, verify_signature},
};

use crate::{Error, FieldBytes, Result, Scalar, error::check_length};
use core::{
    fmt::{self, Debug},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serdect::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Size of a recoverable signature in bytes.
pub const SIZE: usize = 65;

/// Recovery id: which of the (up to four) points with x-coordinate `r` was
/// the signer's ephemeral point `R`.
///
/// - bit 0 is set when `R.y` is odd,
/// - bit 1 is set when `R.x` was not below the group order and had to be
///   reduced to obtain `r`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Maximum supported value for the recovery id (inclusive).
    pub const MAX: u8 = 3;

    /// Create a new [`RecoveryId`] from the following 1-bit arguments:
    ///
    /// - `is_y_odd`: is the affine y-coordinate of 𝐑 odd?
    /// - `is_x_reduced`: did the affine x-coordinate of 𝐑 overflow the order?
    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(((is_x_reduced as u8) << 1) | (is_y_odd as u8))
    }

    /// Convert a `u8` into a [`RecoveryId`].
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte <= Self::MAX {
            Some(Self(byte))
        } else {
            None
        }
    }

    /// Convert this [`RecoveryId`] into a `u8`.
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Is the affine y-coordinate of 𝐑 odd?
    pub const fn is_y_odd(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Is the affine x-coordinate of 𝐑 a value greater than the curve order?
    pub const fn is_x_reduced(self) -> bool {
        (self.0 & 0b10) != 0
    }

    /// Flips the parity bit, as happens when `s` is replaced by `n - s`.
    pub(crate) const fn flip_y(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte).ok_or(Error::InvalidRecoveryId)
    }
}

impl From<RecoveryId> for u8 {
    fn from(id: RecoveryId) -> u8 {
        id.0
    }
}

/// Recoverable ECDSA/secp256k1 signature: `r ‖ s ‖ recovery id`.
///
/// Any 65-byte string can be held in a [`Signature`]; the range and
/// canonicity checks run in [`Signature::verify_validity`] and in the
/// verification and recovery routines.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Signature {
    bytes: [u8; SIZE],
}

impl Signature {
    /// Wraps raw signature bytes without checking them.
    pub const fn from_array(bytes: [u8; SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses a signature, checking only its length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length(bytes, SIZE)?;
        let mut array = [0u8; SIZE];
        array.copy_from_slice(bytes);
        Ok(Self::from_array(array))
    }

    /// Parses a lowercase or uppercase hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        check_length(hex_str.as_bytes(), SIZE * 2)?;
        let mut bytes = [0u8; SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)?;
        Ok(Self::from_array(bytes))
    }

    /// Assembles a signature from its components.
    pub fn from_scalars(r: &Scalar, s: &Scalar, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; SIZE];
        bytes[..32].copy_from_slice(&r.to_bytes());
        bytes[32..64].copy_from_slice(&s.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Self { bytes }
    }

    /// Borrow the serialized signature.
    pub fn as_bytes(&self) -> &[u8; SIZE] {
        &self.bytes
    }

    /// Serialize the signature.
    pub fn to_bytes(&self) -> [u8; SIZE] {
        self.bytes
    }

    /// The `r` component as stored.
    pub fn r(&self) -> FieldBytes {
        let mut r = FieldBytes::default();
        r.copy_from_slice(&self.bytes[..32]);
        r
    }

    /// The `s` component as stored.
    pub fn s(&self) -> FieldBytes {
        let mut s = FieldBytes::default();
        s.copy_from_slice(&self.bytes[32..64]);
        s
    }

    /// The recovery id, if the last byte holds a valid one.
    pub fn recovery_id(&self) -> Result<RecoveryId> {
        RecoveryId::try_from(self.bytes[64])
    }

    /// Decodes `(r, s, recovery id)`, checking that `0 < r, s < n`.
    pub(crate) fn components(&self) -> Result<(Scalar, Scalar, RecoveryId)> {
        let recovery_id = self.recovery_id()?;
        let r = Option::<Scalar>::from(Scalar::from_bytes(&self.r()))
            .filter(|r| !bool::from(r.is_zero()))
            .ok_or(Error::InvalidSignature)?;
        let s = Option::<Scalar>::from(Scalar::from_bytes(&self.s()))
            .filter(|s| !bool::from(s.is_zero()))
            .ok_or(Error::InvalidSignature)?;
        Ok((r, s, recovery_id))
    }

    /// Checks the shape of the signature without doing any curve arithmetic:
    /// the recovery id is in range, `r` and `s` are in `1..n` and `s` is in
    /// the lower half of that range.
    pub fn verify_validity(&self) -> Result<()> {
        let (_, s, _) = self.components()?;
        if bool::from(s.is_high()) {
            return Err(Error::MalleableSignature);
        }
        Ok(())
    }

    /// Returns the equivalent signature with `s` in the lower half of the
    /// group order, flipping the recovery id parity if needed.
    ///
    /// Returns `None` if the signature is already normalized.
    pub fn normalize_s(&self) -> Result<Option<Self>> {
        let (r, s, recovery_id) = self.components()?;
        if bool::from(s.is_high()) {
            Ok(Some(Self::from_scalars(&r, &-s, recovery_id.flip_y())))
        } else {
            Ok(None)
        }
    }
}

/// Checks the shape of a serialized signature without curve arithmetic.
pub fn verify_signature_validity(bytes: &[u8]) -> Result<()> {
    Signature::from_bytes(bytes)?.verify_validity()
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ecdsa::Signature({self:x})")
    }
}

impl fmt::LowerHex for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.bytes {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:x}")
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(hex_str: &str) -> Result<Self> {
        Self::from_hex(hex_str)
    }
}

impl From<Signature> for [u8; SIZE] {
    fn from(signature: Signature) -> [u8; SIZE] {
        signature.bytes
    }
}

impl From<[u8; SIZE]> for Signature {
    fn from(bytes: [u8; SIZE]) -> Signature {
        Signature::from_array(bytes)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = signature::Error;

    fn try_from(bytes: &[u8]) -> signature::Result<Self> {
        Ok(Self::from_bytes(bytes)?)
    }
}

impl signature::SignatureEncoding for Signature {
    type Repr = [u8; SIZE];
}

#[cfg(feature = "serde")]
impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&self.bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut bytes = [0u8; SIZE];
        serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
        Signature::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{RecoveryId, SIZE, Signature, verify_signature_validity};
    use crate::{Error, Scalar};
    use hex_literal::hex;

    // r/s pair generated with rust-secp256k1, high and low forms.
    const SIG_HIGH_S: [u8; SIZE] = hex!(
        "20c01a910ebb2610af2d763fa09b3b30923c8e408b11df2c61ad76d970a2f1bc"
        "ee2f11ef8cb00a49617d1357f4d55641090a48f201e9b959c48f6f6bec6f938f"
        "00"
    );
    const SIG_LOW_S: [u8; SIZE] = hex!(
        "20c01a910ebb2610af2d763fa09b3b30923c8e408b11df2c61ad76d970a2f1bc"
        "11d0ee10734ff5b69e82eca80b2aa9bdb1a493f4ad5ee6e1fb42ef20e3c6adb2"
        "01"
    );

    #[test]
    fn recovery_id_bits() {
        for byte in 0..=RecoveryId::MAX {
            let id = RecoveryId::from_byte(byte).unwrap();
            assert_eq!(RecoveryId::new(id.is_y_odd(), id.is_x_reduced()), id);
            assert_eq!(u8::from(id), byte);
        }
        assert_eq!(RecoveryId::try_from(4), Err(Error::InvalidRecoveryId));
        assert_eq!(RecoveryId::new(true, false).flip_y(), RecoveryId::new(false, false));
    }

    #[test]
    fn normalize_s_high() {
        let sig = Signature::from_array(SIG_HIGH_S);
        assert_eq!(sig.verify_validity(), Err(Error::MalleableSignature));

        let normalized = sig.normalize_s().unwrap().unwrap();
        assert_eq!(normalized, Signature::from_array(SIG_LOW_S));
        assert!(normalized.verify_validity().is_ok());
        assert_eq!(normalized.normalize_s(), Ok(None));
    }

    #[test]
    fn validity_rejects_out_of_range_components() {
        let mut bytes = SIG_LOW_S;
        bytes[64] = 4;
        assert_eq!(
            verify_signature_validity(&bytes),
            Err(Error::InvalidRecoveryId)
        );

        let zero_r =
            Signature::from_scalars(&Scalar::ZERO, &Scalar::ONE, RecoveryId::new(false, false));
        assert_eq!(zero_r.verify_validity(), Err(Error::InvalidSignature));

        let mut overflow_s = SIG_LOW_S;
        overflow_s[32..64].copy_from_slice(&[0xff; 32]);
        assert_eq!(
            verify_signature_validity(&overflow_s),
            Err(Error::InvalidSignature)
        );

        assert_eq!(
            verify_signature_validity(&[0u8; SIZE]),
            Err(Error::InvalidSignature)
        );
        assert_eq!(
            verify_signature_validity(&SIG_LOW_S[..64]),
            Err(Error::InvalidLength {
                expected: SIZE,
                actual: 64
            })
        );
    }

    #[test]
    fn components_round_trip() {
        let r = Scalar::from(7u64);
        let s = Scalar::from(11u64);
        let id = RecoveryId::new(true, true);
        let sig = Signature::from_scalars(&r, &s, id);
        assert_eq!(sig.components(), Ok((r, s, id)));
        assert_eq!(sig.recovery_id(), Ok(id));
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn hex_round_trip() {
        use alloc::string::ToString;

        let sig = Signature::from_array(SIG_LOW_S);
        let encoded = sig.to_string();
        assert_eq!(encoded, hex::encode(SIG_LOW_S));
        assert_eq!(encoded.parse::<Signature>(), Ok(sig));
        assert_eq!(encoded.to_uppercase().parse::<Signature>(), Ok(sig));
        assert_eq!(
            "zz".parse::<Signature>(),
            Err(Error::InvalidLength {
                expected: 2 * SIZE,
                actual: 2
            })
        );
    }
}
