//! Secret and public keys.

use crate::{
    AffinePoint, CompressedPoint, Error, FieldBytes, Result, Scalar, UncompressedPoint,
    arithmetic::mul_generator,
    error::check_length,
    hash::{Ripemd160, Sha256, double_sha256, hash_ripemd160},
};
use core::{
    fmt::{self, Debug},
    str::FromStr,
};
use elliptic_curve::{
    rand_core::CryptoRngCore,
    subtle::{Choice, ConstantTimeEq},
    zeroize::{Zeroize, ZeroizeOnDrop},
};

#[cfg(feature = "serde")]
use serdect::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Size of a serialized [`SecretKey`].
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a serialized (compressed) [`PublicKey`].
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Size of an uncompressed [`PublicKey`].
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// A secp256k1 secret key: a scalar in `1..n`.
///
/// The scalar is wiped when the key is dropped. [`Debug`] never prints it.
#[derive(Clone)]
pub struct SecretKey {
    inner: Scalar,
}

impl SecretKey {
    /// Parses a 32-byte big-endian secret key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length(bytes, SECRET_KEY_SIZE)?;
        let mut array = FieldBytes::default();
        array.copy_from_slice(bytes);
        let key = Self::from_array(&array);
        array.zeroize();
        key
    }

    fn from_array(bytes: &FieldBytes) -> Result<Self> {
        Option::<Scalar>::from(Scalar::from_bytes(bytes))
            .and_then(Self::from_scalar)
            .ok_or(Error::InvalidSecretKey)
    }

    /// Parses a hex encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        check_length(hex_str.as_bytes(), SECRET_KEY_SIZE * 2)?;
        let mut bytes = FieldBytes::default();
        let key = hex::decode_to_slice(hex_str, &mut bytes)
            .map_err(Error::from)
            .and_then(|()| Self::from_array(&bytes));
        bytes.zeroize();
        key
    }

    /// Wraps a non-zero scalar.
    pub fn from_scalar(scalar: Scalar) -> Option<Self> {
        if bool::from(scalar.is_zero()) {
            None
        } else {
            Some(Self { inner: scalar })
        }
    }

    /// Draws a uniformly random secret key.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            inner: Scalar::random_nonzero(rng),
        }
    }

    /// Serializes the key as 32 big-endian bytes.
    pub fn to_bytes(&self) -> FieldBytes {
        self.inner.to_bytes()
    }

    /// Lowercase hex encoding of the key.
    #[cfg(feature = "alloc")]
    pub fn to_hex(&self) -> alloc::string::String {
        hex::encode(self.to_bytes())
    }

    /// The secret scalar.
    pub fn as_scalar(&self) -> &Scalar {
        &self.inner
    }

    /// Derives the matching public key `k·G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(self)
    }
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.inner.ct_eq(&other.inner)
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SecretKey {}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl FromStr for SecretKey {
    type Err = Error;

    fn from_str(hex_str: &str) -> Result<Self> {
        Self::from_hex(hex_str)
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

/// A secp256k1 public key: a point on the curve other than the identity.
///
/// Serialized in the 33-byte compressed form; 65-byte uncompressed input and
/// output is available for interoperability.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct PublicKey {
    point: AffinePoint,
}

impl PublicKey {
    /// Parses a 33-byte compressed public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_length(bytes, PUBLIC_KEY_SIZE)?;
        let mut array = [0u8; PUBLIC_KEY_SIZE];
        array.copy_from_slice(bytes);
        Option::<AffinePoint>::from(AffinePoint::from_compressed(&array))
            .ok_or(Error::InvalidPublicKey)
            .and_then(Self::from_affine)
    }

    /// Parses a 65-byte uncompressed public key.
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self> {
        check_length(bytes, UNCOMPRESSED_PUBLIC_KEY_SIZE)?;
        let mut array = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        array.copy_from_slice(bytes);
        Option::<AffinePoint>::from(AffinePoint::from_uncompressed(&array))
            .ok_or(Error::InvalidPublicKey)
            .and_then(Self::from_affine)
    }

    /// Parses a hex encoded compressed public key.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        check_length(hex_str.as_bytes(), PUBLIC_KEY_SIZE * 2)?;
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Wraps a point, rejecting the identity and points off the curve.
    pub fn from_affine(point: AffinePoint) -> Result<Self> {
        if bool::from(!point.is_identity() & point.is_valid()) {
            Ok(Self { point })
        } else {
            Err(Error::InvalidPublicKey)
        }
    }

    /// Derives `k·G` from a secret key.
    ///
    /// With the `self-check` feature the compressed encoding is decoded
    /// again and compared, aborting on any mismatch.
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        let point = mul_generator(secret_key.as_scalar()).to_affine();
        let public_key = Self { point };

        if cfg!(feature = "self-check") {
            match Self::from_bytes(&public_key.to_bytes()) {
                Ok(decoded) if decoded == public_key => {}
                _ => panic!("self-check failed: derived public key does not round-trip"),
            }
        }
        public_key
    }

    /// The underlying curve point.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Compressed SEC1 encoding.
    pub fn to_bytes(&self) -> CompressedPoint {
        self.point.to_compressed()
    }

    /// Uncompressed SEC1 encoding.
    pub fn to_uncompressed(&self) -> UncompressedPoint {
        self.point.to_uncompressed()
    }

    /// `RIPEMD160(SHA256(SHA256(compressed key)))`, the digest addresses are
    /// built from.
    pub fn address_hash(&self) -> Ripemd160 {
        let digest: Sha256 = double_sha256(&self.to_bytes());
        hash_ripemd160(digest.as_bytes())
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(secret_key: &SecretKey) -> PublicKey {
        PublicKey::from_secret_key(secret_key)
    }
}

impl From<PublicKey> for AffinePoint {
    fn from(public_key: PublicKey) -> AffinePoint {
        public_key.point
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self:x})")
    }
}

impl fmt::LowerHex for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:x}")
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(hex_str: &str) -> Result<Self> {
        Self::from_hex(hex_str)
    }
}

#[cfg(feature = "serde")]
impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
        Self::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl Serialize for SecretKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serdect::array::serialize_hex_lower_or_bin(&self.to_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut bytes = FieldBytes::default();
        serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
        let key = Self::from_array(&bytes).map_err(de::Error::custom);
        bytes.zeroize();
        key
    }
}

/// Checks that `bytes` is a valid secret key.
pub fn verify_secret_key(bytes: &[u8]) -> Result<()> {
    SecretKey::from_bytes(bytes).map(|_| ())
}

/// Checks that `bytes` is a valid compressed public key.
pub fn verify_public_key(bytes: &[u8]) -> Result<()> {
    PublicKey::from_bytes(bytes).map(|_| ())
}
