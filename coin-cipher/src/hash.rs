//! SHA-256 and RIPEMD-160 digests.
//!
//! [`Sha256`] and [`Ripemd160`] are plain fixed size values with hex
//! encoding. The helper functions hash through the process-wide
//! [`HashPool`]s when `std` is enabled and through a fresh hasher otherwise.

#[cfg(feature = "std")]
pub mod pool;

#[cfg(feature = "std")]
pub use self::pool::{
    DEFAULT_POOL_CAPACITY, HashPool, PooledHasher, ripemd160_pool, sha256_pool,
};

use crate::{Error, Result, error::check_length};
use core::{fmt, str::FromStr};
use sha2::Digest;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serdect::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

macro_rules! impl_digest_value {
    ($name:ident, $size:expr, $algorithm:expr) => {
        #[doc = concat!("A ", $algorithm, " digest.")]
        ///
        /// The all-zero value is the [`Default`] and doubles as the "empty"
        /// hash in merkle padding.
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name([u8; $size]);

        impl $name {
            /// Size of the digest in bytes.
            pub const SIZE: usize = $size;

            /// Wraps raw digest bytes.
            pub const fn from_array(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// Parses a digest from a byte slice of exactly [`Self::SIZE`] bytes.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                check_length(bytes, $size)?;
                let mut array = [0u8; $size];
                array.copy_from_slice(bytes);
                Ok(Self(array))
            }

            /// Parses a hex encoded digest.
            pub fn from_hex(hex_str: &str) -> Result<Self> {
                check_length(hex_str.as_bytes(), $size * 2)?;
                let mut array = [0u8; $size];
                hex::decode_to_slice(hex_str, &mut array)?;
                Ok(Self(array))
            }

            /// Borrow the digest bytes.
            pub const fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// Copy out the digest bytes.
            pub const fn to_bytes(&self) -> [u8; $size] {
                self.0
            }

            /// Is every byte zero?
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|&byte| byte == 0)
            }

            /// Bytewise exclusive or.
            pub fn xor(&self, other: &Self) -> Self {
                let mut out = self.0;
                for (a, b) in out.iter_mut().zip(other.0.iter()) {
                    *a ^= b;
                }
                Self(out)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; $size] {
            fn from(digest: $name) -> [u8; $size] {
                digest.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = Error;

            fn try_from(bytes: &[u8]) -> Result<Self> {
                Self::from_bytes(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:x})", stringify!($name), self)
            }
        }

        impl fmt::LowerHex for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{self:x}")
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(hex_str: &str) -> Result<Self> {
                Self::from_hex(hex_str)
            }
        }

        #[cfg(feature = "serde")]
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serdect::array::serialize_hex_lower_or_bin(&self.0, serializer)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let mut array = [0u8; $size];
                serdect::array::deserialize_hex_or_bin(&mut array, deserializer)?;
                Self::from_bytes(&array).map_err(de::Error::custom)
            }
        }
    };
}

impl_digest_value!(Sha256, 32, "SHA-256");
impl_digest_value!(Ripemd160, 20, "RIPEMD-160");

#[cfg(feature = "std")]
fn with_sha256<R>(f: impl FnOnce(&mut sha2::Sha256) -> R) -> R {
    let mut hasher = sha256_pool().checkout();
    f(&mut *hasher)
}

#[cfg(not(feature = "std"))]
fn with_sha256<R>(f: impl FnOnce(&mut sha2::Sha256) -> R) -> R {
    f(&mut sha2::Sha256::new())
}

#[cfg(feature = "std")]
fn with_ripemd160<R>(f: impl FnOnce(&mut ripemd::Ripemd160) -> R) -> R {
    let mut hasher = ripemd160_pool().checkout();
    f(&mut *hasher)
}

#[cfg(not(feature = "std"))]
fn with_ripemd160<R>(f: impl FnOnce(&mut ripemd::Ripemd160) -> R) -> R {
    f(&mut ripemd::Ripemd160::new())
}

/// `SHA256(data)`.
pub fn sum_sha256(data: &[u8]) -> Sha256 {
    with_sha256(|hasher| {
        hasher.update(data);
        Sha256(hasher.finalize_reset().into())
    })
}

/// `SHA256(SHA256(data))`.
pub fn double_sha256(data: &[u8]) -> Sha256 {
    with_sha256(|hasher| {
        hasher.update(data);
        let first = hasher.finalize_reset();
        hasher.update(first);
        Sha256(hasher.finalize_reset().into())
    })
}

/// `SHA256(parts[0] ‖ parts[1] ‖ ...)` without building the concatenation.
pub fn sum_sha256_concat(parts: &[&[u8]]) -> Sha256 {
    with_sha256(|hasher| {
        for part in parts {
            hasher.update(part);
        }
        Sha256(hasher.finalize_reset().into())
    })
}

/// `SHA256(a ‖ b)`.
pub fn add_sha256(a: &Sha256, b: &Sha256) -> Sha256 {
    sum_sha256_concat(&[a.as_bytes(), b.as_bytes()])
}

/// `RIPEMD160(data)`.
pub fn hash_ripemd160(data: &[u8]) -> Ripemd160 {
    with_ripemd160(|hasher| {
        hasher.update(data);
        Ripemd160(hasher.finalize_reset().into())
    })
}

/// Merkle root of `hashes`.
///
/// The leaves are padded with zero hashes up to the next power of two, then
/// neighbours are combined with [`add_sha256`] until one hash remains. An
/// empty list yields the zero hash and a single leaf is its own root.
#[cfg(feature = "alloc")]
pub fn merkle(hashes: &[Sha256]) -> Sha256 {
    if hashes.is_empty() {
        return Sha256::default();
    }

    let mut level: Vec<Sha256> = hashes.to_vec();
    level.resize(hashes.len().next_power_of_two(), Sha256::default());

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| add_sha256(&pair[0], &pair[1]))
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::{
        Ripemd160, Sha256, add_sha256, double_sha256, hash_ripemd160, sum_sha256,
        sum_sha256_concat,
    };
    use crate::Error;
    use hex_literal::hex;

    #[test]
    fn known_digests() {
        assert_eq!(
            sum_sha256(b"").to_bytes(),
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
        assert_eq!(
            sum_sha256(b"abc").to_bytes(),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(
            hash_ripemd160(b"").to_bytes(),
            hex!("9c1185a5c5e9fc54612808977ee8f548b2258d31")
        );
        assert_eq!(
            hash_ripemd160(b"abc").to_bytes(),
            hex!("8eb208f7e05d987a9b044a8e98c6b087f15a0bfc")
        );
    }

    #[test]
    fn composed_digests() {
        let once = sum_sha256(b"abc");
        assert_eq!(double_sha256(b"abc"), sum_sha256(once.as_bytes()));

        let a = sum_sha256(b"a");
        let b = sum_sha256(b"b");
        let mut joined = [0u8; 64];
        joined[..32].copy_from_slice(a.as_bytes());
        joined[32..].copy_from_slice(b.as_bytes());
        assert_eq!(add_sha256(&a, &b), sum_sha256(&joined));
        assert_eq!(sum_sha256_concat(&[b"ab", b"c"]), once);
    }

    #[test]
    fn xor_and_zero() {
        let a = sum_sha256(b"a");
        assert!(a.xor(&a).is_zero());
        assert_eq!(a.xor(&Sha256::default()), a);
        assert!(!a.is_zero());
    }

    #[test]
    fn parsing() {
        let digest = sum_sha256(b"");
        let hex_str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(hex_str.parse::<Sha256>(), Ok(digest));
        assert_eq!(Sha256::from_bytes(digest.as_bytes()), Ok(digest));
        assert_eq!(
            Ripemd160::from_bytes(&[0u8; 32]),
            Err(Error::InvalidLength {
                expected: 20,
                actual: 32
            })
        );
        assert_eq!(
            Sha256::from_hex("x3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
            Err(Error::InvalidHex)
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn display() {
        use alloc::format;

        let digest = hash_ripemd160(b"abc");
        assert_eq!(format!("{digest}"), "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
        assert_eq!(
            format!("{digest:?}"),
            "Ripemd160(8eb208f7e05d987a9b044a8e98c6b087f15a0bfc)"
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn merkle_roots() {
        use super::merkle;

        let leaves = [sum_sha256(b"1"), sum_sha256(b"2"), sum_sha256(b"3")];
        assert_eq!(merkle(&[]), Sha256::default());
        assert_eq!(merkle(&leaves[..1]), leaves[0]);
        assert_eq!(merkle(&leaves[..2]), add_sha256(&leaves[0], &leaves[1]));
        assert_eq!(
            merkle(&leaves),
            add_sha256(
                &add_sha256(&leaves[0], &leaves[1]),
                &add_sha256(&leaves[2], &Sha256::default())
            )
        );
    }
}
