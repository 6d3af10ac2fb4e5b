//! Random and deterministic key pairs.
//!
//! Deterministic key pairs come from a seed through a chain of SHA-256
//! invocations. [`deterministic_key_pair_iterator`] additionally folds an
//! ECDH computation into the next seed ([`secp256k1_hash`]) so that one
//! leaked secret key does not reveal its neighbours in the sequence.
//!
//! ```
//! use coin_cipher::keypair::deterministic_key_pair_iterator;
//!
//! let (next_seed, public_key, secret_key) = deterministic_key_pair_iterator(b"seed").unwrap();
//! assert_eq!(secret_key.public_key(), public_key);
//!
//! // the next pair in the sequence
//! let (_, public_key_2, _) = deterministic_key_pair_iterator(next_seed.as_bytes()).unwrap();
//! assert_ne!(public_key, public_key_2);
//! ```

use crate::{
    Error, PublicKey, Result, SecretKey,
    ecdh::shared_point,
    hash::{Sha256, sum_sha256, sum_sha256_concat},
};
use elliptic_curve::rand_core::CryptoRngCore;
use log::debug;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
use elliptic_curve::rand_core::OsRng;

/// A public key together with its secret key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyPair {
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl KeyPair {
    /// Pairs a secret key with its derived public key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        Self {
            public_key: secret_key.public_key(),
            secret_key,
        }
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The secret half.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Splits the pair.
    pub fn into_parts(self) -> (PublicKey, SecretKey) {
        (self.public_key, self.secret_key)
    }
}

impl AsRef<PublicKey> for KeyPair {
    fn as_ref(&self) -> &PublicKey {
        &self.public_key
    }
}

impl signature::KeypairRef for KeyPair {
    type VerifyingKey = PublicKey;
}

impl From<KeyPair> for (PublicKey, SecretKey) {
    fn from(pair: KeyPair) -> Self {
        pair.into_parts()
    }
}

/// Generates a random key pair from the operating system's RNG.
#[cfg(feature = "std")]
pub fn generate_key_pair() -> (PublicKey, SecretKey) {
    generate_key_pair_with_rng(&mut OsRng)
}

/// Generates a random key pair from `rng`.
pub fn generate_key_pair_with_rng(rng: &mut impl CryptoRngCore) -> (PublicKey, SecretKey) {
    KeyPair::from_secret_key(SecretKey::random(rng)).into_parts()
}

/// Hashes `seed` with SHA-256 until the digest is a valid secret key.
///
/// The seed is always hashed at least once.
pub fn generate_deterministic_key_pair_inner(seed: &[u8]) -> (PublicKey, SecretKey) {
    let mut digest = sum_sha256(seed);
    loop {
        match SecretKey::from_bytes(digest.as_bytes()) {
            Ok(secret_key) => return KeyPair::from_secret_key(secret_key).into_parts(),
            Err(_) => {
                debug!("deterministic secret key candidate out of range, rehashing");
                digest = sum_sha256(digest.as_bytes());
            }
        }
    }
}

/// Keyed hash built on curve operations.
///
/// With `h = SHA256(seed)`, derives one secret key from `h` and one public
/// key from `SHA256(h)` and returns `SHA256(h ‖ compressed ECDH point)`.
pub fn secp256k1_hash(seed: &[u8]) -> Sha256 {
    let hash = sum_sha256(seed);
    let (_, secret_key) = generate_deterministic_key_pair_inner(hash.as_bytes());
    let (public_key, _) =
        generate_deterministic_key_pair_inner(sum_sha256(hash.as_bytes()).as_bytes());
    let shared = shared_point(&public_key, &secret_key);
    sum_sha256_concat(&[hash.as_bytes(), &shared])
}

/// One step of the deterministic key pair sequence.
///
/// Returns `(next_seed, public_key, secret_key)` where
/// `next_seed = secp256k1_hash(seed)` and the key pair is derived from
/// `SHA256(seed ‖ next_seed)`.
pub fn deterministic_key_pair_iterator(seed: &[u8]) -> Result<(Sha256, PublicKey, SecretKey)> {
    if seed.is_empty() {
        return Err(Error::EmptySeed);
    }
    let next_seed = secp256k1_hash(seed);
    let key_seed = sum_sha256_concat(&[seed, next_seed.as_bytes()]);
    let (public_key, secret_key) = generate_deterministic_key_pair_inner(key_seed.as_bytes());
    Ok((next_seed, public_key, secret_key))
}

/// The key pair of the first step of [`deterministic_key_pair_iterator`].
pub fn generate_deterministic_key_pair(seed: &[u8]) -> Result<(PublicKey, SecretKey)> {
    let (_, public_key, secret_key) = deterministic_key_pair_iterator(seed)?;
    Ok((public_key, secret_key))
}

/// The first `n` key pairs of the deterministic sequence for `seed`.
#[cfg(feature = "alloc")]
pub fn generate_deterministic_key_pairs(seed: &[u8], n: usize) -> Result<Vec<KeyPair>> {
    generate_deterministic_key_pairs_seed(seed, n).map(|(_, pairs)| pairs)
}

/// The first `n` key pairs of the deterministic sequence for `seed`, and the
/// seed which continues the sequence (`seed` itself when `n` is zero).
#[cfg(feature = "alloc")]
pub fn generate_deterministic_key_pairs_seed(
    seed: &[u8],
    n: usize,
) -> Result<(Vec<u8>, Vec<KeyPair>)> {
    if seed.is_empty() {
        return Err(Error::EmptySeed);
    }

    let mut seed = seed.to_vec();
    let mut pairs = Vec::with_capacity(n);
    for _ in 0..n {
        let (next_seed, public_key, secret_key) = deterministic_key_pair_iterator(&seed)?;
        pairs.push(KeyPair {
            public_key,
            secret_key,
        });
        seed = next_seed.as_bytes().to_vec();
    }
    Ok((seed, pairs))
}

#[cfg(test)]
mod tests {
    use super::{
        KeyPair, deterministic_key_pair_iterator, generate_deterministic_key_pair,
        generate_deterministic_key_pair_inner, generate_key_pair_with_rng, secp256k1_hash,
    };
    use crate::{Error, hash::sum_sha256};
    use hex_literal::hex;
    use signature::Keypair;

    /// `(seed, next_seed, public_key, secret_key)`, pinned from an
    /// independent implementation.
    const ITERATOR_VECTORS: &[(&[u8], [u8; 32], [u8; 33], [u8; 32])] = &[
        (
            b"seed",
            hex!("c79454cf362b3f55e5effce09f664311650a44b9c189b3c8eed1ae9bd696cd9e"),
            hex!("02e5be89fa161bf6b0bc64ec9ec7fe27311fbb78949c3ef9739d4c73a84920d6e1"),
            hex!("001aa9e416aff5f3a3c7f9ae0811757cf54f393d50df861f5c33747954341aa7"),
        ),
        (
            b"abc",
            hex!("b01716898ef15329bb688db43129f52d41ccf55e901f33f2a2b8e41a7e45540a"),
            hex!("031413f3b3aa4e7d440a07f5795e56f5fc011fe5a65b4b576643df8b6ccb49276f"),
            hex!("865b782e77346b6dbf084e900a981e68f85e9e7c3def7c38d2fd6e9879b44502"),
        ),
        (
            &[0u8; 32],
            hex!("8bb24899b8148b38dfb246d4daef4cef14239664135d236d400190429a266c1a"),
            hex!("026952bbc3e107cf524921ff771957a8ffd9ef6e655e188e67b20d1aa0d3226e6a"),
            hex!("a26d6ee7ff5cb1ebf53b7c0a4a23051e569421c4721985bae07371a4697ed773"),
        ),
    ];

    #[test]
    fn chain_vector() {
        let seed = hex!("90c56f5b8d78a46fb4cddf6fd9c6d88d6d2d7b0ec35917c7dac12c03b04e444e");
        let next_seed = secp256k1_hash(&seed);
        assert_eq!(
            next_seed.to_bytes(),
            hex!("a70c36286be722d8111e69e910ce4490005bbf9135b0ce8e7a59f84eee24b88b")
        );

        let (seed_out, public_key, secret_key) = deterministic_key_pair_iterator(&seed).unwrap();
        assert_eq!(seed_out, next_seed);
        assert_eq!(
            secret_key.to_bytes(),
            hex!("94dd1a9de9ffd57b5516b8a7f090da67f142f7d22356fa5d1b894ee4d4fba95b")
        );
        assert_eq!(secret_key.public_key(), public_key);
    }

    #[test]
    fn iterator_vectors() {
        for (seed, next_seed, public_key, secret_key) in ITERATOR_VECTORS {
            let (seed_out, pk, sk) = deterministic_key_pair_iterator(seed).unwrap();
            assert_eq!(seed_out.as_bytes(), next_seed);
            assert_eq!(&pk.to_bytes(), public_key);
            assert_eq!(&sk.to_bytes(), secret_key);
            assert_eq!(secp256k1_hash(seed), seed_out);

            assert_eq!(generate_deterministic_key_pair(seed), Ok((pk, sk)));
        }
    }

    #[test]
    fn iterator_chains() {
        let (next_seed, ..) = deterministic_key_pair_iterator(b"seed").unwrap();
        let (seed_2, public_key_2, secret_key_2) =
            deterministic_key_pair_iterator(next_seed.as_bytes()).unwrap();
        assert_eq!(
            seed_2.to_bytes(),
            hex!("ae081d9c92fa04acd6181230206e05521dbfd7dcebc99b99198eeb6edb387408")
        );
        assert_eq!(
            public_key_2.to_bytes(),
            hex!("031471a97c683c6fb83962219ac2a206c3a6cda1b5993a07da691ef1819dd97b5d")
        );
        assert_eq!(
            secret_key_2.to_bytes(),
            hex!("cc6c6e2581053dc6b405e460513ed2f0b59557ba60120d89c064287502cb3955")
        );
    }

    #[test]
    fn inner_derivation_hashes_once() {
        let (public_key, secret_key) = generate_deterministic_key_pair_inner(b"abc");
        assert_eq!(secret_key.to_bytes(), sum_sha256(b"abc").to_bytes());
        assert_eq!(secret_key.public_key(), public_key);
    }

    #[test]
    fn empty_seed_is_rejected() {
        assert_eq!(
            deterministic_key_pair_iterator(b"").unwrap_err(),
            Error::EmptySeed
        );
        assert_eq!(
            generate_deterministic_key_pair(b"").unwrap_err(),
            Error::EmptySeed
        );
    }

    #[test]
    fn random_pairs_match() {
        let mut rng = rand_core::OsRng;
        let (public_key, secret_key) = generate_key_pair_with_rng(&mut rng);
        assert_eq!(secret_key.public_key(), public_key);

        let pair = KeyPair::from_secret_key(secret_key);
        assert_eq!(pair.verifying_key(), public_key);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn batches_follow_the_iterator() {
        use super::{generate_deterministic_key_pairs, generate_deterministic_key_pairs_seed};

        let (seed, pairs) = generate_deterministic_key_pairs_seed(b"seed", 2).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(
            seed,
            hex!("ae081d9c92fa04acd6181230206e05521dbfd7dcebc99b99198eeb6edb387408")
        );
        assert_eq!(pairs[0].public_key().to_bytes(), ITERATOR_VECTORS[0].2);
        assert_eq!(
            pairs[1].secret_key().to_bytes(),
            hex!("cc6c6e2581053dc6b405e460513ed2f0b59557ba60120d89c064287502cb3955")
        );
        assert_eq!(generate_deterministic_key_pairs(b"seed", 2).unwrap(), pairs);

        let (seed, pairs) = generate_deterministic_key_pairs_seed(b"seed", 0).unwrap();
        assert_eq!(seed, b"seed");
        assert!(pairs.is_empty());
        assert_eq!(
            generate_deterministic_key_pairs(b"", 1).unwrap_err(),
            Error::EmptySeed
        );
    }
}
