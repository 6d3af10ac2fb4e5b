//! Elliptic Curve Diffie-Hellman.
//!
//! Both parties multiply the other's public key by their own secret key and
//! hash the compressed encoding of the product with SHA-256. The hashed input
//! is all 33 bytes, parity prefix included, not the bare X-coordinate: seeded
//! key derivation goes through this function, so the encoding is fixed.
//!
//! # Usage
//!
//! ```
//! # #[cfg(feature = "std")]
//! # {
//! use coin_cipher::{ecdh::ecdh, keypair::generate_key_pair};
//!
//! let (alice_public, alice_secret) = generate_key_pair();
//! let (bob_public, bob_secret) = generate_key_pair();
//!
//! assert_eq!(ecdh(&bob_public, &alice_secret), ecdh(&alice_public, &bob_secret));
//! # }
//! ```

use crate::{
    CompressedPoint, PublicKey, Result, SecretKey,
    arithmetic::mul,
    hash::{Sha256, sum_sha256},
};

/// Compressed encoding of `secret_key · public_key`.
pub fn shared_point(public_key: &PublicKey, secret_key: &SecretKey) -> CompressedPoint {
    let point = mul::mul(public_key.as_affine(), secret_key.as_scalar()).to_affine();

    // a valid key times a non-zero scalar never reaches the identity in a
    // group of prime order
    if cfg!(feature = "self-check") && bool::from(point.is_identity()) {
        panic!("self-check failed: ECDH produced the point at infinity");
    }
    point.to_compressed()
}

/// Shared secret `SHA256(compressed(secret_key · public_key))`.
pub fn ecdh(public_key: &PublicKey, secret_key: &SecretKey) -> Sha256 {
    sum_sha256(&shared_point(public_key, secret_key))
}

/// [`ecdh`] on serialized keys, validating both before any curve arithmetic.
pub fn ecdh_bytes(public_key: &[u8], secret_key: &[u8]) -> Result<Sha256> {
    let public_key = PublicKey::from_bytes(public_key)?;
    let secret_key = SecretKey::from_bytes(secret_key)?;
    Ok(ecdh(&public_key, &secret_key))
}
