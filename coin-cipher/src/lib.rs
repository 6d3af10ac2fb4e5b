//! secp256k1 engine for cryptocurrency nodes.
//!
//! This crate provides the cryptographic core a node, wallet or
//! transaction builder needs from the secp256k1 curve:
//!
//! - field and scalar arithmetic, affine and Jacobian points and a wNAF
//!   scalar multiplication accelerated by the GLV endomorphism
//!   ([`arithmetic`]),
//! - recoverable ECDSA with canonical (low-S) signatures and a one byte
//!   recovery id ([`ecdsa`]),
//! - secret/public keys, random and deterministic key pairs, the seeded
//!   key-pair iterator and ECDH ([`keypair`], [`ecdh`]),
//! - pooled SHA-256/RIPEMD-160 hashing and the fixed size hash values built
//!   on it ([`hash`]).
//!
//! ## Usage
//!
//! ```
//! # #[cfg(feature = "std")]
//! # {
//! use coin_cipher::{hash::sum_sha256, keypair::generate_key_pair};
//!
//! let (public_key, secret_key) = generate_key_pair();
//! let hash = sum_sha256(b"transaction body");
//!
//! let signature = secret_key.sign_hash(&hash);
//! assert!(public_key.verify_hash(&signature, &hash).is_ok());
//!
//! let recovered = signature.recover_public_key(&hash).unwrap();
//! assert_eq!(recovered, public_key);
//! # }
//! ```
//!
//! ## Encodings
//!
//! | Value                   | Encoding                                    |
//! |-------------------------|---------------------------------------------|
//! | Secret key              | 32 bytes, big-endian scalar                 |
//! | Compressed public key   | 33 bytes: `0x02`/`0x03` + 32-byte X         |
//! | Uncompressed public key | 65 bytes: `0x04` + 32-byte X + 32-byte Y    |
//! | Recoverable signature   | 65 bytes: `r` + `s` + recovery id (0–3)     |
//!
//! All of them print as lowercase hexadecimal without a prefix.
//!
//! ## Minimum Supported Rust Version
//!
//! Rust **1.85** or higher.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod arithmetic;
pub mod ecdh;
pub mod ecdsa;
pub mod hash;
pub mod keypair;

mod error;
mod keys;

pub use crate::{
    arithmetic::{AffinePoint, FieldElement, JacobianPoint, Scalar},
    ecdsa::{RecoveryId, Signature},
    error::{Error, Result},
    keys::{PublicKey, SecretKey, verify_public_key, verify_secret_key},
};
pub use elliptic_curve::{self, rand_core, subtle, zeroize};
pub use signature;

/// Big-endian serialization of a field element or scalar.
pub type FieldBytes = [u8; 32];

/// Compressed SEC1 encoding of a curve point.
pub type CompressedPoint = [u8; 33];

/// Uncompressed SEC1 encoding of a curve point.
pub type UncompressedPoint = [u8; 65];
