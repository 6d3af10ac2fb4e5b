//! Deterministic nonces as described in [RFC6979 § 3.2], instantiated with
//! HMAC-SHA-256 and the secp256k1 group order.
//!
//! [RFC6979 § 3.2]: https://datatracker.ietf.org/doc/html/rfc6979#section-3

use crate::{
    FieldBytes, Scalar,
    arithmetic::{scalar::MODULUS, util::words_to_be_bytes},
};
use elliptic_curve::zeroize::Zeroize;
use rfc6979::{ByteArray, HmacDrbg, consts::U32};
use sha2::Sha256;

/// HMAC_DRBG with HMAC-SHA-256, seeded from the secret key and the message
/// hash. Successive calls to [`NonceGenerator::next_nonce`] yield the
/// candidates of the RFC6979 retry loop.
pub struct NonceGenerator {
    drbg: HmacDrbg<Sha256>,
}

impl NonceGenerator {
    /// Seeds the generator.
    ///
    /// `hash` is the message hash; it is reduced modulo the group order
    /// (`bits2octets`). `additional_data` is appended to the seed material
    /// (§ 3.6) and may be empty.
    pub fn new(secret: &Scalar, hash: &FieldBytes, additional_data: &[u8]) -> Self {
        let mut x = secret.to_bytes();
        let h1 = Scalar::from_bytes_reduced(hash).to_bytes();
        let drbg = HmacDrbg::new(&x, &h1, additional_data);
        x.zeroize();
        Self { drbg }
    }

    /// Returns the next candidate in `1..n`.
    pub fn next_nonce(&mut self) -> Scalar {
        let mut bytes = FieldBytes::default();
        loop {
            self.drbg.fill_bytes(&mut bytes);
            let candidate = Option::<Scalar>::from(Scalar::from_bytes(&bytes));
            bytes.zeroize();

            if let Some(nonce) = candidate {
                if !bool::from(nonce.is_zero()) {
                    return nonce;
                }
            }
        }
    }
}

/// First RFC6979 nonce for `secret` and `hash`.
pub fn generate_k(secret: &Scalar, hash: &FieldBytes) -> Scalar {
    let order = ByteArray::<U32>::from(words_to_be_bytes(&MODULUS));
    let h1 = ByteArray::<U32>::from(Scalar::from_bytes_reduced(hash).to_bytes());
    let mut x = ByteArray::<U32>::from(secret.to_bytes());

    let mut k: FieldBytes = rfc6979::generate_k::<Sha256, U32>(&x, &order, &h1, &[]).into();
    x[..].zeroize();

    // `generate_k` only returns values in `1..n`
    let nonce = Scalar::from_bytes_reduced(&k);
    k.zeroize();
    nonce
}
