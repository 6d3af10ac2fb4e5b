//! ECDSA signing.

use super::{RecoveryId, Signature, rfc6979::NonceGenerator};
use crate::{
    FieldBytes, Scalar, SecretKey, arithmetic::mul_generator, error::check_length, hash::Sha256,
};
use elliptic_curve::{rand_core::CryptoRngCore, zeroize::Zeroize};
use signature::hazmat::{PrehashSigner, RandomizedPrehashSigner};

#[cfg(feature = "std")]
use elliptic_curve::rand_core::OsRng;

/// Signs the reduced message hash `z` with `secret` and the given `nonce`.
///
/// Returns `None` when the nonce is zero or produces `r = 0` or `s = 0`;
/// the caller picks another nonce. The result always has a low `s`.
#[allow(non_snake_case)]
pub fn sign_prehashed(secret: &Scalar, z: &Scalar, nonce: &Scalar) -> Option<Signature> {
    let nonce_inv = Option::<Scalar>::from(nonce.invert())?;

    // Compute 𝐑 = 𝑘×𝑮
    let R = mul_generator(nonce).to_affine();
    if bool::from(R.is_identity()) {
        return None;
    }

    // Lift x-coordinate of 𝐑 into a serialized big integer, then reduce it
    // into an element of the scalar field
    let x = R.x();
    let r = Scalar::from_bytes_reduced(&x);
    if bool::from(r.is_zero()) {
        return None;
    }
    let is_x_reduced = bool::from(Scalar::from_bytes(&x).is_none());
    let recovery_id = RecoveryId::new(bool::from(R.y_is_odd()), is_x_reduced);

    // Compute `s` as a signature over `r` and `z`.
    let s = nonce_inv * (z + &(r * secret));
    if bool::from(s.is_zero()) {
        return None;
    }

    if bool::from(s.is_high()) {
        Some(Signature::from_scalars(&r, &-s, recovery_id.flip_y()))
    } else {
        Some(Signature::from_scalars(&r, &s, recovery_id))
    }
}

impl SecretKey {
    /// Signs a 32-byte message hash with a nonce drawn from the operating
    /// system's random number generator.
    #[cfg(feature = "std")]
    pub fn sign_hash(&self, hash: &Sha256) -> Signature {
        self.sign_hash_with_rng(&mut OsRng, hash)
    }

    /// Signs a 32-byte message hash with a nonce drawn from `rng`.
    pub fn sign_hash_with_rng(&self, rng: &mut impl CryptoRngCore, hash: &Sha256) -> Signature {
        let z = Scalar::from_bytes_reduced(hash.as_bytes());
        let signature = loop {
            let mut nonce = Scalar::random_nonzero(rng);
            let signature = sign_prehashed(self.as_scalar(), &z, &nonce);
            nonce.zeroize();
            if let Some(signature) = signature {
                break signature;
            }
        };
        self.check_own_signature(&signature, hash);
        signature
    }

    /// Signs a 32-byte message hash with an RFC6979 nonce: the same key and
    /// hash always produce the same signature.
    pub fn sign_hash_deterministic(&self, hash: &Sha256) -> Signature {
        self.sign_deterministic(hash.as_bytes(), &[])
    }

    fn sign_deterministic(&self, hash: &FieldBytes, additional_data: &[u8]) -> Signature {
        let z = Scalar::from_bytes_reduced(hash);
        let mut drbg = NonceGenerator::new(self.as_scalar(), hash, additional_data);
        let signature = loop {
            let mut nonce = drbg.next_nonce();
            let signature = sign_prehashed(self.as_scalar(), &z, &nonce);
            nonce.zeroize();
            if let Some(signature) = signature {
                break signature;
            }
        };
        self.check_own_signature(&signature, &Sha256::from_array(*hash));
        signature
    }

    /// Verifies a freshly produced signature and recovers the key from it,
    /// aborting if either disagrees with this key.
    fn check_own_signature(&self, signature: &Signature, hash: &Sha256) {
        if cfg!(feature = "self-check") {
            let public_key = self.public_key();
            if public_key.verify_hash(signature, hash).is_err() {
                panic!("self-check failed: signature does not verify");
            }
            match signature.recover_public_key(hash) {
                Ok(recovered) if recovered == public_key => {}
                _ => panic!("self-check failed: signature recovers a different public key"),
            }
        }
    }
}

impl PrehashSigner<Signature> for SecretKey {
    /// Signs a 32-byte prehash with an RFC6979 nonce.
    fn sign_prehash(&self, prehash: &[u8]) -> signature::Result<Signature> {
        check_length(prehash, 32)?;
        let mut hash = FieldBytes::default();
        hash.copy_from_slice(prehash);
        Ok(self.sign_deterministic(&hash, &[]))
    }
}

impl RandomizedPrehashSigner<Signature> for SecretKey {
    /// Signs a 32-byte prehash with a random nonce.
    fn sign_prehash_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        prehash: &[u8],
    ) -> signature::Result<Signature> {
        check_length(prehash, 32)?;
        let hash = Sha256::from_bytes(prehash)?;
        Ok(self.sign_hash_with_rng(rng, &hash))
    }
}
