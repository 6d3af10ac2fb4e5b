//! ECDSA verification.

use super::Signature;
use crate::{
    AffinePoint, Error, PublicKey, Result, Scalar, arithmetic::lincomb, error::check_length,
    hash::Sha256,
};
use signature::hazmat::PrehashVerifier;

/// Checks `(r, s)` against the public key `q` and the reduced message hash
/// `z`.
///
/// Accepts iff `r == (z·s⁻¹·G + r·s⁻¹·Q).x mod n`. Zero components, the
/// identity public key and an identity result are rejected.
pub fn verify_prehashed(q: &AffinePoint, r: &Scalar, s: &Scalar, z: &Scalar) -> bool {
    if bool::from(r.is_zero() | q.is_identity()) {
        return false;
    }
    let Some(s_inv) = Option::<Scalar>::from(s.invert()) else {
        return false;
    };

    let u1 = z * &s_inv;
    let u2 = r * &s_inv;
    let x = lincomb(q, &u2, &u1).to_affine();
    if bool::from(x.is_identity()) {
        return false;
    }

    Scalar::from_bytes_reduced(&x.x()) == *r
}

/// Verifies a recoverable signature over `hash`.
///
/// The signature must also pass [`Signature::verify_validity`]: high `s`
/// values and out of range recovery ids are rejected even when the curve
/// equation holds.
pub fn verify_signature(public_key: &PublicKey, signature: &Signature, hash: &Sha256) -> bool {
    public_key.verify_hash(signature, hash).is_ok()
}

impl PublicKey {
    /// Verifies a recoverable signature over a 32-byte message hash.
    pub fn verify_hash(&self, signature: &Signature, hash: &Sha256) -> Result<()> {
        signature.verify_validity()?;
        let (r, s, _) = signature.components()?;
        let z = Scalar::from_bytes_reduced(hash.as_bytes());

        if verify_prehashed(self.as_affine(), &r, &s, &z) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

impl PrehashVerifier<Signature> for PublicKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> signature::Result<()> {
        check_length(prehash, 32)?;
        let hash = Sha256::from_bytes(prehash)?;
        Ok(self.verify_hash(signature, &hash)?)
    }
}
