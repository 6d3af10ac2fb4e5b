//! Public key recovery.

use super::{RecoveryId, Signature};
use crate::{
    AffinePoint, Error, FieldBytes, FieldElement, PublicKey, Result, Scalar,
    arithmetic::lincomb, hash::Sha256,
};
use elliptic_curve::subtle::Choice;

/// Group order as a field element.
const ORDER: FieldElement = FieldElement::from_bytes_unchecked(&[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
]);

/// `p - n`: an `r` at or above this cannot have been reduced from an x
/// coordinate.
const FIELD_MINUS_ORDER: FieldBytes = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x45, 0x51, 0x23, 0x19, 0x50, 0xb7, 0x5f, 0xc4, 0x40, 0x2d, 0xa1, 0x72, 0x2f, 0xc9, 0xba, 0xee,
];

/// Recovers the public key `Q = r⁻¹·(s·R − z·G)` from a signature `(r, s)`
/// over the reduced message hash `z`.
///
/// `R` is the point whose x-coordinate is `r` (or `r + n` when the recovery
/// id says the x-coordinate was reduced) and whose y parity is given by the
/// recovery id. Returns `None` if `r` or `s` is zero, if no such point
/// exists, or if the result is the identity.
#[allow(non_snake_case)]
pub fn recover_prehashed(
    r: &Scalar,
    s: &Scalar,
    z: &Scalar,
    recovery_id: RecoveryId,
) -> Option<AffinePoint> {
    if bool::from(s.is_zero()) {
        return None;
    }
    let r_inv = Option::<Scalar>::from(r.invert())?;

    let r_bytes = r.to_bytes();
    let mut x = Option::<FieldElement>::from(FieldElement::from_bytes(&r_bytes))?;
    if recovery_id.is_x_reduced() {
        // big-endian arrays compare like the integers they encode
        if r_bytes >= FIELD_MINUS_ORDER {
            return None;
        }
        x = (x + &ORDER).normalize();
    }

    let y_is_odd = Choice::from(recovery_id.is_y_odd() as u8);
    let R = Option::<AffinePoint>::from(AffinePoint::decompress_field(&x, y_is_odd))?;

    let u1 = -(r_inv * z);
    let u2 = r_inv * s;
    let Q = lincomb(&R, &u2, &u1).to_affine();

    if bool::from(Q.is_identity()) {
        None
    } else {
        Some(Q)
    }
}

impl Signature {
    /// Recovers the public key which produced this signature over `hash`.
    ///
    /// The signature must carry `0 < r, s < n` and a recovery id in `0..=3`;
    /// a high `s` is accepted here; [`PublicKey::verify_hash`] rejects it.
    pub fn recover_public_key(&self, hash: &Sha256) -> Result<PublicKey> {
        let (r, s, recovery_id) = self.components()?;
        let z = Scalar::from_bytes_reduced(hash.as_bytes());
        let point = recover_prehashed(&r, &s, &z, recovery_id).ok_or(Error::RecoveryFailed)?;
        PublicKey::from_affine(point)
    }
}

/// Recovers the public key from a serialized signature and message hash.
pub fn recover_public_key(hash: &Sha256, signature: &[u8]) -> Result<PublicKey> {
    Signature::from_bytes(signature)?.recover_public_key(hash)
}
