//! Affine points

#![allow(clippy::op_ref)]

use super::{CURVE_EQUATION_B, FieldElement, JacobianPoint, Scalar, mul};
use crate::{CompressedPoint, FieldBytes, UncompressedPoint};
use core::ops::{Mul, Neg};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::DefaultIsZeroes,
};

/// SEC1 tag of a compressed point with even `y`.
const TAG_EVEN: u8 = 0x02;

/// SEC1 tag of a compressed point with odd `y`.
const TAG_ODD: u8 = 0x03;

/// SEC1 tag of an uncompressed point.
const TAG_UNCOMPRESSED: u8 = 0x04;

/// secp256k1 curve point expressed in affine coordinates.
///
/// Coordinates of a finite point are always normalized.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: FieldElement,

    /// y-coordinate
    pub(crate) y: FieldElement,

    /// Is this point the point at infinity? 0 = no, 1 = yes
    ///
    /// This is a proxy for [`Choice`], but uses `u8` instead to permit `const`
    /// constructors for `IDENTITY` and `GENERATOR`.
    pub(super) infinity: u8,
}

impl AffinePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Base point of secp256k1.
    ///
    /// ```text
    /// Gₓ = 79be667e f9dcbbac 55a06295 ce870b07 029bfcdb 2dce28d9 59f2815b 16f81798
    /// Gᵧ = 483ada77 26a3c465 5da4fbfc 0e1108a8 fd17b448 a6855419 9c47d08f fb10d4b8
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_bytes_unchecked(&[
            0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87,
            0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b,
            0x16, 0xf8, 0x17, 0x98,
        ]),
        y: FieldElement::from_bytes_unchecked(&[
            0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11,
            0x08, 0xa8, 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f,
            0xfb, 0x10, 0xd4, 0xb8,
        ]),
        infinity: 0,
    };

    /// Create a new [`AffinePoint`] with the given (normalized) coordinates.
    pub(crate) const fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y, infinity: 0 }
    }

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Big-endian `x` coordinate.
    pub fn x(&self) -> FieldBytes {
        self.x.to_bytes()
    }

    /// Big-endian `y` coordinate.
    pub fn y(&self) -> FieldBytes {
        self.y.to_bytes()
    }

    /// Is the `y` coordinate odd?
    pub fn y_is_odd(&self) -> Choice {
        self.y.normalize().is_odd()
    }

    /// Is this a finite point satisfying `y² = x³ + 7`?
    pub fn is_valid(&self) -> Choice {
        let lhs = self.y.square().negate(1);
        let rhs = self.x.square() * &self.x + &CURVE_EQUATION_B;
        (lhs + &rhs).normalizes_to_zero() & !self.is_identity()
    }

    /// Recovers the point with the given `x` coordinate whose `y` has the
    /// requested parity.
    ///
    /// Returns `None` if `x` is not below the field modulus or `x³ + 7` has no
    /// square root.
    pub fn decompress(x_bytes: &FieldBytes, y_is_odd: Choice) -> CtOption<Self> {
        FieldElement::from_bytes(x_bytes).and_then(|x| Self::decompress_field(&x, y_is_odd))
    }

    pub(crate) fn decompress_field(x: &FieldElement, y_is_odd: Choice) -> CtOption<Self> {
        let alpha = x.square() * x + &CURVE_EQUATION_B;
        alpha.sqrt().map(|beta| {
            // normalized so the parity test is meaningful
            let beta = beta.normalize();
            let y = FieldElement::conditional_select(
                &beta.negate(1),
                &beta,
                beta.is_odd().ct_eq(&y_is_odd),
            );
            Self::new(x.normalize(), y.normalize())
        })
    }

    /// Parses a 33-byte SEC1 compressed point.
    pub fn from_compressed(bytes: &CompressedPoint) -> CtOption<Self> {
        let tag = bytes[0];
        let is_compressed_tag = tag.ct_eq(&TAG_EVEN) | tag.ct_eq(&TAG_ODD);
        let mut x = FieldBytes::default();
        x.copy_from_slice(&bytes[1..]);

        Self::decompress(&x, Choice::from(tag & 1))
            .and_then(|point| CtOption::new(point, is_compressed_tag))
    }

    /// Parses a 65-byte SEC1 uncompressed point, checking it lies on the curve.
    pub fn from_uncompressed(bytes: &UncompressedPoint) -> CtOption<Self> {
        let mut x_bytes = FieldBytes::default();
        let mut y_bytes = FieldBytes::default();
        x_bytes.copy_from_slice(&bytes[1..33]);
        y_bytes.copy_from_slice(&bytes[33..]);

        FieldElement::from_bytes(&x_bytes).and_then(|x| {
            FieldElement::from_bytes(&y_bytes).and_then(|y| {
                let point = Self::new(x, y);
                CtOption::new(point, point.is_valid() & bytes[0].ct_eq(&TAG_UNCOMPRESSED))
            })
        })
    }

    /// SEC1 compressed encoding. The identity encodes as all zeros.
    pub fn to_compressed(&self) -> CompressedPoint {
        let mut res = [0u8; 33];
        if bool::from(self.is_identity()) {
            return res;
        }
        res[0] = TAG_EVEN | self.y_is_odd().unwrap_u8();
        res[1..].copy_from_slice(&self.x.to_bytes());
        res
    }

    /// SEC1 uncompressed encoding. The identity encodes as all zeros.
    pub fn to_uncompressed(&self) -> UncompressedPoint {
        let mut res = [0u8; 65];
        if bool::from(self.is_identity()) {
            return res;
        }
        res[0] = TAG_UNCOMPRESSED;
        res[1..33].copy_from_slice(&self.x.to_bytes());
        res[33..].copy_from_slice(&self.y.to_bytes());
        res
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &AffinePoint, b: &AffinePoint, choice: Choice) -> AffinePoint {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &AffinePoint) -> Choice {
        let both_infinite = self.is_identity() & other.is_identity();
        let same_coordinates = self.x.ct_eq(&other.x)
            & self.y.ct_eq(&other.y)
            & self.infinity.ct_eq(&other.infinity);
        both_infinite | same_coordinates
    }
}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for AffinePoint {}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &AffinePoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Mul<Scalar> for AffinePoint {
    type Output = JacobianPoint;

    fn mul(self, scalar: Scalar) -> JacobianPoint {
        mul::mul(&self, &scalar)
    }
}

impl Mul<&Scalar> for AffinePoint {
    type Output = JacobianPoint;

    fn mul(self, scalar: &Scalar) -> JacobianPoint {
        mul::mul(&self, scalar)
    }
}

impl Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> Self::Output {
        AffinePoint {
            x: self.x,
            y: self.y.negate(1).normalize(),
            infinity: self.infinity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AffinePoint;
    use elliptic_curve::subtle::Choice;
    use hex_literal::hex;

    const UNCOMPRESSED_BASEPOINT: [u8; 65] = hex!(
        "0479BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798
         483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"
    );
    const COMPRESSED_BASEPOINT: [u8; 33] =
        hex!("0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");

    #[test]
    fn uncompressed_round_trip() {
        let point = AffinePoint::from_uncompressed(&UNCOMPRESSED_BASEPOINT).unwrap();
        assert_eq!(point, AffinePoint::GENERATOR);
        assert_eq!(point.to_uncompressed(), UNCOMPRESSED_BASEPOINT);
    }

    #[test]
    fn compressed_round_trip() {
        let point = AffinePoint::from_compressed(&COMPRESSED_BASEPOINT).unwrap();
        assert_eq!(point, AffinePoint::GENERATOR);
        assert_eq!(point.to_compressed(), COMPRESSED_BASEPOINT);
    }

    #[test]
    fn compressed_to_uncompressed() {
        let point = AffinePoint::from_compressed(&COMPRESSED_BASEPOINT).unwrap();
        assert_eq!(point.to_uncompressed(), UNCOMPRESSED_BASEPOINT);
    }

    #[test]
    fn decompress_picks_parity() {
        let x = AffinePoint::GENERATOR.x();
        let even = AffinePoint::decompress(&x, Choice::from(0)).unwrap();
        let odd = AffinePoint::decompress(&x, Choice::from(1)).unwrap();
        assert_eq!(even, AffinePoint::GENERATOR);
        assert_eq!(odd, -AffinePoint::GENERATOR);
        assert!(bool::from(odd.y_is_odd()));
    }

    #[test]
    fn rejects_bad_encodings() {
        let mut bad_tag = COMPRESSED_BASEPOINT;
        bad_tag[0] = 0x05;
        assert!(bool::from(AffinePoint::from_compressed(&bad_tag).is_none()));

        // x = 5 gives x³ + 7 = 132, which is not a square mod p
        let mut no_root = [0u8; 33];
        no_root[0] = 0x02;
        no_root[32] = 5;
        assert!(bool::from(AffinePoint::from_compressed(&no_root).is_none()));

        let mut off_curve = UNCOMPRESSED_BASEPOINT;
        off_curve[64] ^= 1;
        assert!(bool::from(AffinePoint::from_uncompressed(&off_curve).is_none()));

        let mut wrong_tag = UNCOMPRESSED_BASEPOINT;
        wrong_tag[0] = 0x06;
        assert!(bool::from(AffinePoint::from_uncompressed(&wrong_tag).is_none()));
    }

    #[test]
    fn affine_negation() {
        let basepoint = AffinePoint::GENERATOR;
        assert_eq!(-(-basepoint), basepoint);
        assert!(bool::from((-basepoint).is_valid()));
        assert_ne!(-basepoint, basepoint);
    }

    #[test]
    fn identity_encoding() {
        assert_eq!(AffinePoint::IDENTITY.to_compressed(), [0; 33]);
        assert!(bool::from(AffinePoint::from_compressed(&[0; 33]).is_none()));
        assert!(!bool::from(AffinePoint::IDENTITY.is_valid()));
        assert_eq!(AffinePoint::IDENTITY, AffinePoint::default());
    }
}
