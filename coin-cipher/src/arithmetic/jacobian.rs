//! Jacobian points

#![allow(clippy::op_ref)]

use super::{AffinePoint, FieldElement};
use core::ops::{Add, AddAssign, Neg, Sub};
use elliptic_curve::subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Cube root of unity in the base field. `(x, y) -> (β·x, y)` multiplies a
/// point by the matching cube root of unity `λ` of the scalar field.
#[rustfmt::skip]
const ENDOMORPHISM_BETA: FieldElement = FieldElement::from_bytes_unchecked(&[
    0x7a, 0xe9, 0x6a, 0x2b, 0x65, 0x7c, 0x07, 0x10,
    0x6e, 0x64, 0x47, 0x9e, 0xac, 0x34, 0x34, 0xe9,
    0x9c, 0xf0, 0x49, 0x75, 0x12, 0xf5, 0x89, 0x95,
    0xc1, 0x39, 0x6c, 0x28, 0x71, 0x95, 0x01, 0xee,
]);

/// A point on the secp256k1 curve in Jacobian coordinates: the affine point
/// is `(X/Z², Y/Z³)`.
///
/// Every operation leaves the coordinates with magnitude 1, so results can be
/// fed straight back in. Additions branch on the doubling and infinity cases
/// and are therefore not constant time.
#[derive(Clone, Copy, Debug)]
pub struct JacobianPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    infinity: u8,
}

impl JacobianPoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
        infinity: 1,
    };

    /// Base point of secp256k1.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
        infinity: 0,
    };

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Returns the affine representation of this point, spending one field
    /// inversion.
    pub fn to_affine(&self) -> AffinePoint {
        if bool::from(self.is_identity()) {
            return AffinePoint::IDENTITY;
        }
        self.z
            .invert()
            .map(|zinv| self.to_affine_internal(zinv))
            .unwrap_or(AffinePoint::IDENTITY)
    }

    fn to_affine_internal(self, zinv: FieldElement) -> AffinePoint {
        let zinv2 = zinv.square();
        let x = self.x * &zinv2;
        let y = self.y * &zinv2 * &zinv;
        AffinePoint::new(x.normalize(), y.normalize())
    }

    /// Converts a fixed number of points to affine coordinates with a single
    /// inversion (Montgomery's trick).
    pub fn batch_normalize<const N: usize>(points: &[Self; N]) -> [AffinePoint; N] {
        let mut prefix = [FieldElement::ONE; N];
        let mut acc = FieldElement::ONE;
        for (product, point) in prefix.iter_mut().zip(points.iter()) {
            *product = acc;
            if !bool::from(point.is_identity()) {
                acc = acc * &point.z;
            }
        }

        // finite points have non-zero z, so the product is invertible
        let mut inv = acc.invert().unwrap_or(FieldElement::ONE);

        let mut out = [AffinePoint::IDENTITY; N];
        for i in (0..N).rev() {
            if bool::from(points[i].is_identity()) {
                continue;
            }
            let zinv = inv * &prefix[i];
            inv = inv * &points[i].z;
            out[i] = points[i].to_affine_internal(zinv);
        }
        out
    }

    /// Returns `-self`.
    fn neg(&self) -> JacobianPoint {
        JacobianPoint {
            x: self.x,
            y: self.y.negate(1).normalize_weak(),
            z: self.z,
            infinity: self.infinity,
        }
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> JacobianPoint {
        if bool::from(self.is_identity()) {
            return Self::IDENTITY;
        }

        // dbl-2009-l, a = 0
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + &b).square() + &a.negate(1) + &c.negate(1))
            .normalize_weak()
            .double();
        let e = a.mul_single(3);
        let f = e.square();

        let x3 = (f + &d.double().negate(4)).normalize_weak();
        let y3 = (e * &(d + &x3.negate(1)) + &c.mul_single(8).negate(8)).normalize_weak();
        let z3 = (self.y * &self.z).double().normalize_weak();

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
            infinity: 0,
        }
    }

    /// Returns `self + other`.
    pub fn add(&self, other: &JacobianPoint) -> JacobianPoint {
        if bool::from(self.is_identity()) {
            return *other;
        }
        if bool::from(other.is_identity()) {
            return *self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * &z2z2;
        let u2 = other.x * &z1z1;
        let s1 = self.y * &z2z2 * &other.z;
        let s2 = other.y * &z1z1 * &self.z;

        self.add_inner(&u1, &u2, &s1, &s2, &(self.z * &other.z))
    }

    /// Returns `self + other` for an affine `other`.
    pub fn add_mixed(&self, other: &AffinePoint) -> JacobianPoint {
        if bool::from(other.is_identity()) {
            return *self;
        }
        if bool::from(self.is_identity()) {
            return JacobianPoint::from(*other);
        }

        // other.z = 1
        let z1z1 = self.z.square();
        let u2 = other.x * &z1z1;
        let s2 = other.y * &z1z1 * &self.z;

        self.add_inner(&self.x, &u2, &self.y, &s2, &self.z)
    }

    /// Shared tail of the additions, given `U1 = X1·Z2²`, `U2 = X2·Z1²`,
    /// `S1 = Y1·Z2³`, `S2 = Y2·Z1³` and `Z1·Z2`.
    fn add_inner(
        &self,
        u1: &FieldElement,
        u2: &FieldElement,
        s1: &FieldElement,
        s2: &FieldElement,
        z1z2: &FieldElement,
    ) -> JacobianPoint {
        let h = *u2 + &u1.negate(1);
        let i = *s2 + &s1.negate(1);

        if bool::from(h.normalizes_to_zero()) {
            // same x: either the same point or its negation
            return if bool::from(i.normalizes_to_zero()) {
                self.double()
            } else {
                Self::IDENTITY
            };
        }

        let h2 = h.square();
        let h3 = h * &h2;
        let u1h2 = *u1 * &h2;

        let x3 = (i.square() + &h3.negate(1) + &u1h2.double().negate(2)).normalize_weak();
        let y3 = (i * &(u1h2 + &x3.negate(1)) + &(*s1 * &h3).negate(1)).normalize_weak();
        let z3 = (*z1z2 * &h).normalize_weak();

        JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
            infinity: 0,
        }
    }

    /// Returns `self - other`.
    pub fn sub(&self, other: &JacobianPoint) -> JacobianPoint {
        self.add(&other.neg())
    }

    /// Returns `self - other` for an affine `other`.
    pub fn sub_mixed(&self, other: &AffinePoint) -> JacobianPoint {
        self.add_mixed(&-*other)
    }

    /// Calculates the secp256k1 endomorphism: `self * lambda`.
    pub fn endomorphism(&self) -> Self {
        Self {
            x: (self.x * &ENDOMORPHISM_BETA).normalize_weak(),
            y: self.y,
            z: self.z,
            infinity: self.infinity,
        }
    }
}

impl From<AffinePoint> for JacobianPoint {
    fn from(p: AffinePoint) -> Self {
        let jacobian = JacobianPoint {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
            infinity: 0,
        };
        Self::conditional_select(&jacobian, &Self::IDENTITY, p.is_identity())
    }
}

impl From<&AffinePoint> for JacobianPoint {
    fn from(p: &AffinePoint) -> Self {
        Self::from(*p)
    }
}

impl From<JacobianPoint> for AffinePoint {
    fn from(p: JacobianPoint) -> AffinePoint {
        p.to_affine()
    }
}

impl From<&JacobianPoint> for AffinePoint {
    fn from(p: &JacobianPoint) -> AffinePoint {
        p.to_affine()
    }
}

impl ConditionallySelectable for JacobianPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        JacobianPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for JacobianPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // X1·Z2² == X2·Z1² and Y1·Z2³ == Y2·Z1³
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let x_eq = (self.x * &z2z2).ct_eq(&(other.x * &z1z1));
        let y_eq = (self.y * &z2z2 * &other.z).ct_eq(&(other.y * &z1z1 * &self.z));

        let self_inf = self.is_identity();
        let other_inf = other.is_identity();
        (self_inf & other_inf) | (!self_inf & !other_inf & x_eq & y_eq)
    }
}

impl PartialEq for JacobianPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl PartialEq<AffinePoint> for JacobianPoint {
    fn eq(&self, other: &AffinePoint) -> bool {
        *self == JacobianPoint::from(*other)
    }
}

impl PartialEq<JacobianPoint> for AffinePoint {
    fn eq(&self, other: &JacobianPoint) -> bool {
        *other == *self
    }
}

impl Eq for JacobianPoint {}

impl Default for JacobianPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add<&JacobianPoint> for &JacobianPoint {
    type Output = JacobianPoint;

    fn add(self, other: &JacobianPoint) -> JacobianPoint {
        JacobianPoint::add(self, other)
    }
}

impl Add<JacobianPoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn add(self, other: JacobianPoint) -> JacobianPoint {
        JacobianPoint::add(&self, &other)
    }
}

impl Add<&AffinePoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn add(self, other: &AffinePoint) -> JacobianPoint {
        JacobianPoint::add_mixed(&self, other)
    }
}

impl AddAssign<JacobianPoint> for JacobianPoint {
    fn add_assign(&mut self, rhs: JacobianPoint) {
        *self = JacobianPoint::add(self, &rhs);
    }
}

impl AddAssign<&AffinePoint> for JacobianPoint {
    fn add_assign(&mut self, rhs: &AffinePoint) {
        *self = JacobianPoint::add_mixed(self, rhs);
    }
}

impl Sub<JacobianPoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn sub(self, other: JacobianPoint) -> JacobianPoint {
        JacobianPoint::sub(&self, &other)
    }
}

impl Sub<&AffinePoint> for JacobianPoint {
    type Output = JacobianPoint;

    fn sub(self, other: &AffinePoint) -> JacobianPoint {
        JacobianPoint::sub_mixed(&self, other)
    }
}

impl Neg for JacobianPoint {
    type Output = JacobianPoint;

    fn neg(self) -> JacobianPoint {
        JacobianPoint::neg(&self)
    }
}

impl Neg for &JacobianPoint {
    type Output = JacobianPoint;

    fn neg(self) -> JacobianPoint {
        JacobianPoint::neg(self)
    }
}
