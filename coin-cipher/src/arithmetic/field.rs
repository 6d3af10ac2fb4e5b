//! Field arithmetic modulo p = 2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1

use cfg_if::cfg_if;

mod field_5x52;

cfg_if! {
    if #[cfg(debug_assertions)] {
        mod field_impl;
        use field_impl::FieldElementImpl;
    } else {
        use field_5x52::FieldElement5x52 as FieldElementImpl;
    }
}

use crate::FieldBytes;
use core::ops::{Add, AddAssign, Mul, MulAssign};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

/// An element in the finite field used for curve coordinates.
///
/// Arithmetic is lazy: additions and negations grow the element's magnitude
/// and only multiplication, squaring and the normalization methods bring it
/// back down. Callers track magnitudes themselves; debug builds assert that
/// they stay within bounds.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(FieldElementImpl);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self(FieldElementImpl::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(FieldElementImpl::ONE);

    /// Determine if this `FieldElement` is zero. It must be normalized.
    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    /// Determine if this `FieldElement` is odd: `self mod 2 == 1`. It must be normalized.
    pub fn is_odd(&self) -> Choice {
        self.0.is_odd()
    }

    /// Parses a big-endian integer without checking it is below the modulus.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self(FieldElementImpl::from_bytes_unchecked(bytes))
    }

    /// Attempts to parse the given byte array as a big-endian field element.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, p).
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        FieldElementImpl::from_bytes(bytes).map(Self)
    }

    /// Field element holding a small integer.
    pub const fn from_u64(val: u64) -> Self {
        Self(FieldElementImpl::from_u64(val))
    }

    /// Returns the big-endian encoding of this field element.
    pub fn to_bytes(&self) -> FieldBytes {
        self.0.normalize().to_bytes()
    }

    /// Returns -self, treating it as a value of given magnitude.
    /// The provided magnitude must be equal or greater than the actual magnitude of `self`.
    pub fn negate(&self, magnitude: u32) -> Self {
        Self(self.0.negate(magnitude))
    }

    /// Fully normalizes the field element.
    /// Brings the magnitude to 1 and modulo reduces the value.
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }

    /// Weakly normalizes the field element.
    /// Brings the magnitude to 1, but does not guarantee the value to be less than the modulus.
    pub fn normalize_weak(&self) -> Self {
        Self(self.0.normalize_weak())
    }

    /// Checks if the field element becomes zero if normalized.
    pub fn normalizes_to_zero(&self) -> Choice {
        self.0.normalizes_to_zero()
    }

    /// Multiplies by a single-limb integer.
    /// Multiplies the magnitude by the same value.
    pub fn mul_single(&self, rhs: u32) -> Self {
        Self(self.0.mul_single(rhs))
    }

    /// Returns 2*self.
    /// Doubles the magnitude.
    pub fn double(&self) -> Self {
        Self(self.0.add(&self.0))
    }

    /// Returns self * rhs mod p
    /// Brings the magnitude to 1 (but doesn't normalize the result).
    /// The magnitudes of arguments should be <= 8.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }

    /// Returns self * self
    /// Brings the magnitude to 1 (but doesn't normalize the result).
    /// The magnitudes of arguments should be <= 8.
    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Raises the element to the power `2^k`
    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Returns `2^n - 1` powers of `self` for the run lengths shared by the
    /// inversion and square root exponents: `(x2, x3, x22, x223)`.
    fn power_blocks(&self) -> (Self, Self, Self, Self) {
        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);
        (x2, x3, x22, x223)
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    /// The result has magnitude 1, but is not normalized.
    pub fn invert(&self) -> CtOption<Self> {
        // p - 2 has runs of ones of lengths 223, 22, 1, 2 and 1 (from the top),
        // so it is assembled from the blocks with a sliding window.
        let (x2, _, x22, x223) = self.power_blocks();
        let res = x223
            .pow2k(23)
            .mul(&x22)
            .pow2k(5)
            .mul(self)
            .pow2k(3)
            .mul(&x2)
            .pow2k(2)
            .mul(self);

        CtOption::new(res, !self.normalizes_to_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root exists.
    /// The result has magnitude 1, but is not normalized.
    pub fn sqrt(&self) -> CtOption<Self> {
        // p = 3 mod 4, so a root of a is a^((p+1)/4). That exponent is even and
        // so gives the same answer for a and -a; squaring back tells which of
        // the two actually had the root.
        let (x2, _, x22, x223) = self.power_blocks();
        let res = x223.pow2k(23).mul(&x22).pow2k(6).mul(&x2).pow2k(2);

        let is_root = (res.mul(&res).negate(1) + self).normalizes_to_zero();

        CtOption::new(res, is_root)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(FieldElementImpl::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    /// Compares the reduced values, whatever the magnitudes of the operands.
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.normalize().ct_eq(&other.0.normalize())
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl AddAssign<FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: FieldElement) {
        *self = *self + &rhs;
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl MulAssign<FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: FieldElement) {
        *self = *self * &rhs;
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use proptest::prelude::*;

    use super::FieldElement;
    use crate::arithmetic::dev::{biguint_to_bytes, bytes_to_biguint, field_modulus};

    fn from_biguint(x: &BigUint) -> FieldElement {
        FieldElement::from_bytes(&biguint_to_bytes(x)).unwrap()
    }

    fn to_biguint(fe: &FieldElement) -> BigUint {
        bytes_to_biguint(&fe.to_bytes())
    }

    #[test]
    fn zero_is_additive_identity() {
        let zero = FieldElement::ZERO;
        let one = FieldElement::ONE;
        assert_eq!((zero + &zero).normalize(), zero);
        assert_eq!((one + &zero).normalize(), one);
    }

    #[test]
    fn one_is_multiplicative_identity() {
        let one = FieldElement::ONE;
        assert_eq!((one * &one).normalize(), one);
    }

    #[test]
    fn from_bytes() {
        assert_eq!(
            FieldElement::from_bytes(&[0; 32]).unwrap(),
            FieldElement::ZERO
        );

        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(FieldElement::from_bytes(&one).unwrap(), FieldElement::ONE);
        assert!(bool::from(FieldElement::from_bytes(&[0xff; 32]).is_none()));
    }

    #[test]
    fn to_bytes() {
        assert_eq!(FieldElement::ZERO.to_bytes(), [0; 32]);

        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(FieldElement::ONE.to_bytes(), one);
    }

    #[test]
    fn repeated_double_wraps_around_modulus() {
        let p = field_modulus();
        let mut expected = BigUint::from(1u8);
        let mut r = FieldElement::ONE;
        let mut m = FieldElement::ONE;
        let two = FieldElement::from_u64(2);
        for _ in 0..300 {
            assert_eq!(to_biguint(&r), expected);
            assert_eq!(to_biguint(&m), expected);
            r = r.double().normalize();
            m = m * &two;
            expected = (expected << 1u32) % &p;
        }
    }

    #[test]
    fn negation() {
        let two = FieldElement::ONE.double();
        let neg_two = two.negate(2);
        assert_eq!((two + &neg_two).normalize(), FieldElement::ZERO);
        assert_eq!(neg_two.negate(3).normalize(), two.normalize());
    }

    #[test]
    fn invert() {
        assert!(bool::from(FieldElement::ZERO.invert().is_none()));

        let one = FieldElement::ONE;
        assert_eq!(one.invert().unwrap().normalize(), one);

        let two = one + &one;
        let inv_two = two.invert().unwrap();
        assert_eq!((two * &inv_two).normalize(), one);
    }

    #[test]
    fn sqrt() {
        let two = FieldElement::ONE.double();
        let four = two.square();
        assert_eq!(four.sqrt().unwrap().normalize(), two.normalize());

        // -1 is not a square since p = 3 mod 4
        let minus_one = FieldElement::ONE.negate(1);
        assert!(bool::from(minus_one.sqrt().is_none()));
    }

    #[test]
    fn comparison_ignores_representation() {
        let p = hex_literal::hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
        let unreduced = FieldElement::from_bytes_unchecked(&p);
        assert_eq!(unreduced, FieldElement::ZERO);
    }

    prop_compose! {
        fn field_element()(bytes in any::<[u8; 32]>()) -> FieldElement {
            let mut res = bytes_to_biguint(&bytes);
            let m = field_modulus();
            // both are 256 bits long, one subtraction is enough
            if res >= m {
                res -= m;
            }
            from_biguint(&res)
        }
    }

    proptest! {
        #[test]
        fn fuzzy_add(a in field_element(), b in field_element()) {
            let res_bi = (to_biguint(&a) + to_biguint(&b)) % field_modulus();
            prop_assert_eq!((&a + &b).normalize(), from_biguint(&res_bi));
        }

        #[test]
        fn fuzzy_mul(a in field_element(), b in field_element()) {
            let res_bi = (to_biguint(&a) * to_biguint(&b)) % field_modulus();
            prop_assert_eq!((&a * &b).normalize(), from_biguint(&res_bi));
        }

        #[test]
        fn fuzzy_square(a in field_element()) {
            let a_bi = to_biguint(&a);
            let res_bi = (&a_bi * &a_bi) % field_modulus();
            prop_assert_eq!(a.square().normalize(), from_biguint(&res_bi));
        }

        #[test]
        fn fuzzy_negate(a in field_element()) {
            let m = field_modulus();
            let res_bi = (&m - to_biguint(&a)) % &m;
            prop_assert_eq!(a.negate(1).normalize(), from_biguint(&res_bi));
        }

        #[test]
        fn fuzzy_sqrt(a in field_element()) {
            let m = field_modulus();
            let a_bi = to_biguint(&a);
            let sqr = from_biguint(&((&a_bi * &a_bi) % &m));

            let other_root = from_biguint(&((&m - &a_bi) % &m));
            let res = sqr.sqrt().unwrap().normalize();
            prop_assert!(res == a || res == other_root);
        }

        #[test]
        fn fuzzy_invert(a in field_element()) {
            let a = if bool::from(a.is_zero()) { FieldElement::ONE } else { a };
            let inv = a.invert().unwrap().normalize();
            let product = (to_biguint(&inv) * to_biguint(&a)) % field_modulus();
            prop_assert_eq!(product, BigUint::from(1u8));
        }
    }
}
