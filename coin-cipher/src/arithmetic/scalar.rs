//! Scalar field arithmetic modulo the group order.
//! Ported from <https://github.com/bitcoin-core/secp256k1>

mod wide;

use self::wide::WideScalar;

use crate::{
    FieldBytes,
    arithmetic::util::{adc64, be_bytes_to_words, sbb64, words_to_be_bytes},
};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};
use elliptic_curve::{
    rand_core::CryptoRngCore,
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

/// Constant representing the modulus
/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
pub(crate) const MODULUS: [u64; 4] = [
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// Constant representing (n - 1) / 2
const FRAC_MODULUS_2: [u64; 4] = [
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
];

/// `-λ mod n`, where `λ` acts on points as `λ·(x, y) = (β·x, y)`.
const MINUS_LAMBDA: Scalar = Scalar::from_bytes_unchecked(&[
    0xac, 0x9c, 0x52, 0xb3, 0x3f, 0xa3, 0xcf, 0x1f, 0x5a, 0xd9, 0xe3, 0xfd, 0x77, 0xed, 0x9b, 0xa4,
    0xa8, 0x80, 0xb9, 0xfc, 0x8e, 0xc7, 0x39, 0xc2, 0xe0, 0xcf, 0xc8, 0x10, 0xb5, 0x12, 0x83, 0xcf,
]);

// Lattice basis constants for the GLV split, see section 3.5 of
// "Guide to Elliptic Curve Cryptography" (Hankerson, Menezes, Vanstone).
// G1 and G2 are round(2^272 * b2 / n) and round(2^272 * (-b1) / n).

const MINUS_B1: Scalar = Scalar::from_bytes_unchecked(&[
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xe4, 0x43, 0x7e, 0xd6, 0x01, 0x0e, 0x88, 0x28, 0x6f, 0x54, 0x7f, 0xa9, 0x0a, 0xbf, 0xe4, 0xc3,
]);

const MINUS_B2: Scalar = Scalar::from_bytes_unchecked(&[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0x8a, 0x28, 0x0a, 0xc5, 0x07, 0x74, 0x34, 0x6d, 0xd7, 0x65, 0xcd, 0xa8, 0x3d, 0xb1, 0x56, 0x2c,
]);

const G1: Scalar = Scalar::from_bytes_unchecked(&[
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x86,
    0xd2, 0x21, 0xa7, 0xd4, 0x6b, 0xcd, 0xe8, 0x6c, 0x90, 0xe4, 0x92, 0x84, 0xeb, 0x15, 0x3d, 0xab,
]);

const G2: Scalar = Scalar::from_bytes_unchecked(&[
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xe4, 0x43,
    0x7e, 0xd6, 0x01, 0x0e, 0x88, 0x28, 0x6f, 0x54, 0x7f, 0xa9, 0x0a, 0xbf, 0xe4, 0xc4, 0x22, 0x12,
]);

#[inline(always)]
fn sbb_array(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], Choice) {
    let (r0, borrow) = sbb64(lhs[0], rhs[0], 0);
    let (r1, borrow) = sbb64(lhs[1], rhs[1], borrow);
    let (r2, borrow) = sbb64(lhs[2], rhs[2], borrow);
    let (r3, borrow) = sbb64(lhs[3], rhs[3], borrow);
    ([r0, r1, r2, r3], Choice::from((borrow >> 63) as u8))
}

#[inline(always)]
fn adc_array(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], Choice) {
    let (r0, carry) = adc64(lhs[0], rhs[0], 0);
    let (r1, carry) = adc64(lhs[1], rhs[1], carry);
    let (r2, carry) = adc64(lhs[2], rhs[2], carry);
    let (r3, carry) = adc64(lhs[3], rhs[3], carry);
    ([r0, r1, r2, r3], Choice::from(carry as u8))
}

/// An integer modulo the group order `n`, stored as four little-endian
/// 64-bit limbs. The value is always fully reduced.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar(pub(crate) [u64; 4]);

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Scalar holding a small integer.
    pub const fn from_u64(k: u64) -> Self {
        Self([k, 0, 0, 0])
    }

    /// Parses a big-endian integer which is already known to be below `n`.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self(be_bytes_to_words(bytes))
    }

    /// Attempts to parse the given byte array as a big-endian scalar.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, n).
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        let w = be_bytes_to_words(bytes);

        // w - n underflows exactly when w is in range
        let (_, underflow) = sbb_array(&w, &MODULUS);
        CtOption::new(Self(w), underflow)
    }

    /// Parses a big-endian integer and reduces it modulo `n`.
    ///
    /// Used for message hashes and for the `x` coordinate of the nonce point.
    pub fn from_bytes_reduced(bytes: &FieldBytes) -> Self {
        Self::from_overflow(&be_bytes_to_words(bytes), Choice::from(0))
    }

    /// Draws a uniformly random non-zero scalar by rejection sampling.
    pub fn random_nonzero(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = FieldBytes::default();
        loop {
            rng.fill_bytes(&mut bytes);
            if let Some(scalar) = Option::<Self>::from(Self::from_bytes(&bytes)) {
                if !bool::from(scalar.is_zero()) {
                    bytes.zeroize();
                    return scalar;
                }
            }
        }
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(&self) -> FieldBytes {
        words_to_be_bytes(&self.0)
    }

    /// Is this scalar greater than (n - 1) / 2?
    pub fn is_high(&self) -> Choice {
        let (_, underflow) = sbb_array(&FRAC_MODULUS_2, &self.0);
        underflow
    }

    /// Is this scalar equal to 0?
    pub fn is_zero(&self) -> Choice {
        Choice::from(((self.0[0] | self.0[1] | self.0[2] | self.0[3]) == 0) as u8)
    }

    /// Is this scalar odd?
    pub fn is_odd(&self) -> Choice {
        (self.0[0] as u8 & 1).into()
    }

    /// Computes `(high_bit * 2^256 + w) mod n` for `w` below `2^256`.
    fn from_overflow(w: &[u64; 4], high_bit: Choice) -> Self {
        let (r2, underflow) = sbb_array(w, &MODULUS);
        Self::conditional_select(&Self(*w), &Self(r2), !underflow | high_bit)
    }

    /// Returns `-self mod n`.
    pub fn negate(&self) -> Self {
        let (res, _) = sbb_array(&MODULUS, &self.0);
        Self::conditional_select(&Self(res), &Self::ZERO, self.is_zero())
    }

    /// Returns `self + rhs mod n`.
    pub fn add(&self, rhs: &Self) -> Self {
        let (res, overflow) = adc_array(&self.0, &rhs.0);
        Self::from_overflow(&res, overflow)
    }

    /// Returns `self - rhs mod n`.
    pub fn sub(&self, rhs: &Self) -> Self {
        let (res1, underflow) = sbb_array(&self.0, &rhs.0);
        let (res2, _) = adc_array(&res1, &MODULUS);
        Self::conditional_select(&Self(res1), &Self(res2), underflow)
    }

    /// Returns `self * rhs mod n`.
    pub fn mul(&self, rhs: &Self) -> Self {
        WideScalar::mul_wide(self, rhs).reduce()
    }

    /// Returns `self * self mod n`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Raises `self` to `n - 2` with a fixed 4-bit window; the exponent is
    /// public so the schedule does not depend on `self`.
    pub fn invert(&self) -> CtOption<Self> {
        const EXPONENT: [u64; 4] = [MODULUS[0] - 2, MODULUS[1], MODULUS[2], MODULUS[3]];

        let mut powers = [Self::ONE; 16];
        for i in 1..16 {
            powers[i] = powers[i - 1].mul(self);
        }

        let mut res = Self::ONE;
        for nibble_index in (0..64).rev() {
            for _ in 0..4 {
                res = res.square();
            }
            let nibble = (EXPONENT[nibble_index / 16] >> ((nibble_index % 16) * 4)) & 0xf;
            res = res.mul(&powers[nibble as usize]);
        }

        CtOption::new(res, !self.is_zero())
    }

    /// Right shifts the scalar by `shift` bits.
    /// Variable time in `shift`.
    pub fn shr_vartime(&self, shift: usize) -> Self {
        if shift >= 256 {
            return Self::ZERO;
        }

        let full_shifts = shift >> 6;
        let small_shift = shift & 0x3f;
        let mut res = [0u64; 4];
        for (i, limb) in res.iter_mut().enumerate().take(4 - full_shifts) {
            *limb = self.0[i + full_shifts] >> small_shift;
            if small_shift != 0 && i + full_shifts < 3 {
                *limb |= self.0[i + full_shifts + 1] << (64 - small_shift);
            }
        }
        Self(res)
    }

    /// Returns `count` bits of the scalar starting at bit `offset`, as the low
    /// bits of the result. Bits past the top of the scalar read as zero.
    pub fn bits(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count > 0 && count <= 32);
        if offset >= 256 {
            return 0;
        }

        let limb = offset >> 6;
        let shift = offset & 0x3f;
        let mut v = self.0[limb] >> shift;
        if shift + count > 64 && limb < 3 {
            v |= self.0[limb + 1] << (64 - shift);
        }
        (v & ((1u64 << count) - 1)) as u32
    }

    /// Splits the scalar at bit 128: `self == lo + hi * 2^128`.
    pub fn split_128(&self) -> (Self, Self) {
        (
            Self([self.0[0], self.0[1], 0, 0]),
            Self([self.0[2], self.0[3], 0, 0]),
        )
    }

    /// Finds `(r1, r2)` with `r1 + r2 * λ == self mod n`.
    ///
    /// Both halves are close to `±2^128`; callers negate whichever
    /// [`is_high`](Self::is_high) to get two short positive scalars.
    pub fn decompose(&self) -> (Self, Self) {
        // the shift amount is fixed, so these calls do not leak `self`
        let c1 = self.mul_shift_var(&G1, 272);
        let c2 = self.mul_shift_var(&G2, 272);

        let c1 = c1 * MINUS_B1;
        let c2 = c2 * MINUS_B2;
        let r2 = c1 + c2;
        let r1 = self + &(r2 * MINUS_LAMBDA);

        (r1, r2)
    }

    /// Multiplies without reduction and returns the product divided by
    /// `2^shift`, rounded to the nearest integer.
    pub fn mul_shift_var(&self, b: &Self, shift: usize) -> Self {
        WideScalar::mul_shift_var(self, b, shift)
    }
}

impl From<u64> for Scalar {
    fn from(k: u64) -> Self {
        Self::from_u64(k)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl $trait<Scalar> for Scalar {
            type Output = Scalar;

            fn $method(self, rhs: Scalar) -> Scalar {
                Scalar::$inner(&self, &rhs)
            }
        }

        impl $trait<&Scalar> for Scalar {
            type Output = Scalar;

            fn $method(self, rhs: &Scalar) -> Scalar {
                Scalar::$inner(&self, rhs)
            }
        }

        impl $trait<&Scalar> for &Scalar {
            type Output = Scalar;

            fn $method(self, rhs: &Scalar) -> Scalar {
                Scalar::$inner(self, rhs)
            }
        }
    };
}

impl_binop!(Add, add, add);
impl_binop!(Sub, sub, sub);
impl_binop!(Mul, mul, mul);

impl AddAssign<Scalar> for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        *self = Scalar::add(self, &rhs);
    }
}

impl MulAssign<Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = Scalar::mul(self, &rhs);
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
