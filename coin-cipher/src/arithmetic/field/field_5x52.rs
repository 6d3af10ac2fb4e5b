//! Field element modulo the curve internal modulus using 64-bit limbs.
//! Follows the representation used by <https://github.com/bitcoin-core/secp256k1>

use crate::{
    FieldBytes,
    arithmetic::util::{be_bytes_to_words, words_to_be_bytes},
};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

/// Low 52 bits.
const LIMB_MASK: u64 = 0xF_FFFF_FFFF_FFFF;

/// Low 48 bits, the width of the top limb.
const TOP_LIMB_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// `2^256 - p`.
const MODULUS_COMPLEMENT: u64 = 0x1_0000_03D1;

/// Element of GF(p) in five little-endian limbs.
///
/// When normalized the lower four limbs carry 52 bits each and the top one 48.
/// The spare bits of each `u64` let additions run for a while without any
/// reduction; the "magnitude" of an element bounds how far each limb may have
/// grown past its normalized width.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement5x52(pub(crate) [u64; 5]);

impl FieldElement5x52 {
    /// Zero element.
    pub const ZERO: Self = Self([0, 0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0, 0]);

    /// Repacks a big-endian integer into limbs without checking it is below `p`.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        let w = be_bytes_to_words(bytes);
        Self([
            w[0] & LIMB_MASK,
            ((w[0] >> 52) | (w[1] << 12)) & LIMB_MASK,
            ((w[1] >> 40) | (w[2] << 24)) & LIMB_MASK,
            ((w[2] >> 28) | (w[3] << 36)) & LIMB_MASK,
            w[3] >> 16,
        ])
    }

    /// Parses a big-endian integer, returning `None` unless it lies in `[0, p)`.
    #[inline]
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        let res = Self::from_bytes_unchecked(bytes);
        let overflow = res.get_overflow();
        CtOption::new(res, !overflow)
    }

    /// Field element holding a small integer.
    pub const fn from_u64(val: u64) -> Self {
        Self([val & LIMB_MASK, val >> 52, 0, 0, 0])
    }

    /// Big-endian encoding. The element must be normalized.
    pub fn to_bytes(self) -> FieldBytes {
        let l = self.0;
        words_to_be_bytes(&[
            l[0] | (l[1] << 52),
            (l[1] >> 12) | (l[2] << 40),
            (l[2] >> 24) | (l[3] << 28),
            (l[3] >> 36) | (l[4] << 16),
        ])
    }

    /// Adds `x * (2^256 - p)` and carries every limb back to 52 bits.
    fn add_modulus_correction(&self, x: u64) -> Self {
        let t0 = self.0[0] + x * MODULUS_COMPLEMENT;
        let t1 = self.0[1] + (t0 >> 52);
        let t2 = self.0[2] + (t1 >> 52);
        let t3 = self.0[3] + (t2 >> 52);
        let t4 = self.0[4] + (t3 >> 52);
        Self([
            t0 & LIMB_MASK,
            t1 & LIMB_MASK,
            t2 & LIMB_MASK,
            t3 & LIMB_MASK,
            t4,
        ])
    }

    /// Strips everything above bit 256 and returns it as a count of `2^256`.
    fn subtract_modulus_approximation(&self) -> (Self, u64) {
        let x = self.0[4] >> 48;
        let t4 = self.0[4] & TOP_LIMB_MASK;
        (Self([self.0[0], self.0[1], self.0[2], self.0[3], t4]), x)
    }

    /// Is a carried value `>= p`?
    fn get_overflow(&self) -> Choice {
        let m = self.0[1] & self.0[2] & self.0[3];
        let x = (self.0[4] >> 48 != 0)
            | ((self.0[4] == TOP_LIMB_MASK)
                & (m == LIMB_MASK)
                & (self.0[0] >= 0xF_FFFE_FFFF_FC2F));
        Choice::from(x as u8)
    }

    /// Brings the magnitude to 1 without necessarily reducing below `p`.
    pub fn normalize_weak(&self) -> Self {
        let (t, x) = self.subtract_modulus_approximation();
        let res = t.add_modulus_correction(x);

        // at most one carry into bit 256 is left
        debug_assert!(res.0[4] >> 49 == 0);

        res
    }

    /// Fully reduces the element: every limb at its normalized width and the
    /// value below `p`.
    pub fn normalize(&self) -> Self {
        let res = self.normalize_weak();
        let overflow = res.get_overflow();

        // the final reduction runs unconditionally, only the selection depends on `overflow`
        let (res_corrected, x) = res
            .add_modulus_correction(1u64)
            .subtract_modulus_approximation();
        debug_assert!(x == (overflow.unwrap_u8() as u64));

        Self::conditional_select(&res, &res_corrected, overflow)
    }

    /// Would this element be zero after [`normalize`](Self::normalize)?
    pub fn normalizes_to_zero(&self) -> Choice {
        let res = self.normalize_weak();
        let [t0, t1, t2, t3, t4] = res.0;

        // z0 catches a raw value of 0, z1 a raw value of p
        let z0 = t0 | t1 | t2 | t3 | t4;
        let z1 = (t0 ^ 0x1_0000_03D0) & t1 & t2 & t3 & (t4 ^ 0xF_0000_0000_0000);

        Choice::from(((z0 == 0) | (z1 == LIMB_MASK)) as u8)
    }

    /// Is this (normalized) element zero?
    pub fn is_zero(&self) -> Choice {
        Choice::from(((self.0[0] | self.0[1] | self.0[2] | self.0[3] | self.0[4]) == 0) as u8)
    }

    /// Is this (normalized) element odd?
    pub fn is_odd(&self) -> Choice {
        (self.0[0] as u8 & 1).into()
    }

    /// Largest `m` with `0xFFFFFFFFFFFFF * 2 * (m + 1) < 2^64`.
    #[cfg(debug_assertions)]
    pub const fn max_magnitude() -> u32 {
        2047u32
    }

    /// Returns `-self` for an element of at most the given magnitude.
    /// The result has magnitude `magnitude + 1`.
    pub const fn negate(&self, magnitude: u32) -> Self {
        let m = (magnitude + 1) as u64;
        Self([
            0xF_FFFE_FFFF_FC2F * 2 * m - self.0[0],
            LIMB_MASK * 2 * m - self.0[1],
            LIMB_MASK * 2 * m - self.0[2],
            LIMB_MASK * 2 * m - self.0[3],
            TOP_LIMB_MASK * 2 * m - self.0[4],
        ])
    }

    /// Limb-wise sum; the magnitudes add up.
    pub const fn add(&self, rhs: &Self) -> Self {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
            self.0[4] + rhs.0[4],
        ])
    }

    /// Limb-wise multiple; the magnitude is multiplied by `rhs`.
    pub const fn mul_single(&self, rhs: u32) -> Self {
        let rhs = rhs as u64;
        Self([
            self.0[0] * rhs,
            self.0[1] * rhs,
            self.0[2] * rhs,
            self.0[3] * rhs,
            self.0[4] * rhs,
        ])
    }

    // Kept separate from `mul` so that `square` sees both operands are the same
    // value once this is inlined.
    #[inline(always)]
    fn mul_inner(&self, rhs: &Self) -> Self {
        let [a0, a1, a2, a3, a4] = self.0.map(u128::from);
        let [b0, b1, b2, b3, b4] = rhs.0.map(u128::from);
        let m = LIMB_MASK as u128;
        // 2^260 mod p, shifted to line up with a 52-bit limb boundary
        let r = 0x10_0000_3D10u128;

        debug_assert!(a0 >> 56 == 0 && a1 >> 56 == 0 && a2 >> 56 == 0 && a3 >> 56 == 0);
        debug_assert!(a4 >> 52 == 0);
        debug_assert!(b0 >> 56 == 0 && b1 >> 56 == 0 && b2 >> 56 == 0 && b3 >> 56 == 0);
        debug_assert!(b4 >> 52 == 0);

        // [... a b c] stands for ... + a<<104 + b<<52 + c<<0 mod p, and
        // px for the sum of the limb products whose indices add up to x.

        // [d 0 0 0] = [p3 0 0 0]
        let mut d = a0 * b3 + a1 * b2 + a2 * b1 + a3 * b0;
        // [c 0 0 0 0 d 0 0 0] = [p8 0 0 0 0 p3 0 0 0]
        let mut c = a4 * b4;
        d += (c & m) * r;
        c >>= 52;
        let c64 = c as u64;
        let t3 = (d & m) as u64;
        d >>= 52;
        let d64 = d as u64;
        // [c 0 0 0 0 d t3 0 0 0] = [p8 0 0 0 0 p3 0 0 0]

        d = d64 as u128 + a0 * b4 + a1 * b3 + a2 * b2 + a3 * b1 + a4 * b0;
        d += c64 as u128 * r;
        let t4 = (d & m) as u64;
        d >>= 52;
        let d64 = d as u64;
        let tx = t4 >> 48;
        let t4 = t4 & (LIMB_MASK >> 4);
        // [d t4+(tx<<48) t3 0 0 0] = [p8 0 0 0 p4 p3 0 0 0]

        c = a0 * b0;
        d = d64 as u128 + a1 * b4 + a2 * b3 + a3 * b2 + a4 * b1;
        let u0 = (d & m) as u64;
        d >>= 52;
        let d64 = d as u64;
        let u0 = (u0 << 4) | tx;
        c += u0 as u128 * ((r as u64) >> 4) as u128;
        let r0 = (c & m) as u64;
        c >>= 52;
        let c64 = c as u64;
        // [d 0 t4 t3 0 c r0] = [p8 0 0 p5 p4 p3 0 0 p0]

        c = c64 as u128 + a0 * b1 + a1 * b0;
        d = d64 as u128 + a2 * b4 + a3 * b3 + a4 * b2;
        c += (d & m) * r;
        d >>= 52;
        let d64 = d as u64;
        let r1 = (c & m) as u64;
        c >>= 52;
        let c64 = c as u64;
        // [d 0 0 t4 t3 c r1 r0] = [p8 0 p6 p5 p4 p3 0 p1 p0]

        c = c64 as u128 + a0 * b2 + a1 * b1 + a2 * b0;
        d = d64 as u128 + a3 * b4 + a4 * b3;
        c += (d & m) * r;
        d >>= 52;
        let d64 = d as u64;
        let r2 = (c & m) as u64;
        c >>= 52;
        let c64 = c as u64;
        // [d 0 0 0 t4 t3+c r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]

        c = c64 as u128 + (d64 as u128) * r + t3 as u128;
        let r3 = (c & m) as u64;
        c >>= 52;
        let c64 = c as u64;
        c = c64 as u128 + t4 as u128;
        let r4 = c as u64;
        debug_assert!(r4 >> 49 == 0);
        // [r4 r3 r2 r1 r0] = [p8 p7 p6 p5 p4 p3 p2 p1 p0]

        Self([r0, r1, r2, r3, r4])
    }

    /// Returns `self * rhs mod p` with magnitude 1 (not normalized).
    /// Both inputs must have magnitude at most 8.
    #[inline(always)]
    pub fn mul(&self, rhs: &Self) -> Self {
        self.mul_inner(rhs)
    }

    /// Returns `self * self mod p` with magnitude 1 (not normalized).
    /// The input must have magnitude at most 8.
    pub fn square(&self) -> Self {
        self.mul_inner(self)
    }
}

impl Default for FieldElement5x52 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElement5x52 {
    #[inline(always)]
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }
}

impl ConstantTimeEq for FieldElement5x52 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Zeroize for FieldElement5x52 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::FieldElement5x52;
    use hex_literal::hex;

    #[test]
    fn overflow_check_after_weak_normalize() {
        // 2^256 with an excess bit left in limb 0: weak normalization pushes
        // it all the way into the top limb, which the overflow check must see.
        let z = FieldElement5x52([
            1 << 52,
            (1 << 52) - 1,
            (1 << 52) - 1,
            (1 << 52) - 1,
            (1 << 48) - 1,
        ]);

        // 2^256 mod p
        assert_eq!(z.normalize().0, [0x1000003d1, 0, 0, 0, 0]);
    }

    #[test]
    fn byte_repacking() {
        let bytes = hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        let fe = FieldElement5x52::from_bytes_unchecked(&bytes);
        for limb in &fe.0[..4] {
            assert_eq!(limb >> 52, 0);
        }
        assert_eq!(fe.0[4] >> 48, 0);
        assert_eq!(fe.to_bytes(), bytes);
    }

    #[test]
    fn modulus_normalizes_to_zero() {
        let p = hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
        let fe = FieldElement5x52::from_bytes_unchecked(&p);
        assert!(bool::from(FieldElement5x52::from_bytes(&p).is_none()));
        assert!(bool::from(fe.normalizes_to_zero()));
        assert!(bool::from(fe.normalize().is_zero()));
    }
}
