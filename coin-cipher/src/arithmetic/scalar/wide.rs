//! 512-bit products of scalars and their reduction modulo the group order.

use super::{MODULUS, Scalar};
use elliptic_curve::subtle::{Choice, ConditionallySelectable};

/// Limbs of 2^256 minus the group order. Only the two low limbs are
/// non-trivial, the third is 1 and the fourth 0.
const NEG_MODULUS: [u64; 2] = [!MODULUS[0] + 1, !MODULUS[1]];

/// 192-bit accumulator `c0 + c1·2^64 + c2·2^128` used for column-wise
/// multiplication.
#[derive(Default)]
struct Accumulator {
    c0: u64,
    c1: u64,
    c2: u64,
}

impl Accumulator {
    fn new(c0: u64) -> Self {
        Self { c0, c1: 0, c2: 0 }
    }

    #[inline(always)]
    fn low(&self) -> u128 {
        ((self.c1 as u128) << 64) | self.c0 as u128
    }

    #[inline(always)]
    fn set_low(&mut self, low: u128) {
        self.c0 = low as u64;
        self.c1 = (low >> 64) as u64;
    }

    /// Adds `a·b`. The top limb must not overflow.
    #[inline(always)]
    fn muladd(&mut self, a: u64, b: u64) {
        let (low, carry) = self.low().overflowing_add(a as u128 * b as u128);
        self.set_low(low);
        self.c2 += carry as u64;
    }

    /// Adds `a·b` when the sum is known to fit into `c0, c1`.
    #[inline(always)]
    fn muladd_fast(&mut self, a: u64, b: u64) {
        let low = self.low() + a as u128 * b as u128;
        self.set_low(low);
    }

    /// Adds `a`. The top limb must not overflow.
    #[inline(always)]
    fn sumadd(&mut self, a: u64) {
        let (low, carry) = self.low().overflowing_add(a as u128);
        self.set_low(low);
        self.c2 += carry as u64;
    }

    /// Adds `a` when the sum is known to fit into `c0, c1`.
    #[inline(always)]
    fn sumadd_fast(&mut self, a: u64) {
        let low = self.low() + a as u128;
        self.set_low(low);
    }

    /// Removes and returns the lowest limb, shifting the rest down.
    #[inline(always)]
    fn extract(&mut self) -> u64 {
        let res = self.c0;
        self.c0 = self.c1;
        self.c1 = self.c2;
        self.c2 = 0;
        res
    }

    /// Like [`extract`](Self::extract) when `c2` is known to be zero.
    #[inline(always)]
    fn extract_fast(&mut self) -> u64 {
        debug_assert!(self.c2 == 0);
        let res = self.c0;
        self.c0 = self.c1;
        self.c1 = 0;
        res
    }
}

/// Unreduced product of two scalars, little-endian limbs.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct WideScalar(pub(super) [u64; 8]);

impl WideScalar {
    /// Multiplies two scalars without modulo reduction, producing up to a 512-bit value.
    #[inline(always)]
    pub(super) fn mul_wide(a: &Scalar, b: &Scalar) -> Self {
        let (a, b) = (&a.0, &b.0);
        let mut l = [0u64; 8];
        let mut acc = Accumulator::default();

        // column i collects every a[j]·b[i-j]
        for (i, limb) in l.iter_mut().enumerate().take(7) {
            let lo = i.saturating_sub(3);
            let hi = i.min(3);
            for j in lo..=hi {
                if i == 0 || i == 6 {
                    acc.muladd_fast(a[j], b[i - j]);
                } else {
                    acc.muladd(a[j], b[i - j]);
                }
            }
            *limb = if i == 0 || i == 6 {
                acc.extract_fast()
            } else {
                acc.extract()
            };
        }
        debug_assert!(acc.c1 == 0);
        l[7] = acc.c0;

        Self(l)
    }

    /// Multiplies `a` by `b` (without modulo reduction) and divides the result
    /// by `2^shift`, rounding to the nearest integer.
    /// Variable time in `shift`.
    pub(super) fn mul_shift_var(a: &Scalar, b: &Scalar, shift: usize) -> Scalar {
        debug_assert!(shift >= 256);

        let l = Self::mul_wide(a, b).0;
        let shiftlimbs = shift >> 6;
        let shiftlow = shift & 0x3F;
        let shifthigh = 64 - shiftlow;

        let r0 = if shift < 512 {
            let lo = l[shiftlimbs] >> shiftlow;
            let hi = if shift < 448 && shiftlow != 0 {
                l[1 + shiftlimbs] << shifthigh
            } else {
                0
            };
            hi | lo
        } else {
            0
        };

        let r1 = if shift < 448 {
            let lo = l[1 + shiftlimbs] >> shiftlow;
            let hi = if shift < 384 && shiftlow != 0 {
                l[2 + shiftlimbs] << shifthigh
            } else {
                0
            };
            hi | lo
        } else {
            0
        };

        let r2 = if shift < 384 {
            let lo = l[2 + shiftlimbs] >> shiftlow;
            let hi = if shift < 320 && shiftlow != 0 {
                l[3 + shiftlimbs] << shifthigh
            } else {
                0
            };
            hi | lo
        } else {
            0
        };

        let r3 = if shift < 320 {
            l[3 + shiftlimbs] >> shiftlow
        } else {
            0
        };

        let res = Scalar([r0, r1, r2, r3]);

        // round up when the highest discarded bit is set
        let c = (l[(shift - 1) >> 6] >> ((shift - 1) & 0x3f)) & 1;
        Scalar::conditional_select(&res, &res.add(&Scalar::ONE), Choice::from(c as u8))
    }

    /// Reduces the product modulo the group order.
    pub(super) fn reduce(&self) -> Scalar {
        let w = &self.0;
        let [n0, n1, n2, n3] = [w[4], w[5], w[6], w[7]];

        // 512 -> 385 bits: m[0..6] = w[0..3] + n[0..3] * NEG_MODULUS
        let mut acc = Accumulator::new(w[0]);
        acc.muladd_fast(n0, NEG_MODULUS[0]);
        let m0 = acc.extract_fast();
        acc.sumadd_fast(w[1]);
        acc.muladd(n1, NEG_MODULUS[0]);
        acc.muladd(n0, NEG_MODULUS[1]);
        let m1 = acc.extract();
        acc.sumadd(w[2]);
        acc.muladd(n2, NEG_MODULUS[0]);
        acc.muladd(n1, NEG_MODULUS[1]);
        acc.sumadd(n0);
        let m2 = acc.extract();
        acc.sumadd(w[3]);
        acc.muladd(n3, NEG_MODULUS[0]);
        acc.muladd(n2, NEG_MODULUS[1]);
        acc.sumadd(n1);
        let m3 = acc.extract();
        acc.muladd(n3, NEG_MODULUS[1]);
        acc.sumadd(n2);
        let m4 = acc.extract();
        acc.sumadd_fast(n3);
        let m5 = acc.extract_fast();
        debug_assert!(acc.c0 <= 1);
        let m6 = acc.c0;

        // 385 -> 258 bits: p[0..4] = m[0..3] + m[4..6] * NEG_MODULUS
        let mut acc = Accumulator::new(m0);
        acc.muladd_fast(m4, NEG_MODULUS[0]);
        let p0 = acc.extract_fast();
        acc.sumadd_fast(m1);
        acc.muladd(m5, NEG_MODULUS[0]);
        acc.muladd(m4, NEG_MODULUS[1]);
        let p1 = acc.extract();
        acc.sumadd(m2);
        acc.muladd(m6, NEG_MODULUS[0]);
        acc.muladd(m5, NEG_MODULUS[1]);
        acc.sumadd(m4);
        let p2 = acc.extract();
        acc.sumadd_fast(m3);
        acc.muladd_fast(m6, NEG_MODULUS[1]);
        acc.sumadd_fast(m5);
        let p3 = acc.extract_fast();
        let p4 = acc.c0 + m6;
        debug_assert!(p4 <= 2);

        // 258 -> 256 bits: r[0..3] = p[0..3] + p4 * NEG_MODULUS
        let mut c = (p0 as u128) + (NEG_MODULUS[0] as u128) * (p4 as u128);
        let r0 = c as u64;
        c >>= 64;
        c += (p1 as u128) + (NEG_MODULUS[1] as u128) * (p4 as u128);
        let r1 = c as u64;
        c >>= 64;
        c += (p2 as u128) + (p4 as u128);
        let r2 = c as u64;
        c >>= 64;
        c += p3 as u128;
        let r3 = c as u64;
        c >>= 64;

        Scalar::from_overflow(&[r0, r1, r2, r3], Choice::from(c as u8))
    }
}
