//! Scalar multiplication: `na·A + ng·G`.
//!
//! Scalars are recoded into width-`w` non-adjacent form (wNAF): a signed
//! digit string where every non-zero digit is odd, below `2^(w-1)` in
//! absolute value and followed by at least `w - 1` zeros. Each stream of
//! digits indexes a table of odd multiples `[P, 3P, 5P, ...]` of its base
//! point, and all streams share one chain of doublings.
//!
//! Four streams are interleaved:
//!
//! - `na` is split with the GLV endomorphism into two ~128-bit halves
//!   (`na = na1 + na2·λ`) applied to `A` and `λ·A = (β·x, y)`,
//! - `ng` is split at bit 128 and applied to `G` and `2^128·G`, whose odd
//!   multiples are precomputed once per process (`precomputed-tables`).
//!
//! Everything here runs in variable time: the doublings, the additions and
//! the table accesses all depend on the scalars.

use super::{AffinePoint, FieldElement, JacobianPoint, Scalar};

#[cfg(all(
    feature = "precomputed-tables",
    not(any(feature = "critical-section", feature = "std"))
))]
compile_error!("`precomputed-tables` feature requires either `critical-section` or `std`");

#[cfg(all(feature = "precomputed-tables", feature = "critical-section"))]
use once_cell::sync::Lazy as LazyLock;
#[cfg(all(
    feature = "precomputed-tables",
    all(feature = "std", not(feature = "critical-section"))
))]
use std::sync::LazyLock;

/// Window width used for arbitrary points.
pub const WINDOW_A: usize = 5;

/// Window width used for the generator.
#[cfg(feature = "precomputed-tables")]
pub const WINDOW_G: usize = 8;

/// Window width used for the generator.
#[cfg(not(feature = "precomputed-tables"))]
pub const WINDOW_G: usize = WINDOW_A;

/// Number of odd multiples in a table for window `w`: `2^(w-2)`.
const fn table_size(w: usize) -> usize {
    1 << (w - 2)
}

const TABLE_A_SIZE: usize = table_size(WINDOW_A);

#[cfg(feature = "precomputed-tables")]
const TABLE_G_SIZE: usize = table_size(WINDOW_G);

/// Enough digits for any 256-bit scalar: the final carry may spill one bit.
const WNAF_DIGITS: usize = 257;

/// `2^128·G`.
const GENERATOR_128: AffinePoint = AffinePoint::new(
    FieldElement::from_bytes_unchecked(&[
        0x8f, 0x68, 0xb9, 0xd2, 0xf6, 0x3b, 0x5f, 0x33, 0x92, 0x39, 0xc1, 0xad, 0x98, 0x1f, 0x16,
        0x2e, 0xe8, 0x8c, 0x56, 0x78, 0x72, 0x3e, 0xa3, 0x35, 0x1b, 0x7b, 0x44, 0x4c, 0x9e, 0xc4,
        0xc0, 0xda,
    ]),
    FieldElement::from_bytes_unchecked(&[
        0x66, 0x2a, 0x9f, 0x2d, 0xba, 0x06, 0x39, 0x86, 0xde, 0x1d, 0x90, 0xc2, 0xb6, 0xbe, 0x21,
        0x5d, 0xbb, 0xea, 0x2c, 0xfe, 0x95, 0x51, 0x0b, 0xfd, 0xf2, 0x3c, 0xbf, 0x79, 0x50, 0x1f,
        0xff, 0x82,
    ]),
);

/// Recodes `k` into width-`w` NAF digits, least significant first.
///
/// Returns the digits and the number of digits up to and including the
/// highest non-zero one.
pub(crate) fn wnaf(k: &Scalar, w: usize) -> ([i8; WNAF_DIGITS], usize) {
    debug_assert!((2..=8).contains(&w));

    let mut digits = [0i8; WNAF_DIGITS];
    let mut len = 0;
    let mut carry = 0u32;
    let mut bit = 0;

    while bit < WNAF_DIGITS {
        if k.bits(bit, 1) == carry {
            bit += 1;
            continue;
        }

        let now = w.min(WNAF_DIGITS - bit);
        let word = k.bits(bit, now) + carry;
        carry = (word >> (w - 1)) & 1;
        let digit = word as i32 - ((carry << w) as i32);

        digits[bit] = digit as i8;
        len = bit + 1;
        bit += now;
    }
    debug_assert!(carry == 0);

    (digits, len)
}

/// `[P, 3P, 5P, ..., (2·TABLE_A_SIZE - 1)P]`.
fn odd_multiples(p: &JacobianPoint) -> [JacobianPoint; TABLE_A_SIZE] {
    let mut table = [*p; TABLE_A_SIZE];
    let p2 = p.double();
    for i in 1..TABLE_A_SIZE {
        table[i] = table[i - 1] + p2;
    }
    table
}

/// Odd multiples of `G` and `2^128·G` in affine form.
#[cfg(feature = "precomputed-tables")]
struct GeneratorTables {
    g: [AffinePoint; TABLE_G_SIZE],
    g_128: [AffinePoint; TABLE_G_SIZE],
}

#[cfg(feature = "precomputed-tables")]
impl GeneratorTables {
    fn new() -> Self {
        Self {
            g: Self::odd_multiples_affine(&JacobianPoint::GENERATOR),
            g_128: Self::odd_multiples_affine(&JacobianPoint::from(GENERATOR_128)),
        }
    }

    fn odd_multiples_affine(p: &JacobianPoint) -> [AffinePoint; TABLE_G_SIZE] {
        let mut table = [*p; TABLE_G_SIZE];
        let p2 = p.double();
        for i in 1..TABLE_G_SIZE {
            table[i] = table[i - 1] + p2;
        }
        JacobianPoint::batch_normalize(&table)
    }
}

#[cfg(feature = "precomputed-tables")]
static GENERATOR_TABLES: LazyLock<GeneratorTables> = LazyLock::new(GeneratorTables::new);

/// Odd multiples a digit stream indexes into.
enum OddMultiples<'a> {
    Jacobian([JacobianPoint; TABLE_A_SIZE]),
    #[cfg_attr(not(feature = "precomputed-tables"), allow(dead_code))]
    Affine(&'a [AffinePoint]),
}

/// One scalar's wNAF digits paired with the table of its base point.
struct Stream<'a> {
    digits: [i8; WNAF_DIGITS],
    len: usize,
    table: OddMultiples<'a>,
}

impl<'a> Stream<'a> {
    fn new(k: &Scalar, w: usize, table: OddMultiples<'a>) -> Self {
        let (digits, len) = wnaf(k, w);
        Self { digits, len, table }
    }

    /// A stream contributing nothing.
    fn empty() -> Self {
        Self {
            digits: [0; WNAF_DIGITS],
            len: 0,
            table: OddMultiples::Jacobian([JacobianPoint::IDENTITY; TABLE_A_SIZE]),
        }
    }

    /// Adds `digit·P` to `acc`.
    fn apply(&self, acc: &JacobianPoint, digit: i8) -> JacobianPoint {
        let index = (digit.unsigned_abs() >> 1) as usize;
        match &self.table {
            OddMultiples::Jacobian(table) if digit > 0 => acc.add(&table[index]),
            OddMultiples::Jacobian(table) => acc.sub(&table[index]),
            OddMultiples::Affine(table) if digit > 0 => acc.add_mixed(&table[index]),
            OddMultiples::Affine(table) => acc.sub_mixed(&table[index]),
        }
    }
}

/// Builds the two streams for `k·A` using the endomorphism.
fn point_streams(a: &AffinePoint, k: &Scalar) -> [Stream<'static>; 2] {
    let (mut k1, mut k2) = k.decompose();
    let mut table = odd_multiples(&JacobianPoint::from(a));
    let mut table_lambda = table.map(|p| p.endomorphism());

    // keep both halves short and positive, negating the base points instead
    if bool::from(k1.is_high()) {
        k1 = -k1;
        table = table.map(|p| -p);
    }
    if bool::from(k2.is_high()) {
        k2 = -k2;
        table_lambda = table_lambda.map(|p| -p);
    }

    [
        Stream::new(&k1, WINDOW_A, OddMultiples::Jacobian(table)),
        Stream::new(&k2, WINDOW_A, OddMultiples::Jacobian(table_lambda)),
    ]
}

/// Builds the two streams for `k·G`, split at bit 128.
fn generator_streams(k: &Scalar) -> [Stream<'static>; 2] {
    let (lo, hi) = k.split_128();

    #[cfg(feature = "precomputed-tables")]
    let (g, g_128) = {
        let tables: &'static GeneratorTables = &GENERATOR_TABLES;
        (
            OddMultiples::Affine(&tables.g),
            OddMultiples::Affine(&tables.g_128),
        )
    };

    #[cfg(not(feature = "precomputed-tables"))]
    let (g, g_128) = (
        OddMultiples::Jacobian(odd_multiples(&JacobianPoint::GENERATOR)),
        OddMultiples::Jacobian(odd_multiples(&JacobianPoint::from(GENERATOR_128))),
    );

    [
        Stream::new(&lo, WINDOW_G, g),
        Stream::new(&hi, WINDOW_G, g_128),
    ]
}

/// Computes `na·a + ng·G`.
///
/// Not constant time; meant for verification, recovery and other
/// operations on public data.
pub fn lincomb(a: &AffinePoint, na: &Scalar, ng: &Scalar) -> JacobianPoint {
    let [a1, a2] = if bool::from(a.is_identity() | na.is_zero()) {
        [Stream::empty(), Stream::empty()]
    } else {
        point_streams(a, na)
    };
    let [g1, g2] = if bool::from(ng.is_zero()) {
        [Stream::empty(), Stream::empty()]
    } else {
        generator_streams(ng)
    };
    let streams = [a1, a2, g1, g2];

    let max_len = streams.iter().map(|s| s.len).max().unwrap_or(0);
    let mut acc = JacobianPoint::IDENTITY;
    for i in (0..max_len).rev() {
        acc = acc.double();
        for stream in &streams {
            let digit = stream.digits[i];
            if digit != 0 {
                acc = stream.apply(&acc, digit);
            }
        }
    }
    acc
}

/// Computes `k·G`.
pub fn mul_generator(k: &Scalar) -> JacobianPoint {
    lincomb(&AffinePoint::IDENTITY, &Scalar::ZERO, k)
}

/// Computes `k·a`.
pub fn mul(a: &AffinePoint, k: &Scalar) -> JacobianPoint {
    lincomb(a, k, &Scalar::ZERO)
}

/// Plain most-significant-bit-first double-and-add, kept as a reference
/// for the wNAF path.
pub fn double_and_add(p: &JacobianPoint, k: &Scalar) -> JacobianPoint {
    let mut acc = JacobianPoint::IDENTITY;
    for i in (0..256).rev() {
        acc = acc.double();
        if k.bits(i, 1) == 1 {
            acc = acc + *p;
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::{
        GENERATOR_128, WINDOW_A, WINDOW_G, double_and_add, lincomb, mul, mul_generator, wnaf,
    };
    use crate::arithmetic::{
        AffinePoint, JacobianPoint, Scalar,
        dev::{biguint_to_bytes, group_order},
    };
    use hex_literal::hex;
    use num_bigint::{BigInt, BigUint, Sign};
    use proptest::prelude::*;

    const LAMBDA: [u8; 32] =
        hex!("5363ad4cc05c30e0a5261c028812645a122e22ea20816678df02967c1b23bd72");

    fn scalar_from_biguint(x: &BigUint) -> Scalar {
        Scalar::from_bytes(&biguint_to_bytes(x)).unwrap()
    }

    fn check_wnaf(k: &Scalar, w: usize) {
        let (digits, len) = wnaf(k, w);
        let mut sum = BigInt::from(0);
        let mut last_nonzero: Option<usize> = None;
        for (i, &d) in digits.iter().enumerate() {
            if d == 0 {
                continue;
            }
            assert!(i < len);
            assert_eq!(d & 1, 1, "digits must be odd");
            assert!((d as i32).abs() < (1 << (w - 1)));
            if let Some(prev) = last_nonzero {
                assert!(i - prev >= w, "digits must be at least {w} apart");
            }
            last_nonzero = Some(i);
            sum += BigInt::from(d) << i;
        }
        assert_eq!(len, last_nonzero.map_or(0, |i| i + 1));
        assert_eq!(sum, BigInt::from_bytes_be(Sign::Plus, &k.to_bytes()));
    }

    fn special_scalars() -> [Scalar; 6] {
        let n = group_order();
        [
            Scalar::ZERO,
            Scalar::ONE,
            Scalar::from(2u64),
            -Scalar::ONE,
            scalar_from_biguint(&(BigUint::from(1u8) << 128u32)),
            scalar_from_biguint(&(n >> 1u32)),
        ]
    }

    #[test]
    fn wnaf_special_scalars() {
        for k in special_scalars() {
            check_wnaf(&k, WINDOW_A);
            check_wnaf(&k, WINDOW_G);
        }
        let (digits, len) = wnaf(&Scalar::ZERO, WINDOW_A);
        assert_eq!(len, 0);
        assert!(digits.iter().all(|&d| d == 0));
    }

    #[test]
    fn generator_128_constant() {
        let mut p = JacobianPoint::GENERATOR;
        for _ in 0..128 {
            p = p.double();
        }
        assert_eq!(p.to_affine(), GENERATOR_128);
    }

    #[test]
    fn generator_multiples() {
        assert_eq!(mul_generator(&Scalar::ONE), JacobianPoint::GENERATOR);
        assert_eq!(mul_generator(&Scalar::ZERO), JacobianPoint::IDENTITY);
        assert_eq!(
            mul_generator(&-Scalar::ONE).to_affine(),
            -AffinePoint::GENERATOR
        );
        assert_eq!(
            mul_generator(&Scalar::from(3u64)),
            JacobianPoint::GENERATOR.double() + JacobianPoint::GENERATOR
        );
    }

    #[test]
    fn special_scalars_match_reference() {
        let a = JacobianPoint::GENERATOR.double().double().to_affine();
        for k in special_scalars() {
            let expected = double_and_add(&JacobianPoint::from(a), &k);
            assert_eq!(mul(&a, &k), expected);
            assert_eq!(
                mul_generator(&k),
                double_and_add(&JacobianPoint::GENERATOR, &k)
            );
        }
        assert_eq!(mul(&AffinePoint::IDENTITY, &Scalar::ONE), JacobianPoint::IDENTITY);
    }

    #[test]
    fn lambda_is_the_endomorphism() {
        let lambda = Scalar::from_bytes(&LAMBDA).unwrap();
        let p = JacobianPoint::GENERATOR.double();
        assert_eq!(mul(&p.to_affine(), &lambda), p.endomorphism());
    }

    prop_compose! {
        fn scalar()(bytes in any::<[u8; 32]>()) -> Scalar {
            Scalar::from_bytes_reduced(&bytes)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn fuzzy_wnaf(k in scalar()) {
            check_wnaf(&k, WINDOW_A);
            check_wnaf(&k, WINDOW_G);
        }

        #[test]
        fn fuzzy_lincomb(na in scalar(), ng in scalar(), a_scalar in scalar()) {
            let a_scalar = if bool::from(a_scalar.is_zero()) { Scalar::ONE } else { a_scalar };
            let a = mul_generator(&a_scalar).to_affine();

            let expected = double_and_add(&JacobianPoint::from(a), &na)
                + double_and_add(&JacobianPoint::GENERATOR, &ng);
            prop_assert_eq!(lincomb(&a, &na, &ng), expected);

            // na·(k·G) + ng·G == (na·k + ng)·G
            prop_assert_eq!(lincomb(&a, &na, &ng), mul_generator(&(na * a_scalar + ng)));
        }
    }
}
