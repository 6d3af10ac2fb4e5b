//! A pure-Rust implementation of group operations on secp256k1.
//!
//! The field is `p = 2^256 - 2^32 - 977`, the group order is
//! `n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141`
//! and the curve equation is `y² = x³ + 7`.

pub(crate) mod affine;
pub(crate) mod field;
pub(crate) mod jacobian;
pub mod mul;
pub(crate) mod scalar;
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod dev;

pub use self::{
    affine::AffinePoint,
    field::FieldElement,
    jacobian::JacobianPoint,
    mul::{lincomb, mul_generator},
    scalar::Scalar,
};

const CURVE_EQUATION_B_SINGLE: u32 = 7u32;

/// `b` coefficient of the curve equation.
pub(crate) const CURVE_EQUATION_B: FieldElement =
    FieldElement::from_u64(CURVE_EQUATION_B_SINGLE as u64);
