//! Debug wrapper which tracks the magnitude and normalization of field
//! elements and asserts that every operation stays within its limits.

use super::field_5x52::FieldElement5x52 as FieldElementUnsafeImpl;
use crate::FieldBytes;
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

#[derive(Clone, Copy, Debug)]
pub struct FieldElementImpl {
    value: FieldElementUnsafeImpl,
    magnitude: u32,
    normalized: bool,
}

impl FieldElementImpl {
    pub const ZERO: Self = Self::new_normalized(&FieldElementUnsafeImpl::ZERO);

    pub const ONE: Self = Self::new_normalized(&FieldElementUnsafeImpl::ONE);

    const fn new_normalized(value: &FieldElementUnsafeImpl) -> Self {
        Self {
            value: *value,
            magnitude: 1,
            normalized: true,
        }
    }

    const fn new_weak_normalized(value: &FieldElementUnsafeImpl) -> Self {
        Self {
            value: *value,
            magnitude: 1,
            normalized: false,
        }
    }

    fn new(value: &FieldElementUnsafeImpl, magnitude: u32) -> Self {
        debug_assert!(magnitude <= FieldElementUnsafeImpl::max_magnitude());
        Self {
            value: *value,
            magnitude,
            normalized: false,
        }
    }

    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self::new_normalized(&FieldElementUnsafeImpl::from_bytes_unchecked(bytes))
    }

    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        FieldElementUnsafeImpl::from_bytes(bytes).map(|x| Self::new_normalized(&x))
    }

    pub const fn from_u64(val: u64) -> Self {
        Self::new_normalized(&FieldElementUnsafeImpl::from_u64(val))
    }

    pub fn to_bytes(self) -> FieldBytes {
        debug_assert!(self.normalized);
        self.value.to_bytes()
    }

    pub fn normalize_weak(&self) -> Self {
        Self::new_weak_normalized(&self.value.normalize_weak())
    }

    pub fn normalize(&self) -> Self {
        Self::new_normalized(&self.value.normalize())
    }

    pub fn normalizes_to_zero(&self) -> Choice {
        self.value.normalizes_to_zero()
    }

    pub fn is_zero(&self) -> Choice {
        debug_assert!(self.normalized);
        self.value.is_zero()
    }

    pub fn is_odd(&self) -> Choice {
        debug_assert!(self.normalized);
        self.value.is_odd()
    }

    pub fn negate(&self, magnitude: u32) -> Self {
        debug_assert!(self.magnitude <= magnitude);
        Self::new(&self.value.negate(magnitude), magnitude + 1)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self::new(&self.value.add(&rhs.value), self.magnitude + rhs.magnitude)
    }

    pub fn mul_single(&self, rhs: u32) -> Self {
        Self::new(&self.value.mul_single(rhs), self.magnitude * rhs)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        debug_assert!(self.magnitude <= 8);
        debug_assert!(rhs.magnitude <= 8);
        Self::new_weak_normalized(&self.value.mul(&rhs.value))
    }

    pub fn square(&self) -> Self {
        debug_assert!(self.magnitude <= 8);
        Self::new_weak_normalized(&self.value.square())
    }
}

impl Default for FieldElementImpl {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElementImpl {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        // bookkeeping only exists in debug builds, branching on it leaks nothing
        let (magnitude, normalized) = if bool::from(choice) {
            (b.magnitude, b.normalized)
        } else {
            (a.magnitude, a.normalized)
        };
        Self {
            value: FieldElementUnsafeImpl::conditional_select(&a.value, &b.value, choice),
            magnitude,
            normalized,
        }
    }
}

impl ConstantTimeEq for FieldElementImpl {
    fn ct_eq(&self, other: &Self) -> Choice {
        debug_assert!(self.normalized && other.normalized);
        self.value.ct_eq(&other.value)
    }
}

impl Zeroize for FieldElementImpl {
    fn zeroize(&mut self) {
        self.value.zeroize();
    }
}
