//! The field collaborator interface: addition, subtraction,
//! multiplication, squaring, inversion, halving, equality and
//! constant/variable-time selection. The core treats this as a black box —
//! concrete field arithmetic (Fp, Fp², Fr) lives entirely outside this crate.

use crate::bigint::BigInteger;
use std::fmt::Debug;

/// A field element the core can add, subtract, multiply and invert in the
/// course of curve-point arithmetic. This is consumed by the `Accum`/`Affine`
/// collaborators (`traits::curve`), never directly by the MSM drivers.
pub trait Field: Copy + Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    fn zero() -> Self;
    fn one() -> Self;
    fn set_zero(&mut self) {
        *self = Self::zero();
    }
    fn set_one(&mut self) {
        *self = Self::one();
    }
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
    fn is_one(&self) -> bool {
        *self == Self::one()
    }

    #[must_use]
    fn add(&self, other: &Self) -> Self;
    #[must_use]
    fn sub(&self, other: &Self) -> Self;
    #[must_use]
    fn neg(&self) -> Self;
    #[must_use]
    fn mul(&self, other: &Self) -> Self;
    #[must_use]
    fn square(&self) -> Self {
        self.mul(self)
    }
    #[must_use]
    fn double(&self) -> Self {
        self.add(self)
    }
    /// Halves the element: returns `x` such that `x + x == self`. Requires
    /// the field's characteristic to be odd (true of every prime field the
    /// core is instantiated over).
    #[must_use]
    fn halve(&self) -> Self;

    /// Variable-time inversion. Returns `None` iff `self.is_zero()`.
    fn inverse_vartime(&self) -> Option<Self>;

    /// Branchless (from the caller's point of view) select between `a` and
    /// `b`. The core itself never calls this on the scalar-dependent path —
    /// the MSM is explicitly variable time — but it is part of the
    /// collaborator interface so curves that need it elsewhere (e.g.
    /// subgroup checks) can share the same `Field` impl.
    fn conditional_select(a: &Self, b: &Self, choose_b: bool) -> Self {
        if choose_b {
            *b
        } else {
            *a
        }
    }
}

/// Per-field constants: modulus bit length.
pub trait FpParameters: Send + Sync + 'static {
    const MODULUS_BITS: u32;
}

/// A field presenting a canonical `BigInteger` repr, consumed by the
/// signed-digit window recoder.
pub trait PrimeField: Field {
    type BigInt: BigInteger;
    type Params: FpParameters;

    fn into_repr(&self) -> Self::BigInt;
    fn from_repr(repr: Self::BigInt) -> Self;

    fn size_in_bits() -> usize {
        Self::Params::MODULUS_BITS as usize
    }
}
