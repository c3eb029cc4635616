//! The point collaborator interface. `AffineCurve` is the
//! immutable input representation; `ProjectiveCurve` is the accumulator
//! representation — one concrete coordinate system (Jacobian, projective,
//! or extended-Jacobian) fixed at compile time per instantiation.
//! Generic/double/add formulas themselves are out of scope for the core —
//! this module only states the contract.

use crate::traits::field::{Field, PrimeField};
use std::fmt::Debug;

/// An immutable affine input point, never mutated by the core.
pub trait AffineCurve: Copy + Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    type BaseField: Field;
    type ScalarField: PrimeField;
    type Projective: ProjectiveCurve<
        Affine = Self,
        BaseField = Self::BaseField,
        ScalarField = Self::ScalarField,
    >;

    /// The distinguished identity representation.
    fn identity() -> Self;
    fn is_identity(&self) -> bool;

    fn x(&self) -> Self::BaseField;
    fn y(&self) -> Self::BaseField;
    /// Builds a point from coordinates already known to lie on the curve;
    /// the core never validates curve membership (out of scope here).
    fn from_xy_unchecked(x: Self::BaseField, y: Self::BaseField) -> Self;

    fn neg(&self) -> Self;
    fn into_projective(&self) -> Self::Projective;
}

/// The mutable accumulator representation: supports `set_identity`,
/// `double`, variable-time addition with an affine or another accumulator
/// point, and negation.
pub trait ProjectiveCurve: Copy + Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    type BaseField: Field;
    type ScalarField: PrimeField;
    type Affine: AffineCurve<
        Projective = Self,
        BaseField = Self::BaseField,
        ScalarField = Self::ScalarField,
    >;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn set_identity(&mut self) {
        *self = Self::identity();
    }

    fn double_in_place(&mut self);
    #[must_use]
    fn double(&self) -> Self {
        let mut out = *self;
        out.double_in_place();
        out
    }

    fn add_assign_vartime(&mut self, other: &Self);
    #[must_use]
    fn add_vartime(&self, other: &Self) -> Self {
        let mut out = *self;
        out.add_assign_vartime(other);
        out
    }

    fn sub_assign_vartime(&mut self, other: &Self) {
        self.add_assign_vartime(&other.neg());
    }
    #[must_use]
    fn sub_vartime(&self, other: &Self) -> Self {
        let mut out = *self;
        out.sub_assign_vartime(other);
        out
    }

    /// Mixed addition: `self` (accumulator coordinates) with `other` (affine
    /// coordinates). This is the workhorse of the scheduler's bucket
    /// accumulation overflow handling.
    fn madd_assign_vartime(&mut self, other: &Self::Affine);
    #[must_use]
    fn madd_vartime(&self, other: &Self::Affine) -> Self {
        let mut out = *self;
        out.madd_assign_vartime(other);
        out
    }

    fn msub_assign_vartime(&mut self, other: &Self::Affine) {
        self.madd_assign_vartime(&other.neg());
    }
    #[must_use]
    fn msub_vartime(&self, other: &Self::Affine) -> Self {
        let mut out = *self;
        out.msub_assign_vartime(other);
        out
    }

    fn neg(&self) -> Self;

    fn to_affine(&self) -> Self::Affine;

    /// Converts many accumulator points to affine at once. Implementations
    /// are expected (though not required) to share a single field inversion
    /// across the batch via Montgomery's trick, the same technique the
    /// batch-affine adder uses internally for bucket updates.
    fn batch_to_affine(points: &[Self]) -> Vec<Self::Affine> {
        points.iter().map(Self::to_affine).collect()
    }
}
