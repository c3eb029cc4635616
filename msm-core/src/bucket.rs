//! Bucket store.
//!
//! `2^{c-1}` buckets, each logically holding an optional affine partial
//! sum and an optional accumulator partial sum. Laid out as struct-of-
//! arrays (`status`, `aff`, `acc`) rather than an array of tagged enums,
//! so a reduction pass that only touches `status` and `acc` (the common
//! case once the affine scheduler has drained) scans two small, densely
//! packed arrays instead of striding over padding from the unused
//! variant of a big enum — the same locality argument that favours flat,
//! struct-of-arrays field/curve representations over tagged unions, here
//! applied to bulk bucket storage instead of a single value.

use crate::traits::curve::{AffineCurve, ProjectiveCurve};

/// Which of a bucket's two optional summands are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status(u8);

impl Status {
    pub const EMPTY: Status = Status(0);
    pub const HAS_AFFINE: Status = Status(1 << 0);
    pub const HAS_ACCUM: Status = Status(1 << 1);

    #[inline]
    pub fn contains(self, flag: Status) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline]
    pub fn insert(&mut self, flag: Status) {
        self.0 |= flag.0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// `2^{c-1}` buckets, struct-of-arrays: `status[i]` describes which of
/// `aff[i]` / `acc[i]` are meaningful.
pub struct BucketStore<G: AffineCurve> {
    status: Vec<Status>,
    aff: Vec<G>,
    acc: Vec<G::Projective>,
}

impl<G: AffineCurve> BucketStore<G> {
    /// Allocates `num_buckets = 2^{c-1}` zero-initialised buckets.
    pub fn new(num_buckets: usize) -> Self {
        BucketStore {
            status: vec![Status::EMPTY; num_buckets],
            aff: vec![G::identity(); num_buckets],
            acc: vec![G::Projective::identity(); num_buckets],
        }
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    #[inline]
    pub fn status(&self, i: usize) -> Status {
        self.status[i]
    }

    #[inline]
    pub fn affine(&self, i: usize) -> &G {
        &self.aff[i]
    }

    #[inline]
    pub fn accum(&self, i: usize) -> &G::Projective {
        &self.acc[i]
    }

    /// Writes the affine slot directly (the "empty bucket, first touch"
    /// case of the scheduler's steady-state step).
    #[inline]
    pub fn set_affine(&mut self, i: usize, point: G) {
        self.aff[i] = point;
        self.status[i].insert(Status::HAS_AFFINE);
    }

    /// Folds `point` (already sign-adjusted by the caller) into the
    /// bucket's accum slot — the scheduler-overflow / flush fallback
    /// path.
    pub fn fold_into_accum(&mut self, i: usize, point: &G) {
        if self.status[i].contains(Status::HAS_ACCUM) {
            self.acc[i].madd_assign_vartime(point);
        } else {
            self.acc[i] = point.into_projective();
            self.status[i].insert(Status::HAS_ACCUM);
        }
    }

    /// Combines a bucket's affine and accum slots into one value,
    /// returning the additive identity if both are empty (
    /// invariant: "the logical value of bucket i is `(aff if HAS_AFFINE
    /// else 0) + (acc if HAS_ACCUM else 0)`").
    pub fn value(&self, i: usize) -> G::Projective {
        let status = self.status[i];
        match (status.contains(Status::HAS_AFFINE), status.contains(Status::HAS_ACCUM)) {
            (false, false) => G::Projective::identity(),
            (true, false) => self.aff[i].into_projective(),
            (false, true) => self.acc[i],
            (true, true) => self.acc[i].madd_vartime(&self.aff[i]),
        }
    }

    /// Clears bucket `i` back to `EMPTY`, ready for the next window.
    #[inline]
    pub fn reset(&mut self, i: usize) {
        self.status[i] = Status::EMPTY;
    }

    /// Clears every bucket (used between windows when the store itself
    /// is reused rather than reallocated).
    pub fn reset_all(&mut self) {
        for s in &mut self.status {
            *s = Status::EMPTY;
        }
    }
}
