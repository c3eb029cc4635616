//! A multi-scalar multiplication engine: bucket-method (Pippenger/BDLO12)
//! MSM with batch-affine bucket accumulation, an optional parallel driver,
//! and an endomorphism (GLV) pre-pass.
//!
//! The core is generic over the collaborator traits in [`traits`] (field,
//! curve, endomorphism and thread-pool contracts) and implements none of
//! their arithmetic itself — a caller's concrete field/curve types plug in
//! by implementing [`traits::field::PrimeField`] and
//! [`traits::curve::AffineCurve`]. The three entry points are
//! [`msm_vartime`] (serial), [`msm_vartime_parallel`] (feature
//! `parallel`) and [`msm_vartime_endo`] (GLV-accelerated, generic over
//! both entry points above via the `bits` threshold in
//! [`traits::endo::EndomorphismParameters`]).

pub mod batch_affine;
pub mod bigint;
pub mod bucket;
pub mod endomorphism;
pub mod prefetch;
pub mod recoding;
pub mod scheduler;
pub mod serial;
pub mod traits;
pub mod window;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod test_util;

pub use bigint::{BigInteger, BigInteger384};
pub use endomorphism::msm_vartime_endo;
pub use serial::msm_vartime;
pub use traits::curve::{AffineCurve, ProjectiveCurve};
pub use traits::endo::EndomorphismParameters;
pub use traits::field::{Field, FpParameters, PrimeField};
pub use traits::pool::ThreadPool;

#[cfg(feature = "parallel")]
pub use parallel::msm_vartime_parallel;
