//! The external collaborator interfaces the core is generic over: field
//! arithmetic, curve points, endomorphisms and a thread pool. None of these
//! modules implement any field or curve arithmetic themselves.

pub mod curve;
pub mod endo;
pub mod field;
pub mod pool;

pub use curve::{AffineCurve, ProjectiveCurve};
pub use endo::EndomorphismParameters;
pub use field::{Field, FpParameters, PrimeField};
pub use pool::ThreadPool;
