//! The endomorphism collaborator. Optional
//! per curve: curves with an efficient endomorphism φ expose this trait so
//! `endomorphism::apply` can split each scalar multiplication into
//! `DIMENSION` shorter ones.

use crate::traits::curve::AffineCurve;
use crate::traits::field::PrimeField;

/// `G`'s endomorphism parameters. `DIMENSION` is `M` in the notation
/// (2 on Fp curves with a cube-root-of-unity endomorphism, 4 on Fp² twists
/// using Frobenius ψ).
pub trait EndomorphismParameters<G: AffineCurve>: Send + Sync + 'static {
    /// `M`: the number of mini-scalars a scalar is split into.
    const DIMENSION: usize;

    /// Below this many bits the endomorphism pre-pass is not worth its own
    /// overhead.
    const THRESHOLD_BITS: usize;

    /// Mini-scalar bit width `L = ceil(bits / M) + 1`.
    fn mini_scalar_bits(total_bits: usize) -> usize {
        (total_bits + Self::DIMENSION - 1) / Self::DIMENSION + 1
    }

    /// Splits `scalar` into `DIMENSION` signed mini-scalars
    /// `a_0, ..., a_{M-1}` with `scalar ≡ Σ a_m · λ^m (mod order)`, returned
    /// as (magnitude, is_negative) pairs, magnitude given as a `BigInt` of
    /// width `mini_scalar_bits`.
    fn decompose(
        scalar: &<G::ScalarField as PrimeField>::BigInt,
    ) -> Vec<(<G::ScalarField as PrimeField>::BigInt, bool)>;

    /// Applies `φ^m` to `point`, `m` in `[1, DIMENSION)`. `m = 0` is the
    /// identity map and is never called through this method.
    fn apply_endomorphism(point: &G, m: usize) -> G;
}
