//! Endomorphism adapter.
//!
//! Splits each scalar multiplication `a_i * P_i` into `M` shorter ones
//! using a curve's efficient endomorphism `φ` (eigenvalue `λ` on the
//! scalar subgroup): `a_i ≡ Σ_m a_{i,m} · λ^m (mod order)`, each
//! `a_{i,m}` only `L = ⌈bits/M⌉ + 1` bits wide. The expanded `M·N`
//! (point, scalar) pairs are handed to the same serial driver
//! serial.rs already exposes, at the narrower bit width. No bucket-method MSM
//! implementation in this lineage bundles a GLV pre-pass directly into its
//! variable-base entry point (that support typically lives in the curve
//! crates instead), so this module is built directly from the generic
//! split/sign-absorption contract rather than generalised from an existing
//! pre-pass implementation.

use crate::serial::msm_vartime_with_bits;
use crate::traits::curve::AffineCurve;
use crate::traits::endo::EndomorphismParameters;
use crate::traits::field::PrimeField;
use crate::window::choose_window_size;

/// `Σ scalars[i] * points[i]`, pre-splitting every term via `E`'s
/// endomorphism when the scalar field is wide enough to be worth it,
/// falling straight through to the ungated driver otherwise.
pub fn msm_vartime_endo<G, E>(
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
) -> G::Projective
where
    G: AffineCurve,
    E: EndomorphismParameters<G>,
{
    assert_eq!(points.len(), scalars.len(), "points and scalars must have equal length");
    if points.is_empty() {
        return G::Projective::identity();
    }
    let bits = G::ScalarField::size_in_bits();
    if bits < E::THRESHOLD_BITS {
        return crate::serial::msm_vartime(points, scalars);
    }

    let (expanded_points, expanded_scalars) = expand::<G, E>(points, scalars);
    let mini_bits = E::mini_scalar_bits(bits);
    let c = choose_window_size(mini_bits, expanded_points.len());
    msm_vartime_with_bits(&expanded_points, &expanded_scalars, mini_bits, c)
}

/// Turns `N` (point, scalar) pairs into `M·N` pairs, one per mini-scalar,
/// with signs absorbed into the point.
fn expand<G, E>(
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
) -> (Vec<G>, Vec<<G::ScalarField as PrimeField>::BigInt>)
where
    G: AffineCurve,
    E: EndomorphismParameters<G>,
{
    let mut expanded_points = Vec::with_capacity(points.len() * E::DIMENSION);
    let mut expanded_scalars = Vec::with_capacity(points.len() * E::DIMENSION);

    for (p, s) in points.iter().zip(scalars) {
        let minis = E::decompose(s);
        debug_assert_eq!(minis.len(), E::DIMENSION);
        for (m, (magnitude, is_negative)) in minis.into_iter().enumerate() {
            let base = if m == 0 { *p } else { E::apply_endomorphism(p, m) };
            expanded_points.push(if is_negative { base.neg() } else { base });
            expanded_scalars.push(magnitude);
        }
    }
    (expanded_points, expanded_scalars)
}
