//! Batch-affine adder.
//!
//! Turns K independent bucket updates into one field inversion via
//! Montgomery's trick: a chord/tangent slope `λ = λ_num / λ_den` is
//! needed per regular-case update, but only the product of all `λ_den`
//! needs inverting — each individual inverse is recovered by walking the
//! prefix-product chain backwards. Identity, point-equals-bucket, and
//! point-equals-negated-bucket are handled as direct special cases rather
//! than through the slope formula, matching the "zero bucket" / is-identity
//! separation a `VariableBaseMSM::batch_addition`-style benchmark applies
//! to `AffineCurve::add_points` against the same kind of
//! many-independent-additions workload this module amortises by hand.

use crate::bucket::{BucketStore, Status};
use crate::traits::curve::AffineCurve;
use crate::traits::field::Field;

/// One scheduled bucket update: add (or subtract, if `sign`) `source`
/// into `buckets[bucket_index]`'s affine slot.
#[derive(Debug, Clone, Copy)]
pub struct Update<G: AffineCurve> {
    pub bucket_index: usize,
    pub sign: bool,
    pub source: G,
}

enum Case<F> {
    LhsEmpty,
    RhsEmpty,
    Opposite,
    /// `lambda_den` starts as the slope denominator and is overwritten
    /// in place with its inverse once the shared inversion completes.
    Regular { lambda_num: F, lambda_den: F },
}

/// Applies `updates` to `store`'s affine slots with a single shared field
/// inversion. `updates` must target pairwise-distinct bucket indices
/// — this is a precondition, not
/// checked, since violating it only shadows an earlier write rather than
/// causing unsafety.
pub fn batch_affine_add<G: AffineCurve>(store: &mut BucketStore<G>, updates: &[Update<G>]) {
    if updates.is_empty() {
        return;
    }
    let cases = classify_and_invert(store, updates);
    apply(store, updates, &cases);
}

/// Step 1 (classify each update, computing chord/tangent slopes for the
/// regular case) fused with steps 2-4 (Montgomery prefix products, one
/// inversion, backward peel) of the batch-affine algorithm.
fn classify_and_invert<G: AffineCurve>(
    store: &BucketStore<G>,
    updates: &[Update<G>],
) -> Vec<Case<G::BaseField>> {
    let mut cases = Vec::with_capacity(updates.len());
    let mut running = G::BaseField::one();
    let mut prefixes: Vec<G::BaseField> = Vec::new();

    for u in updates {
        let status = store.status(u.bucket_index);
        let lhs_is_empty =
            !status.contains(Status::HAS_AFFINE) || store.affine(u.bucket_index).is_identity();
        if lhs_is_empty {
            cases.push(Case::LhsEmpty);
            continue;
        }
        if u.source.is_identity() {
            cases.push(Case::RhsEmpty);
            continue;
        }

        let p = *store.affine(u.bucket_index);
        let qx = u.source.x();
        let qy = if u.sign { u.source.y().neg() } else { u.source.y() };

        let (lambda_num, lambda_den) = if p.x() == qx {
            if p.y() == qy {
                // Tangent: lambda = 3x^2 / 2y (curves with a = 0, the
                // dbl-2009-l family this crate's point formulas use).
                (p.x().square().double().add(&p.x().square()), p.y().double())
            } else {
                cases.push(Case::Opposite);
                continue;
            }
        } else {
            (qy.sub(&p.y()), qx.sub(&p.x()))
        };

        running = running.mul(&lambda_den);
        prefixes.push(running);
        cases.push(Case::Regular { lambda_num, lambda_den });
    }

    if prefixes.is_empty() {
        return cases;
    }

    let mut inv = prefixes
        .last()
        .unwrap()
        .inverse_vartime()
        .expect("batch-affine prefix product of nonzero slopes must be invertible");

    let mut prefix_idx = prefixes.len();
    for case in cases.iter_mut().rev() {
        if let Case::Regular { lambda_den, .. } = case {
            prefix_idx -= 1;
            let individual_inv = if prefix_idx == 0 { inv } else { inv.mul(&prefixes[prefix_idx - 1]) };
            inv = inv.mul(lambda_den);
            *lambda_den = individual_inv;
        }
    }
    cases
}

fn apply<G: AffineCurve>(store: &mut BucketStore<G>, updates: &[Update<G>], cases: &[Case<G::BaseField>]) {
    for (u, case) in updates.iter().zip(cases) {
        match case {
            Case::LhsEmpty => {
                let src = if u.sign { u.source.neg() } else { u.source };
                store.set_affine(u.bucket_index, src);
            }
            Case::RhsEmpty => {}
            Case::Opposite => {
                store.reset(u.bucket_index);
            }
            Case::Regular { lambda_num, lambda_den } => {
                // `lambda_den` now holds 1/lambda_den.
                let lambda = lambda_num.mul(lambda_den);
                let p = *store.affine(u.bucket_index);
                let qx = u.source.x();
                let rx = lambda.square().sub(&p.x()).sub(&qx);
                let ry = lambda.mul(&p.x().sub(&rx)).sub(&p.y());
                store.set_affine(u.bucket_index, G::from_xy_unchecked(rx, ry));
            }
        }
    }
}
