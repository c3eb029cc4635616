//! Serial bucket-method driver.
//!
//! Wires the recoder, bucket store, and scheduler together into the
//! single-threaded variant of `multi_scalar_mul_affine`: recode every
//! scalar into signed digits, accumulate each window's digits into a
//! bucket store via the scheduler (which uses the batch-affine adder
//! internally), reduce each window's buckets with the running
//! weighted-sum technique, then combine windows top-down with one group
//! of doublings per window — the same "bucket of points per window, one
//! weighted reduction, one final top-down combine" shape
//! `multi_scalar_mul_affine`'s own per-window loop uses, generalised to
//! streaming buckets and arbitrary (not just power-of-two-bounded)
//! window counts.

use crate::bucket::BucketStore;
use crate::recoding::{recode_scalar, window_count, Digit};
use crate::scheduler::{Scheduler, ScheduledPoint};
use crate::traits::curve::{AffineCurve, ProjectiveCurve};
use crate::traits::field::PrimeField;
use crate::window::choose_window_size;

/// `Σ scalars[i] * points[i]`, window size chosen automatically. Panics if `points.len() != scalars.len()`.
pub fn msm_vartime<G: AffineCurve>(
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
) -> G::Projective {
    assert_eq!(points.len(), scalars.len(), "points and scalars must have equal length");
    if points.is_empty() {
        return G::Projective::identity();
    }
    let bits = G::ScalarField::size_in_bits();
    let c = choose_window_size(bits, points.len());
    msm_vartime_with_window(points, scalars, c)
}

/// As [`msm_vartime`], with an explicit window size. Exposed so the
/// parallel driver (which partitions work before picking `c` once for
/// the whole job) and tests can pin it rather than rediscover it.
pub fn msm_vartime_with_window<G: AffineCurve>(
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
    c: usize,
) -> G::Projective {
    msm_vartime_with_bits(points, scalars, G::ScalarField::size_in_bits(), c)
}

/// As [`msm_vartime_with_window`], with an explicit scalar bit width too.
/// The endomorphism adapter uses this directly: after decomposition
/// every mini-scalar is only `L = mini_scalar_bits(bits)` bits wide, far
/// narrower than the curve's native scalar field, and recoding the full
/// field width on those would waste a pass over `bits/L` extra all-zero
/// windows per mini-scalar.
pub fn msm_vartime_with_bits<G: AffineCurve>(
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
    bits: usize,
    c: usize,
) -> G::Projective {
    assert_eq!(points.len(), scalars.len(), "points and scalars must have equal length");
    if points.is_empty() {
        return G::Projective::identity();
    }
    let num_windows = window_count(bits, c);
    let digits: Vec<Vec<Digit>> = scalars.iter().map(|s| recode_scalar(s, bits, c)).collect();

    // The carry out of the top nominal window is a single always-positive unit digit one bit above
    // it; treated as its own one-bucket "window" so it flows through
    // the same scheduler/batch-affine path as every other window.
    let mut total = accumulate_digit_window(points, 1, |i| i64::from(digits[i].len() > num_windows));

    for w in (0..num_windows).rev() {
        let width = window_width(bits, c, num_windows, w);
        for _ in 0..width {
            total.double_in_place();
        }
        let num_buckets = 1usize << (width - 1);
        let window_sum = accumulate_digit_window(points, num_buckets, |i| digits[i][w].digit);
        total.add_assign_vartime(&window_sum);
    }
    total
}

/// Width of window `w`, matching the width `recode_scalar` actually used
/// for it: the bottom window (`w == 0`) always recodes at the full `c`
/// bits, even when it is also the last window (`num_windows == 1`, i.e.
/// `c >= bits`); only a genuine interior-to-top window narrows to the
/// scalar's remaining bits.
pub(crate) fn window_width(bits: usize, c: usize, num_windows: usize, w: usize) -> usize {
    if w == 0 {
        c
    } else if w + 1 == num_windows {
        bits - w * c
    } else {
        c
    }
}

/// Schedules every point whose `digit_at(i)` is nonzero into a
/// freshly-allocated bucket store of `num_buckets` buckets, then reduces
/// it with the running weighted-sum technique: `Σ_{m=1}^{B} m *
/// Bucket[m]`, computed as a single top-down pass carrying a running
/// partial sum (`T`) into a running total (`S`), needing no per-bucket
/// scalar multiplication.
pub(crate) fn accumulate_digit_window<G: AffineCurve>(
    points: &[G],
    num_buckets: usize,
    digit_at: impl Fn(usize) -> i64,
) -> G::Projective {
    let mut store: BucketStore<G> = BucketStore::new(num_buckets);
    let width = num_buckets.trailing_zeros() as usize + 1;
    let mut scheduler = Scheduler::new(points, &mut store, 0, num_buckets, width);

    for i in 0..points.len() {
        let d = digit_at(i);
        let sp = if d == 0 {
            ScheduledPoint { bucket_index: None, sign: false, point_index: i }
        } else {
            ScheduledPoint {
                bucket_index: Some(d.unsigned_abs() as usize - 1),
                sign: d < 0,
                point_index: i,
            }
        };
        scheduler.prefetch(&sp);
        scheduler.schedule(sp);
    }
    scheduler.flush();

    let mut running = G::Projective::identity();
    let mut total = G::Projective::identity();
    for idx in (0..num_buckets).rev() {
        running.add_assign_vartime(&store.value(idx));
        total.add_assign_vartime(&running);
    }
    total
}
