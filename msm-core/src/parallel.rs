//! Parallel MSM driver, `feature = "parallel"`.
//!
//! Three axes, composed top-down:
//!
//! - **Window parallelism**: every window's accumulation + reduction is
//!   independent, so all `num_windows + 1` window sums (the `+ 1` is the
//!   synthetic carry window from serial.rs) are computed with a single
//!   `into_par_iter().map(...)`, matching the way
//!   `multi_scalar_mul_affine`/`msm_inner` parallelise across
//!   `window_starts` and then fold the per-window sums sequentially
//!   high-to-low with doublings between (grounded directly on that fold,
//!   reused verbatim in spirit in [`combine_windows`]).
//! - **Bucket-range parallelism**: within one window, once the bucket
//!   count exceeds [`BUCKET_SHARD_THRESHOLD`], the range is split into
//!   `rayon::current_num_threads()` contiguous shards, each accumulated
//!   by its own scheduler into its own small bucket store (no shared
//!   mutable state, so no locking), then the flattened per-bucket values
//!   are reduced sequentially exactly as in the single-shard case — this
//!   axis has no direct ancestor to generalise from, so it is built
//!   straight from the sharding contract instead.
//! - **MSM-split parallelism**: when the window count under-saturates
//!   the pool, the input is chunked instead, each chunk's full MSM is
//!   run as an owned, `'static` task via the injected [`ThreadPool`]
//!   (the one axis that goes through the trait rather than straight
//!   through rayon, per `traits::pool`'s own doc comment), and the
//!   partial results are summed.

use rayon::prelude::*;

use crate::bucket::BucketStore;
use crate::recoding::{recode_scalar, window_count, Digit};
use crate::scheduler::{Scheduler, ScheduledPoint};
use crate::serial::{self, window_width};
use crate::traits::curve::{AffineCurve, ProjectiveCurve};
use crate::traits::field::PrimeField;
use crate::traits::pool::ThreadPool;
use crate::window::choose_window_size;

/// Below this many points, spinning up any parallelism costs more than it
/// saves.
const MSM_SPLIT_FALLTHROUGH: usize = 16;

/// Above this many buckets in a single window, shard the bucket range
/// across threads instead of running one scheduler over the whole range.
const BUCKET_SHARD_THRESHOLD: usize = 4096;

/// `Σ scalars[i] * points[i]`, computed with window, bucket-range, and
/// MSM-split parallelism as each becomes profitable.
/// Agrees with [`crate::serial::msm_vartime`] on every input.
pub fn msm_vartime_parallel<G, P>(
    pool: &P,
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
) -> G::Projective
where
    G: AffineCurve,
    P: ThreadPool,
{
    assert_eq!(points.len(), scalars.len(), "points and scalars must have equal length");
    if points.len() < MSM_SPLIT_FALLTHROUGH {
        return serial::msm_vartime(points, scalars);
    }

    let bits = G::ScalarField::size_in_bits();
    let c = choose_window_size(bits, points.len());
    let num_windows = window_count(bits, c);

    if num_windows < pool.num_threads() {
        msm_split(pool, points, scalars)
    } else {
        msm_window_parallel(points, scalars, bits, c, num_windows)
    }
}

/// MSM-split axis: balanced chunks, each a fully independent owned task.
fn msm_split<G, P>(
    pool: &P,
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
) -> G::Projective
where
    G: AffineCurve,
    P: ThreadPool,
{
    let chunks = pool.num_threads().max(1);
    let chunk_size = ((points.len() + chunks - 1) / chunks).max(1);

    let handles: Vec<_> = points
        .chunks(chunk_size)
        .zip(scalars.chunks(chunk_size))
        .map(|(p_chunk, s_chunk)| {
            let p_owned = p_chunk.to_vec();
            let s_owned = s_chunk.to_vec();
            pool.spawn_awaitable(move || serial::msm_vartime(&p_owned, &s_owned))
        })
        .collect();

    let mut total = G::Projective::identity();
    for h in handles {
        total.add_assign_vartime(&h.sync());
    }
    total
}

/// Window + bucket-range parallelism, single pass over the whole input
/// (the `msm_inner`/`multi_scalar_mul_affine` shape).
fn msm_window_parallel<G: AffineCurve>(
    points: &[G],
    scalars: &[<G::ScalarField as PrimeField>::BigInt],
    bits: usize,
    c: usize,
    num_windows: usize,
) -> G::Projective {
    let digits: Vec<Vec<Digit>> = scalars.par_iter().map(|s| recode_scalar(s, bits, c)).collect();

    // Window index `num_windows` is the synthetic single-bucket carry
    // window serial.rs introduces for the top-window overflow digit.
    let window_sums: Vec<G::Projective> = (0..=num_windows)
        .into_par_iter()
        .map(|w| {
            if w == num_windows {
                accumulate_sharded(points, 1, |i| i64::from(digits[i].len() > num_windows))
            } else {
                let width = window_width(bits, c, num_windows, w);
                let num_buckets = 1usize << (width - 1);
                accumulate_sharded(points, num_buckets, |i| digits[i][w].digit)
            }
        })
        .collect();

    combine_windows(bits, c, num_windows, &window_sums)
}

/// Top-down fold of the per-window sums with `width` doublings between
/// each, the same shape as `window_sums[1..].iter().rev().fold(...)`.
fn combine_windows<Proj: ProjectiveCurve>(
    bits: usize,
    c: usize,
    num_windows: usize,
    window_sums: &[Proj],
) -> Proj {
    let mut total = window_sums[num_windows];
    for w in (0..num_windows).rev() {
        let width = window_width(bits, c, num_windows, w);
        for _ in 0..width {
            total.double_in_place();
        }
        total.add_assign_vartime(&window_sums[w]);
    }
    total
}

/// One window's bucket accumulation, sharded across the bucket range
/// once it is large enough to be worth it.
fn accumulate_sharded<G: AffineCurve>(
    points: &[G],
    num_buckets: usize,
    digit_at: impl Fn(usize) -> i64 + Sync,
) -> G::Projective {
    if num_buckets <= BUCKET_SHARD_THRESHOLD {
        return serial::accumulate_digit_window(points, num_buckets, digit_at);
    }

    let shard_count = rayon::current_num_threads().max(1);
    let shard_size = ((num_buckets + shard_count - 1) / shard_count).max(1);
    let starts: Vec<usize> = (0..num_buckets).step_by(shard_size).collect();

    let shard_values: Vec<Vec<G::Projective>> = starts
        .into_par_iter()
        .map(|lo| {
            let hi = (lo + shard_size).min(num_buckets);
            shard_bucket_values(points, lo, hi, &digit_at)
        })
        .collect();

    let mut running = G::Projective::identity();
    let mut total = G::Projective::identity();
    for shard in shard_values.into_iter().rev() {
        for v in shard.into_iter().rev() {
            running.add_assign_vartime(&v);
            total.add_assign_vartime(&running);
        }
    }
    total
}

/// Accumulates only the points whose digit lands in `[lo, hi)`, using a
/// bucket store scoped to that shard alone (its own small allocation, no
/// sharing with other shards), and returns each bucket's combined value
/// in shard-local order.
fn shard_bucket_values<G: AffineCurve>(
    points: &[G],
    lo: usize,
    hi: usize,
    digit_at: &(impl Fn(usize) -> i64 + Sync),
) -> Vec<G::Projective> {
    let local_buckets = hi - lo;
    let mut store: BucketStore<G> = BucketStore::new(local_buckets);
    let width = (local_buckets.max(1)).next_power_of_two().trailing_zeros() as usize + 1;
    let mut scheduler = Scheduler::new(points, &mut store, 0, local_buckets, width);

    for i in 0..points.len() {
        let d = digit_at(i);
        if d == 0 {
            continue;
        }
        let global_idx = d.unsigned_abs() as usize - 1;
        if global_idx < lo || global_idx >= hi {
            continue;
        }
        let sp = ScheduledPoint {
            bucket_index: Some(global_idx - lo),
            sign: d < 0,
            point_index: i,
        };
        scheduler.prefetch(&sp);
        scheduler.schedule(sp);
    }
    scheduler.flush();

    (0..local_buckets).map(|i| store.value(i)).collect()
}
