//! Scheduler.
//!
//! Per-thread state that queues scheduled bucket additions, detects
//! same-bucket collisions within a batch, prefetches bucket memory ahead
//! of use, flushes queued additions through the batch-affine adder in
//! vector-sized groups, and falls back to direct accumulator-slot
//! addition when the collision queue itself overflows. This is the
//! generalisation of `VariableBaseMSM::multi_scalar_mul_affine`'s own
//! per-window bucket loop (`buckets[...].push(...)` calls followed by a
//! single `G::add_points` per window) into a streaming, fixed-memory
//! structure: that loop defers all bucket contention to the end of the
//! window by collecting full point lists per bucket; the scheduler here
//! bounds memory to `Q` in-flight entries by converting repeat hits on the
//! same bucket into either a batched affine update or, past `Q`
//! collisions, an extended-coordinate fold.

use crate::batch_affine::{batch_affine_add, Update};
use crate::bucket::BucketStore;
use crate::prefetch::prefetch_write;
use crate::traits::curve::AffineCurve;

/// `Q = max(32, 4c^2 - 16c - 128)`: collision-probability
/// derived queue capacity so that, at expected fill, fewer than ~1
/// collision per 32 points occurs once `c >= 10`.
pub fn queue_capacity(c: usize) -> usize {
    let c = c as i64;
    (4 * c * c - 16 * c - 128).max(32) as usize
}

/// One point still waiting to be folded into a bucket. `bucket_index ==
/// None` is the "digit was zero" skip case, represented natively here instead of as a sentinel value.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledPoint {
    pub bucket_index: Option<usize>,
    pub sign: bool,
    pub point_index: usize,
}

/// Per-thread scheduler state owning bucket range `[start, end)` of a
/// shared [`BucketStore`].
pub struct Scheduler<'a, G: AffineCurve> {
    points: &'a [G],
    buckets: &'a mut BucketStore<G>,
    start: usize,
    end: usize,
    queue: Vec<ScheduledPoint>,
    collisions: Vec<ScheduledPoint>,
    collision_map: Vec<bool>,
    capacity: usize,
}

impl<'a, G: AffineCurve> Scheduler<'a, G> {
    pub fn new(points: &'a [G], buckets: &'a mut BucketStore<G>, start: usize, end: usize, c: usize) -> Self {
        let capacity = queue_capacity(c);
        let num_buckets = buckets.len();
        Scheduler {
            points,
            buckets,
            start,
            end,
            queue: Vec::with_capacity(capacity),
            collisions: Vec::with_capacity(capacity),
            collision_map: vec![false; num_buckets],
            capacity,
        }
    }

    /// Issues write-prefetches for the bucket slots `sp` targets, ahead
    /// of a later `schedule(sp)` call.
    pub fn prefetch(&self, sp: &ScheduledPoint) {
        if let Some(idx) = sp.bucket_index {
            prefetch_write(self.buckets.affine(idx) as *const G);
            prefetch_write(self.buckets.accum(idx) as *const G::Projective);
        }
    }

    /// Steady-state scheduling step.
    pub fn schedule(&mut self, sp: ScheduledPoint) {
        let idx = match sp.bucket_index {
            None => return,
            Some(idx) => idx,
        };
        if idx < self.start || idx >= self.end {
            return;
        }

        if !self.buckets.status(idx).contains(crate::bucket::Status::HAS_AFFINE) {
            let p = self.points[sp.point_index];
            let p = if sp.sign { p.neg() } else { p };
            self.buckets.set_affine(idx, p);
            return;
        }

        if self.collision_map[idx] {
            self.handle_collision(sp);
            return;
        }

        self.queue.push(sp);
        self.collision_map[idx] = true;

        if self.queue.len() == self.capacity {
            self.drain_queue();
            self.reschedule_collisions();
        }
    }

    fn handle_collision(&mut self, sp: ScheduledPoint) {
        if self.collisions.len() < self.capacity {
            self.collisions.push(sp);
            return;
        }
        self.fold_overflow(sp);
    }

    fn fold_overflow(&mut self, sp: ScheduledPoint) {
        let idx = sp.bucket_index.expect("fold_overflow only called for real buckets");
        let p = self.points[sp.point_index];
        let p = if sp.sign { p.neg() } else { p };
        self.buckets.fold_into_accum(idx, &p);
    }

    fn drain_queue(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let updates: Vec<Update<G>> = self
            .queue
            .iter()
            .map(|sp| Update {
                bucket_index: sp.bucket_index.expect("queue never holds skipped entries"),
                sign: sp.sign,
                source: self.points[sp.point_index],
            })
            .collect();
        batch_affine_add(self.buckets, &updates);
        for sp in self.queue.drain(..) {
            let idx = sp.bucket_index.expect("queue never holds skipped entries");
            self.collision_map[idx] = false;
        }
    }

    /// Moves collisions whose bucket is no longer contended back into the
    /// live queue.
    fn reschedule_collisions(&mut self) {
        let mut still_colliding = Vec::with_capacity(self.collisions.len());
        for sp in self.collisions.drain(..) {
            let idx = sp.bucket_index.expect("collisions never holds skipped entries");
            if self.collision_map[idx] {
                still_colliding.push(sp);
            } else {
                self.collision_map[idx] = true;
                self.queue.push(sp);
            }
        }
        self.collisions = still_colliding;
    }

    /// Drains all remaining state at the end of an accumulation pass.
    pub fn flush(&mut self) {
        if self.queue.len() >= 32 {
            self.drain_queue();
        } else {
            for sp in self.queue.drain(..) {
                let idx = sp.bucket_index.expect("queue never holds skipped entries");
                let p = self.points[sp.point_index];
                let p = if sp.sign { p.neg() } else { p };
                self.buckets.fold_into_accum(idx, &p);
                self.collision_map[idx] = false;
            }
        }
        for sp in self.collisions.drain(..) {
            self.fold_overflow(sp);
        }
        self.collision_map.iter_mut().for_each(|b| *b = false);
    }
}
