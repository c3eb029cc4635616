//! The thread-pool collaborator: exposed
//! as a trait so callers can inject their own work-stealing implementation,
//! with a `rayon`-backed default (feature `parallel`).

/// A handle to a spawned task that can be synchronously awaited.
pub trait JoinHandle<T>: Send {
    fn sync(self) -> T;
}

/// `spawn_awaitable` / `sync` / `parallel_for` / `num_threads`, the
/// primitives the parallel driver's collaborator needs to expose.
///
/// `spawn_awaitable` requires `'static` data (the common case when each task
/// owns or `Arc`s its inputs, e.g. the MSM-split axis). Where the driver
/// needs to fan out over *borrowed* per-window state (the common case for
/// window/bucket-range parallelism) it uses the concrete `rayon::scope` API
/// directly instead of going through the trait — the trait here exists for
/// injectability and documentation of the contract, not to force every call
/// site through it.
pub trait ThreadPool: Send + Sync {
    type Handle<T: Send>: JoinHandle<T>;

    fn num_threads(&self) -> usize;

    fn spawn_awaitable<T, F>(&self, f: F) -> Self::Handle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static;

    fn parallel_for<F>(&self, len: usize, f: F)
    where
        F: Fn(usize) + Sync;
}

#[cfg(feature = "parallel")]
pub use rayon_pool::RayonPool;

#[cfg(feature = "parallel")]
mod rayon_pool {
    use super::{JoinHandle, ThreadPool};
    use std::sync::mpsc;

    pub struct RayonHandle<T>(mpsc::Receiver<T>);

    impl<T: Send> JoinHandle<T> for RayonHandle<T> {
        fn sync(self) -> T {
            self.0.recv().expect("msm worker task panicked before completing")
        }
    }

    /// The default work-stealing pool: every call delegates to rayon's
    /// global thread pool.
    #[derive(Default, Clone, Copy)]
    pub struct RayonPool;

    impl ThreadPool for RayonPool {
        type Handle<T: Send> = RayonHandle<T>;

        fn num_threads(&self) -> usize {
            rayon::current_num_threads()
        }

        fn spawn_awaitable<T, F>(&self, f: F) -> RayonHandle<T>
        where
            T: Send + 'static,
            F: FnOnce() -> T + Send + 'static,
        {
            let (tx, rx) = mpsc::channel();
            rayon::spawn(move || {
                let _ = tx.send(f());
            });
            RayonHandle(rx)
        }

        fn parallel_for<F>(&self, len: usize, f: F)
        where
            F: Fn(usize) + Sync,
        {
            use rayon::prelude::*;
            (0..len).into_par_iter().for_each(|i| f(i));
        }
    }

}
