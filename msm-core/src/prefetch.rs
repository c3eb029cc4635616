//! Portable write-prefetch helper. Architecture
//! specific; no-ops on platforms without a prefetch intrinsic so the
//! scheduler's prefetch calls are always safe to emit.

/// Issues a write-locality prefetch for the cache line containing `ptr`.
/// Purely a latency hint — never observable except as a timing effect.
#[inline(always)]
pub fn prefetch_write<T>(ptr: *const T) {
    #[cfg(all(target_arch = "x86_64", not(miri)))]
    unsafe {
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch(ptr as *const i8, _MM_HINT_T0);
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        // No portable prefetch intrinsic on stable Rust outside x86_64;
        // no-op rather than risk an unsound fallback read.
        let _ = ptr;
    }
}
