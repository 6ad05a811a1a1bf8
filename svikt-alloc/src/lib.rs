//! # svikt-alloc
//!
//! `GlobalAlloc` wrapper that injects allocation failures.
//!
//! Wraps a real allocator and consults the calling thread's fault
//! injector before each allocation attempt; on an injected failure the
//! underlying allocator is never called and null is returned, which is
//! the standard `GlobalAlloc` out-of-memory convention. Deallocation
//! always passes through.
//!
//! The wrapper is inert until [`arm`] is called, so installing it as the
//! global allocator costs one relaxed atomic load per allocation during
//! normal runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use svikt_alloc::FailingAlloc;
//!
//! #[global_allocator]
//! static ALLOC: FailingAlloc = FailingAlloc::system();
//!
//! #[test]
//! fn survives_allocation_failure() {
//!     svikt_core::context::set_profile(100, 5);
//!     svikt_alloc::arm();
//!     // ... exercise code whose OOM paths should be hit ...
//!     svikt_alloc::disarm();
//! }
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, Ordering};

static ARMED: AtomicBool = AtomicBool::new(false);

/// Starts injecting failures into allocations made through [`FailingAlloc`].
pub fn arm() {
    ARMED.store(true, Ordering::Release);
}

/// Stops injecting; [`FailingAlloc`] delegates unconditionally again.
pub fn disarm() {
    ARMED.store(false, Ordering::Release);
}

/// Whether injection through the wrapper is currently armed.
pub fn armed() -> bool {
    ARMED.load(Ordering::Relaxed)
}

/// Allocator wrapper injecting failures ahead of an inner allocator.
pub struct FailingAlloc<A = System> {
    inner: A,
}

impl FailingAlloc<System> {
    /// Wraps the system allocator.
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A: GlobalAlloc> FailingAlloc<A> {
    /// Wraps an arbitrary inner allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }

    // The decision path is allocation-free (thread-resident injector
    // state, no locks), so querying it from inside the allocator cannot
    // recurse.
    #[inline]
    fn should_fail(&self) -> bool {
        ARMED.load(Ordering::Relaxed) && svikt_core::context::inject()
    }
}

// SAFETY: delegates to the inner allocator for all actual memory
// management; an injected failure returns null without touching the
// inner allocator, which callers must already handle as ordinary OOM.
unsafe impl<A: GlobalAlloc> GlobalAlloc for FailingAlloc<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if self.should_fail() {
            return std::ptr::null_mut();
        }
        self.inner.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: ptr came from the inner allocator with the same layout.
        self.inner.dealloc(ptr, layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if self.should_fail() {
            return std::ptr::null_mut();
        }
        self.inner.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if self.should_fail() {
            return std::ptr::null_mut();
        }
        self.inner.realloc(ptr, layout, new_size)
    }
}
