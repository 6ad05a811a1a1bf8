//! ## svikt-core::guard
//! **RAII save/restore of injector state**
//!
//! Guards snapshot an injector's full mutable state at construction and
//! put it back on every exit path, including unwinding. Useful to fence
//! off calls into third-party code that is not OOM-safe: mutate the
//! profile or pause inside the scope, and the previous state is
//! guaranteed back at scope exit. Nested scopes stack independent guards;
//! drop order gives the required LIFO restoration.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::context;
use crate::injector::{FaultInjector, InjectorState};

/// Scoped save/restore for an explicitly owned [`FaultInjector`].
///
/// Derefs to the injector so the guarded scope can keep making decisions
/// and mutating state through the guard.
#[derive(Debug)]
pub struct StateGuard<'a> {
    injector: &'a mut FaultInjector,
    saved: InjectorState,
}

impl<'a> StateGuard<'a> {
    /// Snapshots `injector` and restores it when the guard drops.
    pub fn new(injector: &'a mut FaultInjector) -> Self {
        let saved = injector.snapshot();
        Self { injector, saved }
    }
}

impl Deref for StateGuard<'_> {
    type Target = FaultInjector;

    fn deref(&self) -> &FaultInjector {
        self.injector
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut FaultInjector {
        self.injector
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.injector.restore(self.saved);
    }
}

/// Scoped save/restore for the calling thread's implicit injector.
///
/// Created via [`context::save`]. `!Send`, so the restore always runs on
/// the thread whose state was saved.
#[derive(Debug)]
pub struct ThreadGuard {
    saved: InjectorState,
    _not_send: PhantomData<*const ()>,
}

impl ThreadGuard {
    pub(crate) fn new() -> Self {
        Self {
            saved: context::with(|injector| injector.snapshot()),
            _not_send: PhantomData,
        }
    }
}

impl Drop for ThreadGuard {
    fn drop(&mut self) {
        let saved = self.saved;
        context::with(|injector| injector.restore(saved));
    }
}
