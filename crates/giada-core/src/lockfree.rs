//! Cache-line aligned atomic primitives for realtime-shared state.
//!
//! These back `channel::State`'s `tracker`/`play_status`/`rec_status`/
//! `rewinding`/`offset` fields (§3), which the audio thread writes and the
//! control/UI thread reads for meters and playhead indicators (§5).

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    /// Relaxed load — used for `tracker`, which is read very frequently by
    /// meters/playhead UI and doesn't gate any other memory access (§5).
    #[inline]
    pub fn get_relaxed(&self) -> bool {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicFlag {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Cache-line aligned atomic frame counter. `Frame` is `u32`-range in
/// practice (§GLOSSARY); stored as `u32` to keep the atomic lock-free on
/// every target the audio thread runs on.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFrame {
    value: AtomicU32,
}

impl AtomicFrame {
    pub fn new(value: u32) -> Self {
        Self {
            value: AtomicU32::new(value),
        }
    }

    #[inline]
    pub fn get_relaxed(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: u32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Clone for AtomicFrame {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFrame {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_float_get_set() {
        let v = AtomicFloat::new(1.0);
        assert_eq!(v.get(), 1.0);
        v.set(2.5);
        assert_eq!(v.get(), 2.5);
    }

    #[test]
    fn atomic_flag_get_set_swap() {
        let f = AtomicFlag::new(false);
        assert!(!f.get());
        f.set(true);
        assert!(f.get());
        assert!(f.swap(false));
        assert!(!f.get());
    }

    #[test]
    fn atomic_frame_roundtrip() {
        let f = AtomicFrame::new(10);
        assert_eq!(f.get(), 10);
        f.set(20);
        assert_eq!(f.get_relaxed(), 20);
    }
}
