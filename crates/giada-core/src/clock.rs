//! Clock (§2.2): bar/beat/bpm/quantize state, advanced by the audio thread.
//!
//! Like `channel::State`, the mutable per-block cursor (`current_frame`,
//! `running`) lives in a small atomics record shared by pointer across
//! Layout clones, while bpm/time-signature/quantize are plain value fields
//! cloned on every swap (§3 "Channel state (atomic)" applies here too).

use crate::lockfree::{AtomicFlag, AtomicFrame};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ClockState {
    pub current_frame: AtomicFrame,
    pub running: AtomicFlag,
}

#[derive(Debug, Clone)]
pub struct Clock {
    pub bpm: f64,
    pub time_sig_num: u32,
    pub time_sig_den: u32,
    pub bars: u32,
    /// Quantize grid denominator in beats (e.g. 4 = snap to 1/4 beat). 0
    /// disables quantization.
    pub quantize: u32,
    pub sample_rate: f64,

    pub state: Arc<ClockState>,
}

impl Clock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            bpm: 120.0,
            time_sig_num: 4,
            time_sig_den: 4,
            bars: 1,
            quantize: 0,
            sample_rate,
            state: Arc::new(ClockState::default()),
        }
    }

    #[inline]
    pub fn frames_in_beat(&self) -> u32 {
        ((60.0 / self.bpm) * self.sample_rate) as u32
    }

    #[inline]
    pub fn frames_in_bar(&self) -> u32 {
        self.frames_in_beat() * self.time_sig_num
    }

    #[inline]
    pub fn frames_in_loop(&self) -> u32 {
        self.frames_in_bar() * self.bars.max(1)
    }

    #[inline]
    pub fn current_frame(&self) -> u32 {
        self.state.current_frame.get_relaxed()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    pub fn set_running(&self, running: bool) {
        self.state.running.set(running);
    }

    /// True when a quantize grid is configured and the transport is running;
    /// the only state in which pressing a channel schedules a deferred
    /// quantizer callback instead of acting immediately (§4.2).
    #[inline]
    pub fn can_quantize(&self) -> bool {
        self.quantize > 0 && self.is_running()
    }

    /// Rounds `frame` to the nearest multiple of the quantize grid, ties
    /// rounding to the next grid point (§8 boundary property).
    pub fn quantize_frame(&self, frame: u32) -> u32 {
        if self.quantize == 0 {
            return frame;
        }
        let grid = self.frames_in_beat() / self.quantize.max(1);
        if grid == 0 {
            return frame;
        }
        let lower = (frame / grid) * grid;
        let rem = frame - lower;
        if rem == 0 {
            lower
        } else if rem * 2 >= grid {
            lower + grid
        } else {
            lower
        }
    }

    /// Advances the frame cursor by one audio block, wrapping at
    /// `frames_in_loop`. Called once per callback from the audio thread.
    /// Returns `true` if the block wrapped around the loop boundary.
    pub fn advance(&self, block_size: u32) -> bool {
        let loop_len = self.frames_in_loop();
        if loop_len == 0 {
            return false;
        }
        let current = self.state.current_frame.get_relaxed();
        let next = current + block_size;
        if next >= loop_len {
            self.state.current_frame.set(next - loop_len);
            true
        } else {
            self.state.current_frame.set(next);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_in_beat_at_120bpm_44100() {
        let clock = Clock::new(44100.0);
        assert_eq!(clock.frames_in_beat(), 22050);
    }

    #[test]
    fn quantize_rounds_to_nearest_with_ties_to_next() {
        let mut clock = Clock::new(44100.0);
        clock.quantize = 1; // grid = frames_in_beat = 22050
        assert_eq!(clock.quantize_frame(21000), 22050);
        assert_eq!(clock.quantize_frame(11025), 22050); // exact tie -> next
        assert_eq!(clock.quantize_frame(11024), 0);
        assert_eq!(clock.quantize_frame(0), 0);
    }

    #[test]
    fn can_quantize_requires_running_and_nonzero_grid() {
        let mut clock = Clock::new(44100.0);
        assert!(!clock.can_quantize());
        clock.quantize = 4;
        assert!(!clock.can_quantize());
        clock.set_running(true);
        assert!(clock.can_quantize());
    }

    #[test]
    fn advance_wraps_at_loop_boundary() {
        let mut clock = Clock::new(44100.0);
        clock.bars = 1;
        let loop_len = clock.frames_in_loop();
        clock.state.current_frame.set(loop_len - 100);
        let wrapped = clock.advance(512);
        assert!(wrapped);
        assert_eq!(clock.current_frame(), 512 - 100);
    }

    #[test]
    fn clone_shares_state_by_pointer() {
        let clock = Clock::new(44100.0);
        let clone = clock.clone();
        clock.state.current_frame.set(42);
        assert_eq!(clone.current_frame(), 42);
    }
}
