//! Quantizer (§4.7): schedules deferred callbacks at the next quantization
//! grid point. One instance per channel, plus one for the sequencer itself.

use crate::clock::Clock;
use std::collections::HashMap;

type Callback = Box<dyn FnOnce(u32) + Send>;

#[derive(Default)]
pub struct Quantizer {
    pending: HashMap<u32, Callback>,
}

impl Quantizer {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Marks `action_id` pending, to fire with `callback` at the next grid
    /// point. Replaces any previously pending callback for the same id.
    pub fn trigger(&mut self, action_id: u32, callback: Callback) {
        self.pending.insert(action_id, callback);
    }

    pub fn is_pending(&self, action_id: u32) -> bool {
        self.pending.contains_key(&action_id)
    }

    pub fn is_triggered(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Cancels every pending callback. Called unconditionally on rewind
    /// (§4.7, §9 Open Questions — the spec's stricter rule cancels both the
    /// sample player's and the channel's pending quantized actions).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Checks whether the grid point for each pending id falls within
    /// `[block_start, block_start + block_size)`; if so, fires it with
    /// `delta = grid - block_start` and removes it. At most one firing per
    /// trigger (§4.7 guarantee).
    pub fn advance(&mut self, clock: &Clock, block_start: u32, block_size: u32) {
        if !self.is_triggered() {
            return;
        }
        let grid = clock.quantize_frame(block_start);
        let fired: Vec<u32> = self
            .pending
            .keys()
            .copied()
            .filter(|_| grid >= block_start && grid < block_start + block_size)
            .collect();

        for id in fired {
            if let Some(callback) = self.pending.remove(&id) {
                callback(grid - block_start);
            }
        }
    }
}
