//! Engine configuration (§6 "Environment", §10.3).

use crate::error::{Error, Result};

/// Which data a rec-buffer stop finalizes into: a fixed-length loop capture,
/// or a free-running capture stopped explicitly from the UI (§11.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRecMode {
    Free,
    LoopLocked,
}

/// Value struct loaded once at startup and validated before use, matching
/// the teacher's `TuttiConfig` shape (plain data + `Default` + `validate()`).
#[derive(Debug, Clone)]
pub struct Conf {
    pub sample_rate: f64,
    pub block_size: usize,

    /// Governs rec_status transitions in §4.2: when true, the "R" button
    /// behaves like a loop (WAIT → PLAY → ENDING → OFF); when false it's a
    /// plain on/off toggle.
    pub treat_recs_as_loops: bool,

    /// When true, PLAY channels that are looping or reading actions are
    /// killed on SEQUENCER_STOP rather than left to finish (§4.2).
    pub chans_stop_on_seq_halt: bool,

    /// When true, BPM/time-signature changes rebuild the action map's frame
    /// keys via `update_key_frames` (§4.10) instead of leaving them fixed.
    pub resize_recordings: bool,

    pub midi_out_lightning_enabled: bool,

    /// Quantize grid denominator (e.g. 4 = quantize to 1/4 beat). 0 disables
    /// quantization (`clock.can_quantize()` is always false).
    pub quantize: u32,

    pub input_rec_mode: InputRecMode,

    pub ui_event_queue_capacity: usize,
    pub midi_event_queue_capacity: usize,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            block_size: 512,
            treat_recs_as_loops: false,
            chans_stop_on_seq_halt: true,
            resize_recordings: false,
            midi_out_lightning_enabled: true,
            quantize: 0,
            input_rec_mode: InputRecMode::LoopLocked,
            ui_event_queue_capacity: 2048,
            midi_event_queue_capacity: 2048,
        }
    }
}

impl Conf {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < 8000.0 || self.sample_rate > 384000.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.block_size == 0 || self.block_size > 1 << 16 {
            return Err(Error::InvalidConfig(format!(
                "block_size {} out of range",
                self.block_size
            )));
        }
        if self.ui_event_queue_capacity == 0 || self.midi_event_queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "event queue capacities must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let conf = Conf::default();
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_sample_rate() {
        let mut conf = Conf::default();
        conf.sample_rate = 1.0;
        assert!(conf.validate().is_err());
    }

    #[test]
    fn rejects_zero_block_size() {
        let mut conf = Conf::default();
        conf.block_size = 0;
        assert!(conf.validate().is_err());
    }
}
