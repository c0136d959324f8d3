//! Sample player sub-record (§4.3): playback parameters and the wave
//! reference for sample and preview channels.

use crate::wave::Wave;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SingleBasic,
    SinglePress,
    SingleRetrig,
    LoopBasic,
    LoopOnce,
    LoopRepeat,
    LoopOnceBar,
}

impl Mode {
    #[inline]
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            Mode::LoopBasic | Mode::LoopOnce | Mode::LoopRepeat | Mode::LoopOnceBar
        )
    }

    #[inline]
    pub fn is_single_press(self) -> bool {
        matches!(self, Mode::SinglePress)
    }
}

/// Playback parameters plus a direct `Arc<Wave>` pointer: the audio thread
/// reads wave frames through this pointer rather than looking the wave up
/// by id in a registry every block (§4.1, §4.3).
#[derive(Debug, Clone, Default)]
pub struct SamplePlayer {
    pub wave: Option<Arc<Wave>>,
    pub mode: ModeSlot,
    pub pitch: f32,
    pub shift: u32,
    pub begin: u32,
    pub end: u32,
    pub velocity_as_vol: bool,
    pub input_monitor: bool,
}

/// Wraps `Mode` so the whole record can `#[derive(Default)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSlot(pub Mode);

impl Default for ModeSlot {
    fn default() -> Self {
        ModeSlot(Mode::SingleBasic)
    }
}

impl SamplePlayer {
    pub fn new(wave: Arc<Wave>) -> Self {
        let end = wave.frame_count() as u32;
        Self {
            wave: Some(wave),
            mode: ModeSlot(Mode::SingleBasic),
            pitch: 1.0,
            shift: 0,
            begin: 0,
            end,
            velocity_as_vol: false,
            input_monitor: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.0
    }

    pub fn has_wave(&self) -> bool {
        self.wave.is_some()
    }

    /// Length of the playable region in frames, accounting for begin/end
    /// trim (§4.3 invariant: begin <= end <= wave frame count).
    pub fn region_len(&self) -> u32 {
        self.end.saturating_sub(self.begin)
    }
}
