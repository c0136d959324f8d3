//! Channel value type and its RT-shared state (§3 "Channel").
//!
//! Old vs new: the source models a channel as a class hierarchy
//! (Channel -> SampleChannel/MidiChannel) holding mutable members directly.
//! Here a channel is a plain value (`Data`), cheap to clone for a Swapper
//! publish, with the handful of fields the audio thread must mutate between
//! publishes pulled out into an `Arc<State>` shared by pointer across clones
//! (§9 REDESIGN FLAGS: "class hierarchy -> tagged value type").

use crate::lockfree::{AtomicFlag, AtomicFrame};
use crate::midi::learner::MidiLearner;
use crate::midi::lighter::MidiLighter;
use crate::channel::action_recorder::ActionRecorderState;
use crate::channel::audio_receiver::AudioReceiver;
use crate::channel::sample_player::SamplePlayer;
use crate::id::Id;
use crate::quantizer::Quantizer;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Master,
    Preview,
    Sample,
    Midi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlayStatus {
    Off = 0,
    Wait = 1,
    Play = 2,
    Ending = 3,
}

impl PlayStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => PlayStatus::Wait,
            2 => PlayStatus::Play,
            3 => PlayStatus::Ending,
            _ => PlayStatus::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecStatus {
    Off = 0,
    Waiting = 1,
    Recording = 2,
    Ending = 3,
}

impl RecStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => RecStatus::Waiting,
            2 => RecStatus::Recording,
            3 => RecStatus::Ending,
            _ => RecStatus::Off,
        }
    }
}

/// An atomic-backed enum cell, the pattern used throughout for fields the
/// audio thread flips without going through a Swapper publish.
#[derive(Debug, Default)]
pub struct AtomicPlayStatus(AtomicU8);

impl AtomicPlayStatus {
    pub fn get(&self) -> PlayStatus {
        PlayStatus::from_u8(self.0.load(Ordering::Acquire))
    }
    pub fn set(&self, status: PlayStatus) {
        self.0.store(status as u8, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct AtomicRecStatus(AtomicU8);

impl AtomicRecStatus {
    pub fn get(&self) -> RecStatus {
        RecStatus::from_u8(self.0.load(Ordering::Acquire))
    }
    pub fn set(&self, status: RecStatus) {
        self.0.store(status as u8, Ordering::Release);
    }
}

/// The channel's RT-mutable cursor, shared by pointer across Layout clones
/// (§3 "Channel state (atomic)").
#[derive(Debug, Default)]
pub struct State {
    pub tracker: AtomicFrame,
    pub play_status: AtomicPlayStatus,
    pub rec_status: AtomicRecStatus,
    pub rewinding: AtomicFlag,
    pub offset: AtomicFrame,
}

/// Per-channel audio/MIDI scratch space. Written only by the audio thread
/// during that channel's render call within a single block; shared by
/// pointer so the same allocation survives Layout clones instead of being
/// reallocated on every publish.
pub struct Buffer {
    audio: UnsafeCell<Vec<f32>>,
    midi: UnsafeCell<Vec<giada_midi::MidiEvent>>,
}

// SAFETY: only the owning channel's render call touches these cells, and
// that call always happens on the single audio thread.
unsafe impl Send for Buffer {}
unsafe impl Sync for Buffer {}

impl Buffer {
    pub fn new(block_size: usize) -> Self {
        Self {
            audio: UnsafeCell::new(vec![0.0; block_size]),
            midi: UnsafeCell::new(Vec::new()),
        }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn audio_mut(&self) -> &mut Vec<f32> {
        unsafe { &mut *self.audio.get() }
    }

    pub fn audio(&self) -> &[f32] {
        unsafe { &*self.audio.get() }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn midi_mut(&self) -> &mut Vec<giada_midi::MidiEvent> {
        unsafe { &mut *self.midi.get() }
    }

    pub fn clear(&self) {
        self.audio_mut().iter_mut().for_each(|s| *s = 0.0);
        self.midi_mut().clear();
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("frames", &self.audio().len())
            .finish()
    }
}

/// Opaque reference into the plugin host's own registry (§6); the core
/// tracks only ordering and identity, never plugin internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginRef(pub Id);

#[derive(Debug, Clone, Default)]
pub struct SampleVariant {
    pub sample_player: SamplePlayer,
    pub audio_receiver: AudioReceiver,
    pub action_recorder: ActionRecorderState,
}

#[derive(Debug, Clone, Default)]
pub struct MidiVariant {
    pub sender: crate::midi::sender::MidiSender,
    pub action_recorder: ActionRecorderState,
}

#[derive(Debug, Clone)]
pub enum Kind {
    Master,
    Preview(SamplePlayer),
    Sample(SampleVariant),
    Midi(MidiVariant),
}

impl Kind {
    pub fn channel_type(&self) -> ChannelType {
        match self {
            Kind::Master => ChannelType::Master,
            Kind::Preview(_) => ChannelType::Preview,
            Kind::Sample(_) => ChannelType::Sample,
            Kind::Midi(_) => ChannelType::Midi,
        }
    }

    pub fn sample_player(&self) -> Option<&SamplePlayer> {
        match self {
            Kind::Preview(p) => Some(p),
            Kind::Sample(s) => Some(&s.sample_player),
            _ => None,
        }
    }

    pub fn sample_player_mut(&mut self) -> Option<&mut SamplePlayer> {
        match self {
            Kind::Preview(p) => Some(p),
            Kind::Sample(s) => Some(&mut s.sample_player),
            _ => None,
        }
    }
}

/// A channel (§3). Cloned wholesale on every Swapper publish; the handful
/// of audio-thread-mutable fields live behind `state`/`buffer` instead.
#[derive(Debug, Clone)]
pub struct Data {
    pub id: Id,
    pub kind: Kind,
    pub column_id: Id,

    pub volume: f32,
    pub volume_i: f32,
    pub pan: f32,

    pub mute: bool,
    pub solo: bool,
    pub armed: bool,
    pub read_actions: bool,
    pub has_actions: bool,

    pub key: Option<u32>,
    pub name: String,
    pub height: u32,

    pub midi_learner: MidiLearner,
    pub midi_lighter: MidiLighter,
    pub plugins: Vec<PluginRef>,

    pub state: Arc<State>,
    pub buffer: Arc<Buffer>,
    pub quantizer: Arc<std::sync::Mutex<Quantizer>>,
}

impl Data {
    pub fn new(id: Id, kind: Kind, block_size: usize) -> Self {
        Self {
            id,
            kind,
            column_id: crate::id::ID_NONE,
            volume: 1.0,
            volume_i: 1.0,
            pan: 0.5,
            mute: false,
            solo: false,
            armed: false,
            read_actions: false,
            has_actions: false,
            key: None,
            name: String::new(),
            height: 0,
            midi_learner: MidiLearner::default(),
            midi_lighter: MidiLighter::default(),
            plugins: Vec::new(),
            state: Arc::new(State::default()),
            buffer: Arc::new(Buffer::new(block_size)),
            quantizer: Arc::new(std::sync::Mutex::new(Quantizer::new())),
        }
    }

    pub fn channel_type(&self) -> ChannelType {
        self.kind.channel_type()
    }

    pub fn play_status(&self) -> PlayStatus {
        self.state.play_status.get()
    }

    pub fn set_play_status(&self, status: PlayStatus) {
        self.state.play_status.set(status);
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.play_status(), PlayStatus::Play | PlayStatus::Ending)
    }

    /// True if some *other* channel in the same session is soloed, meaning
    /// this one should be inaudible unless it is itself soloed (§4.9).
    pub fn should_mute_for_solo(&self, any_solo_active: bool) -> bool {
        self.mute || (any_solo_active && !self.solo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channel_starts_off() {
        let d = Data::new(4, Kind::Sample(SampleVariant::default()), 512);
        assert_eq!(d.play_status(), PlayStatus::Off);
        assert!(!d.is_playing());
    }

    #[test]
    fn clone_shares_state_and_buffer_by_pointer() {
        let d = Data::new(4, Kind::Sample(SampleVariant::default()), 512);
        let clone = d.clone();
        d.set_play_status(PlayStatus::Play);
        assert_eq!(clone.play_status(), PlayStatus::Play);
        assert!(Arc::ptr_eq(&d.buffer, &clone.buffer));
    }

    #[test]
    fn solo_mutes_non_soloed_channels() {
        let d = Data::new(4, Kind::Sample(SampleVariant::default()), 512);
        assert!(!d.should_mute_for_solo(false));
        assert!(d.should_mute_for_solo(true));
    }
}
