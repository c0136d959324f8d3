//! Event pipeline types (§4.6). `Event`s are produced by the UI and MIDI-in
//! threads, queued, and drained once per dispatch cycle by the event
//! dispatcher, which fans them out to `channel::react` and `sequencer::react`.

use crate::action::Action;
use crate::channel::Data as ChannelData;
use crate::id::Id;
use giada_midi::MidiEvent;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    KeyPress,
    KeyRelease,
    KeyKill,
    ChannelToggleReadActions,
    Midi,
    Action,
    FirstBeat,
    Bar,
    Rewind,
    Actions,
    SequencerStop,
    /// Carries a deferred mutation to run against a specific channel on the
    /// next dispatch cycle — the Rust replacement for the source's
    /// `std::function`-queued `CHANNEL_FUNCTION` (§9).
    ChannelFunction,
}

/// The event payload. `ChannelFunction` is a boxed closure rather than a
/// closed enum of mutations: the source's "schedule a callback that touches
/// this channel next dispatch cycle" pattern is exactly a `FnOnce`, and Rust
/// can express that directly without reintroducing an ad-hoc mutation enum.
pub enum EventData {
    None,
    Int(i32),
    Float(f32),
    Bool(bool),
    Action(Action),
    Midi(MidiEvent),
    ChannelFunction(Box<dyn FnOnce(&mut ChannelData) + Send>),
}

impl fmt::Debug for EventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventData::None => write!(f, "None"),
            EventData::Int(v) => write!(f, "Int({v})"),
            EventData::Float(v) => write!(f, "Float({v})"),
            EventData::Bool(v) => write!(f, "Bool({v})"),
            EventData::Action(a) => write!(f, "Action({a:?})"),
            EventData::Midi(m) => write!(f, "Midi({m:?})"),
            EventData::ChannelFunction(_) => write!(f, "ChannelFunction(..)"),
        }
    }
}

/// `channel_id == 0` (`id::ID_NONE`) means the event is broadcast to every
/// channel; `delta` carries intra-block timing for MIDI/action events (§4.6).
#[derive(Debug)]
pub struct Event {
    pub event_type: EventType,
    pub delta: u32,
    pub channel_id: Id,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, channel_id: Id) -> Self {
        Self {
            event_type,
            delta: 0,
            channel_id,
            data: EventData::None,
        }
    }

    pub fn with_delta(mut self, delta: u32) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.channel_id == crate::id::ID_NONE
    }

    pub fn key_press(channel_id: Id, velocity: i32) -> Self {
        Self::new(EventType::KeyPress, channel_id).with_data(EventData::Int(velocity))
    }

    pub fn key_release(channel_id: Id) -> Self {
        Self::new(EventType::KeyRelease, channel_id)
    }

    pub fn key_kill(channel_id: Id) -> Self {
        Self::new(EventType::KeyKill, channel_id)
    }

    pub fn channel_function(
        channel_id: Id,
        f: impl FnOnce(&mut ChannelData) + Send + 'static,
    ) -> Self {
        Self::new(EventType::ChannelFunction, channel_id)
            .with_data(EventData::ChannelFunction(Box::new(f)))
    }
}
