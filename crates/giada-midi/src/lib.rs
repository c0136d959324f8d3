//! MIDI event types shared across the Giada core engine.

mod event;

pub use event::{MidiEvent, MidiEventRaw, RawKind};
pub use midi_msg::Channel;
