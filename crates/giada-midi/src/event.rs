//! RT-safe MIDI event types with sample-accurate timing.
//!
//! `MidiEvent` is the payload carried by Actions (§3) and by the live event
//! queues feeding the sender/receiver/controller/lighter sub-components
//! (§4.5). It additionally distinguishes `NoteKill`, which the source's
//! action-driven sample advancer uses for unpaired live notes (§4.10).

use midi_msg::{Channel, ChannelVoiceMsg};
use serde::{Deserialize, Serialize};

/// A single MIDI event, sample-accurate within one audio block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    /// Sample offset within the current buffer (0 = first sample).
    pub frame_offset: usize,
    pub channel: Channel,
    pub msg: ChannelVoiceMsg,
}

impl MidiEvent {
    #[inline]
    pub fn new(frame_offset: usize, channel: Channel, msg: ChannelVoiceMsg) -> Self {
        Self {
            frame_offset,
            channel,
            msg,
        }
    }

    #[inline]
    pub fn note_on(frame_offset: usize, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOn { note, velocity },
        }
    }

    #[inline]
    pub fn note_off(frame_offset: usize, channel: u8, note: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOff { note, velocity: 0 },
        }
    }

    /// A kill is a NoteOff with a marker velocity (127), matching the source's
    /// use of NOTE_KILL for unpaired live notes that never got a recorded NoteOff.
    #[inline]
    pub fn note_kill(frame_offset: usize, channel: u8, note: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOff {
                note,
                velocity: 127,
            },
        }
    }

    #[inline]
    pub fn all_notes_off(frame_offset: usize, channel: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::ChannelModeMsg(midi_msg::ChannelModeMsg::AllNotesOff),
        }
    }

    #[inline]
    pub fn control_change(frame_offset: usize, channel: u8, cc: u8, value: u8) -> Self {
        Self {
            frame_offset,
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::ControlChange {
                control: midi_msg::ControlChange::CC { control: cc, value },
            },
        }
    }

    #[inline]
    pub fn channel_num(&self) -> u8 {
        self.channel as u8
    }

    /// Returns a copy of this event rewritten onto a different output channel,
    /// as the MIDI sender does when forwarding actions to `filter` (§4.5).
    #[inline]
    pub fn rewritten_to(&self, channel: u8) -> Self {
        Self {
            channel: Channel::from_u8(channel),
            ..*self
        }
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self.msg, ChannelVoiceMsg::NoteOn { velocity, .. } if velocity > 0)
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self.msg,
            ChannelVoiceMsg::NoteOff { .. } | ChannelVoiceMsg::NoteOn { velocity: 0, .. }
        )
    }

    #[inline]
    pub fn is_kill(&self) -> bool {
        matches!(self.msg, ChannelVoiceMsg::NoteOff { velocity: 127, .. })
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { note, .. } | ChannelVoiceMsg::NoteOff { note, .. } => {
                Some(note)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { velocity, .. } | ChannelVoiceMsg::NoteOff { velocity, .. } => {
                Some(velocity)
            }
            _ => None,
        }
    }
}

/// Wire representation for persisting a `MidiEvent` in a Patch (§6) or an
/// action-map snapshot. `midi_msg` types aren't `Serialize`; this mirrors the
/// flattened-enum conversion used upstream for the same reason.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEventRaw {
    pub frame_offset: usize,
    pub channel: u8,
    pub kind: RawKind,
    pub a: u8,
    pub b: u8,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawKind {
    NoteOn,
    NoteOff,
    ControlChange,
    AllNotesOff,
}

impl From<MidiEvent> for MidiEventRaw {
    fn from(e: MidiEvent) -> Self {
        match e.msg {
            ChannelVoiceMsg::NoteOn { note, velocity } => MidiEventRaw {
                frame_offset: e.frame_offset,
                channel: e.channel_num(),
                kind: RawKind::NoteOn,
                a: note,
                b: velocity,
            },
            ChannelVoiceMsg::NoteOff { note, velocity } => MidiEventRaw {
                frame_offset: e.frame_offset,
                channel: e.channel_num(),
                kind: RawKind::NoteOff,
                a: note,
                b: velocity,
            },
            ChannelVoiceMsg::ControlChange {
                control: midi_msg::ControlChange::CC { control, value },
            } => MidiEventRaw {
                frame_offset: e.frame_offset,
                channel: e.channel_num(),
                kind: RawKind::ControlChange,
                a: control,
                b: value,
            },
            _ => MidiEventRaw {
                frame_offset: e.frame_offset,
                channel: e.channel_num(),
                kind: RawKind::AllNotesOff,
                a: 0,
                b: 0,
            },
        }
    }
}

impl From<MidiEventRaw> for MidiEvent {
    fn from(r: MidiEventRaw) -> Self {
        match r.kind {
            RawKind::NoteOn => {
                if r.b == 127 {
                    MidiEvent::note_kill(r.frame_offset, r.channel, r.a)
                } else {
                    MidiEvent::note_on(r.frame_offset, r.channel, r.a, r.b)
                }
            }
            RawKind::NoteOff => {
                if r.b == 127 {
                    MidiEvent::note_kill(r.frame_offset, r.channel, r.a)
                } else {
                    MidiEvent::note_off(r.frame_offset, r.channel, r.a)
                }
            }
            RawKind::ControlChange => MidiEvent::control_change(r.frame_offset, r.channel, r.a, r.b),
            RawKind::AllNotesOff => MidiEvent::all_notes_off(r.frame_offset, r.channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_off_roundtrip() {
        let on = MidiEvent::note_on(10, 2, 60, 100);
        assert!(on.is_note_on());
        assert_eq!(on.note(), Some(60));
        assert_eq!(on.velocity(), Some(100));

        let off = MidiEvent::note_off(20, 2, 60);
        assert!(off.is_note_off());
        assert!(!off.is_kill());
    }

    #[test]
    fn kill_is_distinguishable_from_ordinary_note_off() {
        let kill = MidiEvent::note_kill(0, 0, 60);
        assert!(kill.is_kill());
        assert!(kill.is_note_off());
    }

    #[test]
    fn rewritten_to_changes_only_channel() {
        let e = MidiEvent::note_on(5, 3, 64, 90);
        let r = e.rewritten_to(9);
        assert_eq!(r.channel_num(), 9);
        assert_eq!(r.note(), e.note());
        assert_eq!(r.frame_offset, e.frame_offset);
    }

    #[test]
    fn raw_roundtrip_preserves_semantics() {
        for original in [
            MidiEvent::note_on(1, 4, 72, 111),
            MidiEvent::note_off(2, 4, 72),
            MidiEvent::note_kill(3, 4, 72),
            MidiEvent::control_change(4, 4, 7, 90),
            MidiEvent::all_notes_off(5, 4),
        ] {
            let raw: MidiEventRaw = original.into();
            let back: MidiEvent = raw.into();
            assert_eq!(back.channel_num(), original.channel_num());
            assert_eq!(back.is_kill(), original.is_kill());
            assert_eq!(back.note(), original.note());
        }
    }
}
