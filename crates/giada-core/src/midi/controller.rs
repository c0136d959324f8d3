//! MIDI channel key-press/release handling (§4.5).
//!
//! Unlike a sample channel, a MIDI channel has no playback FSM: pressing it
//! just forwards a note-on immediately (subject to the sender's filter),
//! and releasing it forwards the matching note-off. There's no wait/ending
//! state because there's no buffer position to track.

use crate::midi::sender::MidiSender;
use giada_midi::MidiEvent;

pub fn on_key_press(sender: &MidiSender, channel: u8, note: u8, velocity: u8) -> Option<MidiEvent> {
    sender.process(MidiEvent::note_on(0, channel, note, velocity))
}

pub fn on_key_release(sender: &MidiSender, channel: u8, note: u8) -> Option<MidiEvent> {
    sender.process(MidiEvent::note_off(0, channel, note))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_forwards_note_on_through_sender() {
        let sender = MidiSender::default();
        let e = on_key_press(&sender, 0, 60, 100).unwrap();
        assert!(e.is_note_on());
    }

    #[test]
    fn disabled_sender_swallows_controller_output() {
        let sender = MidiSender {
            enabled: false,
            filter_channel: None,
        };
        assert!(on_key_press(&sender, 0, 60, 100).is_none());
        assert!(on_key_release(&sender, 0, 60).is_none());
    }
}
