//! Outbound MIDI filtering for MIDI channels (§4.5): an enable flag plus an
//! optional output channel filter, applied when forwarding a recorded or
//! live `MidiEvent` to the external MIDI driver.

use giada_midi::MidiEvent;

#[derive(Debug, Clone)]
pub struct MidiSender {
    pub enabled: bool,
    /// `Some(n)` rewrites every outgoing event to MIDI channel `n`; `None`
    /// passes the event's original channel through unchanged.
    pub filter_channel: Option<u8>,
}

impl Default for MidiSender {
    fn default() -> Self {
        Self {
            enabled: true,
            filter_channel: None,
        }
    }
}

impl MidiSender {
    /// Applies the sender's filter to `event`, or returns `None` if sending
    /// is disabled.
    pub fn process(&self, event: MidiEvent) -> Option<MidiEvent> {
        if !self.enabled {
            return None;
        }
        match self.filter_channel {
            Some(ch) => Some(event.rewritten_to(ch)),
            None => Some(event),
        }
    }
}
