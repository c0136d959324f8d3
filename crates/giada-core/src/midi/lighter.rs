//! MIDI output lighting (§4.5, §10.3 `midi_out_lightning_enabled`): sends a
//! MIDI message back out to a controller's LEDs when a channel enters a
//! given play/mute/solo state.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightEvent {
    Stopped,
    Waiting,
    Stopping,
    Playing,
    PlayingInaudible,
    MuteOn,
    MuteOff,
    SoloOn,
    SoloOff,
}

#[derive(Debug, Clone, Default)]
pub struct MidiLighter {
    pub enabled: bool,
    masks: HashMap<LightEvent, u32>,
}

impl MidiLighter {
    pub fn set_mask(&mut self, event: LightEvent, mask: u32) {
        self.masks.insert(event, mask);
    }

    pub fn clear_mask(&mut self, event: LightEvent) {
        self.masks.remove(&event);
    }

    /// Returns the raw MIDI message to send for `event`, if lighting is
    /// enabled and a mask is bound for it.
    pub fn message_for(&self, event: LightEvent) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        self.masks.get(&event).copied()
    }
}
