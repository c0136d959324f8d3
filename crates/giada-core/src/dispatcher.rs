//! Event dispatcher (§4.6): two bounded SPSC queues (UI-thread and
//! MIDI-in-thread producers), drained once per block on the audio thread
//! and fanned out to `channel::react`/`sequencer`.
//!
//! Grounded in the same bounded-channel-per-producer shape as the teacher's
//! MIDI registry slots, via `crossbeam_channel::bounded`.

use crate::channel;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::event::{Event, EventType};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

pub struct Dispatcher {
    ui_tx: Sender<Event>,
    ui_rx: Receiver<Event>,
    midi_tx: Sender<Event>,
    midi_rx: Receiver<Event>,
}

impl Dispatcher {
    pub fn new(ui_capacity: usize, midi_capacity: usize) -> Self {
        let (ui_tx, ui_rx) = bounded(ui_capacity);
        let (midi_tx, midi_rx) = bounded(midi_capacity);
        Self {
            ui_tx,
            ui_rx,
            midi_tx,
            midi_rx,
        }
    }

    /// Queues an event from the UI thread. Never blocks; a full queue is a
    /// reported error rather than backpressure onto the caller (§4.6, §7).
    pub fn push_ui_event(&self, event: Event) -> Result<()> {
        self.ui_tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => Error::CapacityExceeded { queue: "ui_event" },
            TrySendError::Disconnected(_) => Error::CapacityExceeded { queue: "ui_event" },
        })
    }

    pub fn push_midi_event(&self, event: Event) -> Result<()> {
        self.midi_tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => Error::CapacityExceeded { queue: "midi_event" },
            TrySendError::Disconnected(_) => Error::CapacityExceeded { queue: "midi_event" },
        })
    }

    /// Drains both queues and applies each event to the matching channel(s).
    /// Called once per audio block, before `sequencer::advance`.
    pub fn drain_and_react(&self, channels: &mut [channel::Data], clock: &Clock, stop_on_seq_halt: bool) {
        for event in self.ui_rx.try_iter().chain(self.midi_rx.try_iter()) {
            self.apply_owned(event, channels, clock, stop_on_seq_halt);
        }
    }

    fn apply(&self, event: &Event, channels: &mut [channel::Data], clock: &Clock, stop_on_seq_halt: bool) {
        if event.event_type == EventType::ChannelFunction {
            // Needs ownership of the boxed closure; see `apply_owned`.
            return;
        }
        if event.is_broadcast() {
            for ch in channels.iter_mut() {
                channel::react(ch, event, clock, stop_on_seq_halt);
            }
        } else if let Some(ch) = channels.iter_mut().find(|c| c.id == event.channel_id) {
            channel::react(ch, event, clock, stop_on_seq_halt);
        }
    }

    /// Variant that consumes the event, so `ChannelFunction`'s boxed closure
    /// can actually run against its target channel.
    pub fn apply_owned(&self, event: Event, channels: &mut [channel::Data], clock: &Clock, stop_on_seq_halt: bool) {
        if event.event_type == EventType::ChannelFunction {
            if let crate::event::EventData::ChannelFunction(f) = event.data {
                if let Some(ch) = channels.iter_mut().find(|c| c.id == event.channel_id) {
                    f(ch);
                }
            }
            return;
        }
        self.apply(&event, channels, clock, stop_on_seq_halt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Data as ChannelData, Kind, PlayStatus, SampleVariant};

    #[test]
    fn full_queue_reports_capacity_exceeded_instead_of_blocking() {
        let d = Dispatcher::new(1, 1);
        d.push_ui_event(Event::key_press(1, 100)).unwrap();
        let err = d.push_ui_event(Event::key_press(1, 100)).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { queue: "ui_event" }));
    }

    #[test]
    fn drain_applies_targeted_event_to_the_right_channel() {
        let d = Dispatcher::new(8, 8);
        let mut channels = vec![ChannelData::new(4, Kind::Sample(SampleVariant::default()), 512)];
        d.push_ui_event(Event::key_press(4, 100)).unwrap();
        let clock = Clock::new(44100.0);
        d.drain_and_react(&mut channels, &clock, false);
        assert_eq!(channels[0].play_status(), PlayStatus::Play);
    }

    #[test]
    fn channel_function_runs_against_its_target_via_apply_owned() {
        let d = Dispatcher::new(8, 8);
        let mut channels = vec![ChannelData::new(4, Kind::Sample(SampleVariant::default()), 512)];
        let clock = Clock::new(44100.0);
        let ev = Event::channel_function(4, |ch| ch.name = "renamed".into());
        d.apply_owned(ev, &mut channels, &clock, false);
        assert_eq!(channels[0].name, "renamed");
    }
}
