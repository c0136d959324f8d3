//! Sample channel press/release/kill reaction logic (§4.3, §4.6).
//!
//! `react` is the non-realtime-looking but audio-thread-safe entry point
//! the dispatcher calls once per relevant `Event`; it only touches the
//! channel's atomic `State` and its `Quantizer`, never the Layout itself,
//! so it's safe to run straight off the drained event queue (§4.6).

use crate::channel::data::{Data, Kind, PlayStatus};
use crate::channel::sample_player::Mode;
use crate::clock::Clock;
use crate::event::{Event, EventType};

fn mode_of(channel: &Data) -> Mode {
    channel
        .kind
        .sample_player()
        .map(|p| p.mode())
        .unwrap_or(Mode::SingleBasic)
}

/// Begins playback, quantizing the actual state flip if the clock calls
/// for it (§4.2): the channel sits in `Wait` until the quantizer fires.
fn start_(channel: &Data, clock: &Clock) {
    if clock.can_quantize() {
        channel.set_play_status(PlayStatus::Wait);
        let state = channel.state.clone();
        channel.quantizer.lock().unwrap().trigger(
            channel.id,
            Box::new(move |_delta| {
                state.tracker.set(0);
                state.play_status.set(PlayStatus::Play);
            }),
        );
    } else {
        channel.state.tracker.set(0);
        channel.set_play_status(PlayStatus::Play);
    }
}

/// Stops playback. Loop modes finish the current iteration (`Ending`,
/// resolved by `sample_advancer` at the next loop wrap); non-loop modes
/// stop immediately.
fn stop_(channel: &Data) {
    if mode_of(channel).is_loop() {
        channel.set_play_status(PlayStatus::Ending);
    } else {
        channel.set_play_status(PlayStatus::Off);
        channel.state.tracker.set(0);
    }
}

fn press_(channel: &Data, clock: &Clock) {
    match channel.play_status() {
        PlayStatus::Off => start_(channel, clock),
        PlayStatus::Wait => {
            // Cancel a still-pending quantized start.
            channel.set_play_status(PlayStatus::Off);
            channel.quantizer.lock().unwrap().clear();
        }
        PlayStatus::Play | PlayStatus::Ending => {
            let mode = mode_of(channel);
            if mode.is_single_press() {
                // Handled on release instead.
            } else if mode.is_loop() {
                if mode == Mode::LoopRepeat {
                    channel.state.tracker.set(0);
                } else {
                    stop_(channel);
                }
            } else {
                // SINGLE_BASIC / SINGLE_RETRIG: retrigger from the top.
                channel.state.tracker.set(0);
                channel.set_play_status(PlayStatus::Play);
            }
        }
    }
}

fn release_(channel: &Data) {
    if mode_of(channel).is_single_press() && channel.play_status() == PlayStatus::Play {
        stop_(channel);
    }
}

fn kill_(channel: &Data) {
    channel.quantizer.lock().unwrap().clear();
    channel.state.tracker.set(0);
    channel.set_play_status(PlayStatus::Off);
}

/// Reaction to a sequencer stop (`SEQUENCER_STOP`, §4.8) broadcast: honors
/// `chans_stop_on_seq_halt` (§10.3).
fn on_stop_by_seq_(channel: &Data, stop_on_seq_halt: bool) {
    if stop_on_seq_halt && channel.play_status() != PlayStatus::Off {
        kill_(channel);
    }
}

fn toggle_read_actions_(channel: &mut Data) {
    if channel.has_actions {
        channel.read_actions = !channel.read_actions;
    }
}

/// Resets the playback cursor to the top of the loop, used when the
/// sequencer rewinds (`REWIND`, §4.8); only meaningful for loop modes.
fn rewind_(channel: &Data) {
    if mode_of(channel).is_loop() && channel.play_status() != PlayStatus::Off {
        channel.state.tracker.set(0);
    }
}

/// Only `Sample`/`Preview` channels run this FSM; `Master`/`Midi` are
/// handled elsewhere (mixer passthrough, `midi::controller` respectively).
pub fn react(channel: &mut Data, event: &Event, clock: &Clock, stop_on_seq_halt: bool) {
    if !matches!(channel.kind, Kind::Sample(_) | Kind::Preview(_)) {
        return;
    }
    match event.event_type {
        EventType::KeyPress => press_(channel, clock),
        EventType::KeyRelease => release_(channel),
        EventType::KeyKill => kill_(channel),
        EventType::SequencerStop => on_stop_by_seq_(channel, stop_on_seq_halt),
        EventType::ChannelToggleReadActions => toggle_read_actions_(channel),
        EventType::Rewind => rewind_(channel),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::data::SampleVariant;
    use crate::channel::sample_player::{ModeSlot, SamplePlayer};
    use crate::id::ID_NONE;

    fn sample_channel(mode: Mode) -> Data {
        let mut d = Data::new(10, Kind::Sample(SampleVariant::default()), 512);
        if let Kind::Sample(s) = &mut d.kind {
            s.sample_player.mode = ModeSlot(mode);
        }
        d
    }

    fn unquantized_clock() -> Clock {
        Clock::new(44100.0)
    }

    #[test]
    fn press_while_off_starts_playing_immediately_without_quantize() {
        let mut ch = sample_channel(Mode::SingleBasic);
        let clock = unquantized_clock();
        let ev = Event::key_press(ch.id, 100);
        react(&mut ch, &ev, &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Play);
    }

    #[test]
    fn press_while_off_with_quantize_enters_wait_then_quantizer_flips_to_play() {
        let mut ch = sample_channel(Mode::SingleBasic);
        let mut clock = unquantized_clock();
        clock.quantize = 1;
        clock.set_running(true);

        react(&mut ch, &Event::key_press(ch.id, 100), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Wait);
        assert!(ch.quantizer.lock().unwrap().is_pending(ch.id));

        ch.quantizer.lock().unwrap().advance(&clock, 0, clock.frames_in_beat() + 1);
        assert_eq!(ch.play_status(), PlayStatus::Play);
    }

    #[test]
    fn single_press_mode_stops_on_release_not_on_second_press() {
        let mut ch = sample_channel(Mode::SinglePress);
        let clock = unquantized_clock();
        react(&mut ch, &Event::key_press(ch.id, 100), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Play);

        react(&mut ch, &Event::key_press(ch.id, 100), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Play, "second press is a no-op mid-hold");

        react(&mut ch, &Event::key_release(ch.id), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Off);
    }

    #[test]
    fn loop_basic_press_while_playing_enters_ending_not_off() {
        let mut ch = sample_channel(Mode::LoopBasic);
        let clock = unquantized_clock();
        ch.set_play_status(PlayStatus::Play);
        react(&mut ch, &Event::key_press(ch.id, 100), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Ending);
    }

    #[test]
    fn kill_clears_pending_quantizer_and_tracker() {
        let mut ch = sample_channel(Mode::SingleBasic);
        let mut clock = unquantized_clock();
        clock.quantize = 1;
        clock.set_running(true);
        react(&mut ch, &Event::key_press(ch.id, 100), &clock, false);
        assert!(ch.quantizer.lock().unwrap().is_pending(ch.id));

        react(&mut ch, &Event::key_kill(ch.id), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Off);
        assert!(!ch.quantizer.lock().unwrap().is_pending(ch.id));
        assert_eq!(ch.state.tracker.get_relaxed(), 0);
    }

    #[test]
    fn stop_by_seq_is_a_noop_when_flag_disabled() {
        let mut ch = sample_channel(Mode::LoopBasic);
        ch.set_play_status(PlayStatus::Play);
        let clock = unquantized_clock();
        react(&mut ch, &Event::new(EventType::SequencerStop, ID_NONE), &clock, false);
        assert_eq!(ch.play_status(), PlayStatus::Play);
    }

    #[test]
    fn toggle_read_actions_only_applies_when_channel_has_actions() {
        let mut ch = sample_channel(Mode::LoopBasic);
        let clock = unquantized_clock();
        react(&mut ch, &Event::new(EventType::ChannelToggleReadActions, ch.id), &clock, false);
        assert!(!ch.read_actions);

        ch.has_actions = true;
        react(&mut ch, &Event::new(EventType::ChannelToggleReadActions, ch.id), &clock, false);
        assert!(ch.read_actions);
    }
}
