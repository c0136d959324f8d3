//! Per-block sample playback advance (§4.3 step 6): copies wave frames into
//! the channel's scratch buffer and resolves end-of-region transitions
//! (loop wrap, one-shot stop, `Ending` -> `Off`).

use crate::channel::data::{Data, Kind, PlayStatus};
use crate::channel::sample_player::Mode;
use crate::clock::Clock;

pub fn advance(channel: &Data, clock: &Clock, block_start: u32, block_size: u32) {
    if !matches!(channel.kind, Kind::Sample(_) | Kind::Preview(_)) {
        return;
    }

    channel
        .quantizer
        .lock()
        .unwrap()
        .advance(clock, block_start, block_size);

    let status = channel.play_status();
    if status == PlayStatus::Off || status == PlayStatus::Wait {
        channel.buffer.clear();
        return;
    }

    let player = channel
        .kind
        .sample_player()
        .expect("Sample/Preview channel always carries a sample_player");
    let out = channel.buffer.audio_mut();
    out.resize(block_size as usize, 0.0);

    let region_len = player.region_len();
    let Some(wave) = player.wave.as_ref().filter(|_| region_len > 0) else {
        out.iter_mut().for_each(|s| *s = 0.0);
        return;
    };

    let mut cursor = channel.state.tracker.get_relaxed();
    let mut reached_end = false;
    for sample in out.iter_mut() {
        let src_frame = (player.begin + cursor) as usize;
        *sample = wave.frames.get(src_frame).copied().unwrap_or(0.0) * channel.volume;
        cursor += 1;
        if cursor >= region_len {
            cursor = 0;
            reached_end = true;
        }
    }
    channel.state.tracker.set(cursor);

    if reached_end {
        let one_shot = !player.mode().is_loop() || matches!(player.mode(), Mode::LoopOnce | Mode::LoopOnceBar);
        if one_shot || status == PlayStatus::Ending {
            channel.set_play_status(PlayStatus::Off);
            channel.state.tracker.set(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::data::SampleVariant;
    use crate::channel::sample_player::{ModeSlot, SamplePlayer};
    use crate::wave::Wave;
    use std::sync::Arc;

    fn channel_with_wave(mode: Mode, frame_count: usize) -> Data {
        let wave = Arc::new(Wave {
            id: 1,
            path: String::new(),
            bits: 32,
            rate: 44100,
            channels: 1,
            frames: (0..frame_count).map(|i| i as f32).collect(),
            is_logical: true,
            is_edited: false,
        });
        let mut player = SamplePlayer::new(wave);
        player.mode = ModeSlot(mode);
        let mut d = Data::new(1, Kind::Sample(SampleVariant::default()), 4);
        if let Kind::Sample(s) = &mut d.kind {
            s.sample_player = player;
        }
        d.set_play_status(PlayStatus::Play);
        d
    }

    #[test]
    fn advance_copies_wave_frames_scaled_by_volume() {
        let ch = channel_with_wave(Mode::LoopBasic, 100);
        let clock = Clock::new(44100.0);
        advance(&ch, &clock, 0, 4);
        assert_eq!(ch.buffer.audio(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn single_basic_stops_after_one_pass_through_the_region() {
        let ch = channel_with_wave(Mode::SingleBasic, 4);
        let clock = Clock::new(44100.0);
        advance(&ch, &clock, 0, 4);
        assert_eq!(ch.play_status(), PlayStatus::Off);
        assert_eq!(ch.state.tracker.get_relaxed(), 0);
    }

    #[test]
    fn loop_basic_wraps_and_keeps_playing() {
        let ch = channel_with_wave(Mode::LoopBasic, 4);
        let clock = Clock::new(44100.0);
        advance(&ch, &clock, 0, 6);
        assert_eq!(ch.play_status(), PlayStatus::Play);
        assert_eq!(ch.state.tracker.get_relaxed(), 2);
    }

    #[test]
    fn ending_status_resolves_to_off_at_the_next_loop_point() {
        let ch = channel_with_wave(Mode::LoopBasic, 4);
        ch.set_play_status(PlayStatus::Ending);
        let clock = Clock::new(44100.0);
        advance(&ch, &clock, 0, 4);
        assert_eq!(ch.play_status(), PlayStatus::Off);
    }
}
