//! Mixer (§4.9): sums every channel's per-block buffer down to the master
//! output, honoring mute/solo, and owns the input recording buffer used to
//! finalize a take (§11.2).

use crate::channel::Data as ChannelData;
use crate::config::{Conf, InputRecMode};
use crate::wave::Wave;

#[derive(Debug, Clone, Default)]
pub struct Mixer {
    pub master_volume: f32,
    rec_buffer: Vec<f32>,
    recording: bool,
}

impl Mixer {
    /// Sums `channels`' scratch buffers into `out`, applying volume/pan and
    /// the mute/solo rule (§4.9: a channel is audible iff not muted, and
    /// either nothing is soloed or it is itself soloed).
    pub fn render(&self, channels: &[ChannelData], out: &mut [f32]) {
        out.iter_mut().for_each(|s| *s = 0.0);
        let any_solo = channels.iter().any(|c| c.solo);
        for ch in channels {
            if ch.id == crate::id::ID_MASTER_OUT || ch.id == crate::id::ID_PREVIEW {
                continue;
            }
            if ch.should_mute_for_solo(any_solo) {
                continue;
            }
            let buf = ch.buffer.audio();
            for (o, s) in out.iter_mut().zip(buf.iter()) {
                *o += *s * ch.volume * ch.volume_i;
            }
        }
        out.iter_mut().for_each(|s| *s *= self.master_volume);
    }

    pub fn start_input_recording(&mut self) {
        self.rec_buffer.clear();
        self.recording = true;
    }

    pub fn feed_input(&mut self, block: &[f32]) {
        if self.recording {
            self.rec_buffer.extend_from_slice(block);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Stops capturing and returns a `Wave` built from what was recorded.
    /// In `LoopLocked` mode the capture is truncated/padded to `loop_frames`
    /// (§11.2); in `Free` mode it's returned exactly as captured.
    pub fn finish_input_recording(&mut self, conf: &Conf, loop_frames: u32, wave_id: crate::id::Id) -> Wave {
        self.recording = false;
        let mut frames = std::mem::take(&mut self.rec_buffer);
        if conf.input_rec_mode == InputRecMode::LoopLocked {
            frames.resize(loop_frames as usize, 0.0);
        }
        Wave {
            id: wave_id,
            path: format!("take-{wave_id}"),
            bits: 32,
            rate: conf.sample_rate as u32,
            channels: 1,
            frames,
            is_logical: true,
            is_edited: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Data as ChannelData, Kind, SampleVariant};

    fn channel_with_signal(id: u32, value: f32, mute: bool, solo: bool) -> ChannelData {
        let mut c = ChannelData::new(id, Kind::Sample(SampleVariant::default()), 4);
        c.mute = mute;
        c.solo = solo;
        c.buffer.audio_mut().iter_mut().for_each(|s| *s = value);
        c
    }

    #[test]
    fn render_sums_audible_channels() {
        let mixer = Mixer {
            master_volume: 1.0,
            ..Default::default()
        };
        let channels = vec![
            channel_with_signal(4, 0.1, false, false),
            channel_with_signal(5, 0.2, false, false),
        ];
        let mut out = vec![0.0; 4];
        mixer.render(&channels, &mut out);
        assert!((out[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn muted_channel_is_excluded() {
        let mixer = Mixer {
            master_volume: 1.0,
            ..Default::default()
        };
        let channels = vec![channel_with_signal(4, 0.5, true, false)];
        let mut out = vec![0.0; 4];
        mixer.render(&channels, &mut out);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn solo_excludes_non_soloed_channels() {
        let mixer = Mixer {
            master_volume: 1.0,
            ..Default::default()
        };
        let channels = vec![
            channel_with_signal(4, 0.5, false, true),
            channel_with_signal(5, 0.5, false, false),
        ];
        let mut out = vec![0.0; 4];
        mixer.render(&channels, &mut out);
        assert!((out[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn input_recording_round_trip_in_free_mode() {
        let mut mixer = Mixer::default();
        mixer.start_input_recording();
        mixer.feed_input(&[0.1, 0.2, 0.3]);
        let conf = Conf {
            input_rec_mode: InputRecMode::Free,
            ..Default::default()
        };
        let wave = mixer.finish_input_recording(&conf, 0, 99);
        assert_eq!(wave.frames, vec![0.1, 0.2, 0.3]);
        assert!(!mixer.is_recording());
    }

    #[test]
    fn input_recording_is_padded_to_loop_length_when_loop_locked() {
        let mut mixer = Mixer::default();
        mixer.start_input_recording();
        mixer.feed_input(&[0.1, 0.2]);
        let conf = Conf {
            input_rec_mode: InputRecMode::LoopLocked,
            ..Default::default()
        };
        let wave = mixer.finish_input_recording(&conf, 5, 99);
        assert_eq!(wave.frames.len(), 5);
    }
}
