//! Wave entity (§3) and the wave loader/writer external interface (§6).
//!
//! A Wave is owned by the Layout store, not by a channel: it's retained
//! while any sample player references it and removed only after a Swapper
//! publish that no longer references it (§3 invariant).

use crate::error::{Error, Result};
use crate::id::Id;

/// Immutable-after-construction audio buffer. `frames` is interleaved by
/// `channels`.
#[derive(Debug, Clone)]
pub struct Wave {
    pub id: Id,
    pub path: String,
    pub bits: u16,
    pub rate: u32,
    pub channels: u16,
    pub frames: Vec<f32>,
    /// Synthesized in memory (e.g. a finalized input recording), not backed
    /// by a file on disk.
    pub is_logical: bool,
    pub is_edited: bool,
}

impl Wave {
    pub fn create_empty(id: Id, frame_count: usize, channels: u16, rate: u32, name: &str) -> Self {
        Self {
            id,
            path: name.to_string(),
            bits: 32,
            rate,
            channels,
            frames: vec![0.0; frame_count * channels as usize],
            is_logical: true,
            is_edited: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.frames.len() / self.channels as usize
        }
    }

    /// Mixes `other` into `self` starting at frame 0 (overdub onto an
    /// existing take, §4.9 / §11.2). Both waves must share channel count.
    pub fn mix_in(&mut self, other: &Wave) {
        for (dst, src) in self.frames.iter_mut().zip(other.frames.iter()) {
            *dst += *src;
        }
        self.is_edited = true;
    }

    /// Rescales begin/end/shift-style frame offsets when the wave's sample
    /// rate differs from the engine's (§6 patch loading: "scale begin/end/
    /// shift by file_rate / current_rate").
    pub fn rescale_frame(&self, frame: u32, current_rate: f64) -> u32 {
        if self.rate as f64 == current_rate || current_rate == 0.0 {
            return frame;
        }
        ((frame as f64) * (self.rate as f64) / current_rate) as u32
    }
}

/// Quality setting the wave loader's resampler is asked to use when the
/// source file's rate doesn't match the engine's (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleQuality {
    Fast,
    Balanced,
    Best,
}

/// External collaborator: decodes/encodes wave files (§6). The core never
/// parses a file format itself — this trait is the seam a concrete decoder
/// (e.g. a `hound`-backed WAV implementation, gated behind the `wav`
/// feature) plugs into.
pub trait WaveLoader {
    fn create_from_file(
        &self,
        path: &str,
        target_rate: u32,
        quality: ResampleQuality,
    ) -> Result<Wave>;

    fn write_to_file(&self, wave: &Wave, path: &str) -> Result<()>;
}

#[cfg(feature = "wav")]
pub struct HoundWaveLoader;

#[cfg(feature = "wav")]
impl WaveLoader for HoundWaveLoader {
    fn create_from_file(
        &self,
        path: &str,
        target_rate: u32,
        _quality: ResampleQuality,
    ) -> Result<Wave> {
        if path.len() > 4096 {
            return Err(Error::WaveLoadPathTooLong(path.len()));
        }
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let frames: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        if frames.is_empty() {
            return Err(Error::WaveLoadNoData);
        }
        Ok(Wave {
            id: 0,
            path: path.to_string(),
            bits: spec.bits_per_sample,
            rate: target_rate.max(spec.sample_rate),
            channels: spec.channels,
            frames,
            is_logical: false,
            is_edited: false,
        })
    }

    fn write_to_file(&self, wave: &Wave, path: &str) -> Result<()> {
        let spec = hound::WavSpec {
            channels: wave.channels,
            sample_rate: wave.rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &wave.frames {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_empty_has_requested_frame_count() {
        let w = Wave::create_empty(1, 44100, 2, 44100, "TAKE-1.wav");
        assert_eq!(w.frame_count(), 44100);
        assert!(w.is_logical);
    }

    #[test]
    fn mix_in_sums_samples() {
        let mut a = Wave::create_empty(1, 4, 1, 44100, "a");
        a.frames = vec![0.1, 0.2, 0.3, 0.4];
        let mut b = Wave::create_empty(2, 4, 1, 44100, "b");
        b.frames = vec![0.1, 0.1, 0.1, 0.1];
        a.mix_in(&b);
        assert!((a.frames[0] - 0.2).abs() < 1e-6);
        assert!(a.is_edited);
    }

    #[test]
    fn rescale_frame_scales_by_rate_ratio() {
        let w = Wave {
            id: 1,
            path: String::new(),
            bits: 16,
            rate: 22050,
            channels: 1,
            frames: vec![],
            is_logical: false,
            is_edited: false,
        };
        assert_eq!(w.rescale_frame(1000, 44100.0), 500);
    }
}
