//! External collaborator seams (§6): audio/MIDI I/O and the plugin host
//! are never implemented by the core itself, only called through these
//! traits. Concrete adapters (e.g. `cpal`) live behind feature flags.

use crate::error::Result;
use giada_midi::MidiEvent;

/// Drives the audio callback. A concrete implementation owns the actual
/// device stream and calls back into the engine's render function once per
/// block (§6).
pub trait AudioDriver {
    fn sample_rate(&self) -> u32;
    fn block_size(&self) -> usize;
    fn start(&mut self, render: Box<dyn FnMut(&mut [f32]) + Send>) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Sends/receives raw MIDI to/from external hardware or software ports.
pub trait MidiDriver {
    fn send(&mut self, event: MidiEvent) -> Result<()>;
    fn poll(&mut self) -> Vec<MidiEvent>;
}

/// The plugin host never has its internals modeled here (§6 Non-goal):
/// the core only needs to know whether a `PluginRef` is still valid and to
/// ask it to process a block in place.
pub trait PluginHost {
    fn process(&mut self, plugin: crate::channel::PluginRef, buffer: &mut [f32]) -> Result<()>;
}

#[cfg(feature = "cpal-driver")]
pub mod cpal_driver {
    use super::*;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::Stream;

    pub struct CpalAudioDriver {
        sample_rate: u32,
        block_size: usize,
        stream: Option<Stream>,
    }

    impl CpalAudioDriver {
        pub fn new(sample_rate: u32, block_size: usize) -> Self {
            Self {
                sample_rate,
                block_size,
                stream: None,
            }
        }
    }

    impl AudioDriver for CpalAudioDriver {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn block_size(&self) -> usize {
            self.block_size
        }

        fn start(&mut self, mut render: Box<dyn FnMut(&mut [f32]) + Send>) -> Result<()> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| crate::error::Error::InvalidConfig("no default output device".into()))?;
            let config = device
                .default_output_config()
                .map_err(|e| crate::error::Error::InvalidConfig(e.to_string()))?;

            let stream = device
                .build_output_stream(
                    &config.into(),
                    move |data: &mut [f32], _| render(data),
                    |err| tracing::error!(%err, "cpal stream error"),
                    None,
                )
                .map_err(|e| crate::error::Error::InvalidConfig(e.to_string()))?;
            stream
                .play()
                .map_err(|e| crate::error::Error::InvalidConfig(e.to_string()))?;
            self.stream = Some(stream);
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.stream = None;
            Ok(())
        }
    }
}
