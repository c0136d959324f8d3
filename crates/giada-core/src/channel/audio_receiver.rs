//! Audio input receiver (§4.4): per-channel input-monitoring and overdub
//! controls for live audio recording onto a sample channel.

#[derive(Debug, Clone, Copy)]
pub struct AudioReceiver {
    /// Route the live input signal straight to this channel's output while
    /// armed, so the performer can hear what's being recorded.
    pub input_monitor: bool,
    /// When overdubbing onto an existing take, protect the previous take's
    /// gain from being summed above unity (§4.9 mixer `rec_buffer`).
    pub overdub_protection: bool,
}

impl Default for AudioReceiver {
    fn default() -> Self {
        Self {
            input_monitor: false,
            overdub_protection: true,
        }
    }
}
