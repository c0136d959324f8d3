//! The channel model (§3, §4.3-§4.5): value type, RT-shared state, and the
//! react/advance functions that make up a channel's playback FSM.

pub mod action_recorder;
pub mod audio_receiver;
pub mod data;
pub mod sample_advancer;
pub mod sample_player;
pub mod sample_reactor;

pub use data::{
    Buffer, ChannelType, Data, Kind, MidiVariant, PlayStatus, PluginRef, RecStatus, SampleVariant,
    State,
};
pub use sample_advancer::advance;
pub use sample_reactor::react;
