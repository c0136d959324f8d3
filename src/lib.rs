//! Giada: a real-time loop-based audio/MIDI workstation core.
//!
//! This crate is a thin facade over [`giada_core`]: the engine itself, its
//! channel model, event pipeline and RCU-published `Layout` all live there.
//! `giada-midi` supplies the shared MIDI wire types. This crate just
//! re-exports the pieces an embedder needs without reaching into the
//! sub-crates directly.

pub use giada_core::{
    action, channel, channel_manager, clock, config, dispatcher, error, event, external, id,
    layout, lockfree, midi, mixer, patch, quantizer, sequencer, swapper, wave, Error, Layout,
    Result, SwapType, Swapper,
};
pub use giada_midi as midi_wire;
