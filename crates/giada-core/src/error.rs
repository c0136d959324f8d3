//! Error taxonomy for giada-core (§7).
//!
//! The audio thread never surfaces errors: every audio-thread-reachable
//! function has a total signature and degrades to silence/no-op internally
//! (§10.2). This enum is for the control thread, the event dispatcher, and
//! the non-realtime channel manager / action recorder / patch layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("wave load failed: wrong data")]
    WaveLoadWrongData,

    #[error("wave load failed: I/O error: {0}")]
    WaveLoadIo(String),

    #[error("wave load failed: path too long: {0}")]
    WaveLoadPathTooLong(usize),

    #[error("wave load failed: no data")]
    WaveLoadNoData,

    #[error("event queue '{queue}' at capacity, event dropped")]
    CapacityExceeded { queue: &'static str },

    #[error("invariant violated: {what}")]
    InvariantViolation { what: String },

    #[error("operation rejected: channel {channel_id} is the wrong type for this operation")]
    StateRejected { channel_id: u32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown channel id: {0}")]
    UnknownChannel(u32),

    #[error("unknown wave id: {0}")]
    UnknownWave(u32),

    #[cfg(feature = "wav")]
    #[error("WAV I/O error: {0}")]
    Hound(#[from] hound::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Fires an [`Error::InvariantViolation`] the way §7 prescribes: abort in
/// debug builds (a real programmer error should stop the world before it
/// propagates into the audio thread's next block), log-and-continue in
/// release. Never called from the audio thread itself — callers there use
/// `debug_assert!` directly and fall back to silence.
#[track_caller]
pub fn invariant_violation(what: impl Into<String>) -> Error {
    let what = what.into();
    tracing::error!(%what, "invariant violation");
    #[cfg(debug_assertions)]
    panic!("invariant violation: {what}");
    #[cfg(not(debug_assertions))]
    Error::InvariantViolation { what }
}
