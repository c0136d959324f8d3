//! Stable 32-bit identifiers (§3). `0` is reserved as "none"; `1..=3` are
//! pre-assigned to the three internal channels.

use std::sync::atomic::{AtomicU32, Ordering};

pub type Id = u32;

pub const ID_NONE: Id = 0;
pub const ID_MASTER_OUT: Id = 1;
pub const ID_MASTER_IN: Id = 2;
pub const ID_PREVIEW: Id = 3;

pub const FIRST_USER_ID: Id = 4;

/// Monotonic ID allocator shared by the channel manager and action recorder.
/// Never reused within a session, so a stale `prev_id`/`next_id` pointer can
/// never silently resolve to an unrelated, newer entity.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU32,
}

impl IdGenerator {
    pub fn starting_at(first: Id) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    pub fn next(&self) -> Id {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Reads the next id that would be handed out, without consuming it.
    pub fn peek(&self) -> Id {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::starting_at(FIRST_USER_ID)
    }
}

impl Clone for IdGenerator {
    /// A clone continues the same sequence rather than resetting it, so a
    /// Layout clone never hands out an id already used by its source.
    fn clone(&self) -> Self {
        Self::starting_at(self.peek())
    }
}
