//! Action recorder/store (§3 "Action", §4.10).
//!
//! A frame-indexed map of MIDI-like actions per channel, with doubly linked
//! siblings for paired NOTE_ON/NOTE_OFF. All editing operations are
//! non-realtime: they mutate the pending Layout and are followed by a
//! `Swapper::swap` by the caller (§4.11).

use crate::id::{Id, IdGenerator, ID_NONE};
use giada_midi::MidiEvent;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub id: Id,
    pub channel_id: Id,
    pub frame: u32,
    pub event: MidiEvent,
    pub prev_id: Id,
    pub next_id: Id,
}

impl Action {
    pub fn new(id: Id, channel_id: Id, frame: u32, event: MidiEvent) -> Self {
        Self {
            id,
            channel_id,
            frame,
            event,
            prev_id: ID_NONE,
            next_id: ID_NONE,
        }
    }
}

/// Frame-indexed ordered map of actions, keyed for O(log n) lookup and
/// ordered iteration by `frame` (§4.10).
#[derive(Debug, Default)]
pub struct ActionMap {
    by_frame: BTreeMap<u32, Vec<Action>>,
    ids: IdGenerator,
}

impl ActionMap {
    pub fn new() -> Self {
        Self {
            by_frame: BTreeMap::new(),
            ids: IdGenerator::starting_at(1),
        }
    }

    pub fn next_id(&self) -> Id {
        self.ids.next()
    }

    pub fn insert(&mut self, action: Action) {
        self.by_frame.entry(action.frame).or_default().push(action);
    }

    /// Links `a` and `b` as a NOTE_ON/NOTE_OFF pair (§4.10 SINGLE_PRESS
    /// recording). Must be called after both actions exist in the map.
    pub fn link_pair(&mut self, first_id: Id, second_id: Id) {
        self.with_action_mut(first_id, |a| a.next_id = second_id);
        self.with_action_mut(second_id, |a| a.prev_id = first_id);
    }

    pub fn get_actions_on_frame(&self, frame: u32) -> &[Action] {
        self.by_frame
            .get(&frame)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get(&self, id: Id) -> Option<&Action> {
        self.by_frame.values().flatten().find(|a| a.id == id)
    }

    pub fn has_actions(&self, channel_id: Id) -> bool {
        self.by_frame
            .values()
            .flatten()
            .any(|a| a.channel_id == channel_id)
    }

    pub fn for_each_action(&self) -> impl Iterator<Item = &Action> {
        self.by_frame.values().flatten()
    }

    pub fn clear_all(&mut self) {
        self.by_frame.clear();
    }

    pub fn clear_channel(&mut self, channel_id: Id) {
        self.retain(|a| a.channel_id != channel_id);
    }

    /// Removes an action by id. If it was linked to a sibling, the sibling's
    /// reciprocal pointer is cleared so the invariant `a.next_id != 0 =>
    /// a.next.prev_id == a.id` keeps holding (§8 scenario 6).
    pub fn delete_action(&mut self, id: Id) {
        let deleted = self.get(id).copied();
        self.retain(|a| a.id != id);
        if let Some(deleted) = deleted {
            if deleted.prev_id != ID_NONE {
                self.with_action_mut(deleted.prev_id, |a| a.next_id = ID_NONE);
            }
            if deleted.next_id != ID_NONE {
                self.with_action_mut(deleted.next_id, |a| a.prev_id = ID_NONE);
            }
        }
    }

    /// Rebuilds the map's frame keys via `f`, used for BPM/bar-count changes
    /// when `resize_recordings` is enabled (§4.10, §10.3).
    pub fn update_key_frames(&mut self, f: impl Fn(u32) -> u32) {
        let old = std::mem::take(&mut self.by_frame);
        for (_, actions) in old {
            for mut action in actions {
                action.frame = f(action.frame);
                self.insert(action);
            }
        }
    }

    /// Scans the whole map and drops any dangling prev/next pointer whose
    /// target no longer exists. Called after any structural mutation that
    /// doesn't already maintain the invariant itself (§4.10).
    pub fn resolve_links(&mut self) {
        let existing: std::collections::HashSet<Id> =
            self.by_frame.values().flatten().map(|a| a.id).collect();
        for actions in self.by_frame.values_mut() {
            for a in actions.iter_mut() {
                if a.prev_id != ID_NONE && !existing.contains(&a.prev_id) {
                    a.prev_id = ID_NONE;
                }
                if a.next_id != ID_NONE && !existing.contains(&a.next_id) {
                    a.next_id = ID_NONE;
                }
            }
        }
    }

    fn with_action_mut(&mut self, id: Id, f: impl FnOnce(&mut Action)) {
        for actions in self.by_frame.values_mut() {
            if let Some(a) = actions.iter_mut().find(|a| a.id == id) {
                f(a);
                return;
            }
        }
    }

    fn retain(&mut self, pred: impl Fn(&Action) -> bool) {
        for actions in self.by_frame.values_mut() {
            actions.retain(&pred);
        }
        self.by_frame.retain(|_, v| !v.is_empty());
    }
}

impl Clone for ActionMap {
    fn clone(&self) -> Self {
        Self {
            by_frame: self.by_frame.clone(),
            ids: IdGenerator::starting_at(self.ids.peek()),
        }
    }
}
