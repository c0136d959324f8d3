//! Sequencer (§4.8): advances the clock each block and emits the broadcast
//! events (`FirstBeat`, `Bar`, `Rewind`, `Actions`) that drive channels and
//! the action map.

use crate::action::ActionMap;
use crate::clock::Clock;
use crate::event::{Event, EventType};
use crate::id::ID_NONE;

/// Produces the events for one audio block, in the order the dispatcher
/// should apply them. `block_start` is the clock frame at the start of the
/// block, before `clock.advance` is called.
pub fn advance(clock: &Clock, actions: &ActionMap, block_start: u32, block_size: u32) -> Vec<Event> {
    let mut events = Vec::new();
    if !clock.is_running() {
        return events;
    }

    if block_start == 0 {
        events.push(Event::new(EventType::FirstBeat, ID_NONE));
    }

    let frames_in_beat = clock.frames_in_beat();
    if frames_in_beat > 0 && block_start % frames_in_beat < block_size {
        events.push(Event::new(EventType::Bar, ID_NONE).with_delta(block_start % frames_in_beat));
    }

    for action in actions.for_each_action() {
        if action.frame >= block_start && action.frame < block_start + block_size {
            events.push(
                Event::new(EventType::Action, action.channel_id)
                    .with_delta(action.frame - block_start)
                    .with_data(crate::event::EventData::Action(*action)),
            );
        }
    }

    let wrapped = clock.advance(block_size);
    if wrapped {
        events.push(Event::new(EventType::Rewind, ID_NONE));
    }

    events
}
