//! Patch (§6): a serializable snapshot of a `Layout`, independent of
//! sample rate. Loading rescales any frame-valued field (action frames,
//! sample begin/end/shift) from the file's rate to the engine's (§6).

use crate::action::{Action, ActionMap};
use crate::channel::{ChannelType, Data as ChannelData};
use crate::id::Id;
use crate::layout::Layout;
use giada_midi::MidiEventRaw;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchAction {
    pub id: Id,
    pub channel_id: Id,
    pub frame: u32,
    pub event: MidiEventRaw,
    pub prev_id: Id,
    pub next_id: Id,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatchChannelType {
    Master,
    Preview,
    Sample,
    Midi,
}

impl From<ChannelType> for PatchChannelType {
    fn from(t: ChannelType) -> Self {
        match t {
            ChannelType::Master => PatchChannelType::Master,
            ChannelType::Preview => PatchChannelType::Preview,
            ChannelType::Sample => PatchChannelType::Sample,
            ChannelType::Midi => PatchChannelType::Midi,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchChannel {
    pub id: Id,
    pub channel_type: PatchChannelType,
    pub column_id: Id,
    pub name: String,
    pub volume: f32,
    pub pan: f32,
    pub mute: bool,
    pub solo: bool,
    pub armed: bool,
    pub key: Option<u32>,
    pub wave_path: Option<String>,
    pub begin: u32,
    pub end: u32,
    pub shift: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub sample_rate: f64,
    pub bpm: f64,
    pub bars: u32,
    pub time_sig_num: u32,
    pub time_sig_den: u32,
    pub quantize: u32,
    pub channels: Vec<PatchChannel>,
    pub actions: Vec<PatchAction>,
}

impl Patch {
    pub fn from_layout(layout: &Layout) -> Self {
        let channels = layout
            .channels
            .iter()
            .filter(|c| c.id != crate::id::ID_PREVIEW)
            .map(patch_channel_of)
            .collect();
        let actions = layout
            .actions
            .for_each_action()
            .map(|a| PatchAction {
                id: a.id,
                channel_id: a.channel_id,
                frame: a.frame,
                event: a.event.into(),
                prev_id: a.prev_id,
                next_id: a.next_id,
            })
            .collect();
        Self {
            sample_rate: layout.clock.sample_rate,
            bpm: layout.clock.bpm,
            bars: layout.clock.bars,
            time_sig_num: layout.clock.time_sig_num,
            time_sig_den: layout.clock.time_sig_den,
            quantize: layout.clock.quantize,
            channels,
            actions,
        }
    }

    /// Rescales every frame-valued field in place for a target sample rate
    /// that differs from the one the patch was saved at (§6).
    pub fn rescale_for_rate(&mut self, target_rate: f64) {
        if self.sample_rate <= 0.0 || (self.sample_rate - target_rate).abs() < f64::EPSILON {
            return;
        }
        let ratio = target_rate / self.sample_rate;
        for ch in &mut self.channels {
            ch.begin = (ch.begin as f64 * ratio) as u32;
            ch.end = (ch.end as f64 * ratio) as u32;
            ch.shift = (ch.shift as f64 * ratio) as u32;
        }
        for action in &mut self.actions {
            action.frame = (action.frame as f64 * ratio) as u32;
        }
        self.sample_rate = target_rate;
    }

    pub fn restore_actions(&self) -> ActionMap {
        let mut map = ActionMap::new();
        for a in &self.actions {
            map.insert(Action {
                id: a.id,
                channel_id: a.channel_id,
                frame: a.frame,
                event: a.event.into(),
                prev_id: a.prev_id,
                next_id: a.next_id,
            });
        }
        map.resolve_links();
        map
    }
}

fn patch_channel_of(c: &ChannelData) -> PatchChannel {
    let (wave_path, begin, end, shift) = match c.kind.sample_player() {
        Some(p) => (
            p.wave.as_ref().map(|w| w.path.clone()),
            p.begin,
            p.end,
            p.shift,
        ),
        None => (None, 0, 0, 0),
    };
    PatchChannel {
        id: c.id,
        channel_type: c.channel_type().into(),
        column_id: c.column_id,
        name: c.name.clone(),
        volume: c.volume,
        pan: c.pan,
        mute: c.mute,
        solo: c.solo,
        armed: c.armed,
        key: c.key,
        wave_path,
        begin,
        end,
        shift,
    }
}
