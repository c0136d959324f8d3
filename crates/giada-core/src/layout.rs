//! The Layout: the single aggregate published through a `Swapper` (§4.1).
//!
//! Every control-thread mutation (adding a channel, changing BPM, recording
//! an action) happens on `Swapper::get()`'s pending copy and becomes visible
//! to the audio thread only after `Swapper::swap`.

use crate::action::ActionMap;
use crate::channel::{self, Data as ChannelData};
use crate::clock::Clock;
use crate::config::Conf;
use crate::id::{Id, IdGenerator};
use crate::mixer::Mixer;

#[derive(Debug, Clone)]
pub struct Layout {
    pub conf: Conf,
    pub clock: Clock,
    pub mixer: Mixer,
    pub actions: ActionMap,
    pub channels: Vec<ChannelData>,
    channel_ids: IdGenerator,
}

impl Layout {
    pub fn new(conf: Conf) -> Self {
        let clock = Clock::new(conf.sample_rate);
        let block_size = conf.block_size;
        let mut layout = Self {
            conf,
            clock,
            mixer: Mixer::default(),
            actions: ActionMap::new(),
            channels: Vec::new(),
            channel_ids: IdGenerator::default(),
        };
        layout.channels.push(ChannelData::new(
            crate::id::ID_MASTER_OUT,
            channel::Kind::Master,
            block_size,
        ));
        layout.channels.push(ChannelData::new(
            crate::id::ID_PREVIEW,
            channel::Kind::Preview(Default::default()),
            block_size,
        ));
        layout
    }

    pub fn next_channel_id(&self) -> Id {
        self.channel_ids.next()
    }

    pub fn channel(&self, id: Id) -> Option<&ChannelData> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channel_mut(&mut self, id: Id) -> Option<&mut ChannelData> {
        self.channels.iter_mut().find(|c| c.id == id)
    }

    pub fn add_channel(&mut self, channel: ChannelData) {
        self.channels.push(channel);
    }

    pub fn remove_channel(&mut self, id: Id) {
        self.channels.retain(|c| c.id != id);
        self.actions.clear_channel(id);
    }

    pub fn master_out(&self) -> &ChannelData {
        self.channel(crate::id::ID_MASTER_OUT)
            .expect("master-out channel always present")
    }

    pub fn any_solo_active(&self) -> bool {
        self.channels.iter().any(|c| c.solo)
    }

    /// Rebuilds the action map's frame keys after a BPM/time-signature
    /// change, only when `resize_recordings` is set (§4.10, §10.3).
    pub fn resize_recordings_if_enabled(&mut self, old_frames_in_beat: u32) {
        if !self.conf.resize_recordings || old_frames_in_beat == 0 {
            return;
        }
        let new_frames_in_beat = self.clock.frames_in_beat();
        self.actions
            .update_key_frames(|f| f * new_frames_in_beat / old_frames_in_beat);
    }
}
