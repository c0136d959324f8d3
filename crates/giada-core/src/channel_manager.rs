//! Channel manager (§4.11): the non-realtime surface for creating,
//! cloning, deleting and configuring channels. Every method here mutates
//! the Swapper's pending Layout and leaves publishing it to the caller, so
//! several edits can be batched into one swap (§4.1).

use crate::channel::{ChannelType, Data as ChannelData, Kind};
use crate::error::{Error, Result};
use crate::id::Id;
use crate::layout::Layout;
use crate::swapper::Swapper;
use crate::wave::Wave;
use std::sync::Arc;

pub struct ChannelManager<'a> {
    swapper: &'a Swapper<Layout>,
}

impl<'a> ChannelManager<'a> {
    pub fn new(swapper: &'a Swapper<Layout>) -> Self {
        Self { swapper }
    }

    fn layout(&self) -> &mut Layout {
        self.swapper.get()
    }

    pub fn add_sample_channel(&self, column_id: Id) -> Id {
        let layout = self.layout();
        let id = layout.next_channel_id();
        let block_size = layout.conf.block_size;
        let mut ch = ChannelData::new(id, Kind::Sample(Default::default()), block_size);
        ch.column_id = column_id;
        layout.add_channel(ch);
        id
    }

    pub fn add_midi_channel(&self, column_id: Id) -> Id {
        let layout = self.layout();
        let id = layout.next_channel_id();
        let block_size = layout.conf.block_size;
        let mut ch = ChannelData::new(id, Kind::Midi(Default::default()), block_size);
        ch.column_id = column_id;
        layout.add_channel(ch);
        id
    }

    /// Duplicates a channel's configuration under a fresh id and a fresh
    /// `State`/`Buffer` pair (a clone must not alias the source's RT state,
    /// §3).
    pub fn clone_channel(&self, source_id: Id) -> Result<Id> {
        let layout = self.layout();
        let block_size = layout.conf.block_size;
        let source = layout
            .channel(source_id)
            .ok_or(Error::UnknownChannel(source_id))?;
        let new_id = layout.next_channel_id();
        let mut cloned = ChannelData::new(new_id, source.kind.clone(), block_size);
        cloned.column_id = source.column_id;
        cloned.volume = source.volume;
        cloned.pan = source.pan;
        cloned.name = format!("{} (copy)", source.name);
        layout.add_channel(cloned);
        Ok(new_id)
    }

    pub fn free_channel(&self, id: Id) -> Result<()> {
        let layout = self.layout();
        if layout.channel(id).is_none() {
            return Err(Error::UnknownChannel(id));
        }
        if matches!(layout.channel(id).unwrap().channel_type(), ChannelType::Master) {
            return Err(Error::StateRejected { channel_id: id });
        }
        layout.remove_channel(id);
        Ok(())
    }

    /// Attaches `wave` to a sample/preview channel, replacing any previous
    /// one (§4.3).
    pub fn load_channel(&self, id: Id, wave: Arc<Wave>) -> Result<()> {
        let layout = self.layout();
        let ch = layout.channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        let player = ch
            .kind
            .sample_player_mut()
            .ok_or(Error::StateRejected { channel_id: id })?;
        let end = wave.frame_count() as u32;
        player.wave = Some(wave);
        player.begin = 0;
        player.end = end;
        Ok(())
    }

    pub fn set_volume(&self, id: Id, volume: f32) -> Result<()> {
        let ch = self.layout().channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        ch.volume = volume.clamp(0.0, 2.0);
        Ok(())
    }

    pub fn set_pan(&self, id: Id, pan: f32) -> Result<()> {
        let ch = self.layout().channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        ch.pan = pan.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_mute(&self, id: Id, mute: bool) -> Result<()> {
        let ch = self.layout().channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        ch.mute = mute;
        Ok(())
    }

    pub fn set_solo(&self, id: Id, solo: bool) -> Result<()> {
        let ch = self.layout().channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        ch.solo = solo;
        Ok(())
    }

    pub fn set_armed(&self, id: Id, armed: bool) -> Result<()> {
        let ch = self.layout().channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        ch.armed = armed;
        Ok(())
    }

    pub fn set_name(&self, id: Id, name: impl Into<String>) -> Result<()> {
        let ch = self.layout().channel_mut(id).ok_or(Error::UnknownChannel(id))?;
        ch.name = name.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Conf;

    fn fresh_swapper() -> Swapper<Layout> {
        Swapper::new(Layout::new(Conf::default()))
    }

    #[test]
    fn add_sample_channel_assigns_a_fresh_user_id() {
        let swapper = fresh_swapper();
        let mgr = ChannelManager::new(&swapper);
        let id = mgr.add_sample_channel(0);
        assert_eq!(id, crate::id::FIRST_USER_ID);
        assert!(swapper.get().channel(id).is_some());
    }

    #[test]
    fn clone_channel_gets_independent_state() {
        let swapper = fresh_swapper();
        let mgr = ChannelManager::new(&swapper);
        let id = mgr.add_sample_channel(0);
        let clone_id = mgr.clone_channel(id).unwrap();

        let layout = swapper.get();
        let original = layout.channel(id).unwrap();
        let cloned = layout.channel(clone_id).unwrap();
        assert!(!Arc::ptr_eq(&original.state, &cloned.state));
    }

    #[test]
    fn free_channel_rejects_master_out() {
        let swapper = fresh_swapper();
        let mgr = ChannelManager::new(&swapper);
        let err = mgr.free_channel(crate::id::ID_MASTER_OUT).unwrap_err();
        assert!(matches!(err, Error::StateRejected { .. }));
    }

    #[test]
    fn load_channel_rejects_midi_channels() {
        let swapper = fresh_swapper();
        let mgr = ChannelManager::new(&swapper);
        let id = mgr.add_midi_channel(0);
        let wave = Arc::new(Wave::create_empty(1, 100, 1, 44100, "w"));
        let err = mgr.load_channel(id, wave).unwrap_err();
        assert!(matches!(err, Error::StateRejected { .. }));
    }

    #[test]
    fn set_volume_clamps_to_valid_range() {
        let swapper = fresh_swapper();
        let mgr = ChannelManager::new(&swapper);
        let id = mgr.add_sample_channel(0);
        mgr.set_volume(id, 5.0).unwrap();
        assert_eq!(swapper.get().channel(id).unwrap().volume, 2.0);
    }
}
