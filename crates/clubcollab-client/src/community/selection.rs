//! Current club/channel selection.
//!
//! Only ids are stored.  Accessors resolve them against the live club list,
//! and every commit reconciles them, so a selection can go empty but never
//! points at something that no longer exists.

use clubcollab_shared::types::{ChannelId, ClubId};
use clubcollab_store::{Channel, Club};
use tracing::debug;

use super::CommunityStore;

impl CommunityStore {
    /// Select a club and its first channel.  `None`, or an unknown id, clears
    /// the selection.
    pub fn select_club(&mut self, club_id: Option<ClubId>) {
        let (club, channel) = match club_id.and_then(|id| self.club(id)) {
            Some(club) => (Some(club.id), club.channels.first().map(|ch| ch.id)),
            None => (None, None),
        };
        self.selected_club = club;
        self.selected_channel = channel;

        debug!(
            club = ?self.selected_club,
            channel = ?self.selected_channel,
            "club selected"
        );
    }

    /// Select a channel of the selected club.  Clears the channel selection
    /// when nothing is selected or the channel is not part of that club.
    pub fn select_channel(&mut self, channel_id: Option<ChannelId>) {
        self.selected_channel = match (channel_id, self.selected_club()) {
            (Some(id), Some(club)) => club.channel(id).map(|ch| ch.id),
            _ => None,
        };

        debug!(channel = ?self.selected_channel, "channel selected");
    }

    pub fn selected_club(&self) -> Option<&Club> {
        self.selected_club.and_then(|id| self.club(id))
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        let club = self.selected_club()?;
        self.selected_channel.and_then(|id| club.channel(id))
    }

    pub(super) fn clear_selection(&mut self) {
        self.selected_club = None;
        self.selected_channel = None;
    }

    /// Drop selected ids that no longer resolve against the club list.
    pub(super) fn reconcile_selection(&mut self) {
        let Some(club) = self.selected_club() else {
            self.clear_selection();
            return;
        };
        let keep_channel = self
            .selected_channel
            .is_some_and(|id| club.channel(id).is_some());
        if !keep_channel {
            self.selected_channel = None;
        }
    }
}
