use chrono::Utc;
use clubcollab_shared::types::{ChannelId, ClubId, Role, UserId};
use clubcollab_store::{Channel, KvStore, User};
use tracing::info;

use super::{channel_position, club_index, require_actor, CommunityStore};
use crate::error::{ClientError, Result};

/// Partial channel update.  `None` leaves a field as it is.
///
/// Making a channel public drops its allow-list; an allow-list given for a
/// channel that ends up public is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub allowed_members: Option<Vec<UserId>>,
}

fn can_manage_channels(role: Option<Role>) -> bool {
    role.is_some_and(Role::can_manage_channels)
}

impl CommunityStore {
    /// Add a channel to a club.  Requires an admin or moderator of that club.
    /// The allow-list is kept only for private channels and is not checked
    /// against the member list.
    #[allow(clippy::too_many_arguments)]
    pub fn create_channel(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        club_id: ClubId,
        name: &str,
        description: &str,
        is_private: bool,
        allowed_members: Vec<UserId>,
    ) -> Result<Channel> {
        let actor = require_actor(actor)?;
        let idx = club_index(&self.clubs, club_id)?;
        let club = &self.clubs[idx];

        if !can_manage_channels(club.role_of(actor.id)) {
            return Err(ClientError::PermissionDenied {
                action: "create channels",
            });
        }
        if club.has_channel_named(name) {
            return Err(ClientError::DuplicateChannelName(name.to_string()));
        }

        let channel = Channel {
            id: ChannelId::new(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            created_by: actor.id,
            club_id,
            is_private,
            allowed_members: is_private.then_some(allowed_members),
            messages: Vec::new(),
        };

        let mut next = self.clubs.clone();
        next[idx].channels.push(channel.clone());
        self.commit(storage, next)?;

        info!(
            club_id = %club_id,
            channel_id = %channel.id,
            name = %channel.name,
            is_private,
            "channel created"
        );
        Ok(channel)
    }

    /// Apply a partial update.  Requires an admin or moderator of the owning
    /// club.  Channel names stay unique within the club.
    pub fn update_channel(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        channel_id: ChannelId,
        update: ChannelUpdate,
    ) -> Result<Channel> {
        let actor = require_actor(actor)?;
        let (ci, chi) = channel_position(&self.clubs, channel_id)?;
        let club = &self.clubs[ci];

        if !can_manage_channels(club.role_of(actor.id)) {
            return Err(ClientError::PermissionDenied {
                action: "update channels",
            });
        }
        if let Some(name) = &update.name {
            let taken = club
                .channels
                .iter()
                .any(|c| c.id != channel_id && &c.name == name);
            if taken {
                return Err(ClientError::DuplicateChannelName(name.clone()));
            }
        }

        let mut next = self.clubs.clone();
        let channel = &mut next[ci].channels[chi];
        if let Some(name) = update.name {
            channel.name = name;
        }
        if let Some(description) = update.description {
            channel.description = description;
        }
        if let Some(is_private) = update.is_private {
            channel.is_private = is_private;
        }
        if let Some(allowed) = update.allowed_members {
            channel.allowed_members = Some(allowed);
        }
        if !channel.is_private {
            channel.allowed_members = None;
        } else if channel.allowed_members.is_none() {
            channel.allowed_members = Some(Vec::new());
        }
        let updated = channel.clone();
        self.commit(storage, next)?;

        info!(channel_id = %channel_id, user_id = %actor.id, "channel updated");
        Ok(updated)
    }
}
