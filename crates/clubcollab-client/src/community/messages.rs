use chrono::Utc;
use clubcollab_shared::types::{ChannelId, MessageId, Role};
use clubcollab_store::{KvStore, Message, User};
use tracing::info;

use super::{channel_position, require_actor, CommunityStore};
use crate::error::{ClientError, Result};

impl CommunityStore {
    /// Append a message to a channel.  The author's current name and avatar
    /// are copied into the message; later profile changes do not touch it.
    pub fn send_message(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<Message> {
        let actor = require_actor(actor)?;
        if content.trim().is_empty() {
            return Err(ClientError::EmptyContent);
        }

        let (ci, chi) = channel_position(&self.clubs, channel_id)?;
        let club = &self.clubs[ci];
        let role = club.role_of(actor.id).ok_or(ClientError::NotAMember)?;
        if !club.channels[chi].admits(actor.id, role) {
            return Err(ClientError::AccessDenied);
        }

        let message = Message {
            id: MessageId::new(),
            content: content.to_string(),
            created_at: Utc::now(),
            user_id: actor.id,
            user_name: actor.name.clone(),
            user_avatar: actor.avatar.clone(),
            channel_id,
            reactions: None,
            is_edited: None,
        };

        let mut next = self.clubs.clone();
        next[ci].channels[chi].messages.push(message.clone());
        self.commit(storage, next)?;

        info!(channel_id = %channel_id, message_id = %message.id, "message sent");
        Ok(message)
    }

    /// Remove a message.  Allowed for its author and for admins/moderators
    /// of the club it was posted in.
    pub fn delete_message(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        message_id: MessageId,
    ) -> Result<()> {
        let actor = require_actor(actor)?;

        let (ci, chi, mi) = self
            .clubs
            .iter()
            .enumerate()
            .find_map(|(ci, club)| {
                club.channels.iter().enumerate().find_map(|(chi, ch)| {
                    ch.message_index(message_id).map(|mi| (ci, chi, mi))
                })
            })
            .ok_or(ClientError::MessageNotFound(message_id))?;

        let club = &self.clubs[ci];
        let is_author = club.channels[chi].messages[mi].user_id == actor.id;
        let is_staff = club
            .role_of(actor.id)
            .is_some_and(Role::can_moderate_messages);
        if !is_author && !is_staff {
            return Err(ClientError::PermissionDenied {
                action: "delete this message",
            });
        }

        let mut next = self.clubs.clone();
        next[ci].channels[chi].messages.remove(mi);
        self.commit(storage, next)?;

        info!(message_id = %message_id, user_id = %actor.id, "message deleted");
        Ok(())
    }
}
