//! Domain model structs persisted in the key-value slots.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be written as
//! part of a snapshot and handed directly to a UI layer.  Field names are
//! camelCase on the wire.

use chrono::{DateTime, Utc};
use clubcollab_shared::types::{ChannelId, ClubId, MessageId, Role, UserId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user as seen by the rest of the system.  Never carries
/// credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Login key, unique across the registration table (exact match).
    pub email: String,
    /// Global role.  Permission checks only ever look at the club-scoped
    /// [`Member::role`].
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
}

/// A pending password reset.  Only the token digest is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// A row of the registration table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    /// Argon2id PHC string.
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset: Option<PasswordReset>,
}

impl UserRecord {
    /// The credential-free projection of this record.
    pub fn to_user(&self) -> User {
        self.user.clone()
    }
}

// ---------------------------------------------------------------------------
// Club
// ---------------------------------------------------------------------------

/// A community workspace grouping members and channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Always present in `members`.
    pub owner_id: UserId,
    pub members: Vec<Member>,
    pub channels: Vec<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Club {
    pub fn member(&self, user_id: UserId) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member(user_id).is_some()
    }

    /// Club-scoped role of `user_id`, `None` for non-members.
    pub fn role_of(&self, user_id: UserId) -> Option<Role> {
        self.member(user_id).map(|m| m.role)
    }

    pub fn channel(&self, channel_id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == channel_id)
    }

    pub fn has_channel_named(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// A user's membership in one club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: UserId,
    /// Display name at join time.
    pub name: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// A named message stream inside a club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    /// Unique within the owning club.
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    pub club_id: ClubId,
    pub is_private: bool,
    /// Present only when `is_private` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_members: Option<Vec<UserId>>,
    pub messages: Vec<Message>,
}

impl Channel {
    /// Whether a member holding `role` may post here.
    pub fn admits(&self, user_id: UserId, role: Role) -> bool {
        if !self.is_private || role.bypasses_channel_privacy() {
            return true;
        }
        self.allowed_members
            .as_ref()
            .is_some_and(|allowed| allowed.contains(&user_id))
    }

    pub fn message_index(&self, message_id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == message_id)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message.  Author fields are a snapshot taken at send time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub channel_id: ChannelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<Reaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_edited: Option<bool>,
}

/// Aggregated emoji reaction on a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub count: u32,
    pub user_ids: Vec<UserId>,
}
