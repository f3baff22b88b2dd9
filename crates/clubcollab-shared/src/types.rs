use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Registered user id, assigned at registration.
    UserId
);
uuid_id!(ClubId);
uuid_id!(ChannelId);
uuid_id!(MessageId);

/// Role tag. Used both as the (unused) global user role and as the
/// club-scoped member role that drives permission checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    Member,
}

impl Role {
    /// Rename, describe or re-avatar a club.
    pub fn can_manage_club(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Create and update channels.
    pub fn can_manage_channels(self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }

    /// Delete messages written by someone else.
    pub fn can_moderate_messages(self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }

    /// Post in private channels without being on the allow-list.
    pub fn bypasses_channel_privacy(self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::Member => "member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
