use clubcollab_shared::error::CredentialError;
use clubcollab_shared::types::{ChannelId, ClubId, MessageId};
use clubcollab_store::StoreError;
use thiserror::Error;

/// Errors returned by the identity and community stores.
///
/// Every variant is raised by the call that detected it, before any state
/// changes.
#[derive(Error, Debug)]
pub enum ClientError {
    // === Session ===
    #[error("You must be logged in")]
    NotAuthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Email not found")]
    EmailNotFound,

    #[error("Invalid password reset token")]
    InvalidResetToken,

    #[error("Password reset token has expired")]
    ResetTokenExpired,

    #[error("Password reset token lifetime is out of range")]
    ResetTokenTtlOutOfRange,

    // === Lookup ===
    #[error("Club not found")]
    ClubNotFound(ClubId),

    #[error("Channel not found")]
    ChannelNotFound(ChannelId),

    #[error("Message not found")]
    MessageNotFound(MessageId),

    // === Membership ===
    #[error("You're already a member of this club")]
    AlreadyMember,

    #[error("You're not a member of this club")]
    NotAMember,

    #[error("Club owners cannot leave their club")]
    OwnerCannotLeave,

    // === Authorization ===
    #[error("You don't have permission to {action}")]
    PermissionDenied { action: &'static str },

    #[error("You don't have access to this channel")]
    AccessDenied,

    // === Validation ===
    #[error("Channel '{0}' already exists")]
    DuplicateChannelName(String),

    #[error("Message cannot be empty")]
    EmptyContent,

    // === Infrastructure ===
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl ClientError {
    /// Stable code string for programmatic handling by a UI layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::EmailNotFound => "EMAIL_NOT_FOUND",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::ResetTokenExpired => "RESET_TOKEN_EXPIRED",
            Self::ResetTokenTtlOutOfRange => "CONFIG_ERROR",
            Self::ClubNotFound(_) | Self::ChannelNotFound(_) | Self::MessageNotFound(_) => {
                "NOT_FOUND"
            }
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::OwnerCannotLeave => "OWNER_CANNOT_LEAVE",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::DuplicateChannelName(_) => "DUPLICATE_CHANNEL_NAME",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::Store(_) => "STORAGE_ERROR",
            Self::Credential(_) => "CREDENTIAL_ERROR",
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
