/// Application name
pub const APP_NAME: &str = "Club Collab";

/// Storage slot holding the registration table (JSON array of user records)
pub const USERS_STORAGE_KEY: &str = "club-collab-users";

/// Storage slot holding the session user (credential-free), absent when logged out
pub const CURRENT_USER_KEY: &str = "club-collab-current-user";

/// Storage slot holding the full club list
pub const CLUBS_STORAGE_KEY: &str = "club-collab-clubs";

/// Channel seeded into every new club
pub const DEFAULT_CHANNEL_NAME: &str = "general";
pub const DEFAULT_CHANNEL_DESCRIPTION: &str = "General discussion channel";

/// Password reset token size in bytes (hex-encoded when handed out)
pub const RESET_TOKEN_SIZE: usize = 32;

/// Default password reset token lifetime in seconds
pub const DEFAULT_RESET_TOKEN_TTL_SECS: u64 = 3600;

/// Longest accepted reset token lifetime in seconds (30 days)
pub const MAX_RESET_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

/// Key derivation context (BLAKE3) for stored reset token digests
pub const KDF_CONTEXT_RESET_TOKEN: &str = "club-collab-reset-token-v1";
