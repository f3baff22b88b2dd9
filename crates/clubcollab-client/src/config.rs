//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start with zero
//! configuration.

use std::path::PathBuf;

use chrono::TimeDelta;
use clubcollab_shared::constants::{DEFAULT_RESET_TOKEN_TTL_SECS, MAX_RESET_TOKEN_TTL_SECS};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit SQLite database file.
    /// Env: `CLUBCOLLAB_DB_PATH`
    /// Default: `None` (platform data directory, see `Database::new`).
    pub db_path: Option<PathBuf>,

    /// Lifetime of a password reset token, in seconds.
    /// Env: `CLUBCOLLAB_RESET_TOKEN_TTL_SECS`
    /// Default: `3600`, at most 30 days.
    pub reset_token_ttl_secs: u64,

    /// Log filter used when `RUST_LOG` is not set.
    /// Env: `CLUBCOLLAB_LOG`
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            reset_token_ttl_secs: DEFAULT_RESET_TOKEN_TTL_SECS,
            log_filter: "clubcollab_client=info,clubcollab_store=info,warn".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("CLUBCOLLAB_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(ttl) = lookup("CLUBCOLLAB_RESET_TOKEN_TTL_SECS") {
            match ttl.parse::<u64>() {
                Ok(secs) if (1..=MAX_RESET_TOKEN_TTL_SECS).contains(&secs) => {
                    config.reset_token_ttl_secs = secs
                }
                _ => {
                    tracing::warn!(
                        value = %ttl,
                        "Invalid CLUBCOLLAB_RESET_TOKEN_TTL_SECS, using default"
                    );
                }
            }
        }

        if let Some(filter) = lookup("CLUBCOLLAB_LOG").filter(|f| !f.is_empty()) {
            config.log_filter = filter;
        }

        config
    }

    /// Reset token lifetime.  A value outside the accepted range falls back
    /// to the default.
    pub fn reset_token_ttl(&self) -> TimeDelta {
        let secs = if (1..=MAX_RESET_TOKEN_TTL_SECS).contains(&self.reset_token_ttl_secs) {
            self.reset_token_ttl_secs
        } else {
            tracing::warn!(
                value = self.reset_token_ttl_secs,
                "reset token lifetime out of range, using default"
            );
            DEFAULT_RESET_TOKEN_TTL_SECS
        };
        i64::try_from(secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::hours(1))
    }
}
