//! Client-side state for Club Collab.
//!
//! The crate holds the two stores a UI drives (identity and community),
//! the [`AppState`] that ties them to a storage backend, and the
//! notification plumbing used to report outcomes.

pub mod community;
pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use community::{ChannelUpdate, ClubUpdate, CommunityStore};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::{LogSink, Notification, NotificationKind, NotificationSink, QueuedSink};
pub use identity::{IdentityStore, PasswordResetToken};
pub use state::AppState;

/// Install the global tracing subscriber.  `RUST_LOG` wins over the
/// configured filter.  Call once, before opening the state.
pub fn init_logging(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Starting Club Collab client");
}
