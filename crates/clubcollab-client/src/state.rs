//! Application state shared by whatever drives the UI.
//!
//! [`AppState`] owns the storage backend and both stores.  Its methods are
//! the operations a UI invokes: the acting user is always the Identity
//! Store's session user, and every outcome is reported to the notification
//! sink before the result is handed back unchanged.

use std::sync::Arc;

use chrono::Utc;
use clubcollab_shared::types::{ChannelId, ClubId, MessageId, UserId};
use clubcollab_store::{Channel, Club, Database, KvStore, Message, User};
use tracing::{info, warn};

use crate::community::{ChannelUpdate, ClubUpdate, CommunityStore};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::{Notification, NotificationSink};
use crate::identity::{IdentityStore, PasswordResetToken};

/// Central application state.
pub struct AppState<S: KvStore = Database> {
    storage: S,
    identity: IdentityStore,
    community: CommunityStore,
    sink: Arc<dyn NotificationSink>,
    config: ClientConfig,
}

impl AppState<Database> {
    /// Open the configured SQLite database and load both stores from it.
    pub fn open(config: ClientConfig, sink: Arc<dyn NotificationSink>) -> Result<Self> {
        let storage = match &config.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        Self::with_storage(storage, config, sink)
    }
}

impl<S: KvStore> AppState<S> {
    /// Load both stores from an already open backend.
    pub fn with_storage(
        storage: S,
        config: ClientConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        let identity = IdentityStore::load(&storage, config.reset_token_ttl())?;
        let community = CommunityStore::load(&storage)?;

        info!(
            session = identity.is_authenticated(),
            clubs = community.all_clubs().len(),
            "application state loaded"
        );

        Ok(Self {
            storage,
            identity,
            community,
            sink,
            config,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    pub fn community(&self) -> &CommunityStore {
        &self.community
    }

    fn success(&self, title: &str, description: impl Into<String>) {
        self.sink.notify(Notification::success(title, description));
    }

    fn report<T>(&self, failure: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!(code = e.code(), error = %e, "{failure}");
            self.sink.notify(Notification::error(failure, e.to_string()));
        }
        result
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub fn current_user(&self) -> Option<&User> {
        self.identity.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        let result = self.identity.register(&self.storage, name, email, password);
        let user = self.report("Registration failed", result)?;
        self.success("Account created!", "You've been successfully registered.");
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let result = self.identity.login(&self.storage, email, password);
        let user = self.report("Login failed", result)?;
        self.success("Welcome back!", format!("You're logged in as {}", user.name));
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        let result = self.identity.logout(&self.storage);
        self.report("Logout failed", result)?;
        self.success("Logged out", "You've been successfully logged out.");
        Ok(())
    }

    /// Issue a password reset token.  Delivering it to the user is up to
    /// the caller.
    pub fn request_password_reset(&mut self, email: &str) -> Result<PasswordResetToken> {
        let result = self
            .identity
            .request_password_reset(&self.storage, email, Utc::now());
        let token = self.report("Password reset failed", result)?;
        self.success(
            "Reset link sent",
            "Check your inbox for instructions to reset your password.",
        );
        Ok(token)
    }

    pub fn reset_password(&mut self, email: &str, token: &str, new_password: &str) -> Result<()> {
        let result =
            self.identity
                .reset_password(&self.storage, email, token, new_password, Utc::now());
        self.report("Password reset failed", result)?;
        self.success("Password updated", "You can now log in with your new password.");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Clubs
    // ------------------------------------------------------------------

    pub fn create_club(
        &mut self,
        name: &str,
        description: &str,
        avatar: Option<String>,
    ) -> Result<Club> {
        let result = self.community.create_club(
            &self.storage,
            self.identity.current_user(),
            name,
            description,
            avatar,
        );
        let club = self.report("Failed to create club", result)?;
        self.success(
            "Club created!",
            format!("{} has been successfully created.", club.name),
        );
        Ok(club)
    }

    pub fn join_club(&mut self, club_id: ClubId) -> Result<()> {
        let result = self
            .community
            .join_club(&self.storage, self.identity.current_user(), club_id);
        self.report("Failed to join club", result)?;
        let name = self.club_name(club_id);
        self.success("Joined club!", format!("You've successfully joined {name}."));
        Ok(())
    }

    pub fn leave_club(&mut self, club_id: ClubId) -> Result<()> {
        let name = self.club_name(club_id);
        let result = self
            .community
            .leave_club(&self.storage, self.identity.current_user(), club_id);
        self.report("Failed to leave club", result)?;
        self.success("Left club", format!("You've left {name}."));
        Ok(())
    }

    pub fn update_club(&mut self, club_id: ClubId, update: ClubUpdate) -> Result<Club> {
        let previous = self.club_name(club_id);
        let result =
            self.community
                .update_club(&self.storage, self.identity.current_user(), club_id, update);
        let club = self.report("Failed to update club", result)?;
        self.success("Club updated", format!("{previous} has been updated."));
        Ok(club)
    }

    /// Clubs the session user belongs to.
    pub fn user_clubs(&self) -> Vec<&Club> {
        self.community.user_clubs(self.identity.current_user())
    }

    pub fn all_clubs(&self) -> &[Club] {
        self.community.all_clubs()
    }

    fn club_name(&self, club_id: ClubId) -> String {
        self.community
            .club(club_id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    pub fn create_channel(
        &mut self,
        club_id: ClubId,
        name: &str,
        description: &str,
        is_private: bool,
        allowed_members: Vec<UserId>,
    ) -> Result<Channel> {
        let result = self.community.create_channel(
            &self.storage,
            self.identity.current_user(),
            club_id,
            name,
            description,
            is_private,
            allowed_members,
        );
        let channel = self.report("Failed to create channel", result)?;
        self.success(
            "Channel created!",
            format!("Channel '{}' has been created.", channel.name),
        );
        Ok(channel)
    }

    pub fn update_channel(&mut self, channel_id: ChannelId, update: ChannelUpdate) -> Result<Channel> {
        let result = self.community.update_channel(
            &self.storage,
            self.identity.current_user(),
            channel_id,
            update,
        );
        let channel = self.report("Failed to update channel", result)?;
        self.success(
            "Channel updated",
            format!("Channel {} has been updated.", channel.name),
        );
        Ok(channel)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_club(&mut self, club_id: Option<ClubId>) {
        self.community.select_club(club_id);
    }

    pub fn select_channel(&mut self, channel_id: Option<ChannelId>) {
        self.community.select_channel(channel_id);
    }

    pub fn selected_club(&self) -> Option<&Club> {
        self.community.selected_club()
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        self.community.selected_channel()
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub fn send_message(&mut self, channel_id: ChannelId, content: &str) -> Result<Message> {
        let result = self.community.send_message(
            &self.storage,
            self.identity.current_user(),
            channel_id,
            content,
        );
        self.report("Failed to send message", result)
    }

    pub fn delete_message(&mut self, message_id: MessageId) -> Result<()> {
        let result =
            self.community
                .delete_message(&self.storage, self.identity.current_user(), message_id);
        self.report("Failed to delete message", result)?;
        self.success("Message deleted", "The message has been deleted.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clubcollab_shared::types::Role;
    use clubcollab_store::MemoryStore;

    use super::*;
    use crate::error::ClientError;
    use crate::events::{NotificationKind, QueuedSink};

    fn app() -> (AppState<MemoryStore>, Arc<QueuedSink>) {
        let sink = Arc::new(QueuedSink::new());
        let app = AppState::with_storage(MemoryStore::new(), ClientConfig::default(), sink.clone())
            .unwrap();
        (app, sink)
    }

    #[test]
    fn chess_club_scenario() {
        let (mut app, _sink) = app();

        let alice = app.register("Alice", "a@x.com", "pw1").unwrap();
        let club = app.create_club("Chess Club", "", None).unwrap();

        assert_eq!(club.members.len(), 1);
        assert_eq!(club.members[0].user_id, alice.id);
        assert_eq!(club.members[0].name, "Alice");
        assert_eq!(club.members[0].role, Role::Admin);
        assert_eq!(club.channels.len(), 1);
        assert_eq!(club.channels[0].name, "general");
        assert!(!club.channels[0].is_private);

        let bob = app.register("Bob", "b@x.com", "pw2").unwrap();
        app.join_club(club.id).unwrap();

        let stored = app.community().club(club.id).unwrap();
        assert_eq!(stored.members.len(), 2);
        assert_eq!(stored.role_of(bob.id), Some(Role::Member));

        let err = app
            .create_channel(club.id, "random", "", false, vec![])
            .unwrap_err();
        assert!(matches!(err, ClientError::PermissionDenied { .. }));
        assert_eq!(app.community().club(club.id).unwrap().channels.len(), 1);
    }

    #[test]
    fn operations_require_session() {
        let (mut app, sink) = app();

        assert!(matches!(
            app.create_club("Chess Club", "", None),
            Err(ClientError::NotAuthenticated)
        ));
        assert!(app.user_clubs().is_empty());

        let notes = sink.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].title, "Failed to create club");
        assert_eq!(notes[0].description, "You must be logged in");
    }

    #[test]
    fn success_and_failure_are_notified() {
        let (mut app, sink) = app();

        app.register("Alice", "a@x.com", "pw1").unwrap();
        let club = app.create_club("Chess Club", "", None).unwrap();
        assert!(app.leave_club(club.id).is_err());

        let notes = sink.drain();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Account created!", "Club created!", "Failed to leave club"]
        );
        assert_eq!(
            notes[1].description,
            "Chess Club has been successfully created."
        );
        assert_eq!(notes[2].kind, NotificationKind::Error);
    }

    #[test]
    fn send_message_failure_notifies_without_success_toast() {
        let (mut app, sink) = app();
        app.register("Alice", "a@x.com", "pw1").unwrap();
        let club = app.create_club("Chess Club", "", None).unwrap();
        sink.drain();

        app.send_message(club.channels[0].id, "hi").unwrap();
        assert!(sink.drain().is_empty());

        assert!(matches!(
            app.send_message(club.channels[0].id, "  "),
            Err(ClientError::EmptyContent)
        ));
        let notes = sink.drain();
        assert_eq!(notes[0].title, "Failed to send message");
    }

    #[test]
    fn author_and_admin_delete_rights() {
        let (mut app, _sink) = app();
        app.register("Alice", "a@x.com", "pw1").unwrap();
        let club = app.create_club("Chess Club", "", None).unwrap();
        let general = club.channels[0].id;
        let rules = app.send_message(general, "read the rules").unwrap();

        app.register("Bob", "b@x.com", "pw2").unwrap();
        app.join_club(club.id).unwrap();
        let own = app.send_message(general, "hi all").unwrap();

        assert!(matches!(
            app.delete_message(rules.id),
            Err(ClientError::PermissionDenied { .. })
        ));
        app.delete_message(own.id).unwrap();

        app.logout().unwrap();
        app.login("a@x.com", "pw1").unwrap();
        app.delete_message(rules.id).unwrap();

        let channel = app.community().club(club.id).unwrap().channel(general).unwrap();
        assert!(channel.messages.is_empty());
    }

    #[test]
    fn selection_through_context() {
        let (mut app, _sink) = app();
        app.register("Alice", "a@x.com", "pw1").unwrap();
        let club = app.create_club("Chess Club", "", None).unwrap();

        app.select_club(Some(club.id));
        assert_eq!(app.selected_club().map(|c| c.id), Some(club.id));
        assert_eq!(
            app.selected_channel().map(|c| c.name.as_str()),
            Some("general")
        );

        app.select_channel(None);
        assert!(app.selected_channel().is_none());
    }

    #[test]
    fn password_reset_through_context() {
        let (mut app, sink) = app();
        app.register("Alice", "a@x.com", "pw1").unwrap();
        app.logout().unwrap();

        assert!(matches!(
            app.request_password_reset("nobody@x.com"),
            Err(ClientError::EmailNotFound)
        ));

        let issued = app.request_password_reset("a@x.com").unwrap();
        app.reset_password("a@x.com", &issued.token, "pw2").unwrap();
        app.login("a@x.com", "pw2").unwrap();

        let titles: Vec<_> = sink.drain().into_iter().map(|n| n.title).collect();
        assert!(titles.contains(&"Password updated".to_string()));
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("clubcollab.db")),
            ..ClientConfig::default()
        };

        let (alice, club) = {
            let mut app = AppState::open(config.clone(), Arc::new(QueuedSink::new())).unwrap();
            let alice = app.register("Alice", "a@x.com", "pw1").unwrap();
            let club = app.create_club("Chess Club", "Weekly games", None).unwrap();
            app.send_message(club.channels[0].id, "see you thursday")
                .unwrap();
            let club = app.community().club(club.id).unwrap().clone();
            (alice, club)
        };

        let app = AppState::open(config, Arc::new(QueuedSink::new())).unwrap();
        assert_eq!(app.current_user(), Some(&alice));
        assert_eq!(app.all_clubs(), std::slice::from_ref(&club));
        assert_eq!(app.user_clubs(), vec![&club]);
    }
}
