//! Identity Store: the registration table and the session user.
//!
//! The table and the session pointer live in separate storage slots.  Every
//! mutation writes the affected slots first and updates memory only once the
//! writes succeed.

use chrono::{DateTime, Duration, Utc};
use clubcollab_shared::credentials;
use clubcollab_shared::types::{Role, UserId};
use clubcollab_store::snapshot;
use clubcollab_store::{KvStore, PasswordReset, User, UserRecord};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

/// Handed back by [`IdentityStore::request_password_reset`].  The plaintext
/// token exists only here; storage keeps its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct IdentityStore {
    users: Vec<UserRecord>,
    current: Option<User>,
    reset_token_ttl: Duration,
}

impl IdentityStore {
    /// Session bootstrap: load the registration table and any persisted
    /// session user.  Missing slots mean an empty table and no session.
    pub fn load(storage: &dyn KvStore, reset_token_ttl: Duration) -> Result<Self> {
        let users = snapshot::load_users(storage)?;
        let current = snapshot::load_session(storage)?;

        debug!(
            users = users.len(),
            session = current.is_some(),
            "identity store loaded"
        );

        Ok(Self {
            users,
            current,
            reset_token_ttl,
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Every registered user, credentials stripped.
    pub fn users(&self) -> Vec<User> {
        self.users.iter().map(UserRecord::to_user).collect()
    }

    fn find_by_email(&self, email: &str) -> Option<usize> {
        self.users.iter().position(|r| r.user.email == email)
    }

    pub fn register(
        &mut self,
        storage: &dyn KvStore,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        if self.find_by_email(email).is_some() {
            return Err(ClientError::DuplicateEmail);
        }

        let record = UserRecord {
            user: User {
                id: UserId::new(),
                name: name.to_string(),
                email: email.to_string(),
                role: Role::Member,
                avatar: None,
                college: None,
            },
            password_hash: credentials::hash_password(password)?,
            password_reset: None,
        };
        let user = record.to_user();

        let mut next = self.users.clone();
        next.push(record);

        snapshot::save_users(storage, &next)?;
        if let Err(e) = snapshot::save_session(storage, &user) {
            // Put the table back so the two slots stay consistent with memory.
            if let Err(restore) = snapshot::save_users(storage, &self.users) {
                warn!(error = %restore, "failed to restore registration table");
            }
            return Err(e.into());
        }

        self.users = next;
        self.current = Some(user.clone());

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub fn login(&mut self, storage: &dyn KvStore, email: &str, password: &str) -> Result<User> {
        let record = self
            .find_by_email(email)
            .map(|idx| &self.users[idx])
            .ok_or(ClientError::InvalidCredentials)?;

        let verified = match credentials::verify_password(password, &record.password_hash) {
            Ok(verified) => verified,
            Err(e) => {
                warn!(user_id = %record.user.id, error = %e, "unusable stored password hash");
                false
            }
        };
        if !verified {
            return Err(ClientError::InvalidCredentials);
        }

        let user = record.to_user();
        snapshot::save_session(storage, &user)?;
        self.current = Some(user.clone());

        info!(user_id = %user.id, "user logged in");
        Ok(user)
    }

    /// Clear the session.  Safe to call when nobody is logged in.
    pub fn logout(&mut self, storage: &dyn KvStore) -> Result<()> {
        snapshot::clear_session(storage)?;
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "user logged out");
        }
        Ok(())
    }

    /// Issue a reset token for `email`, replacing any pending one.
    pub fn request_password_reset(
        &mut self,
        storage: &dyn KvStore,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<PasswordResetToken> {
        let idx = self.find_by_email(email).ok_or(ClientError::EmailNotFound)?;

        let token = credentials::generate_reset_token();
        let expires_at = now
            .checked_add_signed(self.reset_token_ttl)
            .ok_or(ClientError::ResetTokenTtlOutOfRange)?;

        let mut next = self.users.clone();
        next[idx].password_reset = Some(PasswordReset {
            token_hash: credentials::digest_reset_token(&token),
            expires_at,
        });

        snapshot::save_users(storage, &next)?;
        self.users = next;

        info!(user_id = %self.users[idx].user.id, %expires_at, "password reset requested");
        Ok(PasswordResetToken {
            email: email.to_string(),
            token,
            expires_at,
        })
    }

    /// Consume a reset token and set a new password.  The session is left
    /// untouched.
    pub fn reset_password(
        &mut self,
        storage: &dyn KvStore,
        email: &str,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let idx = self.find_by_email(email).ok_or(ClientError::EmailNotFound)?;

        let pending = self.users[idx]
            .password_reset
            .clone()
            .ok_or(ClientError::InvalidResetToken)?;

        if !credentials::reset_token_matches(token, &pending.token_hash) {
            return Err(ClientError::InvalidResetToken);
        }

        let mut next = self.users.clone();
        next[idx].password_reset = None;

        if now >= pending.expires_at {
            // Expired tokens are cleared on first use.
            snapshot::save_users(storage, &next)?;
            self.users = next;
            return Err(ClientError::ResetTokenExpired);
        }

        next[idx].password_hash = credentials::hash_password(new_password)?;
        snapshot::save_users(storage, &next)?;
        self.users = next;

        info!(user_id = %self.users[idx].user.id, "password reset completed");
        Ok(())
    }
}
