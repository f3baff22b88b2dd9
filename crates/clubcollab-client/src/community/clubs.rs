use chrono::Utc;
use clubcollab_shared::constants::{DEFAULT_CHANNEL_DESCRIPTION, DEFAULT_CHANNEL_NAME};
use clubcollab_shared::types::{ChannelId, ClubId, Role};
use clubcollab_store::{Channel, Club, KvStore, Member, User};
use tracing::info;

use super::{club_index, require_actor, CommunityStore};
use crate::error::{ClientError, Result};

/// Partial club update.  `None` leaves a field as it is; `avatar:
/// Some(None)` clears the avatar.
///
/// Id, owner, creation time, members and channels are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<Option<String>>,
}

fn member_from(user: &User, role: Role) -> Member {
    Member {
        user_id: user.id,
        name: user.name.clone(),
        role,
        joined_at: Utc::now(),
        avatar: user.avatar.clone(),
    }
}

impl CommunityStore {
    /// Create a club owned by `actor`, seeded with the actor as its only
    /// (admin) member and a public `general` channel.
    pub fn create_club(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        name: &str,
        description: &str,
        avatar: Option<String>,
    ) -> Result<Club> {
        let actor = require_actor(actor)?;
        let now = Utc::now();
        let club_id = ClubId::new();

        let club = Club {
            id: club_id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            owner_id: actor.id,
            members: vec![member_from(actor, Role::Admin)],
            channels: vec![Channel {
                id: ChannelId::new(),
                name: DEFAULT_CHANNEL_NAME.to_string(),
                description: DEFAULT_CHANNEL_DESCRIPTION.to_string(),
                created_at: now,
                created_by: actor.id,
                club_id,
                is_private: false,
                allowed_members: None,
                messages: Vec::new(),
            }],
            avatar,
        };

        let mut next = self.clubs.clone();
        next.push(club.clone());
        self.commit(storage, next)?;

        info!(club_id = %club.id, owner = %actor.id, name = %club.name, "club created");
        Ok(club)
    }

    pub fn join_club(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        club_id: ClubId,
    ) -> Result<()> {
        let actor = require_actor(actor)?;
        let idx = club_index(&self.clubs, club_id)?;

        if self.clubs[idx].is_member(actor.id) {
            return Err(ClientError::AlreadyMember);
        }

        let mut next = self.clubs.clone();
        next[idx].members.push(member_from(actor, Role::Member));
        self.commit(storage, next)?;

        info!(club_id = %club_id, user_id = %actor.id, "joined club");
        Ok(())
    }

    /// Leave a club.  The owner can never leave, so a club always keeps its
    /// owner as a member.
    pub fn leave_club(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        club_id: ClubId,
    ) -> Result<()> {
        let actor = require_actor(actor)?;
        let idx = club_index(&self.clubs, club_id)?;
        let club = &self.clubs[idx];

        if !club.is_member(actor.id) {
            return Err(ClientError::NotAMember);
        }
        if club.owner_id == actor.id {
            return Err(ClientError::OwnerCannotLeave);
        }

        let mut next = self.clubs.clone();
        next[idx].members.retain(|m| m.user_id != actor.id);
        self.commit(storage, next)?;

        if self.selected_club == Some(club_id) {
            self.clear_selection();
        }

        info!(club_id = %club_id, user_id = %actor.id, "left club");
        Ok(())
    }

    /// Apply a partial update.  Only club admins may update.
    pub fn update_club(
        &mut self,
        storage: &dyn KvStore,
        actor: Option<&User>,
        club_id: ClubId,
        update: ClubUpdate,
    ) -> Result<Club> {
        let actor = require_actor(actor)?;
        let idx = club_index(&self.clubs, club_id)?;

        let allowed = self.clubs[idx]
            .role_of(actor.id)
            .is_some_and(Role::can_manage_club);
        if !allowed {
            return Err(ClientError::PermissionDenied {
                action: "update this club",
            });
        }

        let mut next = self.clubs.clone();
        let club = &mut next[idx];
        if let Some(name) = update.name {
            club.name = name;
        }
        if let Some(description) = update.description {
            club.description = description;
        }
        if let Some(avatar) = update.avatar {
            club.avatar = avatar;
        }
        let updated = club.clone();
        self.commit(storage, next)?;

        info!(club_id = %club_id, user_id = %actor.id, "club updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use clubcollab_store::MemoryStore;

    use super::super::testing::user;
    use super::*;

    fn setup() -> (MemoryStore, CommunityStore, User, Club) {
        let storage = MemoryStore::new();
        let alice = user("Alice");
        let mut store = CommunityStore::load(&storage).unwrap();
        let club = store
            .create_club(&storage, Some(&alice), "Chess Club", "Weekly games", None)
            .unwrap();
        (storage, store, alice, club)
    }

    #[test]
    fn create_requires_login() {
        let storage = MemoryStore::new();
        let mut store = CommunityStore::default();
        assert!(matches!(
            store.create_club(&storage, None, "Chess Club", "", None),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn new_club_has_owner_and_general_channel() {
        let (_storage, store, alice, club) = setup();

        let mine = store.user_clubs(Some(&alice));
        assert_eq!(mine.len(), 1);
        let stored = mine[0];
        assert_eq!(stored, &club);

        assert_eq!(stored.owner_id, alice.id);
        assert_eq!(stored.members.len(), 1);
        assert_eq!(stored.members[0].user_id, alice.id);
        assert_eq!(stored.members[0].role, Role::Admin);
        assert_eq!(stored.members[0].avatar, alice.avatar);

        assert_eq!(stored.channels.len(), 1);
        let general = &stored.channels[0];
        assert_eq!(general.name, "general");
        assert_eq!(general.description, "General discussion channel");
        assert!(!general.is_private);
        assert_eq!(general.club_id, club.id);
        assert_eq!(general.created_by, alice.id);
    }

    #[test]
    fn join_appends_member_role() {
        let (storage, mut store, _alice, club) = setup();
        let bob = user("Bob");

        store.join_club(&storage, Some(&bob), club.id).unwrap();

        let members = &store.club(club.id).unwrap().members;
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].user_id, bob.id);
        assert_eq!(members[1].role, Role::Member);
    }

    #[test]
    fn joining_twice_fails_without_change() {
        let (storage, mut store, _alice, club) = setup();
        let bob = user("Bob");

        store.join_club(&storage, Some(&bob), club.id).unwrap();
        let err = store.join_club(&storage, Some(&bob), club.id).unwrap_err();

        assert!(matches!(err, ClientError::AlreadyMember));
        assert_eq!(store.club(club.id).unwrap().members.len(), 2);
    }

    #[test]
    fn join_unknown_club() {
        let (storage, mut store, alice, _club) = setup();
        let missing = ClubId::new();
        assert!(matches!(
            store.join_club(&storage, Some(&alice), missing),
            Err(ClientError::ClubNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn owner_cannot_leave() {
        let (storage, mut store, alice, club) = setup();

        let err = store.leave_club(&storage, Some(&alice), club.id).unwrap_err();

        assert!(matches!(err, ClientError::OwnerCannotLeave));
        let stored = store.club(club.id).unwrap();
        assert_eq!(stored.members.len(), 1);
        assert!(stored.is_member(stored.owner_id));
    }

    #[test]
    fn member_can_leave() {
        let (storage, mut store, _alice, club) = setup();
        let bob = user("Bob");
        store.join_club(&storage, Some(&bob), club.id).unwrap();

        store.leave_club(&storage, Some(&bob), club.id).unwrap();

        assert!(!store.club(club.id).unwrap().is_member(bob.id));
        assert!(matches!(
            store.leave_club(&storage, Some(&bob), club.id),
            Err(ClientError::NotAMember)
        ));
    }

    #[test]
    fn leaving_selected_club_clears_selection() {
        let (storage, mut store, _alice, club) = setup();
        let bob = user("Bob");
        store.join_club(&storage, Some(&bob), club.id).unwrap();
        store.select_club(Some(club.id));
        assert!(store.selected_channel().is_some());

        store.leave_club(&storage, Some(&bob), club.id).unwrap();

        assert!(store.selected_club().is_none());
        assert!(store.selected_channel().is_none());
    }

    #[test]
    fn admin_updates_club_fields() {
        let (storage, mut store, alice, club) = setup();

        let updated = store
            .update_club(
                &storage,
                Some(&alice),
                club.id,
                ClubUpdate {
                    name: Some("Chess & Go".into()),
                    avatar: Some(Some("board.png".into())),
                    ..ClubUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Chess & Go");
        assert_eq!(updated.description, "Weekly games");
        assert_eq!(updated.avatar.as_deref(), Some("board.png"));
        assert_eq!(updated.owner_id, club.owner_id);
        assert_eq!(updated.members, club.members);
        assert_eq!(store.club(club.id), Some(&updated));
    }

    #[test]
    fn non_admin_cannot_update_club() {
        let (storage, mut store, _alice, club) = setup();
        let bob = user("Bob");
        store.join_club(&storage, Some(&bob), club.id).unwrap();

        let update = ClubUpdate {
            name: Some("Bob's Club".into()),
            ..ClubUpdate::default()
        };
        assert!(matches!(
            store.update_club(&storage, Some(&bob), club.id, update.clone()),
            Err(ClientError::PermissionDenied { .. })
        ));
        assert!(matches!(
            store.update_club(&storage, Some(&user("Eve")), club.id, update),
            Err(ClientError::PermissionDenied { .. })
        ));
        assert_eq!(store.club(club.id).unwrap().name, "Chess Club");
    }
}
