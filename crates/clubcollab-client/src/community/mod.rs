//! Community Store: clubs, their members and channels, and the messages in
//! each channel, together with the current club/channel selection.
//!
//! Mutations follow one shape: check the actor, work on a copy of the club
//! list, write the copy to storage, then swap it in with [`CommunityStore::commit`].
//! A failed write therefore leaves the in-memory list untouched.

mod channels;
mod clubs;
mod messages;
mod selection;

pub use channels::ChannelUpdate;
pub use clubs::ClubUpdate;

use clubcollab_shared::types::{ChannelId, ClubId};
use clubcollab_store::snapshot;
use clubcollab_store::{Club, KvStore, User};
use tracing::debug;

use crate::error::{ClientError, Result};

#[derive(Debug, Default)]
pub struct CommunityStore {
    clubs: Vec<Club>,
    selected_club: Option<ClubId>,
    selected_channel: Option<ChannelId>,
}

impl CommunityStore {
    pub fn load(storage: &dyn KvStore) -> Result<Self> {
        let clubs = snapshot::load_clubs(storage)?;
        debug!(clubs = clubs.len(), "community store loaded");
        Ok(Self {
            clubs,
            ..Self::default()
        })
    }

    /// Every club, in creation order.
    pub fn all_clubs(&self) -> &[Club] {
        &self.clubs
    }

    /// Clubs `actor` belongs to.  Empty when nobody is logged in.
    pub fn user_clubs(&self, actor: Option<&User>) -> Vec<&Club> {
        let Some(actor) = actor else {
            return Vec::new();
        };
        self.clubs.iter().filter(|c| c.is_member(actor.id)).collect()
    }

    pub fn club(&self, club_id: ClubId) -> Option<&Club> {
        self.clubs.iter().find(|c| c.id == club_id)
    }

    /// Persist `next` and make it the current club list.
    fn commit(&mut self, storage: &dyn KvStore, next: Vec<Club>) -> Result<()> {
        snapshot::save_clubs(storage, &next)?;
        self.clubs = next;
        self.reconcile_selection();
        Ok(())
    }
}

fn require_actor(actor: Option<&User>) -> Result<&User> {
    actor.ok_or(ClientError::NotAuthenticated)
}

fn club_index(clubs: &[Club], club_id: ClubId) -> Result<usize> {
    clubs
        .iter()
        .position(|c| c.id == club_id)
        .ok_or(ClientError::ClubNotFound(club_id))
}

/// (club index, channel index) of the first channel with `channel_id`.
fn channel_position(clubs: &[Club], channel_id: ChannelId) -> Result<(usize, usize)> {
    clubs
        .iter()
        .enumerate()
        .find_map(|(ci, club)| {
            club.channels
                .iter()
                .position(|ch| ch.id == channel_id)
                .map(|chi| (ci, chi))
        })
        .ok_or(ClientError::ChannelNotFound(channel_id))
}
