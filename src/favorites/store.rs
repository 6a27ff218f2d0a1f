// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FavoritesError;

use super::query::{self, SortOrder};
use super::slot::StorageSlot;

/// A user-marked episode, identified by its show/season/episode triple
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub podcast_id: String,
    pub season_id: String,
    pub episode_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Favorite {
    /// True if this record carries exactly the given identity triple
    pub fn matches(&self, podcast_id: &str, season_id: &str, episode_id: &str) -> bool {
        self.podcast_id == podcast_id
            && self.season_id == season_id
            && self.episode_id == episode_id
    }
}

/// Durable set of favorited episodes, stored as one JSON blob in a slot
///
/// Every mutation re-reads the slot, edits the decoded set, and writes the
/// whole blob back. Rapid toggles therefore serialize as read-modify-write
/// against current contents rather than clobbering each other from stale
/// snapshots.
pub struct FavoritesStore<S: StorageSlot> {
    slot: S,
}

impl<S: StorageSlot> FavoritesStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Load all stored favorites in insertion order
    ///
    /// A missing slot is an empty list. An unreadable or malformed slot also
    /// degrades to an empty list with a logged warning; it never errors to
    /// the caller.
    pub fn list(&self) -> Vec<Favorite> {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read favorites, treating as empty: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!("discarding malformed favorites blob: {e}");
                Vec::new()
            }
        }
    }

    /// True if any stored favorite references this episode id
    ///
    /// Matches on the episode id alone, not the full triple: two shows that
    /// reuse an episode id will report each other's favorites.
    pub fn is_favorite(&self, episode_id: &str) -> bool {
        self.list().iter().any(|f| f.episode_id == episode_id)
    }

    /// Append a favorite unless its triple is already present, then persist
    ///
    /// Adding an already-present triple is a no-op, not a duplicate.
    pub fn add(&self, favorite: Favorite) -> Result<(), FavoritesError> {
        let mut current = self.list();

        if current.iter().any(|f| {
            f.matches(&favorite.podcast_id, &favorite.season_id, &favorite.episode_id)
        }) {
            return Ok(());
        }

        current.push(favorite);
        self.persist(&current)
    }

    /// Remove every favorite matching the triple, then persist
    pub fn remove(
        &self,
        podcast_id: &str,
        season_id: &str,
        episode_id: &str,
    ) -> Result<(), FavoritesError> {
        let mut current = self.list();
        current.retain(|f| !f.matches(podcast_id, season_id, episode_id));
        self.persist(&current)
    }

    /// Add the favorite if its triple is absent, remove it otherwise
    ///
    /// Returns true when the episode ended up favorited.
    pub fn toggle(&self, favorite: Favorite) -> Result<bool, FavoritesError> {
        let present = self.list().iter().any(|f| {
            f.matches(&favorite.podcast_id, &favorite.season_id, &favorite.episode_id)
        });

        if present {
            self.remove(
                &favorite.podcast_id,
                &favorite.season_id,
                &favorite.episode_id,
            )?;
            Ok(false)
        } else {
            self.add(favorite)?;
            Ok(true)
        }
    }

    /// Stored favorites in the given order
    pub fn sorted(&self, order: SortOrder) -> Vec<Favorite> {
        query::sort_favorites(self.list(), order)
    }

    /// Stored favorites whose title contains the pattern, case-insensitive
    pub fn filter_by_title(&self, pattern: &str) -> Vec<Favorite> {
        query::filter_by_title(&self.list(), pattern)
    }

    fn persist(&self, favorites: &[Favorite]) -> Result<(), FavoritesError> {
        let json = serde_json::to_string_pretty(favorites)?;
        self.slot.write(&json)?;
        Ok(())
    }
}
