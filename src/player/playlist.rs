// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::catalog::Show;

/// Positional cursor into the catalog: which show, season, and episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub show: usize,
    pub season: usize,
    pub episode: usize,
}

/// Which episode a skip selects once the target season is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    FirstEpisode,
    LastEpisode,
}

/// A skip that leaves the active show for an adjacent one
///
/// The target season's episodes are not loaded yet; the controller fetches
/// the show detail and lands according to `landing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossShowTarget {
    pub show_index: usize,
    pub show_id: String,
    pub season_id: String,
    pub landing: Landing,
}

/// One step forward or backward through the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Stay in the active season and select this episode index
    Within(usize),
    /// Cross into an adjacent show
    Cross(CrossShowTarget),
}

/// Compute the step after `cursor`
///
/// The catalog plays like a flat, show-ordered list: past the last episode
/// of the active season the cursor moves to the next show's first season,
/// never to the next season of the same show. Returns None at the end of the
/// catalog, or when the adjacent show has no seasons to land in.
pub fn next_step(shows: &[Show], cursor: Cursor, episode_count: usize) -> Option<Step> {
    if episode_count > 0 && cursor.episode + 1 < episode_count {
        return Some(Step::Within(cursor.episode + 1));
    }

    let show_index = cursor.show + 1;
    let show = shows.get(show_index)?;
    let season = show.first_season()?;

    Some(Step::Cross(CrossShowTarget {
        show_index,
        show_id: show.id.clone(),
        season_id: season.id.clone(),
        landing: Landing::FirstEpisode,
    }))
}

/// Compute the step before `cursor`
///
/// Symmetric to [`next_step`]: from the first episode of a season the cursor
/// retreats to the previous show's last season's last episode.
pub fn previous_step(shows: &[Show], cursor: Cursor, episode_count: usize) -> Option<Step> {
    if episode_count > 0 && cursor.episode > 0 {
        return Some(Step::Within(cursor.episode - 1));
    }

    let show_index = cursor.show.checked_sub(1)?;
    let show = shows.get(show_index)?;
    let season = show.last_season()?;

    Some(Step::Cross(CrossShowTarget {
        show_index,
        show_id: show.id.clone(),
        season_id: season.id.clone(),
        landing: Landing::LastEpisode,
    }))
}
