// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use tracing::warn;

use crate::catalog::{CatalogGateway, Episode, Season, Show};
use crate::error::PlayerError;
use crate::http::HttpClient;

use super::playlist::{self, CrossShowTarget, Cursor, Landing, Step};

/// Transport states of the player
///
/// `Playing` and `Paused` are the two faces of `Loaded` with an episode
/// selected; `Loaded` alone means the season's list is up but nothing is
/// selected (the placeholder track).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Loaded,
    Playing,
    Paused,
}

/// Ticket for one navigation action
///
/// Issued by [`PlaybackController::begin_navigation`]; a fetch completion
/// carrying a ticket older than the latest navigation is stale and gets
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavToken(u64);

/// Outcome of a skip request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// Moved to an adjacent episode within the active season
    Moved,
    /// Crossed into an adjacent show's season
    Crossed,
    /// Already at the edge of the catalog, nothing to do
    AtEdge,
    /// No episode is selected, skip ignored
    NoSelection,
    /// A newer navigation action started after this one; nothing was changed
    Superseded,
}

/// The show/season context the transport is currently inside
///
/// Produced by [`PlaybackController::resolve_target`] from a show-detail
/// fetch and swapped in whole by [`PlaybackController::install_season`], so
/// the episode list and the selection can never disagree.
#[derive(Debug, Clone)]
pub struct SeasonContext {
    /// Position of the show in the cached catalog list
    pub show_index: usize,
    pub show_id: String,
    pub show_title: String,
    /// All seasons of the show, with episodes populated
    pub seasons: Vec<Season>,
    /// Position of the active season within `seasons`
    pub season_index: usize,
    /// Position of the selected episode within the active season, if any
    pub selected: Option<usize>,
}

impl SeasonContext {
    /// The active season
    pub fn season(&self) -> Option<&Season> {
        self.seasons.get(self.season_index)
    }

    /// Episodes of the active season
    pub fn episodes(&self) -> &[Episode] {
        self.season().map(|s| s.episodes.as_slice()).unwrap_or(&[])
    }
}

/// Fully-qualified identity of the selected episode
///
/// Playback navigates by position; favoriting and persistence need ids.
/// This is the single conversion point between the two representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    pub show_id: String,
    pub show_title: String,
    pub season_id: String,
    pub season_title: String,
    pub episode_id: String,
    pub episode_title: String,
}

/// Render-ready snapshot of the transport for a UI to display
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub state: TransportState,
    pub show_title: Option<String>,
    pub season_title: Option<String>,
    pub episode_title: Option<String>,
    /// 1-based position of the selection within the season
    pub episode_number: Option<usize>,
    pub episode_count: usize,
    pub paused: bool,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub progress_percent: f64,
}

/// Owns the transport state machine and the skip/seek navigation algorithm
///
/// All mutation happens through `&mut self` on the single event-processing
/// task; the only suspension points are the catalog fetches. Completions of
/// those fetches are guarded by a generation counter so a late response
/// cannot clobber a newer user action.
pub struct PlaybackController<C: HttpClient> {
    gateway: CatalogGateway<C>,
    shows: Vec<Show>,
    active: Option<SeasonContext>,
    paused: bool,
    position: f64,
    duration: f64,
    generation: u64,
}

impl<C: HttpClient> PlaybackController<C> {
    pub fn new(gateway: CatalogGateway<C>) -> Self {
        Self {
            gateway,
            shows: Vec::new(),
            active: None,
            paused: true,
            position: 0.0,
            duration: 0.0,
            generation: 0,
        }
    }

    /// The cached catalog list (empty until the catalog is loaded)
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Episodes of the active season (empty when idle)
    pub fn episodes(&self) -> &[Episode] {
        self.active.as_ref().map(|ctx| ctx.episodes()).unwrap_or(&[])
    }

    /// All seasons of the active show, episodes populated (empty when idle)
    pub fn active_show_seasons(&self) -> &[Season] {
        self.active
            .as_ref()
            .map(|ctx| ctx.seasons.as_slice())
            .unwrap_or(&[])
    }

    /// Index of the active season within the active show, if any
    pub fn active_season_index(&self) -> Option<usize> {
        self.active.as_ref().map(|ctx| ctx.season_index)
    }

    /// The selected episode, if any
    pub fn selected_episode(&self) -> Option<&Episode> {
        let ctx = self.active.as_ref()?;
        ctx.episodes().get(ctx.selected?)
    }

    /// Current transport state, derived from context and selection
    pub fn state(&self) -> TransportState {
        match &self.active {
            None => TransportState::Idle,
            Some(ctx) => match ctx.selected {
                None => TransportState::Loaded,
                Some(_) => {
                    if self.paused {
                        TransportState::Paused
                    } else {
                        TransportState::Playing
                    }
                }
            },
        }
    }

    /// Fetch the catalog and open the first show's first season
    ///
    /// Selects episode 0 if the season has episodes, paused. An empty
    /// catalog, a first show without seasons, or a failed fetch leaves the
    /// controller idle with a logged warning; this never panics and never
    /// errors to the caller.
    pub async fn load_initial_show(&mut self) {
        let shows = match self.gateway.list_shows().await {
            Ok(shows) => shows,
            Err(e) => {
                warn!("catalog fetch failed, staying idle: {e}");
                return;
            }
        };

        let target = {
            let Some(first) = shows.first() else {
                warn!("catalog is empty, staying idle");
                self.shows = shows;
                return;
            };
            let Some(season) = first.first_season() else {
                warn!("show '{}' has no seasons, staying idle", first.title);
                self.shows = shows;
                return;
            };
            CrossShowTarget {
                show_index: 0,
                show_id: first.id.clone(),
                season_id: season.id.clone(),
                landing: Landing::FirstEpisode,
            }
        };
        self.shows = shows;

        let token = self.begin_navigation();
        match self.resolve_target(&target).await {
            Ok(context) => {
                self.install_season(token, context, false);
            }
            Err(e) => warn!("failed to load initial show: {e}"),
        }
    }

    /// Open a show from the cached catalog at its first season
    ///
    /// Nothing is selected as playing until the caller picks an episode;
    /// episode 0 is selected paused when the season has episodes.
    pub async fn open_show(&mut self, show_id: &str) -> Result<(), PlayerError> {
        let Some(show_index) = self.shows.iter().position(|s| s.id == show_id) else {
            return Err(PlayerError::ShowNotFound {
                show_id: show_id.to_string(),
            });
        };
        let Some(season) = self.shows[show_index].first_season() else {
            return Err(PlayerError::NoSeasons {
                show_id: show_id.to_string(),
            });
        };

        let target = CrossShowTarget {
            show_index,
            show_id: show_id.to_string(),
            season_id: season.id.clone(),
            landing: Landing::FirstEpisode,
        };

        let token = self.begin_navigation();
        let context = self.resolve_target(&target).await?;
        self.install_season(token, context, false);
        Ok(())
    }

    /// Select an episode of the active season by id and start playing it
    pub fn select_episode(&mut self, episode_id: &str) -> Result<(), PlayerError> {
        let index = match &self.active {
            None => return Err(PlayerError::NotLoaded),
            Some(ctx) => ctx
                .episodes()
                .iter()
                .position(|e| e.id == episode_id)
                .ok_or_else(|| PlayerError::EpisodeNotFound {
                    episode_id: episode_id.to_string(),
                })?,
        };

        self.begin_navigation();
        if let Some(ctx) = self.active.as_mut() {
            ctx.selected = Some(index);
        }
        self.paused = false;
        self.position = 0.0;
        self.duration = 0.0;
        Ok(())
    }

    /// Replace the active season with another season of the same show
    ///
    /// The episode list swap and the selection reset happen in one call; no
    /// observer ever sees the new list with the old selection.
    pub fn switch_season(&mut self, season_id: &str) -> Result<(), PlayerError> {
        let index = match &self.active {
            None => return Err(PlayerError::NotLoaded),
            Some(ctx) => ctx
                .seasons
                .iter()
                .position(|s| s.id == season_id)
                .ok_or_else(|| PlayerError::SeasonNotFound {
                    show_id: ctx.show_id.clone(),
                    season_id: season_id.to_string(),
                })?,
        };

        self.begin_navigation();
        if let Some(ctx) = self.active.as_mut() {
            ctx.season_index = index;
            ctx.selected = None;
        }
        self.position = 0.0;
        self.duration = 0.0;
        Ok(())
    }

    /// Toggle play/pause; ignored when nothing is selected
    pub fn play_pause(&mut self) {
        if self.cursor().is_some() {
            self.paused = !self.paused;
        }
    }

    /// Nudge the position by `delta` seconds, clamped into `[0, duration]`
    ///
    /// Episode selection and pause state are untouched.
    pub fn seek_relative(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.position = (self.position + delta).clamp(0.0, self.duration.max(0.0));
    }

    /// Advance to the next episode, crossing into the next show at a
    /// season edge
    ///
    /// A failed boundary fetch abandons the skip; selection and indexes are
    /// untouched.
    pub async fn skip_to_next(&mut self) -> Result<SkipOutcome, PlayerError> {
        if self.cursor().is_none() {
            return Ok(SkipOutcome::NoSelection);
        }
        match self.plan_next() {
            None => Ok(SkipOutcome::AtEdge),
            Some(step) => self.apply_step(step).await,
        }
    }

    /// Retreat to the previous episode, crossing into the previous show's
    /// last season at a season edge
    pub async fn skip_to_previous(&mut self) -> Result<SkipOutcome, PlayerError> {
        if self.cursor().is_none() {
            return Ok(SkipOutcome::NoSelection);
        }
        match self.plan_previous() {
            None => Ok(SkipOutcome::AtEdge),
            Some(step) => self.apply_step(step).await,
        }
    }

    /// The step a forward skip would take, without mutating anything
    pub fn plan_next(&self) -> Option<Step> {
        let cursor = self.cursor()?;
        playlist::next_step(&self.shows, cursor, self.episodes().len())
    }

    /// The step a backward skip would take, without mutating anything
    pub fn plan_previous(&self) -> Option<Step> {
        let cursor = self.cursor()?;
        playlist::previous_step(&self.shows, cursor, self.episodes().len())
    }

    /// Start a navigation action
    ///
    /// Any fetch completion still in flight for an earlier action becomes
    /// stale once this returns.
    pub fn begin_navigation(&mut self) -> NavToken {
        self.generation += 1;
        NavToken(self.generation)
    }

    /// Resolve a cross-show target into an installable season context by
    /// fetching the target show's detail
    pub async fn resolve_target(
        &self,
        target: &CrossShowTarget,
    ) -> Result<SeasonContext, PlayerError> {
        let show = self.gateway.get_show(&target.show_id).await?;

        let season_index = show
            .seasons
            .iter()
            .position(|s| s.id == target.season_id)
            .ok_or_else(|| PlayerError::SeasonNotFound {
                show_id: target.show_id.clone(),
                season_id: target.season_id.clone(),
            })?;

        let episode_count = show.seasons[season_index].episodes.len();
        let selected = match target.landing {
            Landing::FirstEpisode => {
                if episode_count > 0 {
                    Some(0)
                } else {
                    None
                }
            }
            Landing::LastEpisode => episode_count.checked_sub(1),
        };

        Ok(SeasonContext {
            show_index: target.show_index,
            show_id: show.id.clone(),
            show_title: show.title.clone(),
            seasons: show.seasons,
            season_index,
            selected,
        })
    }

    /// Install a fetched season context in one atomic swap
    ///
    /// Returns `Superseded` without touching state when a newer navigation
    /// action has started since `token` was issued — the guard against late
    /// fetch completions clobbering what the user did in the meantime.
    pub fn install_season(
        &mut self,
        token: NavToken,
        context: SeasonContext,
        unpause: bool,
    ) -> SkipOutcome {
        if token.0 != self.generation {
            return SkipOutcome::Superseded;
        }

        let has_selection = context.selected.is_some();
        self.active = Some(context);
        self.position = 0.0;
        self.duration = 0.0;
        if unpause && has_selection {
            self.paused = false;
        }
        SkipOutcome::Crossed
    }

    /// Position report from the audio output
    pub fn on_time_update(&mut self, position_seconds: f64) {
        if !position_seconds.is_finite() {
            return;
        }
        self.position = if self.duration > 0.0 {
            position_seconds.clamp(0.0, self.duration)
        } else {
            position_seconds.max(0.0)
        };
    }

    /// Duration report from the audio output once track metadata is known
    pub fn on_duration_known(&mut self, duration_seconds: f64) {
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return;
        }
        self.duration = duration_seconds;
        if self.position > duration_seconds {
            self.position = duration_seconds;
        }
    }

    /// The audio output started producing sound
    pub fn on_playback_started(&mut self) {
        self.paused = false;
    }

    /// The audio output ran off the end of the track
    pub fn on_playback_ended(&mut self) {
        self.paused = true;
        self.position = self.duration;
    }

    /// Display progress in percent, always in `[0, 100]` and `0` (never
    /// NaN) while the duration is unknown
    pub fn progress_percent(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        ((self.position / self.duration) * 100.0).clamp(0.0, 100.0)
    }

    /// Identity triple of the selection, for favoriting
    pub fn current_episode_ref(&self) -> Option<EpisodeRef> {
        let ctx = self.active.as_ref()?;
        let index = ctx.selected?;
        let season = ctx.season()?;
        let episode = season.episodes.get(index)?;

        Some(EpisodeRef {
            show_id: ctx.show_id.clone(),
            show_title: ctx.show_title.clone(),
            season_id: season.id.clone(),
            season_title: season.title.clone(),
            episode_id: episode.id.clone(),
            episode_title: episode.title.clone(),
        })
    }

    /// Plain state snapshot for a UI to render
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let ctx = self.active.as_ref();

        PlaybackSnapshot {
            state: self.state(),
            show_title: ctx.map(|c| c.show_title.clone()),
            season_title: ctx.and_then(|c| c.season()).map(|s| s.title.clone()),
            episode_title: self.selected_episode().map(|e| e.title.clone()),
            episode_number: ctx.and_then(|c| c.selected).map(|i| i + 1),
            episode_count: self.episodes().len(),
            paused: self.paused,
            position_seconds: self.position,
            duration_seconds: self.duration,
            progress_percent: self.progress_percent(),
        }
    }

    fn cursor(&self) -> Option<Cursor> {
        let ctx = self.active.as_ref()?;
        Some(Cursor {
            show: ctx.show_index,
            season: ctx.season_index,
            episode: ctx.selected?,
        })
    }

    async fn apply_step(&mut self, step: Step) -> Result<SkipOutcome, PlayerError> {
        match step {
            Step::Within(index) => {
                self.begin_navigation();
                if let Some(ctx) = self.active.as_mut() {
                    ctx.selected = Some(index);
                }
                self.position = 0.0;
                self.duration = 0.0;
                self.paused = false;
                Ok(SkipOutcome::Moved)
            }
            Step::Cross(target) => {
                let token = self.begin_navigation();
                let context = self.resolve_target(&target).await?;
                Ok(self.install_season(token, context, true))
            }
        }
    }
}
