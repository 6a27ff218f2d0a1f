// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

/// A podcast series as returned by the catalog API
///
/// The catalog root lists every show with season stubs; fetching a single
/// show by id returns the same shape with the episode lists populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Url>,
    #[serde(default, rename = "genreIds", alias = "genres")]
    pub genre_ids: Vec<u32>,
    #[serde(
        default,
        rename = "lastUpdated",
        alias = "updated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// An ordered collection of episodes within a show
///
/// A season's ordinal position is its index within `Show::seasons`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        rename = "previewImage",
        alias = "image",
        skip_serializing_if = "Option::is_none"
    )]
    pub preview_image: Option<Url>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// A single playable audio unit
///
/// Episodes carry no embedded show or season identity. Their position in the
/// season's episode list is the identity the player navigates by; the
/// fully-qualified (show, season, episode) triple is only reconstructed at
/// the point of favoriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    #[serde(rename = "audioUrl", alias = "file")]
    pub audio_url: Url,
}

/// Genre metadata looked up by numeric id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub shows: Vec<String>,
}

impl Show {
    /// First season of the show, if it has any
    pub fn first_season(&self) -> Option<&Season> {
        self.seasons.first()
    }

    /// Last season of the show, if it has any
    pub fn last_season(&self) -> Option<&Season> {
        self.seasons.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SHOW: &str = r#"{
        "id": "10716",
        "title": "Something Was Wrong",
        "description": "An award-winning docuseries &amp; true crime show",
        "image": "https://example.com/cover.jpg",
        "genres": [1, 2],
        "updated": "2022-11-03T07:00:00.000Z",
        "seasons": [
            {
                "id": "s1",
                "title": "Season 1",
                "image": "https://example.com/s1.jpg",
                "episodes": [
                    {
                        "id": "e1",
                        "title": "Pilot",
                        "file": "https://example.com/audio/e1.mp3"
                    },
                    {
                        "id": "e2",
                        "title": "The Follow-Up",
                        "audioUrl": "https://example.com/audio/e2.mp3"
                    }
                ]
            },
            {
                "id": "s2",
                "title": "Season 2"
            }
        ]
    }"#;

    #[test]
    fn show_parses_catalog_field_names() {
        let show: Show = serde_json::from_str(SAMPLE_SHOW).unwrap();

        assert_eq!(show.id, "10716");
        assert_eq!(show.title, "Something Was Wrong");
        assert_eq!(show.genre_ids, vec![1, 2]);
        assert!(show.last_updated.is_some());
        assert_eq!(show.seasons.len(), 2);

        let season = &show.seasons[0];
        assert_eq!(season.id, "s1");
        assert!(season.preview_image.is_some());
        assert_eq!(season.episodes.len(), 2);
    }

    #[test]
    fn episode_accepts_file_and_audio_url_spellings() {
        let show: Show = serde_json::from_str(SAMPLE_SHOW).unwrap();
        let episodes = &show.seasons[0].episodes;

        assert_eq!(
            episodes[0].audio_url.as_str(),
            "https://example.com/audio/e1.mp3"
        );
        assert_eq!(
            episodes[1].audio_url.as_str(),
            "https://example.com/audio/e2.mp3"
        );
    }

    #[test]
    fn season_stub_without_episodes_parses_empty() {
        let show: Show = serde_json::from_str(SAMPLE_SHOW).unwrap();
        assert!(show.seasons[1].episodes.is_empty());
    }

    #[test]
    fn show_tolerates_missing_optional_fields() {
        let show: Show =
            serde_json::from_str(r#"{"id": "1", "title": "Bare Minimum"}"#).unwrap();

        assert!(show.description.is_none());
        assert!(show.image.is_none());
        assert!(show.genre_ids.is_empty());
        assert!(show.last_updated.is_none());
        assert!(show.seasons.is_empty());
        assert!(show.first_season().is_none());
        assert!(show.last_season().is_none());
    }

    #[test]
    fn genre_parses() {
        let genre: Genre = serde_json::from_str(
            r#"{"id": 3, "title": "History", "description": "Past events", "shows": ["10716"]}"#,
        )
        .unwrap();

        assert_eq!(genre.id, 3);
        assert_eq!(genre.title, "History");
        assert_eq!(genre.shows, vec!["10716"]);
    }
}
