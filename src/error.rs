use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog API
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse catalog JSON from {url}: {source}")]
    ParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected payload shape from {url}: {reason}")]
    MalformedData { url: String, reason: String },
}

/// Errors that can occur when reading or writing a persisted storage slot
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Failed to read storage slot {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write storage slot {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when persisting the favorites set
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Storage slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("Failed to serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur during playback navigation
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Episode '{episode_id}' is not in the active season")]
    EpisodeNotFound { episode_id: String },

    #[error("Season '{season_id}' not found in show '{show_id}'")]
    SeasonNotFound { show_id: String, season_id: String },

    #[error("Show '{show_id}' is not in the catalog")]
    ShowNotFound { show_id: String },

    #[error("Show '{show_id}' has no seasons")]
    NoSeasons { show_id: String },

    #[error("No show is loaded")]
    NotLoaded,
}
