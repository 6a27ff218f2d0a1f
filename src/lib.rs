pub mod catalog;
pub mod error;
pub mod favorites;
pub mod http;
pub mod player;

// Re-export main types for convenience
pub use catalog::{CatalogGateway, Episode, Genre, Season, Show, DEFAULT_BASE_URL};
pub use error::{CatalogError, FavoritesError, PlayerError, SlotError};
pub use favorites::{Favorite, FavoritesStore, FileSlot, MemorySlot, SortOrder, StorageSlot};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use player::{
    EpisodeRef, NavToken, PlaybackController, PlaybackSnapshot, SkipOutcome, TransportState,
};
