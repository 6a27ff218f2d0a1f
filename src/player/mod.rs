pub mod controller;
pub mod playlist;

pub use controller::{
    EpisodeRef, NavToken, PlaybackController, PlaybackSnapshot, SeasonContext, SkipOutcome,
    TransportState,
};
pub use playlist::{next_step, previous_step, CrossShowTarget, Cursor, Landing, Step};
