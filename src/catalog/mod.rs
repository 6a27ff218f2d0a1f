pub mod gateway;
pub mod model;

pub use gateway::{CatalogGateway, DEFAULT_BASE_URL};
pub use model::{Episode, Genre, Season, Show};
