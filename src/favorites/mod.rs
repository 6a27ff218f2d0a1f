pub mod query;
pub mod slot;
pub mod store;

pub use query::{filter_by_title, sort_favorites, SortOrder};
pub use slot::{FileSlot, MemorySlot, StorageSlot};
pub use store::{Favorite, FavoritesStore};
