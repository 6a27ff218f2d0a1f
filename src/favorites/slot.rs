use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::SlotError;

/// A single named blob of persisted state
///
/// Favorites live in exactly one slot, written whole on every change.
/// Readers see either the previous contents or the new contents, never a
/// partial write.
pub trait StorageSlot: Send + Sync {
    /// Read the current contents; `Ok(None)` means nothing was stored yet
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replace the contents in one write
    fn write(&self, contents: &str) -> Result<(), SlotError>;
}

/// File-backed slot
///
/// Writes go to a `.partial` sibling first and are renamed into place, so an
/// interrupted write never leaves a torn blob behind.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlotError::ReadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SlotError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let mut partial = self.path.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);

        std::fs::write(&partial, contents).map_err(|e| SlotError::WriteFailed {
            path: partial.clone(),
            source: e,
        })?;
        std::fs::rename(&partial, &self.path).map_err(|e| SlotError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// In-memory slot for tests and throwaway sessions
#[derive(Default)]
pub struct MemorySlot {
    contents: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.contents.lock().unwrap().clone())
    }

    fn write(&self, contents: &str) -> Result<(), SlotError> {
        *self.contents.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_slot_reads_none_when_absent() {
        let dir = tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("favorites.json"));

        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn file_slot_roundtrips() {
        let dir = tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("favorites.json"));

        slot.write("[1, 2, 3]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[1, 2, 3]"));
    }

    #[test]
    fn file_slot_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("deep/nested/favorites.json"));

        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_slot_leaves_no_partial_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        let slot = FileSlot::new(&path);

        slot.write("[]").unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("favorites.json.partial").exists());
    }

    #[test]
    fn file_slot_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("favorites.json"));

        slot.write("first").unwrap();
        slot.write("second").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn memory_slot_roundtrips() {
        let slot = MemorySlot::new();

        assert!(slot.read().unwrap().is_none());
        slot.write("hello").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("hello"));
    }
}
