//! Browsing the local filesystem and bulk imports from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use reslink_core::Result;

use crate::append::MediaClip;
use crate::capability::Capability;
use crate::media_pool::{scan_media, MediaPool};
use crate::media_pool_item::MediaPoolItem;
use crate::session::Session;

/// What `add_item_list_to_media_pool` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemList {
    /// A file, or a directory whose importable files are all taken
    Path(String),
    Paths(Vec<String>),
    /// Media entries; ranges are not kept, the whole file is imported
    SubClips(Vec<MediaClip>),
}

impl From<&str> for ItemList {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ItemList {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<String>> for ItemList {
    fn from(paths: Vec<String>) -> Self {
        Self::Paths(paths)
    }
}

impl From<&[&str]> for ItemList {
    fn from(paths: &[&str]) -> Self {
        Self::Paths(paths.iter().map(|p| (*p).to_string()).collect())
    }
}

impl From<Vec<MediaClip>> for ItemList {
    fn from(clips: Vec<MediaClip>) -> Self {
        Self::SubClips(clips)
    }
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    session: Arc<Session>,
}

impl MediaStorage {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn mounted_volumes(&self) -> Vec<String> {
        vec!["/".to_string()]
    }

    /// Directories directly inside `path`, sorted.
    pub fn sub_folders(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        list_dir(path.as_ref(), |p| p.is_dir())
    }

    /// Files directly inside `path`, sorted.
    pub fn files(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        list_dir(path.as_ref(), |p| p.is_file())
    }

    /// Import files into the current bin folder. Directories expand to
    /// their importable files; paths that do not exist are skipped.
    pub fn add_item_list_to_media_pool(
        &self,
        list: impl Into<ItemList>,
    ) -> Result<Vec<MediaPoolItem>> {
        let paths = match list.into() {
            ItemList::Path(path) => vec![path],
            ItemList::Paths(paths) => paths,
            ItemList::SubClips(clips) => clips.into_iter().map(|c| c.media).collect(),
        };
        let mut files = Vec::new();
        for path in paths {
            let candidate = PathBuf::from(&path);
            if candidate.is_dir() {
                files.extend(scan_media(&candidate, None)?);
            } else if candidate.exists() {
                files.push(path);
            } else {
                warn!(path = %path, "skipping missing path");
            }
        }
        debug!(count = files.len(), "adding storage items to media pool");
        MediaPool::new(self.session.clone()).import_media(files.as_slice())
    }

    pub fn reveal_in_storage(&self, _path: &str) -> Capability<bool> {
        Capability::NotSupported("RevealInStorage")
    }
}

fn list_dir(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
    let mut entries: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| keep(path))
        .map(|path| path.display().to_string())
        .collect();
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reslink_core::ReslinkError;
    use reslink_transport::SimulationBackend;

    fn storage() -> (MediaStorage, MediaPool) {
        let session = Session::new(Arc::new(SimulationBackend::default()));
        (MediaStorage::new(session.clone()), MediaPool::new(session))
    }

    #[test]
    fn test_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shots")).unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"").unwrap();
        let (storage, _) = storage();
        assert_eq!(storage.sub_folders(dir.path()).unwrap().len(), 1);
        assert!(storage.files(dir.path()).unwrap()[0].ends_with("a.mp4"));
        assert!(matches!(
            storage.files(dir.path().join("missing")),
            Err(ReslinkError::Io(_))
        ));
    }

    #[test]
    fn test_directory_expands_and_missing_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["s01.png", "s02.png", "script.md"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let (storage, pool) = storage();
        let items = storage
            .add_item_list_to_media_pool(dir.path().display().to_string())
            .unwrap();
        assert_eq!(items.len(), 2);

        let single = dir.path().join("s01.png").display().to_string();
        let items = storage
            .add_item_list_to_media_pool(vec![single, "/nowhere/x.mp4".to_string()])
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(pool.all_clips().unwrap().len(), 3);
        assert!(!storage.reveal_in_storage("/").is_supported());
    }
}
