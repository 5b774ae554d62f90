//! The project bin: imported media and the folder tree that organises it.

use reslink_core::defaults::ROOT_FOLDER_ID;
use reslink_core::{MediaKind, ReslinkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::marker::MarkerList;

/// Item property holding a title's document.
pub const TITLE_XML_PROPERTY: &str = "titleXml";

/// A source file imported into the bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Bin identifier, unique for the lifetime of the bin
    pub id: String,
    /// Display name (file name by default)
    pub name: String,
    /// Absolute source path
    pub path: String,
    pub kind: MediaKind,
    /// Length in frames. For stills this is the length given to new placements.
    pub duration: i64,
    /// Folder holding this item
    pub folder: String,
    /// Free-form properties set by callers
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Source markers, independent of timeline guides
    #[serde(default)]
    pub markers: MarkerList,
}

impl MediaItem {
    /// Source length available to timeline clips, `None` when unbounded.
    pub fn source_duration(&self) -> Option<i64> {
        match self.kind {
            MediaKind::Still => None,
            MediaKind::Video | MediaKind::Audio => Some(self.duration),
        }
    }
}

/// A bin folder. Items point at their folder; folders point at their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinFolder {
    pub id: String,
    pub name: String,
    /// `None` only for the root folder
    pub parent: Option<String>,
}

/// Media items and folders in import order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bin {
    items: Vec<MediaItem>,
    folders: Vec<BinFolder>,
    next_id: u64,
}

impl Default for Bin {
    fn default() -> Self {
        Self::new()
    }
}

impl Bin {
    /// Create a bin holding only the root folder.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            folders: vec![BinFolder {
                id: ROOT_FOLDER_ID.to_string(),
                name: "Master".to_string(),
                parent: None,
            }],
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    // ── Folders ─────────────────────────────────────────────────

    pub fn folder(&self, id: &str) -> Option<&BinFolder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Create a folder under `parent` and return its id.
    pub fn create_folder(&mut self, name: &str, parent: &str) -> Result<String> {
        if self.folder(parent).is_none() {
            return Err(ReslinkError::NotFound(format!("folder {parent}")));
        }
        let id = self.allocate_id();
        self.folders.push(BinFolder {
            id: id.clone(),
            name: name.to_string(),
            parent: Some(parent.to_string()),
        });
        Ok(id)
    }

    /// Direct children of a folder.
    pub fn sub_folders(&self, id: &str) -> Vec<&BinFolder> {
        self.folders
            .iter()
            .filter(|f| f.parent.as_deref() == Some(id))
            .collect()
    }

    // ── Items ───────────────────────────────────────────────────

    /// Add a media item and return its new bin id.
    pub fn import(
        &mut self,
        path: &str,
        kind: MediaKind,
        duration: i64,
        folder: &str,
    ) -> Result<String> {
        if self.folder(folder).is_none() {
            return Err(ReslinkError::NotFound(format!("folder {folder}")));
        }
        if duration < 1 {
            return Err(ReslinkError::InvalidArgument(format!(
                "media duration must be positive, got {duration}"
            )));
        }
        let name = std::path::Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        let id = self.allocate_id();
        self.items.push(MediaItem {
            id: id.clone(),
            name,
            path: path.to_string(),
            kind,
            duration,
            folder: folder.to_string(),
            properties: BTreeMap::new(),
            markers: MarkerList::new(),
        });
        Ok(id)
    }

    /// Add a generated title. Titles place like stills, for `duration` frames
    /// unless the placement says otherwise.
    pub fn create_title(
        &mut self,
        name: &str,
        xml: &str,
        duration: i64,
        folder: &str,
    ) -> Result<String> {
        if self.folder(folder).is_none() {
            return Err(ReslinkError::NotFound(format!("folder {folder}")));
        }
        if duration < 1 {
            return Err(ReslinkError::InvalidArgument(format!(
                "title duration must be positive, got {duration}"
            )));
        }
        let id = self.allocate_id();
        let mut properties = BTreeMap::new();
        properties.insert(TITLE_XML_PROPERTY.to_string(), xml.to_string());
        self.items.push(MediaItem {
            id: id.clone(),
            name: name.to_string(),
            path: String::new(),
            kind: MediaKind::Still,
            duration,
            folder: folder.to_string(),
            properties,
            markers: MarkerList::new(),
        });
        Ok(id)
    }

    pub fn item(&self, id: &str) -> Option<&MediaItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut MediaItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Look up an item or fail with `NotFound`.
    pub fn require(&self, id: &str) -> Result<&MediaItem> {
        self.item(id)
            .ok_or_else(|| ReslinkError::NotFound(format!("bin clip {id}")))
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut MediaItem> {
        self.item_mut(id)
            .ok_or_else(|| ReslinkError::NotFound(format!("bin clip {id}")))
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Ids of items directly inside `folder`.
    pub fn folder_item_ids(&self, folder: &str) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.folder == folder)
            .map(|i| i.id.clone())
            .collect()
    }

    /// Remove an item. Callers must check timeline references first.
    pub fn remove(&mut self, id: &str) -> Option<MediaItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Move an item to another folder.
    pub fn move_item(&mut self, id: &str, folder: &str) -> Result<()> {
        if self.folder(folder).is_none() {
            return Err(ReslinkError::NotFound(format!("folder {folder}")));
        }
        self.require_mut(id)?.folder = folder.to_string();
        Ok(())
    }
}
