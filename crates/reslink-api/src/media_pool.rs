//! The project bin: folders, imports and appending to the timeline.

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use reslink_core::defaults::ROOT_FOLDER_ID;
use reslink_core::{MediaKind, ReslinkError, Result, TrackType};
use reslink_transport::{FolderRecord, Method};

use crate::append::{normalize, AppendInput, AppendOptions, EntrySource};
use crate::media_pool_item::MediaPoolItem;
use crate::session::{FolderRef, Session};
use crate::timeline::Timeline;
use crate::timeline_item::TimelineItem;

const DEFAULT_TITLE_NAME: &str = "Title clip";

/// A bin folder.
#[derive(Debug, Clone)]
pub struct Folder {
    session: Arc<Session>,
    id: String,
    name: String,
}

impl PartialEq for Folder {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Folder {
    fn from_ref(session: Arc<Session>, folder: FolderRef) -> Self {
        Self {
            session,
            id: folder.id,
            name: folder.name,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clips filed directly in this folder.
    pub fn clip_list(&self) -> Result<Vec<MediaPoolItem>> {
        let ids = self
            .session
            .call_strings(Method::GetFolderClipIds, &[Value::from(self.id.as_str())])?;
        Ok(ids
            .into_iter()
            .map(|id| MediaPoolItem::new(self.session.clone(), id))
            .collect())
    }

    pub fn sub_folder_list(&self) -> Result<Vec<Folder>> {
        let records: Vec<FolderRecord> = self
            .session
            .call_records(Method::GetSubFolders, &[Value::from(self.id.as_str())])?;
        Ok(records
            .into_iter()
            .map(|r| Folder {
                session: self.session.clone(),
                id: r.id,
                name: r.name,
            })
            .collect())
    }

    /// Folders never go stale in the editor's bin.
    pub fn is_folder_stale(&self) -> bool {
        false
    }

    fn folder_ref(&self) -> FolderRef {
        FolderRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Handle to the project's media pool.
#[derive(Debug, Clone)]
pub struct MediaPool {
    session: Arc<Session>,
}

impl MediaPool {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    // ── Folders ─────────────────────────────────────────────────

    pub fn root_folder(&self) -> Folder {
        Folder::from_ref(self.session.clone(), FolderRef::root())
    }

    /// Folder that `import_media` files into.
    pub fn current_folder(&self) -> Folder {
        Folder::from_ref(self.session.clone(), self.session.current_folder())
    }

    pub fn set_current_folder(&self, folder: &Folder) -> Result<bool> {
        // Listing fails for folders the editor does not know.
        self.session
            .call(Method::GetSubFolders, &[Value::from(folder.id.as_str())])?;
        self.session.set_current_folder(folder.folder_ref());
        Ok(true)
    }

    /// Create a folder under `parent`, or under the current folder.
    pub fn add_sub_folder(&self, parent: Option<&Folder>, name: &str) -> Result<Folder> {
        let parent = parent.map_or_else(|| self.session.current_folder(), Folder::folder_ref);
        let id = self.session.call_string(
            Method::CreateFolder,
            &[Value::from(name), Value::from(parent.id.as_str())],
        )?;
        debug!(folder = %id, parent = %parent.id, name, "folder created");
        Ok(Folder {
            session: self.session.clone(),
            id,
            name: name.to_string(),
        })
    }

    // ── Import ──────────────────────────────────────────────────

    /// Import files into the current folder.
    pub fn import_media<P: AsRef<str>>(&self, paths: &[P]) -> Result<Vec<MediaPoolItem>> {
        let folder = self.session.current_folder();
        self.import_into_id(paths, &folder.id)
    }

    pub fn import_media_into<P: AsRef<str>>(
        &self,
        paths: &[P],
        folder: &Folder,
    ) -> Result<Vec<MediaPoolItem>> {
        self.import_into_id(paths, &folder.id)
    }

    /// Import every importable file directly inside `dir`, optionally only
    /// those with extension `ext`. Files are taken in name order.
    pub fn import_media_from_folder(
        &self,
        dir: impl AsRef<Path>,
        ext: Option<&str>,
    ) -> Result<Vec<MediaPoolItem>> {
        let paths = scan_media(dir.as_ref(), ext)?;
        self.import_media(paths.as_slice())
    }

    pub(crate) fn import_one_into_root(&self, path: &str) -> Result<MediaPoolItem> {
        let mut items = self.import_into_id(&[path], ROOT_FOLDER_ID)?;
        items
            .pop()
            .ok_or_else(|| ReslinkError::NotFound(format!("import of {path}")))
    }

    /// Every path is classified before the first import, so an unsupported
    /// file fails the batch without touching the bin. A remote failure
    /// part way through leaves earlier imports in place.
    fn import_into_id<P: AsRef<str>>(&self, paths: &[P], folder: &str) -> Result<Vec<MediaPoolItem>> {
        for path in paths {
            MediaKind::from_path(path.as_ref())?;
        }
        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let id = self.session.call_string(
                Method::ImportMedia,
                &[Value::from(path), Value::from(folder)],
            )?;
            info!(path, bin_id = %id, folder, "media imported");
            items.push(MediaPoolItem::new(self.session.clone(), id));
        }
        Ok(items)
    }

    /// Create a title from a title document. The title places like a still,
    /// for `duration` frames by default. `None` files it into the current folder.
    pub fn create_title_clip(
        &self,
        title_xml: &str,
        duration: i64,
        name: &str,
        folder: Option<&Folder>,
    ) -> Result<MediaPoolItem> {
        if duration < 1 {
            return Err(ReslinkError::InvalidArgument(format!(
                "title duration must be at least one frame, got {duration}"
            )));
        }
        let name = if name.trim().is_empty() { DEFAULT_TITLE_NAME } else { name };
        let folder = folder.map_or_else(|| self.session.current_folder(), Folder::folder_ref);
        let id = self.session.call_string(
            Method::CreateTitleClip,
            &[
                Value::from(title_xml),
                Value::from(duration),
                Value::from(name),
                Value::from(folder.id.as_str()),
            ],
        )?;
        info!(name, bin_id = %id, duration, "title created");
        Ok(MediaPoolItem::new(self.session.clone(), id))
    }

    // ── Clips ───────────────────────────────────────────────────

    pub fn all_clips(&self) -> Result<Vec<MediaPoolItem>> {
        let ids = self.session.call_strings(Method::GetAllClipIds, &[])?;
        Ok(ids
            .into_iter()
            .map(|id| MediaPoolItem::new(self.session.clone(), id))
            .collect())
    }

    pub fn clip_by_id(&self, id: &str) -> Result<Option<MediaPoolItem>> {
        Ok(self.all_clips()?.into_iter().find(|c| c.media_id() == id))
    }

    /// Delete clips in order; stops at the first one still in use.
    pub fn delete_clips(&self, clips: &[MediaPoolItem]) -> Result<bool> {
        for clip in clips {
            clip.delete()?;
        }
        Ok(true)
    }

    pub fn move_clips(&self, clips: &[MediaPoolItem], folder: &Folder) -> Result<bool> {
        for clip in clips {
            self.session.call_bool(
                Method::MoveBinClip,
                &[Value::from(clip.media_id()), Value::from(folder.id.as_str())],
            )?;
        }
        Ok(true)
    }

    // ── Timeline ────────────────────────────────────────────────

    /// The editor keeps a single timeline: this renames it and returns it.
    pub fn create_empty_timeline(&self, name: &str) -> Result<Timeline> {
        let timeline = Timeline::new(self.session.clone());
        timeline.set_name(name)?;
        Ok(timeline)
    }

    /// Append a batch to the end of a track.
    ///
    /// Returns `None` when the batch is empty or the target track cannot
    /// hold one of its media kinds. Entries are placed back to back from
    /// `start_position`, or from the current end of the track.
    pub fn append_to_timeline(
        &self,
        input: impl Into<AppendInput>,
        options: AppendOptions,
    ) -> Result<Option<Vec<TimelineItem>>> {
        let entries = normalize(input.into());
        if entries.is_empty() {
            return Ok(None);
        }
        let timeline = Timeline::new(self.session.clone());
        let track = match options.track_id {
            Some(id) => self.session.track(id)?,
            None => match timeline.track_info(TrackType::Video, 1)? {
                Some(track) => track,
                None => return Ok(None),
            },
        };

        for entry in &entries {
            let kind = match &entry.source {
                EntrySource::Pool(item) => item.kind()?,
                EntrySource::Path(path) => MediaKind::from_path(path)?,
            };
            if !track.kind.accepts(kind) {
                warn!(track = %track.name, %kind, "append batch does not fit the track");
                return Ok(None);
            }
        }

        let mut position = match options.start_position {
            Some(position) => position,
            None => self
                .session
                .clips_on_track(track.id)?
                .iter()
                .map(|c| c.end())
                .max()
                .unwrap_or(0),
        };
        info!(track = %track.name, entries = entries.len(), position, "appending to timeline");

        let mut placed = Vec::with_capacity(entries.len());
        for entry in entries {
            let (source_in, length) = entry.source_range()?;
            let item = match entry.source {
                EntrySource::Pool(item) => item,
                EntrySource::Path(path) => self.import_one_into_root(&path)?,
            };
            let clip = timeline.place(&item, track.id, position, Some(source_in), length)?;
            position += clip.duration()?;
            placed.push(clip);
        }
        Ok(Some(placed))
    }
}

/// Importable files directly inside `dir`, sorted by name.
pub(crate) fn scan_media(dir: &Path, ext: Option<&str>) -> Result<Vec<String>> {
    let wanted = ext.map(|e| e.trim_start_matches('.').to_ascii_lowercase());
    let mut paths: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && MediaKind::is_importable(path))
        .filter(|path| match &wanted {
            Some(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
            None => true,
        })
        .map(|path| path.display().to_string())
        .collect();
    paths.sort();
    Ok(paths)
}
