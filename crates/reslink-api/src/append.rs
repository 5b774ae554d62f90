//! Batch input accepted by `append_to_timeline`.
//!
//! Callers hand over one of four shapes. `normalize` reduces every shape to
//! the same list of `AppendEntry` values, so placement only ever deals with
//! one form.

use reslink_core::{ReslinkError, Result};

use crate::media_pool_item::MediaPoolItem;

/// A pool item restricted to a source range. `end_frame` is inclusive.
#[derive(Debug, Clone)]
pub struct SubClip {
    pub item: MediaPoolItem,
    pub start_frame: Option<i64>,
    pub end_frame: Option<i64>,
}

impl SubClip {
    pub fn new(item: MediaPoolItem) -> Self {
        Self {
            item,
            start_frame: None,
            end_frame: None,
        }
    }

    pub fn range(mut self, start_frame: i64, end_frame: i64) -> Self {
        self.start_frame = Some(start_frame);
        self.end_frame = Some(end_frame);
        self
    }
}

/// A file path to import before appending, with an optional range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaClip {
    pub media: String,
    pub start_frame: Option<i64>,
    pub end_frame: Option<i64>,
}

impl MediaClip {
    pub fn new(media: impl Into<String>) -> Self {
        Self {
            media: media.into(),
            start_frame: None,
            end_frame: None,
        }
    }

    pub fn range(mut self, start_frame: i64, end_frame: i64) -> Self {
        self.start_frame = Some(start_frame);
        self.end_frame = Some(end_frame);
        self
    }
}

#[derive(Debug, Clone)]
pub enum AppendInput {
    Item(MediaPoolItem),
    Items(Vec<MediaPoolItem>),
    SubClips(Vec<SubClip>),
    Media(Vec<MediaClip>),
}

impl From<MediaPoolItem> for AppendInput {
    fn from(item: MediaPoolItem) -> Self {
        Self::Item(item)
    }
}

impl From<&MediaPoolItem> for AppendInput {
    fn from(item: &MediaPoolItem) -> Self {
        Self::Item(item.clone())
    }
}

impl From<Vec<MediaPoolItem>> for AppendInput {
    fn from(items: Vec<MediaPoolItem>) -> Self {
        Self::Items(items)
    }
}

impl From<&[MediaPoolItem]> for AppendInput {
    fn from(items: &[MediaPoolItem]) -> Self {
        Self::Items(items.to_vec())
    }
}

impl From<Vec<SubClip>> for AppendInput {
    fn from(clips: Vec<SubClip>) -> Self {
        Self::SubClips(clips)
    }
}

impl From<Vec<MediaClip>> for AppendInput {
    fn from(clips: Vec<MediaClip>) -> Self {
        Self::Media(clips)
    }
}

/// Overrides applied to the whole batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOptions {
    /// Target track; the first video track when unset
    pub track_id: Option<i64>,
    /// Where the first entry lands; the end of the target track when unset
    pub start_position: Option<i64>,
}

#[derive(Debug, Clone)]
pub enum EntrySource {
    Pool(MediaPoolItem),
    Path(String),
}

/// One placement, in canonical form.
#[derive(Debug, Clone)]
pub struct AppendEntry {
    pub source: EntrySource,
    pub in_frame: Option<i64>,
    /// Inclusive
    pub out_frame: Option<i64>,
}

impl AppendEntry {
    fn whole(source: EntrySource) -> Self {
        Self {
            source,
            in_frame: None,
            out_frame: None,
        }
    }

    /// Source in point and length to place. `None` length means the rest
    /// of the source. A negative start or an end before the start is
    /// rejected.
    pub fn source_range(&self) -> Result<(i64, Option<i64>)> {
        let first = self.in_frame.unwrap_or(0);
        if first < 0 {
            return Err(ReslinkError::InvalidArgument(format!(
                "start frame must be non-negative, got {first}"
            )));
        }
        match self.out_frame {
            Some(last) if last < first => Err(ReslinkError::InvalidArgument(format!(
                "end frame {last} is before start frame {first}"
            ))),
            Some(last) => Ok((first, Some(last - first + 1))),
            None => Ok((first, None)),
        }
    }
}

/// Reduce any accepted input shape to canonical entries.
pub fn normalize(input: AppendInput) -> Vec<AppendEntry> {
    match input {
        AppendInput::Item(item) => vec![AppendEntry::whole(EntrySource::Pool(item))],
        AppendInput::Items(items) => items
            .into_iter()
            .map(|item| AppendEntry::whole(EntrySource::Pool(item)))
            .collect(),
        AppendInput::SubClips(clips) => clips
            .into_iter()
            .map(|clip| AppendEntry {
                source: EntrySource::Pool(clip.item),
                in_frame: clip.start_frame,
                out_frame: clip.end_frame,
            })
            .collect(),
        AppendInput::Media(clips) => clips
            .into_iter()
            .map(|clip| AppendEntry {
                source: EntrySource::Path(clip.media),
                in_frame: clip.start_frame,
                out_frame: clip.end_frame,
            })
            .collect(),
    }
}
