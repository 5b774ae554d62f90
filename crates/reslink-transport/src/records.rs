//! Structured results exchanged with the editor.

use reslink_core::{MarkerColor, MediaKind, TrackType, TransitionKind};
use reslink_timeline::{Clip, Composition, MediaItem, Marker, MixSide, Track};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A timeline clip as returned by `scriptGetTimelineClipInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    pub id: i64,
    pub bin_id: String,
    pub track_id: i64,
    pub position: i64,
    pub duration: i64,
    #[serde(rename = "in")]
    pub source_in: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub mixes: Vec<MixRecord>,
}

impl ClipRecord {
    pub fn from_clip(clip: &Clip, track_id: i64) -> Self {
        Self {
            id: clip.id,
            bin_id: clip.bin_id.clone(),
            track_id,
            position: clip.start,
            duration: clip.duration,
            source_in: clip.source_in,
            name: clip.name.clone(),
            kind: clip.kind,
            mixes: clip
                .mixes
                .iter()
                .map(|m| MixRecord {
                    partner: m.partner,
                    duration: m.duration,
                    kind: m.kind,
                    side: m.side,
                })
                .collect(),
        }
    }

    pub fn end(&self) -> i64 {
        self.position + self.duration
    }

    pub fn mix(&self, side: MixSide) -> Option<&MixRecord> {
        self.mixes.iter().find(|m| m.side == side)
    }
}

/// One side of a same-track transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixRecord {
    pub partner: i64,
    pub duration: i64,
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    pub side: MixSide,
}

/// A track as listed by `scriptGetAllTracksInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackType,
    pub audio: bool,
    /// 0-based position in the full track list
    pub index: usize,
}

impl TrackRecord {
    pub fn from_track(track: &Track, index: usize) -> Self {
        Self {
            id: track.id,
            name: track.name.clone(),
            kind: track.kind,
            audio: track.kind == TrackType::Audio,
            index,
        }
    }
}

/// A composition as listed by `scriptGetCompositions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub track_id: i64,
    pub position: i64,
    pub duration: i64,
}

impl From<&Composition> for CompositionRecord {
    fn from(composition: &Composition) -> Self {
        Self {
            id: composition.id,
            kind: composition.kind.clone(),
            track_id: composition.track_id,
            position: composition.start,
            duration: composition.duration,
        }
    }
}

/// A guide or clip marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecord {
    pub frame: i64,
    pub name: String,
    pub note: String,
    pub category: i64,
    pub duration: i64,
    #[serde(default)]
    pub custom_data: String,
}

impl From<&Marker> for MarkerRecord {
    fn from(marker: &Marker) -> Self {
        Self {
            frame: marker.frame,
            name: marker.name.clone(),
            note: marker.note.clone(),
            category: marker.color.category(),
            duration: marker.duration,
            custom_data: marker.custom_data.clone(),
        }
    }
}

impl MarkerRecord {
    /// Canonical colour, if the category is one of the six known ones.
    pub fn color(&self) -> Option<MarkerColor> {
        MarkerColor::from_category(self.category).ok()
    }
}

/// A bin folder as listed by `scriptGetSubFolders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: String,
    pub name: String,
}

/// Bin clip properties as returned by `scriptGetClipProperties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinClipRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub duration: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub folder: String,
    /// Any further properties the editor reports
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<&MediaItem> for BinClipRecord {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            path: item.path.clone(),
            duration: item.duration,
            kind: item.kind,
            folder: item.folder.clone(),
            extra: item
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        }
    }
}
