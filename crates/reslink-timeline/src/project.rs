//! Project and timeline types.

use reslink_core::defaults;
use reslink_core::{FrameRate, ReslinkError, Result, TrackType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bin::Bin;
use crate::clip::Clip;
use crate::composition::Composition;
use crate::marker::MarkerList;
use crate::track::Track;

/// A project: one bin and exactly one timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,
    /// Timeline frame rate
    pub frame_rate: FrameRate,
    /// Resolution width
    pub width: u32,
    /// Resolution height
    pub height: u32,
    /// Free-form project properties
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// Imported media
    pub bin: Bin,
    /// The single timeline
    pub timeline: Timeline,
}

impl Project {
    /// Create a new empty project with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_rate: defaults::FRAME_RATE,
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            settings: BTreeMap::new(),
            bin: Bin::new(),
            timeline: Timeline::default(),
        }
    }

    /// Timeline clips that play the given bin item.
    pub fn clips_referencing(&self, bin_id: &str) -> Vec<i64> {
        self.timeline
            .tracks
            .iter()
            .flat_map(|t| t.clips())
            .filter(|c| c.bin_id == bin_id)
            .map(|c| c.id)
            .collect()
    }

    /// Remove a bin item. Fails with `MediaInUse` while a clip plays it.
    pub fn delete_media(&mut self, bin_id: &str) -> Result<()> {
        self.bin.require(bin_id)?;
        let users = self.clips_referencing(bin_id);
        if !users.is_empty() {
            return Err(ReslinkError::MediaInUse(format!(
                "bin clip {bin_id} is used by timeline clips {users:?}"
            )));
        }
        self.bin.remove(bin_id);
        Ok(())
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// The timeline: tracks, guides and the playhead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Timeline name
    pub name: String,
    /// Tracks in stacking order
    pub tracks: Vec<Track>,
    /// Timeline markers
    #[serde(default)]
    pub guides: MarkerList,
    /// Playhead frame
    #[serde(default)]
    pub position: i64,
    /// Compositions on video tracks
    #[serde(default)]
    pub compositions: Vec<Composition>,
    next_track_id: i64,
    next_clip_id: i64,
    #[serde(default)]
    next_composition_id: i64,
}

impl Timeline {
    /// Create a timeline without tracks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            guides: MarkerList::new(),
            position: 0,
            compositions: Vec::new(),
            next_track_id: 0,
            next_clip_id: 0,
            next_composition_id: 0,
        }
    }

    /// Create a timeline with the usual video and audio tracks.
    pub fn with_tracks(name: impl Into<String>, video: usize, audio: usize) -> Self {
        let mut timeline = Self::new(name);
        for i in 0..video {
            timeline.add_track(format!("V{}", i + 1), TrackType::Video);
        }
        for i in 0..audio {
            timeline.add_track(format!("A{}", i + 1), TrackType::Audio);
        }
        timeline
    }

    /// Append a track and return its id.
    pub fn add_track(&mut self, name: impl Into<String>, kind: TrackType) -> i64 {
        let id = self.next_track_id;
        self.next_track_id += 1;
        self.tracks.push(Track::new(id, name, kind));
        id
    }

    pub(crate) fn allocate_clip_id(&mut self) -> i64 {
        let id = self.next_clip_id;
        self.next_clip_id += 1;
        id
    }

    pub(crate) fn allocate_composition_id(&mut self) -> i64 {
        let id = self.next_composition_id;
        self.next_composition_id += 1;
        id
    }

    pub fn track(&self, id: i64) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: i64) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn require_track(&self, id: i64) -> Result<&Track> {
        self.track(id)
            .ok_or_else(|| ReslinkError::NotFound(format!("track {id}")))
    }

    pub(crate) fn require_track_mut(&mut self, id: i64) -> Result<&mut Track> {
        self.track_mut(id)
            .ok_or_else(|| ReslinkError::NotFound(format!("track {id}")))
    }

    /// Tracks of one type, in order.
    pub fn tracks_of(&self, kind: TrackType) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }

    /// 1-based position of a track among tracks of the same type.
    pub fn type_index(&self, track_id: i64) -> Option<(TrackType, usize)> {
        let track = self.track(track_id)?;
        let index = self
            .tracks_of(track.kind)
            .position(|t| t.id == track_id)?;
        Some((track.kind, index + 1))
    }

    /// Find a clip and the track holding it.
    pub fn find_clip(&self, clip_id: i64) -> Option<(&Track, &Clip)> {
        self.tracks
            .iter()
            .find_map(|t| t.clip(clip_id).map(|c| (t, c)))
    }

    pub fn require_clip(&self, clip_id: i64) -> Result<(&Track, &Clip)> {
        self.find_clip(clip_id)
            .ok_or_else(|| ReslinkError::NotFound(format!("timeline clip {clip_id}")))
    }

    /// End of the last clip on any track.
    pub fn duration(&self) -> i64 {
        self.tracks.iter().map(Track::end).max().unwrap_or(0)
    }

    /// Total number of clips on all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(Track::clip_count).sum()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::with_tracks("Timeline 1", 2, 1)
    }
}
