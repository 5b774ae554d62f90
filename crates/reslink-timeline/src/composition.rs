//! Compositions: effects that blend a track onto the tracks below it.

use reslink_core::{FrameRange, ReslinkError, Result, TrackType};
use serde::{Deserialize, Serialize};

use crate::project::Timeline;

/// A composition placed on a video track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub id: i64,
    /// Composition identifier, e.g. `"wipe"` or `"composite"`
    pub kind: String,
    /// Track the composition sits on
    pub track_id: i64,
    /// Timeline position of the first frame
    pub start: i64,
    pub duration: i64,
}

impl Composition {
    pub fn range(&self) -> FrameRange {
        FrameRange::new(self.start, self.duration)
    }
}

impl Timeline {
    /// Place a composition and return its id.
    ///
    /// Compositions on one track never overlap each other; clips underneath
    /// are unaffected.
    pub fn add_composition(
        &mut self,
        kind: &str,
        track_id: i64,
        position: i64,
        duration: i64,
    ) -> Result<i64> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ReslinkError::InvalidArgument(
                "composition identifier is empty".to_string(),
            ));
        }
        let track = self.require_track(track_id)?;
        if track.kind != TrackType::Video {
            return Err(ReslinkError::InvalidArgument(format!(
                "compositions need a video track, {} is {}",
                track.name, track.kind
            )));
        }
        if position < 0 || duration < 1 {
            return Err(ReslinkError::InvalidArgument(format!(
                "composition at {position} for {duration} frames is out of range"
            )));
        }
        let range = FrameRange::new(position, duration);
        if let Some(other) = self
            .compositions
            .iter()
            .find(|c| c.track_id == track_id && c.range().overlaps(range))
        {
            return Err(ReslinkError::PositionConflict(format!(
                "frames {}..{} overlap composition {}",
                range.start,
                range.end(),
                other.id
            )));
        }
        let id = self.allocate_composition_id();
        self.compositions.push(Composition {
            id,
            kind: kind.to_string(),
            track_id,
            start: position,
            duration,
        });
        Ok(id)
    }

    pub fn composition(&self, id: i64) -> Option<&Composition> {
        self.compositions.iter().find(|c| c.id == id)
    }

    /// Remove a composition, returning it when it existed.
    pub fn remove_composition(&mut self, id: i64) -> Option<Composition> {
        let index = self.compositions.iter().position(|c| c.id == id)?;
        Some(self.compositions.remove(index))
    }
}
