//! Clip types for the timeline.

use reslink_core::{ClipSpan, FrameRange, MediaKind, TransitionKind};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Which edge of a clip a mix is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixSide {
    Left,
    Right,
}

impl MixSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A same-track transition seen from one of its two clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixInfo {
    /// The clip on the other side of the boundary
    pub partner: i64,
    /// Frames shared by the two clips
    pub duration: i64,
    pub kind: TransitionKind,
    pub side: MixSide,
}

/// A clip on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: i64,
    /// Bin item this clip plays
    pub bin_id: String,
    /// Clip name (the bin item's name at insert time)
    pub name: String,
    pub kind: MediaKind,
    /// Timeline position of the first frame
    pub start: i64,
    /// Frames on the timeline
    pub duration: i64,
    /// Source in point
    pub source_in: i64,
    /// Source length, `None` for stills
    pub source_duration: Option<i64>,
    /// At most one mix per side
    #[serde(default)]
    pub mixes: SmallVec<[MixInfo; 2]>,
}

impl Clip {
    /// Get the placement span.
    pub fn span(&self) -> ClipSpan {
        ClipSpan {
            start: self.start,
            duration: self.duration,
            source_in: self.source_in,
            source_duration: self.source_duration,
        }
    }

    /// Apply a placement span computed elsewhere.
    pub fn set_span(&mut self, span: ClipSpan) {
        self.start = span.start;
        self.duration = span.duration;
        self.source_in = span.source_in;
    }

    /// Get the timeline range.
    #[inline]
    pub fn range(&self) -> FrameRange {
        FrameRange::new(self.start, self.duration)
    }

    /// End frame (exclusive).
    #[inline]
    pub fn end(&self) -> i64 {
        self.start + self.duration
    }

    pub fn right_offset(&self) -> i64 {
        self.span().right_offset()
    }

    /// The mix on `side`, if any.
    pub fn mix(&self, side: MixSide) -> Option<&MixInfo> {
        self.mixes.iter().find(|m| m.side == side)
    }

    /// Duration of the mix on `side`, 0 when there is none.
    pub fn mix_len(&self, side: MixSide) -> i64 {
        self.mix(side).map_or(0, |m| m.duration)
    }

    pub(crate) fn take_mix(&mut self, side: MixSide) -> Option<MixInfo> {
        let index = self.mixes.iter().position(|m| m.side == side)?;
        Some(self.mixes.remove(index))
    }
}
