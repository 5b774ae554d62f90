//! Track types for the timeline.

use reslink_core::{EdgeContext, FrameRange, TrackType};
use serde::{Deserialize, Serialize};

use crate::clip::{Clip, MixSide};

/// A track holding clips ordered by start frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: i64,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackType,
    /// Clips sorted by start
    clips: Vec<Clip>,
}

impl Track {
    /// Create an empty track.
    pub fn new(id: i64, name: impl Into<String>, kind: TrackType) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            clips: Vec::new(),
        }
    }

    /// Clips in timeline order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// End of the last clip, 0 for an empty track.
    pub fn end(&self) -> i64 {
        self.clips.iter().map(Clip::end).max().unwrap_or(0)
    }

    pub fn clip(&self, id: i64) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn clip_mut(&mut self, id: i64) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    fn index_of(&self, id: i64) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    /// First clip (other than those in `ignore`) overlapping `range`.
    pub fn conflict(&self, range: FrameRange, ignore: &[i64]) -> Option<i64> {
        reslink_core::find_overlap(
            self.clips
                .iter()
                .filter(|c| !ignore.contains(&c.id))
                .map(|c| (c.id, c.range())),
            range,
        )
    }

    /// Clip whose range contains `frame`; the later clip wins inside a mix.
    pub fn clip_at_frame(&self, frame: i64) -> Option<&Clip> {
        self.clips.iter().rev().find(|c| c.range().contains(frame))
    }

    /// Place a clip, keeping the list sorted. Overlap checks are the caller's.
    pub(crate) fn place(&mut self, clip: Clip) {
        let index = self.clips.partition_point(|c| c.start < clip.start);
        self.clips.insert(index, clip);
    }

    /// Take a clip off the track.
    pub(crate) fn take(&mut self, id: i64) -> Option<Clip> {
        let index = self.index_of(id)?;
        Some(self.clips.remove(index))
    }

    /// Shift clip `id` and every clip after it by `delta` frames.
    pub(crate) fn shift_from(&mut self, id: i64, delta: i64) {
        if let Some(index) = self.index_of(id) {
            for clip in &mut self.clips[index..] {
                clip.start += delta;
            }
        }
    }

    /// Neighbours and mixed edges of a clip.
    pub fn edges(&self, id: i64) -> Option<EdgeContext> {
        let index = self.index_of(id)?;
        let clip = &self.clips[index];
        Some(EdgeContext {
            prev_end: index.checked_sub(1).map(|i| self.clips[i].end()),
            next_start: self.clips.get(index + 1).map(|c| c.start),
            left_mixed: clip.mix(MixSide::Left).is_some(),
            right_mixed: clip.mix(MixSide::Right).is_some(),
        })
    }

    /// True when no two clips share frames beyond the mix joining them.
    pub fn is_consistent(&self) -> bool {
        self.clips.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let allowed = match a.mix(MixSide::Right) {
                Some(mix) if mix.partner == b.id => mix.duration,
                _ => 0,
            };
            a.start <= b.start && a.range().overlap_len(b.range()) <= allowed && a.end() <= b.end()
        })
    }
}
