//! Placement rules shared by every backend.
//!
//! These are pure functions over frame spans so that the command layer can
//! validate an edit before issuing it and the simulation can apply the
//! same rule authoritatively.

use serde::{Deserialize, Serialize};

use crate::error::{ReslinkError, Result};
use crate::time::FrameRange;

/// A clip's placement on a track plus its window into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSpan {
    /// Timeline position of the first frame.
    pub start: i64,
    /// Frames played on the timeline.
    pub duration: i64,
    /// Left offset into the source.
    pub source_in: i64,
    /// Full source length, `None` for stills which can be held indefinitely.
    pub source_duration: Option<i64>,
}

impl ClipSpan {
    #[inline]
    pub fn range(&self) -> FrameRange {
        FrameRange::new(self.start, self.duration)
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.start + self.duration
    }

    /// Unused source frames after the out point; 0 when the rest of the
    /// source is played or the last frame is held.
    pub fn right_offset(&self) -> i64 {
        self.source_duration
            .map_or(0, |total| (total - self.source_in - self.duration).max(0))
    }
}

/// What surrounds a clip on its track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeContext {
    /// End of the previous clip, if any.
    pub prev_end: Option<i64>,
    /// Start of the next clip, if any.
    pub next_start: Option<i64>,
    /// A transition is attached at the left boundary.
    pub left_mixed: bool,
    /// A transition is attached at the right boundary.
    pub right_mixed: bool,
}

/// Compute the span that results from resizing `span` to `requested` frames.
///
/// Growth is clamped to the available source material (and to frame 0 when
/// growing leftwards). The returned span carries the duration actually
/// applied. Overlapping a neighbour or moving a boundary that carries a
/// transition fails with `PositionConflict`.
pub fn plan_resize(
    span: ClipSpan,
    requested: i64,
    from_right: bool,
    edges: EdgeContext,
) -> Result<ClipSpan> {
    if requested < 1 {
        return Err(ReslinkError::InvalidArgument(format!(
            "duration must be at least one frame, got {requested}"
        )));
    }
    if requested == span.duration {
        return Ok(span);
    }

    if from_right {
        if edges.right_mixed {
            return Err(ReslinkError::PositionConflict(
                "a transition occupies the right edge".into(),
            ));
        }
        let applied = if requested > span.duration {
            match span.source_duration {
                Some(total) => requested.min((total - span.source_in).max(span.duration)),
                None => requested,
            }
        } else {
            requested
        };
        let resized = ClipSpan {
            duration: applied,
            ..span
        };
        if let Some(next) = edges.next_start {
            if resized.end() > next {
                return Err(ReslinkError::PositionConflict(format!(
                    "resize to {applied} frames would overlap the clip at {next}"
                )));
            }
        }
        return Ok(resized);
    }

    if edges.left_mixed {
        return Err(ReslinkError::PositionConflict(
            "a transition occupies the left edge".into(),
        ));
    }
    let mut delta = requested - span.duration;
    if delta > 0 {
        if span.source_duration.is_some() {
            delta = delta.min(span.source_in);
        }
        delta = delta.min(span.start);
    }
    let resized = ClipSpan {
        start: span.start - delta,
        duration: span.duration + delta,
        source_in: if span.source_duration.is_some() {
            span.source_in - delta
        } else {
            span.source_in
        },
        source_duration: span.source_duration,
    };
    if let Some(prev) = edges.prev_end {
        if resized.start < prev {
            return Err(ReslinkError::PositionConflict(format!(
                "resize to {} frames would overlap the clip ending at {prev}",
                resized.duration
            )));
        }
    }
    Ok(resized)
}

/// Return the id of the first existing range that overlaps `candidate`.
pub fn find_overlap<I>(existing: I, candidate: FrameRange) -> Option<i64>
where
    I: IntoIterator<Item = (i64, FrameRange)>,
{
    existing
        .into_iter()
        .find(|(_, range)| range.overlaps(candidate))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(start: i64, duration: i64, source_in: i64, total: i64) -> ClipSpan {
        ClipSpan {
            start,
            duration,
            source_in,
            source_duration: Some(total),
        }
    }

    #[test]
    fn test_grow_right_clamped_to_source() {
        let span = video(0, 50, 10, 100);
        let out = plan_resize(span, 500, true, EdgeContext::default()).unwrap();
        assert_eq!(out.duration, 90);
        assert_eq!(out.start, 0);
        assert_eq!(out.right_offset(), 0);
    }

    #[test]
    fn test_shrink_right_keeps_start() {
        let span = video(100, 50, 0, 200);
        let out = plan_resize(span, 20, true, EdgeContext::default()).unwrap();
        assert_eq!((out.start, out.duration), (100, 20));
        assert_eq!(out.right_offset(), 180);
    }

    #[test]
    fn test_grow_left_moves_start() {
        let span = video(100, 50, 30, 200);
        let out = plan_resize(span, 70, false, EdgeContext::default()).unwrap();
        assert_eq!((out.start, out.duration, out.source_in), (80, 70, 10));

        // only 30 frames of head material exist
        let out = plan_resize(span, 200, false, EdgeContext::default()).unwrap();
        assert_eq!((out.start, out.duration, out.source_in), (70, 80, 0));
    }

    #[test]
    fn test_neighbor_conflicts() {
        let span = video(100, 50, 30, 200);
        let edges = EdgeContext {
            prev_end: Some(90),
            next_start: Some(160),
            ..Default::default()
        };
        assert!(matches!(
            plan_resize(span, 70, false, edges),
            Err(ReslinkError::PositionConflict(_))
        ));
        assert!(matches!(
            plan_resize(span, 70, true, edges),
            Err(ReslinkError::PositionConflict(_))
        ));
        assert_eq!(plan_resize(span, 60, true, edges).unwrap().duration, 60);
    }

    #[test]
    fn test_mixed_edges_refuse() {
        let span = video(100, 50, 30, 200);
        let edges = EdgeContext {
            left_mixed: true,
            ..Default::default()
        };
        assert!(plan_resize(span, 40, false, edges).is_err());
        assert_eq!(plan_resize(span, 40, true, edges).unwrap().duration, 40);
    }

    #[test]
    fn test_stills_are_unbounded() {
        let still = ClipSpan {
            start: 0,
            duration: 125,
            source_in: 0,
            source_duration: None,
        };
        let out = plan_resize(still, 1000, true, EdgeContext::default()).unwrap();
        assert_eq!(out.duration, 1000);
        assert_eq!(out.right_offset(), 0);
    }

    #[test]
    fn test_find_overlap() {
        let existing = vec![(1, FrameRange::new(0, 125)), (2, FrameRange::new(125, 75))];
        assert_eq!(find_overlap(existing.clone(), FrameRange::new(200, 10)), None);
        assert_eq!(find_overlap(existing, FrameRange::new(190, 20)), Some(2));
    }
}
