//! A clip placed on the timeline.

use serde_json::Value;
use std::sync::Arc;

use reslink_core::{
    find_overlap, plan_resize, ClipSpan, EdgeContext, FrameRange, MediaKind, ReslinkError, Result,
    TrackType,
};
use reslink_transport::{ClipRecord, Method, MixRecord, MixSide};

use crate::capability::Capability;
use crate::media_pool_item::MediaPoolItem;
use crate::session::Session;

/// Handle to a timeline clip.
///
/// Handles hold only the clip id. Every getter asks the editor, so a handle
/// stays valid across edits made elsewhere and reports `NotFound` once the
/// clip is gone.
#[derive(Debug, Clone)]
pub struct TimelineItem {
    session: Arc<Session>,
    id: i64,
}

impl PartialEq for TimelineItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl TimelineItem {
    pub(crate) fn new(session: Arc<Session>, id: i64) -> Self {
        Self { session, id }
    }

    /// Timeline clip id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current placement as reported by the editor.
    pub fn info(&self) -> Result<ClipRecord> {
        self.session.clip_info(self.id)
    }

    pub fn name(&self) -> Result<String> {
        Ok(self.info()?.name)
    }

    pub fn duration(&self) -> Result<i64> {
        Ok(self.info()?.duration)
    }

    pub fn start(&self) -> Result<i64> {
        Ok(self.info()?.position)
    }

    /// First frame after the clip.
    pub fn end(&self) -> Result<i64> {
        Ok(self.info()?.end())
    }

    pub fn track_id(&self) -> Result<i64> {
        Ok(self.info()?.track_id)
    }

    /// Track type and 1-based index among tracks of that type.
    pub fn track_type_and_index(&self) -> Result<(TrackType, usize)> {
        let track_id = self.track_id()?;
        let tracks = self.session.tracks()?;
        let kind = tracks
            .iter()
            .find(|t| t.id == track_id)
            .map(|t| t.kind)
            .ok_or_else(|| ReslinkError::NotFound(format!("track {track_id}")))?;
        let index = tracks
            .iter()
            .filter(|t| t.kind == kind)
            .position(|t| t.id == track_id)
            .unwrap_or(0);
        Ok((kind, index + 1))
    }

    /// In point into the source.
    pub fn left_offset(&self) -> Result<i64> {
        Ok(self.info()?.source_in)
    }

    /// Unused source frames after the out point, 0 when the source is
    /// played to its end or its last frame is held.
    pub fn right_offset(&self) -> Result<i64> {
        let info = self.info()?;
        Ok(self.span_of(&info)?.right_offset())
    }

    pub fn media_pool_item(&self) -> Result<MediaPoolItem> {
        Ok(MediaPoolItem::new(self.session.clone(), self.info()?.bin_id))
    }

    /// Transitions attached to either edge.
    pub fn mixes(&self) -> Result<Vec<MixRecord>> {
        Ok(self.info()?.mixes)
    }

    fn span_of(&self, info: &ClipRecord) -> Result<ClipSpan> {
        let source = MediaPoolItem::new(self.session.clone(), info.bin_id.clone()).properties()?;
        Ok(ClipSpan {
            start: info.position,
            duration: info.duration,
            source_in: info.source_in,
            source_duration: (source.kind != MediaKind::Still).then_some(source.duration),
        })
    }

    // ── Edits ───────────────────────────────────────────────────

    /// Resize from the right edge (`from_right`) or the left edge, which
    /// moves the start. Returns the duration actually applied, which can be
    /// shorter than requested when the source runs out.
    pub fn set_duration(&self, frames: i64, from_right: bool) -> Result<i64> {
        let info = self.info()?;
        let clips = self.session.clips_on_track(info.track_id)?;
        let index = clips
            .iter()
            .position(|c| c.id == self.id)
            .ok_or_else(|| ReslinkError::NotFound(format!("timeline clip {}", self.id)))?;
        let edges = EdgeContext {
            prev_end: index.checked_sub(1).map(|i| clips[i].end()),
            next_start: clips.get(index + 1).map(|c| c.position),
            left_mixed: info.mix(MixSide::Left).is_some(),
            right_mixed: info.mix(MixSide::Right).is_some(),
        };
        plan_resize(self.span_of(&info)?, frames, from_right, edges)?;

        self.session.call_i64(
            Method::ResizeClip,
            &[
                Value::from(self.id),
                Value::from(frames),
                Value::from(from_right),
            ],
        )
    }

    /// Move to `position` on `track_id`.
    pub fn move_to(&self, track_id: i64, position: i64) -> Result<bool> {
        let info = self.info()?;
        if !info.mixes.is_empty() {
            return Err(ReslinkError::PositionConflict(format!(
                "clip {} has a transition attached",
                self.id
            )));
        }
        if position < 0 {
            return Err(ReslinkError::InvalidArgument(format!(
                "position must be non-negative, got {position}"
            )));
        }
        let others = self.session.clips_on_track(track_id)?;
        let occupied = others
            .iter()
            .filter(|c| c.id != self.id)
            .map(|c| (c.id, FrameRange::new(c.position, c.duration)));
        if let Some(other) = find_overlap(occupied, FrameRange::new(position, info.duration)) {
            return Err(ReslinkError::PositionConflict(format!(
                "moving clip {} to {position} would overlap clip {other}",
                self.id
            )));
        }
        self.session.call_bool(
            Method::MoveClip,
            &[Value::from(self.id), Value::from(track_id), Value::from(position)],
        )
    }

    /// Remove from the timeline. The media pool item is kept.
    pub fn delete(&self) -> Result<bool> {
        self.session
            .call_bool(Method::DeleteTimelineClip, &[Value::from(self.id)])
    }

    /// Split at a timeline frame; `self` keeps the left part and the
    /// returned item is the right part.
    pub fn cut(&self, position: i64) -> Result<TimelineItem> {
        let info = self.info()?;
        if position <= info.position || position >= info.end() {
            return Err(ReslinkError::InvalidArgument(format!(
                "cut at {position} is outside clip {} ({}..{})",
                self.id,
                info.position,
                info.end()
            )));
        }
        let left = info.mix(MixSide::Left).map_or(0, |m| m.duration);
        let right = info.mix(MixSide::Right).map_or(0, |m| m.duration);
        if position < info.position + left || position > info.end() - right {
            return Err(ReslinkError::PositionConflict(format!(
                "cut at {position} falls inside a transition of clip {}",
                self.id
            )));
        }
        let id = self.session.call_i64(
            Method::CutClip,
            &[Value::from(self.id), Value::from(position)],
        )?;
        Ok(TimelineItem::new(self.session.clone(), id))
    }

    // ── Unsupported ─────────────────────────────────────────────

    pub fn clip_color(&self) -> Capability<String> {
        Capability::NotSupported("GetClipColor")
    }

    pub fn set_clip_color(&self, _color: &str) -> Capability<bool> {
        Capability::NotSupported("SetClipColor")
    }

    pub fn fusion_comp_count(&self) -> Capability<usize> {
        Capability::NotSupported("GetFusionCompCount")
    }

    pub fn add_fusion_comp(&self) -> Capability<()> {
        Capability::NotSupported("AddFusionComp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reslink_transport::{args, SimulationBackend, Transport};

    /// Two back-to-back 100-frame clips of a 250-frame source on V1.
    fn two_clips() -> (Arc<Session>, TimelineItem, TimelineItem) {
        let backend = Arc::new(SimulationBackend::default());
        backend.register_media("/m/a.mp4", 250);
        let bin = backend
            .invoke(Method::ImportMedia, &args!["/m/a.mp4", "-1"])
            .unwrap();
        let bin = bin.as_str().unwrap();
        let a = backend
            .invoke(Method::InsertClip, &args![bin, 0, 0, 0, 100])
            .unwrap();
        let b = backend
            .invoke(Method::InsertClip, &args![bin, 0, 100, 0, 100])
            .unwrap();
        let session = Session::new(backend);
        let a = TimelineItem::new(session.clone(), a.as_i64().unwrap());
        let b = TimelineItem::new(session.clone(), b.as_i64().unwrap());
        (session, a, b)
    }

    #[test]
    fn test_getters() {
        let (_, a, b) = two_clips();
        assert_eq!(b.start().unwrap(), 100);
        assert_eq!(b.end().unwrap(), 200);
        assert_eq!(a.right_offset().unwrap(), 150);
        assert_eq!(b.track_type_and_index().unwrap(), (TrackType::Video, 1));
        assert_eq!(a.media_pool_item().unwrap().duration().unwrap(), 250);
    }

    #[test]
    fn test_resize_clamps_and_guards_neighbours() {
        let (_, a, b) = two_clips();
        assert!(matches!(
            a.set_duration(150, true),
            Err(ReslinkError::PositionConflict(_))
        ));
        assert_eq!(b.set_duration(400, true).unwrap(), 250);
        assert_eq!(b.right_offset().unwrap(), 0);
        assert_eq!(a.set_duration(60, true).unwrap(), 60);
        assert_eq!(a.end().unwrap(), 60);
    }

    #[test]
    fn test_resize_from_left_moves_start() {
        let (_, a, b) = two_clips();
        a.set_duration(50, true).unwrap();
        assert_eq!(b.set_duration(80, false).unwrap(), 80);
        assert_eq!(b.start().unwrap(), 120);
        // Growing back left stops at the source start.
        assert_eq!(b.set_duration(150, false).unwrap(), 100);
        assert_eq!(b.start().unwrap(), 100);
    }

    #[test]
    fn test_move_checks_overlap_locally() {
        let (_, a, b) = two_clips();
        assert!(matches!(
            b.move_to(0, 50),
            Err(ReslinkError::PositionConflict(_))
        ));
        assert!(b.move_to(0, 300).unwrap());
        assert!(a.move_to(1, 0).unwrap());
        assert_eq!(a.track_id().unwrap(), 1);
    }

    #[test]
    fn test_cut_and_delete() {
        let (_, a, _) = two_clips();
        let right = a.cut(40).unwrap();
        assert_eq!(a.duration().unwrap(), 40);
        assert_eq!(right.start().unwrap(), 40);
        assert_eq!(right.left_offset().unwrap(), 40);
        assert!(a.cut(0).is_err());
        assert!(right.delete().unwrap());
        assert!(matches!(right.info(), Err(ReslinkError::NotFound(_))));
        assert!(!a.add_fusion_comp().is_supported());
    }
}
