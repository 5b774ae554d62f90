//! The project's single timeline.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use reslink_core::defaults::TRANSITION_FRAMES;
use reslink_core::{
    find_overlap, frames_to_timecode, timecode_to_frames, ColorArg, FrameRange, MediaKind,
    ReslinkError, Result, TrackType, TransitionKind,
};
use reslink_transport::{CompositionRecord, Method, MixSide, TrackRecord};

use crate::capability::Capability;
use crate::markers::{MarkerDraft, MarkerInfo, MarkerMap, MarkerScope};
use crate::media_pool_item::MediaPoolItem;
use crate::resolve::ExportType;
use crate::session::Session;
use crate::timeline_item::TimelineItem;

/// Handle to the editor's timeline. The editor has exactly one.
#[derive(Debug, Clone)]
pub struct Timeline {
    session: Arc<Session>,
}

impl Timeline {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn name(&self) -> Result<String> {
        self.session.call_string(Method::GetTimelineName, &[])
    }

    pub fn set_name(&self, name: &str) -> Result<bool> {
        self.session
            .call_bool(Method::SetTimelineName, &[Value::from(name)])
    }

    // ── Tracks ──────────────────────────────────────────────────

    pub fn track_count(&self, kind: TrackType) -> Result<usize> {
        let count = self
            .session
            .call_i64(Method::GetTrackCount, &[Value::from(kind.as_str())])?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Every track in editor order.
    pub fn tracks(&self) -> Result<Vec<TrackRecord>> {
        self.session.tracks()
    }

    /// Track by type and 1-based index.
    pub fn track_info(&self, kind: TrackType, index: usize) -> Result<Option<TrackRecord>> {
        if index == 0 {
            return Ok(None);
        }
        Ok(self
            .session
            .tracks()?
            .into_iter()
            .filter(|t| t.kind == kind)
            .nth(index - 1))
    }

    /// Append a track and return its id.
    pub fn add_track(&self, name: &str, kind: TrackType) -> Result<i64> {
        self.session.call_i64(
            Method::AddTrack,
            &[Value::from(name), Value::from(kind.as_str())],
        )
    }

    /// Remove a track together with its clips.
    pub fn delete_track(&self, track_id: i64) -> Result<bool> {
        self.session
            .call_bool(Method::DeleteTrack, &[Value::from(track_id)])
    }

    /// Clips on the track at a 1-based index, in timeline order. An index
    /// outside the track list yields an empty list.
    pub fn item_list_in_track(&self, kind: TrackType, index: usize) -> Result<Vec<TimelineItem>> {
        let Some(track) = self.track_info(kind, index)? else {
            return Ok(Vec::new());
        };
        Ok(self
            .session
            .clips_on_track(track.id)?
            .into_iter()
            .map(|c| TimelineItem::new(self.session.clone(), c.id))
            .collect())
    }

    // ── Placement ───────────────────────────────────────────────

    /// Place `item` at `position` using its natural length.
    pub fn insert_clip(
        &self,
        item: &MediaPoolItem,
        track_id: i64,
        position: i64,
    ) -> Result<TimelineItem> {
        self.place(item, track_id, position, None, None)
    }

    /// Place `item` on the track at a 1-based index of the given type.
    pub fn insert_clip_at(
        &self,
        kind: TrackType,
        index: usize,
        item: &MediaPoolItem,
        position: i64,
    ) -> Result<Option<TimelineItem>> {
        match self.track_info(kind, index)? {
            Some(track) => self.place(item, track.id, position, None, None).map(Some),
            None => Ok(None),
        }
    }

    /// Place items back to back starting at `start`.
    pub fn insert_clips_sequentially(
        &self,
        items: &[MediaPoolItem],
        track_id: i64,
        start: i64,
    ) -> Result<Vec<TimelineItem>> {
        let mut position = start;
        let mut placed = Vec::with_capacity(items.len());
        for item in items {
            let clip = self.place(item, track_id, position, None, None)?;
            position += clip.duration()?;
            placed.push(clip);
        }
        Ok(placed)
    }

    /// Validate a placement locally, then insert.
    ///
    /// `source_in` defaults to the source start and `duration` to the rest
    /// of the source (stills: their assigned length). A duration longer
    /// than the source holds the last frame.
    pub(crate) fn place(
        &self,
        item: &MediaPoolItem,
        track_id: i64,
        position: i64,
        source_in: Option<i64>,
        duration: Option<i64>,
    ) -> Result<TimelineItem> {
        let source = item.properties()?;
        let track = self.session.track(track_id)?;
        if !track.kind.accepts(source.kind) {
            return Err(ReslinkError::InvalidArgument(format!(
                "{} track {} cannot hold {} media",
                track.kind, track.name, source.kind
            )));
        }
        if position < 0 {
            return Err(ReslinkError::InvalidArgument(format!(
                "position must be non-negative, got {position}"
            )));
        }
        let still = source.kind == MediaKind::Still;
        let first = source_in.unwrap_or(0);
        if first < 0 || (!still && first >= source.duration) {
            return Err(ReslinkError::InvalidArgument(format!(
                "in point {first} is outside the source"
            )));
        }
        let length = match duration {
            Some(d) => d,
            None if still => source.duration,
            None => source.duration - first,
        };
        if length < 1 {
            return Err(ReslinkError::InvalidArgument(format!(
                "duration must be at least one frame, got {length}"
            )));
        }

        let existing = self.session.clips_on_track(track_id)?;
        let ranges = existing
            .iter()
            .map(|c| (c.id, FrameRange::new(c.position, c.duration)));
        if let Some(other) = find_overlap(ranges, FrameRange::new(position, length)) {
            return Err(ReslinkError::PositionConflict(format!(
                "frames {position}..{} on track {} overlap clip {other}",
                position + length,
                track.name
            )));
        }

        let id = self.session.call_i64(
            Method::InsertClip,
            &[
                Value::from(item.media_id()),
                Value::from(track_id),
                Value::from(position),
                Value::from(source_in.unwrap_or(-1)),
                Value::from(duration.unwrap_or(-1)),
            ],
        )?;
        debug!(clip = id, bin_id = item.media_id(), track_id, position, length, "clip placed");
        Ok(TimelineItem::new(self.session.clone(), id))
    }

    // ── Transitions ─────────────────────────────────────────────

    /// Join two adjacent clips with a dissolve of `duration` frames
    /// (the default length when `None`).
    pub fn add_transition(
        &self,
        left: &TimelineItem,
        right: &TimelineItem,
        duration: Option<i64>,
    ) -> Result<bool> {
        self.add_transition_of(
            left,
            right,
            duration.unwrap_or(TRANSITION_FRAMES),
            TransitionKind::Dissolve,
        )
    }

    /// Join two adjacent clips with a transition.
    ///
    /// The right clip and everything after it on the track move `duration`
    /// frames left so the pair overlaps by the transition length.
    pub fn add_transition_of(
        &self,
        left: &TimelineItem,
        right: &TimelineItem,
        duration: i64,
        kind: TransitionKind,
    ) -> Result<bool> {
        let a = left.info()?;
        let b = right.info()?;
        if a.track_id != b.track_id {
            return Err(ReslinkError::NotAdjacent(format!(
                "clips {} and {} are on different tracks",
                a.id, b.id
            )));
        }
        if a.end() != b.position {
            return Err(ReslinkError::NotAdjacent(format!(
                "clip {} ends at {} but clip {} starts at {}",
                a.id,
                a.end(),
                b.id,
                b.position
            )));
        }
        if duration < 1 || duration > a.duration.min(b.duration) {
            return Err(ReslinkError::InvalidArgument(format!(
                "transition of {duration} frames does not fit between clips of {} and {} frames",
                a.duration, b.duration
            )));
        }
        let taken_left = a.mix(MixSide::Left).map_or(0, |m| m.duration);
        let taken_right = b.mix(MixSide::Right).map_or(0, |m| m.duration);
        if taken_left + duration > a.duration || taken_right + duration > b.duration {
            return Err(ReslinkError::InvalidArgument(format!(
                "transition of {duration} frames does not fit beside the existing ones"
            )));
        }
        info!(left = a.id, right = b.id, duration, %kind, "adding transition");
        self.session.call_bool(
            Method::AddMix,
            &[
                Value::from(a.id),
                Value::from(b.id),
                Value::from(duration),
                Value::from(kind.as_str()),
            ],
        )
    }

    /// Remove the transition on the item's left edge, or on its right edge
    /// when the left is free. Later clips move back by its length.
    pub fn remove_mix(&self, item: &TimelineItem) -> Result<bool> {
        if item.info()?.mixes.is_empty() {
            return Err(ReslinkError::NotFound(format!(
                "clip {} has no transition",
                item.id()
            )));
        }
        self.session
            .call_bool(Method::RemoveMix, &[Value::from(item.id())])
    }

    // ── Compositions ────────────────────────────────────────────

    /// Place a composition such as `"wipe"` on a video track and return
    /// its id.
    pub fn add_composition(
        &self,
        transition_id: &str,
        track_id: i64,
        position: i64,
        duration: i64,
    ) -> Result<i64> {
        if transition_id.trim().is_empty() {
            return Err(ReslinkError::InvalidArgument(
                "composition identifier is empty".to_string(),
            ));
        }
        if position < 0 || duration < 1 {
            return Err(ReslinkError::InvalidArgument(format!(
                "composition at {position} for {duration} frames is out of range"
            )));
        }
        let track = self.session.track(track_id)?;
        if track.kind != TrackType::Video {
            return Err(ReslinkError::InvalidArgument(format!(
                "compositions need a video track, {} is {}",
                track.name, track.kind
            )));
        }
        let id = self.session.call_i64(
            Method::AddComposition,
            &[
                Value::from(transition_id),
                Value::from(track_id),
                Value::from(position),
                Value::from(duration),
            ],
        )?;
        info!(composition = id, transition_id, track_id, position, duration, "composition added");
        Ok(id)
    }

    pub fn compositions(&self) -> Result<Vec<CompositionRecord>> {
        self.session.call_records(Method::GetCompositions, &[])
    }

    /// Remove a composition. False when no composition has that id.
    pub fn delete_composition(&self, composition_id: i64) -> Result<bool> {
        self.session
            .call_bool(Method::DeleteComposition, &[Value::from(composition_id)])
    }

    // ── Markers ─────────────────────────────────────────────────

    /// Add a guide, replacing any guide already at `frame`.
    pub fn add_marker(&self, frame: i64, draft: &MarkerDraft) -> Result<bool> {
        MarkerScope::Guides.add(&self.session, frame, draft)
    }

    pub fn markers(&self) -> Result<MarkerMap> {
        MarkerScope::Guides.list(&self.session)
    }

    pub fn delete_marker_at_frame(&self, frame: i64) -> Result<bool> {
        MarkerScope::Guides.delete_at(&self.session, frame)
    }

    /// Remove every guide of a colour. Returns `true` even when none matched.
    pub fn delete_markers_by_color(&self, color: impl Into<ColorArg>) -> Result<bool> {
        MarkerScope::Guides.delete_by_color(&self.session, &color.into())
    }

    pub fn marker_by_custom_data(&self, data: &str) -> Result<Option<(i64, MarkerInfo)>> {
        MarkerScope::Guides.find_custom_data(&self.session, data)
    }

    pub fn delete_marker_by_custom_data(&self, data: &str) -> Result<bool> {
        MarkerScope::Guides.delete_custom_data(&self.session, data)
    }

    pub fn update_marker_custom_data(&self, frame: i64, data: &str) -> Result<bool> {
        MarkerScope::Guides.update_custom_data(&self.session, frame, data)
    }

    pub fn marker_custom_data(&self, frame: i64) -> Result<String> {
        MarkerScope::Guides.custom_data(&self.session, frame)
    }

    // ── Playhead ────────────────────────────────────────────────

    pub fn seek(&self, frame: i64) -> Result<()> {
        if frame < 0 {
            return Err(ReslinkError::InvalidArgument(format!(
                "cannot seek to frame {frame}"
            )));
        }
        self.session.call(Method::Seek, &[Value::from(frame)])?;
        Ok(())
    }

    pub fn position(&self) -> Result<i64> {
        self.session.call_i64(Method::GetPosition, &[])
    }

    /// Playhead position as `HH:MM:SS:FF`.
    pub fn current_timecode(&self) -> Result<String> {
        frames_to_timecode(self.position()?, self.session.frame_rate()?)
    }

    pub fn set_current_timecode(&self, timecode: &str) -> Result<bool> {
        let frame = timecode_to_frames(timecode, self.session.frame_rate()?)?;
        self.seek(frame)?;
        Ok(true)
    }

    pub fn play(&self) -> Result<()> {
        self.session.call(Method::Play, &[])?;
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.session.call(Method::Pause, &[])?;
        Ok(())
    }

    // ── Extent ──────────────────────────────────────────────────

    /// Timelines always start at frame 0.
    pub fn start_frame(&self) -> i64 {
        0
    }

    /// First frame after the last clip on any track.
    pub fn end_frame(&self) -> Result<i64> {
        self.total_duration()
    }

    pub fn total_duration(&self) -> Result<i64> {
        Ok(self
            .session
            .all_clips()?
            .iter()
            .map(|c| c.end())
            .max()
            .unwrap_or(0))
    }

    /// Human-readable listing of tracks and clips.
    pub fn summary(&self) -> Result<String> {
        let tracks = self.session.tracks()?;
        let mut out = format!("Timeline: {} tracks\n", tracks.len());
        for track in &tracks {
            let clips = self.session.clips_on_track(track.id)?;
            out.push_str(&format!(
                "  [{}] {}: {} clips\n",
                track.kind,
                track.name,
                clips.len()
            ));
            for clip in &clips {
                out.push_str(&format!(
                    "    {} @ {} ({} frames)\n",
                    clip.name, clip.position, clip.duration
                ));
            }
        }
        Ok(out)
    }

    // ── Unsupported ─────────────────────────────────────────────

    pub fn apply_grade_from_drx(&self, _path: &str, _grade_mode: i32) -> Capability<bool> {
        Capability::NotSupported("ApplyGradeFromDRX")
    }

    pub fn export(&self, _path: &str, _kind: ExportType, _sub_type: Option<i32>) -> Capability<bool> {
        Capability::NotSupported("Export")
    }
}
