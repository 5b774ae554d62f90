//! Edit operations on the timeline.
//!
//! Every mutation is an `EditCommand` applied to a `Project`. A command
//! either succeeds completely or fails without touching any state, so the
//! positional invariants (no overlap, mixes only between adjacent clips,
//! every clip backed by a live bin item) hold after every call.

use reslink_core::{plan_resize, FrameRange, ReslinkError, Result, TrackType, TransitionKind};
use smallvec::SmallVec;
use tracing::debug;

use crate::clip::{Clip, MixInfo, MixSide};
use crate::project::{Project, Timeline};

// ── Edit commands ───────────────────────────────────────────────

/// A timeline mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Place a bin item on a track. `None` means the source default.
    InsertClip {
        bin_id: String,
        track_id: i64,
        position: i64,
        source_in: Option<i64>,
        duration: Option<i64>,
    },
    /// Move a clip to a position, possibly on another track.
    MoveClip {
        clip_id: i64,
        track_id: i64,
        position: i64,
    },
    /// Change a clip's duration from one edge.
    ResizeClip {
        clip_id: i64,
        duration: i64,
        from_right: bool,
    },
    /// Remove a clip from the timeline. The bin item stays.
    DeleteClip { clip_id: i64 },
    /// Split a clip at a timeline frame.
    CutClip { clip_id: i64, position: i64 },
    /// Join two adjacent clips with a transition.
    AddMix {
        left: i64,
        right: i64,
        duration: i64,
        kind: TransitionKind,
    },
    /// Remove a transition touching a clip, preferring its left edge.
    RemoveMix { clip_id: i64 },
    /// Append a track.
    AddTrack { name: String, kind: TrackType },
    /// Remove a track with every clip and composition on it.
    DeleteTrack { track_id: i64 },
}

/// What a successful command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A new clip id (insert, cut)
    Clip(i64),
    /// A new track id
    Track(i64),
    /// The duration actually applied by a resize
    Duration(i64),
    Done,
}

impl EditCommand {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertClip { .. } => "insert",
            Self::MoveClip { .. } => "move",
            Self::ResizeClip { .. } => "resize",
            Self::DeleteClip { .. } => "delete",
            Self::CutClip { .. } => "cut",
            Self::AddMix { .. } => "add-mix",
            Self::RemoveMix { .. } => "remove-mix",
            Self::AddTrack { .. } => "add-track",
            Self::DeleteTrack { .. } => "delete-track",
        }
    }

    /// Apply this command to a project.
    pub fn apply(&self, project: &mut Project) -> Result<EditOutcome> {
        let outcome = match self {
            Self::InsertClip {
                bin_id,
                track_id,
                position,
                source_in,
                duration,
            } => insert_clip(project, bin_id, *track_id, *position, *source_in, *duration)
                .map(EditOutcome::Clip),
            Self::MoveClip {
                clip_id,
                track_id,
                position,
            } => move_clip(&mut project.timeline, *clip_id, *track_id, *position)
                .map(|()| EditOutcome::Done),
            Self::ResizeClip {
                clip_id,
                duration,
                from_right,
            } => resize_clip(&mut project.timeline, *clip_id, *duration, *from_right)
                .map(EditOutcome::Duration),
            Self::DeleteClip { clip_id } => {
                delete_clip(&mut project.timeline, *clip_id).map(|()| EditOutcome::Done)
            }
            Self::CutClip { clip_id, position } => {
                cut_clip(&mut project.timeline, *clip_id, *position).map(EditOutcome::Clip)
            }
            Self::AddMix {
                left,
                right,
                duration,
                kind,
            } => add_mix(&mut project.timeline, *left, *right, *duration, *kind)
                .map(|()| EditOutcome::Done),
            Self::RemoveMix { clip_id } => {
                remove_mix(&mut project.timeline, *clip_id).map(|()| EditOutcome::Done)
            }
            Self::AddTrack { name, kind } => {
                Ok(EditOutcome::Track(project.timeline.add_track(name.clone(), *kind)))
            }
            Self::DeleteTrack { track_id } => {
                let index = project
                    .timeline
                    .tracks
                    .iter()
                    .position(|t| t.id == *track_id)
                    .ok_or_else(|| ReslinkError::NotFound(format!("track {track_id}")))?;
                project.timeline.tracks.remove(index);
                project
                    .timeline
                    .compositions
                    .retain(|c| c.track_id != *track_id);
                Ok(EditOutcome::Done)
            }
        }?;
        debug!(command = self.name(), ?outcome, "edit applied");
        Ok(outcome)
    }
}

// ── Operations ──────────────────────────────────────────────────

fn insert_clip(
    project: &mut Project,
    bin_id: &str,
    track_id: i64,
    position: i64,
    source_in: Option<i64>,
    duration: Option<i64>,
) -> Result<i64> {
    let media = project.bin.require(bin_id)?;
    let track = project.timeline.require_track(track_id)?;
    if !track.kind.accepts(media.kind) {
        return Err(ReslinkError::InvalidArgument(format!(
            "{} track {} cannot hold {} media",
            track.kind, track.name, media.kind
        )));
    }
    if position < 0 {
        return Err(ReslinkError::InvalidArgument(format!(
            "position must be non-negative, got {position}"
        )));
    }

    let source_duration = media.source_duration();
    let source_in = source_in.unwrap_or(0);
    if source_in < 0 || source_duration.is_some_and(|total| source_in >= total) {
        return Err(ReslinkError::InvalidArgument(format!(
            "in point {source_in} is outside the source"
        )));
    }
    let duration = match duration {
        Some(d) if d < 1 => {
            return Err(ReslinkError::InvalidArgument(format!(
                "duration must be at least one frame, got {d}"
            )))
        }
        Some(d) => d,
        None => source_duration.map_or(media.duration, |total| total - source_in),
    };

    let range = FrameRange::new(position, duration);
    if let Some(other) = track.conflict(range, &[]) {
        return Err(ReslinkError::PositionConflict(format!(
            "frames {}..{} on track {} overlap clip {other}",
            range.start,
            range.end(),
            track.name
        )));
    }

    let clip = Clip {
        id: 0,
        bin_id: media.id.clone(),
        name: media.name.clone(),
        kind: media.kind,
        start: position,
        duration,
        source_in,
        source_duration,
        mixes: SmallVec::new(),
    };
    let id = project.timeline.allocate_clip_id();
    project
        .timeline
        .require_track_mut(track_id)?
        .place(Clip { id, ..clip });
    Ok(id)
}

fn move_clip(timeline: &mut Timeline, clip_id: i64, track_id: i64, position: i64) -> Result<()> {
    let (source, clip) = timeline.require_clip(clip_id)?;
    if !clip.mixes.is_empty() {
        return Err(ReslinkError::PositionConflict(format!(
            "clip {clip_id} has a transition attached"
        )));
    }
    if position < 0 {
        return Err(ReslinkError::InvalidArgument(format!(
            "position must be non-negative, got {position}"
        )));
    }
    let source_id = source.id;
    let kind = clip.kind;
    let range = FrameRange::new(position, clip.duration);

    let target = timeline.require_track(track_id)?;
    if !target.kind.accepts(kind) {
        return Err(ReslinkError::InvalidArgument(format!(
            "{} track {} cannot hold {kind} media",
            target.kind, target.name
        )));
    }
    if let Some(other) = target.conflict(range, &[clip_id]) {
        return Err(ReslinkError::PositionConflict(format!(
            "moving clip {clip_id} to {position} would overlap clip {other}"
        )));
    }

    let mut clip = timeline
        .require_track_mut(source_id)?
        .take(clip_id)
        .ok_or_else(|| ReslinkError::NotFound(format!("timeline clip {clip_id}")))?;
    clip.start = position;
    timeline.require_track_mut(track_id)?.place(clip);
    Ok(())
}

fn resize_clip(timeline: &mut Timeline, clip_id: i64, duration: i64, from_right: bool) -> Result<i64> {
    let (track, clip) = timeline.require_clip(clip_id)?;
    let edges = track
        .edges(clip_id)
        .ok_or_else(|| ReslinkError::NotFound(format!("timeline clip {clip_id}")))?;
    let span = plan_resize(clip.span(), duration, from_right, edges)?;
    let track_id = track.id;

    if let Some(clip) = timeline.require_track_mut(track_id)?.clip_mut(clip_id) {
        clip.set_span(span);
    }
    Ok(span.duration)
}

fn delete_clip(timeline: &mut Timeline, clip_id: i64) -> Result<()> {
    let track_id = timeline.require_clip(clip_id)?.0.id;
    let track = timeline.require_track_mut(track_id)?;
    let clip = track
        .take(clip_id)
        .ok_or_else(|| ReslinkError::NotFound(format!("timeline clip {clip_id}")))?;
    for mix in &clip.mixes {
        if let Some(partner) = track.clip_mut(mix.partner) {
            partner.take_mix(mix.side.opposite());
        }
    }
    Ok(())
}

fn cut_clip(timeline: &mut Timeline, clip_id: i64, position: i64) -> Result<i64> {
    let (track, clip) = timeline.require_clip(clip_id)?;
    if position <= clip.start || position >= clip.end() {
        return Err(ReslinkError::InvalidArgument(format!(
            "cut at {position} is outside clip {clip_id} ({}..{})",
            clip.start,
            clip.end()
        )));
    }
    if position < clip.start + clip.mix_len(MixSide::Left)
        || position > clip.end() - clip.mix_len(MixSide::Right)
    {
        return Err(ReslinkError::PositionConflict(format!(
            "cut at {position} falls inside a transition of clip {clip_id}"
        )));
    }
    let track_id = track.id;
    let new_id = timeline.allocate_clip_id();
    let track = timeline.require_track_mut(track_id)?;

    let Some(left) = track.clip_mut(clip_id) else {
        return Err(ReslinkError::NotFound(format!("timeline clip {clip_id}")));
    };
    let offset = position - left.start;
    let mut right = left.clone();
    left.duration = offset;
    let right_mix = left.take_mix(MixSide::Right);

    right.id = new_id;
    right.start = position;
    right.duration -= offset;
    if right.source_duration.is_some() {
        right.source_in += offset;
    }
    right.mixes = right_mix.into_iter().collect();

    if let Some(mix) = right_mix {
        if let Some(partner) = track.clip_mut(mix.partner) {
            for m in partner.mixes.iter_mut().filter(|m| m.side == MixSide::Left) {
                m.partner = new_id;
            }
        }
    }
    track.place(right);
    Ok(new_id)
}

fn add_mix(
    timeline: &mut Timeline,
    left_id: i64,
    right_id: i64,
    duration: i64,
    kind: TransitionKind,
) -> Result<()> {
    if duration < 1 {
        return Err(ReslinkError::InvalidArgument(format!(
            "transition duration must be at least one frame, got {duration}"
        )));
    }
    let (left_track, left) = timeline.require_clip(left_id)?;
    let (right_track, right) = timeline.require_clip(right_id)?;
    if left_track.id != right_track.id {
        return Err(ReslinkError::NotAdjacent(format!(
            "clips {left_id} and {right_id} are on different tracks"
        )));
    }
    if left.end() != right.start {
        return Err(ReslinkError::NotAdjacent(format!(
            "clip {left_id} ends at {} but clip {right_id} starts at {}",
            left.end(),
            right.start
        )));
    }
    if duration > left.duration.min(right.duration) {
        return Err(ReslinkError::InvalidArgument(format!(
            "transition of {duration} frames is longer than one of the clips"
        )));
    }
    if left.mix_len(MixSide::Left) + duration > left.duration
        || right.mix_len(MixSide::Right) + duration > right.duration
    {
        return Err(ReslinkError::InvalidArgument(format!(
            "transition of {duration} frames does not fit beside the existing ones"
        )));
    }

    let track_id = left_track.id;
    let track = timeline.require_track_mut(track_id)?;
    track.shift_from(right_id, -duration);
    if let Some(clip) = track.clip_mut(left_id) {
        clip.mixes.push(MixInfo {
            partner: right_id,
            duration,
            kind,
            side: MixSide::Right,
        });
    }
    if let Some(clip) = track.clip_mut(right_id) {
        clip.mixes.push(MixInfo {
            partner: left_id,
            duration,
            kind,
            side: MixSide::Left,
        });
    }
    Ok(())
}

fn remove_mix(timeline: &mut Timeline, clip_id: i64) -> Result<()> {
    let (track, clip) = timeline.require_clip(clip_id)?;
    let (left_id, right_id, duration) = match (clip.mix(MixSide::Left), clip.mix(MixSide::Right)) {
        (Some(mix), _) => (mix.partner, clip_id, mix.duration),
        (None, Some(mix)) => (clip_id, mix.partner, mix.duration),
        (None, None) => {
            return Err(ReslinkError::NotFound(format!(
                "clip {clip_id} has no transition"
            )))
        }
    };
    let track_id = track.id;
    let track = timeline.require_track_mut(track_id)?;
    if let Some(clip) = track.clip_mut(left_id) {
        clip.take_mix(MixSide::Right);
    }
    if let Some(clip) = track.clip_mut(right_id) {
        clip.take_mix(MixSide::Left);
    }
    track.shift_from(right_id, duration);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use reslink_core::defaults::ROOT_FOLDER_ID;
    use reslink_core::MediaKind;

    fn make_project() -> (Project, String, String) {
        let mut project = Project::new("edit test");
        let video = project
            .bin
            .import("/m/a.mp4", MediaKind::Video, 200, ROOT_FOLDER_ID)
            .unwrap();
        let still = project
            .bin
            .import("/m/s.png", MediaKind::Still, 125, ROOT_FOLDER_ID)
            .unwrap();
        (project, video, still)
    }

    fn insert(project: &mut Project, bin: &str, position: i64, duration: Option<i64>) -> Result<i64> {
        let outcome = EditCommand::InsertClip {
            bin_id: bin.to_string(),
            track_id: 0,
            position,
            source_in: None,
            duration,
        }
        .apply(project)?;
        match outcome {
            EditOutcome::Clip(id) => Ok(id),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    fn clip(project: &Project, id: i64) -> Clip {
        project.timeline.find_clip(id).unwrap().1.clone()
    }

    #[test]
    fn test_insert_defaults_and_conflict() {
        let (mut project, video, still) = make_project();
        let a = insert(&mut project, &video, 0, None).unwrap();
        assert_eq!(clip(&project, a).duration, 200);

        let s = insert(&mut project, &still, 200, None).unwrap();
        assert_eq!(clip(&project, s).duration, 125);

        let err = insert(&mut project, &video, 150, Some(10)).unwrap_err();
        assert!(matches!(err, ReslinkError::PositionConflict(_)));
        assert_eq!(project.timeline.clip_count(), 2);
    }

    #[test]
    fn test_insert_longer_than_source_holds() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 0, Some(500)).unwrap();
        let c = clip(&project, a);
        assert_eq!(c.duration, 500);
        assert_eq!(c.right_offset(), 0);
    }

    #[test]
    fn test_audio_track_rejects_stills() {
        let (mut project, _, still) = make_project();
        let err = EditCommand::InsertClip {
            bin_id: still,
            track_id: 2,
            position: 0,
            source_in: None,
            duration: None,
        }
        .apply(&mut project)
        .unwrap_err();
        assert!(matches!(err, ReslinkError::InvalidArgument(_)));
    }

    #[test]
    fn test_move_between_tracks() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 0, Some(50)).unwrap();
        let b = insert(&mut project, &video, 50, Some(50)).unwrap();
        let err = EditCommand::MoveClip {
            clip_id: b,
            track_id: 0,
            position: 25,
        }
        .apply(&mut project)
        .unwrap_err();
        assert!(matches!(err, ReslinkError::PositionConflict(_)));

        EditCommand::MoveClip {
            clip_id: a,
            track_id: 1,
            position: 10,
        }
        .apply(&mut project)
        .unwrap();
        let (track, moved) = project.timeline.find_clip(a).unwrap();
        assert_eq!((track.id, moved.start), (1, 10));
    }

    #[test]
    fn test_cut_splits_source_window() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 100, None).unwrap();
        let outcome = EditCommand::CutClip {
            clip_id: a,
            position: 160,
        }
        .apply(&mut project)
        .unwrap();
        let EditOutcome::Clip(b) = outcome else {
            panic!("expected a clip id");
        };
        let (left, right) = (clip(&project, a), clip(&project, b));
        assert_eq!((left.start, left.duration, left.source_in), (100, 60, 0));
        assert_eq!((right.start, right.duration, right.source_in), (160, 140, 60));
        assert!(EditCommand::CutClip { clip_id: a, position: 100 }
            .apply(&mut project)
            .is_err());
    }

    #[test]
    fn test_mix_round_trip() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 0, Some(100)).unwrap();
        let b = insert(&mut project, &video, 100, Some(100)).unwrap();
        let c = insert(&mut project, &video, 300, Some(50)).unwrap();

        EditCommand::AddMix {
            left: a,
            right: b,
            duration: 13,
            kind: TransitionKind::Dissolve,
        }
        .apply(&mut project)
        .unwrap();
        assert_eq!(clip(&project, b).start, 87);
        assert_eq!(clip(&project, c).start, 287);
        assert_eq!(clip(&project, a).mix(MixSide::Right).unwrap().partner, b);
        assert!(project.timeline.tracks[0].is_consistent());

        // the mixed clip is pinned
        assert!(matches!(
            EditCommand::MoveClip { clip_id: b, track_id: 0, position: 400 }.apply(&mut project),
            Err(ReslinkError::PositionConflict(_))
        ));

        EditCommand::RemoveMix { clip_id: b }.apply(&mut project).unwrap();
        assert_eq!(clip(&project, b).start, 100);
        assert_eq!(clip(&project, c).start, 300);
        assert!(clip(&project, a).mixes.is_empty());
    }

    #[test]
    fn test_mix_requires_adjacency() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 0, Some(100)).unwrap();
        let b = insert(&mut project, &video, 101, Some(100)).unwrap();
        let err = EditCommand::AddMix {
            left: a,
            right: b,
            duration: 13,
            kind: TransitionKind::Wipe,
        }
        .apply(&mut project)
        .unwrap_err();
        assert!(matches!(err, ReslinkError::NotAdjacent(_)));
    }

    #[test]
    fn test_cut_moves_right_mix_to_new_clip() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 0, Some(100)).unwrap();
        let b = insert(&mut project, &video, 100, Some(100)).unwrap();
        EditCommand::AddMix { left: a, right: b, duration: 10, kind: TransitionKind::Dissolve }
            .apply(&mut project)
            .unwrap();
        assert!(matches!(
            EditCommand::CutClip { clip_id: a, position: 95 }.apply(&mut project),
            Err(ReslinkError::PositionConflict(_))
        ));
        let EditOutcome::Clip(tail) = EditCommand::CutClip { clip_id: a, position: 50 }
            .apply(&mut project)
            .unwrap()
        else {
            panic!("expected a clip id");
        };
        assert_eq!(clip(&project, b).mix(MixSide::Left).unwrap().partner, tail);
        assert!(clip(&project, a).mixes.is_empty());
        assert!(project.timeline.tracks[0].is_consistent());
    }

    #[test]
    fn test_delete_media_in_use() {
        let (mut project, video, _) = make_project();
        let a = insert(&mut project, &video, 0, None).unwrap();
        assert!(matches!(
            project.delete_media(&video),
            Err(ReslinkError::MediaInUse(_))
        ));
        EditCommand::DeleteClip { clip_id: a }.apply(&mut project).unwrap();
        project.delete_media(&video).unwrap();
        assert!(project.bin.item(&video).is_none());
    }

    #[test]
    fn test_delete_track_drops_its_compositions() {
        let (mut project, _, _) = make_project();
        project.timeline.add_composition("wipe", 0, 0, 25).unwrap();
        let kept = project.timeline.add_composition("wipe", 1, 0, 25).unwrap();
        EditCommand::DeleteTrack { track_id: 0 }
            .apply(&mut project)
            .unwrap();
        let left: Vec<i64> = project.timeline.compositions.iter().map(|c| c.id).collect();
        assert_eq!(left, vec![kept]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert { still: bool, position: i64, duration: Option<i64> },
        Move { pick: usize, track: i64, position: i64 },
        Resize { pick: usize, duration: i64, from_right: bool },
        Cut { pick: usize, offset: i64 },
        Delete { pick: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), 0i64..600, proptest::option::of(1i64..250))
                .prop_map(|(still, position, duration)| Op::Insert { still, position, duration }),
            (0usize..16, 0i64..2, 0i64..600)
                .prop_map(|(pick, track, position)| Op::Move { pick, track, position }),
            (0usize..16, 1i64..400, any::<bool>())
                .prop_map(|(pick, duration, from_right)| Op::Resize { pick, duration, from_right }),
            (0usize..16, 1i64..200).prop_map(|(pick, offset)| Op::Cut { pick, offset }),
            (0usize..16).prop_map(|pick| Op::Delete { pick }),
        ]
    }

    proptest! {
        #[test]
        fn prop_edits_never_overlap(ops in proptest::collection::vec(op_strategy(), 1..40)) {
            let (mut project, video, still) = make_project();
            for op in ops {
                let ids: Vec<i64> = project
                    .timeline
                    .tracks
                    .iter()
                    .flat_map(|t| t.clips().iter().map(|c| c.id))
                    .collect();
                let pick = |i: usize| ids.get(i % ids.len().max(1)).copied().unwrap_or(-1);
                let command = match op {
                    Op::Insert { still: s, position, duration } => EditCommand::InsertClip {
                        bin_id: if s { still.clone() } else { video.clone() },
                        track_id: 0,
                        position,
                        source_in: None,
                        duration,
                    },
                    Op::Move { pick: i, track, position } => EditCommand::MoveClip {
                        clip_id: pick(i),
                        track_id: track,
                        position,
                    },
                    Op::Resize { pick: i, duration, from_right } => EditCommand::ResizeClip {
                        clip_id: pick(i),
                        duration,
                        from_right,
                    },
                    Op::Cut { pick: i, offset } => {
                        let id = pick(i);
                        let start = project.timeline.find_clip(id).map_or(0, |(_, c)| c.start);
                        EditCommand::CutClip { clip_id: id, position: start + offset }
                    }
                    Op::Delete { pick: i } => EditCommand::DeleteClip { clip_id: pick(i) },
                };
                let before = project.timeline.clip_count();
                let result = command.apply(&mut project);
                if result.is_err() {
                    prop_assert_eq!(project.timeline.clip_count(), before);
                }
                for track in &project.timeline.tracks {
                    prop_assert!(track.is_consistent(), "overlap after {:?}", command);
                    for pair in track.clips().windows(2) {
                        prop_assert!(!pair[0].range().overlaps(pair[1].range()));
                    }
                }
            }
        }
    }
}
