//! Property tests: timecode conversion and the no-overlap invariant.

use proptest::prelude::*;

use reslink_api::{MediaPoolItem, Resolve, Timeline, TimelineItem, TrackType};
use reslink_core::{frames_to_timecode, timecode_to_frames, FrameRate};
use reslink_transport::{ClipRecord, MixSide, SimulationConfig};

// ── Timecode ───────────────────────────────────────────────────

fn any_rate() -> impl Strategy<Value = FrameRate> {
    prop::sample::select(vec![23.976, 24.0, 25.0, 29.97, 30.0])
        .prop_map(|fps| FrameRate::from_fps(fps).unwrap())
}

proptest! {
    #[test]
    fn timecode_round_trips(frames in 0i64..10_000_000, rate in any_rate()) {
        let tc = frames_to_timecode(frames, rate).unwrap();
        prop_assert_eq!(timecode_to_frames(&tc, rate).unwrap(), frames);
    }

    #[test]
    fn timecode_fields_stay_in_range(frames in 0i64..10_000_000, rate in any_rate()) {
        let tc = frames_to_timecode(frames, rate).unwrap();
        let fields: Vec<i64> = tc.split(':').map(|f| f.parse().unwrap()).collect();
        prop_assert_eq!(fields.len(), 4);
        prop_assert!(fields[1] < 60 && fields[2] < 60);
        prop_assert!(fields[3] < rate.nominal());
    }
}

// ── Editing ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Insert { media: usize, track: i64, position: i64 },
    Move { clip: usize, track: i64, position: i64 },
    Resize { clip: usize, frames: i64, from_right: bool },
    Cut { clip: usize, offset: i64 },
    Mix { clip: usize, frames: i64 },
    Delete { clip: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..3, 0i64..2, 0i64..400)
            .prop_map(|(media, track, position)| Op::Insert { media, track, position }),
        1 => (0usize..16, 0i64..2, 0i64..400)
            .prop_map(|(clip, track, position)| Op::Move { clip, track, position }),
        1 => (0usize..16, 1i64..200, any::<bool>())
            .prop_map(|(clip, frames, from_right)| Op::Resize { clip, frames, from_right }),
        1 => (0usize..16, 1i64..150).prop_map(|(clip, offset)| Op::Cut { clip, offset }),
        1 => (0usize..16, 1i64..40).prop_map(|(clip, frames)| Op::Mix { clip, frames }),
        1 => (0usize..16).prop_map(|clip| Op::Delete { clip }),
    ]
}

fn pick(clips: &[TimelineItem], index: usize) -> Option<TimelineItem> {
    (!clips.is_empty()).then(|| clips[index % clips.len()].clone())
}

fn apply(timeline: &Timeline, media: &[MediaPoolItem], clips: &mut Vec<TimelineItem>, op: Op) {
    // Rejected edits are expected; only the resulting layout matters.
    match op {
        Op::Insert { media: m, track, position } => {
            if let Ok(clip) = timeline.insert_clip(&media[m], track, position) {
                clips.push(clip);
            }
        }
        Op::Move { clip, track, position } => {
            if let Some(clip) = pick(clips, clip) {
                let _ = clip.move_to(track, position);
            }
        }
        Op::Resize { clip, frames, from_right } => {
            if let Some(clip) = pick(clips, clip) {
                let _ = clip.set_duration(frames, from_right);
            }
        }
        Op::Cut { clip, offset } => {
            if let Some(clip) = pick(clips, clip) {
                if let Ok(start) = clip.start() {
                    if let Ok(right) = clip.cut(start + offset) {
                        clips.push(right);
                    }
                }
            }
        }
        Op::Mix { clip, frames } => {
            if let Some(left) = pick(clips, clip) {
                let neighbour = clips.iter().find(|other| {
                    matches!((left.end(), other.start()), (Ok(end), Ok(start)) if end == start)
                        && left.track_id().ok() == other.track_id().ok()
                });
                if let Some(right) = neighbour {
                    let _ = timeline.add_transition(&left, right, Some(frames));
                }
            }
        }
        Op::Delete { clip } => {
            if let Some(clip) = pick(clips, clip) {
                let _ = clip.delete();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edits_never_overlap_clips(ops in prop::collection::vec(op(), 1..40)) {
        let (resolve, backend) = Resolve::simulated(SimulationConfig::default());
        backend.register_media("/m/long.mp4", 180);
        backend.register_media("/m/short.mp4", 30);
        let project = resolve.project_manager().current_project().unwrap();
        let media = project
            .media_pool()
            .import_media(&["/m/long.mp4", "/m/short.mp4", "/m/still.png"])
            .unwrap();
        let timeline = project.current_timeline().unwrap();

        let mut clips = Vec::new();
        for op in ops {
            apply(&timeline, &media, &mut clips, op);
        }

        for index in 1..=2 {
            let records: Vec<ClipRecord> = timeline
                .item_list_in_track(TrackType::Video, index)
                .unwrap()
                .iter()
                .map(|c| c.info().unwrap())
                .collect();
            for clip in &records {
                prop_assert!(clip.position >= 0 && clip.duration >= 1);
            }
            // Neighbours may only share the frames of a transition between them.
            for pair in records.windows(2) {
                let shared = pair[0].end() - pair[1].position;
                if shared > 0 {
                    let mix = pair[0].mix(MixSide::Right);
                    prop_assert!(
                        mix.is_some_and(|m| m.partner == pair[1].id && m.duration == shared),
                        "clips {} and {} overlap by {}", pair[0].id, pair[1].id, shared
                    );
                }
            }
        }
    }
}
