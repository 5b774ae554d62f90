//! End-to-end editing scenarios through the scripting API.

use std::sync::Arc;

use reslink_api::{
    AppendOptions, MarkerColor, MarkerDraft, MediaClip, MediaPool, MediaPoolItem, Resolve,
    ReslinkError, SubClip, Timeline, TrackType,
};
use reslink_core::COLOR_ALIASES;
use reslink_transport::{MixSide, SimulationBackend, SimulationConfig};

// ── Helpers ────────────────────────────────────────────────────

struct Fixture {
    resolve: Resolve,
    backend: Arc<SimulationBackend>,
    pool: MediaPool,
    timeline: Timeline,
}

fn fixture(media: &[(&str, i64)]) -> Fixture {
    let (resolve, backend) = Resolve::simulated(SimulationConfig::default());
    for (path, frames) in media {
        backend.register_media(*path, *frames);
    }
    let project = resolve.project_manager().current_project().unwrap();
    Fixture {
        pool: project.media_pool(),
        timeline: project.current_timeline().unwrap(),
        resolve,
        backend,
    }
}

fn import(fx: &Fixture, path: &str) -> MediaPoolItem {
    fx.pool.import_media(&[path]).unwrap().remove(0)
}

// ── Placement ──────────────────────────────────────────────────

#[test]
fn append_places_batch_without_gaps() {
    let fx = fixture(&[("/m/a.mp4", 125), ("/m/b.mp4", 75)]);
    let items = vec![import(&fx, "/m/a.mp4"), import(&fx, "/m/b.mp4")];
    let placed = fx
        .pool
        .append_to_timeline(items, AppendOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(placed[0].start().unwrap(), 0);
    assert_eq!(placed[0].duration().unwrap(), 125);
    assert_eq!(placed[1].start().unwrap(), 125);
    assert_eq!(placed[1].duration().unwrap(), 75);
    assert_eq!(fx.timeline.end_frame().unwrap(), 200);
}

#[test]
fn still_gets_five_seconds() {
    let fx = fixture(&[]);
    let still = import(&fx, "/m/scene01.png");
    let clip = fx.timeline.insert_clip(&still, 0, 0).unwrap();
    assert_eq!(clip.duration().unwrap(), 125);
    assert_eq!(clip.right_offset().unwrap(), 0);
}

#[test]
fn batch_failure_keeps_earlier_entries() {
    let fx = fixture(&[("/m/a.mp4", 100)]);
    let a = import(&fx, "/m/a.mp4");
    fx.timeline.insert_clip(&a, 0, 120).unwrap();
    // The second entry runs into the clip at 120.
    let result = fx.pool.append_to_timeline(
        vec![
            SubClip::new(a.clone()).range(0, 49),
            SubClip::new(a.clone()).range(0, 99),
        ],
        AppendOptions {
            track_id: Some(0),
            start_position: Some(0),
        },
    );
    assert!(matches!(result, Err(ReslinkError::PositionConflict(_))));
    let on_track = fx.timeline.item_list_in_track(TrackType::Video, 1).unwrap();
    assert_eq!(on_track.len(), 2);
    assert_eq!(on_track[0].duration().unwrap(), 50);
}

#[test]
fn media_batch_imports_then_appends() {
    let fx = fixture(&[("/m/a.mp4", 300)]);
    let placed = fx
        .pool
        .append_to_timeline(
            vec![MediaClip::new("/m/a.mp4").range(100, 199), MediaClip::new("/m/intro.png")],
            AppendOptions::default(),
        )
        .unwrap()
        .unwrap();
    assert_eq!(placed[0].left_offset().unwrap(), 100);
    assert_eq!(placed[1].start().unwrap(), 100);
    assert_eq!(fx.pool.root_folder().clip_list().unwrap().len(), 2);
}

// ── Transitions ────────────────────────────────────────────────

#[test]
fn transition_requires_touching_clips() {
    let fx = fixture(&[("/m/a.mp4", 100)]);
    let a = import(&fx, "/m/a.mp4");
    let x = fx.timeline.insert_clip(&a, 0, 0).unwrap();
    let y = fx.timeline.insert_clip(&a, 0, 101).unwrap();
    assert!(matches!(
        fx.timeline.add_transition(&x, &y, Some(13)),
        Err(ReslinkError::NotAdjacent(_))
    ));
    let other_track = fx.timeline.insert_clip(&a, 1, 100).unwrap();
    assert!(matches!(
        fx.timeline.add_transition(&x, &other_track, Some(13)),
        Err(ReslinkError::NotAdjacent(_))
    ));
}

#[test]
fn mixed_clip_cannot_move_or_be_cut_inside_mix() {
    let fx = fixture(&[("/m/a.mp4", 100)]);
    let a = import(&fx, "/m/a.mp4");
    let x = fx.timeline.insert_clip(&a, 0, 0).unwrap();
    let y = fx.timeline.insert_clip(&a, 0, 100).unwrap();
    fx.timeline.add_transition(&x, &y, Some(20)).unwrap();
    assert!(matches!(y.move_to(0, 500), Err(ReslinkError::PositionConflict(_))));
    assert!(matches!(y.cut(85), Err(ReslinkError::PositionConflict(_))));
    assert!(y.cut(120).is_ok());
}

// ── Replace ────────────────────────────────────────────────────

#[test]
fn replace_preserves_framing_and_transition() {
    let fx = fixture(&[("/m/a.mp4", 200), ("/m/b.mp4", 200), ("/m/new.mp4", 200)]);
    let a = import(&fx, "/m/a.mp4");
    let b = import(&fx, "/m/b.mp4");
    let placed = fx
        .pool
        .append_to_timeline(
            vec![SubClip::new(a).range(0, 112), SubClip::new(b).range(0, 49)],
            AppendOptions::default(),
        )
        .unwrap()
        .unwrap();
    fx.timeline
        .add_transition(&placed[0], &placed[1], Some(13))
        .unwrap();
    assert_eq!(placed[1].start().unwrap(), 100);
    assert_eq!(placed[1].duration().unwrap(), 50);

    let replaced = fx.timeline.replace_clip(&placed[1], "/m/new.mp4").unwrap();
    assert_eq!(replaced.start().unwrap(), 100);
    assert_eq!(replaced.duration().unwrap(), 50);
    let mixes = replaced.mixes().unwrap();
    assert_eq!(mixes.len(), 1);
    assert_eq!(mixes[0].side, MixSide::Left);
    assert_eq!(mixes[0].duration, 13);
    assert_eq!(mixes[0].partner, placed[0].id());
    assert!(matches!(placed[1].info(), Err(ReslinkError::NotFound(_))));
}

#[test]
fn replaced_media_stays_in_pool_until_unused() {
    let fx = fixture(&[("/m/a.mp4", 100), ("/m/b.mp4", 100)]);
    let a = import(&fx, "/m/a.mp4");
    let clip = fx.timeline.insert_clip(&a, 0, 0).unwrap();
    assert!(matches!(a.delete(), Err(ReslinkError::MediaInUse(_))));
    let b = import(&fx, "/m/b.mp4");
    fx.timeline.replace_clip(&clip, &b).unwrap();
    assert!(a.delete().unwrap());
}

// ── Markers ────────────────────────────────────────────────────

#[test]
fn every_alias_round_trips_through_guides() {
    let fx = fixture(&[]);
    for (frame, (name, color)) in COLOR_ALIASES.iter().enumerate() {
        let frame = frame as i64 * 10;
        let category = reslink_api::ColorArg::from(*name).resolve().unwrap();
        assert_eq!(category, *color);
        fx.timeline
            .add_marker(frame, &MarkerDraft::new(category.category()))
            .unwrap();
        assert_eq!(fx.timeline.markers().unwrap()[&frame].color, *color);
    }
}

#[test]
fn delete_by_color_twice_is_harmless() {
    let fx = fixture(&[]);
    fx.timeline
        .add_marker(5, &MarkerDraft::new("Cyan").name("a"))
        .unwrap();
    fx.timeline
        .add_marker(9, &MarkerDraft::new("Red").name("b"))
        .unwrap();
    assert!(fx.timeline.delete_markers_by_color(MarkerColor::Blue).unwrap());
    assert!(fx.timeline.delete_markers_by_color(MarkerColor::Blue).unwrap());
    let left = fx.timeline.markers().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[&9].name, "b");
}

#[test]
fn invalid_color_is_rejected_before_transport() {
    let fx = fixture(&[]);
    let before = fx.backend.call_count();
    assert!(matches!(
        fx.timeline.add_marker(0, &MarkerDraft::new("Magenta")),
        Err(ReslinkError::InvalidColor(_))
    ));
    assert!(matches!(
        fx.timeline.delete_markers_by_color(9),
        Err(ReslinkError::InvalidColor(_))
    ));
    assert_eq!(fx.backend.call_count(), before);
}

// ── Playback ───────────────────────────────────────────────────

#[test]
fn play_and_pause_drive_the_editor() {
    let fx = fixture(&[("/m/a.mp4", 100)]);
    assert!(!fx.backend.is_playing());
    fx.timeline.play().unwrap();
    assert!(fx.backend.is_playing());
    fx.timeline.pause().unwrap();
    assert!(!fx.backend.is_playing());
    fx.timeline.pause().unwrap();
    assert!(!fx.backend.is_playing());
}

#[test]
fn closing_the_project_stops_playback() {
    let fx = fixture(&[]);
    fx.timeline.play().unwrap();
    let manager = fx.resolve.project_manager();
    let project = manager.current_project().unwrap();
    assert!(manager.close_project(&project).unwrap());
    assert!(!fx.backend.is_playing());
    assert!(fx.timeline.play().is_err());
}

// ── Projects ───────────────────────────────────────────────────

#[test]
fn saved_project_reloads_with_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edit.json");
    let fx = fixture(&[("/m/a.mp4", 80)]);
    let a = import(&fx, "/m/a.mp4");
    fx.timeline.insert_clip(&a, 0, 20).unwrap();
    fx.timeline
        .add_marker(20, &MarkerDraft::new("Green").custom_data("s1"))
        .unwrap();
    let manager = fx.resolve.project_manager();
    manager.current_project().unwrap().save_as(&path).unwrap();

    let project = manager.create_project("Scratch").unwrap();
    assert_eq!(project.current_timeline().unwrap().total_duration().unwrap(), 0);

    let project = manager.load_project(&path).unwrap();
    let timeline = project.current_timeline().unwrap();
    assert_eq!(timeline.total_duration().unwrap(), 100);
    assert_eq!(timeline.marker_by_custom_data("s1").unwrap().unwrap().0, 20);
    assert_eq!(project.project_path().unwrap(), path.display().to_string());
}
