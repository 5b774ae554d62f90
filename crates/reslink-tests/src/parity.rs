//! The remote backend, looped back onto a simulated editor, must behave
//! exactly like talking to the simulation in-process.

use std::sync::Arc;

use reslink_api::{AppendOptions, MarkerDraft, Resolve, ReslinkError, SubClip};
use reslink_core::TransportError;
use reslink_transport::{
    Method, RemoteConfig, SimulationBackend, SimulationConfig, Transport, Value, Wire, WireError,
};

/// Answers wire calls from a simulated editor, the way a bus peer would.
struct LoopbackWire {
    editor: Arc<SimulationBackend>,
}

impl Wire for LoopbackWire {
    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, WireError> {
        let method: Method = method
            .parse()
            .map_err(|e: ReslinkError| WireError::Fault(e.to_string()))?;
        self.editor.invoke(method, args).map_err(|e| match e {
            TransportError::NotConnected(reason) => WireError::Unreachable(reason),
            other => WireError::Fault(other.to_string()),
        })
    }
}

fn backends() -> Vec<(Resolve, Arc<SimulationBackend>)> {
    let local = Resolve::simulated(SimulationConfig::default());
    let editor = Arc::new(SimulationBackend::new(SimulationConfig::default()));
    let remote = Resolve::connect_remote(
        RemoteConfig::default(),
        LoopbackWire {
            editor: editor.clone(),
        },
    )
    .unwrap();
    vec![local, (remote, editor)]
}

/// A short edit session; returns the timeline summary and guide frames.
fn edit_session(resolve: &Resolve, editor: &SimulationBackend) -> (String, Vec<i64>) {
    editor.register_media("/m/a.mp4", 90);
    editor.register_media("/m/b.mp4", 60);
    let project = resolve.project_manager().current_project().unwrap();
    let pool = project.media_pool();
    let timeline = project.current_timeline().unwrap();

    let clips = pool.import_media(&["/m/a.mp4", "/m/b.mp4", "/m/c.png"]).unwrap();
    let placed = pool
        .append_to_timeline(
            vec![
                SubClip::new(clips[0].clone()).range(10, 69),
                SubClip::new(clips[1].clone()),
                SubClip::new(clips[2].clone()),
            ],
            AppendOptions::default(),
        )
        .unwrap()
        .unwrap();
    timeline.add_transition(&placed[0], &placed[1], Some(13)).unwrap();
    timeline.add_transition(&placed[1], &placed[2], None).unwrap();
    for clip in &placed {
        timeline
            .add_marker(clip.start().unwrap(), &MarkerDraft::new("Mint"))
            .unwrap();
    }
    assert_eq!(timeline.add_composition("wipe", 0, 100, 25).unwrap(), 0);
    let guides = timeline.markers().unwrap().into_keys().collect();
    (timeline.summary().unwrap(), guides)
}

#[test]
fn remote_and_simulation_agree() {
    let results: Vec<_> = backends()
        .iter()
        .map(|(resolve, editor)| edit_session(resolve, editor))
        .collect();
    assert_eq!(results[0], results[1]);
    // 60 + 60 + 125 frames with two 13-frame overlaps
    assert_eq!(results[0].1, vec![0, 47, 94]);
}

#[test]
fn remote_faults_surface_as_transport_errors() {
    for (resolve, _) in backends() {
        let err = resolve
            .project_manager()
            .load_project("/nonexistent/project.json")
            .unwrap_err();
        assert!(matches!(
            err,
            ReslinkError::Transport(TransportError::RemoteFault { .. })
        ));
    }
}

#[test]
fn calls_after_quit_are_not_connected() {
    for (resolve, _) in backends() {
        resolve.quit().unwrap();
        let manager = resolve.project_manager();
        assert!(manager.current_project().is_none());
        assert!(matches!(
            manager.create_project("Again"),
            Err(ReslinkError::Transport(TransportError::NotConnected(_)))
        ));
    }
}
