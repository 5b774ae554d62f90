//! Deterministic in-memory stand-in for the editor.
//!
//! The simulation keeps a whole project in memory and answers every remote
//! method with results shaped exactly like the editor's. It enforces the
//! timeline invariants itself and reports violations as `RemoteFault`, the
//! same way the editor refuses an edit.

mod handlers;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use reslink_core::{defaults, FrameRate, TransportError};
use reslink_timeline::{Project, RecentProjects, Timeline};

use crate::method::Method;
use crate::transport::Transport;
use crate::value::Args;

/// Configuration for a simulated editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Name of the project open at startup and of new projects
    pub project_name: String,
    pub frame_rate: FrameRate,
    pub width: u32,
    pub height: u32,
    /// Length given to imported stills
    pub still_duration: i64,
    /// Length given to video and audio files that were never registered
    pub fallback_media_duration: i64,
    /// Tracks created in every new project
    pub video_tracks: usize,
    pub audio_tracks: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            project_name: "Untitled".to_string(),
            frame_rate: defaults::FRAME_RATE,
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            still_duration: defaults::STILL_DURATION_FRAMES,
            fallback_media_duration: defaults::STILL_DURATION_FRAMES,
            video_tracks: 2,
            audio_tracks: 1,
        }
    }
}

/// Mutable editor state behind the lock.
#[derive(Debug)]
struct SimState {
    project: Option<Project>,
    project_path: Option<PathBuf>,
    recent: RecentProjects,
    /// Logical clock for recent-project ordering
    stamp: u64,
    /// Registered media lengths by path
    media: HashMap<String, i64>,
    playing: bool,
    renders: Vec<String>,
    exited: bool,
    calls: u64,
}

impl SimState {
    fn tick(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }
}

/// In-memory editor implementing [`Transport`].
#[derive(Debug)]
pub struct SimulationBackend {
    config: SimulationConfig,
    state: Mutex<SimState>,
}

impl Default for SimulationBackend {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationBackend {
    /// Start a simulated editor with a fresh project open.
    pub fn new(config: SimulationConfig) -> Self {
        let project = fresh_project(&config, &config.project_name);
        info!(
            project = %config.project_name,
            fps = %config.frame_rate,
            "simulation backend started"
        );
        Self {
            state: Mutex::new(SimState {
                project: Some(project),
                project_path: None,
                recent: RecentProjects::new(),
                stamp: 0,
                media: HashMap::new(),
                playing: false,
                renders: Vec::new(),
                exited: false,
                calls: 0,
            }),
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Declare the length of a media file, standing in for probing it.
    pub fn register_media(&self, path: impl Into<String>, frames: i64) {
        let path = path.into();
        debug!(path = %path, frames, "media registered");
        self.state.lock().media.insert(path, frames);
    }

    /// Copy of the open project, if any.
    pub fn snapshot(&self) -> Option<Project> {
        self.state.lock().project.clone()
    }

    /// Render targets requested so far.
    pub fn renders(&self) -> Vec<String> {
        self.state.lock().renders.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    /// Number of calls served.
    pub fn call_count(&self) -> u64 {
        self.state.lock().calls
    }
}

fn fresh_project(config: &SimulationConfig, name: &str) -> Project {
    let mut project = Project::new(name);
    project.frame_rate = config.frame_rate;
    project.width = config.width;
    project.height = config.height;
    project.timeline =
        Timeline::with_tracks("Timeline 1", config.video_tracks, config.audio_tracks);
    project
}

impl Transport for SimulationBackend {
    fn invoke(&self, method: Method, args: &[Value]) -> Result<Value, TransportError> {
        let mut state = self.state.lock();
        if state.exited {
            return Err(TransportError::NotConnected(
                "the simulated editor has exited".to_string(),
            ));
        }
        state.calls += 1;

        let result = handlers::dispatch(&self.config, &mut state, method, Args::new(method, args));
        match &result {
            Ok(value) => debug!(method = %method, result = %value, "simulated call"),
            Err(err) => debug!(method = %method, error = %err, "simulated call failed"),
        }
        result
    }

    fn backend_name(&self) -> &'static str {
        "simulation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use serde_json::json;

    #[test]
    fn test_starts_with_default_layout() {
        let sim = SimulationBackend::default();
        let tracks = sim.invoke(Method::GetAllTracksInfo, &[]).unwrap();
        assert_eq!(tracks.as_array().unwrap().len(), 3);
        assert_eq!(tracks[2]["type"], json!("audio"));
        assert_eq!(
            sim.invoke(Method::GetProjectName, &[]).unwrap(),
            json!("Untitled")
        );
    }

    #[test]
    fn test_registered_media_length() {
        let sim = SimulationBackend::default();
        sim.register_media("/m/long.mp4", 1000);
        let id = sim
            .invoke(Method::ImportMedia, &args!["/m/long.mp4", "-1"])
            .unwrap();
        let props = sim.invoke(Method::GetClipProperties, &[id]).unwrap();
        assert_eq!(props["duration"], json!(1000));

        let other = sim
            .invoke(Method::ImportMedia, &args!["/m/short.mov", "-1"])
            .unwrap();
        let props = sim.invoke(Method::GetClipProperties, &[other]).unwrap();
        assert_eq!(props["duration"], json!(125));
    }

    #[test]
    fn test_exit_disconnects() {
        let sim = SimulationBackend::default();
        assert_eq!(sim.invoke(Method::ExitApp, &[]).unwrap(), json!(true));
        assert!(matches!(
            sim.invoke(Method::GetProjectName, &[]),
            Err(TransportError::NotConnected(_))
        ));
    }
}
