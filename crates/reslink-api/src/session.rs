//! Connection state shared by every scripting object.
//!
//! One `Session` exists per `Resolve` handle. It owns the transport and the
//! small amount of client-side state the editor does not keep for us: whether
//! a project is open and which bin folder imports land in.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use reslink_core::defaults::ROOT_FOLDER_ID;
use reslink_core::{FrameRate, ReslinkError, Result};
use reslink_transport::{value, ClipRecord, Method, TrackRecord, Transport};

/// Name the editor gives the root bin folder.
pub const ROOT_FOLDER_NAME: &str = "Master";

/// Id and display name of a bin folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FolderRef {
    pub id: String,
    pub name: String,
}

impl FolderRef {
    pub fn root() -> Self {
        Self {
            id: ROOT_FOLDER_ID.to_string(),
            name: ROOT_FOLDER_NAME.to_string(),
        }
    }
}

#[derive(Debug)]
struct SessionState {
    project_open: bool,
    current_folder: FolderRef,
}

impl SessionState {
    fn opened() -> Self {
        Self {
            project_open: true,
            current_folder: FolderRef::root(),
        }
    }
}

/// Transport plus client-side session state.
pub struct Session {
    transport: Arc<dyn Transport>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.transport.backend_name())
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl Session {
    /// Attach to an editor. The editor always starts with a project open.
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        debug!(backend = transport.backend_name(), "session started");
        Arc::new(Self {
            transport,
            state: Mutex::new(SessionState::opened()),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.transport.backend_name()
    }

    // ── Session state ───────────────────────────────────────────

    pub fn project_open(&self) -> bool {
        self.state.lock().project_open
    }

    /// A project was created or loaded: reset per-project state.
    pub(crate) fn begin_project(&self) {
        *self.state.lock() = SessionState::opened();
    }

    pub(crate) fn end_project(&self) {
        let mut state = self.state.lock();
        state.project_open = false;
        state.current_folder = FolderRef::root();
    }

    pub(crate) fn current_folder(&self) -> FolderRef {
        self.state.lock().current_folder.clone()
    }

    pub(crate) fn set_current_folder(&self, folder: FolderRef) {
        self.state.lock().current_folder = folder;
    }

    // ── Calls ───────────────────────────────────────────────────

    pub(crate) fn call(&self, method: Method, args: &[Value]) -> Result<Value> {
        Ok(self.transport.invoke(method, args)?)
    }

    pub(crate) fn call_i64(&self, method: Method, args: &[Value]) -> Result<i64> {
        let result = self.call(method, args)?;
        Ok(value::as_i64(method, &result)?)
    }

    pub(crate) fn call_bool(&self, method: Method, args: &[Value]) -> Result<bool> {
        let result = self.call(method, args)?;
        Ok(value::as_bool(method, &result)?)
    }

    pub(crate) fn call_string(&self, method: Method, args: &[Value]) -> Result<String> {
        let result = self.call(method, args)?;
        Ok(value::as_string(method, &result)?)
    }

    pub(crate) fn call_strings(&self, method: Method, args: &[Value]) -> Result<Vec<String>> {
        let result = self.call(method, args)?;
        Ok(value::as_string_list(method, &result)?)
    }

    pub(crate) fn call_record<T: DeserializeOwned>(&self, method: Method, args: &[Value]) -> Result<T> {
        let result = self.call(method, args)?;
        Ok(value::record(method, result)?)
    }

    pub(crate) fn call_records<T: DeserializeOwned>(
        &self,
        method: Method,
        args: &[Value],
    ) -> Result<Vec<T>> {
        let result = self.call(method, args)?;
        Ok(value::records(method, result)?)
    }

    // ── Shared queries ──────────────────────────────────────────

    pub(crate) fn frame_rate(&self) -> Result<FrameRate> {
        let result = self.call(Method::GetProjectFps, &[])?;
        FrameRate::from_fps(value::as_f64(Method::GetProjectFps, &result)?)
    }

    pub(crate) fn tracks(&self) -> Result<Vec<TrackRecord>> {
        self.call_records(Method::GetAllTracksInfo, &[])
    }

    pub(crate) fn track(&self, track_id: i64) -> Result<TrackRecord> {
        self.tracks()?
            .into_iter()
            .find(|t| t.id == track_id)
            .ok_or_else(|| ReslinkError::NotFound(format!("track {track_id}")))
    }

    pub(crate) fn clips_on_track(&self, track_id: i64) -> Result<Vec<ClipRecord>> {
        self.call_records(Method::GetClipsOnTrack, &[Value::from(track_id)])
    }

    /// Every clip on every track.
    pub(crate) fn all_clips(&self) -> Result<Vec<ClipRecord>> {
        let mut clips = Vec::new();
        for track in self.tracks()? {
            clips.extend(self.clips_on_track(track.id)?);
        }
        Ok(clips)
    }

    pub(crate) fn clip_info(&self, clip_id: i64) -> Result<ClipRecord> {
        let result = self.call(Method::GetTimelineClipInfo, &[Value::from(clip_id)])?;
        value::record_opt(Method::GetTimelineClipInfo, result)?
            .ok_or_else(|| ReslinkError::NotFound(format!("timeline clip {clip_id}")))
    }
}
