//! The open project: settings, timeline access and rendering.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use reslink_core::{FrameRate, Result};
use reslink_transport::Method;

use crate::capability::Capability;
use crate::media_pool::MediaPool;
use crate::session::Session;
use crate::timeline::Timeline;
use crate::timeline_item::TimelineItem;

/// Key prefix of render settings stored on the project.
const RENDER_PREFIX: &str = "render_";

/// Setting names scripts use, mapped to the editor's own keys.
const SETTING_KEYS: &[(&str, &str)] = &[
    ("timelineFrameRate", "fps"),
    ("timelineResolutionWidth", "width"),
    ("timelineResolutionHeight", "height"),
    ("projectName", "name"),
];

fn setting_key(key: &str) -> &str {
    SETTING_KEYS
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, own)| *own)
}

#[derive(Debug, Clone)]
pub struct Project {
    session: Arc<Session>,
}

impl Project {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn name(&self) -> Result<String> {
        self.session.call_string(Method::GetProjectName, &[])
    }

    pub fn set_name(&self, name: &str) -> Result<bool> {
        self.set_setting("name", name)
    }

    pub fn media_pool(&self) -> MediaPool {
        MediaPool::new(self.session.clone())
    }

    pub fn current_timeline(&self) -> Result<Timeline> {
        // Fails fast when the project was closed behind our back.
        self.session.call(Method::GetTimelineName, &[])?;
        Ok(Timeline::new(self.session.clone()))
    }

    /// The video clip under the playhead on the uppermost video track that
    /// has one, `None` over a gap.
    pub fn current_video_item(&self) -> Result<Option<TimelineItem>> {
        let id = self.session.call_i64(Method::GetCurrentVideoItem, &[])?;
        Ok((id >= 0).then(|| TimelineItem::new(self.session.clone(), id)))
    }

    /// Projects hold exactly one timeline.
    pub fn timeline_count(&self) -> usize {
        1
    }

    /// The timeline at a 1-based index.
    pub fn timeline_by_index(&self, index: usize) -> Option<Timeline> {
        (index == 1).then(|| Timeline::new(self.session.clone()))
    }

    pub fn set_current_timeline(&self, _timeline: &Timeline) -> bool {
        true
    }

    // ── Settings ────────────────────────────────────────────────

    /// A project setting as text. Unknown keys read as "".
    pub fn setting(&self, key: &str) -> Result<String> {
        self.session
            .call_string(Method::GetProjectProperty, &[Value::from(setting_key(key))])
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<bool> {
        self.session.call_bool(
            Method::SetProjectProperty,
            &[Value::from(setting_key(key)), Value::from(value)],
        )
    }

    pub fn frame_rate(&self) -> Result<FrameRate> {
        self.session.frame_rate()
    }

    /// Width and height in pixels.
    pub fn resolution(&self) -> Result<(i64, i64)> {
        let width = self
            .session
            .call_i64(Method::GetProjectResolutionWidth, &[])?;
        let height = self
            .session
            .call_i64(Method::GetProjectResolutionHeight, &[])?;
        Ok((width, height))
    }

    /// Length of the timeline in frames.
    pub fn duration(&self) -> Result<i64> {
        self.session.call_i64(Method::GetProjectDuration, &[])
    }

    // ── Files ───────────────────────────────────────────────────

    pub fn save(&self) -> Result<bool> {
        self.session.call_bool(Method::SaveProject, &[])
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref().display().to_string();
        info!(path = %path, "saving project");
        self.session
            .call_bool(Method::SaveProjectAs, &[Value::from(path)])
    }

    /// File the project was last saved to or loaded from; "" if none.
    pub fn project_path(&self) -> Result<String> {
        self.session.call_string(Method::GetProjectPath, &[])
    }

    // ── Rendering ───────────────────────────────────────────────

    pub fn set_current_render_format_and_codec(&self, format: &str, codec: &str) -> Result<bool> {
        self.set_setting("renderFormat", format)?;
        self.set_setting("renderCodec", codec)
    }

    /// Store render settings on the project as `render_<key>` entries.
    pub fn set_render_settings(&self, settings: &BTreeMap<String, String>) -> Result<bool> {
        for (key, value) in settings {
            self.set_setting(&format!("{RENDER_PREFIX}{key}"), value)?;
        }
        Ok(true)
    }

    /// Settings stored by `set_render_settings`, keyed without their prefix.
    pub fn render_settings(&self) -> Result<BTreeMap<String, String>> {
        self.session.call_record(Method::GetRenderSettings, &[])
    }

    /// Render the timeline to `url`.
    pub fn start_rendering(&self, url: &str) -> Result<bool> {
        info!(url, "render requested");
        self.session.call_bool(Method::Render, &[Value::from(url)])
    }

    pub fn load_render_preset(&self, _name: &str) -> Capability<bool> {
        Capability::NotSupported("LoadRenderPreset")
    }

    pub fn add_render_job(&self) -> Capability<String> {
        Capability::NotSupported("AddRenderJob")
    }

    pub fn render_job_list(&self) -> Capability<Vec<String>> {
        Capability::NotSupported("GetRenderJobList")
    }

    pub fn render_job_status(&self, _job_id: &str) -> Capability<String> {
        Capability::NotSupported("GetRenderJobStatus")
    }

    pub fn is_rendering_in_progress(&self) -> Capability<bool> {
        Capability::NotSupported("IsRenderingInProgress")
    }

    pub fn delete_all_render_jobs(&self) -> Capability<bool> {
        Capability::NotSupported("DeleteAllRenderJobs")
    }
}
