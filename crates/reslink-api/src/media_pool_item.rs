//! A clip in the media pool.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use reslink_core::{ColorArg, MediaKind, ReslinkError, Result};
use reslink_transport::{BinClipRecord, Method};

use crate::capability::Capability;
use crate::markers::{MarkerDraft, MarkerInfo, MarkerMap, MarkerScope};
use crate::session::Session;

/// Alternative property names accepted for the canonical ones.
pub const PROPERTY_ALIASES: &[(&str, &str)] = &[
    ("File Name", "name"),
    ("File Path", "path"),
    ("url", "path"),
    ("Frames", "duration"),
];

const CLIP_COLOR_PROPERTY: &str = "Clip Color";

/// Canonical key for a property name or alias.
pub fn canonical_property(key: &str) -> &str {
    PROPERTY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, canonical)| *canonical)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Handle to a bin clip. Cheap to clone; every read goes to the editor.
#[derive(Debug, Clone)]
pub struct MediaPoolItem {
    session: Arc<Session>,
    id: String,
}

impl PartialEq for MediaPoolItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl MediaPoolItem {
    pub(crate) fn new(session: Arc<Session>, id: impl Into<String>) -> Self {
        Self {
            session,
            id: id.into(),
        }
    }

    /// Bin id.
    pub fn media_id(&self) -> &str {
        &self.id
    }

    /// Current properties as reported by the editor.
    pub fn properties(&self) -> Result<BinClipRecord> {
        self.session
            .call_record(Method::GetClipProperties, &[Value::from(self.id.as_str())])
    }

    pub fn name(&self) -> Result<String> {
        Ok(self.properties()?.name)
    }

    pub fn kind(&self) -> Result<MediaKind> {
        Ok(self.properties()?.kind)
    }

    /// Length in frames. Stills report their assigned length.
    pub fn duration(&self) -> Result<i64> {
        Ok(self.properties()?.duration)
    }

    /// One property by canonical name or alias. Unknown keys read as "".
    pub fn clip_property(&self, key: &str) -> Result<String> {
        let record = self.properties()?;
        Ok(match canonical_property(key) {
            "id" => record.id,
            "name" => record.name,
            "path" => record.path,
            "duration" => record.duration.to_string(),
            "type" => record.kind.to_string(),
            "folder" => record.folder,
            other => record.extra.get(other).map(render).unwrap_or_default(),
        })
    }

    /// All properties, including every alias of the canonical keys.
    pub fn clip_properties(&self) -> Result<BTreeMap<String, String>> {
        let record = self.properties()?;
        let mut props: BTreeMap<String, String> = record
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), render(v)))
            .collect();
        props.insert("id".into(), record.id);
        props.insert("name".into(), record.name);
        props.insert("path".into(), record.path);
        props.insert("duration".into(), record.duration.to_string());
        props.insert("type".into(), record.kind.to_string());
        props.insert("folder".into(), record.folder);
        for (alias, canonical) in PROPERTY_ALIASES {
            if let Some(value) = props.get(*canonical).cloned() {
                props.insert((*alias).to_string(), value);
            }
        }
        Ok(props)
    }

    pub fn set_clip_property(&self, key: &str, value: &str) -> Result<bool> {
        let key = canonical_property(key);
        self.session.call_bool(
            Method::SetClipProperty,
            &[
                Value::from(self.id.as_str()),
                Value::from(key),
                Value::from(value),
            ],
        )
    }

    pub fn clip_color(&self) -> Result<String> {
        self.clip_property(CLIP_COLOR_PROPERTY)
    }

    pub fn set_clip_color(&self, color: &str) -> Result<bool> {
        self.set_clip_property(CLIP_COLOR_PROPERTY, color)
    }

    /// Remove the clip from the pool. Fails with `MediaInUse` while any
    /// timeline clip still plays it.
    pub fn delete(&self) -> Result<bool> {
        let users: Vec<i64> = self
            .session
            .all_clips()?
            .into_iter()
            .filter(|c| c.bin_id == self.id)
            .map(|c| c.id)
            .collect();
        if !users.is_empty() {
            return Err(ReslinkError::MediaInUse(format!(
                "bin clip {} is used by timeline clips {users:?}",
                self.id
            )));
        }
        self.session
            .call_bool(Method::DeleteBinClip, &[Value::from(self.id.as_str())])
    }

    // ── Markers ─────────────────────────────────────────────────

    fn scope(&self) -> MarkerScope<'_> {
        MarkerScope::Clip(&self.id)
    }

    /// Add a marker at a source frame, replacing any marker already there.
    pub fn add_marker(&self, frame: i64, draft: &MarkerDraft) -> Result<bool> {
        self.scope().add(&self.session, frame, draft)
    }

    pub fn markers(&self) -> Result<MarkerMap> {
        self.scope().list(&self.session)
    }

    pub fn marker_by_custom_data(&self, data: &str) -> Result<Option<(i64, MarkerInfo)>> {
        self.scope().find_custom_data(&self.session, data)
    }

    pub fn update_marker_custom_data(&self, frame: i64, data: &str) -> Result<bool> {
        self.scope().update_custom_data(&self.session, frame, data)
    }

    pub fn marker_custom_data(&self, frame: i64) -> Result<String> {
        self.scope().custom_data(&self.session, frame)
    }

    pub fn delete_marker_at_frame(&self, frame: i64) -> Result<bool> {
        self.scope().delete_at(&self.session, frame)
    }

    pub fn delete_markers_by_color(&self, color: impl Into<ColorArg>) -> Result<bool> {
        self.scope().delete_by_color(&self.session, &color.into())
    }

    pub fn delete_marker_by_custom_data(&self, data: &str) -> Result<bool> {
        self.scope().delete_custom_data(&self.session, data)
    }

    // ── Fusion ──────────────────────────────────────────────────

    pub fn fusion_comp_count(&self) -> Capability<usize> {
        Capability::NotSupported("GetFusionCompCount")
    }

    pub fn add_fusion_comp(&self) -> Capability<()> {
        Capability::NotSupported("AddFusionComp")
    }

    pub fn fusion_comp_names(&self) -> Capability<Vec<String>> {
        Capability::NotSupported("GetFusionCompNameList")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reslink_transport::{args, SimulationBackend, Transport};

    fn imported(path: &str, frames: i64) -> MediaPoolItem {
        let backend = Arc::new(SimulationBackend::default());
        if frames > 0 {
            backend.register_media(path, frames);
        }
        let id = backend
            .invoke(Method::ImportMedia, &args![path, "-1"])
            .unwrap();
        MediaPoolItem::new(Session::new(backend), id.as_str().unwrap())
    }

    #[test]
    fn test_aliases_resolve_to_same_value() {
        let item = imported("/media/scene01.mp4", 240);
        assert_eq!(item.clip_property("File Name").unwrap(), item.name().unwrap());
        assert_eq!(item.clip_property("File Path").unwrap(), "/media/scene01.mp4");
        assert_eq!(item.clip_property("url").unwrap(), item.clip_property("path").unwrap());
        assert_eq!(item.clip_property("Frames").unwrap(), "240");
        assert_eq!(item.clip_property("nonexistent").unwrap(), "");

        let props = item.clip_properties().unwrap();
        assert_eq!(props["Frames"], props["duration"]);
        assert_eq!(props["File Name"], "scene01.mp4");
    }

    #[test]
    fn test_set_property_through_alias() {
        let item = imported("/media/still.png", 0);
        assert_eq!(item.duration().unwrap(), 125);
        assert!(item.set_clip_property("Frames", "50").unwrap());
        assert_eq!(item.duration().unwrap(), 50);
        assert!(item.set_clip_property("File Name", "Opening").unwrap());
        assert_eq!(item.name().unwrap(), "Opening");
    }

    #[test]
    fn test_clip_color_is_stored() {
        let item = imported("/media/a.mov", 100);
        assert_eq!(item.clip_color().unwrap(), "");
        item.set_clip_color("Orange").unwrap();
        assert_eq!(item.clip_color().unwrap(), "Orange");
        assert!(!item.add_fusion_comp().is_supported());
    }

    #[test]
    fn test_clip_markers_are_separate_from_guides() {
        let item = imported("/media/a.mov", 100);
        item.add_marker(12, &MarkerDraft::new("Sky").name("beat"))
            .unwrap();
        assert_eq!(item.markers().unwrap()[&12].name, "beat");
        assert!(item.session.call_records::<Value>(Method::GetGuides, &[]).unwrap().is_empty());
        assert!(item.delete_markers_by_color("Blue").unwrap());
        assert!(item.markers().unwrap().is_empty());
    }
}
