//! Markers on the timeline (guides) and on bin clips.
//!
//! Both marker lists speak the same four remote methods, the clip variants
//! taking the bin id as a leading argument. The helpers here are shared by
//! `Timeline` and `MediaPoolItem`.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use reslink_core::{ColorArg, MarkerColor, ReslinkError, Result};
use reslink_transport::{MarkerRecord, Method};

use crate::session::Session;

/// A marker to be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDraft {
    pub color: ColorArg,
    pub name: String,
    pub note: String,
    pub duration: i64,
    pub custom_data: String,
}

impl MarkerDraft {
    pub fn new(color: impl Into<ColorArg>) -> Self {
        Self {
            color: color.into(),
            name: String::new(),
            note: String::new(),
            duration: 1,
            custom_data: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn duration(mut self, frames: i64) -> Self {
        self.duration = frames;
        self
    }

    pub fn custom_data(mut self, data: impl Into<String>) -> Self {
        self.custom_data = data.into();
        self
    }
}

/// A marker as read back, keyed by frame in a [`MarkerMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerInfo {
    pub color: MarkerColor,
    pub name: String,
    pub note: String,
    pub duration: i64,
    pub custom_data: String,
}

pub type MarkerMap = BTreeMap<i64, MarkerInfo>;

impl MarkerInfo {
    fn from_record(record: &MarkerRecord) -> Self {
        Self {
            // Editors may report categories outside the palette.
            color: record.color().unwrap_or(MarkerColor::Purple),
            name: record.name.clone(),
            note: record.note.clone(),
            duration: record.duration,
            custom_data: record.custom_data.clone(),
        }
    }
}

/// Which marker list a call addresses.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MarkerScope<'a> {
    Guides,
    Clip(&'a str),
}

impl MarkerScope<'_> {
    fn methods(self) -> [Method; 4] {
        match self {
            Self::Guides => [
                Method::AddGuide,
                Method::GetGuides,
                Method::DeleteGuide,
                Method::DeleteGuidesByCategory,
            ],
            Self::Clip(_) => [
                Method::AddClipMarker,
                Method::GetClipMarkers,
                Method::DeleteClipMarker,
                Method::DeleteClipMarkersByCategory,
            ],
        }
    }

    fn args(self, rest: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut args = match self {
            Self::Guides => Vec::new(),
            Self::Clip(bin_id) => vec![Value::from(bin_id)],
        };
        args.extend(rest);
        args
    }

    pub(crate) fn add(self, session: &Session, frame: i64, draft: &MarkerDraft) -> Result<bool> {
        let color = draft.color.resolve()?;
        if frame < 0 {
            return Err(ReslinkError::InvalidArgument(format!(
                "marker frame must be non-negative, got {frame}"
            )));
        }
        let args = self.args([
            Value::from(frame),
            Value::from(draft.name.as_str()),
            Value::from(draft.note.as_str()),
            Value::from(color.category()),
            Value::from(draft.duration.max(1)),
            Value::from(draft.custom_data.as_str()),
        ]);
        debug!(frame, %color, scope = ?self, "adding marker");
        session.call_bool(self.methods()[0], &args)
    }

    pub(crate) fn list(self, session: &Session) -> Result<MarkerMap> {
        let records: Vec<MarkerRecord> = session.call_records(self.methods()[1], &self.args([]))?;
        Ok(records
            .iter()
            .map(|r| (r.frame, MarkerInfo::from_record(r)))
            .collect())
    }

    pub(crate) fn delete_at(self, session: &Session, frame: i64) -> Result<bool> {
        session.call_bool(self.methods()[2], &self.args([Value::from(frame)]))
    }

    /// Remove every marker of a colour. Succeeds even when none matched.
    pub(crate) fn delete_by_color(self, session: &Session, color: &ColorArg) -> Result<bool> {
        let color = color.resolve()?;
        session.call_bool(self.methods()[3], &self.args([Value::from(color.category())]))?;
        Ok(true)
    }

    pub(crate) fn find_custom_data(
        self,
        session: &Session,
        data: &str,
    ) -> Result<Option<(i64, MarkerInfo)>> {
        Ok(self
            .list(session)?
            .into_iter()
            .find(|(_, m)| m.custom_data == data))
    }

    /// Delete every marker carrying `data`. Returns whether any matched.
    pub(crate) fn delete_custom_data(self, session: &Session, data: &str) -> Result<bool> {
        let frames: Vec<i64> = self
            .list(session)?
            .into_iter()
            .filter(|(_, m)| m.custom_data == data)
            .map(|(frame, _)| frame)
            .collect();
        for frame in &frames {
            self.delete_at(session, *frame)?;
        }
        Ok(!frames.is_empty())
    }

    /// Rewrite the custom data of the marker at `frame`.
    pub(crate) fn update_custom_data(self, session: &Session, frame: i64, data: &str) -> Result<bool> {
        let Some(marker) = self.list(session)?.remove(&frame) else {
            return Ok(false);
        };
        let draft = MarkerDraft::new(marker.color)
            .name(marker.name)
            .note(marker.note)
            .duration(marker.duration)
            .custom_data(data);
        self.add(session, frame, &draft)
    }

    pub(crate) fn custom_data(self, session: &Session, frame: i64) -> Result<String> {
        Ok(self
            .list(session)?
            .remove(&frame)
            .map(|m| m.custom_data)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reslink_transport::SimulationBackend;
    use std::sync::Arc;

    fn session() -> Arc<Session> {
        Session::new(Arc::new(SimulationBackend::default()))
    }

    #[test]
    fn test_overwrite_at_same_frame() {
        let session = session();
        let guides = MarkerScope::Guides;
        guides
            .add(&session, 10, &MarkerDraft::new("Red").name("first"))
            .unwrap();
        guides
            .add(&session, 10, &MarkerDraft::new(2).name("second"))
            .unwrap();
        let markers = guides.list(&session).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[&10].name, "second");
        assert_eq!(markers[&10].color, MarkerColor::Green);
    }

    #[test]
    fn test_invalid_color_never_reaches_backend() {
        let backend = Arc::new(SimulationBackend::default());
        let session = Session::new(backend.clone());
        let before = backend.call_count();
        let err = MarkerScope::Guides
            .add(&session, 0, &MarkerDraft::new("Chartreuse"))
            .unwrap_err();
        assert!(matches!(err, ReslinkError::InvalidColor(_)));
        assert!(MarkerScope::Guides
            .add(&session, 0, &MarkerDraft::new(6))
            .is_err());
        assert_eq!(backend.call_count(), before);
    }

    #[test]
    fn test_custom_data_helpers() {
        let session = session();
        let guides = MarkerScope::Guides;
        guides
            .add(&session, 5, &MarkerDraft::new("Blue").custom_data("scene-1"))
            .unwrap();
        assert_eq!(guides.find_custom_data(&session, "scene-1").unwrap().unwrap().0, 5);
        assert!(guides.update_custom_data(&session, 5, "scene-2").unwrap());
        assert!(!guides.update_custom_data(&session, 6, "x").unwrap());
        assert_eq!(guides.custom_data(&session, 5).unwrap(), "scene-2");
        assert!(guides.delete_custom_data(&session, "scene-2").unwrap());
        assert!(!guides.delete_custom_data(&session, "scene-2").unwrap());
    }

    #[test]
    fn test_delete_by_color_is_idempotent() {
        let session = session();
        let guides = MarkerScope::Guides;
        guides.add(&session, 1, &MarkerDraft::new("Rose")).unwrap();
        let red = ColorArg::from("Red");
        assert!(guides.delete_by_color(&session, &red).unwrap());
        assert!(guides.delete_by_color(&session, &red).unwrap());
        assert!(guides.list(&session).unwrap().is_empty());
    }
}
