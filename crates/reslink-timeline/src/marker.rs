//! Frame-keyed marker lists.
//!
//! Used both for timeline guides and for markers attached to bin items.
//! A list holds at most one marker per frame; adding at an occupied frame
//! replaces the marker that was there.

use reslink_core::MarkerColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Frame the marker sits on
    pub frame: i64,
    /// Canonical colour category
    pub color: MarkerColor,
    pub name: String,
    pub note: String,
    /// Length in frames (1 for a point marker)
    pub duration: i64,
    /// Opaque caller data, usable as a secondary key
    #[serde(default)]
    pub custom_data: String,
}

impl Marker {
    /// Create a one-frame marker with empty text fields.
    pub fn new(frame: i64, color: MarkerColor) -> Self {
        Self {
            frame,
            color,
            name: String::new(),
            note: String::new(),
            duration: 1,
            custom_data: String::new(),
        }
    }
}

/// Markers ordered by frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerList {
    markers: BTreeMap<i64, Marker>,
}

impl MarkerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a marker, returning the one it replaced.
    pub fn add(&mut self, marker: Marker) -> Option<Marker> {
        self.markers.insert(marker.frame, marker)
    }

    pub fn get(&self, frame: i64) -> Option<&Marker> {
        self.markers.get(&frame)
    }

    pub fn get_mut(&mut self, frame: i64) -> Option<&mut Marker> {
        self.markers.get_mut(&frame)
    }

    /// Remove the marker at `frame`.
    pub fn remove(&mut self, frame: i64) -> Option<Marker> {
        self.markers.remove(&frame)
    }

    /// Remove every marker of `color`. Returns how many were removed.
    pub fn remove_by_color(&mut self, color: MarkerColor) -> usize {
        let before = self.markers.len();
        self.markers.retain(|_, m| m.color != color);
        before - self.markers.len()
    }

    /// First marker (by frame) whose custom data equals `data`.
    pub fn find_custom_data(&self, data: &str) -> Option<&Marker> {
        self.markers.values().find(|m| m.custom_data == data)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
