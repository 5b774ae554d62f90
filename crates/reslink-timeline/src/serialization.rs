//! Versioned project files and the recent-project list.
//!
//! A project file is the serialised `Project` wrapped with a schema
//! version. Files written before versioning hold the bare project and are
//! upgraded on load.

use reslink_core::{ReslinkError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::project::Project;

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version of the payload.
    pub version: u32,
    pub project: Project,
    /// Crate version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(project: Project) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            ReslinkError::Serialization(format!("cannot encode project {:?}: {e}", self.project.name))
        })
    }

    /// Parse JSON, upgrading older schemas first.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: Value = serde_json::from_slice(data)
            .map_err(|e| ReslinkError::Serialization(format!("project file is not JSON: {e}")))?;

        let version = raw
            .get("version")
            .and_then(Value::as_u64)
            .map_or(0, |v| v as u32);
        if version > CURRENT_VERSION {
            return Err(ReslinkError::Serialization(format!(
                "project file version {version} is newer than {CURRENT_VERSION}"
            )));
        }

        serde_json::from_value(migrate(raw, version)?)
            .map_err(|e| ReslinkError::Serialization(format!("malformed project file: {e}")))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read(path)?)
    }
}

/// Upgrade `data` one schema step at a time.
fn migrate(mut data: Value, from_version: u32) -> Result<Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            // v0 files are the bare project object
            0 => {
                data = serde_json::json!({
                    "version": 1,
                    "project": data,
                    "app_version": "0.0.0",
                });
                version = 1;
            }
            _ => {
                return Err(ReslinkError::Serialization(format!(
                    "cannot upgrade project files from version {version}"
                )));
            }
        }
    }

    Ok(data)
}

/// Projects opened or saved recently, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentProjects {
    pub entries: Vec<RecentEntry>,
    /// Older entries beyond this are dropped.
    pub max_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub path: String,
    pub name: String,
    /// Sequence number of the last open or save; larger is more recent.
    pub last_opened: u64,
}

impl RecentProjects {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 10,
        }
    }

    /// Move `path` to the front, replacing any older entry for it.
    pub fn record(&mut self, path: String, name: String, stamp: u64) {
        self.entries.retain(|e| e.path != path);
        self.entries.insert(
            0,
            RecentEntry {
                path,
                name,
                last_opened: stamp,
            },
        );
        self.entries.truncate(self.max_entries);
    }

    pub fn remove(&mut self, path: &str) {
        self.entries.retain(|e| e.path != path);
    }

    /// Project names, most recent first.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}
