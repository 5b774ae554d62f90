//! Creating, loading, saving and closing projects.

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use reslink_core::Result;
use reslink_transport::Method;

use crate::capability::Capability;
use crate::project::Project;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ProjectManager {
    session: Arc<Session>,
}

impl ProjectManager {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Replace the open project with a new empty one.
    pub fn create_project(&self, name: &str) -> Result<Project> {
        self.session.call(Method::NewProject, &[Value::from(name)])?;
        self.session.begin_project();
        info!(project = name, "project created");
        Ok(Project::new(self.session.clone()))
    }

    /// Open a saved project file.
    pub fn load_project(&self, path: impl AsRef<Path>) -> Result<Project> {
        let path = path.as_ref().display().to_string();
        self.session
            .call_bool(Method::OpenProject, &[Value::from(path.as_str())])?;
        self.session.begin_project();
        info!(path = %path, "project loaded");
        Ok(Project::new(self.session.clone()))
    }

    /// Save the open project to its file.
    pub fn save_project(&self) -> Result<bool> {
        self.session.call_bool(Method::SaveProject, &[])
    }

    pub fn current_project(&self) -> Option<Project> {
        self.session
            .project_open()
            .then(|| Project::new(self.session.clone()))
    }

    pub fn close_project(&self, _project: &Project) -> Result<bool> {
        self.session.call(Method::CloseProject, &[])?;
        self.session.end_project();
        info!("project closed");
        Ok(true)
    }

    /// Recently used project names, newest first. Falls back to the open
    /// project's name when nothing was saved or loaded yet.
    pub fn project_list_in_current_folder(&self) -> Result<Vec<String>> {
        let recent = self.session.call_strings(Method::GetRecentProjects, &[])?;
        if !recent.is_empty() || !self.session.project_open() {
            return Ok(recent);
        }
        let name = self.session.call_string(Method::GetProjectName, &[])?;
        Ok(if name.is_empty() { Vec::new() } else { vec![name] })
    }

    // ── Project database folders ────────────────────────────────

    pub fn folder_list_in_current_folder(&self) -> Capability<Vec<String>> {
        Capability::NotSupported("GetFolderListInCurrentFolder")
    }

    pub fn open_folder(&self, _name: &str) -> Capability<bool> {
        Capability::NotSupported("OpenFolder")
    }

    pub fn goto_parent_folder(&self) -> Capability<bool> {
        Capability::NotSupported("GotoParentFolder")
    }

    pub fn goto_root_folder(&self) -> Capability<bool> {
        Capability::NotSupported("GotoRootFolder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolve;
    use reslink_core::ReslinkError;
    use reslink_transport::SimulationConfig;

    #[test]
    fn test_create_resets_folder_and_contents() {
        let (resolve, _) = Resolve::simulated(SimulationConfig::default());
        let manager = resolve.project_manager();
        let pool = manager.current_project().unwrap().media_pool();
        let folder = pool.add_sub_folder(None, "Old").unwrap();
        pool.set_current_folder(&folder).unwrap();

        let project = manager.create_project("Fresh").unwrap();
        assert_eq!(project.name().unwrap(), "Fresh");
        assert_eq!(project.media_pool().current_folder().name(), "Master");
        assert_eq!(manager.project_list_in_current_folder().unwrap(), vec!["Fresh"]);
    }

    #[test]
    fn test_close_then_calls_fail() {
        let (resolve, _) = Resolve::simulated(SimulationConfig::default());
        let manager = resolve.project_manager();
        let project = manager.current_project().unwrap();
        assert!(manager.close_project(&project).unwrap());
        assert!(manager.current_project().is_none());
        assert!(matches!(project.name(), Err(ReslinkError::Transport(_))));
        assert!(manager.project_list_in_current_folder().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.json");
        let (resolve, _) = Resolve::simulated(SimulationConfig::default());
        let manager = resolve.project_manager();
        let project = manager.create_project("Cut").unwrap();
        assert!(manager.save_project().is_err());
        assert!(project.save_as(&path).unwrap());
        assert!(manager.save_project().unwrap());

        manager.create_project("Other").unwrap();
        let loaded = manager.load_project(&path).unwrap();
        assert_eq!(loaded.name().unwrap(), "Cut");
        assert_eq!(manager.project_list_in_current_folder().unwrap(), vec!["Cut"]);
        assert!(!manager.open_folder("x").is_supported());
    }
}
