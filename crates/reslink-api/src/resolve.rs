//! Entry point of the scripting API.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use reslink_core::Result;
use reslink_transport::{
    Method, RemoteBackend, RemoteConfig, SimulationBackend, SimulationConfig, Transport, Wire,
};

use crate::capability::Capability;
use crate::media_storage::MediaStorage;
use crate::project_manager::ProjectManager;
use crate::session::Session;

pub const PRODUCT_NAME: &str = "Kdenlive";
pub const VERSION: [u32; 4] = [25, 0, 0, 0];

/// Timeline export formats, numbered as scripts expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExportType {
    Aaf = 0,
    Drt = 1,
    Edl = 2,
    Fcp7Xml = 3,
    FcpXml1_3 = 4,
    FcpXml1_4 = 5,
    FcpXml1_5 = 6,
    FcpXml1_6 = 7,
    FcpXml1_7 = 8,
    FcpXml1_8 = 9,
    FcpXml1_9 = 10,
    FcpXml1_10 = 11,
    Hdl = 12,
    TextCsv = 13,
    TextTab = 14,
    DolbyVision2_9 = 15,
    DolbyVision4_0 = 16,
    Otio = 17,
}

impl ExportType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

// AAF export sub-types
pub const EXPORT_AAF_NEW: i32 = 0;
pub const EXPORT_AAF_EXISTING: i32 = 1;

// EDL export sub-types
pub const EXPORT_CDL: i32 = 0;
pub const EXPORT_SDL: i32 = 1;
pub const EXPORT_MISSING_CLIPS: i32 = 2;

/// A connection to one editor instance.
#[derive(Debug, Clone)]
pub struct Resolve {
    session: Arc<Session>,
}

impl Resolve {
    /// Attach to an editor through any transport.
    pub fn connect(transport: Arc<dyn Transport>) -> Self {
        info!(backend = transport.backend_name(), "connected to editor");
        Self {
            session: Session::new(transport),
        }
    }

    /// Attach to a live editor over a message-bus wire.
    pub fn connect_remote<W: Wire>(config: RemoteConfig, wire: W) -> Result<Self> {
        let backend = RemoteBackend::connect(config, wire)?;
        Ok(Self::connect(Arc::new(backend)))
    }

    /// Attach to a fresh in-process simulated editor. The backend handle is
    /// returned for registering media and inspecting state.
    pub fn simulated(config: SimulationConfig) -> (Self, Arc<SimulationBackend>) {
        let backend = Arc::new(SimulationBackend::new(config));
        (Self::connect(backend.clone()), backend)
    }

    pub fn project_manager(&self) -> ProjectManager {
        ProjectManager::new(self.session.clone())
    }

    pub fn media_storage(&self) -> MediaStorage {
        MediaStorage::new(self.session.clone())
    }

    pub fn backend_name(&self) -> &'static str {
        self.session.backend_name()
    }

    pub fn product_name(&self) -> &'static str {
        PRODUCT_NAME
    }

    pub fn version(&self) -> [u32; 4] {
        VERSION
    }

    pub fn version_string(&self) -> String {
        let [major, minor, patch, _] = VERSION;
        format!("{major}.{minor}.{patch}")
    }

    /// The editor has a single page.
    pub fn current_page(&self) -> &'static str {
        "edit"
    }

    pub fn open_page(&self, _page: &str) -> Capability<bool> {
        Capability::NotSupported("OpenPage")
    }

    pub fn fusion(&self) -> Capability<()> {
        Capability::NotSupported("Fusion")
    }

    pub fn current_layout_preset(&self) -> Capability<String> {
        Capability::NotSupported("GetCurrentLayoutPreset")
    }

    pub fn load_layout_preset(&self, _name: &str) -> Capability<bool> {
        Capability::NotSupported("LoadLayoutPreset")
    }

    pub fn save_layout_preset(&self, _name: &str) -> Capability<bool> {
        Capability::NotSupported("SaveLayoutPreset")
    }

    pub fn delete_layout_preset(&self, _name: &str) -> Capability<bool> {
        Capability::NotSupported("DeleteLayoutPreset")
    }

    /// Ask the editor to exit.
    pub fn quit(&self) -> Result<()> {
        self.session.call(Method::ExitApp, &[])?;
        self.session.end_project();
        Ok(())
    }
}
