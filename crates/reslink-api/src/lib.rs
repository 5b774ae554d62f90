//! Reslink API - Resolve-shaped scripting objects
//!
//! Scripts written against the familiar object model (`Resolve` →
//! `ProjectManager` → `Project` → `MediaPool` / `Timeline`) drive an editor
//! through any [`Transport`](reslink_transport::Transport). Each method
//! validates its input locally, issues one or more transport calls and
//! reshapes the result: 1-based track indices, colour names or numbers,
//! alias property keys.
//!
//! ```no_run
//! use reslink_api::{AppendOptions, Resolve};
//! use reslink_transport::SimulationConfig;
//!
//! let (resolve, _backend) = Resolve::simulated(SimulationConfig::default());
//! let project = resolve.project_manager().current_project().unwrap();
//! let pool = project.media_pool();
//! let clips = pool.import_media(&["/media/scene01.png"]).unwrap();
//! pool.append_to_timeline(clips, AppendOptions::default()).unwrap();
//! ```

pub mod append;
pub mod capability;
pub mod markers;
pub mod media_pool;
pub mod media_pool_item;
pub mod media_storage;
pub mod project;
pub mod project_manager;
pub mod replace;
pub mod resolve;
pub mod scenes;
pub mod session;
pub mod timeline;
pub mod timeline_item;

pub use append::{AppendEntry, AppendInput, AppendOptions, EntrySource, MediaClip, SubClip};
pub use capability::Capability;
pub use markers::{MarkerDraft, MarkerInfo, MarkerMap};
pub use media_pool::{Folder, MediaPool};
pub use media_pool_item::{canonical_property, MediaPoolItem, PROPERTY_ALIASES};
pub use media_storage::{ItemList, MediaStorage};
pub use project::Project;
pub use project_manager::ProjectManager;
pub use replace::ReplaceSource;
pub use resolve::{ExportType, Resolve};
pub use scenes::{scene_batch, SceneCue};
pub use session::Session;
pub use timeline::Timeline;
pub use timeline_item::TimelineItem;

pub use reslink_core::{ColorArg, MarkerColor, MediaKind, ReslinkError, Result, TrackType, TransitionKind};
