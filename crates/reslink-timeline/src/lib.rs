//! Reslink Timeline - In-memory project model
//!
//! Implements the state a timeline editor keeps for one project:
//! - A bin of imported media organised in folders
//! - A single timeline of typed tracks holding clips
//! - Same-track transitions (mixes) between adjacent clips
//! - Compositions blending video tracks
//! - Timeline guides and per-media markers
//! - Edit commands that keep clips from overlapping
//! - Versioned JSON project files and a recent-project list

pub mod bin;
pub mod clip;
pub mod composition;
pub mod edit;
pub mod marker;
pub mod project;
pub mod serialization;
pub mod track;

pub use bin::{Bin, BinFolder, MediaItem, TITLE_XML_PROPERTY};
pub use clip::{Clip, MixInfo, MixSide};
pub use composition::Composition;
pub use edit::{EditCommand, EditOutcome};
pub use marker::{Marker, MarkerList};
pub use project::{Project, Timeline};
pub use serialization::{ProjectFile, RecentEntry, RecentProjects, CURRENT_VERSION};
pub use track::Track;
