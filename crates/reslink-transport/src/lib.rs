//! Reslink Transport - the call boundary between the domain objects and an editor.
//!
//! Every operation reduces to one named [`Method`] invoked with positional
//! [`Value`] arguments through the [`Transport`] trait. Two backends satisfy
//! it: [`SimulationBackend`] keeps a whole project in memory for tests and
//! offline runs, and [`RemoteBackend`] forwards to a live editor.

pub mod method;
pub mod records;
pub mod remote;
pub mod simulation;
pub mod transport;
pub mod value;

pub use method::{Method, Sentinel};
pub use records::{
    BinClipRecord, ClipRecord, CompositionRecord, FolderRecord, MarkerRecord, MixRecord,
    TrackRecord,
};
pub use remote::{check_sentinel, RemoteBackend, RemoteConfig, Wire, WireError};
pub use simulation::{SimulationBackend, SimulationConfig};
pub use transport::Transport;
pub use value::Args;

pub use reslink_timeline::MixSide;

pub use serde_json::Value;
