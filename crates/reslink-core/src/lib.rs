//! Reslink Core - Foundation types for remote timeline control
//!
//! This crate provides the pure building blocks shared by every layer:
//! - Frame rate, timecode and frame-range arithmetic
//! - The error taxonomy surfaced to callers
//! - Marker colour categories and their alias table
//! - Media kinds, track types and transition kinds
//! - Placement rules for resizing and overlap detection

pub mod color;
pub mod error;
pub mod media;
pub mod span;
pub mod time;

pub use color::{ColorArg, MarkerColor, COLOR_ALIASES};
pub use error::{ReslinkError, Result, TransportError};
pub use media::{MediaKind, TrackType, TransitionKind};
pub use span::{find_overlap, plan_resize, ClipSpan, EdgeContext};
pub use time::{
    frames_to_seconds, frames_to_timecode, seconds_to_frames, timecode_to_frames, FrameRange,
    FrameRate,
};

/// Defaults applied when a caller or project does not say otherwise.
pub mod defaults {
    use crate::time::FrameRate;

    /// Duration given to a still image placed without an explicit length (5 s at 25 fps).
    pub const STILL_DURATION_FRAMES: i64 = 125;

    /// Transition length used when none is supplied (~0.52 s at 25 fps).
    pub const TRANSITION_FRAMES: i64 = 13;

    /// Frame rate of a freshly created project.
    pub const FRAME_RATE: FrameRate = FrameRate::FPS_25;

    /// Resolution of a freshly created project.
    pub const WIDTH: u32 = 1536;
    pub const HEIGHT: u32 = 864;

    /// Identifier of the bin's root folder.
    pub const ROOT_FOLDER_ID: &str = "-1";
}
