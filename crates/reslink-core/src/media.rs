//! Media kinds, track types and transition kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ReslinkError, Result};

/// Extensions accepted by import, grouped by the kind they produce.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "mxf", "webm"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg"];
pub const STILL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp", "exr"];

/// Kind of source media held in the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Still,
}

impl MediaKind {
    /// Classify a path by its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Self::Video)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Self::Audio)
        } else if STILL_EXTENSIONS.contains(&ext.as_str()) {
            Ok(Self::Still)
        } else {
            Err(ReslinkError::UnsupportedMediaType(path.display().to_string()))
        }
    }

    /// True if the path has an importable extension.
    pub fn is_importable(path: impl AsRef<Path>) -> bool {
        Self::from_path(path).is_ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Still => "still",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ReslinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "still" => Ok(Self::Still),
            other => Err(ReslinkError::Format(format!("unknown media kind {other:?}"))),
        }
    }
}

/// Kind of timeline track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitle,
}

impl TrackType {
    /// Whether a clip of `kind` may be placed on a track of this type.
    ///
    /// Video files carry sound, so audio tracks take them as well.
    pub fn accepts(self, kind: MediaKind) -> bool {
        match self {
            Self::Video => matches!(kind, MediaKind::Video | MediaKind::Still),
            Self::Audio => matches!(kind, MediaKind::Audio | MediaKind::Video),
            Self::Subtitle => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = ReslinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "subtitle" => Ok(Self::Subtitle),
            other => Err(ReslinkError::InvalidArgument(format!(
                "unknown track type {other:?}"
            ))),
        }
    }
}

/// Same-track transition style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    #[default]
    Dissolve,
    Wipe,
    Cut,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dissolve => "dissolve",
            Self::Wipe => "wipe",
            Self::Cut => "cut",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = ReslinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dissolve" => Ok(Self::Dissolve),
            "wipe" => Ok(Self::Wipe),
            "cut" => Ok(Self::Cut),
            other => Err(ReslinkError::InvalidArgument(format!(
                "unknown transition type {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_extensions() {
        assert_eq!(MediaKind::from_path("/a/scene01.MP4").unwrap(), MediaKind::Video);
        assert_eq!(MediaKind::from_path("song.flac").unwrap(), MediaKind::Audio);
        assert_eq!(MediaKind::from_path("scene01.png").unwrap(), MediaKind::Still);
        assert!(matches!(
            MediaKind::from_path("notes.txt"),
            Err(ReslinkError::UnsupportedMediaType(_))
        ));
        assert!(!MediaKind::is_importable("no_extension"));
    }

    #[test]
    fn test_track_accepts() {
        assert!(TrackType::Video.accepts(MediaKind::Still));
        assert!(!TrackType::Video.accepts(MediaKind::Audio));
        assert!(TrackType::Audio.accepts(MediaKind::Video));
        assert!(!TrackType::Subtitle.accepts(MediaKind::Video));
    }

    #[test]
    fn test_round_trip_names() {
        for kind in [TransitionKind::Dissolve, TransitionKind::Wipe, TransitionKind::Cut] {
            assert_eq!(kind.as_str().parse::<TransitionKind>().unwrap(), kind);
        }
        assert_eq!("subtitle".parse::<TrackType>().unwrap(), TrackType::Subtitle);
    }
}
