//! The catalogue of remote methods.
//!
//! Names are the editor's scripting entry points, as they appear on the
//! wire. Every higher-level operation reduces to these.

use std::fmt;
use std::str::FromStr;

use reslink_core::ReslinkError;

/// A named remote method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // ── Project ──
    NewProject,
    OpenProject,
    CloseProject,
    SaveProject,
    SaveProjectAs,
    GetProjectName,
    GetProjectPath,
    GetProjectFps,
    GetProjectResolutionWidth,
    GetProjectResolutionHeight,
    GetProjectProperty,
    SetProjectProperty,
    GetProjectDuration,
    GetRecentProjects,
    GetRenderSettings,

    // ── Bin ──
    ImportMedia,
    CreateFolder,
    GetSubFolders,
    GetAllClipIds,
    GetFolderClipIds,
    GetClipProperties,
    SetClipProperty,
    DeleteBinClip,
    MoveBinClip,
    CreateTitleClip,

    // ── Timeline ──
    GetTimelineName,
    SetTimelineName,
    GetTrackCount,
    GetAllTracksInfo,
    AddTrack,
    DeleteTrack,
    InsertClip,
    MoveClip,
    ResizeClip,
    DeleteTimelineClip,
    GetClipsOnTrack,
    GetTimelineClipInfo,
    CutClip,
    AddMix,
    RemoveMix,
    AddComposition,
    GetCompositions,
    DeleteComposition,

    // ── Guides and clip markers ──
    AddGuide,
    GetGuides,
    DeleteGuide,
    DeleteGuidesByCategory,
    AddClipMarker,
    GetClipMarkers,
    DeleteClipMarker,
    DeleteClipMarkersByCategory,

    // ── Playback, render, application ──
    Seek,
    GetPosition,
    GetCurrentVideoItem,
    Play,
    Pause,
    Render,
    ExitApp,
}

/// How the editor signals failure in a method's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// The return value never encodes failure.
    None,
    /// A negative integer id or duration means the call failed.
    NegativeInt,
    /// An empty string or `"-1"` id means the call failed.
    EmptyOrMinusOne,
}

impl Method {
    pub const ALL: &'static [Method] = &[
        Self::NewProject,
        Self::OpenProject,
        Self::CloseProject,
        Self::SaveProject,
        Self::SaveProjectAs,
        Self::GetProjectName,
        Self::GetProjectPath,
        Self::GetProjectFps,
        Self::GetProjectResolutionWidth,
        Self::GetProjectResolutionHeight,
        Self::GetProjectProperty,
        Self::SetProjectProperty,
        Self::GetProjectDuration,
        Self::GetRecentProjects,
        Self::GetRenderSettings,
        Self::ImportMedia,
        Self::CreateFolder,
        Self::GetSubFolders,
        Self::GetAllClipIds,
        Self::GetFolderClipIds,
        Self::GetClipProperties,
        Self::SetClipProperty,
        Self::DeleteBinClip,
        Self::MoveBinClip,
        Self::CreateTitleClip,
        Self::GetTimelineName,
        Self::SetTimelineName,
        Self::GetTrackCount,
        Self::GetAllTracksInfo,
        Self::AddTrack,
        Self::DeleteTrack,
        Self::InsertClip,
        Self::MoveClip,
        Self::ResizeClip,
        Self::DeleteTimelineClip,
        Self::GetClipsOnTrack,
        Self::GetTimelineClipInfo,
        Self::CutClip,
        Self::AddMix,
        Self::RemoveMix,
        Self::AddComposition,
        Self::GetCompositions,
        Self::DeleteComposition,
        Self::AddGuide,
        Self::GetGuides,
        Self::DeleteGuide,
        Self::DeleteGuidesByCategory,
        Self::AddClipMarker,
        Self::GetClipMarkers,
        Self::DeleteClipMarker,
        Self::DeleteClipMarkersByCategory,
        Self::Seek,
        Self::GetPosition,
        Self::GetCurrentVideoItem,
        Self::Play,
        Self::Pause,
        Self::Render,
        Self::ExitApp,
    ];

    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewProject => "scriptNewProject",
            Self::OpenProject => "scriptOpenProject",
            Self::CloseProject => "scriptCloseProject",
            Self::SaveProject => "scriptSaveProject",
            Self::SaveProjectAs => "scriptSaveProjectAs",
            Self::GetProjectName => "scriptGetProjectName",
            Self::GetProjectPath => "scriptGetProjectPath",
            Self::GetProjectFps => "scriptGetProjectFps",
            Self::GetProjectResolutionWidth => "scriptGetProjectResolutionWidth",
            Self::GetProjectResolutionHeight => "scriptGetProjectResolutionHeight",
            Self::GetProjectProperty => "scriptGetProjectProperty",
            Self::SetProjectProperty => "scriptSetProjectProperty",
            Self::GetProjectDuration => "scriptGetProjectDuration",
            Self::GetRecentProjects => "scriptGetRecentProjects",
            Self::GetRenderSettings => "scriptGetRenderSettings",
            Self::ImportMedia => "scriptImportMedia",
            Self::CreateFolder => "scriptCreateFolder",
            Self::GetSubFolders => "scriptGetSubFolders",
            Self::GetAllClipIds => "scriptGetAllClipIds",
            Self::GetFolderClipIds => "scriptGetFolderClipIds",
            Self::GetClipProperties => "scriptGetClipProperties",
            Self::SetClipProperty => "scriptSetClipProperty",
            Self::DeleteBinClip => "scriptDeleteBinClip",
            Self::MoveBinClip => "scriptMoveBinClip",
            Self::CreateTitleClip => "scriptCreateTitleClip",
            Self::GetTimelineName => "scriptGetTimelineName",
            Self::SetTimelineName => "scriptSetTimelineName",
            Self::GetTrackCount => "scriptGetTrackCount",
            Self::GetAllTracksInfo => "scriptGetAllTracksInfo",
            Self::AddTrack => "scriptAddTrack",
            Self::DeleteTrack => "scriptDeleteTrack",
            Self::InsertClip => "scriptInsertClip",
            Self::MoveClip => "scriptMoveClip",
            Self::ResizeClip => "scriptResizeClip",
            Self::DeleteTimelineClip => "scriptDeleteTimelineClip",
            Self::GetClipsOnTrack => "scriptGetClipsOnTrack",
            Self::GetTimelineClipInfo => "scriptGetTimelineClipInfo",
            Self::CutClip => "scriptCutClip",
            Self::AddMix => "scriptAddMix",
            Self::RemoveMix => "scriptRemoveMix",
            Self::AddComposition => "scriptAddComposition",
            Self::GetCompositions => "scriptGetCompositions",
            Self::DeleteComposition => "scriptDeleteComposition",
            Self::AddGuide => "scriptAddGuide",
            Self::GetGuides => "scriptGetGuides",
            Self::DeleteGuide => "scriptDeleteGuide",
            Self::DeleteGuidesByCategory => "scriptDeleteGuidesByCategory",
            Self::AddClipMarker => "scriptAddClipMarker",
            Self::GetClipMarkers => "scriptGetClipMarkers",
            Self::DeleteClipMarker => "scriptDeleteClipMarker",
            Self::DeleteClipMarkersByCategory => "scriptDeleteClipMarkersByCategory",
            Self::Seek => "scriptSeek",
            Self::GetPosition => "scriptGetPosition",
            Self::GetCurrentVideoItem => "scriptGetCurrentVideoItem",
            Self::Play => "scriptPlay",
            Self::Pause => "scriptPause",
            Self::Render => "scriptRender",
            Self::ExitApp => "exitApp",
        }
    }

    /// Failure convention of the method's return value.
    pub fn sentinel(self) -> Sentinel {
        match self {
            Self::InsertClip
            | Self::CutClip
            | Self::AddTrack
            | Self::ResizeClip
            | Self::AddComposition => Sentinel::NegativeInt,
            Self::ImportMedia | Self::CreateFolder | Self::CreateTitleClip => {
                Sentinel::EmptyOrMinusOne
            }
            _ => Sentinel::None,
        }
    }

    /// True for methods that change editor state.
    pub fn is_mutation(self) -> bool {
        !matches!(
            self,
            Self::GetProjectName
                | Self::GetProjectPath
                | Self::GetProjectFps
                | Self::GetProjectResolutionWidth
                | Self::GetProjectResolutionHeight
                | Self::GetProjectProperty
                | Self::GetProjectDuration
                | Self::GetRecentProjects
                | Self::GetRenderSettings
                | Self::GetSubFolders
                | Self::GetAllClipIds
                | Self::GetFolderClipIds
                | Self::GetClipProperties
                | Self::GetTimelineName
                | Self::GetTrackCount
                | Self::GetAllTracksInfo
                | Self::GetClipsOnTrack
                | Self::GetTimelineClipInfo
                | Self::GetCompositions
                | Self::GetGuides
                | Self::GetClipMarkers
                | Self::GetPosition
                | Self::GetCurrentVideoItem
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ReslinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ReslinkError::InvalidArgument(format!("unknown remote method {s:?}")))
    }
}
