//! Per-method handlers of the simulated editor.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use reslink_core::{
    FrameRate, MarkerColor, MediaKind, ReslinkError, TrackType, TransitionKind, TransportError,
};
use reslink_timeline::{EditCommand, EditOutcome, Marker, MarkerList, Project, ProjectFile};

use super::{fresh_project, SimState, SimulationConfig};
use crate::method::Method;
use crate::records::{
    BinClipRecord, ClipRecord, CompositionRecord, FolderRecord, MarkerRecord, TrackRecord,
};
use crate::value::Args;

type Reply = Result<Value, TransportError>;

/// Project settings written by the render settings call carry this prefix.
const RENDER_PREFIX: &str = "render_";

fn fault(method: Method, err: ReslinkError) -> TransportError {
    match err {
        ReslinkError::Transport(inner) => inner,
        other => TransportError::fault(method.as_str(), format!("{}: {other}", other.kind())),
    }
}

fn encode<T: Serialize>(method: Method, value: &T) -> Reply {
    serde_json::to_value(value)
        .map_err(|e| TransportError::fault(method.as_str(), format!("cannot encode result: {e}")))
}

fn open_project(method: Method, state: &mut SimState) -> Result<&mut Project, TransportError> {
    state
        .project
        .as_mut()
        .ok_or_else(|| TransportError::fault(method.as_str(), "no project is open"))
}

fn edit(method: Method, state: &mut SimState, command: EditCommand) -> Result<EditOutcome, TransportError> {
    let project = open_project(method, state)?;
    command.apply(project).map_err(|e| fault(method, e))
}

fn category(method: Method, value: i64) -> Result<MarkerColor, TransportError> {
    MarkerColor::from_category(value).map_err(|e| fault(method, e))
}

/// Read a marker from `args` starting at `first`: frame, name, note, category, duration, data.
fn marker_arg(method: Method, args: &Args<'_>, first: usize) -> Result<Marker, TransportError> {
    let frame = args.int(first)?;
    if frame < 0 {
        return Err(fault(
            method,
            ReslinkError::InvalidArgument(format!("marker frame {frame} is negative")),
        ));
    }
    let duration = args.int(first + 4)?.max(1);
    Ok(Marker {
        frame,
        color: category(method, args.int(first + 3)?)?,
        name: args.str(first + 1)?.to_string(),
        note: args.str(first + 2)?.to_string(),
        duration,
        custom_data: args.str(first + 5).unwrap_or_default().to_string(),
    })
}

fn marker_list(method: Method, list: &MarkerList) -> Reply {
    let records: Vec<MarkerRecord> = list.iter().map(MarkerRecord::from).collect();
    encode(method, &records)
}

pub(super) fn dispatch(
    config: &SimulationConfig,
    state: &mut SimState,
    method: Method,
    args: Args<'_>,
) -> Reply {
    match method {
        // ── Project ──
        Method::NewProject => {
            let name = args.str(0)?;
            state.project = Some(fresh_project(config, name));
            state.project_path = None;
            info!(project = %name, "simulated project created");
            Ok(json!(name))
        }
        Method::OpenProject => {
            let path = PathBuf::from(args.str(0)?);
            let file = ProjectFile::load_from_file(&path).map_err(|e| fault(method, e))?;
            let stamp = state.tick();
            state
                .recent
                .record(path.display().to_string(), file.project.name.clone(), stamp);
            info!(path = %path.display(), project = %file.project.name, "simulated project opened");
            state.project = Some(file.project);
            state.project_path = Some(path);
            Ok(json!(true))
        }
        Method::CloseProject => {
            state.project = None;
            state.project_path = None;
            state.playing = false;
            Ok(json!(true))
        }
        Method::SaveProject => {
            let path = state.project_path.clone().ok_or_else(|| {
                TransportError::fault(method.as_str(), "project has no file yet, use save-as")
            })?;
            save(method, state, &path)?;
            Ok(json!(true))
        }
        Method::SaveProjectAs => {
            let path = PathBuf::from(args.str(0)?);
            save(method, state, &path)?;
            state.project_path = Some(path);
            Ok(json!(true))
        }
        Method::GetProjectName => Ok(json!(open_project(method, state)?.name)),
        Method::GetProjectPath => Ok(json!(state
            .project_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default())),
        Method::GetProjectFps => Ok(json!(open_project(method, state)?.frame_rate.to_fps_f64())),
        Method::GetProjectResolutionWidth => Ok(json!(open_project(method, state)?.width)),
        Method::GetProjectResolutionHeight => Ok(json!(open_project(method, state)?.height)),
        Method::GetProjectProperty => {
            let key = args.str(0)?;
            let project = open_project(method, state)?;
            let value = match key {
                "name" => project.name.clone(),
                "fps" => project.frame_rate.to_fps_f64().to_string(),
                "width" => project.width.to_string(),
                "height" => project.height.to_string(),
                other => project.settings.get(other).cloned().unwrap_or_default(),
            };
            Ok(json!(value))
        }
        Method::SetProjectProperty => {
            let (key, value) = (args.str(0)?, args.str(1)?);
            let project = open_project(method, state)?;
            let invalid = |what: &str| {
                fault(
                    method,
                    ReslinkError::InvalidArgument(format!("{value:?} is not a valid {what}")),
                )
            };
            match key {
                "name" => project.name = value.to_string(),
                "fps" => {
                    let fps: f64 = value.trim().parse().map_err(|_| invalid("frame rate"))?;
                    project.frame_rate = FrameRate::from_fps(fps).map_err(|e| fault(method, e))?;
                }
                "width" => project.width = value.trim().parse().map_err(|_| invalid("width"))?,
                "height" => project.height = value.trim().parse().map_err(|_| invalid("height"))?,
                other => {
                    project.settings.insert(other.to_string(), value.to_string());
                }
            }
            Ok(json!(true))
        }
        Method::GetProjectDuration => Ok(json!(open_project(method, state)?.timeline.duration())),
        Method::GetRecentProjects => Ok(json!(state.recent.names())),
        Method::GetRenderSettings => {
            let project = open_project(method, state)?;
            let settings: BTreeMap<&str, &str> = project
                .settings
                .iter()
                .filter_map(|(k, v)| Some((k.strip_prefix(RENDER_PREFIX)?, v.as_str())))
                .collect();
            Ok(json!(settings))
        }

        // ── Bin ──
        Method::ImportMedia => {
            let (path, folder) = (args.str(0)?, args.str(1)?);
            let kind = MediaKind::from_path(path).map_err(|e| fault(method, e))?;
            let duration = match (state.media.get(path), kind) {
                (Some(frames), _) => *frames,
                (None, MediaKind::Still) => config.still_duration,
                (None, _) => config.fallback_media_duration,
            };
            let project = open_project(method, state)?;
            let id = project
                .bin
                .import(path, kind, duration, folder)
                .map_err(|e| fault(method, e))?;
            info!(path = %path, bin_id = %id, %kind, duration, "simulated import");
            Ok(json!(id))
        }
        Method::CreateTitleClip => {
            let (xml, duration) = (args.str(0)?, args.int(1)?);
            let (name, folder) = (args.str(2)?, args.str(3)?);
            let project = open_project(method, state)?;
            let id = project
                .bin
                .create_title(name, xml, duration, folder)
                .map_err(|e| fault(method, e))?;
            info!(name = %name, bin_id = %id, duration, "simulated title created");
            Ok(json!(id))
        }
        Method::CreateFolder => {
            let (name, parent) = (args.str(0)?, args.str(1)?);
            let project = open_project(method, state)?;
            let id = project
                .bin
                .create_folder(name, parent)
                .map_err(|e| fault(method, e))?;
            Ok(json!(id))
        }
        Method::GetSubFolders => {
            let folder = args.str(0)?;
            let project = open_project(method, state)?;
            if project.bin.folder(folder).is_none() {
                return Err(fault(method, ReslinkError::NotFound(format!("folder {folder}"))));
            }
            let records: Vec<FolderRecord> = project
                .bin
                .sub_folders(folder)
                .into_iter()
                .map(|f| FolderRecord {
                    id: f.id.clone(),
                    name: f.name.clone(),
                })
                .collect();
            encode(method, &records)
        }
        Method::GetAllClipIds => {
            let project = open_project(method, state)?;
            let ids: Vec<&str> = project.bin.items().iter().map(|i| i.id.as_str()).collect();
            Ok(json!(ids))
        }
        Method::GetFolderClipIds => {
            let folder = args.str(0)?;
            let project = open_project(method, state)?;
            if project.bin.folder(folder).is_none() {
                return Err(fault(method, ReslinkError::NotFound(format!("folder {folder}"))));
            }
            Ok(json!(project.bin.folder_item_ids(folder)))
        }
        Method::GetClipProperties => {
            let id = args.str(0)?;
            let project = open_project(method, state)?;
            let item = project.bin.require(id).map_err(|e| fault(method, e))?;
            encode(method, &BinClipRecord::from(item))
        }
        Method::SetClipProperty => {
            let (id, key, value) = (args.str(0)?, args.str(1)?, args.str(2)?);
            let project = open_project(method, state)?;
            let item = project.bin.require_mut(id).map_err(|e| fault(method, e))?;
            match key {
                "name" => item.name = value.to_string(),
                "duration" => {
                    let frames: i64 = value.trim().parse().unwrap_or(0);
                    if item.kind != MediaKind::Still || frames < 1 {
                        return Err(fault(
                            method,
                            ReslinkError::InvalidArgument(format!(
                                "cannot set duration {value:?} on {} clip {id}",
                                item.kind
                            )),
                        ));
                    }
                    item.duration = frames;
                }
                "id" | "path" | "type" | "folder" => {
                    return Err(fault(
                        method,
                        ReslinkError::InvalidArgument(format!("property {key:?} is read-only")),
                    ));
                }
                other => {
                    item.properties.insert(other.to_string(), value.to_string());
                }
            }
            Ok(json!(true))
        }
        Method::DeleteBinClip => {
            let id = args.str(0)?;
            let project = open_project(method, state)?;
            project.delete_media(id).map_err(|e| fault(method, e))?;
            Ok(json!(true))
        }
        Method::MoveBinClip => {
            let (id, folder) = (args.str(0)?, args.str(1)?);
            let project = open_project(method, state)?;
            project.bin.move_item(id, folder).map_err(|e| fault(method, e))?;
            Ok(json!(true))
        }

        // ── Timeline ──
        Method::GetTimelineName => Ok(json!(open_project(method, state)?.timeline.name)),
        Method::SetTimelineName => {
            let name = args.str(0)?;
            open_project(method, state)?.timeline.name = name.to_string();
            Ok(json!(true))
        }
        Method::GetTrackCount => {
            let kind: TrackType = args.str(0)?.parse().map_err(|e| fault(method, e))?;
            Ok(json!(open_project(method, state)?.timeline.tracks_of(kind).count()))
        }
        Method::GetAllTracksInfo => {
            let project = open_project(method, state)?;
            let records: Vec<TrackRecord> = project
                .timeline
                .tracks
                .iter()
                .enumerate()
                .map(|(index, track)| TrackRecord::from_track(track, index))
                .collect();
            encode(method, &records)
        }
        Method::AddTrack => {
            let name = args.str(0)?.to_string();
            let kind: TrackType = args.str(1)?.parse().map_err(|e| fault(method, e))?;
            match edit(method, state, EditCommand::AddTrack { name, kind })? {
                EditOutcome::Track(id) => Ok(json!(id)),
                _ => Ok(json!(-1)),
            }
        }
        Method::DeleteTrack => {
            let track_id = args.int(0)?;
            edit(method, state, EditCommand::DeleteTrack { track_id })?;
            Ok(json!(true))
        }
        Method::InsertClip => {
            let command = EditCommand::InsertClip {
                bin_id: args.str(0)?.to_string(),
                track_id: args.int(1)?,
                position: args.int(2)?,
                source_in: args.opt_int(3)?,
                duration: args.opt_int(4)?,
            };
            match edit(method, state, command)? {
                EditOutcome::Clip(id) => Ok(json!(id)),
                _ => Ok(json!(-1)),
            }
        }
        Method::MoveClip => {
            let command = EditCommand::MoveClip {
                clip_id: args.int(0)?,
                track_id: args.int(1)?,
                position: args.int(2)?,
            };
            edit(method, state, command)?;
            Ok(json!(true))
        }
        Method::ResizeClip => {
            let command = EditCommand::ResizeClip {
                clip_id: args.int(0)?,
                duration: args.int(1)?,
                from_right: args.bool(2)?,
            };
            match edit(method, state, command)? {
                EditOutcome::Duration(applied) => Ok(json!(applied)),
                _ => Ok(json!(-1)),
            }
        }
        Method::DeleteTimelineClip => {
            let clip_id = args.int(0)?;
            edit(method, state, EditCommand::DeleteClip { clip_id })?;
            Ok(json!(true))
        }
        Method::GetClipsOnTrack => {
            let track_id = args.int(0)?;
            let project = open_project(method, state)?;
            let track = project
                .timeline
                .require_track(track_id)
                .map_err(|e| fault(method, e))?;
            let records: Vec<ClipRecord> = track
                .clips()
                .iter()
                .map(|c| ClipRecord::from_clip(c, track_id))
                .collect();
            encode(method, &records)
        }
        Method::GetTimelineClipInfo => {
            let clip_id = args.int(0)?;
            let project = open_project(method, state)?;
            match project.timeline.find_clip(clip_id) {
                Some((track, clip)) => encode(method, &ClipRecord::from_clip(clip, track.id)),
                None => Ok(json!({})),
            }
        }
        Method::CutClip => {
            let command = EditCommand::CutClip {
                clip_id: args.int(0)?,
                position: args.int(1)?,
            };
            match edit(method, state, command)? {
                EditOutcome::Clip(id) => Ok(json!(id)),
                _ => Ok(json!(-1)),
            }
        }
        Method::AddMix => {
            let kind = if args.len() > 3 {
                args.str(3)?.parse().map_err(|e| fault(method, e))?
            } else {
                TransitionKind::default()
            };
            let command = EditCommand::AddMix {
                left: args.int(0)?,
                right: args.int(1)?,
                duration: args.int(2)?,
                kind,
            };
            edit(method, state, command)?;
            Ok(json!(true))
        }
        Method::RemoveMix => {
            let clip_id = args.int(0)?;
            edit(method, state, EditCommand::RemoveMix { clip_id })?;
            Ok(json!(true))
        }

        Method::AddComposition => {
            let (kind, track_id) = (args.str(0)?, args.int(1)?);
            let (position, duration) = (args.int(2)?, args.int(3)?);
            let id = open_project(method, state)?
                .timeline
                .add_composition(kind, track_id, position, duration)
                .map_err(|e| fault(method, e))?;
            Ok(json!(id))
        }
        Method::GetCompositions => {
            let project = open_project(method, state)?;
            let records: Vec<CompositionRecord> = project
                .timeline
                .compositions
                .iter()
                .map(CompositionRecord::from)
                .collect();
            encode(method, &records)
        }
        Method::DeleteComposition => {
            let id = args.int(0)?;
            let removed = open_project(method, state)?.timeline.remove_composition(id);
            Ok(json!(removed.is_some()))
        }

        // ── Guides ──
        Method::AddGuide => {
            let marker = marker_arg(method, &args, 0)?;
            open_project(method, state)?.timeline.guides.add(marker);
            Ok(json!(true))
        }
        Method::GetGuides => marker_list(method, &open_project(method, state)?.timeline.guides),
        Method::DeleteGuide => {
            let frame = args.int(0)?;
            let removed = open_project(method, state)?.timeline.guides.remove(frame);
            Ok(json!(removed.is_some()))
        }
        Method::DeleteGuidesByCategory => {
            let color = category(method, args.int(0)?)?;
            open_project(method, state)?
                .timeline
                .guides
                .remove_by_color(color);
            Ok(json!(true))
        }

        // ── Clip markers ──
        Method::AddClipMarker => {
            let id = args.str(0)?;
            let marker = marker_arg(method, &args, 1)?;
            let project = open_project(method, state)?;
            let item = project.bin.require_mut(id).map_err(|e| fault(method, e))?;
            item.markers.add(marker);
            Ok(json!(true))
        }
        Method::GetClipMarkers => {
            let id = args.str(0)?;
            let project = open_project(method, state)?;
            let item = project.bin.require(id).map_err(|e| fault(method, e))?;
            marker_list(method, &item.markers)
        }
        Method::DeleteClipMarker => {
            let (id, frame) = (args.str(0)?, args.int(1)?);
            let project = open_project(method, state)?;
            let item = project.bin.require_mut(id).map_err(|e| fault(method, e))?;
            Ok(json!(item.markers.remove(frame).is_some()))
        }
        Method::DeleteClipMarkersByCategory => {
            let id = args.str(0)?;
            let color = category(method, args.int(1)?)?;
            let project = open_project(method, state)?;
            let item = project.bin.require_mut(id).map_err(|e| fault(method, e))?;
            item.markers.remove_by_color(color);
            Ok(json!(true))
        }

        // ── Playback ──
        Method::Seek => {
            let frame = args.int(0)?;
            if frame < 0 {
                return Err(fault(
                    method,
                    ReslinkError::InvalidArgument(format!("cannot seek to frame {frame}")),
                ));
            }
            open_project(method, state)?.timeline.position = frame;
            Ok(json!(true))
        }
        Method::GetPosition => Ok(json!(open_project(method, state)?.timeline.position)),
        Method::GetCurrentVideoItem => {
            let timeline = &open_project(method, state)?.timeline;
            // Upper video tracks cover lower ones.
            let id = timeline
                .tracks
                .iter()
                .rev()
                .filter(|t| t.kind == TrackType::Video)
                .find_map(|t| t.clip_at_frame(timeline.position))
                .map_or(-1, |c| c.id);
            Ok(json!(id))
        }
        Method::Play => {
            open_project(method, state)?;
            state.playing = true;
            Ok(json!(true))
        }
        Method::Pause => {
            state.playing = false;
            Ok(json!(true))
        }

        // ── Render, application ──
        Method::Render => {
            let url = args.str(0)?.to_string();
            open_project(method, state)?;
            info!(url = %url, "simulated render queued");
            state.renders.push(url);
            Ok(json!(true))
        }
        Method::ExitApp => {
            state.exited = true;
            state.project = None;
            Ok(json!(true))
        }
    }
}

fn save(method: Method, state: &mut SimState, path: &Path) -> Result<(), TransportError> {
    let project = open_project(method, state)?;
    let name = project.name.clone();
    ProjectFile::new(project.clone())
        .save_to_file(path)
        .map_err(|e| fault(method, e))?;
    let stamp = state.tick();
    state.recent.record(path.display().to_string(), name, stamp);
    info!(path = %path.display(), "simulated project saved");
    Ok(())
}
