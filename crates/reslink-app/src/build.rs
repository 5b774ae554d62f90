//! Assembling a scene timeline from a script.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use reslink_api::{
    scene_batch, AppendOptions, MarkerColor, MarkerDraft, MediaPoolItem, Resolve, TimelineItem,
    TrackType,
};
use reslink_core::MediaKind;

use crate::script::ScriptScene;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Where scene media lives; placeholder stills are used when unset
    pub media_dir: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    /// 0 disables transitions
    pub transition_frames: i64,
    pub folder_name: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            media_dir: None,
            audio: None,
            transition_frames: reslink_core::defaults::TRANSITION_FRAMES,
            folder_name: "Scenes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub placed: usize,
    pub missing: Vec<u32>,
    pub transitions: usize,
    pub guides: usize,
    pub duration: i64,
}

/// Guide colour for a script section.
pub fn section_color(section: &str) -> MarkerColor {
    let section = section.to_ascii_uppercase();
    if section.contains("INTRO") {
        MarkerColor::Blue
    } else if section.contains("VERSE") {
        MarkerColor::Green
    } else {
        MarkerColor::Purple
    }
}

/// First importable file in `dir` named after the scene, e.g. `scene03-A.mp4`.
fn find_scene_media(dir: &Path, number: u32) -> Result<Option<PathBuf>> {
    let prefix = format!("scene{number:02}");
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            MediaKind::is_importable(path)
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.to_ascii_lowercase().starts_with(&prefix))
        })
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

pub fn build_timeline(
    resolve: &Resolve,
    scenes: &[ScriptScene],
    options: &BuildOptions,
) -> Result<BuildReport> {
    let project = resolve
        .project_manager()
        .current_project()
        .context("no project is open")?;
    let pool = project.media_pool();
    let timeline = project.current_timeline()?;
    let rate = project.frame_rate()?;
    let mut report = BuildReport::default();

    // Pair every scene with a media path.
    let mut used = Vec::new();
    let mut paths = Vec::new();
    for scene in scenes {
        let path = match &options.media_dir {
            Some(dir) => find_scene_media(dir, scene.number)?,
            None => Some(PathBuf::from(format!("scene{:02}.png", scene.number))),
        };
        match path {
            Some(path) => {
                paths.push(path.display().to_string());
                used.push(scene);
            }
            None => {
                warn!(scene = scene.number, "no media for scene");
                report.missing.push(scene.number);
            }
        }
    }
    if paths.is_empty() {
        info!("nothing to place");
        return Ok(report);
    }

    let folder = pool.add_sub_folder(None, &options.folder_name)?;
    let clips: Vec<MediaPoolItem> = pool.import_media_into(paths.as_slice(), &folder)?;
    let cues: Vec<_> = used.iter().map(|s| s.cue(rate)).collect();
    let placed: Vec<TimelineItem> = pool
        .append_to_timeline(scene_batch(&cues, &clips), AppendOptions::default())?
        .context("scene media does not fit the first video track")?;
    report.placed = placed.len();

    if options.transition_frames > 0 {
        for pair in placed.windows(2) {
            match timeline.add_transition(&pair[0], &pair[1], Some(options.transition_frames)) {
                Ok(_) => report.transitions += 1,
                Err(err) => warn!(left = pair[0].id(), right = pair[1].id(), %err, "transition skipped"),
            }
        }
    }

    for (scene, clip) in used.iter().zip(&placed) {
        let draft = MarkerDraft::new(section_color(&scene.section)).name(scene.label());
        if timeline.add_marker(clip.start()?, &draft)? {
            report.guides += 1;
        }
    }

    if let Some(audio) = &options.audio {
        let audio = pool.import_media(&[audio.display().to_string()])?;
        match timeline.insert_clip_at(TrackType::Audio, 1, &audio[0], 0)? {
            Some(clip) => info!(clip = clip.id(), "audio placed"),
            None => warn!("project has no audio track"),
        }
    }

    report.duration = timeline.total_duration()?;
    info!(
        placed = report.placed,
        transitions = report.transitions,
        guides = report.guides,
        duration = report.duration,
        "timeline built"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse;
    use reslink_transport::SimulationConfig;

    const SCRIPT: &str = "\
## INTRO
### Scene 1 — Dawn
**timing:** 4s
### Scene 2 — Street
**timing:** 4s
## VERSE
### Scene 3 — Roofs
";

    #[test]
    fn test_build_with_placeholders() {
        let (resolve, _) = Resolve::simulated(SimulationConfig::default());
        let report = build_timeline(&resolve, &parse(SCRIPT), &BuildOptions::default()).unwrap();
        assert_eq!(report.placed, 3);
        assert_eq!(report.transitions, 2);
        assert_eq!(report.guides, 3);
        // 100 + 100 + 125 frames less two 13-frame overlaps
        assert_eq!(report.duration, 299);

        let timeline = resolve
            .project_manager()
            .current_project()
            .unwrap()
            .current_timeline()
            .unwrap();
        let guides = timeline.markers().unwrap();
        assert_eq!(guides[&0].color, MarkerColor::Blue);
        assert_eq!(guides[&174].name, "Scene 03 — Roofs");
        assert_eq!(guides[&174].color, MarkerColor::Green);
    }

    #[test]
    fn test_missing_media_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scene02-A.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("scene02.txt"), b"").unwrap();
        let (resolve, _) = Resolve::simulated(SimulationConfig::default());
        let options = BuildOptions {
            media_dir: Some(dir.path().to_path_buf()),
            transition_frames: 0,
            ..BuildOptions::default()
        };
        let report = build_timeline(&resolve, &parse(SCRIPT), &options).unwrap();
        assert_eq!(report.placed, 1);
        assert_eq!(report.missing, vec![1, 3]);
        assert_eq!(report.duration, 100);
    }
}
