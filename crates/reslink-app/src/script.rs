//! Markdown scene scripts.
//!
//! ```text
//! ## INTRO
//! ### Scene 1 — Dawn over the city
//! **timing:** 5s
//! **mood:** quiet
//! ```
//!
//! `##` headings open a section, `###` headings start a scene and
//! `**timing:**` lines give a scene's length. Other fields are ignored.

use anyhow::{Context, Result};
use std::path::Path;

use reslink_api::SceneCue;
use reslink_core::{seconds_to_frames, FrameRate};

/// A scene as written in the script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptScene {
    pub number: u32,
    pub title: String,
    pub section: String,
    /// Seconds, when the scene states one
    pub timing: Option<f64>,
}

impl ScriptScene {
    /// Cue for this scene at `rate`; no timing means "use the whole clip".
    pub fn cue(&self, rate: FrameRate) -> SceneCue {
        SceneCue {
            index: self.number,
            duration: self.timing.map_or(0, |s| seconds_to_frames(s, rate)),
            section: self.section.clone(),
        }
    }

    /// Guide label, e.g. `Scene 03 — Rooftops`.
    pub fn label(&self) -> String {
        if self.title.is_empty() {
            format!("Scene {:02}", self.number)
        } else {
            format!("Scene {:02} — {}", self.number, self.title)
        }
    }
}

pub fn load(path: &Path) -> Result<Vec<ScriptScene>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene script {}", path.display()))?;
    Ok(parse(&text))
}

pub fn parse(text: &str) -> Vec<ScriptScene> {
    let mut scenes = Vec::new();
    let mut section = String::new();
    for line in text.lines().map(str::trim) {
        if let Some(heading) = line.strip_prefix("### ") {
            if let Some((number, title)) = scene_heading(heading) {
                scenes.push(ScriptScene {
                    number,
                    title,
                    section: section.clone(),
                    timing: None,
                });
            }
        } else if let Some(heading) = line.strip_prefix("## ") {
            section = heading.trim().to_string();
        } else if let Some(value) = field(line, "timing") {
            if let Some(scene) = scenes.last_mut() {
                scene.timing = parse_seconds(value);
            }
        }
    }
    scenes
}

/// `Scene 12 — Title` (em dash, en dash or hyphen).
fn scene_heading(heading: &str) -> Option<(u32, String)> {
    let rest = heading.trim().strip_prefix("Scene")?.trim_start();
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let number = digits.parse().ok()?;
    let title = rest[digits.len()..]
        .trim_start()
        .trim_start_matches(['—', '–', '-'])
        .trim();
    Some((number, title.to_string()))
}

/// Value of a `**name:** value` line; names match case-insensitively.
fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix("**")?;
    let (key, value) = rest.split_once(":**")?;
    key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
}

/// `5s`, `2.5 s`, `4` are all seconds.
fn parse_seconds(value: &str) -> Option<f64> {
    let number = value.trim().trim_end_matches(['s', 'S']).trim();
    number.parse::<f64>().ok().filter(|s| *s > 0.0)
}
