//! Reslink - build a scene timeline from a markdown script
//!
//! ```text
//! reslink SCRIPT.md [--media-dir DIR] [--audio FILE]
//!                   [--transition-frames N] [--save PROJECT.json]
//! ```
//!
//! The timeline is assembled on the in-process simulated editor and its
//! summary printed. `RUST_LOG` controls log output.

mod build;
mod script;

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use reslink_api::Resolve;
use reslink_transport::SimulationConfig;

use crate::build::{build_timeline, BuildOptions};

#[derive(Debug, Default)]
struct CliArgs {
    script: PathBuf,
    build: BuildOptions,
    save: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut script = None;
    let mut build = BuildOptions::default();
    let mut save = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().with_context(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--media-dir" => build.media_dir = Some(value("--media-dir")?.into()),
            "--audio" => build.audio = Some(value("--audio")?.into()),
            "--transition-frames" => {
                build.transition_frames = value("--transition-frames")?
                    .parse()
                    .context("--transition-frames takes a frame count")?;
            }
            "--save" => save = Some(value("--save")?.into()),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if script.is_none() => script = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }
    Ok(CliArgs {
        script: script.context("usage: reslink SCRIPT.md [options]")?,
        build,
        save,
    })
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = parse_args(std::env::args().skip(1))?;
    let scenes = script::load(&args.script)?;
    info!(scenes = scenes.len(), script = %args.script.display(), "script loaded");

    let (resolve, _backend) = Resolve::simulated(SimulationConfig::default());
    let report = build_timeline(&resolve, &scenes, &args.build)?;
    if !report.missing.is_empty() {
        println!("Scenes without media: {:?}", report.missing);
    }

    let project = resolve
        .project_manager()
        .current_project()
        .context("no project is open")?;
    print!("{}", project.current_timeline()?.summary()?);
    println!(
        "{} clips, {} transitions, {} guides, {} frames",
        report.placed, report.transitions, report.guides, report.duration
    );

    if let Some(path) = &args.save {
        project.save_as(path)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let cli = args(&["mv.md", "--transition-frames", "8", "--save", "out.json"]).unwrap();
        assert_eq!(cli.script, PathBuf::from("mv.md"));
        assert_eq!(cli.build.transition_frames, 8);
        assert_eq!(cli.save, Some(PathBuf::from("out.json")));
        assert!(cli.build.media_dir.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["mv.md", "--bogus"]).is_err());
        assert!(args(&["mv.md", "--audio"]).is_err());
        assert!(args(&["mv.md", "--transition-frames", "many"]).is_err());
    }
}
