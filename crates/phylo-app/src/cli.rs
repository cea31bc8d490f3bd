// ABOUTME: Command-line surface: lay out the sample tree after a list of edits, or show config.
// ABOUTME: Output goes to a caller-supplied writer so commands are testable.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use phylo_core::{Config, TreeDirection};

use crate::edit::EditOp;
use crate::session::Session;

#[derive(Debug, Parser)]
#[command(
    name = "phylo-builder",
    about = "Edit and lay out phylogenetic trees",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply edits to the sample tree and print the laid-out scene as JSON.
    Layout(LayoutArgs),

    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Growth direction (left-to-right, rtl, top-to-bottom, ...)
    #[arg(long)]
    pub direction: Option<TreeDirection>,

    #[arg(long)]
    pub width: Option<f64>,

    #[arg(long)]
    pub height: Option<f64>,

    /// Edit to apply, in order; repeatable (e.g. `--edit split:A --edit name:leaf_1=Pan`)
    #[arg(long = "edit", value_name = "OP")]
    pub edits: Vec<EditOp>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to the default location
    #[arg(long)]
    pub write: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Layout(args) => run_layout(args, out),
        Commands::Config(args) => run_config(args, out),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("reading config {}", path.display()))
        }
        None => Ok(Config::load_or_default()),
    }
}

fn run_layout(args: LayoutArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let mut session = Session::new(&config);

    let settings = session.settings_mut();
    if let Some(direction) = args.direction {
        settings.set_direction(direction);
    }
    if let Some(width) = args.width {
        settings.set_width(width);
    }
    if let Some(height) = args.height {
        settings.set_height(height);
    }

    for op in &args.edits {
        if !session.apply(op) {
            tracing::warn!(?op, "edit had no effect");
        }
    }
    tracing::debug!(
        version = session.store().version(),
        stale = session.is_stale(),
        last_change = ?session.last_change(),
        direction = %session.settings().settings().direction,
        "edits applied"
    );

    let snapshot = session.snapshot().context("laying out tree")?;
    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &snapshot)?;
    } else {
        serde_json::to_writer(&mut *out, &snapshot)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run_config(args: ConfigArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    if args.write {
        let path = config.save_to_default().context("writing config")?;
        tracing::info!(path = %path.display(), "config written");
        writeln!(out, "{}", path.display())?;
    } else {
        write!(out, "{}", config.to_toml()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("phylo-builder").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn scratch_config() -> (tempfile::TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save(&path).unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn layout_prints_scene_json() {
        let (_dir, config) = scratch_config();
        let output = run_args(&["layout", "--config", &config]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["treeId"], "sample-tree");
        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(json["direction"], "left-to-right");
    }

    #[test]
    fn layout_applies_edits_and_overrides() {
        let (_dir, config) = scratch_config();
        let output = run_args(&[
            "layout",
            "--config",
            &config,
            "--direction",
            "ttb",
            "--width",
            "1000",
            "--edit",
            "split:A",
            "--edit",
            "name:leaf_1=Pan",
            "--edit",
            "select:leaf_1",
        ])
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["direction"], "top-to-bottom");
        assert_eq!(json["width"], 1000.0);
        assert_eq!(json["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(json["selection"]["id"], "leaf_1");
        let names: Vec<&str> = json["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|n| n["name"].as_str())
            .collect();
        assert!(names.contains(&"Pan"));
    }

    #[test]
    fn bad_edit_is_a_usage_error() {
        assert!(run_args(&["layout", "--edit", "graft:A"]).is_err());
    }

    #[test]
    fn config_prints_toml() {
        let (_dir, config) = scratch_config();
        let output = run_args(&["config", "--config", &config]).unwrap();
        let parsed: Config = toml_config(&output);
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = run_args(&["config", "--config", &missing.to_string_lossy()]).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    fn toml_config(text: &str) -> Config {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.toml");
        std::fs::write(&path, text).unwrap();
        Config::load(&path).unwrap()
    }
}
