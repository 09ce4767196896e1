//! Command-line argument definitions for the mindmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout overrides and logging verbosity.

use clap::Parser;

use mindmap::{config::AppConfig, positioned::Orientation};

/// Command-line arguments for the mindmap tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input payload (JSON or outline text)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model identifier recorded in the export caption
    #[arg(long)]
    pub model: Option<String>,

    /// Layout orientation (horizontal, vertical)
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Deepest outline level to draw
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Apply the command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.export_mut().set_model(model.as_str());
        }
        if let Some(orientation) = self.orientation {
            config.layout_mut().set_orientation(orientation);
        }
        if self.max_depth.is_some() {
            config.normalize_mut().set_max_depth(self.max_depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::parse_from([
            "mindmap",
            "input.json",
            "--orientation",
            "vertical",
            "--max-depth",
            "2",
            "--model",
            "gemini-pro",
        ]);
        assert_eq!(args.output, "out.svg");

        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.layout().orientation(), Orientation::Vertical);
        assert_eq!(config.normalize().max_depth(), Some(2));
        assert_eq!(config.export().model(), "gemini-pro");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let args = Args::parse_from(["mindmap", "input.md"]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_rejects_unknown_orientation() {
        assert!(Args::try_parse_from(["mindmap", "in.json", "--orientation", "diagonal"]).is_err());
    }
}
