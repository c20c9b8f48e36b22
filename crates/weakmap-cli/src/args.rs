//! Command-line argument definitions for the Weakmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, output format,
//! subject/domain scoping, configuration file selection, and logging
//! verbosity.

use clap::{Parser, ValueEnum};

/// Output format of the rendered map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// SVG image
    #[default]
    Svg,
    /// JSON layout document
    Json,
}

impl OutputFormat {
    /// File extension used for the default output path.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }
}

/// Command-line arguments for the Weakmap tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input topic file (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file [default: out.svg or out.json]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Only map topics of this subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Only map topics of this domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The output path, falling back to `out.<format extension>`.
    pub fn output_path(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("out.{}", self.format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["weakmap", "topics.json"]);

        assert_eq!(args.input, "topics.json");
        assert_eq!(args.format, OutputFormat::Svg);
        assert_eq!(args.output_path(), "out.svg");
        assert_eq!(args.log_level, "info");
        assert!(args.subject.is_none());
    }

    #[test]
    fn test_json_format_changes_default_output() {
        let args = Args::parse_from(["weakmap", "topics.json", "--format", "json"]);
        assert_eq!(args.output_path(), "out.json");
    }

    #[test]
    fn test_scope_and_output() {
        let args = Args::parse_from([
            "weakmap",
            "topics.json",
            "-o",
            "science.svg",
            "--subject",
            "science",
            "--domain",
            "エネルギー",
        ]);

        assert_eq!(args.output_path(), "science.svg");
        assert_eq!(args.subject.as_deref(), Some("science"));
        assert_eq!(args.domain.as_deref(), Some("エネルギー"));
    }
}
