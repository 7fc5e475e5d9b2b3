use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sitekit_build::{EnumMinifyMode, SpecBuildOptions};

#[derive(Parser, Debug)]
#[command(name = "sitekit")]
#[command(about = "Build a deployable copy of a static site with minified CSS/JS")]
#[command(version)]
pub struct Cli {
    /// Source directory to build from
    #[arg(short, long, env = "SITEKIT_SOURCE", default_value = ".")]
    pub source: PathBuf,

    /// Output directory (deleted and recreated on every run)
    #[arg(short, long, env = "SITEKIT_OUTPUT", default_value = "dist")]
    pub output: PathBuf,

    /// How CSS/JS comments are stripped
    #[arg(long, value_enum, default_value_t = MinifyModeArg::Regex)]
    pub minify_mode: MinifyModeArg,

    /// Verbose output (debug level)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MinifyModeArg {
    /// Regular expressions, blind to string literals
    Regex,
    /// Tokenizer that keeps string, template and regex literals intact
    Lexical,
}

impl From<MinifyModeArg> for EnumMinifyMode {
    fn from(value: MinifyModeArg) -> Self {
        match value {
            MinifyModeArg::Regex => EnumMinifyMode::Regex,
            MinifyModeArg::Lexical => EnumMinifyMode::Lexical,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl Cli {
    pub fn to_build_options(&self) -> SpecBuildOptions {
        SpecBuildOptions {
            rule_minify: self.minify_mode.into(),
            ..SpecBuildOptions::new(&self.source, &self.output)
        }
    }

    /// Default filter directive when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
