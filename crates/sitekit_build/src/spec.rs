//! Build specification models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Constants

/// Names skipped by default, for directories and files alike.
pub const NAMES_IGNORE_DEFAULT: [&str; 6] = [
    "dist",
    ".git",
    "node_modules",
    "__pycache__",
    ".idea",
    "build.py",
];
/// Extensions rewritten by the minify pass.
pub const EXTS_MINIFY: [&str; 2] = ["css", "js"];
/// Textual extensions copied verbatim (markup is never minified).
pub const EXTS_COPY_TEXT: [&str; 5] = ["html", "htm", "php", "txt", "md"];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Handling class of a source file, derived from its extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFileClass {
    /// Style/script text: strip comments and collapse whitespace.
    Minify,
    /// Markup/document text: copy byte-for-byte.
    CopyText,
    /// Everything else (images, fonts, unknown): copy byte-for-byte.
    CopyBinary,
}

impl EnumFileClass {
    /// Classify a lowercased extension (without the leading dot).
    ///
    /// `None` means the file has no extension and is treated as an asset.
    pub fn from_extension(ext_lower: Option<&str>) -> Self {
        let Some(ext) = ext_lower else {
            return Self::CopyBinary;
        };
        if EXTS_MINIFY.contains(&ext) {
            Self::Minify
        } else if EXTS_COPY_TEXT.contains(&ext) {
            Self::CopyText
        } else {
            Self::CopyBinary
        }
    }
}

/// Minification strategy for style/script files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumMinifyMode {
    /// Regular-expression passes with no awareness of string literals.
    ///
    /// Comment-like tokens inside strings, template literals or regex
    /// literals are stripped too, and whitespace inside them is collapsed.
    #[default]
    Regex,
    /// Small tokenizer that leaves string, template and regex literals intact.
    ///
    /// Still best-effort: it does not parse the language.
    Lexical,
}

/// Interpretation of `SpecBuildOptions::names_ignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumIgnorePatternMode {
    /// Exact basename equality.
    #[default]
    Literal,
    /// Shell-like wildcards matched against the basename.
    Glob,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `build_tree`.
#[derive(Debug, Clone)]
pub struct SpecBuildOptions {
    /// Root of the source tree.
    pub dir_source: PathBuf,
    /// Output root; deleted and recreated on every run.
    pub dir_output: PathBuf,
    /// Basenames excluded from traversal, for directories and files.
    pub names_ignore: Vec<String>,
    /// How `names_ignore` entries are matched.
    pub rule_ignore: EnumIgnorePatternMode,
    /// Minification strategy for style/script files.
    pub rule_minify: EnumMinifyMode,
}

impl Default for SpecBuildOptions {
    fn default() -> Self {
        Self {
            dir_source: PathBuf::from("."),
            dir_output: PathBuf::from("dist"),
            names_ignore: NAMES_IGNORE_DEFAULT.iter().map(|s| s.to_string()).collect(),
            rule_ignore: EnumIgnorePatternMode::Literal,
            rule_minify: EnumMinifyMode::Regex,
        }
    }
}

impl SpecBuildOptions {
    /// Options for `dir_source` -> `dir_output` with the default ignore set.
    ///
    /// The default set names `dist`; when the output directory is named
    /// differently its basename is added so the rule "the output directory
    /// is never copied into itself" holds by name as well as by path.
    pub fn new(dir_source: impl Into<PathBuf>, dir_output: impl Into<PathBuf>) -> Self {
        let dir_output = dir_output.into();
        let mut names_ignore: Vec<String> =
            NAMES_IGNORE_DEFAULT.iter().map(|s| s.to_string()).collect();
        if let Some(name_output) = dir_output.file_name().and_then(|n| n.to_str())
            && !names_ignore.iter().any(|n| n == name_output)
        {
            names_ignore.push(name_output.to_string());
        }
        Self {
            dir_source: dir_source.into(),
            dir_output,
            names_ignore,
            ..Self::default()
        }
    }
}

/// One recovered failure with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecBuildError {
    /// Source file whose minification failed.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// Fatal errors; the run stops and the output tree may be incomplete.
#[derive(Debug, Error)]
pub enum BuildTreeError {
    /// Source path is missing or not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Output root equals or contains the source root.
    #[error(
        "Output directory would delete the source: {} contains {}",
        .output.display(),
        .source_dir.display()
    )]
    OutputContainsSource {
        /// Normalized source directory.
        source_dir: PathBuf,
        /// Normalized output directory.
        output: PathBuf,
    },
    /// Invalid ignore pattern.
    #[error("Invalid ignore pattern: {0}")]
    InvalidPattern(String),
    /// Any filesystem failure outside the minify fallback path.
    #[error("{action} failed for {}: {source}", .path.display())]
    Io {
        /// What was being done.
        action: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl BuildTreeError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceNotDirectory(_) => 2,
            Self::OutputContainsSource { .. } => 3,
            Self::InvalidPattern(_) => 4,
            Self::Io { .. } => 1,
        }
    }
}

/// Reason a minify attempt failed; the caller falls back to a plain copy.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
