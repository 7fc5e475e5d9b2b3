//! `sitekit_build`:
//! Static-site output builder.
//!
//! Module layout:
//! - `traverse`  : source walk and output tree orchestration
//! - `transform` : per-file classification, minify or copy, copy fallback
//! - `minify`    : pure text passes (regex and lexical)
//! - `spec`      : enums/options/errors
//! - `report`    : run-time report model
//! - `util`      : shared helper functions

pub mod minify;
pub mod report;
pub mod spec;
pub mod transform;
pub mod traverse;
mod util;

pub use minify::{EnumTextDialect, minify_content, minify_lexical, minify_regex};
pub use report::{ReportBuild, ReportBuildBuilder};
pub use spec::{
    BuildTreeError, EXTS_COPY_TEXT, EXTS_MINIFY, EnumFileClass, EnumIgnorePatternMode,
    EnumMinifyMode, NAMES_IGNORE_DEFAULT, SpecBuildError, SpecBuildOptions, TransformError,
};
pub use transform::{EnumTransformOutcome, minify_file, transform_file};
pub use traverse::build_tree;
