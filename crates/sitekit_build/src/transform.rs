//! Per-file handling: minify style/script text, copy everything else.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::minify::{EnumTextDialect, minify_content};
use crate::spec::{BuildTreeError, EnumFileClass, EnumMinifyMode, TransformError};
use crate::util::copy_file_with_metadata;

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumTransformOutcome {
    /// Written as minified text.
    Minified,
    /// Markup/document copied verbatim.
    CopiedText,
    /// Asset copied verbatim.
    CopiedAsset,
    /// Minification failed; the original was copied verbatim instead.
    FallbackCopied {
        /// Why minification failed.
        reason: String,
    },
}

/// Produce exactly one file at `path_file_dst` from `path_file_src`.
///
/// `ext_lower` is the lowercased extension without the dot. Minify failures
/// are recovered with a verbatim copy and reported through the outcome; any
/// other failure, including the fallback copy itself, is returned as
/// [`BuildTreeError`].
pub fn transform_file(
    path_file_src: &Path,
    path_file_dst: &Path,
    ext_lower: Option<&str>,
    rule_minify: EnumMinifyMode,
) -> Result<EnumTransformOutcome, BuildTreeError> {
    let c_name = path_file_src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match EnumFileClass::from_extension(ext_lower) {
        EnumFileClass::Minify => {
            info!("Minifying: {c_name}");
            let enum_dialect = EnumTextDialect::from_extension(ext_lower.unwrap_or_default());
            match minify_file(path_file_src, path_file_dst, rule_minify, enum_dialect) {
                Ok(()) => Ok(EnumTransformOutcome::Minified),
                Err(e) => {
                    warn!("Minify failed for {c_name} ({e}); copying original");
                    copy_verbatim(path_file_src, path_file_dst)?;
                    Ok(EnumTransformOutcome::FallbackCopied {
                        reason: e.to_string(),
                    })
                }
            }
        }
        EnumFileClass::CopyText => {
            info!("Copying: {c_name}");
            copy_verbatim(path_file_src, path_file_dst)?;
            Ok(EnumTransformOutcome::CopiedText)
        }
        EnumFileClass::CopyBinary => {
            info!("Copying asset: {c_name}");
            copy_verbatim(path_file_src, path_file_dst)?;
            Ok(EnumTransformOutcome::CopiedAsset)
        }
    }
}

/// Read as UTF-8, minify, write as UTF-8. No fallback here.
pub fn minify_file(
    path_file_src: &Path,
    path_file_dst: &Path,
    rule_minify: EnumMinifyMode,
    enum_dialect: EnumTextDialect,
) -> Result<(), TransformError> {
    let raw_content = fs::read(path_file_src).map_err(|source| TransformError::Read {
        path: path_file_src.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(raw_content).map_err(|source| TransformError::Decode {
        path: path_file_src.to_path_buf(),
        source,
    })?;
    let content_minified = minify_content(&content, rule_minify, enum_dialect);
    fs::write(path_file_dst, content_minified).map_err(|source| TransformError::Write {
        path: path_file_dst.to_path_buf(),
        source,
    })
}

fn copy_verbatim(path_file_src: &Path, path_file_dst: &Path) -> Result<(), BuildTreeError> {
    copy_file_with_metadata(path_file_src, path_file_dst)
        .map_err(|e| BuildTreeError::io("copy", path_file_src, e))
}
