use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::spec::{BuildTreeError, EnumIgnorePatternMode};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeIgnorePatterns {
    Literal(HashSet<String>),
    Glob(GlobSet),
}

impl TypeIgnorePatterns {
    pub(crate) fn from_raw(
        names_ignore: &[String],
        rule_ignore: EnumIgnorePatternMode,
    ) -> Result<Self, BuildTreeError> {
        match rule_ignore {
            EnumIgnorePatternMode::Literal => {
                Ok(Self::Literal(names_ignore.iter().cloned().collect()))
            }
            EnumIgnorePatternMode::Glob => {
                let mut builder_glob = GlobSetBuilder::new();
                for pattern in names_ignore {
                    let glob = Glob::new(pattern)
                        .map_err(|e| BuildTreeError::InvalidPattern(format!("{pattern}: {e}")))?;
                    builder_glob.add(glob);
                }
                let set_glob = builder_glob
                    .build()
                    .map_err(|e| BuildTreeError::InvalidPattern(e.to_string()))?;
                Ok(Self::Glob(set_glob))
            }
        }
    }

    pub(crate) fn is_ignored(&self, name: &str) -> bool {
        match self {
            Self::Literal(set_names) => set_names.contains(name),
            Self::Glob(set_glob) => set_glob.is_match(name),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    absolutize_path(path)
}

fn absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// `true` when deleting `path_dir_output` would also delete `path_dir_source`.
pub(crate) fn is_output_containing_source(path_dir_source: &Path, path_dir_output: &Path) -> bool {
    let path_source_resolved = normalize_path(path_dir_source);
    let path_output_resolved = normalize_output_path(path_dir_output);
    path_source_resolved.starts_with(&path_output_resolved)
}

/// Normalize a path that may not exist yet by canonicalizing its nearest
/// existing ancestor and re-appending the missing tail.
pub(crate) fn normalize_output_path(path: &Path) -> PathBuf {
    let path_abs = absolutize_path(path);
    let mut l_tail: Vec<&std::ffi::OsStr> = Vec::new();
    let mut path_cursor: &Path = &path_abs;
    loop {
        if let Ok(resolved) = fs::canonicalize(path_cursor) {
            let mut path_out = resolved;
            for part in l_tail.iter().rev() {
                path_out.push(part);
            }
            return path_out;
        }
        match (path_cursor.file_name(), path_cursor.parent()) {
            (Some(name), Some(parent)) => {
                l_tail.push(name);
                path_cursor = parent;
            }
            _ => return path_abs,
        }
    }
}

/// Lowercased extension of `path`, or `None` for names such as `Makefile`
/// or `.htaccess`.
pub(crate) fn derive_extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Map a visited source directory to its output directory.
///
/// The source root maps to the output root itself; every other directory
/// maps to `path_dir_output/<relative path>`.
pub(crate) fn derive_output_dir(
    path_dir_visit: &Path,
    path_dir_source: &Path,
    path_dir_output: &Path,
) -> PathBuf {
    match path_dir_visit.strip_prefix(path_dir_source) {
        Ok(path_rel) if path_rel.as_os_str().is_empty() => path_dir_output.to_path_buf(),
        Ok(path_rel) => path_dir_output.join(path_rel),
        Err(_) => path_dir_output.to_path_buf(),
    }
}

/// Delete whatever sits at `path`, directory tree or single file.
pub(crate) fn remove_path_if_exists(path: &Path) -> Result<bool, io::Error> {
    let meta_path = match fs::symlink_metadata(path) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if meta_path.file_type().is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Copying

/// Byte-for-byte copy keeping permissions, timestamps and (Linux) xattrs.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    apply_file_times(path_file_src, path_file_dst)?;
    #[cfg(target_os = "linux")]
    {
        copy_xattrs_linux(path_file_src, path_file_dst);
    }
    Ok(())
}

fn apply_file_times(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)
}

/// Best effort: attributes that cannot be read or set are skipped.
#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let Ok(iter_xattr_names) = xattr::list(path_file_src) else {
        return;
    };
    for (name, raw_value) in iter_xattr_names
        .filter_map(|name| xattr::get(path_file_src, &name).ok().flatten().map(|v| (name, v)))
    {
        if let Err(e) = xattr::set(path_file_dst, &name, &raw_value) {
            tracing::debug!(
                "xattr {} not copied to {}: {e}",
                name.to_string_lossy(),
                path_file_dst.display()
            );
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
