//! Source tree traversal and output tree orchestration.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::report::{ReportBuild, ReportBuildBuilder};
use crate::spec::{BuildTreeError, EnumMinifyMode, SpecBuildOptions};
use crate::transform::transform_file;
use crate::util::{
    TypeIgnorePatterns, derive_extension_lower, derive_output_dir, is_output_containing_source,
    normalize_output_path, normalize_path, remove_path_if_exists,
};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_dir: OsString,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: OsString,
}

#[derive(Debug)]
struct SpecBuildContext {
    path_dir_src: PathBuf,
    path_dir_out: PathBuf,
    path_dir_out_resolved: PathBuf,
    rule_minify: EnumMinifyMode,
    spec_ignore_pats: TypeIgnorePatterns,
    builder_report: ReportBuildBuilder,
}

/// Rebuild the output tree from the source tree described by `spec_options`.
///
/// This function performs:
/// 1. Input validation (source is a directory, output does not contain it).
/// 2. Deletion of any previous output tree, then creation of the output root.
/// 3. A depth-first walk that skips ignored names before descending, mirrors
///    each visited directory, and hands every file to [`transform_file`].
///
/// Returns [`ReportBuild`] when the run completes; recovered minify failures
/// are listed in the report. Returns [`BuildTreeError`] for setup failures and
/// for any filesystem error outside the minify fallback path, in which case
/// the output tree may be incomplete.
pub fn build_tree(spec_options: &SpecBuildOptions) -> Result<ReportBuild, BuildTreeError> {
    let path_dir_src = spec_options.dir_source.clone();
    let path_dir_out = spec_options.dir_output.clone();

    if !path_dir_src.is_dir() {
        return Err(BuildTreeError::SourceNotDirectory(path_dir_src));
    }
    if is_output_containing_source(&path_dir_src, &path_dir_out) {
        return Err(BuildTreeError::OutputContainsSource {
            source_dir: normalize_path(&path_dir_src),
            output: normalize_output_path(&path_dir_out),
        });
    }
    let spec_ignore_pats =
        TypeIgnorePatterns::from_raw(&spec_options.names_ignore, spec_options.rule_ignore)?;

    info!("Starting build, creating {}", path_dir_out.display());
    if remove_path_if_exists(&path_dir_out)
        .map_err(|e| BuildTreeError::io("remove output", &path_dir_out, e))?
    {
        debug!("Removed previous output {}", path_dir_out.display());
    }
    fs::create_dir_all(&path_dir_out)
        .map_err(|e| BuildTreeError::io("create directory", &path_dir_out, e))?;

    let mut builder_report = ReportBuildBuilder::default();
    builder_report.add_dir();

    let mut spec_build_ctx = SpecBuildContext {
        path_dir_src: path_dir_src.clone(),
        path_dir_out_resolved: normalize_path(&path_dir_out),
        path_dir_out,
        rule_minify: spec_options.rule_minify,
        spec_ignore_pats,
        builder_report,
    };

    walk_directory(&path_dir_src, &mut spec_build_ctx)?;
    Ok(spec_build_ctx.builder_report.build())
}

fn walk_directory(
    path_dir_visit: &Path,
    spec_build_ctx: &mut SpecBuildContext,
) -> Result<(), BuildTreeError> {
    let path_dir_target = derive_output_dir(
        path_dir_visit,
        &spec_build_ctx.path_dir_src,
        &spec_build_ctx.path_dir_out,
    );
    if !path_dir_target.exists() {
        fs::create_dir_all(&path_dir_target)
            .map_err(|e| BuildTreeError::io("create directory", &path_dir_target, e))?;
        info!("Creating directory: {}", path_dir_target.display());
        spec_build_ctx.builder_report.add_dir();
    }

    let (l_dirs, l_files) = list_directory(path_dir_visit, spec_build_ctx)?;

    for spec_file_entry in l_files {
        let path_file_dst = path_dir_target.join(&spec_file_entry.name_file);
        let ext_lower = derive_extension_lower(&spec_file_entry.path_file_src);
        let enum_outcome = transform_file(
            &spec_file_entry.path_file_src,
            &path_file_dst,
            ext_lower.as_deref(),
            spec_build_ctx.rule_minify,
        )?;
        spec_build_ctx
            .builder_report
            .add_outcome(spec_file_entry.path_file_src, enum_outcome);
    }

    for spec_dir_entry in l_dirs {
        walk_directory(&spec_dir_entry.path_dir_src_sub, spec_build_ctx)?;
    }
    Ok(())
}

/// Split a directory's entries into subdirectories to descend into and files
/// to transform, both sorted by name, with ignored names already removed.
fn list_directory(
    path_dir_visit: &Path,
    spec_build_ctx: &mut SpecBuildContext,
) -> Result<(Vec<SpecDirEntry>, Vec<SpecFileEntry>), BuildTreeError> {
    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    let iter_entries = fs::read_dir(path_dir_visit)
        .map_err(|e| BuildTreeError::io("read directory", path_dir_visit, e))?;

    for entry_res in iter_entries {
        let entry = entry_res.map_err(|e| BuildTreeError::io("read directory", path_dir_visit, e))?;
        let path_entry = entry.path();
        let name_entry = entry.file_name();

        // Non-UTF-8 names are matched lossily but mirrored byte-exact.
        if spec_build_ctx
            .spec_ignore_pats
            .is_ignored(&name_entry.to_string_lossy())
        {
            debug!("Ignoring {}", path_entry.display());
            spec_build_ctx.builder_report.add_ignored();
            continue;
        }

        let cfg_file_type = entry
            .file_type()
            .map_err(|e| BuildTreeError::io("inspect", &path_entry, e))?;

        if cfg_file_type.is_dir() {
            if normalize_path(&path_entry) == spec_build_ctx.path_dir_out_resolved {
                debug!("Skipping output directory {}", path_entry.display());
                spec_build_ctx.builder_report.add_ignored();
                continue;
            }
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: name_entry,
            });
        } else if cfg_file_type.is_symlink() {
            if path_entry.is_dir() {
                debug!("Not following directory link {}", path_entry.display());
                continue;
            }
            // Dangling links land here too; copying them fails the run.
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: name_entry,
            });
        } else if cfg_file_type.is_file() {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: name_entry,
            });
        } else {
            warn!("Special file skipped: {}", path_entry.display());
            spec_build_ctx
                .builder_report
                .add_warning(format!("Special file skipped: {}", path_entry.display()));
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));
    Ok((l_dirs, l_files))
}
