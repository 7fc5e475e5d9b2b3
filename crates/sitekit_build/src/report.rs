//! Build report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecBuildError;
use crate::transform::EnumTransformOutcome;

/// Aggregate counters and diagnostics for one `build_tree` run.
#[derive(Debug, Default, Clone)]
pub struct ReportBuild {
    /// Output directories created (the output root included).
    pub cnt_dirs: u64,
    /// Style/script files written minified.
    pub cnt_minified: u64,
    /// Markup/document files copied verbatim.
    pub cnt_copied_text: u64,
    /// Asset files copied verbatim.
    pub cnt_copied_assets: u64,
    /// Style/script files copied verbatim after minification failed.
    pub cnt_fallback: u64,
    /// Directory and file entries skipped by the ignore set.
    pub cnt_ignored: u64,
    /// Non-fatal warnings collected during traversal.
    pub warnings: Vec<String>,
    /// Recovered minification failures.
    pub errors: Vec<SpecBuildError>,
}

impl ReportBuild {
    /// Number of files present in the output tree.
    pub fn file_count(&self) -> u64 {
        self.cnt_minified + self.cnt_copied_text + self.cnt_copied_assets + self.cnt_fallback
    }

    /// Number of recovered errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_dirs".to_string(), self.cnt_dirs);
        dict_counts.insert("cnt_minified".to_string(), self.cnt_minified);
        dict_counts.insert("cnt_copied_text".to_string(), self.cnt_copied_text);
        dict_counts.insert("cnt_copied_assets".to_string(), self.cnt_copied_assets);
        dict_counts.insert("cnt_fallback".to_string(), self.cnt_fallback);
        dict_counts.insert("cnt_ignored".to_string(), self.cnt_ignored);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} dirs={} minified={} text={} assets={} fallback={} ignored={} errors={} warnings={}",
            self.cnt_dirs,
            self.cnt_minified,
            self.cnt_copied_text,
            self.cnt_copied_assets,
            self.cnt_fallback,
            self.cnt_ignored,
            self.error_count(),
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[BUILD]"))
    }
}

/// Mutable accumulator for build statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportBuildBuilder {
    report: ReportBuild,
}

impl ReportBuildBuilder {
    /// Increment created-directory count by one.
    pub fn add_dir(&mut self) {
        self.report.cnt_dirs += 1;
    }

    /// Increment ignored count by one.
    pub fn add_ignored(&mut self) {
        self.report.cnt_ignored += 1;
    }

    /// Record the outcome of one file transform.
    ///
    /// A fallback copy also stores its reason as a path-scoped error.
    pub fn add_outcome(&mut self, path_file_src: PathBuf, enum_outcome: EnumTransformOutcome) {
        match enum_outcome {
            EnumTransformOutcome::Minified => self.report.cnt_minified += 1,
            EnumTransformOutcome::CopiedText => self.report.cnt_copied_text += 1,
            EnumTransformOutcome::CopiedAsset => self.report.cnt_copied_assets += 1,
            EnumTransformOutcome::FallbackCopied { reason } => {
                self.report.cnt_fallback += 1;
                self.report.errors.push(SpecBuildError {
                    path: path_file_src,
                    exception: reason,
                });
            }
        }
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.report.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportBuild {
        self.report
    }
}
