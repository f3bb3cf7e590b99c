//! Corpus path resolution and containment checks
//!
//! Every report or run lookup made by name goes through [`CorpusRoot`], which
//! proves the resolved path stays inside the corpus root. Only the recursive
//! scan in [`crate::scan`] walks the tree without it.
//!
//! # Example
//! ```
//! # use reportdeck_core::paths::CorpusRoot;
//! # let dir = tempfile::tempdir().unwrap();
//! let root = CorpusRoot::new(dir.path())?;
//! let report = root.resolve_report("run-1/bucket-policy.json")?;
//! assert!(report.as_path().starts_with(root.as_path()));
//! assert!(root.resolve_report("../outside.json").is_err());
//! # Ok::<(), reportdeck_core::error::DeckError>(())
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::bail_invalid_name;
use crate::error::{DeckError, Result};

/// Suffix every report file carries
pub const REPORT_SUFFIX: &str = ".json";

/// Reserved aggregate summary filename, excluded from report scans
pub const SUMMARY_FILE: &str = "summary.json";

/// Suffix of generated static documents
pub const DOCUMENT_SUFFIX: &str = ".html";

/// The resolved corpus root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRoot(PathBuf);

/// A report file proven to live under the corpus root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPath(PathBuf);

/// A run directory proven to live under the corpus root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir(PathBuf);

macro_rules! impl_typed_path {
    ($type:ident) => {
        impl $type {
            /// Get the underlying Path reference
            pub fn as_path(&self) -> &Path {
                &self.0
            }

            /// Get the underlying PathBuf
            pub fn to_path_buf(&self) -> PathBuf {
                self.0.clone()
            }

            /// Join with another path component
            pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
                self.0.join(path)
            }
        }

        impl From<$type> for PathBuf {
            fn from(typed: $type) -> PathBuf {
                typed.0
            }
        }

        impl AsRef<Path> for $type {
            fn as_ref(&self) -> &Path {
                &self.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.display().fmt(f)
            }
        }
    };
}

impl_typed_path!(CorpusRoot);
impl_typed_path!(ReportPath);
impl_typed_path!(RunDir);

impl CorpusRoot {
    /// Resolve `root` to an absolute, normalized path. The directory need not exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).map_err(|e| DeckError::io_at("resolve", root, e))?;
        Ok(Self(resolve_lenient(&absolute)))
    }

    /// Resolve a report name (`run/slug.json`) to a file under the root.
    ///
    /// Existence is not checked; callers report a missing file as `NotFound`.
    pub fn resolve_report(&self, name: &str) -> Result<ReportPath> {
        if !name.ends_with(REPORT_SUFFIX) {
            bail_invalid_name!(name, format!("expected a {REPORT_SUFFIX} file"));
        }
        let resolved = self.contained(name)?;
        if resolved == self.0 {
            bail_invalid_name!(name, "does not name a file");
        }
        Ok(ReportPath(resolved))
    }

    /// Resolve a run name to a directory under the root.
    pub fn resolve_run(&self, run: &str) -> Result<RunDir> {
        let resolved = self.contained(run)?;
        let relation = relative_to(&self.0, &resolved);
        if relation.is_absolute() || matches!(relation.components().next(), Some(Component::ParentDir)) {
            bail_invalid_name!(run, "escapes the report root");
        }
        Ok(RunDir(resolved))
    }

    /// Location of the aggregate summary, optionally scoped to one run.
    pub fn summary_path(&self, run: Option<&str>) -> Result<PathBuf> {
        match run.filter(|r| !r.is_empty()) {
            Some(run) => Ok(self.resolve_run(run)?.join(SUMMARY_FILE)),
            None => Ok(self.0.join(SUMMARY_FILE)),
        }
    }

    fn contained(&self, identifier: &str) -> Result<PathBuf> {
        let candidate = Path::new(identifier);
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            bail_invalid_name!(identifier, "contains a parent-directory segment");
        }
        let resolved = resolve_lenient(&self.0.join(candidate));
        if !resolved.starts_with(&self.0) {
            bail_invalid_name!(identifier, "escapes the report root");
        }
        Ok(resolved)
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into its parent.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Canonicalize the longest existing ancestor and append the rest lexically.
///
/// Symlinks inside the existing part are resolved, so a link pointing out of
/// the root cannot pass the containment check.
fn resolve_lenient(path: &Path) -> PathBuf {
    let normalized = normalize(path);
    let mut existing = normalized.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            let mut out = canonical;
            for part in rest.iter().rev() {
                out.push(part);
            }
            return out;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalized,
        }
    }
}

/// Lexical relative path from `base` to `target`.
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<_> = base.components().collect();
    let target: Vec<_> = target.components().collect();
    if base.first() != target.first() {
        return target.iter().collect();
    }
    let shared = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut out = PathBuf::new();
    for _ in shared..base.len() {
        out.push(Component::ParentDir);
    }
    for component in &target[shared..] {
        out.push(component);
    }
    out
}

/// Map a report name to the relative document path used by static bundles.
pub fn document_name(report_name: &str) -> String {
    let stem = report_name
        .strip_suffix(REPORT_SUFFIX)
        .unwrap_or(report_name);
    format!("{stem}{DOCUMENT_SUFFIX}")
}
