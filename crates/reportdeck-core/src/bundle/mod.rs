//! Document renderers
//!
//! Two modes share the detail and summary formatters:
//! - [`live`]: one dashboard document rewritten after every re-scan;
//! - [`static_bundle`]: self-contained documents with an embedded data
//!   snapshot and a small script for navigation.

pub mod live;
mod runtime;
pub mod static_bundle;

use std::fs;
use std::path::Path;

use crate::detail::{LIVE_PREVIEW_CHARS, STATIC_PREVIEW_CHARS};
use crate::error::{DeckError, Result};

pub use live::{LiveDashboard, LiveFrame};
pub use static_bundle::{build_bundle, BundleOutcome, INDEX_DOCUMENT};

/// Which renderer a document is produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Live,
    Static,
}

impl RenderMode {
    /// Log preview length for this mode
    pub fn preview_chars(self) -> usize {
        match self {
            RenderMode::Live => LIVE_PREVIEW_CHARS,
            RenderMode::Static => STATIC_PREVIEW_CHARS,
        }
    }
}

/// Write `html` to `path`, creating parent directories.
///
/// The content lands in a sibling temporary file first and is renamed into
/// place, so a browser never loads a half-written document.
pub(crate) fn write_document(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DeckError::io_at("create directory", parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    fs::write(tmp, html).map_err(|e| DeckError::io_at("write", tmp, e))?;
    fs::rename(tmp, path).map_err(|e| {
        let _ = fs::remove_file(tmp);
        DeckError::io_at("write", path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_document_creates_parents_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/doc.html");
        write_document(&path, "one").unwrap();
        write_document(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        assert!(!dir.path().join("a/b/doc.html.tmp").exists());
    }

    #[test]
    fn test_preview_lengths_per_mode() {
        assert_eq!(RenderMode::Live.preview_chars(), 600);
        assert_eq!(RenderMode::Static.preview_chars(), 40);
    }
}
