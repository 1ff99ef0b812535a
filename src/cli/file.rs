//! Breakpoint-list files on disk
//!
//! Writes go through a temporary file in the target directory and are
//! renamed into place, so Xcode never sees a half-written list.

use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use crate::common::{Error, Result};
use crate::document::{BreakpointDocument, LoadOptions};
use crate::xml::WriteOptions;

/// Load a breakpoint list, or an empty one if the file does not exist yet
pub fn load(path: &Path, options: &LoadOptions) -> Result<BreakpointDocument> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "file does not exist yet, starting empty");
            return Ok(BreakpointDocument::new());
        }
        Err(e) => {
            return Err(Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            })
        }
    };

    let mut doc = BreakpointDocument::open_with(&bytes, options)?;
    doc.set_last_modified(modified(path));
    Ok(doc)
}

/// Write a breakpoint list back, creating parent directories as needed
pub fn save(path: &Path, doc: &BreakpointDocument, options: &WriteOptions) -> Result<()> {
    if let (Some(loaded), Some(current)) = (doc.last_modified(), modified(path)) {
        if current != loaded {
            tracing::warn!(
                path = %path.display(),
                "file changed on disk since it was loaded, overwriting"
            );
        }
    }

    let bytes = doc.serialize_with(options)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| Error::file_write(path, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::file_write(path, e))?;
    tmp.write_all(&bytes).map_err(|e| Error::file_write(path, e))?;
    // The temp file starts out private; an existing list keeps its mode
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| Error::file_write(path, e))?;
    }
    tmp.persist(path).map_err(|e| Error::file_write(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote breakpoint list");
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::FileBreakpoint;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load(&dir.path().join("none.xcbkptlist"), &LoadOptions::keep_all()).unwrap();
        assert!(doc.is_empty());
        assert!(doc.last_modified().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xcdebugger").join("Breakpoints_v2.xcbkptlist");

        let mut doc = BreakpointDocument::new();
        doc.add_file_breakpoint(FileBreakpoint::new("main.swift", 3));
        save(&path, &doc, &WriteOptions::default()).unwrap();

        let loaded = load(&path, &LoadOptions::keep_all()).unwrap();
        assert_eq!(loaded.breakpoints_for_path("main.swift").len(), 1);
        assert!(loaded.last_modified().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Breakpoints_v2.xcbkptlist");
        save(&path, &BreakpointDocument::new(), &WriteOptions::default()).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut doc = load(&path, &LoadOptions::keep_all()).unwrap();
        doc.add_file_breakpoint(FileBreakpoint::new("main.swift", 3));
        save(&path, &doc, &WriteOptions::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xcbkptlist");
        std::fs::write(&path, "<Bucket><Breakpoints>").unwrap();

        let err = load(&path, &LoadOptions::keep_all()).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }
}
