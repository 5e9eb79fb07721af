use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub enum EntryKind {
    File(PathBuf),
    /// Symlinks to directories land here too.
    Directory(PathBuf),
    Other(PathBuf), // dangling symlink, device, etc.
}

impl EntryKind {
    pub fn path(&self) -> &Path {
        match self {
            EntryKind::File(p) | EntryKind::Directory(p) | EntryKind::Other(p) => p,
        }
    }

    pub fn name(&self) -> String {
        file_name(self.path())
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Immediate entries of `path`, in the order the filesystem returns them.
pub fn list_dir<P: AsRef<Path>>(path: P) -> Result<Vec<EntryKind>> {
    let entries = fs::read_dir(path.as_ref()).with_context(|| {
        format!("Failed to read directory: {}", path.as_ref().display())
    })?;

    let mut results = Vec::new();

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in: {}", path.as_ref().display()))?;
        let path = entry.path();

        let kind = if path.is_dir() {
            EntryKind::Directory(path)
        } else if path.is_file() {
            EntryKind::File(path)
        } else {
            EntryKind::Other(path)
        };

        results.push(kind);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_dir_classifies_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut entries = list_dir(dir.path()).unwrap();
        entries.sort_by_key(|e| e.name());

        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], EntryKind::File(p) if p.ends_with("a.mp4")));
        assert!(matches!(&entries[1], EntryKind::Directory(p) if p.ends_with("sub")));
        assert_eq!(entries[1].name(), "sub");
    }

    #[test]
    fn list_dir_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_dir(dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("Failed to read directory"));
    }
}
