use anyhow::Result;

use crate::file::{EntryKind, list_dir};
use crate::model::{Directory, MediaFile};
use crate::probe::DurationProbe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Deepest level still scanned. The root is level 0.
    pub max_depth: usize,
    /// Matched as a case-sensitive suffix of the file name, e.g. ".mp4".
    pub extensions: Vec<String>,
    /// Directory names never entered, at any level.
    pub ignore_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            extensions: vec![".mp4".into(), ".MP4".into()],
            ignore_dirs: vec!["css".into(), "img".into(), "js".into()],
        }
    }
}

impl ScanOptions {
    fn matches(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|d| d == name)
    }
}

/// Walks `root` and returns every directory that directly holds at least one
/// matching file, parents before their subdirectories.
///
/// Directories without matches are still descended into. One decoder run is
/// made per matching file.
pub fn scan(
    root: Directory,
    options: &ScanOptions,
    probe: &dyn DurationProbe,
) -> Result<Vec<Directory>> {
    log::info!(
        "Scanning {} (depth {}, extensions {:?})",
        root.path.display(),
        options.max_depth,
        options.extensions
    );
    let directories = scan_level(root, options, probe, 0)?;
    log::info!("Found {} directories with media", directories.len());
    Ok(directories)
}

fn scan_level(
    mut directory: Directory,
    options: &ScanOptions,
    probe: &dyn DurationProbe,
    level: usize,
) -> Result<Vec<Directory>> {
    if level > options.max_depth {
        return Ok(Vec::new());
    }

    let mut subdirs = Vec::new();
    for entry in list_dir(&directory.path)? {
        let name = entry.name();
        match entry {
            EntryKind::Directory(path) => {
                if options.is_ignored(&name) {
                    log::debug!("Skipping ignored directory {}", path.display());
                    continue;
                }
                subdirs.push((path, name));
            }
            EntryKind::File(path) | EntryKind::Other(path) => {
                if !options.matches(&name) {
                    continue;
                }
                let duration = probe.duration(&path);
                log::debug!("{} -> \"{duration}\"", path.display());
                directory.files.push(MediaFile {
                    duration,
                    title: name,
                    path,
                    watched: false,
                });
            }
        }
    }

    let mut found = Vec::new();
    if !directory.files.is_empty() {
        log::info!(
            "{} ({} files)",
            directory.path.display(),
            directory.files.len()
        );
        found.push(directory);
    }

    for (path, title) in subdirs {
        found.extend(scan_level(
            Directory::new(path, title),
            options,
            probe,
            level + 1,
        )?);
    }

    Ok(found)
}
