use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::time::files_duration_minutes;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MediaFile {
    /// Raw decoder output, e.g. "01:02:03.45". Empty when probing failed.
    pub duration: String,
    pub title: String,
    pub path: PathBuf,
    #[serde(default)]
    pub watched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Directory {
    pub path: PathBuf,
    pub title: String,
    pub files: Vec<MediaFile>,
}

impl Directory {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            files: Vec::new(),
        }
    }

    /// Directory the walk starts from. The title is the path as the user gave it.
    pub fn root(path: &Path) -> Result<Self> {
        let abs = std::path::absolute(path)
            .with_context(|| format!("Failed to resolve root path: {}", path.display()))?;
        Ok(Self::new(abs, path.display().to_string()))
    }

    pub fn duration_minutes(&self) -> Result<u32> {
        files_duration_minutes(&self.files)
    }
}

/// How files inside a directory are ordered before rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileOrder {
    /// Order in which the scan met the files.
    #[default]
    Encounter,
    Title,
    /// "12.intro.mp4" sorts by 12. Titles without a numeric prefix are an error.
    NumericPrefix,
}

fn numeric_prefix(title: &str) -> Result<u64> {
    let (prefix, _) = title
        .split_once('.')
        .with_context(|| format!("No numeric prefix in \"{title}\""))?;
    prefix
        .trim()
        .parse::<u64>()
        .with_context(|| format!("No numeric prefix in \"{title}\""))
}

pub fn sort_files(dir: &mut Directory, order: FileOrder) -> Result<()> {
    match order {
        FileOrder::Encounter => {}
        FileOrder::Title => dir.files.sort_by(|a, b| a.title.cmp(&b.title)),
        FileOrder::NumericPrefix => {
            let mut keyed = dir
                .files
                .drain(..)
                .map(|f| numeric_prefix(&f.title).map(|n| (n, f)))
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by_key(|(n, _)| *n);
            dir.files = keyed.into_iter().map(|(_, f)| f).collect();
        }
    }
    Ok(())
}

/// Marks every file whose title is listed as watched. Returns how many flags changed.
pub fn mark_watched(dirs: &mut [Directory], titles: &[String]) -> usize {
    let mut changed = 0;
    for file in dirs.iter_mut().flat_map(|d| d.files.iter_mut()) {
        if !file.watched && titles.iter().any(|t| t == &file.title) {
            file.watched = true;
            changed += 1;
        }
    }
    changed
}
