use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::Directory;
use crate::render::{render_note, render_progress_table};

/// Where a finished note goes.
pub trait NoteSink {
    fn emit(&self, text: &str) -> Result<()>;
}

pub struct ConsoleSink;

impl NoteSink for ConsoleSink {
    fn emit(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Writes `<title>.md`, replacing any earlier note with the same title.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(dir: &Path, title: &str) -> Self {
        Self {
            path: dir.join(format!("{title}.md")),
        }
    }
}

impl NoteSink for FileSink {
    fn emit(&self, text: &str) -> Result<()> {
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write note {}", self.path.display()))?;
        log::info!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Renders the note (and the progress table when asked) and hands the note to `sink`.
///
/// Nothing reaches the sink unless every part rendered. Returns the progress table.
pub fn emit_report(
    sink: &dyn NoteSink,
    title: &str,
    directories: &[Directory],
    with_progress: bool,
) -> Result<Option<String>> {
    let note = render_note(title, directories)?;
    let progress = if with_progress {
        Some(render_progress_table(directories)?)
    } else {
        None
    };
    sink.emit(&note)?;
    Ok(progress)
}
