use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Directory;

pub const STRUCTURE_VERSION: u8 = 1;
pub const DEFAULT_STRUCTURE_PATH: &str = "course_structure.json";

#[derive(Deserialize, Serialize, Debug, Default)]
struct CourseStructure {
    version: u8,
    directories: Vec<Directory>,
}

/// Saved result of the last scan, so notes can be rebuilt without probing again.
#[derive(Debug, Clone)]
pub struct StructureStore {
    path: PathBuf,
}

impl StructureStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, directories: &[Directory]) -> Result<()> {
        let structure = CourseStructure {
            version: STRUCTURE_VERSION,
            directories: directories.to_vec(),
        };
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &structure)?;
        writer.flush()?;
        log::info!(
            "Saved {} directories to {}",
            directories.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Directory>> {
        let file = File::open(&self.path).with_context(|| {
            format!(
                "Failed to open course structure {} (run with --new first)",
                self.path.display()
            )
        })?;
        let structure: CourseStructure = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        if structure.version != STRUCTURE_VERSION {
            anyhow::bail!(
                "{} has version {}, expected {}",
                self.path.display(),
                structure.version,
                STRUCTURE_VERSION
            );
        }
        log::info!(
            "Loaded {} directories from {}",
            structure.directories.len(),
            self.path.display()
        );
        Ok(structure.directories)
    }
}
