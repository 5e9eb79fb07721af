use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::FileOrder;
use crate::scan::ScanOptions;
use crate::store::DEFAULT_STRUCTURE_PATH;

/// Settings read from `config.toml`.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `COURSE_NOTES__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub probe: ProbeSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub max_depth: usize,
    /// Case-sensitive file name suffixes, dot included.
    pub extensions: Vec<String>,
    pub ignore_dirs: Vec<String>,
    /// Order of files inside each directory of the note.
    pub file_order: FileOrder,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let options = ScanOptions::default();
        Self {
            max_depth: options.max_depth,
            extensions: options.extensions,
            ignore_dirs: options.ignore_dirs,
            file_order: FileOrder::default(),
        }
    }
}

impl ScanSettings {
    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            max_depth: self.max_depth,
            extensions: self.extensions.clone(),
            ignore_dirs: self.ignore_dirs.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Decoder executable, looked up on PATH unless absolute.
    pub decoder: PathBuf,
    /// A decoder run taking longer than this is killed and the file gets no duration.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            decoder: PathBuf::from("ffmpeg"),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STRUCTURE_PATH),
        }
    }
}

impl Settings {
    /// Loads settings. An explicitly given file must exist, the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        let config_path = explicit.map(Path::to_path_buf).or_else(resolve_config_path);
        if let Some(path) = &config_path {
            log::debug!("Reading config from {}", path.display());
            builder = builder.add_source(
                ::config::File::from(path.as_path()).required(explicit.is_some()),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("COURSE_NOTES")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("scan.extensions")
                .with_list_parse_key("scan.ignore_dirs")
                .try_parsing(true),
        );

        let cfg = builder.build().context("Failed to read configuration")?;
        let settings: Settings = cfg
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.iter().all(|e| e.is_empty()) {
            anyhow::bail!("scan.extensions must name at least one suffix");
        }
        if self.probe.timeout.is_zero() {
            anyhow::bail!("probe.timeout must be greater than zero");
        }
        Ok(())
    }
}

/// `COURSE_NOTES_CONFIG_PATH`, else the XDG default.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("COURSE_NOTES_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/course-notes/config.toml`, or `~/.config/course-notes/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("course-notes").join("config.toml"))
}
