//! CLI settings, persisted as TOML.
//!
//! Settings live in the platform config folder unless `--config` names
//! another file:
//! - macOS: ~/Library/Application Support/org.StudyPortal.Study-Portal/
//! - Windows: %APPDATA%/StudyPortal/Study Portal/config/
//! - Linux: ~/.config/studyportal/

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use portal_ai::AiSettings;
use portal_persistence::AutoSaveConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "StudyPortal";
const APP_NAME: &str = "Study Portal";
const CONFIG_FILENAME: &str = "settings.toml";
const LIBRARY_FILENAME: &str = "library.spl";

// =============================================================================
// ROOT SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,

    /// Study assistant.
    pub ai: AiSettings,

    /// When pending store writes are awaited without being asked.
    pub autosave: AutoSaveConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Library file. Defaults to `library.spl` in the platform data folder.
    pub library_path: Option<PathBuf>,

    /// Show a "sample" row instead of an empty resource list.
    pub show_placeholder: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            library_path: None,
            show_placeholder: true,
        }
    }
}

impl GeneralSettings {
    /// Library file to open.
    pub fn library_path(&self) -> PathBuf {
        self.library_path.clone().unwrap_or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).map_or_else(
                || PathBuf::from(LIBRARY_FILENAME),
                |dirs| dirs.data_dir().join(LIBRARY_FILENAME),
            )
        })
    }
}

impl Settings {
    /// Default settings file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load settings from `explicit`, or from the default location.
    ///
    /// A missing default file means defaults. A missing explicit file is an
    /// error, as is any file that does not parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let Some(path) = Self::default_path() else {
            debug!("no platform config folder, using default settings");
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                Err(e).with_context(|| format!("read settings file {}", path.display()))
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let settings = toml::from_str(content)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write settings to `path`, creating its folder if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config folder {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serialize settings")?;
        fs::write(path, content)
            .with_context(|| format!("write settings file {}", path.display()))?;
        info!(path = %path.display(), "saved settings");
        Ok(())
    }
}
