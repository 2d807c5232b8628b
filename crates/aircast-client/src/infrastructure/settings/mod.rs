//! TOML-based persistence for the two browsing preferences.
//!
//! Reads and writes [`CastSettings`] to the platform-appropriate settings
//! file:
//! - Windows:  `%APPDATA%\AirCast\settings.toml`
//! - Linux:    `~/.config/aircast/settings.toml`
//! - macOS:    `~/Library/Application Support/AirCast/settings.toml`
//!
//! Exactly two keys are stored: `selected_folder` (absolute path of the
//! folder last browsed) and `folder_layout` (`"list"` or `"grid"`, default
//! `"list"`).  They are read when a controller attaches and written on
//! every change.
//!
//! # Serde default values
//!
//! Both fields carry serde defaults so that the app works correctly on
//! first run (no file yet) and when loading a file written by an older
//! build that is missing newer fields.
//!
//! # Failure policy
//!
//! Persistence is best-effort: a failed write is reported to the caller as
//! a [`SettingsError`] but the in-memory preference change stands — losing
//! a saved preference must never break browsing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use aircast_core::LayoutMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Injected failure used by tests to exercise the non-fatal path.
    #[error("settings store unavailable")]
    Unavailable,
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// The persisted browsing preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastSettings {
    /// Absolute path of the folder last browsed; `None` until first set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_folder: Option<PathBuf>,
    /// Presentation mode for folder contents.
    #[serde(default)]
    pub folder_layout: LayoutMode,
}

// ── Store seam ────────────────────────────────────────────────────────────────

/// Key-value persistence seam consumed by the browsing state.
pub trait SettingsStore: Send + Sync {
    /// Loads the persisted settings, falling back to defaults when the
    /// file is absent or unreadable (a missing preference is never fatal).
    fn load(&self) -> CastSettings;

    /// Persists `settings`.
    fn save(&self, settings: &CastSettings) -> Result<(), SettingsError>;
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// [`SettingsStore`] backed by a TOML file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoPlatformConfigDir`] when the platform
    /// config base directory cannot be determined from the environment.
    pub fn at_default_location() -> Result<Self, SettingsError> {
        let dir = platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)?;
        Ok(Self {
            path: dir.join("settings.toml"),
        })
    }

    /// Store at an explicit path (tests, portable installs).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> CastSettings {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "malformed settings file, using defaults");
                    CastSettings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CastSettings::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable settings file, using defaults");
                CastSettings::default()
            }
        }
    }

    fn save(&self, settings: &CastSettings) -> Result<(), SettingsError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Resolves the platform config directory for AirCast.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("AirCast"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("aircast"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/AirCast
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("AirCast")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// [`SettingsStore`] held entirely in memory, with an injectable save
/// failure.  Used by tests and headless demos.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    settings: Mutex<CastSettings>,
    fail_saves: std::sync::atomic::AtomicBool,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save` fail with [`SettingsError::Unavailable`].
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves
            .store(fail, std::sync::atomic::Ordering::Release);
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> CastSettings {
        self.settings.lock().expect("settings lock poisoned").clone()
    }

    fn save(&self, settings: &CastSettings) -> Result<(), SettingsError> {
        if self.fail_saves.load(std::sync::atomic::Ordering::Acquire) {
            return Err(SettingsError::Unavailable);
        }
        *self.settings.lock().expect("settings lock poisoned") = settings.clone();
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
