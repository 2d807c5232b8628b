//! Folder-browsing state: which folder is shown, how it is presented, and
//! what happens when an entry is opened.
//!
//! Both preferences (`selected_folder`, `folder_layout`) survive restarts
//! through the [`SettingsStore`]; persistence is best-effort and never
//! rolls back the in-memory change.  Opening an entry dispatches on a
//! [`ContentKind`] supplied by the external classifier — an unrecognised
//! type produces a short notification, not a failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aircast_core::{CastEvent, ContentKind, LayoutMode};
use tracing::{debug, warn};

use crate::infrastructure::notify::Notifier;
use crate::infrastructure::settings::{CastSettings, SettingsStore};

use super::message_bus::MessageBus;

// ── Standard browse targets ───────────────────────────────────────────────────

/// The three well-known directories reachable straight from the navigation
/// drawer.
#[derive(Debug, Clone)]
pub struct StandardFolders {
    pub pictures: PathBuf,
    pub videos: PathBuf,
    pub downloads: PathBuf,
}

impl Default for StandardFolders {
    /// Resolves under the user's home directory, falling back to the
    /// current directory when no home is set (stripped containers).
    fn default() -> Self {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            pictures: home.join("Pictures"),
            videos: home.join("Videos"),
            downloads: home.join("Downloads"),
        }
    }
}

// ── Browsing state ────────────────────────────────────────────────────────────

/// Tracks the currently displayed folder and its presentation mode.
pub struct FolderBrowser {
    selected_folder: PathBuf,
    layout_mode: LayoutMode,
    standard: StandardFolders,
    bus: MessageBus,
    store: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
}

impl FolderBrowser {
    /// Builds the browser from persisted settings.  An unset folder
    /// defaults to the standard Pictures directory; an unset layout
    /// defaults to `List`.
    pub fn attach(
        bus: MessageBus,
        store: Arc<dyn SettingsStore>,
        notifier: Arc<dyn Notifier>,
        standard: StandardFolders,
    ) -> Self {
        let settings = store.load();
        let selected_folder = settings
            .selected_folder
            .unwrap_or_else(|| standard.pictures.clone());
        Self {
            selected_folder,
            layout_mode: settings.folder_layout,
            standard,
            bus,
            store,
            notifier,
        }
    }

    pub fn selected_folder(&self) -> &Path {
        &self.selected_folder
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    /// Switches the displayed folder and persists the choice.
    ///
    /// Persistence failure is non-fatal: the in-memory change stands.
    pub fn set_folder(&mut self, folder: PathBuf) {
        debug!(folder = %folder.display(), "folder selected");
        self.selected_folder = folder;
        self.persist();
    }

    pub fn browse_pictures(&mut self) {
        self.set_folder(self.standard.pictures.clone());
    }

    pub fn browse_videos(&mut self) {
        self.set_folder(self.standard.videos.clone());
    }

    pub fn browse_downloads(&mut self) {
        self.set_folder(self.standard.downloads.clone());
    }

    /// Switches the presentation mode, persists it, and broadcasts
    /// [`CastEvent::LayoutChanged`] so every presenting controller
    /// re-reads the preference.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout_mode = mode;
        self.persist();
        self.bus.broadcast(CastEvent::LayoutChanged);
    }

    /// Re-reads the persisted layout preference.  Called by controllers
    /// handling a `LayoutChanged` broadcast that originated elsewhere.
    pub fn reload_layout(&mut self) {
        self.layout_mode = self.store.load().folder_layout;
    }

    /// Opens one folder entry: images are shown on the receiver, audio and
    /// video are played, anything else yields a short notification and the
    /// operation succeeds vacuously.
    pub fn open_entry(&self, path: &Path, kind: ContentKind) {
        match kind {
            ContentKind::Image => {
                self.bus.broadcast(CastEvent::PhotoSelected(path.to_path_buf()));
            }
            ContentKind::Video | ContentKind::Audio => {
                self.bus
                    .broadcast(CastEvent::PlaybackRequested(path.to_path_buf()));
            }
            ContentKind::Unknown => {
                self.notifier.notify("Error: Unknown file type");
            }
        }
    }

    fn persist(&self) {
        let settings = CastSettings {
            selected_folder: Some(self.selected_folder.clone()),
            folder_layout: self.layout_mode,
        };
        if let Err(e) = self.store.save(&settings) {
            // Losing a saved preference must never break browsing.
            warn!(error = %e, "failed to persist browsing settings");
            self.notifier.notify("Could not save folder preferences");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
