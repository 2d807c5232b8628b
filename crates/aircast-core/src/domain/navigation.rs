//! Navigation drawer derivation: which user actions are currently valid.
//!
//! `rebuild_navigation` is a pure function from [`ControllerState`] to an
//! ordered action list.  Controllers call it after every state mutation;
//! actions that would be broken in the current state (e.g. browsing before
//! storage is authorized) are simply absent rather than disabled — silent
//! degradation instead of a dead button.

use super::state::ControllerState;

// ── Action tags ───────────────────────────────────────────────────────────────

/// Closed set of user-facing navigation actions.
///
/// Replaces the free-form string tags of earlier clients so a `match` on a
/// selected action is exhaustiveness-checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    /// Open the receiver-connection dialog.
    Connect,
    /// Start mirroring the local screen to the receiver.
    Mirror,
    /// Browse the standard Pictures directory.
    BrowsePictures,
    /// Browse the standard Videos directory.
    BrowseVideos,
    /// Browse the standard Downloads directory.
    BrowseDownloads,
    /// Open the free-form folder chooser dialog.
    ChooseFolder,
    /// Stop whatever is currently playing on the receiver.
    StopPlayback,
}

/// Reference to a drawable icon resource by name.
///
/// The rendering layer resolves the name against its asset catalogue; the
/// core only carries the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconRef(pub &'static str);

/// One entry in the navigation drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationItem {
    pub tag: ActionTag,
    pub label: &'static str,
    pub icon: IconRef,
}

impl NavigationItem {
    const fn new(tag: ActionTag, label: &'static str, icon: &'static str) -> Self {
        Self {
            tag,
            label,
            icon: IconRef(icon),
        }
    }
}

// ── Derivation ────────────────────────────────────────────────────────────────

/// Rebuilds the ordered navigation list for the given state.
///
/// Fixed rule table, evaluated top to bottom, each rule independently
/// gating one item:
///
/// | Item | Included iff |
/// |---|---|
/// | Connect | always |
/// | Mirror | connected ∧ capture capable |
/// | BrowsePictures / BrowseVideos / BrowseDownloads / ChooseFolder | connected ∧ storage authorized |
/// | StopPlayback | connected |
pub fn rebuild_navigation(state: &ControllerState) -> Vec<NavigationItem> {
    let mut items = Vec::with_capacity(7);

    items.push(NavigationItem::new(
        ActionTag::Connect,
        "Connect to receiver...",
        "ic_cast_connected",
    ));

    if state.connected && state.capture_capable {
        items.push(NavigationItem::new(
            ActionTag::Mirror,
            "Mirror Screen",
            "ic_screen_mirror",
        ));
    }

    if state.connected && state.storage_authorized {
        items.push(NavigationItem::new(
            ActionTag::BrowsePictures,
            "Pictures",
            "ic_image",
        ));
        items.push(NavigationItem::new(
            ActionTag::BrowseVideos,
            "Videos",
            "ic_videocam",
        ));
        items.push(NavigationItem::new(
            ActionTag::BrowseDownloads,
            "Downloads",
            "ic_file_download",
        ));
        items.push(NavigationItem::new(
            ActionTag::ChooseFolder,
            "Choose folder...",
            "ic_folder",
        ));
    }

    if state.connected {
        items.push(NavigationItem::new(
            ActionTag::StopPlayback,
            "Stop playback",
            "ic_stop",
        ));
    }

    items
}

// ── Tests ─────────────────────────────────────────────────────────────────────
