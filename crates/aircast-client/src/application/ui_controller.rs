//! The foreground controller: owns the UI-facing state and reacts to both
//! bus events and user commands.
//!
//! # One loop, one writer (for beginners)
//!
//! Everything that mutates this controller's state runs inside a single
//! spawned task.  Bus events are forwarded into the loop by the
//! subscription handler; user gestures arrive as [`UiCommand`]s on a second
//! channel; a `select!` merges the two.  Because only that task touches the
//! [`ControllerState`] and [`FolderBrowser`], no lock is needed and no two
//! mutations can interleave.
//!
//! ```text
//! bus ──handler──► event queue ─┐
//!                               ├─ select! ──► mutate state ──► publish
//! UiController ──► command queue┘                               snapshot
//! ```
//!
//! After every mutation the loop publishes a [`UiSnapshot`] through a
//! `watch` channel; the rendering layer (out of scope here) observes the
//! channel and redraws.

use std::path::PathBuf;
use std::sync::Arc;

use aircast_core::{
    rebuild_navigation, ActionTag, CastEvent, ContentKind, ControllerState, LayoutMode,
    NavigationItem,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::infrastructure::notify::Notifier;
use crate::infrastructure::permissions::StorageAuthority;
use crate::infrastructure::settings::SettingsStore;

use super::browse_folder::{FolderBrowser, StandardFolders};
use super::capture_flow::CaptureAuthorizationFlow;
use super::message_bus::MessageBus;

/// Bus id the foreground controller registers under.
pub const UI_SUBSCRIBER_ID: &str = "ui";

// ── Presentation snapshot ─────────────────────────────────────────────────────

/// Immutable snapshot of everything the rendering layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSnapshot {
    /// Receiver name while connected, `"Not connected"` otherwise.
    pub subtitle: String,
    /// Ordered list of currently valid navigation actions.
    pub navigation: Vec<NavigationItem>,
    /// The folder whose contents are displayed.
    pub selected_folder: PathBuf,
    /// Presentation mode for the folder contents.
    pub layout_mode: LayoutMode,
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// User gestures and platform callbacks delivered to the controller loop.
#[derive(Debug)]
pub enum UiCommand {
    /// A navigation drawer item was tapped.
    Activate(ActionTag),
    /// A folder entry was opened; `kind` comes from the external classifier.
    OpenEntry { path: PathBuf, kind: ContentKind },
    /// The folder-chooser dialog completed.
    SelectFolder(PathBuf),
    /// The storage permission prompt completed.
    StorageAuthorized(bool),
    /// Tear the controller down without a bus-wide exit.
    Shutdown,
}

// ── Controller handle ─────────────────────────────────────────────────────────

/// Handle to the running foreground controller.
pub struct UiController {
    commands: mpsc::UnboundedSender<UiCommand>,
    snapshot: watch::Receiver<UiSnapshot>,
    join: JoinHandle<()>,
}

impl UiController {
    /// Attaches the controller to the bus and starts its event loop.
    ///
    /// Reads persisted browsing preferences, queries the storage authority
    /// (requesting authorization asynchronously when missing), and
    /// publishes an initial snapshot before the first event arrives.
    pub fn spawn(
        bus: MessageBus,
        capture_flow: CaptureAuthorizationFlow,
        store: Arc<dyn SettingsStore>,
        authority: Arc<dyn StorageAuthority>,
        notifier: Arc<dyn Notifier>,
        standard: StandardFolders,
    ) -> Self {
        let browser = FolderBrowser::attach(bus.clone(), store, notifier, standard);

        let state = ControllerState {
            storage_authorized: authority.has_authorization(),
            capture_capable: capture_flow.capture_capable(),
            selected_folder: browser.selected_folder().to_path_buf(),
            layout_mode: browser.layout_mode(),
            ..ControllerState::default()
        };

        let (command_tx, command_rx) = mpsc::unbounded_channel::<UiCommand>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<CastEvent>();
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot_of(&state, &browser));

        // Missing storage permission: raise the prompt now, apply the
        // answer whenever it arrives.
        if !state.storage_authorized {
            let answer = authority.request_authorization();
            let command_tx = command_tx.clone();
            tokio::spawn(async move {
                // A closed channel counts as denial.
                let granted = answer.await.unwrap_or(false);
                let _ = command_tx.send(UiCommand::StorageAuthorized(granted));
            });
        }

        let subscription = bus.register(UI_SUBSCRIBER_ID, move |event| {
            let _ = event_tx.send(event);
        });

        let join = tokio::spawn(run_loop(
            LoopInputs {
                events: event_rx,
                commands: command_rx,
            },
            snapshot_tx,
            subscription,
            capture_flow,
            browser,
            state,
        ));

        Self {
            commands: command_tx,
            snapshot: snapshot_rx,
            join,
        }
    }

    /// A watch receiver over the controller's presentation snapshot.
    pub fn snapshot(&self) -> watch::Receiver<UiSnapshot> {
        self.snapshot.clone()
    }

    /// Delivers a navigation tap to the controller loop.
    pub fn activate(&self, tag: ActionTag) {
        let _ = self.commands.send(UiCommand::Activate(tag));
    }

    /// Delivers a folder-entry open to the controller loop.
    pub fn open_entry(&self, path: PathBuf, kind: ContentKind) {
        let _ = self.commands.send(UiCommand::OpenEntry { path, kind });
    }

    /// Delivers a folder-chooser result to the controller loop.
    pub fn select_folder(&self, path: PathBuf) {
        let _ = self.commands.send(UiCommand::SelectFolder(path));
    }

    /// Requests local teardown and waits for the loop to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(UiCommand::Shutdown);
        let _ = self.join.await;
    }

    /// Waits for the loop to finish on its own (e.g. after `ExitRequested`).
    pub async fn wait(self) {
        let _ = self.join.await;
    }
}

// ── Event loop ────────────────────────────────────────────────────────────────

struct LoopInputs {
    events: mpsc::UnboundedReceiver<CastEvent>,
    commands: mpsc::UnboundedReceiver<UiCommand>,
}

fn snapshot_of(state: &ControllerState, browser: &FolderBrowser) -> UiSnapshot {
    UiSnapshot {
        subtitle: state.subtitle(),
        navigation: rebuild_navigation(state),
        selected_folder: browser.selected_folder().to_path_buf(),
        layout_mode: browser.layout_mode(),
    }
}

async fn run_loop(
    mut inputs: LoopInputs,
    snapshot_tx: watch::Sender<UiSnapshot>,
    subscription: super::message_bus::Subscription,
    capture_flow: CaptureAuthorizationFlow,
    mut browser: FolderBrowser,
    mut state: ControllerState,
) {
    loop {
        let keep_running = tokio::select! {
            maybe_event = inputs.events.recv() => match maybe_event {
                Some(event) => handle_event(event, &mut state, &mut browser),
                None => false,
            },
            maybe_command = inputs.commands.recv() => match maybe_command {
                Some(command) => handle_command(command, &mut state, &mut browser, &capture_flow),
                None => false,
            },
        };

        // Keep the state's browsing fields coherent with the browser, then
        // publish for the rendering layer.
        state.selected_folder = browser.selected_folder().to_path_buf();
        state.layout_mode = browser.layout_mode();
        let _ = snapshot_tx.send(snapshot_of(&state, &browser));

        if !keep_running {
            break;
        }
    }

    subscription.dispose();
    debug!("ui controller loop ended");
}

/// Applies one bus event.  Returns `false` when the loop should end.
fn handle_event(event: CastEvent, state: &mut ControllerState, browser: &mut FolderBrowser) -> bool {
    state.apply(&event);
    match event {
        CastEvent::LayoutChanged => browser.reload_layout(),
        CastEvent::ExitRequested => {
            info!("exit requested, detaching ui controller");
            return false;
        }
        // Consumed by the networking / mirroring services; the UI only
        // re-derives its state above.
        CastEvent::ConnectionEstablished { .. }
        | CastEvent::ConnectionLost
        | CastEvent::CaptureStartRequested(_)
        | CastEvent::PhotoSelected(_)
        | CastEvent::PlaybackRequested(_) => {}
    }
    true
}

/// Applies one user command.  Returns `false` when the loop should end.
fn handle_command(
    command: UiCommand,
    state: &mut ControllerState,
    browser: &mut FolderBrowser,
    capture_flow: &CaptureAuthorizationFlow,
) -> bool {
    match command {
        UiCommand::Activate(tag) => match tag {
            ActionTag::Connect => {
                // The receiver-connection dialog lives in the dialog layer;
                // its outcome returns as a ConnectionEstablished broadcast.
                debug!("connect dialog requested");
            }
            ActionTag::Mirror => capture_flow.request_capture(),
            ActionTag::BrowsePictures => browser.browse_pictures(),
            ActionTag::BrowseVideos => browser.browse_videos(),
            ActionTag::BrowseDownloads => browser.browse_downloads(),
            ActionTag::ChooseFolder => {
                // The chooser dialog is external; its result arrives as
                // UiCommand::SelectFolder.
                debug!("folder chooser requested");
            }
            ActionTag::StopPlayback => {
                // Handled by the networking service holding the session.
                info!("stop playback requested");
            }
        },
        UiCommand::OpenEntry { path, kind } => browser.open_entry(&path, kind),
        UiCommand::SelectFolder(path) => browser.set_folder(path),
        UiCommand::StorageAuthorized(granted) => {
            debug!(granted, "storage authorization answered");
            state.storage_authorized = granted;
        }
        UiCommand::Shutdown => return false,
    }
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::consent::ScriptedConsentProvider;
    use crate::infrastructure::notify::RecordingNotifier;
    use crate::infrastructure::permissions::{MockStorageAuthority, StaticStorageAuthority};
    use crate::infrastructure::settings::InMemorySettingsStore;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    fn spawn_controller(
        bus: &MessageBus,
        authority: Arc<dyn StorageAuthority>,
    ) -> (UiController, Arc<InMemorySettingsStore>) {
        let store = Arc::new(InMemorySettingsStore::new());
        let flow = CaptureAuthorizationFlow::new(
            bus.clone(),
            Arc::new(ScriptedConsentProvider::granting()),
        );
        let controller = UiController::spawn(
            bus.clone(),
            flow,
            Arc::clone(&store) as Arc<dyn SettingsStore>,
            authority,
            Arc::new(RecordingNotifier::new()),
            StandardFolders::default(),
        );
        (controller, store)
    }

    /// Polls the snapshot channel until `pred` holds or the window expires.
    async fn wait_for(
        rx: &mut watch::Receiver<UiSnapshot>,
        pred: impl Fn(&UiSnapshot) -> bool,
    ) -> UiSnapshot {
        timeout(Duration::from_millis(500), async {
            loop {
                let snap = rx.borrow().clone();
                if pred(&snap) {
                    return snap;
                }
                rx.changed().await.expect("controller alive");
            }
        })
        .await
        .expect("snapshot condition not reached")
    }

    fn tags(snap: &UiSnapshot) -> Vec<ActionTag> {
        snap.navigation.iter().map(|i| i.tag).collect()
    }

    #[tokio::test]
    async fn test_initial_snapshot_shows_disconnected_defaults() {
        let bus = MessageBus::new();
        let (controller, _store) =
            spawn_controller(&bus, Arc::new(StaticStorageAuthority::granted()));

        let snap = controller.snapshot().borrow().clone();
        assert_eq!(snap.subtitle, "Not connected");
        assert_eq!(tags(&snap), vec![ActionTag::Connect]);
        assert_eq!(snap.layout_mode, LayoutMode::List);

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_connection_established_updates_subtitle_and_navigation() {
        let bus = MessageBus::new();
        let (controller, _store) =
            spawn_controller(&bus, Arc::new(StaticStorageAuthority::granted()));
        let mut snapshots = controller.snapshot();

        bus.broadcast(CastEvent::ConnectionEstablished {
            receiver: "Living Room".to_string(),
        });

        let snap = wait_for(&mut snapshots, |s| s.subtitle == "Living Room").await;
        assert_eq!(
            tags(&snap),
            vec![
                ActionTag::Connect,
                ActionTag::Mirror,
                ActionTag::BrowsePictures,
                ActionTag::BrowseVideos,
                ActionTag::BrowseDownloads,
                ActionTag::ChooseFolder,
                ActionTag::StopPlayback,
            ]
        );

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_connection_lost_collapses_navigation() {
        let bus = MessageBus::new();
        let (controller, _store) =
            spawn_controller(&bus, Arc::new(StaticStorageAuthority::granted()));
        let mut snapshots = controller.snapshot();

        bus.broadcast(CastEvent::ConnectionEstablished {
            receiver: "TV".to_string(),
        });
        wait_for(&mut snapshots, |s| s.subtitle == "TV").await;

        bus.broadcast(CastEvent::ConnectionLost);
        let snap = wait_for(&mut snapshots, |s| s.subtitle == "Not connected").await;
        assert_eq!(tags(&snap), vec![ActionTag::Connect]);

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_deferred_storage_grant_enables_browse_items() {
        // Arrange: authority that denies up front and grants on request.
        let mut authority = MockStorageAuthority::new();
        authority.expect_has_authorization().return_const(false);
        authority.expect_request_authorization().returning(|| {
            let (tx, rx) = oneshot::channel();
            let _ = tx.send(true);
            rx
        });

        let bus = MessageBus::new();
        let (controller, _store) = spawn_controller(&bus, Arc::new(authority));
        let mut snapshots = controller.snapshot();

        bus.broadcast(CastEvent::ConnectionEstablished {
            receiver: "TV".to_string(),
        });

        // Assert: once connected AND the grant lands, browse items appear.
        let snap = wait_for(&mut snapshots, |s| {
            tags(s).contains(&ActionTag::BrowsePictures)
        })
        .await;
        assert!(tags(&snap).contains(&ActionTag::ChooseFolder));

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_activate_mirror_broadcasts_capture_start() {
        // Arrange: a second subscriber plays the mirroring service.
        let bus = MessageBus::new();
        let (probe_tx, mut probe_rx) = mpsc::unbounded_channel();
        let _probe = bus.register("mirror-service", move |event| {
            if matches!(event, CastEvent::CaptureStartRequested(_)) {
                let _ = probe_tx.send(event);
            }
        });
        let (controller, _store) =
            spawn_controller(&bus, Arc::new(StaticStorageAuthority::granted()));

        // Act
        controller.activate(ActionTag::Mirror);

        // Assert
        let event = timeout(Duration::from_millis(500), probe_rx.recv())
            .await
            .expect("delivery")
            .expect("open channel");
        assert!(matches!(event, CastEvent::CaptureStartRequested(_)));

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_folder_updates_snapshot_and_persists() {
        let bus = MessageBus::new();
        let (controller, store) =
            spawn_controller(&bus, Arc::new(StaticStorageAuthority::granted()));
        let mut snapshots = controller.snapshot();

        controller.select_folder(PathBuf::from("/media/holiday"));

        let snap = wait_for(&mut snapshots, |s| {
            s.selected_folder == PathBuf::from("/media/holiday")
        })
        .await;
        assert_eq!(snap.selected_folder, PathBuf::from("/media/holiday"));
        assert_eq!(
            store.load().selected_folder,
            Some(PathBuf::from("/media/holiday"))
        );

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_exit_requested_detaches_the_controller() {
        let bus = MessageBus::new();
        let (controller, _store) =
            spawn_controller(&bus, Arc::new(StaticStorageAuthority::granted()));

        bus.broadcast(CastEvent::ExitRequested);
        timeout(Duration::from_millis(500), controller.wait())
            .await
            .expect("controller must end after ExitRequested");

        // The subscription was disposed; later broadcasts find no ui entry.
        bus.broadcast(CastEvent::ConnectionLost);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
