//! End-to-end session tests: the foreground controller, the capture flow,
//! and a stand-in networking service wired over one bus.
//!
//! # Scenario under test
//!
//! These tests replay the life of a casting session the way the shipped
//! client experiences it:
//!
//! ```text
//! networking service          bus              ui controller
//! ──────────────────          ───              ─────────────
//! ConnectionEstablished ───────────────►  subtitle + full navigation
//!                                         user taps "Mirror Screen"
//! CaptureStartRequested  ◄──────────────  (consent granted, token attached)
//!                                         user opens a photo entry
//! PhotoSelected          ◄──────────────
//! ExitRequested ────────────────────────► controller detaches
//! ```
//!
//! The networking / mirroring side is a probe subscriber recording what it
//! receives; the consent dialog and storage prompt are the scripted
//! adapters.  No real network, capture, or filesystem access is involved.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use aircast_client::application::browse_folder::StandardFolders;
use aircast_client::application::capture_flow::CaptureAuthorizationFlow;
use aircast_client::application::message_bus::MessageBus;
use aircast_client::application::ui_controller::{UiController, UiSnapshot};
use aircast_client::infrastructure::consent::{
    ScriptedConsentProvider, UnavailableConsentProvider,
};
use aircast_client::infrastructure::notify::{Notifier, RecordingNotifier};
use aircast_client::infrastructure::permissions::{StaticStorageAuthority, StorageAuthority};
use aircast_client::infrastructure::settings::{InMemorySettingsStore, SettingsStore};
use aircast_core::{ActionTag, CastEvent, ContentKind, LayoutMode};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

const RECV_WINDOW: Duration = Duration::from_millis(500);

struct Harness {
    bus: MessageBus,
    controller: UiController,
    store: Arc<InMemorySettingsStore>,
    notifier: Arc<RecordingNotifier>,
    /// Everything the stand-in networking/mirroring service received.
    service_rx: mpsc::UnboundedReceiver<CastEvent>,
}

fn harness(capture_available: bool) -> Harness {
    let bus = MessageBus::new();

    let (service_tx, service_rx) = mpsc::unbounded_channel();
    let _service = bus.register("networking-service", move |event| {
        let _ = service_tx.send(event);
    });

    let store = Arc::new(InMemorySettingsStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let capture_flow = if capture_available {
        CaptureAuthorizationFlow::new(bus.clone(), Arc::new(ScriptedConsentProvider::granting()))
    } else {
        CaptureAuthorizationFlow::new(bus.clone(), Arc::new(UnavailableConsentProvider))
    };

    let controller = UiController::spawn(
        bus.clone(),
        capture_flow,
        Arc::clone(&store) as Arc<dyn SettingsStore>,
        Arc::new(StaticStorageAuthority::granted()) as Arc<dyn StorageAuthority>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        StandardFolders::default(),
    );

    Harness {
        bus,
        controller,
        store,
        notifier,
        service_rx,
    }
}

async fn wait_for(
    rx: &mut watch::Receiver<UiSnapshot>,
    pred: impl Fn(&UiSnapshot) -> bool,
) -> UiSnapshot {
    timeout(RECV_WINDOW, async {
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

/// Receives service events until one matches `pred`, skipping the rest
/// (the service also sees connection and layout broadcasts).
async fn service_event(
    rx: &mut mpsc::UnboundedReceiver<CastEvent>,
    pred: impl Fn(&CastEvent) -> bool,
) -> CastEvent {
    timeout(RECV_WINDOW, async {
        loop {
            let event = rx.recv().await.expect("open channel");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected service event")
}

fn tags(snap: &UiSnapshot) -> Vec<ActionTag> {
    snap.navigation.iter().map(|i| i.tag).collect()
}

#[tokio::test]
async fn test_session_from_connect_to_mirror_to_photo() {
    // Arrange
    let mut h = harness(true);
    let mut snapshots = h.controller.snapshot();

    // Connection comes up: navigation unfolds, subtitle shows the receiver.
    h.bus.broadcast(CastEvent::ConnectionEstablished {
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

    // User taps Mirror: consent is granted, the service gets the token.
    h.controller.activate(ActionTag::Mirror);
    let event = service_event(&mut h.service_rx, |e| {
        matches!(e, CastEvent::CaptureStartRequested(_))
    })
    .await;
    assert!(matches!(event, CastEvent::CaptureStartRequested(_)));

    // User opens a photo: the service is told to show it.
    h.controller
        .open_entry(PathBuf::from("/media/holiday/beach.jpg"), ContentKind::Image);
    let event = service_event(&mut h.service_rx, |e| {
        matches!(e, CastEvent::PhotoSelected(_))
    })
    .await;
    assert_eq!(
        event,
        CastEvent::PhotoSelected(PathBuf::from("/media/holiday/beach.jpg"))
    );

    // Exit tears the controller down.
    h.bus.broadcast(CastEvent::ExitRequested);
    timeout(RECV_WINDOW, h.controller.wait())
        .await
        .expect("controller must detach on ExitRequested");
}

#[tokio::test]
async fn test_capture_incapable_platform_never_offers_mirror() {
    // Arrange: no capture support at all.
    let h = harness(false);
    let mut snapshots = h.controller.snapshot();

    h.bus.broadcast(CastEvent::ConnectionEstablished {
        receiver: "TV".to_string(),
    });

    // Assert: fully connected and authorized, yet Mirror is absent.
    let snap = wait_for(&mut snapshots, |s| s.subtitle == "TV").await;
    assert_eq!(
        tags(&snap),
        vec![
            ActionTag::Connect,
            ActionTag::BrowsePictures,
            ActionTag::BrowseVideos,
            ActionTag::BrowseDownloads,
            ActionTag::ChooseFolder,
            ActionTag::StopPlayback,
        ]
    );

    h.controller.shutdown().await;
}

#[tokio::test]
async fn test_layout_change_persists_and_propagates() {
    // Arrange: a second browser-like participant changes the layout; the
    // controller re-reads the persisted preference on LayoutChanged.
    let h = harness(true);
    let mut snapshots = h.controller.snapshot();

    // Simulate a settings screen writing the preference and broadcasting.
    h.store
        .save(&aircast_client::infrastructure::settings::CastSettings {
            selected_folder: None,
            folder_layout: LayoutMode::Grid,
        })
        .expect("settings write");
    h.bus.broadcast(CastEvent::LayoutChanged);

    let snap = wait_for(&mut snapshots, |s| s.layout_mode == LayoutMode::Grid).await;
    assert_eq!(snap.layout_mode, LayoutMode::Grid);

    h.controller.shutdown().await;
}

#[tokio::test]
async fn test_unknown_file_type_notifies_and_keeps_session_alive() {
    // Arrange
    let mut h = harness(true);
    let mut snapshots = h.controller.snapshot();

    h.bus.broadcast(CastEvent::ConnectionEstablished {
        receiver: "TV".to_string(),
    });
    wait_for(&mut snapshots, |s| s.subtitle == "TV").await;

    // Act: open something the classifier did not recognise, then a photo.
    h.controller
        .open_entry(PathBuf::from("/media/readme.bin"), ContentKind::Unknown);
    h.controller
        .open_entry(PathBuf::from("/media/ok.jpg"), ContentKind::Image);

    // Assert: the photo still went through — the unknown entry only
    // produced a notification, never a failure.
    let event = service_event(&mut h.service_rx, |e| {
        matches!(e, CastEvent::PhotoSelected(_))
    })
    .await;
    assert_eq!(event, CastEvent::PhotoSelected(PathBuf::from("/media/ok.jpg")));
    assert_eq!(h.notifier.messages(), vec!["Error: Unknown file type"]);

    h.controller.shutdown().await;
}

#[tokio::test]
async fn test_selected_folder_survives_restart() {
    // First run: the user picks a folder.
    let h = harness(true);
    h.controller.select_folder(PathBuf::from("/media/holiday"));
    let mut snapshots = h.controller.snapshot();
    wait_for(&mut snapshots, |s| {
        s.selected_folder == PathBuf::from("/media/holiday")
    })
    .await;
    let store = Arc::clone(&h.store);
    h.controller.shutdown().await;

    // Second run against the same store: the folder is restored.
    let bus = MessageBus::new();
    let controller = UiController::spawn(
        bus.clone(),
        CaptureAuthorizationFlow::new(bus.clone(), Arc::new(ScriptedConsentProvider::granting())),
        store as Arc<dyn SettingsStore>,
        Arc::new(StaticStorageAuthority::granted()),
        Arc::new(RecordingNotifier::new()),
        StandardFolders::default(),
    );
    let snap = controller.snapshot().borrow().clone();
    assert_eq!(snap.selected_folder, Path::new("/media/holiday"));

    controller.shutdown().await;
}
