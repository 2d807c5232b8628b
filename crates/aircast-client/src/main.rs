//! AirCast client application entry point.
//!
//! Wires together the message bus, the foreground UI controller, the
//! capture-authorization flow, and the infrastructure adapters, then runs
//! until a shutdown signal arrives.
//!
//! # Wiring (for beginners)
//!
//! ```text
//! main()
//!  └─ MessageBus::new()            -- the one bus instance, passed by clone
//!  └─ FileSettingsStore            -- persisted browsing preferences
//!  └─ CaptureAuthorizationFlow     -- consent → CaptureStartRequested
//!  └─ UiController::spawn()        -- subscribes as "ui", owns the state
//!  └─ ctrl-c  ─► broadcast(ExitRequested) ─► controller detaches
//! ```
//!
//! # Platform adapters
//!
//! The consent provider and storage authority used here are the scripted /
//! static stand-ins.  In a shipping build they are replaced by:
//! - the OS screen-projection consent dialog,
//! - the OS storage-permission prompt,
//! - a windowed toast surface instead of [`TracingNotifier`].

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aircast_client::application::browse_folder::StandardFolders;
use aircast_client::application::capture_flow::CaptureAuthorizationFlow;
use aircast_client::application::message_bus::MessageBus;
use aircast_client::application::ui_controller::UiController;
use aircast_client::infrastructure::consent::ScriptedConsentProvider;
use aircast_client::infrastructure::notify::TracingNotifier;
use aircast_client::infrastructure::permissions::StaticStorageAuthority;
use aircast_client::infrastructure::settings::{
    FileSettingsStore, InMemorySettingsStore, SettingsStore,
};
use aircast_core::CastEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("AirCast client starting");

    // The one bus instance; every component gets a clone of this handle.
    let bus = MessageBus::new();

    // Persisted browsing preferences, with an in-memory fallback when the
    // platform config directory cannot be determined.
    let store: Arc<dyn SettingsStore> = match FileSettingsStore::at_default_location() {
        Ok(store) => {
            info!(path = %store.path().display(), "using settings file");
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "settings will not persist this session");
            Arc::new(InMemorySettingsStore::new())
        }
    };

    // ── Platform adapters ─────────────────────────────────────────────────────
    // Scripted / static stand-ins; see the module docs for what replaces
    // them in a shipping build.
    let consent = Arc::new(ScriptedConsentProvider::granting());
    let capture_flow = CaptureAuthorizationFlow::new(bus.clone(), consent);
    let authority = Arc::new(StaticStorageAuthority::granted());
    let notifier = Arc::new(TracingNotifier);

    // ── Foreground controller ─────────────────────────────────────────────────
    let controller = UiController::spawn(
        bus.clone(),
        capture_flow,
        store,
        authority,
        notifier,
        StandardFolders::default(),
    );

    // Log snapshot changes in place of a rendering layer.
    let mut snapshots = controller.snapshot();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snap = snapshots.borrow().clone();
            info!(
                subtitle = %snap.subtitle,
                actions = snap.navigation.len(),
                folder = %snap.selected_folder.display(),
                "ui snapshot updated"
            );
        }
    });

    // Run until ctrl-c, then broadcast the exit and wait for the
    // controller to detach.
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    bus.broadcast(CastEvent::ExitRequested);
    controller.wait().await;

    info!("AirCast client stopped");
    Ok(())
}
