//! Widget Timer - A home-screen countdown widget daemon
//!
//! This is the main entry point for the widget-timer application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use widget_timer::{
    api::create_router,
    config::Config,
    services::{check_inhibit_available, CommandAlarm, InhibitWakeLocks, LedgerWakeLocks, WakeLockProvider},
    state::{AppState, SharedPreferences, WidgetPreferences},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("widget_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting widget-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, prefs={}",
        config.host,
        config.port,
        config.prefs.display()
    );

    let store = SharedPreferences::open(&config.prefs)?;
    let prefs = WidgetPreferences::new(Arc::new(store));

    // systemd-inhibit backs the wake locks unless it is missing or disabled
    let wake_locks: Arc<dyn WakeLockProvider> = if config.no_inhibit {
        info!("Wake locks tracked in-process only");
        Arc::new(LedgerWakeLocks::new())
    } else {
        match check_inhibit_available().await {
            Ok(()) => Arc::new(InhibitWakeLocks::new()),
            Err(e) => {
                warn!("{}, falling back to in-process wake locks", e);
                Arc::new(LedgerWakeLocks::new())
            }
        }
    };

    let alarm = if config.alarm_command.is_empty() {
        info!("No alarm command configured, alarms will only be logged");
        CommandAlarm::silent()
    } else {
        CommandAlarm::new(config.alarm_command.clone())
    };

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        prefs,
        Arc::new(alarm),
        wake_locks,
    ));

    // Draw the label of every widget placed in an earlier session
    state.restore_labels();

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /widgets/:id/configure      - Configure a placed widget");
    info!("  POST   /widgets/:id/toggle         - Tap a widget (start/stop)");
    info!("  DELETE /widgets/:id                - Remove a widget");
    info!("  GET    /widgets[/:id]              - Widget faces and state");
    info!("  GET    /notifications              - Posted notifications");
    info!("  POST   /notifications/:id/dismiss  - Tap a notification");
    info!("  POST   /display                    - Report display on/off");
    info!("  GET    /status                     - Running countdowns");
    info!("  GET    /health                     - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
