//! Gantt chart server binary.
//!
//! Reads configuration once at startup (config file, then `DATABASE_URL` /
//! `PORT`), opens the store, and serves the trigger API until Ctrl-C.

use std::sync::Arc;

use gantt::autosave::AutoSaver;
use gantt::server::{AppState, GanttServer};
use gantt::store::open_store;
use gantt::sync::{Session, SyncController, SyncOptions};
use gantt::{GanttConfig, GanttError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, rejected_overrides) = GanttConfig::load_startup()?;
    let _log_guard = init_tracing(&config);

    tracing::info!("gantt-server starting");
    for rejected in &rejected_overrides {
        tracing::warn!("{rejected}");
    }

    let store = open_store(&config.database.url).map_err(GanttError::from)?;

    let controller = Arc::new(
        SyncController::new(Arc::new(store)).with_options(SyncOptions {
            validate_tasks: config.editor.validate_tasks,
        }),
    );
    let session = Session::new(config.session.owner_key()).shared();

    let server = GanttServer::start(
        AppState::new(Arc::clone(&controller), session.clone()),
        &config.server.host,
        config.server.port,
    )
    .await?;

    let autosave = config.autosave.enabled.then(|| {
        AutoSaver::new(Arc::clone(&controller), session.clone())
            .with_interval(config.autosave.interval())
            .run()
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    if let Some(handle) = autosave {
        handle.abort();
    }
    server.shutdown();

    tracing::info!("gantt-server shut down cleanly");
    Ok(())
}

/// Log to stderr, and to a daily-rolling file when `logging.log_dir` is set.
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(config: &GanttConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match &config.logging.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "gantt-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}
