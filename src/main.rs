use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use dayahead::api::rest::{create_router, ApiState};
use dayahead::cache::slot_cache::SlotCache;
use dayahead::config::loader::AppConfig;
use dayahead::forecast::open_meteo::OpenMeteoClient;
use dayahead::observability::metrics::register_metrics;
use dayahead::observability::tracing::init_tracing;
use dayahead::scheduler::RefreshScheduler;
use dayahead::source::entsoe::EntsoeClient;
use dayahead::utils::task_supervisor::TaskSupervisor;

const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var(dayahead::ENV_VAR).unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(&config.logging)?;
    register_metrics().context("registering metrics")?;
    info!("Starting day-ahead price service ({})", env);

    let token = config.entsoe.resolve_token()?;
    let source = Arc::new(EntsoeClient::new(&config.entsoe, token)?);
    let cache = Arc::new(SlotCache::new());
    let scheduler = Arc::new(RefreshScheduler::new(source, cache.clone(), &config.scheduler)?);

    // Nothing is served until every slot has been tried once.
    let reports = scheduler.run_pass().await;
    info!(
        "Initial refresh done: {} of {} slots available",
        cache.found_count(),
        reports.len()
    );

    let mut supervisor = TaskSupervisor::new();
    supervisor.spawn("price_refresh", scheduler.clone().run());

    let state = Arc::new(ApiState {
        cache,
        forecast: OpenMeteoClient::new(&config.forecast)?,
    });
    let app = create_router(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on {}", addr);

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    let result = tokio::select! {
        res = serve => res.context("http server"),
        err = watch_tasks(&mut supervisor) => Err(err.into()),
    };

    supervisor.shutdown_all();
    result
}

/// Resolves with the first background task failure.
async fn watch_tasks(supervisor: &mut TaskSupervisor) -> dayahead::error::Error {
    let mut ticker = tokio::time::interval(HEALTH_CHECK_INTERVAL);
    loop {
        ticker.tick().await;
        if let Err(e) = supervisor.check_health().await {
            error!("Background task failed, stopping: {}", e);
            return e;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping");
}
