use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredBlobs, ConfiguredStore};
use crate::routes::{file_routes, with_portal_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hr_portal::config::AppConfig;
use hr_portal::error::AppError;
use hr_portal::telemetry;
use hr_portal::workflows::Portal;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(ConfiguredStore::from_config(&config.store));
    let blobs = Arc::new(ConfiguredBlobs::from_config(&config.blobs));
    info!(
        store = store.label(),
        blobs = blobs.label(),
        write_strategy = ?config.write_strategy,
        "storage configured"
    );
    let portal = Portal::new(store, blobs.clone(), config.write_strategy);

    let app = with_portal_routes(portal.router().merge(file_routes(blobs)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hr portal api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
