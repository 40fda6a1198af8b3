use crate::cli::ServeArgs;
use crate::demo::seed_fleet;
use crate::infra::AppState;
use crate::routes::with_vendor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vendor_intel::config::AppConfig;
use vendor_intel::error::AppError;
use vendor_intel::intelligence::VendorIntelligence;
use vendor_intel::telemetry;

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

    // Seeded in-memory fleet until the platform store adapter lands.
    let repository = Arc::new(seed_fleet());
    let engine = Arc::new(VendorIntelligence::new(
        repository,
        config.scoring.scoring_config(),
    ));

    let app = with_vendor_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "vendor intelligence engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
