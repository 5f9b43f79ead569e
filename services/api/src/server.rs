use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use exam_board::config::AppConfig;
use exam_board::error::AppError;
use exam_board::postings::{HttpExamSource, PostingService, RouteResolver, ViewModelBuilder};
use exam_board::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = HttpExamSource::new(&config.source)?;
    let builder = ViewModelBuilder::from_config(&config.routing);
    let service = Arc::new(PostingService::new(
        source,
        builder,
        RouteResolver::default(),
    ));

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        api_url = %config.source.api_url,
        detail_base_path = %config.routing.detail_base_path,
        "exam board service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
