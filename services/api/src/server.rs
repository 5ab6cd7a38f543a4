use crate::cli::ServeArgs;
use crate::infra::{AppState, SubmissionLimiterBackend};
use crate::routes::with_site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use buildsite::cms::SanityClient;
use buildsite::config::AppConfig;
use buildsite::content::ContentService;
use buildsite::error::AppError;
use buildsite::submissions::SubmissionService;
use buildsite::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let cms = Arc::new(SanityClient::from_config(&config.cms)?);
    if config.cms.write_token.is_none() {
        warn!("no CMS write token configured; form submissions will be refused");
    }

    let limiter = SubmissionLimiterBackend::from_config(&config.rate_limit)?;
    info!(backend = limiter.name(), "submission rate limiter selected");

    let content_service = Arc::new(ContentService::new(cms.clone()));
    let submission_service = Arc::new(SubmissionService::new(cms, Arc::new(limiter)));

    let app = with_site_routes(
        content_service,
        submission_service,
        config.environment.exposes_error_details(),
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, dataset = %config.cms.dataset, "site api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
