use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_shortlist_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cv_shortlist::config::AppConfig;
use cv_shortlist::error::AppError;
use cv_shortlist::screening::FieldMatcher;
use cv_shortlist::telemetry;
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

    // Reject an unusable skill list before binding.
    FieldMatcher::new(config.screening.skill_keywords.as_slice())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let screening = Arc::new(config.screening.clone());
    let app = with_shortlist_routes(screening)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_ol = %config.screening.criteria.min_ol_grade,
        min_al = %config.screening.criteria.min_al_grade,
        require_experience = config.screening.criteria.require_experience,
        "cv shortlist service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
