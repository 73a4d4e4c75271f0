use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredCatalog};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use card_advisor::catalog::CatalogSource;
use card_advisor::config::AppConfig;
use card_advisor::error::AppError;
use card_advisor::recommend::{ImageResolver, RecommendationEngine, RecommendationService};
use card_advisor::telemetry;
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
    if let Some(catalog) = args.catalog.take() {
        config.catalog.path = catalog;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = Arc::new(ConfiguredCatalog::from_config(&config.catalog));
    // warms the cache; a missing catalog is served as unavailable, not fatal
    if !source.load().status.is_loaded() {
        warn!(catalog = %config.catalog.path.display(), "starting without a readable card catalog");
    }
    let service = Arc::new(RecommendationService::new(
        source,
        RecommendationEngine::default(),
        ImageResolver::new(config.catalog.image_dir.clone()),
    ));

    let app = with_recommendation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        catalog = %config.catalog.path.display(),
        cache = config.catalog.cache,
        "card recommendation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
