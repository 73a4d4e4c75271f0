use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use card_advisor::catalog::CatalogSource;
use card_advisor::recommend::{recommendation_router, RecommendationService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_recommendation_routes<S>(
    service: Arc<RecommendationService<S>>,
) -> axum::Router
where
    S: CatalogSource + 'static,
{
    recommendation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_advisor::catalog::{CatalogLoad, CatalogLoader, StaticCatalogSource};
    use card_advisor::recommend::{ImageResolver, RecommendationEngine};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(readiness: Arc<AtomicBool>) -> axum::Router {
        let load: CatalogLoad = CatalogLoader::from_reader(Cursor::new(
            "カード名,年会費（税込）,国際ブランド\nAカード,無料,VISA\n",
        ));
        let service = Arc::new(RecommendationService::new(
            Arc::new(StaticCatalogSource::new(load)),
            RecommendationEngine::default(),
            ImageResolver::unchecked(),
        ));
        let state = AppState {
            readiness,
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_recommendation_routes(service).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(
                axum::http::Request::get(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let readiness = Arc::new(AtomicBool::new(false));
        let (status, _) = get(app(readiness.clone()), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, Ordering::Release);
        let (status, body) = get(app(readiness), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], json!("ready"));
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() {
        let (status, _) = get(app(Arc::new(AtomicBool::new(true))), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn recommendation_routes_are_mounted() {
        let (status, body) = get(app(Arc::new(AtomicBool::new(true))), "/api/v1/cards/options").await;
        assert_eq!(status, StatusCode::OK);
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(payload["groups"].is_array());
    }
}
