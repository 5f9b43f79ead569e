use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use exam_board::error::AppError;
use exam_board::postings::{postings_router, slug, ExamSource, PostingService, SlugParts};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct SlugQuery {
    pub(crate) municipality: String,
    #[serde(rename = "examType", alias = "exam_type")]
    pub(crate) exam_type: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SlugResponse {
    pub(crate) slug: String,
    pub(crate) text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecodeQuery {
    pub(crate) path: String,
}

pub(crate) fn with_service_routes<S>(service: Arc<PostingService<S>>) -> Router
where
    S: ExamSource + 'static,
{
    postings_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/slug", get(encode_slug_endpoint))
        .route("/api/v1/slug/decode", get(decode_slug_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

pub(crate) async fn encode_slug_endpoint(Query(query): Query<SlugQuery>) -> Json<SlugResponse> {
    Json(SlugResponse {
        slug: slug::encode(&query.municipality, &query.exam_type),
        text: slug::slug_text(&query.municipality, &query.exam_type),
    })
}

pub(crate) async fn decode_slug_endpoint(
    Query(query): Query<DecodeQuery>,
) -> Result<Json<SlugParts>, AppError> {
    Ok(Json(slug::decode(&query.path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::StaticExamSource;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::response::Response;
    use exam_board::postings::{ExamRecord, RouteResolver, ViewModelBuilder};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let mut record = ExamRecord::new("川越市", "一般行政職");
        record.exam_type = Some("行政職員採用試験".to_string());
        let service = Arc::new(PostingService::new(
            StaticExamSource::new(vec![record]),
            ViewModelBuilder::default(),
            RouteResolver::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(service).layer(Extension(state))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response: Response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body readable");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let (status, body) = get_json(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, _) = get_json(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn slug_endpoint_encodes_pairs() {
        let uri = format!(
            "/api/v1/slug?municipality={}&examType={}",
            urlencoding::encode("川越市"),
            urlencoding::encode("行政職員採用試験")
        );
        let (status, body) = get_json(app(true), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "川越市-行政職員採用試験");
        assert_eq!(body["slug"], slug::encode("川越市", "行政職員採用試験"));
    }

    #[tokio::test]
    async fn slug_decode_rejects_unseparated_segment() {
        let (status, body) = get_json(app(true), "/api/v1/slug/decode?path=kawagoe").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("kawagoe")));
    }

    #[tokio::test]
    async fn posting_routes_are_mounted_alongside_health_checks() {
        let uri = format!(
            "/api/v1/municipalities/{}/exams?style=summary&now=2024-01-01",
            urlencoding::encode("川越市")
        );
        let (status, body) = get_json(app(true), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["group_count"], 1);

        let (status, body) = get_json(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
