use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{parse_instant, ExamRecord};
use super::report::{ViewMode, ViewModel, ViewParams};
use super::routing::{RouteParams, RouteQuery};
use super::service::PostingService;
use crate::error::AppError;
use super::source::ExamSource;

/// Router builder exposing the view-model endpoints.
pub fn postings_router<S>(service: Arc<PostingService<S>>) -> Router
where
    S: ExamSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/municipalities/:municipality/exams",
            get(list_handler::<S>),
        )
        .route("/api/v1/exams/detail/*path", get(detail_handler::<S>))
        .route("/api/v1/exams/view", post(view_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub style: Option<String>,
    pub exam_type: Option<String>,
    pub now: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NowQuery {
    pub now: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub municipality: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub exam_type: Option<String>,
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub records: Vec<ExamRecord>,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub route: RouteParams,
    #[serde(flatten)]
    pub view: ViewModel,
}

/// Evaluation instant for a request: the explicit `now` when given, local time otherwise.
pub fn resolve_now(raw: Option<&str>) -> Result<NaiveDateTime, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_instant(value).ok_or_else(|| format!("unrecognised date '{value}'")),
        None => Ok(Local::now().naive_local()),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<PostingService<S>>>,
    Path(municipality): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response
where
    S: ExamSource + 'static,
{
    let now = match resolve_now(query.now.as_deref()) {
        Ok(now) => now,
        Err(message) => return bad_request(message),
    };
    let mode = ViewMode::from_style(query.style.as_deref(), query.exam_type);

    match service.view(&municipality, mode, now).await {
        Ok(model) => (StatusCode::OK, Json(model)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<PostingService<S>>>,
    Path(path): Path<String>,
    Query(route_query): Query<RouteQuery>,
    Query(now_query): Query<NowQuery>,
) -> Response
where
    S: ExamSource + 'static,
{
    let now = match resolve_now(now_query.now.as_deref()) {
        Ok(now) => now,
        Err(message) => return bad_request(message),
    };
    let path = format!("/{}", path.trim_start_matches('/'));

    match service.detail(&path, &route_query, now).await {
        Ok((route, view)) => (StatusCode::OK, Json(DetailResponse { route, view })).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn view_handler<S>(
    State(service): State<Arc<PostingService<S>>>,
    Json(request): Json<ViewRequest>,
) -> Response
where
    S: ExamSource + 'static,
{
    let now = match resolve_now(request.now.as_deref()) {
        Ok(now) => now,
        Err(message) => return bad_request(message),
    };
    let mode = ViewMode::from_style(request.style.as_deref(), request.exam_type);
    let params = ViewParams::new(request.municipality, mode, now);

    match service.builder().build(&request.records, params) {
        Ok(model) => (StatusCode::OK, Json(model)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
