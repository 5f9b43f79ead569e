use std::time::Duration;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use exam_board::config::SourceConfig;
use exam_board::postings::{ExamQuery, ExamSource, FetchError, HttpExamSource};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Deserialize)]
struct EchoQuery {
    municipality: String,
    #[serde(rename = "examType")]
    exam_type: Option<String>,
}

async fn exams(Query(query): Query<EchoQuery>) -> Json<Value> {
    Json(json!([
        {
            "municipality": query.municipality,
            "exam_type": query.exam_type.unwrap_or_default(),
            "position": "一般行政職",
            "recruit_number": 5
        }
    ]))
}

async fn spawn_endpoint() -> String {
    let app = Router::new()
        .route("/api/exam-api.php", get(exams))
        .route(
            "/broken",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route("/garbled", get(|| async { "<html>not json</html>" }));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server runs");
    });
    format!("http://{addr}")
}

fn source(url: String) -> HttpExamSource {
    HttpExamSource::new(&SourceConfig {
        api_url: url.parse().expect("valid url"),
        timeout: Duration::from_secs(5),
    })
    .expect("client builds")
}

#[tokio::test]
async fn fetches_and_decodes_records() {
    let base = spawn_endpoint().await;
    let source = source(format!("{base}/api/exam-api.php"));

    let records = source
        .fetch(&ExamQuery::municipality("川越市").with_exam_type("行政職員採用試験"))
        .await
        .expect("fetch succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].municipality, "川越市");
    assert_eq!(records[0].exam_type.as_deref(), Some("行政職員採用試験"));
    assert_eq!(records[0].recruit_number, Some(5));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let base = spawn_endpoint().await;
    let error = source(format!("{base}/broken"))
        .fetch(&ExamQuery::municipality("川越市"))
        .await
        .expect_err("status error");

    assert!(matches!(
        error,
        FetchError::Status { status } if status.as_u16() == 503
    ));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let base = spawn_endpoint().await;
    let error = source(format!("{base}/garbled"))
        .fetch(&ExamQuery::municipality("川越市"))
        .await
        .expect_err("decode error");

    assert!(matches!(error, FetchError::Decode(_)));
}
