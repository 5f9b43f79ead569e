use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use serde_json::Value;

use crate::postings::domain::{ExamDate, ExamRecord, ExamResult};
use crate::postings::report::ViewModelBuilder;
use crate::postings::routing::RouteResolver;
use crate::postings::service::PostingService;
use crate::postings::source::{ExamQuery, ExamSource, FetchError};

pub(super) fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub(super) fn now() -> NaiveDateTime {
    at(2024, 1, 1)
}

pub(super) fn posting(exam_type: &str, position: &str) -> ExamRecord {
    let mut record = ExamRecord::new("川越市", position);
    record.exam_type = Some(exam_type.to_string());
    record
}

pub(super) fn with_dates(
    mut record: ExamRecord,
    application_end: Option<&str>,
    exam_date: Option<&str>,
) -> ExamRecord {
    record.application_end = application_end.map(ExamDate::parse);
    record.exam_date = exam_date.map(ExamDate::parse);
    record
}

pub(super) fn result(year: &str, ratio: f64) -> ExamResult {
    ExamResult {
        year: year.to_string(),
        applicants: 200,
        successful: 20,
        ratio,
    }
}

/// Postings for one municipality spanning every lifecycle state.
pub(super) fn kawagoe_postings() -> Vec<ExamRecord> {
    let mut administrative = with_dates(
        posting("行政職員採用試験", "一般行政職"),
        Some("2024-01-20"),
        Some("2024-03-10"),
    );
    administrative.recruit_number = Some(10);
    administrative.application_start = Some(ExamDate::parse("2023-12-01"));
    administrative.first_test = Some("教養試験".to_string());
    administrative.official_url = Some("https://example.com/kawagoe".to_string());
    administrative.results = vec![result("令和4年度", 6.5), result("令和5年度", 8.0)];

    let mut engineering = with_dates(
        posting("行政職員採用試験", "土木技術職"),
        Some("2023-12-01"),
        Some("2023-12-20"),
    );
    engineering.recruit_number = Some(3);
    engineering.results = vec![result("令和5年度", 2.0)];

    let mut librarian = with_dates(posting("資格免許職", "司書"), None, Some("2024-02-01"));
    librarian.recruit_number = Some(1);

    let unclassified = ExamRecord::new("川越市", "会計年度任用職員");

    vec![administrative, engineering, librarian, unclassified]
}

#[derive(Default)]
pub(super) struct StubSource {
    records: Vec<ExamRecord>,
    fail: bool,
    queries: Mutex<Vec<ExamQuery>>,
}

impl StubSource {
    pub(super) fn with_records(records: Vec<ExamRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn queries(&self) -> Vec<ExamQuery> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }
}

impl ExamSource for StubSource {
    async fn fetch(&self, query: &ExamQuery) -> Result<Vec<ExamRecord>, FetchError> {
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(query.clone());
        if self.fail {
            return Err(FetchError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(self
            .records
            .iter()
            .filter(|record| record.municipality == query.municipality)
            .cloned()
            .collect())
    }
}

pub(super) fn service(source: Arc<StubSource>) -> Arc<PostingService<Arc<StubSource>>> {
    Arc::new(PostingService::new(
        source,
        ViewModelBuilder::default(),
        RouteResolver::default(),
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}
