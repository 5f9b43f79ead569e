use chrono::NaiveDateTime;
use exam_board::error::AppError;
use exam_board::postings::domain::parse_instant;
use exam_board::postings::{ExamQuery, ExamRecord, ExamSource, FetchError, UNCLASSIFIED};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Serves a fixed set of records, filtered the way the remote endpoint filters them.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticExamSource {
    records: Arc<Vec<ExamRecord>>,
}

impl StaticExamSource {
    pub(crate) fn new(records: Vec<ExamRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

impl ExamSource for StaticExamSource {
    async fn fetch(&self, query: &ExamQuery) -> Result<Vec<ExamRecord>, FetchError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.municipality == query.municipality)
            .filter(|record| match query.exam_type.as_deref() {
                Some(exam_type) => record.group_key() == exam_type,
                None => true,
            })
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    parse_instant(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, or RFC 3339")
    })
}

/// Reads a JSON array of exam records in the data endpoint's shape.
pub(crate) fn load_records(path: &Path) -> Result<Vec<ExamRecord>, AppError> {
    let raw = fs::read_to_string(path)?;
    let records = serde_json::from_str(&raw)?;
    Ok(records)
}

pub(crate) fn is_unclassified(exam_type: &str) -> bool {
    exam_type == UNCLASSIFIED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(municipality: &str, exam_type: Option<&str>) -> ExamRecord {
        let mut record = ExamRecord::new(municipality, "一般行政職");
        record.exam_type = exam_type.map(str::to_string);
        record
    }

    #[tokio::test]
    async fn static_source_filters_like_the_endpoint() {
        let source = StaticExamSource::new(vec![
            record("川越市", Some("行政職員採用試験")),
            record("川越市", None),
            record("札幌市", Some("行政職員採用試験")),
        ]);

        let all = source
            .fetch(&ExamQuery::municipality("川越市"))
            .await
            .expect("fetch");
        assert_eq!(all.len(), 2);

        let typed = source
            .fetch(&ExamQuery::municipality("川越市").with_exam_type("行政職員採用試験"))
            .await
            .expect("fetch");
        assert_eq!(typed.len(), 1);
    }

    #[test]
    fn parse_now_accepts_date_only_values() {
        let parsed = parse_now("2024-01-01").expect("parses");
        assert_eq!(parsed.to_string(), "2024-01-01 00:00:00");
        assert!(parse_now("tomorrow").is_err());
    }

    #[test]
    fn load_records_reports_missing_file() {
        let result = load_records(Path::new("/nonexistent/postings.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
