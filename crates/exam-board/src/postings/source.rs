use super::domain::ExamRecord;
use crate::config::SourceConfig;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Parameters for one fetch against the data endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamQuery {
    pub municipality: String,
    pub exam_type: Option<String>,
}

impl ExamQuery {
    pub fn municipality(municipality: impl Into<String>) -> Self {
        Self {
            municipality: municipality.into(),
            exam_type: None,
        }
    }

    pub fn with_exam_type(mut self, exam_type: impl Into<String>) -> Self {
        self.exam_type = Some(exam_type.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("exam data request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("exam data endpoint answered {status}")]
    Status { status: StatusCode },
    #[error("exam data payload is not a list of exam records: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Supplies raw exam records for a municipality. Implementations never retry.
pub trait ExamSource: Send + Sync {
    fn fetch(
        &self,
        query: &ExamQuery,
    ) -> impl Future<Output = Result<Vec<ExamRecord>, FetchError>> + Send;
}

impl<T: ExamSource> ExamSource for Arc<T> {
    async fn fetch(&self, query: &ExamQuery) -> Result<Vec<ExamRecord>, FetchError> {
        self.as_ref().fetch(query).await
    }
}

/// Fetches records with `GET {api_url}?municipality=..&examType=..`.
#[derive(Debug, Clone)]
pub struct HttpExamSource {
    client: Client,
    api_url: Url,
}

impl HttpExamSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn request_url(&self, query: &ExamQuery) -> Url {
        let mut url = self.api_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("municipality", &query.municipality);
            if let Some(exam_type) = query.exam_type.as_deref() {
                pairs.append_pair("examType", exam_type);
            }
        }
        url
    }
}

impl ExamSource for HttpExamSource {
    async fn fetch(&self, query: &ExamQuery) -> Result<Vec<ExamRecord>, FetchError> {
        let url = self.request_url(query);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(municipality = %query.municipality, %status, "exam data endpoint rejected request");
            return Err(FetchError::Status { status });
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let records: Vec<ExamRecord> = serde_json::from_slice(&body).map_err(FetchError::Decode)?;
        debug!(
            municipality = %query.municipality,
            count = records.len(),
            "fetched exam records"
        );
        Ok(records)
    }
}
