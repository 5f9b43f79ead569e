use super::domain::{RecordError, UNCLASSIFIED};
use super::report::{ViewMode, ViewModel, ViewModelBuilder, ViewParams};
use super::routing::{RouteError, RouteParams, RouteQuery, RouteResolver};
use super::source::{ExamQuery, ExamSource, FetchError};
use chrono::NaiveDateTime;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PostingServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Fetch-and-build pipeline. Each call is independent; nothing is cached between calls.
pub struct PostingService<S> {
    source: S,
    builder: ViewModelBuilder,
    resolver: RouteResolver,
}

impl<S> PostingService<S>
where
    S: ExamSource,
{
    pub fn new(source: S, builder: ViewModelBuilder, resolver: RouteResolver) -> Self {
        Self {
            source,
            builder,
            resolver,
        }
    }

    pub fn builder(&self) -> &ViewModelBuilder {
        &self.builder
    }

    pub async fn view(
        &self,
        municipality: &str,
        mode: ViewMode,
        now: NaiveDateTime,
    ) -> Result<ViewModel, PostingServiceError> {
        let mut query = ExamQuery::municipality(municipality);
        if let ViewMode::Detail { exam_type } = &mode {
            if exam_type != UNCLASSIFIED {
                query = query.with_exam_type(exam_type.clone());
            }
        }

        let records = self.source.fetch(&query).await.map_err(|error| {
            warn!(%municipality, %error, "exam data fetch failed");
            error
        })?;

        let model = self
            .builder
            .build(&records, ViewParams::new(municipality, mode, now))?;
        Ok(model)
    }

    /// Resolves the detail route from a request path and query, then builds the detail view.
    pub async fn detail(
        &self,
        path: &str,
        query: &RouteQuery,
        now: NaiveDateTime,
    ) -> Result<(RouteParams, ViewModel), PostingServiceError> {
        let route = self.resolver.resolve(path, query)?;
        let mode = ViewMode::Detail {
            exam_type: route.exam_type.clone(),
        };
        let model = self.view(&route.municipality, mode, now).await?;
        Ok((route, model))
    }
}
