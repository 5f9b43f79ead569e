//! Exam posting engine: status classification, result selection, grouping,
//! ordering, slug routing, and the view models handed to rendering.
//!
//! Everything here except [`source`] and [`router`] is synchronous and free of
//! side effects; the evaluation instant is always passed in.

pub mod domain;
pub mod grouping;
pub mod ordering;
pub mod overrides;
pub mod report;
pub mod results;
pub mod router;
pub mod routing;
pub mod service;
pub mod slug;
pub mod source;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    validate_records, ExamDate, ExamRecord, ExamResult, ExamStatus, RecordError, Urgency,
    UNCLASSIFIED,
};
pub use grouping::{group, ExamGroup};
pub use ordering::{rank, sort_ranked, Ranked};
pub use overrides::{LinkOverrides, OverrideError};
pub use report::{
    GroupView, Presentation, RecordView, ViewItems, ViewMode, ViewModel, ViewModelBuilder,
    ViewParams, ViewStats,
};
pub use results::{latest, year_rank};
pub use router::postings_router;
pub use routing::{RouteError, RouteOrigin, RouteParams, RouteQuery, RouteResolver};
pub use service::{PostingService, PostingServiceError};
pub use slug::{SlugError, SlugParts};
pub use source::{ExamQuery, ExamSource, FetchError, HttpExamSource};
pub use status::{classify, days_remaining, urgency};
