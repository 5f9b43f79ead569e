use super::super::domain::{ExamResult, ExamStatus, Urgency};
use super::super::ordering::Ranked;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    Card,
    List,
    Table,
}

/// Which view the caller is building. Card, list, and table share one flat pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewMode {
    Detail {
        exam_type: String,
    },
    Flat {
        presentation: Presentation,
        exam_type: Option<String>,
    },
    Summary,
}

impl ViewMode {
    /// Maps a `style` parameter onto a mode. Unknown styles render as cards, and a
    /// detail request without an exam type degrades to the card listing.
    pub fn from_style(style: Option<&str>, exam_type: Option<String>) -> Self {
        let exam_type = exam_type.filter(|value| !value.trim().is_empty());
        let style = style.map(|s| s.trim().to_ascii_lowercase());

        match (style.as_deref(), exam_type) {
            (Some("summary"), _) => Self::Summary,
            (Some("detail"), Some(exam_type)) => Self::Detail { exam_type },
            (Some("list"), exam_type) => Self::Flat {
                presentation: Presentation::List,
                exam_type,
            },
            (Some("table"), exam_type) => Self::Flat {
                presentation: Presentation::Table,
                exam_type,
            },
            (_, exam_type) => Self::Flat {
                presentation: Presentation::Card,
                exam_type,
            },
        }
    }

    pub fn exam_type_filter(&self) -> Option<&str> {
        match self {
            Self::Detail { exam_type } => Some(exam_type),
            Self::Flat { exam_type, .. } => exam_type.as_deref(),
            Self::Summary => None,
        }
    }
}

/// Resolved request, echoed back so the renderer can build titles and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewParams {
    pub municipality: String,
    #[serde(flatten)]
    pub mode: ViewMode,
    pub now: NaiveDateTime,
}

impl ViewParams {
    pub fn new(municipality: impl Into<String>, mode: ViewMode, now: NaiveDateTime) -> Self {
        Self {
            municipality: municipality.into(),
            mode,
            now,
        }
    }

    pub fn detail(
        municipality: impl Into<String>,
        exam_type: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self::new(
            municipality,
            ViewMode::Detail {
                exam_type: exam_type.into(),
            },
            now,
        )
    }

    pub fn summary(municipality: impl Into<String>, now: NaiveDateTime) -> Self {
        Self::new(municipality, ViewMode::Summary, now)
    }

    pub fn flat(
        municipality: impl Into<String>,
        presentation: Presentation,
        now: NaiveDateTime,
    ) -> Self {
        Self::new(
            municipality,
            ViewMode::Flat {
                presentation,
                exam_type: None,
            },
            now,
        )
    }

    pub fn title(&self) -> String {
        match &self.mode {
            ViewMode::Detail { exam_type } => {
                format!("{} {} | 公務員試験情報", self.municipality, exam_type)
            }
            ViewMode::Flat { .. } | ViewMode::Summary => {
                format!("{} 公務員試験一覧", self.municipality)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    ApplicationStart,
    ApplicationEnd,
    ExamDate,
}

impl ScheduleKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicationStart => "申込開始",
            Self::ApplicationEnd => "申込締切",
            Self::ExamDate => "試験日",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub kind: ScheduleKind,
    pub label: &'static str,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestStage {
    pub stage: u8,
    pub label: String,
    pub content: String,
}

/// One posting, annotated for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub municipality: String,
    pub exam_type: String,
    pub position: String,
    pub recruit_number: Option<u32>,
    pub recruit_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_requirement: Option<String>,
    pub status: ExamStatus,
    pub status_label: &'static str,
    pub urgency: Urgency,
    pub urgency_label: String,
    pub days_remaining: Option<i64>,
    pub application_start: String,
    pub application_end: String,
    pub exam_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_period: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestStage>,
    pub latest_result: Option<ExamResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ExamResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    #[serde(skip)]
    pub(crate) exam_instant: Option<NaiveDateTime>,
}

impl Ranked for RecordView {
    fn status(&self) -> ExamStatus {
        self.status
    }

    fn exam_instant(&self) -> Option<NaiveDateTime> {
        self.exam_instant
    }
}

/// One exam type in the summary view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub exam_type: String,
    pub slug: String,
    pub link: String,
    pub status: ExamStatus,
    pub status_label: &'static str,
    pub record_count: usize,
    pub total_positions: u64,
    pub active_count: usize,
    pub upcoming_count: usize,
    pub latest_exam_date: Option<String>,
    pub records: Vec<RecordView>,
    #[serde(skip)]
    pub(crate) latest_exam_instant: Option<NaiveDateTime>,
}

impl Ranked for GroupView {
    fn status(&self) -> ExamStatus {
        self.status
    }

    fn exam_instant(&self) -> Option<NaiveDateTime> {
        self.latest_exam_instant
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum ViewItems {
    Records(Vec<RecordView>),
    Groups(Vec<GroupView>),
}

impl ViewItems {
    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Groups(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Option<&[RecordView]> {
        match self {
            Self::Records(records) => Some(records),
            Self::Groups(_) => None,
        }
    }

    pub fn groups(&self) -> Option<&[GroupView]> {
        match self {
            Self::Groups(groups) => Some(groups),
            Self::Records(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewStats {
    Flat {
        record_count: usize,
        total_recruits: u64,
        average_ratio: f64,
    },
    Summary {
        group_count: usize,
        total_positions: u64,
    },
}

/// Everything the renderer needs for one widget or page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub params: ViewParams,
    pub no_results: bool,
    pub items: ViewItems,
    pub stats: ViewStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
}
