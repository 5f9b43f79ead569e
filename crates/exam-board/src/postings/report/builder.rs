use super::super::domain::{validate_records, ExamDate, ExamRecord, ExamStatus, RecordError};
use super::super::grouping::{group, ExamGroup};
use super::super::ordering::sort_ranked;
use super::super::overrides::LinkOverrides;
use super::super::results::{latest, newest_first};
use super::super::slug;
use super::super::status::{classify, days_remaining, urgency};
use super::stats::{flat_stats, summary_stats};
use super::views::{
    GroupView, RecordView, ScheduleEntry, ScheduleKind, TestStage, ViewItems, ViewMode,
    ViewModel, ViewParams,
};
use crate::config::RoutingConfig;
use chrono::NaiveDateTime;
use tracing::debug;

const RECRUIT_PLACEHOLDER: &str = "-";

/// Turns fetched records into the view model for one request.
#[derive(Debug, Clone)]
pub struct ViewModelBuilder {
    detail_base_path: String,
    overrides: LinkOverrides,
}

impl Default for ViewModelBuilder {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

impl ViewModelBuilder {
    pub fn new(detail_base_path: impl Into<String>, overrides: LinkOverrides) -> Self {
        Self {
            detail_base_path: detail_base_path.into(),
            overrides,
        }
    }

    pub fn from_config(routing: &RoutingConfig) -> Self {
        Self::new(
            routing.detail_base_path.clone(),
            LinkOverrides::parse_lenient(routing.link_overrides.as_deref()),
        )
    }

    /// Builds the view model. Empty input yields a `no_results` model; only blank
    /// identity fields are rejected.
    pub fn build(
        &self,
        records: &[ExamRecord],
        params: ViewParams,
    ) -> Result<ViewModel, RecordError> {
        validate_records(records)?;

        let now = params.now;
        let (items, stats) = match params.mode {
            ViewMode::Summary => {
                let mut groups: Vec<GroupView> = group(records, now)
                    .into_iter()
                    .map(|group| self.group_view(&params.municipality, group, now))
                    .collect();
                sort_ranked(&mut groups);
                let stats = summary_stats(&groups);
                (ViewItems::Groups(groups), stats)
            }
            ViewMode::Detail { .. } | ViewMode::Flat { .. } => {
                let filter = params.mode.exam_type_filter();
                let mut views: Vec<RecordView> = records
                    .iter()
                    .filter(|record| {
                        filter.map_or(true, |exam_type| record.group_key() == exam_type)
                    })
                    .map(|record| record_view(record, now))
                    .collect();
                sort_ranked(&mut views);
                let stats = flat_stats(&views);
                (ViewItems::Records(views), stats)
            }
        };

        let official_url = match params.mode {
            ViewMode::Detail { .. } => items
                .records()
                .and_then(|records| records.first())
                .and_then(|record| record.official_url.clone()),
            _ => None,
        };

        debug!(
            municipality = %params.municipality,
            items = items.len(),
            "built exam view model"
        );

        Ok(ViewModel {
            title: params.title(),
            no_results: items.is_empty(),
            params,
            items,
            stats,
            official_url,
        })
    }

    /// Summary link for an exam type: the override when configured, otherwise the detail slug path.
    pub fn detail_link(&self, municipality: &str, exam_type: &str) -> String {
        match self.overrides.get(exam_type) {
            Some(url) => url.to_string(),
            None => format!(
                "{}/{}/",
                self.detail_base_path,
                slug::encode(municipality, exam_type)
            ),
        }
    }

    fn group_view(&self, municipality: &str, group: ExamGroup, now: NaiveDateTime) -> GroupView {
        let mut records: Vec<RecordView> = group
            .records
            .iter()
            .map(|record| record_view(record, now))
            .collect();
        sort_ranked(&mut records);

        let status = records
            .iter()
            .map(|record| record.status)
            .reduce(|best, next| {
                if next.priority() > best.priority() {
                    next
                } else {
                    best
                }
            })
            .unwrap_or(ExamStatus::Upcoming);

        GroupView {
            slug: slug::encode(municipality, &group.exam_type),
            link: self.detail_link(municipality, &group.exam_type),
            status,
            status_label: status.label(),
            record_count: records.len(),
            total_positions: group.total_positions,
            active_count: group.active_count,
            upcoming_count: group.upcoming_count,
            latest_exam_date: group.latest_exam_date.as_ref().map(ExamDate::display),
            latest_exam_instant: group.latest_exam_date.as_ref().and_then(ExamDate::instant),
            exam_type: group.exam_type,
            records,
        }
    }
}

pub(crate) fn record_view(record: &ExamRecord, now: NaiveDateTime) -> RecordView {
    let status = classify(record, now);
    let urgency = urgency(record, now);
    let days_remaining = days_remaining(record, now);

    RecordView {
        municipality: record.municipality.clone(),
        exam_type: record.group_key().to_string(),
        position: record.position.clone(),
        recruit_number: record.recruit_number,
        recruit_label: record
            .recruit_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| RECRUIT_PLACEHOLDER.to_string()),
        age_requirement: record.age_requirement.clone(),
        status,
        status_label: status.label(),
        urgency,
        urgency_label: urgency.badge(days_remaining),
        days_remaining,
        application_start: display(record.application_start.as_ref()),
        application_end: display(record.application_end.as_ref()),
        exam_date: display(record.exam_date.as_ref()),
        application_period: application_period(record),
        schedule: schedule(record),
        tests: test_stages(record),
        latest_result: latest(&record.results).cloned(),
        results: newest_first(&record.results).into_iter().cloned().collect(),
        official_url: record.official_url.clone(),
        exam_instant: record.exam_instant(),
    }
}

fn display(date: Option<&ExamDate>) -> String {
    date.map(ExamDate::display).unwrap_or_default()
}

/// `start ～ end`, `～ end`, or `start ～`; `None` when neither side renders.
pub fn application_period(record: &ExamRecord) -> Option<String> {
    let start = display(record.application_start.as_ref());
    let end = display(record.application_end.as_ref());

    match (start.is_empty(), end.is_empty()) {
        (false, false) => Some(format!("{start} ～ {end}")),
        (true, false) => Some(format!("～ {end}")),
        (false, true) => Some(format!("{start} ～")),
        (true, true) => None,
    }
}

fn schedule(record: &ExamRecord) -> Vec<ScheduleEntry> {
    [
        (ScheduleKind::ApplicationStart, &record.application_start),
        (ScheduleKind::ApplicationEnd, &record.application_end),
        (ScheduleKind::ExamDate, &record.exam_date),
    ]
    .into_iter()
    .filter_map(|(kind, date)| {
        let date = display(date.as_ref());
        (!date.is_empty()).then(|| ScheduleEntry {
            kind,
            label: kind.label(),
            date,
        })
    })
    .collect()
}

fn test_stages(record: &ExamRecord) -> Vec<TestStage> {
    [&record.first_test, &record.second_test, &record.third_test]
        .into_iter()
        .zip(1u8..)
        .filter_map(|(content, stage)| {
            content.as_ref().map(|content| TestStage {
                stage,
                label: format!("第{stage}次試験"),
                content: content.clone(),
            })
        })
        .collect()
}
