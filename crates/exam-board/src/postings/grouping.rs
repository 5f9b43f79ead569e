use super::domain::{ExamDate, ExamRecord, ExamStatus};
use super::status::classify;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Records sharing one exam type, with the aggregates the summary view needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamGroup {
    pub exam_type: String,
    pub records: Vec<ExamRecord>,
    pub total_positions: u64,
    pub active_count: usize,
    pub upcoming_count: usize,
    pub latest_exam_date: Option<ExamDate>,
}

impl ExamGroup {
    fn new(exam_type: &str) -> Self {
        Self {
            exam_type: exam_type.to_string(),
            records: Vec::new(),
            total_positions: 0,
            active_count: 0,
            upcoming_count: 0,
            latest_exam_date: None,
        }
    }

    fn push(&mut self, record: &ExamRecord, status: ExamStatus) {
        self.total_positions += u64::from(record.recruit_number.unwrap_or(0));
        match status {
            ExamStatus::Active => self.active_count += 1,
            ExamStatus::Upcoming => self.upcoming_count += 1,
            ExamStatus::ClosedNoExam | ExamStatus::Finished => {}
        }

        if let Some(candidate) = record.exam_date.as_ref().filter(|d| d.instant().is_some()) {
            let newer = match self.latest_exam_date.as_ref().and_then(ExamDate::instant) {
                Some(current) => candidate.instant() > Some(current),
                None => true,
            };
            if newer {
                self.latest_exam_date = Some(candidate.clone());
            }
        }

        self.records.push(record.clone());
    }
}

/// Partitions records by exam type. Groups appear in the order their key is first seen.
pub fn group(records: &[ExamRecord], now: NaiveDateTime) -> Vec<ExamGroup> {
    let mut groups: Vec<ExamGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let key = record.group_key();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(ExamGroup::new(key));
            groups.len() - 1
        });
        groups[slot].push(record, classify(record, now));
    }

    groups
}
