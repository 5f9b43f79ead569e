use super::domain::{ExamRecord, ExamStatus, Urgency};
use chrono::NaiveDateTime;

const SECONDS_PER_DAY: i64 = 86_400;
const URGENT_WITHIN_DAYS: i64 = 7;
const SOON_WITHIN_DAYS: i64 = 30;

/// Four-state lifecycle classification. First matching rule wins; a date equal
/// to `now` never matches its rule and falls through.
pub fn classify(record: &ExamRecord, now: NaiveDateTime) -> ExamStatus {
    let application_end = record.application_end_instant();
    let exam_date = record.exam_instant();

    match (application_end, exam_date) {
        (Some(end), _) if now < end => ExamStatus::Active,
        (_, Some(exam)) if now < exam => ExamStatus::ClosedNoExam,
        (_, Some(exam)) if now > exam => ExamStatus::Finished,
        _ => ExamStatus::Upcoming,
    }
}

/// Whole days until the application deadline, rounded up. `None` without a usable deadline.
pub fn days_remaining(record: &ExamRecord, now: NaiveDateTime) -> Option<i64> {
    let end = record.application_end_instant()?;
    let seconds = (end - now).num_seconds();
    Some(-(-seconds).div_euclid(SECONDS_PER_DAY))
}

/// Countdown bucket for list badges. Deliberately ignores the exam date.
pub fn urgency(record: &ExamRecord, now: NaiveDateTime) -> Urgency {
    match days_remaining(record, now) {
        None => Urgency::Available,
        Some(days) if days < 0 => Urgency::Expired,
        Some(days) if days <= URGENT_WITHIN_DAYS => Urgency::Urgent,
        Some(days) if days <= SOON_WITHIN_DAYS => Urgency::Soon,
        Some(_) => Urgency::Available,
    }
}
