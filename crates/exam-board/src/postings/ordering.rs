use super::domain::ExamStatus;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Anything that can be placed in an actionable-first listing.
pub trait Ranked {
    fn status(&self) -> ExamStatus;
    fn exam_instant(&self) -> Option<NaiveDateTime>;
}

/// Orders two statuses by priority, higher priority first.
pub fn rank(a: ExamStatus, b: ExamStatus) -> Ordering {
    b.priority().cmp(&a.priority())
}

/// Priority first, then earliest exam date; undated items trail dated ones.
pub fn compare<T: Ranked + ?Sized>(a: &T, b: &T) -> Ordering {
    rank(a.status(), b.status()).then_with(|| match (a.exam_instant(), b.exam_instant()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

pub fn sort_ranked<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| compare(a, b));
}
