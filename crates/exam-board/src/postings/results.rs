use super::domain::ExamResult;
use std::cmp::Reverse;

/// Numeric rank of a fiscal-year label: its digits read as one integer, `0` when there are none.
pub fn year_rank(year: &str) -> u64 {
    let digits: String = year.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Result history ordered newest first. Equal ranks keep their input order.
pub fn newest_first(results: &[ExamResult]) -> Vec<&ExamResult> {
    let mut sorted: Vec<&ExamResult> = results.iter().collect();
    sorted.sort_by_key(|result| Reverse(year_rank(&result.year)));
    sorted
}

pub fn latest(results: &[ExamResult]) -> Option<&ExamResult> {
    newest_first(results).into_iter().next()
}
