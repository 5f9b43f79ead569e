use super::views::{GroupView, RecordView, ViewStats};

/// Recruit total and mean latest-result ratio; records without results count as zero.
pub(crate) fn flat_stats(records: &[RecordView]) -> ViewStats {
    let total_recruits = records
        .iter()
        .map(|record| u64::from(record.recruit_number.unwrap_or(0)))
        .sum();

    let ratio_sum: f64 = records
        .iter()
        .map(|record| {
            record
                .latest_result
                .as_ref()
                .map_or(0.0, |result| result.ratio)
        })
        .sum();
    let average_ratio = if records.is_empty() {
        0.0
    } else {
        ratio_sum / records.len() as f64
    };

    ViewStats::Flat {
        record_count: records.len(),
        total_recruits,
        average_ratio,
    }
}

pub(crate) fn summary_stats(groups: &[GroupView]) -> ViewStats {
    ViewStats::Summary {
        group_count: groups.len(),
        total_positions: groups.iter().map(|group| group.total_positions).sum(),
    }
}
