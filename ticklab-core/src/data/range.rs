//! Date-range selection over loaded bars.

use super::ingest::DataError;
use crate::domain::Bar;
use chrono::{Duration, NaiveDate};

/// Length of the default timeline in calendar days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// One year of calendar days ending at the last bar.
pub fn default_range(bars: &[Bar]) -> Option<(NaiveDate, NaiveDate)> {
    let end = bars.last()?.date;
    Some((end - Duration::days(DEFAULT_LOOKBACK_DAYS), end))
}

/// Bars whose date lies in `start..=end`.
pub fn select_range(
    bars: &[Bar],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Bar>, DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }
    let selected: Vec<Bar> = bars
        .iter()
        .filter(|b| b.date >= start && b.date <= end)
        .cloned()
        .collect();
    if selected.is_empty() {
        return Err(DataError::EmptyRange { start, end });
    }
    Ok(selected)
}
