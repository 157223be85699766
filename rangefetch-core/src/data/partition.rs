//! Splits a lookback span into sub-ranges sized to the export's row cap.
//!
//! Windows walk backward from `today`. Window `i` ends `i` windows before
//! today and starts the day after window `i + 1` ends, so the list is
//! contiguous and non-overlapping. Month subtraction clamps to the last day
//! of the target month (March 31 minus one month is February 28/29), which
//! keeps every generated date valid.

use super::provider::DataError;
use crate::domain::{DateRange, Granularity};
use chrono::{Days, Months, NaiveDate};

/// Number of windows needed for `lookback_years` at `granularity`.
pub fn units_for(lookback_years: u32, granularity: Granularity) -> Result<u32, DataError> {
    granularity.windows_for(lookback_years).ok_or_else(|| {
        DataError::Config(format!("lookback of {lookback_years} years is too large"))
    })
}

/// Build `units` windows ending at `today`, newest first.
///
/// Callers that probe or consolidate need the list oldest first and must
/// reverse it.
pub fn partition(
    today: NaiveDate,
    units: u32,
    granularity: Granularity,
) -> Result<Vec<DateRange>, DataError> {
    let step = granularity.months_per_window();

    (0..units)
        .map(|i| {
            let end = months_before(today, step * i)?;
            let older_end = months_before(today, step * (i + 1))?;
            let start = older_end.checked_add_days(Days::new(1)).ok_or_else(|| {
                DataError::InvalidRange(format!("day after {older_end} is out of range"))
            })?;
            DateRange::new(start, end)
        })
        .collect()
}

fn months_before(date: NaiveDate, months: u32) -> Result<NaiveDate, DataError> {
    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| DataError::InvalidRange(format!("{date} minus {months} months")))
}
