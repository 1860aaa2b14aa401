//! Query filter selection.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// The single filter honored by an order query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderQuery {
    /// Exact control number lookup (zero or one result).
    ByControlNumber(String),
    /// Every order registered on the given calendar day.
    RegisteredOn(NaiveDate),
    /// Every stored order, in storage order.
    All,
}

impl OrderQuery {
    /// Pick the filter to honor. A control number wins over a date; with neither,
    /// everything is listed.
    pub fn from_filters(control_number: Option<String>, date: Option<NaiveDate>) -> Self {
        match (control_number, date) {
            (Some(control_number), _) => OrderQuery::ByControlNumber(control_number),
            (None, Some(date)) => OrderQuery::RegisteredOn(date),
            (None, None) => OrderQuery::All,
        }
    }
}

/// Closed timestamp interval covering `date`: `[00:00:00, 23:59:59]`.
///
/// The upper bound is whole-second; a registration at `23:59:59.5` falls outside.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::seconds(86_399);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[test]
    fn control_number_takes_priority_over_date() {
        assert_eq!(
            OrderQuery::from_filters(Some("123".to_string()), Some(day())),
            OrderQuery::ByControlNumber("123".to_string())
        );
    }

    #[test]
    fn date_is_used_without_control_number() {
        assert_eq!(OrderQuery::from_filters(None, Some(day())), OrderQuery::RegisteredOn(day()));
    }

    #[test]
    fn no_filter_lists_everything() {
        assert_eq!(OrderQuery::from_filters(None, None), OrderQuery::All);
    }

    #[test]
    fn day_bounds_cover_whole_seconds_of_the_day() {
        let (start, end) = day_bounds(day());
        assert_eq!(start, day().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end, day().and_hms_opt(23, 59, 59).unwrap());
    }
}
