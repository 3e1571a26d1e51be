//! Date-window normalization
//!
//! Query parameters arrive untrusted. Every input maps to a valid window:
//! invalid values fall back to defaults and out-of-range values are clamped,
//! so there is no error path here.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::{datetime, format_description};
use time::{Date, Month, OffsetDateTime};

/// Earliest instant for which the archive is guaranteed to hold data
pub const ARCHIVE_EPOCH: OffsetDateTime = datetime!(2021-12-01 0:00 UTC);

/// Half-open interval `[since, until)` of capture instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    #[serde(with = "time::serde::rfc3339")]
    pub since: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub until: OffsetDateTime,
}

/// `?year=&month=` convention used by the archive-browsing route.
/// `month` is 1-based.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
}

/// `?sinceDate=&untilDate=` convention, RFC 3339 instants or `YYYY-MM-DD`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    #[serde(default)]
    pub since_date: Option<String>,
    #[serde(default)]
    pub until_date: Option<String>,
}

impl RangeQuery {
    pub fn is_empty(&self) -> bool {
        self.since_date.is_none() && self.until_date.is_none()
    }
}

impl DateWindow {
    /// Calendar month selected by `query`.
    ///
    /// - `year` defaults to the current year and is clamped to
    ///   `[epoch year, current year]`; non-numeric or zero counts as absent.
    /// - `month` defaults to the current month. When given, non-numeric
    ///   input becomes January, the value is clamped to `[1, 12]`, to no
    ///   later than the current month in the current year, and to no
    ///   earlier than the epoch month in the epoch year.
    pub fn from_month_query(query: &MonthQuery, epoch: OffsetDateTime, now: OffsetDateTime) -> Self {
        let current_year = now.year();
        let current_month = month_index(now.month());

        let year = parse_number(query.year.as_deref())
            .unwrap_or(current_year)
            .min(current_year)
            .max(epoch.year());

        let mut month = match query.month.as_deref() {
            None => current_month,
            Some(raw) => {
                let requested = parse_number(Some(raw))
                    .unwrap_or(1)
                    .saturating_sub(1)
                    .clamp(0, 11);
                if year == current_year {
                    requested.min(current_month)
                } else {
                    requested
                }
            }
        };

        if year == epoch.year() {
            month = month.max(month_index(epoch.month()));
        }

        Self {
            since: first_instant_of(year, month),
            until: first_instant_of(year, month + 1),
        }
    }

    /// Explicit range. `since` lands in `[epoch, now]` and `until` in
    /// `[since, now]`; unparseable bounds fall back to `epoch` and `now`.
    pub fn from_range_query(query: &RangeQuery, epoch: OffsetDateTime, now: OffsetDateTime) -> Self {
        let since = query
            .since_date
            .as_deref()
            .and_then(parse_instant)
            .unwrap_or(epoch)
            .max(epoch)
            .min(now);

        let until = query
            .until_date
            .as_deref()
            .and_then(parse_instant)
            .unwrap_or(now)
            .min(now)
            .max(since);

        Self { since, until }
    }

    /// True once nothing captured inside the window can change any more
    pub fn is_closed(&self, now: OffsetDateTime) -> bool {
        now > self.until
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.since <= instant && instant < self.until
    }
}

fn parse_number(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|n| *n != 0)
}

fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(instant);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Zero-based month index
fn month_index(month: Month) -> i32 {
    month as i32 - 1
}

/// Midnight UTC on the first day of `month` (zero-based, may overflow
/// into the following year)
fn first_instant_of(year: i32, month: i32) -> OffsetDateTime {
    let year = year + month.div_euclid(12);
    let month = Month::January.nth_next(month.rem_euclid(12) as u8);
    Date::from_calendar_date(year, month, 1)
        .map(|date| date.midnight().assume_utc())
        .unwrap_or(ARCHIVE_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: OffsetDateTime = datetime!(2024-06-15 12:30 UTC);

    fn month_query(year: Option<&str>, month: Option<&str>) -> MonthQuery {
        MonthQuery {
            year: year.map(String::from),
            month: month.map(String::from),
        }
    }

    fn window(year: Option<&str>, month: Option<&str>) -> DateWindow {
        DateWindow::from_month_query(&month_query(year, month), ARCHIVE_EPOCH, NOW)
    }

    #[test]
    fn test_no_params_is_current_month() {
        let w = window(None, None);
        assert_eq!(w.since, datetime!(2024-06-01 0:00 UTC));
        assert_eq!(w.until, datetime!(2024-07-01 0:00 UTC));
    }

    #[test]
    fn test_pre_epoch_year_clamps_up() {
        let w = window(Some("2019"), Some("3"));
        assert_eq!(w.since, ARCHIVE_EPOCH);
        assert_eq!(w.until, datetime!(2022-01-01 0:00 UTC));
    }

    #[test]
    fn test_future_year_clamps_down() {
        let w = window(Some("2031"), Some("2"));
        assert_eq!(w.since, datetime!(2024-02-01 0:00 UTC));
    }

    #[test]
    fn test_month_thirteen_is_december() {
        let w = window(Some("2023"), Some("13"));
        assert_eq!(w.since, datetime!(2023-12-01 0:00 UTC));
        assert_eq!(w.until, datetime!(2024-01-01 0:00 UTC));

        let december = datetime!(2024-12-20 8:00 UTC);
        let w = DateWindow::from_month_query(&month_query(None, Some("13")), ARCHIVE_EPOCH, december);
        assert_eq!(w.since, datetime!(2024-12-01 0:00 UTC));
    }

    #[test]
    fn test_future_month_in_current_year_clamps_to_current() {
        let w = window(Some("2024"), Some("11"));
        assert_eq!(w.since, datetime!(2024-06-01 0:00 UTC));
    }

    #[test]
    fn test_non_numeric_input_falls_back() {
        let w = window(Some("abc"), Some("xyz"));
        // year defaults to current, month falls back to January
        assert_eq!(w.since, datetime!(2024-01-01 0:00 UTC));

        let w = window(Some(""), None);
        assert_eq!(w.since, datetime!(2024-06-01 0:00 UTC));
    }

    #[test]
    fn test_month_below_range_clamps_to_january() {
        let w = window(Some("2022"), Some("-4"));
        assert_eq!(w.since, datetime!(2022-01-01 0:00 UTC));

        let w = window(Some("2023"), Some("-2147483648"));
        assert_eq!(w.since, datetime!(2023-01-01 0:00 UTC));

        let w = window(Some("2023"), Some("2147483647"));
        assert_eq!(w.since, datetime!(2023-12-01 0:00 UTC));
    }

    #[test]
    fn test_past_year_without_month_uses_current_month_index() {
        let w = window(Some("2022"), None);
        assert_eq!(w.since, datetime!(2022-06-01 0:00 UTC));
    }

    #[test]
    fn test_window_bounds_hold_for_all_inputs() {
        let years = [None, Some("0"), Some("1999"), Some("2021"), Some("2022"), Some("2024"), Some("9999"), Some("x"), Some("-2147483648"), Some("2147483647")];
        let months = [None, Some("0"), Some("1"), Some("6"), Some("12"), Some("13"), Some("-1"), Some("x"), Some("-2147483648"), Some("2147483647")];
        let next_boundary = datetime!(2024-07-01 0:00 UTC);

        for year in years {
            for month in months {
                let w = window(year, month);
                assert!(ARCHIVE_EPOCH <= w.since, "{year:?}/{month:?}");
                assert!(w.since < w.until, "{year:?}/{month:?}");
                assert!(w.until <= next_boundary, "{year:?}/{month:?}");
            }
        }
    }

    #[test]
    fn test_range_query_clamps_to_epoch_and_now() {
        let query = RangeQuery {
            since_date: Some("2020-01-01".to_string()),
            until_date: Some("2030-01-01T00:00:00Z".to_string()),
        };
        let w = DateWindow::from_range_query(&query, ARCHIVE_EPOCH, NOW);
        assert_eq!(w.since, ARCHIVE_EPOCH);
        assert_eq!(w.until, NOW);
    }

    #[test]
    fn test_range_query_defaults_and_ordering() {
        let w = DateWindow::from_range_query(&RangeQuery::default(), ARCHIVE_EPOCH, NOW);
        assert_eq!(w.since, ARCHIVE_EPOCH);
        assert_eq!(w.until, NOW);

        let inverted = RangeQuery {
            since_date: Some("2023-05-01".to_string()),
            until_date: Some("2022-05-01".to_string()),
        };
        let w = DateWindow::from_range_query(&inverted, ARCHIVE_EPOCH, NOW);
        assert_eq!(w.since, datetime!(2023-05-01 0:00 UTC));
        assert_eq!(w.until, w.since);
    }

    #[test]
    fn test_is_closed_and_contains() {
        let w = window(Some("2023"), Some("2"));
        assert!(w.is_closed(NOW));
        assert!(w.contains(datetime!(2023-02-28 23:59 UTC)));
        assert!(!w.contains(datetime!(2023-03-01 0:00 UTC)));

        assert!(!window(None, None).is_closed(NOW));
    }
}
