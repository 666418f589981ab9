//! Date normalization.
//!
//! Item dates are free text. They may also be stored in the multipart form
//! `YYYY-MM-DD original text`, where the leading SQL date is what was parsed
//! out of the text and `00` marks an absent component. This module parses
//! free text into a [`StructuredDate`] and converts item dates to and from
//! CSL date variables.

mod csl;
mod parse;

pub use csl::{DateImport, csl_to_date, date_to_csl};
pub use parse::str_to_date;

use crate::regex::Regex;
use crate::utils::lpad;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::sync::LazyLock;

static MULTIPART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} ").unwrap());

static SQL_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Season names, in CSL season number order (1-4).
pub const SEASONS: [&str; 4] = ["Spring", "Summer", "Autumn", "Winter"];

/// How to read an ambiguous numeric date such as `3/5/2020`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// `3/5/2020` is March 5.
    MonthDay,
    /// `3/5/2020` is May 3.
    DayMonth,
}

/// A date parsed out of free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDate {
    /// Negative for BC years.
    pub year: Option<i32>,
    /// 0-based month.
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// Text that is not part of the date, e.g. a season or "circa".
    pub part: Option<String>,
}

impl StructuredDate {
    /// CSL date parts `[year, month, day]` with a 1-based month, trimmed
    /// after the first absent component. `None` without a year.
    pub fn date_parts(&self) -> Option<Vec<i32>> {
        let year = self.year?;
        let mut parts = vec![year];
        if let Some(month) = self.month {
            parts.push(month as i32 + 1);
            if let Some(day) = self.day {
                parts.push(day as i32);
            }
        }
        Some(parts)
    }

    /// The SQL form `YYYY-MM-DD`, with `00` for absent components.
    pub fn to_sql(&self) -> Option<String> {
        let year = self.year?;
        let pad = |n: Option<u32>| n.map_or_else(|| "00".to_string(), |n| lpad(n, '0', 2));
        Some(format!(
            "{}-{}-{}",
            pad_year(year),
            pad(self.month.map(|m| m + 1)),
            pad(self.day),
        ))
    }
}

/// Whether a stored date is in multipart form.
pub fn is_multipart(value: &str) -> bool {
    MULTIPART_REGEX.is_match(value)
}

/// The SQL part of a multipart date, or the value itself.
pub fn multipart_to_sql(value: &str) -> &str {
    if is_multipart(value) {
        &value[..10]
    } else {
        value
    }
}

/// The original text of a multipart date, or the value itself.
pub fn multipart_to_str(value: &str) -> &str {
    if is_multipart(value) {
        &value[11..]
    } else {
        value
    }
}

/// Whether the value is exactly a `YYYY-MM-DD` date.
pub fn is_sql_date(value: &str) -> bool {
    SQL_DATE_REGEX.is_match(value)
}

/// Parses free text into multipart form. `None` if no year is found.
///
/// # Examples
///
/// ```
/// use cslmap::date::{str_to_multipart, DateOrder};
///
/// assert_eq!(
///     str_to_multipart("March 2020", DateOrder::MonthDay).as_deref(),
///     Some("2020-03-00 March 2020")
/// );
/// assert_eq!(str_to_multipart("n.d.", DateOrder::MonthDay), None);
/// ```
pub fn str_to_multipart(value: &str, order: DateOrder) -> Option<String> {
    let sql = str_to_date(value, order).to_sql()?;
    Some(format!("{} {}", sql, value))
}

/// Converts a UTC access timestamp to a local `YYYY-MM-DD` date.
///
/// Accepts SQL datetimes (`2021-01-02 03:04:05`), RFC 3339 timestamps and
/// plain SQL dates, which are returned unchanged.
pub fn access_date_to_local(value: &str, offset: FixedOffset) -> Option<String> {
    let value = value.trim();
    if is_sql_date(value) {
        return Some(value.to_string());
    }
    let utc = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
        .ok()?;
    Some(utc.with_timezone(&offset).format("%Y-%m-%d").to_string())
}

/// CSL season number (1-4) for a season name.
pub fn season_number(name: &str) -> Option<i32> {
    match name.trim().to_lowercase().as_str() {
        "spring" => Some(1),
        "summer" => Some(2),
        "autumn" | "fall" => Some(3),
        "winter" => Some(4),
        _ => None,
    }
}

/// Season name for a CSL season number.
pub fn season_name(number: i64) -> Option<&'static str> {
    usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| SEASONS.get(index).copied())
}

pub(crate) fn pad_year(year: i32) -> String {
    if year < 0 {
        year.to_string()
    } else {
        lpad(year, '0', 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("2020-03-05 March 5, 2020", true, "2020-03-05", "March 5, 2020")]
    #[case("2020-00-00 2020", true, "2020-00-00", "2020")]
    #[case("2020-03-05", false, "2020-03-05", "2020-03-05")]
    #[case("Spring 1998", false, "Spring 1998", "Spring 1998")]
    fn test_multipart(
        #[case] value: &str,
        #[case] multipart: bool,
        #[case] sql: &str,
        #[case] text: &str,
    ) {
        assert_eq!(is_multipart(value), multipart);
        assert_eq!(multipart_to_sql(value), sql);
        assert_eq!(multipart_to_str(value), text);
    }

    #[test]
    fn test_structured_date_forms() {
        let date = StructuredDate {
            year: Some(2020),
            month: Some(2),
            day: Some(5),
            part: None,
        };
        assert_eq!(date.date_parts(), Some(vec![2020, 3, 5]));
        assert_eq!(date.to_sql().as_deref(), Some("2020-03-05"));

        let date = StructuredDate {
            year: Some(2020),
            month: None,
            day: Some(5),
            part: None,
        };
        assert_eq!(date.date_parts(), Some(vec![2020]));
        assert_eq!(date.to_sql().as_deref(), Some("2020-00-05"));

        assert_eq!(StructuredDate::default().date_parts(), None);
        assert_eq!(StructuredDate::default().to_sql(), None);
    }

    #[rstest]
    #[case("2021-01-02 23:30:00", 0, Some("2021-01-02"))]
    #[case("2021-01-02 23:30:00", 3600, Some("2021-01-03"))]
    #[case("2021-01-02T01:00:00Z", -7200, Some("2021-01-01"))]
    #[case("2021-01-02", -7200, Some("2021-01-02"))]
    #[case("yesterday", 0, None)]
    fn test_access_date_to_local(
        #[case] value: &str,
        #[case] offset_secs: i32,
        #[case] expected: Option<&str>,
    ) {
        let offset = FixedOffset::east_opt(offset_secs).unwrap();
        assert_eq!(access_date_to_local(value, offset).as_deref(), expected);
    }

    #[rstest]
    #[case("Spring", Some(1))]
    #[case("fall", Some(3))]
    #[case(" Winter ", Some(4))]
    #[case("circa", None)]
    fn test_season_number(#[case] name: &str, #[case] expected: Option<i32>) {
        assert_eq!(season_number(name), expected);
    }

    #[test]
    fn test_season_name() {
        assert_eq!(season_name(1), Some("Spring"));
        assert_eq!(season_name(4), Some("Winter"));
        assert_eq!(season_name(0), None);
        assert_eq!(season_name(5), None);
    }
}
