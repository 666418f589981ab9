//! Item dates to and from CSL date variables.

use super::{
    DateOrder, access_date_to_local, is_multipart, multipart_to_sql, multipart_to_str, pad_year,
    season_name, season_number, str_to_date,
};
use crate::config::{ConversionConfig, DateParser};
use crate::csl::{CslDate, StringOrNumber};
use crate::utils::lpad;

/// Result of reading a CSL date variable into an item date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateImport {
    /// A date with at least a year, in the form to store.
    Parsed(String),
    /// Free text with no recognizable year, stored as-is.
    Literal(String),
    /// Neither date parts with a year nor text.
    Missing,
}

/// Converts a stored item date to a CSL date variable.
///
/// Access dates are converted from UTC to the configured offset and always
/// emitted as a `raw` SQL date. Other dates become `date-parts`; free text
/// with no recognizable year is passed through as `literal`.
///
/// # Examples
///
/// ```
/// use cslmap::ConversionConfig;
/// use cslmap::date::date_to_csl;
///
/// let config = ConversionConfig::default();
/// let date = date_to_csl("March 5, 2020", false, &config);
/// assert_eq!(date.date_parts, Some(vec![vec![2020, 3, 5]]));
///
/// let date = date_to_csl("circa 1800s", false, &config);
/// assert_eq!(date.literal.as_deref(), Some("circa 1800s"));
/// ```
pub fn date_to_csl(value: &str, accessed: bool, config: &ConversionConfig) -> CslDate {
    if accessed {
        return match access_date_to_local(multipart_to_sql(value), config.utc_offset()) {
            Some(sql) => CslDate::from_raw(sql),
            None => CslDate::from_literal(multipart_to_str(value)),
        };
    }

    match config.date_parser() {
        DateParser::Native => native_date(value, config.locale().date_order()),
        DateParser::Citeproc => citeproc_date(value, config.locale().date_order()),
    }
}

fn native_date(value: &str, order: DateOrder) -> CslDate {
    let date = if is_multipart(value) {
        let mut date = str_to_date(multipart_to_sql(value), order);
        date.part = str_to_date(multipart_to_str(value), order).part;
        date
    } else {
        str_to_date(value, order)
    };

    let Some(parts) = date.date_parts() else {
        return CslDate::from_literal(multipart_to_str(value));
    };
    let mut csl = CslDate::from_parts(parts);
    if date.month.is_none() {
        csl.season = date.part.map(StringOrNumber::String);
    }
    csl
}

fn citeproc_date(value: &str, order: DateOrder) -> CslDate {
    let text = multipart_to_str(value);
    let date = str_to_date(text, order);
    let Some(parts) = date.date_parts() else {
        return CslDate::from_literal(text);
    };
    let mut csl = CslDate::from_parts(parts);
    if date.month.is_none() {
        csl.season = date
            .part
            .as_deref()
            .and_then(season_number)
            .map(|n| StringOrNumber::Number(n.into()));
    }
    csl
}

/// Converts a CSL date variable to the value stored in an item date field.
///
/// `literal` and `raw` text is parsed with `order`. Text with a year is
/// stored in multipart form; text without one is stored as-is. Date parts
/// are stored as `YYYY[-MM[-DD]]`, prefixed with the season if present.
/// Access dates are always stored as `YYYY[-MM[-DD]]`.
///
/// # Examples
///
/// ```
/// use cslmap::date::{csl_to_date, DateImport, DateOrder};
/// use cslmap::CslDate;
///
/// let date = CslDate::from_parts(vec![2020, 3, 5]);
/// assert_eq!(
///     csl_to_date(&date, false, DateOrder::MonthDay),
///     DateImport::Parsed("2020-03-05".to_string())
/// );
///
/// let date = CslDate::from_literal("3/5/2020");
/// assert_eq!(
///     csl_to_date(&date, false, DateOrder::DayMonth),
///     DateImport::Parsed("2020-05-03 3/5/2020".to_string())
/// );
/// ```
pub fn csl_to_date(date: &CslDate, accessed: bool, order: DateOrder) -> DateImport {
    if let Some(text) = date.text() {
        let parsed = str_to_date(text, order);
        return match (accessed, parsed.to_sql()) {
            (_, None) => DateImport::Literal(text.to_string()),
            (true, Some(_)) => {
                let month = parsed.month.map(|m| m as i32 + 1);
                let day = parsed.day.map(|d| d as i32);
                DateImport::Parsed(access_sql(parsed.year, month, day))
            }
            (false, Some(sql)) => DateImport::Parsed(format!("{} {}", sql, text)),
        };
    }

    let Some(parts) = date.first_parts() else {
        return DateImport::Missing;
    };
    let component = |i: usize| parts.get(i).copied().filter(|n| *n != 0);
    let (year, month, day) = (component(0), component(1), component(2));
    if year.is_none() {
        return DateImport::Missing;
    }

    if accessed {
        return DateImport::Parsed(access_sql(year, month, day));
    }

    let mut stored = access_sql(year, month, day);
    if let Some(season) = date.season.as_ref().and_then(season_label) {
        stored = format!("{} {}", season, stored);
    }
    DateImport::Parsed(stored)
}

/// `YYYY[-MM[-DD]]`, stopping at the first absent component.
fn access_sql(year: Option<i32>, month: Option<i32>, day: Option<i32>) -> String {
    let mut sql = year.map(pad_year).unwrap_or_default();
    if let Some(month) = month {
        sql.push('-');
        sql.push_str(&lpad(month, '0', 2));
        if let Some(day) = day {
            sql.push('-');
            sql.push_str(&lpad(day, '0', 2));
        }
    }
    sql
}

fn season_label(season: &StringOrNumber) -> Option<String> {
    match season.as_number() {
        Some(n) => season_name(n).map(str::to_string),
        None => Some(season.as_string()).filter(|s| !s.trim().is_empty()),
    }
}
