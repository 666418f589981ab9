//! Free-text date parsing.

use super::{DateOrder, StructuredDate};
use crate::regex::Regex;
use chrono::Datelike;
use std::sync::LazyLock;

/// Numeric dates: `2020-03-05`, `5/3/2020`, `2020年3月5日`.
static NUMERIC_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.*?)\b([0-9]{1,4})(?:([\-/.年])([0-9]{1,2}))?(?:([\-/.月])([0-9]{1,4}))?((?:\b|[^0-9]).*?)$",
    )
    .unwrap()
});

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.*?)\b((?:circa |around |about |c\.? ?)?[0-9]{1,4}(?: ?B\.? ?C\.?(?: ?E\.?)?| ?C\.? ?E\.?| ?A\.? ?D\.?)|[0-9]{3,4})\b(.*?)$",
    )
    .unwrap()
});

static MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(.*)\b({})[^ ]*(?: (.*)$|$)", MONTHS.join("|"))).unwrap()
});

static DAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([0-9]{1,2})(?:st|nd|rd|th)?\b(.*)").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses a free-text date into its structured components.
///
/// Numeric dates are tried first. A 3- or 4-digit leading number means
/// year-month-day; otherwise the two leading numbers are read in the given
/// `order`, swapping them when the month would exceed 12. Anything the
/// numeric pass leaves over is scanned for a year, a month name and a day.
/// Text that is none of these ends up in [`StructuredDate::part`].
///
/// # Arguments
///
/// * `value` - The date string
/// * `order` - How to read ambiguous `a/b/yyyy` dates
///
/// # Examples
///
/// ```
/// use cslmap::date::{str_to_date, DateOrder};
///
/// let date = str_to_date("5/3/2020", DateOrder::DayMonth);
/// assert_eq!((date.year, date.month, date.day), (Some(2020), Some(2), Some(5)));
///
/// let date = str_to_date("Spring 1998", DateOrder::MonthDay);
/// assert_eq!(date.year, Some(1998));
/// assert_eq!(date.part.as_deref(), Some("Spring"));
/// ```
pub fn str_to_date(value: &str, order: DateOrder) -> StructuredDate {
    let collapsed = WHITESPACE_REGEX.replace_all(value.trim(), " ");
    let text: &str = &collapsed;
    let mut date = StructuredDate::default();
    if text.is_empty() {
        return date;
    }

    let mut parts: Vec<String> = match parse_numeric(text, order) {
        Some((numeric, before, after)) => {
            date = numeric;
            vec![before, after]
        }
        None => vec![text.to_string()],
    };

    if date.year.is_none() {
        let found = parts.iter().enumerate().find_map(|(i, part)| {
            let caps = YEAR_REGEX.captures(part)?;
            Some((
                i,
                parse_year(&caps[2])?,
                caps[1].to_string(),
                caps[3].to_string(),
            ))
        });
        if let Some((i, year, before, after)) = found {
            date.year = Some(year);
            parts[i] = after;
            parts.insert(i, before);
        }
    }

    if date.month.is_none() {
        let found = parts.iter().enumerate().find_map(|(i, part)| {
            let caps = MONTH_REGEX.captures(part)?;
            let name = caps[2].to_lowercase();
            let month = MONTHS.iter().position(|m| *m == name)?;
            let after = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            Some((i, month as u32, caps[1].to_string(), after.to_string()))
        });
        if let Some((i, month, before, after)) = found {
            date.month = Some(month);
            parts[i] = after;
            parts.insert(i, before);
        }
    }

    if date.day.is_none() {
        let found = parts.iter().enumerate().find_map(|(i, part)| {
            let caps = DAY_REGEX.captures(part)?;
            let day: u32 = caps[1].parse().ok().filter(|d| *d <= 31)?;
            let whole = caps.get(0)?;
            let rest = &caps[2];
            let remainder = if whole.start() > 0 {
                let mut remainder = part[..whole.start()].to_string();
                if !rest.is_empty() {
                    remainder.push(' ');
                    remainder.push_str(rest);
                }
                remainder
            } else {
                rest.to_string()
            };
            Some((i, day, remainder))
        });
        if let Some((i, day, remainder)) = found {
            date.day = (day > 0).then_some(day);
            parts[i] = remainder;
        }
    }

    let joined = parts.join(" ");
    let part = joined.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    if !part.is_empty() {
        date.part = Some(part.to_string());
    }

    date
}

/// Numeric pass. Returns the date and the text before and after it.
fn parse_numeric(text: &str, order: DateOrder) -> Option<(StructuredDate, String, String)> {
    let caps = NUMERIC_DATE_REGEX.captures(text)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty());
    let (before, first, sep1, second, sep2, third, after) = (
        group(1),
        group(2)?,
        group(3),
        group(4),
        group(5),
        group(6),
        group(7),
    );

    let sane_separators = sep1.is_none()
        || sep2.is_none()
        || sep1 == sep2
        || (sep1 == Some("年") && sep2 == Some("月"));
    let whole_field =
        (second.is_some() && third.is_some()) || (before.is_none() && after.is_none());
    if !sane_separators || !whole_field {
        return None;
    }

    let (year, month, day) = if first.len() >= 3 || sep1 == Some("年") {
        (Some(first), second, third)
    } else if second.is_none() && third.is_some() {
        (third, Some(first), None)
    } else {
        match order {
            DateOrder::MonthDay => (third, Some(first), second),
            DateOrder::DayMonth => (third, second, Some(first)),
        }
    };

    let number = |s: Option<&str>| s.and_then(|s| s.parse::<u32>().ok()).filter(|n| *n > 0);
    let mut year = number(year).map(|y| y as i32);
    let (mut month, mut day) = (number(month), number(day));
    if month.is_some_and(|m| m > 12) {
        std::mem::swap(&mut month, &mut day);
    }

    if month.is_some_and(|m| m > 12) || day.is_some_and(|d| d > 31) {
        return None;
    }

    if let Some(y) = year
        && y < 100
    {
        year = Some(expand_two_digit_year(y));
    }

    let date = StructuredDate {
        year,
        month: month.map(|m| m - 1),
        day,
        part: None,
    };
    Some((
        date,
        before.unwrap_or_default().to_string(),
        after.unwrap_or_default().to_string(),
    ))
}

/// Picks the century that puts a two-digit year no later than this year.
fn expand_two_digit_year(year: i32) -> i32 {
    let current = chrono::Utc::now().year();
    let two_digit = current % 100;
    let century = current - two_digit;
    if year <= two_digit {
        century + year
    } else {
        century - 100 + year
    }
}

/// Reads the year out of a year match such as `1998`, `circa 1800` or `44 BC`.
fn parse_year(text: &str) -> Option<i32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let end = text[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |offset| start + offset);
    let year: i32 = text[start..end].parse().ok()?;
    if text[end..].to_ascii_uppercase().contains('B') {
        Some(-year)
    } else {
        (year > 0).then_some(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ymd(date: &StructuredDate) -> (Option<i32>, Option<u32>, Option<u32>) {
        (date.year, date.month, date.day)
    }

    #[rstest]
    #[case("2020-03-05", (Some(2020), Some(2), Some(5)))]
    #[case("2020-03", (Some(2020), Some(2), None))]
    #[case("2020", (Some(2020), None, None))]
    #[case("2020-00-00", (Some(2020), None, None))]
    #[case("3/5/2020", (Some(2020), Some(2), Some(5)))]
    #[case("25/12/2020", (Some(2020), Some(11), Some(25)))]
    #[case("3-2020", (Some(2020), Some(2), None))]
    #[case("2020年3月5日", (Some(2020), Some(2), Some(5)))]
    #[case("March 5, 2020", (Some(2020), Some(2), Some(5)))]
    #[case("5 March 2020", (Some(2020), Some(2), Some(5)))]
    #[case("Dec 1st 1999", (Some(1999), Some(11), Some(1)))]
    #[case("1/2/99", (Some(1999), Some(0), Some(2)))]
    fn test_str_to_date_month_day(
        #[case] input: &str,
        #[case] expected: (Option<i32>, Option<u32>, Option<u32>),
    ) {
        assert_eq!(ymd(&str_to_date(input, DateOrder::MonthDay)), expected);
    }

    #[rstest]
    #[case("3/5/2020", (Some(2020), Some(4), Some(3)))]
    #[case("12/25/2020", (Some(2020), Some(11), Some(25)))]
    #[case("5.3.2020", (Some(2020), Some(2), Some(5)))]
    fn test_str_to_date_day_month(
        #[case] input: &str,
        #[case] expected: (Option<i32>, Option<u32>, Option<u32>),
    ) {
        assert_eq!(ymd(&str_to_date(input, DateOrder::DayMonth)), expected);
    }

    #[test]
    fn test_str_to_date_parts() {
        let date = str_to_date("Spring 1998", DateOrder::MonthDay);
        assert_eq!(ymd(&date), (Some(1998), None, None));
        assert_eq!(date.part.as_deref(), Some("Spring"));

        let date = str_to_date("circa 1800", DateOrder::MonthDay);
        assert_eq!(date.year, Some(1800));
        assert_eq!(date.part.as_deref(), Some("circa"));

        let date = str_to_date("44 BC", DateOrder::MonthDay);
        assert_eq!(date.year, Some(-44));
    }

    #[test]
    fn test_str_to_date_unparseable() {
        let date = str_to_date("circa 1800s", DateOrder::MonthDay);
        assert_eq!(date.year, None);
        assert_eq!(date.part.as_deref(), Some("circa 1800s"));

        let date = str_to_date("   ", DateOrder::MonthDay);
        assert_eq!(date, StructuredDate::default());

        let date = str_to_date("n.d.", DateOrder::MonthDay);
        assert_eq!(ymd(&date), (None, None, None));
        assert_eq!(date.part.as_deref(), Some("n.d"));
    }

    #[rstest]
    #[case("1998", Some(1998))]
    #[case("circa 1800", Some(1800))]
    #[case("c. 1066", Some(1066))]
    #[case("44 B.C.", Some(-44))]
    #[case("33 AD", Some(33))]
    #[case("about 1800 AD", Some(1800))]
    fn test_parse_year(#[case] input: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_year(input), expected);
    }
}
