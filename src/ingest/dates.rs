// File: ./src/ingest/dates.rs
//! Date recognition shared by the line classifier (date headers), entity
//! enrichment (due dates) and the metadata extractor (date presence).
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Month names and their common abbreviations, no capture groups.
pub(crate) const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

/// Month names for free-prose scanning: "may" only counts as the
/// capitalized month so "Sprint 2 may slip" is not a date.
const PROSE_MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|(?-i:May)|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const WEEKDAY: &str = r"(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+";

static DATE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:{wd})?(?:(?P<d1>\d{{1,2}})(?:st|nd|rd|th)?\s+(?P<m1>{m})\.?,?\s+(?P<y1>\d{{4}})|(?P<m2>{m})\.?\s+(?P<d2>\d{{1,2}})(?:st|nd|rd|th)?,?\s+(?P<y2>\d{{4}})|(?P<iso>\d{{4}}-\d{{2}}-\d{{2}}))\s*:?$",
        wd = WEEKDAY,
        m = MONTH
    ))
    .unwrap()
});

static ANY_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b\d{{4}}-\d{{2}}-\d{{2}}\b|\b\d{{1,2}}/\d{{1,2}}/\d{{2,4}}\b|\b{m}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?\b|\b\d{{1,2}}(?:st|nd|rd|th)?\s+{m}\b",
        m = PROSE_MONTH
    ))
    .unwrap()
});

pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_lowercase();
    let prefix: String = lower.chars().take(3).collect();
    let m = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

/// "Jan 14", "January 14 2026": the year falls back to `default_year`.
pub fn parse_month_day(
    month: &str,
    day: &str,
    year: Option<&str>,
    default_year: i32,
) -> Option<NaiveDate> {
    let m = month_from_name(month)?;
    let d = day.parse::<u32>().ok()?;
    let y = match year {
        Some(y) => y.parse::<i32>().ok()?,
        None => default_year,
    };
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// US-style `MM/DD/YYYY`; two-digit years land in the 2000s.
pub fn parse_slash(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('/');
    let m = parts.next()?.parse::<u32>().ok()?;
    let d = parts.next()?.parse::<u32>().ok()?;
    let y_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let mut y = y_str.parse::<i32>().ok()?;
    if y_str.len() == 2 {
        y += 2000;
    } else if y_str.len() != 4 {
        return None;
    }
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A whole line that is nothing but a date, e.g. "14 Jan 2026" or
/// "Monday, January 14, 2026". Returns None for impossible dates.
pub fn parse_date_header(line: &str) -> Option<NaiveDate> {
    let caps = DATE_HEADER.captures(line.trim())?;
    if let Some(iso) = caps.name("iso") {
        return parse_iso(iso.as_str());
    }
    if let (Some(d), Some(m), Some(y)) = (caps.name("d1"), caps.name("m1"), caps.name("y1")) {
        return parse_month_day(m.as_str(), d.as_str(), Some(y.as_str()), 0);
    }
    if let (Some(d), Some(m), Some(y)) = (caps.name("d2"), caps.name("m2"), caps.name("y2")) {
        return parse_month_day(m.as_str(), d.as_str(), Some(y.as_str()), 0);
    }
    None
}

pub fn is_date_header(line: &str) -> bool {
    parse_date_header(line).is_some()
}

pub fn contains_explicit_date(text: &str) -> bool {
    ANY_DATE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_headers() {
        assert_eq!(parse_date_header("14 Jan 2026"), Some(ymd(2026, 1, 14)));
        assert_eq!(parse_date_header("14th January, 2026"), Some(ymd(2026, 1, 14)));
        assert_eq!(parse_date_header("January 14, 2026"), Some(ymd(2026, 1, 14)));
        assert_eq!(parse_date_header("Mon, 3 Feb 2025:"), Some(ymd(2025, 2, 3)));
        assert_eq!(parse_date_header("2025-03-09"), Some(ymd(2025, 3, 9)));
        assert_eq!(parse_date_header("Sept 9 2025"), Some(ymd(2025, 9, 9)));
    }

    #[test]
    fn test_date_header_rejects_prose_and_impossible_dates() {
        assert!(!is_date_header("Meeting on 14 Jan 2026"));
        assert!(!is_date_header("31 Feb 2026"));
        assert!(!is_date_header("2025-13-01"));
        assert!(!is_date_header("January"));
    }

    #[test]
    fn test_slash_dates() {
        assert_eq!(parse_slash("03/15/2026"), Some(ymd(2026, 3, 15)));
        assert_eq!(parse_slash("3/5/26"), Some(ymd(2026, 3, 5)));
        assert_eq!(parse_slash("15/03/2026"), None);
        assert_eq!(parse_slash("1/2/345"), None);
    }

    #[test]
    fn test_month_day_default_year() {
        assert_eq!(parse_month_day("Mar", "3", None, 2027), Some(ymd(2027, 3, 3)));
        assert_eq!(parse_month_day("Foo", "3", None, 2027), None);
    }

    #[test]
    fn test_contains_explicit_date() {
        assert!(contains_explicit_date("kickoff on 2026-02-01"));
        assert!(contains_explicit_date("due March 3rd"));
        assert!(contains_explicit_date("review 12 Aug"));
        assert!(contains_explicit_date("ship by 4/1/2026"));
        assert!(!contains_explicit_date("Plan the launch party"));
        assert!(contains_explicit_date("launch on 5 May"));
        assert!(contains_explicit_date("May 5 kickoff"));
        assert!(!contains_explicit_date("Sprint 2 may slip"));
        assert!(!contains_explicit_date("it may 4 times fail"));
    }
}
