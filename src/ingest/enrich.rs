// File: ./src/ingest/enrich.rs
//! Per-task metadata: completion status, priority, assignee and due date are
//! pulled out of a task's raw text and stripped from its display name.
//!
//! Every extraction is a best-effort substring removal applied once, in a
//! fixed order, with no rollback. Anything that does not parse (e.g. an
//! impossible due date) simply stays in the name.
use crate::ingest::dates::{self, MONTH};
use crate::model::{Priority, TaskStatus};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static CHECKED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[xX✓✔]\]|[☑✓✔✅]").unwrap());
static UNCHECKED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[ \]|[☐□]").unwrap());
static STATUS_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\[(]\s*(?P<s>done|completed?|in[ -]progress|wip|ongoing)\s*[\])]").unwrap()
});
static DONE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:done|completed)\b").unwrap());
static PROGRESS_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:in[ -]progress|wip|ongoing)\b").unwrap());

static PRIORITY_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[\[(]\s*(?:priority\s*:?\s*)?(?P<p>critical|urgent|high|medium|low|p[1-3])(?:\s+priority)?\s*[\])]",
    )
    .unwrap()
});
static PRIORITY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bpriority\s*[:=]\s*(?P<p>critical|urgent|high|medium|low|p[1-3])\b").unwrap()
});
static PRIORITY_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?P<p>p[1-3])\b").unwrap());

static OWNER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*(?:owner|lead|assignee)\s*:\s*(?P<name>[^)]+?)\s*\)").unwrap()
});
static ASSIGNED_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:\bassigned\s+to)\s+@?(?P<name>\p{Lu}[\w'-]*(?:\s+\p{Lu}[\w'-]*)?|\w[\w.'-]*)")
        .unwrap()
});
static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(?P<tok>@(?P<name>[A-Za-z][\w.-]*))").unwrap());

const DUE_PREFIX: &str = r"(?i)\b(?:due(?:\s+(?:on|by))?|by|deadline)\s*:?\s*";

static DUE_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{p}(?P<m>{m})\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(?P<y>\d{{4}}))?\b",
        p = DUE_PREFIX,
        m = MONTH
    ))
    .unwrap()
});
static DUE_ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{}(?P<iso>\d{{4}}-\d{{2}}-\d{{2}})\b", DUE_PREFIX)).unwrap());
static DUE_SLASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}(?P<slash>\d{{1,2}}/\d{{1,2}}/\d{{2,4}})\b", DUE_PREFIX)).unwrap()
});

static EMPTY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").unwrap());

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichedText {
    pub name: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub due: Option<NaiveDate>,
}

/// Extracts task metadata from `raw`. `today` supplies the year for due
/// dates written without one.
pub fn enrich_task_text(raw: &str, today: NaiveDate) -> EnrichedText {
    let mut text = raw.to_string();
    let mut out = EnrichedText {
        status: extract_status(&mut text),
        ..Default::default()
    };
    out.priority = extract_priority(&mut text);
    out.due = extract_due_date(&mut text, today.year());
    out.assignee = extract_assignee(&mut text);
    out.name = cleanup(&text);
    out
}

fn remove_range(text: &mut String, range: Range<usize>) {
    text.replace_range(range, " ");
}

/// Removes the first match of `re` and returns the `group` capture.
fn strip_first(text: &mut String, re: &Regex, group: &str) -> Option<String> {
    let (range, value) = {
        let caps = re.captures(text)?;
        (caps.get(0)?.range(), caps.name(group)?.as_str().to_string())
    };
    remove_range(text, range);
    Some(value)
}

fn extract_status(text: &mut String) -> Option<TaskStatus> {
    if CHECKED.is_match(text) {
        *text = CHECKED.replace_all(text, " ").into_owned();
        return Some(TaskStatus::Done);
    }
    if UNCHECKED.is_match(text) {
        *text = UNCHECKED.replace_all(text, " ").into_owned();
        return Some(TaskStatus::NotStarted);
    }
    if let Some(word) = strip_first(text, &STATUS_TAG, "s") {
        return Some(status_from_word(&word));
    }
    if DONE_WORD.is_match(text) {
        return Some(TaskStatus::Done);
    }
    if PROGRESS_WORD.is_match(text) {
        return Some(TaskStatus::Started);
    }
    None
}

fn status_from_word(word: &str) -> TaskStatus {
    match word.to_lowercase().as_str() {
        "done" | "complete" | "completed" => TaskStatus::Done,
        _ => TaskStatus::Started,
    }
}

fn extract_priority(text: &mut String) -> Option<Priority> {
    for re in [&*PRIORITY_TAG, &*PRIORITY_LABEL, &*PRIORITY_BARE] {
        if let Some(token) = strip_first(text, re, "p") {
            return Priority::from_token(&token);
        }
    }
    None
}

fn extract_assignee(text: &mut String) -> Option<String> {
    let raw = match strip_first(text, &OWNER_TAG, "name") {
        Some(name) => name,
        None => match strip_first(text, &ASSIGNED_TO, "name") {
            Some(name) => name,
            None => strip_mention(text)?,
        },
    };
    let name = raw.trim().trim_end_matches(['.', ',']).to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// `@name` preceded by start-of-text or whitespace, so emails are skipped.
fn strip_mention(text: &mut String) -> Option<String> {
    let (range, name) = {
        let caps = MENTION.captures(text)?;
        (caps.name("tok")?.range(), caps["name"].to_string())
    };
    remove_range(text, range);
    Some(name)
}

/// Tries each date shape in order; the first occurrence that parses to a real
/// date wins and is stripped.
fn extract_due_date(text: &mut String, default_year: i32) -> Option<NaiveDate> {
    let mut hit: Option<(usize, usize, NaiveDate)> = None;

    for caps in DUE_MONTH_DAY.captures_iter(text) {
        let parsed = dates::parse_month_day(
            &caps["m"],
            &caps["d"],
            caps.name("y").map(|y| y.as_str()),
            default_year,
        );
        if let (Some(d), Some(m)) = (parsed, caps.get(0)) {
            hit = Some((m.start(), m.end(), d));
            break;
        }
    }
    if hit.is_none() {
        for caps in DUE_ISO.captures_iter(text) {
            if let (Some(d), Some(m)) = (dates::parse_iso(&caps["iso"]), caps.get(0)) {
                hit = Some((m.start(), m.end(), d));
                break;
            }
        }
    }
    if hit.is_none() {
        for caps in DUE_SLASH.captures_iter(text) {
            if let (Some(d), Some(m)) = (dates::parse_slash(&caps["slash"]), caps.get(0)) {
                hit = Some((m.start(), m.end(), d));
                break;
            }
        }
    }

    let (start, end, date) = hit?;
    remove_range(text, start..end);
    Some(date)
}

fn cleanup(text: &str) -> String {
    let without_empty = EMPTY_BRACKETS.replace_all(text, " ");
    let collapsed = without_empty.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| matches!(c, '-' | '–' | '—' | ':' | ',') || c.is_whitespace())
        .to_string()
}
