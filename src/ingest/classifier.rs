// File: ./src/ingest/classifier.rs
//! Line classification.
//!
//! Each physical line is assigned exactly one structural role. The rules are
//! tried in a fixed order and the first match wins:
//!
//!   1. horizontal rule            -> SectionBreak
//!   2. root-level `1.` / `2)`     -> PhaseHeader (promoted), unless an
//!                                    explicit header currently owns the phase
//!   3. phase cues                 -> PhaseHeader (explicit)
//!   4. bullet / number / letter   -> ListItem
//!   5. indented text in a phase   -> IndentedContinuation
//!   6. anything else              -> PlainText
use crate::ingest::dates;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const TAB_WIDTH: usize = 4;

static SECTION_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(?:-\s*){3,}|(?:_\s*){3,}|(?:\*\s*){3,})$").unwrap());

static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•⁃○◦▪▫]\s+(?P<text>.*)|(?P<box>\[[ xX✓✔]\]|[☐☑✓✔□✅])\s*(?P<boxed>.*))$")
        .unwrap()
});

static NUMBER_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<num>\d+(?:\.\d+)*[.)]|\d{1,2}(?:\.\d{1,2})+)\s+(?P<text>.*)$").unwrap()
});

static LETTER_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][.)]\s+(?P<text>.*)$").unwrap());

static PHASE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:phase|stage|milestone|sprint|quarter|week)\b").unwrap());

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(?P<text>.+)$").unwrap());

/// Where the currently open phase came from. Root-level numbered items only
/// promote to phases while no explicit header owns the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOrigin {
    Explicit,
    Promoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Bullet,
    Number,
    Letter,
    /// Indented text with no marker at all.
    Implicit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineContext {
    /// True for the first non-blank line of the document.
    pub is_first_line: bool,
    pub open_phase: Option<PhaseOrigin>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    SectionBreak,
    PhaseHeader {
        name: String,
        origin: PhaseOrigin,
        date: Option<NaiveDate>,
    },
    ListItem {
        marker: MarkerKind,
        indent: usize,
        text: String,
    },
    IndentedContinuation {
        indent: usize,
        text: String,
    },
    PlainText,
}

impl LineKind {
    /// Whether the line contributes to the phase/task tree.
    pub fn is_structural(&self) -> bool {
        !matches!(self, LineKind::Blank | LineKind::PlainText)
    }
}

pub fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH,
            c if c.is_whitespace() => width += 1,
            _ => break,
        }
    }
    width
}

pub fn classify_line(line: &str, ctx: &LineContext) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    let indent = indent_width(line);

    // 1. Horizontal rules
    if is_section_break(trimmed) {
        return LineKind::SectionBreak;
    }

    let marker = match_list_marker(trimmed);

    // 2. Root-level numbered outline -> phase
    if let Some((MarkerKind::Number, text, dotted)) = &marker
        && indent == 0
        && !dotted
        && ctx.open_phase != Some(PhaseOrigin::Explicit)
    {
        let name = clean_header_name(text);
        if !name.is_empty() {
            return LineKind::PhaseHeader {
                name,
                origin: PhaseOrigin::Promoted,
                date: None,
            };
        }
    }

    // 3. Explicit phase cues (only for lines without a list marker)
    if marker.is_none()
        && let Some(header) = match_phase_cue(trimmed, ctx.is_first_line)
    {
        return header;
    }

    // 4. List items
    if let Some((kind, text, _)) = marker {
        return LineKind::ListItem {
            marker: kind,
            indent,
            text,
        };
    }

    // 5. Indented text inside a phase
    if indent >= 2 && ctx.open_phase.is_some() {
        return LineKind::IndentedContinuation {
            indent,
            text: trimmed.to_string(),
        };
    }

    LineKind::PlainText
}

pub(crate) fn has_list_marker(line: &str) -> bool {
    match_list_marker(line.trim()).is_some()
}

/// Whole-line horizontal rule, spaced or not ("---", "* * *").
pub(crate) fn is_section_break(line: &str) -> bool {
    SECTION_BREAK.is_match(line)
}

/// Returns (marker kind, remaining text, dotted sub-number?).
fn match_list_marker(trimmed: &str) -> Option<(MarkerKind, String, bool)> {
    if let Some(caps) = BULLET_ITEM.captures(trimmed) {
        // Bare checkbox glyphs stay in the text for status enrichment.
        let text = match (caps.name("text"), caps.name("box"), caps.name("boxed")) {
            (Some(t), _, _) => t.as_str().to_string(),
            (None, Some(b), Some(rest)) => format!("{} {}", b.as_str(), rest.as_str()),
            _ => return None,
        };
        return Some((MarkerKind::Bullet, text.trim().to_string(), false));
    }
    if let Some(caps) = NUMBER_ITEM.captures(trimmed) {
        // "1.2 Scope" is an outline number, "2.5 engineers" is a decimal.
        let terminated = caps["num"].ends_with(['.', ')']);
        if !terminated && !caps["text"].starts_with(char::is_uppercase) {
            return None;
        }
        let dotted = caps["num"].trim_end_matches(['.', ')']).contains('.');
        return Some((MarkerKind::Number, caps["text"].trim().to_string(), dotted));
    }
    if let Some(caps) = LETTER_ITEM.captures(trimmed) {
        return Some((MarkerKind::Letter, caps["text"].trim().to_string(), false));
    }
    None
}

fn match_phase_cue(trimmed: &str, is_first_line: bool) -> Option<LineKind> {
    let explicit = |name: String, date: Option<NaiveDate>| {
        if name.is_empty() {
            None
        } else {
            Some(LineKind::PhaseHeader {
                name,
                origin: PhaseOrigin::Explicit,
                date,
            })
        }
    };
    let len = trimmed.chars().count();

    if PHASE_KEYWORD.is_match(trimmed) {
        return explicit(clean_header_name(trimmed), None);
    }

    if let Some(caps) = HEADING.captures(trimmed) {
        // The document's leading heading is its title, not a phase.
        if is_first_line {
            return None;
        }
        return explicit(clean_header_name(&caps["text"]), None);
    }

    if let Some(date) = dates::parse_date_header(trimmed) {
        return explicit(clean_header_name(trimmed), Some(date));
    }

    if trimmed.ends_with(':') && len < 60 {
        return explicit(clean_header_name(trimmed), None);
    }

    if trimmed.ends_with('?') && len < 100 {
        return explicit(clean_header_name(trimmed), None);
    }

    if !is_first_line && is_all_caps_phrase(trimmed) {
        return explicit(trimmed.to_string(), None);
    }

    None
}

fn is_all_caps_phrase(s: &str) -> bool {
    let len = s.chars().count();
    (10..=50).contains(&len)
        && s.chars().all(|c| c.is_alphabetic() || c == ' ')
        && s.chars().any(|c| c.is_alphabetic())
        && s.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
        && !s.chars().any(|c| c.is_lowercase())
}

/// Strips markdown emphasis, heading hashes and a trailing colon.
pub(crate) fn clean_header_name(raw: &str) -> String {
    let mut s = raw.trim().trim_start_matches('#').trim();
    s = s.trim_end_matches(':').trim();
    for wrap in ["**", "__"] {
        if s.len() > 2 * wrap.len() && s.starts_with(wrap) && s.ends_with(wrap) {
            s = &s[wrap.len()..s.len() - wrap.len()];
        }
    }
    s.trim_end_matches(':').trim().to_string()
}
