// File: ./src/ingest/metadata.rs
//! Whole-text metadata: title, description, budget and currency, category and
//! team. These scans ignore the line-by-line structure entirely.
use crate::config::IngestConfig;
use crate::ingest::classifier::{clean_header_name, has_list_marker, is_section_break};
use crate::ingest::dates;
use crate::ingest::ids::IdGenerator;
use crate::model::{CoreSystem, CurrentUser, ProjectDuration, TeamMember};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use strum::IntoEnumIterator;

static TITLE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*#*\s*(?:title|project(?:\s+name)?)\s*:\s*(?P<v>.+?)\s*$").unwrap()
});
static DESCRIPTION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:description|summary|overview)\s*:\s*(?P<v>.+?)\s*$").unwrap()
});
static LABEL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:title|project(?:\s+name)?|budget|cost|price|total|amount|fee|charge|team|attendees|members|responsible|owner|lead|description|summary|overview|deadline|due)\s*:\s*\S",
    )
    .unwrap()
});

static LABELLED_COST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:cost|budget|price|total|amount|fee|charge)s?\b[^\d\n]{0,20}?(?:\$|€|£|₹|¥|usd|eur|gbp|inr|jpy|rs\.?)?\s*(?P<num>\d[\d,]*(?:\.\d+)?)\s*(?P<suf>[kmb])?\b",
    )
    .unwrap()
});
static BARE_COST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\$|€|£|₹|¥)\s*(?P<num>\d[\d,]*(?:\.\d+)?)\s*(?P<suf>[kmb])?\b").unwrap()
});

static CURRENCIES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"₹|\bINR\b|\bRs\.?\s*\d", "INR"),
        (r"€|\bEUR\b", "EUR"),
        (r"£|\bGBP\b", "GBP"),
        (r"¥|\bJPY\b", "JPY"),
        (r"\$|\bUSD\b", "USD"),
    ]
    .into_iter()
    .map(|(pat, code)| (Regex::new(pat).unwrap(), code))
    .collect()
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static TEAM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s*)?(?:team|attendees|members|responsible)\s*:\s*(?P<list>.+)$")
        .unwrap()
});
static TEAM_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[,;]|\s+and\s+|\s+&\s+").unwrap());
static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s(,])@(?P<name>[A-Za-z][\w.-]*)").unwrap());
static ROLE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*(?P<role>owner|lead)\s*:\s*(?P<name>[^)]+?)\s*\)").unwrap()
});

const HONORIFICS: &[&str] = &[
    "dr", "prof", "ceo", "cto", "cfo", "coo", "director", "vp", "head", "manager",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Sum of every cost mention; None when nothing looked like a cost.
    pub cost: Option<f64>,
    pub currency: String,
    pub category: CoreSystem,
    pub team: Vec<TeamMember>,
    pub has_explicit_dates: bool,
}

pub fn extract_metadata(
    text: &str,
    config: &IngestConfig,
    current_user: Option<&CurrentUser>,
    ids: &mut IdGenerator,
) -> ProjectMetadata {
    let mut roster = TeamRoster::new(&config.placeholder_email_domain);
    if let Some(user) = current_user {
        roster.seed(user);
    }
    collect_team(text, &mut roster, ids);

    ProjectMetadata {
        title: extract_title(text),
        description: extract_description(text),
        cost: extract_cost(text),
        currency: detect_currency(text, &config.primary_currency),
        category: classify_category(text),
        team: roster.into_members(),
        has_explicit_dates: dates::contains_explicit_date(text),
    }
}

// --- TITLE & DESCRIPTION ---

/// An explicit `Title:` within the first five lines, else the first short
/// prose line (list items, rules, labels and date headers are skipped).
pub fn extract_title(text: &str) -> Option<String> {
    for line in text.lines().take(5) {
        if let Some(caps) = TITLE_LABEL.captures(line) {
            let t = clean_header_name(&caps["v"]);
            if !t.is_empty() {
                return Some(t);
            }
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| !is_section_break(l) && !is_label_line(l) && !has_list_marker(l))
        .filter(|l| l.chars().count() < 100 && !dates::is_date_header(l))
        .map(clean_header_name)
        .find(|t| !t.is_empty())
}

pub fn extract_description(text: &str) -> Option<String> {
    text.lines()
        .find_map(|l| DESCRIPTION_LABEL.captures(l).map(|c| c["v"].to_string()))
}

/// Lines like "Budget: 2K" or "Team: Ana, Ben" that carry metadata rather
/// than prose.
pub fn is_label_line(line: &str) -> bool {
    LABEL_LINE.is_match(line)
}

// --- COST ---

/// Labelled amounts first; bare symbol-prefixed amounts only if no label
/// matched. Every match is summed.
pub fn extract_cost(text: &str) -> Option<f64> {
    let labelled = sum_amounts(&LABELLED_COST, text);
    if labelled.is_some() {
        return labelled;
    }
    sum_amounts(&BARE_COST, text)
}

fn sum_amounts(re: &Regex, text: &str) -> Option<f64> {
    let amounts: Vec<f64> = re
        .captures_iter(text)
        .filter_map(|caps| {
            let base = caps["num"].replace(',', "").parse::<f64>().ok()?;
            let mult = match caps.name("suf").map(|m| m.as_str().to_ascii_lowercase()) {
                Some(s) if s == "k" => 1e3,
                Some(s) if s == "m" => 1e6,
                Some(s) if s == "b" => 1e9,
                _ => 1.0,
            };
            Some(base * mult)
        })
        .collect();
    if amounts.is_empty() {
        None
    } else {
        Some(amounts.iter().sum())
    }
}

/// The earliest currency mention that differs from `primary`, else `primary`.
pub fn detect_currency(text: &str, primary: &str) -> String {
    CURRENCIES
        .iter()
        .filter(|(_, code)| !code.eq_ignore_ascii_case(primary))
        .filter_map(|(re, code)| re.find(text).map(|m| (m.start(), *code)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| primary.to_uppercase())
}

// --- CATEGORY ---

fn category_keywords(cat: CoreSystem) -> &'static [&'static str] {
    match cat {
        CoreSystem::Technical => &[
            "software", "app", "application", "api", "system", "platform", "database",
            "code", "development", "develop", "deploy", "deployment", "infrastructure",
            "server", "cloud", "integration", "technical", "engineering", "migration",
            "backend", "frontend", "website", "mobile", "devops", "testing",
        ],
        CoreSystem::Business => &[
            "sales", "marketing", "revenue", "market", "customer", "customers", "business",
            "strategy", "growth", "client", "clients", "partnership", "profit", "pricing",
            "launch", "stakeholder", "stakeholders", "roi", "budget",
        ],
        CoreSystem::Creative => &[
            "design", "brand", "branding", "creative", "content", "video", "campaign",
            "art", "logo", "visual", "photo", "photography", "illustration", "copy",
            "mockup", "mockups", "storyboard",
        ],
        CoreSystem::Research => &[
            "research", "study", "analysis", "survey", "experiment", "experiments", "data",
            "hypothesis", "findings", "paper", "literature", "interview", "interviews",
            "prototype", "evaluate",
        ],
        CoreSystem::Compliance => &[
            "compliance", "audit", "regulation", "regulatory", "legal", "policy", "gdpr",
            "risk", "security", "certification", "iso", "soc", "hipaa", "contract",
            "governance",
        ],
    }
}

/// Whole-word keyword counts per category; ties go to the earlier category.
pub fn classify_category(text: &str) -> CoreSystem {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best = CoreSystem::default();
    let mut best_score = 0usize;
    for cat in CoreSystem::iter() {
        let bag = category_keywords(cat);
        let score = words.iter().filter(|w| bag.contains(w)).count();
        if score > best_score {
            best = cat;
            best_score = score;
        }
    }
    best
}

// --- DURATION ---

pub fn estimate_duration(total_tasks: usize, config: &IngestConfig) -> ProjectDuration {
    let estimated = (total_tasks as f64 * config.weeks_per_task).ceil() as u32;
    ProjectDuration::weeks(estimated.max(config.min_duration_weeks))
}

// --- TEAM ---

fn collect_team(text: &str, roster: &mut TeamRoster, ids: &mut IdGenerator) {
    // (a) email addresses
    for m in EMAIL.find_iter(text) {
        let email = m.as_str();
        let name = name_from_email(email);
        roster.add(&name, Some(email), None, ids);
    }

    // (b) "Team: a, b; c" lines
    for line in text.lines() {
        let Some(caps) = TEAM_LINE.captures(line) else {
            continue;
        };
        for item in TEAM_SPLIT.split(&caps["list"]) {
            let item = item.trim().trim_end_matches('.');
            if item.is_empty() {
                continue;
            }
            match EMAIL.find(item) {
                Some(m) => {
                    let rest = item.replace(m.as_str(), "");
                    let rest = rest.trim_matches(|c: char| c == '<' || c == '>' || c.is_whitespace());
                    let name = if rest.is_empty() {
                        name_from_email(m.as_str())
                    } else {
                        rest.to_string()
                    };
                    roster.add(&name, Some(m.as_str()), None, ids);
                }
                None => roster.add(item.trim_start_matches('@'), None, None, ids),
            }
        }
    }

    // (c) @mentions
    for caps in MENTION.captures_iter(text) {
        let handle = caps["name"].trim_end_matches(['.', '-']);
        roster.add(handle, None, None, ids);
    }

    // (d) (Owner: X) / (Lead: X)
    for caps in ROLE_TAG.captures_iter(text) {
        let role = capitalize(&caps["role"].to_lowercase());
        roster.add(caps["name"].trim_start_matches('@'), None, Some(&role), ids);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// "priya.shah@x.org" -> "Priya Shah"
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_', '-', '+'])
        .filter(|p| !p.is_empty() && !p.chars().all(|c| c.is_ascii_digit()))
        .map(|p| capitalize(&p.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the honorific (as written) when the name starts with one.
fn leading_honorific(name: &str) -> Option<&str> {
    let first = name.split_whitespace().next()?;
    let bare = first.trim_end_matches('.').to_lowercase();
    HONORIFICS.contains(&bare.as_str()).then_some(first)
}

/// Dedup key: lowercase words without honorifics or punctuation.
fn normalize_name(name: &str) -> String {
    let name = name.trim();
    let without_title = match leading_honorific(name) {
        Some(h) => &name[h.len()..],
        None => name,
    };
    without_title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

struct TeamRoster {
    domain: String,
    members: Vec<TeamMember>,
    by_key: HashMap<String, usize>,
    synthesized_email: Vec<bool>,
}

impl TeamRoster {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            members: Vec::new(),
            by_key: HashMap::new(),
            synthesized_email: Vec::new(),
        }
    }

    fn seed(&mut self, user: &CurrentUser) {
        let key = normalize_name(&user.display_name);
        self.by_key.insert(key, self.members.len());
        self.members.push(TeamMember {
            uid: user.uid.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            lead_role: Some("Owner".to_string()),
        });
        self.synthesized_email.push(false);
    }

    fn add(
        &mut self,
        raw_name: &str,
        email: Option<&str>,
        role: Option<&str>,
        ids: &mut IdGenerator,
    ) {
        let display = raw_name.split_whitespace().collect::<Vec<_>>().join(" ");
        if display.is_empty()
            || display.chars().count() > 60
            || !display.chars().any(|c| c.is_alphabetic())
        {
            return;
        }
        let key = normalize_name(&display);
        if key.is_empty() {
            return;
        }
        let role = role
            .map(str::to_string)
            .or_else(|| leading_honorific(&display).map(str::to_string));

        if let Some(idx) = self.find(&key) {
            let existing = &mut self.members[idx];
            if existing.lead_role.is_none() && role.is_some() {
                existing.lead_role = role;
            }
            if let Some(real) = email
                && self.synthesized_email[idx]
            {
                existing.email = real.to_string();
                self.synthesized_email[idx] = false;
            }
            return;
        }

        let (email, synthesized) = match email {
            Some(e) => (e.to_string(), false),
            None => (format!("{}@{}", key.replace(' ', "."), self.domain), true),
        };
        self.by_key.insert(key, self.members.len());
        self.members.push(TeamMember {
            uid: ids.member_uid(),
            email,
            display_name: display,
            lead_role: role,
        });
        self.synthesized_email.push(synthesized);
    }

    /// Exact key match, or a lone first name ("ana" from "@ana") matching
    /// the first word of someone already listed.
    fn find(&self, key: &str) -> Option<usize> {
        if let Some(&idx) = self.by_key.get(key) {
            return Some(idx);
        }
        if key.contains(' ') {
            return None;
        }
        self.by_key
            .iter()
            .filter(|(k, _)| k.split(' ').next() == Some(key))
            .map(|(_, &idx)| idx)
            .min()
    }

    fn into_members(self) -> Vec<TeamMember> {
        self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(text: &str) -> Vec<TeamMember> {
        let cfg = IngestConfig::default();
        let mut ids = IdGenerator::new();
        extract_metadata(text, &cfg, None, &mut ids).team
    }

    #[test]
    fn test_title_prefers_explicit_label() {
        let text = "Kickoff notes\nTitle: Warehouse Automation\n- item";
        assert_eq!(extract_title(text).as_deref(), Some("Warehouse Automation"));
    }

    #[test]
    fn test_title_fallback_skips_dates_and_labels() {
        let text = "14 Jan 2026\nBudget: 5K\n# Clinic Intake Revamp\n- a";
        assert_eq!(extract_title(text).as_deref(), Some("Clinic Intake Revamp"));
    }

    #[test]
    fn test_title_never_comes_from_a_list_item() {
        assert_eq!(extract_title("1. Alpha\n2. Beta"), None);
        assert_eq!(
            extract_title("- [x] ship\nRelease notes").as_deref(),
            Some("Release notes")
        );
    }

    #[test]
    fn test_cost_sums_labelled_mentions() {
        assert_eq!(extract_cost("Budget: 2K\nCost: 500"), Some(2500.0));
        assert_eq!(extract_cost("Total budget is $1.5M"), Some(1_500_000.0));
        assert_eq!(extract_cost("Fees: 1,200 and charge 300"), Some(1500.0));
    }

    #[test]
    fn test_cost_bare_symbol_fallback() {
        assert_eq!(extract_cost("Hosting ~ $40k per year, ads €2k"), Some(42_000.0));
        assert_eq!(extract_cost("No money talk here"), None);
    }

    #[test]
    fn test_cost_suffix_does_not_eat_words() {
        assert_eq!(extract_cost("Budget 3 months of runway"), Some(3.0));
    }

    #[test]
    fn test_currency_detection() {
        assert_eq!(detect_currency("Budget: €20k", "USD"), "EUR");
        assert_eq!(detect_currency("Budget: $20k", "USD"), "USD");
        assert_eq!(detect_currency("Budget: 20k", "inr"), "INR");
        assert_eq!(detect_currency("Cost: Rs. 5000, approx $60", "USD"), "INR");
        assert_eq!(detect_currency("Cost ₹5000", "INR"), "INR");
    }

    #[test]
    fn test_category_scoring_and_ties() {
        assert_eq!(
            classify_category("Marketing campaign to grow sales and revenue"),
            CoreSystem::Business
        );
        assert_eq!(
            classify_category("GDPR audit and security policy review"),
            CoreSystem::Compliance
        );
        // One technical hit, one creative hit: declaration order decides.
        assert_eq!(classify_category("design the api"), CoreSystem::Technical);
        assert_eq!(classify_category("nothing relevant"), CoreSystem::Technical);
    }

    #[test]
    fn test_team_from_all_passes() {
        let members = team(
            "Team: Ana Ruiz, Dr. Lee; Omar\n\
             ping @kim about it\n\
             - Budget review (Owner: Omar)\n\
             cc ana.ruiz@acme.io",
        );
        let names: Vec<_> = members.iter().map(|m| m.display_name.as_str()).collect();
        // Emails are collected first, then the team line merges into them.
        assert_eq!(names, vec!["Ana Ruiz", "Dr. Lee", "Omar", "kim"]);

        let ana = &members[0];
        assert_eq!(ana.email, "ana.ruiz@acme.io");
        assert!(!ana.is_lead());

        let lee = &members[1];
        assert_eq!(lee.lead_role.as_deref(), Some("Dr."));
        assert_eq!(lee.email, "lee@placeholder.local");

        let omar = &members[2];
        assert_eq!(omar.lead_role.as_deref(), Some("Owner"));
    }

    #[test]
    fn test_team_dedup_by_normalized_name() {
        let members = team("Attendees: priya shah, PRIYA  SHAH, Prof. Priya Shah");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name, "priya shah");
        assert_eq!(members[0].lead_role.as_deref(), Some("Prof."));
    }

    #[test]
    fn test_mention_merges_into_full_name() {
        let members = team("Team: Ana Ruiz, Ben\n- Wireframes @ana\n- Review @ben @cara");
        let names: Vec<_> = members.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["Ana Ruiz", "Ben", "cara"]);
    }

    #[test]
    fn test_current_user_is_seeded_first() {
        let cfg = IngestConfig::default();
        let mut ids = IdGenerator::new();
        let me = CurrentUser {
            uid: "u-1".to_string(),
            email: "me@corp.com".to_string(),
            display_name: "Jo March".to_string(),
        };
        let meta = extract_metadata("Team: Jo March, Sam", &cfg, Some(&me), &mut ids);
        assert_eq!(meta.team.len(), 2);
        assert_eq!(meta.team[0].uid, "u-1");
        assert_eq!(meta.team[0].lead_role.as_deref(), Some("Owner"));
    }

    #[test]
    fn test_duration_estimate() {
        let cfg = IngestConfig::default();
        assert_eq!(estimate_duration(0, &cfg), ProjectDuration::weeks(4));
        assert_eq!(estimate_duration(8, &cfg), ProjectDuration::weeks(4));
        assert_eq!(estimate_duration(9, &cfg), ProjectDuration::weeks(5));
        assert_eq!(estimate_duration(20, &cfg), ProjectDuration::weeks(10));
    }
}
