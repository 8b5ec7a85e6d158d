// File: ./src/ingest/assemble.rs
//! Merges the resolved phase tree with the whole-text metadata, fills the
//! gaps with defaults and scores the result.
use crate::config::IngestConfig;
use crate::ingest::metadata::{self, ProjectMetadata};
use crate::model::{ParseReport, ParseResult, PartialProject, Phase, SourceType};
use chrono::{DateTime, Utc};

pub const WARN_EMPTY: &str = "Empty input";
pub const WARN_NO_BUDGET: &str = "No budget found";
pub const WARN_NO_TEAM: &str = "No team members detected";
pub const WARN_NO_PHASES: &str = "No phases detected";
pub const WARN_NO_DATES: &str = "No explicit dates found";

/// Everything the line walk produced.
#[derive(Debug, Default)]
pub struct Structure {
    pub phases: Vec<Phase>,
    /// Plain-text lines seen before the first structural line.
    pub preamble: Vec<String>,
}

pub fn empty_result(now: DateTime<Utc>) -> ParseResult {
    ParseResult {
        project: PartialProject::default(),
        metadata: ParseReport {
            source_type: SourceType::Text,
            parse_date: now,
            confidence: 0.0,
            warnings: vec![WARN_EMPTY.to_string()],
        },
    }
}

pub fn assemble(
    text: &str,
    meta: ProjectMetadata,
    structure: Structure,
    config: &IngestConfig,
    now: DateTime<Utc>,
) -> ParseResult {
    let Structure { phases, preamble } = structure;

    let mut project = PartialProject {
        start_date: Some(now.date_naive()),
        core_system: Some(meta.category),
        cost: meta.cost.unwrap_or(0.0),
        currency: Some(meta.currency.clone()),
        ..Default::default()
    };
    project.phases = phases;
    project.duration = Some(metadata::estimate_duration(
        project.total_task_count(),
        config,
    ));
    project.description = Some(describe(
        meta.description.clone(),
        meta.title.as_deref(),
        &project.phases,
        &preamble,
        config,
    ));
    project.name = meta.title.clone();
    project.team = meta.team.clone();

    let (confidence, warnings) = score(text, &meta, &project, config);
    if !warnings.is_empty() {
        log::debug!("Ingest warnings: {}", warnings.join("; "));
    }

    ParseResult {
        project,
        metadata: ParseReport {
            source_type: SourceType::Text,
            parse_date: now,
            confidence,
            warnings,
        },
    }
}

/// Explicit label, then a summary of phase names, then the prose before the
/// first list, then a stock sentence.
pub fn describe(
    explicit: Option<String>,
    title: Option<&str>,
    phases: &[Phase],
    preamble: &[String],
    config: &IngestConfig,
) -> String {
    if let Some(d) = explicit.filter(|d| !d.trim().is_empty()) {
        return d;
    }

    if !phases.is_empty() {
        let names: Vec<&str> = phases
            .iter()
            .take(config.max_description_phases)
            .map(|p| p.name.as_str())
            .collect();
        return format!("Project covering: {}.", names.join(", "));
    }

    let prose: Vec<&str> = preamble
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !metadata::is_label_line(l))
        .filter(|l| title.is_none_or(|t| !l.trim_start_matches('#').trim().starts_with(t)))
        .collect();
    if !prose.is_empty() {
        return prose.join(" ");
    }

    format!("{} imported from free-text notes.", title.unwrap_or("Project"))
}

fn score(
    text: &str,
    meta: &ProjectMetadata,
    project: &PartialProject,
    config: &IngestConfig,
) -> (f64, Vec<String>) {
    let mut confidence: f64 = 1.0;
    let mut warnings = Vec::new();

    if meta.cost.is_none() {
        warnings.push(WARN_NO_BUDGET.to_string());
        if text.chars().count() > config.substantial_input_chars {
            confidence -= 0.1;
        }
    }
    if project.team.is_empty() {
        warnings.push(WARN_NO_TEAM.to_string());
    }
    if project.phases.is_empty() {
        warnings.push(WARN_NO_PHASES.to_string());
        confidence -= 0.2;
    }
    if !meta.has_explicit_dates {
        warnings.push(WARN_NO_DATES.to_string());
    }

    let confidence = (confidence.max(0.0) * 100.0).round() / 100.0;
    (confidence, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoreSystem;

    fn meta() -> ProjectMetadata {
        ProjectMetadata {
            title: Some("Roadmap".to_string()),
            description: None,
            cost: None,
            currency: "USD".to_string(),
            category: CoreSystem::Technical,
            team: Vec::new(),
            has_explicit_dates: false,
        }
    }

    fn phases(names: &[&str]) -> Vec<Phase> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Phase::new(format!("p{}", i), *n))
            .collect()
    }

    #[test]
    fn test_description_fallback_chain() {
        let cfg = IngestConfig::default();
        assert_eq!(
            describe(Some("Explicit".into()), None, &phases(&["A"]), &[], &cfg),
            "Explicit"
        );
        assert_eq!(
            describe(None, None, &phases(&["A", "B", "C", "D", "E", "F"]), &[], &cfg),
            "Project covering: A, B, C, D, E."
        );
        let preamble = vec![
            "# Roadmap".to_string(),
            "Budget: 4K".to_string(),
            "We are rebuilding the intake flow.".to_string(),
        ];
        assert_eq!(
            describe(None, Some("Roadmap"), &[], &preamble, &cfg),
            "We are rebuilding the intake flow."
        );
        assert_eq!(
            describe(None, Some("Roadmap"), &[], &[], &cfg),
            "Roadmap imported from free-text notes."
        );
        assert_eq!(
            describe(None, None, &[], &[], &cfg),
            "Project imported from free-text notes."
        );
    }

    #[test]
    fn test_budget_penalty_needs_substantial_input() {
        let cfg = IngestConfig::default();
        let project = PartialProject {
            phases: phases(&["A"]),
            ..Default::default()
        };

        let (c, w) = score("short", &meta(), &project, &cfg);
        assert_eq!(c, 1.0);
        assert!(w.contains(&WARN_NO_BUDGET.to_string()));

        let long = "x".repeat(cfg.substantial_input_chars + 1);
        let (c, _) = score(&long, &meta(), &project, &cfg);
        assert_eq!(c, 0.9);
    }

    #[test]
    fn test_no_phases_penalty_and_warning_order() {
        let cfg = IngestConfig::default();
        let long = "x".repeat(500);
        let (c, w) = score(&long, &meta(), &PartialProject::default(), &cfg);
        assert_eq!(c, 0.7);
        assert_eq!(
            w,
            vec![WARN_NO_BUDGET, WARN_NO_TEAM, WARN_NO_PHASES, WARN_NO_DATES]
        );
    }

    #[test]
    fn test_empty_result_shape() {
        let now = Utc::now();
        let r = empty_result(now);
        assert_eq!(r.project, PartialProject::default());
        assert_eq!(r.metadata.confidence, 0.0);
        assert_eq!(r.metadata.warnings, vec![WARN_EMPTY]);
        assert_eq!(r.metadata.parse_date, now);
    }
}
