// File: ./src/ingest/mod.rs
//! Free-text project ingestion.
//!
//! `parse` turns pasted notes into a `ParseResult`. The metadata scan runs
//! over the whole text; the phase tree comes from a single walk over the
//! lines, classifying each one and feeding list items through enrichment
//! into the hierarchy resolver.
pub mod assemble;
pub mod classifier;
pub mod dates;
pub mod enrich;
pub mod hierarchy;
pub mod ids;
pub mod metadata;

use crate::config::IngestConfig;
use crate::model::{CurrentUser, ParseResult, Phase, Task, TaskStatus};
use assemble::Structure;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use classifier::{LineContext, LineKind, MarkerKind};
use hierarchy::HierarchyResolver;
use ids::IdGenerator;

/// Parses with the default configuration and no signed-in user.
pub fn parse(text: &str) -> ParseResult {
    ProjectParser::default().parse(text)
}

#[derive(Debug, Clone, Default)]
pub struct ProjectParser {
    config: IngestConfig,
    current_user: Option<CurrentUser>,
}

impl ProjectParser {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            current_user: None,
        }
    }

    /// Seeds `user` into every parsed team as its owner.
    pub fn with_current_user(mut self, user: CurrentUser) -> Self {
        self.current_user = Some(user);
        self
    }

    pub fn parse(&self, text: &str) -> ParseResult {
        self.parse_at(text, Utc::now())
    }

    /// Same as `parse` with a fixed clock; task dates and the report's
    /// parse date derive from `now`.
    pub fn parse_at(&self, text: &str, now: DateTime<Utc>) -> ParseResult {
        if text.trim().is_empty() {
            log::debug!("Ingest: empty input");
            return assemble::empty_result(now);
        }

        let mut ids = IdGenerator::new();
        let meta =
            metadata::extract_metadata(text, &self.config, self.current_user.as_ref(), &mut ids);
        let structure = self.walk_lines(text, now.date_naive(), &mut ids);

        log::debug!(
            "Ingest: {} phases, {} team members, cost {:?}",
            structure.phases.len(),
            meta.team.len(),
            meta.cost
        );
        assemble::assemble(text, meta, structure, &self.config, now)
    }

    fn walk_lines(&self, text: &str, today: NaiveDate, ids: &mut IdGenerator) -> Structure {
        let mut resolver = HierarchyResolver::new();
        let mut preamble = Vec::new();
        let mut seen_content = false;
        let mut seen_structure = false;

        for line in text.lines() {
            let ctx = LineContext {
                is_first_line: !seen_content,
                open_phase: resolver.open_phase_origin(),
            };
            let kind = classifier::classify_line(line, &ctx);
            if kind != LineKind::Blank {
                seen_content = true;
            }
            if kind.is_structural() {
                seen_structure = true;
            }

            match kind {
                LineKind::Blank => {}
                LineKind::PlainText => {
                    if !seen_structure {
                        preamble.push(line.trim().to_string());
                    }
                }
                LineKind::SectionBreak => resolver.section_break(),
                LineKind::PhaseHeader { name, origin, date } => {
                    if let Some(d) = date {
                        log::trace!("Date header {} opens phase", d);
                    }
                    resolver.open_phase(Phase::new(ids.phase_id(), name), origin);
                }
                LineKind::ListItem {
                    marker,
                    indent,
                    text,
                } => self.emit_task(&mut resolver, &text, indent, marker, today, ids),
                LineKind::IndentedContinuation { indent, text } => self.emit_task(
                    &mut resolver,
                    &text,
                    indent,
                    MarkerKind::Implicit,
                    today,
                    ids,
                ),
            }
        }

        Structure {
            phases: resolver.finish(ids, &self.config.default_phase_name),
            preamble,
        }
    }

    fn emit_task(
        &self,
        resolver: &mut HierarchyResolver,
        raw: &str,
        indent: usize,
        marker: MarkerKind,
        today: NaiveDate,
        ids: &mut IdGenerator,
    ) {
        let enriched = enrich::enrich_task_text(raw, today);
        if enriched.name.is_empty() {
            log::debug!("Dropping task with empty name: {:?}", raw);
            return;
        }
        let end_date = enriched
            .due
            .unwrap_or_else(|| today + Duration::days(self.config.task_span_days));

        let task = Task {
            id: ids.task_id(),
            name: enriched.name,
            status: enriched.status.unwrap_or(TaskStatus::NotStarted),
            start_date: today,
            end_date,
            assignee: enriched.assignee,
            priority: enriched.priority,
            sub_tasks: Vec::new(),
        };
        resolver.push_item(task, indent, marker);
    }
}
