// Parse report: confidence, warnings and serialized shape.
use chrono::{TimeZone, Utc};
use vantageflow::model::{PartialProject, ProjectOutline, SourceType};
use vantageflow::{ProjectParser, parse};

#[test]
fn test_empty_input() {
    for text in ["", "   ", "\n\t\n"] {
        let result = parse(text);
        assert_eq!(result.project, PartialProject::default());
        assert_eq!(result.metadata.confidence, 0.0);
        assert_eq!(result.metadata.warnings, vec!["Empty input"]);
        assert_eq!(result.metadata.source_type, SourceType::Text);
    }
}

#[test]
fn test_short_input_without_budget_keeps_confidence() {
    let result = parse("Cleanup:\n- Sweep");
    assert_eq!(result.metadata.confidence, 1.0);
    assert_eq!(
        result.metadata.warnings,
        vec![
            "No budget found",
            "No team members detected",
            "No explicit dates found"
        ]
    );
}

#[test]
fn test_long_input_without_budget_or_phases() {
    let text = "Just some thoughts about the quarter. ".repeat(10);
    let result = parse(&text);

    assert_eq!(result.metadata.confidence, 0.7);
    assert!(result.metadata.warnings.contains(&"No phases detected".to_string()));
    assert!(result.metadata.warnings.contains(&"No budget found".to_string()));
}

#[test]
fn test_parse_at_uses_given_clock() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let result = ProjectParser::default().parse_at("Sprint 3\n- Retro", now);

    assert_eq!(result.metadata.parse_date, now);
    assert_eq!(result.project.start_date, Some(now.date_naive()));
    let task = &result.project.phases[0].tasks[0];
    assert_eq!(task.start_date.to_string(), "2025-06-01");
    assert_eq!(task.end_date.to_string(), "2025-06-08");
}

#[test]
fn test_json_uses_camel_case() {
    let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    let result = ProjectParser::default().parse_at("Phase 1\n- [x] Done thing\n  - child", now);
    let json = serde_json::to_value(&result).unwrap();

    let project = &json["project"];
    assert_eq!(project["coreSystem"], "Technical");
    assert_eq!(project["duration"]["unit"], "weeks");
    assert_eq!(project["phases"][0]["weekRange"], "TBD");
    let task = &project["phases"][0]["tasks"][0];
    assert_eq!(task["status"], "100%");
    assert_eq!(task["startDate"], "2026-01-05");
    assert_eq!(task["subTasks"][0]["status"], "0%");
    assert_eq!(json["metadata"]["sourceType"], "text");
}

#[test]
fn test_outline_rendering() {
    let result = parse("Launch Plan\nBudget: 3K\nPhase 1\n- [x] Press kit @dana\n  - Photos");
    let outline = result.to_outline();

    assert!(outline.contains("Launch Plan"));
    assert!(outline.contains("Phase 1"));
    assert!(outline.contains("[✔] Press kit @dana"));
    assert!(outline.contains("[ ] Photos"));
    assert!(outline.contains("Confidence:"));
}

#[test]
fn test_modal_may_is_not_a_date() {
    let result = parse("Sprint 2\n- Migrate billing\nSprint 2 may slip");
    assert!(
        result
            .metadata
            .warnings
            .contains(&"No explicit dates found".to_string())
    );

    let result = parse("Sprint 2\n- Migrate billing by 5 May");
    assert!(
        !result
            .metadata
            .warnings
            .contains(&"No explicit dates found".to_string())
    );
}
