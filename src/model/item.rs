// File: ./src/model/item.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

pub const WEEK_RANGE_TBD: &str = "TBD";

// --- TASK STATE ---

/// Progress buckets used across the dashboard.
///
/// Free-text ingestion only ever produces `NotStarted`, `Started` and `Done`;
/// the other buckets exist for manual edits after import.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "0%")]
    NotStarted,
    #[serde(rename = "25%")]
    Started,
    #[serde(rename = "50%")]
    Halfway,
    #[serde(rename = "75%")]
    Nearly,
    #[serde(rename = "100%")]
    Done,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl TaskStatus {
    pub fn percent(&self) -> Option<u8> {
        match self {
            TaskStatus::NotStarted => Some(0),
            TaskStatus::Started => Some(25),
            TaskStatus::Halfway => Some(50),
            TaskStatus::Nearly => Some(75),
            TaskStatus::Done => Some(100),
            TaskStatus::AtRisk => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(p) => write!(f, "{}%", p),
            None => write!(f, "At Risk"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Accepts the level words and the P1-P3 shorthand, case-insensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "critical" | "urgent" => Some(Priority::Critical),
            "high" | "p1" => Some(Priority::High),
            "medium" | "med" | "normal" | "p2" => Some(Priority::Medium),
            "low" | "p3" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Coarse project category. Declaration order doubles as the tie-break order
/// of the keyword scoring in the metadata extractor.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum CoreSystem {
    #[default]
    Technical,
    Business,
    Creative,
    Research,
    Compliance,
}

impl fmt::Display for CoreSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreSystem::Technical => write!(f, "Technical"),
            CoreSystem::Business => write!(f, "Business"),
            CoreSystem::Creative => write!(f, "Creative"),
            CoreSystem::Research => write!(f, "Research"),
            CoreSystem::Compliance => write!(f, "Compliance"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProjectDuration {
    pub value: u32,
    pub unit: DurationUnit,
}

impl ProjectDuration {
    pub fn weeks(value: u32) -> Self {
        Self {
            value,
            unit: DurationUnit::Weeks,
        }
    }
}

impl fmt::Display for ProjectDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            DurationUnit::Days => "day",
            DurationUnit::Weeks => "week",
            DurationUnit::Months => "month",
        };
        let plural = if self.value == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.value, unit, plural)
    }
}

// --- PROJECT TREE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub sub_tasks: Vec<Task>,
}

impl Task {
    /// Number of tasks in this subtree, the task itself included.
    pub fn count(&self) -> usize {
        1 + self.sub_tasks.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub week_range: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    pub fn new(id: String, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            week_range: WEEK_RANGE_TBD.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.iter().map(Task::count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_role: Option<String>,
}

impl TeamMember {
    pub fn is_lead(&self) -> bool {
        self.lead_role.is_some()
    }
}

/// The signed-in user, seeded into the team so an imported project is never
/// ownerless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}

/// A project as recovered from free text. Every field may be missing or
/// defaulted; the caller treats those as "needs user confirmation".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub core_system: Option<CoreSystem>,
    pub start_date: Option<NaiveDate>,
    pub duration: Option<ProjectDuration>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default)]
    pub cost: f64,
    pub currency: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl PartialProject {
    /// Tasks plus subtasks across all phases.
    pub fn total_task_count(&self) -> usize {
        self.phases.iter().map(Phase::task_count).sum()
    }
}

// --- REPORT ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub source_type: SourceType,
    pub parse_date: DateTime<Utc>,
    pub confidence: f64,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub project: PartialProject,
    pub metadata: ParseReport,
}
