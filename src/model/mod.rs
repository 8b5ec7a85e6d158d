// File: ./src/model/mod.rs
pub mod display;
pub mod item;

pub use display::{ProjectOutline, TaskDisplay};
pub use item::{
    CoreSystem, CurrentUser, DurationUnit, ParseReport, ParseResult, PartialProject, Phase,
    Priority, ProjectDuration, SourceType, Task, TaskStatus, TeamMember,
};
