// File: ./src/model/display.rs
use crate::model::item::{ParseResult, Task, TaskStatus};
use std::fmt::Write;

pub trait TaskDisplay {
    fn checkbox_symbol(&self) -> &'static str;
    fn to_outline_line(&self) -> String;
}

impl TaskDisplay for Task {
    fn checkbox_symbol(&self) -> &'static str {
        match self.status {
            TaskStatus::Done => "[✔]",
            TaskStatus::AtRisk => "[!]",
            TaskStatus::Started | TaskStatus::Halfway | TaskStatus::Nearly => "[▶]",
            TaskStatus::NotStarted => "[ ]",
        }
    }

    fn to_outline_line(&self) -> String {
        let mut s = format!("{} {}", self.checkbox_symbol(), self.name);
        if let Some(p) = self.priority {
            s.push_str(&format!(" ({})", p));
        }
        if let Some(who) = &self.assignee {
            s.push_str(&format!(" @{}", who));
        }
        s.push_str(&format!(" [due {}]", self.end_date.format("%Y-%m-%d")));
        s
    }
}

/// Human-readable preview of an import, shown before the user commits it.
pub trait ProjectOutline {
    fn to_outline(&self) -> String;
}

impl ProjectOutline for ParseResult {
    fn to_outline(&self) -> String {
        let p = &self.project;
        let mut out = String::new();

        let _ = writeln!(out, "{}", p.name.as_deref().unwrap_or("(untitled project)"));
        if let Some(desc) = &p.description {
            let _ = writeln!(out, "  {}", desc);
        }
        if let Some(cat) = p.core_system {
            let _ = writeln!(out, "  Category: {}", cat);
        }
        if let Some(d) = p.duration {
            let _ = writeln!(out, "  Duration: {}", d);
        }
        if p.cost > 0.0 {
            let _ = writeln!(
                out,
                "  Budget:   {} {}",
                p.cost,
                p.currency.as_deref().unwrap_or("")
            );
        }
        if !p.team.is_empty() {
            let names: Vec<String> = p
                .team
                .iter()
                .map(|m| match &m.lead_role {
                    Some(role) => format!("{} ({})", m.display_name, role),
                    None => m.display_name.clone(),
                })
                .collect();
            let _ = writeln!(out, "  Team:     {}", names.join(", "));
        }

        for phase in &p.phases {
            let _ = writeln!(out);
            let _ = writeln!(out, "# {} [{}]", phase.name, phase.week_range);
            for task in &phase.tasks {
                let _ = writeln!(out, "  {}", task.to_outline_line());
                for sub in &task.sub_tasks {
                    let _ = writeln!(out, "      {}", sub.to_outline_line());
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Confidence: {:.0}%",
            self.metadata.confidence * 100.0
        );
        for w in &self.metadata.warnings {
            let _ = writeln!(out, "  ! {}", w);
        }
        out
    }
}
