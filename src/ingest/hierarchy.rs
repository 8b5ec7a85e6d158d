// File: ./src/ingest/hierarchy.rs
//! Phase / task / subtask resolution.
//!
//! The resolver is a small explicit state machine fed one structural line at
//! a time. The current parent task is always the last task of the current
//! bucket (the open phase's task list, or the orphan list before any phase
//! exists), so only its indentation and marker need to be remembered.
use crate::ingest::classifier::{MarkerKind, PhaseOrigin};
use crate::ingest::ids::IdGenerator;
use crate::model::{Phase, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Sibling,
    Subtask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    NoPhase,
    InPhaseNoParent,
    InPhaseHasParent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParentState {
    indent: usize,
    marker: MarkerKind,
}

#[derive(Debug, Default)]
pub struct HierarchyResolver {
    phases: Vec<Phase>,
    orphans: Vec<Task>,
    origin: Option<PhaseOrigin>,
    parent: Option<ParentState>,
}

impl HierarchyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ResolverState {
        match (self.phases.is_empty(), self.parent.is_some()) {
            (true, _) => ResolverState::NoPhase,
            (false, false) => ResolverState::InPhaseNoParent,
            (false, true) => ResolverState::InPhaseHasParent,
        }
    }

    pub fn open_phase_origin(&self) -> Option<PhaseOrigin> {
        self.origin
    }

    pub fn open_phase(&mut self, phase: Phase, origin: PhaseOrigin) {
        self.phases.push(phase);
        self.origin = Some(origin);
        self.parent = None;
    }

    /// A horizontal rule closes the parent task but keeps the phase open.
    pub fn section_break(&mut self) {
        self.parent = None;
    }

    /// Decides where an item at `indent` with `marker` belongs, without
    /// changing any state.
    pub fn placement(&self, indent: usize, marker: MarkerKind) -> Placement {
        let Some(parent) = self.parent else {
            return Placement::Sibling;
        };
        if indent > parent.indent + 1 {
            return Placement::Subtask;
        }
        if indent + 1 < parent.indent {
            return Placement::Sibling;
        }
        // Indentation is roughly equal: the marker style decides.
        match (parent.marker, marker) {
            (MarkerKind::Number, MarkerKind::Letter | MarkerKind::Bullet) => Placement::Subtask,
            _ => Placement::Sibling,
        }
    }

    /// Places `task` and updates the parent state. Subtasks never become
    /// parents, so nesting stays at two levels.
    pub fn push_item(&mut self, task: Task, indent: usize, marker: MarkerKind) -> Placement {
        let placement = self.placement(indent, marker);
        let bucket = match self.phases.last_mut() {
            Some(phase) => &mut phase.tasks,
            None => &mut self.orphans,
        };

        if placement == Placement::Subtask
            && let Some(parent) = bucket.last_mut()
        {
            parent.sub_tasks.push(task);
            return Placement::Subtask;
        }

        bucket.push(task);
        self.parent = Some(ParentState { indent, marker });
        Placement::Sibling
    }

    /// Folds orphans into the tree: a synthesized phase when no phase exists,
    /// otherwise the tail of the first real phase.
    pub fn finish(mut self, ids: &mut IdGenerator, default_phase_name: &str) -> Vec<Phase> {
        if self.orphans.is_empty() {
            return self.phases;
        }
        match self.phases.first_mut() {
            Some(first) => first.tasks.append(&mut self.orphans),
            None => {
                let mut phase = Phase::new(ids.phase_id(), default_phase_name);
                phase.tasks = self.orphans;
                self.phases.push(phase);
            }
        }
        self.phases
    }
}
