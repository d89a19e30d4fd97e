// Recorded history of one structure, step by step

use crate::animation::{AnimationInstruction, InstructionGenerator};
use crate::config::DEFAULT_TRACE_LIMIT;
use crate::diff::{compute_diff, Transition};
use crate::error::TraceError;
use crate::structures::{Structure, StructureKind, VisualElement};
use rustc_hash::FxHashSet;
use serde_json::Value;

/// One recorded state: the snapshot plus what a renderer needs to draw it
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub label: String,
    pub snapshot: Value,
    pub visual: Vec<VisualElement>,
}

/// An instruction tagged with the trace step whose change it animates
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInstruction {
    pub trace_step: usize,
    pub instruction: AnimationInstruction,
}

/// Labelled snapshots of a single structure, with a seekable cursor
#[derive(Debug)]
pub struct Trace {
    kind: StructureKind,
    steps: Vec<TraceStep>,
    limit: usize,
    position: usize,
}

impl Trace {
    pub fn new(kind: StructureKind) -> Self {
        Self::with_limit(kind, DEFAULT_TRACE_LIMIT)
    }

    pub fn with_limit(kind: StructureKind, limit: usize) -> Self {
        Trace {
            kind,
            steps: Vec::new(),
            limit,
            position: 0,
        }
    }

    /// Snapshot `engine` and append it under `label`
    pub fn record<S: Structure>(&mut self, engine: &S, label: impl Into<String>) -> Result<(), TraceError> {
        if engine.kind() != self.kind {
            return Err(TraceError::KindMismatch {
                expected: self.kind,
                found: engine.kind(),
            });
        }
        if self.steps.len() >= self.limit {
            return Err(TraceError::LimitExceeded { limit: self.limit });
        }

        self.steps.push(TraceStep {
            label: label.into(),
            snapshot: engine.snapshot_json()?,
            visual: engine.to_visual(),
        });
        Ok(())
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn get(&self, index: usize) -> Option<&TraceStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&TraceStep> {
        self.steps.get(self.position)
    }

    /// Move the cursor; out-of-range steps are rejected
    pub fn go_to_step(&mut self, step: usize) -> bool {
        if step >= self.steps.len() {
            return false;
        }
        self.position = step;
        true
    }

    pub fn step_forward(&mut self) -> bool {
        self.go_to_step(self.position + 1)
    }

    pub fn step_backward(&mut self) -> bool {
        match self.position.checked_sub(1) {
            Some(step) => self.go_to_step(step),
            None => false,
        }
    }

    /// Changes that produced `step` from the one before it (none for step 0)
    pub fn transitions(&self, step: usize) -> Vec<Transition> {
        match (step.checked_sub(1).and_then(|i| self.steps.get(i)), self.steps.get(step)) {
            (Some(prev), Some(next)) => compute_diff(&prev.snapshot, &next.snapshot, self.kind.as_str()),
            _ => Vec::new(),
        }
    }

    /// Every step's transitions as instructions, in order
    pub fn plan(&self, generator: &InstructionGenerator) -> Vec<PlannedInstruction> {
        (1..self.steps.len())
            .flat_map(|step| {
                self.transitions(step)
                    .into_iter()
                    .map(move |transition| PlannedInstruction {
                        trace_step: step,
                        instruction: generator.instruction(&transition),
                    })
            })
            .collect()
    }

    pub fn instructions(&self, generator: &InstructionGenerator) -> Vec<AnimationInstruction> {
        self.plan(generator)
            .into_iter()
            .map(|planned| planned.instruction)
            .collect()
    }

    /// Ids of every element that appears in any recorded step
    pub fn element_ids(&self) -> FxHashSet<String> {
        self.steps
            .iter()
            .flat_map(|step| step.visual.iter().map(|element| element.id.clone()))
            .collect()
    }
}
