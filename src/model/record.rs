//! Unit and step records produced by ingestion and consumed by aggregation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One unit's completion event at one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    name: String,
    completed_at: NaiveDateTime,
}

impl StepRecord {
    pub fn new(name: impl Into<String>, completed_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            completed_at,
        }
    }

    /// Canonical step name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn completed_at(&self) -> NaiveDateTime {
        self.completed_at
    }
}

/// How a second observation of the same (serial number, step) is resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later observation replaces the earlier one
    #[default]
    Overwrite,
    /// First observation is kept, later ones are dropped
    KeepFirst,
}

/// Outcome of [`UnitRecord::set_step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUpdate {
    /// No record existed for this step
    Inserted,
    /// Same step seen again with the same timestamp
    Duplicate,
    /// Same step seen again with a different timestamp
    Conflict,
}

/// Step-completion history for one serial number
///
/// A partial record (as emitted by an ingestor) carries exactly one step;
/// the merger folds partial records into complete ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    serial_number: String,
    steps: HashMap<String, StepRecord>,
}

impl UnitRecord {
    /// Create a partial record holding a single step
    pub fn new(serial_number: impl Into<String>, step: StepRecord) -> Self {
        let mut steps = HashMap::with_capacity(1);
        steps.insert(step.name.clone(), step);
        Self {
            serial_number: serial_number.into(),
            steps,
        }
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.get(name)
    }

    pub fn steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.values()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Record a step, resolving an existing entry for the same name by `policy`
    pub fn set_step(&mut self, step: StepRecord, policy: DuplicatePolicy) -> StepUpdate {
        match self.steps.get_mut(&step.name) {
            None => {
                self.steps.insert(step.name.clone(), step);
                StepUpdate::Inserted
            }
            Some(existing) => {
                let update = if existing.completed_at == step.completed_at {
                    StepUpdate::Duplicate
                } else {
                    StepUpdate::Conflict
                };
                if policy == DuplicatePolicy::Overwrite {
                    *existing = step;
                }
                update
            }
        }
    }

    /// Consume the record, yielding its steps
    pub fn into_steps(self) -> impl Iterator<Item = StepRecord> {
        self.steps.into_values()
    }
}
