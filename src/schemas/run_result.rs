//! Accumulated outcome of one provisioning pass.

use crate::libs::errors::InstallError;
use std::collections::{BTreeMap, BTreeSet};

/// What happened to a single tool during the pass.
#[derive(Debug)]
pub enum ToolOutcome {
    /// Installed by this run.
    Installed,
    /// Already on PATH, no strategy invoked.
    Skipped,
    /// The strategy returned an error; the cause is kept for the report.
    Failed(InstallError),
}

/// The three result sets of a run. Every registry binary lands in exactly one of them.
#[derive(Debug, Default)]
pub struct RunResult {
    pub installed: BTreeSet<String>,
    pub skipped: BTreeSet<String>,
    pub failed: BTreeSet<String>,
    /// Failure causes, keyed by binary name. Same keys as `failed`.
    pub causes: BTreeMap<String, String>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for `binary`. A binary must be recorded at most once per run.
    pub fn record(&mut self, binary: &str, outcome: ToolOutcome) {
        debug_assert!(
            !self.contains(binary),
            "outcome for '{binary}' recorded twice"
        );
        match outcome {
            ToolOutcome::Installed => {
                self.installed.insert(binary.to_string());
            }
            ToolOutcome::Skipped => {
                self.skipped.insert(binary.to_string());
            }
            ToolOutcome::Failed(err) => {
                self.failed.insert(binary.to_string());
                self.causes.insert(binary.to_string(), err.to_string());
            }
        }
    }

    /// Builds a result from the per-tool values produced by the workers.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (String, ToolOutcome)>,
    {
        let mut result = RunResult::new();
        for (binary, outcome) in outcomes {
            result.record(&binary, outcome);
        }
        result
    }

    pub fn contains(&self, binary: &str) -> bool {
        self.installed.contains(binary)
            || self.skipped.contains(binary)
            || self.failed.contains(binary)
    }

    /// Binaries that should be on PATH after the run: installed now or already present.
    pub fn present(&self) -> Vec<String> {
        self.installed.union(&self.skipped).cloned().collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.installed.len() + self.skipped.len() + self.failed.len()
    }
}
