//! Integration testing module
//!
//! End-to-end tests over a result tree on disk:
//! - Indexing and self-healing index loads
//! - Filter queries through the command line entry point
//! - Output projections

pub mod e2e;
pub mod fixtures;

/// Outcome of a scenario, with every failed check collected
#[derive(Debug, Default)]
pub struct ScenarioResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ScenarioResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            errors: vec![msg.into()],
        }
    }

    /// Record a failed check when `ok` is false.
    pub fn check(&mut self, ok: bool, msg: impl Into<String>) {
        if !ok {
            self.is_valid = false;
            self.errors.push(msg.into());
        }
    }
}
