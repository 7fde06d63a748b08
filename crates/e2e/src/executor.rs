//! Executor seam between the runner and whatever drives the application

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{E2eError, E2eResult};
use crate::scenario::Scenario;

/// Result of executing a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl StepResult {
    pub fn passed(step_name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: true,
            step_name: step_name.into(),
            duration_ms,
            error: None,
        }
    }

    pub fn failed(step_name: impl Into<String>, duration_ms: u64, error: &E2eError) -> Self {
        Self {
            success: false,
            step_name: step_name.into(),
            duration_ms,
            error: Some(error.to_string()),
        }
    }
}

/// Everything observed while executing one scenario
#[derive(Debug, Default)]
pub struct ScenarioRun {
    /// Steps in execution order; the last one failed if `failure` is set
    pub steps: Vec<StepResult>,

    /// First failure; later steps were not attempted
    pub failure: Option<E2eError>,

    /// Page capture taken when the scenario failed
    pub screenshot: Option<PathBuf>,
}

impl ScenarioRun {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs one scenario in isolation
///
/// `Err` means the scenario could not be executed at all. A scenario that ran
/// and failed returns `Ok` with `failure` set.
#[async_trait]
pub trait ScenarioExecutor: Send + Sync {
    /// Label used in logs and reports
    fn name(&self) -> &'static str;

    async fn execute(&self, scenario: &Scenario) -> E2eResult<ScenarioRun>;
}
