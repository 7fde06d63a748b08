//! Main test runner that executes scenarios one after another

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::E2eResult;
use crate::executor::{ScenarioExecutor, StepResult};
use crate::scenario::Scenario;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    pub error_kind: Option<String>,
    pub screenshot: Option<PathBuf>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub executor: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Runs scenarios sequentially through one executor
pub struct TestRunner {
    executor: Box<dyn ScenarioExecutor>,

    /// Output directory for results
    output_dir: PathBuf,
}

impl TestRunner {
    pub fn new(executor: Box<dyn ScenarioExecutor>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            output_dir: output_dir.into(),
        }
    }

    /// Run a list of scenarios; a failing scenario never stops the rest
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> TestSuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());
        let mut passed = 0;
        let mut failed = 0;

        info!(
            "Running {} scenario(s) with the {} executor...",
            scenarios.len(),
            self.executor.name()
        );

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        TestSuiteResult {
            executor: self.executor.name().to_string(),
            started_at,
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Run a single scenario, folding executor errors into a failed result
    pub async fn run_scenario(&self, scenario: &Scenario) -> TestResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        let outcome = self.executor.execute(scenario).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(run) => TestResult {
                name: scenario.name.clone(),
                success: run.success(),
                duration_ms,
                error_kind: run.failure.as_ref().map(|e| e.kind().to_string()),
                error: run.failure.as_ref().map(|e| e.to_string()),
                steps: run.steps,
                screenshot: run.screenshot,
            },
            Err(e) => TestResult {
                name: scenario.name.clone(),
                success: false,
                duration_ms,
                steps: vec![],
                error_kind: Some(e.kind().to_string()),
                error: Some(e.to_string()),
                screenshot: None,
            },
        }
    }

    /// Write suite results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Select scenarios by exact name or by tag; no selector keeps everything
pub fn select<'a>(
    scenarios: &'a [Scenario],
    name: Option<&str>,
    tag: Option<&str>,
) -> Vec<&'a Scenario> {
    scenarios
        .iter()
        .filter(|s| name.map_or(true, |n| s.name == n))
        .filter(|s| tag.map_or(true, |t| s.tags.iter().any(|st| st == t)))
        .collect()
}
