//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Element not found at step {step}: {detail}")]
    ElementNotFound { step: String, detail: String },

    #[error("Ambiguous match: {count} tasks have the exact text {text:?}, expected exactly one")]
    AmbiguousMatch { text: String, count: usize },

    #[error("Assertion failed at step {step}: expected {expected}, last observed {observed}")]
    AssertionTimeout {
        step: String,
        expected: String,
        observed: String,
    },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Seeding failed: {0}")]
    SeedingFailure(String),

    #[error("Playwright not found. Install with: npm i -D playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Application unreachable after {0} attempts")]
    AppUnreachable(usize),

    #[error("Scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Short machine-readable kind, used in JSON reports
    pub fn kind(&self) -> &'static str {
        match self {
            E2eError::ElementNotFound { .. } => "element_not_found",
            E2eError::AmbiguousMatch { .. } => "ambiguous_match",
            E2eError::AssertionTimeout { .. } => "assertion",
            E2eError::Timeout(_) => "timeout",
            E2eError::StepFailed { .. } => "step_failed",
            E2eError::SeedingFailure(_) => "seeding",
            E2eError::PlaywrightNotFound | E2eError::Playwright(_) => "playwright",
            E2eError::AppUnreachable(_) => "app_unreachable",
            E2eError::ScenarioParse(_) => "scenario_parse",
            E2eError::InvalidConfig(_) => "config",
            E2eError::Io(_)
            | E2eError::Json(_)
            | E2eError::Yaml(_)
            | E2eError::Toml(_)
            | E2eError::Http(_) => "internal",
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
