//! Harness configuration
//!
//! Loaded from TOML with serde defaults, then overridden from the command line.
//! One value is passed into every executor; nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};
use crate::seed::DEFAULT_STORAGE_KEY;

pub const DEFAULT_BASE_URL: &str = "https://todomvc4tasj.herokuapp.com";

/// Configuration for a harness run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// URL of the application under test
    pub base_url: String,

    /// Wait budget for every action and assertion
    pub timeout_ms: u64,

    /// Delay between assertion polls
    pub poll_interval_ms: u64,

    /// localStorage slot the application rehydrates from
    pub storage_key: String,

    /// Browser engine to launch
    pub browser: Browser,

    pub headless: bool,

    pub viewport: Viewport,

    /// Directory for the JSON report and failure screenshots
    pub output_dir: PathBuf,

    pub screenshot_on_failure: bool,

    /// How long to wait for the application to answer HTTP before running
    pub startup_timeout_ms: u64,

    /// DOM selectors of the application under test
    pub selectors: Selectors,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 20_000,
            poll_interval_ms: 100,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport: Viewport::default(),
            output_dir: PathBuf::from("test-results"),
            screenshot_on_failure: true,
            startup_timeout_ms: 30_000,
            selectors: Selectors::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280,
            height: 720,
        }
    }
}

/// CSS selectors for the TodoMVC markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub new_todo: String,
    pub tasks: String,
    pub toggle: String,
    pub destroy: String,
    pub toggle_all: String,
    pub clear_completed: String,
    pub editor: String,
    pub outside: String,
    pub items_left: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            new_todo: "#new-todo".to_string(),
            tasks: "#todo-list li".to_string(),
            toggle: ".toggle".to_string(),
            destroy: ".destroy".to_string(),
            toggle_all: "#toggle-all".to_string(),
            clear_completed: "#clear-completed".to_string(),
            editor: "#todo-list li.editing .edit".to_string(),
            outside: "#header>h1".to_string(),
            items_left: "#todo-count>strong".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> E2eResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file without validating it
    ///
    /// Command-line overrides are layered on top afterwards, so callers
    /// run [`HarnessConfig::validate`] once the final values are known.
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn validate(&self) -> E2eResult<()> {
        if self.timeout_ms == 0 {
            return Err(E2eError::InvalidConfig("timeout_ms must be positive".to_string()));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.timeout_ms {
            return Err(E2eError::InvalidConfig(format!(
                "poll_interval_ms must be within 1..={}",
                self.timeout_ms
            )));
        }
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| E2eError::InvalidConfig(format!("base_url {}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(E2eError::InvalidConfig(format!(
                "base_url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(E2eError::InvalidConfig("storage_key is empty".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults_match_reference_app() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.storage_key, "todos-troopjs");
        assert_eq!(config.selectors.items_left, "#todo-count>strong");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HarnessConfig::from_toml(
            r#"
base_url = "http://127.0.0.1:8080/examples/vanillajs/"
timeout_ms = 4000
storage_key = "todos-vanillajs"
browser = "firefox"

[selectors]
new_todo = ".new-todo"
tasks = ".todo-list li"
"#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(4));
        assert_eq!(config.browser, Browser::Firefox);
        assert_eq!(config.selectors.new_todo, ".new-todo");
        assert_eq!(config.selectors.tasks, ".todo-list li");
        assert_eq!(config.selectors.toggle, ".toggle");
        assert!(config.headless);
    }

    #[test_case("timeout_ms = 0" ; "zero timeout")]
    #[test_case("base_url = \"ftp://example.com\"" ; "non http scheme")]
    #[test_case("base_url = \"not a url\"" ; "unparsable url")]
    #[test_case("storage_key = \"\"" ; "empty storage key")]
    #[test_case("poll_interval_ms = 0" ; "zero poll interval")]
    fn test_invalid_config_rejected(toml: &str) {
        let err = HarnessConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, E2eError::InvalidConfig(_)), "got {:?}", err);
    }

    #[test]
    fn test_file_values_can_be_overridden_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todomvc-e2e.toml");
        std::fs::write(&path, "timeout_ms = 0\n").unwrap();

        let mut config = HarnessConfig::from_file(&path).unwrap();
        assert!(config.validate().is_err());

        config.timeout_ms = 5_000;
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_browser() {
        assert_eq!("Chrome".parse::<Browser>().unwrap(), Browser::Chromium);
        assert!("lynx".parse::<Browser>().is_err());
    }
}
