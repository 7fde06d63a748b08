//! Playwright browser automation
//!
//! A scenario is compiled into a single Node script so every step shares one
//! browser session. The script reports progress as JSON lines on stdout,
//! which are parsed back into step results and typed errors.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info, warn};

use crate::config::{HarnessConfig, Selectors};
use crate::error::{E2eError, E2eResult};
use crate::executor::{ScenarioExecutor, ScenarioRun, StepResult};
use crate::scenario::{Action, EditCommit, Scenario};
use crate::seed::{js_literal, FixtureSeeder};

/// Helpers every generated script starts with; expects a `CONFIG` constant
pub const PRELUDE: &str = include_str!("js/prelude.js");

/// Time allowed for node and the browser to start, on top of step budgets
const LAUNCH_SLACK: Duration = Duration::from_secs(60);

/// Playwright browser handle
pub struct PlaywrightHandle {
    config: HarnessConfig,
    seeder: FixtureSeeder,
    /// Directory node resolves `require('playwright')` from
    node_path: PathBuf,
}

/// Values the generated script reads from its `CONFIG` constant
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptConfig<'a> {
    base_url: &'a str,
    timeout_ms: u64,
    poll_interval_ms: u64,
    selectors: &'a Selectors,
    screenshot: Option<String>,
}

/// Progress line printed by the generated script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Step {
        index: usize,
        name: String,
        duration_ms: u64,
    },
    Done,
    Failed {
        #[serde(default)]
        step: Option<usize>,
        #[serde(default)]
        name: Option<String>,
        kind: String,
        message: String,
        #[serde(default)]
        observed: Option<serde_json::Value>,
        #[serde(default)]
        screenshot: Option<PathBuf>,
    },
}

impl PlaywrightHandle {
    /// Create a new Playwright handle, verifying the toolchain is present
    pub fn new(config: HarnessConfig) -> E2eResult<Self> {
        let version = Self::check_playwright_installed()?;
        info!("Using Playwright {}", version);

        let handle = Self::offline(config)?;
        if handle.config.screenshot_on_failure {
            std::fs::create_dir_all(handle.config.screenshot_dir())?;
        }
        Ok(handle)
    }

    /// Create a handle without probing for node, for script generation only
    pub fn offline(config: HarnessConfig) -> E2eResult<Self> {
        config.validate()?;
        let seeder = FixtureSeeder::new(config.storage_key.clone())?;
        let node_path = match std::env::var_os("NODE_PATH") {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()?.join("node_modules"),
        };

        Ok(Self {
            config,
            seeder,
            node_path,
        })
    }

    /// Check if Playwright is installed and return its version
    fn check_playwright_installed() -> E2eResult<String> {
        let output = Command::new("npx")
            .args(["--no-install", "playwright", "--version"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                Ok(parse_version(&String::from_utf8_lossy(&out.stdout))
                    .unwrap_or_else(|| "unknown".to_string()))
            }
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Build the Playwright script for a whole scenario
    pub fn build_script(&self, scenario: &Scenario) -> E2eResult<String> {
        let script_config = ScriptConfig {
            base_url: &self.config.base_url,
            timeout_ms: self.config.timeout_ms,
            poll_interval_ms: self.config.poll_interval_ms,
            selectors: &self.config.selectors,
            screenshot: self.screenshot_path(scenario).map(|p| p.to_string_lossy().to_string()),
        };

        let mut script = String::new();

        // Header
        script.push_str("const { chromium, firefox, webkit } = require('playwright');\n\n");
        script.push_str(&format!(
            "const CONFIG = {};\n\n",
            serde_json::to_string_pretty(&script_config)?
        ));
        script.push_str(PRELUDE);
        script.push_str(&format!(
            r#"
(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  context.setDefaultTimeout(CONFIG.timeoutMs);
  const page = await context.newPage();

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = self.config.viewport.width,
            height = self.config.viewport.height,
        ));

        // One block per step
        for (i, action) in scenario.steps.iter().enumerate() {
            script.push_str(&format!(
                "\n    // Step {}: {}\n    await step({}, {}, async () => {{\n",
                i + 1,
                comment_text(&action.name()),
                i,
                js_literal(&action.name())?
            ));
            for line in self.step_to_js(action)?.lines() {
                script.push_str("  ");
                script.push_str(line);
                script.push('\n');
            }
            script.push_str("    });\n");
        }

        // Footer
        script.push_str(
            r#"
    emit({ event: 'done' });
  } catch (error) {
    let screenshot = null;
    if (CONFIG.screenshot) {
      try {
        await page.screenshot({ path: CONFIG.screenshot, fullPage: true });
        screenshot = CONFIG.screenshot;
      } catch (_) {}
    }
    emit({
      event: 'failed',
      step: error.stepIndex === undefined ? null : error.stepIndex,
      name: error.stepName === undefined ? null : error.stepName,
      kind: error.kind || (error.name === 'TimeoutError' ? 'timeout' : 'playwright'),
      message: error.message,
      observed: error.observed === undefined ? null : error.observed,
      screenshot,
    });
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        Ok(script)
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, action: &Action) -> E2eResult<String> {
        let js = match action {
            Action::Given { tasks, filter } => {
                let mut js = self.seeder.seed_script(tasks)?;
                if let Some(filter) = filter {
                    js.push_str(&format!(
                        "\n    await clickFilter(page, {});",
                        js_literal(filter.link_text())?
                    ));
                }
                js
            }
            Action::Add { texts } => {
                let mut lines = Vec::with_capacity(texts.len() * 2);
                for text in texts {
                    lines.push(format!(
                        "    await page.fill(SEL.new_todo, {});",
                        js_literal(text)?
                    ));
                    lines.push("    await page.press(SEL.new_todo, 'Enter');".to_string());
                }
                lines.join("\n")
            }
            Action::Toggle { text } => format!(
                "    await (await findTask(page, {})).locator(SEL.toggle).click();",
                js_literal(text)?
            ),
            Action::ToggleAll => "    await page.click(SEL.toggle_all);".to_string(),
            Action::Delete { text } => format!(
                r#"    const row = await findTask(page, {});
    await row.hover();
    await row.locator(SEL.destroy).click();"#,
                js_literal(text)?
            ),
            Action::ClearCompleted => "    await page.click(SEL.clear_completed);".to_string(),
            Action::Edit {
                old_text,
                new_text,
                commit,
            } => {
                let leave = match commit {
                    EditCommit::Enter => "    await editor.press('Enter');",
                    EditCommit::Escape => "    await editor.press('Escape');",
                    EditCommit::Tab => "    await editor.press('Tab');",
                    EditCommit::ClickOutside => "    await page.click(SEL.outside);",
                };
                format!(
                    r#"    const row = await findTask(page, {});
    await row.dblclick();
    const editor = page.locator(SEL.editor);
    await editor.fill({});
{}"#,
                    js_literal(old_text)?,
                    js_literal(new_text)?,
                    leave
                )
            }
            Action::Filter { filter } => format!(
                "    await clickFilter(page, {});",
                js_literal(filter.link_text())?
            ),
            Action::AssertTasks { texts } => {
                format!("    await expectTexts(page, {}, false);", js_literal(texts)?)
            }
            Action::AssertVisibleTasks { texts } => {
                format!("    await expectTexts(page, {}, true);", js_literal(texts)?)
            }
            Action::AssertItemsLeft { count } => {
                format!("    await expectItemsLeft(page, {});", count)
            }
        };
        Ok(js)
    }

    /// Where a failing scenario's page capture goes
    fn screenshot_path(&self, scenario: &Scenario) -> Option<PathBuf> {
        if !self.config.screenshot_on_failure {
            return None;
        }
        Some(
            self.config
                .screenshot_dir()
                .join(format!("{}.png", file_stem(&scenario.name))),
        )
    }

    /// Upper bound on the whole script: every step may use its full wait budget
    fn scenario_budget(&self, scenario: &Scenario) -> Duration {
        let steps = scenario.steps.len().max(1) as u32;
        self.config.timeout() * steps + LAUNCH_SLACK
    }

    /// Execute a script via node and collect its events
    pub async fn run_script(&self, script: &str, budget: Duration) -> E2eResult<ScriptOutput> {
        let temp_dir = tempfile::Builder::new().prefix("todomvc-e2e").tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .current_dir(temp_dir.path())
            .env("NODE_PATH", &self.node_path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(budget, cmd.output())
            .await
            .map_err(|_| E2eError::Timeout(format!("scenario script exceeded {:?}", budget)))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        Ok(ScriptOutput {
            events: parse_events(&stdout),
            exit_ok: output.status.success(),
            stderr,
        })
    }
}

/// Raw outcome of one node invocation
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub events: Vec<ScriptEvent>,
    pub exit_ok: bool,
    pub stderr: String,
}

impl ScriptOutput {
    /// Fold script events into a scenario run
    pub fn into_run(self, scenario: &Scenario) -> ScenarioRun {
        let mut run = ScenarioRun::default();
        let mut done = false;

        for event in self.events {
            match event {
                ScriptEvent::Step {
                    name, duration_ms, ..
                } => run.steps.push(StepResult::passed(name, duration_ms)),
                ScriptEvent::Done => done = true,
                ScriptEvent::Failed {
                    step,
                    name,
                    kind,
                    message,
                    observed,
                    screenshot,
                } => {
                    let step_name = name
                        .or_else(|| step.and_then(|i| scenario.steps.get(i)).map(Action::name))
                        .unwrap_or_else(|| "launch".to_string());
                    let error = failure_to_error(&kind, &step_name, message, observed);
                    run.steps.push(StepResult::failed(step_name, 0, &error));
                    run.failure = Some(error);
                    run.screenshot = screenshot;
                }
            }
        }

        if run.failure.is_none() && !(done && self.exit_ok) {
            run.failure = Some(classify_stderr(&self.stderr));
        }

        run
    }
}

#[async_trait]
impl ScenarioExecutor for PlaywrightHandle {
    fn name(&self) -> &'static str {
        "playwright"
    }

    async fn execute(&self, scenario: &Scenario) -> E2eResult<ScenarioRun> {
        let script = self.build_script(scenario)?;
        let output = self.run_script(&script, self.scenario_budget(scenario)).await?;
        if !output.stderr.trim().is_empty() {
            debug!("node stderr for {}: {}", scenario.name, output.stderr.trim());
        }
        Ok(output.into_run(scenario))
    }
}

/// Text safe to place after `//`: JS ends a line comment on any of these
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => ' ',
            c => c,
        })
        .collect()
}

/// Scenario name reduced to a single safe path component
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Parse JSON-line events, ignoring anything else the page logged
pub fn parse_events(stdout: &str) -> Vec<ScriptEvent> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Ignoring unparsable script output {:?}: {}", line, e);
                None
            }
        })
        .collect()
}

fn failure_to_error(
    kind: &str,
    step: &str,
    message: String,
    observed: Option<serde_json::Value>,
) -> E2eError {
    let observed_text = observed
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "nothing".to_string());

    match kind {
        "assertion" => E2eError::AssertionTimeout {
            step: step.to_string(),
            expected: message,
            observed: observed_text,
        },
        "not_found" => E2eError::ElementNotFound {
            step: step.to_string(),
            detail: format!("{} (rows: {})", message, observed_text),
        },
        "ambiguous" => {
            let text = observed
                .as_ref()
                .and_then(|v| v.get("text"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let count = observed
                .as_ref()
                .and_then(|v| v.get("count"))
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as usize;
            E2eError::AmbiguousMatch { text, count }
        }
        "seeding" => E2eError::SeedingFailure(format!("{} (stored: {})", message, observed_text)),
        "timeout" => E2eError::Timeout(format!("{}: {}", step, message)),
        _ => E2eError::StepFailed {
            step: step.to_string(),
            reason: message,
        },
    }
}

fn classify_stderr(stderr: &str) -> E2eError {
    let missing = Regex::new(r"Cannot find module '(@playwright/test|playwright)'")
        .map(|re| re.is_match(stderr))
        .unwrap_or(false);
    if missing {
        return E2eError::PlaywrightNotFound;
    }
    let tail: Vec<&str> = stderr.lines().rev().take(20).collect();
    let tail: Vec<&str> = tail.into_iter().rev().collect();
    E2eError::Playwright(format!(
        "script ended without a result:\n{}",
        tail.join("\n")
    ))
}

fn parse_version(output: &str) -> Option<String> {
    let re = Regex::new(r"(\d+\.\d+\.\d+)").ok()?;
    re.captures(output).map(|c| c[1].to_string())
}

/// Write a scenario's generated script next to the report, for debugging
pub fn dump_script(handle: &PlaywrightHandle, scenario: &Scenario, dir: &Path) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.js", file_stem(&scenario.name)));
    std::fs::write(&path, handle.build_script(scenario)?)?;
    Ok(path)
}
