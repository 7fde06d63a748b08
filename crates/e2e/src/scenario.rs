//! Scenario definitions, built in Rust or parsed from YAML

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{E2eError, E2eResult};
use crate::task::{Filter, Task};

/// One independent test case: precondition, actions, assertions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Steps to execute in order
    pub steps: Vec<Action>,
}

/// How an inline edit is left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditCommit {
    /// Submit with Enter
    Enter,
    /// Discard with Escape
    Escape,
    /// Blur by tabbing away
    Tab,
    /// Blur by clicking the page header
    ClickOutside,
}

impl EditCommit {
    /// Whether leaving the editor this way keeps the new text
    pub fn commits(self) -> bool {
        !matches!(self, EditCommit::Escape)
    }

    fn as_str(self) -> &'static str {
        match self {
            EditCommit::Enter => "enter",
            EditCommit::Escape => "escape",
            EditCommit::Tab => "tab",
            EditCommit::ClickOutside => "click_outside",
        }
    }
}

/// A single step in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Replace persisted state, reload, optionally switch filter
    Given {
        #[serde(default)]
        tasks: Vec<Task>,
        #[serde(default)]
        filter: Option<Filter>,
    },

    /// Type each text into the new-todo input and press Enter
    Add { texts: Vec<String> },

    /// Flip the completion of the task with this exact text
    Toggle { text: String },

    /// Click the bulk toggle
    ToggleAll,

    /// Hover the task and click its destroy button
    Delete { text: String },

    /// Remove every completed task
    ClearCompleted,

    /// Double-click a task, type new text, leave the editor
    Edit {
        old_text: String,
        new_text: String,
        #[serde(default = "default_commit")]
        commit: EditCommit,
    },

    /// Click a filter link
    Filter { filter: Filter },

    /// All rows, hidden or not, have exactly these texts
    AssertTasks {
        #[serde(default)]
        texts: Vec<String>,
    },

    /// Rendered rows have exactly these texts
    AssertVisibleTasks {
        #[serde(default)]
        texts: Vec<String>,
    },

    /// The remaining-items counter shows exactly this number
    AssertItemsLeft { count: usize },
}

fn default_commit() -> EditCommit {
    EditCommit::Enter
}

impl Action {
    /// Short label used in logs and step results
    pub fn name(&self) -> String {
        match self {
            Action::Given { tasks, filter } => match filter {
                Some(f) => format!("given:{}@{}", tasks.len(), f),
                None => format!("given:{}", tasks.len()),
            },
            Action::Add { texts } => format!("add:{}", texts.join(",")),
            Action::Toggle { text } => format!("toggle:{}", text),
            Action::ToggleAll => "toggle_all".to_string(),
            Action::Delete { text } => format!("delete:{}", text),
            Action::ClearCompleted => "clear_completed".to_string(),
            Action::Edit {
                old_text,
                new_text,
                commit,
            } => format!("edit[{}]:{}->{}", commit.as_str(), old_text, new_text),
            Action::Filter { filter } => format!("filter:{}", filter),
            Action::AssertTasks { texts } => format!("assert_tasks:[{}]", texts.join(",")),
            Action::AssertVisibleTasks { texts } => {
                format!("assert_visible_tasks:[{}]", texts.join(","))
            }
            Action::AssertItemsLeft { count } => format!("assert_items_left:{}", count),
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Action::AssertTasks { .. }
                | Action::AssertVisibleTasks { .. }
                | Action::AssertItemsLeft { .. }
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Scenario {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.check()?;
        Ok(scenario)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            E2eError::Yaml(inner) => {
                E2eError::ScenarioParse(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }

    /// Load all scenarios from a directory, sorted by path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            scenarios.push(Self::from_file(entry.path())?);
        }

        Ok(scenarios)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(scenarios: &'a [Self], tag: &str) -> Vec<&'a Self> {
        scenarios
            .iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }

    fn check(&self) -> E2eResult<()> {
        if self.name.trim().is_empty() {
            return Err(E2eError::ScenarioParse("scenario name is empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(E2eError::ScenarioParse(format!(
                "scenario '{}' has no steps",
                self.name
            )));
        }
        Ok(())
    }
}
