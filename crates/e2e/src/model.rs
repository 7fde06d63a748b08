//! In-memory TodoMVC used to dry-run scenarios without a browser
//!
//! The model follows the reference application's observable behavior closely
//! enough that a scenario passing here and failing in the browser points at
//! the application or the environment, not at the scenario.

use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::executor::{ScenarioExecutor, ScenarioRun, StepResult};
use crate::scenario::{Action, Scenario};
use crate::task::{normalize_text, Filter, Task, TaskStatus};

/// Application state as the rendered page would show it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoModel {
    tasks: Vec<Task>,
    filter: Filter,
}

impl TodoModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Texts of every row, rendered or not, as the page reads them
    pub fn texts(&self) -> Vec<String> {
        self.tasks.iter().map(|t| normalize_text(&t.text)).collect()
    }

    /// Texts of rows the current filter renders
    pub fn visible_texts(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|t| self.filter.shows(t.status))
            .map(|t| normalize_text(&t.text))
            .collect()
    }

    pub fn items_left(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| !t.status.is_completed())
            .count()
    }

    /// Apply one scenario step
    pub fn apply(&mut self, action: &Action) -> E2eResult<()> {
        let step = action.name();
        match action {
            Action::Given { tasks, filter } => {
                // a reload keeps the current hash route
                self.tasks = tasks.clone();
                if let Some(filter) = filter {
                    self.filter = *filter;
                }
            }
            Action::Add { texts } => {
                for text in texts {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.tasks.push(Task::active(text));
                    }
                }
            }
            Action::Toggle { text } => {
                let index = self.find_visible(&step, text)?;
                self.tasks[index].status = self.tasks[index].status.toggled();
            }
            Action::ToggleAll => {
                if self.tasks.is_empty() {
                    return Err(not_found(&step, "toggle-all control is hidden without tasks"));
                }
                let all_done = self.tasks.iter().all(|t| t.status.is_completed());
                let status = if all_done {
                    TaskStatus::Active
                } else {
                    TaskStatus::Completed
                };
                for task in &mut self.tasks {
                    task.status = status;
                }
            }
            Action::Delete { text } => {
                let index = self.find_visible(&step, text)?;
                self.tasks.remove(index);
            }
            Action::ClearCompleted => {
                if !self.tasks.iter().any(|t| t.status.is_completed()) {
                    return Err(not_found(&step, "clear-completed is hidden without completed tasks"));
                }
                self.tasks.retain(|t| !t.status.is_completed());
            }
            Action::Edit {
                old_text,
                new_text,
                commit,
            } => {
                let index = self.find_visible(&step, old_text)?;
                if commit.commits() {
                    let text = new_text.trim();
                    if text.is_empty() {
                        self.tasks.remove(index);
                    } else {
                        self.tasks[index].text = text.to_string();
                    }
                }
            }
            Action::Filter { filter } => self.filter = *filter,
            Action::AssertTasks { texts } => expect_texts(&step, texts, self.texts())?,
            Action::AssertVisibleTasks { texts } => {
                expect_texts(&step, texts, self.visible_texts())?
            }
            Action::AssertItemsLeft { count } => {
                let left = self.items_left();
                if left != *count {
                    return Err(E2eError::AssertionTimeout {
                        step,
                        expected: format!("items left to be \"{}\"", count),
                        observed: format!("\"{}\"", left),
                    });
                }
            }
        }
        Ok(())
    }

    /// Index of the single rendered row with exactly `text`
    fn find_visible(&self, step: &str, text: &str) -> E2eResult<usize> {
        let wanted = normalize_text(text);
        let matches: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| normalize_text(&t.text) == wanted)
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => Err(not_found(step, &format!("task {:?} (rows: {:?})", text, self.texts()))),
            [index] if self.filter.shows(self.tasks[*index].status) => Ok(*index),
            [_] => Err(not_found(
                step,
                &format!("task {:?} is hidden by the {} filter", text, self.filter),
            )),
            many => Err(E2eError::AmbiguousMatch {
                text: text.to_string(),
                count: many.len(),
            }),
        }
    }
}

fn not_found(step: &str, detail: &str) -> E2eError {
    E2eError::ElementNotFound {
        step: step.to_string(),
        detail: detail.to_string(),
    }
}

fn expect_texts(step: &str, expected: &[String], actual: Vec<String>) -> E2eResult<()> {
    let wanted: Vec<String> = expected.iter().map(|t| normalize_text(t)).collect();
    if actual == wanted {
        return Ok(());
    }
    Err(E2eError::AssertionTimeout {
        step: step.to_string(),
        expected: format!("{:?}", expected),
        observed: format!("{:?}", actual),
    })
}

/// Executor that replays scenarios against a fresh [`TodoModel`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelExecutor;

impl ModelExecutor {
    /// Run synchronously; each scenario starts from an empty page
    pub fn run(&self, scenario: &Scenario) -> ScenarioRun {
        let mut model = TodoModel::new();
        let mut run = ScenarioRun::default();

        for action in &scenario.steps {
            let start = Instant::now();
            let result = model.apply(action);
            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(()) => run.steps.push(StepResult::passed(action.name(), duration_ms)),
                Err(e) => {
                    debug!("{}: {} failed on the model: {}", scenario.name, action, e);
                    run.steps.push(StepResult::failed(action.name(), duration_ms, &e));
                    run.failure = Some(e);
                    break;
                }
            }
        }

        run
    }
}

#[async_trait]
impl ScenarioExecutor for ModelExecutor {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn execute(&self, scenario: &Scenario) -> E2eResult<ScenarioRun> {
        Ok(self.run(scenario))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::EditCommit;
    use crate::task::tasks;

    fn model_with(seed: Vec<Task>) -> TodoModel {
        let mut model = TodoModel::new();
        model
            .apply(&Action::Given {
                tasks: seed,
                filter: None,
            })
            .unwrap();
        model
    }

    #[test]
    fn add_trims_and_skips_blank_text() {
        let mut model = TodoModel::new();
        model
            .apply(&Action::Add {
                texts: vec!["  a ".into(), "   ".into(), "b".into()],
            })
            .unwrap();
        assert_eq!(model.texts(), vec!["a", "b"]);
        assert_eq!(model.items_left(), 2);
    }

    #[test]
    fn inner_whitespace_reads_collapsed() {
        let mut model = model_with(vec![Task::active("a  b")]);
        assert_eq!(model.texts(), vec!["a b"]);
        expect_texts("assert", &["a  b".to_string()], model.texts()).unwrap();
        expect_texts("assert", &["a b".to_string()], model.texts()).unwrap();
        model.apply(&Action::Toggle { text: "a  b".into() }).unwrap();
        model.apply(&Action::Delete { text: "a b".into() }).unwrap();
        assert!(model.tasks().is_empty());
    }

    #[test]
    fn toggle_all_completes_then_reopens() {
        let mut model = model_with(vec![Task::active("1"), Task::completed("2")]);
        model.apply(&Action::ToggleAll).unwrap();
        assert_eq!(model.items_left(), 0);
        model.apply(&Action::ToggleAll).unwrap();
        assert_eq!(model.items_left(), 2);
    }

    #[test]
    fn edit_to_empty_deletes() {
        let mut model = model_with(tasks(TaskStatus::Active, ["1", "2"]));
        model
            .apply(&Action::Edit {
                old_text: "2".into(),
                new_text: "  ".into(),
                commit: EditCommit::Tab,
            })
            .unwrap();
        assert_eq!(model.texts(), vec!["1"]);
    }

    #[test]
    fn escape_discards_edit() {
        let mut model = model_with(tasks(TaskStatus::Active, ["1"]));
        model
            .apply(&Action::Edit {
                old_text: "1".into(),
                new_text: "".into(),
                commit: EditCommit::Escape,
            })
            .unwrap();
        assert_eq!(model.texts(), vec!["1"]);
    }

    #[test]
    fn duplicate_text_is_ambiguous() {
        let mut model = model_with(tasks(TaskStatus::Active, ["1", "1"]));
        let err = model.apply(&Action::Toggle { text: "1".into() }).unwrap_err();
        assert!(matches!(err, E2eError::AmbiguousMatch { count: 2, .. }));
    }

    #[test]
    fn hidden_rows_cannot_be_acted_on() {
        let mut model = model_with(vec![Task::completed("1")]);
        model
            .apply(&Action::Filter {
                filter: Filter::Active,
            })
            .unwrap();
        let err = model.apply(&Action::Delete { text: "1".into() }).unwrap_err();
        assert!(matches!(err, E2eError::ElementNotFound { .. }));
    }

    #[test]
    fn clear_completed_needs_completed_tasks() {
        let mut model = model_with(tasks(TaskStatus::Active, ["1"]));
        assert!(model.apply(&Action::ClearCompleted).is_err());
    }

    #[test]
    fn seeding_keeps_the_current_route() {
        let mut model = TodoModel::new();
        model
            .apply(&Action::Filter {
                filter: Filter::Completed,
            })
            .unwrap();
        model
            .apply(&Action::Given {
                tasks: vec![Task::active("1")],
                filter: None,
            })
            .unwrap();
        assert_eq!(model.filter(), Filter::Completed);
        assert!(model.visible_texts().is_empty());
    }

    #[test]
    fn executor_stops_at_first_failure() {
        let scenario = Scenario::new("broken")
            .add(["1"])
            .assert_items_left(3)
            .toggle("1");
        let run = ModelExecutor.run(&scenario);
        assert_eq!(run.steps.len(), 2);
        assert!(run.steps[0].success);
        assert!(!run.steps[1].success);
        assert!(matches!(run.failure, Some(E2eError::AssertionTimeout { .. })));
    }
}
