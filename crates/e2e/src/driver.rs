//! Scenario driver: intention-revealing actions and assertions
//!
//! Every call records one [`Action`] on the scenario. Nothing touches a
//! browser until an executor runs the finished scenario.

use crate::scenario::{Action, EditCommit, Scenario};
use crate::task::{tasks, Filter, Task, TaskStatus};

fn owned<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts.into_iter().map(Into::into).collect()
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn step(mut self, action: Action) -> Self {
        self.steps.push(action);
        self
    }

    // ---------------------------------------------------------------
    // Preconditions
    // ---------------------------------------------------------------

    /// Seed storage with `tasks` and reload
    pub fn given(self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.step(Action::Given {
            tasks: tasks.into_iter().collect(),
            filter: None,
        })
    }

    pub fn given_at_active(self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.given_with_filter(tasks, Filter::Active)
    }

    pub fn given_at_completed(self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.given_with_filter(tasks, Filter::Completed)
    }

    /// Seed tasks sharing one status, staying on the All view
    pub fn given_at_all<I, S>(self, status: TaskStatus, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.given(tasks(status, texts))
    }

    fn given_with_filter(self, tasks: impl IntoIterator<Item = Task>, filter: Filter) -> Self {
        self.step(Action::Given {
            tasks: tasks.into_iter().collect(),
            filter: Some(filter),
        })
    }

    // ---------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------

    pub fn add<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Action::Add {
            texts: owned(texts),
        })
    }

    pub fn toggle(self, text: impl Into<String>) -> Self {
        self.step(Action::Toggle { text: text.into() })
    }

    pub fn toggle_all(self) -> Self {
        self.step(Action::ToggleAll)
    }

    pub fn delete(self, text: impl Into<String>) -> Self {
        self.step(Action::Delete { text: text.into() })
    }

    pub fn clear_completed(self) -> Self {
        self.step(Action::ClearCompleted)
    }

    /// Enter edit mode and type `new_text`; the handle decides how to leave it
    pub fn start_edit(self, old_text: impl Into<String>, new_text: impl Into<String>) -> EditHandle {
        EditHandle {
            scenario: self,
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }

    /// Rename a task; an empty `new_text` deletes it
    pub fn edit(self, old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        self.start_edit(old_text, new_text).press_enter()
    }

    pub fn cancel_edit(self, old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        self.start_edit(old_text, new_text).press_escape()
    }

    pub fn confirm_edit_by_press_tab(
        self,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        self.start_edit(old_text, new_text).press_tab()
    }

    pub fn confirm_edit_by_clicking_outside(
        self,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        self.start_edit(old_text, new_text).click_outside()
    }

    pub fn filter(self, filter: Filter) -> Self {
        self.step(Action::Filter { filter })
    }

    pub fn filter_all(self) -> Self {
        self.filter(Filter::All)
    }

    pub fn filter_active(self) -> Self {
        self.filter(Filter::Active)
    }

    pub fn filter_completed(self) -> Self {
        self.filter(Filter::Completed)
    }

    // ---------------------------------------------------------------
    // Assertions
    // ---------------------------------------------------------------

    pub fn assert_tasks_are<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Action::AssertTasks {
            texts: owned(texts),
        })
    }

    pub fn assert_no_tasks(self) -> Self {
        self.step(Action::AssertTasks { texts: Vec::new() })
    }

    pub fn assert_visible_tasks_are<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Action::AssertVisibleTasks {
            texts: owned(texts),
        })
    }

    pub fn assert_no_visible_tasks(self) -> Self {
        self.step(Action::AssertVisibleTasks { texts: Vec::new() })
    }

    pub fn assert_items_left(self, count: usize) -> Self {
        self.step(Action::AssertItemsLeft { count })
    }
}

/// A task in edit mode, waiting to be committed or cancelled
#[must_use = "an edit does nothing until it is committed or cancelled"]
pub struct EditHandle {
    scenario: Scenario,
    old_text: String,
    new_text: String,
}

impl EditHandle {
    fn leave(self, commit: EditCommit) -> Scenario {
        let EditHandle {
            scenario,
            old_text,
            new_text,
        } = self;
        scenario.step(Action::Edit {
            old_text,
            new_text,
            commit,
        })
    }

    pub fn press_enter(self) -> Scenario {
        self.leave(EditCommit::Enter)
    }

    pub fn press_escape(self) -> Scenario {
        self.leave(EditCommit::Escape)
    }

    pub fn press_tab(self) -> Scenario {
        self.leave(EditCommit::Tab)
    }

    pub fn click_outside(self) -> Scenario {
        self.leave(EditCommit::ClickOutside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_records_steps_in_order() {
        let scenario = Scenario::new("life-cycle")
            .tag("smoke")
            .add(["1", "2"])
            .toggle("1")
            .filter_active()
            .assert_visible_tasks_are(["2"])
            .assert_items_left(1);

        assert_eq!(scenario.tags, vec!["smoke"]);
        assert_eq!(
            scenario.steps,
            vec![
                Action::Add {
                    texts: vec!["1".into(), "2".into()]
                },
                Action::Toggle { text: "1".into() },
                Action::Filter {
                    filter: Filter::Active
                },
                Action::AssertVisibleTasks {
                    texts: vec!["2".into()]
                },
                Action::AssertItemsLeft { count: 1 },
            ]
        );
    }

    #[test]
    fn test_edit_variants_map_to_commit_modes() {
        let scenario = Scenario::new("edits")
            .edit("a", "b")
            .cancel_edit("b", "c")
            .confirm_edit_by_press_tab("b", "d")
            .confirm_edit_by_clicking_outside("d", "e");

        let commits: Vec<_> = scenario
            .steps
            .iter()
            .map(|s| match s {
                Action::Edit { commit, .. } => *commit,
                other => panic!("unexpected step {:?}", other),
            })
            .collect();
        assert_eq!(
            commits,
            vec![
                EditCommit::Enter,
                EditCommit::Escape,
                EditCommit::Tab,
                EditCommit::ClickOutside
            ]
        );
    }

    #[test]
    fn test_given_variants() {
        let scenario = Scenario::new("given")
            .given_at_all(TaskStatus::Completed, ["1"])
            .given_at_active([Task::active("2")])
            .given_at_completed(Vec::new());

        assert!(matches!(&scenario.steps[0], Action::Given { filter: None, tasks } if tasks.len() == 1));
        assert!(matches!(
            &scenario.steps[1],
            Action::Given {
                filter: Some(Filter::Active),
                ..
            }
        ));
        assert!(matches!(
            &scenario.steps[2],
            Action::Given { filter: Some(Filter::Completed), tasks } if tasks.is_empty()
        ));
    }

    #[test]
    fn test_no_tasks_is_empty_assertion() {
        let scenario = Scenario::new("empty").assert_no_tasks().assert_no_visible_tasks();
        assert_eq!(
            scenario.steps,
            vec![
                Action::AssertTasks { texts: vec![] },
                Action::AssertVisibleTasks { texts: vec![] }
            ]
        );
    }
}
