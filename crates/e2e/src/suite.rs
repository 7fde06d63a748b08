//! Built-in TodoMVC scenario catalogue
//!
//! Scenarios are grouped by the filter they run under. Each one seeds its own
//! precondition, so they can run in any order and in separate sessions.

use crate::scenario::Scenario;
use crate::task::{Task, TaskStatus::{Active, Completed}};

/// Every built-in scenario, in catalogue order
pub fn todomvc_suite() -> Vec<Scenario> {
    vec![
        task_life_cycle(),
        // All
        edit_at_all(),
        delete_at_all(),
        clear_completed_at_all(),
        switch_filter_to_completed_at_all(),
        cancel_edit_at_all(),
        confirm_edit_by_press_tab_at_all(),
        // Active
        delete_at_active(),
        complete_at_active(),
        edit_at_active(),
        delete_by_emptying_text_at_active(),
        switch_filter_to_all_at_active(),
        cancel_edit_by_press_escape_at_active(),
        // Completed
        cancel_edit_at_completed(),
        edit_at_completed(),
        confirm_edit_by_clicking_outside_at_completed(),
        delete_at_completed(),
        switch_filter_to_active_at_completed(),
        reopen_all_at_completed(),
    ]
}

pub fn task_life_cycle() -> Scenario {
    Scenario::new("task-life-cycle")
        .describe("Add, complete, reopen and clear tasks while switching filters")
        .tag("smoke")
        .given(Vec::new())
        .add(["1"])
        .toggle("1")
        .assert_tasks_are(["1"])
        .filter_active()
        .assert_no_visible_tasks()
        .add(["2"])
        .assert_visible_tasks_are(["2"])
        .toggle_all()
        .assert_no_visible_tasks()
        .filter_completed()
        .assert_visible_tasks_are(["1", "2"])
        // reopen
        .toggle("2")
        .assert_visible_tasks_are(["1"])
        .clear_completed()
        .assert_no_visible_tasks()
        .filter_all()
        .assert_tasks_are(["2"])
        .assert_items_left(1)
}

// ---------------------------------------------------------------------------
// All
// ---------------------------------------------------------------------------

pub fn edit_at_all() -> Scenario {
    Scenario::new("edit-at-all")
        .tag("all")
        .given(Vec::new())
        .add(["1", "2"])
        .edit("1", "1 edited")
        .assert_tasks_are(["1 edited", "2"])
        .assert_items_left(2)
}

pub fn delete_at_all() -> Scenario {
    Scenario::new("delete-at-all")
        .tag("all")
        .given_at_all(Completed, ["1"])
        .delete("1")
        .assert_no_tasks()
}

pub fn clear_completed_at_all() -> Scenario {
    Scenario::new("clear-completed-at-all")
        .tag("all")
        .given_at_all(Completed, ["1", "2"])
        .clear_completed()
        .assert_no_tasks()
}

pub fn switch_filter_to_completed_at_all() -> Scenario {
    Scenario::new("switch-filter-to-completed-at-all")
        .tag("all")
        .given([Task::completed("1"), Task::active("2")])
        .filter_completed()
        .assert_visible_tasks_are(["1"])
}

pub fn cancel_edit_at_all() -> Scenario {
    Scenario::new("cancel-edit-at-all")
        .tag("all")
        .given_at_all(Active, ["1"])
        .cancel_edit("1", "1 editing")
        .assert_tasks_are(["1"])
        .assert_items_left(1)
}

pub fn confirm_edit_by_press_tab_at_all() -> Scenario {
    Scenario::new("confirm-edit-by-press-tab-at-all")
        .tag("all")
        .given_at_all(Completed, ["1"])
        .confirm_edit_by_press_tab("1", "1 edited")
        .assert_tasks_are(["1 edited"])
        .assert_items_left(0)
}

// ---------------------------------------------------------------------------
// Active
// ---------------------------------------------------------------------------

pub fn delete_at_active() -> Scenario {
    Scenario::new("delete-at-active")
        .tag("active")
        .given(Vec::new())
        .add(["1", "2"])
        .filter_active()
        .delete("1")
        .assert_tasks_are(["2"])
        .assert_items_left(1)
}

pub fn complete_at_active() -> Scenario {
    Scenario::new("complete-at-active")
        .tag("active")
        .given_at_active([Task::active("1"), Task::active("2")])
        .toggle("2")
        .assert_visible_tasks_are(["1"])
        .assert_items_left(1)
}

pub fn edit_at_active() -> Scenario {
    Scenario::new("edit-at-active")
        .tag("active")
        .given_at_active([Task::active("1"), Task::active("2")])
        .edit("2", "2 edited")
        .assert_tasks_are(["1", "2 edited"])
}

pub fn delete_by_emptying_text_at_active() -> Scenario {
    Scenario::new("delete-by-emptying-text-at-active")
        .tag("active")
        .given_at_active([Task::active("1"), Task::active("2")])
        .edit("2", "")
        .assert_tasks_are(["1"])
        .assert_items_left(1)
}

pub fn switch_filter_to_all_at_active() -> Scenario {
    Scenario::new("switch-filter-to-all-at-active")
        .tag("active")
        .given_at_active([Task::active("1"), Task::active("2")])
        .toggle("2")
        .filter_all()
        .assert_tasks_are(["1", "2"])
        .assert_items_left(1)
}

pub fn cancel_edit_by_press_escape_at_active() -> Scenario {
    Scenario::new("cancel-edit-by-press-escape-at-active")
        .tag("active")
        .given_at_active([Task::active("1"), Task::active("2")])
        .cancel_edit("2", "2 edited")
        .assert_tasks_are(["1", "2"])
        .assert_items_left(2)
}

// ---------------------------------------------------------------------------
// Completed
// ---------------------------------------------------------------------------

pub fn cancel_edit_at_completed() -> Scenario {
    Scenario::new("cancel-edit-at-completed")
        .tag("completed")
        .given(Vec::new())
        .add(["1", "2"])
        .toggle_all()
        .filter_completed()
        .cancel_edit("2", "to be canceled")
        .assert_tasks_are(["1", "2"])
        .assert_items_left(0)
}

pub fn edit_at_completed() -> Scenario {
    Scenario::new("edit-at-completed")
        .tag("completed")
        .given_at_completed([Task::completed("1"), Task::active("2")])
        .edit("1", "1 edited")
        .assert_visible_tasks_are(["1 edited"])
        .assert_items_left(1)
}

pub fn confirm_edit_by_clicking_outside_at_completed() -> Scenario {
    Scenario::new("confirm-edit-by-clicking-outside-at-completed")
        .tag("completed")
        .given_at_completed([Task::completed("1"), Task::active("2")])
        .confirm_edit_by_clicking_outside("1", "1 edited")
        .assert_visible_tasks_are(["1 edited"])
}

pub fn delete_at_completed() -> Scenario {
    Scenario::new("delete-at-completed")
        .tag("completed")
        .given_at_completed([Task::completed("1"), Task::active("2")])
        .delete("1")
        .assert_no_visible_tasks()
        .assert_items_left(1)
}

pub fn switch_filter_to_active_at_completed() -> Scenario {
    Scenario::new("switch-filter-to-active-at-completed")
        .tag("completed")
        .given_at_completed([Task::completed("1"), Task::active("2")])
        .filter_active()
        .assert_visible_tasks_are(["2"])
        .assert_items_left(1)
}

pub fn reopen_all_at_completed() -> Scenario {
    Scenario::new("reopen-all-at-completed")
        .tag("completed")
        .given_at_completed([Task::completed("1"), Task::completed("2")])
        .toggle_all()
        .assert_no_visible_tasks()
        .assert_items_left(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let suite = todomvc_suite();
        let names: HashSet<_> = suite.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), suite.len());
    }

    #[test]
    fn every_scenario_starts_from_seeded_state() {
        for scenario in todomvc_suite() {
            assert!(
                matches!(scenario.steps.first(), Some(crate::scenario::Action::Given { .. })),
                "{} does not seed its precondition",
                scenario.name
            );
        }
    }

    #[test]
    fn every_scenario_is_tagged() {
        for scenario in todomvc_suite() {
            assert!(!scenario.tags.is_empty(), "{} has no tag", scenario.name);
        }
    }
}
