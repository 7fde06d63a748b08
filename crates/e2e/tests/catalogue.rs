//! The built-in catalogue and the TodoMVC laws, checked on the in-memory model.

use proptest::prelude::*;

use todomvc_e2e::seed::{parse_payload, payload};
use todomvc_e2e::suite::todomvc_suite;
use todomvc_e2e::task::normalize_text;
use todomvc_e2e::{
    Action, E2eError, Filter, ModelExecutor, Scenario, Task, TaskStatus, TestRunner, TodoModel,
};

fn run(scenario: &Scenario) -> Result<(), E2eError> {
    match ModelExecutor.run(scenario).failure {
        None => Ok(()),
        Some(e) => Err(e),
    }
}

#[test]
fn every_builtin_scenario_passes_on_the_model() {
    for scenario in todomvc_suite() {
        if let Err(e) = run(&scenario) {
            panic!("{} failed on the model: {}", scenario.name, e);
        }
    }
}

#[tokio::test]
async fn runner_reports_whole_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    let runner = TestRunner::new(Box::new(ModelExecutor), dir.path());
    let suite = todomvc_suite();

    let results = runner.run_scenarios(&suite).await;
    assert_eq!(results.total, suite.len());
    assert!(results.all_passed(), "{:#?}", results.results);
    assert!(runner.write_results(&results).unwrap().exists());
}

#[test]
fn clear_completed_leaves_nothing() {
    let scenario = Scenario::new("clear")
        .given_at_all(TaskStatus::Completed, ["1", "2"])
        .clear_completed()
        .assert_no_tasks();
    run(&scenario).unwrap();
}

#[test]
fn completed_filter_shows_only_completed() {
    let scenario = Scenario::new("filter")
        .given([Task::completed("1"), Task::active("2")])
        .filter_completed()
        .assert_visible_tasks_are(["1"]);
    run(&scenario).unwrap();
}

#[test]
fn toggled_task_hidden_under_active() {
    let scenario = Scenario::new("toggle")
        .given(Vec::new())
        .add(["1"])
        .toggle("1")
        .filter_active()
        .assert_no_visible_tasks();
    run(&scenario).unwrap();
}

#[test]
fn wrong_expectation_is_reported_with_observed_state() {
    let scenario = Scenario::new("wrong")
        .given([Task::active("1")])
        .assert_tasks_are(["2"]);
    match run(&scenario) {
        Err(E2eError::AssertionTimeout { expected, observed, .. }) => {
            assert_eq!(expected, r#"["2"]"#);
            assert_eq!(observed, r#"["1"]"#);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn duplicate_rows_are_ambiguous_not_first_match() {
    let scenario = Scenario::new("dupes")
        .given_at_all(TaskStatus::Active, ["same", "same"])
        .delete("same");
    assert!(matches!(
        run(&scenario),
        Err(E2eError::AmbiguousMatch { count: 2, .. })
    ));
}

#[test]
fn yaml_scenario_runs_like_builder_scenario() {
    let yaml = r#"
name: yaml-edit-at-active
tags: [active]
steps:
  - action: given
    filter: active
    tasks:
      - text: "1"
      - text: "2"
  - action: edit
    old_text: "2"
    new_text: ""
  - action: assert_tasks
    texts: ["1"]
  - action: assert_items_left
    count: 1
"#;
    let parsed = Scenario::from_yaml(yaml).unwrap();
    let built = Scenario::new("yaml-edit-at-active")
        .tag("active")
        .given_at_active([Task::active("1"), Task::active("2")])
        .edit("2", "")
        .assert_tasks_are(["1"])
        .assert_items_left(1);
    assert_eq!(parsed, built);
    run(&parsed).unwrap();
}

fn task_text() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9 ]{0,10}[a-z0-9]"
}

fn seed_list() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (task_text(), any::<bool>()).prop_map(|(text, done)| {
            if done {
                Task::completed(text)
            } else {
                Task::active(text)
            }
        }),
        0..8,
    )
}

proptest! {
    #[test]
    fn adds_appear_in_insertion_order(texts in prop::collection::vec(task_text(), 0..10)) {
        let scenario = Scenario::new("adds")
            .given(Vec::new())
            .add(texts.clone())
            .assert_tasks_are(texts.clone())
            .assert_items_left(texts.len());
        prop_assert!(run(&scenario).is_ok());
    }

    #[test]
    fn seeding_twice_is_idempotent(seed in seed_list()) {
        let texts: Vec<String> = seed.iter().map(|t| t.text.clone()).collect();
        let scenario = Scenario::new("seed-twice")
            .given(seed.clone())
            .assert_tasks_are(texts.clone())
            .given(seed.clone())
            .assert_tasks_are(texts);
        prop_assert!(run(&scenario).is_ok());
    }

    #[test]
    fn payload_round_trips(seed in seed_list()) {
        let raw = payload(&seed).unwrap();
        prop_assert_eq!(parse_payload(&raw).unwrap(), seed);
    }

    #[test]
    fn toggle_twice_restores_status(done in any::<bool>()) {
        let task = if done { Task::completed("x") } else { Task::active("x") };
        let mut model = TodoModel::new();
        model.apply(&Action::Given { tasks: vec![task.clone()], filter: None }).unwrap();
        model.apply(&Action::Toggle { text: "x".into() }).unwrap();
        model.apply(&Action::Toggle { text: "x".into() }).unwrap();
        prop_assert_eq!(model.tasks(), &[task][..]);
    }

    #[test]
    fn cancel_edit_keeps_old_text(old in task_text(), new in task_text()) {
        let scenario = Scenario::new("cancel")
            .given([Task::active(old.clone())])
            .cancel_edit(old.clone(), new)
            .assert_tasks_are([old]);
        prop_assert!(run(&scenario).is_ok());
    }

    #[test]
    fn visible_rows_are_a_filtered_projection(seed in seed_list()) {
        for filter in [Filter::All, Filter::Active, Filter::Completed] {
            let mut model = TodoModel::new();
            model.apply(&Action::Given { tasks: seed.clone(), filter: Some(filter) }).unwrap();
            let expected: Vec<String> = seed
                .iter()
                .filter(|t| filter.shows(t.status))
                .map(|t| normalize_text(&t.text))
                .collect();
            prop_assert_eq!(model.visible_texts(), expected);
            prop_assert_eq!(model.texts().len(), seed.len());
        }
    }
}

#[test]
fn inner_whitespace_matches_rendered_text() {
    let scenario = Scenario::new("spaced")
        .given(Vec::new())
        .add(["a  b"])
        .assert_tasks_are(["a  b"])
        .assert_tasks_are(["a b"])
        .toggle("a  b")
        .edit("a b", "c   d")
        .assert_tasks_are(["c d"])
        .assert_items_left(0);
    run(&scenario).unwrap();
}

#[test]
fn texts_equal_after_normalizing_are_ambiguous() {
    let scenario = Scenario::new("near-dupes")
        .given([Task::active("a b"), Task::active("a  b")])
        .toggle("a b");
    assert!(matches!(
        run(&scenario),
        Err(E2eError::AmbiguousMatch { count: 2, .. })
    ));
}

#[test]
fn edit_to_empty_removes_task() {
    let scenario = Scenario::new("empty-edit")
        .given_at_all(TaskStatus::Active, ["1", "2"])
        .edit("1", "")
        .assert_tasks_are(["2"]);
    run(&scenario).unwrap();
}

#[test]
fn bundled_yaml_scenarios_pass_on_the_model() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    let scenarios = Scenario::load_all(&dir).unwrap();
    assert!(!scenarios.is_empty());
    for scenario in &scenarios {
        if let Err(e) = run(scenario) {
            panic!("{} failed on the model: {}", scenario.name, e);
        }
    }
}

#[test]
fn example_config_parses() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("todomvc-e2e.toml");
    let config = todomvc_e2e::HarnessConfig::from_file(&path).unwrap();
    assert_eq!(config, todomvc_e2e::HarnessConfig::default());
}
