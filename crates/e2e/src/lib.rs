//! TodoMVC E2E Test Harness
//!
//! This crate drives the TodoMVC reference application through a real browser:
//! - Seeds the application's `localStorage` to establish preconditions
//! - Records scenarios through an intention-revealing driver API
//! - Compiles each scenario into one Playwright script and runs it via node
//! - Replays the same scenarios on an in-memory model for dry runs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    └── run_scenarios(&[Scenario]) -> TestSuiteResult        │
//! │          via dyn ScenarioExecutor                           │
//! │                ├── PlaywrightHandle (node + browser)        │
//! │                └── ModelExecutor    (in-memory TodoModel)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (builder or YAML)                                 │
//! │    ├── given { tasks, filter? }   -> FixtureSeeder          │
//! │    ├── add / toggle / toggle_all / delete / clear_completed │
//! │    ├── edit { old, new, enter|escape|tab|click_outside }    │
//! │    ├── filter { all|active|completed }                      │
//! │    └── assert_tasks / assert_visible_tasks / items_left     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod model;
pub mod playwright;
pub mod runner;
pub mod scenario;
pub mod seed;
pub mod suite;
pub mod task;

pub use config::HarnessConfig;
pub use driver::EditHandle;
pub use error::{E2eError, E2eResult};
pub use executor::{ScenarioExecutor, ScenarioRun, StepResult};
pub use model::{ModelExecutor, TodoModel};
pub use playwright::PlaywrightHandle;
pub use runner::{TestRunner, TestSuiteResult};
pub use scenario::{Action, EditCommit, Scenario};
pub use seed::FixtureSeeder;
pub use task::{Filter, Task, TaskStatus};
