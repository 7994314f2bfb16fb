mod assets;

pub mod client;
pub mod config;
pub mod error;
mod expect;
pub mod fixtures;
pub mod runner;
pub mod scenario;
pub mod store;
pub mod suites;

pub use crate::assets::{get_config_dir, get_data_dir};
pub use crate::client::{ApiClient, ApiResponse};
pub use crate::error::HarnessError;
pub use crate::runner::{RunEvent, RunReport, ScenarioOutcome, ScenarioStatus, Suite, SuiteRunner};
pub use crate::scenario::{Scenario, ScenarioContext};
