pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvProblemLoader, LineAnswerSource};
pub use config::QuizSettings;
pub use crate::core::{engine::QuizEngine, runner::run_session, runner::QuizRunner};
pub use domain::model::{Problem, SessionReport};
pub use utils::error::{QuizError, Result};
