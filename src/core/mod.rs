pub mod cancel;
pub mod engine;
pub mod runner;

pub use crate::domain::model::{Problem, SessionReport};
pub use crate::domain::ports::{AnswerSource, ProblemLoader};
pub use crate::utils::error::Result;
