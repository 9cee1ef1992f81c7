use crate::domain::model::Problem;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Line-oriented source of typed answers.
///
/// `Ok(None)` means the stream is exhausted; the runner treats that as an
/// answer that never arrives.
#[async_trait]
pub trait AnswerSource: Send + 'static {
    async fn read_answer(&mut self) -> Result<Option<String>>;
}

pub trait ProblemLoader: Send + Sync {
    fn load(&self) -> Result<Vec<Problem>>;
    fn describe(&self) -> String;
}
