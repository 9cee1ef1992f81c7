use crate::core::runner::QuizRunner;
use crate::core::{AnswerSource, ProblemLoader, SessionReport};
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;

pub struct QuizEngine<L: ProblemLoader> {
    loader: L,
    limit: Duration,
}

impl<L: ProblemLoader> QuizEngine<L> {
    pub fn new(loader: L, limit: Duration) -> Self {
        Self { loader, limit }
    }

    /// Loads every problem first; a load failure is returned before any
    /// question reaches `out`.
    pub async fn run<S: AnswerSource, W: Write>(&self, source: S, out: W) -> Result<SessionReport> {
        tracing::info!("📁 Loading problems from {}", self.loader.describe());
        let problems = self.loader.load()?;
        tracing::info!("Loaded {} problems, time limit {:?}", problems.len(), self.limit);

        let mut runner = QuizRunner::new(source, out);
        runner.run(&problems, self.limit).await
    }
}
