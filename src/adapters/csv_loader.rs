use crate::core::{Problem, ProblemLoader};
use crate::utils::error::{QuizError, Result};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Loads `question,answer` rows from a header-less CSV file.
#[derive(Debug, Clone)]
pub struct CsvProblemLoader {
    path: PathBuf,
}

impl CsvProblemLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses problems from any reader; `origin` is only used in errors.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Vec<Problem>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(reader);

        let mut problems = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = index + 1;

            let (question, answer) = match (record.get(0), record.get(1)) {
                (Some(question), Some(answer)) => (question, answer),
                _ => {
                    return Err(QuizError::MalformedRow {
                        row,
                        reason: format!("expected 2 columns, found {}", record.len()),
                    })
                }
            };

            let problem = Problem::new(question, answer);
            if problem.question().is_empty() {
                return Err(QuizError::MalformedRow {
                    row,
                    reason: "question is empty".to_string(),
                });
            }

            tracing::debug!("Loaded problem #{}: {}", row, problem.question());
            problems.push(problem);
        }

        if problems.is_empty() {
            return Err(QuizError::EmptySource {
                path: origin.to_string(),
            });
        }

        Ok(problems)
    }
}

impl ProblemLoader for CsvProblemLoader {
    fn load(&self) -> Result<Vec<Problem>> {
        let origin = self.describe();
        let file = File::open(&self.path).map_err(|source| QuizError::SourceUnavailable {
            path: origin.clone(),
            source,
        })?;
        Self::from_reader(file, &origin)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
