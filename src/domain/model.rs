use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    question: String,
    answer: String,
}

impl Problem {
    pub fn new(question: impl AsRef<str>, answer: impl AsRef<str>) -> Self {
        Self {
            question: question.as_ref().trim().to_string(),
            answer: answer.as_ref().trim().to_string(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Exact, case-sensitive comparison after trimming the submitted text.
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim() == self.answer
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub correct: usize,
    pub total: usize,
    /// Number of answers that were evaluated before the session ended.
    pub answered: usize,
    pub timed_out: bool,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
}

impl SessionReport {
    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.total)
    }

    pub fn summary_line(&self) -> String {
        format!("You scored {} out of {}.", self.correct, self.total)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
