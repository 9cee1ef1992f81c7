use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Failed to open the problem source '{path}': {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse the provided CSV file: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed problem at row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Problem source '{path}' contains no problems")]
    EmptySource { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Answer input error: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    High,
    Critical,
}

impl QuizError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuizError::SourceUnavailable { .. }
            | QuizError::CsvError(_)
            | QuizError::MalformedRow { .. }
            | QuizError::EmptySource { .. } => ErrorCategory::Load,
            QuizError::ConfigError { .. } | QuizError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            QuizError::InputError { .. } => ErrorCategory::Input,
            QuizError::IoError(_) | QuizError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Load | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定的程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_load_error(&self) -> bool {
        self.category() == ErrorCategory::Load
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            QuizError::SourceUnavailable { path, .. } => {
                format!("Check that '{}' exists and is readable, or pass --csv <path>", path)
            }
            QuizError::CsvError(_) => {
                "Make sure every row has the same number of comma-separated columns".to_string()
            }
            QuizError::MalformedRow { .. } => {
                "Each row needs a question and an answer: question,answer".to_string()
            }
            QuizError::EmptySource { .. } => "Add at least one question,answer row".to_string(),
            QuizError::ConfigError { .. } | QuizError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML configuration file".to_string()
            }
            QuizError::InputError { .. } => "Type the answer and press Enter".to_string(),
            QuizError::IoError(_) | QuizError::SerializationError(_) => {
                "Retry the quiz; if the problem persists run with --verbose".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuizError::SourceUnavailable { path, .. } => {
                format!("Failed to open the CSV file: {}", path)
            }
            QuizError::CsvError(_) => "Failed to parse the provided CSV file.".to_string(),
            QuizError::MalformedRow { row, .. } => {
                format!("Row {} of the CSV file is not a question,answer pair.", row)
            }
            QuizError::EmptySource { path } => format!("The CSV file {} has no problems.", path),
            QuizError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_errors_exit_with_one() {
        let err = QuizError::EmptySource {
            path: "problems.csv".to_string(),
        };
        assert!(err.is_load_error());
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_input_error_is_not_fatal() {
        let err = QuizError::InputError {
            message: "stream closed".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_serialization_error_is_critical() {
        let err: QuizError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_user_friendly_message_names_the_file() {
        let err = QuizError::SourceUnavailable {
            path: "missing.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.user_friendly_message(), "Failed to open the CSV file: missing.csv");
        assert!(err.recovery_suggestion().contains("--csv"));
    }
}
