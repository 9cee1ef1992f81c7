use crate::config::toml_config::QuizFileConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, validate_range, Validate};
use std::time::Duration;

pub const DEFAULT_CSV: &str = "problems.csv";
pub const DEFAULT_LIMIT_SECS: u64 = 2;
pub const MAX_LIMIT_SECS: u64 = 86_400;

/// Configuration resolved once at start-up and handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub source: String,
    pub limit: Duration,
    pub json_report: bool,
}

impl QuizSettings {
    /// Explicit flags win over the file, the file wins over defaults.
    pub fn resolve(
        csv: Option<String>,
        limit_secs: Option<u64>,
        json_report: bool,
        file: Option<&QuizFileConfig>,
    ) -> Self {
        let source = csv
            .or_else(|| file.and_then(|f| f.quiz.csv.clone()))
            .unwrap_or_else(|| DEFAULT_CSV.to_string());

        let limit_secs = limit_secs
            .or_else(|| file.and_then(|f| f.quiz.limit_seconds))
            .unwrap_or(DEFAULT_LIMIT_SECS);

        let json_report = json_report || file.map(QuizFileConfig::json_report).unwrap_or(false);

        Self {
            source,
            limit: Duration::from_secs(limit_secs),
            json_report,
        }
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &crate::config::CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(QuizFileConfig::from_file(path)?),
            None => None,
        };

        Ok(Self::resolve(cli.csv.clone(), cli.limit, cli.json, file.as_ref()))
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::resolve(None, None, false, None)
    }
}

impl Validate for QuizSettings {
    fn validate(&self) -> Result<()> {
        // 驗證題庫路徑
        validate_path("csv", &self.source)?;
        validate_file_extension("csv", &self.source, &["csv"])?;

        // 驗證時間限制
        validate_range("limit", self.limit.as_secs(), 0, MAX_LIMIT_SECS)?;

        Ok(())
    }
}
