use anyhow::Context;
use clap::Parser;
use timed_quiz::utils::{logger, validation::Validate};
use timed_quiz::{CliConfig, CsvProblemLoader, LineAnswerSource, QuizEngine, QuizError, QuizSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let settings = QuizSettings::from_cli(&config).unwrap_or_else(|e| fail(&e));

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let loader = CsvProblemLoader::new(&settings.source);
    let engine = QuizEngine::new(loader, settings.limit);
    let answers = LineAnswerSource::stdin().context("failed to start the answer reader")?;

    let report = match engine.run(answers, std::io::stdout()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                "❌ Quiz failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            fail(&e);
        }
    };

    if settings.json_report {
        let json = report.to_json().unwrap_or_else(|e| fail(&e));
        println!("{}", json);
    }

    // 讀取答案的執行緒可能仍在等待輸入，直接結束程序
    std::process::exit(0);
}

fn fail(e: &QuizError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}
