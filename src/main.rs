use clap::Parser;
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use std::time::Duration;
use testcase_gen::app::{TerminalProgress, TerminalSession};
use testcase_gen::core::model_service::LogProgress;
use testcase_gen::core::ProgressReporter;
use testcase_gen::utils::error::ErrorSeverity;
use testcase_gen::utils::{logger, monitor::SystemMonitor, validation::Validate};
use testcase_gen::{
    AppError, CliConfig, GeneratorSettings, InferenceApiLoader, LocalStorage, ModelService,
    Outcome, SessionController,
};

fn report_error(e: &AppError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

fn exit_code(e: &AppError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2, // 可修正或可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn resolve_settings(cli: &CliConfig) -> testcase_gen::Result<GeneratorSettings> {
    let settings = cli.resolve()?;
    settings.validate()?;
    Ok(settings)
}

/// --requirement、--input、管線 stdin；互動終端機回傳 None
async fn read_requirement(cli: &CliConfig) -> testcase_gen::Result<Option<String>> {
    if let Some(requirement) = &cli.requirement {
        return Ok(Some(requirement.clone()));
    }

    if let Some(path) = &cli.input {
        tracing::info!("📁 Reading requirement from: {}", path);
        return Ok(Some(tokio::fs::read_to_string(path).await?));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting testcase-gen");

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            report_error(&e);
            std::process::exit(exit_code(&e));
        }
    };

    tracing::debug!(
        "Model: {} at {} (max_new_tokens={}, timeout={:?}, warm_up={})",
        settings.model_id,
        settings.endpoint,
        settings.max_new_tokens,
        settings.timeout_secs,
        settings.warm_up
    );

    let monitor = SystemMonitor::new(settings.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 非終端機（或 JSON 日誌）時改用 tracing 回報進度
    let progress: Arc<dyn ProgressReporter> = if cli.json_logs || !std::io::stderr().is_terminal() {
        Arc::new(LogProgress)
    } else {
        Arc::new(TerminalProgress::new())
    };

    let service = Arc::new(
        ModelService::new(InferenceApiLoader::from_config(&settings))
            .with_progress(progress)
            .with_timeout(settings.timeout_secs.map(Duration::from_secs)),
    );

    tracing::info!("🤖 Using model {}", service.model_id());

    // 啟動時先載入；失敗不致命，下一次生成會再試
    if let Err(e) = service.ensure_loaded().await {
        report_error(&AppError::from(e));
    }
    monitor.log_stats("Model load");

    let controller = SessionController::new(service).with_max_new_tokens(settings.max_new_tokens);
    let storage = LocalStorage::new(settings.output_path.clone());
    let mut terminal = TerminalSession::new(controller, storage).with_monitor(monitor);
    let mut stdout = std::io::stdout();

    let requirement = match read_requirement(&cli).await {
        Ok(requirement) => requirement,
        Err(e) => {
            report_error(&e);
            std::process::exit(exit_code(&e));
        }
    };

    match requirement {
        Some(requirement) => match terminal.run_once(&requirement, cli.download, &mut stdout).await {
            Ok(Outcome::Success(_)) => {}
            Ok(Outcome::ValidationWarning(_)) => std::process::exit(2),
            Ok(Outcome::Failure(_)) => std::process::exit(1),
            Err(e) => {
                report_error(&e);
                std::process::exit(exit_code(&e));
            }
        },
        None => {
            let stdin = std::io::stdin();
            if let Err(e) = terminal.run_interactive(stdin.lock(), &mut stdout).await {
                report_error(&e);
                std::process::exit(exit_code(&e));
            }
        }
    }

    Ok(())
}
