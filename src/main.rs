use clap::Parser;
use sticker_sheet::app::{self, RunOptions};
use sticker_sheet::utils::{logger, validation::Validate};
use sticker_sheet::CliConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting sticker-sheet CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let options = RunOptions {
        monitor: config.monitor,
        dry_run: config.dry_run,
        ..RunOptions::default()
    };
    let as_json = config.json;

    match app::execute(config, options).await {
        Ok(report) => app::print_report(&report, as_json)?,
        Err(e) => {
            std::process::exit(app::report_failure(&e));
        }
    }

    Ok(())
}
