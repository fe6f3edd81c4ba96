use anyhow::Context;
use clap::Parser;
use sticker_sheet::app::{self, RunOptions};
use sticker_sheet::core::ConfigProvider;
use sticker_sheet::utils::{logger, validation::Validate};
use sticker_sheet::TomlConfig;

#[derive(Parser)]
#[command(name = "toml-sheet")]
#[command(about = "Sticker sheet generator with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sticker-config.toml")]
    config: String,

    /// Override the first serial from the config
    #[arg(long)]
    start: Option<u64>,

    /// Override the last serial from the config
    #[arg(long)]
    end: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Plan the run without writing sheets or the ledger
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based sticker run");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    // 套用命令列覆蓋設定
    config.override_range(args.start, args.end);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let options = RunOptions {
        monitor: args.monitor.unwrap_or_else(|| config.monitoring_enabled()),
        dry_run: args.dry_run,
        page_size: config.page_size(),
    };

    match app::execute(config, options).await {
        Ok(report) => app::print_report(&report, false)?,
        Err(e) => {
            std::process::exit(app::report_failure(&e));
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let allocation = config.allocation();
    println!("📋 Configuration Summary:");
    println!(
        "  Allocation: area {} / producer {} / year {} / model {}",
        allocation.area, allocation.producer_code, allocation.year, allocation.model_code
    );
    if let Ok(range) = config.serial_range() {
        println!("  Serials: {}..={} ({} total)", range.start(), range.end(), range.count());
    }
    println!("  Output: {}", config.output_path());
    println!("  Ledger: {}", config.ledger_path());
    if let Ok(template) = config.template() {
        println!(
            "  Template: {} cells, {} stickers per page",
            template.cells().len(),
            template.capacity()
        );
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
