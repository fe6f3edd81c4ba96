// Application layer: wires config, storage and renderers into one run.

use crate::adapters::{QrSymbolEncoder, SvgSheetWriter};
use crate::config::cli::LocalStorage;
use crate::core::engine::RunEngine;
use crate::core::sheet_pipeline::SheetPipeline;
use crate::core::ConfigProvider;
use crate::domain::model::RunReport;
use crate::domain::template::PageSize;
use crate::utils::error::{Result, StickerError};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub monitor: bool,
    pub dry_run: bool,
    pub page_size: PageSize,
}

/// Runs (or plans, in dry-run mode) one sticker batch.
///
/// Artifacts go under the configured output path; the ledger path is resolved
/// against the working directory.
pub async fn execute<C: ConfigProvider>(config: C, options: RunOptions) -> Result<RunReport> {
    let artifacts = LocalStorage::new(config.output_path().to_string());
    let ledger_storage = LocalStorage::new(".".to_string());
    let writer = SvgSheetWriter::new(QrSymbolEncoder::new()).with_page_size(options.page_size);

    let pipeline = SheetPipeline::new(artifacts, ledger_storage, config, writer)?;
    let engine = RunEngine::new_with_monitoring(pipeline, options.monitor);

    if options.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        let plan = engine.plan().await?;
        let mut report = RunReport::from_plan(&plan, engine.pipeline().artifact_extension());
        report.dry_run = true;
        return Ok(report);
    }

    engine.run().await
}

pub fn print_report(report: &RunReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.dry_run {
        println!("🔍 Dry run - planned output:");
    } else {
        println!("✅ Sticker run completed successfully!");
    }
    println!("  Identifiers issued: {}", report.issued);
    println!("  Already in ledger: {}", report.skipped);
    println!("  Pages: {}", report.pages);
    for artifact in &report.artifacts {
        println!("  📁 {}", artifact);
    }
    if report.unused_slots > 0 {
        println!("  Unused slots on last page: {}", report.unused_slots);
    }
    Ok(())
}

/// Logs the failure and returns the process exit code for it.
pub fn report_failure(e: &StickerError) -> i32 {
    tracing::error!(
        "❌ Sticker run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    e.exit_code()
}
