use crate::core::allocator::allocate_range;
use crate::core::layout::layout;
use crate::core::ledger::LedgerStore;
use crate::core::{ConfigProvider, Pipeline, SheetWriter, Storage};
use crate::domain::ledger::Ledger;
use crate::domain::model::{RunPlan, RunReport};
use crate::domain::template::Template;
use crate::utils::error::{Result, StickerError};
use chrono::{Local, NaiveDateTime, SubsecRound};

/// Ledger → allocate → layout → render → ledger append.
pub struct SheetPipeline<S: Storage, C: ConfigProvider, W: SheetWriter> {
    artifacts: S,
    ledger_store: LedgerStore<S>,
    config: C,
    writer: W,
    template: Template,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

impl<S: Storage, C: ConfigProvider, W: SheetWriter> SheetPipeline<S, C, W> {
    /// `artifacts` receives one document per page; `ledger_storage` holds the ledger file.
    pub fn new(artifacts: S, ledger_storage: S, config: C, writer: W) -> Result<Self> {
        let template = config.template()?;
        let ledger_store = LedgerStore::new(ledger_storage, config.ledger_path());
        Ok(Self {
            artifacts,
            ledger_store,
            config,
            writer,
            template,
            clock: local_now,
        })
    }

    /// Overrides the issuance timestamp source.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn artifact_extension(&self) -> &str {
        self.writer.extension()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, W: SheetWriter> Pipeline for SheetPipeline<S, C, W> {
    async fn extract(&self) -> Result<Ledger> {
        tracing::debug!("Reading ledger from {}", self.ledger_store.path());
        self.ledger_store.load().await
    }

    async fn transform(&self, ledger: &Ledger) -> Result<RunPlan> {
        let range = self.config.serial_range()?;
        let allocation = self.config.allocation();
        tracing::debug!("Allocation config: {:?}", allocation);

        let identifiers = allocate_range(range, ledger, &allocation)?;
        let skipped = (range.count() as usize).saturating_sub(identifiers.len());
        let pages = layout(&identifiers, &self.template);

        Ok(RunPlan {
            identifiers,
            skipped,
            pages,
        })
    }

    async fn load(&self, plan: RunPlan, mut ledger: Ledger) -> Result<RunReport> {
        let mut report = RunReport::from_plan(&plan, self.writer.extension());

        if plan.identifiers.is_empty() {
            tracing::warn!("⚠️ No new identifiers in range; skipping page generation and ledger update");
            return Ok(report);
        }

        // 逐頁渲染並寫出，全部成功後才更新帳本
        let mut artifacts = Vec::with_capacity(plan.pages.len());
        for page in &plan.pages {
            let name = page
                .artifact_name(self.writer.extension())
                .ok_or_else(|| StickerError::ProcessingError {
                    message: format!("page {} has no identifiers", page.number),
                })?;
            tracing::debug!("Rendering page {} ({} stickers)", page.number, page.used_slots());
            let bytes = self.writer.render(page)?;
            self.artifacts.write_file(&name, &bytes).await?;
            tracing::info!("🖨️ Wrote {} ({} bytes)", name, bytes.len());
            artifacts.push(name);
        }

        let issued_at = (self.clock)();
        let new_entries = ledger.record(&plan.identifiers, issued_at);
        self.ledger_store.append(&new_entries).await?;

        report.artifacts = artifacts;
        Ok(report)
    }
}
