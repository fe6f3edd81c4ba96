use crate::core::Pipeline;
use crate::domain::model::{RunPlan, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct RunEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> RunEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs every phase. Nothing is written unless allocation and layout succeed,
    /// and the ledger is appended only after every page is written.
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚀 Starting sticker run");

        let ledger = self.pipeline.extract().await?;
        self.monitor.log_stats("Ledger loaded");

        let plan = self.pipeline.transform(&ledger).await?;
        tracing::info!(
            "📄 {} identifiers planned on {} pages",
            plan.identifiers.len(),
            plan.pages.len()
        );
        self.monitor.log_stats("Allocation");

        let report = self.pipeline.load(plan, ledger).await?;
        self.monitor.log_stats("Rendering");
        self.monitor.log_final_stats();

        tracing::info!(
            "✅ Issued {} identifiers on {} pages",
            report.issued,
            report.pages
        );
        Ok(report)
    }

    /// Loads the ledger and plans the run without writing anything.
    pub async fn plan(&self) -> Result<RunPlan> {
        let ledger = self.pipeline.extract().await?;
        let plan = self.pipeline.transform(&ledger).await?;
        self.monitor.log_final_stats();
        Ok(plan)
    }
}
