use crate::domain::ledger::Ledger;
use crate::domain::model::{AllocationConfig, Identifier, Page, RunPlan, RunReport, SerialRange};
use crate::domain::template::Template;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Appends to the end of `path`, creating it when missing. Existing bytes are untouched.
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn allocation(&self) -> AllocationConfig;
    fn serial_range(&self) -> Result<SerialRange>;
    fn output_path(&self) -> &str;
    fn ledger_path(&self) -> &str;
    fn template(&self) -> Result<Template>;
}

/// Scannable-code encoder. Returns an image reference a sheet document can embed.
pub trait SymbolEncoder: Send + Sync {
    fn encode_symbol(&self, identifier: &Identifier) -> Result<String>;
}

/// Vector-document writer: one document per page.
pub trait SheetWriter: Send + Sync {
    fn extension(&self) -> &str;
    fn render(&self, page: &Page) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Ledger>;
    async fn transform(&self, ledger: &Ledger) -> Result<RunPlan>;
    async fn load(&self, plan: RunPlan, ledger: Ledger) -> Result<RunReport>;
}
