pub mod allocator;
pub mod encoder;
pub mod engine;
pub mod layout;
pub mod ledger;
pub mod sheet_pipeline;

pub use crate::domain::model::{Identifier, Page, RunPlan, RunReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SheetWriter, Storage, SymbolEncoder};
pub use crate::utils::error::Result;
