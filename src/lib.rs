pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{QrSymbolEncoder, SvgSheetWriter};
pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use crate::core::{engine::RunEngine, sheet_pipeline::SheetPipeline};
pub use domain::model::{AllocationConfig, Cell, Identifier, Page, RunReport, SerialRange};
pub use domain::template::{PageSize, Template};
pub use utils::error::{Result, StickerError};
