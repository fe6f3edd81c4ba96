pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{AllocationConfig, SerialRange};
#[cfg(feature = "cli")]
use crate::domain::template::Template;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_LEDGER_PATH: &str = "used_ids.csv";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sticker-sheet")]
#[command(about = "Allocate asset identifiers and lay them out on QR sticker sheets")]
pub struct CliConfig {
    #[arg(long, help = "Area of activity code (e.g. 1 for energy, 2 for gas)")]
    pub area: i64,

    #[arg(long, help = "Producer code (e.g. 24)")]
    pub producer_code: String,

    #[arg(long, help = "Year of production (e.g. 2024)")]
    pub year: i32,

    #[arg(long, help = "Model code (e.g. D0)")]
    pub model_code: String,

    #[arg(long, help = "First serial number")]
    pub start: u64,

    #[arg(long, help = "Last serial number (inclusive)")]
    pub end: u64,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    pub ledger_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Plan the run without writing sheets or the ledger")]
    pub dry_run: bool,

    #[arg(long, help = "Print the run report as JSON")]
    pub json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn allocation(&self) -> AllocationConfig {
        AllocationConfig {
            area: self.area,
            producer_code: self.producer_code.clone(),
            year: self.year,
            model_code: self.model_code.clone(),
        }
    }

    fn serial_range(&self) -> Result<SerialRange> {
        SerialRange::new(self.start, self.end)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn ledger_path(&self) -> &str {
        &self.ledger_path
    }

    fn template(&self) -> Result<Template> {
        Ok(Template::a4_sheet())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range("area", self.area, 0, i64::MAX)?;
        validation::validate_code_segment("producer_code", &self.producer_code)?;
        validation::validate_code_segment("model_code", &self.model_code)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("ledger_path", &self.ledger_path)?;
        Ok(())
    }
}
