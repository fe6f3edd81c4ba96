use crate::config::{DEFAULT_LEDGER_PATH, DEFAULT_OUTPUT_PATH};
use crate::core::ConfigProvider;
use crate::domain::model::{AllocationConfig, Cell, SerialRange};
use crate::domain::template::{PageSize, Template};
use crate::utils::error::{Result, StickerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub page: Option<PageSize>,
    pub template: Option<TemplateConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

/// 可由命令列 --start / --end 覆蓋
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeConfig {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    pub ledger_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            ledger_path: None,
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StickerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${PRODUCER_CODE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StickerError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("allocation.area", self.allocation.area, 0, i64::MAX)?;
        validation::validate_code_segment(
            "allocation.producer_code",
            &self.allocation.producer_code,
        )?;
        validation::validate_code_segment("allocation.model_code", &self.allocation.model_code)?;

        validation::validate_required_field("range.start", &self.range.start)?;
        validation::validate_required_field("range.end", &self.range.end)?;

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_path("output.ledger_path", self.ledger_path())?;

        if let Some(page) = &self.page {
            if !(page.width > 0.0 && page.height > 0.0) {
                return Err(StickerError::InvalidConfigValueError {
                    field: "page".to_string(),
                    value: format!("{}x{}", page.width, page.height),
                    reason: "Page width and height must be positive".to_string(),
                });
            }
        }

        // 樣板錯誤在這裡就擋下
        self.template()?;
        Ok(())
    }

    pub fn override_range(&mut self, start: Option<u64>, end: Option<u64>) {
        if start.is_some() {
            self.range.start = start;
        }
        if end.is_some() {
            self.range.end = end;
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page.unwrap_or_default()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn allocation(&self) -> AllocationConfig {
        self.allocation.clone()
    }

    fn serial_range(&self) -> Result<SerialRange> {
        let start = validation::validate_required_field("range.start", &self.range.start)?;
        let end = validation::validate_required_field("range.end", &self.range.end)?;
        SerialRange::new(*start, *end)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn ledger_path(&self) -> &str {
        self.output
            .ledger_path
            .as_deref()
            .unwrap_or(DEFAULT_LEDGER_PATH)
    }

    fn template(&self) -> Result<Template> {
        match &self.template {
            Some(template) => Template::new(template.cells.clone()),
            None => Ok(Template::a4_sheet()),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[allocation]
area = 1
producer_code = "24"
year = 2024
model_code = "D0"

[range]
start = 1
end = 500
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.allocation.producer_code, "24");
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.ledger_path(), "used_ids.csv");
        assert_eq!(config.serial_range().unwrap().count(), 500);
        assert_eq!(config.template().unwrap().capacity(), 108);
        assert_eq!(config.page_size(), PageSize::A4);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_template_and_page() {
        let toml_content = r#"
[allocation]
area = 2
producer_code = "31"
year = 2025
model_code = "G7"

[range]
start = 10
end = 20

[output]
path = "./sheets"
ledger_path = "/var/lib/stickers/used_ids.csv"

[page]
width = 300.0
height = 200.0

[[template.cells]]
x = 10.0
y = 10.0
width = 140.0
height = 80.0

[[template.cells]]
x = 150.0
y = 10.0
width = 140.0
height = 80.0

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.template().unwrap().capacity(), 8);
        assert_eq!(config.page_size().width, 300.0);
        assert_eq!(config.ledger_path(), "/var/lib/stickers/used_ids.csv");
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STICKER_TEST_PRODUCER", "77");

        let toml_content = r#"
[allocation]
area = 1
producer_code = "${STICKER_TEST_PRODUCER}"
year = 2024
model_code = "D0"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.allocation.producer_code, "77");

        std::env::remove_var("STICKER_TEST_PRODUCER");
    }

    #[test]
    fn test_missing_range_is_reported() {
        let toml_content = r#"
[allocation]
area = 1
producer_code = "24"
year = 2024
model_code = "D0"

[range]
start = 1
"#;

        let mut config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(StickerError::MissingConfigError { .. })
        ));

        config.override_range(None, Some(9));
        assert!(config.validate().is_ok());
        assert_eq!(config.serial_range().unwrap().end(), 9);
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let toml_content = format!("{}\n[template]\ncells = []\n", BASIC);
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(StickerError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[allocation\narea = 1"),
            Err(StickerError::TomlError(_))
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.allocation.model_code, "D0");
    }
}
