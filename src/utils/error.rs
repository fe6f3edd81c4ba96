use thiserror::Error;

#[derive(Error, Debug)]
pub enum StickerError {
    #[error("Invalid serial range: start {start} is greater than end {end}")]
    InvalidRange { start: u64, end: u64 },

    #[error("Serial {serial} does not fit in {width} digits")]
    EncodingOverflow { serial: u64, width: usize },

    #[error("Ledger corrupt at record {line}: {message}")]
    LedgerCorrupt { line: u64, message: String },

    #[error("Invalid template: {message}")]
    InvalidTemplate { message: String },

    #[error("Symbol encoding failed for '{identifier}': {message}")]
    SymbolEncoding { identifier: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Allocation,
    Ledger,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StickerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StickerError::InvalidRange { .. } | StickerError::EncodingOverflow { .. } => {
                ErrorCategory::Allocation
            }
            StickerError::LedgerCorrupt { .. } | StickerError::CsvError(_) => ErrorCategory::Ledger,
            StickerError::InvalidTemplate { .. } | StickerError::SymbolEncoding { .. } => {
                ErrorCategory::Rendering
            }
            StickerError::TomlError(_)
            | StickerError::ConfigValidationError { .. }
            | StickerError::InvalidConfigValueError { .. }
            | StickerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            StickerError::IoError(_)
            | StickerError::SerializationError(_)
            | StickerError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 帳本毀損時繼續執行可能重複發號
            StickerError::LedgerCorrupt { .. } => ErrorSeverity::Critical,
            StickerError::IoError(_) => ErrorSeverity::Medium,
            StickerError::SerializationError(_) => ErrorSeverity::Low,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StickerError::InvalidRange { .. } => {
                "Make sure the start serial is less than or equal to the end serial".to_string()
            }
            StickerError::EncodingOverflow { width, .. } => {
                format!("Serial numbers must have at most {} digits; lower the end serial", width)
            }
            StickerError::LedgerCorrupt { .. } => {
                "Inspect the ledger file by hand and restore it from a backup; no identifiers were issued".to_string()
            }
            StickerError::InvalidTemplate { .. } => {
                "Check the template cells: at least one cell with positive width and height is required".to_string()
            }
            StickerError::SymbolEncoding { .. } => {
                "Shorten the producer or model code so the identifier fits in a QR symbol".to_string()
            }
            StickerError::CsvError(_) => "Check that the ledger file is valid CSV".to_string(),
            StickerError::IoError(_) => {
                "Check file permissions and free disk space, then re-run the same range".to_string()
            }
            StickerError::TomlError(_) | StickerError::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax".to_string()
            }
            StickerError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            StickerError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            StickerError::SerializationError(_) | StickerError::ProcessingError { .. } => {
                "Re-run with --verbose for more details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Allocation => format!("Cannot allocate identifiers: {}", self),
            ErrorCategory::Ledger => format!("Ledger problem: {}", self),
            ErrorCategory::Rendering => format!("Cannot render sticker sheets: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    /// 結束碼，依嚴重程度對應；任何失敗都不會是 0
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, StickerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_are_classified() {
        let range = StickerError::InvalidRange { start: 5, end: 3 };
        assert_eq!(range.category(), ErrorCategory::Allocation);
        assert_eq!(range.severity(), ErrorSeverity::High);
        assert_eq!(range.exit_code(), 1);

        let corrupt = StickerError::LedgerCorrupt {
            line: 3,
            message: "bad".to_string(),
        };
        assert_eq!(corrupt.category(), ErrorCategory::Ledger);
        assert_eq!(corrupt.exit_code(), 3);
    }

    #[test]
    fn test_every_severity_exits_non_zero() {
        let serialization: StickerError = serde_json::from_str::<u32>("not a number")
            .unwrap_err()
            .into();
        assert_eq!(serialization.severity(), ErrorSeverity::Low);
        assert_eq!(serialization.exit_code(), 4);

        let io = StickerError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.exit_code(), 2);
    }

    #[test]
    fn test_messages_mention_details() {
        let overflow = StickerError::EncodingOverflow {
            serial: 10_000_000,
            width: 7,
        };
        assert!(overflow.to_string().contains("10000000"));
        assert!(overflow.recovery_suggestion().contains('7'));
        assert!(overflow
            .user_friendly_message()
            .starts_with("Cannot allocate identifiers"));
    }
}
