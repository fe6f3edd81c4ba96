use crate::core::Storage;
use crate::domain::ledger::Ledger;
use crate::domain::model::{Identifier, LedgerEntry};
use crate::utils::error::{Result, StickerError};
use chrono::NaiveDateTime;
use std::io::ErrorKind;

pub const LEDGER_HEADER: [&str; 2] = ["ID", "Generated On"];
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV-backed persistence for the issued-identifier ledger.
pub struct LedgerStore<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> LedgerStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 找不到帳本檔視為空帳本；格式錯誤則直接失敗
    pub async fn load(&self) -> Result<Ledger> {
        let data = match self.read_existing().await? {
            Some(data) => data,
            None => {
                tracing::info!("📒 No ledger at {}, starting empty", self.path);
                return Ok(Ledger::new());
            }
        };

        let entries = parse_ledger(&data)?;
        let ledger = Ledger::from_entries(entries);
        tracing::info!(
            "📒 Loaded {} issued identifiers from {}",
            ledger.len(),
            self.path
        );
        Ok(ledger)
    }

    /// Appends `entries` after every existing record. Writes the header first when the
    /// file is missing or holds only blank lines.
    pub async fn append(&self, entries: &[LedgerEntry]) -> Result<()> {
        if entries.is_empty() {
            tracing::debug!("Nothing to append to {}", self.path);
            return Ok(());
        }

        let (needs_header, needs_newline) = match self.read_existing().await? {
            Some(data) => (
                data.iter().all(u8::is_ascii_whitespace),
                !data.is_empty() && !data.ends_with(b"\n"),
            ),
            None => (true, false),
        };

        let mut payload = Vec::new();
        if needs_newline {
            payload.push(b'\n');
        }
        payload.extend(render_records(entries, needs_header)?);

        self.storage.append_file(&self.path, &payload).await?;
        tracing::info!("📒 Appended {} identifiers to {}", entries.len(), self.path);
        Ok(())
    }

    async fn read_existing(&self) -> Result<Option<Vec<u8>>> {
        match self.storage.read_file(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(StickerError::IoError(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Parses ledger bytes. The first record must be the header.
pub fn parse_ledger(data: &[u8]) -> Result<Vec<LedgerEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut entries = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let fallback_line = offset as u64 + 1;
        let record = record.map_err(|e| StickerError::LedgerCorrupt {
            line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        if offset == 0 {
            if record.iter().ne(LEDGER_HEADER.iter().copied()) {
                return Err(StickerError::LedgerCorrupt {
                    line,
                    message: format!(
                        "expected header '{}', found '{}'",
                        LEDGER_HEADER.join(","),
                        record.iter().collect::<Vec<_>>().join(",")
                    ),
                });
            }
            continue;
        }

        if record.len() != LEDGER_HEADER.len() {
            return Err(StickerError::LedgerCorrupt {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    LEDGER_HEADER.len(),
                    record.len()
                ),
            });
        }

        let identifier = &record[0];
        if identifier.trim().is_empty() {
            return Err(StickerError::LedgerCorrupt {
                line,
                message: "empty identifier".to_string(),
            });
        }

        let issued_at = NaiveDateTime::parse_from_str(&record[1], TIMESTAMP_FORMAT).map_err(
            |e| StickerError::LedgerCorrupt {
                line,
                message: format!("invalid timestamp '{}': {}", &record[1], e),
            },
        )?;

        entries.push(LedgerEntry {
            identifier: Identifier::new(identifier),
            issued_at,
        });
    }

    Ok(entries)
}

pub fn render_records(entries: &[LedgerEntry], with_header: bool) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if with_header {
        writer.write_record(LEDGER_HEADER)?;
    }
    for entry in entries {
        let issued_at = entry.issued_at.format(TIMESTAMP_FORMAT).to_string();
        writer.write_record([entry.identifier.as_str(), issued_at.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| StickerError::IoError(e.into_error()))
}
