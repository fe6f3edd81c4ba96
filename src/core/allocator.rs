use crate::core::encoder::encode;
use crate::domain::ledger::Ledger;
use crate::domain::model::{AllocationConfig, Identifier, SerialRange, MAX_SERIAL, SERIAL_WIDTH};
use crate::utils::error::{Result, StickerError};

/// Encodes every serial in `start..=end` and drops identifiers already in `ledger`.
///
/// The result keeps ascending-serial order. An empty result is valid: every
/// serial in the range has been issued before.
pub fn allocate(
    start: u64,
    end: u64,
    ledger: &Ledger,
    config: &AllocationConfig,
) -> Result<Vec<Identifier>> {
    let range = SerialRange::new(start, end)?;
    allocate_range(range, ledger, config)
}

pub fn allocate_range(
    range: SerialRange,
    ledger: &Ledger,
    config: &AllocationConfig,
) -> Result<Vec<Identifier>> {
    // 任何一個序號溢位就整批放棄，不做部分發號
    if range.end() > MAX_SERIAL {
        return Err(StickerError::EncodingOverflow {
            serial: range.start().max(MAX_SERIAL + 1),
            width: SERIAL_WIDTH,
        });
    }

    tracing::info!(
        "🔢 Generating identifiers from {} to {}",
        range.start(),
        range.end()
    );

    let candidates = range
        .serials()
        .map(|serial| encode(config, serial))
        .collect::<Result<Vec<_>>>()?;
    let total = candidates.len();

    let unique: Vec<Identifier> = candidates
        .into_iter()
        .filter(|identifier| !ledger.contains(identifier))
        .collect();

    let skipped = total - unique.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} identifiers already in the ledger", skipped);
    }
    tracing::info!("✅ {} unique identifiers generated", unique.len());

    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> AllocationConfig {
        AllocationConfig {
            area: 1,
            producer_code: "24".to_string(),
            year: 2024,
            model_code: "D0".to_string(),
        }
    }

    fn ledger_with(serials: &[u64]) -> Ledger {
        let issued_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ids: Vec<Identifier> = serials.iter().map(|&s| encode(&config(), s).unwrap()).collect();
        let mut ledger = Ledger::new();
        ledger.record(&ids, issued_at);
        ledger
    }

    #[test]
    fn test_allocate_empty_ledger() {
        let ids = allocate(1, 5, &Ledger::new(), &config()).unwrap();
        let values: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "12424D00000001",
                "12424D00000002",
                "12424D00000003",
                "12424D00000004",
                "12424D00000005",
            ]
        );
    }

    #[test]
    fn test_allocate_skips_issued_and_keeps_order() {
        let ledger = ledger_with(&[2, 4]);
        let ids = allocate(1, 6, &ledger, &config()).unwrap();
        let expected: Vec<Identifier> = [1, 3, 5, 6]
            .iter()
            .map(|&s| encode(&config(), s).unwrap())
            .collect();
        assert_eq!(ids, expected);
        assert!(ids.iter().all(|id| !ledger.contains(id)));
    }

    #[test]
    fn test_allocate_fully_issued_range_is_empty() {
        let ledger = ledger_with(&[7, 8, 9]);
        let ids = allocate(7, 9, &ledger, &config()).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_allocate_rejects_reversed_range() {
        assert!(matches!(
            allocate(5, 3, &Ledger::new(), &config()),
            Err(StickerError::InvalidRange { start: 5, end: 3 })
        ));
    }

    #[test]
    fn test_allocate_aborts_on_overflow() {
        let err = allocate(9_999_998, 10_000_001, &Ledger::new(), &config()).unwrap_err();
        assert!(matches!(
            err,
            StickerError::EncodingOverflow {
                serial: 10_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_allocate_is_repeatable_without_append() {
        let ledger = ledger_with(&[3]);
        let first = allocate(1, 10, &ledger, &config()).unwrap();
        let second = allocate(1, 10, &ledger, &config()).unwrap();
        assert_eq!(first, second);
    }
}
