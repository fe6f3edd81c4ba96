use crate::domain::model::{AllocationConfig, Identifier, MAX_SERIAL, SERIAL_WIDTH};
use crate::utils::error::{Result, StickerError};

/// Builds `area ++ producer ++ yy ++ model ++ serial(7)`.
///
/// Only the last two digits of the year are kept, so years a century apart
/// produce the same identifier. Serials wider than seven digits are rejected
/// instead of being widened or truncated.
pub fn encode(config: &AllocationConfig, serial: u64) -> Result<Identifier> {
    if serial > MAX_SERIAL {
        return Err(StickerError::EncodingOverflow {
            serial,
            width: SERIAL_WIDTH,
        });
    }

    Ok(Identifier::new(format!(
        "{}{}{:02}{}{:0width$}",
        config.area,
        config.producer_code,
        config.year.rem_euclid(100),
        config.model_code,
        serial,
        width = SERIAL_WIDTH
    )))
}
