use crate::core::SymbolEncoder;
use crate::domain::model::Identifier;
use crate::utils::error::{Result, StickerError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::svg;
use qrcode::QrCode;

/// QR symbols rendered as SVG and embedded as a base64 data URI.
///
/// The SVG renderer has no randomness, so the same identifier always yields
/// the same bytes.
#[derive(Debug, Clone)]
pub struct QrSymbolEncoder {
    module_size: u32,
    quiet_zone: bool,
}

impl QrSymbolEncoder {
    pub fn new() -> Self {
        Self {
            module_size: 10,
            quiet_zone: true,
        }
    }

    pub fn with_quiet_zone(mut self, quiet_zone: bool) -> Self {
        self.quiet_zone = quiet_zone;
        self
    }

    /// Raw SVG markup of the symbol.
    pub fn render_svg(&self, identifier: &Identifier) -> Result<String> {
        let code = QrCode::new(identifier.as_str().as_bytes()).map_err(|e| {
            StickerError::SymbolEncoding {
                identifier: identifier.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(code
            .render::<svg::Color<'_>>()
            .quiet_zone(self.quiet_zone)
            .module_dimensions(self.module_size, self.module_size)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }
}

impl Default for QrSymbolEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolEncoder for QrSymbolEncoder {
    fn encode_symbol(&self, identifier: &Identifier) -> Result<String> {
        let image = self.render_svg(identifier)?;
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}
