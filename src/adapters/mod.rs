// Adapters layer: concrete implementations of the rendering ports.

pub mod qr;
pub mod svg;

pub use qr::QrSymbolEncoder;
pub use svg::{StickerStyle, SvgSheetWriter};
