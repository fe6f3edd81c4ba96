use crate::core::{SheetWriter, SymbolEncoder};
use crate::domain::model::{Cell, Page, Placement};
use crate::domain::template::PageSize;
use crate::utils::error::Result;

/// Fixed geometry and typography of one sticker.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerStyle {
    pub symbol_size: f64,
    /// Offset of the symbol from the slot origin.
    pub symbol_dx: f64,
    pub symbol_dy: f64,
    /// First text baseline sits this far above the bottom edge of the symbol.
    pub text_rise: f64,
    pub line_spacing: f64,
    pub corner_radius: f64,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for StickerStyle {
    fn default() -> Self {
        Self {
            symbol_size: 46.0,
            symbol_dx: 2.0,
            symbol_dy: -2.0,
            text_rise: 24.0,
            line_spacing: 10.0,
            corner_radius: 7.0,
            stroke_width: 0.5,
            font_size: 10.0,
            font_family: "Arial Narrow".to_string(),
        }
    }
}

/// Writes one SVG Tiny 1.2 document per page.
pub struct SvgSheetWriter<E: SymbolEncoder> {
    encoder: E,
    page_size: PageSize,
    style: StickerStyle,
}

impl<E: SymbolEncoder> SvgSheetWriter<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            page_size: PageSize::default(),
            style: StickerStyle::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_style(mut self, style: StickerStyle) -> Self {
        self.style = style;
        self
    }

    fn push_cell_outline(&self, doc: &mut String, cell: &Cell) {
        doc.push_str(&format!(
            "<rect fill=\"none\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" stroke=\"black\" stroke-width=\"{}\" width=\"{}\" x=\"{}\" y=\"{}\" />\n",
            num(cell.height),
            num(self.style.stroke_width),
            num(cell.width),
            num(cell.x),
            num(cell.y),
            r = num(self.style.corner_radius),
        ));
    }

    fn push_sticker(&self, doc: &mut String, placement: &Placement) -> Result<()> {
        let style = &self.style;
        let href = self.encoder.encode_symbol(&placement.identifier)?;

        let symbol_x = placement.origin.x + style.symbol_dx;
        let symbol_y = placement.origin.y + style.symbol_dy;
        doc.push_str(&format!(
            "<image height=\"{size}\" width=\"{size}\" x=\"{}\" xlink:href=\"{}\" y=\"{}\" />\n",
            num(symbol_x),
            escape_xml(&href),
            num(symbol_y),
            size = num(style.symbol_size),
        ));

        let text_x = symbol_x + style.symbol_size;
        let text_y = symbol_y + style.symbol_size - style.text_rise;
        let (first_line, second_line) = placement.identifier.halves();
        for (line, baseline) in [(first_line, text_y), (second_line, text_y + style.line_spacing)] {
            doc.push_str(&format!(
                "<text fill=\"black\" font-family=\"{}\" font-size=\"{}px\" font-weight=\"bold\" text-anchor=\"start\" x=\"{}\" y=\"{}\">{}</text>\n",
                escape_xml(&style.font_family),
                num(style.font_size),
                num(text_x),
                num(baseline),
                escape_xml(line),
            ));
        }
        Ok(())
    }
}

impl<E: SymbolEncoder> SheetWriter for SvgSheetWriter<E> {
    fn extension(&self) -> &str {
        "svg"
    }

    fn render(&self, page: &Page) -> Result<Vec<u8>> {
        let mut doc = String::new();
        doc.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n");
        doc.push_str(&format!(
            "<svg baseProfile=\"tiny\" height=\"{}\" version=\"1.2\" width=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
            num(self.page_size.height),
            num(self.page_size.width),
        ));

        // 只畫有貼紙的格子，最後一頁的空格不輸出
        for assignment in &page.cells {
            self.push_cell_outline(&mut doc, &assignment.cell);
            for placement in &assignment.placements {
                self.push_sticker(&mut doc, placement)?;
            }
        }

        doc.push_str("</svg>\n");
        Ok(doc.into_bytes())
    }
}

/// Coordinates rounded to 1/1000 of a unit, trailing zeros trimmed.
fn num(value: f64) -> String {
    let rounded = format!("{:.3}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::layout;
    use crate::domain::model::Identifier;
    use crate::domain::template::Template;
    use crate::utils::error::StickerError;

    struct StubEncoder;

    impl SymbolEncoder for StubEncoder {
        fn encode_symbol(&self, identifier: &Identifier) -> Result<String> {
            Ok(format!("stub:{}", identifier))
        }
    }

    struct FailingEncoder;

    impl SymbolEncoder for FailingEncoder {
        fn encode_symbol(&self, identifier: &Identifier) -> Result<String> {
            Err(StickerError::SymbolEncoding {
                identifier: identifier.to_string(),
                message: "data too long".to_string(),
            })
        }
    }

    fn page_with(n: usize) -> Page {
        let template = Template::new(vec![Cell::new(21.3, 43.4, 180.0, 83.9)]).unwrap();
        let ids: Vec<Identifier> = (1..=n)
            .map(|i| Identifier::new(format!("12424D{:08}", i)))
            .collect();
        layout(&ids, &template).remove(0)
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(21.3), "21.3");
        assert_eq!(num(46.0), "46");
        assert_eq!(num(21.3 + 2.0), "23.3");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(83.9 / 2.0), "41.95");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn test_render_full_cell() {
        let writer = SvgSheetWriter::new(StubEncoder);
        let svg = String::from_utf8(writer.render(&page_with(4)).unwrap()).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("height=\"841.9\""));
        assert!(svg.contains("width=\"595.3\""));
        assert_eq!(svg.matches("<rect ").count(), 1);
        assert_eq!(svg.matches("<image ").count(), 4);
        assert_eq!(svg.matches("<text ").count(), 8);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_sticker_geometry() {
        let writer = SvgSheetWriter::new(StubEncoder);
        let svg = String::from_utf8(writer.render(&page_with(1)).unwrap()).unwrap();

        // 槽位原點 (21.3, 43.4)，符號偏移 (+2, -2)
        assert!(svg.contains(
            "<image height=\"46\" width=\"46\" x=\"23.3\" xlink:href=\"stub:12424D00000001\" y=\"41.4\" />"
        ));
        // 文字在符號右側，基線 41.4 + 46 - 24 = 63.4
        assert!(svg.contains("x=\"69.3\" y=\"63.4\">12424D0</text>"));
        assert!(svg.contains("x=\"69.3\" y=\"73.4\">0000001</text>"));
    }

    #[test]
    fn test_render_partial_cell_only_draws_used_slots() {
        let writer = SvgSheetWriter::new(StubEncoder);
        let svg = String::from_utf8(writer.render(&page_with(3)).unwrap()).unwrap();
        assert_eq!(svg.matches("<image ").count(), 3);
    }

    #[test]
    fn test_render_propagates_symbol_failure() {
        let writer = SvgSheetWriter::new(FailingEncoder);
        assert!(matches!(
            writer.render(&page_with(2)),
            Err(StickerError::SymbolEncoding { .. })
        ));
    }

    #[test]
    fn test_custom_style() {
        let style = StickerStyle {
            font_family: "DejaVu Sans".to_string(),
            symbol_size: 40.0,
            ..StickerStyle::default()
        };
        let writer = SvgSheetWriter::new(StubEncoder).with_style(style);
        let svg = String::from_utf8(writer.render(&page_with(1)).unwrap()).unwrap();
        assert!(svg.contains("font-family=\"DejaVu Sans\""));
        assert!(svg.contains("<image height=\"40\" width=\"40\""));
    }

    #[test]
    fn test_custom_page_size() {
        let writer = SvgSheetWriter::new(StubEncoder).with_page_size(PageSize {
            width: 300.0,
            height: 200.0,
        });
        let svg = String::from_utf8(writer.render(&page_with(1)).unwrap()).unwrap();
        assert!(svg.contains("height=\"200\" version=\"1.2\" width=\"300\""));
    }
}
