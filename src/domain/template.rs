use crate::domain::model::{Cell, SLOTS_PER_CELL};
use crate::utils::error::{Result, StickerError};
use serde::{Deserialize, Serialize};

/// A4 sheet in points.
pub const A4_PAGE_WIDTH: f64 = 595.3;
pub const A4_PAGE_HEIGHT: f64 = 841.9;

const A4_CELL_WIDTH: f64 = 180.0;
const A4_CELL_HEIGHT: f64 = 83.9;
const A4_COLUMNS: [f64; 3] = [21.3, 207.6, 394.0];
const A4_ROWS: [f64; 9] = [43.4, 127.3, 211.2, 295.1, 379.0, 462.9, 546.8, 630.7, 714.6];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: A4_PAGE_WIDTH,
        height: A4_PAGE_HEIGHT,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Ordered cells of one sheet, identical on every page of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    cells: Vec<Cell>,
}

impl Template {
    pub fn new(cells: Vec<Cell>) -> Result<Self> {
        if cells.is_empty() {
            return Err(StickerError::InvalidTemplate {
                message: "template must contain at least one cell".to_string(),
            });
        }

        for (index, cell) in cells.iter().enumerate() {
            let coordinates = [cell.x, cell.y, cell.width, cell.height];
            if coordinates.iter().any(|v| !v.is_finite()) {
                return Err(StickerError::InvalidTemplate {
                    message: format!("cell {} has a non-finite coordinate", index),
                });
            }
            if cell.width <= 0.0 || cell.height <= 0.0 {
                return Err(StickerError::InvalidTemplate {
                    message: format!(
                        "cell {} must have positive size, got {}x{}",
                        index, cell.width, cell.height
                    ),
                });
            }
        }

        Ok(Self { cells })
    }

    /// The production label sheet: 3 columns x 9 rows, filled column by column.
    pub fn a4_sheet() -> Self {
        let cells = A4_COLUMNS
            .iter()
            .flat_map(|&x| {
                A4_ROWS
                    .iter()
                    .map(move |&y| Cell::new(x, y, A4_CELL_WIDTH, A4_CELL_HEIGHT))
            })
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn capacity(&self) -> usize {
        self.cells.len() * SLOTS_PER_CELL
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::a4_sheet()
    }
}
