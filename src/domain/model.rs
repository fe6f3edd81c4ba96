use crate::utils::error::{Result, StickerError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Width of the zero-padded serial field.
pub const SERIAL_WIDTH: usize = 7;
pub const MAX_SERIAL: u64 = 9_999_999;
pub const SLOTS_PER_CELL: usize = 4;
/// Characters per human-readable text line under a sticker.
pub const TEXT_LINE_CHARS: usize = 7;

/// Non-serial part of every identifier issued in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub area: i64,
    pub producer_code: String,
    pub year: i32,
    pub model_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SerialRange {
    start: u64,
    end: u64,
}

impl SerialRange {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(StickerError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of serials in the range; never zero. Saturates at `u64::MAX` for `0..=u64::MAX`.
    pub fn count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    pub fn serials(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two text lines printed next to the symbol: characters `0..7` and `7..14`.
    pub fn halves(&self) -> (&str, &str) {
        let (first, rest) = split_at_chars(&self.0, TEXT_LINE_CHARS);
        let (second, _) = split_at_chars(rest, TEXT_LINE_CHARS);
        (first, second)
    }
}

fn split_at_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Quadrant of a cell, in raster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Slot {
    pub const ALL: [Slot; SLOTS_PER_CELL] = [
        Slot::TopLeft,
        Slot::TopRight,
        Slot::BottomLeft,
        Slot::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Slot::TopLeft => 0,
            Slot::TopRight => 1,
            Slot::BottomLeft => 2,
            Slot::BottomRight => 3,
        }
    }

    pub fn column(self) -> usize {
        self.index() % 2
    }

    pub fn row(self) -> usize {
        self.index() / 2
    }
}

/// Rectangle on a page holding four slots, in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Cell {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn slot_origin(&self, slot: Slot) -> Point {
        Point {
            x: self.x + slot.column() as f64 * (self.width / 2.0),
            y: self.y + slot.row() as f64 * (self.height / 2.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub slot: Slot,
    pub origin: Point,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellAssignment {
    /// Position of the cell in the template.
    pub index: usize,
    pub cell: Cell,
    pub placements: Vec<Placement>,
}

/// One output artifact. Only cells that received at least one identifier are listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub capacity: usize,
    pub cells: Vec<CellAssignment>,
}

impl Page {
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.cells
            .iter()
            .flat_map(|cell| cell.placements.iter().map(|p| &p.identifier))
    }

    pub fn used_slots(&self) -> usize {
        self.cells.iter().map(|cell| cell.placements.len()).sum()
    }

    pub fn unused_slots(&self) -> usize {
        self.capacity.saturating_sub(self.used_slots())
    }

    pub fn is_partial(&self) -> bool {
        self.unused_slots() > 0
    }

    pub fn first(&self) -> Option<&Identifier> {
        self.identifiers().next()
    }

    pub fn last(&self) -> Option<&Identifier> {
        self.identifiers().last()
    }

    /// `sticker_page_<first>-<last>.<ext>`; `None` for a page with no identifiers.
    pub fn artifact_name(&self, extension: &str) -> Option<String> {
        let first = self.first()?;
        let last = self.last()?;
        Some(format!("sticker_page_{}-{}.{}", first, last, extension))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub identifier: Identifier,
    pub issued_at: NaiveDateTime,
}

/// Output of the allocate + layout phase.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub identifiers: Vec<Identifier>,
    pub skipped: usize,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub issued: usize,
    pub skipped: usize,
    pub pages: usize,
    pub artifacts: Vec<String>,
    pub unused_slots: usize,
    pub dry_run: bool,
}

impl RunReport {
    /// Report for `plan` before anything is written; `artifacts` lists the planned names.
    pub fn from_plan(plan: &RunPlan, extension: &str) -> Self {
        Self {
            issued: plan.identifiers.len(),
            skipped: plan.skipped,
            pages: plan.pages.len(),
            artifacts: plan
                .pages
                .iter()
                .filter_map(|page| page.artifact_name(extension))
                .collect(),
            unused_slots: plan.pages.last().map(Page::unused_slots).unwrap_or(0),
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_range_rejects_reversed_bounds() {
        assert!(matches!(
            SerialRange::new(5, 3),
            Err(StickerError::InvalidRange { start: 5, end: 3 })
        ));

        let single = SerialRange::new(4, 4).unwrap();
        assert_eq!(single.count(), 1);
        assert_eq!(single.serials().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_serial_range_count_at_full_width() {
        let full = SerialRange::new(0, u64::MAX).unwrap();
        assert_eq!(full.count(), u64::MAX);

        let upper = SerialRange::new(1, u64::MAX).unwrap();
        assert_eq!(upper.count(), u64::MAX);
    }

    #[test]
    fn test_identifier_halves() {
        let id = Identifier::new("12424D00000001");
        assert_eq!(id.halves(), ("12424D0", "0000001"));

        let short = Identifier::new("ABC");
        assert_eq!(short.halves(), ("ABC", ""));
    }

    #[test]
    fn test_slot_origins_follow_raster_order() {
        let cell = Cell::new(10.0, 20.0, 180.0, 80.0);
        assert_eq!(cell.slot_origin(Slot::TopLeft), Point { x: 10.0, y: 20.0 });
        assert_eq!(cell.slot_origin(Slot::TopRight), Point { x: 100.0, y: 20.0 });
        assert_eq!(cell.slot_origin(Slot::BottomLeft), Point { x: 10.0, y: 60.0 });
        assert_eq!(cell.slot_origin(Slot::BottomRight), Point { x: 100.0, y: 60.0 });
    }

    #[test]
    fn test_slot_index_matches_raster_order() {
        for (i, slot) in Slot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }
}
