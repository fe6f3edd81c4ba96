use crate::domain::model::{CellAssignment, Identifier, Page, Placement, Slot, SLOTS_PER_CELL};
use crate::domain::template::Template;

/// Splits `identifiers` into pages of `template.capacity()` slots.
///
/// Within a page identifiers fill cells in template order and each cell in
/// slot raster order. The final page may be partially filled; empty slots
/// are left out rather than padded.
pub fn layout(identifiers: &[Identifier], template: &Template) -> Vec<Page> {
    let capacity = template.capacity();

    let pages: Vec<Page> = identifiers
        .chunks(capacity)
        .enumerate()
        .map(|(index, chunk)| build_page(index + 1, chunk, template))
        .collect();

    if let Some(last) = pages.last().filter(|page| page.is_partial()) {
        tracing::warn!(
            "⚠️ Template exhausted on page {}: {} of {} slots used, {} left empty",
            last.number,
            last.used_slots(),
            last.capacity,
            last.unused_slots()
        );
    }

    tracing::debug!(
        "Laid out {} identifiers on {} pages ({} slots per page)",
        identifiers.len(),
        pages.len(),
        capacity
    );
    pages
}

fn build_page(number: usize, chunk: &[Identifier], template: &Template) -> Page {
    let cells = template
        .cells()
        .iter()
        .zip(chunk.chunks(SLOTS_PER_CELL))
        .enumerate()
        .map(|(index, (cell, ids))| CellAssignment {
            index,
            cell: *cell,
            placements: Slot::ALL
                .iter()
                .zip(ids)
                .map(|(&slot, identifier)| Placement {
                    slot,
                    origin: cell.slot_origin(slot),
                    identifier: identifier.clone(),
                })
                .collect(),
        })
        .collect();

    Page {
        number,
        capacity: template.capacity(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Cell, Point};

    fn ids(n: usize) -> Vec<Identifier> {
        (1..=n).map(|i| Identifier::new(format!("ID{:04}", i))).collect()
    }

    fn single_cell() -> Template {
        Template::new(vec![Cell::new(21.3, 43.4, 180.0, 83.9)]).unwrap()
    }

    #[test]
    fn test_five_identifiers_on_single_cell_template() {
        let pages = layout(&ids(5), &single_cell());
        assert_eq!(pages.len(), 2);

        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].used_slots(), 4);
        assert!(!pages[0].is_partial());

        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].used_slots(), 1);
        assert_eq!(pages[1].unused_slots(), 3);
        assert_eq!(pages[1].first().unwrap().as_str(), "ID0005");
    }

    fn assert_close(actual: Point, x: f64, y: f64) {
        assert!((actual.x - x).abs() < 1e-9, "x: {} != {}", actual.x, x);
        assert!((actual.y - y).abs() < 1e-9, "y: {} != {}", actual.y, y);
    }

    #[test]
    fn test_slot_geometry() {
        let pages = layout(&ids(4), &single_cell());
        let placements = &pages[0].cells[0].placements;

        assert_close(placements[0].origin, 21.3, 43.4);
        assert_close(placements[1].origin, 111.3, 43.4);
        assert_close(placements[2].origin, 21.3, 85.35);
        assert_close(placements[3].origin, 111.3, 85.35);

        let slots: Vec<Slot> = placements.iter().map(|p| p.slot).collect();
        assert_eq!(slots, Slot::ALL.to_vec());
    }

    #[test]
    fn test_partial_page_lists_only_occupied_cells() {
        let template = Template::a4_sheet();
        let pages = layout(&ids(10), &template);
        assert_eq!(pages.len(), 1);

        let page = &pages[0];
        assert_eq!(page.cells.len(), 3);
        assert_eq!(page.cells[2].index, 2);
        assert_eq!(page.cells[2].placements.len(), 2);
        assert_eq!(page.unused_slots(), 98);
    }

    #[test]
    fn test_exact_multiple_has_no_partial_page() {
        let pages = layout(&ids(8), &single_cell());
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| !p.is_partial()));
    }

    #[test]
    fn test_empty_input_produces_no_pages() {
        assert!(layout(&[], &single_cell()).is_empty());
    }

    #[test]
    fn test_artifact_name_uses_first_and_last() {
        let pages = layout(&ids(6), &single_cell());
        assert_eq!(
            pages[0].artifact_name("svg").unwrap(),
            "sticker_page_ID0001-ID0004.svg"
        );
        assert_eq!(
            pages[1].artifact_name("svg").unwrap(),
            "sticker_page_ID0005-ID0006.svg"
        );
    }
}
