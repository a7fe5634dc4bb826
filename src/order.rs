//! Booklet page order calculations
//!
//! A saddle-stitched booklet is a stack of folded sheets nested inside one
//! another. Each sheet carries four logical pages: two on the front and two
//! on the back. The outermost sheet holds the first and last pages of the
//! document, the next sheet the pair just inside those, and so on until the
//! innermost sheet carries the two middle pages.

use crate::error::{Error, Result};

/// Logical pages printed on one physical sheet (2 per side, 2 sides)
pub const PAGES_PER_SHEET: usize = 4;

/// Page count rounded up to a whole number of sheets
pub fn padded_page_count(total_pages: usize) -> usize {
    total_pages.div_ceil(PAGES_PER_SHEET) * PAGES_PER_SHEET
}

/// Number of physical sheets needed for `total_pages`
pub fn sheet_count(total_pages: usize) -> usize {
    padded_page_count(total_pages) / PAGES_PER_SHEET
}

/// Compute the imposed order of zero-based page indices
///
/// For every sheet, four indices are emitted: front right, front left,
/// back left, back right. Indices at or above `total_pages` are blank filler
/// positions; the caller either padded the document to cover them or drops
/// them with [`booklet_selectors`].
///
/// # Example
///
/// ```
/// use pdf_booklet::order::compute_page_order;
///
/// assert_eq!(compute_page_order(8).unwrap(), vec![7, 0, 1, 6, 5, 2, 3, 4]);
/// ```
pub fn compute_page_order(total_pages: usize) -> Result<Vec<usize>> {
    if total_pages == 0 {
        return Err(Error::InvalidPageCount(total_pages));
    }

    let padded = padded_page_count(total_pages);
    let mut order = Vec::with_capacity(padded);

    for sheet in 0..padded / PAGES_PER_SHEET {
        // Front of sheet
        order.push(padded - 1 - 2 * sheet);
        order.push(2 * sheet);
        // Back of sheet (after flipping)
        order.push(2 * sheet + 1);
        order.push(padded - 2 - 2 * sheet);
    }

    Ok(order)
}

/// Translate an imposed order into 1-based page selectors
///
/// Indices that do not name a real page of a `page_count`-page document are
/// dropped; the rest keep their relative order.
pub fn booklet_selectors(order: &[usize], page_count: usize) -> Vec<u32> {
    order
        .iter()
        .filter(|&&index| index < page_count)
        .map(|&index| (index + 1) as u32)
        .collect()
}

/// One physical sheet of the booklet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sheet {
    /// 1-based sheet number, outermost first
    pub number: usize,
    /// Zero-based page indices on the front, left to right as printed
    pub front: [usize; 2],
    /// Zero-based page indices on the back, left to right as printed
    pub back: [usize; 2],
}

/// Group the imposed order into sheets
pub fn sheets(total_pages: usize) -> Result<Vec<Sheet>> {
    let order = compute_page_order(total_pages)?;

    Ok(order
        .chunks_exact(PAGES_PER_SHEET)
        .enumerate()
        .map(|(i, slots)| Sheet {
            number: i + 1,
            front: [slots[0], slots[1]],
            back: [slots[2], slots[3]],
        })
        .collect())
}
