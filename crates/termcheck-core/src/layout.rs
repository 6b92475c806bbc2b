//! Grid placement for generated clones
//!
//! `n` clones fill a near-square grid row by row: `ceil(sqrt(n))` columns,
//! each cell one template size plus spacing away from the last.

use termcheck_document::{Bounds, Point};

/// Zero-based grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Column
    pub col: usize,
    /// Row
    pub row: usize,
}

/// Number of columns for `n` items, `ceil(sqrt(n))`
#[must_use]
pub fn grid_columns(n: usize) -> usize {
    let mut cols = 1usize;
    while cols.saturating_mul(cols) < n {
        cols += 1;
    }
    cols
}

/// Cell of item `index` among `n`
#[inline]
#[must_use]
pub fn grid_cell(index: usize, n: usize) -> GridCell {
    let cols = grid_columns(n);
    GridCell {
        col: index % cols,
        row: index / cols,
    }
}

/// Top-left corner of `cell` for a template occupying `origin`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_position(origin: Bounds, cell: GridCell, spacing: f64) -> Point {
    Point::new(
        origin.x + cell.col as f64 * (origin.width + spacing),
        origin.y + cell.row as f64 * (origin.height + spacing),
    )
}
