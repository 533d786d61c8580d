use crate::engine::Mode;
use crate::foundation::grid::{CELL_COUNT, GRID_DIM, Grid};
use crate::segment::extract::Part;

/// Icon atlases hold compact glyphs; anything touching 3+ cells is a
/// background artifact.
pub const ICON_MAX_SPAN: usize = 2;

/// Background-tolerant atlases allow sprawl up to 5 cells.
pub const GENERIC_MAX_SPAN: usize = 5;

/// Silhouette atlases reject from 5 cells up.
pub const SILHOUETTE_MAX_SPAN: usize = 4;

/// Accepted silhouette bounding-box extent, both axes, inclusive.
pub const SILHOUETTE_EXTENT_MIN: u32 = 200;
pub const SILHOUETTE_EXTENT_MAX: u32 = 400;

/// A silhouette's bbox edges must each sit within this fraction of a
/// cell's extent from some grid line on the same axis.
pub const GRID_SNAP_FRACTION: f64 = 0.2;

/// Per-cell part lists in row-major cell order, plus how many parts the
/// mode filter discarded.
#[derive(Debug)]
pub struct OwnershipOutcome {
    pub cells: Vec<Vec<Part>>,
    pub rejected: usize,
}

/// Assigns every part to exactly one owning cell, or discards it.
///
/// Each part's pixels are tallied per overlapping cell; the mode filter
/// runs before ownership, so a rejected part never claims a cell. The
/// owner is the cell with the strictly highest tally. On a tie the
/// first cell in row-major order wins, an arbitrary but deterministic
/// policy inherited from scan order. Approved parts keep their
/// extraction order within each cell.
pub fn resolve_ownership(parts: Vec<Part>, grid: &Grid, mode: Mode) -> OwnershipOutcome {
    let mut cells: Vec<Vec<Part>> = (0..CELL_COUNT).map(|_| Vec::new()).collect();
    let mut rejected = 0usize;

    for part in parts {
        let (counts, span) = cell_counts(&part, grid);
        if !accepts(&part, span, grid, mode) {
            tracing::trace!(span, w = part.width(), h = part.height(), "part rejected");
            rejected += 1;
            continue;
        }

        let mut owner = 0usize;
        for cell in 1..CELL_COUNT {
            if counts[cell] > counts[owner] {
                owner = cell;
            }
        }
        cells[owner].push(part);
    }

    OwnershipOutcome { cells, rejected }
}

/// Pixel tally per cell (row-major) and the number of distinct cells
/// touched.
pub fn cell_counts(part: &Part, grid: &Grid) -> ([usize; CELL_COUNT], usize) {
    let mut counts = [0usize; CELL_COUNT];
    for &(x, y) in &part.pixels {
        counts[grid.cell_index_of(x, y)] += 1;
    }
    let span = counts.iter().filter(|&&c| c > 0).count();
    (counts, span)
}

fn accepts(part: &Part, span: usize, grid: &Grid, mode: Mode) -> bool {
    match mode {
        Mode::Icon => span <= ICON_MAX_SPAN,
        Mode::Generic => span <= GENERIC_MAX_SPAN,
        Mode::Silhouette => {
            span <= SILHOUETTE_MAX_SPAN
                && extent_in_silhouette_range(part.width())
                && extent_in_silhouette_range(part.height())
                && bbox_snaps_to_grid(part, grid)
        }
    }
}

fn extent_in_silhouette_range(extent: u32) -> bool {
    (SILHOUETTE_EXTENT_MIN..=SILHOUETTE_EXTENT_MAX).contains(&extent)
}

/// Every bbox edge must sit near a grid line on its own axis; large
/// stray shapes floating mid-cell fail this.
fn bbox_snaps_to_grid(part: &Part, grid: &Grid) -> bool {
    let x_lines = grid.x_lines();
    let y_lines = grid.y_lines();
    let tol_x = f64::from(x_lines[3]) / f64::from(GRID_DIM) * GRID_SNAP_FRACTION;
    let tol_y = f64::from(y_lines[3]) / f64::from(GRID_DIM) * GRID_SNAP_FRACTION;

    let near = |edge: u32, lines: &[u32; 4], tol: f64| {
        lines
            .iter()
            .any(|&line| f64::from(edge.abs_diff(line)) <= tol)
    };

    near(part.min_x, &x_lines, tol_x)
        && near(part.max_x, &x_lines, tol_x)
        && near(part.min_y, &y_lines, tol_y)
        && near(part.max_y, &y_lines, tol_y)
}
