use crate::foundation::{
    grid::{GRID_DIM, Grid},
    raster::Raster,
};
use crate::segment::extract::{Part, extract_parts};

/// A part only qualifies for severing when its cross-axis extent exceeds
/// this, which keeps thin slivers and stray strokes out of the search.
pub const MIN_SILHOUETTE_EXTENT: u32 = 50;

/// Share of a part's pixel mass that must fall inside a band for the band
/// to claim it (per cent). Excludes parts that merely graze a band.
pub const BAND_MASS_MIN_PERCENT: usize = 30;

/// Half-width of the window searched around each expected fusion point.
pub const CUT_SEARCH_RADIUS: u32 = 20;

/// Severs narrow necks between silhouettes the generator fused across
/// cell boundaries, mutating the raster in place.
///
/// Two independent one-dimensional passes run unconditionally: row bands
/// first (undoing horizontal fusion, cutting along columns), then column
/// bands (undoing vertical fusion, cutting along rows). Each pass
/// re-discovers parts from the raster it is about to mutate. Diagonal
/// fusions are out of reach of either pass and stay fused; that is a
/// known limitation of the 1D approach, not an error.
///
/// Returns the number of cuts applied.
pub fn separate_fused_silhouettes(raster: &mut Raster, grid: &Grid) -> usize {
    let row_cuts = sever_across_row_bands(raster, grid);
    let col_cuts = sever_across_column_bands(raster, grid);
    row_cuts + col_cuts
}

fn sever_across_row_bands(raster: &mut Raster, grid: &Grid) -> usize {
    let bands = grid.y_lines();
    let expected_w = f64::from(raster.width()) / f64::from(GRID_DIM);
    let parts = extract_parts(raster);

    let mut cuts = 0usize;
    for band in 0..GRID_DIM as usize {
        for part in &parts {
            if part.height() <= MIN_SILHOUETTE_EXTENT {
                continue;
            }
            let in_band = part
                .pixels
                .iter()
                .filter(|&&(_, y)| bands[band] <= y && y < bands[band + 1])
                .count();
            if !holds_band_mass(in_band, part.pixel_count()) {
                continue;
            }

            let pieces = piece_count(f64::from(part.width()) / expected_w);
            if pieces > 1 {
                cuts += cut_part_columns(raster, part, pieces);
            }
        }
    }
    cuts
}

fn sever_across_column_bands(raster: &mut Raster, grid: &Grid) -> usize {
    let bands = grid.x_lines();
    let expected_h = f64::from(raster.height()) / f64::from(GRID_DIM);
    let parts = extract_parts(raster);

    let mut cuts = 0usize;
    for band in 0..GRID_DIM as usize {
        for part in &parts {
            if part.width() <= MIN_SILHOUETTE_EXTENT {
                continue;
            }
            let in_band = part
                .pixels
                .iter()
                .filter(|&&(x, _)| bands[band] <= x && x < bands[band + 1])
                .count();
            if !holds_band_mass(in_band, part.pixel_count()) {
                continue;
            }

            let pieces = piece_count(f64::from(part.height()) / expected_h);
            if pieces > 1 {
                cuts += cut_part_rows(raster, part, pieces);
            }
        }
    }
    cuts
}

fn holds_band_mass(in_band: usize, total: usize) -> bool {
    in_band * 100 >= total * BAND_MASS_MIN_PERCENT
}

/// How many single-cell silhouettes a fused extent most plausibly holds.
fn piece_count(cell_ratio: f64) -> u32 {
    if cell_ratio < 1.5 {
        1
    } else if cell_ratio < 2.5 {
        2
    } else {
        3
    }
}

/// Erases the narrowest column of the part near each expected fusion
/// point. True silhouettes are wide at the body and narrow where two of
/// them accidentally touch, so the minimum-mass cross-section inside the
/// window is a reliable stand-in for the fusion point.
fn cut_part_columns(raster: &mut Raster, part: &Part, pieces: u32) -> usize {
    let mut mass = vec![0u32; part.width() as usize];
    for &(x, _) in &part.pixels {
        mass[(x - part.min_x) as usize] += 1;
    }

    let mut cuts = 0usize;
    for k in 1..pieces {
        let Some(offset) = thinnest_offset(&mass, part.width() * k / pieces) else {
            continue;
        };
        let cut_x = part.min_x + offset;
        tracing::debug!(cut_x, "severing fused silhouettes along column");
        for &(x, y) in &part.pixels {
            if x == cut_x {
                raster.clear_pixel(x, y);
            }
        }
        cuts += 1;
    }
    cuts
}

fn cut_part_rows(raster: &mut Raster, part: &Part, pieces: u32) -> usize {
    let mut mass = vec![0u32; part.height() as usize];
    for &(_, y) in &part.pixels {
        mass[(y - part.min_y) as usize] += 1;
    }

    let mut cuts = 0usize;
    for k in 1..pieces {
        let Some(offset) = thinnest_offset(&mass, part.height() * k / pieces) else {
            continue;
        };
        let cut_y = part.min_y + offset;
        tracing::debug!(cut_y, "severing fused silhouettes along row");
        for &(x, y) in &part.pixels {
            if y == cut_y {
                raster.clear_pixel(x, y);
            }
        }
        cuts += 1;
    }
    cuts
}

/// Minimum-mass offset within ±[`CUT_SEARCH_RADIUS`] of `expected`,
/// clamped to the part extent. Offsets holding no part pixels are not
/// cut candidates; if the whole window is empty the split is skipped and
/// the part stays fused. Ties resolve to the lowest offset.
fn thinnest_offset(mass: &[u32], expected: u32) -> Option<u32> {
    let lo = expected.saturating_sub(CUT_SEARCH_RADIUS);
    let hi = (expected + CUT_SEARCH_RADIUS).min(mass.len() as u32 - 1);

    let mut best: Option<(u32, u32)> = None;
    for offset in lo..=hi {
        let m = mass[offset as usize];
        if m == 0 {
            continue;
        }
        if best.is_none_or(|(_, bm)| m < bm) {
            best = Some((offset, m));
        }
    }
    best.map(|(offset, _)| offset)
}
