use crate::foundation::{
    grid::{CellRect, GRID_DIM, Grid},
    raster::Raster,
};
use crate::segment::extract::Part;

/// Where a cell's approved group is seated inside its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Group bbox centered on both axes.
    Center,
    /// Horizontally centered, group bottom flush with the cell bottom.
    /// Groups taller than the cell overflow upward past the cell top
    /// rather than being clipped or rescaled.
    Bottom,
}

/// Writes every cell's approved parts into a fresh transparent raster,
/// re-seated per the placement policy.
///
/// The translation is computed once per cell from the union bbox of its
/// approved parts, so the relative arrangement of multiple parts (a hat
/// part above a head part) survives. Pixels translated out of bounds are
/// silently dropped; channels are copied verbatim with no blending.
pub fn compose(
    cells: &[Vec<Part>],
    source: &Raster,
    grid: &Grid,
    placement: Placement,
) -> Raster {
    let mut out = source.blank_like();
    let w = i64::from(source.width());
    let h = i64::from(source.height());

    for cy in 0..GRID_DIM {
        for cx in 0..GRID_DIM {
            let parts = &cells[(cy * GRID_DIM + cx) as usize];
            let Some(group) = union_bbox(parts) else {
                continue;
            };
            let (tx, ty) = target_origin(grid.cell(cx, cy), &group, placement);

            for part in parts {
                for &(x, y) in &part.pixels {
                    let nx = tx + i64::from(x - group.min_x);
                    let ny = ty + i64::from(y - group.min_y);
                    if (0..w).contains(&nx) && (0..h).contains(&ny) {
                        out.copy_pixel_from(source, x, y, nx as u32, ny as u32);
                    }
                }
            }
        }
    }

    out
}

struct GroupBbox {
    min_x: u32,
    min_y: u32,
    width: u32,
    height: u32,
}

fn union_bbox(parts: &[Part]) -> Option<GroupBbox> {
    let first = parts.first()?;
    let mut min_x = first.min_x;
    let mut min_y = first.min_y;
    let mut max_x = first.max_x;
    let mut max_y = first.max_y;
    for p in &parts[1..] {
        min_x = min_x.min(p.min_x);
        min_y = min_y.min(p.min_y);
        max_x = max_x.max(p.max_x);
        max_y = max_y.max(p.max_y);
    }
    Some(GroupBbox {
        min_x,
        min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

fn target_origin(cell: CellRect, group: &GroupBbox, placement: Placement) -> (i64, i64) {
    let tx = i64::from(cell.x) + centered(cell.width, group.width);
    let ty = match placement {
        Placement::Center => i64::from(cell.y) + centered(cell.height, group.height),
        Placement::Bottom => i64::from(cell.bottom()) - i64::from(group.height),
    };
    (tx, ty)
}

// Floor division, so groups larger than their cell shift up/left.
fn centered(cell_extent: u32, group_extent: u32) -> i64 {
    (i64::from(cell_extent) - i64::from(group_extent)).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::grid::CELL_COUNT;

    fn paint_part(r: &mut Raster, x0: u32, y0: u32, x1: u32, y1: u32) -> Part {
        let mut pixels = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                r.pixel_mut(x, y).copy_from_slice(&[50, 100, 150, 255]);
                pixels.push((x, y));
            }
        }
        Part {
            pixels,
            min_x: x0,
            min_y: y0,
            max_x: x1,
            max_y: y1,
        }
    }

    fn empty_cells() -> Vec<Vec<Part>> {
        (0..CELL_COUNT).map(|_| Vec::new()).collect()
    }

    // 90x90 raster -> 30x30 cells.
    fn stage() -> (Raster, Grid) {
        (Raster::new(90, 90, 4).unwrap(), Grid::new(90, 90))
    }

    fn opaque_pixels(r: &Raster) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..r.height() {
            for x in 0..r.width() {
                if r.alpha(x, y) != 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn center_places_group_mid_cell() {
        let (mut src, g) = stage();
        let part = paint_part(&mut src, 0, 0, 9, 9);
        let mut cells = empty_cells();
        cells[0].push(part);

        let out = compose(&cells, &src, &g, Placement::Center);
        let px = opaque_pixels(&out);
        assert_eq!(px.len(), 100);
        assert_eq!(px[0], (10, 10));
        assert_eq!(px[px.len() - 1], (19, 19));
        assert_eq!(out.pixel(10, 10), &[50, 100, 150, 255]);
    }

    #[test]
    fn center_floors_odd_remainders() {
        let (mut src, g) = stage();
        // 9-wide group in a 30-wide cell: offset floor(21/2) = 10.
        let part = paint_part(&mut src, 0, 0, 8, 8);
        let mut cells = empty_cells();
        cells[0].push(part);

        let out = compose(&cells, &src, &g, Placement::Center);
        assert_eq!(opaque_pixels(&out)[0], (10, 10));
    }

    #[test]
    fn bottom_seats_group_on_cell_floor() {
        let (mut src, g) = stage();
        let part = paint_part(&mut src, 2, 2, 11, 13);
        let mut cells = empty_cells();
        cells[0].push(part);

        let out = compose(&cells, &src, &g, Placement::Bottom);
        let px = opaque_pixels(&out);
        // 10x12 group: x centered at 10, bottom at cell bottom 30.
        assert_eq!(px[0], (10, 18));
        assert_eq!(px[px.len() - 1], (19, 29));
    }

    #[test]
    fn bottom_overflows_upward_when_taller_than_cell() {
        let (mut src, g) = stage();
        // 40-tall group in a 30-tall middle-row cell: target_y = 60-40
        // = 20, spilling 10 rows into the cell above.
        let part = paint_part(&mut src, 2, 10, 11, 49);
        let mut cells = empty_cells();
        cells[3].push(part); // cell (0,1)

        let out = compose(&cells, &src, &g, Placement::Bottom);
        let px = opaque_pixels(&out);
        assert_eq!(px[0].1, 20);
        assert_eq!(px[px.len() - 1].1, 59);
        assert_eq!(px.len(), 400);
    }

    #[test]
    fn top_row_overflow_is_clipped_at_the_raster_edge() {
        let (mut src, g) = stage();
        // 40-tall group bottom-aligned in the top row: target_y = -10,
        // the top 10 rows fall outside and are dropped.
        let part = paint_part(&mut src, 2, 10, 11, 49);
        let mut cells = empty_cells();
        cells[0].push(part);

        let out = compose(&cells, &src, &g, Placement::Bottom);
        let px = opaque_pixels(&out);
        assert_eq!(px.len(), 300);
        assert_eq!(px[0].1, 0);
        assert_eq!(px[px.len() - 1].1, 29);
    }

    #[test]
    fn multiple_parts_keep_relative_arrangement() {
        let (mut src, g) = stage();
        // A "hat" above a "head", 2px apart; the gap must survive.
        let hat = paint_part(&mut src, 4, 0, 7, 1);
        let head = paint_part(&mut src, 2, 4, 9, 9);
        let mut cells = empty_cells();
        cells[0].push(hat);
        cells[0].push(head);

        let out = compose(&cells, &src, &g, Placement::Center);
        // Union bbox 8x10 -> target (11, 10).
        assert_eq!(out.alpha(13, 10), 255); // hat pixel (4,0)
        assert_eq!(out.alpha(13, 12), 0); // the gap row
        assert_eq!(out.alpha(11, 14), 255); // head pixel (2,4)
    }

    #[test]
    fn untouched_cells_stay_transparent() {
        let (mut src, g) = stage();
        let part = paint_part(&mut src, 0, 0, 9, 9);
        let mut cells = empty_cells();
        cells[4].push(part);

        let out = compose(&cells, &src, &g, Placement::Center);
        for (x, y) in opaque_pixels(&out) {
            assert_eq!(g.cell_index_of(x, y), 4);
        }
    }
}
