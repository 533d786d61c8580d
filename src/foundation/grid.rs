/// Cells per grid axis.
pub const GRID_DIM: u32 = 3;

/// Total cells in the 3x3 partition.
pub const CELL_COUNT: usize = (GRID_DIM * GRID_DIM) as usize;

/// One cell's pixel rectangle. `x..right()` / `y..bottom()` are half-open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(self) -> u32 {
        self.y + self.height
    }

    pub fn contains(self, x: u32, y: u32) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }
}

/// Fixed 3x3 partition of a raster.
///
/// Boundaries are `floor(i * extent / 3)`, so cell extents are non-uniform
/// (341/341/342 on a 1024 axis) and the last row/column absorbs the
/// rounding remainder. Ownership counting and placement both depend on
/// reproducing these exact rectangles.
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn x_line(self, i: u32) -> u32 {
        ((u64::from(i) * u64::from(self.width)) / u64::from(GRID_DIM)) as u32
    }

    fn y_line(self, i: u32) -> u32 {
        ((u64::from(i) * u64::from(self.height)) / u64::from(GRID_DIM)) as u32
    }

    /// The 4 vertical grid-line positions, left edge through right edge.
    pub fn x_lines(self) -> [u32; 4] {
        [self.x_line(0), self.x_line(1), self.x_line(2), self.x_line(3)]
    }

    /// The 4 horizontal grid-line positions, top edge through bottom edge.
    pub fn y_lines(self) -> [u32; 4] {
        [self.y_line(0), self.y_line(1), self.y_line(2), self.y_line(3)]
    }

    pub fn cell(self, cx: u32, cy: u32) -> CellRect {
        debug_assert!(cx < GRID_DIM && cy < GRID_DIM);
        let x = self.x_line(cx);
        let y = self.y_line(cy);
        CellRect {
            x,
            y,
            width: self.x_line(cx + 1) - x,
            height: self.y_line(cy + 1) - y,
        }
    }

    /// Column owning pixel-x. Boundary lookup against the floor-rounded
    /// lines, so results match `CellRect::contains` for every x.
    pub fn col_of(self, x: u32) -> u32 {
        debug_assert!(x < self.width);
        for c in (1..GRID_DIM).rev() {
            if x >= self.x_line(c) {
                return c;
            }
        }
        0
    }

    /// Row owning pixel-y; see [`Grid::col_of`].
    pub fn row_of(self, y: u32) -> u32 {
        debug_assert!(y < self.height);
        for r in (1..GRID_DIM).rev() {
            if y >= self.y_line(r) {
                return r;
            }
        }
        0
    }

    /// Row-major cell index (`cy * 3 + cx`) of the cell owning a pixel.
    pub fn cell_index_of(self, x: u32, y: u32) -> usize {
        (self.row_of(y) * GRID_DIM + self.col_of(x)) as usize
    }
}
