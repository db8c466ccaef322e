//! Axis-aligned world geometry and the per-round tile layout.

use crate::config::{
    CASTLE_BUILT_ROWS,
    CASTLE_COLUMNS,
    CASTLE_ROWS,
    CASTLE_SOLID_ROW,
    LAYOUT_LEFT,
    PARKING_SPOT,
    SATCHEL_DROP,
    TILE_SIZE,
    TILE_STRIDE,
    WALL_COLUMNS,
    WALL_ROW_LENGTHS,
    WALL_ROWS,
    WALL_TOP,
};

/// Rectangle with inclusive min/max corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl Rect {
    pub const fn new(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// A zero-sized rectangle at `(x, y)`.
    pub const fn point(x: i16, y: i16) -> Self {
        Self::new(x, y, x, y)
    }

    /// Where inactive projectiles are kept.
    pub const fn parked() -> Self {
        Self::point(PARKING_SPOT, PARKING_SPOT)
    }

    pub const fn width(&self) -> i16 {
        self.x_max - self.x_min
    }

    pub const fn height(&self) -> i16 {
        self.y_max - self.y_min
    }

    pub const fn center_x(&self) -> i16 {
        (self.x_min + self.x_max) / 2
    }

    pub fn translate(&mut self, dx: i16, dy: i16) {
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
    }

    pub const fn translated(mut self, dx: i16, dy: i16) -> Self {
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
        self
    }

    /// Closed-interval overlap of the horizontal extents.
    pub const fn spans_overlap(&self, other: &Rect) -> bool {
        self.x_min <= other.x_max && self.x_max >= other.x_min
    }

    /// Full overlap test on both axes.
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.spans_overlap(other) && self.y_min <= other.y_max && self.y_max >= other.y_min
    }

    /// Railgun hit test against a tile.
    ///
    /// The projectile counts as touching once its left edge has reached the
    /// tile's right edge and it straddles either the tile's top or bottom
    /// edge. There is deliberately no left bound: a fast shot that tunnels
    /// past a tile's left side between two steps still registers.
    pub const fn strikes(&self, tile: &Rect) -> bool {
        if self.x_min > tile.x_max {
            return false;
        }
        let straddles_top = self.y_max >= tile.y_min && self.y_min <= tile.y_min;
        let straddles_bottom = self.y_min <= tile.y_max && self.y_max >= tile.y_max;
        straddles_top || straddles_bottom
    }
}

/// Castle window rule: odd columns are open except in the solid row.
pub const fn is_castle_window(row: usize, column: usize) -> bool {
    column % 2 == 1 && row != CASTLE_SOLID_ROW
}

/// Static positions of every destructible tile plus the canyon wall.
///
/// Recomputed from closed-form offsets at the start of every round. Grid
/// cells that hold no tile (short wall rows, castle windows, the unbuilt
/// castle row) stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub walls: [[Option<Rect>; WALL_COLUMNS]; WALL_ROWS],
    pub castle: [[Option<Rect>; CASTLE_COLUMNS]; CASTLE_ROWS],
    pub canyon: Rect,
}

impl Layout {
    pub const fn new() -> Self {
        let mut walls = [[None; WALL_COLUMNS]; WALL_ROWS];
        let mut row = 0;
        while row < WALL_ROWS {
            let x_min = LAYOUT_LEFT + TILE_STRIDE * row as i16;
            let mut i = 0;
            while i < WALL_ROW_LENGTHS[row] {
                let y_min = WALL_TOP + TILE_STRIDE * i as i16;
                walls[row][i] = Some(Rect::new(x_min, y_min, x_min + TILE_SIZE, y_min + TILE_SIZE));
                i += 1;
            }
            row += 1;
        }

        let mut castle = [[None; CASTLE_COLUMNS]; CASTLE_ROWS];
        let mut row = 0;
        while row < CASTLE_BUILT_ROWS {
            let mut column = 0;
            while column < CASTLE_COLUMNS {
                if !is_castle_window(row, column) {
                    let x_min = LAYOUT_LEFT + TILE_STRIDE * column as i16;
                    let y_min = TILE_STRIDE * row as i16;
                    castle[row][column] =
                        Some(Rect::new(x_min, y_min, x_min + TILE_SIZE, y_min + TILE_SIZE));
                }
                column += 1;
            }
            row += 1;
        }

        Self {
            walls,
            castle,
            canyon: Rect::new(120, 0, 125, 150),
        }
    }

    pub const fn wall(&self, row: usize, index: usize) -> Option<Rect> {
        self.walls[row][index]
    }

    pub const fn castle_cell(&self, row: usize, column: usize) -> Option<Rect> {
        self.castle[row][column]
    }

    /// Where satchel charges are dropped from: below the castle's top right
    /// corner cell.
    pub const fn satchel_drop(&self) -> Rect {
        let x_min = LAYOUT_LEFT + TILE_STRIDE * (CASTLE_COLUMNS as i16 - 1);
        Rect::new(x_min, SATCHEL_DROP, x_min + TILE_SIZE, SATCHEL_DROP + TILE_SIZE)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_rows_follow_stride() {
        let layout = Layout::new();
        assert_eq!(layout.wall(0, 0), Some(Rect::new(5, 28, 10, 33)));
        assert_eq!(layout.wall(1, 11), Some(Rect::new(12, 105, 17, 110)));
        assert_eq!(layout.wall(2, 7), Some(Rect::new(19, 77, 24, 82)));
        assert_eq!(layout.wall(1, 12), None);
        assert_eq!(layout.wall(2, 8), None);
    }

    #[test]
    fn castle_windows_are_open_except_solid_row() {
        let layout = Layout::new();
        assert_eq!(layout.castle_cell(0, 1), None);
        assert_eq!(layout.castle_cell(2, 5), None);
        assert_eq!(layout.castle_cell(3, 1), Some(Rect::new(12, 21, 17, 26)));
        assert_eq!(layout.castle_cell(0, 6), Some(Rect::new(47, 0, 52, 5)));
        assert!(layout.castle[4].iter().all(Option::is_none));

        let tiles = layout.castle.iter().flatten().flatten().count();
        assert_eq!(tiles, 3 * 4 + 7);
    }

    #[test]
    fn satchel_drops_below_corner_cell() {
        let layout = Layout::new();
        let corner = layout.castle_cell(0, 6).unwrap();
        assert_eq!(layout.satchel_drop(), corner.translated(0, 26));
    }

    #[test]
    fn strike_needs_edge_straddle() {
        let tile = Rect::new(19, 77, 24, 82);
        // Straddles the top edge.
        assert!(Rect::new(20, 75, 22, 78).strikes(&tile));
        // Straddles the bottom edge.
        assert!(Rect::new(20, 81, 22, 84).strikes(&tile));
        // Still right of the tile.
        assert!(!Rect::new(25, 75, 27, 78).strikes(&tile));
        // Inside the band but touching neither edge.
        assert!(!Rect::new(20, 78, 22, 80).strikes(&tile));
        // Far left of the tile still counts.
        assert!(Rect::new(0, 80, 2, 83).strikes(&tile));
    }

    #[test]
    fn span_overlap_is_closed() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.spans_overlap(&Rect::new(10, 50, 12, 60)));
        assert!(!a.spans_overlap(&Rect::new(11, 0, 12, 1)));
        assert!(!a.overlaps(&Rect::new(5, 11, 6, 12)));
    }
}
