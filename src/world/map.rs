use glam::IVec2;

pub const MAP_W: usize = 24;
pub const MAP_H: usize = 24;

/// Wall material; `0` is open floor.
pub type Material = u8;

/// Static tile grid, addressed `(x, y)` and stored one row per `y`.
///
/// The same accessor serves the ray-caster and the collision code, so the
/// two can never disagree about which axis is which.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    rows: [[Material; MAP_W]; MAP_H],
}

#[rustfmt::skip]
const REFERENCE: [[Material; MAP_W]; MAP_H] = [
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,2,2,2,2,2,0,0,0,0,3,0,3,0,3,0,0,0,1],
    [1,0,0,0,0,0,2,0,0,0,2,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,2,0,0,0,2,0,0,0,0,3,0,0,0,3,0,0,0,1],
    [1,0,0,0,0,0,2,0,0,0,2,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,2,2,0,2,2,0,0,0,0,3,0,3,0,3,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,4,4,4,4,4,4,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,0,4,0,0,0,0,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,0,0,0,0,5,0,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,0,4,0,0,0,0,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,0,4,4,4,4,4,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,4,4,4,4,4,4,4,4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
];

impl Default for Map {
    fn default() -> Self {
        Self::reference()
    }
}

impl Map {
    /// The built-in level: a walled 24×24 arena with a few rooms and pillars.
    pub const fn reference() -> Self {
        Self::from_rows(REFERENCE)
    }

    /// `rows[y][x]`.
    pub const fn from_rows(rows: [[Material; MAP_W]; MAP_H]) -> Self {
        Self { rows }
    }

    /// Solid border, empty interior.
    pub fn arena() -> Self {
        let mut rows = [[0; MAP_W]; MAP_H];
        for (y, row) in rows.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if x == 0 || y == 0 || x == MAP_W - 1 || y == MAP_H - 1 {
                    *cell = 1;
                }
            }
        }
        Self { rows }
    }

    /// Same map with one cell replaced. Out-of-range tiles are ignored.
    pub fn with_cell(mut self, tile: IVec2, material: Material) -> Self {
        if Self::contains(tile) {
            self.rows[tile.y as usize][tile.x as usize] = material;
        }
        self
    }

    #[inline]
    pub fn contains(tile: IVec2) -> bool {
        (0..MAP_W as i32).contains(&tile.x) && (0..MAP_H as i32).contains(&tile.y)
    }

    /// Material at `tile`, `None` outside the grid.
    #[inline]
    pub fn cell(&self, tile: IVec2) -> Option<Material> {
        Self::contains(tile).then(|| self.rows[tile.y as usize][tile.x as usize])
    }

    /// Walkable iff inside the grid and `0`. Everything past the edge is wall.
    #[inline]
    pub fn is_open(&self, tile: IVec2) -> bool {
        self.cell(tile) == Some(0)
    }

    /// True when every border cell is a wall, which is what bounds the DDA.
    pub fn is_sealed(&self) -> bool {
        let top_bottom = (0..MAP_W).all(|x| self.rows[0][x] != 0 && self.rows[MAP_H - 1][x] != 0);
        let sides = (0..MAP_H).all(|y| self.rows[y][0] != 0 && self.rows[y][MAP_W - 1] != 0);
        top_bottom && sides
    }
}
