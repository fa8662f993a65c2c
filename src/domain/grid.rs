/// The tile map.
///
/// Storage plus the initialization policy, nothing else. Destruction is
/// decided by the blast engine, which writes back through `set()`.
///
/// Coordinates are signed so callers can probe one step past the edge
/// (blast rays, look-ahead cells) and get `None` back instead of
/// wrapping or indexing out of range.

use super::tile::Tile;

pub const GRID_WIDTH: usize = 15;
pub const GRID_HEIGHT: usize = 13;

/// Spawn cell of the player, also the first cell of the carved pocket.
pub const SPAWN: (usize, usize) = (1, 1);

/// Cells forced Empty at init so the player can leave spawn.
const SPAWN_POCKET: [(usize, usize); 3] = [(1, 1), (2, 1), (1, 2)];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// A grid of the given size with every cell set to `fill`.
    pub fn filled(width: usize, height: usize, fill: Tile) -> Self {
        Grid { width, height, cells: vec![fill; width * height] }
    }

    /// The classic layout: solid border, pillars on even/even cells,
    /// breakable walls everywhere else, spawn pocket carved out.
    pub fn classic(width: usize, height: usize) -> Self {
        let mut grid = Grid::filled(width, height, Tile::Destructible);
        for y in 0..height {
            for x in 0..width {
                if grid.is_permanent(x, y) {
                    grid.cells[y * width + x] = Tile::Indestructible;
                }
            }
        }
        for &(x, y) in &SPAWN_POCKET {
            grid.set(x as i32, y as i32, Tile::Empty);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at (x, y), or `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Is (x, y) inside the grid and Empty?
    #[inline]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y).map_or(false, Tile::is_walkable)
    }

    /// Overwrite a tile. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    /// Border cell or interior even/even pillar.
    fn is_permanent(&self, x: usize, y: usize) -> bool {
        let border = x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height;
        border || (x % 2 == 0 && y % 2 == 0)
    }

    /// Row-major iterator over `(x, y, tile)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().map(move |(i, &t)| (i % w, i / w, t))
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::classic(GRID_WIDTH, GRID_HEIGHT)
    }
}

/// Build a grid from ASCII rows: `#` pillar, `+` breakable, anything else empty.
#[cfg(test)]
pub fn grid_from(rows: &[&str]) -> Grid {
    let height = rows.len();
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut grid = Grid::filled(width, height, Tile::Empty);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            grid.cells[y * width + x] = match ch {
                '#' => Tile::Indestructible,
                '+' => Tile::Destructible,
                _ => Tile::Empty,
            };
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_border_is_solid() {
        let g = Grid::classic(GRID_WIDTH, GRID_HEIGHT);
        for x in 0..GRID_WIDTH as i32 {
            assert_eq!(g.cell_at(x, 0), Some(Tile::Indestructible));
            assert_eq!(g.cell_at(x, GRID_HEIGHT as i32 - 1), Some(Tile::Indestructible));
        }
        for y in 0..GRID_HEIGHT as i32 {
            assert_eq!(g.cell_at(0, y), Some(Tile::Indestructible));
            assert_eq!(g.cell_at(GRID_WIDTH as i32 - 1, y), Some(Tile::Indestructible));
        }
    }

    #[test]
    fn classic_pillars_and_walls() {
        let g = Grid::classic(GRID_WIDTH, GRID_HEIGHT);
        assert_eq!(g.cell_at(2, 2), Some(Tile::Indestructible));
        assert_eq!(g.cell_at(12, 10), Some(Tile::Indestructible));
        assert_eq!(g.cell_at(3, 1), Some(Tile::Destructible));
        assert_eq!(g.cell_at(2, 3), Some(Tile::Destructible));
        assert_eq!(g.cell_at(7, 5), Some(Tile::Destructible));
    }

    #[test]
    fn classic_spawn_pocket_is_carved() {
        let g = Grid::classic(GRID_WIDTH, GRID_HEIGHT);
        assert_eq!(g.cell_at(1, 1), Some(Tile::Empty));
        assert_eq!(g.cell_at(2, 1), Some(Tile::Empty));
        assert_eq!(g.cell_at(1, 2), Some(Tile::Empty));
        assert_eq!(g.count(Tile::Empty), 3);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let g = Grid::default();
        assert_eq!(g.cell_at(-1, 0), None);
        assert_eq!(g.cell_at(0, -1), None);
        assert_eq!(g.cell_at(GRID_WIDTH as i32, 0), None);
        assert_eq!(g.cell_at(0, GRID_HEIGHT as i32), None);
        assert!(!g.is_walkable(-1, 1));
    }

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut g = Grid::default();
        let before = g.clone();
        g.set(-1, 3, Tile::Empty);
        g.set(99, 99, Tile::Empty);
        assert_eq!(g, before);

        g.set(3, 1, Tile::Empty);
        assert_eq!(g.cell_at(3, 1), Some(Tile::Empty));
    }

    #[test]
    fn grid_from_ascii() {
        let g = grid_from(&[
            "###",
            "# +",
        ]);
        assert_eq!((g.width(), g.height()), (3, 2));
        assert_eq!(g.cell_at(1, 1), Some(Tile::Empty));
        assert_eq!(g.cell_at(2, 1), Some(Tile::Destructible));
    }
}
