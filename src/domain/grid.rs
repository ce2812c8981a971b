/// Grid geometry: positions, directions, and the obstacle map.
///
/// Coordinates are `(row, col)`, 0-indexed from the top-left corner.
/// A `Grid` is built once per level and never mutated afterwards;
/// a level transition replaces it wholesale.

use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// Movement direction. One cell per move, no diagonals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[cfg(test)]
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Row/column delta for this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (-1, 0),
            Direction::Down  => (1, 0),
            Direction::Left  => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// An all-passable grid.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Grid { rows, cols, tiles: vec![vec![Tile::Empty; cols]; rows] }
    }

    /// Build a grid from an obstacle matrix (`true` = obstacle).
    /// Rows shorter than the first are padded with empty tiles.
    #[cfg(test)]
    pub fn from_obstacles(cells: &[Vec<bool>]) -> Self {
        let rows = cells.len();
        let cols = cells.first().map_or(0, |r| r.len());
        let mut grid = Grid::empty(rows, cols);
        for (r, row) in cells.iter().enumerate() {
            for (c, &obstacle) in row.iter().take(cols).enumerate() {
                grid.tiles[r][c] = Tile::from_obstacle(obstacle);
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Center cell, using integer division.
    pub fn center(&self) -> Position {
        Position::new(self.rows / 2, self.cols / 2)
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Tile at `pos`. Out of bounds reads as an obstacle.
    #[inline]
    pub fn tile_at(&self, pos: Position) -> Tile {
        if self.in_bounds(pos) {
            self.tiles[pos.row][pos.col]
        } else {
            Tile::Obstacle
        }
    }

    #[inline]
    pub fn is_passable(&self, pos: Position) -> bool {
        self.tile_at(pos).is_passable()
    }

    /// Set a tile while the grid is being built. Ignored out of bounds.
    pub(crate) fn set(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            self.tiles[pos.row][pos.col] = tile;
        }
    }

    /// The neighbouring cell in `dir`, or `None` if it would leave the grid.
    pub fn step(&self, from: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = from.row as i64 + dr as i64;
        let col = from.col as i64 + dc as i64;
        if row < 0 || col < 0 {
            return None;
        }
        let next = Position::new(row as usize, col as usize);
        self.in_bounds(next).then_some(next)
    }

    pub fn obstacle_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.is_obstacle()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let cells: Vec<Vec<bool>> = rows.iter()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect();
        Grid::from_obstacles(&cells)
    }

    #[test]
    fn center_uses_integer_division() {
        assert_eq!(Grid::empty(21, 21).center(), Position::new(10, 10));
        assert_eq!(Grid::empty(4, 5).center(), Position::new(2, 2));
    }

    #[test]
    fn out_of_bounds_reads_as_obstacle() {
        let g = Grid::empty(3, 3);
        assert!(!g.is_passable(Position::new(3, 0)));
        assert!(!g.is_passable(Position::new(0, 3)));
        assert!(g.is_passable(Position::new(2, 2)));
    }

    #[test]
    fn from_obstacles_marks_cells() {
        let g = grid_from(&[".#.", "...", "#.."]);
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.tile_at(Position::new(0, 1)), Tile::Obstacle);
        assert_eq!(g.tile_at(Position::new(2, 0)), Tile::Obstacle);
        assert_eq!(g.obstacle_count(), 2);
    }

    #[test]
    fn step_stops_at_edges() {
        let g = Grid::empty(3, 3);
        let corner = Position::new(0, 0);
        assert_eq!(g.step(corner, Direction::Up), None);
        assert_eq!(g.step(corner, Direction::Left), None);
        assert_eq!(g.step(corner, Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(g.step(corner, Direction::Right), Some(Position::new(0, 1)));

        let far = Position::new(2, 2);
        assert_eq!(g.step(far, Direction::Down), None);
        assert_eq!(g.step(far, Direction::Right), None);
    }

    #[test]
    fn step_ignores_obstacles() {
        // Bounds only; passability is the caller's concern.
        let g = grid_from(&[".#"]);
        assert_eq!(g.step(Position::new(0, 0), Direction::Right), Some(Position::new(0, 1)));
    }
}
