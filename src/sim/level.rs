/// Level generator.
///
/// Every random decision in the game goes through the one `Rng` owned here:
/// obstacle placement, goal placement, background color, obstacle glyph.
/// Seed it and the whole sequence of worlds is reproducible.
///
/// ## Generation rules
///   - Each cell is independently an obstacle with probability `p`.
///     No spatial correlation, no connectivity guarantee.
///   - The goal is rejection-sampled: draw uniform cells until a
///     passable one comes up. `p == 1.0` is a forbidden configuration.
///   - Background is three independent uniform channels in 0..=255.
///   - Glyph is a uniform pick from `OBSTACLE_GLYPHS`.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::grid::{Grid, Position};
use crate::domain::palette::{Rgb, OBSTACLE_GLYPHS};
use crate::domain::tile::Tile;

pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.2;

/// Everything that is replaced together on a level transition.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    pub goal: Position,
    pub background: Rgb,
    pub obstacle_glyph: &'static str,
}

pub struct LevelGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> LevelGenerator<R> {
    pub fn new(rng: R) -> Self {
        LevelGenerator { rng }
    }

    /// Roll a fresh obstacle map.
    pub fn generate(&mut self, rows: usize, cols: usize, obstacle_probability: f64) -> Grid {
        let mut grid = Grid::empty(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let obstacle = self.rng.gen::<f64>() < obstacle_probability;
                grid.set(Position::new(row, col), Tile::from_obstacle(obstacle));
            }
        }
        grid
    }

    /// Sample uniform cells until a passable one is found.
    ///
    /// Panics if the grid has no passable cell at all; sampling would
    /// otherwise never terminate.
    pub fn place_goal(&mut self, grid: &Grid) -> Position {
        assert!(
            grid.rows() * grid.cols() > grid.obstacle_count(),
            "goal placement needs at least one passable cell"
        );
        loop {
            let pos = Position::new(
                self.rng.gen_range(0..grid.rows()),
                self.rng.gen_range(0..grid.cols()),
            );
            if grid.is_passable(pos) {
                return pos;
            }
        }
    }

    pub fn random_color(&mut self) -> Rgb {
        Rgb::new(self.rng.gen(), self.rng.gen(), self.rng.gen())
    }

    pub fn random_obstacle_glyph(&mut self) -> &'static str {
        OBSTACLE_GLYPHS.choose(&mut self.rng).copied().unwrap_or("🌳")
    }

    /// Build a complete level: grid, then color, then glyph, then a goal on the new grid.
    pub fn next_level(&mut self, rows: usize, cols: usize, obstacle_probability: f64) -> Level {
        let grid = self.generate(rows, cols, obstacle_probability);
        let background = self.random_color();
        let obstacle_glyph = self.random_obstacle_glyph();
        let goal = self.place_goal(&grid);
        debug!(
            "generated {}x{} level: {} obstacles, goal at ({}, {})",
            rows, cols, grid.obstacle_count(), goal.row, goal.col,
        );
        Level { grid, goal, background, obstacle_glyph }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generator(seed: u64) -> LevelGenerator<ChaCha8Rng> {
        LevelGenerator::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn zero_probability_yields_open_grid() {
        let grid = generator(1).generate(21, 21, 0.0);
        assert_eq!(grid.obstacle_count(), 0);
        assert_eq!((grid.rows(), grid.cols()), (21, 21));
    }

    #[test]
    fn obstacle_density_tracks_probability() {
        let mut levels = generator(2);
        let grid = levels.generate(100, 100, 0.2);
        let density = grid.obstacle_count() as f64 / 10_000.0;
        assert!((0.17..0.23).contains(&density), "density {density}");
    }

    #[test]
    fn same_seed_same_level() {
        let a = generator(42).next_level(21, 21, 0.2);
        let b = generator(42).next_level(21, 21, 0.2);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.goal, b.goal);
        assert_eq!(a.background, b.background);
        assert_eq!(a.obstacle_glyph, b.obstacle_glyph);
    }

    #[test]
    fn goal_is_always_passable() {
        let mut levels = generator(7);
        for p in [0.0, 0.2, 0.5, 0.9, 0.99] {
            for _ in 0..20 {
                let grid = levels.generate(21, 21, p);
                if grid.obstacle_count() == 21 * 21 {
                    continue;
                }
                let goal = levels.place_goal(&grid);
                assert!(grid.in_bounds(goal));
                assert!(grid.is_passable(goal), "p={p} goal={goal:?}");
            }
        }
    }

    #[test]
    fn goal_finds_the_single_free_cell() {
        let mut cells = vec![vec![true; 5]; 5];
        cells[3][1] = false;
        let grid = Grid::from_obstacles(&cells);
        assert_eq!(generator(3).place_goal(&grid), Position::new(3, 1));
    }

    #[test]
    #[should_panic(expected = "passable cell")]
    fn goal_on_full_grid_panics() {
        let grid = Grid::from_obstacles(&vec![vec![true; 3]; 3]);
        generator(4).place_goal(&grid);
    }

    #[test]
    fn glyph_comes_from_palette() {
        let mut levels = generator(5);
        for _ in 0..50 {
            assert!(OBSTACLE_GLYPHS.contains(&levels.random_obstacle_glyph()));
        }
    }

    #[test]
    fn colors_vary_between_levels() {
        let mut levels = generator(6);
        let first = levels.random_color();
        assert!((0..10).any(|_| levels.random_color() != first));
    }
}
