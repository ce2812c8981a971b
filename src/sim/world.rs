/// GameState: the complete state of a running game.
///
/// ## Lifecycle
///
///   NotStarted --start()--> Playing --move_player()--> Playing
///
/// There is no terminal phase. `finished` is carried and cleared on start and
/// on every level transition, but nothing in play sets it.
///
/// ## Level transition
///
/// Reaching the goal bumps `worlds_traveled` and swaps in a new grid,
/// background, glyph, and goal as one unit. The player stays exactly where
/// they are; that cell is not re-checked against the new grid, so the player
/// may end up standing on an obstacle of the next world.

use log::{info, trace};
use rand::Rng;

use crate::config::GridConfig;
use crate::domain::grid::{Direction, Grid, Position};
use crate::domain::palette::Rgb;
use crate::sim::level::{Level, LevelGenerator};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    NotStarted,
    Playing,
}

/// Read-only view handed to the renderer after each tick or move.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub player: Position,
    pub goal: Position,
    pub worlds_traveled: u32,
    pub background: Rgb,
    pub obstacle_glyph: &'static str,
}

pub struct GameState<R: Rng> {
    // ── Current level ──
    pub grid: Grid,
    pub goal: Position,
    pub background: Rgb,
    pub obstacle_glyph: &'static str,

    // ── Player ──
    pub player: Position,

    // ── Progress ──
    pub worlds_traveled: u32,
    pub finished: bool,
    pub phase: Phase,

    settings: GridConfig,
    generator: LevelGenerator<R>,
}

impl<R: Rng> GameState<R> {
    pub fn new(settings: GridConfig, rng: R) -> Self {
        GameState {
            grid: Grid::empty(settings.rows, settings.cols),
            goal: Position::default(),
            background: Rgb::default(),
            obstacle_glyph: "",
            player: Position::default(),
            worlds_traveled: 0,
            finished: false,
            phase: Phase::NotStarted,
            settings,
            generator: LevelGenerator::new(rng),
        }
    }

    /// Begin a fresh game: player to the center, first world rolled, counter reset.
    pub fn start(&mut self) {
        let level = self.roll_level();
        self.install(level);
        self.player = self.grid.center();
        self.worlds_traveled = 0;
        self.finished = false;
        self.phase = Phase::Playing;
        info!("game started, player at ({}, {})", self.player.row, self.player.col);
    }

    /// Try to move one cell. Out-of-bounds or blocked moves are silently dropped.
    pub fn move_player(&mut self, dir: Direction) {
        if self.phase != Phase::Playing || self.finished {
            return;
        }

        let target = match self.grid.step(self.player, dir) {
            Some(pos) if self.grid.is_passable(pos) => pos,
            _ => {
                trace!("move {:?} from {:?} rejected", dir, self.player);
                return;
            }
        };

        self.player = target;

        if self.player == self.goal {
            self.worlds_traveled += 1;
            self.next_world();
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            player: self.player,
            goal: self.goal,
            worlds_traveled: self.worlds_traveled,
            background: self.background,
            obstacle_glyph: self.obstacle_glyph,
        }
    }

    // ── Internal ──

    fn next_world(&mut self) {
        let level = self.roll_level();
        self.install(level);
        self.finished = false;
        info!(
            "world #{} reached; new goal at ({}, {})",
            self.worlds_traveled, self.goal.row, self.goal.col,
        );
    }

    fn roll_level(&mut self) -> Level {
        let GridConfig { rows, cols, obstacle_probability } = self.settings;
        self.generator.next_level(rows, cols, obstacle_probability)
    }

    fn install(&mut self, level: Level) {
        self.grid = level.grid;
        self.goal = level.goal;
        self.background = level.background;
        self.obstacle_glyph = level.obstacle_glyph;
    }
}
