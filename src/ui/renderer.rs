/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The renderer only ever sees a `Snapshot`; it never touches game state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::Position;
use crate::domain::palette::{Rgb, GOAL_GLYPH, PLAYER_GLYPH};
use crate::sim::world::Snapshot;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (supports emoji with variation selectors)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Background for terminal cells outside the world.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    /// Wide cell from a possibly multi-codepoint string. Truncated at a char
    /// boundary if it does not fit.
    fn from_str_wide(s: &str, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let mut len = 0;
        for ch in s.chars() {
            let n = ch.len_utf8();
            if len + n > cell.ch.len() { break; }
            ch.encode_utf8(&mut cell.ch[len..len + n]);
            len += n;
        }
        cell.ch_len = len as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell.wide = true;
        cell
    }

    fn wide_cont(bg: Color) -> Self {
        Cell { ch: [0; 16], ch_len: 0, fg: Color::White, bg, wide: false, cont: true }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

/// Each game cell = 2 terminal columns, so emoji glyphs fit.
const CELL_W: usize = 2;

/// Vertical layout
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const TITLE: &str = "Random World Explorer";
const HELP: &str = " ←→↑↓ / WASD: Move   Esc / Q: Quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All),
            terminal::SetTitle(TITLE)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, snap: &Snapshot<'_>) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose_game(snap);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    /// Force a full repaint on the next frame.
    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Right half of a wide glyph: drawn with its left half
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, snap: &Snapshot<'_>) {
        let bg = term_color(snap.background);
        let text = term_color(snap.background.opposite());

        // HUD: counter in the background's opposite color
        self.front.fill_row(HUD_ROW, bg);
        let hud = format!(" Worlds Traveled: {}", snap.worlds_traveled);
        self.front.put_str(0, HUD_ROW, &hud, text, bg);

        let grid = snap.grid;
        for row in 0..grid.rows() {
            let y = MAP_ROW + row;
            if y >= self.front.height { break; }
            for col in 0..grid.cols() {
                let x = col * CELL_W;
                if x + 1 >= self.front.width { break; }
                self.compose_cell(snap, Position::new(row, col), x, y, bg);
            }
        }

        let help_row = MAP_ROW + grid.rows() + 1;
        if help_row < self.front.height {
            self.front.put_str(0, help_row, HELP, Color::DarkGrey, Cell::BASE_BG);
        }
    }

    /// Goal is drawn last so it wins when the player stands on it.
    fn compose_cell(&mut self, snap: &Snapshot<'_>, pos: Position, x: usize, y: usize, bg: Color) {
        let glyph = if pos == snap.goal {
            Some(GOAL_GLYPH)
        } else if pos == snap.player {
            Some(PLAYER_GLYPH)
        } else if !snap.grid.is_passable(pos) {
            Some(snap.obstacle_glyph)
        } else {
            None
        };

        match glyph {
            Some(g) => {
                self.front.set(x, y, Cell::from_str_wide(g, Color::Reset, bg));
                self.front.set(x + 1, y, Cell::wide_cont(bg));
            }
            None => {
                self.front.set(x, y, Cell::from_char(' ', Color::White, bg));
                self.front.set(x + 1, y, Cell::from_char(' ', Color::White, bg));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Grid;

    fn snapshot(grid: &Grid) -> Snapshot<'_> {
        Snapshot {
            grid,
            player: Position::new(1, 1),
            goal: Position::new(0, 2),
            worlds_traveled: 3,
            background: Rgb::new(10, 200, 30),
            obstacle_glyph: "🌵",
        }
    }

    fn composed(grid: &Grid, w: usize, h: usize) -> Renderer {
        let mut r = Renderer::new();
        r.front.resize(w, h);
        r.compose_game(&snapshot(grid));
        r
    }

    fn row_text(r: &Renderer, y: usize) -> String {
        (0..r.front.width)
            .map(|x| r.front.get(x, y))
            .filter(|c| !c.cont)
            .map(|c| c.as_str().to_string())
            .collect()
    }

    #[test]
    fn hud_uses_opposite_color() {
        let grid = Grid::empty(3, 3);
        let r = composed(&grid, 40, 10);
        assert!(row_text(&r, HUD_ROW).starts_with(" Worlds Traveled: 3"));
        let first = r.front.get(1, HUD_ROW);
        assert_eq!(first.fg, Color::Rgb { r: 245, g: 55, b: 225 });
        assert_eq!(first.bg, Color::Rgb { r: 10, g: 200, b: 30 });
    }

    #[test]
    fn map_cells_show_player_goal_and_obstacles() {
        let grid = Grid::from_obstacles(&[
            vec![true, false, false],
            vec![false, false, false],
            vec![false, false, false],
        ]);
        let r = composed(&grid, 40, 10);

        assert_eq!(r.front.get(0, MAP_ROW).as_str(), "🌵");
        assert!(r.front.get(1, MAP_ROW).cont);
        assert_eq!(r.front.get(4, MAP_ROW).as_str(), GOAL_GLYPH);
        assert_eq!(r.front.get(2, MAP_ROW + 1).as_str(), PLAYER_GLYPH);
        assert_eq!(r.front.get(2, MAP_ROW).as_str(), " ");
        assert_eq!(r.front.get(2, MAP_ROW).bg, Color::Rgb { r: 10, g: 200, b: 30 });
    }

    #[test]
    fn goal_wins_over_player() {
        let grid = Grid::empty(3, 3);
        let mut snap = snapshot(&grid);
        snap.player = snap.goal;
        let mut r = Renderer::new();
        r.front.resize(40, 10);
        r.compose_game(&snap);
        assert_eq!(r.front.get(4, MAP_ROW).as_str(), GOAL_GLYPH);
    }

    #[test]
    fn tiny_terminal_clips_without_panicking() {
        let grid = Grid::empty(21, 21);
        let r = composed(&grid, 5, 3);
        assert_eq!(r.front.cells.len(), 15);
    }

    #[test]
    fn multi_codepoint_glyph_survives() {
        let cell = Cell::from_str_wide("🕷️", Color::Reset, Color::Reset);
        assert_eq!(cell.as_str(), "🕷️");
        assert!(cell.wide);
    }
}
