/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads the world; composing a frame never touches
/// simulation state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Tile;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// gaps between rows match the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch = [0; 4];
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, bg: Color) -> Self {
        let mut cell = Self::from_char(c, Color::Reset, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
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
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width)
            .map(|x| self.get(x, y))
            .filter(|c| !c.cont)
            .map(|c| c.as_str().to_string())
            .collect()
    }
}

// ── Layout ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

const RESTART_HINT: &str = "Press Enter to play again";
const HELP: &str = " Arrows/WASD:Move  Space/X:Bomb  P:Pause  Esc/Q:Quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

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

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        compose(&mut self.front, world);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // ResetColor would fall back to the terminal default, not BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

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
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, w: &WorldState) {
    compose_hud(buf, w);

    for gy in 0..w.grid.height() {
        let row = MAP_ROW + gy;
        if row >= buf.height { break; }
        for gx in 0..w.grid.width() {
            let col = gx * CELL_W;
            if col + 1 >= buf.width { break; }
            compose_cell(buf, w, gx as i32, gy as i32, col, row);
        }
    }

    let msg_row = MAP_ROW + w.grid.height() + 1;
    if let Some(banner) = w.phase.banner() {
        let color = if w.phase == Phase::Won { Color::Rgb { r: 40, g: 160, b: 40 } } else { MSG_BG };
        let msg = format!(" {banner}  {RESTART_HINT} ");
        buf.fill_row(msg_row, color);
        buf.put_str(0, msg_row, &msg, Color::Black, color);
    } else if w.paused {
        let msg = " PAUSED  P/F1: Resume ";
        buf.fill_row(msg_row, MSG_BG);
        buf.put_str(0, msg_row, msg, Color::Black, MSG_BG);
    }

    buf.put_str(0, msg_row + 2, HELP, Color::DarkGrey, Color::Reset);
}

fn compose_hud(buf: &mut FrameBuffer, w: &WorldState) {
    let hearts: String = "♥".repeat(w.lives() as usize);
    let hud = format!(" Lives: {hearts:<5}  Score: {:<7}", w.score);
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
}

/// Write the visual for game cell (gx, gy) into the buffer at (col, row).
/// Stacking order: player, explosion, enemy, bomb, tile.
fn compose_cell(buf: &mut FrameBuffer, w: &WorldState, gx: i32, gy: i32, col: usize, row: usize) {
    let wide = |buf: &mut FrameBuffer, ch: char, bg: Color| {
        buf.set(col, row, Cell::from_char_wide(ch, bg));
        buf.set(col + 1, row, Cell::WIDE_CONT);
    };

    let blasted = w.explosion_at(gx, gy);
    let blast_bg = Color::Rgb { r: 200, g: 90, b: 20 };

    if w.player.cell() == (gx, gy) {
        wide(buf, '🙂', if blasted { blast_bg } else { Color::Reset });
        return;
    }
    if blasted {
        wide(buf, '💥', blast_bg);
        return;
    }
    if w.enemies.iter().any(|e| e.contact_cell() == (gx, gy)) {
        wide(buf, '👾', Color::Reset);
        return;
    }
    if let Some(bomb) = w.bombs.iter().find(|b| b.x == gx && b.y == gy) {
        // Background heats up as the fuse burns
        let heat = bomb.progress(w.tuning.fuse_secs());
        let r = 40 + (heat * 180.0) as u8;
        wide(buf, '💣', Color::Rgb { r, g: 30, b: 30 });
        return;
    }

    let (ch, fg, bg) = match w.grid.cell_at(gx, gy) {
        Some(Tile::Indestructible) => ('█', Color::Rgb { r: 120, g: 120, b: 120 }, Color::Rgb { r: 70, g: 70, b: 70 }),
        Some(Tile::Destructible) => ('▒', Color::Rgb { r: 180, g: 120, b: 60 }, Color::Rgb { r: 100, g: 65, b: 30 }),
        Some(Tile::Empty) | None => (' ', Color::Reset, Color::Reset),
    };
    buf.set(col, row, Cell::from_char(ch, fg, bg));
    buf.set(col + 1, row, Cell::from_char(ch, fg, bg));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Bomb, Explosion};

    fn composed(w: &WorldState) -> FrameBuffer {
        let mut buf = FrameBuffer::new(80, 24);
        compose(&mut buf, w);
        buf
    }

    #[test]
    fn hud_shows_hearts_and_score() {
        let mut w = WorldState::default();
        w.score = 140;
        w.player.lives = 2;
        let text = composed(&w).row_text(HUD_ROW);
        assert!(text.contains("♥♥ "));
        assert!(!text.contains("♥♥♥"));
        assert!(text.contains("Score: 140"));
    }

    #[test]
    fn banner_and_hint_once_decided() {
        let mut w = WorldState::default();
        let msg_row = MAP_ROW + w.grid.height() + 1;
        assert!(!composed(&w).row_text(msg_row).contains("GAME OVER"));

        w.phase = Phase::Lost;
        let text = composed(&w).row_text(msg_row);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains(RESTART_HINT));

        w.phase = Phase::Won;
        assert!(composed(&w).row_text(msg_row).contains("YOU WIN!"));
    }

    #[test]
    fn entities_drawn_over_tiles() {
        let mut w = WorldState::default();
        w.bombs.push(Bomb::new(2, 1, 0.0, 3.0));
        w.explosions.push(Explosion { x: 1, y: 2, created_at: 0.0 });
        let buf = composed(&w);
        assert_eq!(buf.get(CELL_W, MAP_ROW + 1).as_str(), "🙂");
        assert_eq!(buf.get(2 * CELL_W, MAP_ROW + 1).as_str(), "💣");
        assert_eq!(buf.get(CELL_W, MAP_ROW + 2).as_str(), "💥");
        assert_eq!(buf.get(13 * CELL_W, MAP_ROW + 1).as_str(), "👾");
        assert_eq!(buf.get(0, MAP_ROW).as_str(), "█");
        assert!(buf.get(CELL_W + 1, MAP_ROW + 1).cont);
    }

    #[test]
    fn player_drawn_at_rounded_cell() {
        let mut w = WorldState::default();
        w.player.x = 1.6;
        let buf = composed(&w);
        assert_eq!(buf.get(2 * CELL_W, MAP_ROW + 1).as_str(), "🙂");
        assert_ne!(buf.get(CELL_W, MAP_ROW + 1).as_str(), "🙂");
    }
}
