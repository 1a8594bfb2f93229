/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Board rows are stored with y increasing upward (exit in the top-right
/// corner); the renderer flips them so the board reads the right way up.
/// Actors are drawn at their interpolated position, not their logical
/// cell, so mid-move frames slide between cells.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::Vec2;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap pixels on VTE terminals match the cell color and no
    /// horizontal lines show through.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 16, b: 12 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
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
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each board cell spans 2 terminal columns so the grid is roughly square.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

/// Left margin for the board frame.
const MAP_COL: usize = 2;

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
        // Force full repaint on first frame: back ≠ front for every cell.
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
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();

        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::DayIntro => self.compose_day_intro(world),
            Phase::Playing => self.compose_game(world),
            Phase::GameOver => self.compose_game_over(world),
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
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

        // Set explicit base colors at start of frame. Not ResetColor: that
        // resets to the terminal's native default, which may differ from
        // BASE_BG and cause line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
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

                let mut buf = [0u8; 4];
                queue!(self.writer, Print(&*cell.ch.encode_utf8(&mut buf)))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Coordinate mapping ──

    /// Board position (y-up, possibly fractional mid-move) → terminal
    /// (col, row) of the cell's left column.
    fn to_screen(&self, world: &WorldState, pos: Vec2) -> (usize, usize) {
        let rows = world.board.rows;
        let col = MAP_COL + CELL_W + (pos.x * CELL_W as f32).round().max(0.0) as usize;
        let flipped = (rows - 1) as f32 - pos.y;
        let row = MAP_ROW + 1 + flipped.round().max(0.0) as usize;
        (col, row)
    }

    fn put_pair(&mut self, col: usize, row: usize, c0: char, c1: char, fg: Color, bg: Color) {
        self.front.set(col, row, Cell::new(c0, fg, bg));
        self.front.set(col + 1, row, Cell::new(c1, fg, bg));
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState) {
        self.compose_hud(w);
        self.compose_board(w);
        self.compose_actors(w);

        // ── Message bar ──
        let msg_row = MAP_ROW + w.board.rows as usize + 3;
        if msg_row < self.front.height && !w.message.is_empty() {
            let msg = format!(" {} ", w.message);
            self.front.put_str(MAP_COL, msg_row, &msg, Color::Black, Color::Rgb { r: 200, g: 180, b: 50 });
        }

        // ── Help bar ──
        let help_row = msg_row + 2;
        if help_row < self.front.height {
            let help = " Arrows/WASD: move   Q: quit ";
            self.front.put_str(MAP_COL, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let hud_bg = Color::Rgb { r: 30, g: 45, b: 25 };
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, hud_bg));
        }
        let hud = format!(" Day {:<3}  Food: {:<4}", w.day, w.player.food);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);
    }

    /// Static board layer: outer wall frame, floor, exit, pickups, walls.
    fn compose_board(&mut self, w: &WorldState) {
        let cols = w.board.columns as usize;
        let rows = w.board.rows as usize;

        let frame_fg = Color::Rgb { r: 110, g: 95, b: 70 };
        let frame_bg = Color::Rgb { r: 55, g: 45, b: 30 };
        let floor_fg = Color::Rgb { r: 70, g: 60, b: 45 };

        // Outer wall ring, one cell thick around the playable area.
        for fy in 0..rows + 2 {
            let row = MAP_ROW + fy;
            for fx in 0..cols + 2 {
                let col = MAP_COL + fx * CELL_W;
                let border = fy == 0 || fy == rows + 1 || fx == 0 || fx == cols + 1;
                if border {
                    self.put_pair(col, row, '▒', '▒', frame_fg, frame_bg);
                } else {
                    self.put_pair(col, row, '·', ' ', floor_fg, Color::Reset);
                }
            }
        }

        // Exit
        let (col, row) = self.to_screen(w, w.exit.to_vec2());
        self.put_pair(col, row, '>', '>', Color::Rgb { r: 120, g: 220, b: 120 }, Color::Reset);

        // Pickups
        for pickup in &w.pickups {
            if !pickup.active {
                continue;
            }
            let (col, row) = self.to_screen(w, pickup.cell.to_vec2());
            match pickup.kind {
                crate::domain::entity::PickupKind::Food => {
                    self.put_pair(col, row, '%', ' ', Color::Rgb { r: 230, g: 150, b: 60 }, Color::Reset);
                }
                crate::domain::entity::PickupKind::Soda => {
                    self.put_pair(col, row, '!', ' ', Color::Rgb { r: 90, g: 190, b: 255 }, Color::Reset);
                }
            }
        }

        // Inner walls, shaded by remaining integrity.
        for wall in &w.walls {
            let (col, row) = self.to_screen(w, wall.cell.to_vec2());
            let ch = if wall.integrity > 1 { '▓' } else { '░' };
            self.put_pair(col, row, ch, ch, Color::Rgb { r: 160, g: 140, b: 100 }, Color::Rgb { r: 60, g: 50, b: 35 });
        }
    }

    /// Actors, at their interpolated positions. Player last so it wins
    /// overlapping cells mid-move.
    fn compose_actors(&mut self, w: &WorldState) {
        for enemy in &w.enemies {
            let (col, row) = self.to_screen(w, enemy.pos);
            let (ch, fg) = if enemy.damage > w.rules.enemy_damage {
                ('Z', Color::Rgb { r: 255, g: 80, b: 80 })
            } else {
                ('z', Color::Rgb { r: 230, g: 130, b: 60 })
            };
            self.put_pair(col, row, ch, ' ', fg, Color::Reset);
        }

        if w.player.alive {
            let (col, row) = self.to_screen(w, w.player.pos);
            self.put_pair(col, row, '@', ' ', Color::Rgb { r: 255, g: 220, b: 80 }, Color::Reset);
        }
    }

    // ── Static screens (title, day intro, game over) ──

    fn compose_title(&mut self, w: &WorldState) {
        let title = [
            r"  ___                                           ",
            r" / __| __  __ _ __ __ ___  _ _   __ _  ___  _ _ ",
            r" \__ \/ _|/ _` |\ V // -_)| ' \ / _` |/ -_)| '_|",
            r" |___/\__|\__,_| \_/ \___||_||_|\__, |\___||_|  ",
            r"                                |___/           ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 2 + i, line, Color::Rgb { r: 255, g: 200, b: 50 }, Color::Reset);
        }

        let tagline = "━━━ a foraging expedition, one tile at a time ━━━";
        self.front.put_str(2, 8, tagline, Color::Rgb { r: 180, g: 140, b: 50 }, Color::Reset);

        let menu_base = 11;
        let hi = Color::Rgb { r: 80, g: 255, b: 80 };
        self.front.put_str(6, menu_base, "ENTER   Start", hi, Color::Reset);
        self.front.put_str(6, menu_base + 1, "  Q     Quit", Color::White, Color::Reset);

        let help = [
            "How to play",
            "  Every step costs food; find more before it runs out.",
            "  Chop through walls, dodge the scavengers, reach the exit.",
            "  Each day the exit moves further out of reach.",
        ];
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 { Color::Rgb { r: 255, g: 200, b: 50 } } else { Color::White };
            self.front.put_str(6, menu_base + 3 + i, line, color, Color::Reset);
        }

        if !w.message.is_empty() {
            let msg_row = self.front.height.saturating_sub(2);
            self.front.put_str(2, msg_row, &w.message, Color::DarkGrey, Color::Reset);
        }
    }

    /// The between-levels banner: a black screen with just "Day N", like
    /// a chapter card.
    fn compose_day_intro(&mut self, w: &WorldState) {
        let label = format!("Day {}", w.day);
        let cx = self.front.width.saturating_sub(label.len()) / 2;
        let cy = self.front.height / 2;
        self.front.put_str(cx, cy, &label, Color::White, Color::Reset);
    }

    fn compose_game_over(&mut self, w: &WorldState) {
        let over = format!("After {} days, you starved.", w.day);
        let cx = self.front.width.saturating_sub(over.len()) / 2;
        let cy = self.front.height / 2;
        self.front.put_str(cx, cy.saturating_sub(1), &over, Color::Rgb { r: 255, g: 80, b: 80 }, Color::Reset);

        let prompt = "ENTER: try again   Q: quit";
        let px = self.front.width.saturating_sub(prompt.len()) / 2;
        self.front.put_str(px, cy + 2, prompt, Color::DarkGrey, Color::Reset);
    }
}
