use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::board::{Board, CHERRY, COLLISION, EATEN, PLAYER, UNEATEN};
use crate::direction::Facing;
use crate::session::Session;

const CELL_W: usize = 2;
const HELP: &str = "arrows/hjkl move, s save, space new game, q quit";

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Glyph {
    Player(Facing),
    Ghost,
    Collision,
    Pellet,
    Empty,
    Cherry,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(size: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces the next frame to redraw everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn render<W: Write>(out: &mut W, session: &Session, renderer: &mut Renderer) -> io::Result<()> {
    let board = session.board();
    let size = board.size();
    if renderer.last.len() != size * size {
        *renderer = Renderer::new(size);
    }

    out.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    let frame = frame_size(size).filter(|&(w, h)| term_w >= w && term_h >= h);
    let Some((needed_w, needed_h)) = frame else {
        out.queue(Clear(ClearType::All))?;
        let msg = match frame_size(size) {
            Some((needed_w, needed_h)) => format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            ),
            None => format!("Terminal too small for a {}x{} board.", size, size),
        };
        out.queue(Print(msg))?;
        out.flush()?;
        renderer.needs_full = true;
        return Ok(());
    };
    // Fits in the terminal, so every row and column index fits in u16.
    let rows = needed_h - 3;

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        out.queue(Clear(ClearType::All))?;
    }

    let hud = format!("Score: {}  ({})", board.score(), HELP);
    if renderer.needs_full || hud != renderer.last_hud {
        out.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        out.queue(SetForegroundColor(Color::White))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(Print(&hud))?;
        out.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for row in 0..size {
        for col in 0..size {
            let cell = cell_for(board, row, col);
            let idx = row * size + col;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(out, renderer, row, col, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    let below = renderer.origin_y + rows;
    out.queue(MoveTo(renderer.origin_x, below))?;
    out.queue(Clear(ClearType::CurrentLine))?;
    if let Some(status) = session.status() {
        out.queue(Print(status))?;
    }
    out.queue(MoveTo(renderer.origin_x, below + 1))?;
    out.queue(Clear(ClearType::CurrentLine))?;
    if board.is_game_over() {
        out.queue(SetForegroundColor(Color::Red))?;
        out.queue(Print(format!(
            "GAME OVER - Final Score: {} (space for a new game, q to quit)",
            board.score()
        )))?;
        out.queue(ResetColor)?;
    }

    out.flush()
}

/// Columns and rows needed for hud, grid, status and game-over lines, or
/// `None` when that does not fit a terminal coordinate.
pub fn frame_size(size: usize) -> Option<(u16, u16)> {
    let height = u16::try_from(size.checked_add(3)?).ok()?;
    let width = u16::try_from(size.checked_mul(CELL_W)?.max(HELP.len() + 21)).ok()?;
    Some((width, height))
}

/// Maps one rendered grid cell to what the terminal shows.
pub fn cell_for(board: &Board, row: usize, col: usize) -> Cell {
    let (glyph, color) = match board.grid()[row][col] {
        PLAYER => (Glyph::Player(board.player().facing), Color::Yellow),
        COLLISION => (Glyph::Collision, Color::Yellow),
        CHERRY => (Glyph::Cherry, Color::Green),
        EATEN => (Glyph::Empty, Color::Reset),
        UNEATEN => (Glyph::Pellet, Color::White),
        c => match Facing::from_ghost_glyph(c) {
            Some(facing) => (Glyph::Ghost, ghost_color(facing)),
            None => (Glyph::Pellet, Color::White),
        },
    };
    Cell { glyph, color }
}

// One colour per starting corner, picked by the marker a ghost carries.
fn ghost_color(facing: Facing) -> Color {
    match facing {
        Facing::Down => Color::Cyan,
        Facing::Left => Color::Magenta,
        Facing::Right => Color::Red,
        Facing::Up => Color::DarkYellow,
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Player(Facing::Right) => "ᗧ",
        Glyph::Player(Facing::Left) => "ᗤ",
        Glyph::Player(Facing::Up) => "ᗢ",
        Glyph::Player(Facing::Down) => "ᗣ",
        Glyph::Ghost => "👻",
        Glyph::Collision => "😵",
        Glyph::Pellet => "· ",
        Glyph::Empty => "  ",
        Glyph::Cherry => "🍒",
    }
}

fn draw_cell<W: Write>(
    out: &mut W,
    renderer: &Renderer,
    row: usize,
    col: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = glyph_text(cell.glyph);
    let (Ok(x), Ok(y)) = (u16::try_from(col * CELL_W), u16::try_from(row)) else {
        return Ok(());
    };
    let x_pos = renderer.origin_x + x;
    let y_pos = renderer.origin_y + y;
    out.queue(MoveTo(x_pos, y_pos))?;
    out.queue(SetForegroundColor(cell.color))?;
    out.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            out.queue(Print(' '))?;
        }
    }
    out.queue(ResetColor)?;
    Ok(())
}
