//! Text frames
//!
//! Turns the occupancy grid into a block of text, one line per row. Only
//! reads the world; redraw pacing belongs to the caller. Cursor control goes
//! through `termion`.

use std::io::{self, Write};

use termion::cursor;

use crate::consts::{BOUNDARY_GLYPH, EMPTY_GLYPH};
use crate::sim::{Cell, World};

/// Render the grid as `rows` lines of `cols` glyphs (no trailing newline)
pub fn render_frame(world: &World) -> String {
    let grid = world.grid();
    let mut frame = String::with_capacity(((grid.cols() + 1) * grid.rows()) as usize);
    for (x, row) in grid.rows_iter().enumerate() {
        if x > 0 {
            frame.push('\n');
        }
        for cell in row {
            frame.push(match cell {
                Cell::Empty => EMPTY_GLYPH,
                Cell::Boundary => BOUNDARY_GLYPH,
                Cell::Entity(id) => world.entity(*id).map_or('?', |e| e.symbol),
            });
        }
    }
    frame
}

/// Cursor movement from the end of a frame back to its top-left corner, so
/// the next frame lands on top of it. `lines` is the frame height minus one.
pub fn repaint_prefix(lines: u32) -> String {
    if lines == 0 {
        return "\r".to_string();
    }
    let lines = u16::try_from(lines).unwrap_or(u16::MAX);
    format!("\r{}", cursor::Up(lines))
}

/// Keeps the terminal cursor hidden until dropped
pub struct HiddenCursor(());

impl HiddenCursor {
    pub fn new(out: &mut impl Write) -> io::Result<Self> {
        write!(out, "{}", cursor::Hide)?;
        out.flush()?;
        Ok(Self(()))
    }
}

impl Drop for HiddenCursor {
    fn drop(&mut self) {
        // Runs on early returns and panics too; nothing useful to do on failure
        let mut out = io::stdout();
        let _ = writeln!(out, "{}", cursor::Show);
        let _ = out.flush();
    }
}
