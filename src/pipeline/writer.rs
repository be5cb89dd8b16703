//! Writer - Line-based delta output of rendered buffers.
//!
//! The UI occupies the lines from where it was started down, not the whole
//! screen. Each update rewinds to the first line of the previous frame and
//! rewrites only the lines that differ, starting at the first differing cell.
//! All output of one update is accumulated and written in a single call.
//!
//! A full refresh is forced when the width changes or there is a message to
//! show, because neither can be expressed as a per-line delta.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveDown, MoveRight, MoveToColumn, MoveUp, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap};

use crate::styled::Text;
use crate::types::{cells_width, Attr, Cell, Pos, Rgba, Style};
use crate::view::Buffer;

/// Writes buffers to a terminal, remembering the last one written.
#[derive(Debug)]
pub struct Writer<W: Write> {
    out: W,
    cur: Buffer,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cur: Buffer::default(),
        }
    }

    /// The buffer currently on screen.
    pub fn buffer(&self) -> &Buffer {
        &self.cur
    }

    pub fn reset_buffer(&mut self) {
        self.cur = Buffer::default();
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Bring the screen from the current buffer to `buf`.
    pub fn update_buffer(&mut self, msg: Option<&Text>, buf: &Buffer, full: bool) -> io::Result<()> {
        let full = full || msg.is_some() || (buf.width != self.cur.width && !self.cur.lines.is_empty());

        let mut output: Vec<u8> = Vec::with_capacity(4096);
        let mut styler = Styler::default();

        queue!(output, Hide)?;
        move_up(&mut output, self.cur.dot.line)?;
        queue!(output, MoveToColumn(0))?;

        if full {
            // A space before erasing keeps tmux from treating the erase as a
            // full-screen clear and saving the screen to its scrollback.
            queue!(output, Print(' '), Clear(ClearType::FromCursorDown), MoveToColumn(0))?;
        }

        if let Some(msg) = msg {
            // Messages use the terminal's own wrapping so they copy-paste
            // as the user expects.
            queue!(output, EnableLineWrap)?;
            for segment in msg.segments() {
                styler.switch(&mut output, segment.style)?;
                queue!(output, Print(segment.text.replace('\n', "\r\n")))?;
            }
            styler.switch(&mut output, Style::default())?;
            queue!(output, Print("\r\n"), DisableLineWrap)?;
        }

        for (i, line) in buf.lines.iter().enumerate() {
            if i > 0 {
                queue!(output, Print("\r\n"))?;
            }
            let old = match self.cur.lines.get(i) {
                Some(old) if !full => old,
                _ => {
                    styler.write_cells(&mut output, line)?;
                    continue;
                }
            };
            let Some(j) = first_difference(line, old) else {
                continue;
            };
            move_right(&mut output, cells_width(&line[..j]))?;
            if j < old.len() {
                styler.switch(&mut output, Style::default())?;
                queue!(output, Clear(ClearType::UntilNewLine))?;
            }
            styler.write_cells(&mut output, &line[j..])?;
        }

        if !full && self.cur.lines.len() > buf.lines.len() {
            // The previous frame was taller. Clearing from the cursor would
            // also erase the last column of the current line, so step down
            // first.
            styler.switch(&mut output, Style::default())?;
            queue!(output, Print("\r\n"), Clear(ClearType::FromCursorDown), MoveUp(1))?;
        }

        styler.switch(&mut output, Style::default())?;
        let end = end_pos(buf);
        if end.line < buf.dot.line {
            move_down(&mut output, buf.dot.line - end.line)?;
        } else {
            move_up(&mut output, end.line - buf.dot.line)?;
        }
        queue!(output, MoveToColumn(to_u16(buf.dot.col)), Show)?;

        tracing::trace!(bytes = output.len(), full, "writing frame");
        self.out.write_all(&output)?;
        self.out.flush()?;
        self.cur = buf.clone();
        Ok(())
    }
}

/// Index of the first differing cell, or `None` if the lines are equal.
fn first_difference(new: &[Cell], old: &[Cell]) -> Option<usize> {
    match new.iter().zip(old).position(|(a, b)| a != b) {
        Some(j) => Some(j),
        None if new.len() == old.len() => None,
        None => Some(new.len().min(old.len())),
    }
}

fn end_pos(buf: &Buffer) -> Pos {
    match buf.lines.last() {
        Some(line) => Pos::new(buf.lines.len() - 1, cells_width(line)),
        None => Pos::default(),
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// Zero-count relative moves are skipped: many terminals read a count of
// zero as one.

fn move_up(output: &mut Vec<u8>, n: usize) -> io::Result<()> {
    if n > 0 {
        queue!(output, MoveUp(to_u16(n)))?;
    }
    Ok(())
}

fn move_down(output: &mut Vec<u8>, n: usize) -> io::Result<()> {
    if n > 0 {
        queue!(output, MoveDown(to_u16(n)))?;
    }
    Ok(())
}

fn move_right(output: &mut Vec<u8>, n: usize) -> io::Result<()> {
    if n > 0 {
        queue!(output, MoveRight(to_u16(n)))?;
    }
    Ok(())
}

// =============================================================================
// Styler
// =============================================================================

/// Tracks the style of the last written cell to skip redundant escapes.
#[derive(Default)]
struct Styler {
    last: Style,
}

impl Styler {
    fn write_cells(&mut self, output: &mut Vec<u8>, cells: &[Cell]) -> io::Result<()> {
        for cell in cells {
            self.switch(output, cell.style)?;
            queue!(output, Print(&cell.text))?;
        }
        Ok(())
    }

    fn switch(&mut self, output: &mut Vec<u8>, style: Style) -> io::Result<()> {
        if style == self.last {
            return Ok(());
        }
        queue!(output, SetAttribute(Attribute::Reset))?;
        if !style.fg.is_terminal_default() {
            queue!(output, SetForegroundColor(to_color(style.fg)))?;
        }
        if !style.bg.is_terminal_default() {
            queue!(output, SetBackgroundColor(to_color(style.bg)))?;
        }
        for (attr, attribute) in ATTRIBUTES {
            if style.attrs.contains(attr) {
                queue!(output, SetAttribute(attribute))?;
            }
        }
        self.last = style;
        Ok(())
    }
}

const ATTRIBUTES: [(Attr, Attribute); 8] = [
    (Attr::BOLD, Attribute::Bold),
    (Attr::DIM, Attribute::Dim),
    (Attr::ITALIC, Attribute::Italic),
    (Attr::UNDERLINE, Attribute::Underlined),
    (Attr::BLINK, Attribute::SlowBlink),
    (Attr::INVERSE, Attribute::Reverse),
    (Attr::HIDDEN, Attribute::Hidden),
    (Attr::STRIKETHROUGH, Attribute::CrossedOut),
];

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.ansi_index())
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}
