//! Text view - styled spans flowed into lines.
//!
//! Wrap modes:
//!
//! - [`TextWrap::Lazy`] wraps once a character would exceed the width
//! - [`TextWrap::Eager`] wraps as soon as a line is exactly full, so a
//!   fixed-width area never leaves a dangling empty column
//! - [`TextWrap::None`] truncates each line at the width
//!
//! Control characters are printed in caret notation with inverse video.
//!
//! # Example
//!
//! ```
//! use imtui::view::{text, View};
//! use imtui::Text;
//!
//! let buf = text(vec![Text::plain("abcdef")]).render(3, 10);
//! assert_eq!(buf.plain_lines(), vec!["abc", "def"]);
//! ```

use crate::styled::Text;
use crate::types::{Attr, Cell, Pos, Style};
use crate::view::{Buffer, Line, View};

/// How a [`TextView`] handles lines longer than its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextWrap {
    #[default]
    Lazy,
    Eager,
    None,
}

/// A sequence of styled spans with a dot marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextView {
    pub spans: Vec<Text>,
    /// The dot sits right before `spans[dot_before]`. Zero leaves the dot at
    /// the origin.
    pub dot_before: usize,
    pub wrap: TextWrap,
}

/// Lazily wrapped text.
pub fn text(spans: Vec<Text>) -> TextView {
    TextView::new(TextWrap::Lazy, spans)
}

/// Truncated text.
pub fn text_no_wrap(spans: Vec<Text>) -> TextView {
    TextView::new(TextWrap::None, spans)
}

/// Eagerly wrapped text.
pub fn text_eager_wrap(spans: Vec<Text>) -> TextView {
    TextView::new(TextWrap::Eager, spans)
}

impl TextView {
    pub fn new(wrap: TextWrap, spans: Vec<Text>) -> Self {
        Self {
            spans,
            dot_before: 0,
            wrap,
        }
    }

    /// Put the dot between the spans before and after it.
    pub fn with_dot(wrap: TextWrap, before: Vec<Text>, after: Vec<Text>) -> Self {
        let dot_before = before.len();
        let mut spans = before;
        spans.extend(after);
        Self {
            spans,
            dot_before,
            wrap,
        }
    }

    pub fn dot_before(mut self, index: usize) -> Self {
        self.dot_before = index;
        self
    }
}

impl View for TextView {
    fn render(&self, width: usize, height: usize) -> Buffer {
        let mut buf = Buffer::new(width);
        let mut line = Line::new();
        let mut col = 0;
        let mut dangling = false;

        for (i, span) in self.spans.iter().enumerate() {
            for seg in span.segments() {
                for c in seg.text.chars() {
                    if c == '\n' {
                        buf.lines.push(std::mem::take(&mut line));
                        col = 0;
                        dangling = false;
                        continue;
                    }
                    let cell = print_cell(c, seg.style);
                    let cell_width = cell.width();
                    if col + cell_width > width {
                        if self.wrap == TextWrap::None {
                            col += cell_width;
                            continue;
                        }
                        buf.lines.push(std::mem::take(&mut line));
                        col = cell_width;
                        line.push(cell);
                    } else {
                        col += cell_width;
                        line.push(cell);
                    }
                    dangling = col == width && self.wrap == TextWrap::Eager;
                    if dangling {
                        buf.lines.push(std::mem::take(&mut line));
                        col = 0;
                    }
                }
            }
            if self.dot_before == i + 1 {
                buf.dot = Pos::new(buf.lines.len(), col);
            }
        }

        // An eager wrap at the very end leaves an empty line behind; keep it
        // only if it holds the dot.
        if !dangling || buf.dot.line == buf.lines.len() {
            buf.lines.push(line);
        }
        buf.lines.truncate(height);
        buf
    }
}

/// Make a cell for one character. Control characters are replaced with their
/// caret notation in inverse video.
pub fn print_cell(c: char, style: Style) -> Cell {
    let code = c as u32;
    if code < 0x20 || code == 0x7f {
        let caret = char::from((code ^ 0x40) as u8);
        return Cell::new(format!("^{caret}"), style.attrs(Attr::INVERSE));
    }
    Cell::new(c.to_string(), style)
}
