//! Buffer - A rendered block of terminal lines.
//!
//! Lines are ragged: a line may hold fewer cells than the buffer is wide, and
//! the missing columns are blank. The dot is what the user perceives as the
//! cursor.

use std::fmt;

use crate::types::{cells_width, Cell, Pos};

/// One line of cells.
pub type Line = Vec<Cell>;

/// A continuous range of lines on the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer {
    pub width: usize,
    pub lines: Vec<Line>,
    pub dot: Pos,
}

impl Buffer {
    /// An empty buffer with no lines.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            dot: Pos::default(),
        }
    }

    /// A buffer made of the given lines, dot at the origin.
    pub fn from_lines(width: usize, lines: Vec<Line>) -> Self {
        Self {
            width,
            lines,
            dot: Pos::default(),
        }
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Width of the widest line.
    pub fn content_width(&self) -> usize {
        self.lines.iter().map(|line| cells_width(line)).max().unwrap_or(0)
    }

    /// Append the lines of `other` below. With `move_dot`, the dot is moved
    /// to where `other`'s dot lands.
    pub fn extend_down(&mut self, other: Buffer, move_dot: bool) {
        if move_dot {
            self.dot = Pos::new(other.dot.line + self.lines.len(), other.dot.col);
        }
        self.lines.extend(other.lines);
    }

    /// Append `other` to the right. Each existing line is padded to this
    /// buffer's width first; lines that only `other` has are indented by it.
    pub fn extend_right(&mut self, other: Buffer, move_dot: bool) {
        let offset = self.width;
        self.width += other.width;
        if move_dot {
            self.dot = Pos::new(other.dot.line, other.dot.col + offset);
        }
        for (i, right) in other.lines.into_iter().enumerate() {
            if let Some(line) = self.lines.get_mut(i) {
                let used = cells_width(line);
                if used < offset {
                    line.extend(spacing(offset - used));
                }
                line.extend(right);
            } else {
                let mut line = spacing(offset);
                line.extend(right);
                self.lines.push(line);
            }
        }
    }

    /// Keep only lines `[low, high)`, shifting the dot up accordingly.
    pub fn trim_to_lines(&mut self, low: usize, high: usize) {
        let high = high.min(self.lines.len());
        let low = low.min(high);
        self.lines.truncate(high);
        self.lines.drain(..low);
        self.dot.line = self.dot.line.saturating_sub(low);
    }

    /// The text of each line, styles dropped.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|cell| cell.text.as_str()).collect())
            .collect()
    }
}

/// `n` unstyled spaces.
pub fn spacing(n: usize) -> Line {
    vec![Cell::blank(); n]
}

/// A bordered dump for test failure messages: `$` marks where a line's
/// content ends short of the buffer width.
impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Width = {}, Dot = ({}, {})", self.width, self.dot.line, self.dot.col)?;
        writeln!(f, "┌{}┐", "─".repeat(self.width))?;
        for line in &self.lines {
            f.write_str("│")?;
            let mut used = 0;
            for cell in line {
                f.write_str(&cell.text)?;
                used += cell.width();
            }
            if used < self.width {
                write!(f, "${}", " ".repeat(self.width - used - 1))?;
            }
            writeln!(f, "│")?;
        }
        writeln!(f, "└{}┘", "─".repeat(self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Style;

    fn line(s: &str) -> Line {
        s.chars().map(|c| Cell::new(c.to_string(), Style::default())).collect()
    }

    #[test]
    fn test_extend_down_moves_dot() {
        let mut buf = Buffer::from_lines(3, vec![line("ab"), line("cd")]);
        let mut other = Buffer::from_lines(3, vec![line("ef")]);
        other.dot = Pos::new(0, 1);
        buf.extend_down(other, true);
        assert_eq!(buf.plain_lines(), vec!["ab", "cd", "ef"]);
        assert_eq!(buf.dot, Pos::new(2, 1));
    }

    #[test]
    fn test_extend_right_pads() {
        let mut buf = Buffer::from_lines(3, vec![line("a")]);
        let mut other = Buffer::from_lines(2, vec![line("xy"), line("z")]);
        other.dot = Pos::new(1, 1);
        buf.extend_right(other, true);
        assert_eq!(buf.width, 5);
        assert_eq!(buf.plain_lines(), vec!["a  xy", "   z"]);
        assert_eq!(buf.dot, Pos::new(1, 4));
    }

    #[test]
    fn test_extend_right_without_move_keeps_dot() {
        let mut buf = Buffer::from_lines(1, vec![line("a")]);
        buf.dot = Pos::new(0, 1);
        buf.extend_right(Buffer::from_lines(1, vec![line("b")]), false);
        assert_eq!(buf.dot, Pos::new(0, 1));
    }

    #[test]
    fn test_trim_to_lines() {
        let mut buf = Buffer::from_lines(1, vec![line("a"), line("b"), line("c"), line("d")]);
        buf.dot = Pos::new(2, 0);
        buf.trim_to_lines(1, 3);
        assert_eq!(buf.plain_lines(), vec!["b", "c"]);
        assert_eq!(buf.dot, Pos::new(1, 0));

        buf.trim_to_lines(5, 9);
        assert!(buf.lines.is_empty());
        assert_eq!(buf.dot.line, 0);
    }

    #[test]
    fn test_display_marks_short_lines() {
        let buf = Buffer::from_lines(3, vec![line("ab")]);
        assert_eq!(buf.to_string(), "Width = 3, Dot = (0, 0)\n┌───┐\n│ab$│\n└───┘\n");
    }
}
