//! Scrollbar view.
//!
//! The thumb covers the cells that correspond to the visible window
//! `[low, high)` of `total` items. Its length is derived from the window size
//! alone, so it stays constant while the window scrolls.

use crate::types::{Attr, Cell, Rgba, Style};
use crate::view::{Buffer, View};

/// A one-cell-thick scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBarView {
    pub horizontal: bool,
    pub total: usize,
    pub low: usize,
    pub high: usize,
}

impl ScrollBarView {
    pub fn vertical(total: usize, low: usize, high: usize) -> Self {
        Self {
            horizontal: false,
            total,
            low,
            high,
        }
    }

    pub fn horizontal(total: usize, low: usize, high: usize) -> Self {
        Self {
            horizontal: true,
            total,
            low,
            high,
        }
    }
}

fn thumb() -> Cell {
    Cell::new(" ", Style::default().fg(Rgba::MAGENTA).attrs(Attr::INVERSE))
}

fn trough(horizontal: bool) -> Cell {
    let text = if horizontal { "━" } else { "│" };
    Cell::new(text, Style::default().fg(Rgba::MAGENTA))
}

impl View for ScrollBarView {
    fn render(&self, width: usize, height: usize) -> Buffer {
        let budget = if self.horizontal { width } else { height };
        let (thumb_low, thumb_high) = find_scroll_interval(self.total, self.low, self.high, budget);
        let (thumb, trough) = (thumb(), trough(self.horizontal));
        let cells = (0..budget).map(|i| {
            if (thumb_low..thumb_high).contains(&i) {
                thumb.clone()
            } else {
                trough.clone()
            }
        });

        if self.horizontal {
            Buffer::from_lines(width, vec![cells.collect()])
        } else {
            Buffer::from_lines(1, cells.map(|cell| vec![cell]).collect())
        }
    }
}

/// Map the window `[low, high)` of `total` items onto `budget` cells.
///
/// The end of the thumb is `start + scale(high - low)` rather than
/// `scale(high)`. A thumb that would be empty is grown by one cell, backwards
/// if it sits at the very end. An empty collection gets a full thumb.
pub fn find_scroll_interval(total: usize, low: usize, high: usize, budget: usize) -> (usize, usize) {
    if budget == 0 {
        return (0, 0);
    }
    if total == 0 {
        return (0, budget);
    }
    let scale = |i: usize| (i as f64 / total as f64 * budget as f64 + 0.5) as usize;
    let mut start = scale(low).min(budget);
    let mut end = (start + scale(high.saturating_sub(low))).min(budget);
    if start == end {
        if end == budget {
            start -= 1;
        } else {
            end += 1;
        }
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_basic() {
        assert_eq!(find_scroll_interval(100, 0, 10, 20), (0, 2));
        assert_eq!(find_scroll_interval(100, 50, 60, 20), (10, 12));
        assert_eq!(find_scroll_interval(10, 0, 10, 5), (0, 5));
    }

    #[test]
    fn test_thumb_length_is_stable_while_scrolling() {
        let (a0, a1) = find_scroll_interval(100, 0, 10, 20);
        let (b0, b1) = find_scroll_interval(100, 5, 15, 20);
        assert_ne!(a0, b0);
        assert_eq!(a1 - a0, b1 - b0);
        for low in 0..=90 {
            let (s, e) = find_scroll_interval(100, low, low + 10, 20);
            assert_eq!(e - s, 2, "window starting at {low}");
        }
    }

    #[test]
    fn test_one_item_scroll_can_round_to_same_thumb() {
        // 1/100 of 20 cells rounds down to 0, so the thumb does not move yet.
        assert_eq!(find_scroll_interval(100, 0, 10, 20), (0, 2));
        assert_eq!(find_scroll_interval(100, 1, 11, 20), (0, 2));
        assert_eq!(find_scroll_interval(100, 3, 13, 20), (1, 3));
    }

    #[test]
    fn test_collapsed_thumb_is_nudged() {
        assert_eq!(find_scroll_interval(1000, 0, 1, 10), (0, 1));
        assert_eq!(find_scroll_interval(1000, 999, 1000, 10), (9, 10));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(find_scroll_interval(0, 0, 0, 8), (0, 8));
        assert_eq!(find_scroll_interval(100, 0, 10, 0), (0, 0));
    }

    #[test]
    fn test_render_vertical() {
        let buf = ScrollBarView::vertical(4, 2, 4).render(3, 4);
        assert_eq!(buf.width, 1);
        assert_eq!(buf.plain_lines(), vec!["│", "│", " ", " "]);
        assert!(buf.lines[2][0].style.attrs.contains(Attr::INVERSE));
    }

    #[test]
    fn test_render_horizontal() {
        let buf = ScrollBarView::horizontal(2, 0, 1).render(4, 3);
        assert_eq!(buf.width, 4);
        assert_eq!(buf.plain_lines(), vec!["  ━━"]);
    }
}
