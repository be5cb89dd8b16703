//! View Module - Appearance of components
//!
//! A [`View`] is an immutable description of appearance whose only operation
//! is rendering into a [`Buffer`] of a given size.
//!
//! - **Buffer** - Ragged grid of cells with a dot
//! - **Text** - [`TextView`] with lazy, eager or no wrapping
//! - **Layout** - [`BoxView`], children laid out along one axis
//! - **Scrollbar** - [`ScrollBarView`]
//! - **Basic** - [`EmptyView`], [`HorizontalGapView`], [`VerticalGapView`]

mod buffer;
mod layout;
mod scrollbar;
mod text;

pub use buffer::{spacing, Buffer, Line};
pub use layout::{BoxChild, BoxView};
pub use scrollbar::{find_scroll_interval, ScrollBarView};
pub use text::{print_cell, text, text_eager_wrap, text_no_wrap, TextView, TextWrap};

use crate::types::Cell;

/// Renders onto a region of the terminal bounded by `width` x `height`.
pub trait View {
    fn render(&self, width: usize, height: usize) -> Buffer;
}

/// An owned view of any type.
pub type AnyView = Box<dyn View>;

impl<V: View + ?Sized> View for Box<V> {
    fn render(&self, width: usize, height: usize) -> Buffer {
        (**self).render(width, height)
    }
}

/// A view with no content that occupies no space.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyView;

impl View for EmptyView {
    fn render(&self, width: usize, _height: usize) -> Buffer {
        Buffer::new(width)
    }
}

/// A horizontal gap of up to `n` columns.
#[derive(Debug, Clone, Copy)]
pub struct HorizontalGapView(pub usize);

impl View for HorizontalGapView {
    fn render(&self, width: usize, _height: usize) -> Buffer {
        let width = width.min(self.0);
        Buffer::from_lines(width, vec![vec![Cell::blank(); width]])
    }
}

/// A vertical gap of up to `n` lines.
#[derive(Debug, Clone, Copy)]
pub struct VerticalGapView(pub usize);

impl View for VerticalGapView {
    fn render(&self, _width: usize, height: usize) -> Buffer {
        Buffer::from_lines(0, vec![Vec::new(); height.min(self.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_view() {
        let buf = EmptyView.render(5, 5);
        assert_eq!(buf.width, 5);
        assert!(buf.lines.is_empty());
    }

    #[test]
    fn test_gap_views_clamp_to_budget() {
        assert_eq!(HorizontalGapView(3).render(10, 1).plain_lines(), vec!["   "]);
        assert_eq!(HorizontalGapView(3).render(2, 1).width, 2);
        assert_eq!(VerticalGapView(4).render(10, 2).height(), 2);
        assert_eq!(VerticalGapView(1).render(10, 5).height(), 1);
    }
}
