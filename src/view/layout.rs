//! Box layout - children stacked along one axis.
//!
//! A layout string describes the children:
//!
//! - `a*` - a flexible child, sharing the space left by the others
//! - `a=` - a non-flexible child, taking only the space its content needs
//! - `N` - a literal gap of `N` columns (or lines)
//! - `[a*]` - any child in brackets receives the dot
//!
//! A single line of tokens lays children out horizontally; one token per line
//! lays them out vertically. The names are only for the reader; views are
//! matched to `*` and `=` tokens in order.
//!
//! Non-flexible children are rendered first. Flexible children are then
//! rendered in order, each getting `remaining / remaining_flex_count`, so
//! the space an earlier flexible child actually takes affects the share of
//! later ones.
//!
//! # Example
//!
//! ```
//! use imtui::view::{text, AnyView, BoxView, View};
//! use imtui::Text;
//!
//! let left: AnyView = Box::new(text(vec![Text::plain("left")]));
//! let right: AnyView = Box::new(text(vec![Text::plain("right")]));
//! let view = BoxView::new("a* 1 [b=]", vec![left, right]);
//! let buf = view.render(12, 1);
//! assert_eq!(buf.width, 12);
//! assert_eq!(buf.plain_lines(), vec!["left   right"]);
//! ```

use std::fmt;

use crate::error::LayoutError;
use crate::view::{AnyView, Buffer, HorizontalGapView, VerticalGapView, View};

/// One child of a [`BoxView`].
pub struct BoxChild {
    pub view: AnyView,
    pub flex: bool,
}

/// Children laid out along one axis.
pub struct BoxView {
    pub children: Vec<BoxChild>,
    /// Index into `children` of the child that receives the dot.
    pub focus: usize,
    pub horizontal: bool,
}

impl fmt::Debug for BoxView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flex: Vec<bool> = self.children.iter().map(|child| child.flex).collect();
        f.debug_struct("BoxView")
            .field("flex", &flex)
            .field("focus", &self.focus)
            .field("horizontal", &self.horizontal)
            .finish()
    }
}

impl BoxView {
    /// Build from a layout string.
    ///
    /// # Panics
    ///
    /// Panics if the layout is malformed or does not match `views`. Layouts
    /// are written by the application author, so a mismatch is a programming
    /// error; use [`BoxView::try_new`] for layouts built at runtime.
    pub fn new(layout: &str, views: Vec<AnyView>) -> Self {
        Self::with_focus(layout, 0, views)
    }

    /// Like [`BoxView::new`], with an explicit default focus. A bracketed
    /// token in the layout overrides it.
    pub fn with_focus(layout: &str, focus: usize, views: Vec<AnyView>) -> Self {
        match Self::try_with_focus(layout, focus, views) {
            Ok(view) => view,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(layout: &str, views: Vec<AnyView>) -> Result<Self, LayoutError> {
        Self::try_with_focus(layout, 0, views)
    }

    pub fn try_with_focus(layout: &str, focus: usize, views: Vec<AnyView>) -> Result<Self, LayoutError> {
        let (verbs, horizontal) = split_verbs(layout)?;
        let supplied = views.len();
        let mut views = views.into_iter();
        let mut children = Vec::with_capacity(verbs.len());
        let mut focus = focus;

        for verb in verbs {
            let verb = match verb.strip_prefix('[') {
                Some(inner) => {
                    focus = children.len();
                    inner
                        .strip_suffix(']')
                        .ok_or_else(|| LayoutError::UnclosedFocus(verb.to_string()))?
                }
                None => verb,
            };
            let flex = if verb.ends_with('*') {
                true
            } else if verb.ends_with('=') {
                false
            } else if let Ok(n) = verb.parse::<usize>() {
                let view: AnyView = if horizontal {
                    Box::new(HorizontalGapView(n))
                } else {
                    Box::new(VerticalGapView(n))
                };
                children.push(BoxChild { view, flex: false });
                continue;
            } else {
                return Err(LayoutError::InvalidVerb(verb.to_string()));
            };
            let view = views.next().ok_or(LayoutError::MissingView { supplied })?;
            children.push(BoxChild { view, flex });
        }

        let left = views.len();
        if left > 0 {
            return Err(LayoutError::SuperfluousView {
                consumed: supplied - left,
                supplied,
            });
        }
        Ok(Self {
            children,
            focus,
            horizontal,
        })
    }
}

fn split_verbs(layout: &str) -> Result<(Vec<&str>, bool), LayoutError> {
    let lines: Vec<&str> = layout.trim().lines().collect();
    if lines.len() <= 1 {
        let verbs = lines.first().map(|line| line.split_whitespace().collect()).unwrap_or_default();
        return Ok((verbs, true));
    }
    let verbs = lines
        .iter()
        .map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [verb] => Ok(*verb),
                _ => Err(LayoutError::MultipleFields {
                    fields: fields.len(),
                    layout: layout.to_string(),
                }),
            }
        })
        .collect::<Result<_, _>>()?;
    Ok((verbs, false))
}

impl BoxView {
    fn render_child(&self, view: &dyn View, size: usize, flex: bool, width: usize, height: usize) -> Buffer {
        if !self.horizontal {
            return view.render(width, size);
        }
        let mut buf = view.render(size, height);
        if !flex {
            buf.width = buf.content_width();
        }
        buf
    }

    fn main_size(&self, buf: &Buffer) -> usize {
        if self.horizontal { buf.width } else { buf.height() }
    }
}

impl View for BoxView {
    fn render(&self, width: usize, height: usize) -> Buffer {
        let mut budget = if self.horizontal { width } else { height };
        let mut flex_left = self.children.iter().filter(|child| child.flex).count();
        let mut bufs: Vec<Option<Buffer>> = self.children.iter().map(|_| None).collect();

        for (slot, child) in bufs.iter_mut().zip(&self.children) {
            if !child.flex {
                let buf = self.render_child(child.view.as_ref(), budget, false, width, height);
                budget = budget.saturating_sub(self.main_size(&buf));
                *slot = Some(buf);
            }
        }
        for (slot, child) in bufs.iter_mut().zip(&self.children) {
            if child.flex {
                let buf = self.render_child(child.view.as_ref(), budget / flex_left, true, width, height);
                budget = budget.saturating_sub(self.main_size(&buf));
                flex_left -= 1;
                *slot = Some(buf);
            }
        }

        let mut buf = Buffer::new(0);
        for (i, child_buf) in bufs.into_iter().flatten().enumerate() {
            if self.horizontal {
                buf.extend_right(child_buf, i == self.focus);
            } else {
                buf.extend_down(child_buf, i == self.focus);
            }
        }
        buf.width = width;
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styled::Text;
    use crate::types::Pos;
    use crate::view::{text, EmptyView};
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> AnyView {
        Box::new(text(vec![Text::plain(s)]))
    }

    fn dotted(s: &str) -> AnyView {
        Box::new(text(vec![Text::plain(s)]).dot_before(1))
    }

    #[test]
    fn test_parse_horizontal() {
        let view = BoxView::new("a* 2 [b=] c*", vec![t("a"), t("b"), t("c")]);
        assert!(view.horizontal);
        assert_eq!(view.children.len(), 4);
        assert_eq!(view.focus, 2);
        let flex: Vec<bool> = view.children.iter().map(|c| c.flex).collect();
        assert_eq!(flex, vec![true, false, false, true]);
    }

    #[test]
    fn test_parse_vertical() {
        let view = BoxView::new(
            "a=
             1
             b*",
            vec![t("a"), t("b")],
        );
        assert!(!view.horizontal);
        assert_eq!(view.children.len(), 3);
        assert_eq!(view.focus, 0);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            BoxView::try_new("a* b", vec![t("a")]).unwrap_err(),
            LayoutError::InvalidVerb("b".into())
        );
        assert_eq!(
            BoxView::try_new("a* b*", vec![t("a")]).unwrap_err(),
            LayoutError::MissingView { supplied: 1 }
        );
        assert_eq!(
            BoxView::try_new("a*", vec![t("a"), t("b")]).unwrap_err(),
            LayoutError::SuperfluousView { consumed: 1, supplied: 2 }
        );
        assert_eq!(
            BoxView::try_new("[a*", vec![t("a")]).unwrap_err(),
            LayoutError::UnclosedFocus("[a*".into())
        );
        assert!(matches!(
            BoxView::try_new("a* b*\nc*", vec![t("a"), t("b"), t("c")]),
            Err(LayoutError::MultipleFields { fields: 2, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "superfluous view")]
    fn test_new_panics_on_malformed_layout() {
        BoxView::new("a=", vec![t("a"), t("b")]);
    }

    #[test]
    fn test_flex_children_share_remaining_width() {
        for w in [10, 11, 21] {
            let view = BoxView::new("a* 5 c*", vec![t("a"), t("c")]);
            let buf = view.render(w, 1);
            assert_eq!(buf.width, w);
            // The first flexible child gets half of what the gap leaves,
            // the second whatever remains after that.
            let line = &buf.lines[0];
            let first = (w - 5) / 2;
            assert_eq!(line[first + 5].text, "c", "width {w}");
        }
    }

    #[test]
    fn test_non_flex_uses_content_width() {
        let view = BoxView::new("a= b*", vec![t("ab"), t("cd")]);
        let buf = view.render(10, 1);
        assert_eq!(buf.plain_lines(), vec!["abcd"]);
        assert_eq!(buf.width, 10);
    }

    #[test]
    fn test_vertical_layout() {
        let view = BoxView::new(
            "a=
             b*",
            vec![t("top"), t("x\ny\nz")],
        );
        let buf = view.render(5, 3);
        assert_eq!(buf.plain_lines(), vec!["top", "x", "y"]);
        assert_eq!(buf.width, 5);
    }

    #[test]
    fn test_focus_moves_dot() {
        let view = BoxView::new("a= [b=]", vec![t("abc"), dotted("de")]);
        let buf = view.render(10, 1);
        assert_eq!(buf.dot, Pos::new(0, 5));

        let view = BoxView::new(
            "a=
             [b=]",
            vec![t("abc"), dotted("de")],
        );
        let buf = view.render(10, 5);
        assert_eq!(buf.dot, Pos::new(1, 2));
    }

    #[test]
    fn test_empty_children() {
        let empty = || -> AnyView { Box::new(EmptyView) };
        let view = BoxView::new("a* b*", vec![empty(), empty()]);
        let buf = view.render(4, 2);
        assert!(buf.lines.is_empty());
        assert_eq!(buf.width, 4);
    }
}
