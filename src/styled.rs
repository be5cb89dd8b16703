//! Styled text - runs of text that each carry a [`Style`].
//!
//! [`Text`] is what components hand to [`TextView`](crate::view::TextView)
//! and what [`Context::add_msg`](crate::comp::Context::add_msg) queues for
//! the message area.

use std::fmt;

use crate::types::{Attr, Rgba, Style};

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A sequence of styled segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Text {
    segments: Vec<Segment>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::default())
    }

    /// Text with a single style.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            segments: vec![Segment::new(text, style)],
        }
    }

    /// Shorthand for text in a foreground colour.
    pub fn colored(text: impl Into<String>, fg: Rgba) -> Self {
        Self::styled(text, Style::default().fg(fg))
    }

    /// Shorthand for text with attributes.
    pub fn with_attrs(text: impl Into<String>, attrs: Attr) -> Self {
        Self::styled(text, Style::default().attrs(attrs))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|seg| seg.text.is_empty())
    }

    /// Whether every segment is unstyled.
    pub fn is_plain(&self) -> bool {
        self.segments.iter().all(|seg| seg.style.is_plain())
    }

    /// Append a segment, merging it into the last one when styles match.
    pub fn push(&mut self, segment: Segment) {
        if let Some(last) = self.segments.last_mut() {
            if last.style == segment.style {
                last.text.push_str(&segment.text);
                return;
            }
        }
        self.segments.push(segment);
    }

    /// Append all segments of another text.
    pub fn append(&mut self, other: Text) {
        for segment in other.segments {
            self.push(segment);
        }
    }

    /// Concatenate the text of all segments, dropping styles.
    pub fn to_plain(&self) -> String {
        self.segments.iter().map(|seg| seg.text.as_str()).collect()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

impl From<Segment> for Text {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl FromIterator<Segment> for Text {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut text = Text::new();
        for segment in iter {
            text.push(segment);
        }
        text
    }
}
