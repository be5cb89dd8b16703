//! Error types for imtui operations.

use std::fmt;

use thiserror::Error;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Writing into the state tree failed.
    #[error(transparent)]
    State(#[from] StateError),

    /// A host callable failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A box layout string was malformed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A key name could not be parsed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The terminal driver failed.
    #[error(transparent)]
    Term(#[from] TermError),
}

/// Result type alias using the crate Error type.
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// State errors
// =============================================================================

/// A write into the state tree could not be performed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// An ancestor of the written path holds a leaf, not a map.
    #[error("cannot write {path}: {ancestor} is not a map")]
    NotAMap { path: String, ancestor: String },

    /// The root of the tree (or of a subtree) can only be replaced by a map.
    #[error("must be map, got {found}")]
    RootNotMap { found: &'static str },
}

/// A stored value could not be interpreted as the requested type.
///
/// Read sites swallow this and fall back to a default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("no value")]
    Absent,

    #[error("expected {expected}, got {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot parse {input:?} as {expected}")]
    Parse {
        input: String,
        expected: &'static str,
    },

    #[error("{value} out of range for {expected}")]
    OutOfRange { value: i64, expected: &'static str },

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("expected list of {expected} elements, got {got}")]
    Length { expected: usize, got: usize },
}

// =============================================================================
// Host errors
// =============================================================================

/// What went wrong when calling a host callable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostErrorKind {
    #[error("wrong number of outputs: expected {expected}, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("output {index}: {source}")]
    Output {
        index: usize,
        #[source]
        source: ConvertError,
    },

    #[error("{0}")]
    Failed(String),
}

/// A host callable failed, with a best-effort traceback of the call sites
/// that were crossed on the way out (innermost first).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}{}", Traceback(.traceback))]
pub struct HostError {
    pub kind: HostErrorKind,
    pub traceback: Vec<String>,
}

impl HostError {
    pub fn new(kind: HostErrorKind) -> Self {
        Self {
            kind,
            traceback: Vec::new(),
        }
    }

    /// A failure reported by the host itself.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::Failed(message.into()))
    }

    /// Add a traceback entry.
    pub fn at(mut self, entry: impl Into<String>) -> Self {
        self.traceback.push(entry.into());
        self
    }
}

impl From<HostErrorKind> for HostError {
    fn from(kind: HostErrorKind) -> Self {
        Self::new(kind)
    }
}

struct Traceback<'a>(&'a [String]);

impl fmt::Display for Traceback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.0 {
            write!(f, "\n  at {entry}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Layout errors
// =============================================================================

/// A box layout string did not match the views supplied with it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("multi-line layout with {fields} fields on one line: {layout:?}")]
    MultipleFields { fields: usize, layout: String },

    #[error("invalid verb (must be number or end in * or =): {0:?}")]
    InvalidVerb(String),

    #[error("unclosed focus marker: {0:?}")]
    UnclosedFocus(String),

    #[error("not enough views: layout needs more than {supplied}")]
    MissingView { supplied: usize },

    #[error("superfluous view: consumed {consumed} out of {supplied}")]
    SuperfluousView { consumed: usize, supplied: usize },
}

// =============================================================================
// Key errors
// =============================================================================

/// A symbolic key name could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("bad modifier: {0:?}")]
    BadModifier(String),

    #[error("Ctrl modifier with literal control char: {0:?}")]
    CtrlWithControlChar(char),

    #[error("bad key: {0:?}")]
    BadKey(String),
}

// =============================================================================
// Terminal errors
// =============================================================================

/// Errors from the terminal driver.
#[derive(Error, Debug)]
pub enum TermError {
    /// The reader was closed; no more events will arrive.
    #[error("reader stopped")]
    Stopped,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal setup failed: {0}")]
    Setup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_traceback_display() {
        let err = HostError::failed("boom").at("inner").at("outer");
        assert_eq!(err.to_string(), "boom\n  at inner\n  at outer");
    }

    #[test]
    fn test_host_error_arity_display() {
        let err = HostError::from(HostErrorKind::Arity {
            expected: 1,
            got: 2,
        });
        assert_eq!(err.to_string(), "wrong number of outputs: expected 1, got 2");
    }

    #[test]
    fn test_state_error_display() {
        let err = StateError::NotAMap {
            path: "a/b/c".into(),
            ancestor: "a/b".into(),
        };
        assert_eq!(err.to_string(), "cannot write a/b/c: a/b is not a map");
    }
}
