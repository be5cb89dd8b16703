//! State Values - The persistent, structurally shared state tree.
//!
//! A [`StateMap`] is an immutable map from string keys to [`Value`]s. Maps nest,
//! so the whole application state is one tree. Writes never edit a map in
//! place: [`StateMap::assoc_path`] returns a new root that shares every
//! untouched subtree with the old one, so a holder of an older root never
//! observes later writes.
//!
//! # Example
//!
//! ```
//! use imtui::state::{StateMap, Value};
//!
//! let old = StateMap::new();
//! let new = old.assoc_path(&["editor", "buffer"], Value::from("hello")).unwrap();
//!
//! assert!(old.get_path(&["editor", "buffer"]).is_none());
//! assert_eq!(new.get_path(&["editor", "buffer"]), Some(Value::from("hello")));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use im::OrdMap;

use crate::error::StateError;
use crate::host::HostCallable;

// =============================================================================
// Value
// =============================================================================

/// A node in the state tree.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Arc<Vec<Value>>),
    Map(StateMap),
    /// A callable supplied by the host scripting layer.
    Host(Arc<dyn HostCallable>),
    /// An opaque native value (components, native functions, styled text).
    Native(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Host(_) => "fn",
            Value::Native(_) => "native",
        }
    }

    /// Wrap any native value.
    pub fn native<T: Any + Send + Sync>(value: T) -> Self {
        Value::Native(Arc::new(value))
    }

    pub fn as_map(&self) -> Option<&StateMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast a native value.
    pub fn downcast_native<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Native(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl PartialEq for Value {
    /// Scalars compare by value, containers structurally, callables and
    /// native values by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Host(a), Value::Host(b)) => Arc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Map(map) => map.fmt(f),
            Value::Host(callable) => write!(f, "<fn {}>", callable.name()),
            Value::Native(_) => f.write_str("<native>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<StateMap> for Value {
    fn from(map: StateMap) -> Self {
        Value::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }
}

// =============================================================================
// StateMap
// =============================================================================

/// An immutable map backed by a persistent B-tree.
///
/// Cloning is O(1). An update rebuilds only the tree nodes on the way to the
/// changed key, so a write costs O(log n) per level of the path and every
/// other entry stays shared with the old map.
#[derive(Clone, Default, PartialEq)]
pub struct StateMap {
    entries: Arc<OrdMap<Arc<str>, Value>>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_ref())
    }

    /// Whether two maps are the same shared instance.
    pub fn ptr_eq(&self, other: &StateMap) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Return a new map with `key` set to `value`.
    pub fn assoc(&self, key: &str, value: Value) -> StateMap {
        StateMap {
            entries: Arc::new(self.entries.update(Arc::from(key), value)),
        }
    }

    /// Return a new map without `key`.
    pub fn dissoc(&self, key: &str) -> StateMap {
        if !self.contains_key(key) {
            return self.clone();
        }
        StateMap {
            entries: Arc::new(self.entries.without(key)),
        }
    }

    /// Look up a nested path. A missing intermediate segment, or one that
    /// holds a leaf, yields `None`. The empty path yields the map itself.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        let Some((last, init)) = path.split_last() else {
            return Some(Value::Map(self.clone()));
        };
        let mut map = self;
        for segment in init {
            map = map.get(segment.as_ref())?.as_map()?;
        }
        map.get(last.as_ref()).cloned()
    }

    /// Return a new root with `value` stored at `path`, creating empty maps
    /// for missing intermediate segments.
    ///
    /// The empty path replaces the root, which only a map can do. Writing
    /// through an intermediate segment that holds a leaf is an error.
    pub fn assoc_path<S: AsRef<str>>(&self, path: &[S], value: Value) -> Result<StateMap, StateError> {
        if path.is_empty() {
            return match value {
                Value::Map(map) => Ok(map),
                other => Err(StateError::RootNotMap { found: other.kind() }),
            };
        }
        self.assoc_from(path, 0, value)
    }

    fn assoc_from<S: AsRef<str>>(&self, path: &[S], depth: usize, value: Value) -> Result<StateMap, StateError> {
        let key = path[depth].as_ref();
        if depth + 1 == path.len() {
            return Ok(self.assoc(key, value));
        }
        let child = match self.get(key) {
            None | Some(Value::Nil) => StateMap::new(),
            Some(Value::Map(map)) => map.clone(),
            Some(_) => {
                return Err(StateError::NotAMap {
                    path: join_path(path),
                    ancestor: join_path(&path[..=depth]),
                });
            }
        };
        let child = child.assoc_from(path, depth + 1, value)?;
        Ok(self.assoc(key, Value::Map(child)))
    }
}

impl fmt::Debug for StateMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for StateMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_ref()), v))
            .collect();
        StateMap {
            entries: Arc::new(entries),
        }
    }
}

/// Render a path with `/` separators.
pub fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(segment.as_ref());
    }
    out
}
