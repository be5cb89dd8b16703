//! State variables - typed, path-bound accessors into the state tree.

use std::fmt;
use std::sync::Arc;

use crate::error::StateError;
use crate::runtime::Runtime;
use crate::state::convert::StateValue;
use crate::state::value::{join_path, StateMap, Value};

/// Provides access to one node of the state tree as a `T`.
///
/// - [`get`](Self::get) never fails: a missing node or one that cannot be
///   read as `T` yields the fallback.
/// - [`set`](Self::set) surfaces write errors to the caller.
/// - [`swap`](Self::swap) is the only atomic read-modify-write; a `get`
///   followed by a `set` can lose concurrent updates.
pub struct StateVar<T> {
    rt: Arc<Runtime>,
    path: Arc<[String]>,
    fallback: T,
}

impl<T: Clone> Clone for StateVar<T> {
    fn clone(&self) -> Self {
        Self {
            rt: self.rt.clone(),
            path: self.path.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateVar")
            .field("path", &join_path(&self.path))
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl<T: StateValue> StateVar<T> {
    pub(crate) fn new(rt: Arc<Runtime>, path: Vec<String>, fallback: T) -> Self {
        Self {
            rt,
            path: path.into(),
            fallback,
        }
    }

    /// Absolute path of the variable.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn fallback(&self) -> &T {
        &self.fallback
    }

    /// Read the current value, or the fallback.
    pub fn get(&self) -> T {
        let raw = self.get_raw();
        self.scan(raw)
    }

    /// Replace the value.
    pub fn set(&self, value: T) -> Result<(), StateError> {
        self.set_raw(value.into_value())
    }

    /// Atomically read, transform and write back the value.
    ///
    /// The state lock is held while `f` runs, so `f` must not access other
    /// state variables.
    pub fn swap(&self, f: impl FnOnce(T) -> T) -> Result<(), StateError> {
        let mut state = self.rt.state.write();
        let current = self.scan(state.get_path(&self.path));
        *state = state.assoc_path(&self.path, f(current).into_value())?;
        Ok(())
    }

    /// Read the raw stored value.
    pub fn get_raw(&self) -> Option<Value> {
        self.rt.state.read().get_path(&self.path)
    }

    /// Write a raw value.
    pub fn set_raw(&self, value: Value) -> Result<(), StateError> {
        let mut state = self.rt.state.write();
        *state = state.assoc_path(&self.path, value)?;
        Ok(())
    }

    /// Write `initial` unless the node already holds a value. Returns
    /// whether a write happened.
    pub(crate) fn init(&self, initial: T) -> Result<bool, StateError> {
        let mut state = self.rt.state.write();
        match state.get_path(&self.path) {
            Some(value) if !value.is_nil() => Ok(false),
            _ => {
                *state = state.assoc_path(&self.path, initial.into_value())?;
                Ok(true)
            }
        }
    }

    fn scan(&self, raw: Option<Value>) -> T {
        let Some(raw) = raw else {
            return self.fallback.clone();
        };
        match T::from_value(&raw, &self.rt.frame) {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(path = %join_path(&self.path), %err, "state conversion failed, using fallback");
                self.fallback.clone()
            }
        }
    }
}

/// Access to a whole subtree: the state of a component and its descendants.
#[derive(Clone)]
pub struct StateSubTreeVar {
    rt: Arc<Runtime>,
    path: Vec<String>,
}

impl StateSubTreeVar {
    pub(crate) fn new(rt: Arc<Runtime>, path: Vec<String>) -> Self {
        Self { rt, path }
    }

    /// The subtree, or `None` if it does not exist yet.
    pub fn get(&self) -> Option<Value> {
        self.rt.state.read().get_path(&self.path)
    }

    /// Replace the subtree. Only a map can take the place of a subtree.
    pub fn set(&self, value: Value) -> Result<(), StateError> {
        let Value::Map(map) = value else {
            return Err(StateError::RootNotMap { found: value.kind() });
        };
        let mut state = self.rt.state.write();
        *state = state.assoc_path(&self.path, Value::Map(map))?;
        Ok(())
    }

    /// The subtree as a map; empty if absent or not a map.
    pub fn get_map(&self) -> StateMap {
        match self.get() {
            Some(Value::Map(map)) => map,
            _ => StateMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostFrame;

    fn setup() -> Arc<Runtime> {
        Arc::new(Runtime::new(HostFrame::default()))
    }

    fn var<T: StateValue>(rt: &Arc<Runtime>, path: &[&str], fallback: T) -> StateVar<T> {
        StateVar::new(rt.clone(), path.iter().map(|s| s.to_string()).collect(), fallback)
    }

    #[test]
    fn test_get_absent_returns_fallback() {
        let rt = setup();
        let v = var(&rt, &["a", "b"], 7i64);
        assert_eq!(v.get(), 7);
        assert_eq!(v.get_raw(), None);
    }

    #[test]
    fn test_get_wrong_type_returns_fallback() {
        let rt = setup();
        var(&rt, &["a"], Value::Nil).set(Value::from("not a bool")).unwrap();
        assert!(!var(&rt, &["a"], false).get());
        assert!(var(&rt, &["a"], true).get());
    }

    #[test]
    fn test_set_then_get() {
        let rt = setup();
        let v = var(&rt, &["x"], 0i64);
        v.set(3).unwrap();
        assert_eq!(v.get(), 3);
    }

    #[test]
    fn test_set_through_leaf_is_error() {
        let rt = setup();
        var(&rt, &["leaf"], 0i64).set(1).unwrap();
        let err = var(&rt, &["leaf", "child"], 0i64).set(2).unwrap_err();
        assert!(matches!(err, StateError::NotAMap { .. }));
    }

    #[test]
    fn test_swap() {
        let rt = setup();
        let v = var(&rt, &["n"], 10i64);
        v.swap(|n| n + 1).unwrap();
        v.swap(|n| n * 2).unwrap();
        assert_eq!(v.get(), 22);
    }

    #[test]
    fn test_init_only_writes_when_absent() {
        let rt = setup();
        let v = var(&rt, &["x"], 0i64);
        assert!(v.init(5).unwrap());
        assert!(!v.init(9).unwrap());
        assert_eq!(v.get(), 5);
    }

    #[test]
    fn test_subtree_set_requires_map() {
        let rt = setup();
        let sub = StateSubTreeVar::new(rt.clone(), vec!["comp".into()]);
        assert_eq!(sub.get(), None);
        assert_eq!(
            sub.set(Value::Int(1)),
            Err(StateError::RootNotMap { found: "int" })
        );
        let map = StateMap::new().assoc("k", Value::Bool(true));
        sub.set(Value::Map(map)).unwrap();
        assert_eq!(var(&rt, &["comp", "k"], false).get(), true);
        assert_eq!(sub.get_map().len(), 1);
    }
}
