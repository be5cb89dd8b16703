//! Context - A component's handle into the state tree.
//!
//! A context is a shared runtime reference plus a path prefix. It is cheap to
//! clone and owns no state itself. Keys passed to its methods may contain `/`
//! to address descendants.

use std::fmt;
use std::sync::Arc;

use crate::comp::{react_nop, Comp, React, Reaction};
use crate::error::{ConvertError, StateError};
use crate::host::{Func, HostFrame};
use crate::input::Event;
use crate::runtime::Runtime;
use crate::state::convert::{native, StateValue};
use crate::state::{join_path, StateMap, StateSubTreeVar, StateVar, Value};
use crate::styled::Text;
use crate::view::AnyView;

/// An override for a component's event handling, stored at the `binding` key
/// of the component's state.
pub type Binding = Func<(Context, Event), Reaction>;

/// Provides access to the state tree at one level and all levels below it.
#[derive(Clone)]
pub struct Context {
    rt: Arc<Runtime>,
    path: Vec<String>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("path", &join_path(&self.path)).finish()
    }
}

impl Context {
    pub(crate) fn new(rt: Arc<Runtime>, path: Vec<String>) -> Self {
        Self { rt, path }
    }

    /// Path of this level from the root.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The host frame used to call host callables found in state.
    pub fn frame(&self) -> &HostFrame {
        &self.rt.frame
    }

    fn desc_path(&self, key: &str) -> Vec<String> {
        let mut path = self.path.clone();
        path.extend(key.split('/').map(str::to_string));
        path
    }

    /// A context rooted at a descendant.
    pub fn descend(&self, key: &str) -> Context {
        Context::new(self.rt.clone(), self.desc_path(key))
    }

    // =========================================================================
    // State
    // =========================================================================

    /// A state variable at `key`, initialized to `initial` if it does not
    /// exist yet.
    pub fn state<T: StateValue>(&self, key: &str, initial: T) -> StateVar<T> {
        let var = self.bind_state(key, initial.clone());
        if let Err(err) = var.init(initial) {
            tracing::warn!(path = %join_path(var.path()), %err, "cannot initialize state");
        }
        var
    }

    /// A state variable at `key`, without initializing it.
    ///
    /// Used when another call site is responsible for initialization, most
    /// typically to read the state of a subcomponent after calling it.
    pub fn bind_state<T: StateValue>(&self, key: &str, fallback: T) -> StateVar<T> {
        StateVar::new(self.rt.clone(), self.desc_path(key), fallback)
    }

    /// Raw value at `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.bind_state(key, Value::Nil).get_raw()
    }

    /// Write a raw value at `key`.
    pub fn set(&self, key: &str, value: Value) -> Result<(), StateError> {
        self.bind_state(key, Value::Nil).set_raw(value)
    }

    /// The whole subtree at this level.
    pub fn subtree(&self) -> StateSubTreeVar {
        StateSubTreeVar::new(self.rt.clone(), self.path.clone())
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Call a subcomponent.
    ///
    /// Creates two state variables: an empty map at `name`, which becomes the
    /// subcomponent's own level, and `name-comp` holding `f`. The component
    /// stored at `name-comp` is what gets called, so after the first call the
    /// `f` argument is ignored unless the stored one is replaced.
    pub fn subcomp(&self, name: &str, f: Comp) -> (AnyView, React) {
        self.state(name, StateMap::new());
        let stored = self.state(&format!("{name}-comp"), f).get();
        stored(self.descend(name))
    }

    /// Event handling with an optional override.
    ///
    /// If a [`Binding`] is stored at `binding`, it handles events first;
    /// events it leaves unused go to `default`. A failing binding is
    /// reported as a message and the event goes to `default`.
    pub fn binding(&self, default: React) -> React {
        let Some(binding) = self.bind_state::<Option<Binding>>("binding", None).get() else {
            return default;
        };
        let c = self.clone();
        Box::new(move |event| match binding.call((c.clone(), event)) {
            Ok(Reaction::Unused) => default(event),
            Ok(reaction) => reaction,
            Err(err) => {
                c.add_msg(Text::plain(err.to_string()));
                default(event)
            }
        })
    }

    /// [`binding`](Self::binding) with a default that uses no event.
    pub fn binding_nop_default(&self) -> React {
        self.binding(react_nop())
    }

    // =========================================================================
    // Runtime facilities
    // =========================================================================

    /// Queue a message for the message area and request a refresh.
    pub fn add_msg(&self, msg: Text) {
        self.rt.push_msg(msg);
        self.refresh();
    }

    /// Take all queued messages.
    pub fn pop_msgs(&self) -> Vec<Text> {
        self.rt.pop_msgs()
    }

    /// Request a re-render. Never blocks; redundant requests coalesce.
    pub fn refresh(&self) {
        self.rt.request_refresh();
    }

    /// Run `f` under the batch lock, then request a refresh.
    ///
    /// This is how a background task mutates several state variables without
    /// a render observing a partial update. Must not be called from inside a
    /// render or react pass.
    pub fn update_async(&self, f: impl FnOnce()) {
        {
            let _batch = self.rt.batch.lock();
            f();
        }
        self.refresh();
    }

    /// A receiver that disconnects when the event loop finishes.
    ///
    /// Background tasks should select on it and stop once `recv` returns an
    /// error.
    pub fn finish_chan(&self) -> flume::Receiver<()> {
        self.rt.finish_rx.clone()
    }

    /// Whether the event loop has finished.
    pub fn finished(&self) -> bool {
        self.rt.is_finished()
    }
}

/// Stored as an opaque value, so a host binding can hand the context back.
impl StateValue for Context {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        native(value, "context")
    }

    fn into_value(self) -> Value {
        Value::native(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comp::{comp, with_before, with_init};
    use crate::view::View;
    use crate::error::HostError;
    use crate::host::HostFn;
    use crate::input::Key;
    use crate::view::{text, EmptyView};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup() -> Context {
        Context::new(Arc::new(Runtime::new(HostFrame::new("test"))), Vec::new())
    }

    fn empty_comp() -> Comp {
        comp(|_| (Box::new(EmptyView), react_nop()))
    }

    #[test]
    fn test_state_initializes_once() {
        let c = setup();
        assert_eq!(c.state("x", 1i64).get(), 1);
        assert_eq!(c.state("x", 2i64).get(), 1);
        assert_eq!(c.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_bind_state_does_not_initialize() {
        let c = setup();
        let var = c.bind_state("x", 5i64);
        assert_eq!(var.get(), 5);
        assert_eq!(c.get("x"), None);
    }

    #[test]
    fn test_keys_with_slashes_descend() {
        let c = setup();
        c.set("a/b", Value::from("deep")).unwrap();
        assert_eq!(c.descend("a").get("b"), Some(Value::from("deep")));
        assert_eq!(c.get("missing/deep/path"), None);
    }

    #[test]
    fn test_subcomp_creates_map_before_call() {
        let c = setup();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = seen.clone();
        let child = comp(move |c| {
            // The child's own level already exists as an empty map.
            if let Some(Value::Map(map)) = c.subtree().get() {
                seen2.store(map.len() + 1, Ordering::SeqCst);
            }
            (Box::new(EmptyView), react_nop())
        });
        c.subcomp("child", child);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(c.get("child-comp").is_some());
        assert_eq!(c.descend("child").path(), ["child".to_string()]);
    }

    #[test]
    fn test_subcomp_reuses_stored_comp() {
        let c = setup();
        let first = comp(|c| {
            c.state("who", "first".to_string());
            (Box::new(EmptyView), react_nop())
        });
        let second = comp(|c| {
            c.state("who", "second".to_string());
            (Box::new(EmptyView), react_nop())
        });
        c.subcomp("child", first);
        c.set("child", Value::Map(StateMap::new())).unwrap();
        c.subcomp("child", second);
        assert_eq!(c.get("child/who"), Some(Value::from("first")));
    }

    #[test]
    fn test_with_init_overrides_initial() {
        let c = setup();
        let inner = comp(|c| {
            let x = c.state("x", 0i64).get();
            (Box::new(text(vec![Text::plain(x.to_string())])), react_nop())
        });
        let (view, _) = c.subcomp("w", with_init(inner, [("x", Value::Int(5))]));
        assert_eq!(view.render(5, 1).plain_lines(), vec!["5"]);
    }

    #[test]
    fn test_with_before_runs_every_call() {
        let c = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let wrapped = with_before(empty_comp(), move |_| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        wrapped(c.clone());
        wrapped(c.clone());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_binding_absent_uses_default() {
        let c = setup();
        let react = c.binding(Box::new(|_| Reaction::Consumed));
        assert_eq!(react(Event::from(Key::ENTER)), Reaction::Consumed);
        assert_eq!(c.binding_nop_default()(Event::Resize), Reaction::Unused);
    }

    #[test]
    fn test_native_binding_falls_through_when_unused() {
        let c = setup();
        let binding: Binding = Func::new(|(_, event): (Context, Event)| {
            Ok(if event == Event::from(Key::char('q')) {
                Reaction::Finish
            } else {
                Reaction::Unused
            })
        });
        c.set("binding", binding.into_value()).unwrap();
        let react = c.binding(Box::new(|_| Reaction::Consumed));
        assert_eq!(react(Event::from(Key::char('q'))), Reaction::Finish);
        assert_eq!(react(Event::from(Key::char('x'))), Reaction::Consumed);
    }

    #[test]
    fn test_host_binding_is_adapted() {
        let c = setup();
        let host = HostFn::new("on-key", |args: Vec<Value>| match args.as_slice() {
            [_, Value::Str(key)] if key.as_ref() == "Enter" => Ok(vec![Value::from("finish-eof")]),
            _ => Ok(vec![Value::from("unused")]),
        });
        c.set("binding", host.into_value()).unwrap();
        let react = c.binding_nop_default();
        assert_eq!(react(Event::from(Key::ENTER)), Reaction::FinishEOF);
        assert_eq!(react(Event::from(Key::TAB)), Reaction::Unused);
    }

    #[test]
    fn test_failing_binding_reports_and_falls_back() {
        let c = setup();
        let host = HostFn::new("broken", |_| Err(HostError::failed("boom")));
        c.set("binding", host.into_value()).unwrap();
        let react = c.binding(Box::new(|_| Reaction::Consumed));
        assert_eq!(react(Event::from(Key::ENTER)), Reaction::Consumed);
        let msgs = c.pop_msgs();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].to_plain().starts_with("boom"));
        assert!(msgs[0].to_plain().contains("broken (called from test)"));
    }

    #[test]
    fn test_add_msg_requests_refresh() {
        let c = setup();
        c.add_msg(Text::plain("hello"));
        assert!(c.rt.take_refresh());
        assert_eq!(c.pop_msgs(), vec![Text::plain("hello")]);
    }

    #[test]
    fn test_update_async_refreshes() {
        let c = setup();
        let x = c.state("x", 0i64);
        c.update_async(|| {
            x.set(1).unwrap();
            x.set(2).unwrap();
        });
        assert_eq!(x.get(), 2);
        assert!(c.rt.take_refresh());
    }

    #[test]
    fn test_finish_signal() {
        let c = setup();
        let rx = c.finish_chan();
        assert!(!c.finished());
        c.rt.finish();
        assert!(c.finished());
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_subtree_set() {
        let c = setup().descend("comp");
        let map = StateMap::new().assoc("k", Value::Int(1));
        c.subtree().set(Value::Map(map)).unwrap();
        assert_eq!(c.get("k"), Some(Value::Int(1)));
        assert!(c.subtree().set(Value::Int(1)).is_err());
    }
}
