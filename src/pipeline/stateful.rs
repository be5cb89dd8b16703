//! StatefulComp - A component bound to its own state tree.
//!
//! Holds the view and react function from the latest call of the component.
//! Every call and every react runs under the batch lock, so a background
//! [`update_async`](crate::comp::Context::update_async) is never observed
//! half done.

use std::sync::Arc;

use crate::comp::{Comp, Context, React, Reaction};
use crate::host::HostFrame;
use crate::input::Event;
use crate::runtime::Runtime;
use crate::state::StateMap;
use crate::styled::Text;
use crate::view::{AnyView, Buffer};

pub struct StatefulComp {
    rt: Arc<Runtime>,
    f: Comp,
    view: AnyView,
    react: React,
}

impl StatefulComp {
    /// Create a fresh state tree and call `f` on it once.
    pub fn new(f: Comp, frame: HostFrame) -> Self {
        let rt = Arc::new(Runtime::new(frame));
        let (view, react) = f(Context::new(rt.clone(), Vec::new()));
        Self { rt, f, view, react }
    }

    /// A context at the root of the state tree.
    pub fn context(&self) -> Context {
        Context::new(self.rt.clone(), Vec::new())
    }

    /// Render the latest view.
    pub fn render(&self, width: usize, height: usize) -> Buffer {
        self.view.render(width, height)
    }

    /// Handle an event, then refresh.
    pub fn react(&mut self, event: Event) -> Reaction {
        let reaction = {
            let _batch = self.rt.batch.lock();
            (self.react)(event)
        };
        tracing::debug!(?event, %reaction, "reacted");
        self.refresh();
        reaction
    }

    /// Call the component again. Refresh requests already pending are
    /// dropped, since this call satisfies them.
    pub fn refresh(&mut self) {
        let rt = self.rt.clone();
        let _batch = rt.batch.lock();
        rt.take_refresh();
        let (view, react) = (self.f)(Context::new(rt.clone(), Vec::new()));
        self.view = view;
        self.react = react;
    }

    /// Refresh if one has been requested.
    pub fn refresh_if_requested(&mut self) {
        if self.rt.take_refresh() {
            self.refresh();
        }
    }

    /// Block until a refresh is requested, then refresh.
    pub fn wait_refresh(&mut self) {
        // The runtime owns a sender, so this only returns on a request.
        let _ = self.rt.refresh_rx.recv();
        self.refresh();
    }

    /// The receiving end of refresh requests.
    pub(crate) fn refresh_rx(&self) -> &flume::Receiver<()> {
        &self.rt.refresh_rx
    }

    /// Take all queued messages, joined by newlines.
    pub fn merge_and_pop_msgs(&self) -> Option<Text> {
        let msgs = self.rt.pop_msgs();
        if msgs.is_empty() {
            return None;
        }
        let mut merged = Text::new();
        for (i, msg) in msgs.into_iter().enumerate() {
            if i > 0 {
                merged.append(Text::plain("\n"));
            }
            merged.append(msg);
        }
        Some(merged)
    }

    /// Broadcast the finish signal to background tasks. Also done on drop.
    pub fn finish(&self) {
        self.rt.finish();
    }

    /// A copy of the whole state tree.
    pub fn snapshot(&self) -> StateMap {
        self.rt.snapshot()
    }
}

impl Drop for StatefulComp {
    fn drop(&mut self) {
        self.rt.finish();
    }
}
