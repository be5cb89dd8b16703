//! Shared runtime state behind every [`Context`](crate::comp::Context).
//!
//! Access to the state tree is guarded by two locks:
//!
//! - The **state lock** guards each individual state read or write and is
//!   always the innermost lock. [`StateVar`](crate::state::StateVar) takes it
//!   automatically.
//! - The **batch lock** guards a whole render pass or event-handling pass, and
//!   [`Context::update_async`](crate::comp::Context::update_async) takes it for
//!   a background mutation. Taking it relies on co-operation.
//!
//! Neither lock is reentrant: a component must not call `update_async` from
//! inside a render or react pass, and a `swap` function must not touch other
//! state variables.

use parking_lot::{Mutex, RwLock};

use crate::host::HostFrame;
use crate::state::StateMap;
use crate::styled::Text;

pub(crate) struct Runtime {
    pub(crate) frame: HostFrame,
    pub(crate) state: RwLock<StateMap>,
    pub(crate) msgs: Mutex<Vec<Text>>,
    pub(crate) batch: Mutex<()>,
    /// Capacity one; sends never block, so redundant requests coalesce.
    pub(crate) refresh_tx: flume::Sender<()>,
    pub(crate) refresh_rx: flume::Receiver<()>,
    /// Dropped on finish, which disconnects every clone of `finish_rx`.
    finish_tx: Mutex<Option<flume::Sender<()>>>,
    pub(crate) finish_rx: flume::Receiver<()>,
}

impl Runtime {
    pub(crate) fn new(frame: HostFrame) -> Self {
        let (refresh_tx, refresh_rx) = flume::bounded(1);
        let (finish_tx, finish_rx) = flume::bounded(0);
        Self {
            frame,
            state: RwLock::new(StateMap::new()),
            msgs: Mutex::new(Vec::new()),
            batch: Mutex::new(()),
            refresh_tx,
            refresh_rx,
            finish_tx: Mutex::new(Some(finish_tx)),
            finish_rx,
        }
    }

    /// Request a refresh without blocking.
    pub(crate) fn request_refresh(&self) {
        if self.refresh_tx.try_send(()).is_err() {
            tracing::trace!("refresh already pending, coalesced");
        }
    }

    /// Consume a pending refresh request, if any.
    pub(crate) fn take_refresh(&self) -> bool {
        self.refresh_rx.try_recv().is_ok()
    }

    pub(crate) fn push_msg(&self, msg: Text) {
        self.msgs.lock().push(msg);
    }

    pub(crate) fn pop_msgs(&self) -> Vec<Text> {
        std::mem::take(&mut *self.msgs.lock())
    }

    /// Broadcast the finish signal. Idempotent.
    pub(crate) fn finish(&self) {
        if self.finish_tx.lock().take().is_some() {
            tracing::debug!("finish signal broadcast");
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finish_tx.lock().is_none()
    }

    pub(crate) fn snapshot(&self) -> StateMap {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_coalesces() {
        let rt = Runtime::new(HostFrame::default());
        for _ in 0..5 {
            rt.request_refresh();
        }
        assert!(rt.take_refresh());
        assert!(!rt.take_refresh());
    }

    #[test]
    fn test_finish_disconnects_receivers() {
        let rt = Runtime::new(HostFrame::default());
        let rx = rt.finish_rx.clone();
        assert_eq!(rx.try_recv(), Err(flume::TryRecvError::Empty));
        rt.finish();
        rt.finish();
        assert_eq!(rx.try_recv(), Err(flume::TryRecvError::Disconnected));
        assert!(rt.is_finished());
    }

    #[test]
    fn test_pop_msgs_clears_queue() {
        let rt = Runtime::new(HostFrame::default());
        rt.push_msg(Text::plain("a"));
        rt.push_msg(Text::plain("b"));
        assert_eq!(rt.pop_msgs().len(), 2);
        assert!(rt.pop_msgs().is_empty());
    }
}
