//! Host ports for the build pass.
//!
//! A pass never decides when rendering happens or how state is persisted.
//! Both are delegated to the hosting runtime through the traits below, so the
//! same pass can run under an immediate renderer, a coalescing frame loop, or
//! a test harness that only records calls.

use std::cell::Cell;
use std::rc::Rc;

use crate::identity::ComponentId;
use crate::state::StateStore;
use crate::value::Value;

/// Schedules a new render pass.
///
/// Implementations may render synchronously, defer, or coalesce requests.
/// The only promise made by the caller is that a request follows every
/// public state change. Not `Send + Sync`: the pass is single-threaded.
pub trait RenderScheduler: 'static {
    /// Request that the host produce a fresh render reflecting committed state.
    fn request_render(&self);
}

impl<F> RenderScheduler for F
where
    F: Fn() + 'static,
{
    fn request_render(&self) {
        self()
    }
}

/// Persists a component's state into the shared table.
///
/// Must be synchronous and safe to repeat with identical arguments.
pub trait CommitState: 'static {
    fn commit(&self, states: &StateStore, id: ComponentId, state: Value);
}

impl<F> CommitState for F
where
    F: Fn(&StateStore, ComponentId, Value) + 'static,
{
    fn commit(&self, states: &StateStore, id: ComponentId, state: Value) {
        self(states, id, state)
    }
}

/// Default commit: write the value straight into the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoreCommit;

impl CommitState for StoreCommit {
    fn commit(&self, states: &StateStore, id: ComponentId, state: Value) {
        states.insert(id, state);
    }
}

/// Scheduler that ignores requests. Used when the host drives rendering itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl RenderScheduler for NoopScheduler {
    fn request_render(&self) {}
}

/// Scheduler that folds any number of requests into one pending flag.
///
/// Clones share the flag, so a host can keep one copy and hand another to
/// the pass.
#[derive(Debug, Default, Clone)]
pub struct CoalescingScheduler {
    pending: Rc<Cell<bool>>,
    requests: Rc<Cell<usize>>,
}

impl CoalescingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Clears the pending flag, returning whether a render was requested.
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    /// Total requests received since creation.
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }
}

impl RenderScheduler for CoalescingScheduler {
    fn request_render(&self) {
        self.requests.set(self.requests.get() + 1);
        if !self.pending.replace(true) {
            log::trace!("render requested");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalescing_folds_requests() {
        let scheduler = CoalescingScheduler::new();
        let host = scheduler.clone();
        scheduler.request_render();
        scheduler.request_render();
        assert!(host.is_pending());
        assert_eq!(host.request_count(), 2);
        assert!(host.take_pending());
        assert!(!host.take_pending());
    }

    #[test]
    fn closures_are_ports() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let scheduler = move || counter.set(counter.get() + 1);
        scheduler.request_render();
        assert_eq!(hits.get(), 1);

        let store = StateStore::new();
        let commit = |states: &StateStore, id: ComponentId, state: Value| {
            states.insert(id, state);
        };
        commit.commit(&store, ComponentId::new(3), Value::from(true));
        assert_eq!(store.get(ComponentId::new(3)), Some(Value::Bool(true)));
    }
}
