use std::cell::RefCell;
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::identity::ComponentId;
use crate::value::Value;

/// Shared per-component state table.
///
/// Cloning the handle shares the table: every pass and widget built over the
/// same store sees the same slots. Values are cloned out on read so no borrow
/// outlives a call, which keeps components free to commit state from inside
/// their own render.
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Rc<RefCell<HashMap<ComponentId, Value>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ComponentId) -> Option<Value> {
        self.inner.borrow().get(&id).cloned()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.inner.borrow().contains_key(&id)
    }

    /// Writes `state` into the slot for `id`, creating the slot if needed.
    pub fn insert(&self, id: ComponentId, state: Value) -> Option<Value> {
        self.inner.borrow_mut().insert(id, state)
    }

    /// Drops the slot for `id`. Only hosts unmounting a component call this.
    pub fn remove(&self, id: ComponentId) -> Option<Value> {
        self.inner.borrow_mut().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<ComponentId> {
        self.inner.borrow().keys().copied().collect()
    }

    /// Run `f` with read access to the whole table.
    ///
    /// # Panics
    /// The table stays borrowed while `f` runs: writing to this store (or a
    /// clone of it) from inside `f` panics. Copy out what you need first, or
    /// use [`StateStore::get`].
    pub fn with<R>(&self, f: impl FnOnce(&HashMap<ComponentId, Value>) -> R) -> R {
        let borrow = self.inner.borrow();
        f(&borrow)
    }

    /// True when both handles address the same table.
    pub fn ptr_eq(&self, other: &StateStore) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with(|slots| f.debug_map().entries(slots.iter()).finish())
    }
}
