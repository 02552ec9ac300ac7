use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Application context passed unchanged to every component of a pass.
#[derive(Clone, Default)]
pub struct Context {
    inner: Option<Rc<dyn Any>>,
}

impl Context {
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            inner: Some(Rc::new(value)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Borrow the context as `T`, if that is what it holds.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.inner.as_deref()?.downcast_ref::<T>()
    }

    /// Identity comparison: two contexts are the same if they share storage.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(_) => f.write_str("Context(..)"),
            None => f.write_str("Context(empty)"),
        }
    }
}

/// Action sink components use to talk to the application. Opaque to the pass.
#[derive(Clone)]
pub struct Dispatch {
    inner: Rc<dyn Fn(Value)>,
}

impl Dispatch {
    pub fn new(f: impl Fn(Value) + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    /// A dispatch that drops every action.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn send(&self, action: impl Into<Value>) {
        (self.inner)(action.into());
    }

    pub fn ptr_eq(&self, other: &Dispatch) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Theme {
        accent: &'static str,
    }

    #[test]
    fn context_downcasts_to_its_type() {
        let ctx = Context::new(Theme { accent: "teal" });
        assert_eq!(ctx.get::<Theme>().map(|t| t.accent), Some("teal"));
        assert!(ctx.get::<String>().is_none());
        assert!(Context::empty().get::<Theme>().is_none());
    }

    #[test]
    fn context_identity_survives_clone() {
        let ctx = Context::new(1u8);
        assert!(ctx.ptr_eq(&ctx.clone()));
        assert!(!ctx.ptr_eq(&Context::new(1u8)));
        assert!(Context::empty().ptr_eq(&Context::empty()));
    }

    #[test]
    fn dispatch_forwards_actions() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let dispatch = Dispatch::new(move |action| sink.borrow_mut().push(action));
        dispatch.send("increment");
        assert_eq!(*seen.borrow(), vec![Value::from("increment")]);
    }
}
