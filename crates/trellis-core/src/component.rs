//! Component definitions and the bundle their render receives.

use std::fmt;
use std::rc::Rc;

use crate::context::{Context, Dispatch};
use crate::element::Element;
use crate::identity::ComponentId;
use crate::pass::Pass;
use crate::value::{Props, Value};

/// The render capability of a component.
///
/// Implemented for every `Fn(&RenderBundle) -> Element`; implement it by
/// hand for components that carry their own data.
pub trait Renderable {
    fn render(&self, bundle: &RenderBundle<'_>) -> Element;
}

impl<F> Renderable for F
where
    F: Fn(&RenderBundle<'_>) -> Element,
{
    fn render(&self, bundle: &RenderBundle<'_>) -> Element {
        self(bundle)
    }
}

type InitialStateFn = Box<dyn Fn(&Props) -> Value>;
type HookFn = Box<dyn Fn(&RenderBundle<'_>)>;
type ShouldUpdateFn = Box<dyn Fn(&UpdateCheck<'_>) -> bool>;

struct ComponentInner {
    name: String,
    render: Option<Rc<dyn Renderable>>,
    initial_state: Option<InitialStateFn>,
    on_create: Option<HookFn>,
    on_update: Option<HookFn>,
    on_remove: Option<HookFn>,
    should_update: Option<ShouldUpdateFn>,
}

/// A named bundle of component capabilities.
///
/// Cheap to clone; clones are the same definition (see [`ComponentDef::ptr_eq`]).
#[derive(Clone)]
pub struct ComponentDef {
    inner: Rc<ComponentInner>,
}

impl ComponentDef {
    /// A component with a render capability and no lifecycle hooks.
    pub fn new<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&RenderBundle<'_>) -> Element + 'static,
    {
        Self::builder(name).render(render).build()
    }

    /// A definition that names a component but has no render capability yet,
    /// as produced by registries that resolve render functions late.
    /// Building a descriptor that uses it fails with
    /// [`BuildError::MissingRenderCapability`](crate::BuildError).
    pub fn declared(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder {
            inner: ComponentInner {
                name: name.into(),
                render: None,
                initial_state: None,
                on_create: None,
                on_update: None,
                on_remove: None,
                should_update: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn has_render(&self) -> bool {
        self.inner.render.is_some()
    }

    pub(crate) fn renderer(&self) -> Option<&Rc<dyn Renderable>> {
        self.inner.render.as_ref()
    }

    pub(crate) fn initial_state(&self, props: &Props) -> Option<Value> {
        self.inner.initial_state.as_ref().map(|init| init(props))
    }

    pub(crate) fn run_on_create(&self, bundle: &RenderBundle<'_>) {
        if let Some(hook) = &self.inner.on_create {
            hook(bundle);
        }
    }

    pub(crate) fn run_on_update(&self, bundle: &RenderBundle<'_>) {
        if let Some(hook) = &self.inner.on_update {
            hook(bundle);
        }
    }

    pub(crate) fn run_on_remove(&self, bundle: &RenderBundle<'_>) {
        if let Some(hook) = &self.inner.on_remove {
            hook(bundle);
        }
    }

    /// `None` when the component has no opinion.
    pub(crate) fn should_update(&self, check: &UpdateCheck<'_>) -> Option<bool> {
        self.inner.should_update.as_ref().map(|decide| decide(check))
    }

    /// True when both handles are the same definition.
    pub fn ptr_eq(&self, other: &ComponentDef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ComponentDef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDef")
            .field("name", &self.inner.name)
            .field("render", &self.has_render())
            .finish()
    }
}

pub struct ComponentBuilder {
    inner: ComponentInner,
}

impl ComponentBuilder {
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&RenderBundle<'_>) -> Element + 'static,
    {
        self.inner.render = Some(Rc::new(render));
        self
    }

    /// Render through a hand-written [`Renderable`].
    pub fn renderable(mut self, render: impl Renderable + 'static) -> Self {
        self.inner.render = Some(Rc::new(render));
        self
    }

    /// State committed (silently) the first time an instance renders with an
    /// empty slot.
    pub fn initial_state(mut self, init: impl Fn(&Props) -> Value + 'static) -> Self {
        self.inner.initial_state = Some(Box::new(init));
        self
    }

    pub fn on_create(mut self, hook: impl Fn(&RenderBundle<'_>) + 'static) -> Self {
        self.inner.on_create = Some(Box::new(hook));
        self
    }

    pub fn on_update(mut self, hook: impl Fn(&RenderBundle<'_>) + 'static) -> Self {
        self.inner.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_remove(mut self, hook: impl Fn(&RenderBundle<'_>) + 'static) -> Self {
        self.inner.on_remove = Some(Box::new(hook));
        self
    }

    /// Veto for rerenders: returning `false` keeps the previous subtree even
    /// though inputs changed.
    pub fn should_update(mut self, decide: impl Fn(&UpdateCheck<'_>) -> bool + 'static) -> Self {
        self.inner.should_update = Some(Box::new(decide));
        self
    }

    pub fn build(self) -> ComponentDef {
        ComponentDef {
            inner: Rc::new(self.inner),
        }
    }
}

/// Inputs handed to a component's render and lifecycle hooks.
pub struct RenderBundle<'a> {
    pub id: ComponentId,
    pub props: &'a Props,
    /// Raw child descriptors, unbuilt. The component places them in its output.
    pub children: &'a [Element],
    pub state: &'a Value,
    pub context: &'a Context,
    pub dispatch: &'a Dispatch,
    pub(crate) pass: &'a Pass,
}

impl<'a> RenderBundle<'a> {
    pub fn prop(&self, name: &str) -> Option<&'a Value> {
        self.props.get(name)
    }

    /// Commit a new state for this component and request a rerender.
    pub fn set_state(&self, state: Value) {
        self.pass.set_state(self.id, state);
    }

    /// Commit a new state for this component without requesting a rerender.
    pub fn commit_state(&self, state: Value) {
        self.pass.commit_state(self.id, state);
    }

    /// An owned handle for changing this component's state later, typically
    /// from an event callback.
    pub fn updater(&self) -> StateUpdater {
        StateUpdater {
            id: self.id,
            pass: self.pass.clone(),
        }
    }

    pub fn pass(&self) -> &'a Pass {
        self.pass
    }
}

/// Owned route back to one component's state slot.
#[derive(Clone)]
pub struct StateUpdater {
    id: ComponentId,
    pass: Pass,
}

impl StateUpdater {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Current committed state, or the empty map when the slot is unset.
    pub fn current(&self) -> Value {
        self.pass
            .states()
            .get(self.id)
            .unwrap_or_else(Value::empty_map)
    }

    pub fn set_state(&self, state: Value) {
        self.pass.set_state(self.id, state);
    }

    pub fn commit_state(&self, state: Value) {
        self.pass.commit_state(self.id, state);
    }

    /// Derive the next state from the current one, then set it.
    pub fn update(&self, f: impl FnOnce(&Value) -> Value) {
        let next = f(&self.current());
        self.set_state(next);
    }
}

impl fmt::Debug for StateUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateUpdater").field("id", &self.id).finish()
    }
}

/// Previous and next inputs given to a `should_update` veto.
pub struct UpdateCheck<'a> {
    pub id: ComponentId,
    pub previous_props: &'a Props,
    pub props: &'a Props,
    pub previous_state: &'a Value,
    pub state: &'a Value,
}
