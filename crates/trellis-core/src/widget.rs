//! Widgets: the runtime binding of a component to its inputs and state slot.
//!
//! A [`Widget`] is created by [`Pass::build`] for every component descriptor.
//! Nothing is rendered at that point. The hosting runtime decides when to
//! call [`Widget::init`] (first appearance) or [`Widget::update`] (the widget
//! replaces one from the previous render), and [`Widget::destroy`] when it
//! goes away.

use std::fmt;
use std::rc::Rc;

use crate::component::{ComponentDef, RenderBundle, UpdateCheck};
use crate::context::{Context, Dispatch};
use crate::element::Element;
use crate::identity::ComponentId;
use crate::pass::Pass;
use crate::value::{Props, Value};
use crate::vtree::VTree;
use crate::BuildError;

/// What [`Widget::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The previous widget was a different instance; rendered from scratch.
    Initialized,
    /// Inputs unchanged (or vetoed by `should_update`); previous subtree kept.
    Reused,
    Rerendered,
}

#[derive(Clone)]
pub struct Widget {
    id: ComponentId,
    component: ComponentDef,
    props: Props,
    children: Vec<Element>,
    context: Context,
    dispatch: Dispatch,
    pass: Pass,
    /// Shared with the widget this one was reused from; copied on write.
    rendered: Option<Rc<VTree>>,
    /// State the current `rendered` subtree was produced from.
    rendered_state: Option<Value>,
}

impl Widget {
    pub(crate) fn new(
        component: ComponentDef,
        props: Props,
        children: Vec<Element>,
        id: ComponentId,
        pass: Pass,
    ) -> Self {
        Self {
            id,
            component,
            props,
            children,
            context: pass.context().clone(),
            dispatch: pass.dispatch().clone(),
            pass,
            rendered: None,
            rendered_state: None,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn component(&self) -> &ComponentDef {
        &self.component
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Raw child descriptors, as written at the call site.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn pass(&self) -> &Pass {
        &self.pass
    }

    /// Subtree produced by the last render, `None` before [`Widget::init`]
    /// or when the component rendered nothing.
    pub fn rendered(&self) -> Option<&VTree> {
        self.rendered.as_deref()
    }

    /// Mutable access to the rendered subtree. A subtree still shared with
    /// another widget is copied down to the next widget boundary first.
    pub fn rendered_mut(&mut self) -> Option<&mut VTree> {
        self.rendered.as_mut().map(Rc::make_mut)
    }

    /// True when both widgets hold the very same rendered subtree.
    pub fn shares_rendered_with(&self, other: &Widget) -> bool {
        match (&self.rendered, &other.rendered) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.rendered_state.is_some()
    }

    /// Committed state for this widget's slot, or the empty map.
    pub fn state(&self) -> Value {
        self.pass
            .states()
            .get(self.id)
            .unwrap_or_else(Value::empty_map)
    }

    /// Same component definition bound to the same slot.
    pub fn is_same_instance(&self, other: &Widget) -> bool {
        self.id == other.id && self.component.ptr_eq(&other.component)
    }

    /// First render. Seeds the slot from the component's initial state when
    /// it is empty (silently, without a render request), renders, builds the
    /// output through the pass, then runs `on_create`.
    pub fn init(&mut self) -> Result<(), BuildError> {
        let state = match self.pass.states().get(self.id) {
            Some(state) => state,
            None => match self.component.initial_state(&self.props) {
                Some(initial) => {
                    self.pass.commit_state(self.id, initial.clone());
                    initial
                }
                None => Value::empty_map(),
            },
        };
        log::debug!("init {} {}", self.component.name(), self.id);
        self.render_with(&state)?;
        self.with_bundle(&state, |component, bundle| component.run_on_create(bundle));
        Ok(())
    }

    /// Renders in place of `previous`.
    ///
    /// Different instance: same as [`Widget::init`]. Same instance with equal
    /// props, children, context, dispatch and state: the previous subtree is
    /// kept.
    /// Otherwise the component's `should_update` may still veto; if it does
    /// not, the widget rerenders and runs `on_update`.
    pub fn update(&mut self, previous: &Widget) -> Result<UpdateOutcome, BuildError> {
        if !self.is_same_instance(previous) {
            if previous.id == self.id {
                log::warn!(
                    "update: slot {} moved from {} to {}",
                    self.id,
                    previous.component.name(),
                    self.component.name()
                );
            }
            self.init()?;
            return Ok(UpdateOutcome::Initialized);
        }

        let state = self.state();
        let Some(previous_state) = previous.rendered_state.as_ref() else {
            self.init()?;
            return Ok(UpdateOutcome::Initialized);
        };

        let unchanged = self.props == previous.props
            && self.children == previous.children
            && self.context.ptr_eq(&previous.context)
            && self.dispatch.ptr_eq(&previous.dispatch)
            && state == *previous_state;
        let vetoed = !unchanged
            && self.component.should_update(&UpdateCheck {
                id: self.id,
                previous_props: &previous.props,
                props: &self.props,
                previous_state,
                state: &state,
            }) == Some(false);

        if unchanged || vetoed {
            log::debug!(
                "reuse {} {}{}",
                self.component.name(),
                self.id,
                if vetoed { " (vetoed)" } else { "" }
            );
            self.rendered = previous.rendered.clone();
            self.rendered_state = previous.rendered_state.clone();
            return Ok(UpdateOutcome::Reused);
        }

        log::debug!("rerender {} {}", self.component.name(), self.id);
        self.render_with(&state)?;
        self.with_bundle(&state, |component, bundle| component.run_on_update(bundle));
        Ok(UpdateOutcome::Rerendered)
    }

    /// Runs `on_remove`. The state slot is left to the host.
    pub fn destroy(&self) {
        log::debug!("destroy {} {}", self.component.name(), self.id);
        let state = self.state();
        self.with_bundle(&state, |component, bundle| component.run_on_remove(bundle));
    }

    fn render_with(&mut self, state: &Value) -> Result<(), BuildError> {
        let renderer = self.component.renderer().cloned().ok_or_else(|| {
            BuildError::MissingRenderCapability {
                component: self.component.name().to_string(),
            }
        })?;
        let output = self.with_bundle(state, |_, bundle| renderer.render(bundle));
        let tree = self.pass.build_owned(&output, self.id)?;
        self.rendered = tree.map(Rc::new);
        self.rendered_state = Some(state.clone());
        Ok(())
    }

    fn with_bundle<R>(
        &self,
        state: &Value,
        f: impl FnOnce(&ComponentDef, &RenderBundle<'_>) -> R,
    ) -> R {
        let bundle = RenderBundle {
            id: self.id,
            props: &self.props,
            children: &self.children,
            state,
            context: &self.context,
            dispatch: &self.dispatch,
            pass: &self.pass,
        };
        f(&self.component, &bundle)
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("component", &self.component.name())
            .field("id", &self.id)
            .field("props", &self.props)
            .field("children", &self.children.len())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
