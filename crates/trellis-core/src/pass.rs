//! The build pass.
//!
//! A [`Pass`] carries everything one render cycle needs: the application
//! context, the dispatch sink, the shared [`StateStore`], and the host's
//! commit and render ports. It turns an [`Element`] tree into a [`VTree`],
//! replacing component descriptors with [`Widget`]s, and is the only way
//! components change state.
//!
//! ```text
//! pass.build(&el)          // descriptor tree -> renderable tree
//! pass.commit_state(id, s) // persist state silently
//! pass.set_state(id, s)    // persist state, then request a render
//! pass.states()            // the shared state table
//! ```

use std::fmt;
use std::rc::Rc;

use crate::context::{Context, Dispatch};
use crate::element::{Element, NodeElement, Tag};
use crate::identity::{
    ComponentId, IdentityPolicy, IdentityScope, Path, PathSegment, PositionalIdentity,
};
use crate::normalize::{DefaultNormalizer, PropNormalizer};
use crate::platform::{CommitState, NoopScheduler, RenderScheduler, StoreCommit};
use crate::state::StateStore;
use crate::value::{number_to_string, Value};
use crate::vtree::{Hyperscript, NodeFactory, VTree};
use crate::widget::Widget;
use crate::BuildError;

struct PassInner {
    context: Context,
    dispatch: Dispatch,
    states: StateStore,
    committer: Rc<dyn CommitState>,
    scheduler: Rc<dyn RenderScheduler>,
    nodes: Rc<dyn NodeFactory>,
    normalizer: Rc<dyn PropNormalizer>,
    identity: Rc<dyn IdentityPolicy>,
}

/// Handle to one render cycle. Clones share the same pass.
#[derive(Clone)]
pub struct Pass {
    inner: Rc<PassInner>,
}

/// Configures a [`Pass`]. Every port has a default.
pub struct PassBuilder {
    context: Context,
    dispatch: Dispatch,
    states: StateStore,
    committer: Rc<dyn CommitState>,
    scheduler: Rc<dyn RenderScheduler>,
    nodes: Rc<dyn NodeFactory>,
    normalizer: Rc<dyn PropNormalizer>,
    identity: Rc<dyn IdentityPolicy>,
}

impl PassBuilder {
    pub fn committer(mut self, committer: impl CommitState) -> Self {
        self.committer = Rc::new(committer);
        self
    }

    pub fn scheduler(mut self, scheduler: impl RenderScheduler) -> Self {
        self.scheduler = Rc::new(scheduler);
        self
    }

    pub fn node_factory(mut self, nodes: impl NodeFactory) -> Self {
        self.nodes = Rc::new(nodes);
        self
    }

    pub fn normalizer(mut self, normalizer: impl PropNormalizer) -> Self {
        self.normalizer = Rc::new(normalizer);
        self
    }

    pub fn identity(mut self, identity: impl IdentityPolicy) -> Self {
        self.identity = Rc::new(identity);
        self
    }

    pub fn build(self) -> Pass {
        Pass {
            inner: Rc::new(PassInner {
                context: self.context,
                dispatch: self.dispatch,
                states: self.states,
                committer: self.committer,
                scheduler: self.scheduler,
                nodes: self.nodes,
                normalizer: self.normalizer,
                identity: self.identity,
            }),
        }
    }
}

/// Builds a pass from the host's commit and render callbacks, using the
/// default node factory, normalizer and identity policy.
pub fn build_pass(
    context: Context,
    dispatch: Dispatch,
    states: StateStore,
    commit_state: impl CommitState,
    rerender: impl RenderScheduler,
) -> Pass {
    Pass::builder(context, dispatch, states)
        .committer(commit_state)
        .scheduler(rerender)
        .build()
}

impl Pass {
    pub fn builder(context: Context, dispatch: Dispatch, states: StateStore) -> PassBuilder {
        PassBuilder {
            context,
            dispatch,
            states,
            committer: Rc::new(StoreCommit),
            scheduler: Rc::new(NoopScheduler),
            nodes: Rc::new(Hyperscript),
            normalizer: Rc::new(DefaultNormalizer),
            identity: Rc::new(PositionalIdentity),
        }
    }

    /// Builds a descriptor tree into a renderable tree.
    ///
    /// Text passes through, numbers become their decimal text, `Empty`
    /// yields `None`, lists keep length and order. Intrinsic nodes have their
    /// props normalized and children built before the node factory runs.
    /// Component nodes become [`Widget`]s whose children stay unbuilt; the
    /// component's render is not called here.
    ///
    /// Fails with [`BuildError::MissingRenderCapability`] when a component
    /// node's definition has no render, anywhere in the tree.
    pub fn build(&self, el: &Element) -> Result<Option<VTree>, BuildError> {
        let mut path = Path::new();
        self.build_at(el, None, &mut path)
    }

    /// Builds the output of the component `owner`, so nested component ids
    /// are derived relative to it.
    pub(crate) fn build_owned(
        &self,
        el: &Element,
        owner: ComponentId,
    ) -> Result<Option<VTree>, BuildError> {
        let mut path = Path::new();
        self.build_at(el, Some(owner), &mut path)
    }

    fn build_at(
        &self,
        el: &Element,
        owner: Option<ComponentId>,
        path: &mut Path,
    ) -> Result<Option<VTree>, BuildError> {
        match el {
            Element::Text(text) => Ok(Some(VTree::Text(text.clone()))),
            Element::Number(n) => Ok(Some(VTree::Text(number_to_string(*n)))),
            Element::Empty => Ok(None),
            Element::List(items) => {
                let built = self.build_children(items, owner, path)?;
                Ok(Some(VTree::List(built)))
            }
            Element::Node(node) => {
                let keyed = KeyedSegment::apply(path, node.key.as_deref());
                let built = self.build_node(node, owner, path);
                keyed.restore(path);
                built.map(Some)
            }
        }
    }

    fn build_children(
        &self,
        items: &[Element],
        owner: Option<ComponentId>,
        path: &mut Path,
    ) -> Result<Vec<Option<VTree>>, BuildError> {
        let mut built = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            path.push(PathSegment::Index(index));
            let child = self.build_at(item, owner, path);
            path.pop();
            built.push(child?);
        }
        Ok(built)
    }

    fn build_node(
        &self,
        node: &NodeElement,
        owner: Option<ComponentId>,
        path: &mut Path,
    ) -> Result<VTree, BuildError> {
        match &node.tag {
            Tag::Component(component) => {
                if !component.has_render() {
                    return Err(BuildError::MissingRenderCapability {
                        component: component.name().to_string(),
                    });
                }
                let id = node.id.unwrap_or_else(|| {
                    self.inner.identity.component_id(&IdentityScope {
                        parent: owner,
                        path: path.as_slice(),
                        key: node.key.as_deref(),
                        component: component.name(),
                    })
                });
                log::trace!("build: component {} as {}", component.name(), id);
                Ok(VTree::Widget(Widget::new(
                    component.clone(),
                    node.props.clone(),
                    node.children.clone(),
                    id,
                    self.clone(),
                )))
            }
            Tag::Intrinsic(tag) => {
                log::trace!("build: <{}> with {} children", tag, node.children.len());
                let props = self.inner.normalizer.normalize(&node.props);
                let children = self.build_children(&node.children, owner, path)?;
                Ok(self.inner.nodes.make_node(tag, props, children))
            }
        }
    }

    /// Commits `state` for `id`, then requests a render. Always both, in
    /// that order, once per call.
    pub fn set_state(&self, id: ComponentId, state: Value) {
        self.commit_state(id, state);
        log::debug!("set_state: {} requests a render", id);
        self.inner.scheduler.request_render();
    }

    /// [`Pass::set_state`] with the default empty-map state.
    pub fn set_state_default(&self, id: ComponentId) {
        self.set_state(id, Value::empty_map());
    }

    /// Commits `state` for `id` without requesting a render.
    pub fn commit_state(&self, id: ComponentId, state: Value) {
        log::debug!("commit_state: {}", id);
        self.inner.committer.commit(&self.inner.states, id, state);
    }

    /// The shared state table this pass was built with.
    pub fn states(&self) -> &StateStore {
        &self.inner.states
    }

    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    pub fn ptr_eq(&self, other: &Pass) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pass")
            .field("context", &self.inner.context)
            .field("slots", &self.inner.states.len())
            .finish()
    }
}

/// Swaps the trailing index segment for a key while a keyed node is built.
enum KeyedSegment {
    Untouched,
    Replaced(PathSegment),
    Pushed,
}

impl KeyedSegment {
    fn apply(path: &mut Path, key: Option<&str>) -> Self {
        let Some(key) = key else {
            return KeyedSegment::Untouched;
        };
        let segment = PathSegment::Key(key.to_string());
        match path.last_mut() {
            Some(last) => KeyedSegment::Replaced(std::mem::replace(last, segment)),
            None => {
                path.push(segment);
                KeyedSegment::Pushed
            }
        }
    }

    fn restore(self, path: &mut Path) {
        match self {
            KeyedSegment::Untouched => {}
            KeyedSegment::Replaced(previous) => {
                if let Some(last) = path.last_mut() {
                    *last = previous;
                }
            }
            KeyedSegment::Pushed => {
                path.pop();
            }
        }
    }
}
