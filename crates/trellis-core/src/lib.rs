//! Component build pass and widget lifecycle for a virtual-DOM UI layer.
//!
//! A [`Pass`] walks a tree of [`Element`] descriptors and produces a
//! [`VTree`]. Intrinsic nodes are built eagerly through the node factory;
//! component nodes become [`Widget`]s that render later, when the hosting
//! runtime (for example [`Session`]) instantiates them. Components keep
//! their state in a shared [`StateStore`] addressed by [`ComponentId`] and
//! change it through [`Pass::set_state`] (commit, then request a render) or
//! [`Pass::commit_state`] (commit only).

pub mod collections;
pub mod component;
pub mod context;
pub mod element;
pub mod identity;
pub mod normalize;
pub mod pass;
pub mod platform;
pub mod session;
pub mod state;
pub mod value;
pub mod vtree;
pub mod widget;

pub use component::{
    ComponentBuilder, ComponentDef, RenderBundle, Renderable, StateUpdater, UpdateCheck,
};
pub use context::{Context, Dispatch};
pub use element::{h, Element, NodeElement, Tag};
pub use identity::{ComponentId, IdentityPolicy, IdentityScope, PathSegment, PositionalIdentity};
pub use normalize::{DefaultNormalizer, IdentityNormalizer, PropNormalizer};
pub use pass::{build_pass, Pass, PassBuilder};
pub use platform::{CoalescingScheduler, CommitState, NoopScheduler, RenderScheduler, StoreCommit};
pub use session::{RenderStats, Session, SessionOptions};
pub use state::StateStore;
pub use value::{number_to_string, props, Callback, Props, Value};
pub use vtree::{Hyperscript, NodeFactory, VNode, VTree};
pub use widget::{UpdateOutcome, Widget};

/// Errors raised while building an element tree or rendering a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A component descriptor's definition has no render capability.
    MissingRenderCapability { component: String },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::MissingRenderCapability { component } => {
                write!(f, "no render() in component {component}")
            }
        }
    }
}

impl std::error::Error for BuildError {}

#[cfg(test)]
#[path = "tests/pass_tests.rs"]
mod pass_tests;

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod widget_tests;

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;
