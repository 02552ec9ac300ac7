//! Component identity: how a component instance finds its state slot.
//!
//! A [`ComponentId`] must be stable across renders for the same logical
//! instance. The derivation is pluggable through [`IdentityPolicy`]; the
//! default [`PositionalIdentity`] hashes the owning component, the position
//! path below it, an optional key and the component name.

use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::collections::new_hasher;

/// Opaque key addressing one slot in the shared [`StateStore`](crate::StateStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl ComponentId {
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

/// One step from a component (or the root) down to a descendant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// Position of a descriptor below its owning component.
pub type Path = SmallVec<[PathSegment; 8]>;

/// Everything a policy may look at when naming a component instance.
#[derive(Debug)]
pub struct IdentityScope<'a> {
    /// Id of the component whose render produced this descriptor, `None` at
    /// the root of a pass.
    pub parent: Option<ComponentId>,
    /// Position below `parent`. Keyed descriptors already have their last
    /// segment replaced by [`PathSegment::Key`].
    pub path: &'a [PathSegment],
    pub key: Option<&'a str>,
    pub component: &'a str,
}

/// Derives the state slot for a component descriptor.
///
/// Note: This trait does NOT require Send + Sync because passes are
/// single-threaded (Rc/RefCell throughout).
pub trait IdentityPolicy: 'static {
    fn component_id(&self, scope: &IdentityScope<'_>) -> ComponentId;
}

/// Default policy: tree position relative to the owning component, with keys
/// standing in for sibling indices.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionalIdentity;

impl IdentityPolicy for PositionalIdentity {
    fn component_id(&self, scope: &IdentityScope<'_>) -> ComponentId {
        let mut hasher = new_hasher();
        scope.parent.hash(&mut hasher);
        scope.path.hash(&mut hasher);
        scope.component.hash(&mut hasher);
        ComponentId(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn id_for(parent: Option<ComponentId>, path: &[PathSegment], name: &str) -> ComponentId {
        PositionalIdentity.component_id(&IdentityScope {
            parent,
            path,
            key: None,
            component: name,
        })
    }

    #[test]
    fn same_position_yields_same_id() {
        let path: Path = smallvec![PathSegment::Index(0), PathSegment::Index(2)];
        assert_eq!(id_for(None, &path, "Counter"), id_for(None, &path, "Counter"));
    }

    #[test]
    fn position_parent_and_name_all_discriminate() {
        let a: Path = smallvec![PathSegment::Index(0)];
        let b: Path = smallvec![PathSegment::Index(1)];
        let base = id_for(None, &a, "Counter");
        assert_ne!(base, id_for(None, &b, "Counter"));
        assert_ne!(base, id_for(None, &a, "Toggle"));
        assert_ne!(base, id_for(Some(ComponentId::new(7)), &a, "Counter"));
    }

    #[test]
    fn keyed_segments_differ_from_indices() {
        let indexed: Path = smallvec![PathSegment::Index(0)];
        let keyed: Path = smallvec![PathSegment::Key("0".into())];
        assert_ne!(id_for(None, &indexed, "Row"), id_for(None, &keyed, "Row"));
    }
}
