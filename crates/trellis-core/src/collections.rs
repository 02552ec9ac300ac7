//! Map and hasher selection.
//!
//! The fast Fx maps and aHash hasher are used by default; the `std-hash`
//! feature swaps both for the standard library versions.

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
    pub use std::collections::hash_map::Entry;
}

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::hash_map::Entry;
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub(crate) fn new_hasher() -> ahash::AHasher {
    // Fixed keys: ids derived in one render must match the next one.
    ahash::AHasher::default()
}

#[cfg(feature = "std-hash")]
pub(crate) fn new_hasher() -> std::collections::hash_map::DefaultHasher {
    std::collections::hash_map::DefaultHasher::new()
}
