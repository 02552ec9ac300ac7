//! Testing utilities for Trellis passes, widgets and sessions.

pub mod assertions;
pub mod harness;
pub mod recorders;

pub use assertions::*;
pub use harness::PassHarness;
pub use recorders::*;

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::harness::PassHarness;
    pub use crate::recorders::*;
}
