//! loomwork-core
//!
//! Foundation types shared across the loomwork workspace: the lifecycle
//! [`state::State`] enumeration and the error hierarchy used by the
//! registry, the dependency graph, the lifecycle engine, and the
//! configuration binder.

pub mod error;
pub mod state;

pub use error::{ComponentError, ContainerError, ContainerErrorKind};
pub use state::{State, STATES, START_TARGETS};
