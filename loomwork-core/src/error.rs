//! Error types shared by every crate in this workspace.
//!
//! `component` holds [`component::ComponentError`], the error surfaced to
//! hook and constructor bodies; `container` holds
//! [`container::ContainerError`], the richer, `source`-carrying error
//! surfaced by the registry, graph, and lifecycle engine. The two convert
//! into each other so a hook body can return a `ComponentError` and have it
//! propagate through the engine without manual wrapping at every call site.

pub mod component;
pub mod container;

pub use component::ComponentError;
pub use container::{ContainerError, ContainerErrorKind};
