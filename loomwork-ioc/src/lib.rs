//! Core IoC engine: the reflection adapter, the type registry, the
//! dependency graph, and the staged lifecycle engine that advances every
//! discovered component from `Created` to `Started`.
//!
//! This crate has no knowledge of configuration file formats or profiles —
//! it only knows how to ask a [`component::ConfigLookup`] for a raw string
//! by key. `loomwork-context` supplies the real implementation.
//!
//! # Quick start
//!
//! ```rust
//! use loomwork_ioc::{ComponentFactory, Container};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct DatabaseService {
//!     connection_string: String,
//! }
//!
//! let container = Container::empty();
//! let db_service = Arc::new(DatabaseService {
//!     connection_string: "postgres://localhost:5432/db".to_string(),
//! });
//! container.register_component(db_service);
//!
//! let retrieved_service: Option<Arc<DatabaseService>> = container.get_component();
//! assert!(retrieved_service.is_some());
//! ```

mod component;
mod container;
mod event;
mod graph;
mod lifecycle;
mod registry;

pub use component::{
    factory::ComponentFactory, ComponentDefinition, ComponentInitializer, ComponentInstance,
    ComponentScope, ConfigLookup, ConfigPointDef, LifecycleHookDefinition, NoConfig,
};

pub use container::{Container, Injectable};

pub use event::{
    ContainerLifecycleEvent, LifecycleEventPublisher, LifecycleListener, LifecycleListenerDefinition,
};

pub use graph::{DependencyGraph, Edge, Node};
pub use registry::Registry;

/// Macro for registering lifecycle event listeners.
///
/// # Examples
///
/// ```rust
/// use loomwork_ioc::{lifecycle_listener, ContainerLifecycleEvent};
///
/// fn my_event_handler(event: &ContainerLifecycleEvent) {
///     if let ContainerLifecycleEvent::BuildStarted { .. } = event {
///         println!("container build started");
///     }
/// }
///
/// lifecycle_listener!("my_listener", my_event_handler);
/// ```
#[macro_export]
macro_rules! lifecycle_listener {
    ($name:expr, $handler:expr) => {
        inventory::submit! {
            $crate::LifecycleListenerDefinition {
                name: $name,
                handler: $handler,
            }
        }
    };
}
