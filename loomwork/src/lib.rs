//! # loomwork
//!
//! A dependency-injection container with a staged lifecycle engine.
//!
//! `#[derive(Component)]` types are discovered at link time via `inventory`,
//! wired into a dependency graph, and advanced together through a fixed
//! sequence of states (`Created -> Initialized -> Resolved -> Started`) —
//! every hook a component or its dependents register for a state runs before
//! any node crosses it. `loomwork-context::ContextBuilder` layers
//! configuration sources, environment profiles, and an event bus on top of
//! the same container.
//!
//! ## Quick Start
//!
//! ```rust
//! use loomwork::{Component, ContextBuilder};
//! use std::sync::Arc;
//!
//! #[derive(Component, Debug)]
//! struct DatabaseService {
//!     #[config(name = "database.url", default = "postgres://localhost/app")]
//!     connection_string: String,
//! }
//!
//! #[derive(Component, Debug)]
//! struct UserService {
//!     #[autowired]
//!     db: Arc<DatabaseService>,
//! }
//!
//! let context = ContextBuilder::new()
//!     .with_property("database.url", "postgres://localhost/myapp")
//!     .build()
//!     .unwrap();
//!
//! let user_service: Arc<UserService> = context.get_component().unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost/myapp");
//! ```
//!
//! ## Lifecycle Hooks
//!
//! ```rust,ignore
//! use loomwork::{hooks, Component, ComponentError};
//!
//! #[derive(Component, Debug)]
//! struct ConnectionPool;
//!
//! #[hooks]
//! impl ConnectionPool {
//!     #[lifecycle_hook(state = "Started")]
//!     fn warm_up(&self) -> Result<(), ComponentError> {
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Configuration Sections
//!
//! ```rust
//! use loomwork::Configuration;
//!
//! #[derive(Configuration, Debug)]
//! #[configuration("server")]
//! struct ServerConfig {
//!     #[config_default(8080)]
//!     port: Option<u16>,
//!     host: Option<String>,
//! }
//! ```

// Derive and attribute macros.
pub use loomwork_macros::{hooks, Component, Configuration};

// Error handling types.
pub use loomwork_core::error;
pub use loomwork_core::state::State;
pub use loomwork_core::{ComponentError, ContainerError, ContainerErrorKind};

// The lifecycle_listener macro and the IoC container surface macro-generated
// code and embedders both depend on.
pub use loomwork_ioc::lifecycle_listener;
pub use loomwork_ioc::{
    ComponentDefinition, ComponentFactory, ComponentInitializer, ComponentInstance,
    ComponentScope, ConfigLookup, ConfigPointDef, Container, ContainerLifecycleEvent, Injectable,
    LifecycleEventPublisher, LifecycleHookDefinition,
};

// Application context: configuration, profiles, events, built container.
pub use loomwork_context::{
    config, event, ApplicationContext, Bundle, ContextBuilder, ContextError, ContextResult,
    TypeIdBundle,
};
