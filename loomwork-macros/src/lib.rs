//! Loomwork Procedural Macros
//!
//! This crate provides the procedural macros that power loomwork's
//! declarative, annotation-driven dependency injection model: discovering
//! components, wiring their dependencies, coercing configuration values, and
//! registering lifecycle hooks.
//!
//! # Macros
//!
//! * `#[derive(Component)]` - implements `ComponentInitializer`/`Injectable` and registers the component
//! * `#[derive(Configuration)]` - binds a struct to a configuration file section
//! * `#[loomwork::hooks]` - scans an `impl` block for `#[lifecycle_hook(state = "...")]` methods
//!
//! # Attributes
//!
//! * `#[autowired]` - marks a field for automatic dependency injection
//! * `#[component]` - provides component configuration options (scope, inject keys)
//! * `#[config]` - binds a field to a configuration key with a string default
//! * `#[configuration("...")]` - names the configuration section a `Configuration` struct reads
//! * `#[lifecycle_hook(state = "...")]` - marks a method as a hook run before the component reaches that state
//!
//! # Examples
//!
//! ```rust
//! use loomwork::Component;
//! use std::sync::Arc;
//!
//! #[derive(Component)]
//! struct DatabaseService {
//!     connection_string: String,
//! }
//!
//! #[derive(Component)]
//! struct UserService {
//!     #[autowired]
//!     db: Arc<DatabaseService>,
//!     cache_size: usize,
//! }
//! ```
//!
//! The `#[derive(Component)]` macro will:
//!
//! 1. Generate an implementation of `ComponentInitializer` and `Injectable`
//! 2. Register the component with the global component registry
//! 3. Automatically handle dependency injection for `#[autowired]` fields
//! 4. Coerce `#[config]` fields from the container's configuration source
//! 5. Initialize remaining fields using `Default::default()` or `None` for `Option<T>`

mod component;
mod configuration;
mod hook;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

/// Derive macro for automatic component registration and dependency injection.
///
/// See the crate-level documentation for attribute details.
#[proc_macro_derive(Component, attributes(component, autowired, config))]
pub fn component_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    component::impl_component_derive(&ast).into()
}

/// Derive macro binding a struct to a named configuration section.
///
/// Every field must be `Option<T>` for some `T: ConfigCoerce`; `#[config_default(...)]`
/// or `#[config_default_t(...)]` supply a fallback used when the key is absent or does
/// not parse.
#[proc_macro_derive(Configuration, attributes(configuration, config_default, config_default_t))]
pub fn configuration_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    configuration::impl_configuration_derive(&ast).into()
}

/// Attribute macro applied to an `impl Type { ... }` block. Scans for methods
/// marked `#[lifecycle_hook(state = "...")]`, strips the marker, and registers
/// each as a `LifecycleHookDefinition` run just before the owning component
/// reaches `state`.
///
/// ```rust,ignore
/// #[loomwork::hooks]
/// impl DatabaseService {
///     #[lifecycle_hook(state = "Started")]
///     fn on_started(&self) -> Result<(), loomwork::ComponentError> {
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn hooks(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_impl = parse_macro_input!(item as ItemImpl);
    hook::impl_hooks_attribute(item_impl).into()
}
