use crate::error::container::{ContainerError, ContainerErrorKind};
use std::fmt;

/// The error surfaced to and from component constructors and lifecycle
/// hooks. Kept deliberately flat (one variant per failure taxonomy entry)
/// rather than wrapping `ContainerError` directly, so hook bodies written in
/// terms of a single component never need to know about the container's
/// internals.
#[derive(Debug)]
pub enum ComponentError {
    DependencyNotFound(String),
    DowncastFailed(String),
    CircularDependency(String),
    ConfigurationError(String),
    CreationError(String),
    NotFound(String),
    NoDefaultConstructor(String),
    MissingImplementation(String),
    ConfigurationCoercion(String),
    StuckGraph(String),
    HookInvocation(String),
    CyclicReference(String),
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::DependencyNotFound(s) => write!(f, "Dependency '{}' not found", s),
            ComponentError::DowncastFailed(s) => write!(f, "Failed to downcast dependency '{}'", s),
            ComponentError::CircularDependency(s) => {
                write!(f, "Circular dependency detected: {}", s)
            }
            ComponentError::ConfigurationError(s) => write!(f, "Configuration error: {}", s),
            ComponentError::CreationError(s) => write!(f, "Component creation error: {}", s),
            ComponentError::NotFound(s) => write!(f, "Component not found: {}", s),
            ComponentError::NoDefaultConstructor(s) => write!(f, "No default constructor: {}", s),
            ComponentError::MissingImplementation(s) => write!(f, "Missing implementation: {}", s),
            ComponentError::ConfigurationCoercion(s) => {
                write!(f, "Configuration coercion failed: {}", s)
            }
            ComponentError::StuckGraph(s) => write!(f, "Stuck dependency graph: {}", s),
            ComponentError::HookInvocation(s) => {
                write!(f, "Lifecycle hook invocation failed: {}", s)
            }
            ComponentError::CyclicReference(s) => write!(f, "Cyclic reference: {}", s),
        }
    }
}

impl std::error::Error for ComponentError {}

impl From<ContainerError> for ComponentError {
    fn from(err: ContainerError) -> Self {
        match err.kind {
            ContainerErrorKind::NotFound => ComponentError::NotFound(err.message),
            ContainerErrorKind::CircularDependency => {
                ComponentError::CircularDependency(err.message)
            }
            ContainerErrorKind::CreationFailed => ComponentError::CreationError(err.message),
            ContainerErrorKind::TypeCastFailed => ComponentError::DowncastFailed(err.message),
            ContainerErrorKind::Configuration => ComponentError::ConfigurationError(err.message),
            ContainerErrorKind::NoDefaultConstructor => {
                ComponentError::NoDefaultConstructor(err.message)
            }
            ContainerErrorKind::MissingImplementation => {
                ComponentError::MissingImplementation(err.message)
            }
            ContainerErrorKind::ConfigurationCoercion => {
                ComponentError::ConfigurationCoercion(err.message)
            }
            ContainerErrorKind::StuckGraph => ComponentError::StuckGraph(err.message),
            ContainerErrorKind::HookInvocation => ComponentError::HookInvocation(err.message),
            ContainerErrorKind::CyclicReference => ComponentError::CyclicReference(err.message),
            ContainerErrorKind::Other => ComponentError::CreationError(err.message),
        }
    }
}

impl From<ComponentError> for ContainerError {
    fn from(err: ComponentError) -> Self {
        match err {
            ComponentError::NotFound(msg) => ContainerError::not_found(msg),
            ComponentError::CircularDependency(msg) => ContainerError::circular_dependency(msg),
            ComponentError::CreationError(msg) => ContainerError::creation_failed(msg),
            ComponentError::DowncastFailed(msg) => ContainerError::type_cast_failed(msg),
            ComponentError::ConfigurationError(msg) => ContainerError::configuration(msg),
            ComponentError::DependencyNotFound(msg) => {
                ContainerError::not_found(format!("Dependency: {}", msg))
            }
            ComponentError::NoDefaultConstructor(msg) => {
                ContainerError::no_default_constructor(msg)
            }
            ComponentError::MissingImplementation(msg) => {
                ContainerError::missing_implementation(msg)
            }
            ComponentError::ConfigurationCoercion(msg) => {
                ContainerError::configuration_coercion(msg)
            }
            ComponentError::StuckGraph(msg) => {
                ContainerError::new(ContainerErrorKind::StuckGraph, msg)
            }
            ComponentError::HookInvocation(msg) => ContainerError::hook_invocation(msg),
            ComponentError::CyclicReference(msg) => ContainerError::cyclic_reference(msg),
        }
    }
}
