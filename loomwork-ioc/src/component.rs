//! Component definition and initialization system
//!
//! This module provides the core abstractions for defining and initializing components
//! in the IoC container: component scopes, dependency declarations (with their minimum
//! required state), configuration points, inject-keys, and the lifecycle hook registry.
//! Together these make up the "reflection adapter" — the compile-time descriptor table
//! that stands in for the runtime introspection a language like Rust does not provide.

pub mod factory;

use loomwork_core::error::component::ComponentError;
use loomwork_core::state::State;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type alias for component instances stored in the container
///
/// All components are stored as `Arc<dyn Any + Send + Sync>` to enable
/// type-safe downcasting while maintaining thread safety.
pub type ComponentInstance = Arc<dyn Any + Send + Sync>;

/// Read-only access to bound configuration values, supplied to a component's
/// creator function at instantiation time.
///
/// Defined here (rather than pulling in `loomwork-context`'s `ConfigManager`
/// directly) so the IoC layer does not depend on the configuration layer —
/// `loomwork-context` depends on `loomwork-ioc`, not the other way around.
/// `loomwork-context::config::ConfigManager` implements this trait.
pub trait ConfigLookup: Send + Sync {
    /// Returns the effective raw string value for `key`, with whatever
    /// source precedence the implementation applies already resolved, or
    /// `None` if no source has a value for it.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// A [`ConfigLookup`] with no values at all, for building containers that
/// have no configuration points (tests, minimal examples).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConfig;

impl ConfigLookup for NoConfig {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Enumeration of component lifecycle scopes
///
/// * `Singleton` - Only one instance of the component exists for the life of the container.
/// * `Prototype` - A new instance is created each time the component is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentScope {
    Singleton,
    Prototype,
}

/// A declared configuration point on a component: a field name and its
/// fallback default string, used purely for introspection — the actual
/// coercion happens inside the macro-generated `creator` function, which has
/// compile-time knowledge of the field's declared scalar type.
#[derive(Debug, Clone, Copy)]
pub struct ConfigPointDef {
    pub name: &'static str,
    pub default: &'static str,
}

/// Definition structure for registering components with the container
///
/// `ComponentDefinition` contains all the metadata and factory functions needed
/// to create and manage component instances. This structure is generated by the
/// `#[derive(Component)]` macro but can also be created manually.
#[derive(Debug)]
pub struct ComponentDefinition {
    /// Function that returns the TypeId of the component
    pub type_id: fn() -> TypeId,
    /// Human-readable name of the component type; also its own concrete
    /// registry key.
    pub type_name: &'static str,
    /// Function that returns the component's scope
    pub scope: fn() -> ComponentScope,
    /// The component's injection-point dependencies, each with the minimum
    /// state its provider must have reached (`Created` if undeclared).
    pub dependencies: fn() -> Vec<(TypeId, State)>,
    /// Additional inject-keys this type should register under, and whether
    /// each registration clears the key's prior entries (`overwrite`).
    pub keys: fn() -> Vec<(&'static str, bool)>,
    /// The component's declared configuration points, for introspection.
    pub config_points: fn() -> Vec<ConfigPointDef>,
    /// Function that creates an instance given its resolved dependencies and
    /// a configuration source for any `#[config]` fields.
    pub creator: fn(
        deps: &HashMap<TypeId, ComponentInstance>,
        config: &dyn ConfigLookup,
    ) -> Result<ComponentInstance, ComponentError>,
}

inventory::collect!(ComponentDefinition);

/// A lifecycle hook: a method on a component annotated with the state it
/// should run before. Registered independently of `ComponentDefinition`
/// because hooks live on `impl` blocks, which `#[derive(Component)]` cannot
/// see; `#[lifecycle_hook(state = "...")]` submits one of these per method.
pub struct LifecycleHookDefinition {
    /// TypeId of the component the hook belongs to.
    pub owner: fn() -> TypeId,
    pub owner_name: &'static str,
    pub hook_name: &'static str,
    /// The state this hook runs before the node may advance past.
    pub target_state: State,
    /// The hook's own parameter dependencies (beyond `&self`), each with its
    /// with-state requirement.
    pub dependencies: fn() -> Vec<(TypeId, State)>,
    /// Downcasts `self` to the owning type and invokes the hook, resolving
    /// each parameter from `deps`.
    pub invoke: fn(
        instance: &ComponentInstance,
        deps: &HashMap<TypeId, ComponentInstance>,
    ) -> Result<(), ComponentError>,
}

inventory::collect!(LifecycleHookDefinition);

/// Trait for components that can be automatically initialized by the container
///
/// Implemented by the `#[derive(Component)]` macro, but can be implemented
/// manually for custom component initialization logic.
pub trait ComponentInitializer: Sized {
    /// The type representing this component's dependencies (a tuple of `Arc<T>`s).
    type Dependencies;

    /// Creates a new instance of the component with the provided dependencies.
    fn __new(deps: Self::Dependencies) -> Self;

    /// Returns the scope for this component type.
    fn __scope() -> ComponentScope;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct SimpleComponent {
        value: i32,
    }

    #[derive(Debug)]
    struct ComponentWithDependencies {
        simple: Arc<SimpleComponent>,
        message: String,
    }

    impl ComponentInitializer for SimpleComponent {
        type Dependencies = ();

        fn __new(_deps: Self::Dependencies) -> Self {
            SimpleComponent { value: 42 }
        }

        fn __scope() -> ComponentScope {
            ComponentScope::Singleton
        }
    }

    impl ComponentInitializer for ComponentWithDependencies {
        type Dependencies = (Arc<SimpleComponent>,);

        fn __new(deps: Self::Dependencies) -> Self {
            let (simple,) = deps;
            ComponentWithDependencies {
                simple,
                message: "Hello".to_string(),
            }
        }

        fn __scope() -> ComponentScope {
            ComponentScope::Prototype
        }
    }

    #[test]
    fn test_component_scope() {
        assert_eq!(ComponentScope::Singleton, ComponentScope::Singleton);
        assert_ne!(ComponentScope::Singleton, ComponentScope::Prototype);
    }

    #[test]
    fn test_simple_component_initializer() {
        let component = SimpleComponent::__new(());
        assert_eq!(component.value, 42);
        assert_eq!(SimpleComponent::__scope(), ComponentScope::Singleton);
    }

    #[test]
    fn test_component_with_dependencies_initializer() {
        let simple_component = Arc::new(SimpleComponent { value: 100 });
        let deps = (simple_component.clone(),);

        let component = ComponentWithDependencies::__new(deps);
        assert_eq!(component.simple.value, 100);
        assert_eq!(component.message, "Hello");
        assert_eq!(ComponentWithDependencies::__scope(), ComponentScope::Prototype);
    }

    #[test]
    fn test_component_definition_structure() {
        let definition = ComponentDefinition {
            type_id: || TypeId::of::<SimpleComponent>(),
            type_name: "SimpleComponent",
            scope: || ComponentScope::Singleton,
            dependencies: || vec![],
            keys: || vec![],
            config_points: || vec![],
            creator: |deps, _config| {
                assert!(deps.is_empty());
                let instance = SimpleComponent::__new(());
                Ok(Arc::new(instance) as ComponentInstance)
            },
        };

        assert_eq!((definition.type_id)(), TypeId::of::<SimpleComponent>());
        assert_eq!(definition.type_name, "SimpleComponent");
        assert_eq!((definition.scope)(), ComponentScope::Singleton);
        assert!((definition.dependencies)().is_empty());

        let result = (definition.creator)(&HashMap::new(), &NoConfig);
        assert!(result.is_ok());
    }

    #[test]
    fn test_component_instance_downcast() {
        let simple_component = SimpleComponent { value: 123 };
        let instance: ComponentInstance = Arc::new(simple_component);

        let downcasted = instance.downcast::<SimpleComponent>();
        assert!(downcasted.is_ok());
        assert_eq!(downcasted.unwrap().value, 123);
    }

    #[test]
    fn test_component_definition_with_dependencies() {
        let definition = ComponentDefinition {
            type_id: || TypeId::of::<ComponentWithDependencies>(),
            type_name: "ComponentWithDependencies",
            scope: || ComponentScope::Prototype,
            dependencies: || vec![(TypeId::of::<SimpleComponent>(), State::Created)],
            keys: || vec![],
            config_points: || vec![],
            creator: |deps, _config| {
                let simple_dep = deps
                    .get(&TypeId::of::<SimpleComponent>())
                    .ok_or_else(|| ComponentError::DependencyNotFound("SimpleComponent".to_string()))?
                    .clone()
                    .downcast::<SimpleComponent>()
                    .map_err(|_| ComponentError::DowncastFailed("SimpleComponent".to_string()))?;

                let instance = ComponentWithDependencies::__new((simple_dep,));
                Ok(Arc::new(instance) as ComponentInstance)
            },
        };

        assert_eq!(
            (definition.dependencies)(),
            vec![(TypeId::of::<SimpleComponent>(), State::Created)]
        );

        let mut deps = HashMap::new();
        let simple_instance: ComponentInstance = Arc::new(SimpleComponent { value: 999 });
        deps.insert(TypeId::of::<SimpleComponent>(), simple_instance);

        let result = (definition.creator)(&deps, &NoConfig);
        assert!(result.is_ok());

        let component_instance = result.unwrap();
        let downcasted = component_instance
            .downcast::<ComponentWithDependencies>()
            .unwrap();
        assert_eq!(downcasted.simple.value, 999);
        assert_eq!(downcasted.message, "Hello");
    }

    #[test]
    fn test_component_definition_creator_missing_dependency() {
        let creator_fn = |deps: &HashMap<TypeId, ComponentInstance>, _config: &dyn ConfigLookup| {
            let _simple_dep = deps
                .get(&TypeId::of::<SimpleComponent>())
                .ok_or_else(|| ComponentError::DependencyNotFound("SimpleComponent".to_string()))?;
            Ok(Arc::new(ComponentWithDependencies {
                simple: Arc::new(SimpleComponent { value: 0 }),
                message: "test".to_string(),
            }) as ComponentInstance)
        };

        let result = creator_fn(&HashMap::new(), &NoConfig);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ComponentError::DependencyNotFound(_)));
    }
}
