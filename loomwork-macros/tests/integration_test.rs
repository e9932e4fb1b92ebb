use std::sync::Arc;
use loomwork::Component;
use loomwork::{ComponentInitializer, ComponentScope};

#[derive(Component, Debug)]
struct SimpleTestComponent {
    value: i32,
}

impl Default for SimpleTestComponent {
    fn default() -> Self {
        Self { value: 42 }
    }
}

#[derive(Component, Debug)]
struct ComponentWithDependency {
    #[autowired]
    dependency: Arc<SimpleTestComponent>,
    name: String,
}

impl Default for ComponentWithDependency {
    fn default() -> Self {
        Self {
            dependency: Arc::new(SimpleTestComponent::default()),
            name: "default".to_string(),
        }
    }
}

#[derive(Component, Debug)]
struct ComponentWithOptionalField {
    #[autowired]
    required_dep: Arc<SimpleTestComponent>,
    optional_field: Option<String>,
    default_field: i32,
}

impl Default for ComponentWithOptionalField {
    fn default() -> Self {
        Self {
            required_dep: Arc::new(SimpleTestComponent::default()),
            optional_field: None,
            default_field: 0,
        }
    }
}

#[test]
fn test_simple_component_derive() {
    let component = SimpleTestComponent::__new(());
    assert_eq!(component.value, 0);

    match SimpleTestComponent::__scope() {
        ComponentScope::Singleton => assert!(true),
        ComponentScope::Prototype => panic!("Expected Singleton scope"),
    }
}

#[test]
fn test_component_with_dependency() {
    let simple_comp = Arc::new(SimpleTestComponent { value: 100 });
    let deps = (simple_comp.clone(),);

    let component = ComponentWithDependency::__new(deps);
    assert_eq!(component.dependency.value, 100);
    assert_eq!(component.name, "");
}

#[test]
fn test_component_with_optional_field() {
    let simple_comp = Arc::new(SimpleTestComponent { value: 200 });
    let deps = (simple_comp.clone(),);

    let component = ComponentWithOptionalField::__new(deps);
    assert_eq!(component.required_dep.value, 200);
    assert!(component.optional_field.is_none());
    assert_eq!(component.default_field, 0);
}

#[test]
fn test_component_debug_trait() {
    let simple = SimpleTestComponent { value: 999 };
    let debug_str = format!("{:?}", simple);
    assert!(debug_str.contains("SimpleTestComponent"));
    assert!(debug_str.contains("999"));
}

#[test]
fn test_component_initializer_trait_bounds() {
    fn requires_component_initializer<T: ComponentInitializer>() {}

    requires_component_initializer::<SimpleTestComponent>();
    requires_component_initializer::<ComponentWithDependency>();
    requires_component_initializer::<ComponentWithOptionalField>();
}

#[test]
fn test_arc_dependency_type() {
    let simple_comp = Arc::new(SimpleTestComponent { value: 300 });
    let deps = (simple_comp.clone(),);

    let component = ComponentWithDependency::__new(deps);

    assert!(Arc::ptr_eq(&component.dependency, &simple_comp));
}

#[test]
fn test_multiple_dependencies() {
    #[derive(Component, Debug)]
    struct MultiDepComponent {
        #[autowired]
        dep1: Arc<SimpleTestComponent>,
        field1: String,
    }

    let simple_comp = Arc::new(SimpleTestComponent { value: 500 });
    let deps = (simple_comp.clone(),);

    let component = MultiDepComponent::__new(deps);
    assert_eq!(component.dep1.value, 500);
    assert_eq!(component.field1, "");
}

#[test]
fn test_component_scope_singleton() {
    #[derive(Component, Debug)]
    struct SingletonComponent {
        value: u32,
    }

    impl Default for SingletonComponent {
        fn default() -> Self {
            Self { value: 123 }
        }
    }

    match SingletonComponent::__scope() {
        ComponentScope::Singleton => assert!(true),
        ComponentScope::Prototype => panic!("Expected Singleton scope"),
    }
}
