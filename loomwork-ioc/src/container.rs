//! The IoC container: discovers every `#[derive(Component)]` type via
//! `inventory`, constructs instances in dependency order, advances them
//! through the staged lifecycle, and exposes the read-only lookup surface
//! embedders query afterwards.

use crate::component::{
    ComponentDefinition, ComponentInstance, ComponentScope, ConfigLookup, LifecycleHookDefinition,
    NoConfig,
};
use crate::component::factory::ComponentFactory;
use crate::event::{ContainerLifecycleEvent, LifecycleEventPublisher};
use crate::graph::{DependencyGraph, Edge, Node};
use crate::lifecycle::{self, HooksByState};
use crate::registry::Registry;
use dashmap::DashMap;
use loomwork_core::error::container::ContainerError;
use loomwork_core::state::State;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// A caller-owned type whose `#[autowired]` fields a container can populate
/// after the fact, via [`Container::inject`]. Implemented by the
/// `#[derive(Component)]` macro for every annotated struct.
pub trait Injectable {
    fn inject_fields(&mut self, container: &Container);
}

/// The immutable, built IoC container.
///
/// Once [`Container::build`] returns successfully every managed node has
/// reached [`State::Started`]; the only further state transition available
/// is [`Container::stop`], which drives every node to [`State::Stopped`].
pub struct Container {
    graph: DependencyGraph,
    key_index: HashMap<String, Vec<TypeId>>,
    hooks: HashMap<TypeId, HooksByState>,
    deps_by_node: HashMap<TypeId, HashMap<TypeId, ComponentInstance>>,
    /// Instances registered directly (not discovered via `inventory`), kept
    /// outside the managed lifecycle graph — used for test fixtures and for
    /// externally-constructed singletons the builder façade hands in.
    manual: DashMap<TypeId, ComponentInstance>,
    lifecycle_publisher: Arc<LifecycleEventPublisher>,
}

impl Container {
    /// An empty container with nothing discovered or started. Useful for
    /// tests that only need [`Container::register_component`].
    pub fn empty() -> Self {
        Self {
            graph: DependencyGraph::default(),
            key_index: HashMap::new(),
            hooks: HashMap::new(),
            deps_by_node: HashMap::new(),
            manual: DashMap::new(),
            lifecycle_publisher: Arc::new(LifecycleEventPublisher::new()),
        }
    }

    /// Discovers every registered component type, constructs instances in
    /// dependency order, and advances the whole graph to `Started`.
    ///
    /// `extra_keys` carries the builder façade's explicit `put(key, type)`
    /// calls, applied on top of each type's own `#[component(inject_key = ..)]`
    /// declarations.
    pub fn build(
        config: &dyn ConfigLookup,
        extra_keys: &[(TypeId, &str, bool)],
    ) -> Result<Self, ContainerError> {
        let publisher = Arc::new(LifecycleEventPublisher::new());

        let mut def_map: HashMap<TypeId, &'static ComponentDefinition> = HashMap::new();
        let mut registry = Registry::new();
        for def in inventory::iter::<ComponentDefinition> {
            let type_id = (def.type_id)();
            def_map.insert(type_id, def);
            registry.put(type_id, def.type_name, (def.keys)());
        }
        for &(type_id, key, overwrite) in extra_keys {
            registry.add_key(type_id, key, overwrite);
        }

        let component_count = def_map.len();
        publisher.publish(&ContainerLifecycleEvent::BuildStarted { component_count });

        let (order, key_index) = registry.finalize();

        let mut instances: HashMap<TypeId, ComponentInstance> = HashMap::new();
        let mut deps_by_node: HashMap<TypeId, HashMap<TypeId, ComponentInstance>> = HashMap::new();
        let mut creating: HashSet<TypeId> = HashSet::new();
        let mut creation_order: Vec<(TypeId, &'static str)> = Vec::new();
        let mut edges: Vec<Edge> = Vec::new();
        let build_start = Instant::now();

        for (type_id, _name) in &order {
            create_recursive(
                *type_id,
                &def_map,
                config,
                &mut instances,
                &mut deps_by_node,
                &mut creating,
                &mut creation_order,
                &mut edges,
                &publisher,
            )?;
        }

        let hooks = lifecycle::group_hooks(inventory::iter::<LifecycleHookDefinition>());
        for hook in inventory::iter::<LifecycleHookDefinition> {
            let owner = (hook.owner)();
            for (dep, min_state) in (hook.dependencies)() {
                edges.push(Edge {
                    from: owner,
                    to: dep,
                    min_state,
                });
            }
        }

        let nodes = creation_order
            .into_iter()
            .map(|(type_id, name)| Node::new(type_id, name, instances[&type_id].clone()))
            .collect::<Vec<_>>();
        let graph = DependencyGraph::new(nodes, edges);

        lifecycle::start(&graph, &hooks, &deps_by_node)?;

        let container = Self {
            graph,
            key_index,
            hooks,
            deps_by_node,
            manual: DashMap::new(),
            lifecycle_publisher: publisher,
        };

        container
            .lifecycle_publisher
            .publish(&ContainerLifecycleEvent::BuildCompleted {
                container: &container,
                component_count,
                duration: build_start.elapsed(),
            });

        Ok(container)
    }

    /// Drives every managed node to [`State::Stopped`], in reverse creation
    /// order (see `crate::lifecycle::stop`).
    pub fn stop(&self) -> Result<(), ContainerError> {
        let start = Instant::now();
        lifecycle::stop(&self.graph, &self.hooks, &self.deps_by_node)?;
        self.lifecycle_publisher
            .publish(&ContainerLifecycleEvent::ShutdownCompleted {
                container: self,
                component_count: self.graph.nodes.len(),
                duration: start.elapsed(),
            });
        Ok(())
    }

    /// Registers a pre-created instance outside the managed lifecycle graph.
    pub fn register_component(&self, instance: ComponentInstance) {
        let type_id = (*instance).type_id();
        self.register_component_by_type_id(type_id, instance);
    }

    pub fn register_component_by_type_id(&self, type_id: TypeId, instance: ComponentInstance) {
        self.manual.insert(type_id, instance);
    }

    fn node_for(&self, type_id: TypeId) -> Option<&Node> {
        self.graph.node_index(type_id).map(|idx| &self.graph.nodes[idx])
    }

    /// `get(U)`: the managed or manually-registered instance of exactly `T`,
    /// if one exists.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get_component_by_type_id(TypeId::of::<T>())?
            .downcast::<T>()
            .ok()
    }

    /// `getOrThrow(U)`.
    pub fn get_or_throw<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ContainerError> {
        self.get::<T>()
            .ok_or_else(|| ContainerError::missing_implementation(std::any::type_name::<T>()))
    }

    /// `get(key)`: the head instance registered under `key`.
    pub fn get_by_key_any(&self, key: &str) -> Option<ComponentInstance> {
        let candidates = self.key_index.get(key)?;
        let head = candidates.first()?;
        self.get_component_by_type_id(*head)
    }

    /// `get(key)` downcast to `T`.
    pub fn get_by_key<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get_by_key_any(key)?.downcast::<T>().ok()
    }

    /// `stream(key)`: every instance registered under `key`, head first.
    pub fn stream_by_key(&self, key: &str) -> Vec<ComponentInstance> {
        match self.key_index.get(key) {
            Some(candidates) => candidates
                .iter()
                .filter_map(|id| self.get_component_by_type_id(*id))
                .collect(),
            None => Vec::new(),
        }
    }

    /// `injectables()`: every managed type, in creation order.
    pub fn injectables(&self) -> impl Iterator<Item = (TypeId, &'static str)> + '_ {
        self.graph.nodes.iter().map(|n| (n.type_id, n.type_name))
    }

    /// `inject(externalInstance)`: populates `target`'s `#[autowired]` fields
    /// from this container's managed instances.
    pub fn inject<T: Injectable>(&self, target: &mut T) {
        target.inject_fields(self);
    }
}

impl ComponentFactory for Container {
    fn get_component_by_type_id(&self, type_id: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        if let Some(node) = self.node_for(type_id) {
            return Some(node.instance.clone());
        }
        self.manual.get(&type_id).map(|entry| entry.clone())
    }

    fn get_component<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get::<T>()
    }
}

#[allow(clippy::too_many_arguments)]
fn create_recursive(
    type_id: TypeId,
    def_map: &HashMap<TypeId, &'static ComponentDefinition>,
    config: &dyn ConfigLookup,
    instances: &mut HashMap<TypeId, ComponentInstance>,
    deps_by_node: &mut HashMap<TypeId, HashMap<TypeId, ComponentInstance>>,
    creating: &mut HashSet<TypeId>,
    creation_order: &mut Vec<(TypeId, &'static str)>,
    edges: &mut Vec<Edge>,
    publisher: &LifecycleEventPublisher,
) -> Result<(), ContainerError> {
    if instances.contains_key(&type_id) {
        return Ok(());
    }

    let def = *def_map
        .get(&type_id)
        .ok_or_else(|| ContainerError::not_found(format!("no component definition for {type_id:?}")))?;

    if !creating.insert(type_id) {
        return Err(ContainerError::circular_dependency(def.type_name));
    }

    let declared_deps = (def.dependencies)();
    let mut deps_map = HashMap::new();
    for (dep_id, min_state) in &declared_deps {
        create_recursive(
            *dep_id, def_map, config, instances, deps_by_node, creating, creation_order, edges,
            publisher,
        )?;
        deps_map.insert(*dep_id, instances[dep_id].clone());
        edges.push(Edge {
            from: type_id,
            to: *dep_id,
            min_state: *min_state,
        });
    }

    let start = Instant::now();
    let instance = (def.creator)(&deps_map, config).map_err(|e| {
        ContainerError::creation_failed(format!("failed to create '{}': {e}", def.type_name))
    })?;
    let creation_duration = start.elapsed();

    creating.remove(&type_id);
    instances.insert(type_id, instance);
    deps_by_node.insert(type_id, deps_map);
    creation_order.push((type_id, def.type_name));

    tracing::debug!(
        component = def.type_name,
        duration_us = creation_duration.as_micros() as u64,
        "created component instance"
    );
    publisher.publish(&ContainerLifecycleEvent::ComponentCreated {
        component_name: def.type_name,
        component_type_id: type_id,
        creation_duration,
    });

    // Prototype-scoped components still get a single managed node here: the
    // lifecycle engine and lookups operate on the container's own instance
    // set, matching the teacher's model where `initialize()` only manages
    // the long-lived graph and prototype re-instantiation happens elsewhere.
    let _ = (def.scope)() == ComponentScope::Prototype;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentInitializer, ConfigPointDef, NoConfig};

    #[derive(Debug)]
    struct Leaf {
        value: u32,
    }

    #[derive(Debug)]
    struct Branch {
        leaf: Arc<Leaf>,
    }

    impl ComponentInitializer for Leaf {
        type Dependencies = ();
        fn __new(_deps: ()) -> Self {
            Leaf { value: 7 }
        }
        fn __scope() -> ComponentScope {
            ComponentScope::Singleton
        }
    }

    impl ComponentInitializer for Branch {
        type Dependencies = (Arc<Leaf>,);
        fn __new(deps: (Arc<Leaf>,)) -> Self {
            Branch { leaf: deps.0 }
        }
        fn __scope() -> ComponentScope {
            ComponentScope::Singleton
        }
    }

    fn leaf_def() -> ComponentDefinition {
        ComponentDefinition {
            type_id: || TypeId::of::<Leaf>(),
            type_name: "Leaf",
            scope: || ComponentScope::Singleton,
            dependencies: || vec![],
            keys: || vec![],
            config_points: || Vec::<ConfigPointDef>::new(),
            creator: |_deps, _config| Ok(Arc::new(Leaf::__new(())) as ComponentInstance),
        }
    }

    fn branch_def() -> ComponentDefinition {
        ComponentDefinition {
            type_id: || TypeId::of::<Branch>(),
            type_name: "Branch",
            scope: || ComponentScope::Singleton,
            dependencies: || vec![(TypeId::of::<Leaf>(), State::Created)],
            keys: || vec![],
            config_points: || Vec::<ConfigPointDef>::new(),
            creator: |deps, _config| {
                let leaf = deps[&TypeId::of::<Leaf>()].clone().downcast::<Leaf>().unwrap();
                Ok(Arc::new(Branch::__new((leaf,))) as ComponentInstance)
            },
        }
    }

    #[test]
    fn empty_container_has_no_instances() {
        let container = Container::empty();
        assert!(container.get::<Leaf>().is_none());
    }

    #[test]
    fn manual_registration_is_retrievable() {
        let container = Container::empty();
        container.register_component(Arc::new(Leaf { value: 99 }));
        let retrieved = container.get::<Leaf>().unwrap();
        assert_eq!(retrieved.value, 99);
    }

    #[test]
    fn create_recursive_wires_a_dependency_chain() {
        let leaf = leaf_def();
        let branch = branch_def();
        let mut def_map: HashMap<TypeId, &'static ComponentDefinition> = HashMap::new();
        // Leak to get 'static refs, mirroring how `inventory` hands out
        // references to statically-submitted definitions.
        let leaf: &'static ComponentDefinition = Box::leak(Box::new(leaf));
        let branch: &'static ComponentDefinition = Box::leak(Box::new(branch));
        def_map.insert((leaf.type_id)(), leaf);
        def_map.insert((branch.type_id)(), branch);

        let mut instances = HashMap::new();
        let mut deps_by_node = HashMap::new();
        let mut creating = HashSet::new();
        let mut creation_order = Vec::new();
        let mut edges = Vec::new();
        let publisher = LifecycleEventPublisher::new();

        create_recursive(
            (branch.type_id)(),
            &def_map,
            &NoConfig,
            &mut instances,
            &mut deps_by_node,
            &mut creating,
            &mut creation_order,
            &mut edges,
            &publisher,
        )
        .unwrap();

        assert_eq!(creation_order.len(), 2);
        assert_eq!(creation_order[0].1, "Leaf");
        assert_eq!(creation_order[1].1, "Branch");

        let branch_instance = instances[&(branch.type_id)()]
            .clone()
            .downcast::<Branch>()
            .unwrap();
        assert_eq!(branch_instance.leaf.value, 7);
    }
}
