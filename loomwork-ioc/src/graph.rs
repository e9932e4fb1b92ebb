//! The dependency graph: one node per registered type, one edge per
//! injection field or lifecycle-hook parameter, each edge annotated with the
//! minimum state its target must have reached.

use loomwork_core::state::State;
use std::any::TypeId;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::component::ComponentInstance;

/// A directed dependency edge `from -> to`, requiring `to` to have reached
/// at least `min_state` before `from` may advance past whatever transition
/// this edge guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: TypeId,
    pub to: TypeId,
    pub min_state: State,
}

/// One instantiated component: its type, its instance, and its current
/// state. Created once in creation order and never destroyed before
/// `Stopped`.
pub struct Node {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub instance: ComponentInstance,
    state: AtomicU8,
}

impl Node {
    pub fn new(type_id: TypeId, type_name: &'static str, instance: ComponentInstance) -> Self {
        Self {
            type_id,
            type_name,
            instance,
            state: AtomicU8::new(State::Created as u8),
        }
    }

    pub fn state(&self) -> State {
        match self.state.load(Ordering::SeqCst) {
            0 => State::Created,
            1 => State::Initialized,
            2 => State::Resolved,
            3 => State::Started,
            _ => State::Stopped,
        }
    }

    pub fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("type_name", &self.type_name)
            .field("state", &self.state())
            .finish()
    }
}

/// The full dependency graph built from a finalized registry: one node per
/// type, in creation order, plus every injection/hook-parameter edge.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl DependencyGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node_index(&self, type_id: TypeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.type_id == type_id)
    }

    /// Edges originating from `type_id`.
    pub fn edges_from(&self, type_id: TypeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from == type_id)
    }

    /// A node `from` can advance past its current state iff every outgoing
    /// edge's target has reached at least `min_state` (spec.md §4.3
    /// Readiness).
    pub fn is_ready(&self, type_id: TypeId) -> bool {
        self.edges_from(type_id).all(|edge| {
            self.node_index(edge.to)
                .map(|idx| self.nodes[idx].state() >= edge.min_state)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug)]
    struct A;
    #[derive(Debug)]
    struct B;

    fn id<T: 'static>() -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn node_starts_created_and_transitions() {
        let node = Node::new(id::<A>(), "A", Arc::new(A));
        assert_eq!(node.state(), State::Created);
        node.set_state(State::Initialized);
        assert_eq!(node.state(), State::Initialized);
    }

    #[test]
    fn readiness_requires_target_min_state() {
        let graph = DependencyGraph::new(
            vec![
                Node::new(id::<A>(), "A", Arc::new(A)),
                Node::new(id::<B>(), "B", Arc::new(B)),
            ],
            vec![Edge {
                from: id::<A>(),
                to: id::<B>(),
                min_state: State::Started,
            }],
        );

        assert!(!graph.is_ready(id::<A>()));
        graph.nodes[1].set_state(State::Started);
        assert!(graph.is_ready(id::<A>()));
    }

    #[test]
    fn node_with_no_edges_is_always_ready() {
        let graph = DependencyGraph::new(vec![Node::new(id::<A>(), "A", Arc::new(A))], vec![]);
        assert!(graph.is_ready(id::<A>()));
    }
}
