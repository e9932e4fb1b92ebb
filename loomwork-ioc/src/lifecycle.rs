//! The lifecycle engine: drives every node from `Created` to `Started` at
//! build time, and from its current state to `Stopped` at teardown,
//! invoking the registered hooks for each state in turn.

use loomwork_core::error::container::ContainerError;
use loomwork_core::state::{State, START_TARGETS};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use crate::component::{ComponentInstance, LifecycleHookDefinition};
use crate::graph::DependencyGraph;

/// Hooks for a single component, grouped by the state they run before.
pub type HooksByState = HashMap<State, Vec<&'static LifecycleHookDefinition>>;

/// Groups every registered [`LifecycleHookDefinition`] by owner and target state.
pub fn group_hooks(
    defs: impl Iterator<Item = &'static LifecycleHookDefinition>,
) -> HashMap<TypeId, HooksByState> {
    let mut grouped: HashMap<TypeId, HooksByState> = HashMap::new();
    for def in defs {
        grouped
            .entry((def.owner)())
            .or_default()
            .entry(def.target_state)
            .or_default()
            .push(def);
    }
    grouped
}

/// Drives `graph` forward through `Initialized -> Resolved -> Started`,
/// running hooks for each state as nodes become ready, per spec.md §4.5's
/// start algorithm.
pub fn start(
    graph: &DependencyGraph,
    hooks: &HashMap<TypeId, HooksByState>,
    deps_by_node: &HashMap<TypeId, HashMap<TypeId, ComponentInstance>>,
) -> Result<(), ContainerError> {
    for &target in &START_TARGETS {
        loop {
            let mut progressed = false;
            let mut any_below_target = false;

            for node in &graph.nodes {
                if node.state() >= target {
                    continue;
                }
                any_below_target = true;

                let next = match node.state().next() {
                    Some(s) => s,
                    None => continue,
                };

                if !graph.is_ready(node.type_id) {
                    continue;
                }

                run_hooks_for(node.type_id, node.type_name, next, hooks, deps_by_node, &node.instance)?;
                node.set_state(next);
                tracing::debug!(component = node.type_name, state = %next, "advanced lifecycle state");
                progressed = true;
            }

            if !any_below_target {
                break;
            }
            if !progressed {
                let stalled = graph
                    .nodes
                    .iter()
                    .filter(|n| n.state() < target)
                    .map(|n| (n.type_name.to_string(), n.state()))
                    .collect::<Vec<_>>();
                return Err(ContainerError::stuck_graph(&stalled));
            }
        }
    }
    Ok(())
}

/// Drives every node from its current state to `Stopped`.
///
/// spec.md §9 leaves the shutdown order an open question; this workspace
/// stops nodes in **reverse creation order** (dependents before their
/// dependencies) rather than the forward order used for startup, since a
/// dependency being torn down while a live dependent still holds a
/// reference to it is the more surprising failure mode. This is a
/// documented deviation, not a literal reading of "the same direction used
/// for startup" (see DESIGN.md "shutdown order").
pub fn stop(
    graph: &DependencyGraph,
    hooks: &HashMap<TypeId, HooksByState>,
    deps_by_node: &HashMap<TypeId, HashMap<TypeId, ComponentInstance>>,
) -> Result<(), ContainerError> {
    loop {
        let mut progressed = false;
        let mut any_unstopped = false;

        for node in graph.nodes.iter().rev() {
            if node.state() == State::Stopped {
                continue;
            }
            any_unstopped = true;

            if !stop_ready(graph, node.type_id) {
                continue;
            }

            run_hooks_for(
                node.type_id,
                node.type_name,
                State::Stopped,
                hooks,
                deps_by_node,
                &node.instance,
            )?;
            node.set_state(State::Stopped);
            tracing::debug!(component = node.type_name, "stopped");
            progressed = true;
        }

        if !any_unstopped {
            break;
        }
        if !progressed {
            let stalled = graph
                .nodes
                .iter()
                .filter(|n| n.state() != State::Stopped)
                .map(|n| (n.type_name.to_string(), n.state()))
                .collect::<Vec<_>>();
            return Err(ContainerError::stuck_graph(&stalled));
        }
    }
    Ok(())
}

/// Readiness for the `Stopped` transition: every node this one depends on
/// that has *already* been asked to stop this round must itself be
/// `Stopped` first — mirrors `is_ready` but only constrains against peers
/// that are mid-shutdown, since a fully running dependency is a legal
/// target during reverse-order shutdown.
fn stop_ready(graph: &DependencyGraph, type_id: TypeId) -> bool {
    let dependents: HashSet<TypeId> = graph
        .edges
        .iter()
        .filter(|e| e.to == type_id)
        .map(|e| e.from)
        .collect();

    dependents.iter().all(|dependent| {
        graph
            .node_index(*dependent)
            .map(|idx| graph.nodes[idx].state() == State::Stopped)
            .unwrap_or(true)
    })
}

fn run_hooks_for(
    type_id: TypeId,
    type_name: &'static str,
    state: State,
    hooks: &HashMap<TypeId, HooksByState>,
    deps_by_node: &HashMap<TypeId, HashMap<TypeId, ComponentInstance>>,
    instance: &ComponentInstance,
) -> Result<(), ContainerError> {
    let empty = HashMap::new();
    let deps = deps_by_node.get(&type_id).unwrap_or(&empty);

    if let Some(by_state) = hooks.get(&type_id) {
        if let Some(hook_list) = by_state.get(&state) {
            for hook in hook_list {
                tracing::debug!(
                    component = type_name,
                    hook = hook.hook_name,
                    target_state = %state,
                    "invoking lifecycle hook"
                );
                (hook.invoke)(instance, deps).map_err(|e| {
                    ContainerError::hook_invocation(format!(
                        "{type_name}::{}: {e}",
                        hook.hook_name
                    ))
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use std::sync::Arc;

    #[derive(Debug)]
    struct A;
    #[derive(Debug)]
    struct B;

    fn id<T: 'static>() -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn start_advances_independent_nodes_to_started() {
        let graph = DependencyGraph::new(
            vec![
                Node::new(id::<A>(), "A", Arc::new(A)),
                Node::new(id::<B>(), "B", Arc::new(B)),
            ],
            vec![],
        );

        start(&graph, &HashMap::new(), &HashMap::new()).unwrap();

        for node in &graph.nodes {
            assert_eq!(node.state(), State::Started);
        }
    }

    #[test]
    fn stop_drives_every_node_to_stopped() {
        let graph = DependencyGraph::new(
            vec![
                Node::new(id::<A>(), "A", Arc::new(A)),
                Node::new(id::<B>(), "B", Arc::new(B)),
            ],
            vec![],
        );
        for n in &graph.nodes {
            n.set_state(State::Started);
        }

        stop(&graph, &HashMap::new(), &HashMap::new()).unwrap();

        for node in &graph.nodes {
            assert_eq!(node.state(), State::Stopped);
        }
    }

    #[test]
    fn start_reports_stuck_graph_when_unsatisfiable() {
        // A depends on B at Started, B depends on A at Started: neither can
        // ever reach Started (classic S7 "stuck graph" scenario).
        let graph = DependencyGraph::new(
            vec![
                Node::new(id::<A>(), "A", Arc::new(A)),
                Node::new(id::<B>(), "B", Arc::new(B)),
            ],
            vec![
                Edge {
                    from: id::<A>(),
                    to: id::<B>(),
                    min_state: State::Started,
                },
                Edge {
                    from: id::<B>(),
                    to: id::<A>(),
                    min_state: State::Started,
                },
            ],
        );

        let result = start(&graph, &HashMap::new(), &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn start_permits_created_level_cycles_s2() {
        // A and B merely require each other to exist (Created), which is
        // satisfied immediately by "instantiate all, then wire" — this must
        // not be mistaken for a stuck graph.
        let graph = DependencyGraph::new(
            vec![
                Node::new(id::<A>(), "A", Arc::new(A)),
                Node::new(id::<B>(), "B", Arc::new(B)),
            ],
            vec![
                Edge {
                    from: id::<A>(),
                    to: id::<B>(),
                    min_state: State::Created,
                },
                Edge {
                    from: id::<B>(),
                    to: id::<A>(),
                    min_state: State::Created,
                },
            ],
        );

        start(&graph, &HashMap::new(), &HashMap::new()).unwrap();
        for node in &graph.nodes {
            assert_eq!(node.state(), State::Started);
        }
    }
}
