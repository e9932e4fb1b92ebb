//! Container lifecycle event system
//!
//! This module provides a coarse-grained event system for monitoring container
//! build and teardown, layered on top of the fine-grained `tracing` events the
//! lifecycle engine emits for every state transition and hook invocation (see
//! `crate::lifecycle`). Event listeners are for embedders that want to react
//! to build milestones programmatically; `tracing` is for everything else.

use crate::container::Container;
use std::any::TypeId;
use std::time::Duration;

/// Container lifecycle events enumeration
///
/// This enum represents the coarse milestones of a container's build and
/// teardown: discovery, individual creation, and completion of each phase.
pub enum ContainerLifecycleEvent<'a> {
    /// Fired once discovery has counted the registered component types,
    /// before any instance is created — there is no container yet to
    /// reference.
    BuildStarted { component_count: usize },
    /// Fired when an individual component instance is created, likewise
    /// before the container itself exists.
    ComponentCreated {
        component_name: &'static str,
        component_type_id: TypeId,
        creation_duration: Duration,
    },
    /// Fired once every node has reached `Started`.
    BuildCompleted {
        container: &'a Container,
        component_count: usize,
        duration: Duration,
    },
    /// Fired once every node has reached `Stopped`.
    ShutdownCompleted {
        container: &'a Container,
        component_count: usize,
        duration: Duration,
    },
}

/// Trait for implementing lifecycle event listeners
///
/// Implement this trait to receive notifications about container lifecycle
/// events. Listeners must be thread-safe as they may be called from multiple
/// threads.
pub trait LifecycleListener: Send + Sync {
    fn on_lifecycle_event(&self, event: &ContainerLifecycleEvent);
}

/// Static definition of a lifecycle event listener, registered via the
/// `lifecycle_listener!` macro.
pub struct LifecycleListenerDefinition {
    pub name: &'static str,
    pub handler: fn(&ContainerLifecycleEvent),
}

inventory::collect!(LifecycleListenerDefinition);

/// Publisher for container lifecycle events
///
/// Discovers every registered listener via `inventory` at construction and
/// dispatches events to all of them, synchronously, in registration order.
pub struct LifecycleEventPublisher {
    listeners: Vec<&'static LifecycleListenerDefinition>,
}

impl Default for LifecycleEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleEventPublisher {
    pub fn new() -> Self {
        let listeners: Vec<&'static LifecycleListenerDefinition> =
            inventory::iter::<LifecycleListenerDefinition>().collect();
        Self { listeners }
    }

    pub fn publish(&self, event: &ContainerLifecycleEvent) {
        for listener in &self.listeners {
            (listener.handler)(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    static EVENT_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn test_event_handler(_event: &ContainerLifecycleEvent) {
        EVENT_COUNTER.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn lifecycle_listener_definition_handler_runs() {
        let definition = LifecycleListenerDefinition {
            name: "test_listener",
            handler: test_event_handler,
        };
        assert_eq!(definition.name, "test_listener");

        EVENT_COUNTER.store(0, Ordering::SeqCst);
        let event = ContainerLifecycleEvent::BuildStarted { component_count: 5 };

        (definition.handler)(&event);
        assert_eq!(EVENT_COUNTER.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publisher_with_no_listeners_does_not_panic() {
        let publisher = LifecycleEventPublisher { listeners: vec![] };
        let event = ContainerLifecycleEvent::BuildStarted { component_count: 1 };
        publisher.publish(&event);
    }

    #[test]
    fn event_variants_carry_expected_fields() {
        let container = Container::empty();

        let completed = ContainerLifecycleEvent::BuildCompleted {
            container: &container,
            component_count: 3,
            duration: Duration::from_millis(10),
        };
        match completed {
            ContainerLifecycleEvent::BuildCompleted {
                component_count,
                duration,
                ..
            } => {
                assert_eq!(component_count, 3);
                assert_eq!(duration.as_millis(), 10);
            }
            _ => panic!("expected BuildCompleted"),
        }

        let created = ContainerLifecycleEvent::ComponentCreated {
            component_name: "Widget",
            component_type_id: TypeId::of::<i32>(),
            creation_duration: Duration::from_millis(1),
        };
        match created {
            ContainerLifecycleEvent::ComponentCreated { component_name, .. } => {
                assert_eq!(component_name, "Widget");
            }
            _ => panic!("expected ComponentCreated"),
        }
    }

    struct MockListener {
        events_received: Arc<AtomicUsize>,
    }

    impl LifecycleListener for MockListener {
        fn on_lifecycle_event(&self, _event: &ContainerLifecycleEvent) {
            self.events_received.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn lifecycle_listener_trait_is_object_callable() {
        let received = Arc::new(AtomicUsize::new(0));
        let listener = MockListener {
            events_received: received.clone(),
        };
        let event = ContainerLifecycleEvent::BuildStarted { component_count: 1 };
        listener.on_lifecycle_event(&event);
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }
}
