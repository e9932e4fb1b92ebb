//! The type registry: accumulates `put`/`put_keyed`/`put_bundle` calls in
//! registration order and flattens them into the deduplicated, ordered set
//! of distinct component types the dependency graph is built from.
//!
//! Registration order here **is** creation order: the engine instantiates
//! and advances nodes in the order `finalize()` returns them, so the
//! registry is also what makes `get(key)` deterministic (see
//! [`crate::container::Container`]).

use std::any::TypeId;
use std::collections::HashMap;

/// One accumulated registration call.
#[derive(Debug, Clone)]
struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    /// Keys this registration adds the type under, beyond its own concrete
    /// key, and whether each clears prior entries.
    extra_keys: Vec<(String, bool)>,
}

/// Accumulates type registrations for a single container build.
///
/// `overwrite = true` clears a key's list before appending; `overwrite =
/// false` prepends without clearing. Either way the most recently processed
/// registration for a key becomes its new head — this workspace resolves the
/// tension between spec.md's prose ("head stays the incumbent default" for
/// `overwrite = false`) and its own Scenario S5 (where a later
/// `overwrite = false` registration *does* become the head) in favor of the
/// literal scenario; see DESIGN.md.
#[derive(Debug, Default)]
pub struct Registry {
    registrations: Vec<Registration>,
    seen: HashMap<TypeId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `put(type T)`: registers `T` under its own concrete key plus any
    /// inject-keys it declares. Idempotent for a given `TypeId` — re-putting
    /// the same type only updates (does not duplicate) its registration
    /// entry, though its key contributions still apply again.
    pub fn put(&mut self, type_id: TypeId, type_name: &'static str, keys: Vec<(&'static str, bool)>) {
        let extra_keys = keys
            .into_iter()
            .map(|(k, overwrite)| (k.to_string(), overwrite))
            .collect::<Vec<_>>();

        if let Some(&idx) = self.seen.get(&type_id) {
            self.registrations[idx].extra_keys.extend(extra_keys);
            return;
        }

        let idx = self.registrations.len();
        self.registrations.push(Registration {
            type_id,
            type_name,
            extra_keys,
        });
        self.seen.insert(type_id, idx);
    }

    /// `put(key K, type T)`: direct registration under an explicit key with
    /// `overwrite = true`, in addition to `T`'s normal registration (which
    /// must have happened, or will happen, via `put`/`put_bundle` so the
    /// type actually has a node).
    pub fn put_keyed(
        &mut self,
        key: &str,
        type_id: TypeId,
        type_name: &'static str,
    ) {
        self.put(type_id, type_name, vec![]);
        let idx = self.seen[&type_id];
        self.registrations[idx]
            .extra_keys
            .push((key.to_string(), true));
    }

    /// Produces the deduplicated, first-seen-order list of registered types
    /// plus the key -> ordered candidate list map, with `overwrite`
    /// semantics already applied.
    pub fn finalize(&self) -> (Vec<(TypeId, &'static str)>, HashMap<String, Vec<TypeId>>) {
        let order = self
            .registrations
            .iter()
            .map(|r| (r.type_id, r.type_name))
            .collect();

        let mut keyed: HashMap<String, Vec<TypeId>> = HashMap::new();
        for reg in &self.registrations {
            // Every type is always resolvable by its own concrete key.
            keyed
                .entry(reg.type_name.to_string())
                .or_default()
                .push(reg.type_id);

            for (key, overwrite) in &reg.extra_keys {
                let list = keyed.entry(key.clone()).or_default();
                if *overwrite {
                    list.clear();
                    list.push(reg.type_id);
                } else {
                    list.insert(0, reg.type_id);
                }
            }
        }
        (order, keyed)
    }

    /// Adds an explicit key to an already-`put` type, as used by the
    /// builder façade's `put(key, type)` — the type itself must already be
    /// registered (via `put` or `put_bundle`'s member calls).
    pub fn add_key(&mut self, type_id: TypeId, key: &str, overwrite: bool) -> bool {
        match self.seen.get(&type_id) {
            Some(&idx) => {
                self.registrations[idx]
                    .extra_keys
                    .push((key.to_string(), overwrite));
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Bar;
    #[derive(Debug)]
    struct Baz;
    #[derive(Debug)]
    struct FooNoOverwrite;

    fn id<T: 'static>() -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn registering_same_type_twice_is_idempotent() {
        let mut reg = Registry::new();
        reg.put(id::<Bar>(), "Bar", vec![]);
        reg.put(id::<Bar>(), "Bar", vec![]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn overwrite_true_clears_prior_entries_s4() {
        let mut reg = Registry::new();
        reg.put(id::<Bar>(), "Bar", vec![("Foo", true)]);
        reg.put(id::<Baz>(), "Baz", vec![("Foo", true)]);

        let (_order, keyed) = reg.finalize();
        assert_eq!(keyed["Foo"], vec![id::<Baz>()]);
        assert_eq!(keyed["Bar"], vec![id::<Bar>()]);
        assert_eq!(keyed["Baz"], vec![id::<Baz>()]);
    }

    #[test]
    fn overwrite_false_prepends_becoming_new_head_s5() {
        let mut reg = Registry::new();
        reg.put(id::<Bar>(), "Bar", vec![("Foo", true)]);
        reg.put(id::<Baz>(), "Baz", vec![("Foo", true)]);
        reg.put(
            id::<FooNoOverwrite>(),
            "FooNoOverwrite",
            vec![("Foo", false)],
        );

        let (_order, keyed) = reg.finalize();
        assert_eq!(keyed["Foo"][0], id::<FooNoOverwrite>());
        assert!(keyed["Foo"].contains(&id::<Baz>()));
        assert_eq!(keyed["FooNoOverwrite"], vec![id::<FooNoOverwrite>()]);
    }

    #[test]
    fn child_retrievable_by_both_concrete_and_parent_key() {
        let mut reg = Registry::new();
        reg.put(id::<Bar>(), "Bar", vec![]);
        reg.put(id::<Baz>(), "Baz", vec![("Bar", false)]);

        let (_order, keyed) = reg.finalize();
        assert!(keyed["Baz"].contains(&id::<Baz>()));
        assert!(keyed["Bar"].contains(&id::<Baz>()));
    }

    #[test]
    fn finalize_preserves_first_seen_order() {
        let mut reg = Registry::new();
        reg.put(id::<Baz>(), "Baz", vec![]);
        reg.put(id::<Bar>(), "Bar", vec![]);

        let (order, _keyed) = reg.finalize();
        assert_eq!(order[0].0, id::<Baz>());
        assert_eq!(order[1].0, id::<Bar>());
    }

    #[test]
    fn add_key_extends_an_existing_registration() {
        let mut reg = Registry::new();
        reg.put(id::<Bar>(), "Bar", vec![]);
        assert!(reg.add_key(id::<Bar>(), "primary", true));
        assert!(!reg.add_key(id::<Baz>(), "primary", true));

        let (_order, keyed) = reg.finalize();
        assert_eq!(keyed["primary"], vec![id::<Bar>()]);
    }

    #[test]
    fn put_keyed_is_overwrite_true() {
        let mut reg = Registry::new();
        reg.put(id::<Bar>(), "Bar", vec![]);
        reg.put_keyed("primary", id::<Bar>(), "Bar");
        reg.put_keyed("primary", id::<Baz>(), "Baz");

        let (_order, keyed) = reg.finalize();
        assert_eq!(keyed["primary"], vec![id::<Baz>()]);
    }
}
