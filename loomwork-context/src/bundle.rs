//! Bundles: a named, reusable group of component types registered together
//! via `ContextBuilder::put_bundle`.

use std::any::TypeId;

/// Enumerates the component types a bundle contributes to the builder. Each
/// type is registered exactly as `ContextBuilder::put` would register it —
/// `put_bundle` is a convenience for "register all of these together", not a
/// distinct registration mode.
pub trait Bundle {
    fn component_type_ids(&self) -> Vec<TypeId>;
}

/// A bundle built from a fixed list of type ids, for callers assembling one
/// ad hoc rather than implementing [`Bundle`] on a dedicated type.
pub struct TypeIdBundle(pub Vec<TypeId>);

impl Bundle for TypeIdBundle {
    fn component_type_ids(&self) -> Vec<TypeId> {
        self.0.clone()
    }
}
