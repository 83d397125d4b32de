//! Process-wide descriptor cache and requires-validation analysis
//!
//! Descriptor compilation is a pure function of the type's schema
//! declaration, so the cache uses plain get-or-compute without a broader
//! lock: concurrent first requests may compute redundantly and the last
//! write wins with an identical value.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::registry::ValidatorRegistry;
use crate::schema::descriptor::TypeDescriptor;
use crate::schema::shape::{Shape, ShapeKind};

/// Memoized per-type validation metadata.
#[derive(Debug, Default)]
pub struct SchemaCache {
    descriptors: DashMap<TypeId, Arc<TypeDescriptor>>,
    requires: DashMap<(TypeId, bool), bool>,
    requires_async: DashMap<TypeId, bool>,
}

impl SchemaCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Descriptor for an object shape, compiling and caching it on first
    /// use. `None` for sequence and opaque shapes, which carry no
    /// descriptor of their own.
    pub(crate) fn descriptor(&self, shape: Shape) -> Option<Arc<TypeDescriptor>> {
        let ShapeKind::Object { build } = shape.kind() else {
            return None;
        };
        if let Some(found) = self.descriptors.get(&shape.id()) {
            return Some(Arc::clone(&found));
        }
        let built = Arc::new(build());
        debug!(
            type_name = shape.name(),
            members = built.members().len(),
            "compiled type descriptor"
        );
        self.descriptors.insert(shape.id(), Arc::clone(&built));
        Some(built)
    }

    /// True when validating a value of this shape could produce errors:
    /// the type has rules, a self-validation capability, or a registered
    /// validator, or (under `recurse`) any reachable member type does.
    ///
    /// Both positive and negative answers are memoized per
    /// `(type, recurse)`; the registry is immutable once a
    /// [`Validator`](crate::Validator) is built, so the memo never goes
    /// stale.
    pub(crate) fn requires_validation(
        &self,
        shape: Shape,
        recurse: bool,
        registry: &ValidatorRegistry,
    ) -> bool {
        if let Some(found) = self.requires.get(&(shape.id(), recurse)) {
            return *found;
        }
        let computed = self.compute_requires(shape, recurse, registry);
        self.requires.insert((shape.id(), recurse), computed);
        computed
    }

    /// True when the recursive walk from this shape can statically reach
    /// an asynchronous capability. Opaque shapes contribute nothing here;
    /// the engine guards them at traversal time instead.
    pub(crate) fn requires_async(&self, shape: Shape, registry: &ValidatorRegistry) -> bool {
        if let Some(found) = self.requires_async.get(&shape.id()) {
            return *found;
        }
        let computed = self.compute_requires_async(shape, registry);
        self.requires_async.insert(shape.id(), computed);
        computed
    }

    fn compute_requires(&self, root: Shape, recurse: bool, registry: &ValidatorRegistry) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![root];
        while let Some(shape) = pending.pop() {
            if !visited.insert(shape.id()) {
                continue;
            }
            match shape.kind() {
                // statically unknown; assume the runtime value matters
                ShapeKind::Opaque => return true,
                ShapeKind::Sequence { element } => {
                    if recurse {
                        pending.push(element());
                    }
                }
                ShapeKind::Object { .. } => {
                    let Some(descriptor) = self.descriptor(shape) else {
                        continue;
                    };
                    if descriptor.has_rules()
                        || descriptor.has_self_rule()
                        || registry.contains(shape.id())
                    {
                        return true;
                    }
                    if recurse {
                        for member in descriptor.members() {
                            if member.recurses() {
                                if let Some(declared) = member.declared {
                                    pending.push(declared);
                                }
                            }
                        }
                    }
                }
            }
        }
        false
    }

    fn compute_requires_async(&self, root: Shape, registry: &ValidatorRegistry) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![root];
        while let Some(shape) = pending.pop() {
            if !visited.insert(shape.id()) {
                continue;
            }
            match shape.kind() {
                ShapeKind::Opaque => {}
                ShapeKind::Sequence { element } => pending.push(element()),
                ShapeKind::Object { .. } => {
                    let Some(descriptor) = self.descriptor(shape) else {
                        continue;
                    };
                    if descriptor.self_rule_is_async() || registry.has_async(shape.id()) {
                        return true;
                    }
                    for member in descriptor.members() {
                        if member.recurses() {
                            if let Some(declared) = member.declared {
                                pending.push(declared);
                            }
                        }
                    }
                }
            }
        }
        false
    }
}
