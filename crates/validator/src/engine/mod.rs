//! Depth-first graph traversal
//!
//! One algorithm drives both entry points. For every singular object the
//! walker runs, in order: declared member rules, the self-validation
//! capability, externally registered validators, then recursion into
//! eligible members. Sequences validate item by item and stop after the
//! first invalid item at their nesting level. The synchronous entry drives
//! the same future to completion on the calling thread; suspension points
//! only exist where a consulted capability is itself asynchronous, so
//! ordering never depends on the entry point used.

pub mod context;
pub(crate) mod path;

pub use context::RuleContext;
pub(crate) use context::{Mode, Traversal};

use std::any::TypeId;

use futures::future::BoxFuture;
use tracing::trace;

use crate::core::{Error, Validatable, ValidationReport, Violation};
use crate::engine::path::Path;
use crate::registry::{Dispatch, ValidatorRegistry};
use crate::schema::cache::SchemaCache;
use crate::schema::descriptor::SelfRule;
use crate::schema::shape::{Shape, ShapeKind};

/// One traversal's view of the shared caches. Per-call state lives in
/// [`Traversal`]; the walker itself is stateless.
pub(crate) struct Walker<'v> {
    cache: &'v SchemaCache,
    registry: &'v ValidatorRegistry,
}

impl<'v> Walker<'v> {
    pub(crate) fn new(cache: &'v SchemaCache, registry: &'v ValidatorRegistry) -> Self {
        Self { cache, registry }
    }

    /// Validates one value at the traversal's current path.
    ///
    /// Boxed for recursion. A value already on the current descent is
    /// skipped clean, which terminates cyclic graphs.
    pub(crate) fn walk<'a>(
        &'a self,
        node: &'a dyn Validatable,
        trav: &'a mut Traversal,
    ) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            let identity = identity_of(node);
            if trav.stack.contains(&identity) {
                return Ok(());
            }
            trav.stack.push(identity);
            let result = self.walk_value(node, trav).await;
            trav.stack.pop();
            result
        })
    }

    async fn walk_value(
        &self,
        node: &dyn Validatable,
        trav: &mut Traversal,
    ) -> Result<(), Error> {
        let shape = node.shape();
        match shape.kind() {
            ShapeKind::Sequence { .. } => self.walk_sequence(node, trav).await,
            ShapeKind::Object { .. } => self.walk_object(node, shape, trav).await,
            // a runtime value with no resolvable shape has nothing to check
            ShapeKind::Opaque => Ok(()),
        }
    }

    /// Items validate in enumeration order; the first invalid item stops
    /// iteration at this level, at every nesting depth.
    async fn walk_sequence(
        &self,
        node: &dyn Validatable,
        trav: &mut Traversal,
    ) -> Result<(), Error> {
        if !trav.recurse {
            return Ok(());
        }
        let Some(elements) = node.elements() else {
            return Ok(());
        };
        let items: Vec<&dyn Validatable> = elements.collect();
        for (index, item) in items.into_iter().enumerate() {
            trav.path.push_index(index);
            let before = trav.report.len();
            let result = self.walk(item, trav).await;
            trav.path.pop();
            result?;
            if trav.report.len() > before {
                break;
            }
        }
        Ok(())
    }

    async fn walk_object(
        &self,
        node: &dyn Validatable,
        shape: Shape,
        trav: &mut Traversal,
    ) -> Result<(), Error> {
        let Some(descriptor) = self.cache.descriptor(shape) else {
            return Ok(());
        };

        // Declared member rules, all of them, no short-circuit at this
        // level. The descriptor came from the runtime shape, so a member
        // held through a base or erased type still gets the derived
        // type's rules.
        for member in descriptor.members() {
            for rule in &member.rules {
                if !(rule.predicate)(node.as_any()) {
                    let key = trav.path.render_with(member.name());
                    trav.report.append(key, rule.message.clone().into_owned());
                }
            }
        }

        if !trav.recurse {
            return Ok(());
        }

        let rendered = trav.path.render();

        // Self-validation capability.
        if let Some(self_rule) = &descriptor.self_rule {
            let ctx = RuleContext::new(&rendered, descriptor.type_name());
            let violations = match self_rule {
                SelfRule::Sync(hook) => hook(node.as_any(), &ctx),
                SelfRule::Async(hook) => {
                    if !trav.mode.permits_async() {
                        return Err(Error::AsyncRequired {
                            type_name: descriptor.type_name(),
                        });
                    }
                    hook(node.as_any(), &ctx).await
                }
            };
            record_violations(&trav.path, &mut trav.report, violations);
        }

        // Registered validators for the exact runtime type, in
        // registration order.
        for dispatch in self.registry.entries(shape.id()) {
            let ctx = RuleContext::new(&rendered, descriptor.type_name());
            let violations = match dispatch {
                Dispatch::Sync(call) => call(node.as_any(), &ctx),
                Dispatch::Async(call) => {
                    if !trav.mode.permits_async() {
                        return Err(Error::AsyncRequired {
                            type_name: descriptor.type_name(),
                        });
                    }
                    call(node.as_any(), &ctx).await
                }
            };
            record_violations(&trav.path, &mut trav.report, violations);
        }

        // Member recursion, in declaration order.
        for member in descriptor.members() {
            if !member.recurses() {
                continue;
            }
            let Some(accessor) = &member.accessor else {
                continue;
            };
            let value = accessor(node.as_any()).map_err(|source| Error::MemberAccess {
                path: trav.path.render_with(member.name()),
                source,
            })?;
            let Some(value) = value else {
                continue;
            };
            if !self
                .cache
                .requires_validation(value.shape(), true, self.registry)
            {
                continue;
            }
            trace!(member = member.name(), "descending into member");
            trav.path.push_member(member.name.clone());
            let result = self.walk(value, trav).await;
            trav.path.pop();
            result?;
        }

        Ok(())
    }
}

fn record_violations(path: &Path, report: &mut ValidationReport, violations: Vec<Violation>) {
    for violation in violations {
        if violation.members().is_empty() {
            report.append(path.render(), violation.message());
        } else {
            for member in violation.members() {
                report.append(path.render_with(member), violation.message());
            }
        }
    }
}

/// Identity of a value for on-stack cycle detection. Containers forward
/// `as_any` to the value they hold, so a boxed node and its contents share
/// one identity. The address alone is not enough: a member stored inline at
/// offset zero of its parent shares the parent's address, so the runtime
/// type is part of the key. A type cannot contain itself inline, so two
/// nodes with the same type and address are the same object.
fn identity_of(node: &dyn Validatable) -> (TypeId, usize) {
    let any = node.as_any();
    (any.type_id(), std::ptr::from_ref(any).cast::<()>().addr())
}
