//! External validator registry
//!
//! Validators registered here are looked up by the *exact runtime* type of
//! the object under traversal and run in registration order, after the
//! object's own self-validation and before member recursion. The registry
//! is populated through [`ValidatorBuilder`](crate::ValidatorBuilder) and
//! immutable afterwards, which keeps the requires-validation memo sound.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::core::{Validatable, Violation};
use crate::engine::RuleContext;

/// A synchronous validator for values of type `T`, registered alongside
/// the type rather than declared in its schema.
///
/// ```rust,ignore
/// struct OrderValidator;
///
/// impl Validate<Order> for OrderValidator {
///     fn validate(&self, order: &Order, _ctx: &RuleContext<'_>) -> Vec<Violation> {
///         if order.lines.is_empty() {
///             vec![Violation::new("order needs at least one line").with_member("Lines")]
///         } else {
///             Vec::new()
///         }
///     }
/// }
/// ```
pub trait Validate<T>: Send + Sync {
    /// Checks `value`, returning zero or more violations.
    fn validate(&self, value: &T, ctx: &RuleContext<'_>) -> Vec<Violation>;
}

/// An asynchronous validator for values of type `T`.
///
/// Reachable only through [`validate_async`](crate::Validator::validate_async)
/// or a synchronous call that opted into blocking on async capabilities.
#[async_trait]
pub trait ValidateAsync<T>: Send + Sync {
    /// Checks `value`, awaiting whatever the check needs.
    async fn validate(&self, value: &T, ctx: &RuleContext<'_>) -> Vec<Violation>;
}

/// One registered validator, erased to the dispatch seam the engine calls
/// through.
pub(crate) enum Dispatch {
    Sync(Box<dyn for<'a> Fn(&'a dyn Any, &'a RuleContext<'a>) -> Vec<Violation> + Send + Sync>),
    Async(
        Box<
            dyn for<'a> Fn(&'a dyn Any, &'a RuleContext<'a>) -> BoxFuture<'a, Vec<Violation>>
                + Send
                + Sync,
        >,
    ),
}

impl Dispatch {
    pub(crate) fn from_sync<T, V>(validator: V) -> Self
    where
        T: Validatable,
        V: Validate<T> + 'static,
    {
        Dispatch::Sync(Box::new(move |value, ctx| {
            match value.downcast_ref::<T>() {
                Some(value) => validator.validate(value, ctx),
                None => Vec::new(),
            }
        }))
    }

    pub(crate) fn from_async<T, V>(validator: V) -> Self
    where
        T: Validatable,
        V: ValidateAsync<T> + 'static,
    {
        let validator = Arc::new(validator);
        Dispatch::Async(Box::new(move |value, ctx| {
            // Downcast before the future is built: `&dyn Any` is not `Sync`
            // and would poison the future's `Send` bound if captured.
            let Some(value) = value.downcast_ref::<T>() else {
                return Box::pin(futures::future::ready(Vec::new()));
            };
            let validator = Arc::clone(&validator);
            Box::pin(async move { validator.validate(value, ctx).await })
        }))
    }

    pub(crate) fn is_async(&self) -> bool {
        matches!(self, Dispatch::Async(_))
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Sync(_) => f.write_str("Dispatch::Sync"),
            Dispatch::Async(_) => f.write_str("Dispatch::Async"),
        }
    }
}

/// Type-keyed lookup of registered validators.
#[derive(Debug, Default)]
pub(crate) struct ValidatorRegistry {
    entries: HashMap<TypeId, Vec<Dispatch>>,
}

impl ValidatorRegistry {
    pub(crate) fn insert(&mut self, id: TypeId, dispatch: Dispatch) {
        self.entries.entry(id).or_default().push(dispatch);
    }

    /// Validators for the exact type, in registration order.
    pub(crate) fn entries(&self, id: TypeId) -> &[Dispatch] {
        self.entries.get(&id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn contains(&self, id: TypeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn has_async(&self, id: TypeId) -> bool {
        self.entries(id).iter().any(Dispatch::is_async)
    }
}
