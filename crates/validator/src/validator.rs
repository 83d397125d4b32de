//! Validation façade
//!
//! [`Validator`] owns the descriptor cache and the external validator
//! registry; cloning it is cheap and every clone shares both. Build one
//! per composition root (through [`Validator::builder`] when external
//! validators participate) and hand clones to whoever validates.

use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::core::{Error, Validatable, ValidationReport, Violation};
use crate::engine::{Mode, RuleContext, Traversal, Walker};
use crate::registry::{Dispatch, Validate, ValidateAsync, ValidatorRegistry};
use crate::schema::SchemaCache;

// ============================================================================
// Options
// ============================================================================

/// Knobs for a single validation call.
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    recurse: bool,
    allow_async: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            recurse: true,
            allow_async: false,
        }
    }
}

impl ValidateOptions {
    /// Defaults: recurse into the graph, refuse asynchronous capabilities
    /// on the synchronous entry point.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to descend past the target's own declared rules. With
    /// recursion off, self-validation, registered validators, and members
    /// are all skipped; descendants never affect the result.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Lets the synchronous entry point block the calling thread on
    /// asynchronous capabilities instead of failing with
    /// [`Error::AsyncRequired`]. If an awaited operation can only complete
    /// on the blocked thread, the call cannot progress; prefer
    /// [`Validator::validate_async`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_allow_async(mut self, allow_async: bool) -> Self {
        self.allow_async = allow_async;
        self
    }

    /// Whether this call descends into the graph.
    #[must_use]
    pub fn recurse(&self) -> bool {
        self.recurse
    }

    /// Whether the synchronous entry point may block on async capabilities.
    #[must_use]
    pub fn allow_async(&self) -> bool {
        self.allow_async
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds a [`Validator`], collecting externally registered validators.
///
/// Registration order is invocation order for validators sharing a target
/// type. The registry is sealed by [`build`](Self::build); nothing can be
/// registered afterwards.
#[derive(Debug, Default)]
#[must_use = "builder methods must be chained or built"]
pub struct ValidatorBuilder {
    registry: ValidatorRegistry,
}

impl ValidatorBuilder {
    /// Registers a synchronous validator for values of type `T`.
    pub fn register<T, V>(mut self, validator: V) -> Self
    where
        T: Validatable,
        V: Validate<T> + 'static,
    {
        self.registry
            .insert(TypeId::of::<T>(), Dispatch::from_sync::<T, V>(validator));
        self
    }

    /// Registers an asynchronous validator for values of type `T`.
    pub fn register_async<T, V>(mut self, validator: V) -> Self
    where
        T: Validatable,
        V: ValidateAsync<T> + 'static,
    {
        self.registry
            .insert(TypeId::of::<T>(), Dispatch::from_async::<T, V>(validator));
        self
    }

    /// Registers a plain function as a synchronous validator for `T`.
    pub fn register_fn<T, F>(self, check: F) -> Self
    where
        T: Validatable,
        F: Fn(&T, &RuleContext<'_>) -> Vec<Violation> + Send + Sync + 'static,
    {
        self.register::<T, _>(FnValidator(check))
    }

    /// Seals the registry and produces the validator.
    pub fn build(self) -> Validator {
        Validator {
            inner: Arc::new(Inner {
                cache: SchemaCache::new(),
                registry: self.registry,
            }),
        }
    }
}

struct FnValidator<F>(F);

impl<T, F> Validate<T> for FnValidator<F>
where
    F: Fn(&T, &RuleContext<'_>) -> Vec<Violation> + Send + Sync,
{
    fn validate(&self, value: &T, ctx: &RuleContext<'_>) -> Vec<Violation> {
        (self.0)(value, ctx)
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Entry point for validating object graphs.
///
/// # Examples
///
/// ```rust,ignore
/// let validator = Validator::new();
/// let report = validator.validate(&order)?;
/// if !report.is_valid() {
///     for (path, messages) in report.iter() {
///         eprintln!("{path}: {messages:?}");
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cache: SchemaCache,
    registry: ValidatorRegistry,
}

impl Validator {
    /// A validator with no externally registered validators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a validator with external validators.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Validates `target` with default options (recursive, no blocking on
    /// async capabilities).
    ///
    /// # Errors
    ///
    /// [`Error::AsyncRequired`] when the reachable graph carries an
    /// asynchronous capability; [`Error::MemberAccess`] when recursion hits
    /// a member whose accessor fails. Ordinary validation failures are not
    /// errors; inspect the returned report.
    pub fn validate<T: Validatable>(&self, target: &T) -> Result<ValidationReport, Error> {
        self.validate_with(target, ValidateOptions::default())
    }

    /// Validates `target` with explicit options.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn validate_with<T: Validatable>(
        &self,
        target: &T,
        options: ValidateOptions,
    ) -> Result<ValidationReport, Error> {
        self.validate_dyn(target, options)
    }

    /// Validates a possibly absent target.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`] when `target` is `None`; otherwise as
    /// [`validate`](Self::validate).
    pub fn validate_opt<T: Validatable>(
        &self,
        target: Option<&T>,
        options: ValidateOptions,
    ) -> Result<ValidationReport, Error> {
        match target {
            Some(target) => self.validate_with(target, options),
            None => Err(Error::MissingTarget),
        }
    }

    /// Validates an erased target, dispatching on its runtime shape.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn validate_dyn(
        &self,
        target: &dyn Validatable,
        options: ValidateOptions,
    ) -> Result<ValidationReport, Error> {
        let shape = target.shape();
        debug!(
            type_name = shape.name(),
            recurse = options.recurse,
            allow_async = options.allow_async,
            "validating"
        );
        if options.recurse
            && !self
                .inner
                .cache
                .requires_validation(shape, true, &self.inner.registry)
        {
            return Ok(ValidationReport::new());
        }
        if options.recurse
            && !options.allow_async
            && self.inner.cache.requires_async(shape, &self.inner.registry)
        {
            return Err(Error::AsyncRequired {
                type_name: shape.name(),
            });
        }
        let walker = Walker::new(&self.inner.cache, &self.inner.registry);
        let mut traversal = Traversal::new(
            Mode::Sync {
                allow_async: options.allow_async,
            },
            options.recurse,
        );
        // resolves without suspending unless allow_async let an async
        // capability through
        futures::executor::block_on(walker.walk(target, &mut traversal))?;
        Ok(traversal.report)
    }

    /// Validates `target`, suspending at asynchronous capabilities instead
    /// of blocking. Never fails with [`Error::AsyncRequired`].
    ///
    /// # Errors
    ///
    /// [`Error::MemberAccess`] when recursion hits a member whose accessor
    /// fails.
    pub async fn validate_async<T: Validatable>(
        &self,
        target: &T,
    ) -> Result<ValidationReport, Error> {
        self.validate_dyn_async(target, true).await
    }

    /// Asynchronous validation with explicit recursion control.
    ///
    /// # Errors
    ///
    /// See [`validate_async`](Self::validate_async).
    pub async fn validate_async_with<T: Validatable>(
        &self,
        target: &T,
        recurse: bool,
    ) -> Result<ValidationReport, Error> {
        self.validate_dyn_async(target, recurse).await
    }

    /// Asynchronous validation of an erased target.
    ///
    /// # Errors
    ///
    /// See [`validate_async`](Self::validate_async).
    pub async fn validate_dyn_async(
        &self,
        target: &dyn Validatable,
        recurse: bool,
    ) -> Result<ValidationReport, Error> {
        let shape = target.shape();
        debug!(type_name = shape.name(), recurse, "validating async");
        if recurse
            && !self
                .inner
                .cache
                .requires_validation(shape, true, &self.inner.registry)
        {
            return Ok(ValidationReport::new());
        }
        let walker = Walker::new(&self.inner.cache, &self.inner.registry);
        let mut traversal = Traversal::new(Mode::Async, recurse);
        walker.walk(target, &mut traversal).await?;
        Ok(traversal.report)
    }

    /// True when validating a value of type `T` could produce errors:
    /// declared rules, a self-validation capability, a registered
    /// validator, or (under `recurse`) any reachable member type with one
    /// of those.
    #[must_use]
    pub fn requires_validation<T: Validatable>(&self, recurse: bool) -> bool {
        self.inner
            .cache
            .requires_validation(T::static_shape(), recurse, &self.inner.registry)
    }

    /// A handle bound to one target type, for call sites that validate the
    /// same type repeatedly.
    #[must_use]
    pub fn typed<T: Validatable>(&self) -> TypedValidator<T> {
        TypedValidator {
            validator: self.clone(),
            _target: PhantomData,
        }
    }
}

// ============================================================================
// Typed handle
// ============================================================================

/// A [`Validator`] bound to a known target type. Shares the caches of the
/// validator it came from.
#[derive(Debug, Clone)]
pub struct TypedValidator<T> {
    validator: Validator,
    _target: PhantomData<fn(&T)>,
}

impl<T: Validatable> TypedValidator<T> {
    /// See [`Validator::validate`].
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    pub fn validate(&self, target: &T) -> Result<ValidationReport, Error> {
        self.validator.validate(target)
    }

    /// See [`Validator::validate_with`].
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    pub fn validate_with(
        &self,
        target: &T,
        options: ValidateOptions,
    ) -> Result<ValidationReport, Error> {
        self.validator.validate_with(target, options)
    }

    /// See [`Validator::validate_opt`].
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`] when `target` is `None`.
    pub fn validate_opt(
        &self,
        target: Option<&T>,
        options: ValidateOptions,
    ) -> Result<ValidationReport, Error> {
        self.validator.validate_opt(target, options)
    }

    /// See [`Validator::validate_async`].
    ///
    /// # Errors
    ///
    /// See [`Validator::validate_async`].
    pub async fn validate_async(&self, target: &T) -> Result<ValidationReport, Error> {
        self.validator.validate_async(target).await
    }

    /// See [`Validator::requires_validation`].
    #[must_use]
    pub fn requires_validation(&self, recurse: bool) -> bool {
        self.validator.requires_validation::<T>(recurse)
    }
}
