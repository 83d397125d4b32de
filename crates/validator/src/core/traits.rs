//! The node contract for validatable object graphs
//!
//! Rust has no runtime reflection, so the engine discovers what a type can
//! validate through an explicit, type-keyed schema: each participating type
//! implements [`Validatable`] and declares its members, rules, and
//! capabilities once in [`Validatable::schema`]. The compiled descriptor is
//! cached per `TypeId` for the life of the
//! [`SchemaCache`](crate::schema::SchemaCache).
//!
//! Polymorphism works through the `shape` method: a `Box<dyn Validatable>`
//! member reports the shape of the value it currently holds, so a member
//! declared with an erased type is always validated with the *runtime*
//! type's rules and capabilities.

use std::any::Any;

use crate::schema::{Shape, TypeSchema};

/// A value the engine can traverse.
///
/// Implementors declare their schema once; the two remaining required
/// methods are mechanical:
///
/// ```rust,ignore
/// impl Validatable for Customer {
///     fn schema(s: &mut TypeSchema<Self>) {
///         s.member("Name")
///             .rule(|c: &Self| c.name.is_some(), "the Name field is required");
///         s.member("Address").nested(|c: &Self| c.address.as_ref());
///     }
///
///     fn shape(&self) -> Shape {
///         Self::static_shape()
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Validatable: Any + Send + Sync {
    /// Declares members, rules, and capabilities for this type.
    ///
    /// The default declares nothing, which marks the type as having nothing
    /// to validate of its own.
    fn schema(schema: &mut TypeSchema<Self>)
    where
        Self: Sized,
    {
        let _ = schema;
    }

    /// Shape of the *declared* type, usable without an instance.
    ///
    /// Used by the requires-validation analysis. The default is correct for
    /// every concrete type; containers override it (a `Vec<T>` is a
    /// sequence shape, a `Box<dyn Validatable>` is opaque).
    #[must_use]
    fn static_shape() -> Shape
    where
        Self: Sized,
    {
        Shape::object::<Self>()
    }

    /// Shape of the value actually held at runtime.
    ///
    /// Concrete types return `Self::static_shape()`; erasing containers
    /// forward to the inner value, which is what drives runtime-type
    /// dispatch for polymorphic members.
    fn shape(&self) -> Shape;

    /// Downcast seam used by compiled rule closures and registered
    /// validators.
    fn as_any(&self) -> &dyn Any;

    /// Sequence view of this value.
    ///
    /// `Some` when the runtime value is a collection of nodes, yielding
    /// items in enumeration order; `None` for singular objects.
    fn elements(&self) -> Option<Elements<'_>> {
        None
    }
}

/// Borrowed iterator over a sequence node's items.
pub struct Elements<'a> {
    iter: Box<dyn Iterator<Item = &'a dyn Validatable> + 'a>,
}

impl<'a> Elements<'a> {
    /// Wraps any iterator of node references.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Validatable>,
        I::IntoIter: 'a,
    {
        Self {
            iter: Box::new(items.into_iter()),
        }
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a dyn Validatable;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

impl std::fmt::Debug for Elements<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Elements").finish_non_exhaustive()
    }
}

impl<T: Validatable> Validatable for Vec<T> {
    fn static_shape() -> Shape {
        Shape::sequence::<Self, T>()
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn elements(&self) -> Option<Elements<'_>> {
        Some(Elements::new(
            self.iter().map(|item| item as &dyn Validatable),
        ))
    }
}

impl<T: Validatable> Validatable for Box<T> {
    fn static_shape() -> Shape {
        T::static_shape()
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn elements(&self) -> Option<Elements<'_>> {
        (**self).elements()
    }
}

impl<T: Validatable> Validatable for std::sync::Arc<T> {
    fn static_shape() -> Shape {
        T::static_shape()
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn elements(&self) -> Option<Elements<'_>> {
        (**self).elements()
    }
}

/// A polymorphic member: statically opaque, validated by the runtime shape
/// of whatever the box currently holds.
impl Validatable for Box<dyn Validatable> {
    fn static_shape() -> Shape {
        Shape::opaque::<Self>()
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn elements(&self) -> Option<Elements<'_>> {
        (**self).elements()
    }
}
