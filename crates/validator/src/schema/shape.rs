//! Type identity for the schema cache
//!
//! A [`Shape`] is a cheap, copyable handle to a type's validation identity:
//! its `TypeId`, a display name, and how the engine should treat it.
//! Shapes are pure functions of the type, so recomputing one concurrently
//! is always safe.

use std::any::TypeId;

use crate::core::Validatable;
use crate::schema::builder::build_descriptor;
use crate::schema::descriptor::TypeDescriptor;

/// Identity and kind of a validatable type.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    type_id: TypeId,
    name: &'static str,
    kind: ShapeKind,
}

/// How the engine treats a shape.
#[derive(Debug, Clone, Copy)]
pub enum ShapeKind {
    /// A singular object with a compiled descriptor.
    Object {
        /// Builds the descriptor on first use; invoked through the cache.
        build: fn() -> TypeDescriptor,
    },
    /// A sequence of nodes; validated item by item.
    Sequence {
        /// Shape of the element type.
        element: fn() -> Shape,
    },
    /// Statically unknown (e.g. `Box<dyn Validatable>`); resolved from the
    /// runtime value during traversal.
    Opaque,
}

impl Shape {
    /// Shape of a concrete object type.
    #[must_use]
    pub fn object<T: Validatable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: ShapeKind::Object {
                build: build_descriptor::<T>,
            },
        }
    }

    /// Shape of a sequence container `C` holding elements of type `T`.
    #[must_use]
    pub fn sequence<C: 'static, T: Validatable>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            kind: ShapeKind::Sequence {
                element: T::static_shape,
            },
        }
    }

    /// Shape of a statically opaque type.
    #[must_use]
    pub fn opaque<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: ShapeKind::Opaque,
        }
    }

    /// The type's identity key.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable type name, used in logs and error text.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The shape's kind.
    #[must_use]
    pub(crate) fn kind(&self) -> ShapeKind {
        self.kind
    }
}
