//! Type-keyed schema layer
//!
//! Replaces runtime reflection with explicit declarations: a type's
//! [`schema`](crate::Validatable::schema) runs once against a
//! [`TypeSchema`] builder, compiles to a [`TypeDescriptor`], and is cached
//! by `TypeId` in the [`SchemaCache`]. [`Shape`] is the cheap handle that
//! ties a `TypeId` to its descriptor and traversal kind.

pub mod builder;
pub mod cache;
pub mod descriptor;
pub mod shape;

pub use builder::{MemberSchema, TypeSchema};
pub use cache::SchemaCache;
pub use descriptor::{MemberDescriptor, TypeDescriptor};
pub use shape::{Shape, ShapeKind};
