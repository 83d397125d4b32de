//! # lattice-validator
//!
//! Recursive object-graph validation: declare per-member rules and
//! capabilities once per type, then validate whole graphs with ordered,
//! path-keyed error reporting.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lattice_validator::prelude::*;
//!
//! struct Signup {
//!     name: Option<String>,
//! }
//!
//! impl Validatable for Signup {
//!     fn schema(s: &mut TypeSchema<Self>) {
//!         s.member("Name")
//!             .rule(|s: &Self| s.name.is_some(), "the Name field is required");
//!     }
//!
//!     fn shape(&self) -> Shape {
//!         Self::static_shape()
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! let validator = Validator::new();
//! let report = validator.validate(&Signup { name: None })?;
//! assert!(!report.is_valid());
//! assert!(report.get("Name").is_some());
//! ```
//!
//! ## How a graph is validated
//!
//! For every object, depth-first and in declaration order: declared member
//! rules, then the type's self-validation hook, then validators registered
//! for the exact runtime type, then recursion into nested members.
//! Sequence members validate item by item under `[index]` path segments
//! and stop after the first invalid item at their level. Error keys render
//! as `Field`, `Child.Field`, `[1].Field`, `Children[1].Field`.
//!
//! ## Polymorphic members
//!
//! A member held as `Box<dyn Validatable>` is validated with the rules and
//! capabilities of the value's *runtime* type, never the declared one.
//!
//! ## Async
//!
//! Self-validation hooks and registered validators may be asynchronous.
//! [`Validator::validate_async`] suspends at those points;
//! [`Validator::validate`] refuses them with [`Error::AsyncRequired`]
//! unless the call opts into blocking via
//! [`ValidateOptions::with_allow_async`].

pub mod core;
pub mod engine;
pub mod prelude;
pub mod registry;
pub mod schema;
mod validator;

pub use crate::core::{AccessError, Elements, Error, Validatable, ValidationReport, Violation};
pub use crate::engine::RuleContext;
pub use crate::registry::{Validate, ValidateAsync};
pub use crate::schema::{MemberSchema, Shape, TypeSchema};
pub use crate::validator::{TypedValidator, ValidateOptions, Validator, ValidatorBuilder};
