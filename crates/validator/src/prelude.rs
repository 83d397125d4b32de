//! Convenience re-exports for the common case
//!
//! ```rust,ignore
//! use lattice_validator::prelude::*;
//! ```

pub use crate::core::{
    AccessError, Elements, Error, Validatable, ValidationReport, Violation,
};
pub use crate::engine::RuleContext;
pub use crate::registry::{Validate, ValidateAsync};
pub use crate::schema::{MemberSchema, Shape, TypeSchema};
pub use crate::validator::{TypedValidator, ValidateOptions, Validator, ValidatorBuilder};
