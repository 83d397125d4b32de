//! Core validation types and traits
//!
//! The fundamental building blocks of the validation system:
//!
//! - **Traits**: [`Validatable`], the node contract for traversable graphs
//! - **Errors**: [`Error`], [`AccessError`] — operational failures only
//! - **Report**: [`ValidationReport`], the ordered path-keyed accumulator
//! - **Violations**: [`Violation`], results from capabilities and
//!   registered validators

pub mod error;
pub mod report;
pub mod traits;
pub mod violation;

pub use error::{AccessError, Error};
pub use report::ValidationReport;
pub use traits::{Elements, Validatable};
pub use violation::Violation;
