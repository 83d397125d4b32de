//! Error types raised by the validation engine
//!
//! These are *operational* errors: a missing target, a synchronous call
//! against a graph that needs asynchronous evaluation, or a member accessor
//! that cannot produce a value. Validation failures are never raised as
//! errors; they are carried as entries in the returned
//! [`ValidationReport`](crate::core::report::ValidationReport).

use std::borrow::Cow;

/// Error raised by [`Validator`](crate::Validator) entry points.
///
/// Every variant surfaces to the caller unrecovered; the engine performs no
/// retries. Callers branch on the report for ordinary validation failures
/// and only see this type when the call itself could not be carried out.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target handed to a dyn-level entry point was absent.
    #[error("validation target is absent")]
    MissingTarget,

    /// The graph reachable from the target requires asynchronous evaluation,
    /// but the synchronous entry point was used without opting into
    /// blocking. Never raised by the asynchronous entry points.
    #[error(
        "`{type_name}` requires asynchronous validation; \
         use `validate_async` or enable `allow_async`"
    )]
    AsyncRequired {
        /// Name of the type whose capability needs awaiting.
        type_name: &'static str,
    },

    /// A member accessor failed while recursion reached it.
    ///
    /// Only reachable under `recurse = true`; with recursion disabled the
    /// accessor is never run and no error occurs.
    #[error("member `{path}` could not be read")]
    MemberAccess {
        /// Rendered path of the member that failed.
        path: String,
        /// The accessor's own failure.
        #[source]
        source: AccessError,
    },
}

/// Failure produced by a fallible member accessor registered through
/// [`MemberSchema::try_nested`](crate::schema::MemberSchema::try_nested).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct AccessError {
    reason: Cow<'static, str>,
}

impl AccessError {
    /// Creates an accessor failure with the given reason.
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_access_formats_path_and_source() {
        let error = Error::MemberAccess {
            path: "Parent.Broken".to_string(),
            source: AccessError::new("getter not implemented"),
        };
        assert_eq!(error.to_string(), "member `Parent.Broken` could not be read");
        let source = std::error::Error::source(&error).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("getter not implemented"));
    }

    #[test]
    fn access_error_is_zero_alloc_for_static_reasons() {
        let error = AccessError::new("broken");
        assert!(matches!(error.reason, Cow::Borrowed(_)));
    }
}
