//! Capability results: one message naming zero or more members
//!
//! Self-validation capabilities and externally registered validators return
//! [`Violation`]s. A violation naming no member keys its message at the
//! current object's own path; a violation naming several members repeats
//! the message under each member's path.

use std::borrow::Cow;

use serde::Serialize;

/// One failure produced by a self-validation capability or a registered
/// instance validator.
///
/// # Examples
///
/// ```rust,ignore
/// schema.validate_self(|order: &Order, _ctx| {
///     if order.total < order.minimum {
///         vec![Violation::new("total is below the minimum").with_member("Total")]
///     } else {
///         Vec::new()
///     }
/// });
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    message: String,
    members: Vec<Cow<'static, str>>,
}

impl Violation {
    /// Creates a violation with the given message and no member names.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            members: Vec::new(),
        }
    }

    /// Names a member this violation applies to. May be chained; the
    /// message is reported once under each named member.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_member(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.members.push(name.into());
        self
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The member names this violation applies to; empty means the object
    /// itself.
    #[must_use]
    pub fn members(&self) -> &[Cow<'static, str>] {
        &self.members
    }
}
