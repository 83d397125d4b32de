//! Compiled type descriptors
//!
//! A [`TypeDescriptor`] is the cached, immutable product of a type's
//! [`schema`](crate::Validatable::schema) declaration: the ordered member
//! list, each member's rules and accessor, and the optional self-validation
//! capability — all stored as erased closures keyed by the owning type's
//! `TypeId`, so the engine never re-introspects a type after first use.

use std::any::Any;
use std::borrow::Cow;

use futures::future::BoxFuture;

use crate::core::{AccessError, Validatable, Violation};
use crate::engine::RuleContext;
use crate::schema::Shape;

/// A declarative rule: one predicate over the member's current value plus
/// the message reported when it fails. Rules on a member are evaluated
/// independently; one member may accumulate several messages.
pub(crate) struct Rule {
    pub(crate) message: Cow<'static, str>,
    pub(crate) predicate: Box<dyn Fn(&dyn Any) -> bool + Send + Sync>,
}

/// Erased member accessor: projects the owner to the member's current
/// value, `None` meaning absent. Fallible so a broken getter can surface
/// as [`Error::MemberAccess`](crate::Error::MemberAccess) when recursion
/// reaches it.
pub(crate) type Accessor = Box<
    dyn for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Validatable>, AccessError> + Send + Sync,
>;

/// The self-validation capability, stored as data on the descriptor so the
/// engine can detect and invoke it without downcasting to a capability
/// trait.
pub(crate) enum SelfRule {
    Sync(Box<dyn for<'a> Fn(&'a dyn Any, &'a RuleContext<'a>) -> Vec<Violation> + Send + Sync>),
    Async(
        Box<
            dyn for<'a> Fn(&'a dyn Any, &'a RuleContext<'a>) -> BoxFuture<'a, Vec<Violation>>
                + Send
                + Sync,
        >,
    ),
}

impl SelfRule {
    pub(crate) fn is_async(&self) -> bool {
        matches!(self, SelfRule::Async(_))
    }
}

/// One member of a compiled descriptor, in declaration order.
pub struct MemberDescriptor {
    pub(crate) name: Cow<'static, str>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) accessor: Option<Accessor>,
    pub(crate) declared: Option<Shape>,
    pub(crate) recurse: bool,
}

impl MemberDescriptor {
    pub(crate) fn new(name: Cow<'static, str>) -> Self {
        Self {
            name,
            rules: Vec::new(),
            accessor: None,
            declared: None,
            recurse: false,
        }
    }

    /// The member's declared name, as used in error paths.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declarative rules on this member.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether traversal may descend into this member's value.
    #[must_use]
    pub fn recurses(&self) -> bool {
        self.recurse
    }
}

impl std::fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .field("recurse", &self.recurse)
            .finish_non_exhaustive()
    }
}

/// Compiled validation metadata for one type.
///
/// Immutable after construction; cached process-wide in a
/// [`SchemaCache`](crate::schema::SchemaCache). Computing a descriptor is a
/// pure function of the type's schema declaration, so concurrent first
/// requests may compute redundantly and converge.
pub struct TypeDescriptor {
    pub(crate) type_name: &'static str,
    pub(crate) members: Vec<MemberDescriptor>,
    pub(crate) self_rule: Option<SelfRule>,
}

impl TypeDescriptor {
    /// Name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Members in declaration order (inherited members first when the
    /// schema used [`TypeSchema::inherit`](crate::schema::TypeSchema::inherit)).
    #[must_use]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// True when any member declares at least one rule.
    #[must_use]
    pub fn has_rules(&self) -> bool {
        self.members.iter().any(|member| !member.rules.is_empty())
    }

    /// True when the type declared a self-validation capability.
    #[must_use]
    pub fn has_self_rule(&self) -> bool {
        self.self_rule.is_some()
    }

    /// True when the self-validation capability requires awaiting.
    #[must_use]
    pub fn self_rule_is_async(&self) -> bool {
        self.self_rule.as_ref().is_some_and(SelfRule::is_async)
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("members", &self.members)
            .field("has_self_rule", &self.has_self_rule())
            .finish()
    }
}
