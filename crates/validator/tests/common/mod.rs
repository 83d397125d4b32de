//! Shared fixture graph for the integration tests.
//!
//! A small family of types covering the traversal features: declared
//! rules, nested members, sequences, skip-recursion markers, schema
//! inheritance, self-validation hooks (sync and async), polymorphic
//! members, fallible accessors, and a cyclic graph.

#![allow(dead_code)]

use std::any::Any;
use std::sync::{Arc, OnceLock};

use futures::future::BoxFuture;
use lattice_validator::prelude::*;

// ============================================================================
// Plain rule-bearing types
// ============================================================================

pub struct Parent {
    pub required_name: Option<String>,
    pub ten_or_more: i64,
    pub child: Option<Child>,
    pub skipped_child: Option<Child>,
    pub children: Vec<Child>,
}

impl Default for Parent {
    fn default() -> Self {
        Self {
            required_name: Some("Default name".to_string()),
            ten_or_more: 10,
            child: None,
            skipped_child: None,
            children: Vec::new(),
        }
    }
}

impl Validatable for Parent {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("RequiredName").rule(
            |p: &Self| p.required_name.is_some(),
            "the RequiredName field is required",
        );
        s.member("TenOrMore")
            .rule(|p: &Self| p.ten_or_more >= 10, "TenOrMore must be at least 10");
        s.member("Child").nested(|p: &Self| p.child.as_ref());
        s.member("SkippedChild")
            .nested(|p: &Self| p.skipped_child.as_ref())
            .skip_recursion();
        s.member("Children").nested(|p: &Self| Some(&p.children));
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Child {
    pub required_category: Option<String>,
    pub min_length_five: Option<String>,
    pub child: Option<Box<Child>>,
    pub skipped_child: Option<Box<Child>>,
}

impl Default for Child {
    fn default() -> Self {
        Self {
            required_category: Some("Default category".to_string()),
            min_length_five: None,
            child: None,
            skipped_child: None,
        }
    }
}

impl Validatable for Child {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("RequiredCategory").rule(
            |c: &Self| c.required_category.is_some(),
            "the RequiredCategory field is required",
        );
        s.member("MinLengthFive").rule(
            |c: &Self| c.min_length_five.as_ref().is_none_or(|v| v.len() >= 5),
            "MinLengthFive must be at least 5 characters long",
        );
        s.member("Child").nested(|c: &Self| c.child.as_deref());
        s.member("SkippedChild")
            .nested(|c: &Self| c.skipped_child.as_deref())
            .skip_recursion();
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Child {
    /// An invalid child wrapped in `depth` valid ancestors, for exercising
    /// deep path rendering.
    pub fn chain(depth: usize) -> Self {
        let mut current = Child {
            required_category: None,
            ..Child::default()
        };
        for _ in 0..depth {
            current = Child {
                child: Some(Box::new(current)),
                ..Child::default()
            };
        }
        current
    }
}

/// Holds its child directly by value, so the child occupies the same
/// address as the wrapper itself.
#[derive(Default)]
pub struct Enclosure {
    pub detail: Child,
}

impl Validatable for Enclosure {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("Detail").nested(|e: &Self| Some(&e.detail));
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Extends [`Child`]'s schema with one member of its own.
pub struct DerivedChild {
    pub base: Child,
    pub derived_min_length_ten: Option<String>,
}

impl Default for DerivedChild {
    fn default() -> Self {
        Self {
            base: Child::default(),
            derived_min_length_ten: None,
        }
    }
}

impl Validatable for DerivedChild {
    fn schema(s: &mut TypeSchema<Self>) {
        s.inherit(|d: &Self| &d.base);
        s.member("DerivedMinLengthTen").rule(
            |d: &Self| {
                d.derived_min_length_ten
                    .as_ref()
                    .is_none_or(|v| v.len() >= 10)
            },
            "DerivedMinLengthTen must be at least 10 characters long",
        );
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Self-validating types
// ============================================================================

pub struct Account {
    pub ten_or_more: i64,
    pub twenty_or_more: i64,
    pub validatable_child: Option<SelfValidatingChild>,
    pub hook_only_child: Option<HookOnlyChild>,
    pub poly_child: Option<Box<dyn Validatable>>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            ten_or_more: 10,
            twenty_or_more: 20,
            validatable_child: None,
            hook_only_child: None,
            poly_child: None,
        }
    }
}

impl Validatable for Account {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("TenOrMore")
            .rule(|a: &Self| a.ten_or_more >= 10, "TenOrMore must be at least 10");
        s.member("ValidatableChild")
            .nested(|a: &Self| a.validatable_child.as_ref());
        s.member("HookOnlyChild")
            .nested(|a: &Self| a.hook_only_child.as_ref());
        s.member("PolyChild").nested(|a: &Self| a.poly_child.as_ref());
        s.validate_self(|a: &Self, _ctx| {
            if a.twenty_or_more < 20 {
                vec![Violation::new("TwentyOrMore must be at least 20").with_member("TwentyOrMore")]
            } else {
                Vec::new()
            }
        });
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Declared rules plus a self-validation hook.
pub struct SelfValidatingChild {
    pub min_length_five: Option<String>,
    pub twenty_or_more: i64,
}

impl Default for SelfValidatingChild {
    fn default() -> Self {
        Self {
            min_length_five: None,
            twenty_or_more: 20,
        }
    }
}

impl Validatable for SelfValidatingChild {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("MinLengthFive").rule(
            |c: &Self| c.min_length_five.as_ref().is_none_or(|v| v.len() >= 5),
            "MinLengthFive must be at least 5 characters long",
        );
        s.validate_self(|c: &Self, _ctx| {
            if c.twenty_or_more < 20 {
                vec![Violation::new("TwentyOrMore must be at least 20").with_member("TwentyOrMore")]
            } else {
                Vec::new()
            }
        });
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// No declared rules at all; only the self-validation hook.
pub struct HookOnlyChild {
    pub twenty_or_more: i64,
}

impl Default for HookOnlyChild {
    fn default() -> Self {
        Self { twenty_or_more: 20 }
    }
}

impl Validatable for HookOnlyChild {
    fn schema(s: &mut TypeSchema<Self>) {
        s.validate_self(|c: &Self, _ctx| {
            if c.twenty_or_more < 20 {
                vec![Violation::new("TwentyOrMore must be at least 20").with_member("TwentyOrMore")]
            } else {
                Vec::new()
            }
        });
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Async fixtures
// ============================================================================

/// Self-validates asynchronously; unreachable from the plain synchronous
/// entry point.
pub struct AsyncHookChild {
    pub twenty_or_more: i64,
}

impl Default for AsyncHookChild {
    fn default() -> Self {
        Self { twenty_or_more: 20 }
    }
}

fn check_twenty_async<'a>(
    child: &'a AsyncHookChild,
    _ctx: &'a RuleContext<'a>,
) -> BoxFuture<'a, Vec<Violation>> {
    Box::pin(async move {
        if child.twenty_or_more < 20 {
            vec![Violation::new("TwentyOrMore must be at least 20").with_member("TwentyOrMore")]
        } else {
            Vec::new()
        }
    })
}

impl Validatable for AsyncHookChild {
    fn schema(s: &mut TypeSchema<Self>) {
        s.validate_self_async(check_twenty_async);
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
pub struct AsyncParent {
    pub needs_async: Option<AsyncHookChild>,
}

impl Validatable for AsyncParent {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("NeedsAsync").nested(|p: &Self| p.needs_async.as_ref());
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Edge-case fixtures
// ============================================================================

/// A required member that is also excluded from recursion; its presence
/// rule fails even with recursion off.
#[derive(Default)]
pub struct MandatorySkipped {
    pub skipped_child: Option<Child>,
}

impl Validatable for MandatorySkipped {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("SkippedChild")
            .rule(
                |m: &Self| m.skipped_child.is_some(),
                "the SkippedChild field is required",
            )
            .nested(|m: &Self| m.skipped_child.as_ref())
            .skip_recursion();
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One working member and one whose accessor always fails.
#[derive(Default)]
pub struct PartiallyImplemented {
    pub required_name: Option<String>,
}

fn unimplemented_member(_p: &PartiallyImplemented) -> Result<Option<&Child>, AccessError> {
    Err(AccessError::new("member getter is not implemented"))
}

impl Validatable for PartiallyImplemented {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("RequiredName").rule(
            |p: &Self| p.required_name.is_some(),
            "the RequiredName field is required",
        );
        s.member("Broken").try_nested(unimplemented_member);
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds a one-node cycle: the node's `Next` member is the node itself.
pub struct Looping {
    pub required_name: Option<String>,
    pub next: OnceLock<Arc<Looping>>,
}

impl Validatable for Looping {
    fn schema(s: &mut TypeSchema<Self>) {
        s.member("RequiredName").rule(
            |l: &Self| l.required_name.is_some(),
            "the RequiredName field is required",
        );
        s.member("Next").nested(|l: &Self| l.next.get());
    }

    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Looping {
    pub fn cyclic() -> Arc<Self> {
        let node = Arc::new(Looping {
            required_name: None,
            next: OnceLock::new(),
        });
        let _ = node.next.set(Arc::clone(&node));
        node
    }
}

/// Nothing declared; requires no validation at all.
pub struct Inert {
    pub anything: i64,
}

impl Validatable for Inert {
    fn shape(&self) -> Shape {
        Self::static_shape()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Error keys in first-seen order.
pub fn keys(report: &ValidationReport) -> Vec<String> {
    report.keys().map(ToString::to_string).collect()
}
