//! Schema declaration API
//!
//! Types opt into validation by describing themselves in
//! [`Validatable::schema`](crate::Validatable::schema) through a
//! [`TypeSchema`]: declare members, attach rules and messages, wire up
//! nested accessors, and optionally register a self-validation hook. The
//! builder compiles the declaration into an erased [`TypeDescriptor`] once
//! per type; everything after that is closure calls.
//!
//! # Example
//!
//! ```rust,ignore
//! impl Validatable for Order {
//!     fn schema(schema: &mut TypeSchema<Self>) {
//!         schema
//!             .member("Id")
//!             .rule(|o: &Order| o.id > 0, "Id must be positive");
//!         schema
//!             .member("Customer")
//!             .nested(|o: &Order| Some(&o.customer));
//!     }
//!
//!     fn shape(&self) -> Shape {
//!         Self::static_shape()
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::marker::PhantomData;

use futures::future::BoxFuture;

use crate::core::{AccessError, Validatable, Violation};
use crate::engine::RuleContext;
use crate::schema::descriptor::{Accessor, MemberDescriptor, Rule, SelfRule, TypeDescriptor};

/// Builder for one type's validation schema.
///
/// Handed to [`Validatable::schema`](crate::Validatable::schema) by the
/// engine on first use of the type; never constructed by user code.
pub struct TypeSchema<T> {
    type_name: &'static str,
    members: Vec<MemberDescriptor>,
    self_rule: Option<SelfRule>,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Validatable> TypeSchema<T> {
    pub(crate) fn new() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            members: Vec::new(),
            self_rule: None,
            _owner: PhantomData,
        }
    }

    /// Declares a member. The name is used verbatim as the path segment in
    /// error keys. Returns a [`MemberSchema`] for attaching rules and a
    /// nested accessor.
    pub fn member(&mut self, name: impl Into<Cow<'static, str>>) -> MemberSchema<'_, T> {
        self.members.push(MemberDescriptor::new(name.into()));
        let index = self.members.len() - 1;
        MemberSchema {
            members: &mut self.members,
            index,
            _owner: PhantomData,
        }
    }

    /// Registers a synchronous self-validation hook, run during recursive
    /// validation after member rules and before external validators, whether
    /// or not the member rules passed.
    pub fn validate_self<F>(&mut self, hook: F)
    where
        F: for<'a> Fn(&'a T, &'a RuleContext<'a>) -> Vec<Violation> + Send + Sync + 'static,
    {
        self.self_rule = Some(SelfRule::Sync(Box::new(move |owner, ctx| {
            match owner.downcast_ref::<T>() {
                Some(owner) => hook(owner, ctx),
                None => {
                    debug_assert!(false, "self-validation hook received foreign type");
                    Vec::new()
                }
            }
        })));
    }

    /// Registers an asynchronous self-validation hook. A type carrying one
    /// can only be reached through [`validate_async`](crate::Validator::validate_async)
    /// or a sync call that opted into async execution.
    pub fn validate_self_async<F>(&mut self, hook: F)
    where
        F: for<'a> Fn(&'a T, &'a RuleContext<'a>) -> BoxFuture<'a, Vec<Violation>>
            + Send
            + Sync
            + 'static,
    {
        self.self_rule = Some(SelfRule::Async(Box::new(move |owner, ctx| {
            match owner.downcast_ref::<T>() {
                Some(owner) => hook(owner, ctx),
                None => {
                    debug_assert!(false, "self-validation hook received foreign type");
                    Box::pin(futures::future::ready(Vec::new()))
                }
            }
        })));
    }

    /// Imports another type's schema, projecting through `project`.
    ///
    /// Inherited members come first, in the base type's declaration order.
    /// A self-validation hook registered on the base is adopted unless this
    /// schema registers its own (later registration wins).
    pub fn inherit<B: Validatable>(&mut self, project: fn(&T) -> &B) {
        let base = build_descriptor::<B>();
        let mut imported = Vec::with_capacity(base.members.len() + self.members.len());
        for member in base.members {
            imported.push(reproject_member::<T, B>(member, project));
        }
        imported.append(&mut self.members);
        self.members = imported;
        if self.self_rule.is_none() {
            self.self_rule = base.self_rule.map(|rule| reproject_self_rule::<T, B>(rule, project));
        }
    }

    pub(crate) fn finish(self) -> TypeDescriptor {
        TypeDescriptor {
            type_name: self.type_name,
            members: self.members,
            self_rule: self.self_rule,
        }
    }
}

/// Builder handle for one declared member.
#[must_use = "builder methods must be chained or built"]
pub struct MemberSchema<'s, T> {
    members: &'s mut Vec<MemberDescriptor>,
    index: usize,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Validatable> MemberSchema<'_, T> {
    fn current(&mut self) -> &mut MemberDescriptor {
        &mut self.members[self.index]
    }

    /// Attaches a rule. The predicate sees the owning value; returning
    /// `false` records `message` under this member's path. Rules are
    /// evaluated independently, so one member can report several messages.
    pub fn rule<F>(mut self, predicate: F, message: impl Into<Cow<'static, str>>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.current().rules.push(Rule {
            message,
            predicate: Box::new(move |owner: &dyn Any| match owner.downcast_ref::<T>() {
                Some(owner) => predicate(owner),
                None => {
                    debug_assert!(false, "rule predicate received foreign type");
                    true
                }
            }),
        });
        self
    }

    /// Marks the member as a nested validatable value and wires up its
    /// accessor. `None` means the member is currently absent; absent
    /// members are not descended into.
    pub fn nested<C, F>(self, accessor: F) -> Self
    where
        C: Validatable,
        F: for<'a> Fn(&'a T) -> Option<&'a C> + Send + Sync + 'static,
    {
        self.try_nested::<C, _>(move |owner: &T| Ok(accessor(owner)))
    }

    /// Like [`nested`](Self::nested) but the accessor may fail, surfacing
    /// as an error from the validation call when recursion reaches the
    /// member.
    pub fn try_nested<C, F>(mut self, accessor: F) -> Self
    where
        C: Validatable,
        F: for<'a> Fn(&'a T) -> Result<Option<&'a C>, AccessError> + Send + Sync + 'static,
    {
        let member = self.current();
        member.accessor = Some(erase_accessor::<T, C, F>(accessor));
        member.declared = Some(C::static_shape());
        member.recurse = true;
        self
    }

    /// Keeps the member's rules but excludes its value from recursive
    /// traversal.
    pub fn skip_recursion(mut self) -> Self {
        self.current().recurse = false;
        self
    }
}

/// Runs `T`'s schema declaration and compiles it.
pub(crate) fn build_descriptor<T: Validatable>() -> TypeDescriptor {
    let mut schema = TypeSchema::<T>::new();
    T::schema(&mut schema);
    schema.finish()
}

fn erase_accessor<T, C, F>(accessor: F) -> Accessor
where
    T: Validatable,
    C: Validatable,
    F: for<'a> Fn(&'a T) -> Result<Option<&'a C>, AccessError> + Send + Sync + 'static,
{
    Box::new(move |owner: &dyn Any| {
        let Some(owner) = owner.downcast_ref::<T>() else {
            return Err(AccessError::new("accessor received foreign type"));
        };
        Ok(accessor(owner)?.map(|child| child as &dyn Validatable))
    })
}

fn reproject_member<T, B>(member: MemberDescriptor, project: fn(&T) -> &B) -> MemberDescriptor
where
    T: Validatable,
    B: Validatable,
{
    let mut out = MemberDescriptor::new(member.name);
    out.declared = member.declared;
    out.recurse = member.recurse;
    for rule in member.rules {
        let predicate = rule.predicate;
        out.rules.push(Rule {
            message: rule.message,
            predicate: Box::new(move |owner: &dyn Any| match owner.downcast_ref::<T>() {
                Some(owner) => predicate(project(owner) as &dyn Any),
                None => {
                    debug_assert!(false, "rule predicate received foreign type");
                    true
                }
            }),
        });
    }
    out.accessor = member.accessor.map(|base| {
        erase_dyn_accessor(move |owner: &dyn Any| {
            let Some(owner) = owner.downcast_ref::<T>() else {
                return Err(AccessError::new("accessor received foreign type"));
            };
            base(project(owner) as &dyn Any)
        })
    });
    out
}

// The explicit higher-ranked bound drives closure inference; a bare
// `Box::new(..) as Accessor` cast pins the closure to a single lifetime
// and fails to coerce.
fn erase_dyn_accessor<F>(accessor: F) -> Accessor
where
    F: for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Validatable>, AccessError>
        + Send
        + Sync
        + 'static,
{
    Box::new(accessor)
}

fn reproject_self_rule<T, B>(rule: SelfRule, project: fn(&T) -> &B) -> SelfRule
where
    T: Validatable,
    B: Validatable,
{
    match rule {
        SelfRule::Sync(hook) => SelfRule::Sync(Box::new(move |owner, ctx| {
            match owner.downcast_ref::<T>() {
                Some(owner) => hook(project(owner) as &dyn Any, ctx),
                None => {
                    debug_assert!(false, "self-validation hook received foreign type");
                    Vec::new()
                }
            }
        })),
        SelfRule::Async(hook) => SelfRule::Async(Box::new(move |owner, ctx| {
            match owner.downcast_ref::<T>() {
                Some(owner) => hook(project(owner) as &dyn Any, ctx),
                None => {
                    debug_assert!(false, "self-validation hook received foreign type");
                    Box::pin(futures::future::ready(Vec::new()))
                }
            }
        })),
    }
}
