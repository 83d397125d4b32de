//! Error-path rendering
//!
//! Paths name the location of a failing member inside the graph: member
//! segments join with `.`, index segments append directly with no
//! separator. `Field`, `Child.Field`, `[1].Field` and `Children[1].Field`
//! are all well-formed.

use std::borrow::Cow;
use std::fmt::Write as _;

use smallvec::SmallVec;

#[derive(Debug, Clone)]
pub(crate) enum PathSegment {
    Member(Cow<'static, str>),
    Index(usize),
}

/// Current traversal position, owned by exactly one walk.
#[derive(Debug, Default)]
pub(crate) struct Path {
    segments: SmallVec<[PathSegment; 8]>,
}

impl Path {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_member(&mut self, name: Cow<'static, str>) {
        self.segments.push(PathSegment::Member(name));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// Renders the path as an error key. Empty at the root.
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Member(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    // render() never fails for String
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }

    /// Renders the path with `leaf` as a final member segment.
    pub(crate) fn render_with(&self, leaf: &str) -> String {
        let mut out = self.render();
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(leaf);
        out
    }
}
