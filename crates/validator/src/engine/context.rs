//! Per-call traversal state

use std::any::TypeId;

use crate::core::ValidationReport;
use crate::engine::path::Path;

/// How the current call drives asynchronous capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Synchronous entry point. With `allow_async` set, asynchronous
    /// capabilities are driven by blocking the calling thread; without it,
    /// reaching one is an error.
    Sync { allow_async: bool },
    /// Asynchronous entry point; suspends at asynchronous capabilities.
    Async,
}

impl Mode {
    pub(crate) fn permits_async(self) -> bool {
        !matches!(self, Mode::Sync { allow_async: false })
    }
}

/// State owned by one traversal. Never shared across concurrent calls.
pub(crate) struct Traversal {
    pub(crate) path: Path,
    pub(crate) report: ValidationReport,
    pub(crate) mode: Mode,
    pub(crate) recurse: bool,
    /// Identities of values on the current descent, for cycle detection.
    /// Keyed by runtime type and address together so an inline member at
    /// offset zero is not mistaken for its parent.
    pub(crate) stack: Vec<(TypeId, usize)>,
}

impl Traversal {
    pub(crate) fn new(mode: Mode, recurse: bool) -> Self {
        Self {
            path: Path::new(),
            report: ValidationReport::new(),
            mode,
            recurse,
            stack: Vec::new(),
        }
    }
}

/// Context handed to self-validation hooks and external validators.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    path: &'a str,
    type_name: &'static str,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(path: &'a str, type_name: &'static str) -> Self {
        Self { path, type_name }
    }

    /// Rendered path of the object under validation. Empty at the root.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path
    }

    /// Name of the runtime type under validation.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}
