//! Ordered, path-keyed validation report
//!
//! The report is the single error accumulator for a traversal: an ordered
//! map from rendered path (`Child.Name`, `Children[1].Name`, `[0]`) to the
//! messages produced at that path. First-seen key order is preserved across
//! the whole traversal, which keeps shallower paths ahead of deeper ones
//! for a depth-first, declaration-ordered walk.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered mapping of error path to failure messages.
///
/// An empty report means the target validated clean. Keys are unique;
/// appending to an existing key extends its message list without
/// reordering it.
///
/// # Examples
///
/// ```rust,ignore
/// let report = validator.validate(&target)?;
/// if !report.is_valid() {
///     for (path, messages) in report.iter() {
///         eprintln!("{path}: {}", messages.join("; "));
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    entries: IndexMap<String, Vec<String>>,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct error paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Messages recorded for `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Error paths in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(path, messages)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }

    /// Records one message under `path`, creating the key on first use.
    pub fn append(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Merges a child report under `prefix`.
    ///
    /// Every child key becomes `prefix + key`; an empty child key (a result
    /// naming the current object itself) maps to `prefix` with a trailing
    /// `.` stripped. Existing keys are appended to, never overwritten, and
    /// first-seen order is preserved.
    pub fn merge(&mut self, prefix: &str, child: ValidationReport) {
        for (key, messages) in child.entries {
            let merged = if key.is_empty() {
                prefix.strip_suffix('.').unwrap_or(prefix).to_string()
            } else {
                format!("{prefix}{key}")
            };
            self.entries.entry(merged).or_default().extend(messages);
        }
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_preserves_first_seen_order() {
        let mut report = ValidationReport::new();
        report.append("B", "first");
        report.append("A", "second");
        report.append("B", "third");

        let keys: Vec<_> = report.keys().collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(report.get("B"), Some(&["first".to_string(), "third".to_string()][..]));
    }

    #[test]
    fn merge_prefixes_child_keys() {
        let mut child = ValidationReport::new();
        child.append("Name", "required");
        child.append("Age", "too small");

        let mut parent = ValidationReport::new();
        parent.append("Own", "own error");
        parent.merge("Child.", child);

        let keys: Vec<_> = parent.keys().collect();
        assert_eq!(keys, vec!["Own", "Child.Name", "Child.Age"]);
    }

    #[test]
    fn merge_with_empty_child_key_uses_bare_prefix() {
        let mut child = ValidationReport::new();
        child.append("", "object invalid");

        let mut parent = ValidationReport::new();
        parent.merge("Items[1].", child);

        assert_eq!(parent.keys().collect::<Vec<_>>(), vec!["Items[1]"]);
    }

    #[test]
    fn merge_appends_instead_of_overwriting() {
        let mut first = ValidationReport::new();
        first.append("Name", "first message");

        let mut second = ValidationReport::new();
        second.append("Name", "second message");

        let mut parent = ValidationReport::new();
        parent.merge("", first);
        parent.merge("", second);

        assert_eq!(parent.len(), 1);
        assert_eq!(
            parent.get("Name"),
            Some(&["first message".to_string(), "second message".to_string()][..])
        );
    }

    #[test]
    fn empty_report_is_valid() {
        assert!(ValidationReport::new().is_valid());
        assert!(ValidationReport::new().is_empty());
    }
}
