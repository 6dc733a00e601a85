//! Structural comparison of two env snapshots.
//!
//! [`compare`] partitions the union of both key sets into added, removed,
//! modified and unchanged keys. [`render`] turns the result into the
//! human-readable report printed by `envpull diff`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::codec::EnvSnapshot;

/// Values longer than this many characters are cut in rendered output.
pub const MAX_DISPLAY_CHARS: usize = 50;

/// Report shown when neither side has changes.
pub const NO_DIFFERENCES: &str = "No differences found.";

/// A value that differs between local and remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub local: String,
    pub remote: String,
}

/// Result of comparing a local snapshot against a remote one.
///
/// Every key of `local ∪ remote` lands in exactly one of the four maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Keys only in remote, with the remote value.
    pub added: BTreeMap<String, String>,
    /// Keys only in local, with the local value.
    pub removed: BTreeMap<String, String>,
    /// Keys in both with differing values.
    pub modified: BTreeMap<String, Change>,
    /// Keys in both with identical values.
    pub same: BTreeMap<String, String>,
}

impl DiffResult {
    /// Whether anything was added, removed or modified.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    /// Partition sizes for the summary line.
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            modified: self.modified.len(),
            unchanged: self.same.len(),
        }
    }
}

/// Per-partition counts of a [`DiffResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

/// Compare two snapshots.
///
/// Both snapshots iterate in key order, so a single merge pass over the
/// two sorted sequences is enough. Values are compared byte for byte.
///
/// ```
/// use envpull::env::{compare, EnvSnapshot};
///
/// let local: EnvSnapshot = [("A", "1"), ("B", "2")].into_iter().collect();
/// let remote: EnvSnapshot = [("B", "2"), ("C", "3")].into_iter().collect();
///
/// let diff = compare(&local, &remote);
/// assert_eq!(diff.added.get("C").map(String::as_str), Some("3"));
/// assert_eq!(diff.removed.get("A").map(String::as_str), Some("1"));
/// assert!(diff.modified.is_empty());
/// assert_eq!(diff.same.get("B").map(String::as_str), Some("2"));
/// ```
pub fn compare(local: &EnvSnapshot, remote: &EnvSnapshot) -> DiffResult {
    let mut result = DiffResult::default();
    let mut left = local.iter().peekable();
    let mut right = remote.iter().peekable();

    loop {
        let order = match (left.peek(), right.peek()) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((lk, _)), Some((rk, _))) => lk.cmp(rk),
        };

        match order {
            Ordering::Less => {
                if let Some((key, value)) = left.next() {
                    result.removed.insert(key.clone(), value.clone());
                }
            }
            Ordering::Greater => {
                if let Some((key, value)) = right.next() {
                    result.added.insert(key.clone(), value.clone());
                }
            }
            Ordering::Equal => {
                if let (Some((key, lv)), Some((_, rv))) = (left.next(), right.next()) {
                    if lv == rv {
                        result.same.insert(key.clone(), lv.clone());
                    } else {
                        result.modified.insert(
                            key.clone(),
                            Change {
                                local: lv.clone(),
                                remote: rv.clone(),
                            },
                        );
                    }
                }
            }
        }
    }

    result
}

/// Role of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Section heading.
    Heading,
    /// Key present only in remote.
    Added,
    /// Key present only in local.
    Removed,
    /// Key whose value changed.
    Modified,
    /// The old value of a modified key.
    OldValue,
    /// The new value of a modified key.
    NewValue,
    /// Blank separator between sections.
    Blank,
}

/// One line of a rendered diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Render a diff as tagged lines.
///
/// Sections come in the order added, removed, modified; empty sections are
/// omitted and keys are sorted within each section. Returns no lines when
/// there are no changes.
pub fn render_lines(diff: &DiffResult) -> Vec<DiffLine> {
    let mut lines = Vec::new();

    if !diff.added.is_empty() {
        lines.push(DiffLine::new(
            LineKind::Heading,
            "+ Added (in remote, not in local):",
        ));
        for (key, value) in &diff.added {
            lines.push(DiffLine::new(
                LineKind::Added,
                format!("  + {}={}", key, truncate_value(value)),
            ));
        }
    }

    if !diff.removed.is_empty() {
        if !lines.is_empty() {
            lines.push(DiffLine::new(LineKind::Blank, ""));
        }
        lines.push(DiffLine::new(
            LineKind::Heading,
            "- Removed (in local, not in remote):",
        ));
        for (key, value) in &diff.removed {
            lines.push(DiffLine::new(
                LineKind::Removed,
                format!("  - {}={}", key, truncate_value(value)),
            ));
        }
    }

    if !diff.modified.is_empty() {
        if !lines.is_empty() {
            lines.push(DiffLine::new(LineKind::Blank, ""));
        }
        lines.push(DiffLine::new(LineKind::Heading, "~ Modified:"));
        for (key, change) in &diff.modified {
            lines.push(DiffLine::new(LineKind::Modified, format!("  ~ {}:", key)));
            lines.push(DiffLine::new(
                LineKind::OldValue,
                format!("    - {}", truncate_value(&change.local)),
            ));
            lines.push(DiffLine::new(
                LineKind::NewValue,
                format!("    + {}", truncate_value(&change.remote)),
            ));
        }
    }

    lines
}

/// Render a diff as plain text.
///
/// ```
/// use envpull::env::{compare, render, EnvSnapshot};
///
/// let snapshot: EnvSnapshot = [("A", "1")].into_iter().collect();
/// assert_eq!(render(&compare(&snapshot, &snapshot)), "No differences found.");
/// ```
pub fn render(diff: &DiffResult) -> String {
    let lines = render_lines(diff);
    if lines.is_empty() {
        return NO_DIFFERENCES.to_string();
    }

    let mut out = String::new();
    for line in &lines {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Cut a value to [`MAX_DISPLAY_CHARS`] characters, marking the cut with `...`.
pub fn truncate_value(value: &str) -> String {
    match value.char_indices().nth(MAX_DISPLAY_CHARS) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
