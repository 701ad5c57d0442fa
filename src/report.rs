//! Path-qualified validation errors and their accumulator.
//!
//! Validators never fail fast on malformed input. Every problem is
//! appended to a [`Reporter`] together with the dotted path of the
//! offending value (e.g. `root.Parent.child0`), and the caller reads the
//! final [`Report`] once the whole document has been walked.

use serde::Serialize;
use thiserror::Error;

/// Broad classification of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Missing or mis-typed required field, or wrong container shape.
    Structural,
    /// Duplicate identifier within one input.
    Uniqueness,
    /// Link endpoint that resolves to no declared node.
    Referential,
    /// Negative or out-of-range numeric value.
    Range,
    /// Too few nodes or entries.
    Cardinality,
    /// Parent aggregate inconsistent with its children, or a pipeline
    /// without a dropout point.
    Conservation,
    /// Matrix entry that breaks symmetry.
    Symmetry,
    /// Matrix diagonal entry that is not exactly 1.0.
    Diagonal,
}

/// One validation error, anchored at the dotted path where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub kind: ErrorKind,
}

/// Outcome of one validation call. Valid iff no errors were collected.
///
/// Errors appear in the order they were found, which follows document
/// order, so repeated calls over the same input produce identical reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub errors: Vec<ValidationError>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Error accumulator threaded through a single validation call.
///
/// Callers push a segment (a field name, a node name, or an index) before
/// recursing into a value and pop it on return. Paths are rendered as
/// `root` for the top level and `root.<seg>.<seg>...` below it.
#[derive(Debug, Default)]
pub struct Reporter {
    segments: Vec<String>,
    errors: Vec<ValidationError>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(index.to_string());
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Dotted path of the value currently being inspected.
    pub fn path(&self) -> String {
        if self.segments.is_empty() {
            "root".to_string()
        } else {
            format!("root.{}", self.segments.join("."))
        }
    }

    /// Record one error at the current path.
    pub fn error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        let path = self.path();
        self.errors.push(ValidationError {
            path,
            message: message.into(),
            kind,
        });
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn finish(self) -> Report {
        Report {
            errors: self.errors,
        }
    }
}
