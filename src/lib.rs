//! Structural and numeric validation for ML visualization inputs.
//!
//! User-supplied JSON describing charts (pipelines, trees, graphs,
//! matrices, distributions) is checked here before anything is drawn.
//! Parsing the text is the caller's job: validators inspect an
//! already-parsed [`serde_json::Value`] and collect path-qualified errors
//! instead of failing on the first problem, so one call can surface every
//! independent defect in a document.
//!
//! The single entry point is [`validate`], which dispatches on [`Kind`]
//! and returns a [`Report`].

pub mod diagnostics;
pub mod report;
pub mod validate;

pub use report::{ErrorKind, Report, ValidationError};
pub use validate::{Kind, UnknownKind, validate};

pub type Result<T> = anyhow::Result<T>;
