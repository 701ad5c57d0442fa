//! Square-matrix validation (correlation, similarity, confusion).
//!
//! JSON shape:
//! {
//!   "samples": ["Article1", "Article2"],   // confusion matrices use "classes"
//!   "matrix": [
//!     [1.00, 0.85],
//!     [0.85, 1.00]
//!   ]
//! }
//!
//! The numeric bound is part of [`MatrixRules`], so the same walker
//! serves correlation ([-1, 1]), similarity ([0, 1]) and confusion
//! (non-negative counts) matrices. Diagonal unity is exact; symmetry is
//! compared within [`SYMMETRY_TOLERANCE`].

use crate::report::{ErrorKind, Reporter};
use serde_json::Value;
use std::collections::BTreeSet;

/// Absolute tolerance for the symmetry comparison. Diagonal checks do
/// not use it: a diagonal entry must equal 1.0 exactly.
pub(crate) const SYMMETRY_TOLERANCE: f64 = 1e-9;

pub(crate) struct MatrixRules {
    /// Key of the label list paired with the matrix.
    pub label_field: &'static str,
    pub label_type_message: &'static str,
    pub duplicate_prefix: &'static str,
    pub dimension_message: &'static str,
    pub min_labels: Option<(usize, &'static str)>,
    pub unit_diagonal: bool,
    pub symmetric: bool,
    pub min_value: f64,
    pub max_value: f64,
    pub range_message: &'static str,
}

pub(crate) const CORRELATION: MatrixRules = MatrixRules {
    label_field: "samples",
    label_type_message: "Sample names must be strings",
    duplicate_prefix: "Duplicate sample name",
    dimension_message: "Number of samples must match matrix dimensions",
    min_labels: None,
    unit_diagonal: true,
    symmetric: true,
    min_value: -1.0,
    max_value: 1.0,
    range_message: "Correlation values must be between -1 and 1",
};

pub(crate) const SIMILARITY: MatrixRules = MatrixRules {
    label_field: "samples",
    label_type_message: "Sample names must be strings",
    duplicate_prefix: "Duplicate sample name",
    dimension_message: "Number of samples must match matrix dimensions",
    min_labels: None,
    unit_diagonal: true,
    symmetric: true,
    min_value: 0.0,
    max_value: 1.0,
    range_message: "Similarity values must be between 0 and 1",
};

pub(crate) const CONFUSION: MatrixRules = MatrixRules {
    label_field: "classes",
    label_type_message: "Class names must be strings",
    duplicate_prefix: "Duplicate class name",
    dimension_message: "Number of classes must match matrix dimensions",
    min_labels: Some((2, "Must have at least 2 classes")),
    unit_diagonal: false,
    symmetric: false,
    min_value: 0.0,
    max_value: f64::INFINITY,
    range_message: "Matrix values must be non-negative",
};

pub(crate) fn validate_matrix(r: &mut Reporter, rules: &MatrixRules, value: &Value) {
    let Some(obj) = value.as_object() else {
        r.error(ErrorKind::Structural, "Input must be a JSON object");
        return;
    };

    // 1) Label list: strings, no duplicates.
    let labels = match obj.get(rules.label_field) {
        None => {
            r.error(
                ErrorKind::Structural,
                format!("Missing required field '{}'", rules.label_field),
            );
            None
        }
        Some(Value::Array(labels)) => {
            let mut seen = BTreeSet::<&str>::new();
            r.push(rules.label_field);
            for (i, label) in labels.iter().enumerate() {
                r.push_index(i);
                match label.as_str() {
                    None => r.error(ErrorKind::Structural, rules.label_type_message),
                    Some(s) => {
                        if !seen.insert(s) {
                            r.error(
                                ErrorKind::Uniqueness,
                                format!("{}: {s}", rules.duplicate_prefix),
                            );
                        }
                    }
                }
                r.pop();
            }
            r.pop();
            Some(labels.len())
        }
        Some(_) => {
            r.error(
                ErrorKind::Structural,
                format!("Field '{}' must be an array", rules.label_field),
            );
            None
        }
    };

    if let (Some(n), Some((min, message))) = (labels, rules.min_labels) {
        if n < min {
            r.push(rules.label_field);
            r.error(ErrorKind::Cardinality, message);
            r.pop();
        }
    }

    // 2) Matrix shape.
    let rows = match obj.get("matrix") {
        None => {
            r.error(ErrorKind::Structural, "Missing required field 'matrix'");
            return;
        }
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            r.error(ErrorKind::Structural, "Field 'matrix' must be an array");
            return;
        }
    };

    if let Some(n) = labels {
        if rows.len() != n {
            r.push("matrix");
            r.error(ErrorKind::Structural, rules.dimension_message);
            r.pop();
            return;
        }
    }

    // 3) Cells: numeric, in range, unit diagonal.
    let n = rows.len();
    let mut parsed: Vec<Vec<Option<f64>>> = Vec::with_capacity(n);
    let mut square = true;
    r.push("matrix");
    for (i, row) in rows.iter().enumerate() {
        r.push_index(i);
        let Some(row) = row.as_array() else {
            r.error(ErrorKind::Structural, "Matrix rows must be arrays");
            parsed.push(Vec::new());
            square = false;
            r.pop();
            continue;
        };
        if row.len() != n {
            r.error(ErrorKind::Structural, "Matrix must be square");
            square = false;
        }

        let mut cells = Vec::with_capacity(row.len());
        for (j, cell) in row.iter().enumerate() {
            r.push_index(j);
            let parsed_cell = match cell.as_f64() {
                None => {
                    r.error(ErrorKind::Structural, "Matrix values must be numbers");
                    None
                }
                Some(v) if rules.unit_diagonal && i == j => {
                    if v != 1.0 {
                        r.error(ErrorKind::Diagonal, "Diagonal values must be exactly 1.0");
                    }
                    Some(v)
                }
                Some(v) => {
                    if v < rules.min_value || v > rules.max_value {
                        r.error(ErrorKind::Range, rules.range_message);
                    }
                    Some(v)
                }
            };
            cells.push(parsed_cell);
            r.pop();
        }
        parsed.push(cells);
        r.pop();
    }

    // 4) Symmetry, once the shape is known to be square.
    if rules.symmetric && square {
        for i in 0..n {
            for j in (i + 1)..n {
                if let (Some(a), Some(b)) = (parsed[i][j], parsed[j][i]) {
                    if (a - b).abs() > SYMMETRY_TOLERANCE {
                        r.error(
                            ErrorKind::Symmetry,
                            format!("Matrix is not symmetric at ({i}, {j})"),
                        );
                    }
                }
            }
        }
    }
    r.pop();
}
