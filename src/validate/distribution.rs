//! Flat-list validation: class distributions, resource tables, and
//! two-point metric series.
//!
//! JSON shape (distribution):
//! [
//!   {"class": "cat", "count": 1200},
//!   {"class": "dog", "count": 800}
//! ]

use crate::report::{ErrorKind, Reporter};
use crate::validate::graph::NodeId;
use crate::validate::{optional_nonneg_number, require_nonneg_number, require_string};
use serde_json::Value;
use std::collections::BTreeSet;

pub(crate) fn validate_distribution(r: &mut Reporter, value: &Value) {
    let Some(items) = value.as_array() else {
        r.error(ErrorKind::Structural, "Data must be a list of class objects");
        return;
    };
    if items.is_empty() {
        r.error(ErrorKind::Cardinality, "At least one class is required");
        return;
    }

    for (i, item) in items.iter().enumerate() {
        r.push_index(i);
        match item.as_object() {
            None => r.error(ErrorKind::Structural, "Each item must be an object"),
            Some(item) => {
                require_string(r, item, "class");
                require_nonneg_number(r, item, "count");
            }
        }
        r.pop();
    }
}

/// Per-stage resource table: each entry needs an id, a name, and at
/// least one of `time`/`compute`, both non-negative when present.
pub(crate) fn validate_resources(r: &mut Reporter, value: &Value) {
    let Some(items) = value.as_array() else {
        r.error(ErrorKind::Structural, "Data must be a list of resource entries");
        return;
    };
    if items.is_empty() {
        r.error(ErrorKind::Cardinality, "At least one resource entry is required");
        return;
    }

    let mut ids = BTreeSet::<NodeId>::new();
    for (i, item) in items.iter().enumerate() {
        r.push_index(i);
        let Some(item) = item.as_object() else {
            r.error(ErrorKind::Structural, "Each entry must be an object");
            r.pop();
            continue;
        };

        match item.get("id") {
            None => r.error(ErrorKind::Structural, "Missing required field 'id'"),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
                if let Some(v) = n.as_i64() {
                    if !ids.insert(NodeId::Int(v)) {
                        r.error(ErrorKind::Uniqueness, format!("Duplicate id found: {v}"));
                    }
                }
            }
            Some(Value::String(s)) => {
                if !ids.insert(NodeId::Text(s.clone())) {
                    r.error(ErrorKind::Uniqueness, format!("Duplicate id found: {s}"));
                }
            }
            Some(_) => r.error(
                ErrorKind::Structural,
                "Field 'id' must be an integer or a string",
            ),
        }

        require_string(r, item, "name");

        if !item.contains_key("time") && !item.contains_key("compute") {
            r.error(
                ErrorKind::Structural,
                "Each entry must have a 'time' or 'compute' field",
            );
        } else {
            optional_nonneg_number(r, item, "time");
            optional_nonneg_number(r, item, "compute");
        }
        r.pop();
    }
}

/// A metric plotted against a varying key (hyperparameter value,
/// dataset name). Needs at least two points to show a trend.
pub(crate) struct SeriesRules {
    /// Field naming the varying quantity. Any JSON value is accepted.
    pub key_field: &'static str,
    pub min_entries_message: &'static str,
}

pub(crate) const HYPERPARAMETER: SeriesRules = SeriesRules {
    key_field: "paramValue",
    min_entries_message: "Need at least 2 data points",
};

pub(crate) const DATASET_VARIATIONS: SeriesRules = SeriesRules {
    key_field: "dataset",
    min_entries_message: "Need at least 2 datasets",
};

pub(crate) fn validate_series(r: &mut Reporter, rules: &SeriesRules, value: &Value) {
    let Some(items) = value.as_array() else {
        r.error(ErrorKind::Structural, "Data must be a list of objects");
        return;
    };
    if items.len() < 2 {
        r.error(ErrorKind::Cardinality, rules.min_entries_message);
    }

    for (i, item) in items.iter().enumerate() {
        r.push_index(i);
        match item.as_object() {
            None => r.error(ErrorKind::Structural, "Each item must be an object"),
            Some(item) => {
                if !item.contains_key(rules.key_field) {
                    r.error(
                        ErrorKind::Structural,
                        format!("Missing required field '{}'", rules.key_field),
                    );
                }
                match item.get("metric") {
                    None => r.error(ErrorKind::Structural, "Missing required field 'metric'"),
                    Some(Value::Number(_)) => {}
                    Some(_) => r.error(ErrorKind::Structural, "Field 'metric' must be a number"),
                }
            }
        }
        r.pop();
    }
}
