//! Recursive tree validation.
//!
//! JSON shape:
//! {
//!   "name": "Features",
//!   "count": 120,              // count-tree; decision trees use "samples"
//!   "condition": "x > 0.5",    // decision-tree only
//!   "type": "conv",            // model-architecture only, optional
//!   "children": [ ... ]        // nested nodes of the same shape
//! }
//!
//! Four variants share one depth-first traversal parameterized by
//! [`TreeRules`]. Input is a materialized JSON tree, so cycles cannot
//! occur, but depth is still capped so adversarially deep documents
//! cannot exhaust the stack.

use crate::report::{ErrorKind, Reporter};
use crate::validate::{require_nonneg_integer, require_string};
use serde_json::Value;

/// Maximum nesting depth before traversal stops with an error.
pub(crate) const MAX_DEPTH: usize = 64;

/// Per-variant field rules. Each variant is data, not a separate walker.
pub(crate) struct TreeRules {
    /// Required non-negative integer field on every node, if any.
    pub count_field: Option<&'static str>,
    /// Require a non-empty `condition` string on every node.
    pub requires_condition: bool,
    /// `type`, when present, must be a non-empty string.
    pub typed_type: bool,
    /// Every node must carry `children` (an empty list is fine).
    pub children_required: bool,
    /// The root must have at least one child.
    pub root_requires_child: bool,
    /// Minimum number of nodes in the whole tree (1 = no check).
    pub min_total_nodes: usize,
    /// Parent count must be >= the sum of its children's counts.
    pub conservation: bool,
}

pub(crate) const COUNT_TREE: TreeRules = TreeRules {
    count_field: Some("count"),
    requires_condition: false,
    typed_type: false,
    children_required: false,
    root_requires_child: false,
    min_total_nodes: 1,
    conservation: true,
};

pub(crate) const DECISION_TREE: TreeRules = TreeRules {
    count_field: Some("samples"),
    requires_condition: true,
    typed_type: false,
    children_required: false,
    root_requires_child: false,
    min_total_nodes: 1,
    conservation: false,
};

pub(crate) const CLUSTERING_TREE: TreeRules = TreeRules {
    count_field: None,
    requires_condition: false,
    typed_type: false,
    children_required: false,
    root_requires_child: true,
    min_total_nodes: 3,
    conservation: false,
};

pub(crate) const MODEL_ARCHITECTURE: TreeRules = TreeRules {
    count_field: None,
    requires_condition: false,
    typed_type: true,
    children_required: true,
    root_requires_child: false,
    min_total_nodes: 1,
    conservation: false,
};

pub(crate) fn validate_tree(r: &mut Reporter, rules: &TreeRules, value: &Value) {
    if !value.is_object() {
        r.error(ErrorKind::Structural, "Input must be a JSON object");
        return;
    }

    let mut total = 0usize;
    walk(r, rules, value, 0, true, &mut total);

    if total < rules.min_total_nodes {
        r.error(
            ErrorKind::Cardinality,
            format!("Tree must contain at least {} nodes", rules.min_total_nodes),
        );
    }
}

/// Validate one node and recurse into its children.
///
/// Returns the node's own count when the variant has a count field and
/// the value was well-formed, for the parent's conservation check. A node
/// whose structural core is broken (not an object, or an invalid `name`)
/// records one error and is not descended into; siblings continue.
fn walk(
    r: &mut Reporter,
    rules: &TreeRules,
    value: &Value,
    depth: usize,
    is_root: bool,
    total: &mut usize,
) -> Option<u64> {
    if depth >= MAX_DEPTH {
        r.error(
            ErrorKind::Structural,
            format!("Tree exceeds maximum nesting depth of {MAX_DEPTH}"),
        );
        return None;
    }

    let Some(obj) = value.as_object() else {
        r.error(ErrorKind::Structural, "Node must be an object");
        return None;
    };
    *total += 1;

    let Some(name) = require_string(r, obj, "name") else {
        return None;
    };
    let name = name.to_string();

    // Variant scalar fields. Their failure does not stop descent.
    let count = rules
        .count_field
        .and_then(|field| require_nonneg_integer(r, obj, field));
    if rules.requires_condition {
        require_string(r, obj, "condition");
    }
    if rules.typed_type {
        if let Some(ty) = obj.get("type") {
            let valid = ty.as_str().is_some_and(|s| !s.trim().is_empty());
            if !valid {
                r.error(
                    ErrorKind::Structural,
                    "Field 'type' must be a non-empty string",
                );
            }
        }
    }

    let children = match obj.get("children") {
        None => {
            if rules.children_required {
                r.error(ErrorKind::Structural, "Missing required field 'children'");
            }
            if is_root && rules.root_requires_child {
                r.error(ErrorKind::Cardinality, "Root node must have at least one child");
            }
            return count;
        }
        Some(Value::Array(children)) => children,
        Some(_) => {
            r.error(ErrorKind::Structural, "Field 'children' must be an array");
            return count;
        }
    };

    if is_root && rules.root_requires_child && children.is_empty() {
        r.error(ErrorKind::Cardinality, "Root node must have at least one child");
    }

    let mut children_sum = 0u64;
    r.push(&name);
    for (i, child) in children.iter().enumerate() {
        r.push(format!("child{i}"));
        let child_count = walk(r, rules, child, depth + 1, false, total);
        children_sum = children_sum.saturating_add(child_count.unwrap_or(0));
        r.pop();
    }
    r.pop();

    if rules.conservation {
        if let Some(count) = count {
            if count < children_sum {
                r.error(
                    ErrorKind::Conservation,
                    format!(
                        "Node '{name}' count ({count}) is less than sum of children ({children_sum})"
                    ),
                );
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn run(rules: &TreeRules, value: &Value) -> Report {
        let mut r = Reporter::new();
        validate_tree(&mut r, rules, value);
        r.finish()
    }

    fn messages(report: &Report) -> Vec<&str> {
        report.errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn count_tree_with_consistent_counts_is_valid() {
        let value = json!({
            "name": "Features",
            "count": 10,
            "children": [
                {"name": "Numeric", "count": 6},
                {"name": "Categorical", "count": 4}
            ]
        });
        assert!(run(&COUNT_TREE, &value).is_valid());
    }

    #[test]
    fn count_below_children_sum_is_a_conservation_error() {
        let value = json!({
            "name": "Features",
            "count": 9,
            "children": [
                {"name": "Numeric", "count": 6},
                {"name": "Categorical", "count": 4}
            ]
        });
        let report = run(&COUNT_TREE, &value);
        assert_eq!(
            messages(&report),
            vec!["Node 'Features' count (9) is less than sum of children (10)"]
        );
        assert_eq!(report.errors[0].kind, ErrorKind::Conservation);
        assert_eq!(report.errors[0].path, "root");
    }

    #[test]
    fn count_equal_to_children_sum_is_valid() {
        let value = json!({
            "name": "Features",
            "count": 10,
            "children": [
                {"name": "Numeric", "count": 6},
                {"name": "Categorical", "count": 4}
            ]
        });
        assert!(run(&COUNT_TREE, &value).is_valid());
    }

    #[test]
    fn float_count_is_mistyped_and_negative_count_is_a_range_error() {
        let value = json!({
            "name": "Root",
            "count": 5,
            "children": [
                {"name": "A", "count": 2.5},
                {"name": "B", "count": -1}
            ]
        });
        let report = run(&COUNT_TREE, &value);
        assert_eq!(
            messages(&report),
            vec![
                "Field 'count' must be an integer",
                "Field 'count' must be non-negative",
            ]
        );
        assert_eq!(report.errors[0].path, "root.Root.child0");
        assert_eq!(report.errors[0].kind, ErrorKind::Structural);
        assert_eq!(report.errors[1].path, "root.Root.child1");
        assert_eq!(report.errors[1].kind, ErrorKind::Range);
    }

    #[test]
    fn decision_tree_requires_condition_and_samples() {
        let value = json!({
            "name": "Is it a weekday?",
            "condition": "day < 6",
            "samples": 100,
            "children": [
                {"name": "Work", "condition": "hour < 18", "samples": 70},
                {"name": "Rest", "samples": 30}
            ]
        });
        let report = run(&DECISION_TREE, &value);
        assert_eq!(messages(&report), vec!["Missing required field 'condition'"]);
        assert_eq!(report.errors[0].path, "root.Is it a weekday?.child1");
    }

    #[test]
    fn missing_and_mistyped_name_have_distinct_messages() {
        let missing = json!({"count": 3});
        let report = run(&COUNT_TREE, &missing);
        assert_eq!(messages(&report), vec!["Missing required field 'name'"]);

        let mistyped = json!({"name": 7, "count": 3});
        let report = run(&COUNT_TREE, &mistyped);
        assert_eq!(messages(&report), vec!["Field 'name' must be a string"]);

        let blank = json!({"name": "  ", "count": 3});
        let report = run(&COUNT_TREE, &blank);
        assert_eq!(messages(&report), vec!["Field 'name' cannot be empty"]);
    }

    #[test]
    fn broken_node_is_not_descended_but_siblings_are() {
        let value = json!({
            "name": "Root",
            "count": 10,
            "children": [
                {"count": 4, "children": [{"name": 1, "count": -5}]},
                {"name": "Fine", "count": 2.5}
            ]
        });
        let report = run(&COUNT_TREE, &value);
        // The nameless child halts its subtree, so the nested node's
        // errors never appear; the sibling is still checked.
        assert_eq!(
            messages(&report),
            vec![
                "Missing required field 'name'",
                "Field 'count' must be an integer",
            ]
        );
        assert_eq!(report.errors[0].path, "root.Root.child0");
        assert_eq!(report.errors[1].path, "root.Root.child1");
    }

    #[test]
    fn string_children_placeholder_is_rejected() {
        let value = json!({"name": "Root", "count": 1, "children": "none"});
        let report = run(&COUNT_TREE, &value);
        assert_eq!(messages(&report), vec!["Field 'children' must be an array"]);
    }

    #[test]
    fn leaf_without_children_key_is_valid_when_optional() {
        let value = json!({"name": "Leaf", "count": 0});
        assert!(run(&COUNT_TREE, &value).is_valid());
    }

    #[test]
    fn clustering_root_must_have_children_and_three_nodes_total() {
        let lone = json!({"name": "Root"});
        let report = run(&CLUSTERING_TREE, &lone);
        assert_eq!(
            messages(&report),
            vec![
                "Root node must have at least one child",
                "Tree must contain at least 3 nodes",
            ]
        );
        assert_eq!(report.errors[0].kind, ErrorKind::Cardinality);

        let two = json!({"name": "Root", "children": [{"name": "A"}]});
        let report = run(&CLUSTERING_TREE, &two);
        assert_eq!(messages(&report), vec!["Tree must contain at least 3 nodes"]);

        let three = json!({"name": "Root", "children": [{"name": "A"}, {"name": "B"}]});
        assert!(run(&CLUSTERING_TREE, &three).is_valid());
    }

    #[test]
    fn clustering_ignores_count_and_condition() {
        let value = json!({
            "name": "Root",
            "count": "not even a number",
            "children": [
                {"name": "A", "condition": 42},
                {"name": "B"}
            ]
        });
        assert!(run(&CLUSTERING_TREE, &value).is_valid());
    }

    #[test]
    fn model_architecture_requires_children_and_typed_type() {
        let value = json!({
            "name": "Model",
            "type": "sequential",
            "children": [
                {"name": "Dense", "type": "", "children": []},
                {"name": "Dropout"}
            ]
        });
        let report = run(&MODEL_ARCHITECTURE, &value);
        assert_eq!(
            messages(&report),
            vec![
                "Field 'type' must be a non-empty string",
                "Missing required field 'children'",
            ]
        );
        assert_eq!(report.errors[0].path, "root.Model.child0");
        assert_eq!(report.errors[1].path, "root.Model.child1");
    }

    #[test]
    fn model_architecture_empty_children_list_is_valid() {
        let value = json!({"name": "Model", "children": []});
        assert!(run(&MODEL_ARCHITECTURE, &value).is_valid());
    }

    #[test]
    fn overly_deep_tree_is_rejected() {
        let mut value = json!({"name": "leaf", "count": 0});
        for i in 0..(MAX_DEPTH + 4) {
            value = json!({"name": format!("n{i}"), "count": 0, "children": [value]});
        }
        let report = run(&COUNT_TREE, &value);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.message == "Tree exceeds maximum nesting depth of 64")
        );
    }

    #[test]
    fn top_level_non_object_is_rejected() {
        let report = run(&COUNT_TREE, &json!([1, 2, 3]));
        assert_eq!(messages(&report), vec!["Input must be a JSON object"]);
    }
}
