//! Node-link graph validation.
//!
//! JSON shape:
//! {
//!   "nodes": [
//!     {"id": 0, "name": "Raw Data"},       // ids may be strings per variant
//!     {"id": 1, "name": "Processed"}
//!   ],
//!   "links": [
//!     {"source": 0, "target": 1, "value": 100}   // or "weight" / "type"
//!   ]
//! }
//!
//! One skeleton parameterized by [`GraphRules`]: id type, required node
//! fields, minimum cardinality, link payload rule, and whether the
//! pipeline dropout rule applies.

use crate::report::{ErrorKind, Reporter};
use crate::validate::{optional_string, require_nonneg_number, require_string};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Accepted id representations for a variant.
pub(crate) enum IdType {
    /// Integer ids (pipeline-style graphs).
    Integer,
    /// String ids (knowledge/relation graphs).
    Text,
    /// Either.
    Any,
}

/// Numeric payload carried by each link.
pub(crate) enum LinkValue {
    /// `value` required, numeric, non-negative (flow-style graphs).
    Flow,
    /// `weight` optional; must be numeric, and strictly positive when
    /// `positive` is set. Negative weights are fine otherwise.
    Weight { positive: bool },
    /// No numeric payload expected.
    None,
}

pub(crate) struct GraphRules {
    pub id_type: IdType,
    /// Required non-empty string field on every node, if any.
    pub name_field: Option<&'static str>,
    /// Optional `label` on nodes must be a string when present.
    pub optional_label: bool,
    /// Required non-negative number field on every node, if any.
    pub node_scalar: Option<&'static str>,
    /// Optional `type` on links must be a string when present.
    pub link_type: bool,
    pub min_nodes: Option<(usize, &'static str)>,
    pub link_value: LinkValue,
    /// Pipeline dropout rule: some node must lose flow.
    pub requires_dropout: bool,
}

pub(crate) const PIPELINE: GraphRules = GraphRules {
    id_type: IdType::Integer,
    name_field: Some("name"),
    optional_label: false,
    node_scalar: None,
    link_type: false,
    min_nodes: Some((2, "Pipeline must have at least 2 nodes")),
    link_value: LinkValue::Flow,
    requires_dropout: true,
};

pub(crate) const FEATURE_EXTRACTION: GraphRules = GraphRules {
    id_type: IdType::Integer,
    name_field: Some("name"),
    optional_label: false,
    node_scalar: None,
    link_type: false,
    min_nodes: Some((
        2,
        "Data must contain at least two nodes (raw data and one feature)",
    )),
    link_value: LinkValue::Flow,
    requires_dropout: false,
};

pub(crate) const KNOWLEDGE_GRAPH: GraphRules = GraphRules {
    id_type: IdType::Text,
    name_field: None,
    optional_label: true,
    node_scalar: None,
    link_type: true,
    min_nodes: Some((3, "At least 3 nodes are required")),
    link_value: LinkValue::None,
    requires_dropout: false,
};

pub(crate) const RELATION_GRAPH: GraphRules = GraphRules {
    id_type: IdType::Text,
    name_field: None,
    optional_label: true,
    node_scalar: None,
    link_type: true,
    min_nodes: Some((3, "At least 3 nodes are required to demonstrate relationships")),
    link_value: LinkValue::None,
    requires_dropout: false,
};

pub(crate) const NODE_INFLUENCE: GraphRules = GraphRules {
    id_type: IdType::Any,
    name_field: None,
    optional_label: true,
    node_scalar: Some("influence"),
    link_type: false,
    min_nodes: None,
    link_value: LinkValue::Weight { positive: true },
    requires_dropout: false,
};

pub(crate) const GRAPH_CLUSTERING: GraphRules = GraphRules {
    id_type: IdType::Any,
    name_field: None,
    optional_label: false,
    node_scalar: None,
    link_type: false,
    min_nodes: Some((4, "At least 4 nodes are required to demonstrate clustering")),
    link_value: LinkValue::Weight { positive: false },
    requires_dropout: false,
};

/// A declared node identifier. Ordered so it can key `BTreeSet`/`BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NodeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(v) => write!(f, "{v}"),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

/// Read a value loosely as an id, regardless of the variant's id type.
/// Typed enforcement happens where the node declares the id; loose reads
/// are for link endpoints, where a mismatched type simply fails to
/// resolve.
fn loose_id(value: &Value) -> Option<NodeId> {
    match value {
        Value::Number(n) => n.as_i64().map(NodeId::Int),
        Value::String(s) => Some(NodeId::Text(s.clone())),
        _ => None,
    }
}

fn declared_id(r: &mut Reporter, obj: &Map<String, Value>, id_type: &IdType) -> Option<NodeId> {
    let Some(value) = obj.get("id") else {
        r.error(ErrorKind::Structural, "Missing required field 'id'");
        return None;
    };
    let id = match id_type {
        IdType::Integer => match value {
            Value::Number(n) => n.as_i64().map(NodeId::Int),
            _ => None,
        },
        IdType::Text => match value {
            Value::String(s) => Some(NodeId::Text(s.clone())),
            _ => None,
        },
        IdType::Any => loose_id(value),
    };
    if id.is_none() {
        let message = match id_type {
            IdType::Integer => "Node 'id' must be an integer",
            IdType::Text => "Node 'id' must be a string",
            IdType::Any => "Node 'id' must be an integer or a string",
        };
        r.error(ErrorKind::Structural, message);
    }
    id
}

pub(crate) fn validate_graph(r: &mut Reporter, rules: &GraphRules, value: &Value) {
    let Some(obj) = value.as_object() else {
        r.error(ErrorKind::Structural, "Input must be a JSON object");
        return;
    };

    // 1) Top-level containers. Both are reported before giving up.
    let nodes = require_array(r, obj, "nodes");
    let links = require_array(r, obj, "links");
    let (Some(nodes), Some(links)) = (nodes, links) else {
        return;
    };

    // 2) Nodes: required fields, id typing, uniqueness.
    let mut ids = BTreeSet::<NodeId>::new();
    r.push("nodes");
    for (i, node) in nodes.iter().enumerate() {
        r.push_index(i);
        if let Some(node) = as_node_object(r, node) {
            if let Some(id) = declared_id(r, node, &rules.id_type) {
                if !ids.insert(id.clone()) {
                    let message = match rules.id_type {
                        IdType::Integer => "Node IDs must be unique".to_string(),
                        _ => format!("Duplicate node ID found: {id}"),
                    };
                    r.error(ErrorKind::Uniqueness, message);
                }
            }
            if let Some(field) = rules.name_field {
                require_string(r, node, field);
            }
            if rules.optional_label {
                optional_string(r, node, "label");
            }
            if let Some(field) = rules.node_scalar {
                require_nonneg_number(r, node, field);
            }
        }
        r.pop();
    }
    r.pop();

    // 3) Cardinality, once the full node set is known.
    if let Some((min, message)) = rules.min_nodes {
        if nodes.len() < min {
            r.push("nodes");
            r.error(ErrorKind::Cardinality, message);
            r.pop();
        }
    }

    // 4) Links: endpoint resolution and payload rules.
    let mut flows: Vec<(NodeId, NodeId, f64)> = Vec::new();
    let errors_before_links = r.error_count();
    r.push("links");
    for (i, link) in links.iter().enumerate() {
        r.push_index(i);
        if let Some(link) = as_link_object(r, link) {
            let source = endpoint(r, link, "source", &ids, &rules.id_type);
            let target = endpoint(r, link, "target", &ids, &rules.id_type);

            if rules.link_type {
                optional_string(r, link, "type");
            }

            let payload = match rules.link_value {
                LinkValue::Flow => flow_value(r, link),
                LinkValue::Weight { positive } => {
                    weight_value(r, link, positive);
                    None
                }
                LinkValue::None => None,
            };

            if let (Some(source), Some(target), Some(value)) = (source, target, payload) {
                flows.push((source, target, value));
            }
        }
        r.pop();
    }
    r.pop();
    let links_ok = r.error_count() == errors_before_links;

    // 5) Pipeline dropout rule: at least one node must lose flow. Only
    // meaningful once every link is individually well-formed.
    if rules.requires_dropout && links_ok {
        let mut balance = BTreeMap::<NodeId, f64>::new();
        for (source, target, value) in flows {
            *balance.entry(target).or_insert(0.0) += value;
            *balance.entry(source).or_insert(0.0) -= value;
        }
        if !balance.values().any(|net| *net > 0.0) {
            r.error(
                ErrorKind::Conservation,
                "Pipeline must contain at least one dropout point",
            );
        }
    }
}

fn require_array<'v>(
    r: &mut Reporter,
    obj: &'v Map<String, Value>,
    field: &str,
) -> Option<&'v Vec<Value>> {
    match obj.get(field) {
        None => {
            r.error(
                ErrorKind::Structural,
                format!("Missing required field '{field}'"),
            );
            None
        }
        Some(Value::Array(items)) => Some(items),
        Some(_) => {
            r.error(ErrorKind::Structural, format!("Field '{field}' must be an array"));
            None
        }
    }
}

fn as_node_object<'v>(r: &mut Reporter, value: &'v Value) -> Option<&'v Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
        r.error(ErrorKind::Structural, "Node must be an object");
    }
    obj
}

fn as_link_object<'v>(r: &mut Reporter, value: &'v Value) -> Option<&'v Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
        r.error(ErrorKind::Structural, "Link must be an object");
    }
    obj
}

/// Resolve one link endpoint against the declared id set.
fn endpoint(
    r: &mut Reporter,
    link: &Map<String, Value>,
    field: &str,
    ids: &BTreeSet<NodeId>,
    id_type: &IdType,
) -> Option<NodeId> {
    let Some(value) = link.get(field) else {
        r.error(
            ErrorKind::Structural,
            format!("Missing required field '{field}'"),
        );
        return None;
    };

    if matches!(id_type, IdType::Text) && !value.is_string() {
        r.error(
            ErrorKind::Structural,
            format!("Link {field} must be a string"),
        );
        return None;
    }

    match loose_id(value) {
        Some(id) if ids.contains(&id) => Some(id),
        Some(id) => {
            let message = match id_type {
                IdType::Integer => {
                    "Link source and target must reference valid node IDs".to_string()
                }
                _ => format!("Link {field} '{id}' not found in nodes"),
            };
            r.error(ErrorKind::Referential, message);
            None
        }
        None => {
            r.error(
                ErrorKind::Referential,
                "Link source and target must reference valid node IDs",
            );
            None
        }
    }
}

fn flow_value(r: &mut Reporter, link: &Map<String, Value>) -> Option<f64> {
    match link.get("value") {
        None => {
            r.error(ErrorKind::Structural, "Missing required field 'value'");
            None
        }
        Some(Value::Number(n)) => {
            let v = n.as_f64()?;
            if v < 0.0 {
                r.error(ErrorKind::Range, "Link value must be a non-negative number");
                None
            } else {
                Some(v)
            }
        }
        Some(_) => {
            r.error(ErrorKind::Structural, "Link value must be a number");
            None
        }
    }
}

fn weight_value(r: &mut Reporter, link: &Map<String, Value>, positive: bool) {
    match link.get("weight") {
        None => {}
        Some(Value::Number(n)) => {
            if positive && n.as_f64().is_some_and(|v| v <= 0.0) {
                r.error(ErrorKind::Range, "Link weight must be a positive number");
            }
        }
        Some(_) => {
            r.error(ErrorKind::Structural, "Link weight must be a number");
        }
    }
}
