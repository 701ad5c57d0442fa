//! Layered neural-network topology validation.
//!
//! JSON shape:
//! {
//!   "layers": [
//!     {"layerIndex": 0, "nodes": [{"id": "i1"}, {"id": "i2"}]},
//!     {"layerIndex": 1, "nodes": [{"id": "h1"}]}
//!   ],
//!   "connections": [
//!     {"source": "i1", "target": "h1", "weight": -0.42}
//!   ]
//! }
//!
//! Node ids must be unique across all layers combined, not per layer.
//! Weights may be negative but must be numbers.

use crate::report::{ErrorKind, Reporter};
use serde_json::Value;
use std::collections::BTreeSet;

pub(crate) fn validate_network(r: &mut Reporter, value: &Value) {
    let Some(obj) = value.as_object() else {
        r.error(ErrorKind::Structural, "Input must be a JSON object");
        return;
    };

    let layers = match obj.get("layers") {
        None => {
            r.error(ErrorKind::Structural, "Missing required field 'layers'");
            None
        }
        Some(Value::Array(layers)) => Some(layers),
        Some(_) => {
            r.error(ErrorKind::Structural, "Field 'layers' must be an array");
            None
        }
    };
    let connections = match obj.get("connections") {
        None => {
            r.error(ErrorKind::Structural, "Missing required field 'connections'");
            None
        }
        Some(Value::Array(connections)) => Some(connections),
        Some(_) => {
            r.error(ErrorKind::Structural, "Field 'connections' must be an array");
            None
        }
    };
    let (Some(layers), Some(connections)) = (layers, connections) else {
        return;
    };

    // 1) Layers: integer index, per-layer node list, global id uniqueness.
    let mut ids = BTreeSet::<String>::new();
    r.push("layers");
    for (i, layer) in layers.iter().enumerate() {
        r.push_index(i);
        let Some(layer) = layer.as_object() else {
            r.error(ErrorKind::Structural, "Layer must be an object");
            r.pop();
            continue;
        };

        match layer.get("layerIndex") {
            None => r.error(ErrorKind::Structural, "Missing required field 'layerIndex'"),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {}
            Some(_) => r.error(ErrorKind::Structural, "Field 'layerIndex' must be an integer"),
        }

        let nodes = match layer.get("nodes") {
            None => {
                r.error(ErrorKind::Structural, "Missing required field 'nodes'");
                r.pop();
                continue;
            }
            Some(Value::Array(nodes)) => nodes,
            Some(_) => {
                r.error(ErrorKind::Structural, "Field 'nodes' must be an array");
                r.pop();
                continue;
            }
        };

        r.push("nodes");
        for (j, node) in nodes.iter().enumerate() {
            r.push_index(j);
            match node.as_object() {
                None => r.error(ErrorKind::Structural, "Node must be an object"),
                Some(node) => match node.get("id") {
                    None => r.error(ErrorKind::Structural, "Missing required field 'id'"),
                    Some(Value::String(id)) => {
                        if !ids.insert(id.clone()) {
                            r.error(
                                ErrorKind::Uniqueness,
                                format!("Duplicate node id found: {id}"),
                            );
                        }
                    }
                    Some(_) => r.error(ErrorKind::Structural, "Node 'id' must be a string"),
                },
            }
            r.pop();
        }
        r.pop();
        r.pop();
    }
    r.pop();

    // 2) Connections: endpoints resolve, weights are numeric.
    r.push("connections");
    for (i, conn) in connections.iter().enumerate() {
        r.push_index(i);
        let Some(conn) = conn.as_object() else {
            r.error(ErrorKind::Structural, "Connection must be an object");
            r.pop();
            continue;
        };

        for field in ["source", "target"] {
            match conn.get(field) {
                None => r.error(
                    ErrorKind::Structural,
                    format!("Missing required field '{field}'"),
                ),
                Some(Value::String(id)) if ids.contains(id) => {}
                Some(Value::String(id)) => r.error(
                    ErrorKind::Referential,
                    format!("Invalid {field} node id: {id}"),
                ),
                Some(_) => r.error(
                    ErrorKind::Structural,
                    format!("Connection {field} must be a string"),
                ),
            }
        }

        match conn.get("weight") {
            None | Some(Value::Number(_)) => {}
            Some(_) => r.error(ErrorKind::Structural, "Connection weight must be numeric"),
        }
        r.pop();
    }
    r.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn run(value: &Value) -> Report {
        let mut r = Reporter::new();
        validate_network(&mut r, value);
        r.finish()
    }

    fn messages(report: &Report) -> Vec<&str> {
        report.errors.iter().map(|e| e.message.as_str()).collect()
    }

    fn small_topology() -> Value {
        json!({
            "layers": [
                {"layerIndex": 0, "nodes": [{"id": "i1"}, {"id": "i2"}]},
                {"layerIndex": 1, "nodes": [{"id": "h1"}]},
                {"layerIndex": 2, "nodes": [{"id": "o1"}]}
            ],
            "connections": [
                {"source": "i1", "target": "h1", "weight": 0.7},
                {"source": "i2", "target": "h1", "weight": -0.42},
                {"source": "h1", "target": "o1"}
            ]
        })
    }

    #[test]
    fn small_topology_is_valid_and_negative_weights_are_fine() {
        assert!(run(&small_topology()).is_valid());
    }

    #[test]
    fn layer_index_must_be_an_integer_not_a_float_or_string() {
        let mut value = small_topology();
        value["layers"][1]["layerIndex"] = json!(1.0);
        let report = run(&value);
        assert_eq!(messages(&report), vec!["Field 'layerIndex' must be an integer"]);
        assert_eq!(report.errors[0].path, "root.layers.1");

        value["layers"][1]["layerIndex"] = json!("1");
        let report = run(&value);
        assert_eq!(messages(&report), vec!["Field 'layerIndex' must be an integer"]);
    }

    #[test]
    fn node_ids_must_be_unique_across_all_layers() {
        let mut value = small_topology();
        value["layers"][2]["nodes"][0]["id"] = json!("i1");
        let report = run(&value);
        assert_eq!(
            messages(&report),
            vec![
                "Duplicate node id found: i1",
                // The renamed output node no longer exists for its edge.
                "Invalid target node id: o1",
            ]
        );
        assert_eq!(report.errors[0].kind, ErrorKind::Uniqueness);
        assert_eq!(report.errors[0].path, "root.layers.2.nodes.0");
    }

    #[test]
    fn connection_endpoints_must_resolve() {
        let mut value = small_topology();
        value["connections"][0]["target"] = json!("h9");
        let report = run(&value);
        assert_eq!(messages(&report), vec!["Invalid target node id: h9"]);
        assert_eq!(report.errors[0].kind, ErrorKind::Referential);
        assert_eq!(report.errors[0].path, "root.connections.0");
    }

    #[test]
    fn string_weight_is_rejected() {
        let mut value = small_topology();
        value["connections"][1]["weight"] = json!("-0.42");
        let report = run(&value);
        assert_eq!(messages(&report), vec!["Connection weight must be numeric"]);
    }

    #[test]
    fn missing_containers_are_fatal() {
        let report = run(&json!({"layers": []}));
        assert_eq!(messages(&report), vec!["Missing required field 'connections'"]);
    }
}
