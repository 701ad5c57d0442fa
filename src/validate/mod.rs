//! Validation layer: shape-specific checkers over parsed JSON values.
//!
//! Each chart kind maps to exactly one checker. The checkers share the
//! [`Reporter`] accumulator and a small set of field helpers, and none of
//! them performs I/O or mutates its input, so concurrent calls are safe
//! without locking.

mod distribution;
mod graph;
mod matrix;
mod network;
mod tree;

use crate::report::{ErrorKind, Report, Reporter};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chart kinds accepted by [`validate`].
///
/// This is a closed set: the presentation layer picks one per chart, and
/// anything else is a configuration error ([`UnknownKind`]), never a
/// validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pipeline,
    FeatureExtraction,
    KnowledgeGraph,
    RelationGraph,
    NodeInfluence,
    GraphClustering,
    NnTopology,
    CountTree,
    DecisionTree,
    ClusteringTree,
    ModelArchitectureTree,
    CorrelationMatrix,
    SimilarityMatrix,
    ConfusionMatrix,
    Distribution,
    ResourceConsumption,
    HyperparameterImpact,
    DatasetVariations,
}

impl Kind {
    pub const ALL: [Kind; 18] = [
        Kind::Pipeline,
        Kind::FeatureExtraction,
        Kind::KnowledgeGraph,
        Kind::RelationGraph,
        Kind::NodeInfluence,
        Kind::GraphClustering,
        Kind::NnTopology,
        Kind::CountTree,
        Kind::DecisionTree,
        Kind::ClusteringTree,
        Kind::ModelArchitectureTree,
        Kind::CorrelationMatrix,
        Kind::SimilarityMatrix,
        Kind::ConfusionMatrix,
        Kind::Distribution,
        Kind::ResourceConsumption,
        Kind::HyperparameterImpact,
        Kind::DatasetVariations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Pipeline => "pipeline",
            Kind::FeatureExtraction => "feature-extraction",
            Kind::KnowledgeGraph => "knowledge-graph",
            Kind::RelationGraph => "relation-graph",
            Kind::NodeInfluence => "node-influence",
            Kind::GraphClustering => "graph-clustering",
            Kind::NnTopology => "nn-topology",
            Kind::CountTree => "count-tree",
            Kind::DecisionTree => "decision-tree",
            Kind::ClusteringTree => "clustering-tree",
            Kind::ModelArchitectureTree => "model-architecture-tree",
            Kind::CorrelationMatrix => "correlation-matrix",
            Kind::SimilarityMatrix => "similarity-matrix",
            Kind::ConfusionMatrix => "confusion-matrix",
            Kind::Distribution => "distribution",
            Kind::ResourceConsumption => "resource-consumption",
            Kind::HyperparameterImpact => "hyperparameter-impact",
            Kind::DatasetVariations => "dataset-variations",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind name that is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown kind '{0}' (run `kinds` for the supported list)")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Validate `value` as the given chart kind.
///
/// Pure and synchronous: the same `(kind, value)` pair always yields the
/// same report, and a report with no errors means the presentation layer
/// may draw the chart.
pub fn validate(kind: Kind, value: &Value) -> Report {
    let mut r = Reporter::new();
    match kind {
        Kind::Pipeline => graph::validate_graph(&mut r, &graph::PIPELINE, value),
        Kind::FeatureExtraction => graph::validate_graph(&mut r, &graph::FEATURE_EXTRACTION, value),
        Kind::KnowledgeGraph => graph::validate_graph(&mut r, &graph::KNOWLEDGE_GRAPH, value),
        Kind::RelationGraph => graph::validate_graph(&mut r, &graph::RELATION_GRAPH, value),
        Kind::NodeInfluence => graph::validate_graph(&mut r, &graph::NODE_INFLUENCE, value),
        Kind::GraphClustering => graph::validate_graph(&mut r, &graph::GRAPH_CLUSTERING, value),
        Kind::NnTopology => network::validate_network(&mut r, value),
        Kind::CountTree => tree::validate_tree(&mut r, &tree::COUNT_TREE, value),
        Kind::DecisionTree => tree::validate_tree(&mut r, &tree::DECISION_TREE, value),
        Kind::ClusteringTree => tree::validate_tree(&mut r, &tree::CLUSTERING_TREE, value),
        Kind::ModelArchitectureTree => tree::validate_tree(&mut r, &tree::MODEL_ARCHITECTURE, value),
        Kind::CorrelationMatrix => matrix::validate_matrix(&mut r, &matrix::CORRELATION, value),
        Kind::SimilarityMatrix => matrix::validate_matrix(&mut r, &matrix::SIMILARITY, value),
        Kind::ConfusionMatrix => matrix::validate_matrix(&mut r, &matrix::CONFUSION, value),
        Kind::Distribution => distribution::validate_distribution(&mut r, value),
        Kind::ResourceConsumption => distribution::validate_resources(&mut r, value),
        Kind::HyperparameterImpact => {
            distribution::validate_series(&mut r, &distribution::HYPERPARAMETER, value)
        }
        Kind::DatasetVariations => {
            distribution::validate_series(&mut r, &distribution::DATASET_VARIATIONS, value)
        }
    }
    r.finish()
}

// Shared field helpers. These produce the stable message set every
// validator uses, keeping "field absent" distinct from "field present
// with the wrong type".

/// Require a non-empty string field. Reports and returns `None` when the
/// field is missing, not a string, or blank.
pub(crate) fn require_string<'v>(
    r: &mut Reporter,
    obj: &'v Map<String, Value>,
    field: &str,
) -> Option<&'v str> {
    match obj.get(field) {
        None => {
            r.error(
                ErrorKind::Structural,
                format!("Missing required field '{field}'"),
            );
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            r.error(ErrorKind::Structural, format!("Field '{field}' cannot be empty"));
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            r.error(ErrorKind::Structural, format!("Field '{field}' must be a string"));
            None
        }
    }
}

/// An optional string field: absent is fine, anything else must be a string.
pub(crate) fn optional_string<'v>(
    r: &mut Reporter,
    obj: &'v Map<String, Value>,
    field: &str,
) -> Option<&'v str> {
    match obj.get(field) {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            r.error(ErrorKind::Structural, format!("Field '{field}' must be a string"));
            None
        }
    }
}

/// Require a non-negative integer field. Floats and numeric strings are
/// rejected as mis-typed; negative integers are a range error.
pub(crate) fn require_nonneg_integer(
    r: &mut Reporter,
    obj: &Map<String, Value>,
    field: &str,
) -> Option<u64> {
    match obj.get(field) {
        None => {
            r.error(
                ErrorKind::Structural,
                format!("Missing required field '{field}'"),
            );
            None
        }
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else if n.is_i64() {
                r.error(ErrorKind::Range, format!("Field '{field}' must be non-negative"));
                None
            } else {
                r.error(
                    ErrorKind::Structural,
                    format!("Field '{field}' must be an integer"),
                );
                None
            }
        }
        Some(_) => {
            r.error(
                ErrorKind::Structural,
                format!("Field '{field}' must be an integer"),
            );
            None
        }
    }
}

/// Require a non-negative number field (integer or float). Numeric
/// strings are rejected as mis-typed.
pub(crate) fn require_nonneg_number(
    r: &mut Reporter,
    obj: &Map<String, Value>,
    field: &str,
) -> Option<f64> {
    match obj.get(field) {
        None => {
            r.error(
                ErrorKind::Structural,
                format!("Missing required field '{field}'"),
            );
            None
        }
        Some(other) => check_nonneg_number(r, other, field),
    }
}

/// An optional non-negative number field.
pub(crate) fn optional_nonneg_number(
    r: &mut Reporter,
    obj: &Map<String, Value>,
    field: &str,
) -> Option<f64> {
    obj.get(field).and_then(|v| check_nonneg_number(r, v, field))
}

fn check_nonneg_number(r: &mut Reporter, value: &Value, field: &str) -> Option<f64> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64()?;
            if v < 0.0 {
                r.error(ErrorKind::Range, format!("Field '{field}' must be non-negative"));
                None
            } else {
                Some(v)
            }
        }
        _ => {
            r.error(ErrorKind::Structural, format!("Field '{field}' must be a number"));
            None
        }
    }
}
