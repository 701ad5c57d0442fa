//! Fixture-driven conformance vectors.
//!
//! Each file under `tests/fixtures/` pairs sample documents with the
//! expected outcome, the same shape users paste into the dashboard. A
//! case may also pin a substring of one expected error message.

use mlviz_validator::{Kind, validate};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct FixtureFile {
    test_cases: Vec<TestCase>,
}

#[derive(Deserialize)]
struct TestCase {
    name: String,
    kind: String,
    expected_valid: bool,
    #[serde(default)]
    expected_error: Option<String>,
    data: serde_json::Value,
}

fn run_fixture(file: &str) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(file);
    let text = std::fs::read_to_string(&path).expect("read fixture file");
    let fixture: FixtureFile = serde_json::from_str(&text).expect("parse fixture file");
    assert!(!fixture.test_cases.is_empty());

    for case in fixture.test_cases {
        let kind: Kind = case.kind.parse().expect("fixture kind must be known");
        let report = validate(kind, &case.data);
        assert_eq!(
            report.is_valid(),
            case.expected_valid,
            "case '{}' reported: {:?}",
            case.name,
            report.errors
        );
        if let Some(expected) = case.expected_error {
            assert!(
                report.errors.iter().any(|e| e.message.contains(&expected)),
                "case '{}' expected an error containing {:?}, got {:?}",
                case.name,
                expected,
                report.errors
            );
        }
    }
}

#[test]
fn pipeline_cases() {
    run_fixture("pipeline_test_cases.json");
}

#[test]
fn knowledge_graph_cases() {
    run_fixture("knowledge_graph_test_cases.json");
}

#[test]
fn tree_cases() {
    run_fixture("tree_test_cases.json");
}

#[test]
fn matrix_cases() {
    run_fixture("matrix_test_cases.json");
}

#[test]
fn nn_topology_cases() {
    run_fixture("nn_topology_test_cases.json");
}

#[test]
fn distribution_cases() {
    run_fixture("distribution_test_cases.json");
}
