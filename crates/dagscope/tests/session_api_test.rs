//! Integration tests for the DagScope facade and the Session API
//!
//! These tests drive the public API the way a front end does: execute a
//! pipeline, then hover and select nodes of the resulting scene.

use indexmap::IndexMap;

use dagscope::{
    DagScope, DagscopeError,
    config::AppConfig,
    details::DisplayPayload,
    engine::EngineError,
    identifier::Id,
    request::{ExecutionRequest, InspectorForm},
    semantic::{
        CodeReference, DagNode, DagSpec, EnabledKinds, ExecutionResult, InspectionResult,
        OperatorType, Table,
    },
    session::{PickTarget, Session},
};

fn table(value: &str) -> Table {
    Table::new(["patient", "county"]).with_row([value, "county1"])
}

/// A -> B -> C with row lineage recorded for every node.
fn chain_result() -> ExecutionResult {
    let mut result = ExecutionResult::new(DagSpec {
        nodes: vec![
            DagNode::new(Id::new("A"), OperatorType::DataSource, CodeReference::new(10))
                .with_description("patients.csv"),
            DagNode::new(Id::new("B"), OperatorType::Selection, CodeReference::new(12)),
            DagNode::new(Id::new("C"), OperatorType::Projection, CodeReference::new(14)),
        ],
        edges: vec![(Id::new("A"), Id::new("B")), (Id::new("B"), Id::new("C"))],
    });

    let mut annotations = IndexMap::new();
    annotations.insert(Id::new("A"), table("a"));
    annotations.insert(Id::new("B"), table("b"));
    annotations.insert(Id::new("C"), table("c"));
    result.inspections.push(InspectionResult::RowLineage {
        row_count: 5,
        annotations,
    });
    result
}

fn row_lineage_request() -> ExecutionRequest {
    InspectorForm {
        row_lineage: true,
        ..InspectorForm::new("healthcare.py")
    }
    .to_request()
}

#[test]
fn test_chain_end_to_end() {
    let session = Session::new(AppConfig::default());
    let engine = |_: &ExecutionRequest| -> Result<ExecutionResult, EngineError> {
        Ok(chain_result())
    };

    let request = row_lineage_request();
    let epoch = session.execute(&engine, &request).unwrap();

    let positions = epoch.positions();
    assert_eq!(positions.layer(Id::new("A")), Some(0));
    assert_eq!(positions.layer(Id::new("B")), Some(1));
    assert_eq!(positions.layer(Id::new("C")), Some(2));
    let a = positions.position(Id::new("A")).unwrap();
    let b = positions.position(Id::new("B")).unwrap();
    let c = positions.position(Id::new("C")).unwrap();
    assert!(a != b && b != c && a != c);

    let scene = epoch.scene();
    assert_eq!(scene.node_markers().len(), 3);
    assert_eq!(scene.edge_lines().edge_count(), 2);

    assert_eq!(epoch.locator().locate(b), Some(Id::new("B")));

    let selection = session
        .select(PickTarget::Point(b), &request.enabled_kinds())
        .unwrap();
    assert_eq!(selection.node, Id::new("B"));
    assert_eq!(selection.header, "Details: Operator 'Selection', Line 12");
    assert_eq!(selection.payloads.len(), 1);

    let DisplayPayload::RowTables { inputs, output, .. } = &selection.payloads[0] else {
        panic!("expected row tables, got {:?}", selection.payloads[0]);
    };
    assert_eq!(output, &table("b"));
    assert_eq!(inputs, &vec![(Id::new("A"), table("a"))]);
}

#[test]
fn test_disabled_kinds_never_projected() {
    let session = Session::default();
    session.install(chain_result(), &[]).unwrap();

    let selection = session
        .select(PickTarget::Node(Id::new("B")), &EnabledKinds::none())
        .unwrap();
    assert!(selection.payloads.is_empty());
}

#[test]
fn test_hover_by_id_and_point() {
    let session = Session::default();
    assert!(session.hover(PickTarget::Node(Id::new("A"))).is_none());

    let epoch = session.install(chain_result(), &[]).unwrap();
    let c = epoch.positions().position(Id::new("C")).unwrap();

    assert_eq!(
        session.hover(PickTarget::Node(Id::new("A"))),
        Some(CodeReference::new(10))
    );
    assert_eq!(session.hover(PickTarget::Point(c)), Some(CodeReference::new(14)));
}

#[test]
fn test_engine_failure_is_reported() {
    let session = Session::default();
    let engine = |_: &ExecutionRequest| -> Result<ExecutionResult, EngineError> {
        Err(EngineError::Execution("ModuleNotFoundError".to_string()))
    };

    let result = session.execute(&engine, &row_lineage_request());
    assert!(matches!(result, Err(DagscopeError::Engine(_))));
    assert!(session.current().is_none());
}

#[test]
fn test_facade_renders_svg() {
    let dagscope = DagScope::new(AppConfig::default());
    let result = chain_result();

    let scene = dagscope.scene(&result, &[]).unwrap();
    let svg = dagscope.render_svg(&scene).unwrap();

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    for id in ["A", "B", "C"] {
        assert!(svg.contains(&format!(r#"data-node-id="{id}""#)));
    }
}

#[test]
fn test_facade_rejects_cycle() {
    let dagscope = DagScope::default();
    let mut result = chain_result();
    result.dag.edges.push((Id::new("C"), Id::new("A")));

    let err = dagscope.scene(&result, &[]).unwrap_err();
    assert!(matches!(err, DagscopeError::Layout(_)), "unexpected error: {err}");
}

#[test]
fn test_facade_rejects_unknown_edge_node() {
    let dagscope = DagScope::default();
    let mut result = chain_result();
    result.dag.edges.push((Id::new("C"), Id::new("missing")));

    let err = dagscope.build_dag(&result.dag).unwrap_err();
    assert!(matches!(err, DagscopeError::Graph(_)));
}

#[test]
fn test_facade_exports_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.svg");
    let dagscope = DagScope::default();

    let scene = dagscope.scene(&chain_result(), &[]).unwrap();
    dagscope.export_svg(&scene, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains(r#"data-layer="node""#));
}
