//! Tests for the layout adapter and the built-in backends

use anyhow::Result;
use futures::executor::block_on;
use futures::future::{self, BoxFuture};
use std::collections::HashSet;

use graphcraft::core::{BackendKind, BuildConfig, EdgeSpec, GraphError, NodeSpec, Position};
use graphcraft::input::InputModel;
use graphcraft::layout::{
    available_backends, LayeredBackend, LayoutAdapter, LayoutBackend, LayoutOptions, LayoutRequest,
    LayoutResponse, LevelsBackend, PositionedChild,
};
use graphcraft::pipeline::Pipeline;

fn nodes(ids: &[&str]) -> Vec<NodeSpec> {
    ids.iter().map(NodeSpec::new).collect()
}

fn edges(pairs: &[(&str, &str)]) -> Vec<EdgeSpec> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (s, t))| EdgeSpec::new(format!("e{}", i), *s, *t))
        .collect()
}

fn adapter(kind: BackendKind) -> LayoutAdapter {
    LayoutAdapter::from_config(&BuildConfig::default().with_backend(kind)).unwrap()
}

/// Answers for the first node only
struct PartialBackend;

impl LayoutBackend for PartialBackend {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn algorithm(&self) -> &'static str {
        "layered"
    }

    fn layout<'a>(&'a self, request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>> {
        let children = request
            .node_ids()
            .take(1)
            .map(|id| PositionedChild::new(id, 42.0, 24.0))
            .chain(std::iter::once(PositionedChild::new("stranger", 1.0, 1.0)))
            .collect();
        Box::pin(future::ready(Ok(LayoutResponse::new(children))))
    }
}

struct FailingBackend;

impl LayoutBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn algorithm(&self) -> &'static str {
        "layered"
    }

    fn layout<'a>(&'a self, _request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>> {
        Box::pin(future::ready(Err(GraphError::layout_error("engine unavailable").into())))
    }
}

#[test]
fn test_layered_top_down_stacks_layers() {
    let positions = block_on(adapter(BackendKind::Layered).layout(&nodes(&["A", "B"]), &edges(&[("A", "B")]))).unwrap();
    assert_eq!(positions["A"], Position::new(0.0, 0.0));
    assert_eq!(positions["B"], Position::new(0.0, 120.0));
}

#[test]
fn test_layered_left_right_runs_along_x() {
    let positions =
        block_on(adapter(BackendKind::LayeredLr).layout(&nodes(&["A", "B"]), &edges(&[("A", "B")]))).unwrap();
    assert_eq!(positions["A"], Position::new(0.0, 0.0));
    assert_eq!(positions["B"], Position::new(120.0, 0.0));
}

#[test]
fn test_every_backend_survives_awkward_graphs() {
    let ids = ["A", "B", "C", "D", "Lonely"];
    let awkward = edges(&[("A", "B"), ("B", "C"), ("C", "A"), ("D", "D"), ("A", "Ghost"), ("A", "B")]);

    for kind in [BackendKind::Layered, BackendKind::LayeredLr, BackendKind::Levels] {
        let positions = block_on(adapter(kind).layout(&nodes(&ids), &awkward)).unwrap();
        assert_eq!(positions.len(), ids.len(), "backend {}", kind);
        assert!(!positions.contains_key("Ghost"));
    }
}

#[test]
fn test_layered_nodes_do_not_overlap() {
    let ids = ["A", "B", "C", "D", "E"];
    let graph = edges(&[("A", "B"), ("A", "C"), ("A", "D"), ("B", "E"), ("D", "E")]);
    let positions = block_on(adapter(BackendKind::Layered).layout(&nodes(&ids), &graph)).unwrap();

    let distinct: HashSet<(i64, i64)> = positions
        .values()
        .map(|p| (p.x.round() as i64, p.y.round() as i64))
        .collect();
    assert_eq!(distinct.len(), ids.len());
}

#[test]
fn test_levels_uses_breadth_first_depth() {
    let request = LayoutRequest::new(
        &nodes(&["A", "B", "C"]),
        &edges(&[("A", "B"), ("B", "C"), ("A", "C")]),
        &LayoutOptions::default(),
        "layered",
    );
    let levels = LevelsBackend::new().levels(&request);
    assert_eq!(levels, vec![("A", 0), ("B", 1), ("C", 1)]);
}

#[test]
fn test_layered_uses_longest_path() {
    let request = LayoutRequest::new(
        &nodes(&["A", "B", "C"]),
        &edges(&[("A", "B"), ("B", "C"), ("A", "C")]),
        &LayoutOptions::default(),
        "layered",
    );
    let response = LayeredBackend::new().compute(&request);
    let c = response.children.iter().find(|c| c.id == "C").unwrap();
    assert_eq!(c.y, 240.0);
}

#[test]
fn test_partial_answer_defaults_to_origin() {
    let pipeline = Pipeline::with_backend(BuildConfig::default(), Box::new(PartialBackend));
    let graph = block_on(pipeline.build(&InputModel::dsl("Nodes: A, B"))).unwrap();

    assert_eq!(graph.node("A").unwrap().position, Position::new(42.0, 24.0));
    assert_eq!(graph.node("B").unwrap().position, Position::ORIGIN);
    assert!(graph.node("stranger").is_none());
}

#[test]
fn test_backend_failure_is_reported() {
    let pipeline = Pipeline::with_backend(BuildConfig::default(), Box::new(FailingBackend));
    let err = block_on(pipeline.build(&InputModel::dsl("Nodes: A"))).unwrap_err();
    let graph_error = err.downcast_ref::<GraphError>().unwrap();
    assert!(graph_error.is_layout());
    assert!(err.to_string().contains("engine unavailable"));
}

#[test]
fn test_empty_graph_never_reaches_backend() {
    let pipeline = Pipeline::with_backend(BuildConfig::default(), Box::new(FailingBackend));
    let graph = block_on(pipeline.build(&InputModel::dsl(""))).unwrap();
    assert!(graph.is_empty());
}

#[test]
fn test_request_wire_format() {
    let request = LayoutRequest::new(
        &nodes(&["A", "B"]),
        &edges(&[("A", "B")]),
        &LayoutOptions::default(),
        "layered",
    );
    let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "id": "root",
            "layoutOptions": {
                "elk.algorithm": "layered",
                "elk.direction": "DOWN",
                "elk.spacing.nodeNode": "20",
                "elk.layered.spacing.nodeNodeBetweenLayers": "40"
            },
            "children": [
                {"id": "A", "width": 80.0, "height": 80.0},
                {"id": "B", "width": 80.0, "height": 80.0}
            ],
            "edges": [
                {"id": "e0", "sources": ["A"], "targets": ["B"]}
            ]
        })
    );
}

#[test]
fn test_builtin_backends_listed() {
    let kinds = available_backends();
    assert!(kinds.contains(&BackendKind::Layered));
    assert!(kinds.contains(&BackendKind::LayeredLr));
    assert!(kinds.contains(&BackendKind::Levels));
}
