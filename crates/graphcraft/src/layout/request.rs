//! Wire format shared with layout backends
//!
//! The request mirrors ELK's JSON graph: a `root` node whose `children` are
//! fixed-size boxes and whose `edges` name one source and one target each.
//! Responses only need `children[].{id, x, y}`; other fields are ignored.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::core::{BuildConfig, Direction, EdgeSpec, GraphError, NodeSpec};

pub const ALGORITHM_KEY: &str = "elk.algorithm";
pub const DIRECTION_KEY: &str = "elk.direction";
pub const NODE_SPACING_KEY: &str = "elk.spacing.nodeNode";
pub const LAYER_SPACING_KEY: &str = "elk.layered.spacing.nodeNodeBetweenLayers";

/// Geometry options sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub node_width: f64,
    pub node_height: f64,
    pub node_spacing: f64,
    pub layer_spacing: f64,
}

impl LayoutOptions {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            direction: config.effective_direction(),
            node_width: config.node_width,
            node_height: config.node_height,
            node_spacing: config.node_spacing,
            layer_spacing: config.layer_spacing,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    fn to_wire(self, algorithm: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            (ALGORITHM_KEY.to_string(), algorithm.to_string()),
            (DIRECTION_KEY.to_string(), self.direction.elk_name().to_string()),
            (NODE_SPACING_KEY.to_string(), self.node_spacing.to_string()),
            (LAYER_SPACING_KEY.to_string(), self.layer_spacing.to_string()),
        ])
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from_config(&BuildConfig::default())
    }
}

/// One node box in a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

/// One edge in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

impl LayoutEdge {
    pub fn source(&self) -> Option<&str> {
        self.sources.first().map(String::as_str)
    }

    pub fn target(&self) -> Option<&str> {
        self.targets.first().map(String::as_str)
    }
}

/// An immutable layout request
///
/// Node ids are distinct: a repeated id keeps only its first box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    id: String,
    layout_options: BTreeMap<String, String>,
    children: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
}

impl LayoutRequest {
    /// Build a request for the given algorithm name
    pub fn new(nodes: &[NodeSpec], edges: &[EdgeSpec], options: &LayoutOptions, algorithm: &str) -> Self {
        let mut seen = HashSet::new();
        let children = nodes
            .iter()
            .filter(|node| seen.insert(node.id.as_str()))
            .map(|node| LayoutNode {
                id: node.id.clone(),
                width: options.node_width,
                height: options.node_height,
            })
            .collect();
        let edges = edges
            .iter()
            .map(|edge| LayoutEdge {
                id: edge.id.clone(),
                sources: vec![edge.source.clone()],
                targets: vec![edge.target.clone()],
            })
            .collect();

        Self {
            id: "root".to_string(),
            layout_options: options.to_wire(algorithm),
            children,
            edges,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn layout_options(&self) -> &BTreeMap<String, String> {
        &self.layout_options
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.layout_options.get(key).map(String::as_str)
    }

    /// Requested direction, top-down when absent or unrecognised
    pub fn direction(&self) -> Direction {
        self.option(DIRECTION_KEY)
            .and_then(Direction::parse)
            .unwrap_or_default()
    }

    /// Numeric option, falling back when absent or unparsable
    pub fn spacing(&self, key: &str, fallback: f64) -> f64 {
        self.option(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(fallback)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|child| child.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One positioned node in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedChild {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl PositionedChild {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y }
    }
}

/// A backend's answer: positions for some or all requested nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResponse {
    #[serde(default)]
    pub children: Vec<PositionedChild>,
}

impl LayoutResponse {
    pub fn new(children: Vec<PositionedChild>) -> Self {
        Self { children }
    }

    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> LayoutRequest {
        LayoutRequest::new(
            &[NodeSpec::new("A"), NodeSpec::new("B"), NodeSpec::new("A")],
            &[EdgeSpec::new("e0", "A", "B")],
            &LayoutOptions::default(),
            "layered",
        )
    }

    #[test]
    fn test_request_wire_shape() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(value["id"], "root");
        assert_eq!(value["layoutOptions"]["elk.algorithm"], "layered");
        assert_eq!(value["layoutOptions"]["elk.direction"], "DOWN");
        assert_eq!(
            value["children"][0],
            json!({"id": "A", "width": 80.0, "height": 80.0})
        );
        assert_eq!(
            value["edges"][0],
            json!({"id": "e0", "sources": ["A"], "targets": ["B"]})
        );
    }

    #[test]
    fn test_request_dedups_node_ids() {
        let req = request();
        let ids: Vec<&str> = req.node_ids().collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_request_reads_back_options() {
        let options = LayoutOptions::default().with_direction(Direction::LeftRight);
        let req = LayoutRequest::new(&[], &[], &options, "layered");
        assert_eq!(req.direction(), Direction::LeftRight);
        assert_eq!(req.spacing(NODE_SPACING_KEY, 0.0), 20.0);
        assert_eq!(req.spacing("missing", 7.5), 7.5);
        assert!(req.is_empty());
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let response = LayoutResponse::from_json(
            r#"{"id": "root", "width": 100, "children": [{"id": "A", "x": 1.5, "y": 2, "width": 80}]}"#,
        )
        .unwrap();
        assert_eq!(response.children, vec![PositionedChild::new("A", 1.5, 2.0)]);
    }

    #[test]
    fn test_response_without_children() {
        let response = LayoutResponse::from_json("{}").unwrap();
        assert!(response.children.is_empty());
    }
}
