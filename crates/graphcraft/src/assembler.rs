//! Render graph assembly
//!
//! Merges node and edge specs with computed positions and the fixed
//! presentation defaults into the JSON document the drawing surface reads.

use serde::{Deserialize, Serialize};
use tracing::{debug, span, Level};

use crate::core::{EdgeRouting, EdgeSpec, GraphError, NodeSpec, Position};
use crate::layout::PositionMap;

/// Node type understood by the drawing surface
pub const NODE_TYPE: &str = "circle";

/// Label shown inside a node and its hover title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub background: String,
    pub color: String,
    pub width: f64,
    pub height: f64,
    pub font_size: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            background: "#0178ff".to_string(),
            color: "white".to_string(),
            width: 50.0,
            height: 50.0,
            font_size: "12px".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke: "#ff6600".to_string(),
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    pub data: NodeData,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub style: EdgeStyle,
}

/// A laid out graph, ready to draw
///
/// Never patched in place: every build produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&RenderEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Styles applied to every node and edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    pub node_style: NodeStyle,
    pub edge_style: EdgeStyle,
}

/// Builds [`RenderGraph`]s
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    presentation: Presentation,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presentation(presentation: Presentation) -> Self {
        Self { presentation }
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// One render node per spec and one render edge per spec, in order
    ///
    /// Nodes without a position sit at the origin. Edges are not checked
    /// against the node list.
    pub fn assemble(
        &self,
        nodes: &[NodeSpec],
        edges: &[EdgeSpec],
        positions: &PositionMap,
        routing: EdgeRouting,
    ) -> RenderGraph {
        let assemble_span = span!(
            Level::INFO,
            "assemble_graph",
            node_count = nodes.len(),
            edge_count = edges.len(),
            routing = %routing
        );
        let _enter = assemble_span.enter();

        let nodes: Vec<RenderNode> = nodes
            .iter()
            .map(|node| RenderNode {
                id: node.id.clone(),
                node_type: NODE_TYPE.to_string(),
                position: positions.get(&node.id).copied().unwrap_or_default(),
                data: NodeData {
                    label: node.display_label.clone(),
                    title: node.full_label.clone(),
                },
                style: self.presentation.node_style.clone(),
            })
            .collect();

        let edges: Vec<RenderEdge> = edges
            .iter()
            .map(|edge| RenderEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                edge_type: routing.edge_type().to_string(),
                style: self.presentation.edge_style.clone(),
            })
            .collect();

        debug!(nodes = nodes.len(), edges = edges.len(), "Render graph assembled");
        RenderGraph { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assemble_node_shape() {
        let mut positions = PositionMap::new();
        positions.insert("VeryLongNodeName123".to_string(), Position::new(10.0, 20.0));
        let graph = Assembler::new().assemble(
            &[NodeSpec::new("VeryLongNodeName123")],
            &[],
            &positions,
            EdgeRouting::Curved,
        );

        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(
            value["nodes"][0],
            json!({
                "id": "VeryLongNodeName123",
                "type": "circle",
                "position": {"x": 10.0, "y": 20.0},
                "data": {"label": "VeryLon", "title": "VeryLongNodeName123"},
                "style": {
                    "background": "#0178ff",
                    "color": "white",
                    "width": 50.0,
                    "height": 50.0,
                    "fontSize": "12px"
                }
            })
        );
    }

    #[test]
    fn test_assemble_edge_shape_by_routing() {
        let edges = [EdgeSpec::new("e0", "A", "B")];
        let curved = Assembler::new().assemble(&[], &edges, &PositionMap::new(), EdgeRouting::Curved);
        let straight = Assembler::new().assemble(&[], &edges, &PositionMap::new(), EdgeRouting::Straight);

        assert_eq!(
            serde_json::to_value(&curved.edges[0]).unwrap(),
            json!({
                "id": "e0",
                "source": "A",
                "target": "B",
                "type": "smoothstep",
                "style": {"stroke": "#ff6600", "strokeWidth": 2.0}
            })
        );
        assert_eq!(straight.edges[0].edge_type, "straight");
    }

    #[test]
    fn test_missing_position_is_origin() {
        let graph = Assembler::new().assemble(
            &[NodeSpec::new("A")],
            &[],
            &PositionMap::new(),
            EdgeRouting::Curved,
        );
        assert_eq!(graph.nodes[0].position, Position::ORIGIN);
    }

    #[test]
    fn test_dangling_edges_pass_through() {
        let graph = Assembler::new().assemble(
            &[NodeSpec::new("A")],
            &[EdgeSpec::new("e0", "A", "Q")],
            &PositionMap::new(),
            EdgeRouting::Curved,
        );
        assert_eq!(graph.edge("e0").unwrap().target, "Q");
    }

    #[test]
    fn test_empty_graph() {
        let graph = Assembler::new().assemble(&[], &[], &PositionMap::new(), EdgeRouting::Curved);
        assert!(graph.is_empty());
        assert_eq!(graph.to_json().unwrap(), r#"{"nodes":[],"edges":[]}"#);
    }
}
