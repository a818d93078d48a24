//! Core type definitions for graph building
//!
//! This module contains the canonical graph elements shared by every stage of
//! the pipeline: node and edge specs, positions, flow direction and edge
//! routing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters kept in a node's display label
pub const DISPLAY_LABEL_WIDTH: usize = 7;

/// Truncate a label to its first `width` characters.
///
/// Counts `char`s rather than bytes so multi-byte identifiers are never split
/// in the middle of a code point.
///
/// # Example
/// ```
/// use graphcraft::core::truncate_label;
///
/// assert_eq!(truncate_label("VeryLongNodeName123", 7), "VeryLon");
/// assert_eq!(truncate_label("AB", 7), "AB");
/// ```
pub fn truncate_label(label: &str, width: usize) -> String {
    label.chars().take(width).collect()
}

/// A canonical node, identified by its trimmed id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique, trimmed, non-empty identifier
    pub id: String,
    /// Short label drawn inside the node
    pub display_label: String,
    /// Full identifier, shown on hover
    pub full_label: String,
}

impl NodeSpec {
    /// Create a node spec with the default display label width
    ///
    /// The identifier is trimmed; callers are expected to have filtered out
    /// identifiers that are empty after trimming.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self::with_label_width(id, DISPLAY_LABEL_WIDTH)
    }

    /// Create a node spec whose display label keeps `width` characters
    pub fn with_label_width(id: impl AsRef<str>, width: usize) -> Self {
        let id = id.as_ref().trim();
        Self {
            id: id.to_string(),
            display_label: truncate_label(id, width),
            full_label: id.to_string(),
        }
    }
}

/// A directed edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Generated, order-derived identifier
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
}

impl EdgeSpec {
    /// Create a new edge spec
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns true if the edge starts and ends on the same node
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A 2D position computed by a layout backend
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The origin, used whenever a backend has no answer for a node
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Flow direction for layered layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Top to bottom (TD or TB)
    #[default]
    TopDown,
    /// Left to right (LR)
    LeftRight,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomUp,
}

impl Direction {
    /// Parse a direction from its short name (TD, TB, LR, RL, BT) or ELK name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TD" | "TB" | "DOWN" => Some(Direction::TopDown),
            "LR" | "RIGHT" => Some(Direction::LeftRight),
            "RL" | "LEFT" => Some(Direction::RightLeft),
            "BT" | "UP" => Some(Direction::BottomUp),
            _ => None,
        }
    }

    /// Value of the `elk.direction` layout option
    pub fn elk_name(&self) -> &'static str {
        match self {
            Direction::TopDown => "DOWN",
            Direction::LeftRight => "RIGHT",
            Direction::RightLeft => "LEFT",
            Direction::BottomUp => "UP",
        }
    }

    /// Returns true if this is a vertical layout (TD or BT)
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::TopDown | Direction::BottomUp)
    }

    /// Returns true if this is a horizontal layout (LR or RL)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }

    /// Returns true if the flow is reversed (RL or BT)
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::RightLeft | Direction::BottomUp)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopDown => write!(f, "TD"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
            Direction::BottomUp => write!(f, "BT"),
        }
    }
}

/// How the render surface should route edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeRouting {
    /// Curved step routing (`smoothstep`)
    #[default]
    Curved,
    /// Straight segments (`straight`)
    Straight,
}

impl EdgeRouting {
    /// Edge type name understood by the render surface
    pub fn edge_type(&self) -> &'static str {
        match self {
            EdgeRouting::Curved => "smoothstep",
            EdgeRouting::Straight => "straight",
        }
    }
}

impl fmt::Display for EdgeRouting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRouting::Curved => write!(f, "curved"),
            EdgeRouting::Straight => write!(f, "straight"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_spec_truncates_display_label() {
        let node = NodeSpec::new("VeryLongNodeName123");
        assert_eq!(node.id, "VeryLongNodeName123");
        assert_eq!(node.display_label, "VeryLon");
        assert_eq!(node.full_label, "VeryLongNodeName123");
    }

    #[test]
    fn test_node_spec_trims_id() {
        let node = NodeSpec::new("  X  ");
        assert_eq!(node.id, "X");
        assert_eq!(node.display_label, "X");
        assert_eq!(node.full_label, "X");
    }

    #[test]
    fn test_truncate_label_multibyte() {
        assert_eq!(truncate_label("überlänge", 3), "übe");
        assert_eq!(truncate_label("日本語テストです", 7), "日本語テストで");
    }

    #[test]
    fn test_custom_label_width() {
        let node = NodeSpec::with_label_width("abcdef", 2);
        assert_eq!(node.display_label, "ab");
        assert_eq!(node.full_label, "abcdef");
    }

    #[test]
    fn test_edge_self_loop() {
        assert!(EdgeSpec::new("e0", "A", "A").is_self_loop());
        assert!(!EdgeSpec::new("e0", "A", "B").is_self_loop());
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::parse("TD"), Some(Direction::TopDown));
        assert_eq!(Direction::parse("tb"), Some(Direction::TopDown));
        assert_eq!(Direction::parse("LR"), Some(Direction::LeftRight));
        assert_eq!(Direction::parse("right"), Some(Direction::LeftRight));
        assert_eq!(Direction::parse("RL"), Some(Direction::RightLeft));
        assert_eq!(Direction::parse("BT"), Some(Direction::BottomUp));
        assert_eq!(Direction::parse("invalid"), None);
    }

    #[test]
    fn test_direction_properties() {
        assert!(Direction::TopDown.is_vertical());
        assert!(Direction::BottomUp.is_vertical());
        assert!(!Direction::LeftRight.is_vertical());

        assert!(Direction::LeftRight.is_horizontal());
        assert!(!Direction::TopDown.is_horizontal());

        assert!(Direction::RightLeft.is_reversed());
        assert!(Direction::BottomUp.is_reversed());
        assert!(!Direction::TopDown.is_reversed());
    }

    #[test]
    fn test_direction_elk_names() {
        assert_eq!(Direction::TopDown.elk_name(), "DOWN");
        assert_eq!(Direction::LeftRight.elk_name(), "RIGHT");
        assert_eq!(Direction::RightLeft.elk_name(), "LEFT");
        assert_eq!(Direction::BottomUp.elk_name(), "UP");
    }

    #[test]
    fn test_edge_routing_types() {
        assert_eq!(EdgeRouting::default(), EdgeRouting::Curved);
        assert_eq!(EdgeRouting::Curved.edge_type(), "smoothstep");
        assert_eq!(EdgeRouting::Straight.edge_type(), "straight");
    }

    #[test]
    fn test_position_default_is_origin() {
        assert_eq!(Position::default(), Position::ORIGIN);
        assert_eq!(Position::new(1.5, 2.0).to_string(), "(1.5, 2)");
    }
}
