//! Graph validation
//!
//! Applies the configured duplicate-node and dangling-edge policies to a
//! parsed database before it is laid out.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, span, warn, Level};

use super::GraphDatabase;
use crate::core::{Database, DanglingEdgePolicy, DuplicateNodePolicy, GraphError};

/// One undeclared endpoint of an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub edge_id: String,
    pub node_id: String,
}

/// Findings for a parsed graph, independent of any policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub duplicate_nodes: Vec<String>,
    pub dangling_edges: Vec<DanglingReference>,
}

impl ValidationReport {
    /// Inspect a database
    pub fn inspect(database: &GraphDatabase) -> Self {
        Self {
            duplicate_nodes: database
                .duplicate_node_ids()
                .into_iter()
                .map(str::to_string)
                .collect(),
            dangling_edges: database
                .dangling_references()
                .into_iter()
                .map(|(edge, node_id)| DanglingReference {
                    edge_id: edge.id.clone(),
                    node_id: node_id.to_string(),
                })
                .collect(),
        }
    }

    /// True when there is nothing to report
    pub fn is_clean(&self) -> bool {
        self.duplicate_nodes.is_empty() && self.dangling_edges.is_empty()
    }
}

/// Applies duplicate-node and dangling-edge policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    duplicates: DuplicateNodePolicy,
    dangling: DanglingEdgePolicy,
}

impl Validator {
    pub fn new(duplicates: DuplicateNodePolicy, dangling: DanglingEdgePolicy) -> Self {
        Self {
            duplicates,
            dangling,
        }
    }

    pub fn duplicate_policy(&self) -> DuplicateNodePolicy {
        self.duplicates
    }

    pub fn dangling_policy(&self) -> DanglingEdgePolicy {
        self.dangling
    }

    /// Apply both policies in place
    ///
    /// Duplicates are resolved first, so a `Reject` on either policy fails
    /// before anything is removed.
    pub fn apply(&self, database: &mut GraphDatabase) -> Result<()> {
        let validate_span = span!(
            Level::INFO,
            "validate_graph",
            node_count = database.node_count(),
            edge_count = database.edge_count()
        );
        let _enter = validate_span.enter();

        match self.duplicates {
            DuplicateNodePolicy::Merge => {
                database.merge_duplicate_nodes();
            }
            DuplicateNodePolicy::Keep => {
                let duplicates = database.duplicate_node_ids();
                if !duplicates.is_empty() {
                    debug!(?duplicates, "Keeping duplicate nodes");
                }
            }
            DuplicateNodePolicy::Reject => {
                if let Some(id) = database.duplicate_node_ids().first() {
                    warn!(node_id = %id, "Rejecting duplicate node");
                    return Err(GraphError::duplicate_node(*id).into());
                }
            }
        }

        match self.dangling {
            DanglingEdgePolicy::PassThrough => {
                for (edge, node_id) in database.dangling_references() {
                    warn!(edge_id = %edge.id, node_id = %node_id, "Edge references undeclared node");
                }
            }
            DanglingEdgePolicy::Drop => {
                let declared: HashSet<String> =
                    database.nodes().map(|n| n.id.clone()).collect();
                let dropped = database.retain_edges(|edge| {
                    let keep =
                        declared.contains(&edge.source) && declared.contains(&edge.target);
                    if !keep {
                        warn!(edge_id = %edge.id, "Dropping edge with undeclared endpoint");
                    }
                    keep
                });
                debug!(dropped, "Dangling edges dropped");
            }
            DanglingEdgePolicy::Reject => {
                if let Some((edge, node_id)) = database.dangling_references().first() {
                    warn!(edge_id = %edge.id, node_id = %node_id, "Rejecting dangling edge");
                    return Err(GraphError::dangling_edge(edge.id.clone(), *node_id).into());
                }
            }
        }

        debug!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Validation completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeSpec, NodeSpec};

    fn database() -> GraphDatabase {
        GraphDatabase::from_parts(
            vec![NodeSpec::new("A"), NodeSpec::new("B"), NodeSpec::new("A")],
            vec![
                EdgeSpec::new("e0", "A", "B"),
                EdgeSpec::new("e1", "B", "Q"),
            ],
        )
    }

    #[test]
    fn test_report() {
        let report = ValidationReport::inspect(&database());
        assert_eq!(report.duplicate_nodes, vec!["A".to_string()]);
        assert_eq!(
            report.dangling_edges,
            vec![DanglingReference {
                edge_id: "e1".to_string(),
                node_id: "Q".to_string()
            }]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_default_policies_merge_and_pass_through() {
        let mut db = database();
        Validator::default().apply(&mut db).unwrap();
        assert_eq!(db.node_count(), 2);
        assert_eq!(db.edge_count(), 2);
    }

    #[test]
    fn test_keep_duplicates() {
        let mut db = database();
        Validator::new(DuplicateNodePolicy::Keep, DanglingEdgePolicy::PassThrough)
            .apply(&mut db)
            .unwrap();
        assert_eq!(db.node_count(), 3);
    }

    #[test]
    fn test_drop_dangling() {
        let mut db = database();
        Validator::new(DuplicateNodePolicy::Merge, DanglingEdgePolicy::Drop)
            .apply(&mut db)
            .unwrap();
        assert_eq!(db.edge_count(), 1);
        assert_eq!(db.edge_specs()[0].id, "e0");
    }

    #[test]
    fn test_reject_dangling() {
        let mut db = database();
        let err = Validator::new(DuplicateNodePolicy::Merge, DanglingEdgePolicy::Reject)
            .apply(&mut db)
            .unwrap_err();
        match err.downcast_ref::<GraphError>() {
            Some(GraphError::DanglingEdge { edge_id, node_id }) => {
                assert_eq!(edge_id, "e1");
                assert_eq!(node_id, "Q");
            }
            other => panic!("Expected DanglingEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_duplicates() {
        let mut db = database();
        let err = Validator::new(DuplicateNodePolicy::Reject, DanglingEdgePolicy::PassThrough)
            .apply(&mut db)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::DuplicateNode { id }) if id == "A"
        ));
    }
}
