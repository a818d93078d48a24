//! Adjacency-row input form
//!
//! Each node row owns its own list of target cells. Both the node column and
//! every target list auto-grow.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{SlotList, SlotUpdate};
use crate::core::GraphError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawAdjacency {
    #[serde(default)]
    nodes: Vec<String>,
    #[serde(default)]
    targets: Vec<Vec<String>>,
}

/// Node rows, each with its own auto-growing target list
///
/// `targets` always has one list per node row, the trailing empty row included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAdjacency", into = "RawAdjacency")]
pub struct AdjacencyForm {
    nodes: SlotList,
    targets: Vec<SlotList>,
}

impl AdjacencyForm {
    pub fn new() -> Self {
        Self {
            nodes: SlotList::new(),
            targets: vec![SlotList::new()],
        }
    }

    /// Build a form from already-typed rows of `(node, targets)`
    pub fn from_rows<N, T, I>(rows: I) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (N, Vec<T>)>,
    {
        let (nodes, targets): (Vec<String>, Vec<Vec<String>>) = rows
            .into_iter()
            .map(|(node, targets)| (node.into(), targets.into_iter().map(Into::into).collect()))
            .unzip();
        RawAdjacency { nodes, targets }.into()
    }

    pub fn nodes(&self) -> &SlotList {
        &self.nodes
    }

    /// Target list of one row
    pub fn targets(&self, row: usize) -> Option<&SlotList> {
        self.targets.get(row)
    }

    /// Number of node rows, the trailing empty one included
    pub fn row_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate rows as `(row index, raw node cell, targets)`
    pub fn rows(&self) -> impl Iterator<Item = (usize, &str, &SlotList)> {
        self.nodes
            .cells()
            .iter()
            .zip(&self.targets)
            .enumerate()
            .map(|(i, (node, targets))| (i, node.as_str(), targets))
    }

    /// Edit a node cell; a grown node column gets a fresh target list
    pub fn update_node(&mut self, row: usize, value: impl Into<String>) -> Result<SlotUpdate, GraphError> {
        let update = self.nodes.update(row, value)?;
        if update.grew {
            self.targets.push(SlotList::new());
            trace!(rows = self.nodes.len(), "Adjacency form gained a row");
        }
        Ok(update)
    }

    /// Edit one target cell of a row
    pub fn update_target(
        &mut self,
        row: usize,
        slot: usize,
        value: impl Into<String>,
    ) -> Result<SlotUpdate, GraphError> {
        let len = self.targets.len();
        self.targets
            .get_mut(row)
            .ok_or(GraphError::SlotOutOfRange { index: row, len })?
            .update(slot, value)
    }

    pub fn submit_node(&mut self, row: usize) -> Result<SlotUpdate, GraphError> {
        let value = self
            .nodes
            .get(row)
            .ok_or(GraphError::SlotOutOfRange {
                index: row,
                len: self.nodes.len(),
            })?
            .to_string();
        self.update_node(row, value)
    }

    pub fn submit_target(&mut self, row: usize, slot: usize) -> Result<SlotUpdate, GraphError> {
        let len = self.targets.len();
        self.targets
            .get_mut(row)
            .ok_or(GraphError::SlotOutOfRange { index: row, len })?
            .submit(slot)
    }
}

impl Default for AdjacencyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl From<RawAdjacency> for AdjacencyForm {
    fn from(raw: RawAdjacency) -> Self {
        let RawAdjacency { mut nodes, targets } = raw;
        if targets.len() > nodes.len() {
            nodes.resize(targets.len(), String::new());
        }
        let nodes = SlotList::from(nodes);
        let mut targets: Vec<SlotList> = targets.into_iter().map(SlotList::from).collect();
        targets.resize_with(nodes.len(), SlotList::new);
        Self { nodes, targets }
    }
}

impl From<AdjacencyForm> for RawAdjacency {
    fn from(form: AdjacencyForm) -> Self {
        Self {
            nodes: form.nodes.into(),
            targets: form.targets.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_form_has_one_row() {
        let form = AdjacencyForm::new();
        assert_eq!(form.row_count(), 1);
        assert_eq!(form.targets(0).unwrap().len(), 1);
    }

    #[test]
    fn test_growing_node_column_adds_target_list() {
        let mut form = AdjacencyForm::new();
        assert!(form.update_node(0, "A").unwrap().grew);
        assert_eq!(form.row_count(), 2);
        assert_eq!(form.targets(1).unwrap().cells(), &[String::new()]);
    }

    #[test]
    fn test_target_lists_grow_independently() {
        let mut form = AdjacencyForm::new();
        form.update_node(0, "A").unwrap();
        form.update_target(0, 0, "B").unwrap();
        form.update_target(0, 1, "C").unwrap();
        assert_eq!(form.targets(0).unwrap().len(), 3);
        assert_eq!(form.targets(1).unwrap().len(), 1);
    }

    #[test]
    fn test_out_of_range_row() {
        let mut form = AdjacencyForm::new();
        assert!(matches!(
            form.update_target(4, 0, "B"),
            Err(GraphError::SlotOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn test_submit_does_not_grow_twice() {
        let mut form = AdjacencyForm::new();
        form.update_node(0, "A").unwrap();
        let before = form.clone();
        form.submit_node(0).unwrap();
        form.submit_target(0, 0).unwrap();
        assert_eq!(form, before);
    }

    #[test]
    fn test_deserialize_aligns_rows() {
        let form: AdjacencyForm =
            serde_json::from_str(r#"{"nodes": ["A", "B"], "targets": [["B"]]}"#).unwrap();
        assert_eq!(form.row_count(), 3);
        assert_eq!(form.rows().count(), 3);
        assert_eq!(form.targets(0).unwrap().len(), 2);
        assert_eq!(form.targets(2).unwrap().len(), 1);
    }

    #[test]
    fn test_deserialize_extra_target_rows_pad_nodes() {
        let form: AdjacencyForm =
            serde_json::from_str(r#"{"nodes": ["A"], "targets": [["B"], ["C"]]}"#).unwrap();
        let rows: Vec<_> = form.rows().map(|(i, node, _)| (i, node.to_string())).collect();
        assert_eq!(rows, vec![(0, "A".to_string()), (1, String::new())]);
    }
}
