//! Source/target pair input form

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{SlotList, SlotUpdate};
use crate::core::GraphError;

/// Which side of a pair row is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    Source,
    Target,
}

/// One `(source, target)` row, serialized as a two-element array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct PairSlot {
    pub source: String,
    pub target: String,
}

impl PairSlot {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Trimmed endpoints when both sides are filled
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let source = self.source.trim();
        let target = self.target.trim();
        (!source.is_empty() && !target.is_empty()).then_some((source, target))
    }

    fn is_blank(&self) -> bool {
        self.source.trim().is_empty() && self.target.trim().is_empty()
    }
}

impl From<(String, String)> for PairSlot {
    fn from((source, target): (String, String)) -> Self {
        Self { source, target }
    }
}

impl From<PairSlot> for (String, String) {
    fn from(slot: PairSlot) -> Self {
        (slot.source, slot.target)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawPairs {
    #[serde(default)]
    nodes: Vec<String>,
    #[serde(default)]
    edges: Vec<PairSlot>,
}

/// Node cells plus an auto-growing list of edge pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPairs", into = "RawPairs")]
pub struct PairForm {
    nodes: SlotList,
    pairs: Vec<PairSlot>,
}

impl PairForm {
    pub fn new() -> Self {
        Self {
            nodes: SlotList::new(),
            pairs: vec![PairSlot::default()],
        }
    }

    /// Build a form from typed node cells and pairs
    pub fn from_parts<N, S, T>(nodes: impl IntoIterator<Item = N>, pairs: impl IntoIterator<Item = (S, T)>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
        T: Into<String>,
    {
        RawPairs {
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges: pairs
                .into_iter()
                .map(|(s, t)| PairSlot::new(s, t))
                .collect(),
        }
        .into()
    }

    pub fn nodes(&self) -> &SlotList {
        &self.nodes
    }

    pub fn pairs(&self) -> &[PairSlot] {
        &self.pairs
    }

    pub fn update_node(&mut self, index: usize, value: impl Into<String>) -> Result<SlotUpdate, GraphError> {
        self.nodes.update(index, value)
    }

    pub fn submit_node(&mut self, index: usize) -> Result<SlotUpdate, GraphError> {
        self.nodes.submit(index)
    }

    /// Edit one side of a pair row; the list grows when its last row gets content
    pub fn update_pair(
        &mut self,
        index: usize,
        side: PairSide,
        value: impl Into<String>,
    ) -> Result<SlotUpdate, GraphError> {
        let len = self.pairs.len();
        let slot = self
            .pairs
            .get_mut(index)
            .ok_or(GraphError::SlotOutOfRange { index, len })?;
        match side {
            PairSide::Source => slot.source = value.into(),
            PairSide::Target => slot.target = value.into(),
        }

        let grew = index == len - 1 && !slot.is_blank();
        if grew {
            self.pairs.push(PairSlot::default());
            trace!(index, len = self.pairs.len(), "Pair list grew");
        }
        Ok(SlotUpdate { grew })
    }

    pub fn submit_pair(&mut self, index: usize, side: PairSide) -> Result<SlotUpdate, GraphError> {
        let slot = self.pairs.get(index).ok_or(GraphError::SlotOutOfRange {
            index,
            len: self.pairs.len(),
        })?;
        let value = match side {
            PairSide::Source => slot.source.clone(),
            PairSide::Target => slot.target.clone(),
        };
        self.update_pair(index, side, value)
    }
}

impl Default for PairForm {
    fn default() -> Self {
        Self::new()
    }
}

impl From<RawPairs> for PairForm {
    fn from(raw: RawPairs) -> Self {
        let mut pairs = raw.edges;
        if pairs.last().map_or(true, |p| !p.is_blank()) {
            pairs.push(PairSlot::default());
        }
        Self {
            nodes: SlotList::from(raw.nodes),
            pairs,
        }
    }
}

impl From<PairForm> for RawPairs {
    fn from(form: PairForm) -> Self {
        Self {
            nodes: form.nodes.into(),
            edges: form.pairs,
        }
    }
}
