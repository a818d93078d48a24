//! Breadth-first level layout
//!
//! Each node sits at its breadth-first distance from the nearest root, in
//! discovery order. Components without a root start from their earliest node.
//! No crossing reduction is done, which keeps the result predictable for
//! straight-line rendering.

use anyhow::Result;
use futures::future::{self, BoxFuture};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, span, Level};

use super::placement::place_layers;
use super::{LayoutBackend, LayoutRequest, LayoutResponse};
use crate::core::EdgeRouting;

/// Levels strategy; declares itself as `layered` on the wire
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelsBackend;

impl LevelsBackend {
    pub fn new() -> Self {
        Self
    }

    /// Level of every requested node
    pub fn levels<'a>(&self, request: &'a LayoutRequest) -> Vec<(&'a str, usize)> {
        let ids: Vec<&str> = request.node_ids().collect();
        let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut has_incoming: HashMap<&str, bool> = ids.iter().map(|&id| (id, false)).collect();

        for edge in request.edges() {
            let (Some(source), Some(target)) = (edge.source(), edge.target()) else {
                continue;
            };
            if source == target || !has_incoming.contains_key(source) {
                continue;
            }
            if let Some(incoming) = has_incoming.get_mut(target) {
                *incoming = true;
                successors.entry(source).or_default().push(target);
            }
        }

        let mut level: HashMap<&str, usize> = HashMap::new();
        let mut discovered: Vec<&str> = Vec::with_capacity(ids.len());
        let mut queue: VecDeque<&str> = VecDeque::new();

        let roots = ids.iter().copied().filter(|id| !has_incoming[id]);
        // Roots first, then whatever a cycle kept unreachable
        for start in roots.chain(ids.iter().copied()) {
            if level.contains_key(start) {
                continue;
            }
            level.insert(start, 0);
            discovered.push(start);
            queue.push_back(start);

            while let Some(node) = queue.pop_front() {
                let next_level = level[node] + 1;
                for &succ in successors.get(node).map(Vec::as_slice).unwrap_or(&[]) {
                    if !level.contains_key(succ) {
                        level.insert(succ, next_level);
                        discovered.push(succ);
                        queue.push_back(succ);
                    }
                }
            }
        }

        discovered.into_iter().map(|id| (id, level[id])).collect()
    }

    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        let layout_span = span!(
            Level::INFO,
            "layout_levels",
            node_count = request.children().len(),
            edge_count = request.edges().len()
        );
        let _enter = layout_span.enter();

        let levels = self.levels(request);
        let depth = levels.iter().map(|&(_, l)| l + 1).max().unwrap_or(0);
        let mut grouped: Vec<Vec<&str>> = vec![Vec::new(); depth];
        for (id, l) in levels {
            grouped[l].push(id);
        }
        debug!(level_count = grouped.len(), "Assigned nodes to levels");

        place_layers(&grouped, request)
    }
}

impl LayoutBackend for LevelsBackend {
    fn name(&self) -> &'static str {
        "levels"
    }

    fn algorithm(&self) -> &'static str {
        "layered"
    }

    fn preferred_routing(&self) -> EdgeRouting {
        EdgeRouting::Straight
    }

    fn layout<'a>(&'a self, request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>> {
        Box::pin(future::ready(Ok(self.compute(request))))
    }
}
