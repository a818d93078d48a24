//! Built-in hierarchical layout
//!
//! Nodes are ordered topologically (cycles are broken by reversing the
//! edges that close them), put on the layer after their deepest
//! predecessor, reordered by barycenter to reduce crossings and finally
//! spread out by [`place_layers`].

use anyhow::Result;
use futures::future::{self, BoxFuture};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, span, trace, Level};

use super::ordering::{order_layers_barycenter, LayerGraph};
use super::placement::place_layers;
use super::{LayoutBackend, LayoutRequest, LayoutResponse};
use crate::core::EdgeRouting;

const ORDERING_SWEEPS: usize = 8;

/// Topological order in input order, breaking cycles when stuck.
///
/// When every remaining node still has an incoming edge, the earliest one is
/// taken as if those edges were reversed.
pub(crate) fn topological_order<'a>(ids: &[&'a str], edges: &[(&'a str, &'a str)]) -> Vec<&'a str> {
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mut in_degree = vec![0usize; ids.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for (source, target) in edges {
        if let (Some(&s), Some(&t)) = (index.get(source), index.get(target)) {
            if s != t {
                in_degree[t] += 1;
                successors[s].push(t);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..ids.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut remaining: BTreeSet<usize> = (0..ids.len()).collect();
    let mut order = Vec::with_capacity(ids.len());

    while let Some(&first) = remaining.first() {
        let next = match ready.pop_first() {
            Some(next) => next,
            None => {
                trace!(node_id = ids[first], "Breaking cycle");
                first
            }
        };
        remaining.remove(&next);
        order.push(ids[next]);

        for &succ in &successors[next] {
            if !remaining.contains(&succ) {
                continue;
            }
            in_degree[succ] = in_degree[succ].saturating_sub(1);
            if in_degree[succ] == 0 {
                ready.insert(succ);
            }
        }
    }
    order
}

/// Layer index per node: 0 for sources, else one past the deepest predecessor
pub(crate) fn assign_layers<'a>(order: &[&'a str], graph: &LayerGraph<'a>) -> HashMap<&'a str, usize> {
    let mut layers: HashMap<&str, usize> = HashMap::new();
    for &node_id in order {
        let layer = graph
            .predecessors(node_id)
            .iter()
            .filter_map(|p| layers.get(p))
            .max()
            .map(|&l| l + 1)
            .unwrap_or(0);
        layers.insert(node_id, layer);
    }
    layers
}

/// Group nodes by layer, keeping `order` within each layer
pub(crate) fn group_layers<'a>(order: &[&'a str], layers: &HashMap<&'a str, usize>) -> Vec<Vec<&'a str>> {
    let max_layer = layers.values().max().copied().unwrap_or(0);
    let mut grouped: Vec<Vec<&str>> = vec![Vec::new(); max_layer + 1];
    for &node_id in order {
        if let Some(&layer) = layers.get(node_id) {
            grouped[layer].push(node_id);
        }
    }
    grouped.retain(|layer| !layer.is_empty());
    grouped
}

/// Hierarchical layout, cycle tolerant
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredBackend;

impl LayeredBackend {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous layout of a request
    pub fn compute(&self, request: &LayoutRequest) -> LayoutResponse {
        let layout_span = span!(
            Level::INFO,
            "layout_layered",
            node_count = request.children().len(),
            edge_count = request.edges().len(),
            direction = %request.direction()
        );
        let _enter = layout_span.enter();

        if request.is_empty() {
            debug!("Empty request, returning empty layout");
            return LayoutResponse::default();
        }

        let ids: Vec<&str> = request.node_ids().collect();
        let edges: Vec<(&str, &str)> = request
            .edges()
            .iter()
            .filter_map(|edge| Some((edge.source()?, edge.target()?)))
            .collect();

        let order = topological_order(&ids, &edges);
        let rank: HashMap<&str, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        // Orient every edge along the order; self-loops and dangling edges carry no rank
        let oriented: Vec<(&str, &str)> = edges
            .iter()
            .filter_map(|&(s, t)| match (rank.get(s), rank.get(t)) {
                (Some(rs), Some(rt)) if rs < rt => Some((s, t)),
                (Some(rs), Some(rt)) if rs > rt => Some((t, s)),
                _ => None,
            })
            .collect();
        let ignored = edges.len() - oriented.len();
        let graph = LayerGraph::new(oriented.iter().copied());

        let layers = assign_layers(&order, &graph);
        let mut grouped = group_layers(&order, &layers);
        debug!(layer_count = grouped.len(), ignored_edges = ignored, "Assigned nodes to layers");

        let crossings = order_layers_barycenter(&graph, &mut grouped, ORDERING_SWEEPS);
        debug!(crossings, "Ordered layers");

        place_layers(&grouped, request)
    }
}

impl LayoutBackend for LayeredBackend {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn algorithm(&self) -> &'static str {
        "layered"
    }

    fn preferred_routing(&self) -> EdgeRouting {
        EdgeRouting::Curved
    }

    fn layout<'a>(&'a self, request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>> {
        Box::pin(future::ready(Ok(self.compute(request))))
    }
}
