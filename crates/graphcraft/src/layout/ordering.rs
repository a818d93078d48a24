//! Barycenter ordering for edge crossing minimization
//!
//! Reorders the nodes of each layer by the average position of their
//! neighbours in the adjacent layer, sweeping down and up alternately and
//! keeping the ordering with the fewest crossings.

use std::collections::HashMap;

/// Directed adjacency over the edges that survive layering
#[derive(Debug, Clone, Default)]
pub struct LayerGraph<'a> {
    successors: HashMap<&'a str, Vec<&'a str>>,
    predecessors: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> LayerGraph<'a> {
    pub fn new(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = Self::default();
        for (source, target) in edges {
            graph.successors.entry(source).or_default().push(target);
            graph.predecessors.entry(target).or_default().push(source);
        }
        graph
    }

    pub fn successors(&self, id: &str) -> &[&'a str] {
        self.successors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: &str) -> &[&'a str] {
        self.predecessors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Count edge crossings between all adjacent layers.
///
/// Edges (a1→b1) and (a2→b2) between layer L and L+1 cross when a1 is left
/// of a2 while b1 is right of b2, or the other way round.
pub fn cross_count(layers: &[Vec<&str>], graph: &LayerGraph<'_>) -> usize {
    layers
        .windows(2)
        .map(|pair| two_layer_cross_count(&pair[0], &pair[1], graph))
        .sum()
}

fn two_layer_cross_count(north: &[&str], south: &[&str], graph: &LayerGraph<'_>) -> usize {
    let south_pos: HashMap<&str, usize> = south.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (np, &n) in north.iter().enumerate() {
        for &succ in graph.successors(n) {
            if let Some(&sp) = south_pos.get(succ) {
                edges.push((np, sp));
            }
        }
    }

    let mut crossings = 0;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (n1, s1) = edges[i];
            let (n2, s2) = edges[j];
            if (n1 < n2 && s1 > s2) || (n1 > n2 && s1 < s2) {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Which neighbours a barycenter is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Predecessors in the previous layer
    Downward,
    /// Successors in the next layer
    Upward,
}

/// Barycenter of each node against a reference layer, `None` when unconnected
pub fn compute_barycenters(
    layer: &[&str],
    ref_layer: &[&str],
    graph: &LayerGraph<'_>,
    direction: SweepDirection,
) -> Vec<Option<f64>> {
    let ref_pos: HashMap<&str, usize> =
        ref_layer.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    layer
        .iter()
        .map(|&node| {
            let neighbors = match direction {
                SweepDirection::Downward => graph.predecessors(node),
                SweepDirection::Upward => graph.successors(node),
            };
            let positions: Vec<f64> = neighbors
                .iter()
                .filter_map(|&n| ref_pos.get(n).map(|&p| p as f64))
                .collect();

            if positions.is_empty() {
                None
            } else {
                Some(positions.iter().sum::<f64>() / positions.len() as f64)
            }
        })
        .collect()
}

/// Sort a layer by barycenter; unconnected nodes go last in their old order
pub fn order_layer_by_barycenter(layer: &mut Vec<&str>, barycenters: &[Option<f64>]) {
    let mut entries: Vec<(&str, Option<f64>, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &node)| (node, barycenters.get(i).copied().flatten(), i))
        .collect();

    entries.sort_by(|a, b| match (&a.1, &b.1) {
        (Some(bc_a), Some(bc_b)) => bc_a.total_cmp(bc_b).then_with(|| a.2.cmp(&b.2)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.2.cmp(&b.2),
    });

    *layer = entries.into_iter().map(|(node, _, _)| node).collect();
}

/// Run `iterations` alternating sweeps and keep the best ordering.
///
/// Returns the crossing count of the ordering kept.
pub fn order_layers_barycenter(
    graph: &LayerGraph<'_>,
    layers: &mut Vec<Vec<&str>>,
    iterations: usize,
) -> usize {
    if layers.len() < 2 {
        return 0;
    }

    let mut best_layers = layers.clone();
    let mut best_cc = cross_count(layers, graph);

    for i in 0..iterations {
        if best_cc == 0 {
            break;
        }
        let downward = i % 2 == 0;
        let layer_indices: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len() - 1).rev().collect()
        };

        for layer_idx in layer_indices {
            let (ref_idx, direction) = if downward {
                (layer_idx - 1, SweepDirection::Downward)
            } else {
                (layer_idx + 1, SweepDirection::Upward)
            };
            let barycenters =
                compute_barycenters(&layers[layer_idx], &layers[ref_idx], graph, direction);
            order_layer_by_barycenter(&mut layers[layer_idx], &barycenters);
        }

        let cc = cross_count(layers, graph);
        if cc < best_cc {
            best_layers = layers.clone();
            best_cc = cc;
        }
    }

    *layers = best_layers;
    best_cc
}
