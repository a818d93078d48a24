//! Coordinate assignment for layered backends
//!
//! Layers run along the flow axis; nodes inside a layer are spread across
//! the other axis and centred against the widest layer. Positions are the
//! top-left corner of each node box.

use std::collections::HashMap;

use super::{LayoutRequest, LayoutResponse, PositionedChild, LAYER_SPACING_KEY, NODE_SPACING_KEY};

const DEFAULT_NODE_SPACING: f64 = 20.0;
const DEFAULT_LAYER_SPACING: f64 = 40.0;

/// Turn ordered layers into positioned children
pub fn place_layers(layers: &[Vec<&str>], request: &LayoutRequest) -> LayoutResponse {
    let direction = request.direction();
    let node_spacing = request.spacing(NODE_SPACING_KEY, DEFAULT_NODE_SPACING);
    let layer_spacing = request.spacing(LAYER_SPACING_KEY, DEFAULT_LAYER_SPACING);

    let sizes: HashMap<&str, (f64, f64)> = request
        .children()
        .iter()
        .map(|child| (child.id.as_str(), (child.width, child.height)))
        .collect();
    let size = |id: &str| sizes.get(id).copied().unwrap_or((0.0, 0.0));

    // Extent of a node across the layer, and along the flow
    let across = |id: &str| {
        let (w, h) = size(id);
        if direction.is_vertical() { w } else { h }
    };
    let along = |id: &str| {
        let (w, h) = size(id);
        if direction.is_vertical() { h } else { w }
    };

    let layer_extents: Vec<f64> = layers
        .iter()
        .map(|layer| {
            let total: f64 = layer.iter().map(|&id| across(id)).sum();
            total + layer.len().saturating_sub(1) as f64 * node_spacing
        })
        .collect();
    let widest = layer_extents.iter().copied().fold(0.0, f64::max);
    let depths: Vec<f64> = layers
        .iter()
        .map(|layer| layer.iter().map(|&id| along(id)).fold(0.0, f64::max))
        .collect();

    let order: Vec<usize> = if direction.is_reversed() {
        (0..layers.len()).rev().collect()
    } else {
        (0..layers.len()).collect()
    };

    let mut children = Vec::with_capacity(request.children().len());
    let mut flow = 0.0;
    for index in order {
        let mut offset = (widest - layer_extents[index]) / 2.0;
        for &id in &layers[index] {
            let (x, y) = if direction.is_vertical() {
                (offset, flow)
            } else {
                (flow, offset)
            };
            children.push(PositionedChild::new(id, x, y));
            offset += across(id) + node_spacing;
        }
        flow += depths[index] + layer_spacing;
    }

    LayoutResponse::new(children)
}
