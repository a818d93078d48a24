//! Layout adapter and backends
//!
//! A [`LayoutBackend`] maps a [`LayoutRequest`] to positions. The
//! [`LayoutAdapter`] sits in front of one backend and guarantees exactly one
//! position per distinct node id, whatever the backend returned.

#[cfg(all(feature = "command-backend", not(target_arch = "wasm32")))]
mod command;
mod layered;
mod levels;
mod ordering;
mod placement;
mod request;

#[cfg(all(feature = "command-backend", not(target_arch = "wasm32")))]
pub use command::CommandBackend;
pub use layered::LayeredBackend;
pub use levels::LevelsBackend;
pub use ordering::{cross_count, LayerGraph};
pub use placement::place_layers;
pub use request::*;

use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::HashMap;
use tracing::{debug, info, span, trace, Instrument, Level};

use crate::core::{BackendKind, BuildConfig, EdgeRouting, EdgeSpec, GraphError, NodeSpec, Position};

/// Final positions, keyed by node id
pub type PositionMap = HashMap<String, Position>;

/// A layout algorithm behind the adapter
///
/// Object safe so backends can be chosen at runtime.
pub trait LayoutBackend: Send + Sync {
    /// Name used in logs and by the CLI
    fn name(&self) -> &'static str;

    /// Value sent as `elk.algorithm`
    fn algorithm(&self) -> &'static str;

    /// Edge routing that suits this backend's output
    fn preferred_routing(&self) -> EdgeRouting {
        EdgeRouting::Curved
    }

    /// Compute positions; may answer for only some nodes
    fn layout<'a>(&'a self, request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>>;
}

/// Names of the backends this build can construct
pub fn available_backends() -> Vec<BackendKind> {
    let mut kinds = vec![BackendKind::Layered, BackendKind::LayeredLr, BackendKind::Levels];
    if cfg!(all(feature = "command-backend", not(target_arch = "wasm32"))) {
        kinds.push(BackendKind::Command);
    }
    kinds
}

/// Construct the backend a config selects
pub fn backend_for(config: &BuildConfig) -> Result<Box<dyn LayoutBackend>> {
    match config.backend {
        BackendKind::Layered | BackendKind::LayeredLr => Ok(Box::new(LayeredBackend::new())),
        BackendKind::Levels => Ok(Box::new(LevelsBackend::new())),
        BackendKind::Command => command_backend(config),
    }
}

#[cfg(all(feature = "command-backend", not(target_arch = "wasm32")))]
fn command_backend(config: &BuildConfig) -> Result<Box<dyn LayoutBackend>> {
    let command = config
        .command
        .clone()
        .filter(|command| !command.program.trim().is_empty())
        .ok_or_else(|| GraphError::layout_error("the command backend needs a program to run"))?;
    Ok(Box::new(CommandBackend::new(command)))
}

#[cfg(not(all(feature = "command-backend", not(target_arch = "wasm32"))))]
fn command_backend(_config: &BuildConfig) -> Result<Box<dyn LayoutBackend>> {
    Err(GraphError::UnknownBackend {
        name: BackendKind::Command.to_string(),
    }
    .into())
}

/// Uniform front for one layout backend
pub struct LayoutAdapter {
    backend: Box<dyn LayoutBackend>,
    options: LayoutOptions,
}

impl LayoutAdapter {
    pub fn new(backend: Box<dyn LayoutBackend>, options: LayoutOptions) -> Self {
        Self { backend, options }
    }

    /// Adapter for the backend and geometry a config selects
    pub fn from_config(config: &BuildConfig) -> Result<Self> {
        Ok(Self::new(backend_for(config)?, LayoutOptions::from_config(config)))
    }

    pub fn backend(&self) -> &dyn LayoutBackend {
        self.backend.as_ref()
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// The request this adapter would send for a graph
    pub fn request(&self, nodes: &[NodeSpec], edges: &[EdgeSpec]) -> LayoutRequest {
        LayoutRequest::new(nodes, edges, &self.options, self.backend.algorithm())
    }

    /// Lay out a graph, returning one position per distinct node id
    pub async fn layout(&self, nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Result<PositionMap> {
        let request = self.request(nodes, edges);
        let layout_span = span!(
            Level::INFO,
            "layout_graph",
            backend = self.backend.name(),
            node_count = request.children().len(),
            edge_count = request.edges().len()
        );
        self.run(&request).instrument(layout_span).await
    }

    async fn run(&self, request: &LayoutRequest) -> Result<PositionMap> {
        if request.is_empty() {
            debug!("No nodes to lay out");
            return Ok(PositionMap::new());
        }

        let response = self.backend.layout(request).await?;
        let positions = reconcile(request, response);
        info!(backend = self.backend.name(), node_count = positions.len(), "Layout completed");
        Ok(positions)
    }
}

impl std::fmt::Debug for LayoutAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutAdapter")
            .field("backend", &self.backend.name())
            .field("options", &self.options)
            .finish()
    }
}

/// Match a response against its request
///
/// Requested ids missing from the response land on the origin; ids the
/// request never named are dropped. When a backend repeats an id the first
/// answer is kept.
pub fn reconcile(request: &LayoutRequest, response: LayoutResponse) -> PositionMap {
    let mut positions = PositionMap::with_capacity(request.children().len());
    let mut answered: HashMap<String, Position> = HashMap::new();
    for child in response.children {
        answered
            .entry(child.id)
            .or_insert(Position::new(child.x, child.y));
    }

    for id in request.node_ids() {
        let position = match answered.remove(id) {
            Some(position) => position,
            None => {
                debug!(node_id = id, "Backend returned no position, using origin");
                Position::ORIGIN
            }
        };
        positions.insert(id.to_string(), position);
    }

    for id in answered.keys() {
        debug!(node_id = %id, "Dropping position for unrequested node");
    }
    trace!(positions = positions.len(), "Positions reconciled");
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future;

    struct FixedBackend(Vec<PositionedChild>);

    impl LayoutBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn algorithm(&self) -> &'static str {
            "fixed"
        }

        fn layout<'a>(&'a self, _request: &'a LayoutRequest) -> BoxFuture<'a, Result<LayoutResponse>> {
            Box::pin(future::ready(Ok(LayoutResponse::new(self.0.clone()))))
        }
    }

    fn nodes(ids: &[&str]) -> Vec<NodeSpec> {
        ids.iter().map(NodeSpec::new).collect()
    }

    #[test]
    fn test_missing_positions_default_to_origin() {
        let adapter = LayoutAdapter::new(
            Box::new(FixedBackend(vec![PositionedChild::new("A", 5.0, 6.0)])),
            LayoutOptions::default(),
        );
        let positions = block_on(adapter.layout(&nodes(&["A", "B"]), &[])).unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions["A"], Position::new(5.0, 6.0));
        assert_eq!(positions["B"], Position::ORIGIN);
    }

    #[test]
    fn test_extra_and_repeated_positions_are_dropped() {
        let adapter = LayoutAdapter::new(
            Box::new(FixedBackend(vec![
                PositionedChild::new("A", 1.0, 1.0),
                PositionedChild::new("A", 9.0, 9.0),
                PositionedChild::new("Ghost", 2.0, 2.0),
            ])),
            LayoutOptions::default(),
        );
        let positions = block_on(adapter.layout(&nodes(&["A"]), &[])).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions["A"], Position::new(1.0, 1.0));
    }

    #[test]
    fn test_duplicate_node_specs_get_one_position() {
        let adapter = LayoutAdapter::from_config(&BuildConfig::default()).unwrap();
        let positions = block_on(adapter.layout(&nodes(&["A", "A", "B"]), &[])).unwrap();
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let adapter = LayoutAdapter::from_config(&BuildConfig::default()).unwrap();
        assert!(block_on(adapter.layout(&[], &[])).unwrap().is_empty());
    }

    #[test]
    fn test_request_uses_backend_algorithm() {
        let config = BuildConfig::default().with_backend(BackendKind::Levels);
        let adapter = LayoutAdapter::from_config(&config).unwrap();
        let request = adapter.request(&nodes(&["A"]), &[]);
        assert_eq!(request.option(ALGORITHM_KEY), Some("layered"));
        assert_eq!(adapter.backend().name(), "levels");
    }

    #[test]
    fn test_layered_lr_direction() {
        let config = BuildConfig::default().with_backend(BackendKind::LayeredLr);
        let adapter = LayoutAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.request(&[], &[]).option(DIRECTION_KEY), Some("RIGHT"));
    }

    #[test]
    fn test_command_backend_needs_program() {
        let config = BuildConfig::default().with_backend(BackendKind::Command);
        assert!(LayoutAdapter::from_config(&config).is_err());
    }

    #[test]
    fn test_available_backends() {
        let kinds = available_backends();
        assert!(kinds.contains(&BackendKind::Layered));
        assert!(kinds.contains(&BackendKind::Levels));
    }
}
