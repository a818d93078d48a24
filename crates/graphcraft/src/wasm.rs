//! WebAssembly bindings for Graphcraft
//!
//! Browser-facing entry points. Results cross the boundary as JSON strings;
//! failures become JavaScript errors carrying the message.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use wasm_bindgen_futures::js_sys::Promise;

use crate::core::{BackendKind, BuildConfig};
use crate::pipeline::Pipeline;
use crate::read_input;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{:#}", error))
}

fn config_for(backend: &str) -> Result<BuildConfig, JsValue> {
    let backend: BackendKind = backend.parse().map_err(to_js)?;
    Ok(BuildConfig::default().with_backend(backend))
}

/// Build a render graph from DSL text or a JSON structured form
///
/// # Arguments
/// * `input` - graph description, format is auto-detected
/// * `backend` - `layered`, `layered-lr` or `levels`
///
/// # Returns
/// * A promise resolving to `{"graph": {...}, "warnings": [...]}` as JSON
#[wasm_bindgen]
pub fn build_graph(input: String, backend: String) -> Promise {
    future_to_promise(async move {
        let config = config_for(&backend)?;
        let model = read_input(&input, None).map_err(to_js)?;
        let pipeline = Pipeline::new(config).map_err(to_js)?;
        let report = pipeline.build_report(&model).await.map_err(to_js)?;
        let json = serde_json::to_string(&report).map_err(to_js)?;
        Ok(JsValue::from_str(&json))
    })
}

/// Parse a graph description without laying it out
///
/// # Returns
/// * JSON string with `nodes`, `edges` and `warnings`
/// * Throws a JavaScript error if the input cannot be read
#[wasm_bindgen]
pub fn parse_graph(input: &str) -> Result<String, JsValue> {
    let database = crate::parse(input).map_err(to_js)?;
    let result = serde_json::json!({
        "nodes": database.node_specs(),
        "edges": database.edge_specs(),
        "warnings": database.warnings(),
    });
    serde_json::to_string(&result).map_err(to_js)
}

/// Names accepted by `build_graph`'s `backend` argument
#[wasm_bindgen]
pub fn available_backends() -> String {
    let names: Vec<String> = crate::layout::available_backends()
        .iter()
        .map(ToString::to_string)
        .collect();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}
