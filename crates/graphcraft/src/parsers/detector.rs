//! Input format detectors
//!
//! Raw text is either DSL or a JSON-encoded form. JSON forms are told apart
//! by their keys: `targets` for adjacency rows, `edges` for pair rows.

use serde_json::Value;
use tracing::{debug, info, span, trace, Level};

use crate::core::Detector;
use crate::input::InputFormat;

/// Detects the `Nodes:` / `Edges:` text format
#[derive(Debug, Clone, Copy, Default)]
pub struct DslDetector;

impl DslDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for DslDetector {
    fn detect(&self, input: &str) -> bool {
        let input = input.trim();
        trace!(input_len = input.len(), "DslDetector::detect called");

        if input.is_empty() {
            return false;
        }
        input
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with("Nodes:") || line.starts_with("Edges:"))
    }

    fn confidence(&self, input: &str) -> f64 {
        let mut score: f64 = 0.0;
        for line in input.lines().map(str::trim) {
            if line.starts_with("Nodes:") {
                score += 0.5;
            } else if line.starts_with("Edges:") {
                score += 0.4;
            }
        }
        score.min(1.0)
    }

    fn format_name(&self) -> &'static str {
        "dsl"
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["Nodes:", "Edges:"]
    }
}

fn json_object(input: &str) -> Option<serde_json::Map<String, Value>> {
    let input = input.trim();
    if !input.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Detects a JSON-encoded structured form of one shape
#[derive(Debug, Clone, Copy)]
pub struct StructuredDetector {
    format: InputFormat,
}

impl StructuredDetector {
    pub fn adjacency() -> Self {
        Self {
            format: InputFormat::Adjacency,
        }
    }

    pub fn pairs() -> Self {
        Self {
            format: InputFormat::Pairs,
        }
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    fn key(&self) -> &'static str {
        match self.format {
            InputFormat::Pairs => "edges",
            _ => "targets",
        }
    }
}

impl Detector for StructuredDetector {
    fn detect(&self, input: &str) -> bool {
        self.confidence(input) >= 0.5
    }

    fn confidence(&self, input: &str) -> f64 {
        let Some(object) = json_object(input) else {
            return 0.0;
        };
        let has_nodes = object.get("nodes").is_some_and(Value::is_array);
        let has_key = object.get(self.key()).is_some_and(Value::is_array);
        match (has_key, has_nodes) {
            (true, _) => 0.9,
            // Bare node lists read the same either way
            (false, true) if self.format == InputFormat::Adjacency => 0.5,
            (false, true) => 0.4,
            (false, false) => 0.1,
        }
    }

    fn format_name(&self) -> &'static str {
        match self.format {
            InputFormat::Pairs => "pairs",
            _ => "adjacency",
        }
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["{", "\"nodes\"", if self.format == InputFormat::Pairs { "\"edges\"" } else { "\"targets\"" }]
    }
}

/// Pick the input format for raw text, defaulting to DSL
pub fn detect_format(input: &str) -> InputFormat {
    let detect_span = span!(Level::INFO, "detect_format", input_len = input.len());
    let _enter = detect_span.enter();

    let structured = [StructuredDetector::adjacency(), StructuredDetector::pairs()];
    let best = structured
        .iter()
        .map(|detector| (detector, detector.confidence(input)))
        .inspect(|(detector, confidence)| {
            trace!(detector = detector.format_name(), confidence, "Checking detector")
        })
        .filter(|(detector, _)| detector.detect(input))
        .max_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((detector, confidence)) = best {
        info!(format = detector.format_name(), confidence, "Detected structured input");
        return detector.format();
    }

    if !DslDetector::new().detect(input) {
        debug!("No Nodes:/Edges: lines found, reading as DSL anyway");
    }
    InputFormat::Dsl
}
