//! Core detector trait for input format identification
//!
//! Raw text reaching the CLI or the WASM boundary may be DSL text or a
//! JSON-encoded structured form. Detectors score the text so the caller can
//! pick the matching parser.

/// Core trait for input format detectors
///
/// # Example
/// ```
/// use graphcraft::core::Detector;
/// use graphcraft::parsers::DslDetector;
///
/// let detector = DslDetector::new();
/// assert!(detector.detect("Nodes: A, B"));
/// ```
pub trait Detector: Send + Sync {
    /// Detect if the input matches this format
    fn detect(&self, input: &str) -> bool;

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// Get the format name
    fn format_name(&self) -> &'static str;

    /// Get key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}
