//! In-progress graph descriptions
//!
//! The input model holds what the user has typed so far in one of three
//! shapes. Structured shapes auto-grow so there is always one blank trailing
//! cell to fill; the DSL shape is a single text block replaced on every edit.

mod adjacency;
mod pairs;
mod slots;

pub use adjacency::*;
pub use pairs::*;
pub use slots::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::GraphError;

/// Free-text `Nodes:` / `Edges:` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DslInput {
    text: String,
}

impl DslInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole block
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// The supported input shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    Dsl,
    Adjacency,
    Pairs,
}

impl InputFormat {
    pub fn variants() -> &'static [&'static str] {
        &["dsl", "adjacency", "pairs"]
    }
}

impl FromStr for InputFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dsl" | "text" => Ok(Self::Dsl),
            "adjacency" | "adj" => Ok(Self::Adjacency),
            "pairs" | "pair" => Ok(Self::Pairs),
            other => Err(GraphError::UnknownInputFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dsl => "dsl",
            Self::Adjacency => "adjacency",
            Self::Pairs => "pairs",
        };
        f.write_str(name)
    }
}

/// A graph description in any supported shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputModel {
    Adjacency(AdjacencyForm),
    Pairs(PairForm),
    Dsl(DslInput),
}

impl InputModel {
    /// Wrap DSL text
    pub fn dsl(text: impl Into<String>) -> Self {
        Self::Dsl(DslInput::new(text))
    }

    /// Decode raw text as the given shape
    ///
    /// Structured shapes are JSON documents; DSL text is taken as-is.
    pub fn from_text(text: &str, format: InputFormat) -> Result<Self, GraphError> {
        Ok(match format {
            InputFormat::Dsl => Self::dsl(text),
            InputFormat::Adjacency => Self::Adjacency(serde_json::from_str(text)?),
            InputFormat::Pairs => Self::Pairs(serde_json::from_str(text)?),
        })
    }

    pub fn format(&self) -> InputFormat {
        match self {
            Self::Adjacency(_) => InputFormat::Adjacency,
            Self::Pairs(_) => InputFormat::Pairs,
            Self::Dsl(_) => InputFormat::Dsl,
        }
    }
}

impl Default for InputModel {
    fn default() -> Self {
        Self::Dsl(DslInput::default())
    }
}

impl From<AdjacencyForm> for InputModel {
    fn from(form: AdjacencyForm) -> Self {
        Self::Adjacency(form)
    }
}

impl From<PairForm> for InputModel {
    fn from(form: PairForm) -> Self {
        Self::Pairs(form)
    }
}

impl From<DslInput> for InputModel {
    fn from(input: DslInput) -> Self {
        Self::Dsl(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_from_str() {
        assert_eq!("DSL".parse::<InputFormat>().unwrap(), InputFormat::Dsl);
        assert_eq!("pairs".parse::<InputFormat>().unwrap(), InputFormat::Pairs);
        assert!(matches!(
            "yaml".parse::<InputFormat>(),
            Err(GraphError::UnknownInputFormat { .. })
        ));
    }

    #[test]
    fn test_from_text() {
        let model = InputModel::from_text(r#"{"nodes": ["A"], "targets": [[]]}"#, InputFormat::Adjacency).unwrap();
        assert_eq!(model.format(), InputFormat::Adjacency);

        let model = InputModel::from_text("Nodes: A", InputFormat::Dsl).unwrap();
        assert_eq!(model, InputModel::dsl("Nodes: A"));
    }

    #[test]
    fn test_from_text_bad_json() {
        let err = InputModel::from_text("Nodes: A", InputFormat::Pairs).unwrap_err();
        assert!(matches!(err, GraphError::JsonError { .. }));
    }

    #[test]
    fn test_dsl_text_is_replaced() {
        let mut input = DslInput::new("Nodes: A");
        input.set_text("Nodes: B");
        assert_eq!(input.text(), "Nodes: B");
    }
}
