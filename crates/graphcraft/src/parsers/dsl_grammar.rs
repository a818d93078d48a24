//! Line grammar for the `Nodes:` / `Edges:` text format, using chumsky
//!
//! Every line parses: lines without a recognised prefix become
//! [`DslLine::Other`], and edge fragments that are not a `source-target`
//! pair become [`EdgeItem::Malformed`] so the caller can report them.

use chumsky::prelude::*;

use crate::core::GraphError;

/// One trimmed line of DSL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslLine {
    /// `Nodes:` followed by identifiers, already trimmed, empties dropped
    Nodes(Vec<String>),
    /// `Edges:` followed by one item per comma-separated fragment
    Edges(Vec<EdgeItem>),
    Other,
}

/// One comma-separated fragment of an `Edges:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeItem {
    Pair { source: String, target: String },
    /// Blank fragment, e.g. from a trailing comma
    Blank,
    /// No hyphen, or an empty side
    Malformed(String),
}

impl EdgeItem {
    fn from_parts(source: String, target: Option<String>) -> Self {
        let Some(target) = target else {
            return if source.trim().is_empty() {
                Self::Blank
            } else {
                Self::Malformed(source.trim().to_string())
            };
        };

        let (s, t) = (source.trim(), target.trim());
        if s.is_empty() || t.is_empty() {
            Self::Malformed(format!("{}-{}", s, t))
        } else {
            Self::Pair {
                source: s.to_string(),
                target: t.to_string(),
            }
        }
    }
}

/// Parse one line, trimming it first
pub fn parse_line(line: &str) -> Result<DslLine, GraphError> {
    line_parser()
        .parse(line.trim())
        .into_result()
        .map_err(|errors| GraphError::parse_error(format!("{:?}", errors), 0))
}

fn line_parser<'src>() -> impl Parser<'src, &'src str, DslLine> + Clone {
    nodes_line()
        .or(edges_line())
        .or(any().repeated().to(DslLine::Other))
        .then_ignore(end())
}

/// `Nodes: A, B, C`
fn nodes_line<'src>() -> impl Parser<'src, &'src str, DslLine> + Clone {
    just("Nodes:")
        .ignore_then(fragment().separated_by(just(',')).collect::<Vec<String>>())
        .map(|items| {
            DslLine::Nodes(
                items
                    .iter()
                    .map(|item| item.trim())
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        })
}

/// `Edges: A-B, B-C`
fn edges_line<'src>() -> impl Parser<'src, &'src str, DslLine> + Clone {
    just("Edges:")
        .ignore_then(edge_item().separated_by(just(',')).collect::<Vec<EdgeItem>>())
        .map(DslLine::Edges)
}

/// Split at the first hyphen; everything after it belongs to the target
fn edge_item<'src>() -> impl Parser<'src, &'src str, EdgeItem> + Clone {
    none_of(",-")
        .repeated()
        .collect::<String>()
        .then(just('-').ignore_then(fragment()).or_not())
        .map(|(source, target)| EdgeItem::from_parts(source, target))
}

fn fragment<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    none_of(",").repeated().collect::<String>()
}
