//! Core parser trait for graph descriptions
//!
//! A parser turns one input shape (DSL text, adjacency rows, pair rows) into
//! node and edge specs stored in a database.

use anyhow::Result;

use super::Database;

/// Core trait for graph parsers
///
/// # Example
/// ```
/// use graphcraft::core::{Database, Parser};
/// use graphcraft::graph::GraphDatabase;
/// use graphcraft::parsers::DslParser;
///
/// let parser = DslParser::new();
/// let mut db = GraphDatabase::new();
/// parser.parse("Nodes: A, B\nEdges: A-B", &mut db).unwrap();
/// assert_eq!(db.node_count(), 2);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// The input shape this parser understands
    type Input: ?Sized;

    /// Parse the input into the provided database
    ///
    /// Malformed fragments are skipped rather than reported as errors.
    fn parse(&self, input: &Self::Input, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check whether the input contains anything this parser would use
    fn can_parse(&self, input: &Self::Input) -> bool;
}
