//! Core abstractions for graph building
//!
//! This module defines the traits every input shape plugs into and the
//! types shared across the pipeline.

mod config;
mod database;
mod detector;
mod error;
pub mod logging;
mod parser;
mod types;

pub use config::*;
pub use database::*;
pub use detector::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use types::*;
