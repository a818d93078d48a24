//! Parsed graph storage and validation
//!
//! [`GraphDatabase`] is the canonical node/edge model every parser writes
//! into; [`Validator`] applies the duplicate and dangling-edge policies.

mod database;
mod validate;

pub use database::*;
pub use validate::*;
