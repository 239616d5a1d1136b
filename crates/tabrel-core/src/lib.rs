#![forbid(unsafe_code)]
//! tabrel-core: scalar/type model, schemas, the `Relation` tuple-source
//! contract, row views, and in-memory tables.
//!
//! Keep this crate free of I/O. Operators live in `tabrel-operators`;
//! delimited-text sources and sinks live in `tabrel-io`.

pub mod config;
pub mod error;
pub mod extract;
pub mod relation;
pub mod row;
pub mod schema;
pub mod table;
pub mod types;

pub mod prelude;

pub use error::{Error, Result};
