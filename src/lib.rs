#![forbid(unsafe_code)]
//! tabrel: lazy relational algebra over typed delimited tables.
//!
//! This crate re-exports the workspace so applications can depend on one
//! package: the core data model at the root, plus [`operators`], [`io`]
//! (CSV and JSON-lines sources and sinks) and [`planner`] (YAML pipelines).

pub use tabrel_core::{config, error, extract, relation, row, schema, table, types};
pub use tabrel_io as io;
pub use tabrel_operators as operators;
pub use tabrel_planner as planner;

pub use tabrel_core::prelude::*;
pub use tabrel_core::tuple;
