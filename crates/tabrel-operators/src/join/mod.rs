//! Natural join on shared column names.

pub mod hash;

pub use hash::{BuildIndex, HashJoin};
