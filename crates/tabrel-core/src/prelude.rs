//! Convenient re-exports for downstream crates.

pub use crate::config::IoConfig;
pub use crate::error::{Error, Result};
pub use crate::relation::{Pass, Relation, Tuples};
pub use crate::row::RowView;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::table::{Table, TableScan};
pub use crate::types::{Scalar, Tuple};
