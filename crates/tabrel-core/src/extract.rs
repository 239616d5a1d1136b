//! Pull plain values out of a relation.

use crate::error::Result;
use crate::relation::Relation;
use crate::table::Table;
use crate::types::{Scalar, Tuple};

/// Drain `r` into a restartable in-memory table.
pub fn evaluate<R: Relation>(r: R) -> Result<Table> {
    Table::materialize(r)
}

/// First field of the first tuple, if any.
pub fn scalar<R: Relation>(mut r: R) -> Result<Option<Scalar>> {
    Ok(r.next_tuple()?.and_then(|t| t.into_iter().next()))
}

/// The first tuple, if any.
pub fn vector<R: Relation>(mut r: R) -> Result<Option<Tuple>> {
    r.next_tuple()
}

/// Every remaining tuple, in order.
pub fn tuples<R: Relation>(r: R) -> Result<Vec<Tuple>> {
    r.tuples().collect()
}
