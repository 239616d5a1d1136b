#![forbid(unsafe_code)]
//! tabrel-operators: lazy relational operators over `tabrel_core::Relation`.
//!
//! Design intent:
//! - Every operator is itself a `Relation`; composing operators builds a pull
//!   pipeline and nothing runs until the consumer asks for a tuple.
//! - Schema-shape problems are reported by constructors, per-tuple problems by
//!   the pull that reaches the offending tuple.
//! - Only the hash join build side and `Fold` drain an input at construction;
//!   `Aggregate` and `Sort` drain on their first pull.

pub mod traits;

pub mod filter;
pub mod project;
pub mod rename;

pub mod join;

pub mod alter;
pub mod assign;
pub mod concat;

pub mod fold;
pub mod map;

pub mod aggregate;
pub mod sort;

pub use aggregate::{AggKind, Aggregate};
pub use alter::AlterType;
pub use assign::Assign;
pub use concat::{HCat, VCat};
pub use filter::{CmpOp, Comparison, Selection};
pub use fold::Fold;
pub use join::{BuildIndex, HashJoin};
pub use map::{Map, Update};
pub use project::Projection;
pub use rename::Rename;
pub use sort::{sorted, Sort, SortSpec};
pub use traits::{fold_fn, row_fn, FoldFn, RowFn};
