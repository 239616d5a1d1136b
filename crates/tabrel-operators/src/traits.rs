//! Closure shapes callers hand to the functional operators, plus small
//! helpers the operators share.

use tabrel_core::prelude::*;

/// Computes one output value from a row view.
pub type RowFn = Box<dyn FnMut(&RowView<'_>) -> Result<Scalar>>;

/// Combines an accumulator with the next row view.
pub type FoldFn = Box<dyn FnMut(&Scalar, &RowView<'_>) -> Result<Scalar>>;

/// Box a row function, fixing its signature for closure inference.
pub fn row_fn<F>(f: F) -> RowFn
where
    F: FnMut(&RowView<'_>) -> Result<Scalar> + 'static,
{
    Box::new(f)
}

pub fn fold_fn<F>(f: F) -> FoldFn
where
    F: FnMut(&Scalar, &RowView<'_>) -> Result<Scalar> + 'static,
{
    Box::new(f)
}

/// Resolve every name against `schema`, in order.
pub(crate) fn resolve<I, S>(schema: &Schema, names: I) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| schema.require(n.as_ref()))
        .collect()
}

/// Copy the values at `indices` out of `tuple`.
pub(crate) fn pick(tuple: &[Scalar], indices: &[usize]) -> Tuple {
    indices.iter().map(|&i| tuple[i].clone()).collect()
}
