//! Fold: reduce a whole relation to one tuple of accumulators.

use tabrel_core::prelude::*;

use crate::traits::FoldFn;

/// Drains its input at construction, sharing one pass among all folds, and
/// yields a single tuple once.
pub struct Fold {
    schema: Schema,
    result: Option<Tuple>,
}

impl Fold {
    /// `folds` holds `(output field, step fn, initial value)` triples.
    pub fn new<R: Relation>(mut input: R, folds: Vec<(Field, FoldFn, Scalar)>) -> Result<Self> {
        let mut fields = Vec::with_capacity(folds.len());
        let mut steps = Vec::with_capacity(folds.len());
        let mut acc = Vec::with_capacity(folds.len());
        for (field, step, initial) in folds {
            acc.push(field.data_type.coerce(&field.name, initial)?);
            fields.push(field);
            steps.push(step);
        }
        let schema = Schema::new(fields)?;

        let mut rows = 0usize;
        while let Some(t) = input.next_tuple()? {
            let row = RowView::new(input.schema(), &t);
            for ((value, step), field) in acc.iter_mut().zip(&mut steps).zip(schema.fields()) {
                *value = field.data_type.coerce(&field.name, step(value, &row)?)?;
            }
            rows += 1;
        }
        tracing::debug!(rows, folds = schema.len(), "fold drained input");

        Ok(Self {
            schema,
            result: Some(acc),
        })
    }
}

impl Relation for Fold {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        Ok(self.result.take())
    }
}
