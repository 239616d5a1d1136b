//! Assign: overwrite columns of a base relation with the columns of another,
//! pulled in lock step.

use tabrel_core::prelude::*;

pub struct Assign<B, C> {
    base: B,
    changes: C,
    // Base position of each changes column.
    targets: Vec<usize>,
    done: bool,
}

impl<B: Relation, C: Relation> Assign<B, C> {
    pub fn new(base: B, changes: C) -> Result<Self> {
        let mut targets = Vec::with_capacity(changes.schema().len());
        for f in changes.schema().fields() {
            let idx = base.schema().require(&f.name)?;
            let expected = base.schema().fields()[idx].data_type;
            if expected != f.data_type {
                return Err(Error::type_mismatch(
                    &f.name,
                    expected,
                    f.data_type.annotation(),
                ));
            }
            targets.push(idx);
        }
        Ok(Self {
            base,
            changes,
            targets,
            done: false,
        })
    }
}

impl<B: Relation, C: Relation> Relation for Assign<B, C> {
    fn schema(&self) -> &Schema {
        self.base.schema()
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        match (self.base.next_tuple()?, self.changes.next_tuple()?) {
            (Some(mut row), Some(update)) => {
                for (&idx, value) in self.targets.iter().zip(update) {
                    row[idx] = value;
                }
                Ok(Some(row))
            }
            (None, None) => {
                self.done = true;
                Ok(None)
            }
            (base, _) => {
                self.done = true;
                let longer = if base.is_some() { "base" } else { "changes" };
                Err(Error::RowCountMismatch(format!(
                    "assign: {longer} has more tuples than the other input"
                )))
            }
        }
    }
}
