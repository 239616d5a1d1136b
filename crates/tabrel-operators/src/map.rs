//! Row-wise functional operators.
//!
//! `Map` builds a fresh tuple from caller functions; `Update` replaces some
//! columns of the existing tuple. Every value a function returns is checked
//! against the declared column type (integers widen into real columns).

use std::collections::HashSet;

use tabrel_core::prelude::*;

use crate::traits::RowFn;

pub struct Map<R> {
    input: R,
    schema: Schema,
    fns: Vec<RowFn>,
}

impl<R: Relation> Map<R> {
    /// One output column per `(field, fn)`, in the given order.
    pub fn new(input: R, outputs: Vec<(Field, RowFn)>) -> Result<Self> {
        let (fields, fns): (Vec<Field>, Vec<RowFn>) = outputs.into_iter().unzip();
        let schema = Schema::new(fields)?;
        Ok(Self { input, schema, fns })
    }
}

impl<R: Relation> Relation for Map<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        let Some(t) = self.input.next_tuple()? else {
            return Ok(None);
        };
        let row = RowView::new(self.input.schema(), &t);
        let mut out = Vec::with_capacity(self.fns.len());
        for (f, field) in self.fns.iter_mut().zip(self.schema.fields()) {
            out.push(field.data_type.coerce(&field.name, f(&row)?)?);
        }
        Ok(Some(out))
    }
}

pub struct Update<R> {
    input: R,
    updates: Vec<(usize, RowFn)>,
}

impl<R: Relation> Update<R> {
    pub fn new<S: AsRef<str>>(input: R, updates: Vec<(S, RowFn)>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(updates.len());
        for (name, f) in updates {
            let name = name.as_ref();
            let idx = input.schema().require(name)?;
            if !seen.insert(idx) {
                return Err(Error::DuplicateColumn(name.to_string()));
            }
            resolved.push((idx, f));
        }
        Ok(Self {
            input,
            updates: resolved,
        })
    }
}

impl<R: Relation> Relation for Update<R> {
    fn schema(&self) -> &Schema {
        self.input.schema()
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        let Some(t) = self.input.next_tuple()? else {
            return Ok(None);
        };
        let schema = self.input.schema();
        let row = RowView::new(schema, &t);

        // Every function sees the original row.
        let mut fresh = Vec::with_capacity(self.updates.len());
        for (idx, f) in self.updates.iter_mut() {
            let field = &schema.fields()[*idx];
            fresh.push((*idx, field.data_type.coerce(&field.name, f(&row)?)?));
        }

        let mut t = t;
        for (idx, value) in fresh {
            t[idx] = value;
        }
        Ok(Some(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::row_fn;
    use tabrel_core::tuple;

    fn kids() -> Table {
        let schema = Schema::new(vec![
            Field::utf8("Name"),
            Field::new("Age", DataType::Int64),
            Field::new("Salary", DataType::Float64),
        ])
        .unwrap();
        Table::try_new(
            schema,
            vec![tuple!["Bart", 10, 20000.0], tuple!["Lisa", 8, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn map_builds_declared_columns() {
        let t = kids();
        let map = Map::new(
            t.scan(),
            vec![
                (
                    Field::utf8("Greeting"),
                    row_fn(|r| Ok(format!("hi {}", r.str("Name")?).into())),
                ),
                (
                    Field::new("Months", DataType::Float64),
                    row_fn(|r| Ok(Scalar::I64(r.i64("Age")? * 12))),
                ),
            ],
        )
        .unwrap();
        let rows: Vec<Tuple> = map.tuples().collect::<Result<_>>().unwrap();
        assert_eq!(rows, vec![tuple!["hi Bart", 120.0], tuple!["hi Lisa", 96.0]]);
    }

    #[test]
    fn map_rejects_values_of_the_wrong_type() {
        let t = kids();
        let mut map = Map::new(
            t.scan(),
            vec![(
                Field::new("Age", DataType::Int64),
                row_fn(|r| Ok(r.get("Name")?.clone())),
            )],
        )
        .unwrap();
        assert!(matches!(map.next_tuple(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn update_sees_the_original_row() {
        let t = kids();
        let update = Update::new(
            t.scan(),
            vec![
                ("Age", row_fn(|r| Ok(Scalar::I64(r.i64("Age")? + 1)))),
                ("Salary", row_fn(|r| Ok(Scalar::F64(r.f64("Age")? * 1000.0)))),
            ],
        )
        .unwrap();
        let rows: Vec<Tuple> = update.tuples().collect::<Result<_>>().unwrap();
        assert_eq!(
            rows,
            vec![tuple!["Bart", 11, 10000.0], tuple!["Lisa", 9, 8000.0]]
        );
    }

    #[test]
    fn update_construction_errors() {
        let t = kids();
        let noop = || row_fn(|_| Ok(Scalar::Null));
        assert!(matches!(
            Update::new(t.scan(), vec![("Height", noop())]),
            Err(Error::UnknownColumn(_))
        ));
        assert!(matches!(
            Update::new(t.scan(), vec![("Age", noop()), ("Age", noop())]),
            Err(Error::DuplicateColumn(_))
        ));
    }
}
