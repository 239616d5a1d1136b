//! Rename operator: relabel columns, keep types and tuples.

use std::collections::HashMap;

use tabrel_core::prelude::*;

pub struct Rename<R> {
    input: R,
    schema: Schema,
}

impl<R: Relation> Rename<R> {
    /// `mapping` is old name -> new name. All renames apply at once, so two
    /// columns may swap names.
    pub fn new<I, K, V>(input: R, mapping: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut renames: HashMap<usize, String> = HashMap::new();
        for (old, new) in mapping {
            let idx = input.schema().require(old.as_ref())?;
            renames.insert(idx, new.into());
        }

        let fields = input
            .schema()
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| match renames.remove(&i) {
                Some(name) => f.with_name(name),
                None => f.clone(),
            })
            .collect();
        let schema = Schema::new(fields)?;
        Ok(Self { input, schema })
    }
}

impl<R: Relation> Relation for Rename<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        self.input.next_tuple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabrel_core::tuple;

    fn pair() -> Table {
        let schema = Schema::new(vec![
            Field::utf8("Name"),
            Field::new("Age", DataType::Int64),
        ])
        .unwrap();
        Table::try_new(schema, vec![tuple!["Bart", 10]]).unwrap()
    }

    #[test]
    fn renames_keep_types_and_values() {
        let t = pair();
        let mut r = Rename::new(t.scan(), [("Name", "Child")]).unwrap();
        assert_eq!(r.schema().fields()[0], Field::utf8("Child"));
        assert_eq!(r.schema().fields()[1], Field::new("Age", DataType::Int64));
        assert_eq!(r.next_tuple().unwrap(), Some(tuple!["Bart", 10]));
    }

    #[test]
    fn simultaneous_swap() {
        let t = pair();
        let r = Rename::new(t.scan(), [("Name", "Age"), ("Age", "Name")]).unwrap();
        assert_eq!(r.schema().names().collect::<Vec<_>>(), ["Age", "Name"]);
        assert_eq!(r.schema().fields()[0].data_type, DataType::Utf8);
    }

    #[test]
    fn construction_errors() {
        let t = pair();
        assert!(matches!(
            Rename::new(t.scan(), [("Height", "H")]),
            Err(Error::UnknownColumn(_))
        ));
        assert!(matches!(
            Rename::new(t.scan(), [("Name", "Age")]),
            Err(Error::DuplicateColumn(_))
        ));
    }
}
