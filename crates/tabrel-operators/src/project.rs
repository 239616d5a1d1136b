//! Projection: keep a chosen, ordered subset of columns.

use tabrel_core::prelude::*;

use crate::traits::{pick, resolve};

pub struct Projection<R> {
    input: R,
    schema: Schema,
    indices: Vec<usize>,
}

impl<R: Relation> Projection<R> {
    /// Keep `names`, in the given order.
    pub fn new<I, S>(input: R, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let indices = resolve(input.schema(), names)?;
        Self::from_indices(input, indices)
    }

    /// Keep every column not named in `drop`, in schema order.
    pub fn complement<I, S>(input: R, drop: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dropped = resolve(input.schema(), drop)?;
        let indices = (0..input.schema().len())
            .filter(|i| !dropped.contains(i))
            .collect();
        Self::from_indices(input, indices)
    }

    fn from_indices(input: R, indices: Vec<usize>) -> Result<Self> {
        let fields = indices
            .iter()
            .filter_map(|&i| input.schema().field(i).cloned())
            .collect();
        let schema = Schema::new(fields)?;
        Ok(Self {
            input,
            schema,
            indices,
        })
    }
}

impl<R: Relation> Relation for Projection<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        Ok(self.input.next_tuple()?.map(|t| pick(&t, &self.indices)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabrel_core::relation::count;
    use tabrel_core::tuple;

    fn people() -> Table {
        let schema = Schema::new(vec![
            Field::utf8("Name"),
            Field::new("Age", DataType::Int64),
            Field::utf8("Sex"),
        ])
        .unwrap();
        Table::try_new(
            schema,
            vec![tuple!["Lisa", 8, "F"], tuple!["Bart", 10, "M"]],
        )
        .unwrap()
    }

    #[test]
    fn reorders_and_subsets() {
        let t = people();
        let mut p = Projection::new(t.scan(), ["Sex", "Name"]).unwrap();
        assert_eq!(p.schema().names().collect::<Vec<_>>(), ["Sex", "Name"]);
        assert_eq!(p.next_tuple().unwrap(), Some(tuple!["F", "Lisa"]));
        assert_eq!(p.next_tuple().unwrap(), Some(tuple!["M", "Bart"]));
        assert_eq!(p.next_tuple().unwrap(), None);
    }

    #[test]
    fn complement_keeps_the_rest() {
        let t = people();
        let p = Projection::complement(t.scan(), ["Age"]).unwrap();
        assert_eq!(p.schema().names().collect::<Vec<_>>(), ["Name", "Sex"]);
        assert!(matches!(
            Projection::complement(t.scan(), ["Height"]),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn construction_errors() {
        let t = people();
        assert!(matches!(
            Projection::new(t.scan(), ["Height"]),
            Err(Error::UnknownColumn(_))
        ));
        assert!(matches!(
            Projection::new(t.scan(), ["Name", "Name"]),
            Err(Error::DuplicateColumn(_))
        ));
    }

    #[test]
    fn empty_projection_keeps_cardinality() {
        let t = people();
        let mut p = Projection::new(t.scan(), Vec::<String>::new()).unwrap();
        assert!(p.schema().is_empty());
        assert_eq!(p.next_tuple().unwrap(), Some(vec![]));
        assert_eq!(count(p).unwrap(), 1);
    }
}
