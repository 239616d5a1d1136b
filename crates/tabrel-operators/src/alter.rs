//! AlterType: convert named columns to a new type, tuple by tuple.

use tabrel_core::prelude::*;

pub struct AlterType<R> {
    input: R,
    schema: Schema,
    targets: Vec<(usize, DataType)>,
}

impl<R: Relation> AlterType<R> {
    pub fn new<I, K>(input: R, mapping: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, DataType)>,
        K: AsRef<str>,
    {
        let mut fields = input.schema().fields().to_vec();
        let mut targets = Vec::new();
        for (name, data_type) in mapping {
            let idx = input.schema().require(name.as_ref())?;
            fields[idx] = fields[idx].with_type(data_type);
            targets.push((idx, data_type));
        }
        let schema = Schema::new(fields)?;
        Ok(Self {
            input,
            schema,
            targets,
        })
    }
}

impl<R: Relation> Relation for AlterType<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        let Some(mut t) = self.input.next_tuple()? else {
            return Ok(None);
        };
        for &(idx, data_type) in &self.targets {
            t[idx] = t[idx].convert(data_type)?;
        }
        Ok(Some(t))
    }
}
