//! Horizontal and vertical concatenation.

use tabrel_core::prelude::*;

/// Side-by-side concatenation. Pulls one tuple from every input per step.
pub struct HCat<R> {
    inputs: Vec<R>,
    schema: Schema,
    done: bool,
}

impl<R: Relation> HCat<R> {
    pub fn new(inputs: Vec<R>) -> Result<Self> {
        if inputs.is_empty() {
            return Err(Error::SchemaMismatch("hcat needs at least one input".into()));
        }
        let fields = inputs
            .iter()
            .flat_map(|r| r.schema().fields().iter().cloned())
            .collect();
        let schema = Schema::new(fields)?;
        Ok(Self {
            inputs,
            schema,
            done: false,
        })
    }
}

impl<R: Relation> Relation for HCat<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        let mut out = Vec::with_capacity(self.schema.len());
        let mut exhausted = 0;
        for input in &mut self.inputs {
            match input.next_tuple()? {
                Some(t) => out.extend(t),
                None => exhausted += 1,
            }
        }
        if exhausted == 0 {
            return Ok(Some(out));
        }
        self.done = true;
        if exhausted == self.inputs.len() {
            Ok(None)
        } else {
            Err(Error::RowCountMismatch(format!(
                "hcat: {exhausted} of {} inputs ran out early",
                self.inputs.len()
            )))
        }
    }
}

/// End-to-end concatenation of inputs sharing one column set. Tuples of later
/// inputs are reordered into the first input's column order.
pub struct VCat<R> {
    inputs: Vec<R>,
    schema: Schema,
    // Per input: positions to read, in output order; `None` when already aligned.
    layouts: Vec<Option<Vec<usize>>>,
    current: usize,
}

impl<R: Relation> VCat<R> {
    pub fn new(inputs: Vec<R>) -> Result<Self> {
        let Some(first) = inputs.first() else {
            return Err(Error::SchemaMismatch("vcat needs at least one input".into()));
        };
        let schema = first.schema().clone();

        let mut layouts = Vec::with_capacity(inputs.len());
        for (n, input) in inputs.iter().enumerate() {
            let other = input.schema();
            if !schema.same_column_set(other) {
                return Err(Error::SchemaMismatch(format!(
                    "vcat input {n} has columns [{}], expected [{}]",
                    other.names().collect::<Vec<_>>().join(", "),
                    schema.names().collect::<Vec<_>>().join(", ")
                )));
            }
            let positions = schema
                .names()
                .map(|name| other.require(name))
                .collect::<Result<Vec<_>>>()?;
            let aligned = positions.iter().enumerate().all(|(i, &p)| i == p);
            layouts.push(if aligned { None } else { Some(positions) });
        }

        Ok(Self {
            inputs,
            schema,
            layouts,
            current: 0,
        })
    }
}

impl<R: Relation> Relation for VCat<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        while let Some(input) = self.inputs.get_mut(self.current) {
            if let Some(t) = input.next_tuple()? {
                let t = match &self.layouts[self.current] {
                    Some(positions) => crate::traits::pick(&t, positions),
                    None => t,
                };
                return Ok(Some(t));
            }
            self.current += 1;
        }
        Ok(None)
    }
}
