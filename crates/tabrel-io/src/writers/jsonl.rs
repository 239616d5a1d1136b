//! Streaming NDJSON writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabrel_core::prelude::{Relation, Scalar, Schema};

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
}

impl JsonlWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// One JSON object per tuple, keys in schema order.
    pub fn write_tuple(&mut self, schema: &Schema, tuple: &[Scalar]) -> Result<()> {
        let obj: serde_json::Map<String, serde_json::Value> = schema
            .names()
            .zip(tuple)
            .map(|(name, v)| (name.to_string(), scalar_to_json(v)))
            .collect();
        serde_json::to_writer(&mut self.writer, &obj)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_relation<R: Relation>(&mut self, mut relation: R) -> Result<usize> {
        let mut n = 0;
        while let Some(t) = relation.next_tuple()? {
            self.write_tuple(relation.schema(), &t)?;
            n += 1;
        }
        self.writer.flush()?;
        tracing::debug!(rows = n, "wrote jsonl relation");
        Ok(n)
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

fn scalar_to_json(v: &Scalar) -> serde_json::Value {
    match v {
        Scalar::Null => serde_json::Value::Null,
        Scalar::I64(i) => serde_json::Value::from(*i),
        // Non-finite reals have no JSON number form; from() maps them to null.
        Scalar::F64(f) => serde_json::Value::from(*f),
        Scalar::Str(s) => serde_json::Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabrel_core::prelude::{DataType, Field, Table};
    use tabrel_core::tuple;

    #[test]
    fn keys_follow_schema_order() {
        let schema = Schema::new(vec![
            Field::utf8("Name"),
            Field::new("Age", DataType::Int64),
            Field::new("Mean", DataType::Float64),
        ])
        .unwrap();
        let t = Table::try_new(
            schema,
            vec![tuple!["Bart", 10, 1.5], tuple!["Lisa", 8, f64::NAN]],
        )
        .unwrap();
        let mut w = JsonlWriter::to_writer(Vec::new());
        assert_eq!(w.write_relation(t.scan()).unwrap(), 2);
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "{\"Name\":\"Bart\",\"Age\":10,\"Mean\":1.5}\n{\"Name\":\"Lisa\",\"Age\":8,\"Mean\":null}\n"
        );
    }
}
