//! Streaming aggregation: one pass, one output tuple.
//!
//! Output column `i` is named `<column>_<kind>` for the i-th `(column, kind)`
//! spec. Count is `int`, min/max/sum keep the source type, mean and variance
//! are `float`.

pub mod accumulators;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabrel_core::prelude::*;

use accumulators::{Accumulator, Count, Extreme, Mean, Sum, Variance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggKind {
    Count,
    Min,
    Max,
    Mean,
    Sum,
    Variance,
}

impl AggKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggKind::Count => "count",
            AggKind::Min => "min",
            AggKind::Max => "max",
            AggKind::Mean => "mean",
            AggKind::Sum => "sum",
            AggKind::Variance => "variance",
        }
    }

    /// Output type for a source column of type `source`.
    pub fn output_type(&self, source: DataType) -> DataType {
        match self {
            AggKind::Count => DataType::Int64,
            AggKind::Min | AggKind::Max | AggKind::Sum => source,
            AggKind::Mean | AggKind::Variance => DataType::Float64,
        }
    }

    fn accumulator(&self, source: &Field) -> Box<dyn Accumulator> {
        match self {
            AggKind::Count => Box::<Count>::default(),
            AggKind::Min => Box::new(Extreme::min()),
            AggKind::Max => Box::new(Extreme::max()),
            AggKind::Mean => Box::new(Mean::new(&source.name)),
            AggKind::Sum => Box::new(Sum::new(&source.name, source.data_type)),
            AggKind::Variance => Box::new(Variance::new(&source.name)),
        }
    }

    fn needs_numeric(&self) -> bool {
        matches!(self, AggKind::Mean | AggKind::Sum | AggKind::Variance)
    }
}

impl fmt::Display for AggKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(AggKind::Count),
            "min" => Ok(AggKind::Min),
            "max" => Ok(AggKind::Max),
            "mean" => Ok(AggKind::Mean),
            "sum" => Ok(AggKind::Sum),
            "variance" => Ok(AggKind::Variance),
            other => Err(Error::Config(format!("unknown aggregate '{other}'"))),
        }
    }
}

/// Drains its input on the first pull and emits exactly one tuple.
pub struct Aggregate<R> {
    input: R,
    schema: Schema,
    specs: Vec<(usize, AggKind)>,
    done: bool,
}

impl<R: Relation> Aggregate<R> {
    pub fn new<I, S>(input: R, specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, AggKind)>,
        S: AsRef<str>,
    {
        let mut resolved = Vec::new();
        let mut fields = Vec::new();
        for (column, kind) in specs {
            let column = column.as_ref();
            let idx = input.schema().require(column)?;
            let source = input.schema().fields()[idx].data_type;
            if kind.needs_numeric() && !source.is_numeric() {
                return Err(Error::type_mismatch(
                    column,
                    DataType::Float64,
                    source.annotation(),
                ));
            }
            fields.push(Field::new(format!("{column}_{kind}"), kind.output_type(source)));
            resolved.push((idx, kind));
        }
        let schema = Schema::new(fields)?;
        Ok(Self {
            input,
            schema,
            specs: resolved,
            done: false,
        })
    }
}

impl<R: Relation> Relation for Aggregate<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        let source = self.input.schema();
        let mut accs: Vec<Box<dyn Accumulator>> = self
            .specs
            .iter()
            .map(|&(idx, kind)| kind.accumulator(&source.fields()[idx]))
            .collect();

        let mut rows = 0usize;
        while let Some(t) = self.input.next_tuple()? {
            for (acc, &(idx, _)) in accs.iter_mut().zip(&self.specs) {
                acc.update(&t[idx])?;
            }
            rows += 1;
        }
        tracing::debug!(rows, aggregates = accs.len(), "aggregate drained input");

        Ok(Some(accs.iter().map(|a| a.finish()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
            vec![
                tuple!["Lisa", 8, 0.0],
                tuple!["Bart", 10, 20000.0],
                tuple!["Martin", 10, 40000.0],
                tuple!["Ralph", 8, 10000.0],
                tuple!["Milhouse", 9, 50000.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn names_and_types() {
        let t = kids();
        let agg = Aggregate::new(
            t.scan(),
            [
                ("Name", AggKind::Count),
                ("Age", AggKind::Max),
                ("Age", AggKind::Mean),
                ("Salary", AggKind::Sum),
            ],
        )
        .unwrap();
        assert_eq!(
            agg.schema().fields(),
            &[
                Field::new("Name_count", DataType::Int64),
                Field::new("Age_max", DataType::Int64),
                Field::new("Age_mean", DataType::Float64),
                Field::new("Salary_sum", DataType::Float64),
            ]
        );
    }

    #[test]
    fn one_tuple_then_none() {
        let t = kids();
        let mut agg = Aggregate::new(
            t.scan(),
            [
                ("Name", AggKind::Count),
                ("Name", AggKind::Min),
                ("Age", AggKind::Sum),
                ("Salary", AggKind::Mean),
            ],
        )
        .unwrap();
        assert_eq!(
            agg.next_tuple().unwrap(),
            Some(tuple![5, "Bart", 45, 24000.0])
        );
        assert_eq!(agg.next_tuple().unwrap(), None);
    }

    #[test]
    fn empty_input() {
        let t = Table::new(kids().schema().clone());
        let mut agg = Aggregate::new(
            t.scan(),
            [
                ("Age", AggKind::Count),
                ("Age", AggKind::Min),
                ("Age", AggKind::Sum),
                ("Salary", AggKind::Variance),
            ],
        )
        .unwrap();
        let row = agg.next_tuple().unwrap().unwrap();
        assert_eq!(row[0], Scalar::I64(0));
        assert!(row[1].is_null());
        assert_eq!(row[2], Scalar::I64(0));
        assert!(row[3].as_f64().unwrap().is_nan());
    }

    #[test]
    fn text_columns_reject_numeric_aggregates() {
        let t = kids();
        for kind in [AggKind::Sum, AggKind::Mean, AggKind::Variance] {
            assert!(matches!(
                Aggregate::new(t.scan(), [("Name", kind)]),
                Err(Error::TypeMismatch { .. })
            ));
        }
        assert!(matches!(
            Aggregate::new(t.scan(), [("Height", AggKind::Count)]),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("variance".parse::<AggKind>().unwrap(), AggKind::Variance);
        assert_eq!("MEAN".parse::<AggKind>().unwrap(), AggKind::Mean);
        assert_eq!(AggKind::Count.to_string(), "count");
        assert!("median".parse::<AggKind>().is_err());
    }

    #[test]
    fn input_is_untouched_until_first_pull() {
        let mut t = kids();
        let agg = Aggregate::new(&mut t, [("Age", AggKind::Count)]).unwrap();
        drop(agg);
        assert_eq!(tabrel_core::relation::count(&mut t).unwrap(), 5);
    }
}
