//! Streaming accumulators with O(1) state.
//!
//! `Null` inputs are skipped by every accumulator except `Count`, which tallies
//! tuples.

use std::cmp::Ordering;

use tabrel_core::prelude::*;

pub trait Accumulator {
    fn update(&mut self, value: &Scalar) -> Result<()>;

    /// Result for everything seen so far.
    fn finish(&self) -> Scalar;
}

fn numeric(column: &str, value: &Scalar) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::type_mismatch(column, DataType::Float64, value.type_name()))
}

#[derive(Debug, Default)]
pub struct Count {
    n: i64,
}

impl Accumulator for Count {
    fn update(&mut self, _value: &Scalar) -> Result<()> {
        self.n += 1;
        Ok(())
    }

    fn finish(&self) -> Scalar {
        Scalar::I64(self.n)
    }
}

/// Running minimum or maximum; the first value seeds it.
#[derive(Debug)]
pub struct Extreme {
    keep: Ordering,
    best: Option<Scalar>,
}

impl Extreme {
    pub fn min() -> Self {
        Self {
            keep: Ordering::Less,
            best: None,
        }
    }

    pub fn max() -> Self {
        Self {
            keep: Ordering::Greater,
            best: None,
        }
    }
}

impl Accumulator for Extreme {
    fn update(&mut self, value: &Scalar) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let replace = match &self.best {
            None => true,
            Some(best) => value.total_cmp(best) == self.keep,
        };
        if replace {
            self.best = Some(value.clone());
        }
        Ok(())
    }

    fn finish(&self) -> Scalar {
        self.best.clone().unwrap_or(Scalar::Null)
    }
}

/// Incremental mean: `mean += (x - mean) / n`.
#[derive(Debug)]
pub struct Mean {
    column: String,
    n: u64,
    mean: f64,
}

impl Mean {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            n: 0,
            mean: 0.0,
        }
    }
}

impl Accumulator for Mean {
    fn update(&mut self, value: &Scalar) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let x = numeric(&self.column, value)?;
        self.n += 1;
        self.mean += (x - self.mean) / self.n as f64;
        Ok(())
    }

    fn finish(&self) -> Scalar {
        if self.n == 0 {
            Scalar::F64(f64::NAN)
        } else {
            Scalar::F64(self.mean)
        }
    }
}

/// Sum in the column's own type. Integer sums are checked.
#[derive(Debug)]
pub enum Sum {
    Int { column: String, total: i64 },
    Real { column: String, total: f64 },
}

impl Sum {
    pub fn new(column: impl Into<String>, data_type: DataType) -> Self {
        let column = column.into();
        match data_type {
            DataType::Int64 => Sum::Int { column, total: 0 },
            _ => Sum::Real { column, total: 0.0 },
        }
    }
}

impl Accumulator for Sum {
    fn update(&mut self, value: &Scalar) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            Sum::Int { column, total } => {
                let x = value.as_i64().ok_or_else(|| {
                    Error::type_mismatch(column, DataType::Int64, value.type_name())
                })?;
                *total = total.checked_add(x).ok_or(Error::Overflow("sum"))?;
            }
            Sum::Real { column, total } => *total += numeric(column, value)?,
        }
        Ok(())
    }

    fn finish(&self) -> Scalar {
        match self {
            Sum::Int { total, .. } => Scalar::I64(*total),
            Sum::Real { total, .. } => Scalar::F64(*total),
        }
    }
}

/// Sample variance via Welford's online update.
#[derive(Debug)]
pub struct Variance {
    column: String,
    n: u64,
    mean: f64,
    m2: f64,
}

impl Variance {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            n: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }
}

impl Accumulator for Variance {
    fn update(&mut self, value: &Scalar) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let x = numeric(&self.column, value)?;
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
        Ok(())
    }

    fn finish(&self) -> Scalar {
        match self.n {
            0 => Scalar::F64(f64::NAN),
            1 => Scalar::F64(0.0),
            n => Scalar::F64(self.m2 / (n - 1) as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(acc: &mut dyn Accumulator, values: &[Scalar]) -> Scalar {
        for v in values {
            acc.update(v).unwrap();
        }
        acc.finish()
    }

    fn ints(xs: &[i64]) -> Vec<Scalar> {
        xs.iter().map(|&x| Scalar::I64(x)).collect()
    }

    #[test]
    fn mean_and_variance_of_three() {
        let xs = ints(&[10, 20, 30]);
        assert_eq!(feed(&mut Mean::new("x"), &xs), Scalar::F64(20.0));
        assert_eq!(feed(&mut Variance::new("x"), &xs), Scalar::F64(100.0));
    }

    #[test]
    fn variance_edge_counts() {
        assert_eq!(feed(&mut Variance::new("x"), &ints(&[7])), Scalar::F64(0.0));
        let empty = feed(&mut Variance::new("x"), &[]);
        assert!(empty.as_f64().unwrap().is_nan());
        let empty = feed(&mut Mean::new("x"), &[]);
        assert!(empty.as_f64().unwrap().is_nan());
    }

    #[test]
    fn extremes() {
        let xs = ints(&[3, -1, 8, 8]);
        assert_eq!(feed(&mut Extreme::min(), &xs), Scalar::I64(-1));
        assert_eq!(feed(&mut Extreme::max(), &xs), Scalar::I64(8));
        assert_eq!(feed(&mut Extreme::min(), &[]), Scalar::Null);
        let names = [Scalar::from("Lisa"), Scalar::from("Bart")];
        assert_eq!(feed(&mut Extreme::min(), &names), Scalar::from("Bart"));
    }

    #[test]
    fn sums_keep_the_column_type() {
        assert_eq!(
            feed(&mut Sum::new("x", DataType::Int64), &ints(&[1, 2, 3])),
            Scalar::I64(6)
        );
        assert_eq!(
            feed(&mut Sum::new("x", DataType::Float64), &[Scalar::F64(0.5), Scalar::F64(1.0)]),
            Scalar::F64(1.5)
        );
        assert_eq!(feed(&mut Sum::new("x", DataType::Int64), &[]), Scalar::I64(0));
    }

    #[test]
    fn integer_sum_overflow() {
        let mut sum = Sum::new("x", DataType::Int64);
        sum.update(&Scalar::I64(i64::MAX)).unwrap();
        assert!(matches!(sum.update(&Scalar::I64(1)), Err(Error::Overflow(_))));
    }

    #[test]
    fn count_tallies_everything() {
        let vals = [Scalar::Null, Scalar::from("a"), Scalar::I64(1)];
        assert_eq!(feed(&mut Count::default(), &vals), Scalar::I64(3));
    }

    #[test]
    fn numeric_accumulators_reject_text() {
        let mut mean = Mean::new("Name");
        assert!(matches!(
            mean.update(&Scalar::from("Bart")),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
