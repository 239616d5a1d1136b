//! Scalar values and tuples.
//!
//! `Scalar` is the dynamic value stored in a tuple; its variant must agree with
//! the declared `DataType` of the column it sits in (or be `Null`).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    I64(i64),
    F64(f64),
    Str(String),
}

/// One row of a relation, positionally aligned with its schema.
pub type Tuple = Vec<Scalar>;

impl Scalar {
    /// Declared type this value belongs to; `None` for `Null`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.data_type().map(|t| t.annotation()).unwrap_or("null")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Apply `target`'s conversion rule: textual parse for numeric targets,
    /// canonical text for `Utf8`, truncation for real → integer.
    pub fn convert(&self, target: DataType) -> Result<Scalar> {
        let fail = || Error::TypeConversion {
            value: self.to_string(),
            target,
        };
        match (self, target) {
            (Scalar::Null, _) => Ok(Scalar::Null),
            (Scalar::Str(s), t) => t.parse_text(s),
            (v, DataType::Utf8) => Ok(Scalar::Str(v.to_string())),
            (Scalar::I64(v), DataType::Int64) => Ok(Scalar::I64(*v)),
            (Scalar::I64(v), DataType::Float64) => Ok(Scalar::F64(*v as f64)),
            (Scalar::F64(v), DataType::Float64) => Ok(Scalar::F64(*v)),
            (Scalar::F64(v), DataType::Int64) => {
                let t = v.trunc();
                // i64::MAX is not representable; 2^63 is the first value out of range.
                if !t.is_finite() || t < i64::MIN as f64 || t >= 9_223_372_036_854_775_808.0 {
                    return Err(fail());
                }
                Ok(Scalar::I64(t as i64))
            }
        }
    }

    /// Total order used for sorting: `Null` first, numbers compare with each
    /// other numerically (NaN last), text lexicographically, mixed kinds by
    /// variant rank.
    pub fn total_cmp(&self, other: &Scalar) -> Ordering {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (I64(a), I64(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (I64(_) | F64(_), I64(_) | F64(_)) => {
                let x = self.as_f64().unwrap_or(f64::NAN);
                let y = other.as_f64().unwrap_or(f64::NAN);
                float_cmp(x, y)
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

fn float_cmp(x: f64, y: f64) -> Ordering {
    if x.is_nan() && y.is_nan() {
        Ordering::Equal
    } else if x.is_nan() {
        Ordering::Greater
    } else if y.is_nan() {
        Ordering::Less
    } else {
        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    }
}

fn rank(s: &Scalar) -> u8 {
    match s {
        Scalar::Null => 0,
        Scalar::I64(_) | Scalar::F64(_) => 1,
        Scalar::Str(_) => 2,
    }
}

/// Lexicographic comparison of two tuples under `Scalar::total_cmp`.
pub fn compare_tuples(a: &[Scalar], b: &[Scalar]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

impl fmt::Display for Scalar {
    /// Canonical text form. Reals always carry a fractional part so a typed
    /// round trip keeps `20000.0` distinct from `20000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v:?}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl DataType {
    /// Parse one textual field into a value of this type.
    pub fn parse_text(&self, text: &str) -> Result<Scalar> {
        let fail = || Error::TypeConversion {
            value: text.to_string(),
            target: *self,
        };
        match self {
            DataType::Utf8 => Ok(Scalar::Str(text.to_string())),
            DataType::Int64 => text.trim().parse::<i64>().map(Scalar::I64).map_err(|_| fail()),
            DataType::Float64 => text.trim().parse::<f64>().map(Scalar::F64).map_err(|_| fail()),
        }
    }

    /// Check that `value` may be stored in a column of this type, widening
    /// integers into real columns.
    pub fn coerce(&self, column: &str, value: Scalar) -> Result<Scalar> {
        match (self, value) {
            (_, Scalar::Null) => Ok(Scalar::Null),
            (DataType::Float64, Scalar::I64(v)) => Ok(Scalar::F64(v as f64)),
            (t, v) if v.data_type() == Some(*t) => Ok(v),
            (t, v) => Err(Error::type_mismatch(column, *t, v.type_name())),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I64(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

/// Build a tuple from heterogeneous literals: `tuple!["Bart", 10, 20000.0]`.
#[macro_export]
macro_rules! tuple {
    ($($v:expr),* $(,)?) => {
        vec![$($crate::types::Scalar::from($v)),*]
    };
}
