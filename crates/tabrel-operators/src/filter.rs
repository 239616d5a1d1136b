//! Selection with caller predicates, plus a parsed comparison predicate.
//!
//! `Comparison` supports expressions of the form: "col OP literal" where
//! OP ∈ {==, !=, <, <=, >, >=}. The literal is converted to the column's type
//! once, when the comparison is bound to a schema.

use std::cmp::Ordering;
use std::fmt;

use tabrel_core::prelude::*;

/// Emits the input tuples for which `predicate` holds, in input order.
pub struct Selection<R, P> {
    input: R,
    predicate: P,
}

impl<R, P> Selection<R, P>
where
    R: Relation,
    P: FnMut(&RowView<'_>) -> Result<bool>,
{
    pub fn new(input: R, predicate: P) -> Self {
        Self { input, predicate }
    }
}

impl<R, P> Relation for Selection<R, P>
where
    R: Relation,
    P: FnMut(&RowView<'_>) -> Result<bool>,
{
    fn schema(&self) -> &Schema {
        self.input.schema()
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        while let Some(t) = self.input.next_tuple()? {
            let keep = (self.predicate)(&RowView::new(self.input.schema(), &t))?;
            if keep {
                return Ok(Some(t));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    // Two-character operators first so "<=" is not read as "<".
    const TOKENS: [(&'static str, CmpOp); 6] = [
        ("==", CmpOp::Eq),
        ("!=", CmpOp::Ne),
        ("<=", CmpOp::Le),
        (">=", CmpOp::Ge),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    fn holds(&self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

/// `column OP literal`, bound to a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    column: String,
    index: usize,
    op: CmpOp,
    literal: Scalar,
}

impl Comparison {
    /// Parse a predicate like "Age > 8" or "Name == Lisa" against `schema`.
    pub fn parse(expr: &str, schema: &Schema) -> Result<Self> {
        let (column, op, literal) = split_predicate(expr)?;
        let index = schema.require(column)?;
        let field = &schema.fields()[index];
        let literal = field.data_type.parse_text(unquote(literal))?;
        Ok(Self {
            column: column.to_string(),
            index,
            op,
            literal,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn op(&self) -> CmpOp {
        self.op
    }

    pub fn literal(&self) -> &Scalar {
        &self.literal
    }

    /// Null fields and NaN never satisfy an ordering test; `!=` is their only
    /// true comparison.
    pub fn eval(&self, row: &RowView<'_>) -> Result<bool> {
        let value = row.at(self.index).ok_or(Error::RowLength {
            expected: self.index + 1,
            found: row.len(),
        })?;
        Ok(match partial_cmp(value, &self.literal) {
            Some(ord) => self.op.holds(ord),
            None => self.op == CmpOp::Ne,
        })
    }

    /// Predicate closure suitable for `Selection::new`.
    pub fn into_predicate(self) -> impl FnMut(&RowView<'_>) -> Result<bool> {
        move |row: &RowView<'_>| self.eval(row)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op.symbol(), self.literal)
    }
}

fn partial_cmp(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::I64(x), Scalar::I64(y)) => Some(x.cmp(y)),
        (Scalar::Str(x), Scalar::Str(y)) => Some(x.cmp(y)),
        (x, y) => x.as_f64()?.partial_cmp(&y.as_f64()?),
    }
}

/// Split "col op literal" at the leftmost operator token.
fn split_predicate(expr: &str) -> Result<(&str, CmpOp, &str)> {
    let found = CmpOp::TOKENS
        .iter()
        .filter_map(|&(tok, op)| expr.find(tok).map(|pos| (pos, tok, op)))
        .min_by_key(|&(pos, tok, _)| (pos, std::cmp::Reverse(tok.len())));

    let Some((pos, tok, op)) = found else {
        return Err(Error::Predicate(format!("unparseable predicate: {expr}")));
    };
    let column = expr[..pos].trim();
    let literal = expr[pos + tok.len()..].trim();
    if column.is_empty() {
        return Err(Error::Predicate(format!("missing column in '{expr}'")));
    }
    Ok((column, op, literal))
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
