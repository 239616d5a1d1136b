//! Natural hash join.
//!
//! The join key is every column name the two inputs share. Construction drains
//! the build (right) side into a `BuildIndex`; pulls then walk the probe
//! (left) side lazily. Output schema is the probe columns followed by the
//! build columns that are not part of the key, in build order. With no shared
//! columns every probe tuple matches every build tuple.

use std::collections::HashMap;

use tabrel_core::prelude::*;

use crate::traits::pick;

/// Hashable image of the key fields of one tuple. Reals hash by bit pattern
/// with `-0.0` folded into `0.0` and every NaN folded into one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Null,
    Int(i64),
    Real(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JoinKey(Vec<KeyPart>);

impl JoinKey {
    fn of(tuple: &[Scalar], indices: &[usize]) -> Self {
        JoinKey(
            indices
                .iter()
                .map(|&i| match &tuple[i] {
                    Scalar::Null => KeyPart::Null,
                    Scalar::I64(v) => KeyPart::Int(*v),
                    Scalar::F64(v) if v.is_nan() => KeyPart::Real(f64::NAN.to_bits()),
                    Scalar::F64(v) if *v == 0.0 => KeyPart::Real(0f64.to_bits()),
                    Scalar::F64(v) => KeyPart::Real(v.to_bits()),
                    Scalar::Str(s) => KeyPart::Text(s.clone()),
                })
                .collect(),
        )
    }
}

/// The drained build side: key -> non-key remainder of every build tuple
/// carrying that key, in build order.
#[derive(Debug)]
pub struct BuildIndex {
    key_columns: Vec<String>,
    rest: Vec<Field>,
    buckets: HashMap<JoinKey, Vec<Tuple>>,
    rows: usize,
}

impl BuildIndex {
    /// Drain `build`, grouping tuples by the values of `key_columns`.
    pub fn build<B: Relation>(mut build: B, key_columns: &[String]) -> Result<Self> {
        let key_idx = key_columns
            .iter()
            .map(|k| build.schema().require(k))
            .collect::<Result<Vec<_>>>()?;
        let rest_idx: Vec<usize> = (0..build.schema().len())
            .filter(|i| !key_idx.contains(i))
            .collect();
        let rest = rest_idx
            .iter()
            .filter_map(|&i| build.schema().field(i).cloned())
            .collect();

        let mut buckets: HashMap<JoinKey, Vec<Tuple>> = HashMap::new();
        let mut rows = 0;
        while let Some(t) = build.next_tuple()? {
            buckets
                .entry(JoinKey::of(&t, &key_idx))
                .or_default()
                .push(pick(&t, &rest_idx));
            rows += 1;
        }

        tracing::debug!(
            rows,
            distinct_keys = buckets.len(),
            keys = ?key_columns,
            "hash join build side indexed"
        );

        Ok(Self {
            key_columns: key_columns.to_vec(),
            rest,
            buckets,
            rows,
        })
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Non-key build columns, in build order.
    pub fn rest(&self) -> &[Field] {
        &self.rest
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn matches(&self, key: &JoinKey) -> &[Tuple] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub struct HashJoin<P> {
    probe: P,
    schema: Schema,
    probe_key: Vec<usize>,
    index: BuildIndex,
    pending: Option<(Tuple, JoinKey)>,
    next_match: usize,
}

impl<P: Relation> HashJoin<P> {
    /// Join `probe` (left) with `build` (right). Drains `build`.
    pub fn new<B: Relation>(probe: P, build: B) -> Result<Self> {
        let key_columns = shared_columns(probe.schema(), build.schema())?;
        let index = BuildIndex::build(build, &key_columns)?;
        Self::with_index(probe, index)
    }

    /// Join `probe` against an already drained build side.
    pub fn with_index(probe: P, index: BuildIndex) -> Result<Self> {
        let probe_key = index
            .key_columns()
            .iter()
            .map(|k| probe.schema().require(k))
            .collect::<Result<Vec<_>>>()?;
        let fields = probe
            .schema()
            .fields()
            .iter()
            .chain(index.rest())
            .cloned()
            .collect();
        let schema = Schema::new(fields)?;
        Ok(Self {
            probe,
            schema,
            probe_key,
            index,
            pending: None,
            next_match: 0,
        })
    }
}

/// Names present in both schemas, in probe order. Shared names must agree on
/// type.
fn shared_columns(probe: &Schema, build: &Schema) -> Result<Vec<String>> {
    let mut shared = Vec::new();
    for f in probe.fields() {
        if let Some(other) = build.index_of(&f.name).and_then(|i| build.field(i)) {
            if other.data_type != f.data_type {
                return Err(Error::type_mismatch(
                    &f.name,
                    f.data_type,
                    other.data_type.annotation(),
                ));
            }
            shared.push(f.name.clone());
        }
    }
    Ok(shared)
}

impl<P: Relation> Relation for HashJoin<P> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        loop {
            if let Some((left, key)) = &self.pending {
                if let Some(right) = self.index.matches(key).get(self.next_match) {
                    self.next_match += 1;
                    let mut out = Vec::with_capacity(self.schema.len());
                    out.extend(left.iter().cloned());
                    out.extend(right.iter().cloned());
                    return Ok(Some(out));
                }
                self.pending = None;
            }

            let Some(left) = self.probe.next_tuple()? else {
                return Ok(None);
            };
            let key = JoinKey::of(&left, &self.probe_key);
            self.pending = Some((left, key));
            self.next_match = 0;
        }
    }
}
