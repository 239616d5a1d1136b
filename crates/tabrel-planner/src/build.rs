//! Turn a parsed `Pipeline` into one boxed `Relation`.

use std::path::{Path, PathBuf};

use tabrel_core::config::IoConfig;
use tabrel_core::prelude::{DataType, Relation};
use tabrel_operators::{
    Aggregate, AlterType, Comparison, HashJoin, Projection, Rename, Selection, Sort, SortSpec,
    VCat,
};

use crate::dsl::yaml::{Pipeline, PipelineConfig, Step};
use crate::error::{PlanError, Result};

pub type BoxedRelation = Box<dyn Relation>;

/// Builds pipelines. I/O settings resolve as: base (usually the environment),
/// then the pipeline's `config:` block, then `overrides`.
#[derive(Debug, Clone)]
pub struct Planner {
    base: IoConfig,
    overrides: PipelineConfig,
    base_dir: PathBuf,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(IoConfig::from_env())
    }
}

impl Planner {
    pub fn new(base: IoConfig) -> Self {
        Self {
            base,
            overrides: PipelineConfig::default(),
            base_dir: PathBuf::new(),
        }
    }

    /// Settings that win over the pipeline's own `config:` block.
    pub fn with_overrides(mut self, overrides: PipelineConfig) -> Self {
        self.overrides = overrides;
        self
    }

    /// Directory relative `source` paths are resolved against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn io_config(&self, pipeline: &Pipeline) -> IoConfig {
        self.overrides.apply(&pipeline.config.apply(&self.base))
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let p = Path::new(source);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    fn open(&self, source: &str, io: &IoConfig) -> Result<BoxedRelation> {
        Ok(Box::new(tabrel_io::stream(self.resolve(source), io)?))
    }

    /// Construct every operator of `pipeline`. No tuples are pulled from the
    /// scanned source.
    pub fn build(&self, pipeline: &Pipeline) -> Result<BoxedRelation> {
        pipeline.validate()?;
        let io = self.io_config(pipeline);

        let mut steps = pipeline.steps.iter();
        let Some(Step::Scan { source }) = steps.next() else {
            return Err(PlanError::Invalid("first step must be scan".into()));
        };
        let mut cur = self.open(source, &io)?;

        for step in steps {
            cur = self.apply(cur, step, &io)?;
        }

        tracing::debug!(
            steps = pipeline.steps.len(),
            columns = cur.schema().len(),
            pass = ?cur.pass(),
            "built pipeline"
        );
        Ok(cur)
    }

    fn apply(&self, cur: BoxedRelation, step: &Step, io: &IoConfig) -> Result<BoxedRelation> {
        let next: BoxedRelation = match step {
            Step::Scan { .. } => {
                return Err(PlanError::Invalid("scan may only be the first step".into()))
            }
            Step::Project { columns } => Box::new(Projection::new(cur, columns)?),
            Step::Drop { columns } => Box::new(Projection::complement(cur, columns)?),
            Step::Select { expr } => {
                let cmp = Comparison::parse(expr, cur.schema())?;
                Box::new(Selection::new(cur, cmp.into_predicate()))
            }
            Step::Rename { mapping } => {
                Box::new(Rename::new(cur, mapping.iter().map(|(a, b)| (a, b.clone())))?)
            }
            Step::Join { source } => {
                let build = self.open(source, io)?;
                Box::new(HashJoin::new(cur, build)?)
            }
            Step::Vcat { sources } => {
                let mut inputs = vec![cur];
                for source in sources {
                    inputs.push(self.open(source, io)?);
                }
                Box::new(VCat::new(inputs)?)
            }
            Step::AlterType { types } => {
                let mapping = types
                    .iter()
                    .map(|(c, t)| DataType::parse_annotation(t).map(|dt| (c, dt)))
                    .collect::<tabrel_core::Result<Vec<_>>>()?;
                Box::new(AlterType::new(cur, mapping)?)
            }
            Step::Aggregate { aggs } => {
                Box::new(Aggregate::new(cur, aggs.iter().map(|(c, k)| (c, *k)))?)
            }
            Step::Sort { by, reverse } => {
                let spec = SortSpec {
                    by: by.clone(),
                    reverse: *reverse,
                };
                Box::new(Sort::new(cur, spec)?)
            }
        };
        Ok(next)
    }
}

/// Build with I/O settings from the environment and the pipeline itself.
pub fn build(pipeline: &Pipeline) -> Result<BoxedRelation> {
    Planner::default().build(pipeline)
}

/// One line per step, for `explain`.
pub fn describe(pipeline: &Pipeline) -> Vec<String> {
    pipeline
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{:>2}. {s}", i + 1))
        .collect()
}
