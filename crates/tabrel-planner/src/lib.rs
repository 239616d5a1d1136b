#![forbid(unsafe_code)]
//! tabrel-planner: YAML pipelines → composed, lazily evaluated relations.
//!
//! A pipeline is a linear list of steps starting with exactly one `scan`.
//! Building a pipeline constructs every operator (which validates column
//! names and types) but pulls no tuples, except where an operator drains an
//! input at construction (the build side of a join).

pub mod build;
pub mod dsl;
pub mod error;

pub use build::{build, describe, Planner};
pub use dsl::yaml::{parse_yaml_pipeline, Pipeline, PipelineConfig, Step};
pub use error::{PlanError, Result};
