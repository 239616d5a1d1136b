//! YAML pipeline documents.
//!
//! Example:
//! ```yaml
//! config: { typed: true }
//! steps:
//!   - op: scan
//!     source: employees.csv
//!   - op: select
//!     expr: "Age < 10"
//!   - op: project
//!     columns: [Name, Age]
//!   - op: aggregate
//!     aggs: [[Age, mean]]
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tabrel_core::config::IoConfig;
use tabrel_operators::AggKind;

use crate::error::{PlanError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: PipelineConfig,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Step {
    Scan {
        source: String,
    },

    Project {
        columns: Vec<String>,
    },

    /// Keep every column except `columns`.
    Drop {
        columns: Vec<String>,
    },

    Select {
        expr: String,
    },

    /// old name -> new name
    Rename {
        mapping: BTreeMap<String, String>,
    },

    /// Natural join with the relation stored in `source` (the build side).
    Join {
        source: String,
    },

    /// Append the relations stored in `sources`.
    Vcat {
        sources: Vec<String>,
    },

    /// column -> type annotation (`str`, `int`, `float`)
    AlterType {
        types: BTreeMap<String, String>,
    },

    Aggregate {
        aggs: Vec<(String, AggKind)>,
    },

    Sort {
        #[serde(default)]
        by: Option<Vec<String>>,
        #[serde(default)]
        reverse: bool,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Scan { source } => write!(f, "scan {source}"),
            Step::Project { columns } => write!(f, "project [{}]", columns.join(", ")),
            Step::Drop { columns } => write!(f, "drop [{}]", columns.join(", ")),
            Step::Select { expr } => write!(f, "select {expr}"),
            Step::Rename { mapping } => {
                let pairs: Vec<String> = mapping.iter().map(|(a, b)| format!("{a} -> {b}")).collect();
                write!(f, "rename [{}]", pairs.join(", "))
            }
            Step::Join { source } => write!(f, "join {source}"),
            Step::Vcat { sources } => write!(f, "vcat [{}]", sources.join(", ")),
            Step::AlterType { types } => {
                let pairs: Vec<String> = types.iter().map(|(c, t)| format!("{c}: {t}")).collect();
                write!(f, "alter_type [{}]", pairs.join(", "))
            }
            Step::Aggregate { aggs } => {
                let specs: Vec<String> = aggs.iter().map(|(c, k)| format!("{c}_{k}")).collect();
                write!(f, "aggregate [{}]", specs.join(", "))
            }
            Step::Sort { by, reverse } => {
                let keys = match by {
                    Some(keys) => keys.join(", "),
                    None => "*".to_string(),
                };
                let dir = if *reverse { " desc" } else { "" };
                write!(f, "sort [{keys}]{dir}")
            }
        }
    }
}

/// Overrides for `IoConfig`; unset fields keep the underlying value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub delimiter: Option<char>,
    pub type_delimiter: Option<char>,
    pub typed: Option<bool>,
}

impl PipelineConfig {
    pub fn apply(&self, base: &IoConfig) -> IoConfig {
        IoConfig {
            delimiter: self.delimiter.unwrap_or(base.delimiter),
            type_delimiter: self.type_delimiter.unwrap_or(base.type_delimiter),
            typed: self.typed.unwrap_or(base.typed),
        }
    }
}

impl Pipeline {
    /// Structural checks: non-empty, one `scan`, and it comes first.
    pub fn validate(&self) -> Result<()> {
        match self.steps.first() {
            None => return Err(PlanError::Invalid("pipeline has no steps".into())),
            Some(Step::Scan { .. }) => {}
            Some(other) => {
                return Err(PlanError::Invalid(format!(
                    "first step must be scan, found '{other}'"
                )))
            }
        }
        let scans = self
            .steps
            .iter()
            .filter(|s| matches!(s, Step::Scan { .. }))
            .count();
        if scans > 1 {
            return Err(PlanError::Invalid(format!(
                "expected exactly one scan, found {scans}"
            )));
        }
        Ok(())
    }
}

/// Parse and structurally validate a pipeline document.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<Pipeline> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    doc.validate()?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let yaml = r#"
config: { delimiter: ";", typed: true }
steps:
  - op: scan
    source: employees.csv
  - op: select
    expr: "Age < 10"
  - op: project
    columns: [Name, Age, Salary]
  - op: drop
    columns: [Salary]
  - op: rename
    mapping: { Name: Child }
  - op: join
    source: parents.csv
  - op: vcat
    sources: [more.csv]
  - op: alter_type
    types: { Age: float }
  - op: aggregate
    aggs: [[Age, mean], [Child, count]]
  - op: sort
    by: [Age_mean]
    reverse: true
"#;
        let p = parse_yaml_pipeline(yaml).unwrap();
        assert_eq!(p.steps.len(), 10);
        assert_eq!(p.config.delimiter, Some(';'));
        assert_eq!(p.config.type_delimiter, None);
        assert_eq!(
            p.steps[8],
            Step::Aggregate {
                aggs: vec![
                    ("Age".to_string(), AggKind::Mean),
                    ("Child".to_string(), AggKind::Count)
                ]
            }
        );
        assert_eq!(p.steps[9].to_string(), "sort [Age_mean] desc");
        assert_eq!(p.steps[3].to_string(), "drop [Salary]");
    }

    #[test]
    fn structural_errors() {
        let no_scan = "steps:\n  - op: project\n    columns: [a]\n";
        assert!(matches!(parse_yaml_pipeline(no_scan), Err(PlanError::Invalid(_))));

        let two_scans = "steps:\n  - op: scan\n    source: a.csv\n  - op: scan\n    source: b.csv\n";
        assert!(matches!(parse_yaml_pipeline(two_scans), Err(PlanError::Invalid(_))));

        let empty = "steps: []\n";
        assert!(matches!(parse_yaml_pipeline(empty), Err(PlanError::Invalid(_))));
    }

    #[test]
    fn syntax_errors() {
        let unknown_op = "steps:\n  - op: explode\n    column: a\n";
        assert!(matches!(parse_yaml_pipeline(unknown_op), Err(PlanError::Yaml(_))));

        let bad_agg = "steps:\n  - op: scan\n    source: a.csv\n  - op: aggregate\n    aggs: [[a, median]]\n";
        assert!(matches!(parse_yaml_pipeline(bad_agg), Err(PlanError::Yaml(_))));
    }

    #[test]
    fn config_overrides_only_what_is_set() {
        let cfg = PipelineConfig {
            typed: Some(true),
            ..PipelineConfig::default()
        };
        let io = cfg.apply(&IoConfig::default());
        assert_eq!(io, IoConfig::typed());
    }
}
