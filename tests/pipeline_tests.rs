//! YAML pipelines end to end.

mod common;

use common::{create_temp_dir, write_file, EMPLOYEES_TYPED, PARENTS_TYPED};
use tabrel::planner::{describe, parse_yaml_pipeline, PlanError, Planner};
use tabrel::relation::count;
use tabrel::{tuple, DataType, Error, IoConfig, Relation, Table};

fn planner(dir: &std::path::Path) -> Planner {
    Planner::new(IoConfig::default()).with_base_dir(dir)
}

#[test]
fn select_project_sort() {
    let dir = create_temp_dir("pipeline-basic");
    write_file(&dir, "employees.csv", EMPLOYEES_TYPED);
    let p = parse_yaml_pipeline(
        r#"
config: { typed: true }
steps:
  - op: scan
    source: employees.csv
  - op: select
    expr: "Age < 10"
  - op: project
    columns: [Name, Age]
  - op: sort
    by: [Age, Name]
    reverse: true
"#,
    )
    .unwrap();
    let out = Table::materialize(planner(&dir).build(&p).unwrap()).unwrap();
    assert_eq!(
        out.rows(),
        &[
            tuple!["Milhouse", 9],
            tuple!["Ralph", 8],
            tuple!["Lisa", 8],
            tuple!["Janey", 8],
        ]
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rename_join_aggregate() {
    let dir = create_temp_dir("pipeline-join");
    write_file(&dir, "employees.csv", EMPLOYEES_TYPED);
    write_file(&dir, "parents.csv", PARENTS_TYPED);
    let p = parse_yaml_pipeline(
        r#"
config: { typed: true }
steps:
  - op: scan
    source: employees.csv
  - op: rename
    mapping: { Name: ChildName }
  - op: join
    source: parents.csv
  - op: select
    expr: "FatherName == Homer"
  - op: aggregate
    aggs: [[Salary, mean], [ChildName, count]]
"#,
    )
    .unwrap();
    let mut rel = planner(&dir).build(&p).unwrap();
    assert_eq!(
        rel.schema().names().collect::<Vec<_>>(),
        ["Salary_mean", "ChildName_count"]
    );
    assert_eq!(rel.next_tuple().unwrap(), Some(tuple![10000.0, 2]));
    assert_eq!(rel.next_tuple().unwrap(), None);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn untyped_scan_then_alter_type_and_vcat() {
    let dir = create_temp_dir("pipeline-alter");
    write_file(&dir, "a.csv", "Name,Age\nLisa,8\n");
    write_file(&dir, "b.csv", "Age,Name\n10,Bart\n");
    let p = parse_yaml_pipeline(
        r#"
steps:
  - op: scan
    source: a.csv
  - op: vcat
    sources: [b.csv]
  - op: alter_type
    types: { Age: int }
  - op: drop
    columns: [Name]
"#,
    )
    .unwrap();
    let rel = planner(&dir).build(&p).unwrap();
    assert_eq!(rel.schema().types().collect::<Vec<_>>(), [DataType::Int64]);
    let out = Table::materialize(rel).unwrap();
    assert_eq!(out.rows(), &[tuple![8], tuple![10]]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn construction_errors_surface_before_any_pull() {
    let dir = create_temp_dir("pipeline-errors");
    write_file(&dir, "employees.csv", EMPLOYEES_TYPED);
    let p = parse_yaml_pipeline(
        "config: { typed: true }\nsteps:\n  - op: scan\n    source: employees.csv\n  - op: project\n    columns: [Height]\n",
    )
    .unwrap();
    assert!(matches!(
        planner(&dir).build(&p),
        Err(PlanError::Core(Error::UnknownColumn(_)))
    ));

    let p = parse_yaml_pipeline(
        "config: { typed: true }\nsteps:\n  - op: scan\n    source: employees.csv\n  - op: aggregate\n    aggs: [[Name, mean]]\n",
    )
    .unwrap();
    assert!(matches!(
        planner(&dir).build(&p),
        Err(PlanError::Core(Error::TypeMismatch { .. }))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn describe_lists_every_step() {
    let p = parse_yaml_pipeline(
        "steps:\n  - op: scan\n    source: employees.csv\n  - op: aggregate\n    aggs: [[Age, variance]]\n",
    )
    .unwrap();
    assert_eq!(
        describe(&p),
        [" 1. scan employees.csv", " 2. aggregate [Age_variance]"]
    );
}

#[test]
fn pipeline_output_counts_match_direct_operators() {
    let dir = create_temp_dir("pipeline-count");
    write_file(&dir, "employees.csv", EMPLOYEES_TYPED);
    let p = parse_yaml_pipeline(
        "config: { typed: true }\nsteps:\n  - op: scan\n    source: employees.csv\n  - op: select\n    expr: \"Salary >= 20000\"\n",
    )
    .unwrap();
    assert_eq!(count(planner(&dir).build(&p).unwrap()).unwrap(), 4);
    let _ = std::fs::remove_dir_all(&dir);
}
