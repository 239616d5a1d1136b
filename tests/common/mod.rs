//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tabrel::{tuple, DataType, Field, Schema, Table};

pub const EMPLOYEES_TYPED: &str = "\
Name:str,Age:int,Sex:str,Title:str,Salary:float
Lisa,8,F,Homemaker,0.0
Bart,10,M,Policeman,20000.0
Martin,10,M,Systems analyst,40000.0
Ralph,8,M,Salmon gutter,10000.0
Milhouse,9,M,Military strongman,50000.0
Janey,8,F,Astronaut,30000.0
";

pub const PARENTS_TYPED: &str = "\
ChildName:str,FatherName:str,MotherName:str
Lisa,Homer,Marge
Bart,Homer,Marge
Ralph,Clancy,Sheila
Milhouse,Kurt,Louise
";

/// Fresh per-test scratch directory under the system temp dir.
pub fn create_temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tabrel-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

pub fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

pub fn employees() -> Table {
    let schema = Schema::new(vec![
        Field::utf8("Name"),
        Field::new("Age", DataType::Int64),
        Field::utf8("Sex"),
        Field::utf8("Title"),
        Field::new("Salary", DataType::Float64),
    ])
    .unwrap();
    Table::try_new(
        schema,
        vec![
            tuple!["Lisa", 8, "F", "Homemaker", 0.0],
            tuple!["Bart", 10, "M", "Policeman", 20000.0],
            tuple!["Martin", 10, "M", "Systems analyst", 40000.0],
            tuple!["Ralph", 8, "M", "Salmon gutter", 10000.0],
            tuple!["Milhouse", 9, "M", "Military strongman", 50000.0],
            tuple!["Janey", 8, "F", "Astronaut", 30000.0],
        ],
    )
    .unwrap()
}

pub fn parents() -> Table {
    let schema = Schema::new(vec![
        Field::utf8("ChildName"),
        Field::utf8("FatherName"),
        Field::utf8("MotherName"),
    ])
    .unwrap();
    Table::try_new(
        schema,
        vec![
            tuple!["Lisa", "Homer", "Marge"],
            tuple!["Bart", "Homer", "Marge"],
            tuple!["Ralph", "Clancy", "Sheila"],
            tuple!["Milhouse", "Kurt", "Louise"],
        ],
    )
    .unwrap()
}
