//! Integration Test Utilities and Common Code

#![allow(dead_code)]

use indoc::indoc;

pub use assert_cmd::prelude::*;
pub use assert_fs::prelude::*;
pub use assert_fs::{fixture::ChildPath, TempDir};
pub use insta::assert_snapshot;
pub use predicates::prelude::PredicateBooleanExt;
pub use predicates::str::{contains, is_empty, RegexPredicate};
pub use pretty_assertions::{assert_eq, assert_ne};
pub use std::path::Path;
pub use std::process::Command;

/// Build a `Command` for the `namesurvey` crate binary with variadic command-line arguments.
///
/// The arguments can be anything that is allowed by `Command::arg`.
#[macro_export]
macro_rules! namesurvey {
    ( $( $arg:expr ),* ) => {
        {
            let mut cmd = namesurvey_cmd();
            $(
                cmd.arg($arg);
            )*
            cmd
        }
    }
}

/// Build an `assert_cmd::assert::Assert` by calling `namesurvey!(args).assert().success()`.
#[macro_export]
macro_rules! namesurvey_success {
    ( $( $arg:expr ),* ) => { namesurvey!($( $arg ),*).assert().success() }
}

/// Build an `assert_cmd::assert::Assert` by calling `namesurvey!(args).assert().failure()`.
#[macro_export]
macro_rules! namesurvey_failure {
    ( $( $arg:expr ),* ) => { namesurvey!($( $arg ),*).assert().failure() }
}

// make macros easily visible to other modules
pub use {namesurvey, namesurvey_failure, namesurvey_success};

/// Build a `Command` for the `namesurvey` crate binary.
pub fn namesurvey_cmd() -> Command {
    let mut cmd = Command::cargo_bin("namesurvey").expect("namesurvey should be executable");
    cmd.env_remove("NAMESURVEY_DATABASE");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Create a `RegexPredicate` from the given pattern.
pub fn is_match(pat: &str) -> RegexPredicate {
    predicates::str::is_match(pat).expect("pattern should compile")
}

/// Read and parse a JSON file written by `namesurvey`.
pub fn read_json(path: &Path) -> serde_json::Value {
    let contents = std::fs::read_to_string(path).expect("output file should be readable");
    serde_json::from_str(&contents).expect("output file should be valid JSON")
}

/// A type to represent a mock survey environment for testing.
pub struct SurveyEnv {
    pub root: TempDir,
    pub database: ChildPath,
    pub output: ChildPath,
}

impl SurveyEnv {
    /// Create a new mock survey environment with an empty output directory and no database.
    pub fn new() -> Self {
        let root = TempDir::new().expect("should be able to create tempdir");
        let database = root.child("equipment.db3");
        let output = root.child("out");
        assert!(!database.exists());

        Self {
            root,
            database,
            output,
        }
    }

    /// Create a mock survey environment with an equipment database.
    ///
    /// The database has:
    /// - `DataAircraft`: 45 named rows with comments, plus rows with null or empty names
    /// - `DataShip`: 3 named rows, no comments column
    /// - `DataWeapon`: no name column
    pub fn with_database() -> Self {
        let env = Self::new();
        let conn = rusqlite::Connection::open(env.database.path())
            .expect("should be able to create database");
        conn.execute_batch(indoc! {r#"
            create table DataAircraft (ID integer primary key, Name text, Comments text);
            insert into DataAircraft (Name, Comments) values (null, 'nameless'), ('', 'blank');

            create table DataShip (ID integer primary key, Name text, Class text);
            insert into DataShip (Name, Class) values
                ('DDG 51 Arleigh Burke', 'Arleigh Burke'),
                ('CVN 68 Nimitz', 'Nimitz'),
                ('Kirov', 'Pr.1144');

            create table DataWeapon (ID integer primary key, Designation text);
            insert into DataWeapon (Designation) values ('AIM-120C');
        "#})
        .expect("should be able to populate database");
        for i in 0..45 {
            conn.execute(
                "insert into DataAircraft (Name, Comments) values (?, ?)",
                (format!("Su-{i} Flanker"), format!("{i}x R-77 ({})", 1980 + i)),
            )
            .expect("should be able to insert row");
        }
        env
    }

    /// Create a samples file in the input format of `analyze`.
    pub fn samples_file(&self, contents: &str) -> ChildPath {
        let input = self.root.child("samples_data.json");
        input
            .write_str(contents)
            .expect("should be able to write samples file");
        input
    }

    pub fn dbpath(&self) -> &Path {
        self.database.path()
    }

    pub fn outpath(&self) -> &Path {
        self.output.path()
    }

    pub fn out_file(&self, name: &str) -> ChildPath {
        self.output.child(name)
    }
}

/// A small set of samples covering several overlapping patterns.
pub const EXAMPLE_SAMPLES: &str = indoc! {r#"
    {
      "DataAircraft": {
        "total_count": 120,
        "sample_count": 3,
        "has_comments": true,
        "samples": [
          { "Name": "J-11B [export variant]", "Comments": "4x PL-12 (2018 upgrade)" },
          { "Name": "Su-27 Flanker", "Comments": "" },
          { "Name": "Boeing F/A-18E Super Hornet", "Comments": "Cancelled export" }
        ]
      },
      "DataSubmarine": {
        "total_count": 1,
        "sample_count": 1,
        "has_comments": true,
        "samples": [
          { "Name": "Kilo 636", "Comments": "Retired from service" }
        ]
      },
      "DataShip": {
        "total_count": 2,
        "sample_count": 2,
        "has_comments": false,
        "samples": [
          { "Name": "DDG 51 Arleigh Burke", "Comments": "" },
          { "Name": "Kirov", "Comments": "" }
        ]
      }
    }
"#};
