use anyhow::Result;
use rand::Rng;
use tracing::{debug_span, error, info, warn};

use crate::database::Database;
use crate::sample::{Reservoir, SampleSet, TableSampleSet};

/// Why a table contributed nothing to a `SampleSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The table does not exist in the database
    MissingTable,

    /// The table has no name column
    NoNameColumn,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingTable => write!(f, "table does not exist"),
            SkipReason::NoNameColumn => write!(f, "table has no name column"),
        }
    }
}

/// Draws bounded random samples of names from database tables.
pub struct Sampler<'a> {
    db: &'a Database,
    sample_size: usize,
}

impl<'a> Sampler<'a> {
    pub fn new(db: &'a Database, sample_size: usize) -> Self {
        Sampler { db, sample_size }
    }

    /// Sample a single table.
    ///
    /// `Ok(Err(reason))` means the table was deliberately skipped.
    pub fn sample_table<R: Rng + ?Sized>(
        &self,
        table: &str,
        rng: &mut R,
    ) -> Result<std::result::Result<TableSampleSet, SkipReason>> {
        let _span = debug_span!("Sampler::sample_table", "{}", table).entered();

        if !self.db.table_exists(table)? {
            return Ok(Err(SkipReason::MissingTable));
        }
        let layout = self.db.table_layout(table)?;
        if !layout.has_name {
            return Ok(Err(SkipReason::NoNameColumn));
        }

        let mut reservoir = Reservoir::new(self.sample_size);
        self.db
            .for_each_named_row(table, layout.has_comments, |s| reservoir.offer(s, rng))?;
        let (samples, total_count) = reservoir.into_parts();

        Ok(Ok(TableSampleSet::new(table, total_count, layout.has_comments, samples)))
    }

    /// Sample each of `tables` in order.
    ///
    /// Tables that are missing, lack a name column, or fail to be read are logged and left out
    /// of the result.
    pub fn sample_tables<T: AsRef<str>, R: Rng + ?Sized>(
        &self,
        tables: &[T],
        rng: &mut R,
    ) -> SampleSet {
        let mut set = SampleSet::new();
        for table in tables {
            let table = table.as_ref();
            match self.sample_table(table, rng) {
                Ok(Ok(samples)) => {
                    info!(
                        "Sampled {} of {} rows from {}",
                        samples.sample_count, samples.total_count, table
                    );
                    set.insert(samples);
                }
                Ok(Err(reason)) => {
                    warn!("Skipping table {table}: {reason}");
                }
                Err(e) => {
                    error!("Failed to sample table {table}: {e:#}");
                }
            }
        }
        set
    }
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;
    use crate::sample::Sample;
    use assert_fs::TempDir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rusqlite::Connection;
    use std::path::{Path, PathBuf};

    fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("equipment.db3");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(indoc! {r#"
            create table DataAircraft (ID integer primary key, Name text, Comments text);
            create table DataShip (ID integer primary key, Name text);
            insert into DataShip (Name) values ('DDG 51 Arleigh Burke'), ('CG 47 Ticonderoga');
            create table DataMount (ID integer primary key, Description text);
            create view DataSensor as select 'AN/SPY-1' as Name;
        "#})
        .unwrap();
        for i in 0..100 {
            conn.execute(
                "insert into DataAircraft (Name, Comments) values (?, ?)",
                (format!("Aircraft {i}"), if i % 2 == 0 { Some("even") } else { None }),
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn samples_and_skips() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&fixture(dir.path())).unwrap();
        let sampler = Sampler::new(&db, 30);
        let mut rng = StdRng::seed_from_u64(42);

        let tables = ["DataShip", "DataSubmarine", "DataMount", "DataAircraft", "DataSensor"];
        let set = sampler.sample_tables(&tables, &mut rng);
        assert_eq!(set.table_names().collect::<Vec<_>>(), vec!["DataShip", "DataAircraft"]);

        let ship = set.get("DataShip").unwrap();
        assert_eq!(ship.total_count, 2);
        assert_eq!(ship.sample_count, 2);
        assert!(!ship.has_comments);
        assert_eq!(
            ship.samples,
            vec![Sample::new("DDG 51 Arleigh Burke", ""), Sample::new("CG 47 Ticonderoga", "")]
        );

        let aircraft = set.get("DataAircraft").unwrap();
        assert_eq!(aircraft.total_count, 100);
        assert_eq!(aircraft.sample_count, 30);
        assert!(aircraft.has_comments);
        for s in aircraft.samples.iter() {
            let i: usize = s.name.trim_start_matches("Aircraft ").parse().unwrap();
            let expected = if i % 2 == 0 { "even" } else { "" };
            assert_eq!(s.comments, expected);
        }
    }

    /// Register a table whose virtual table module does not exist, so any read of it fails.
    fn add_unreadable_table(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(indoc! {r#"
            pragma writable_schema = on;
            insert into sqlite_master (type, name, tbl_name, rootpage, sql) values (
                'table', 'DataBroken', 'DataBroken', 0,
                'CREATE VIRTUAL TABLE DataBroken USING no_such_module(Name, Comments)'
            );
            pragma writable_schema = off;
        "#})
        .unwrap();
    }

    #[test]
    fn failing_table_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = fixture(dir.path());
        add_unreadable_table(&path);
        let db = Database::open(&path).unwrap();
        let sampler = Sampler::new(&db, 30);
        let mut rng = StdRng::seed_from_u64(42);

        assert!(db.table_exists("DataBroken").unwrap());
        assert!(sampler.sample_table("DataBroken", &mut rng).is_err());

        let set = sampler.sample_tables(&["DataShip", "DataBroken", "DataAircraft"], &mut rng);
        assert_eq!(set.table_names().collect::<Vec<_>>(), vec!["DataShip", "DataAircraft"]);
        assert_eq!(set.get("DataShip").unwrap().sample_count, 2);
        assert_eq!(set.get("DataAircraft").unwrap().sample_count, 30);
    }

    #[test]
    fn skip_reasons() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&fixture(dir.path())).unwrap();
        let sampler = Sampler::new(&db, 30);
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(
            sampler.sample_table("DataSubmarine", &mut rng).unwrap(),
            Err(SkipReason::MissingTable)
        );
        assert_eq!(
            sampler.sample_table("DataMount", &mut rng).unwrap(),
            Err(SkipReason::NoNameColumn)
        );
    }
}
