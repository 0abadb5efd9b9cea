use anyhow::{Context, Result};
use indoc::indoc;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span};

use crate::defaults::{COMMENTS_COLUMN, NAME_COLUMN};
use crate::sample::Sample;

// -------------------------------------------------------------------------------------------------
// Database
// -------------------------------------------------------------------------------------------------
/// A read-only handle on an equipment database.
pub struct Database {
    /// The path of the database file.
    path: PathBuf,

    /// A connection to the database.
    conn: Connection,
}

/// The shape of a table, as far as sampling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub has_name: bool,
    pub has_comments: bool,
}

impl Database {
    /// Open the existing database at `path`.
    ///
    /// This never creates a database; a missing file is an error.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        // Opening is lazy; make sure this is really a database before going further.
        conn.query_row("select count(*) from sqlite_master", [], |r| r.get::<_, i64>(0))
            .with_context(|| format!("Failed to read database at {}", path.display()))?;

        Ok(Database {
            path: path.to_owned(),
            conn,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(indoc! {r#"
            select count(*) from sqlite_master where type = 'table' and name = ?
        "#})?;
        let count: i64 = stmt.query_row([table], |r| r.get(0))?;
        Ok(count > 0)
    }

    pub fn column_names(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("select name from pragma_table_info(?)")?;
        let names = stmt.query_map([table], |r| r.get(0))?;
        let mut es = Vec::new();
        for n in names {
            es.push(n?);
        }
        Ok(es)
    }

    pub fn table_layout(&self, table: &str) -> Result<TableLayout> {
        let columns = self.column_names(table)?;
        Ok(TableLayout {
            has_name: columns.iter().any(|c| c == NAME_COLUMN),
            has_comments: columns.iter().any(|c| c == COMMENTS_COLUMN),
        })
    }

    /// Call `f` on each row of `table` that has a non-empty name, in storage order.
    ///
    /// When `has_comments` is false, every sample gets an empty comment.
    pub fn for_each_named_row<F: FnMut(Sample)>(
        &self,
        table: &str,
        has_comments: bool,
        mut f: F,
    ) -> Result<()> {
        let _span = debug_span!("Database::for_each_named_row", "{}", table).entered();

        let comments = if has_comments {
            quote_identifier(COMMENTS_COLUMN)
        } else {
            "null".to_string()
        };
        let name = quote_identifier(NAME_COLUMN);
        let sql = format!(
            "select {name}, {comments} from {} where {name} is not null and {name} <> ''",
            quote_identifier(table)
        );
        debug!("Query: {sql}");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name = value_to_string(row.get_ref(0)?);
            let comments = value_to_string(row.get_ref(1)?);
            f(Sample { name, comments });
        }
        Ok(())
    }
}

/// Quote a table or column name for inclusion in SQL text.
fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Render any SQL value as text; `NULL` becomes the empty string.
fn value_to_string(v: ValueRef<'_>) -> String {
    match v {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        // `{:?}` keeps the fractional part of whole numbers (`1.0`, not `1`)
        ValueRef::Real(f) => format!("{f:?}"),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}
