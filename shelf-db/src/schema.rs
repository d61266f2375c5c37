//! SQLite schema creation.
//!
//! Tables are created from the entities' column declarations. Existing tables
//! are never altered; columns added to a declaration after a database was
//! created are simply absent from it and read back as defaults.

use std::path::Path;

use rusqlite::Connection;
use shelf_catalog::{Game, Label, Tab, TimelineEvent};
use shelf_core::{ColumnDef, Entity, TableDef, TypeDescriptor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Pages written to the WAL before SQLite checkpoints it.
pub const WAL_AUTOCHECKPOINT: u32 = 100;

/// The flat key/value cookie jar.
pub const COOKIES_TABLE: TableDef = TableDef {
    name: "cookies",
    columns: &[
        ColumnDef::new("key", TypeDescriptor::Text, "TEXT PRIMARY KEY"),
        ColumnDef::new("value", TypeDescriptor::Text, "TEXT DEFAULT ''"),
    ],
};

/// Every table the library stores, in creation order.
pub const TABLES: [TableDef; 5] = [
    Game::TABLE,
    Label::TABLE,
    Tab::TABLE,
    TimelineEvent::TABLE,
    COOKIES_TABLE,
];

/// `CREATE TABLE IF NOT EXISTS` statement for a table declaration.
pub fn table_sql(table: &TableDef) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("    {} {}", c.name(), c.sql))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", table.name, columns)
}

/// Create `table` if it does not exist yet.
pub fn ensure_table(conn: &Connection, table: &TableDef) -> Result<(), SchemaError> {
    conn.execute_batch(&table_sql(table))?;
    Ok(())
}

/// Create all tables if they don't exist.
///
/// This is idempotent, so it is safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    for table in &TABLES {
        ensure_table(conn, table)?;
    }
    Ok(())
}

/// Open or create a library database at the given path.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(&format!(
        "PRAGMA journal_mode=WAL; PRAGMA wal_autocheckpoint={WAL_AUTOCHECKPOINT};"
    ))?;
    create_schema(&conn)?;
    log::debug!("Opened database at {}", path.display());
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Names of the columns an existing table actually has.
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    names.collect()
}
