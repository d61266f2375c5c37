//! Read queries for the library database.

use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension, params};
use shelf_catalog::{GameId, TimelineEvent};
use shelf_core::{ColumnDef, Entity, Primitive, Row, TableDef, decode};

use crate::convert::from_sql;
use crate::operations::OperationError;
use crate::schema::{COOKIES_TABLE, table_columns};

/// Declared columns of `table` that exist in the database.
fn present_columns(conn: &Connection, table: &TableDef) -> Result<Vec<&'static ColumnDef>, OperationError> {
    let existing = table_columns(conn, table.name)?;
    Ok(table
        .columns
        .iter()
        .filter(|c| existing.iter().any(|name| name == c.name()))
        .collect())
}

fn select_sql(table: &TableDef, columns: &[&ColumnDef], filter: &str) -> String {
    let names = columns.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ");
    format!("SELECT {names} FROM {} {filter}", table.name)
}

/// Decode one result row column by column.
fn decode_row(row: &rusqlite::Row<'_>, columns: &[&ColumnDef]) -> rusqlite::Result<Row> {
    let mut decoded = Row::new();
    for (i, column) in columns.iter().enumerate() {
        let primitive = from_sql(row.get_ref(i)?);
        decoded.insert(column.name(), decode(&primitive, &column.field.ty));
    }
    Ok(decoded)
}

fn read_where<E: Entity>(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<E>, OperationError> {
    let columns = present_columns(conn, &E::TABLE)?;
    let mut stmt = conn.prepare(&select_sql(&E::TABLE, &columns, filter))?;
    let rows = stmt.query_map(args, |row| decode_row(row, &columns))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(E::from_row(row?));
    }
    Ok(out)
}

/// Read every row of `E`'s table in storage order.
pub fn read_all<E: Entity>(conn: &Connection) -> Result<Vec<E>, OperationError> {
    read_where(conn, "ORDER BY rowid", [])
}

/// Timeline events of one game, newest first.
pub fn timeline_events_for(
    conn: &Connection,
    game_id: GameId,
) -> Result<Vec<TimelineEvent>, OperationError> {
    read_where(
        conn,
        "WHERE game_id = ?1 ORDER BY timestamp DESC, rowid DESC",
        [game_id],
    )
}

/// Every timeline event, newest first.
pub fn all_timeline_events(conn: &Connection) -> Result<Vec<TimelineEvent>, OperationError> {
    read_where(conn, "ORDER BY timestamp DESC, rowid DESC", [])
}

/// Raw stored value of one column, or `None` if the row does not exist.
pub fn read_field(
    conn: &Connection,
    table: &str,
    id: i64,
    column: &str,
) -> Result<Option<Primitive>, OperationError> {
    let value = conn
        .query_row(
            &format!("SELECT \"{column}\" FROM {table} WHERE id = ?1"),
            params![id],
            |row| Ok(from_sql(row.get_ref(0)?)),
        )
        .optional()?;
    Ok(value)
}

pub fn read_cookies(conn: &Connection) -> Result<BTreeMap<String, String>, OperationError> {
    let mut stmt = conn.prepare(&format!("SELECT key, value FROM {}", COOKIES_TABLE.name))?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?.unwrap_or_default()))
    })?;
    rows.collect::<Result<BTreeMap<_, _>, _>>().map_err(Into::into)
}

/// Number of rows in a table.
pub fn count_rows(conn: &Connection, table: &str) -> Result<i64, OperationError> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(count)
}

/// Distinct `game_id`s of timeline events that have no game row.
///
/// A NULL `game_id` is reported as 0, the value it decodes to.
pub fn orphaned_event_game_ids(conn: &Connection) -> Result<Vec<GameId>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT COALESCE(game_id, 0) FROM timeline_events
         WHERE COALESCE(game_id, 0) NOT IN (SELECT id FROM games)
         ORDER BY 1",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, GameId>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
