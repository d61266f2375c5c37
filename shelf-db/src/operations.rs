//! Write operations for every stored table.
//!
//! All functions take an open connection and run synchronously; the async
//! [`Store`](crate::store::Store) moves them onto the blocking pool.

use std::collections::BTreeMap;

use rusqlite::{Connection, params, params_from_iter};
use shelf_catalog::{Game, GameId, TimelineEvent};
use shelf_core::{Entity, Primitive, TableDef, encode};
use thiserror::Error;

use crate::convert::to_sql;
use crate::schema::COOKIES_TABLE;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {table} with id {id}")]
    NotFound { table: &'static str, id: i64 },
    #[error("Id {id} is already taken in {table}")]
    IdCollision { table: &'static str, id: i64 },
}

/// Encode an entity's values in column order.
pub fn encode_row<E: Entity>(entity: &E) -> Vec<Primitive> {
    E::TABLE
        .columns
        .iter()
        .zip(entity.to_row())
        .map(|(column, value)| encode(&value, &column.field.ty))
        .collect()
}

/// Insert one row of already-encoded values, given in column order.
pub fn insert_row(
    conn: &Connection,
    table: &TableDef,
    values: &[Primitive],
) -> Result<(), OperationError> {
    let placeholders = (1..=values.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        table.column_list(),
        placeholders
    );
    conn.execute(&sql, params_from_iter(values.iter().map(to_sql)))?;
    Ok(())
}

/// Insert an entity as a new row.
pub fn insert<E: Entity>(conn: &Connection, entity: &E) -> Result<(), OperationError> {
    insert_row(conn, &E::TABLE, &encode_row(entity))
}

/// Insert a row of column defaults and return its generated id.
pub fn insert_default_returning(conn: &Connection, table: &TableDef) -> Result<i64, OperationError> {
    conn.execute(&format!("INSERT INTO {} DEFAULT VALUES", table.name), [])?;
    Ok(conn.last_insert_rowid())
}

/// Rewrite a single column of the row with the given id.
pub fn write_field(
    conn: &Connection,
    table: &'static str,
    id: i64,
    column: &str,
    value: &Primitive,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        &format!("UPDATE {table} SET \"{column}\" = ?1 WHERE id = ?2"),
        params![to_sql(value), id],
    )?;
    if changed == 0 {
        return Err(OperationError::NotFound { table, id });
    }
    Ok(())
}

/// Delete the row with the given id. Returns whether a row existed.
pub fn delete(conn: &Connection, table: &str, id: i64) -> Result<bool, OperationError> {
    let deleted = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
    Ok(deleted > 0)
}

pub fn game_exists(conn: &Connection, id: GameId) -> Result<bool, OperationError> {
    let exists = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", Game::TABLE.name),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Move a game to a new id together with its timeline events.
///
/// Runs in one transaction: either both tables follow the new id or neither
/// does. Fails with `IdCollision` before touching anything if `new_id` is
/// taken.
pub fn renumber_game(
    conn: &mut Connection,
    old_id: GameId,
    new_id: GameId,
) -> Result<(), OperationError> {
    let tx = conn.transaction()?;
    if game_exists(&tx, new_id)? {
        return Err(OperationError::IdCollision {
            table: Game::TABLE.name,
            id: new_id,
        });
    }
    let moved = tx.execute(
        &format!("UPDATE {} SET id = ?1 WHERE id = ?2", Game::TABLE.name),
        [new_id, old_id],
    )?;
    if moved == 0 {
        return Err(OperationError::NotFound {
            table: Game::TABLE.name,
            id: old_id,
        });
    }
    let events = tx.execute(
        &format!(
            "UPDATE {} SET game_id = ?1 WHERE game_id = ?2",
            TimelineEvent::TABLE.name
        ),
        [new_id, old_id],
    )?;
    tx.commit()?;
    log::debug!("Renumbered game {old_id} -> {new_id} ({events} timeline events)");
    Ok(())
}

pub fn insert_timeline_event(conn: &Connection, event: &TimelineEvent) -> Result<(), OperationError> {
    insert(conn, event)
}

/// Delete every timeline event of a game. Returns the number removed.
///
/// Events with a NULL `game_id` are matched by id 0.
pub fn delete_timeline_events(conn: &Connection, game_id: GameId) -> Result<usize, OperationError> {
    let deleted = conn.execute(
        &format!(
            "DELETE FROM {} WHERE COALESCE(game_id, 0) = ?1",
            TimelineEvent::TABLE.name
        ),
        [game_id],
    )?;
    Ok(deleted)
}

/// Replace the whole cookie table with `cookies`.
pub fn replace_cookies(
    conn: &mut Connection,
    cookies: &BTreeMap<String, String>,
) -> Result<(), OperationError> {
    let tx = conn.transaction()?;
    tx.execute(&format!("DELETE FROM {}", COOKIES_TABLE.name), [])?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} (key, value) VALUES (?1, ?2)",
            COOKIES_TABLE.name
        ))?;
        for (key, value) in cookies {
            stmt.execute(params![key, value])?;
        }
    }
    tx.commit()?;
    Ok(())
}
