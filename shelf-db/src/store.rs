//! Async facade over the single library connection.
//!
//! The connection lives behind a mutex and every call runs on tokio's
//! blocking pool, so callers on the async runtime never block on SQLite.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use shelf_catalog::{GameId, TimelineEvent};
use shelf_core::{Entity, FieldChange, Primitive, TableDef};
use thiserror::Error;

use crate::operations::{self, OperationError};
use crate::queries;
use crate::schema::{self, SchemaError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("database connection lock poisoned")]
    Poisoned,
    #[error("database writer has stopped")]
    WriterClosed,
}

/// Cloneable handle to the library database.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open or create the database file, creating missing tables.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let conn = tokio::task::spawn_blocking(move || schema::open_database(&path)).await??;
        Ok(Self::from_connection(conn))
    }

    pub async fn open_memory() -> Result<Self, StoreError> {
        let conn = tokio::task::spawn_blocking(schema::open_memory).await??;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, OperationError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard).map_err(StoreError::from)
        })
        .await?
    }

    pub async fn read_all<E>(&self) -> Result<Vec<E>, StoreError>
    where
        E: Entity + Send + 'static,
    {
        self.call(|conn| queries::read_all::<E>(conn)).await
    }

    pub async fn insert<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let table = E::TABLE;
        let values = operations::encode_row(entity);
        self.call(move |conn| operations::insert_row(conn, &table, &values))
            .await
    }

    pub async fn insert_default_returning(&self, table: TableDef) -> Result<i64, StoreError> {
        self.call(move |conn| operations::insert_default_returning(conn, &table))
            .await
    }

    pub async fn write_field(&self, change: FieldChange) -> Result<(), StoreError> {
        self.call(move |conn| {
            operations::write_field(conn, change.table, change.id, change.column, &change.value)
        })
        .await
    }

    pub async fn read_field(
        &self,
        table: &'static str,
        id: i64,
        column: &'static str,
    ) -> Result<Option<Primitive>, StoreError> {
        self.call(move |conn| queries::read_field(conn, table, id, column))
            .await
    }

    pub async fn delete(&self, table: &'static str, id: i64) -> Result<bool, StoreError> {
        self.call(move |conn| operations::delete(conn, table, id)).await
    }

    pub async fn game_exists(&self, id: GameId) -> Result<bool, StoreError> {
        self.call(move |conn| operations::game_exists(conn, id)).await
    }

    pub async fn renumber_game(&self, old_id: GameId, new_id: GameId) -> Result<(), StoreError> {
        self.call(move |conn| operations::renumber_game(conn, old_id, new_id))
            .await
    }

    pub async fn insert_timeline_event(&self, event: &TimelineEvent) -> Result<(), StoreError> {
        self.insert(event).await
    }

    pub async fn delete_timeline_events(&self, game_id: GameId) -> Result<usize, StoreError> {
        self.call(move |conn| operations::delete_timeline_events(conn, game_id))
            .await
    }

    pub async fn timeline_events_for(
        &self,
        game_id: GameId,
    ) -> Result<Vec<TimelineEvent>, StoreError> {
        self.call(move |conn| queries::timeline_events_for(conn, game_id))
            .await
    }

    pub async fn all_timeline_events(&self) -> Result<Vec<TimelineEvent>, StoreError> {
        self.call(|conn| queries::all_timeline_events(conn)).await
    }

    pub async fn replace_cookies(
        &self,
        cookies: BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        self.call(move |conn| operations::replace_cookies(conn, &cookies))
            .await
    }

    pub async fn read_cookies(&self) -> Result<BTreeMap<String, String>, StoreError> {
        self.call(|conn| queries::read_cookies(conn)).await
    }

    pub async fn count_rows(&self, table: &'static str) -> Result<i64, StoreError> {
        self.call(move |conn| queries::count_rows(conn, table)).await
    }

    pub async fn orphaned_event_game_ids(&self) -> Result<Vec<GameId>, StoreError> {
        self.call(|conn| queries::orphaned_event_game_ids(conn)).await
    }
}
