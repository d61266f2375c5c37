//! SQLite persistence layer for the game library.
//!
//! Provides schema creation, row operations, and queries backed by SQLite
//! (via rusqlite with the bundled feature), plus an async [`Store`] and the
//! background [`Writer`] that applies field changes in order.

mod convert;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;
pub mod writer;

pub use operations::{
    OperationError, delete, delete_timeline_events, encode_row, game_exists, insert,
    insert_default_returning, insert_row, insert_timeline_event, renumber_game, replace_cookies,
    write_field,
};
pub use queries::{
    all_timeline_events, count_rows, orphaned_event_game_ids, read_all, read_cookies, read_field,
    timeline_events_for,
};
pub use schema::{COOKIES_TABLE, SchemaError, TABLES, create_schema, open_database, open_memory};
pub use store::{Store, StoreError};
pub use writer::{ErrorReporter, LogReporter, WriteQueue, Writer};
