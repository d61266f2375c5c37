//! Change notifications emitted by entity setters.
//!
//! Entities live in memory and do not know about the database. Each one
//! carries a [`Binding`]; when a persisted field is assigned, the setter
//! encodes the new value and hands a [`FieldChange`] to the bound sink, which
//! schedules the write.

use std::fmt;
use std::sync::Arc;

use crate::value::Primitive;

/// One column of one row that must be rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub table: &'static str,
    pub id: i64,
    pub column: &'static str,
    pub value: Primitive,
}

/// Receives field changes. Implementations must not block.
pub trait ChangeSink: Send + Sync {
    fn field_changed(&self, change: FieldChange);
}

/// Connection between an entity and its sink.
///
/// An unbound entity (fresh from a constructor, or detached after deletion)
/// silently drops its changes.
#[derive(Clone, Default)]
pub struct Binding {
    sink: Option<Arc<dyn ChangeSink>>,
}

impl Binding {
    pub fn new(sink: Arc<dyn ChangeSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.sink.is_some()
    }

    pub fn emit(&self, change: FieldChange) {
        if let Some(sink) = &self.sink {
            sink.field_changed(change);
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Collects changes in memory. Useful for tests of setter behavior.
#[derive(Debug, Default)]
pub struct RecordingSink {
    changes: std::sync::Mutex<Vec<FieldChange>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything received so far, oldest first.
    pub fn changes(&self) -> Vec<FieldChange> {
        self.changes
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl ChangeSink for RecordingSink {
    fn field_changed(&self, change: FieldChange) {
        if let Ok(mut changes) = self.changes.lock() {
            changes.push(change);
        }
    }
}
