//! The change sink bound to every loaded entity.

use std::sync::Arc;

use shelf_core::{ChangeSink, FieldChange};
use shelf_db::WriteQueue;

use crate::collaborators::StaleNotifier;

/// Queues each field change for the writer and marks the view stale.
///
/// Neither step waits, so setters stay synchronous.
pub struct Persistence {
    queue: WriteQueue,
    stale: Arc<dyn StaleNotifier>,
}

impl Persistence {
    pub fn new(queue: WriteQueue, stale: Arc<dyn StaleNotifier>) -> Self {
        Self { queue, stale }
    }
}

impl ChangeSink for Persistence {
    fn field_changed(&self, change: FieldChange) {
        self.queue.enqueue(change);
        self.stale.notify_stale();
    }
}
