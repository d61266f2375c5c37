//! Per-game history entries.

use shelf_core::{ColumnDef, Entity, FieldValue, Row, TableDef, Timestamp, TypeDescriptor, Value};

use crate::game::GameId;
use crate::types::{TIMELINE_EVENT_TYPE, TimelineEventType};

const TEXT_LIST: TypeDescriptor = TypeDescriptor::Sequence(&TypeDescriptor::Text);

/// Something that happened to a game.
///
/// Events are written once and never updated, apart from `game_id` following
/// its game through a renumber. The table has no id column; events are
/// addressed by `game_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    game_id: GameId,
    timestamp: Timestamp,
    arguments: Vec<String>,
    kind: TimelineEventType,
}

impl TimelineEvent {
    /// An event stamped with the current time.
    pub fn new(game_id: GameId, kind: TimelineEventType, arguments: Vec<String>) -> Self {
        Self::at(game_id, Timestamp::now(), kind, arguments)
    }

    pub fn at(
        game_id: GameId,
        timestamp: Timestamp,
        kind: TimelineEventType,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            game_id,
            timestamp,
            arguments,
            kind,
        }
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn kind(&self) -> TimelineEventType {
        self.kind
    }

    /// Point the event at a renumbered game. Not persisted on its own.
    pub fn reassign_game(&mut self, game_id: GameId) {
        self.game_id = game_id;
    }

    /// The human-readable message: the type's template with arguments
    /// substituted in order. Missing arguments render empty.
    pub fn message(&self) -> String {
        let mut args = self.arguments.iter();
        let mut parts = self.kind.template().split("{}");
        let mut out = parts.next().unwrap_or_default().to_string();
        for part in parts {
            if let Some(arg) = args.next() {
                out.push_str(arg);
            }
            out.push_str(part);
        }
        out
    }
}

impl Entity for TimelineEvent {
    const TABLE: TableDef = TableDef {
        name: "timeline_events",
        columns: &[
            ColumnDef::new("game_id", TypeDescriptor::Int, "INTEGER DEFAULT NULL"),
            ColumnDef::new("timestamp", TypeDescriptor::Timestamp, "INTEGER DEFAULT 0"),
            ColumnDef::new("arguments", TEXT_LIST, "TEXT DEFAULT '[]'"),
            ColumnDef::new("type", TypeDescriptor::Enum(&TIMELINE_EVENT_TYPE), "INTEGER DEFAULT 1"),
        ],
    };

    fn from_row(mut row: Row) -> Self {
        Self {
            game_id: row.take("game_id"),
            timestamp: row.take("timestamp"),
            arguments: row.take("arguments"),
            kind: row.take("type"),
        }
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            self.game_id.to_value(),
            self.timestamp.to_value(),
            self.arguments.to_value(),
            self.kind.to_value(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_fills_template() {
        let event = TimelineEvent::at(
            1,
            Timestamp::new(10),
            TimelineEventType::ChangedName,
            vec!["Old".into(), "New".into()],
        );
        assert_eq!(event.message(), "Name changed from \"Old\" to \"New\"");
    }

    #[test]
    fn message_without_placeholders() {
        let event = TimelineEvent::at(1, Timestamp::new(10), TimelineEventType::GameAdded, vec![]);
        assert_eq!(event.message(), "Added to the library");
    }

    #[test]
    fn message_with_missing_arguments() {
        let event = TimelineEvent::at(1, Timestamp::new(10), TimelineEventType::GameLaunched, vec![]);
        assert_eq!(event.message(), "Launched ");
    }

    #[test]
    fn row_round_trip() {
        let event = TimelineEvent::at(
            4,
            Timestamp::new(99),
            TimelineEventType::GameInstalled,
            vec!["1.0".into()],
        );
        let row: Row = TimelineEvent::TABLE
            .columns
            .iter()
            .map(|c| c.name().to_string())
            .zip(event.to_row())
            .collect();
        assert_eq!(TimelineEvent::from_row(row), event);
    }
}
