//! User-defined labels and tabs.

use shelf_core::{Binding, Color, TypeDescriptor};

use crate::game::{LabelId, TabId};

/// `#696969`
pub const DEFAULT_LABEL_COLOR: Color = Color::rgb(105.0 / 255.0, 105.0 / 255.0, 105.0 / 255.0);

const OPTIONAL_COLOR: TypeDescriptor = TypeDescriptor::Optional(&TypeDescriptor::Color);

#[derive(Debug)]
pub struct Label {
    id: LabelId,
    data: LabelData,
    binding: Binding,
}

persisted_fields! {
    Label / LabelData / LabelField {
        table: "labels",
        id: "INTEGER PRIMARY KEY AUTOINCREMENT",
        Name: name / set_name: String = String::new()
            => "name", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Color: color / set_color: Color = DEFAULT_LABEL_COLOR
            => "color", TypeDescriptor::Color, "TEXT DEFAULT '#696969'";
        Position: position / set_position: i64 = 0
            => "position", TypeDescriptor::Int, "INTEGER DEFAULT 0";
    }
}

impl Label {
    pub fn new(id: LabelId) -> Self {
        Self::from_parts(id, LabelData::default())
    }

    fn from_parts(id: LabelId, data: LabelData) -> Self {
        Self {
            id,
            data,
            binding: Binding::unbound(),
        }
    }

    pub fn id(&self) -> LabelId {
        self.id
    }

    /// First letter of each word, e.g. "Must Play" -> "MP".
    pub fn short_name(&self) -> String {
        self.data
            .name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

/// A tab that games can be moved into. `color` is absent until the user
/// picks one.
#[derive(Debug)]
pub struct Tab {
    id: TabId,
    data: TabData,
    binding: Binding,
}

persisted_fields! {
    Tab / TabData / TabField {
        table: "tabs",
        id: "INTEGER PRIMARY KEY AUTOINCREMENT",
        Name: name / set_name: String = String::new()
            => "name", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Icon: icon / set_icon: String = String::new()
            => "icon", TypeDescriptor::Text, "TEXT DEFAULT ''";
        Color: color / set_color: Option<Color> = None
            => "color", OPTIONAL_COLOR, "TEXT DEFAULT NULL";
        Position: position / set_position: i64 = 0
            => "position", TypeDescriptor::Int, "INTEGER DEFAULT 0";
    }
}

impl Tab {
    pub fn new(id: TabId) -> Self {
        Self::from_parts(id, TabData::default())
    }

    fn from_parts(id: TabId, data: TabData) -> Self {
        Self {
            id,
            data,
            binding: Binding::unbound(),
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{Entity, Primitive, RecordingSink, Row, Value};

    #[test]
    fn default_label_color_is_dim_grey() {
        assert_eq!(Label::new(1).color().to_hex(), "#696969");
    }

    #[test]
    fn short_name_takes_initials() {
        let mut label = Label::new(1);
        label.set_name("Must Play Soon".to_string());
        assert_eq!(label.short_name(), "MPS");
    }

    #[test]
    fn tab_color_absent_encodes_null() {
        let sink = RecordingSink::new();
        let mut tab = Tab::new(2);
        tab.bind(Binding::new(sink.clone()));
        tab.set_color(Some(Color::rgb(1.0, 0.0, 0.0)));
        tab.set_color(None);
        let values: Vec<_> = sink.changes().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec![Primitive::Text("#FF0000".into()), Primitive::Null]);
    }

    #[test]
    fn from_row_fills_missing_columns_with_defaults() {
        let mut row = Row::new();
        row.insert("id", Value::Int(9));
        row.insert("name", Value::Text("Fav".into()));
        let label = Label::from_row(row);
        assert_eq!(label.id(), 9);
        assert_eq!(label.name(), "Fav");
        assert_eq!(*label.position(), 0);
        assert_eq!(label.to_row().len(), Label::TABLE.columns.len());
    }
}
