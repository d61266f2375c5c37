//! Typed field descriptors and the value codec shared by every shelf crate.
//!
//! Entities describe their columns with [`TableDef`]s; [`codec`] converts
//! between semantic [`Value`]s and storable [`Primitive`]s using those
//! descriptions; [`reactive`] carries field changes from setters to whatever
//! persists them.

pub mod codec;
pub mod color;
pub mod descriptor;
pub mod field;
pub mod reactive;
pub mod timestamp;
pub mod value;

pub use codec::{decode, default_value, encode};
pub use color::Color;
pub use descriptor::{ColumnDef, EnumSpec, FieldDescriptor, TableDef, TypeDescriptor};
pub use field::{Entity, FieldValue, Row};
pub use reactive::{Binding, ChangeSink, FieldChange, RecordingSink};
pub use timestamp::{DEFAULT_DATESTAMP_FORMAT, DEFAULT_TIMESTAMP_FORMAT, Timestamp};
pub use value::{Primitive, Value};

/// Row identifier shared by every table.
pub type RowId = i64;
