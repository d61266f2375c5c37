//! Compile-time descriptions of field types, fields and tables.
//!
//! Every persisted entity declares its columns as a `const` slice of
//! [`ColumnDef`]s. The codec dispatches on [`TypeDescriptor`] alone, so the
//! conversion for each column is fixed where the column is declared.

/// Members of an integer-backed enum as stored in the database.
#[derive(Debug, PartialEq)]
pub struct EnumSpec {
    pub name: &'static str,
    /// `(ordinal, display name)` pairs.
    pub members: &'static [(i64, &'static str)],
    /// Member substituted for an unknown ordinal. With `None`, unknown
    /// ordinals are invalid: top-level fields fall back to the first member
    /// and sequence items are dropped.
    pub fallback: Option<i64>,
}

impl EnumSpec {
    pub fn contains(&self, ordinal: i64) -> bool {
        self.members.iter().any(|(o, _)| *o == ordinal)
    }

    pub fn name_of(&self, ordinal: i64) -> Option<&'static str> {
        self.members
            .iter()
            .find(|(o, _)| *o == ordinal)
            .map(|(_, name)| *name)
    }

    /// Resolve a stored ordinal, applying the fallback member if unknown.
    pub fn resolve(&self, ordinal: i64) -> Option<i64> {
        if self.contains(ordinal) {
            Some(ordinal)
        } else {
            self.fallback
        }
    }

    /// The member used when nothing valid was stored.
    pub fn default_ordinal(&self) -> i64 {
        self.fallback
            .or_else(|| self.members.first().map(|(o, _)| *o))
            .unwrap_or(0)
    }
}

/// The semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeDescriptor {
    Int,
    Real,
    Text,
    Bool,
    Enum(&'static EnumSpec),
    Timestamp,
    Optional(&'static TypeDescriptor),
    Sequence(&'static TypeDescriptor),
    /// 3 or 4 float channels in `[0, 1]`.
    Color,
    Record(&'static [FieldDescriptor]),
}

/// A named, typed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: TypeDescriptor,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, ty: TypeDescriptor) -> Self {
        Self { name, ty }
    }
}

/// A field plus the SQL used to declare its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    pub field: FieldDescriptor,
    /// Everything after the column name, e.g. `TEXT DEFAULT '[]'`.
    pub sql: &'static str,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: TypeDescriptor, sql: &'static str) -> Self {
        Self {
            field: FieldDescriptor::new(name, ty),
            sql,
        }
    }

    pub fn name(&self) -> &'static str {
        self.field.name
    }
}

/// One table per entity kind, one column per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Comma-separated column names in declaration order.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
