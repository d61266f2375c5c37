//! Declarative builders for catalog enums and reactive entities.

/// Declare an integer-backed enum together with its [`EnumSpec`].
///
/// [`EnumSpec`]: shelf_core::EnumSpec
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident / $spec:ident (fallback: $fallback:expr) {
            $( $variant:ident = $ordinal:literal => $display:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )*
        }

        pub const $spec: ::shelf_core::EnumSpec = ::shelf_core::EnumSpec {
            name: stringify!($name),
            members: &[ $( ($ordinal, $display), )* ],
            fallback: $fallback,
        };

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )* ];

            pub const fn ordinal(self) -> i64 {
                match self {
                    $( Self::$variant => $ordinal, )*
                }
            }

            pub fn from_ordinal(ordinal: i64) -> Option<Self> {
                match ordinal {
                    $( $ordinal => Some(Self::$variant), )*
                    _ => None,
                }
            }

            pub const fn display_name(self) -> &'static str {
                match self {
                    $( Self::$variant => $display, )*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.display_name())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::types::UnknownVariant;

            /// Accepts the display name or the variant name, ignoring case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.display_name().eq_ignore_ascii_case(s)
                            || format!("{v:?}").eq_ignore_ascii_case(s)
                    })
                    .ok_or_else(|| $crate::types::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl ::shelf_core::FieldValue for $name {
            fn to_value(&self) -> ::shelf_core::Value {
                ::shelf_core::Value::Enum(self.ordinal())
            }

            fn from_value(value: ::shelf_core::Value) -> Option<Self> {
                match value {
                    ::shelf_core::Value::Enum(o) | ::shelf_core::Value::Int(o) => Self::from_ordinal(o),
                    _ => None,
                }
            }
        }
    };
}

/// Declare the persisted fields of an entity.
///
/// Generates the `$field_enum` column enum, a private `$data` struct holding
/// the field values, one getter and one write-through setter per field, and
/// the [`Entity`] impl. The entity struct itself must have `id: i64`,
/// `data: $data` and `binding: Binding` fields and a
/// `fn from_parts(id, data) -> Self` constructor.
///
/// [`Entity`]: shelf_core::Entity
macro_rules! persisted_fields {
    (
        $entity:ident / $data:ident / $field_enum:ident {
            table: $table:literal,
            id: $id_sql:literal,
            $(
                $variant:ident: $field:ident / $setter:ident : $ty:ty = $default:expr
                    => $column:literal, $desc:expr, $sql:literal;
            )*
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $field_enum {
            $( $variant, )*
        }

        impl $field_enum {
            pub const ALL: &'static [$field_enum] = &[ $( $field_enum::$variant, )* ];

            pub const fn column(self) -> ::shelf_core::ColumnDef {
                match self {
                    $( Self::$variant => ::shelf_core::ColumnDef::new($column, $desc, $sql), )*
                }
            }

            pub fn from_column(name: &str) -> Option<Self> {
                match name {
                    $( $column => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }

        #[derive(Debug, Clone, PartialEq)]
        pub(crate) struct $data {
            $( pub(crate) $field: $ty, )*
        }

        impl Default for $data {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        impl $data {
            fn from_row(row: &mut ::shelf_core::Row) -> Self {
                let defaults = Self::default();
                Self {
                    $( $field: row.take_or($column, defaults.$field), )*
                }
            }

            fn values(&self) -> Vec<::shelf_core::Value> {
                use ::shelf_core::FieldValue as _;
                vec![ $( self.$field.to_value(), )* ]
            }

            fn value_of(&self, field: $field_enum) -> ::shelf_core::Value {
                use ::shelf_core::FieldValue as _;
                match field {
                    $( $field_enum::$variant => self.$field.to_value(), )*
                }
            }
        }

        impl $entity {
            $(
                pub fn $field(&self) -> &$ty {
                    &self.data.$field
                }

                pub fn $setter(&mut self, value: $ty) {
                    ::shelf_core::FieldValue::assign(&mut self.data.$field, value);
                    self.persist($field_enum::$variant);
                }
            )*

            /// Encode the current value of `field` and hand it to the sink.
            fn persist(&self, field: $field_enum) {
                if !self.binding.is_bound() {
                    return;
                }
                let column = field.column();
                let value = ::shelf_core::encode(&self.data.value_of(field), &column.field.ty);
                self.binding.emit(::shelf_core::FieldChange {
                    table: $table,
                    id: self.id,
                    column: column.name(),
                    value,
                });
            }

            pub fn binding(&self) -> &::shelf_core::Binding {
                &self.binding
            }

            /// Attach to a sink; later setter calls write through.
            pub fn bind(&mut self, binding: ::shelf_core::Binding) {
                self.binding = binding;
            }

            pub fn detach(&mut self) {
                self.binding = ::shelf_core::Binding::unbound();
            }
        }

        impl ::shelf_core::Entity for $entity {
            const TABLE: ::shelf_core::TableDef = ::shelf_core::TableDef {
                name: $table,
                columns: &[
                    ::shelf_core::ColumnDef::new("id", ::shelf_core::TypeDescriptor::Int, $id_sql),
                    $( ::shelf_core::ColumnDef::new($column, $desc, $sql), )*
                ],
            };

            fn from_row(mut row: ::shelf_core::Row) -> Self {
                let id = row.take::<i64>("id");
                Self::from_parts(id, $data::from_row(&mut row))
            }

            fn to_row(&self) -> Vec<::shelf_core::Value> {
                let mut values = vec![::shelf_core::Value::Int(self.id)];
                values.extend(self.data.values());
                values
            }
        }
    };
}
