///
/// Record models
///
/// Runtime descriptors supplied per record type: the table a record
/// maps to and the name/kind table consulted for column binding.
/// This is the explicit replacement for runtime field reflection:
/// binding and coercion read these models, never the record itself.
///

///
/// FieldKind
///
/// Minimal primitive surface needed by binding and coercion.
/// Aligned with `Value` variants.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Float,
    Int,
    Text,
}

impl FieldKind {
    /// Stable lowercase label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int => "int",
            Self::Text => "text",
        }
    }
}

///
/// FieldModel
///
/// Runtime field metadata: the column name a field binds to (matched
/// case-insensitively) and its declared kind.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldModel {
    /// Field name as used in predicates and column binding.
    pub name: &'static str,
    /// Declared primitive kind.
    pub kind: FieldKind,
    /// Whether a null column value is an expected state for this field.
    pub nullable: bool,
}

impl FieldModel {
    /// Build a non-nullable field model.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    /// Build a nullable field model.
    #[must_use]
    pub const fn nullable(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

///
/// RecordModel
///
/// Per-record-type descriptor: table name plus ordered field models.
///

#[derive(Clone, Copy, Debug)]
pub struct RecordModel {
    /// Table this record type reads from.
    pub table: &'static str,
    /// Ordered field models; binding order follows this slice.
    pub fields: &'static [FieldModel],
}
