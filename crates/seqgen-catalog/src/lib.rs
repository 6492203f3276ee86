//! Catalog rows and model descriptors for seqgen.
//!
//! This crate contains the plain data types shared by the introspection layer
//! (which produces [`CatalogColumnRow`] and [`ForeignKeyRow`] values) and the
//! emitter (which consumes [`ModelDescriptor`] values). It has no knowledge of
//! Postgres connections or of the generated language.

use indexmap::IndexMap;
use std::fmt;

/// Constraint type string for primary key membership.
pub const PRIMARY_KEY: &str = "PRIMARY KEY";

/// Constraint type string for foreign key membership.
pub const FOREIGN_KEY: &str = "FOREIGN KEY";

// =============================================================================
// Catalog rows
// =============================================================================

/// Raw facts about one column, as returned by the catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogColumnRow {
    /// Column name
    pub name: String,
    /// 1-indexed position in the table
    pub ordinal_position: i32,
    /// Raw default expression (e.g. `nextval('post_id_seq'::regclass)`)
    pub default: Option<String>,
    /// Whether the column allows NULL
    pub nullable: bool,
    /// `information_schema` data type (e.g. `character varying`, `ARRAY`)
    pub data_type: String,
    /// Maximum length for character types
    pub character_maximum_length: Option<i32>,
    /// Precision for numeric types
    pub numeric_precision: Option<i32>,
    /// Underlying type name: the enum type name for `USER-DEFINED` columns,
    /// the formatted element type (e.g. `integer[]`) for arrays.
    pub underlying_type: Option<String>,
    /// Enum labels, in sort order (empty unless the column is enum-typed)
    pub enum_labels: Vec<String>,
    /// Constraint types this column participates in (`PRIMARY KEY`, `FOREIGN KEY`, ...)
    pub constraint_types: Vec<String>,
}

impl CatalogColumnRow {
    /// Check if the column is part of a constraint of the given type.
    pub fn has_constraint(&self, constraint_type: &str) -> bool {
        self.constraint_types
            .iter()
            .any(|c| c.eq_ignore_ascii_case(constraint_type))
    }

    /// Whether the column is part of the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.has_constraint(PRIMARY_KEY)
    }

    /// Whether the column is part of a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        self.has_constraint(FOREIGN_KEY)
    }
}

/// One foreign key column, as returned by the catalog join query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKeyRow {
    /// Constraint name
    pub constraint_name: String,
    /// Table owning the foreign key
    pub table_name: String,
    /// Column in the owning table
    pub column_name: String,
    /// Referenced table
    pub foreign_table_name: String,
    /// Referenced column
    pub foreign_column_name: String,
    /// Table referenced by the other foreign key sharing this row's primary
    /// key constraint. Only set when the owning table is a pivot table.
    pub other_table: Option<String>,
    /// Owning column of that other foreign key.
    pub other_column: Option<String>,
}

impl ForeignKeyRow {
    /// Whether this row is one side of a pivot (join) table.
    pub fn is_pivot_side(&self) -> bool {
        self.other_table.is_some()
    }
}

// =============================================================================
// Type classification
// =============================================================================

/// Storage type tag of a column, as understood by the target ORM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    Integer,
    Double,
    /// Variable-length string with an optional maximum length
    String(Option<u32>),
    /// Fixed-length string with an optional length
    Char(Option<u32>),
    DateOnly,
    Date,
    Jsonb,
    Json,
    Boolean,
    /// Enum with its labels, in sort order
    Enum(Vec<String>),
    Text,
    /// Array of the element storage type
    Array(Box<StorageType>),
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Integer => write!(f, "INTEGER"),
            StorageType::Double => write!(f, "DOUBLE"),
            StorageType::String(Some(size)) => write!(f, "STRING({})", size),
            StorageType::String(None) => write!(f, "STRING"),
            StorageType::Char(Some(size)) => write!(f, "CHAR({})", size),
            StorageType::Char(None) => write!(f, "CHAR"),
            StorageType::DateOnly => write!(f, "DATEONLY"),
            StorageType::Date => write!(f, "DATE"),
            StorageType::Jsonb => write!(f, "JSONB"),
            StorageType::Json => write!(f, "JSON"),
            StorageType::Boolean => write!(f, "BOOLEAN"),
            StorageType::Enum(labels) => {
                let quoted: Vec<String> = labels.iter().map(|l| quote_label(l)).collect();
                write!(f, "ENUM({})", quoted.join(", "))
            }
            StorageType::Text => write!(f, "TEXT"),
            StorageType::Array(inner) => write!(f, "ARRAY({})", inner),
        }
    }
}

/// Single-quote a string for generated code.
///
/// The result stays on one line: line terminators are written as escapes.
pub fn quote_label(label: &str) -> String {
    let mut quoted = String::with_capacity(label.len() + 2);
    quoted.push('\'');
    for c in label.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Scalar kind used for typing the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Number,
    String,
    Date,
    Object,
    Boolean,
    Array(Box<ScalarKind>),
}

impl ScalarKind {
    pub fn is_number(&self) -> bool {
        matches!(self, ScalarKind::Number)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, ScalarKind::Boolean)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ScalarKind::Array(_))
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Number => write!(f, "number"),
            ScalarKind::String => write!(f, "string"),
            ScalarKind::Date => write!(f, "Date"),
            ScalarKind::Object => write!(f, "object"),
            ScalarKind::Boolean => write!(f, "boolean"),
            ScalarKind::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// Result of classifying a raw SQL type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub storage: StorageType,
    pub scalar: ScalarKind,
    /// Original type name for enums, underlying array type for arrays
    pub comment: Option<String>,
}

// =============================================================================
// Defaults
// =============================================================================

/// A resolved default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// A JSON literal, kept as the raw text from the catalog
    Json(String),
    CurrentTimestamp,
    EmptyArray,
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::String(s) => write!(f, "{:?}", s),
            DefaultValue::Number(n) => write!(f, "{}", n),
            DefaultValue::Boolean(b) => write!(f, "{}", b),
            DefaultValue::Json(raw) => write!(f, "{}", raw),
            DefaultValue::CurrentTimestamp => write!(f, "CURRENT_TIMESTAMP"),
            DefaultValue::EmptyArray => write!(f, "[]"),
        }
    }
}

/// What the database does when a column is omitted from an insert.
///
/// A column is either auto-incrementing or has a default value, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    AutoIncrement,
    Value(DefaultValue),
}

// =============================================================================
// Descriptors
// =============================================================================

/// A normalized column, ready for emission.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Logical (property) name, possibly camel-cased
    pub name: String,
    /// Physical column name
    pub field: String,
    pub storage: StorageType,
    pub scalar: ScalarKind,
    pub comment: Option<String>,
    pub primary_key: bool,
    pub foreign_key: bool,
    pub allow_null: bool,
    pub default: Option<ColumnDefault>,
}

impl ColumnDescriptor {
    pub fn auto_increment(&self) -> bool {
        matches!(self.default, Some(ColumnDefault::AutoIncrement))
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        match &self.default {
            Some(ColumnDefault::Value(value)) => Some(value),
            _ => None,
        }
    }
}

/// Kind of association between two models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// The source table holds a foreign key to the target.
    BelongsTo,
    /// Source and target are linked through a pivot table.
    BelongsToMany,
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationKind::BelongsTo => write!(f, "belongsTo"),
            AssociationKind::BelongsToMany => write!(f, "belongsToMany"),
        }
    }
}

/// A normalized relation from one table to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDescriptor {
    pub kind: AssociationKind,
    /// Table the association is declared on
    pub source_table: String,
    /// Table the association points at
    pub target_table: String,
    /// Model type name of the target
    pub target_model: String,
    /// Pivot table (many-to-many only)
    pub through: Option<String>,
    /// Foreign key column: on the source table for belongsTo, on the pivot
    /// table (pointing back at the source) for many-to-many
    pub foreign_key: String,
    /// Model attribute holding `foreign_key`
    pub foreign_key_attribute: String,
    /// Pivot column pointing at the target (many-to-many only)
    pub other_key: Option<String>,
    /// Model attribute holding `other_key`
    pub other_key_attribute: Option<String>,
    /// Property name used for the association
    pub alias: String,
}

/// Everything the emitter needs to know about one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Table name
    pub table_name: String,
    /// Model type name (singularized, pascal-cased)
    pub type_name: String,
    /// Columns, in ordinal order
    pub columns: Vec<ColumnDescriptor>,
    /// Associations keyed by target table
    pub associations: IndexMap<String, AssociationDescriptor>,
    /// Table referenced by each foreign key column, including the columns of
    /// a pivot table
    pub foreign_key_targets: IndexMap<String, String>,
}

impl ModelDescriptor {
    /// Get a column by physical name.
    pub fn column(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Iterate over primary key columns.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.primary_key)
    }
}

#[cfg(test)]
mod tests;
