//! Mapping from Postgres data types to storage types and scalar kinds.
//!
//! The mapping is total over the types listed below; anything else is an
//! [`UnrecognizedType`] error. There is no fallback classification.

use seqgen_catalog::{CatalogColumnRow, Classification, ScalarKind, StorageType};

/// A data type outside the supported mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized data type `{0}`")]
pub struct UnrecognizedType(pub String);

/// Classify a catalog column row.
pub fn classify_row(row: &CatalogColumnRow) -> Result<Classification, UnrecognizedType> {
    classify(
        &row.data_type,
        row.character_maximum_length,
        row.underlying_type.as_deref(),
        &row.enum_labels,
    )
}

/// Classify a raw data type name.
///
/// - `max_length` is the size parameter for character types.
/// - `underlying` is the enum type name for `USER-DEFINED` types, or the
///   formatted element type (e.g. `integer[]`) for `ARRAY`.
/// - `enum_labels` are the labels of the enum type (or of the array's element
///   type), empty otherwise.
pub fn classify(
    data_type: &str,
    max_length: Option<i32>,
    underlying: Option<&str>,
    enum_labels: &[String],
) -> Result<Classification, UnrecognizedType> {
    let size = max_length.and_then(|len| u32::try_from(len).ok());

    let (storage, scalar, comment) = match data_type {
        "smallint" | "integer" | "bigint" => (StorageType::Integer, ScalarKind::Number, None),
        "real" | "double precision" | "numeric" => {
            (StorageType::Double, ScalarKind::Number, None)
        }
        "character varying" => (StorageType::String(size), ScalarKind::String, None),
        "character" => (StorageType::Char(size), ScalarKind::String, None),
        "text" => (StorageType::Text, ScalarKind::String, None),
        "uuid" | "time without time zone" | "time with time zone" => {
            (StorageType::String(None), ScalarKind::String, None)
        }
        "date" => (StorageType::DateOnly, ScalarKind::Date, None),
        "timestamp without time zone" | "timestamp with time zone" => {
            (StorageType::Date, ScalarKind::Date, None)
        }
        "json" => (StorageType::Json, ScalarKind::Object, None),
        "jsonb" => (StorageType::Jsonb, ScalarKind::Object, None),
        "boolean" => (StorageType::Boolean, ScalarKind::Boolean, None),
        "USER-DEFINED" if !enum_labels.is_empty() => (
            StorageType::Enum(enum_labels.to_vec()),
            ScalarKind::String,
            underlying.map(str::to_string),
        ),
        "ARRAY" => {
            let Some(array_type) = underlying else {
                return Err(UnrecognizedType(data_type.to_string()));
            };
            let element_type = array_type.strip_suffix("[]").unwrap_or(array_type);
            let element = classify_element(element_type, enum_labels)?;
            (
                StorageType::Array(Box::new(element.storage)),
                ScalarKind::Array(Box::new(element.scalar)),
                Some(array_type.to_string()),
            )
        }
        other => return Err(UnrecognizedType(other.to_string())),
    };

    Ok(Classification {
        storage,
        scalar,
        comment,
    })
}

/// Classify an array element type. Element names come from `format_type`,
/// which spells built-in types like `data_type` does and enums by their name.
fn classify_element(
    element_type: &str,
    enum_labels: &[String],
) -> Result<Classification, UnrecognizedType> {
    match classify(element_type, None, None, &[]) {
        Ok(classification) => Ok(classification),
        Err(_) if !enum_labels.is_empty() => {
            classify("USER-DEFINED", None, Some(element_type), enum_labels)
        }
        Err(e) => Err(e),
    }
}

/// Every data type name the classifier accepts without extra parameters.
pub const SUPPORTED_TYPES: &[&str] = &[
    "smallint",
    "integer",
    "bigint",
    "real",
    "double precision",
    "numeric",
    "character varying",
    "character",
    "text",
    "uuid",
    "time without time zone",
    "time with time zone",
    "date",
    "timestamp without time zone",
    "timestamp with time zone",
    "json",
    "jsonb",
    "boolean",
];
