use seqgen_catalog::{CatalogColumnRow, ColumnDescriptor, StorageType};

use crate::classify::classify_row;
use crate::defaults::{DefaultContext, resolve_default};
use crate::naming::camel_case;
use crate::{Error, GenerateOptions, Result};

/// Build the descriptor for one column of `table`.
///
/// Returns `Ok(None)` for foreign key columns when foreign keys are excluded.
pub fn build_column(
    table: &str,
    row: &CatalogColumnRow,
    options: &GenerateOptions,
) -> Result<Option<ColumnDescriptor>> {
    let foreign_key = row.is_foreign_key();
    if foreign_key && !options.include_foreign_keys {
        tracing::debug!(table, column = %row.name, "skipping foreign key column");
        return Ok(None);
    }

    let classification = classify_row(row).map_err(|source| Error::UnrecognizedType {
        table: table.to_string(),
        column: row.name.clone(),
        source,
    })?;

    let enum_type = match classification.storage {
        StorageType::Enum(_) => row.underlying_type.as_deref(),
        _ => None,
    };
    let default = resolve_default(
        row.default.as_deref(),
        &DefaultContext {
            scalar: &classification.scalar,
            enum_type,
            detect_sequences: options.detect_sequences,
        },
    );

    let name = if options.camel_case {
        camel_case(&row.name)
    } else {
        row.name.clone()
    };

    Ok(Some(ColumnDescriptor {
        name,
        field: row.name.clone(),
        storage: classification.storage,
        scalar: classification.scalar,
        comment: classification.comment,
        primary_key: row.is_primary_key(),
        foreign_key,
        allow_null: row.nullable,
        default,
    }))
}
