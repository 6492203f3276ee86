//! Foreign key rows to associations.
//!
//! A foreign key row that carries `other_table` is one side of a pivot table:
//! a table whose primary key is made of exactly two foreign key columns. Each
//! side registers a many-to-many association on the table it references,
//! pointing at the table the other side references. Every other row is a plain
//! belongs-to on the table that owns the foreign key.
//!
//! Key attributes start out as the physical column names; the assembler
//! renames them when properties are camel-cased.
//!
//! Pivot tables with a surrogate primary key are not recognized and produce
//! two belongs-to associations instead.

use indexmap::IndexMap;
use seqgen_catalog::{AssociationDescriptor, AssociationKind, ForeignKeyRow};

use crate::naming::{camel_case, model_name, pluralize, singularize};

/// Raw associations per table, in foreign key scan order.
///
/// Lists are not deduplicated here: a table with two foreign keys to the same
/// target has two entries. The assembler keeps the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationMap {
    by_table: IndexMap<String, Vec<AssociationDescriptor>>,
}

impl AssociationMap {
    /// Resolve every foreign key row of a schema.
    pub fn resolve(rows: &[ForeignKeyRow]) -> Self {
        let mut map = Self::default();
        for row in rows {
            map.register(row);
        }
        map
    }

    /// Associations declared on `table`, empty if it has none.
    pub fn for_table(&self, table: &str) -> &[AssociationDescriptor] {
        self.by_table.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Many-to-many associations that go through the pivot table `table`.
    pub fn through<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a AssociationDescriptor> {
        self.by_table
            .values()
            .flatten()
            .filter(move |a| a.through.as_deref() == Some(table))
    }

    /// Total number of raw associations.
    pub fn len(&self) -> usize {
        self.by_table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }

    fn register(&mut self, row: &ForeignKeyRow) {
        let association = match (&row.other_table, &row.other_column) {
            (Some(other_table), Some(other_column)) => AssociationDescriptor {
                kind: AssociationKind::BelongsToMany,
                source_table: row.foreign_table_name.clone(),
                target_table: other_table.clone(),
                target_model: model_name(other_table),
                through: Some(row.table_name.clone()),
                foreign_key: row.column_name.clone(),
                foreign_key_attribute: row.column_name.clone(),
                other_key: Some(other_column.clone()),
                other_key_attribute: Some(other_column.clone()),
                alias: camel_case(&pluralize(&singularize(other_table))),
            },
            _ => AssociationDescriptor {
                kind: AssociationKind::BelongsTo,
                source_table: row.table_name.clone(),
                target_table: row.foreign_table_name.clone(),
                target_model: model_name(&row.foreign_table_name),
                through: None,
                foreign_key: row.column_name.clone(),
                foreign_key_attribute: row.column_name.clone(),
                other_key: None,
                other_key_attribute: None,
                alias: camel_case(&row.foreign_table_name),
            },
        };

        tracing::debug!(
            kind = %association.kind,
            source = %association.source_table,
            target = %association.target_table,
            constraint = %row.constraint_name,
            "resolved association"
        );

        self.by_table
            .entry(association.source_table.clone())
            .or_default()
            .push(association);
    }
}
