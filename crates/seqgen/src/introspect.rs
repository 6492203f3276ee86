//! Reading the Postgres catalog.
//!
//! [`Catalog`] is the seam between the generator and the database. The
//! Postgres implementation issues one query at a time over a single
//! connection; every column is cast to a plain type (`text`, `int4`) because
//! `information_schema` exposes domain types the driver does not decode.

use std::future::Future;

use seqgen_catalog::{CatalogColumnRow, ForeignKeyRow};
use tokio_postgres::Row;

use crate::Result;
use crate::traced::{Connection, ConnectionExt};

/// Source of catalog rows.
pub trait Catalog {
    /// Base tables of `schema`, in catalog order.
    fn list_tables(&self, schema: &str) -> impl Future<Output = Result<Vec<String>>>;

    /// Columns of one table, ordered by ordinal position.
    fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = Result<Vec<CatalogColumnRow>>>;

    /// Every foreign key column of `schema`, with pivot partners filled in.
    fn list_foreign_keys(&self, schema: &str) -> impl Future<Output = Result<Vec<ForeignKeyRow>>>;
}

const TABLES_SQL: &str = r#"
SELECT table_name::text AS table_name
FROM information_schema.tables
WHERE table_schema::text = $1
  AND table_type = 'BASE TABLE'
"#;

const COLUMNS_SQL: &str = r#"
SELECT
    c.column_name::text AS name,
    c.ordinal_position::int4 AS ordinal_position,
    c.column_default::text AS column_default,
    c.is_nullable::text = 'YES' AS nullable,
    c.data_type::text AS data_type,
    c.character_maximum_length::int4 AS character_maximum_length,
    c.numeric_precision::int4 AS numeric_precision,
    CASE
        WHEN c.data_type::text = 'USER-DEFINED' THEN c.udt_name::text
        WHEN c.data_type::text = 'ARRAY' THEN format_type(a.atttypid, NULL)
    END AS underlying_type,
    ARRAY(
        SELECT e.enumlabel::text
        FROM pg_catalog.pg_enum e
        WHERE e.enumtypid = COALESCE(NULLIF(ty.typelem, 0::oid), ty.oid)
        ORDER BY e.enumsortorder
    ) AS enum_labels,
    ARRAY(
        SELECT DISTINCT tc.constraint_type::text
        FROM information_schema.key_column_usage kcu
        JOIN information_schema.table_constraints tc
          ON tc.constraint_name = kcu.constraint_name
         AND tc.constraint_schema = kcu.constraint_schema
         AND tc.table_name = kcu.table_name
        WHERE kcu.table_schema = c.table_schema
          AND kcu.table_name = c.table_name
          AND kcu.column_name = c.column_name
    ) AS constraint_types
FROM information_schema.columns c
JOIN pg_catalog.pg_namespace n ON n.nspname = c.table_schema::text
JOIN pg_catalog.pg_class cl ON cl.relnamespace = n.oid AND cl.relname = c.table_name::text
JOIN pg_catalog.pg_attribute a ON a.attrelid = cl.oid AND a.attname = c.column_name::text
JOIN pg_catalog.pg_type ty ON ty.oid = a.atttypid
WHERE c.table_schema::text = $1
  AND c.table_name::text = $2
ORDER BY c.ordinal_position
"#;

/// Foreign key columns joined to themselves: a row gets a partner when both
/// it and another foreign key of the same table make up that table's
/// two-column primary key.
const FOREIGN_KEYS_SQL: &str = r#"
WITH fk AS (
    SELECT
        tc.constraint_name::text AS constraint_name,
        tc.table_name::text AS table_name,
        kcu.column_name::text AS column_name,
        ccu.table_name::text AS foreign_table_name,
        ccu.column_name::text AS foreign_column_name
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
      ON kcu.constraint_name = tc.constraint_name
     AND kcu.constraint_schema = tc.constraint_schema
     AND kcu.table_name = tc.table_name
    JOIN information_schema.constraint_column_usage ccu
      ON ccu.constraint_name = tc.constraint_name
     AND ccu.constraint_schema = tc.constraint_schema
    WHERE tc.constraint_type = 'FOREIGN KEY'
      AND tc.table_schema::text = $1
),
pk AS (
    SELECT
        tc.table_name::text AS table_name,
        kcu.column_name::text AS column_name,
        count(*) OVER (PARTITION BY tc.constraint_name) AS width
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
      ON kcu.constraint_name = tc.constraint_name
     AND kcu.constraint_schema = tc.constraint_schema
     AND kcu.table_name = tc.table_name
    WHERE tc.constraint_type = 'PRIMARY KEY'
      AND tc.table_schema::text = $1
)
SELECT
    fk.constraint_name,
    fk.table_name,
    fk.column_name,
    fk.foreign_table_name,
    fk.foreign_column_name,
    other.foreign_table_name AS other_table,
    other.column_name AS other_column
FROM fk
LEFT JOIN fk other
  ON other.table_name = fk.table_name
 AND other.constraint_name <> fk.constraint_name
 AND EXISTS (
     SELECT 1 FROM pk
     WHERE pk.table_name = fk.table_name AND pk.column_name = fk.column_name AND pk.width = 2
 )
 AND EXISTS (
     SELECT 1 FROM pk
     WHERE pk.table_name = other.table_name AND pk.column_name = other.column_name AND pk.width = 2
 )
"#;

/// [`Catalog`] backed by a live Postgres connection.
pub struct PgCatalog<'a, C: Connection> {
    conn: &'a C,
}

impl<'a, C: Connection> PgCatalog<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

impl<C: Connection> Catalog for PgCatalog<'_, C> {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        let rows = self.conn.traced().query(TABLES_SQL, &[&schema]).await?;
        let tables = rows
            .iter()
            .map(|row| row.try_get("table_name"))
            .collect::<std::result::Result<Vec<String>, _>>()?;
        tracing::debug!(schema, count = tables.len(), "listed tables");
        Ok(tables)
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<CatalogColumnRow>> {
        let rows = self
            .conn
            .traced()
            .query(COLUMNS_SQL, &[&schema, &table])
            .await?;
        rows.iter().map(column_row).collect()
    }

    async fn list_foreign_keys(&self, schema: &str) -> Result<Vec<ForeignKeyRow>> {
        let rows = self
            .conn
            .traced()
            .query(FOREIGN_KEYS_SQL, &[&schema])
            .await?;
        rows.iter().map(foreign_key_row).collect()
    }
}

fn column_row(row: &Row) -> Result<CatalogColumnRow> {
    Ok(CatalogColumnRow {
        name: row.try_get("name")?,
        ordinal_position: row.try_get("ordinal_position")?,
        default: row.try_get("column_default")?,
        nullable: row.try_get("nullable")?,
        data_type: row.try_get("data_type")?,
        character_maximum_length: row.try_get("character_maximum_length")?,
        numeric_precision: row.try_get("numeric_precision")?,
        underlying_type: row.try_get("underlying_type")?,
        enum_labels: row.try_get("enum_labels")?,
        constraint_types: row.try_get("constraint_types")?,
    })
}

fn foreign_key_row(row: &Row) -> Result<ForeignKeyRow> {
    Ok(ForeignKeyRow {
        constraint_name: row.try_get("constraint_name")?,
        table_name: row.try_get("table_name")?,
        column_name: row.try_get("column_name")?,
        foreign_table_name: row.try_get("foreign_table_name")?,
        foreign_column_name: row.try_get("foreign_column_name")?,
        other_table: row.try_get("other_table")?,
        other_column: row.try_get("other_column")?,
    })
}
