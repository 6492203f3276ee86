//! Generate sequelize-typescript models from a Postgres catalog.
//!
//! A run has two phases:
//!
//! 1. Read the table list and every foreign key of the schema, and resolve all
//!    associations up front (a table's relations are only known once the whole
//!    foreign key set has been scanned).
//! 2. For each table, in catalog order: read its columns, build column
//!    descriptors, assemble the [`ModelDescriptor`], render it and write it.
//!
//! ```ignore
//! let client = seqgen::connect(&database_url).await?;
//! let catalog = seqgen::PgCatalog::new(&client);
//! let mut sink = seqgen::DirectorySink::create("models")?;
//! seqgen::generate(&catalog, &GenerateOptions::default(), &mut sink).await?;
//! ```
//!
//! # Naming Convention
//!
//! Model names are the singularized, pascal-cased table name: `post_tags`
//! becomes `PostTag`, `categories` becomes `Category`. Column properties keep
//! the column name unless camel-casing is turned on.

mod associations;
mod classify;
mod column;
mod defaults;
pub mod emit;
mod error;
mod generate;
pub mod introspect;
mod model;
pub mod naming;
mod options;
mod traced;

pub use associations::AssociationMap;
pub use classify::{SUPPORTED_TYPES, UnrecognizedType, classify, classify_row};
pub use column::build_column;
pub use defaults::{DefaultContext, resolve_default};
pub use error::Error;
pub use generate::{DirectorySink, GenerateReport, MemorySink, ModelSink, describe, generate};
pub use introspect::{Catalog, PgCatalog};
pub use model::assemble;
pub use options::GenerateOptions;
pub use traced::{Connection, ConnectionExt, TracedConn};

pub use seqgen_catalog::*;

/// Result type for seqgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Connect to Postgres and drive the connection on the current runtime.
///
/// The returned client is the only connection used by a run; queries are
/// issued one at a time.
pub async fn connect(database_url: &str) -> Result<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(database_url, tokio_postgres::NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("database connection error: {}", e);
        }
    });

    Ok(client)
}
