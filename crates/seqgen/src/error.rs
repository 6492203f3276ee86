use camino::Utf8PathBuf;
use thiserror::Error;

use crate::classify::UnrecognizedType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("column {table}.{column}: {source}")]
    UnrecognizedType {
        table: String,
        column: String,
        #[source]
        source: UnrecognizedType,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
