use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use seqgen_catalog::ModelDescriptor;

use crate::emit::{INDEX_FILE, file_name, render_index, render_model};
use crate::{AssociationMap, Catalog, Error, GenerateOptions, Result, assemble, build_column};

/// Destination for generated files.
pub trait ModelSink {
    fn write(&mut self, file_name: &str, contents: &str) -> Result<()>;
}

/// Writes files into a directory, creating it if needed.
#[derive(Debug)]
pub struct DirectorySink {
    root: Utf8PathBuf,
}

impl DirectorySink {
    pub fn create(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| Error::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl ModelSink for DirectorySink {
    fn write(&mut self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.root.join(file_name);
        std::fs::write(&path, contents).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(%path, bytes = contents.len(), "wrote model file");
        Ok(())
    }
}

/// Keeps files in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: IndexMap<String, String>,
}

impl ModelSink for MemorySink {
    fn write(&mut self, file_name: &str, contents: &str) -> Result<()> {
        self.files.insert(file_name.to_string(), contents.to_string());
        Ok(())
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// File names in write order, `index.ts` last
    pub files: Vec<String>,
}

/// Introspect the schema and build every model without writing anything.
pub async fn describe<C: Catalog>(
    catalog: &C,
    options: &GenerateOptions,
) -> Result<Vec<ModelDescriptor>> {
    let tables = catalog.list_tables(&options.schema).await?;
    let foreign_keys = catalog.list_foreign_keys(&options.schema).await?;
    let associations = AssociationMap::resolve(&foreign_keys);
    tracing::debug!(
        schema = %options.schema,
        tables = tables.len(),
        associations = associations.len(),
        "resolved associations"
    );

    let mut models = Vec::with_capacity(tables.len());
    for table in &tables {
        models.push(describe_table(catalog, options, table, &associations).await?);
    }
    Ok(models)
}

/// Generate one file per table plus `index.ts`.
///
/// Associations are resolved for the whole schema before the first file is
/// written. The first error stops the run; files already handed to the sink
/// are left as they are.
pub async fn generate<C: Catalog, S: ModelSink>(
    catalog: &C,
    options: &GenerateOptions,
    sink: &mut S,
) -> Result<GenerateReport> {
    let tables = catalog.list_tables(&options.schema).await?;
    let foreign_keys = catalog.list_foreign_keys(&options.schema).await?;
    let associations = AssociationMap::resolve(&foreign_keys);
    tracing::info!(
        schema = %options.schema,
        tables = tables.len(),
        associations = associations.len(),
        "introspected schema"
    );

    let mut report = GenerateReport::default();
    let mut models = Vec::with_capacity(tables.len());

    for table in &tables {
        let model = describe_table(catalog, options, table, &associations).await?;
        let name = file_name(&model.table_name);
        sink.write(&name, &render_model(&model))?;
        report.files.push(name);
        models.push(model);
    }

    sink.write(INDEX_FILE, &render_index(&models))?;
    report.files.push(INDEX_FILE.to_string());

    Ok(report)
}

async fn describe_table<C: Catalog>(
    catalog: &C,
    options: &GenerateOptions,
    table: &str,
    associations: &AssociationMap,
) -> Result<ModelDescriptor> {
    let rows = catalog.list_columns(&options.schema, table).await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(column) = build_column(table, row, options)? {
            columns.push(column);
        }
    }

    let model = assemble(table, columns, associations, options);
    tracing::debug!(
        table,
        model = %model.type_name,
        columns = model.columns.len(),
        associations = model.associations.len(),
        "assembled model"
    );
    Ok(model)
}
