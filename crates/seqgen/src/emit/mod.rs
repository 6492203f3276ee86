//! sequelize-typescript rendering.
//!
//! One file per model, named after its table, plus an `index.ts` that
//! re-exports every model. Output is deterministic: imports are sorted and
//! members follow column order, then association order.

use std::collections::{BTreeMap, BTreeSet};

use seqgen_catalog::{
    AssociationDescriptor, AssociationKind, ColumnDescriptor, DefaultValue, ModelDescriptor,
    StorageType, quote_label,
};

use crate::naming::model_name;

/// First line of every generated file.
pub const HEADER: &str = "// This file is generated by seqgen. Do not edit.";

/// Name of the barrel file.
pub const INDEX_FILE: &str = "index.ts";

/// File name for a table's model.
pub fn file_name(table: &str) -> String {
    format!("{table}.ts")
}

/// Render one model as a sequelize-typescript class.
pub fn render_model(model: &ModelDescriptor) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    for line in imports(model) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!(
        "@Table({{ tableName: {}, timestamps: false }})\n",
        quote_label(&model.table_name)
    ));
    out.push_str(&format!("export class {} extends Model {{\n", model.type_name));

    let members: Vec<Vec<String>> = model
        .columns
        .iter()
        .map(|column| column_member(model, column))
        .chain(model.associations.values().map(association_member))
        .collect();

    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for line in member {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push_str("}\n");
    out
}

/// Render the barrel file re-exporting every model.
pub fn render_index(models: &[ModelDescriptor]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for model in models {
        out.push_str(&format!(
            "export {{ {} }} from './{}';\n",
            model.type_name, model.table_name
        ));
    }
    out
}

fn imports(model: &ModelDescriptor) -> Vec<String> {
    let mut decorators = BTreeSet::from(["Column", "DataType", "Model", "Table"]);
    // type name -> table name
    let mut models = BTreeMap::new();

    for column in &model.columns {
        if let Some(target) = model.foreign_key_targets.get(&column.field) {
            decorators.insert("ForeignKey");
            models.insert(model_name(target), target.clone());
        }
    }

    for association in model.associations.values() {
        models.insert(
            association.target_model.clone(),
            association.target_table.clone(),
        );
        match association.kind {
            AssociationKind::BelongsTo => {
                decorators.insert("BelongsTo");
            }
            AssociationKind::BelongsToMany => {
                decorators.insert("BelongsToMany");
                if let Some(through) = &association.through {
                    models.insert(model_name(through), through.clone());
                }
            }
        }
    }

    models.remove(&model.type_name);

    let mut lines = vec![format!(
        "import {{ {} }} from 'sequelize-typescript';",
        decorators.into_iter().collect::<Vec<_>>().join(", ")
    )];
    lines.extend(
        models
            .into_iter()
            .map(|(type_name, table)| format!("import {{ {type_name} }} from './{table}';")),
    );
    lines
}

fn column_member(model: &ModelDescriptor, column: &ColumnDescriptor) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(comment) = &column.comment {
        lines.push(format!("// {comment}"));
    }

    if let Some(target) = model.foreign_key_targets.get(&column.field) {
        lines.push(format!("@ForeignKey(() => {})", model_name(target)));
    }

    let mut options = vec![
        format!("field: {}", quote_label(&column.field)),
        format!("type: {}", data_type(&column.storage)),
    ];
    if column.primary_key {
        options.push("primaryKey: true".to_string());
    }
    if column.auto_increment() {
        options.push("autoIncrement: true".to_string());
    }
    if !column.allow_null {
        options.push("allowNull: false".to_string());
    }
    if let Some(value) = column.default_value() {
        options.push(format!("defaultValue: {}", default_value(value)));
    }
    lines.push(format!("@Column({{ {} }})", options.join(", ")));

    let marker = if column.allow_null { '?' } else { '!' };
    lines.push(format!("{}{}: {};", column.name, marker, column.scalar));
    lines
}

fn association_member(association: &AssociationDescriptor) -> Vec<String> {
    let target = &association.target_model;
    match association.kind {
        AssociationKind::BelongsTo => vec![
            format!(
                "@BelongsTo(() => {target}, {})",
                quote_label(&association.foreign_key_attribute)
            ),
            format!("{}?: {target};", association.alias),
        ],
        AssociationKind::BelongsToMany => {
            let mut options = Vec::new();
            if let Some(through) = &association.through {
                options.push(format!("through: () => {}", model_name(through)));
            }
            options.push(format!(
                "foreignKey: {}",
                quote_label(&association.foreign_key_attribute)
            ));
            if let Some(other_key) = &association.other_key_attribute {
                options.push(format!("otherKey: {}", quote_label(other_key)));
            }
            vec![
                format!(
                    "@BelongsToMany(() => {target}, {{ {} }})",
                    options.join(", ")
                ),
                format!("{}?: {target}[];", association.alias),
            ]
        }
    }
}

/// `DataType.*` expression for a storage type.
pub fn data_type(storage: &StorageType) -> String {
    match storage {
        StorageType::Array(inner) => format!("DataType.ARRAY({})", data_type(inner)),
        other => format!("DataType.{other}"),
    }
}

/// TypeScript expression for a default value.
pub fn default_value(value: &DefaultValue) -> String {
    match value {
        DefaultValue::String(s) => quote_label(s),
        DefaultValue::CurrentTimestamp => "DataType.NOW".to_string(),
        other => other.to_string(),
    }
}
