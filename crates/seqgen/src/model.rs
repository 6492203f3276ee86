use indexmap::IndexMap;
use indexmap::map::Entry;
use seqgen_catalog::{AssociationDescriptor, AssociationKind, ColumnDescriptor, ModelDescriptor};

use crate::naming::{camel_case, model_name};
use crate::{AssociationMap, GenerateOptions};

/// Combine a table's columns and associations into a model.
///
/// Associations are keyed by target table. When several point at the same
/// target, the first one registered wins.
///
/// Association keys name model attributes, so they follow the property
/// naming of the key columns. Excluded key columns keep their physical name.
pub fn assemble(
    table: &str,
    columns: Vec<ColumnDescriptor>,
    associations: &AssociationMap,
    options: &GenerateOptions,
) -> ModelDescriptor {
    let mut by_target = IndexMap::new();
    let mut foreign_key_targets = IndexMap::new();

    for association in associations.for_table(table) {
        if association.kind == AssociationKind::BelongsTo {
            foreign_key_targets
                .entry(association.foreign_key.clone())
                .or_insert_with(|| association.target_table.clone());
        }

        match by_target.entry(association.target_table.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(AssociationDescriptor {
                    foreign_key_attribute: key_attribute(&association.foreign_key, options),
                    other_key_attribute: association
                        .other_key
                        .as_deref()
                        .map(|key| key_attribute(key, options)),
                    ..association.clone()
                });
            }
            Entry::Occupied(_) => {
                tracing::debug!(
                    table,
                    target = %association.target_table,
                    foreign_key = %association.foreign_key,
                    "dropping duplicate association"
                );
            }
        }
    }

    // each side of a pivot points back at the table it was registered on
    for side in associations.through(table) {
        foreign_key_targets
            .entry(side.foreign_key.clone())
            .or_insert_with(|| side.source_table.clone());
    }

    ModelDescriptor {
        table_name: table.to_string(),
        type_name: model_name(table),
        columns,
        associations: by_target,
        foreign_key_targets,
    }
}

fn key_attribute(column: &str, options: &GenerateOptions) -> String {
    if options.camel_case && options.include_foreign_keys {
        camel_case(column)
    } else {
        column.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqgen_catalog::ForeignKeyRow;

    fn fk(table: &str, column: &str, target: &str) -> ForeignKeyRow {
        ForeignKeyRow {
            constraint_name: format!("{table}_{column}_fkey"),
            table_name: table.to_string(),
            column_name: column.to_string(),
            foreign_table_name: target.to_string(),
            foreign_column_name: "id".to_string(),
            other_table: None,
            other_column: None,
        }
    }

    #[test]
    fn test_two_foreign_keys_to_same_target_collapse() {
        let map = AssociationMap::resolve(&[
            fk("message", "sender_id", "user"),
            fk("message", "recipient_id", "user"),
        ]);

        let model = assemble("message", Vec::new(), &map, &GenerateOptions::default());
        assert_eq!(model.associations.len(), 1);
        let user = &model.associations["user"];
        assert_eq!(user.kind, AssociationKind::BelongsTo);
        assert_eq!(user.foreign_key, "sender_id");

        // both columns still reference the model
        assert_eq!(model.foreign_key_targets["sender_id"], "user");
        assert_eq!(model.foreign_key_targets["recipient_id"], "user");
    }

    #[test]
    fn test_type_name_and_no_associations() {
        let model = assemble(
            "categories",
            Vec::new(),
            &AssociationMap::default(),
            &GenerateOptions::default(),
        );
        assert_eq!(model.table_name, "categories");
        assert_eq!(model.type_name, "Category");
        assert!(model.associations.is_empty());
        assert!(model.foreign_key_targets.is_empty());
    }

    #[test]
    fn test_targets_keep_scan_order() {
        let map = AssociationMap::resolve(&[
            fk("post", "category_id", "category"),
            fk("post", "author_id", "author"),
        ]);
        let model = assemble("post", Vec::new(), &map, &GenerateOptions::default());
        let targets: Vec<_> = model.associations.keys().map(String::as_str).collect();
        assert_eq!(targets, vec!["category", "author"]);
    }

    #[test]
    fn test_pivot_columns_reference_both_sides() {
        let side = |column: &str, target: &str, other_table: &str, other_column: &str| ForeignKeyRow {
            other_table: Some(other_table.to_string()),
            other_column: Some(other_column.to_string()),
            ..fk("post_tag", column, target)
        };
        let map = AssociationMap::resolve(&[
            side("post_id", "post", "tag", "tag_id"),
            side("tag_id", "tag", "post", "post_id"),
        ]);

        let pivot = assemble("post_tag", Vec::new(), &map, &GenerateOptions::default());
        assert!(pivot.associations.is_empty());
        assert_eq!(pivot.type_name, "PostTag");
        assert_eq!(pivot.foreign_key_targets["post_id"], "post");
        assert_eq!(pivot.foreign_key_targets["tag_id"], "tag");

        let post = assemble("post", Vec::new(), &map, &GenerateOptions::default());
        assert!(post.foreign_key_targets.is_empty());
        assert_eq!(post.associations["tag"].kind, AssociationKind::BelongsToMany);
    }

    #[test]
    fn test_camel_cased_keys_name_attributes() {
        let map = AssociationMap::resolve(&[
            fk("post", "category_id", "category"),
            ForeignKeyRow {
                other_table: Some("tag".to_string()),
                other_column: Some("tag_id".to_string()),
                ..fk("post_tag", "post_id", "post")
            },
        ]);
        let camel = GenerateOptions {
            camel_case: true,
            ..Default::default()
        };

        let post = assemble("post", Vec::new(), &map, &camel);
        let category = &post.associations["category"];
        assert_eq!(category.foreign_key, "category_id");
        assert_eq!(category.foreign_key_attribute, "categoryId");
        let tags = &post.associations["tag"];
        assert_eq!(tags.foreign_key_attribute, "postId");
        assert_eq!(tags.other_key_attribute.as_deref(), Some("tagId"));
        // column lookups stay physical
        assert_eq!(post.foreign_key_targets["category_id"], "category");

        let without_columns = GenerateOptions {
            include_foreign_keys: false,
            ..camel
        };
        let post = assemble("post", Vec::new(), &map, &without_columns);
        assert_eq!(post.associations["category"].foreign_key_attribute, "category_id");
        assert_eq!(
            post.associations["tag"].other_key_attribute.as_deref(),
            Some("tag_id")
        );
    }
}
