//! Introspection against a real Postgres, started with testcontainers.
//!
//! Run with `--features test-postgres` (requires docker).

#![cfg(feature = "test-postgres")]

use seqgen::{
    AssociationKind, Catalog, GenerateOptions, MemorySink, PgCatalog, StorageType, describe,
    generate,
};
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::runners::AsyncRunner;

const SCHEMA: &str = r#"
CREATE TYPE post_status AS ENUM ('draft', 'published');

CREATE TABLE author (
    id SERIAL PRIMARY KEY,
    name VARCHAR(80) NOT NULL
);

CREATE TABLE post (
    id SERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL DEFAULT 'Untitled',
    status post_status NOT NULL DEFAULT 'draft',
    author_id INTEGER NOT NULL REFERENCES author (id),
    reviewer_id INTEGER REFERENCES author (id),
    views INTEGER NOT NULL DEFAULT 0,
    published BOOLEAN NOT NULL DEFAULT false,
    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
    labels TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE tag (
    id SERIAL PRIMARY KEY,
    label TEXT NOT NULL
);

CREATE TABLE post_tag (
    post_id INTEGER NOT NULL REFERENCES post (id),
    tag_id INTEGER NOT NULL REFERENCES tag (id),
    PRIMARY KEY (post_id, tag_id)
);
"#;

#[tokio::test]
async fn introspects_blog_schema() {
    let container = Postgres::default().start().await.unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

    let client = seqgen::connect(&url).await.unwrap();
    client.batch_execute(SCHEMA).await.unwrap();

    let catalog = PgCatalog::new(&client);

    let tables = catalog.list_tables("public").await.unwrap();
    assert_eq!(tables.len(), 4);
    for table in ["author", "post", "tag", "post_tag"] {
        assert!(tables.iter().any(|t| t == table), "missing {table}");
    }

    let columns = catalog.list_columns("public", "post").await.unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "title",
            "status",
            "author_id",
            "reviewer_id",
            "views",
            "published",
            "metadata",
            "labels",
            "created_at"
        ]
    );
    assert!(columns[0].is_primary_key());
    assert!(columns[3].is_foreign_key());
    assert_eq!(columns[2].data_type, "USER-DEFINED");
    assert_eq!(columns[2].underlying_type.as_deref(), Some("post_status"));
    assert_eq!(columns[2].enum_labels, vec!["draft", "published"]);
    assert_eq!(columns[8].data_type, "ARRAY");
    assert_eq!(columns[8].underlying_type.as_deref(), Some("text[]"));

    let foreign_keys = catalog.list_foreign_keys("public").await.unwrap();
    assert_eq!(foreign_keys.len(), 4);
    let pivot_sides = foreign_keys.iter().filter(|fk| fk.is_pivot_side()).count();
    assert_eq!(pivot_sides, 2);

    let models = describe(&catalog, &GenerateOptions::default()).await.unwrap();
    let post = models.iter().find(|m| m.table_name == "post").unwrap();

    assert!(post.column("id").unwrap().auto_increment());
    assert_eq!(
        post.column("status").unwrap().storage,
        StorageType::Enum(vec!["draft".to_string(), "published".to_string()])
    );
    assert_eq!(
        post.column("labels").unwrap().storage,
        StorageType::Array(Box::new(StorageType::Text))
    );
    // author_id and reviewer_id collapse into one block
    assert_eq!(post.associations["author"].foreign_key, "author_id");
    assert_eq!(
        post.associations["tag"].kind,
        AssociationKind::BelongsToMany
    );

    let mut sink = MemorySink::default();
    let report = generate(&catalog, &GenerateOptions::default(), &mut sink)
        .await
        .unwrap();
    assert_eq!(report.files.len(), 5);
    assert!(sink.files["post.ts"].contains("defaultValue: DataType.NOW"));
    assert!(sink.files["post.ts"].contains("defaultValue: 'draft'"));
    assert!(sink.files["post_tag.ts"].contains("@ForeignKey(() => Tag)"));
}
