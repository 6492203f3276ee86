use super::*;

fn column(name: &str, constraints: &[&str]) -> CatalogColumnRow {
    CatalogColumnRow {
        name: name.to_string(),
        ordinal_position: 1,
        data_type: "integer".to_string(),
        constraint_types: constraints.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn test_constraint_membership() {
    let id = column("id", &[PRIMARY_KEY]);
    assert!(id.is_primary_key());
    assert!(!id.is_foreign_key());

    let post_id = column("post_id", &[PRIMARY_KEY, FOREIGN_KEY]);
    assert!(post_id.is_primary_key());
    assert!(post_id.is_foreign_key());

    let email = column("email", &["UNIQUE"]);
    assert!(!email.is_primary_key());
    assert!(email.has_constraint("unique"));
}

#[test]
fn test_storage_type_display() {
    assert_eq!(StorageType::Integer.to_string(), "INTEGER");
    assert_eq!(StorageType::String(Some(255)).to_string(), "STRING(255)");
    assert_eq!(StorageType::String(None).to_string(), "STRING");
    assert_eq!(StorageType::Char(Some(2)).to_string(), "CHAR(2)");
    assert_eq!(
        StorageType::Enum(vec!["happy".to_string(), "it's ok".to_string()]).to_string(),
        "ENUM('happy', 'it\\'s ok')"
    );
    assert_eq!(
        StorageType::Array(Box::new(StorageType::String(None))).to_string(),
        "ARRAY(STRING)"
    );
}

#[test]
fn test_scalar_kind_display() {
    assert_eq!(ScalarKind::Date.to_string(), "Date");
    assert_eq!(
        ScalarKind::Array(Box::new(ScalarKind::Number)).to_string(),
        "number[]"
    );
    assert!(ScalarKind::Array(Box::new(ScalarKind::Boolean)).is_array());
}

#[test]
fn test_column_default_accessors() {
    let mut col = ColumnDescriptor {
        name: "id".to_string(),
        field: "id".to_string(),
        storage: StorageType::Integer,
        scalar: ScalarKind::Number,
        comment: None,
        primary_key: true,
        foreign_key: false,
        allow_null: false,
        default: Some(ColumnDefault::AutoIncrement),
    };
    assert!(col.auto_increment());
    assert_eq!(col.default_value(), None);

    col.default = Some(ColumnDefault::Value(DefaultValue::Number(3.0)));
    assert!(!col.auto_increment());
    assert_eq!(col.default_value(), Some(&DefaultValue::Number(3.0)));
}

#[test]
fn test_default_value_display() {
    assert_eq!(DefaultValue::Number(5.0).to_string(), "5");
    assert_eq!(DefaultValue::Number(1.5).to_string(), "1.5");
    assert_eq!(DefaultValue::String("abc".to_string()).to_string(), "\"abc\"");
    assert_eq!(DefaultValue::CurrentTimestamp.to_string(), "CURRENT_TIMESTAMP");
}

#[test]
fn test_quote_label_stays_on_one_line() {
    assert_eq!(quote_label("draft"), "'draft'");
    assert_eq!(quote_label(r"C:\tmp"), r"'C:\\tmp'");
    assert_eq!(quote_label("a\nb\r\nc"), r"'a\nb\r\nc'");
    assert_eq!(quote_label("x\u{2028}y\u{2029}"), r"'x\u2028y\u2029'");
    assert!(!quote_label("line\nbreak").contains('\n'));
}
