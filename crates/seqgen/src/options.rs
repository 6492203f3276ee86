/// Knobs for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Schema to introspect
    pub schema: String,
    /// Camel-case property names (`category_id` → `categoryId`)
    pub camel_case: bool,
    /// Emit foreign key columns. When false they are left out of the model.
    pub include_foreign_keys: bool,
    /// Treat `nextval(...)` defaults as auto-increment
    pub detect_sequences: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            camel_case: false,
            include_foreign_keys: true,
            detect_sequences: true,
        }
    }
}
