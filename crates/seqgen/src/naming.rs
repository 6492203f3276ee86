//! Identifier conversions for generated code.
//!
//! Pluralization rules are intentionally simple and cover the common English
//! patterns (`users`, `categories`, `boxes`). Irregular plurals such as
//! `people`/`person` are not handled. A short list of `-che` words
//! (`caches`, `niches`) keeps the `e`; any other `-ches` word drops the `es`.
//! Compound names (`post_tags`) only have their last segment changed.

/// Convert `snake_case` to `camelCase`: `category_id` → `categoryId`.
pub fn camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = !result.is_empty();
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert `snake_case` to `PascalCase`: `post_tag` → `PostTag`.
pub fn pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Singular form of a table name: `categories` → `category`, `post_tags` → `post_tag`.
pub fn singularize(name: &str) -> String {
    let (prefix, last) = split_last_segment(name);
    format!("{}{}", prefix, singularize_word(last))
}

/// Plural form of a table name: `category` → `categories`, `post_tag` → `post_tags`.
pub fn pluralize(name: &str) -> String {
    let (prefix, last) = split_last_segment(name);
    format!("{}{}", prefix, pluralize_word(last))
}

/// Model type name for a table: singularized, then pascal-cased.
pub fn model_name(table: &str) -> String {
    pascal_case(&singularize(table))
}

/// Plurals of `-che` words, which would otherwise lose their final `e`.
const CHE_PLURALS: &[&str] = &[
    "aches",
    "avalanches",
    "caches",
    "cliches",
    "creches",
    "headaches",
    "moustaches",
    "mustaches",
    "niches",
    "psyches",
    "quiches",
];

fn split_last_segment(name: &str) -> (&str, &str) {
    match name.rfind('_') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    }
}

fn singularize_word(word: &str) -> String {
    // "categories" -> "category"
    if let Some(stem) = word.strip_suffix("ies")
        && !stem.is_empty()
    {
        return format!("{}y", stem);
    }

    if CHE_PLURALS.contains(&word) {
        return word[..word.len() - 1].to_string();
    }

    // "boxes" -> "box", "matches" -> "match", "addresses" -> "address"
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if word.len() > suffix.len() && word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    // "status", "address", "analysis" are already singular
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    // "users" -> "user"
    if let Some(stem) = word.strip_suffix('s')
        && !stem.is_empty()
    {
        return stem.to_string();
    }

    word.to_string()
}

fn pluralize_word(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y')
        && !stem.is_empty()
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{}ies", stem);
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{}es", word);
    }

    format!("{}s", word)
}
