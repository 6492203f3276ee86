//! Parsing of raw column default expressions.
//!
//! Rules are tried in order and the first one that matches decides. The order
//! matters: sequence detection comes before the numeric rule so that a serial
//! primary key is never also given a literal default.
//!
//! Text that no rule understands resolves to "no default". This is lossy on
//! purpose; an unusual default never aborts a run.

use std::sync::LazyLock;

use regex::Regex;
use seqgen_catalog::{ColumnDefault, DefaultValue, ScalarKind};

/// `'abc'` or `'abc'::character varying`
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'((?:[^']|'')*)'(?:::(?:character varying|text|bpchar))?$")
        .expect("valid regex")
});

/// `'{"a": 1}'::jsonb`
static JSONB_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'((?:[^']|'')*)'::jsonb$").expect("valid regex"));

/// `42`, `1.5`, `'-1'::integer`
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'?(-?\d+(?:\.\d+)?)").expect("valid regex"));

/// `'happy'::mood`, `'happy'::"Mood"`, `'happy'::public.mood`
static CAST_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'((?:[^']|'')*)'::(.+)$").expect("valid regex"));

/// What the resolver knows about the column besides its default text.
#[derive(Debug, Clone, Copy)]
pub struct DefaultContext<'a> {
    pub scalar: &'a ScalarKind,
    /// Enum type name, for enum-typed columns
    pub enum_type: Option<&'a str>,
    /// Whether `nextval(...)` defaults mark the column as auto-incrementing
    pub detect_sequences: bool,
}

enum Outcome {
    Resolved(ColumnDefault),
    NoDefault,
}

type Rule = fn(&str, &DefaultContext<'_>) -> Option<Outcome>;

const RULES: &[(&str, Rule)] = &[
    ("string literal", string_literal),
    ("jsonb literal", jsonb_literal),
    ("now", now),
    ("sequence", sequence),
    ("boolean", boolean),
    ("number", number),
    ("array", array),
    ("enum literal", enum_literal),
];

/// Resolve a raw default expression.
///
/// Returns `None` when the column has no default or when the expression is
/// not understood.
pub fn resolve_default(raw: Option<&str>, ctx: &DefaultContext<'_>) -> Option<ColumnDefault> {
    let raw = raw?.trim();

    for (name, rule) in RULES {
        if let Some(outcome) = rule(raw, ctx) {
            tracing::trace!(rule = name, raw, "resolved default");
            return match outcome {
                Outcome::Resolved(default) => Some(default),
                Outcome::NoDefault => None,
            };
        }
    }

    tracing::trace!(raw, "default not understood");
    None
}

fn value(value: DefaultValue) -> Option<Outcome> {
    Some(Outcome::Resolved(ColumnDefault::Value(value)))
}

fn unescape(quoted: &str) -> String {
    quoted.replace("''", "'")
}

fn string_literal(raw: &str, _: &DefaultContext<'_>) -> Option<Outcome> {
    let caps = STRING_LITERAL.captures(raw)?;
    value(DefaultValue::String(unescape(&caps[1])))
}

fn jsonb_literal(raw: &str, _: &DefaultContext<'_>) -> Option<Outcome> {
    let caps = JSONB_LITERAL.captures(raw)?;
    value(DefaultValue::Json(unescape(&caps[1])))
}

fn now(raw: &str, _: &DefaultContext<'_>) -> Option<Outcome> {
    (raw == "now()").then_some(Outcome::Resolved(ColumnDefault::Value(
        DefaultValue::CurrentTimestamp,
    )))
}

fn sequence(raw: &str, ctx: &DefaultContext<'_>) -> Option<Outcome> {
    if !raw.starts_with("nextval(") {
        return None;
    }
    Some(if ctx.detect_sequences {
        Outcome::Resolved(ColumnDefault::AutoIncrement)
    } else {
        Outcome::NoDefault
    })
}

fn boolean(raw: &str, ctx: &DefaultContext<'_>) -> Option<Outcome> {
    if !ctx.scalar.is_boolean() {
        return None;
    }
    value(DefaultValue::Boolean(raw != "false"))
}

fn number(raw: &str, ctx: &DefaultContext<'_>) -> Option<Outcome> {
    if !ctx.scalar.is_number() {
        return None;
    }
    let parsed = NUMBER_PREFIX
        .captures(raw)
        .and_then(|caps| caps[1].parse::<f64>().ok());
    match parsed {
        Some(n) => value(DefaultValue::Number(n)),
        None => Some(Outcome::NoDefault),
    }
}

fn array(_: &str, ctx: &DefaultContext<'_>) -> Option<Outcome> {
    if !ctx.scalar.is_array() {
        return None;
    }
    value(DefaultValue::EmptyArray)
}

fn enum_literal(raw: &str, ctx: &DefaultContext<'_>) -> Option<Outcome> {
    let enum_type = ctx.enum_type?;
    let caps = CAST_LITERAL.captures(raw)?;
    let cast = &caps[2];
    let cast = cast.rsplit('.').next().unwrap_or(cast).trim_matches('"');
    if cast != enum_type.trim_matches('"') {
        return None;
    }
    value(DefaultValue::String(unescape(&caps[1])))
}
