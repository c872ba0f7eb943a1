//! Shared helpers for the content services

use serde::{Deserialize, Deserializer};
use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Turn a title into a URL slug: lowercase, spaces to hyphens, and only
/// `[a-z0-9-]` kept.
pub fn generate_slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Use the caller's slug when given, otherwise derive one from `source`
pub fn slug_or_generate(slug: Option<String>, source: &str) -> String {
    match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => generate_slug(source),
    }
}

/// `true` when the field is missing or blank
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// PATCH field that tells "absent" from `null`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: a missing key stays `None`, `null` becomes
/// `Some(None)` and clears the column.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Append `, column = $n` to an UPDATE when a new value was supplied.
///
/// `column` must be a trusted identifier; only the value is bound.
pub fn push_set<'args, T>(
    builder: &mut QueryBuilder<'args, Postgres>,
    column: &'static str,
    value: Option<T>,
) -> bool
where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    match value {
        Some(value) => {
            builder.push(", ").push(column).push(" = ").push_bind(value);
            true
        }
        None => false,
    }
}
