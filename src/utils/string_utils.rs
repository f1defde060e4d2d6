//! String helpers shared by DTOs, services and repositories.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::core::errors::AppError;

/// Trims `value` and rejects it when nothing is left.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field_name)));
    }
    Ok(trimmed.to_string())
}

/// `Some("  ")` and `Some("")` become `None`; other values are trimmed.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde adapter applying [`clean_optional_string`] while deserializing.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// serde adapter that tells an explicit `null` apart from an absent field.
///
/// Combine with `#[serde(default)]`: a missing field stays `None`, `null`
/// becomes `Some(None)` and a value becomes `Some(Some(value))`. Partial
/// updates use this to remove an optional setting.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses a hex ObjectId coming from a path or body.
///
/// `what` names the resource in the error, e.g. `"product"`.
pub fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id.trim())
        .map_err(|_| AppError::ValidationError(format!("invalid {} id: {}", what, id)))
}

/// Lower-case, dash separated slug: `"Maison Francis Kurkdjian"` → `"maison-francis-kurkdjian"`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Escapes regex metacharacters so user input can be used in a `$regex` match.
pub fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if "\\^$.|?*+()[]{}/-".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Splits a comma separated query value: `"men,women"` → `["men", "women"]`.
pub fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("  Oud  ", "title").unwrap(), "Oud");
        assert!(validate_required_string("", "title").is_err());
        assert!(validate_required_string("\t\n", "title").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  Amber ".to_string())), Some("Amber".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct DeliveryNotes {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            notes: Option<String>,
        }

        let form: DeliveryNotes = serde_json::from_str(r#"{"notes": "  ring twice  "}"#).unwrap();
        assert_eq!(form.notes.as_deref(), Some("ring twice"));

        let form: DeliveryNotes = serde_json::from_str(r#"{"notes": "  "}"#).unwrap();
        assert_eq!(form.notes, None);

        let form: DeliveryNotes = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(form.notes, None);
    }

    #[test]
    fn test_deserialize_nullable_distinguishes_null_from_absent() {
        #[derive(Deserialize)]
        struct LimitPatch {
            #[serde(default, deserialize_with = "deserialize_nullable")]
            limit: Option<Option<i64>>,
        }

        let patch: LimitPatch = serde_json::from_str(r#"{"limit": 5}"#).unwrap();
        assert_eq!(patch.limit, Some(Some(5)));

        let patch: LimitPatch = serde_json::from_str(r#"{"limit": null}"#).unwrap();
        assert_eq!(patch.limit, Some(None));

        let patch: LimitPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(patch.limit, None);
    }

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("65a1f0c2e4b0a1b2c3d4e5f6", "product").is_ok());
        match parse_object_id("nope", "product") {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("product")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Maison Francis Kurkdjian"), "maison-francis-kurkdjian");
        assert_eq!(slugify("  Dior -- Sauvage!  "), "dior-sauvage");
        assert_eq!(slugify("Lattafa"), "lattafa");
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("a+b (100ml)"), "a\\+b \\(100ml\\)");
        assert_eq!(escape_regex("oud"), "oud");
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(Some("men, women,,")), vec!["men", "women"]);
        assert!(split_csv(None).is_empty());
    }
}
