//! Request validation at the HTTP boundary
//!
//! Validation runs on the raw JSON body so that a wrong type is reported
//! against the field that carries it. Only checked, typed input leaves this
//! module; unknown fields are dropped.
//!
//! Strings are trimmed first. Lengths apply to the trimmed text, a string
//! that trims to nothing counts as missing, and the trimmed text is what
//! gets stored.

use lingo_types::{NewTranslation, TagSet, TranslationPatch};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const LOCALE_MAX: usize = 10;
pub const KEY_MAX: usize = 255;
pub const TAG_MAX: usize = 50;

/// Field name -> messages, e.g. `{"tags.1": ["The tags.1 field must be a string."]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// First message overall, used as the summary line of a 422 body.
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().flatten().next().map(String::as_str)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// Validate a create payload.
pub fn validate_new(body: &Value) -> Result<NewTranslation, ValidationErrors> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);
    let mut errors = ValidationErrors::default();

    let locale = required_string(fields, "locale", Some(LOCALE_MAX), &mut errors);
    let key = required_string(fields, "key", Some(KEY_MAX), &mut errors);
    let value = required_string(fields, "value", None, &mut errors);
    let tags = tags(fields, &mut errors);

    match (locale, key, value) {
        (Some(locale), Some(key), Some(value)) if errors.is_empty() => Ok(NewTranslation {
            locale,
            key,
            value,
            tags: tags.unwrap_or_default(),
        }),
        _ => Err(errors),
    }
}

/// Validate an update payload. Every field is optional.
pub fn validate_patch(body: &Value) -> Result<TranslationPatch, ValidationErrors> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);
    let mut errors = ValidationErrors::default();

    let optional = |name: &str, max: Option<usize>, errors: &mut ValidationErrors| {
        if fields.contains_key(name) {
            required_string(fields, name, max, errors)
        } else {
            None
        }
    };

    let patch = TranslationPatch {
        locale: optional("locale", Some(LOCALE_MAX), &mut errors),
        key: optional("key", Some(KEY_MAX), &mut errors),
        value: optional("value", None, &mut errors),
        tags: tags(fields, &mut errors),
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn required_string(
    fields: &Map<String, Value>,
    name: &str,
    max: Option<usize>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match fields.get(name) {
        None | Some(Value::Null) => {
            errors.add(name, format!("The {name} field is required."));
            None
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                errors.add(name, format!("The {name} field is required."));
                return None;
            }
            if let Some(max) = max {
                if s.chars().count() > max {
                    errors.add(
                        name,
                        format!("The {name} field must not be greater than {max} characters."),
                    );
                    return None;
                }
            }
            Some(s.to_string())
        }
        Some(_) => {
            errors.add(name, format!("The {name} field must be a string."));
            None
        }
    }
}

/// `None` when the field is absent. `null` yields an empty set.
fn tags(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<TagSet> {
    let items = match fields.get("tags")? {
        Value::Null => return Some(TagSet::new()),
        Value::Array(items) => items,
        _ => {
            errors.add("tags", "The tags field must be an array.");
            return None;
        }
    };

    let mut set = TagSet::new();
    for (i, item) in items.iter().enumerate() {
        let field = format!("tags.{i}");
        match item.as_str().map(str::trim) {
            Some("") => errors.add(&field, format!("The {field} field must not be empty.")),
            Some(tag) if tag.chars().count() > TAG_MAX => errors.add(
                &field,
                format!("The {field} field must not be greater than {TAG_MAX} characters."),
            ),
            Some(tag) => {
                set.insert(tag.to_string());
            }
            None => errors.add(&field, format!("The {field} field must be a string.")),
        }
    }
    Some(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_create_payload() {
        let new = validate_new(&json!({
            "locale": "en",
            "key": "welcome_message",
            "value": "Welcome to our site",
            "tags": ["web"],
            "ignored": true
        }))
        .unwrap();

        assert_eq!(new.locale, "en");
        assert_eq!(new.key, "welcome_message");
        assert!(new.tags.contains("web"));
    }

    #[test]
    fn test_tags_are_optional_on_create() {
        let new = validate_new(&json!({"locale": "fr", "key": "k", "value": "v"})).unwrap();
        assert!(new.tags.is_empty());

        let new =
            validate_new(&json!({"locale": "fr", "key": "k", "value": "v", "tags": null})).unwrap();
        assert!(new.tags.is_empty());
    }

    #[test]
    fn test_missing_and_empty_fields_are_required() {
        let errors = validate_new(&json!({"locale": "", "value": "   "})).unwrap_err();
        assert_eq!(
            errors.get("locale"),
            Some(&["The locale field is required.".to_string()][..])
        );
        assert!(errors.get("key").is_some());
        assert!(errors.get("value").is_some());
    }

    #[test]
    fn test_strings_are_trimmed_before_storing() {
        let new = validate_new(&json!({
            "locale": "  en ",
            "key": "\twelcome_message\n",
            "value": " Welcome ",
            "tags": [" web", "web "]
        }))
        .unwrap();

        assert_eq!(new.locale, "en");
        assert_eq!(new.key, "welcome_message");
        assert_eq!(new.value, "Welcome");
        assert_eq!(new.tags.len(), 1);
        assert!(new.tags.contains("web"));

        // Padding does not count towards the limit
        let padded = format!("   {}   ", "a".repeat(10));
        assert!(validate_new(&json!({"locale": padded, "key": "k", "value": "v"})).is_ok());
    }

    #[test]
    fn test_empty_tags_are_rejected() {
        let errors = validate_new(&json!({
            "locale": "en",
            "key": "k",
            "value": "v",
            "tags": ["web", "", "  "]
        }))
        .unwrap_err();

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["tags.1", "tags.2"]);
        assert_eq!(
            errors.get("tags.1"),
            Some(&["The tags.1 field must not be empty.".to_string()][..])
        );

        assert!(validate_patch(&json!({"tags": [""]})).is_err());
    }

    #[test]
    fn test_patch_trims_present_fields() {
        let patch = validate_patch(&json!({"key": " home.title "})).unwrap();
        assert_eq!(patch.key.as_deref(), Some("home.title"));

        let errors = validate_patch(&json!({"value": "   "})).unwrap_err();
        assert!(errors.get("value").is_some());
    }

    #[test]
    fn test_length_limits_count_characters() {
        // 10 multi-byte characters fit, 11 do not
        let ok = validate_new(&json!({"locale": "éééééééééé", "key": "k", "value": "v"}));
        assert!(ok.is_ok());

        let errors = validate_new(&json!({
            "locale": "abcdefghijk",
            "key": "k".repeat(256),
            "value": "v"
        }))
        .unwrap_err();
        assert_eq!(
            errors.get("locale"),
            Some(&["The locale field must not be greater than 10 characters.".to_string()][..])
        );
        assert!(errors.get("key").is_some());
    }

    #[test]
    fn test_wrong_types_are_reported_per_field() {
        let errors = validate_new(&json!({
            "locale": 5,
            "key": "k",
            "value": "v",
            "tags": ["web", 3, "x".repeat(51)]
        }))
        .unwrap_err();

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["locale", "tags.1", "tags.2"]);

        let errors = validate_new(&json!({"locale": "en", "key": "k", "value": "v", "tags": "web"}))
            .unwrap_err();
        assert_eq!(
            errors.first_message(),
            Some("The tags field must be an array.")
        );
    }

    #[test]
    fn test_non_object_body_reports_every_required_field() {
        let errors = validate_new(&json!([1, 2])).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["key", "locale", "value"]);
    }

    #[test]
    fn test_patch_accepts_any_subset() {
        let patch = validate_patch(&json!({"value": "Hi there"})).unwrap();
        assert_eq!(patch.value.as_deref(), Some("Hi there"));
        assert!(patch.locale.is_none() && patch.key.is_none() && patch.tags.is_none());

        let patch = validate_patch(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_applies_field_rules_when_present() {
        let errors = validate_patch(&json!({"locale": null, "key": 1})).unwrap_err();
        assert!(errors.get("locale").is_some());
        assert_eq!(
            errors.get("key"),
            Some(&["The key field must be a string.".to_string()][..])
        );
    }

    #[test]
    fn test_patch_null_tags_clears_them() {
        let patch = validate_patch(&json!({"tags": null})).unwrap();
        assert_eq!(patch.tags, Some(TagSet::new()));
    }
}
