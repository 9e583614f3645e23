//! Structural validation of post write payloads.
//!
//! Violation messages use the wording of Python's `jsonschema` package
//! (`'body' is a required property`, `32 is not of type 'string'`), which
//! existing API clients match against.

use serde_json::Value;

use crate::domain::PostDraft;
use crate::error::DomainError;

/// JSON types a schema property can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Object,
    String,
}

impl JsonType {
    pub fn name(self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::String => "string",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::Object => value.is_object(),
            JsonType::String => value.is_string(),
        }
    }
}

/// A flat object schema: required keys plus per-property types.
#[derive(Debug, Clone, Copy)]
pub struct ObjectSchema {
    pub required: &'static [&'static str],
    pub properties: &'static [(&'static str, JsonType)],
}

/// Schema for `POST /posts` and `PUT /posts/{id}` bodies.
pub const POST_SCHEMA: ObjectSchema = ObjectSchema {
    required: &["title", "body"],
    properties: &[("title", JsonType::String), ("body", JsonType::String)],
};

impl ObjectSchema {
    /// Returns the first violation, if any.
    ///
    /// Checks run shallowest first: the root type, then `required` in
    /// declaration order, then property types.
    pub fn first_violation(&self, instance: &Value) -> Option<String> {
        let Some(object) = instance.as_object() else {
            return Some(type_violation(instance, JsonType::Object));
        };

        if let Some(missing) = self.required.iter().find(|key| !object.contains_key(**key)) {
            return Some(format!("{} is a required property", python_str(missing)));
        }

        self.properties.iter().find_map(|(key, expected)| {
            object
                .get(*key)
                .filter(|value| !expected.matches(value))
                .map(|value| type_violation(value, *expected))
        })
    }
}

/// Validate a decoded JSON payload and extract the post fields.
pub fn validate_post_payload(payload: &Value) -> Result<PostDraft, DomainError> {
    if let Some(message) = POST_SCHEMA.first_violation(payload) {
        return Err(DomainError::Validation(message));
    }

    // The schema guarantees both keys exist as strings.
    let field = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                DomainError::Validation(format!("{} is a required property", python_str(key)))
            })
    };

    Ok(PostDraft {
        title: field("title")?,
        body: field("body")?,
    })
}

fn type_violation(value: &Value, expected: JsonType) -> String {
    format!(
        "{} is not of type {}",
        python_repr(value),
        python_str(expected.name())
    )
}

/// Render a JSON value the way Python's `repr` renders the decoded object.
pub fn python_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => python_str(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(python_repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", python_str(k), python_repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Python string repr: single quotes unless the text holds a single quote and no double quote.
fn python_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violation(payload: Value) -> String {
        match validate_post_payload(&payload) {
            Err(DomainError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_payload() {
        let draft = validate_post_payload(&json!({"title": "Example post", "body": "Testing..."}))
            .unwrap();
        assert_eq!(draft, PostDraft::new("Example post", "Testing..."));
    }

    #[test]
    fn test_extra_properties_are_allowed() {
        let draft =
            validate_post_payload(&json!({"title": "t", "body": "b", "tags": ["x"]})).unwrap();
        assert_eq!(draft.title, "t");
    }

    #[test]
    fn test_missing_body() {
        assert_eq!(violation(json!({"title": "x"})), "'body' is a required property");
    }

    #[test]
    fn test_missing_title_reported_first() {
        assert_eq!(violation(json!({})), "'title' is a required property");
    }

    #[test]
    fn test_wrong_type() {
        assert_eq!(
            violation(json!({"title": "x", "body": 32})),
            "32 is not of type 'string'"
        );
        assert_eq!(
            violation(json!({"title": null, "body": "b"})),
            "None is not of type 'string'"
        );
    }

    #[test]
    fn test_required_beats_type() {
        assert_eq!(
            violation(json!({"title": 5})),
            "'body' is a required property"
        );
    }

    #[test]
    fn test_non_object_payload() {
        assert_eq!(violation(json!([1, 2])), "[1, 2] is not of type 'object'");
        assert_eq!(violation(json!("text")), "'text' is not of type 'object'");
    }

    #[test]
    fn test_python_repr() {
        assert_eq!(python_repr(&json!(true)), "True");
        assert_eq!(python_repr(&json!({"a": [1, false]})), "{'a': [1, False]}");
        assert_eq!(python_repr(&json!("it's")), "\"it's\"");
        assert_eq!(python_repr(&json!("a\nb")), "'a\\nb'");
    }
}
