// Response envelope normalization
//
// The backend is inconsistent: some list endpoints return a bare array,
// others wrap it as `{ "books": [...], "total": 12 }`. Mutations return
// either the bare entity or `{ "announcement": {...}, "message": "..." }`.
// Everything is normalized here so store logic only ever sees `Page` and
// `Mutation`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Error;

/// Top-level fields that accompanied the payload (`total`, `queuedCount`, ...).
pub type PageMeta = Map<String, Value>;

/// How a list endpoint shapes its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// A bare JSON array.
    Bare,
    /// An object carrying the array under the named field.
    Field(&'static str),
}

/// How a single-entity response is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    /// The body is the entity itself.
    Bare,
    /// The entity sits under the named field, next to `message` and friends.
    Field(&'static str),
}

/// A normalized list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// A normalized single-entity response from a create/update/action call.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub entity: T,
    /// Backend-provided confirmation text, shown verbatim to the user.
    pub message: Option<String>,
    pub meta: PageMeta,
}

/// A response that carries no entity (deletes, state transitions that drop
/// the entity from the collection).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
    pub meta: PageMeta,
}

impl ListShape {
    /// Normalize a list body into a `Page`.
    ///
    /// A bare array is accepted regardless of the declared shape. For an
    /// object, the declared field is used; a `Bare` endpoint that answers
    /// with an object falls back to its single array-valued field.
    pub fn normalize<T: DeserializeOwned>(self, body: Value) -> Result<Page<T>, Error> {
        let (items, meta) = match body {
            Value::Array(items) => (items, PageMeta::new()),
            Value::Object(mut obj) => {
                let field = match self {
                    Self::Field(name) => name.to_owned(),
                    Self::Bare => sole_array_field(&obj).ok_or_else(|| Error::Envelope {
                        expected: "an array or an object with one array field".into(),
                    })?,
                };
                match obj.remove(&field) {
                    Some(Value::Array(items)) => (items, obj),
                    Some(Value::Null) | None => {
                        return Err(Error::Envelope {
                            expected: format!("an array under `{field}`"),
                        });
                    }
                    Some(_) => {
                        return Err(Error::Envelope {
                            expected: format!("`{field}` to be an array"),
                        });
                    }
                }
            }
            other => {
                return Err(Error::Envelope {
                    expected: format!("an array or object, got {}", kind_of(&other)),
                });
            }
        };

        trace!(count = items.len(), meta_keys = meta.len(), "normalized list envelope");
        let items = decode(Value::Array(items))?;
        Ok(Page { items, meta })
    }
}

impl ItemShape {
    /// Normalize a single-entity body into a `Mutation`.
    ///
    /// When the declared field is missing, the whole body is taken as the
    /// entity (some endpoints skip the wrapper on update).
    pub fn normalize<T: DeserializeOwned>(self, body: Value) -> Result<Mutation<T>, Error> {
        match (self, body) {
            (Self::Field(name), Value::Object(mut obj))
                if obj.get(name).is_some_and(Value::is_object) =>
            {
                let entity = obj.remove(name).unwrap_or(Value::Null);
                let message = take_message(&mut obj);
                Ok(Mutation {
                    entity: decode(entity)?,
                    message,
                    meta: obj,
                })
            }
            (_, body @ Value::Object(_)) => Ok(Mutation {
                entity: decode(body)?,
                message: None,
                meta: PageMeta::new(),
            }),
            (_, other) => Err(Error::Envelope {
                expected: format!("an entity object, got {}", kind_of(&other)),
            }),
        }
    }
}

impl Ack {
    /// Normalize an entity-less body. Empty bodies and non-objects are fine.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut obj) => {
                let message = take_message(&mut obj);
                Self { message, meta: obj }
            }
            _ => Self::default(),
        }
    }
}

/// Pull the `message` string out of an error or confirmation body.
pub fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

fn take_message(obj: &mut PageMeta) -> Option<String> {
    match obj.remove("message") {
        Some(Value::String(message)) => Some(message),
        Some(other) => {
            obj.insert("message".into(), other);
            None
        }
        None => None,
    }
}

fn sole_array_field(obj: &PageMeta) -> Option<String> {
    let mut arrays = obj.iter().filter(|(_, v)| v.is_array()).map(|(k, _)| k);
    let first = arrays.next()?;
    if arrays.next().is_some() {
        return None;
    }
    Some(first.clone())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| {
        let body = value.to_string();
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn bare_array_normalizes_with_empty_meta() {
        let page: Page<Value> = ListShape::Bare
            .normalize(json!([{ "_id": "e1" }, { "_id": "e2" }]))
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.meta.is_empty());
    }

    #[test]
    fn wrapped_array_keeps_remaining_fields_as_meta() {
        let page: Page<Value> = ListShape::Field("books")
            .normalize(json!({ "books": [{ "_id": "b1" }], "total": 40, "page": 2 }))
            .unwrap();
        assert_eq!(page.items, vec![json!({ "_id": "b1" })]);
        assert_eq!(page.meta.get("total"), Some(&json!(40)));
        assert_eq!(page.meta.get("page"), Some(&json!(2)));
    }

    #[test]
    fn field_endpoint_tolerates_bare_array() {
        let page: Page<Value> = ListShape::Field("books")
            .normalize(json!([{ "_id": "b1" }]))
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn bare_endpoint_falls_back_to_single_array_field() {
        let page: Page<Value> = ListShape::Bare
            .normalize(json!({ "events": [{ "_id": "e1" }], "count": 1 }))
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.get("count"), Some(&json!(1)));
    }

    #[test]
    fn missing_field_is_an_envelope_error() {
        let err = ListShape::Field("books")
            .normalize::<Value>(json!({ "items": [] }))
            .unwrap_err();
        assert!(matches!(err, Error::Envelope { .. }), "got {err:?}");
    }

    #[test]
    fn ambiguous_bare_object_is_rejected() {
        let err = ListShape::Bare
            .normalize::<Value>(json!({ "a": [], "b": [] }))
            .unwrap_err();
        assert!(matches!(err, Error::Envelope { .. }));
    }

    #[test]
    fn wrapped_mutation_extracts_message_and_meta() {
        let m: Mutation<Value> = ItemShape::Field("announcement")
            .normalize(json!({
                "announcement": { "_id": "a1", "title": "Exam Notice" },
                "message": "Created",
                "queuedCount": 12
            }))
            .unwrap();
        assert_eq!(m.entity["_id"], "a1");
        assert_eq!(m.message.as_deref(), Some("Created"));
        assert_eq!(m.meta.get("queuedCount"), Some(&json!(12)));
    }

    #[test]
    fn unwrapped_mutation_uses_whole_body() {
        let m: Mutation<Value> = ItemShape::Field("event")
            .normalize(json!({ "_id": "e1", "title": "Sports Day" }))
            .unwrap();
        assert_eq!(m.entity["title"], "Sports Day");
        assert_eq!(m.message, None);
    }

    #[test]
    fn ack_reads_optional_message() {
        assert_eq!(
            Ack::from_body(json!({ "message": "Deleted" })).message.as_deref(),
            Some("Deleted")
        );
        assert_eq!(Ack::from_body(Value::Null), Ack::default());
    }

    #[test]
    fn message_of_ignores_blank_strings() {
        assert_eq!(message_of(&json!({ "message": "  " })), None);
        assert_eq!(
            message_of(&json!({ "error": "Book unavailable" })).as_deref(),
            Some("Book unavailable")
        );
    }
}
