//! Request and response schemas for every endpoint.
//!
//! Field names follow the JSON contract the admin panel and storefront
//! already speak (`CategoryName`, `_id`, `createdAt`, ...). Request bodies
//! reject unknown fields and report missing required ones by name through
//! [`Validate`].

pub mod auth;
pub mod category;
pub mod contact;
pub mod image;
pub mod inclusion;
pub mod package;

use serde::Deserialize;

use crate::error::CelebrateError;

/// Boundary validation run by the `ValidJson` extractor before a handler sees the body.
pub trait Validate {
    /// Names of required fields that are absent or blank, in declaration order.
    fn missing_fields(&self) -> Vec<&'static str>;
}

/// Reference to another record as the admin forms send it: a bare id,
/// a numeric string, or the populated object carrying `_id`. The forms start
/// out with an empty object, which counts as blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordRef {
    Id(i64),
    Text(String),
    Embedded {
        #[serde(rename = "_id", default)]
        id: Option<Box<RecordRef>>,
    },
}

impl RecordRef {
    /// Resolve to a positive row id, or `InvalidId(entity)` when malformed.
    pub fn resolve(&self, entity: &'static str) -> Result<i64, CelebrateError> {
        match self {
            RecordRef::Id(id) => positive_id(*id, entity),
            RecordRef::Text(raw) => parse_id(raw, entity),
            RecordRef::Embedded { id: Some(id) } => id.resolve(entity),
            RecordRef::Embedded { id: None } => Err(CelebrateError::InvalidId(entity)),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            RecordRef::Id(_) => false,
            RecordRef::Text(raw) => raw.trim().is_empty(),
            RecordRef::Embedded { id } => id.as_deref().is_none_or(RecordRef::is_blank),
        }
    }
}

/// Parse a path or query id. Anything but a positive integer is malformed.
pub fn parse_id(raw: &str, entity: &'static str) -> Result<i64, CelebrateError> {
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| CelebrateError::InvalidId(entity))?;
    positive_id(id, entity)
}

fn positive_id(id: i64, entity: &'static str) -> Result<i64, CelebrateError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(CelebrateError::InvalidId(entity))
    }
}

pub(crate) fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

pub(crate) fn blank_ref(value: &Option<RecordRef>) -> bool {
    value.as_ref().is_none_or(RecordRef::is_blank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_refs_resolve_from_every_form_shape() {
        let bare: RecordRef = serde_json::from_str("7").unwrap();
        let text: RecordRef = serde_json::from_str("\"7\"").unwrap();
        let embedded: RecordRef = serde_json::from_str(r#"{"_id": 7}"#).unwrap();
        for r in [bare, text, embedded] {
            assert_eq!(r.resolve("category").unwrap(), 7);
        }
    }

    #[test]
    fn empty_or_idless_objects_are_blank() {
        for raw in ["{}", r#"{"CategoryName": "Birthday"}"#, r#"{"_id": ""}"#, "\"  \""] {
            let r: RecordRef = serde_json::from_str(raw).unwrap();
            assert!(blank_ref(&Some(r)), "{raw}");
        }
        let populated: RecordRef =
            serde_json::from_str(r#"{"_id": "3", "CategoryName": "Birthday"}"#).unwrap();
        assert!(!blank_ref(&Some(populated.clone())));
        assert_eq!(populated.resolve("category").unwrap(), 3);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(matches!(
            parse_id("abc", "package"),
            Err(CelebrateError::InvalidId("package"))
        ));
        assert!(parse_id("0", "package").is_err());
        assert!(parse_id("-3", "package").is_err());
        assert_eq!(parse_id(" 42 ", "package").unwrap(), 42);
    }
}
