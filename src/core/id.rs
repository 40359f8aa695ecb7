//! Property identifiers
//!
//! Path and query identifiers arrive as plain strings. Documents created by
//! MongoDB are keyed by `ObjectId`, but older imports may be keyed by plain
//! strings, so parsing never fails: anything that is not a 24-character hex
//! ObjectId is matched literally.

use mongodb::bson::Bson;
use mongodb::bson::oid::ObjectId;
use std::fmt;

/// Length of the hex representation of an `ObjectId`
const OBJECT_ID_HEX_LEN: usize = 24;

/// A normalized property identifier, ready to be used in a store filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyId {
    /// A store-generated identifier
    Object(ObjectId),

    /// A legacy identifier matched as a literal string
    Literal(String),
}

impl PropertyId {
    /// Normalize a raw identifier string
    ///
    /// Exactly 24 hex characters produce [`PropertyId::Object`]; every other
    /// input is passed through unchanged as [`PropertyId::Literal`].
    pub fn parse(raw: &str) -> Self {
        if raw.len() == OBJECT_ID_HEX_LEN {
            if let Ok(oid) = ObjectId::parse_str(raw) {
                return PropertyId::Object(oid);
            }
        }
        PropertyId::Literal(raw.to_string())
    }
}

impl From<PropertyId> for Bson {
    fn from(id: PropertyId) -> Self {
        match id {
            PropertyId::Object(oid) => Bson::ObjectId(oid),
            PropertyId::Literal(s) => Bson::String(s),
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyId::Object(oid) => write!(f, "{}", oid.to_hex()),
            PropertyId::Literal(s) => write!(f, "{}", s),
        }
    }
}

/// Render a stored `_id` value as the string exposed by the API
pub fn stringify_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
