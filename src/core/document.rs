//! Conversion between stored listing documents and [`Property`]
//!
//! Stored documents come in several shapes: prices as `Decimal128` or as
//! currency strings, bathrooms as `Decimal128` or doubles, the picture URL
//! nested under `images` and the rating nested under `review_scores`.
//! [`normalize_document`] flattens all of that into the field layout of
//! [`Property`]; [`encode_property`] and [`encode_patch`] go the other way.

use crate::core::error::StorageError;
use crate::core::id::stringify_id;
use crate::core::property::{Property, PropertyPatch};
use mongodb::bson::{self, Bson, Decimal128, Document};

/// Store identifier field
pub const ID_FIELD: &str = "_id";

/// Stored field holding the listing type (same name as the API parameter)
pub const PROPERTY_TYPE_FIELD: &str = "property_type";

pub const PRICE_FIELD: &str = "price";
pub const BATHROOMS_FIELD: &str = "bathrooms";
pub const BEDROOMS_FIELD: &str = "bedrooms";
pub const NAME_FIELD: &str = "name";

const IMAGES_FIELD: &str = "images";
const PICTURE_URL_FIELD: &str = "picture_url";
const REVIEW_SCORES_FIELD: &str = "review_scores";
const RATING_FIELD: &str = "review_scores_rating";

/// Stored representation of `price`
#[derive(Debug, Clone, PartialEq)]
enum StoredPrice {
    Absent,
    Text(String),
    Decimal(Decimal128),
    Integer(i64),
    Double(f64),
    Other(Bson),
}

impl StoredPrice {
    fn from_bson(value: Option<Bson>) -> Self {
        match value {
            None => StoredPrice::Absent,
            Some(Bson::String(s)) => StoredPrice::Text(s),
            Some(Bson::Decimal128(d)) => StoredPrice::Decimal(d),
            Some(Bson::Int32(i)) => StoredPrice::Integer(i64::from(i)),
            Some(Bson::Int64(i)) => StoredPrice::Integer(i),
            Some(Bson::Double(f)) => StoredPrice::Double(f),
            Some(other) => StoredPrice::Other(other),
        }
    }

    /// Every numeric shape is rendered as text. Decimals keep their canonical
    /// string; doubles always carry a fractional part (`120.0`).
    fn into_bson(self) -> Option<Bson> {
        match self {
            StoredPrice::Absent => None,
            StoredPrice::Text(s) => Some(Bson::String(s)),
            StoredPrice::Decimal(d) => Some(Bson::String(d.to_string())),
            StoredPrice::Integer(i) => Some(Bson::String(i.to_string())),
            StoredPrice::Double(f) => Some(Bson::String(format!("{:?}", f))),
            StoredPrice::Other(other) => Some(other),
        }
    }
}

/// Stored representation of a count the API exposes as `i32` (`bedrooms`)
#[derive(Debug, Clone, PartialEq)]
enum StoredCount {
    Absent,
    Whole(i32),
    Other(Bson),
}

impl StoredCount {
    /// Doubles and decimals are truncated toward zero; values outside the
    /// `i32` range are left as stored.
    fn from_bson(value: Option<Bson>) -> Self {
        let truncated = |f: f64| {
            let t = f.trunc();
            (f.is_finite() && t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX))
                .then_some(t as i32)
        };
        match value {
            None => StoredCount::Absent,
            Some(Bson::Int32(i)) => StoredCount::Whole(i),
            Some(Bson::Int64(i)) => match i32::try_from(i) {
                Ok(i) => StoredCount::Whole(i),
                Err(_) => StoredCount::Other(Bson::Int64(i)),
            },
            Some(Bson::Double(f)) => match truncated(f) {
                Some(i) => StoredCount::Whole(i),
                None => StoredCount::Other(Bson::Double(f)),
            },
            Some(Bson::Decimal128(d)) => match decimal_to_f64(&d).and_then(truncated) {
                Some(i) => StoredCount::Whole(i),
                None => StoredCount::Other(Bson::Decimal128(d)),
            },
            Some(other) => StoredCount::Other(other),
        }
    }

    fn into_bson(self) -> Option<Bson> {
        match self {
            StoredCount::Absent => None,
            StoredCount::Whole(i) => Some(Bson::Int32(i)),
            StoredCount::Other(other) => Some(other),
        }
    }
}

/// Stored representation of a numeric field that the API exposes as `f64`
#[derive(Debug, Clone, PartialEq)]
enum StoredNumber {
    Absent,
    Decimal(Decimal128),
    Other(Bson),
}

impl StoredNumber {
    fn from_bson(value: Option<Bson>) -> Self {
        match value {
            None => StoredNumber::Absent,
            Some(Bson::Decimal128(d)) => StoredNumber::Decimal(d),
            Some(other) => StoredNumber::Other(other),
        }
    }

    fn into_bson(self) -> Option<Bson> {
        match self {
            StoredNumber::Absent => None,
            StoredNumber::Decimal(d) => match decimal_to_f64(&d) {
                Some(f) => Some(Bson::Double(f)),
                None => Some(Bson::Decimal128(d)),
            },
            StoredNumber::Other(other) => Some(other),
        }
    }
}

/// Convert a `Decimal128` to the nearest `f64`
pub fn decimal_to_f64(d: &Decimal128) -> Option<f64> {
    d.to_string().parse::<f64>().ok()
}

/// Flatten a stored document into the field layout of [`Property`]
///
/// - `_id` becomes its string form
/// - a `Decimal128` `bathrooms` becomes a double
/// - a `Decimal128` or numeric `price` becomes its string form
/// - a double or decimal `bedrooms` becomes an integer
/// - `images.picture_url` is copied to `picture_url` (`images` is kept)
/// - `review_scores.review_scores_rating` is copied to `review_scores_rating`
///   unless the document already has one at top level
///
/// Absent fields are left absent.
pub fn normalize_document(mut doc: Document) -> Document {
    if let Some(id) = doc.get(ID_FIELD) {
        let id = stringify_id(id);
        doc.insert(ID_FIELD, id);
    }

    if let Some(bathrooms) = StoredNumber::from_bson(doc.remove(BATHROOMS_FIELD)).into_bson() {
        doc.insert(BATHROOMS_FIELD, bathrooms);
    }

    if let Some(price) = StoredPrice::from_bson(doc.remove(PRICE_FIELD)).into_bson() {
        doc.insert(PRICE_FIELD, price);
    }

    if let Some(bedrooms) = StoredCount::from_bson(doc.remove(BEDROOMS_FIELD)).into_bson() {
        doc.insert(BEDROOMS_FIELD, bedrooms);
    }

    let picture_url = doc
        .get_document(IMAGES_FIELD)
        .ok()
        .and_then(|images| images.get(PICTURE_URL_FIELD))
        .cloned();
    if let Some(url) = picture_url {
        doc.insert(PICTURE_URL_FIELD, url);
    }

    if !doc.contains_key(RATING_FIELD) {
        let rating = doc
            .get_document(REVIEW_SCORES_FIELD)
            .ok()
            .and_then(|scores| scores.get(RATING_FIELD))
            .cloned();
        if let Some(rating) = rating {
            let rating = StoredNumber::from_bson(Some(rating)).into_bson();
            if let Some(rating) = rating {
                doc.insert(RATING_FIELD, rating);
            }
        }
    }

    doc
}

/// Normalize a stored document and decode it into a [`Property`]
pub fn decode_property(doc: Document) -> Result<Property, StorageError> {
    let normalized = normalize_document(doc);
    bson::from_document(normalized).map_err(|e| StorageError::Decode(e.to_string()))
}

/// Build the document inserted for a new property
///
/// The client-supplied `id` is dropped, absent fields are not written, and the
/// promoted fields are written back to their nested locations.
pub fn encode_property(property: &Property) -> Result<Document, StorageError> {
    let mut doc = bson::to_document(property).map_err(|e| StorageError::Encode(e.to_string()))?;
    doc.remove("id");
    doc.remove(ID_FIELD);
    strip_nulls(&mut doc);

    if let Some(url) = doc.remove(PICTURE_URL_FIELD) {
        nested_insert(&mut doc, IMAGES_FIELD, PICTURE_URL_FIELD, url);
    }
    if let Some(rating) = doc.remove(RATING_FIELD) {
        nested_insert(&mut doc, REVIEW_SCORES_FIELD, RATING_FIELD, rating);
    }

    Ok(doc)
}

/// Build the `$set` document for a partial update
///
/// Promoted fields are addressed with dotted paths so that sibling keys of
/// `images` and `review_scores` are left untouched.
pub fn encode_patch(patch: &PropertyPatch) -> Result<Document, StorageError> {
    let mut doc = bson::to_document(patch).map_err(|e| StorageError::Encode(e.to_string()))?;
    strip_nulls(&mut doc);

    if let Some(url) = doc.remove(PICTURE_URL_FIELD) {
        doc.insert(format!("{IMAGES_FIELD}.{PICTURE_URL_FIELD}"), url);
    }
    if let Some(rating) = doc.remove(RATING_FIELD) {
        doc.insert(format!("{REVIEW_SCORES_FIELD}.{RATING_FIELD}"), rating);
    }

    Ok(doc)
}

fn nested_insert(doc: &mut Document, parent: &str, key: &str, value: Bson) {
    match doc.get_mut(parent) {
        Some(Bson::Document(inner)) => {
            inner.insert(key, value);
        }
        _ => {
            let mut inner = Document::new();
            inner.insert(key, value);
            doc.insert(parent, inner);
        }
    }
}

/// Remove `null` values recursively so absent fields are not persisted
fn strip_nulls(doc: &mut Document) {
    let null_keys: Vec<String> = doc
        .iter()
        .filter(|(_, v)| matches!(v, Bson::Null))
        .map(|(k, _)| k.clone())
        .collect();
    for key in null_keys {
        doc.remove(&key);
    }

    for (_, value) in doc.iter_mut() {
        if let Bson::Document(inner) = value {
            strip_nulls(inner);
        }
    }
}
