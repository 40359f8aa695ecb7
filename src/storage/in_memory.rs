//! In-memory implementation of PropertyStore for testing and development
//!
//! Evaluates the subset of MongoDB filter syntax the service emits: equality,
//! `$eq`, `$ne`, `$gt`, `$gte`, `$lt` and `$lte`. Comparison follows MongoDB's
//! type bracketing: numbers compare numerically across Int32, Int64, Double and
//! Decimal128, strings compare lexically, and values of different kinds never
//! match a range operator.

use crate::core::document::{ID_FIELD, decimal_to_f64};
use crate::core::error::StorageError;
use crate::core::store::{PropertyStore, UpdateOutcome};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "InMemory";

/// In-memory property store
///
/// Documents are kept in insertion order; `find` returns them sorted by `_id`
/// the way MongoDB sorts mixed identifier types (strings before ObjectIds).
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryPropertyStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Document>>, StorageError> {
        self.documents
            .read()
            .map_err(|e| StorageError::backend(BACKEND, "read lock", e))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Document>>, StorageError> {
        self.documents
            .write()
            .map_err(|e| StorageError::backend(BACKEND, "write lock", e))
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn insert_one(&self, mut document: Document) -> Result<Bson, StorageError> {
        let id = match document.get(ID_FIELD) {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert(ID_FIELD, id.clone());
                id
            }
        };

        let mut documents = self.write()?;
        if documents.iter().any(|d| d.get(ID_FIELD) == Some(&id)) {
            return Err(StorageError::backend(
                BACKEND,
                "insert",
                format!("duplicate key: {}", id),
            ));
        }
        documents.push(document);

        Ok(id)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StorageError> {
        let documents = self.read()?;
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    async fn find(
        &self,
        filter: Document,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StorageError> {
        let documents = self.read()?;
        let mut matched = Vec::new();
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                matched.push(document);
            }
        }
        matched.sort_by(|a, b| sort_order(a.get(ID_FIELD), b.get(ID_FIELD)));

        Ok(matched
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_documents(&self, filter: Document) -> Result<u64, StorageError> {
        let documents = self.read()?;
        let mut count = 0;
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update_one(
        &self,
        filter: Document,
        set: Document,
    ) -> Result<UpdateOutcome, StorageError> {
        let mut documents = self.write()?;

        let mut target = None;
        for (index, document) in documents.iter().enumerate() {
            if matches_filter(document, &filter)? {
                target = Some(index);
                break;
            }
        }
        let Some(index) = target else {
            return Ok(UpdateOutcome::default());
        };

        let document = &mut documents[index];
        let mut modified = false;
        for (path, value) in set {
            modified |= set_path(document, &path, value);
        }

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StorageError> {
        let mut documents = self.write()?;

        let mut target = None;
        for (index, document) in documents.iter().enumerate() {
            if matches_filter(document, &filter)? {
                target = Some(index);
                break;
            }
        }

        match target {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Whether a document satisfies every condition of the filter
fn matches_filter(document: &Document, filter: &Document) -> Result<bool, StorageError> {
    for (field, condition) in filter {
        let value = get_path(document, field);
        let matched = match condition {
            Bson::Document(operators) if is_operator_document(operators) => {
                let mut all = true;
                for (operator, operand) in operators {
                    if !apply_operator(operator, value, operand)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            expected => value.is_some_and(|v| bson_equals(v, expected)),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn apply_operator(
    operator: &str,
    value: Option<&Bson>,
    operand: &Bson,
) -> Result<bool, StorageError> {
    let ordering = value.and_then(|v| compare(v, operand));
    let matched = match operator {
        "$eq" => value.is_some_and(|v| bson_equals(v, operand)),
        "$ne" => !value.is_some_and(|v| bson_equals(v, operand)),
        "$gt" => ordering == Some(Ordering::Greater),
        "$gte" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        "$lt" => ordering == Some(Ordering::Less),
        "$lte" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        other => return Err(StorageError::UnsupportedOperator(other.to_string())),
    };
    Ok(matched)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        Bson::Decimal128(d) => decimal_to_f64(d),
        _ => None,
    }
}

/// Order two values of the same kind; `None` for mismatched kinds
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Position of a value's kind in MongoDB's cross-type sort order
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 1,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)) => 2,
        Some(Bson::String(_) | Bson::Symbol(_)) => 3,
        Some(Bson::Document(_)) => 4,
        Some(Bson::Array(_)) => 5,
        Some(Bson::Binary(_)) => 6,
        Some(Bson::ObjectId(_)) => 7,
        Some(Bson::Boolean(_)) => 8,
        Some(Bson::DateTime(_)) => 9,
        Some(Bson::Timestamp(_)) => 10,
        Some(Bson::RegularExpression(_)) => 11,
        Some(_) => 12,
    }
}

/// Ascending sort order: kinds bracketed as MongoDB does, then by value
fn sort_order(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    type_rank(a).cmp(&type_rank(b)).then_with(|| match (a, b) {
        (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}

fn bson_equals(a: &Bson, b: &Bson) -> bool {
    match compare(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = document.get(first)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at a dotted path, creating intermediate documents
///
/// Returns whether the stored value changed.
fn set_path(document: &mut Document, path: &str, value: Bson) -> bool {
    match path.split_once('.') {
        None => {
            if document.get(path) == Some(&value) {
                return false;
            }
            document.insert(path, value);
            true
        }
        Some((head, rest)) => {
            if !matches!(document.get(head), Some(Bson::Document(_))) {
                document.insert(head, Document::new());
            }
            match document.get_mut(head) {
                Some(Bson::Document(inner)) => set_path(inner, rest, value),
                _ => false,
            }
        }
    }
}
