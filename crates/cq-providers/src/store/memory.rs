//! In-memory document store
//!
//! Provides an authoritative store over JSON documents for development,
//! the `check` command and tests. Data is not persisted.

use crate::constants::MEMORY_STORE_NAME;
use async_trait::async_trait;
use cq_domain::constants::ID_FIELD;
use cq_domain::error::{Error, Result};
use cq_domain::ports::AuthoritativeStore;
use cq_domain::value_objects::{Document, EntityId, EntityRecord, Filter, project};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// In-memory authoritative store
///
/// Collections are created on first insert. Documents without `_id` get a
/// freshly generated one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<DashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a typed record into its collection
    pub fn insert_record<R: EntityRecord>(&self, record: &R) -> Result<()> {
        match serde_json::to_value(record)? {
            Value::Object(document) => {
                self.insert_document(R::COLLECTION, document);
                Ok(())
            }
            other => Err(Error::invalid_argument(format!(
                "record serialized to {other}, expected an object"
            ))),
        }
    }

    fn insert_document(&self, collection: &str, mut document: Document) {
        if !document.contains_key(ID_FIELD) {
            document.insert(ID_FIELD.to_string(), EntityId::generate().into());
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Number of documents in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }

    /// Whether `collection` holds no documents
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl AuthoritativeStore for InMemoryDocumentStore {
    async fn fetch_fields(
        &self,
        collection: &str,
        filter: &Filter,
        projection: &[&str],
    ) -> Result<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .map(|doc| project(doc, projection))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        Ok(self.collections.get(collection).map_or(0, |docs| {
            docs.iter().filter(|doc| filter.matches(doc)).count() as u64
        }))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        self.insert_document(collection, document);
        Ok(())
    }

    async fn remove_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    fn store_name(&self) -> &str {
        MEMORY_STORE_NAME
    }
}
