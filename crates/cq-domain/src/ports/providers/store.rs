//! Authoritative Store Port
//!
//! The durable source of truth. Queries return rows with only the requested
//! fields populated; no transactions are used.

use crate::error::Result;
use crate::value_objects::{Document, Filter};
use async_trait::async_trait;

/// Authoritative Store Port
///
/// # Example
///
/// ```ignore
/// use cq_domain::ports::providers::AuthoritativeStore;
///
/// let rows = store
///     .fetch_fields("factories", &Filter::new().eq("game", game), &["_id"])
///     .await?;
/// ```
#[async_trait]
pub trait AuthoritativeStore: Send + Sync + std::fmt::Debug {
    /// Fetch rows matching `filter`, keeping only the `projection` fields
    /// (plus `_id`); an empty projection returns whole documents
    async fn fetch_fields(
        &self,
        collection: &str,
        filter: &Filter,
        projection: &[&str],
    ) -> Result<Vec<Document>>;

    /// Count rows matching `filter`
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let rows = self.fetch_fields(collection, filter, &[]).await?;
        Ok(rows.len() as u64)
    }

    /// Insert one document
    async fn insert_one(&self, collection: &str, document: Document) -> Result<()>;

    /// Remove every document matching `filter`, returning how many were removed
    async fn remove_many(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Store name
    fn store_name(&self) -> &str;
}
