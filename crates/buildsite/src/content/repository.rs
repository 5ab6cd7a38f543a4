use async_trait::async_trait;
use serde_json::Value;

use super::query::GroqQuery;
use crate::cms::CmsError;

/// Read access to the content store so the content service can be exercised
/// without network access.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a query and return its raw `result` payload (`null` when nothing matched).
    async fn fetch(&self, query: &GroqQuery) -> Result<Value, CmsError>;
}
