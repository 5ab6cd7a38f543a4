use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cms::CmsError;

/// Id the content store assigned to a created document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of an uploaded file asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

/// Write access to the content store for form submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Whether write credentials are configured at all.
    fn can_write(&self) -> bool;
    async fn create_document(&self, document: Value) -> Result<DocumentId, CmsError>;
    async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<AssetId, CmsError>;
}
