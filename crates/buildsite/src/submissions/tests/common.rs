use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use bytes::Bytes;
use serde_json::Value;

use crate::cms::CmsError;
use crate::submissions::domain::{JobApplicationForm, QuoteForm};
use crate::submissions::rate_limit::{
    InMemoryRateLimiter, LimiterError, RateDecision, RateLimitKey, SubmissionLimiter,
};
use crate::submissions::repository::{AssetId, DocumentId, SubmissionStore};
use crate::submissions::service::SubmissionService;
use crate::submissions::upload::ResumeUpload;

/// In-memory content store recording created documents and uploaded files.
pub(super) struct MemoryStore {
    writable: bool,
    reject_auth: AtomicBool,
    fail_uploads: AtomicBool,
    pub(super) documents: Mutex<Vec<Value>>,
    pub(super) uploads: Mutex<Vec<(String, String, usize)>>,
}

impl MemoryStore {
    pub(super) fn writable() -> Self {
        Self {
            writable: true,
            reject_auth: AtomicBool::new(false),
            fail_uploads: AtomicBool::new(false),
            documents: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn without_token() -> Self {
        Self {
            writable: false,
            ..Self::writable()
        }
    }

    pub(super) fn rejecting_auth(self) -> Self {
        self.reject_auth.store(true, Ordering::SeqCst);
        self
    }

    pub(super) fn failing_uploads(self) -> Self {
        self.fail_uploads.store(true, Ordering::SeqCst);
        self
    }

    pub(super) fn document_count(&self) -> usize {
        self.documents.lock().expect("document log poisoned").len()
    }

    pub(super) fn last_document(&self) -> Value {
        self.documents
            .lock()
            .expect("document log poisoned")
            .last()
            .cloned()
            .expect("a document was stored")
    }

    pub(super) fn upload_count(&self) -> usize {
        self.uploads.lock().expect("upload log poisoned").len()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    fn can_write(&self) -> bool {
        self.writable
    }

    async fn create_document(&self, document: Value) -> Result<DocumentId, CmsError> {
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(CmsError::Unauthorized { status: 401 });
        }
        let id = document["_id"].as_str().unwrap_or("generated").to_string();
        self.documents
            .lock()
            .expect("document log poisoned")
            .push(document);
        Ok(DocumentId(id))
    }

    async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<AssetId, CmsError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(CmsError::Status {
                status: 502,
                message: "asset pipeline unavailable".to_string(),
            });
        }
        let mut uploads = self.uploads.lock().expect("upload log poisoned");
        uploads.push((file_name.to_string(), content_type.to_string(), bytes.len()));
        Ok(AssetId(format!("file-{}-pdf", uploads.len())))
    }
}

/// Limiter whose backend is always down.
pub(super) struct BrokenLimiter;

#[async_trait]
impl SubmissionLimiter for BrokenLimiter {
    async fn register_attempt(&self, _key: &RateLimitKey) -> Result<RateDecision, LimiterError> {
        Err(LimiterError::Backend("connection refused".to_string()))
    }
}

pub(super) type MemoryService = SubmissionService<MemoryStore, InMemoryRateLimiter>;

pub(super) fn service_with(store: MemoryStore) -> (MemoryService, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let limiter = Arc::new(InMemoryRateLimiter::default());
    (SubmissionService::new(store.clone(), limiter), store)
}

pub(super) fn valid_quote() -> QuoteForm {
    QuoteForm {
        full_name: Some("  Anna Schmidt ".to_string()),
        email: Some("Anna@Bau.DE".to_string()),
        phone: Some("+49 40 1234567".to_string()),
        service: Some("renovation".to_string()),
        project_details: Some("Renovate a 1920s townhouse facade.".to_string()),
        language: Some("de".to_string()),
        website: None,
    }
}

pub(super) fn valid_application() -> JobApplicationForm {
    JobApplicationForm {
        full_name: Some("Jonas Weber".to_string()),
        email: Some("jonas@example.com".to_string()),
        phone: None,
        position: Some("Site Manager".to_string()),
        message: Some("Ten years of timber-frame experience.".to_string()),
        language: Some("en".to_string()),
        website: Some(String::new()),
    }
}

pub(super) fn resume(file_name: &str, content_type: &str, size: usize) -> ResumeUpload {
    ResumeUpload {
        file_name: file_name.to_string(),
        content_type: Some(content_type.to_string()),
        bytes: Bytes::from(vec![b'%'; size]),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
