use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::domain::{
    FieldError, JobApplicationForm, QuoteForm, APPLICATION_DOCUMENT_TYPE, QUOTE_DOCUMENT_TYPE,
};
use super::rate_limit::{RateDecision, RateLimitKey, SubmissionLimiter};
use super::repository::{AssetId, DocumentId, SubmissionStore};
use super::upload::{check_resume, store_resume, ResumeRejection, ResumeUpload, UploadFailed};
use super::validation::{is_spam, validate_application, validate_quote};
use crate::cms::CmsError;

/// Where a request came from, as far as rate limiting is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub forwarded_for: Option<String>,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: DocumentId,
    pub resume: Option<AssetId>,
}

/// Service running the intake pipeline: honeypot, field validation, rate
/// limit, resume gate, then persistence.
pub struct SubmissionService<S, L> {
    store: Arc<S>,
    limiter: Arc<L>,
}

impl<S, L> SubmissionService<S, L>
where
    S: SubmissionStore + 'static,
    L: SubmissionLimiter + 'static,
{
    pub fn new(store: Arc<S>, limiter: Arc<L>) -> Self {
        Self { store, limiter }
    }

    /// Validate and persist a quote request.
    pub async fn submit_quote(
        &self,
        form: QuoteForm,
        origin: &RequestOrigin,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if is_spam(form.website.as_deref()) {
            warn!("quote request rejected by honeypot");
            return Err(SubmissionError::Spam);
        }

        let request = validate_quote(form).map_err(SubmissionError::Invalid)?;
        self.check_rate(&request.email, origin).await?;
        self.ensure_writable()?;

        let id = new_document_id(QUOTE_DOCUMENT_TYPE);
        let document = request.to_document(&id, Utc::now());
        let id = self.persist(document).await?;

        info!(%id, service = request.service.slug(), language = %request.language, "quote request stored");
        Ok(SubmissionReceipt { id, resume: None })
    }

    /// Validate a job application, upload the resume and persist the record.
    pub async fn submit_application(
        &self,
        form: JobApplicationForm,
        resume: Option<ResumeUpload>,
        origin: &RequestOrigin,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if is_spam(form.website.as_deref()) {
            warn!("job application rejected by honeypot");
            return Err(SubmissionError::Spam);
        }

        let application = validate_application(form).map_err(SubmissionError::Invalid)?;
        self.check_rate(&application.email, origin).await?;
        let resume = check_resume(resume.as_ref())?;
        self.ensure_writable()?;

        let asset = store_resume(self.store.as_ref(), resume).await?;
        let id = new_document_id(APPLICATION_DOCUMENT_TYPE);
        let document = application.to_document(&id, &asset, Utc::now());
        let id = self.persist(document).await?;

        info!(%id, position = %application.position, "job application stored");
        Ok(SubmissionReceipt {
            id,
            resume: Some(asset),
        })
    }

    async fn check_rate(&self, email: &str, origin: &RequestOrigin) -> Result<(), SubmissionError> {
        let key = RateLimitKey::derive(email, origin.forwarded_for.as_deref());
        match self.limiter.register_attempt(&key).await {
            Ok(RateDecision::Allowed { .. }) => Ok(()),
            Ok(RateDecision::Limited) => {
                warn!(identity = %key, "submission rate limit exceeded");
                Err(SubmissionError::RateLimited)
            }
            Err(err) => {
                // Best-effort limiting: an unavailable backend must not block intake.
                warn!(error = %err, "rate limiter unavailable, accepting submission");
                Ok(())
            }
        }
    }

    fn ensure_writable(&self) -> Result<(), SubmissionError> {
        if self.store.can_write() {
            Ok(())
        } else {
            error!("submission received but no content store write token is configured");
            Err(SubmissionError::Misconfigured {
                detail: CmsError::MissingWriteToken.to_string(),
            })
        }
    }

    async fn persist(&self, document: serde_json::Value) -> Result<DocumentId, SubmissionError> {
        self.store.create_document(document).await.map_err(|err| {
            error!(error = %err, "failed to persist submission");
            if err.is_auth_failure() {
                SubmissionError::Misconfigured {
                    detail: err.to_string(),
                }
            } else {
                SubmissionError::Store(err)
            }
        })
    }
}

fn new_document_id(document_type: &str) -> DocumentId {
    DocumentId(format!("{document_type}-{}", Uuid::now_v7().simple()))
}

/// Reasons a submission was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("spam detected")]
    Spam,
    #[error("submission has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
    #[error("too many submissions, please try again later")]
    RateLimited,
    #[error(transparent)]
    Resume(#[from] ResumeRejection),
    #[error("server misconfigured")]
    Misconfigured { detail: String },
    #[error(transparent)]
    Upload(#[from] UploadFailed),
    #[error("failed to save submission")]
    Store(#[source] CmsError),
}
