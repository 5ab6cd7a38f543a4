//! Quote and job application intake.

pub mod domain;
pub mod rate_limit;
pub mod repository;
pub mod router;
pub mod service;
pub mod upload;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    FieldError, JobApplication, JobApplicationForm, QuoteForm, QuoteRequest, ServiceKind,
};
pub use rate_limit::{
    InMemoryRateLimiter, LimiterError, RateDecision, RateLimitKey, RedisRateLimiter,
    SubmissionLimiter, MAX_SUBMISSIONS, SUBMISSION_WINDOW,
};
pub use repository::{AssetId, DocumentId, SubmissionStore};
pub use router::submission_router;
pub use service::{RequestOrigin, SubmissionError, SubmissionReceipt, SubmissionService};
pub use upload::{check_resume, ResumeRejection, ResumeUpload, UploadFailed, MAX_RESUME_BYTES};
pub use validation::{validate_application, validate_quote};
