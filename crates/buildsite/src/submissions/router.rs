use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::{FieldError, JobApplicationForm, QuoteForm};
use super::rate_limit::SubmissionLimiter;
use super::repository::SubmissionStore;
use super::service::{RequestOrigin, SubmissionError, SubmissionReceipt, SubmissionService};
use super::upload::{ResumeRejection, ResumeUpload, MAX_RESUME_BYTES};

/// Header carrying the caller address when running behind a proxy.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Leaves room for form fields and multipart framing on top of the largest
/// accepted resume, so oversize files reach the resume gate.
const APPLICATION_BODY_LIMIT: usize = 2 * MAX_RESUME_BYTES;

pub(crate) struct SubmissionState<S, L> {
    service: Arc<SubmissionService<S, L>>,
    expose_details: bool,
}

impl<S, L> Clone for SubmissionState<S, L> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            expose_details: self.expose_details,
        }
    }
}

/// Router exposing the quote and job application endpoints.
pub fn submission_router<S, L>(
    service: Arc<SubmissionService<S, L>>,
    expose_details: bool,
) -> Router
where
    S: SubmissionStore + 'static,
    L: SubmissionLimiter + 'static,
{
    let state = SubmissionState {
        service,
        expose_details,
    };

    Router::new()
        .route("/api/quote", post(quote_handler::<S, L>))
        .route(
            "/api/job-application",
            post(application_handler::<S, L>).layer(DefaultBodyLimit::max(APPLICATION_BODY_LIMIT)),
        )
        .with_state(state)
}

fn origin_from(headers: &HeaderMap) -> RequestOrigin {
    RequestOrigin {
        forwarded_for: headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

fn success(status: StatusCode, receipt: SubmissionReceipt) -> Response {
    let payload = json!({ "success": true, "id": receipt.id });
    (status, Json(payload)).into_response()
}

fn failure(status: StatusCode, message: &str, detail: Option<String>) -> Response {
    let mut payload = json!({ "success": false, "error": message });
    if let Some(detail) = detail {
        payload["detail"] = json!(detail);
    }
    (status, Json(payload)).into_response()
}

fn invalid(errors: Vec<FieldError>) -> Response {
    let payload = json!({ "success": false, "errors": errors });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) fn error_response(error: SubmissionError, expose_details: bool) -> Response {
    let detail = |text: String| expose_details.then_some(text);
    match error {
        SubmissionError::Spam => failure(StatusCode::BAD_REQUEST, "spam detected", None),
        SubmissionError::Invalid(errors) => invalid(errors),
        SubmissionError::RateLimited => failure(
            StatusCode::TOO_MANY_REQUESTS,
            "too many submissions, please try again later",
            None,
        ),
        SubmissionError::Resume(rejection) => {
            failure(StatusCode::BAD_REQUEST, &rejection.to_string(), None)
        }
        SubmissionError::Misconfigured { detail: cause } => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server misconfigured",
            detail(cause),
        ),
        SubmissionError::Upload(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            &err.to_string(),
            detail(err.cause().to_string()),
        ),
        SubmissionError::Store(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to save submission",
            detail(err.to_string()),
        ),
    }
}

pub(crate) async fn quote_handler<S, L>(
    State(state): State<SubmissionState<S, L>>,
    headers: HeaderMap,
    payload: Result<Json<QuoteForm>, JsonRejection>,
) -> Response
where
    S: SubmissionStore + 'static,
    L: SubmissionLimiter + 'static,
{
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            return invalid(vec![FieldError::new("body", rejection.body_text())]);
        }
    };

    match state.service.submit_quote(form, &origin_from(&headers)).await {
        Ok(receipt) => success(StatusCode::CREATED, receipt),
        Err(error) => error_response(error, state.expose_details),
    }
}

pub(crate) async fn application_handler<S, L>(
    State(state): State<SubmissionState<S, L>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response
where
    S: SubmissionStore + 'static,
    L: SubmissionLimiter + 'static,
{
    let (form, resume) = match read_application(multipart).await {
        Ok(parts) => parts,
        Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let rejection = ResumeRejection::TooLarge {
                size: APPLICATION_BODY_LIMIT,
            };
            return failure(StatusCode::BAD_REQUEST, &rejection.to_string(), None);
        }
        Err(err) => {
            return invalid(vec![FieldError::new("body", err.body_text())]);
        }
    };

    match state
        .service
        .submit_application(form, resume, &origin_from(&headers))
        .await
    {
        Ok(receipt) => success(StatusCode::OK, receipt),
        Err(error) => error_response(error, state.expose_details),
    }
}

async fn read_application(
    mut multipart: Multipart,
) -> Result<(JobApplicationForm, Option<ResumeUpload>), MultipartError> {
    let mut form = JobApplicationForm::default();
    let mut resume = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            resume = Some(ResumeUpload {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let slot = match name.as_str() {
            "fullName" => &mut form.full_name,
            "email" => &mut form.email,
            "phone" => &mut form.phone,
            "position" => &mut form.position,
            "message" => &mut form.message,
            "language" => &mut form.language,
            "website" => &mut form.website,
            _ => continue,
        };
        *slot = Some(field.text().await?);
    }

    Ok((form, resume))
}
