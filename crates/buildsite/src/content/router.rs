use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::locale::Locale;
use super::repository::ContentStore;
use super::service::{ContentError, ContentService};

/// Router exposing resolved content collections and site search.
pub fn content_router<S>(service: Arc<ContentService<S>>) -> Router
where
    S: ContentStore + 'static,
{
    Router::new()
        .route("/api/content/:locale/services", get(services_handler::<S>))
        .route(
            "/api/content/:locale/services/:slug",
            get(service_handler::<S>),
        )
        .route("/api/content/:locale/projects", get(projects_handler::<S>))
        .route(
            "/api/content/:locale/projects/:slug",
            get(project_handler::<S>),
        )
        .route("/api/content/:locale/vacancies", get(vacancies_handler::<S>))
        .route("/api/search", get(search_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProjectFilter {
    #[serde(default)]
    featured: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    locale: Option<String>,
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            let payload = json!({ "error": self.to_string() });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }

        error!(error = %self, "content resolution failed");
        let payload = json!({ "error": "content is temporarily unavailable" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    }
}

pub(crate) async fn services_handler<S>(
    State(service): State<Arc<ContentService<S>>>,
    Path(locale): Path<String>,
) -> Result<Response, ContentError>
where
    S: ContentStore + 'static,
{
    let locale: Locale = locale.parse()?;
    let services = service.services(locale).await?;
    Ok(Json(json!({ "locale": locale, "services": services })).into_response())
}

pub(crate) async fn service_handler<S>(
    State(service): State<Arc<ContentService<S>>>,
    Path((locale, slug)): Path<(String, String)>,
) -> Result<Response, ContentError>
where
    S: ContentStore + 'static,
{
    let locale: Locale = locale.parse()?;
    let view = service.service(locale, &slug).await?;
    Ok(Json(view).into_response())
}

pub(crate) async fn projects_handler<S>(
    State(service): State<Arc<ContentService<S>>>,
    Path(locale): Path<String>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Response, ContentError>
where
    S: ContentStore + 'static,
{
    let locale: Locale = locale.parse()?;
    let projects = service.projects(locale, filter.featured).await?;
    Ok(Json(json!({ "locale": locale, "projects": projects })).into_response())
}

pub(crate) async fn project_handler<S>(
    State(service): State<Arc<ContentService<S>>>,
    Path((locale, slug)): Path<(String, String)>,
) -> Result<Response, ContentError>
where
    S: ContentStore + 'static,
{
    let locale: Locale = locale.parse()?;
    let view = service.project(locale, &slug).await?;
    Ok(Json(view).into_response())
}

pub(crate) async fn vacancies_handler<S>(
    State(service): State<Arc<ContentService<S>>>,
    Path(locale): Path<String>,
) -> Result<Response, ContentError>
where
    S: ContentStore + 'static,
{
    let locale: Locale = locale.parse()?;
    let vacancies = service.vacancies(locale).await?;
    Ok(Json(json!({ "locale": locale, "vacancies": vacancies })).into_response())
}

pub(crate) async fn search_handler<S>(
    State(service): State<Arc<ContentService<S>>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ContentError>
where
    S: ContentStore + 'static,
{
    let locale = match params.locale.as_deref().map(str::trim) {
        None | Some("") => Locale::default(),
        Some(code) => code.parse()?,
    };
    let results = service.search(&params.q, locale).await?;
    Ok(Json(json!({ "results": results })).into_response())
}
