use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::locale::{Locale, UnknownLocale};
use super::query::{self, GroqQuery};
use super::repository::ContentStore;
use super::views::{
    ContentKind, ProjectDocument, ProjectView, SearchDocument, SearchHit, ServiceDocument,
    ServiceView, VacancyDocument, VacancyView,
};
use crate::cms::CmsError;

/// Service resolving CMS collections into locale-specific views. Each call
/// issues exactly one query.
pub struct ContentService<S> {
    store: Arc<S>,
}

impl<S> ContentService<S>
where
    S: ContentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn services(&self, locale: Locale) -> Result<Vec<ServiceView>, ContentError> {
        let documents: Vec<ServiceDocument> = self.fetch_list(&query::services_query()).await?;
        Ok(documents
            .into_iter()
            .map(|document| document.into_view(locale))
            .collect())
    }

    pub async fn service(&self, locale: Locale, slug: &str) -> Result<ServiceView, ContentError> {
        let document: ServiceDocument = self
            .fetch_one(&query::service_by_slug(slug), ContentKind::Service, slug)
            .await?;
        Ok(document.into_view(locale))
    }

    pub async fn projects(
        &self,
        locale: Locale,
        featured_only: bool,
    ) -> Result<Vec<ProjectView>, ContentError> {
        let documents: Vec<ProjectDocument> = self
            .fetch_list(&query::projects_query(featured_only))
            .await?;
        Ok(documents
            .into_iter()
            .map(|document| document.into_view(locale))
            .collect())
    }

    pub async fn project(&self, locale: Locale, slug: &str) -> Result<ProjectView, ContentError> {
        let document: ProjectDocument = self
            .fetch_one(&query::project_by_slug(slug), ContentKind::Project, slug)
            .await?;
        Ok(document.into_view(locale))
    }

    pub async fn vacancies(&self, locale: Locale) -> Result<Vec<VacancyView>, ContentError> {
        let documents: Vec<VacancyDocument> = self.fetch_list(&query::vacancies_query()).await?;
        Ok(documents
            .into_iter()
            .map(|document| document.into_view(locale))
            .collect())
    }

    /// Free-text search across services, projects and vacancies. Blank terms
    /// short-circuit to an empty result without touching the store.
    pub async fn search(&self, term: &str, locale: Locale) -> Result<Vec<SearchHit>, ContentError> {
        let Some(term) = query::normalize_search_term(term) else {
            return Ok(Vec::new());
        };

        let documents: Vec<SearchDocument> = self
            .fetch_list(&query::search_query(&term, locale))
            .await?;
        let hits: Vec<SearchHit> = documents
            .into_iter()
            .filter_map(|document| document.into_hit(locale))
            .collect();
        debug!(%locale, hits = hits.len(), "search completed");
        Ok(hits)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        query: &GroqQuery,
    ) -> Result<Vec<T>, ContentError> {
        match self.store.fetch(query).await? {
            Value::Null => Ok(Vec::new()),
            payload => serde_json::from_value(payload)
                .map_err(|err| ContentError::Decode(err.to_string())),
        }
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        query: &GroqQuery,
        kind: ContentKind,
        slug: &str,
    ) -> Result<T, ContentError> {
        match self.store.fetch(query).await? {
            Value::Null => Err(ContentError::NotFound {
                kind,
                slug: slug.to_string(),
            }),
            payload => serde_json::from_value(payload)
                .map_err(|err| ContentError::Decode(err.to_string())),
        }
    }
}

/// Errors raised while resolving content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    UnknownLocale(#[from] UnknownLocale),
    #[error("no {} found for slug '{slug}'", .kind.document_type())]
    NotFound { kind: ContentKind, slug: String },
    #[error(transparent)]
    Store(#[from] CmsError),
    #[error("content payload did not match the expected shape: {0}")]
    Decode(String),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::UnknownLocale(_) | ContentError::NotFound { .. }
        )
    }
}
