use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::cms::CmsError;
use crate::content::query::GroqQuery;
use crate::content::repository::ContentStore;
use crate::content::ContentService;

/// Store returning a canned payload and recording every query it receives.
#[derive(Default)]
pub(super) struct RecordingStore {
    payload: Value,
    pub(super) queries: Mutex<Vec<GroqQuery>>,
}

impl RecordingStore {
    pub(super) fn returning(payload: Value) -> Self {
        Self {
            payload,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn query_count(&self) -> usize {
        self.queries.lock().expect("query log poisoned").len()
    }

    pub(super) fn last_query(&self) -> GroqQuery {
        self.queries
            .lock()
            .expect("query log poisoned")
            .last()
            .cloned()
            .expect("at least one query issued")
    }
}

#[async_trait]
impl ContentStore for RecordingStore {
    async fn fetch(&self, query: &GroqQuery) -> Result<Value, CmsError> {
        self.queries
            .lock()
            .expect("query log poisoned")
            .push(query.clone());
        Ok(self.payload.clone())
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl ContentStore for UnavailableStore {
    async fn fetch(&self, _query: &GroqQuery) -> Result<Value, CmsError> {
        Err(CmsError::Transport("connection reset".to_string()))
    }
}

pub(super) fn service_with(payload: Value) -> (ContentService<RecordingStore>, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::returning(payload));
    (ContentService::new(store.clone()), store)
}

pub(super) fn projects_payload() -> Value {
    json!([
        {
            "_id": "project-villa",
            "slug": "villa-nord",
            "title": { "en": "Villa North", "de": "Villa Nord" },
            "description": { "en": "Timber-frame family home.", "de": "  " },
            "category": { "en": "Residential", "de": "Wohnbau" },
            "location": "Hamburg",
            "year": 2023,
            "featured": true,
            "architecture": { "en": { "title": "Studio Keller", "url": "https://keller.example" } },
            "imageUrls": ["https://cdn.example/villa.jpg"]
        },
        {
            "_id": "project-hall",
            "slug": "hall-sued",
            "title": { "en": "Logistics Hall South" },
            "architecture": { "en": "Planungsbüro Ost", "de": "" }
        }
    ])
}

pub(super) fn services_payload() -> Value {
    json!([
        {
            "_id": "service-renovation",
            "slug": "renovation",
            "title": { "en": "Renovation", "de": "Sanierung" },
            "summary": { "en": "From old to new." },
            "features": { "en": ["Roofing", "Facades"], "de": ["Dach", "Fassade"] }
        }
    ])
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
