use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::repository::{AssetId, DocumentId};
use crate::content::Locale;

/// Services a quote can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    ResidentialConstruction,
    CommercialConstruction,
    Renovation,
    Extension,
    ArchitecturePlanning,
    ProjectManagement,
    Other,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 7] = [
        ServiceKind::ResidentialConstruction,
        ServiceKind::CommercialConstruction,
        ServiceKind::Renovation,
        ServiceKind::Extension,
        ServiceKind::ArchitecturePlanning,
        ServiceKind::ProjectManagement,
        ServiceKind::Other,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            ServiceKind::ResidentialConstruction => "residential-construction",
            ServiceKind::CommercialConstruction => "commercial-construction",
            ServiceKind::Renovation => "renovation",
            ServiceKind::Extension => "extension",
            ServiceKind::ArchitecturePlanning => "architecture-planning",
            ServiceKind::ProjectManagement => "project-management",
            ServiceKind::Other => "other",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == value)
            .ok_or(())
    }
}

/// Quote request body as posted by the site. Every field is optional at this
/// stage so that all missing fields can be reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub project_details: Option<String>,
    pub language: Option<String>,
    /// Honeypot; hidden on the site and expected to stay empty.
    pub website: Option<String>,
}

/// Job application text fields from the multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobApplicationForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub message: Option<String>,
    pub language: Option<String>,
    pub website: Option<String>,
}

/// Validated, normalized quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: ServiceKind,
    pub project_details: String,
    pub language: Locale,
}

/// Validated, normalized job application (without the resume).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplication {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub message: Option<String>,
    pub language: Locale,
}

pub const QUOTE_DOCUMENT_TYPE: &str = "quoteRequest";
pub const APPLICATION_DOCUMENT_TYPE: &str = "jobApplication";

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn insert_optional(fields: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), Value::String(value.clone()));
    }
}

impl QuoteRequest {
    /// CMS document persisted for this request.
    pub fn to_document(&self, id: &DocumentId, submitted_at: DateTime<Utc>) -> Value {
        let mut fields = Map::new();
        fields.insert("_id".to_string(), json!(id.0));
        fields.insert("_type".to_string(), json!(QUOTE_DOCUMENT_TYPE));
        fields.insert("fullName".to_string(), json!(self.full_name));
        fields.insert("email".to_string(), json!(self.email));
        insert_optional(&mut fields, "phone", &self.phone);
        fields.insert("service".to_string(), json!(self.service.slug()));
        fields.insert("projectDetails".to_string(), json!(self.project_details));
        fields.insert("language".to_string(), json!(self.language.code()));
        fields.insert("status".to_string(), json!("new"));
        fields.insert("submittedAt".to_string(), json!(timestamp(submitted_at)));
        Value::Object(fields)
    }
}

impl JobApplication {
    pub fn to_document(
        &self,
        id: &DocumentId,
        resume: &AssetId,
        submitted_at: DateTime<Utc>,
    ) -> Value {
        let mut fields = Map::new();
        fields.insert("_id".to_string(), json!(id.0));
        fields.insert("_type".to_string(), json!(APPLICATION_DOCUMENT_TYPE));
        fields.insert("fullName".to_string(), json!(self.full_name));
        fields.insert("email".to_string(), json!(self.email));
        insert_optional(&mut fields, "phone", &self.phone);
        fields.insert("position".to_string(), json!(self.position));
        insert_optional(&mut fields, "message", &self.message);
        fields.insert("language".to_string(), json!(self.language.code()));
        fields.insert(
            "resume".to_string(),
            json!({
                "_type": "file",
                "asset": { "_type": "reference", "_ref": resume.0 },
            }),
        );
        fields.insert("status".to_string(), json!("new"));
        fields.insert("submittedAt".to_string(), json!(timestamp(submitted_at)));
        Value::Object(fields)
    }
}

/// One problem with one field, reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
