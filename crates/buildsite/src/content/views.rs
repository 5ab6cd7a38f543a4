use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::locale::Locale;
use super::localized::{optional_localized, Localized};
use super::reference::{resolve_planning_reference, ArchitectureReference, PlanningReference};

/// Content collections exposed on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Service,
    Project,
    Vacancy,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Service,
        ContentKind::Project,
        ContentKind::Vacancy,
    ];

    pub const fn document_type(self) -> &'static str {
        match self {
            ContentKind::Service => "service",
            ContentKind::Project => "project",
            ContentKind::Vacancy => "vacancy",
        }
    }

    pub fn from_document_type(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.document_type() == value)
    }

    const fn path_segment(self) -> &'static str {
        match self {
            ContentKind::Service => "services",
            ContentKind::Project => "projects",
            ContentKind::Vacancy => "vacancies",
        }
    }

    /// Site path of a document, e.g. `/de/projects/villa-nord`.
    pub fn href(self, locale: Locale, slug: &str) -> String {
        format!("/{}/{}/{}", locale.code(), self.path_segment(), slug)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    #[serde(default, deserialize_with = "optional_localized")]
    pub title: Localized<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub summary: Localized<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub body: Localized<Value>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub features: Localized<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ServiceDocument {
    pub(crate) fn into_view(self, locale: Locale) -> ServiceView {
        ServiceView {
            title: self.title.resolved(locale).unwrap_or_else(|| self.slug.clone()),
            summary: self.summary.resolved(locale),
            body: self.body.resolved(locale),
            features: self.features.resolved(locale).unwrap_or_default(),
            image: self.image_url,
            id: self.id,
            slug: self.slug,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    #[serde(default, deserialize_with = "optional_localized")]
    pub title: Localized<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub description: Localized<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub category: Localized<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub architecture: Localized<ArchitectureReference>,
    #[serde(default)]
    pub image_urls: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub featured: bool,
    /// Always present in the payload; `null` when no planner is credited.
    pub architecture: Option<PlanningReference>,
    pub images: Vec<String>,
}

impl ProjectDocument {
    pub(crate) fn into_view(self, locale: Locale) -> ProjectView {
        ProjectView {
            title: self.title.resolved(locale).unwrap_or_else(|| self.slug.clone()),
            description: self.description.resolved(locale),
            category: self.category.resolved(locale),
            architecture: resolve_planning_reference(&self.architecture, locale),
            location: self.location.filter(|value| !value.trim().is_empty()),
            year: self.year,
            client: self.client.filter(|value| !value.trim().is_empty()),
            featured: self.featured.unwrap_or(false),
            images: self
                .image_urls
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect(),
            id: self.id,
            slug: self.slug,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VacancyDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    #[serde(default, deserialize_with = "optional_localized")]
    pub title: Localized<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub employment_type: Localized<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub description: Localized<Value>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub requirements: Localized<Vec<String>>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub benefits: Localized<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyView {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
}

impl VacancyDocument {
    pub(crate) fn into_view(self, locale: Locale) -> VacancyView {
        VacancyView {
            title: self.title.resolved(locale).unwrap_or_else(|| self.slug.clone()),
            location: self.location,
            employment_type: self.employment_type.resolved(locale),
            description: self.description.resolved(locale),
            requirements: self.requirements.resolved(locale).unwrap_or_default(),
            benefits: self.benefits.resolved(locale).unwrap_or_default(),
            id: self.id,
            slug: self.slug,
        }
    }
}

/// Search row as projected by the search query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub title: Localized<String>,
    #[serde(default, deserialize_with = "optional_localized")]
    pub description: Localized<Value>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub slug: String,
    pub href: String,
}

impl SearchDocument {
    /// Rows of unknown type or without a slug cannot be linked and are skipped.
    pub(crate) fn into_hit(self, locale: Locale) -> Option<SearchHit> {
        let kind = ContentKind::from_document_type(&self.doc_type)?;
        let slug = self.slug.filter(|slug| !slug.trim().is_empty())?;
        let title = self
            .title
            .resolved(locale)
            .unwrap_or_else(|| slug.clone());
        let description = self
            .description
            .resolved(locale)
            .and_then(|value| plain_text(&value));

        Some(SearchHit {
            kind,
            id: self.id,
            title,
            description,
            image: self.image_url,
            href: kind.href(locale, &slug),
            slug,
        })
    }
}

/// Flatten a plain string or portable-text blocks into a single line.
pub(crate) fn plain_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|block| block.get("children").and_then(Value::as_array))
            .map(|children| {
                children
                    .iter()
                    .filter_map(|span| span.get("text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
