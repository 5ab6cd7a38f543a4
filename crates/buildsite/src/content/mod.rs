//! Locale-aware content resolution over the CMS collections.

pub mod locale;
pub mod localized;
pub mod query;
pub mod reference;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use locale::{Locale, UnknownLocale, SUPPORTED_LOCALES};
pub use localized::{Blank, Localized};
pub use reference::{resolve_planning_reference, ArchitectureReference, PlanningReference};
pub use repository::ContentStore;
pub use router::content_router;
pub use service::{ContentError, ContentService};
pub use views::{ContentKind, ProjectView, SearchHit, ServiceView, VacancyView};
