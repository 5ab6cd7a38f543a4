//! GROQ query construction for the content collections.
//!
//! Localized fields are projected as whole `{en, de}` records and resolved
//! in Rust so blank translations can fall back. Server-side filtering (search)
//! uses [`localized_selector`] instead, which skips null and blank
//! translations in favour of English.

use std::collections::BTreeMap;

use serde_json::Value;

use super::locale::Locale;
use super::views::ContentKind;

/// Longest search term forwarded to the content store.
pub const MAX_SEARCH_TERM: usize = 100;
pub const SEARCH_LIMIT: usize = 20;

/// Query text plus `$params`; values never get spliced into the text.
#[derive(Debug, Clone, PartialEq)]
pub struct GroqQuery {
    pub text: String,
    pub params: BTreeMap<String, Value>,
}

impl GroqQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Field selector preferring `locale` and falling back to English.
pub fn localized_selector(field: &str, locale: Locale) -> String {
    if locale.is_default() {
        format!("{field}.{}", Locale::En.code())
    } else {
        // `coalesce` only skips nulls, so blank strings are tested explicitly.
        let preferred = format!("{field}.{}", locale.code());
        format!(
            r#"select(defined({preferred}) && {preferred} != "" => {preferred}, {field}.{})"#,
            Locale::En.code()
        )
    }
}

const SERVICE_PROJECTION: &str = r#"{
  _id,
  "slug": slug.current,
  title,
  summary,
  body,
  features,
  "imageUrl": mainImage.asset->url
}"#;

const PROJECT_PROJECTION: &str = r#"{
  _id,
  "slug": slug.current,
  title,
  description,
  category,
  location,
  year,
  client,
  featured,
  architecture,
  "imageUrls": images[].asset->url
}"#;

const VACANCY_PROJECTION: &str = r#"{
  _id,
  "slug": slug.current,
  title,
  location,
  employmentType,
  description,
  requirements,
  benefits
}"#;

fn collection_filter(kind: ContentKind) -> String {
    format!(
        "_type == \"{}\" && defined(slug.current) && !(_id in path(\"drafts.**\"))",
        kind.document_type()
    )
}

pub fn services_query() -> GroqQuery {
    GroqQuery::new(format!(
        "*[{}] | order(orderRank asc, title.en asc) {SERVICE_PROJECTION}",
        collection_filter(ContentKind::Service)
    ))
}

pub fn service_by_slug(slug: &str) -> GroqQuery {
    GroqQuery::new(format!(
        "*[{} && slug.current == $slug][0] {SERVICE_PROJECTION}",
        collection_filter(ContentKind::Service)
    ))
    .param("slug", slug)
}

pub fn projects_query(featured_only: bool) -> GroqQuery {
    let featured = if featured_only {
        " && featured == true"
    } else {
        ""
    };
    GroqQuery::new(format!(
        "*[{}{featured}] | order(year desc, title.en asc) {PROJECT_PROJECTION}",
        collection_filter(ContentKind::Project)
    ))
}

pub fn project_by_slug(slug: &str) -> GroqQuery {
    GroqQuery::new(format!(
        "*[{} && slug.current == $slug][0] {PROJECT_PROJECTION}",
        collection_filter(ContentKind::Project)
    ))
    .param("slug", slug)
}

pub fn vacancies_query() -> GroqQuery {
    GroqQuery::new(format!(
        "*[{} && coalesce(active, true)] | order(_createdAt desc) {VACANCY_PROJECTION}",
        collection_filter(ContentKind::Vacancy)
    ))
}

/// Normalize a free-text term; `None` when nothing searchable remains.
pub fn normalize_search_term(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() && *c != '*')
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(MAX_SEARCH_TERM).collect())
}

pub fn search_query(term: &str, locale: Locale) -> GroqQuery {
    let types = ContentKind::ALL
        .iter()
        .map(|kind| format!("\"{}\"", kind.document_type()))
        .collect::<Vec<_>>()
        .join(", ");
    let title = localized_selector("title", locale);
    let summary = localized_selector("summary", locale);
    let description = localized_selector("description", locale);

    GroqQuery::new(format!(
        r#"*[_type in [{types}] && defined(slug.current) && !(_id in path("drafts.**")) && ({title} match $pattern || {summary} match $pattern || pt::text({description}) match $pattern || {description} match $pattern)] | order(_type asc, _updatedAt desc) [0...{SEARCH_LIMIT}] {{
  _id,
  _type,
  "slug": slug.current,
  title,
  "description": coalesce(summary, description),
  "imageUrl": coalesce(mainImage.asset->url, images[0].asset->url)
}}"#
    ))
    .param("pattern", format!("{term}*"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_selector_reads_field_directly() {
        assert_eq!(localized_selector("title", Locale::En), "title.en");
    }

    #[test]
    fn other_locales_fall_back_to_english() {
        assert_eq!(
            localized_selector("title", Locale::De),
            r#"select(defined(title.de) && title.de != "" => title.de, title.en)"#
        );
    }

    #[test]
    fn blank_translations_do_not_shadow_english() {
        let selector = localized_selector("summary", Locale::De);
        assert!(selector.contains(r#"summary.de != """#));
        assert!(!selector.contains("coalesce"));
        assert!(selector.ends_with(", summary.en)"));
    }

    #[test]
    fn slugs_are_bound_as_params() {
        let query = project_by_slug("villa\" || true");
        assert!(query.text.contains("slug.current == $slug"));
        assert!(!query.text.contains("villa"));
        assert_eq!(query.params["slug"], Value::from("villa\" || true"));
    }

    #[test]
    fn featured_filter_is_optional() {
        assert!(projects_query(true).text.contains("featured == true"));
        assert!(!projects_query(false).text.contains("featured == true"));
    }

    #[test]
    fn search_matches_on_resolved_fields() {
        let query = search_query("dach", Locale::De);
        assert!(query.text.contains(
            r#"select(defined(title.de) && title.de != "" => title.de, title.en) match $pattern"#
        ));
        assert!(query.text.contains(
            r#"pt::text(select(defined(description.de) && description.de != "" => description.de, description.en))"#
        ));
        assert!(query.text.contains(r#""service", "project", "vacancy""#));
        assert_eq!(query.params["pattern"], Value::from("dach*"));
    }

    #[test]
    fn search_terms_are_trimmed_and_bounded() {
        assert_eq!(normalize_search_term("   "), None);
        assert_eq!(normalize_search_term("***"), None);
        assert_eq!(
            normalize_search_term("  flat   roof \n"),
            Some("flat roof".to_string())
        );
        let long = "a".repeat(MAX_SEARCH_TERM + 40);
        assert_eq!(
            normalize_search_term(&long).map(|term| term.len()),
            Some(MAX_SEARCH_TERM)
        );
    }
}
