use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::locale::Locale;
use super::localized::{Blank, Localized};

/// Architecture/planning credit as persisted. Older documents store a bare
/// name, newer ones a `{title, url}` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArchitectureReference {
    Legacy(String),
    Structured {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

/// Canonical outward shape. `url` is an absolute URL or `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningReference {
    pub title: String,
    pub url: String,
}

pub const PLACEHOLDER_URL: &str = "#";

impl ArchitectureReference {
    fn title(&self) -> Option<&str> {
        let title = match self {
            ArchitectureReference::Legacy(name) => Some(name.as_str()),
            ArchitectureReference::Structured { title, .. } => title.as_deref(),
        };
        title.map(str::trim).filter(|title| !title.is_empty())
    }

    pub fn normalize(&self) -> Option<PlanningReference> {
        let title = self.title()?.to_string();
        let url = match self {
            ArchitectureReference::Legacy(_) => PLACEHOLDER_URL.to_string(),
            ArchitectureReference::Structured { url, .. } => canonical_url(url.as_deref()),
        };
        Some(PlanningReference { title, url })
    }
}

impl Blank for ArchitectureReference {
    fn is_blank(&self) -> bool {
        self.title().is_none()
    }
}

fn canonical_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|candidate| *candidate != PLACEHOLDER_URL)
        .filter(|candidate| {
            Url::parse(candidate).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
        })
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER_URL.to_string())
}

/// Resolve the per-locale reference and normalize it in one step.
pub fn resolve_planning_reference(
    field: &Localized<ArchitectureReference>,
    locale: Locale,
) -> Option<PlanningReference> {
    field.resolve(locale).and_then(ArchitectureReference::normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(value: serde_json::Value) -> Localized<ArchitectureReference> {
        serde_json::from_value(value).expect("reference deserializes")
    }

    #[test]
    fn legacy_strings_are_wrapped() {
        let reference = field(json!({ "en": "Studio Keller" }));
        assert_eq!(
            resolve_planning_reference(&reference, Locale::En),
            Some(PlanningReference {
                title: "Studio Keller".to_string(),
                url: "#".to_string(),
            })
        );
    }

    #[test]
    fn structured_values_keep_url() {
        let reference = field(json!({
            "en": { "title": "Studio Keller", "url": "https://keller.example/projects" }
        }));
        let resolved = resolve_planning_reference(&reference, Locale::De).expect("resolves");
        assert_eq!(resolved.title, "Studio Keller");
        assert_eq!(resolved.url, "https://keller.example/projects");
    }

    #[test]
    fn missing_or_relative_urls_become_placeholder() {
        for url in [json!(null), json!(""), json!("keller.example"), json!("/about")] {
            let reference = field(json!({ "de": { "title": "Büro Nord", "url": url } }));
            let resolved = resolve_planning_reference(&reference, Locale::De).expect("resolves");
            assert_eq!(resolved.url, PLACEHOLDER_URL);
        }
    }

    #[test]
    fn untitled_translation_falls_back_to_english() {
        let reference = field(json!({
            "en": "Studio Keller",
            "de": { "title": "  ", "url": "https://nord.example" }
        }));
        let resolved = resolve_planning_reference(&reference, Locale::De).expect("resolves");
        assert_eq!(resolved.title, "Studio Keller");
        assert_eq!(resolved.url, "#");
    }

    #[test]
    fn no_usable_title_drops_the_field() {
        let reference = field(json!({ "en": { "url": "https://keller.example" }, "de": "" }));
        assert_eq!(resolve_planning_reference(&reference, Locale::De), None);
        assert_eq!(resolve_planning_reference(&reference, Locale::En), None);
        assert_eq!(
            resolve_planning_reference(&Localized::default(), Locale::En),
            None
        );
    }
}
