use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::locale::Locale;

/// Values that can be "present but empty" in the content store.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Value {
    fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(text) => text.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }
}

/// A field stored once per language, e.g. `{ "en": "Renovation", "de": "Sanierung" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: Option<T>,
    pub de: Option<T>,
}

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self { en: None, de: None }
    }
}

impl<T: Blank> Localized<T> {
    pub fn get(&self, locale: Locale) -> Option<&T> {
        match locale {
            Locale::En => self.en.as_ref(),
            Locale::De => self.de.as_ref(),
        }
    }

    /// Value for `locale`, falling back to English when the translation is
    /// missing or blank. English is returned as stored.
    pub fn resolve(&self, locale: Locale) -> Option<&T> {
        if locale.is_default() {
            return self.en.as_ref();
        }

        self.get(locale)
            .filter(|value| !value.is_blank())
            .or(self.en.as_ref())
    }
}

impl<T: Blank + Clone> Localized<T> {
    pub fn resolved(&self, locale: Locale) -> Option<T> {
        self.resolve(locale).cloned()
    }
}

/// Deserialize a localized field that may be absent or `null` in the payload.
pub(crate) fn optional_localized<'de, D, T>(deserializer: D) -> Result<Localized<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Localized<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
