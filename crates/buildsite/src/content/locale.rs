use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Site languages. `En` is the default and the fallback for missing
/// translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::De];

impl Locale {
    pub const fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    pub const fn is_default(self) -> bool {
        matches!(self, Locale::En)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            _ => Err(UnknownLocale(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes_case_insensitively() {
        assert_eq!("de".parse::<Locale>(), Ok(Locale::De));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::En));
    }

    #[test]
    fn unknown_codes_are_errors_not_defaults() {
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(UnknownLocale("fr".to_string()))
        );
        assert!("de-AT".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }
}
