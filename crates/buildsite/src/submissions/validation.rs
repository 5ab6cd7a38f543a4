use std::sync::OnceLock;

use regex::Regex;

use super::domain::{
    FieldError, JobApplication, JobApplicationForm, QuoteForm, QuoteRequest, ServiceKind,
};
use crate::content::Locale;

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 100;
pub const MIN_DETAILS_CHARS: usize = 10;
pub const MAX_TEXT_CHARS: usize = 5000;
pub const MAX_POSITION_CHARS: usize = 200;
pub const MIN_PHONE_DIGITS: usize = 7;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9\s+\-()]+$").expect("phone pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Digits, spaces, `+`, `-` and parentheses only, with enough digits to dial.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone)
        && phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// A filled honeypot marks automated submissions.
pub fn is_spam(honeypot: Option<&str>) -> bool {
    honeypot.is_some_and(|value| !value.trim().is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Accumulates every field problem so the form can show them all at once.
#[derive(Debug, Default)]
struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn required(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let value = trimmed(value);
        if value.is_none() {
            self.push(field, format!("{field} is required"));
        }
        value
    }

    fn bounded(
        &mut self,
        field: &'static str,
        value: Option<String>,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let value = self.required(field, value)?;
        let length = value.chars().count();
        if length < min {
            self.push(field, format!("{field} must be at least {min} characters"));
        } else if length > max {
            self.push(field, format!("{field} must be at most {max} characters"));
        }
        Some(value)
    }

    fn email(&mut self, value: Option<String>) -> Option<String> {
        let email = self.required("email", value)?.to_lowercase();
        if !is_valid_email(&email) {
            self.push("email", "email must be a valid email address");
        }
        Some(email)
    }

    fn phone(&mut self, value: Option<String>) -> Option<String> {
        let phone = trimmed(value)?;
        if !is_valid_phone(&phone) {
            self.push(
                "phone",
                format!("phone must contain at least {MIN_PHONE_DIGITS} digits and only digits, spaces, +, - or parentheses"),
            );
        }
        Some(phone)
    }

    fn optional_text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let text = trimmed(value)?;
        if text.chars().count() > MAX_TEXT_CHARS {
            self.push(field, format!("{field} must be at most {MAX_TEXT_CHARS} characters"));
        }
        Some(text)
    }

    fn language(&mut self, value: Option<String>) -> Option<Locale> {
        let code = self.required("language", value)?;
        match code.parse::<Locale>() {
            Ok(locale) => Some(locale),
            Err(_) => {
                self.push("language", "language must be one of: en, de");
                None
            }
        }
    }

    fn service(&mut self, value: Option<String>) -> Option<ServiceKind> {
        let slug = self.required("service", value)?;
        match slug.parse::<ServiceKind>() {
            Ok(kind) => Some(kind),
            Err(()) => {
                let options = ServiceKind::ALL
                    .iter()
                    .map(|kind| kind.slug())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.push("service", format!("service must be one of: {options}"));
                None
            }
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, Vec<FieldError>> {
        if !self.0.is_empty() {
            return Err(self.0);
        }
        build().ok_or_else(Vec::new)
    }
}

/// Check a quote request, returning every field error at once.
pub fn validate_quote(form: QuoteForm) -> Result<QuoteRequest, Vec<FieldError>> {
    let mut errors = FieldErrors::default();

    let full_name = errors.bounded("fullName", form.full_name, MIN_NAME_CHARS, MAX_NAME_CHARS);
    let email = errors.email(form.email);
    let service = errors.service(form.service);
    let project_details = errors.bounded(
        "projectDetails",
        form.project_details,
        MIN_DETAILS_CHARS,
        MAX_TEXT_CHARS,
    );
    let phone = errors.phone(form.phone);
    let language = errors.language(form.language);

    errors.finish(|| {
        Some(QuoteRequest {
            full_name: full_name?,
            email: email?,
            phone,
            service: service?,
            project_details: project_details?,
            language: language?,
        })
    })
}

/// Check a job application's text fields, returning every field error at once.
pub fn validate_application(form: JobApplicationForm) -> Result<JobApplication, Vec<FieldError>> {
    let mut errors = FieldErrors::default();

    let full_name = errors.bounded("fullName", form.full_name, MIN_NAME_CHARS, MAX_NAME_CHARS);
    let email = errors.email(form.email);
    let position = errors.bounded("position", form.position, 1, MAX_POSITION_CHARS);
    let phone = errors.phone(form.phone);
    let message = errors.optional_text("message", form.message);
    let language = errors.language(form.language);

    errors.finish(|| {
        Some(JobApplication {
            full_name: full_name?,
            email: email?,
            phone,
            position: position?,
            message,
            language: language?,
        })
    })
}
