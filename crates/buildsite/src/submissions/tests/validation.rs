use super::common::*;

use crate::content::Locale;
use crate::submissions::domain::{QuoteForm, ServiceKind};
use crate::submissions::validation::{validate_application, validate_quote};

fn fields(errors: &[crate::submissions::FieldError]) -> Vec<&'static str> {
    errors.iter().map(|error| error.field).collect()
}

#[test]
fn quote_is_normalized_when_valid() {
    let request = validate_quote(valid_quote()).expect("quote is valid");

    assert_eq!(request.full_name, "Anna Schmidt");
    assert_eq!(request.email, "anna@bau.de");
    assert_eq!(request.service, ServiceKind::Renovation);
    assert_eq!(request.language, Locale::De);
}

#[test]
fn single_character_name_is_rejected() {
    let form = QuoteForm {
        full_name: Some("A".to_string()),
        ..valid_quote()
    };

    let errors = validate_quote(form).expect_err("name too short");
    assert_eq!(fields(&errors), vec!["fullName"]);
    assert_eq!(errors[0].message, "fullName must be at least 2 characters");
}

#[test]
fn project_details_need_ten_characters_after_trimming() {
    let nine = QuoteForm {
        project_details: Some("  123456789   ".to_string()),
        ..valid_quote()
    };
    let errors = validate_quote(nine).expect_err("nine characters are too few");
    assert_eq!(fields(&errors), vec!["projectDetails"]);

    let ten = QuoteForm {
        project_details: Some("1234567890".to_string()),
        ..valid_quote()
    };
    assert!(validate_quote(ten).is_ok());
}

#[test]
fn unknown_service_lists_the_options() {
    let form = QuoteForm {
        service: Some("demolition".to_string()),
        ..valid_quote()
    };

    let errors = validate_quote(form).expect_err("service not offered");
    assert_eq!(fields(&errors), vec!["service"]);
    assert!(errors[0].message.contains("residential-construction"));
    assert!(errors[0].message.contains("other"));
}

#[test]
fn unsupported_language_is_rejected() {
    let form = QuoteForm {
        language: Some("fr".to_string()),
        ..valid_quote()
    };

    let errors = validate_quote(form).expect_err("french is not offered");
    assert_eq!(errors[0].message, "language must be one of: en, de");
}

#[test]
fn every_missing_field_is_reported_together() {
    let errors = validate_quote(QuoteForm::default()).expect_err("empty form");

    assert_eq!(
        fields(&errors),
        vec!["fullName", "email", "service", "projectDetails", "language"]
    );
}

#[test]
fn malformed_email_and_phone_are_both_reported() {
    let form = QuoteForm {
        email: Some("anna-at-bau".to_string()),
        phone: Some("call me".to_string()),
        ..valid_quote()
    };

    let errors = validate_quote(form).expect_err("two bad fields");
    assert_eq!(fields(&errors), vec!["email", "phone"]);
}

#[test]
fn application_requires_position() {
    let mut form = valid_application();
    form.position = Some("   ".to_string());

    let errors = validate_application(form).expect_err("position is blank");
    assert_eq!(fields(&errors), vec!["position"]);
    assert_eq!(errors[0].message, "position is required");
}

#[test]
fn application_message_is_optional_but_bounded() {
    let mut form = valid_application();
    form.message = None;
    let application = validate_application(form).expect("message may be omitted");
    assert_eq!(application.message, None);

    let mut form = valid_application();
    form.message = Some("x".repeat(5001));
    let errors = validate_application(form).expect_err("message too long");
    assert_eq!(fields(&errors), vec!["message"]);
}
