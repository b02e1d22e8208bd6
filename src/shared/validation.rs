use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

lazy_static! {
    /// Regex for validating Sri Lankan contact numbers
    /// Must be exactly 10 digits starting with 0
    /// - Valid: "0112345678", "0771234567"
    /// - Invalid: "112345678", "+94771234567", "07712345678"
    pub static ref CONTACT_NUMBER_REGEX: Regex = Regex::new(r"^0\d{9}$").unwrap();

    /// Regex for validating 24-hour HH:mm time strings
    /// - Valid: "08:00", "8:30", "23:59"
    /// - Invalid: "24:00", "08:60", "8am"
    pub static ref TIME_OF_DAY_REGEX: Regex = Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Flatten validator errors into a single comma-joined message string.
pub fn validation_messages(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    collect_messages(errors, &mut messages);
    messages.join(", ")
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    match &error.message {
                        Some(message) => out.push(message.to_string()),
                        None => out.push(format!("{} is invalid", field)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}
