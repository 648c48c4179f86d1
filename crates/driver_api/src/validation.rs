//! Request body validation for driver payloads.
//!
//! Runs before any core call; the core never sees an invalid driver.

use driver_core::{DriverCreateDto, DriverDto};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MAX_NAME_CHARS: usize = 50;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?\(?\d+\)?(?:[\s.\-]?\(?\d+\)?)*$").expect("valid phone regex")
});

/// One failed field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverValidationError {
    Required(&'static str),
    TooLong { field: &'static str, max: usize },
    InvalidEmail,
    InvalidPhone,
}

impl Display for DriverValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{field} is required"),
            Self::TooLong { field, max } => {
                write!(f, "{field} cannot be longer than {max} characters")
            }
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::InvalidPhone => write!(f, "Invalid phone number"),
        }
    }
}

impl Error for DriverValidationError {}

pub fn validate_create(dto: &DriverCreateDto) -> Result<(), Vec<DriverValidationError>> {
    validate_fields(
        &dto.first_name,
        &dto.last_name,
        &dto.email,
        &dto.phone_number,
    )
}

pub fn validate_update(dto: &DriverDto) -> Result<(), Vec<DriverValidationError>> {
    validate_fields(
        &dto.first_name,
        &dto.last_name,
        &dto.email,
        &dto.phone_number,
    )
}

/// Checks every rule and reports all failures at once.
fn validate_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone_number: &str,
) -> Result<(), Vec<DriverValidationError>> {
    let mut errors = Vec::new();

    check_name("First name", first_name, &mut errors);
    check_name("Last name", last_name, &mut errors);

    if email.trim().is_empty() {
        errors.push(DriverValidationError::Required("Email"));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(DriverValidationError::InvalidEmail);
    }

    if phone_number.trim().is_empty() {
        errors.push(DriverValidationError::Required("Phone number"));
    } else if !PHONE_RE.is_match(phone_number) {
        errors.push(DriverValidationError::InvalidPhone);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_name(field: &'static str, value: &str, errors: &mut Vec<DriverValidationError>) {
    if value.trim().is_empty() {
        errors.push(DriverValidationError::Required(field));
    } else if value.chars().count() > MAX_NAME_CHARS {
        errors.push(DriverValidationError::TooLong {
            field,
            max: MAX_NAME_CHARS,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_create, validate_update, DriverValidationError, MAX_NAME_CHARS};
    use driver_core::{DriverCreateDto, DriverDto};

    fn valid() -> DriverCreateDto {
        DriverCreateDto {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone_number: "555-1234".to_string(),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        assert_eq!(validate_create(&valid()), Ok(()));
    }

    #[test]
    fn reports_every_failed_rule() {
        let dto = DriverCreateDto {
            first_name: "  ".to_string(),
            last_name: "x".repeat(MAX_NAME_CHARS + 1),
            email: "not-an-email".to_string(),
            phone_number: "call me".to_string(),
        };

        let errors = validate_create(&dto).unwrap_err();
        assert_eq!(
            errors,
            vec![
                DriverValidationError::Required("First name"),
                DriverValidationError::TooLong {
                    field: "Last name",
                    max: MAX_NAME_CHARS
                },
                DriverValidationError::InvalidEmail,
                DriverValidationError::InvalidPhone,
            ]
        );
        assert_eq!(errors[0].to_string(), "First name is required");
    }

    #[test]
    fn name_limit_counts_characters_not_bytes() {
        let mut dto = valid();
        dto.first_name = "é".repeat(MAX_NAME_CHARS);
        assert!(validate_create(&dto).is_ok());
    }

    #[test]
    fn phone_shapes() {
        for phone in ["555-1234", "(555) 123-4567", "+1 555 123 4567", "555.123.4567"] {
            let mut dto = valid();
            dto.phone_number = phone.to_string();
            assert!(validate_create(&dto).is_ok(), "{phone} should be accepted");
        }
        for phone in ["555-", "abc-1234", "--", "555 1234 ext"] {
            let mut dto = valid();
            dto.phone_number = phone.to_string();
            assert!(validate_create(&dto).is_err(), "{phone} should be rejected");
        }
    }

    #[test]
    fn update_payload_requires_email() {
        let dto = DriverDto {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: String::new(),
            phone_number: "555-1234".to_string(),
        };
        assert_eq!(
            validate_update(&dto),
            Err(vec![DriverValidationError::Required("Email")])
        );
    }
}
